/// Exit codes for scripts and CI.
pub const SUCCESS: i32 = 0;
/// Bad arguments, payload, or configuration.
pub const INVALID_INPUT: i32 = 2;
/// The API answered with an error, or the request could not be completed.
pub const REQUEST_FAILED: i32 = 3;
pub const RUNTIME_ERROR: i32 = 4;
