use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TenantArgs {
    /// Tenant to use instead of the configured default.
    #[arg(long, global = true)]
    pub tenant: Option<String>,
    /// Config file path. Defaults to $TENANTCTL_CONFIG, then the user config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RequestArgs {
    /// Overall time budget per command in seconds, retries included. 0 disables it.
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,
}

impl RequestArgs {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}
