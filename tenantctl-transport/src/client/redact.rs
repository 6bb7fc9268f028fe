use std::collections::BTreeMap;

const SENSITIVE: [&str; 3] = ["authorization", "cookie", "set-cookie"];

/// Copy of `headers` safe to log.
pub fn redact_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            let v = if SENSITIVE.iter().any(|s| k.eq_ignore_ascii_case(s)) {
                "<redacted>".to_string()
            } else {
                v.clone()
            };
            (k.clone(), v)
        })
        .collect()
}
