use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "TENANTCTL_CONFIG";
pub const DOMAIN_ENV: &str = "TENANTCTL_DOMAIN";
pub const TOKEN_ENV: &str = "TENANTCTL_ACCESS_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("not logged in. Add a tenant to {} or set TENANTCTL_DOMAIN and TENANTCTL_ACCESS_TOKEN", .0.display())]
    NotLoggedIn(PathBuf),
    #[error("tenant '{0}' is not configured")]
    UnknownTenant(String),
    #[error("could not determine the config directory; pass --config")]
    NoConfigDir,
}

/// On-disk CLI settings: the tenants we hold tokens for, keyed by domain.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub default_tenant: String,
    #[serde(default)]
    pub tenants: BTreeMap<String, Tenant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(default)]
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Replaces `https://<domain>/api/v2/` as the API base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Tenant {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }

    /// Tenant described entirely by environment variables, if both are set.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let domain = lookup(DOMAIN_ENV).filter(|v| !v.trim().is_empty())?;
        let access_token = lookup(TOKEN_ENV).filter(|v| !v.trim().is_empty())?;
        Some(Self {
            name: domain.clone(),
            domain,
            access_token,
            expires_at: None,
            api_url: None,
        })
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    dirs::config_dir()
        .map(|d| d.join("tenantctl").join("config.json"))
        .ok_or(ConfigError::NoConfigDir)
}

impl CliConfig {
    /// A missing file reads as an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Picks the requested tenant, else the default, else the first configured one.
    ///
    /// `requested` matches either the map key (domain) or the tenant's `name`.
    pub fn tenant(&self, requested: Option<&str>, path: &Path) -> Result<Tenant, ConfigError> {
        if self.tenants.is_empty() {
            return Err(ConfigError::NotLoggedIn(path.to_path_buf()));
        }

        let wanted = requested
            .map(str::to_string)
            .or_else(|| Some(self.default_tenant.clone()).filter(|d| !d.is_empty()));

        let tenant = match wanted {
            Some(w) => self
                .tenants
                .get(&w)
                .or_else(|| self.tenants.values().find(|t| t.name == w))
                .ok_or_else(|| ConfigError::UnknownTenant(w.clone()))?,
            None => self
                .tenants
                .values()
                .next()
                .ok_or_else(|| ConfigError::NotLoggedIn(path.to_path_buf()))?,
        };

        if tenant.access_token.trim().is_empty() {
            return Err(ConfigError::NotLoggedIn(path.to_path_buf()));
        }
        Ok(tenant.clone())
    }
}

/// Environment first, then the config file.
pub fn resolve_tenant(explicit_path: Option<&Path>, requested: Option<&str>) -> Result<Tenant, ConfigError> {
    if let Some(t) = Tenant::from_env(|k| std::env::var(k).ok()) {
        return Ok(t);
    }
    let path = config_path(explicit_path)?;
    let cfg = CliConfig::load(&path)?;
    let tenant = cfg.tenant(requested, &path)?;
    tracing::debug!(tenant = %tenant.domain, config = %path.display(), "resolved tenant");
    Ok(tenant)
}
