use std::fmt;
use std::str::FromStr;

/// Management API resources the CLI knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Apis,
    Connections,
    CustomDomains,
    Branding,
    NetworkAcls,
    BotDetection,
    BreachedPasswordDetection,
    BruteForceProtection,
    SuspiciousIpThrottling,
    TenantSettings,
    TokenExchangeProfiles,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Apis,
        Resource::Connections,
        Resource::CustomDomains,
        Resource::Branding,
        Resource::NetworkAcls,
        Resource::BotDetection,
        Resource::BreachedPasswordDetection,
        Resource::BruteForceProtection,
        Resource::SuspiciousIpThrottling,
        Resource::TenantSettings,
        Resource::TokenExchangeProfiles,
        Resource::Users,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Resource::Apis => "apis",
            Resource::Connections => "connections",
            Resource::CustomDomains => "custom-domains",
            Resource::Branding => "branding",
            Resource::NetworkAcls => "network-acls",
            Resource::BotDetection => "bot-detection",
            Resource::BreachedPasswordDetection => "breached-password-detection",
            Resource::BruteForceProtection => "brute-force-protection",
            Resource::SuspiciousIpThrottling => "suspicious-ip-throttling",
            Resource::TenantSettings => "tenant-settings",
            Resource::TokenExchangeProfiles => "token-exchange-profiles",
            Resource::Users => "users",
        }
    }

    /// Path relative to `/api/v2/`.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Apis => "resource-servers",
            Resource::Connections => "connections",
            Resource::CustomDomains => "custom-domains",
            Resource::Branding => "branding",
            Resource::NetworkAcls => "network-acls",
            Resource::BotDetection => "attack-protection/bot-detection",
            Resource::BreachedPasswordDetection => "attack-protection/breached-password-detection",
            Resource::BruteForceProtection => "attack-protection/brute-force-protection",
            Resource::SuspiciousIpThrottling => "attack-protection/suspicious-ip-throttling",
            Resource::TenantSettings => "tenants/settings",
            Resource::TokenExchangeProfiles => "token-exchange-profiles",
            Resource::Users => "users",
        }
    }

    /// Collections hold items addressable by id; the rest are tenant-wide singletons.
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            Resource::Apis
                | Resource::Connections
                | Resource::CustomDomains
                | Resource::NetworkAcls
                | Resource::TokenExchangeProfiles
                | Resource::Users
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Resource::ALL.iter().map(|r| r.name()).collect();
                format!("unknown resource '{s}', expected one of: {}", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for r in Resource::ALL {
            assert_eq!(r.name().parse::<Resource>().unwrap(), r);
        }
    }

    #[test]
    fn apis_live_under_resource_servers() {
        assert_eq!(Resource::Apis.path(), "resource-servers");
        assert_eq!(Resource::TenantSettings.path(), "tenants/settings");
        assert!(!Resource::TenantSettings.is_collection());
    }

    #[test]
    fn unknown_resource_lists_choices() {
        let err = "rules".parse::<Resource>().unwrap_err();
        assert!(err.contains("custom-domains"));
    }
}
