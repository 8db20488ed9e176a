//! Resolves the producing service and group from a CloudWatch log-group path.

use super::named_groups::extract_named_groups;
use super::regex_patterns::{PATTERNS, pattern_name};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Services recognised by the `/aws/{service}/{group}` log-group convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Lambda,
    ApiGateway,
    Rds,
    Eks,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Lambda => "lambda",
            Service::ApiGateway => "apigateway",
            Service::Rds => "rds",
            Service::Eks => "eks",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lambda" => Ok(Service::Lambda),
            "apigateway" => Ok(Service::ApiGateway),
            "rds" => Ok(Service::Rds),
            "eks" => Ok(Service::Eks),
            other => Err(format!("unknown service '{other}'")),
        }
    }
}

/// Service and group derived once per batch from its log group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub service: Option<Service>,
    pub group: String,
}

impl ServiceIdentity {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn resolved(&self) -> bool {
        self.service.is_some()
    }

    /// The service name, or an empty string when unresolved.
    pub fn service_name(&self) -> &'static str {
        self.service.map(|s| s.as_str()).unwrap_or("")
    }

    /// Parse a log-group path such as `/aws/lambda/my-function`.
    ///
    /// The group is everything after the service segment and may itself
    /// contain slashes.
    pub fn from_log_group(log_group: &str) -> Self {
        let Ok(regex) = PATTERNS.get_by_name(pattern_name::SERVICE_GROUP) else {
            return Self::unresolved();
        };
        let Ok(groups) = extract_named_groups(regex, pattern_name::SERVICE_GROUP, log_group) else {
            return Self::unresolved();
        };

        match groups.get("service").map(|s| s.parse::<Service>()) {
            Some(Ok(service)) => Self {
                service: Some(service),
                group: groups.get("group").cloned().unwrap_or_default(),
            },
            _ => Self::unresolved(),
        }
    }
}
