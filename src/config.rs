use crate::cmd::Cli;
use aws_config::Region;

pub const DEFAULT_SESSION_NAME: &str = "eks-auth";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("cluster name must not be empty")]
    MissingClusterId,
}

/// Name of the EKS cluster the token is bound to. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterId(String);

impl ClusterId {
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::MissingClusterId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ClusterId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub arn: String,
    pub session_name: String,
}

/// TLS policy for the transport used while resolving credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportSecurity {
    #[default]
    Verified,
    InsecureSkipVerify,
}

/// Settings for a single token invocation. Built once from the command line
/// and only ever borrowed afterwards.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub cluster_id: ClusterId,
    pub region: Option<Region>,
    pub role: Option<RoleConfig>,
    pub transport: TransportSecurity,
}

impl From<Cli> for TokenConfig {
    fn from(cli: Cli) -> Self {
        let session_name = cli
            .session_name
            .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string());
        Self {
            cluster_id: cli.cluster_name,
            region: cli.region.map(Region::new),
            role: cli.role.map(|arn| RoleConfig { arn, session_name }),
            transport: if cli.insecure_skip_tls_verify {
                TransportSecurity::InsecureSkipVerify
            } else {
                TransportSecurity::Verified
            },
        }
    }
}
