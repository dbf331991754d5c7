pub mod sdk;
mod transport;

use crate::config::{RoleConfig, TokenConfig, TransportSecurity};
use aws_config::Region;
use aws_sdk_sts::config::Credentials;

pub struct ProvideCredentialsInput {
    pub region: Option<Region>,
    pub role: Option<RoleConfig>,
    pub transport: TransportSecurity,
}

impl From<&TokenConfig> for ProvideCredentialsInput {
    fn from(config: &TokenConfig) -> Self {
        Self {
            region: config.region.clone(),
            role: config.role.clone(),
            transport: config.transport,
        }
    }
}

/// Credentials together with the region they should be used in.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub credentials: Credentials,
    pub region: Region,
}

pub trait ProvideCredentials {
    type Error: std::error::Error + Sync + Send + 'static;
    async fn provide_credentials(
        self,
        input: &ProvideCredentialsInput,
    ) -> Result<ResolvedCredentials, Self::Error>;
}

pub async fn provide_credentials<T: ProvideCredentials>(
    provider: T,
    input: &ProvideCredentialsInput,
) -> Result<ResolvedCredentials, T::Error> {
    provider.provide_credentials(input).await
}
