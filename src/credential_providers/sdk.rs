use super::transport::InsecureHttpClient;
use super::{ProvideCredentials, ProvideCredentialsInput, ResolvedCredentials};
use crate::config::TransportSecurity;
use aws_config::sts::AssumeRoleProvider;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::ProvideCredentials as _;
use log::{debug, warn};

/// Resolves credentials through the standard AWS chain (environment, shared
/// profiles, web identity, container and instance metadata), optionally
/// assuming a role on top of it.
#[derive(Debug, Default)]
pub struct SdkCredentialProvider;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no AWS region configured, pass --region or set AWS_REGION")]
    MissingRegion,
    #[error("no AWS credentials provider configured")]
    MissingCredentialsProvider,
    #[error("failed to resolve AWS credentials: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("failed to build credentials transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProvideCredentials for SdkCredentialProvider {
    type Error = Error;

    async fn provide_credentials(
        self,
        input: &ProvideCredentialsInput,
    ) -> Result<ResolvedCredentials, Self::Error> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &input.region {
            loader = loader.region(region.clone());
        }
        if input.transport == TransportSecurity::InsecureSkipVerify {
            warn!("TLS certificate verification is disabled while resolving credentials");
            loader = loader.http_client(InsecureHttpClient::new()?);
        }

        let sdk_config = loader.load().await;
        let region = sdk_config.region().cloned().ok_or(Error::MissingRegion)?;

        let credentials = match &input.role {
            Some(role) => {
                debug!("assuming role {} as {}", role.arn, role.session_name);
                let provider = AssumeRoleProvider::builder(&role.arn)
                    .session_name(&role.session_name)
                    .configure(&sdk_config)
                    .build()
                    .await;
                provider.provide_credentials().await?
            }
            None => {
                let provider = sdk_config
                    .credentials_provider()
                    .ok_or(Error::MissingCredentialsProvider)?;
                provider.provide_credentials().await?
            }
        };
        debug!(
            "resolved credentials for {} in {region}",
            credentials.access_key_id()
        );

        Ok(ResolvedCredentials {
            credentials,
            region,
        })
    }
}
