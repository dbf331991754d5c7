use crate::config::TokenConfig;
use crate::credential_providers::{
    provide_credentials, ProvideCredentials, ProvideCredentialsInput,
};
use crate::presign;
use crate::token::Token;
use crate::types::K8sExecCredentials;
use chrono::Utc;
use log::debug;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum Error<PE>
where
    PE: std::error::Error + 'static,
{
    #[error("Error generating AWS auth credentials: {0}")]
    Provider(#[source] PE),
    #[error("Eks auth signing error: {0}")]
    EksRequestSign(#[from] presign::Error),
    #[error("Invalid credential json: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Failed to write credentials: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<PE> = std::result::Result<(), Error<PE>>;

/// Resolves credentials, presigns the identity check for the configured
/// cluster and writes the resulting `ExecCredential` as a single JSON line.
/// Nothing is written unless every step succeeds.
pub async fn exec_eks<P, W>(
    credential_provider: P,
    config: &TokenConfig,
    out: &mut W,
) -> Result<P::Error>
where
    P: ProvideCredentials,
    W: Write,
{
    let provider_inputs = ProvideCredentialsInput::from(config);
    let resolved = provide_credentials(credential_provider, &provider_inputs)
        .await
        .map_err(Error::Provider)?;

    debug!(
        "presigning token for cluster {} in {}",
        config.cluster_id, resolved.region
    );
    let url = presign::presign(
        &resolved.credentials,
        &resolved.region,
        &config.cluster_id,
        Utc::now(),
    )?;

    let exec_creds = K8sExecCredentials::from(Token::encode(&url)).to_json()?;
    writeln!(out, "{exec_creds}")?;

    Ok(())
}
