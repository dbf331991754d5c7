use super::{Error, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const KEY_PREFIX: &str = "AWS4";
const SCOPE_TERMINATOR: &str = "aws4_request";

/// Region, service and time a signature is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    region: String,
    service: String,
    time: DateTime<Utc>,
}

impl SigningContext {
    pub fn new(region: impl Into<String>, service: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            time,
        }
    }

    /// `YYYYMMDD`
    pub fn date_stamp(&self) -> String {
        self.time.format("%Y%m%d").to_string()
    }

    /// `YYYYMMDDTHHMMSSZ`, truncated to the second.
    pub fn amz_date(&self) -> String {
        self.time.format("%Y%m%dT%H%M%SZ").to_string()
    }

    /// `<date>/<region>/<service>/aws4_request`
    pub fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/{SCOPE_TERMINATOR}",
            self.date_stamp(),
            self.region,
            self.service
        )
    }
}

/// The `kSigning` key derived from a secret access key for one signing context.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    pub fn derive(secret_access_key: &str, context: &SigningContext) -> Result<Self> {
        let k_secret = format!("{KEY_PREFIX}{secret_access_key}");
        let k_date = hmac_sha256(k_secret.as_bytes(), context.date_stamp().as_bytes())?;
        let k_region = hmac_sha256(&k_date, context.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, context.service.as_bytes())?;
        let k_signing = hmac_sha256(&k_service, SCOPE_TERMINATOR.as_bytes())?;
        Ok(Self(k_signing))
    }

    /// Lowercase hex HMAC-SHA256 of `value` under this key.
    pub fn sign(&self, value: &str) -> Result<String> {
        Ok(hex::encode(hmac_sha256(&self.0, value.as_bytes())?))
    }
}

impl AsRef<[u8]> for SigningKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey")
    }
}

fn hmac_sha256(key: &[u8], value: &[u8]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| Error::InvalidKeyLength)?;
    mac.update(value);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(Sha256::digest(value))
}
