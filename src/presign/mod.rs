//! Presigned STS `GetCallerIdentity` requests bound to an EKS cluster.
//!
//! Building a token URL is split in two: [`augment`] adds the expiry and the
//! cluster id header to a plain request, and [`sign`] canonicalizes whatever
//! it is handed. Anything added after [`sign`] is not covered by the signature.

mod canonical;
mod signing_key;

pub use signing_key::{SigningContext, SigningKey};

use crate::config::ClusterId;
use aws_config::Region;
use aws_sdk_sts::config::Credentials;
use canonical::{CanonicalHeaders, CanonicalRequest};
use chrono::{DateTime, Utc};
use http::header::{HeaderName, HeaderValue, ToStrError, HOST};
use http::uri::{PathAndQuery, Uri};
use http::{Method, Request};
use log::debug;

pub const K8S_AWS_ID_HEADER: &str = "x-k8s-aws-id";
pub const EXPIRES_IN_SECONDS: u64 = 60;

const STS_SERVICE: &str = "sts";
const STS_API_VERSION: &str = "2011-06-15";
const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const MAX_EXPIRES_IN_SECONDS: u64 = 604_800;

const X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";
const X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";
const X_AMZ_DATE: &str = "X-Amz-Date";
const X_AMZ_EXPIRES: &str = "X-Amz-Expires";
const X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";
const X_AMZ_SECURITY_TOKEN: &str = "X-Amz-Security-Token";
const X_AMZ_SIGNATURE: &str = "X-Amz-Signature";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("signing region must not be empty")]
    MissingRegion,
    #[error("request has no host to sign")]
    MissingHost,
    #[error("request must carry X-Amz-Expires before it is presigned")]
    MissingExpiry,
    #[error("invalid X-Amz-Expires value {0:?}")]
    InvalidExpiry(String),
    #[error("cluster name {0:?} is not a valid header value")]
    InvalidClusterId(String),
    #[error("header value is not printable ASCII: {0}")]
    InvalidHeader(#[from] ToStrError),
    #[error("invalid EKS auth request parameters: {0}")]
    InvalidRequest(#[from] http::Error),
    #[error("invalid signing key length")]
    InvalidKeyLength,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A fully qualified, signed STS URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl(String);

impl PresignedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PresignedUrl {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PresignedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sts_host(region: &str) -> String {
    let suffix = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("sts.{region}.{suffix}")
}

/// Unsigned `GetCallerIdentity` call against the regional STS endpoint.
pub fn identity_request(region: &Region) -> Result<Request<()>> {
    let region = region.as_ref();
    if region.is_empty() {
        return Err(Error::MissingRegion);
    }
    let uri = format!(
        "https://{host}/?Action=GetCallerIdentity&Version={STS_API_VERSION}",
        host = sts_host(region)
    );
    Ok(Request::builder().method(Method::GET).uri(uri).body(())?)
}

/// Adds the expiry parameter and the cluster id header. Both must be in place
/// before [`sign`] so they end up inside the signature.
pub fn augment(request: Request<()>, cluster_id: &ClusterId) -> Result<Request<()>> {
    let cluster_header = HeaderValue::from_str(cluster_id.as_str())
        .map_err(|_| Error::InvalidClusterId(cluster_id.to_string()))?;

    let (mut parts, body) = request.into_parts();
    let mut query = parts
        .uri
        .query()
        .map(canonical::parse_query)
        .unwrap_or_default();
    query.retain(|(key, _)| key != X_AMZ_EXPIRES);
    query.push((X_AMZ_EXPIRES.to_string(), EXPIRES_IN_SECONDS.to_string()));

    let path_and_query = format!(
        "{}?{}",
        parts.uri.path(),
        canonical::encode_query(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    );
    let mut uri_parts = parts.uri.into_parts();
    uri_parts.path_and_query =
        Some(PathAndQuery::try_from(path_and_query).map_err(http::Error::from)?);
    parts.uri = Uri::from_parts(uri_parts).map_err(http::Error::from)?;

    parts
        .headers
        .insert(HeaderName::from_static(K8S_AWS_ID_HEADER), cluster_header);

    Ok(Request::from_parts(parts, body))
}

/// SigV4 query-string presigning of `request` exactly as it stands.
///
/// Every header on the request is signed, together with `host`. The request
/// must already carry `X-Amz-Expires`.
pub fn sign(
    request: &Request<()>,
    credentials: &Credentials,
    context: &SigningContext,
) -> Result<PresignedUrl> {
    let uri = request.uri();
    let host = uri.authority().ok_or(Error::MissingHost)?.as_str();

    let (expiry, request_query): (Vec<_>, Vec<_>) = uri
        .query()
        .map(canonical::parse_query)
        .unwrap_or_default()
        .into_iter()
        .partition(|(key, _)| key == X_AMZ_EXPIRES);
    let expires = match expiry.as_slice() {
        [] => return Err(Error::MissingExpiry),
        [(_, value)] => match value.parse::<u64>() {
            Ok(secs) if (1..=MAX_EXPIRES_IN_SECONDS).contains(&secs) => value.clone(),
            _ => return Err(Error::InvalidExpiry(value.clone())),
        },
        [_, (_, value), ..] => return Err(Error::InvalidExpiry(value.clone())),
    };

    let mut headers = CanonicalHeaders::default();
    headers.insert(HOST.as_str(), host);
    for (name, value) in request.headers() {
        if *name != HOST {
            headers.insert(name.as_str(), value.to_str()?);
        }
    }

    let mut query = request_query;
    query.push((X_AMZ_ALGORITHM.to_string(), ALGORITHM.to_string()));
    query.push((
        X_AMZ_CREDENTIAL.to_string(),
        format!(
            "{}/{}",
            credentials.access_key_id(),
            context.credential_scope()
        ),
    ));
    query.push((X_AMZ_DATE.to_string(), context.amz_date()));
    query.push((X_AMZ_EXPIRES.to_string(), expires));
    query.push((X_AMZ_SIGNED_HEADERS.to_string(), headers.signed_headers()));
    if let Some(session_token) = credentials.session_token() {
        query.push((X_AMZ_SECURITY_TOKEN.to_string(), session_token.to_string()));
    }

    let payload_hash = signing_key::sha256_hex(&[]);
    let canonical_request = CanonicalRequest {
        method: request.method().as_str(),
        path: uri.path(),
        query: &query,
        headers: &headers,
        payload_hash: &payload_hash,
    }
    .to_string();
    debug!("canonical request:\n{canonical_request}");

    let string_to_sign = format!(
        "{ALGORITHM}\n{}\n{}\n{}",
        context.amz_date(),
        context.credential_scope(),
        signing_key::sha256_hex(canonical_request.as_bytes())
    );
    debug!("string to sign:\n{string_to_sign}");

    let signature =
        SigningKey::derive(credentials.secret_access_key(), context)?.sign(&string_to_sign)?;

    let signed_query = canonical::encode_query(
        query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain([(X_AMZ_SIGNATURE, signature.as_str())]),
    );

    Ok(PresignedUrl(format!(
        "{scheme}://{host}{path}?{signed_query}",
        scheme = uri.scheme_str().unwrap_or("https"),
        path = uri.path(),
    )))
}

/// Builds, augments and signs the identity check for `cluster_id`.
pub fn presign(
    credentials: &Credentials,
    region: &Region,
    cluster_id: &ClusterId,
    time: DateTime<Utc>,
) -> Result<PresignedUrl> {
    let request = augment(identity_request(region)?, cluster_id)?;
    sign(
        &request,
        credentials,
        &SigningContext::new(region.as_ref(), STS_SERVICE, time),
    )
}
