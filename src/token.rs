use crate::presign::PresignedUrl;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

pub const TOKEN_PREFIX: &str = "k8s-aws-v1.";

/// Bearer token understood by the EKS authenticator: a versioned prefix
/// followed by the unpadded base64url encoding of a presigned STS URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn encode(url: &PresignedUrl) -> Self {
        Self(format!(
            "{TOKEN_PREFIX}{}",
            URL_SAFE_NO_PAD.encode(url.as_str().as_bytes())
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
