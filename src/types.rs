use crate::token::Token;
use serde::{Deserialize, Serialize};

pub const EXEC_CREDENTIALS_KIND: &str = "ExecCredential";
pub const EXEC_CREDENTIALS_API_VERSION: &str = "client.authentication.k8s.io/v1beta1";

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct K8sExecCredentialsStatus {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct K8sExecCredentials {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub status: K8sExecCredentialsStatus,
}

impl K8sExecCredentials {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Token> for K8sExecCredentials {
    fn from(token: Token) -> Self {
        Self {
            api_version: EXEC_CREDENTIALS_API_VERSION.to_string(),
            kind: EXEC_CREDENTIALS_KIND.to_string(),
            status: K8sExecCredentialsStatus {
                token: token.into_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presign::PresignedUrl;

    #[test]
    fn serializes_exec_credential_envelope() {
        let token = Token::encode(&PresignedUrl::from("https://example.com/"));
        let creds = K8sExecCredentials::from(token);
        assert_eq!(
            creds.to_json().unwrap(),
            r#"{"apiVersion":"client.authentication.k8s.io/v1beta1","kind":"ExecCredential","status":{"token":"k8s-aws-v1.aHR0cHM6Ly9leGFtcGxlLmNvbS8"}}"#
        );
    }
}
