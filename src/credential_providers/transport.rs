use aws_smithy_runtime_api::client::http::{
    HttpClient, HttpConnector, HttpConnectorFuture, HttpConnectorSettings, SharedHttpConnector,
};
use aws_smithy_runtime_api::client::orchestrator::{HttpRequest, HttpResponse};
use aws_smithy_runtime_api::client::result::ConnectorError;
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;

/// HTTP client for the AWS SDK that accepts any server certificate.
/// Only installed for `--insecure-skip-tls-verify`.
#[derive(Debug, Clone)]
pub struct InsecureHttpClient {
    client: reqwest::Client,
}

impl InsecureHttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for InsecureHttpClient {
    fn http_connector(
        &self,
        _settings: &HttpConnectorSettings,
        _components: &RuntimeComponents,
    ) -> SharedHttpConnector {
        SharedHttpConnector::new(self.clone())
    }
}

impl HttpConnector for InsecureHttpClient {
    fn call(&self, request: HttpRequest) -> HttpConnectorFuture {
        let client = self.client.clone();
        HttpConnectorFuture::new(async move { send(client, request).await })
    }
}

async fn send(
    client: reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, ConnectorError> {
    let method = reqwest::Method::from_bytes(request.method().as_bytes())
        .map_err(|err| ConnectorError::user(err.into()))?;

    let mut builder = client.request(method, request.uri());
    for (name, value) in request.headers() {
        builder = builder.header(name, value);
    }
    let body = request
        .body()
        .bytes()
        .map(<[u8]>::to_vec)
        .unwrap_or_default();

    let response = builder
        .body(body)
        .send()
        .await
        .map_err(|err| ConnectorError::io(err.into()))?;

    let status = StatusCode::try_from(response.status().as_u16())
        .map_err(|err| ConnectorError::other(err.into(), None))?;
    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ConnectorError::io(err.into()))?;

    let mut http_response = HttpResponse::new(status, SdkBody::from(bytes));
    for (name, value) in headers {
        http_response
            .headers_mut()
            .try_insert(name, value)
            .map_err(|err| ConnectorError::other(err.into(), None))?;
    }
    Ok(http_response)
}
