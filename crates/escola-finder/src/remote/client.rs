use super::parser::parse_payload;
use super::query::SearchQuery;
use crate::config::UpstreamConfig;
use crate::search::SchoolRecord;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Failure of one fetch cycle. None of these are fatal to the application.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("school API endpoint '{endpoint}' is not a valid URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("could not reach the school API: {0}")]
    Network(String),
    #[error("school API did not answer within {0:?}")]
    Timeout(Duration),
    #[error("school API answered {status}: {message}")]
    Server { status: u16, message: String },
    #[error("school API returned an unreadable body: {0}")]
    MalformedBody(String),
}

impl FetchError {
    pub const GENERIC_SERVER_MESSAGE: &'static str = "Erro ao buscar dados das escolas";

    /// Banner text for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => {
                "Erro ao carregar dados das escolas. Verifique sua conexão e tente novamente."
                    .to_string()
            }
            FetchError::Server { message, .. } => message.clone(),
            FetchError::MalformedBody(_) => {
                "O servidor de escolas enviou uma resposta inválida. Tente novamente.".to_string()
            }
            FetchError::InvalidEndpoint { .. } => {
                "O endereço do servidor de escolas está mal configurado.".to_string()
            }
        }
    }
}

/// Anything able to answer a scoped school search.
pub trait SchoolSource: Send + Sync {
    fn fetch(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<SchoolRecord>, FetchError>> + Send;
}

/// Decodes a successful response body, e.g. one saved to disk.
pub fn decode_schools(body: &[u8]) -> Result<Vec<SchoolRecord>, FetchError> {
    parse_payload(body).map_err(|err| FetchError::MalformedBody(err.to_string()))
}

/// reqwest-backed source for `GET {base}/api/schools`.
#[derive(Debug, Clone)]
pub struct HttpSchoolSource {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpSchoolSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let endpoint_raw = config.schools_url();
        let endpoint = Url::parse(&endpoint_raw).map_err(|err| FetchError::InvalidEndpoint {
            endpoint: endpoint_raw.clone(),
            reason: err.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl SchoolSource for HttpSchoolSource {
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<SchoolRecord>, FetchError> {
        let url = query.apply_to(&self.endpoint);
        debug!(%url, "requesting schools");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
                message: server_message(status, &body),
            });
        }

        let records = decode_schools(&body)?;
        info!(status = status.as_u16(), count = records.len(), "schools received");
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "Message", alias = "error", alias = "mensagem")]
    message: Option<String>,
}

fn server_message(status: StatusCode, body: &[u8]) -> String {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());

    match message {
        Some(message) => message,
        None => {
            debug!(status = status.as_u16(), "error response without message");
            FetchError::GENERIC_SERVER_MESSAGE.to_string()
        }
    }
}
