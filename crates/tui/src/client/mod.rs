use api_types::transaction::{Transaction, TransactionDraft, TransactionId};
use reqwest::{Response, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Remote collection of transactions.
///
/// Every call either yields the canonical server state or fails without
/// side effects on the caller.
pub trait TransactionService {
    fn list(&self) -> impl Future<Output = std::result::Result<Vec<Transaction>, ClientError>>;

    fn create(
        &self,
        draft: &TransactionDraft,
    ) -> impl Future<Output = std::result::Result<Transaction, ClientError>>;

    fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
    ) -> impl Future<Output = std::result::Result<Transaction, ClientError>>;

    fn delete(&self, id: &TransactionId)
    -> impl Future<Output = std::result::Result<(), ClientError>>;
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    title: Option<String>,
    detail: Option<String>,
}

impl ErrorResponse {
    fn message(self) -> Option<String> {
        self.error.or(self.detail).or(self.title)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, endpoint_path: &str) -> Result<Self> {
        Self::with_http(base_url, endpoint_path, reqwest::Client::new())
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self::with_http(&config.base_url, &config.endpoint_path, builder.build()?)
    }

    fn with_http(base_url: &str, endpoint_path: &str, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url
            .join(endpoint_path.trim_start_matches('/'))
            .map_err(|err| AppError::Terminal(format!("invalid endpoint_path: {err}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(AppError::Terminal(format!(
                "endpoint {endpoint} cannot carry an id segment"
            )));
        }
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{endpoint}/{id}`, with the id percent-encoded as one segment.
    pub fn item_url(&self, id: &TransactionId) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }
}

impl TransactionService for Client {
    async fn list(&self) -> std::result::Result<Vec<Transaction>, ClientError> {
        let res = self.http.get(self.endpoint.clone()).send().await?;
        decode(check(res).await?).await
    }

    async fn create(
        &self,
        draft: &TransactionDraft,
    ) -> std::result::Result<Transaction, ClientError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(draft)
            .send()
            .await?;
        decode(check(res).await?).await
    }

    async fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
    ) -> std::result::Result<Transaction, ClientError> {
        let res = self.http.put(self.item_url(id)).json(draft).send().await?;
        decode(check(res).await?).await
    }

    async fn delete(&self, id: &TransactionId) -> std::result::Result<(), ClientError> {
        let res = self.http.delete(self.item_url(id)).send().await?;
        check(res).await?;
        Ok(())
    }
}

/// Passes 2xx responses through; maps everything else onto [`ClientError`].
async fn check(res: Response) -> std::result::Result<Response, ClientError> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::message)
        .unwrap_or_else(|| status.to_string());

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}

async fn decode<T>(res: Response) -> std::result::Result<T, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}
