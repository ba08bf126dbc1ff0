//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod query;
mod send;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use crate::domain::{ApiKey, Recipient, ValidationError};

pub use query::{SmsIrClient, SmsIrClientBuilder};
pub use send::{Sms1IrClient, Sms1IrClientBuilder, VerificationRoute};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AuthHeader {
    /// `Authorization: Bearer <token>` (SMS1.ir).
    Bearer(String),
    /// `X-API-KEY: <key>` (SMS.ir v1).
    ApiKey(String),
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub auth: AuthHeader,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
                HttpMethod::Delete => self.client.delete(&request.url),
            };
            builder = builder
                .header(reqwest::header::ACCEPT, "application/json")
                .header(reqwest::header::CONTENT_TYPE, "application/json");
            builder = match &request.auth {
                AuthHeader::Bearer(token) => builder.bearer_auth(token),
                AuthHeader::ApiKey(key) => builder.header("X-API-KEY", key),
            };
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

#[derive(Debug, Clone)]
/// API keys for the SMS1.ir gateway.
///
/// The gateway issues separate keys for plain sends and for templated
/// ("pattern") sends; a client holds one of each and selects per call. Both
/// are immutable once the client is constructed.
pub struct ApiKeys {
    plain: ApiKey,
    pattern: Option<ApiKey>,
}

impl ApiKeys {
    /// Keys for an account with no pattern credential.
    pub fn new(plain: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            plain: ApiKey::new(plain)?,
            pattern: None,
        })
    }

    /// Keys for an account with both credentials.
    pub fn with_pattern(
        plain: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            plain: ApiKey::new(plain)?,
            pattern: Some(ApiKey::new(pattern)?),
        })
    }

    /// Read keys from `API_KEY_WITHOUT_PATTERN` and (optionally)
    /// `API_KEY_WITH_PATTERN`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let plain = std::env::var("API_KEY_WITHOUT_PATTERN").map_err(|_| {
            ValidationError::MissingEnvVar {
                var: "API_KEY_WITHOUT_PATTERN",
            }
        })?;
        let pattern = std::env::var("API_KEY_WITH_PATTERN").ok();
        match pattern {
            Some(pattern) => Self::with_pattern(plain, pattern),
            None => Self::new(plain),
        }
    }

    /// Select the credential for a call.
    ///
    /// When the pattern key is requested but not configured, an empty bearer
    /// token is presented and the gateway rejects the call as unauthorized.
    /// That mirrors the gateway vendor's reference client; failing fast here
    /// would change observable behavior, so the gap is only logged.
    pub(crate) fn select(&self, use_pattern: bool) -> AuthHeader {
        if !use_pattern {
            return AuthHeader::Bearer(self.plain.as_str().to_owned());
        }
        match &self.pattern {
            Some(key) => AuthHeader::Bearer(key.as_str().to_owned()),
            None => {
                tracing::warn!("pattern API key not configured; presenting an empty bearer token");
                AuthHeader::Bearer(String::new())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`Sms1IrClient`] and [`SmsIrClient`].
///
/// Gateway-reported failures (a non-2xx HTTP status or an error field in the
/// parsed body) are **not** errors at this layer: they come back inside the
/// [`Envelope`](crate::domain::Envelope) for the caller to interpret. The
/// variants below all carry their underlying cause as a chained source.
pub enum Sms1IrError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway returned a body that is not valid JSON where JSON was
    /// expected.
    #[error("invalid JSON response from server")]
    InvalidResponse(#[source] Box<dyn StdError + Send + Sync>),

    /// A single-recipient send failed, immediately or after exhausting
    /// retries.
    #[error("failed to send SMS to {recipient} after {attempts} attempt(s)")]
    SendFailed {
        recipient: Recipient,
        attempts: u32,
        #[source]
        source: Box<Sms1IrError>,
    },

    /// At least one recipient of a fan-out failed; the whole bulk operation
    /// is reported as failed.
    #[error("failed to send bulk SMS: recipient {recipient} failed")]
    BulkSendFailed {
        recipient: Recipient,
        #[source]
        source: Box<Sms1IrError>,
    },

    /// The verification-code path failed.
    #[error("failed to send verification code")]
    VerificationSendFailed(#[source] Box<Sms1IrError>),

    /// The configured base URL and endpoint suffix do not form a valid URL.
    #[error("invalid request URL: {0}")]
    Url(#[source] url::ParseError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}
