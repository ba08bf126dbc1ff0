use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::client::{
    AuthHeader, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, Sms1IrError,
};
use crate::domain::{
    ApiKey, DateRange, Envelope, LineNumber, MessageText, Page, Recipient, SendOptions, TemplateId,
    ValidationError, VerifyParameter,
};
use crate::transport;

const DEFAULT_BASE_URL: &str = "https://api.sms.ir/v1";

#[derive(Debug, Clone)]
/// Builder for [`SmsIrClient`].
pub struct SmsIrClientBuilder {
    api_key: ApiKey,
    line_number: LineNumber,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmsIrClientBuilder {
    /// Create a builder with the default base URL.
    pub fn new(api_key: ApiKey, line_number: LineNumber) -> Self {
        Self {
            api_key,
            line_number,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the gateway base URL (no trailing slash).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SmsIrClient`].
    pub fn build(self) -> Result<SmsIrClient, Sms1IrError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| Sms1IrError::Transport(Box::new(err)))?;

        Ok(SmsIrClient {
            api_key: self.api_key,
            line_number: self.line_number,
            base_url: self.base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Client for the SMS.ir v1 report/query gateway (`https://api.sms.ir/v1`).
///
/// Authenticates with a raw `X-API-KEY` header. Every operation is a single
/// round trip returning the normalized [`Envelope`]; there is no retry or
/// fan-out at this layer. GET parameters travel in the query string.
pub struct SmsIrClient {
    api_key: ApiKey,
    line_number: LineNumber,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl SmsIrClient {
    /// Create a client using the default base URL.
    pub fn new(api_key: ApiKey, line_number: LineNumber) -> Self {
        Self {
            api_key,
            line_number,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey, line_number: LineNumber) -> SmsIrClientBuilder {
        SmsIrClientBuilder::new(api_key, line_number)
    }

    /// Read `API_KEY` and `LINE_NUMBER` from the environment.
    pub fn from_env() -> Result<Self, Sms1IrError> {
        let api_key = std::env::var("API_KEY")
            .map_err(|_| ValidationError::MissingEnvVar { var: "API_KEY" })?;
        let line_number = std::env::var("LINE_NUMBER")
            .map_err(|_| ValidationError::MissingEnvVar { var: "LINE_NUMBER" })?;
        Ok(Self::new(
            ApiKey::new(api_key)?,
            LineNumber::parse(&line_number)?,
        ))
    }

    /// Send one message to one recipient (a one-element bulk batch).
    pub async fn send(
        &self,
        message: &MessageText,
        mobile: &Recipient,
        options: &SendOptions,
    ) -> Result<Envelope, Sms1IrError> {
        self.send_bulk(message, std::slice::from_ref(mobile), options)
            .await
    }

    /// Send one message to many recipients in one gateway batch.
    pub async fn send_bulk(
        &self,
        message: &MessageText,
        mobiles: &[Recipient],
        options: &SendOptions,
    ) -> Result<Envelope, Sms1IrError> {
        let line = options.line_number.as_ref().unwrap_or(&self.line_number);
        let body = transport::encode_bulk_body(line, message, mobiles, options.send_at);
        self.call(
            transport::SEND_BULK_ENDPOINT.to_owned(),
            HttpMethod::Post,
            &[],
            Some(body),
        )
        .await
    }

    /// Send a distinct message to each recipient in one gateway batch.
    ///
    /// `messages[i]` goes to `mobiles[i]`; the two slices must be the same
    /// length.
    pub async fn send_like_to_like(
        &self,
        messages: &[MessageText],
        mobiles: &[Recipient],
        options: &SendOptions,
    ) -> Result<Envelope, Sms1IrError> {
        if messages.len() != mobiles.len() {
            return Err(ValidationError::MismatchedRecipients {
                messages: messages.len(),
                mobiles: mobiles.len(),
            }
            .into());
        }
        let line = options.line_number.as_ref().unwrap_or(&self.line_number);
        let body = transport::encode_like_to_like_body(line, messages, mobiles, options.send_at);
        self.call(
            transport::SEND_LIKE_TO_LIKE_ENDPOINT.to_owned(),
            HttpMethod::Post,
            &[],
            Some(body),
        )
        .await
    }

    /// Cancel a scheduled batch.
    pub async fn delete_scheduled(&self, pack_id: u64) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::scheduled_pack_path(pack_id),
            HttpMethod::Delete,
            &[],
            None,
        )
        .await
    }

    /// Send a verification code through a server-stored template.
    pub async fn send_verify_code(
        &self,
        mobile: &Recipient,
        template_id: TemplateId,
        parameters: &[VerifyParameter],
    ) -> Result<Envelope, Sms1IrError> {
        let body = transport::encode_verify_body(mobile, template_id, parameters);
        self.call(
            transport::SEND_VERIFY_ENDPOINT.to_owned(),
            HttpMethod::Post,
            &[],
            Some(body),
        )
        .await
    }

    /// Report one sent message by id.
    pub async fn report_message(&self, message_id: u64) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::message_report_path(message_id),
            HttpMethod::Get,
            &[],
            None,
        )
        .await
    }

    /// Report one sent batch by id.
    pub async fn report_pack(&self, pack_id: u64) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::pack_report_path(pack_id),
            HttpMethod::Get,
            &[],
            None,
        )
        .await
    }

    /// List today's sent batches.
    pub async fn report_today_packs(&self, page: Page) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::SEND_PACKS_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &transport::page_query(page),
            None,
        )
        .await
    }

    /// List today's sent messages.
    pub async fn report_today(&self, page: Page) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::SEND_LIVE_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &transport::page_query(page),
            None,
        )
        .await
    }

    /// List archived sent messages, optionally bounded by a date range.
    pub async fn report_archived(
        &self,
        range: DateRange,
        page: Page,
    ) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::SEND_ARCHIVE_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &transport::archive_query(range, page),
            None,
        )
        .await
    }

    /// List the latest received messages.
    pub async fn receive_latest(&self, count: u32) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::RECEIVE_LATEST_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &transport::count_query(count),
            None,
        )
        .await
    }

    /// List today's received messages.
    pub async fn receive_today(&self, page: Page) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::RECEIVE_LIVE_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &transport::page_query(page),
            None,
        )
        .await
    }

    /// List archived received messages, optionally bounded by a date range.
    pub async fn receive_archived(
        &self,
        range: DateRange,
        page: Page,
    ) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::RECEIVE_ARCHIVE_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &transport::archive_query(range, page),
            None,
        )
        .await
    }

    /// The account's remaining credit balance.
    pub async fn credit(&self) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::CREDIT_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &[],
            None,
        )
        .await
    }

    /// The account's available line numbers.
    pub async fn line_numbers(&self) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::LINE_ENDPOINT.to_owned(),
            HttpMethod::Get,
            &[],
            None,
        )
        .await
    }

    async fn call(
        &self,
        path: String,
        method: HttpMethod,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Envelope, Sms1IrError> {
        let mut url =
            Url::parse(&format!("{}/{}", self.base_url, path)).map_err(Sms1IrError::Url)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let response = self
            .http
            .execute(HttpRequest {
                url: url.into(),
                method,
                auth: AuthHeader::ApiKey(self.api_key.as_str().to_owned()),
                body,
            })
            .await
            .map_err(Sms1IrError::Transport)?;
        debug!(status = response.status, endpoint = %path, "gateway response");

        transport::decode_envelope(response.status, response.content_type.as_deref(), &response.body)
            .map_err(|err| Sms1IrError::InvalidResponse(Box::new(err)))
    }
}
