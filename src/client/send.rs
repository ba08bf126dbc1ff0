use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::client::{
    ApiKeys, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, Sms1IrError,
};
use crate::domain::{Envelope, MessageText, Recipient, TemplateId};
use crate::transport;

const DEFAULT_BASE_URL: &str = "https://app.sms1.ir:7001/api/service/";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How [`Sms1IrClient::send_verification_code`] reaches the gateway.
///
/// The templated route is the default: pattern templates are pre-approved by
/// the gateway's anti-spam filter, so plain-text OTP messages are more likely
/// to be rejected. The plain route (a retrying `send`) is kept as an option
/// for accounts without a pattern credential.
pub enum VerificationRoute {
    #[default]
    Pattern,
    PlainWithRetry,
}

#[derive(Debug, Clone)]
/// Builder for [`Sms1IrClient`].
///
/// Use this when you need to customize the base URL, retry policy, timeout,
/// or verification route.
pub struct Sms1IrClientBuilder {
    keys: ApiKeys,
    base_url: String,
    max_retries: u32,
    retry_interval: Duration,
    verification_route: VerificationRoute,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Sms1IrClientBuilder {
    /// Create a builder with the default base URL and retry policy.
    pub fn new(keys: ApiKeys) -> Self {
        Self {
            keys,
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            verification_route: VerificationRoute::default(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the gateway base URL. Endpoint suffixes are appended to it
    /// verbatim, so the value should end with `/`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of additional attempts the retrying send path makes after the
    /// first failure (default 3).
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fixed delay between retry attempts (default 1000 ms).
    pub fn retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Route used by [`Sms1IrClient::send_verification_code`].
    pub fn verification_route(mut self, route: VerificationRoute) -> Self {
        self.verification_route = route;
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

    /// Build a [`Sms1IrClient`].
    pub fn build(self) -> Result<Sms1IrClient, Sms1IrError> {
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

        Ok(Sms1IrClient {
            keys: self.keys,
            base_url: self.base_url,
            max_retries: self.max_retries,
            retry_interval: self.retry_interval,
            verification_route: self.verification_route,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Client for the SMS1.ir send gateway (`https://app.sms1.ir:7001/api/service/`).
///
/// Authenticates with bearer tokens: the plain key for `send`, the pattern
/// key for `patternSend`. All responses are normalized into an
/// [`Envelope`]; a non-2xx gateway status comes back inside the envelope
/// rather than as an error.
pub struct Sms1IrClient {
    keys: ApiKeys,
    base_url: String,
    max_retries: u32,
    retry_interval: Duration,
    verification_route: VerificationRoute,
    http: Arc<dyn HttpTransport>,
}

impl Sms1IrClient {
    /// Create a client using the default base URL and retry policy.
    ///
    /// For more customization, use [`Sms1IrClient::builder`].
    pub fn new(keys: ApiKeys) -> Self {
        Self {
            keys,
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            verification_route: VerificationRoute::default(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(keys: ApiKeys) -> Sms1IrClientBuilder {
        Sms1IrClientBuilder::new(keys)
    }

    /// Send one message to one recipient.
    ///
    /// Errors are reported as [`Sms1IrError::SendFailed`] with the transport
    /// or parse failure chained as the cause.
    pub async fn send(
        &self,
        message: &MessageText,
        recipient: &Recipient,
    ) -> Result<Envelope, Sms1IrError> {
        self.send_once(message, recipient)
            .await
            .map_err(|source| Sms1IrError::SendFailed {
                recipient: recipient.clone(),
                attempts: 1,
                source: Box::new(source),
            })
    }

    /// Send one message to many recipients concurrently, all-or-nothing.
    ///
    /// Every recipient gets its own `send` call; the calls run concurrently
    /// and the returned envelopes line up positionally with `recipients`
    /// regardless of completion order. If any recipient fails the whole
    /// operation fails with [`Sms1IrError::BulkSendFailed`] naming that
    /// recipient; use [`Sms1IrClient::bulk_send_partial`] when discarding the
    /// successful sends is not acceptable.
    pub async fn bulk_send(
        &self,
        message: &MessageText,
        recipients: &[Recipient],
    ) -> Result<Vec<Envelope>, Sms1IrError> {
        try_join_all(recipients.iter().map(|recipient| async move {
            self.send(message, recipient)
                .await
                .map_err(|source| Sms1IrError::BulkSendFailed {
                    recipient: recipient.clone(),
                    source: Box::new(source),
                })
        }))
        .await
    }

    /// Like [`Sms1IrClient::bulk_send`], but reports per-recipient outcomes
    /// positionally instead of failing the whole batch.
    pub async fn bulk_send_partial(
        &self,
        message: &MessageText,
        recipients: &[Recipient],
    ) -> Vec<Result<Envelope, Sms1IrError>> {
        join_all(
            recipients
                .iter()
                .map(|recipient| self.send(message, recipient)),
        )
        .await
    }

    /// Send a server-stored template, filled with the given variable pairs.
    ///
    /// The template body never passes through this client; the gateway
    /// renders it from `template_id` and `pairs`. Uses the pattern credential.
    pub async fn send_with_pattern(
        &self,
        template_id: TemplateId,
        recipient: &Recipient,
        pairs: &BTreeMap<String, String>,
    ) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::PATTERN_SEND_ENDPOINT,
            HttpMethod::Post,
            Some(transport::encode_pattern_body(template_id, recipient, pairs)),
            true,
        )
        .await
    }

    /// Send a verification code, routing per the configured
    /// [`VerificationRoute`].
    ///
    /// Failures are wrapped as [`Sms1IrError::VerificationSendFailed`] with
    /// the cause chained.
    pub async fn send_verification_code(
        &self,
        code: &str,
        recipient: &Recipient,
        template_id: TemplateId,
    ) -> Result<Envelope, Sms1IrError> {
        let message = format!("Your verification code is: {code}");
        debug!(
            recipient = recipient.as_str(),
            route = ?self.verification_route,
            message,
            "sending verification code"
        );

        let result = match self.verification_route {
            VerificationRoute::Pattern => {
                let mut pairs = BTreeMap::new();
                pairs.insert("otpCode".to_owned(), code.to_owned());
                self.send_with_pattern(template_id, recipient, &pairs).await
            }
            VerificationRoute::PlainWithRetry => match MessageText::new(message) {
                Ok(text) => self.send_with_retry(&text, recipient).await,
                Err(err) => Err(err.into()),
            },
        };

        result.map_err(|source| Sms1IrError::VerificationSendFailed(Box::new(source)))
    }

    /// Plain send with bounded retry: one initial attempt plus up to
    /// `max_retries` retries separated by `retry_interval`.
    async fn send_with_retry(
        &self,
        message: &MessageText,
        recipient: &Recipient,
    ) -> Result<Envelope, Sms1IrError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.send_once(message, recipient).await {
                Ok(envelope) => return Ok(envelope),
                Err(source) if attempts <= self.max_retries => {
                    warn!(
                        recipient = recipient.as_str(),
                        attempt = attempts,
                        max_retries = self.max_retries,
                        error = %source,
                        "send failed, retrying after delay"
                    );
                    sleep(self.retry_interval).await;
                }
                Err(source) => {
                    return Err(Sms1IrError::SendFailed {
                        recipient: recipient.clone(),
                        attempts,
                        source: Box::new(source),
                    });
                }
            }
        }
    }

    async fn send_once(
        &self,
        message: &MessageText,
        recipient: &Recipient,
    ) -> Result<Envelope, Sms1IrError> {
        self.call(
            transport::SEND_ENDPOINT,
            HttpMethod::Post,
            Some(transport::encode_send_body(message, recipient)),
            false,
        )
        .await
    }

    /// One authenticated round trip: base URL + suffix, selected credential,
    /// JSON body, response normalized into an [`Envelope`].
    async fn call(
        &self,
        suffix: &str,
        method: HttpMethod,
        body: Option<serde_json::Value>,
        use_pattern: bool,
    ) -> Result<Envelope, Sms1IrError> {
        let url = format!("{}{}", self.base_url, suffix);
        Url::parse(&url).map_err(Sms1IrError::Url)?;

        let response = self
            .http
            .execute(HttpRequest {
                url,
                method,
                auth: self.keys.select(use_pattern),
                body,
            })
            .await
            .map_err(Sms1IrError::Transport)?;
        debug!(status = response.status, endpoint = suffix, "gateway response");

        transport::decode_envelope(response.status, response.content_type.as_deref(), &response.body)
            .map_err(|err| Sms1IrError::InvalidResponse(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::AuthHeader;
    use crate::client::testing::{FakeResponse, FakeTransport};

    use super::*;

    fn make_client(keys: ApiKeys, transport: FakeTransport) -> Sms1IrClient {
        Sms1IrClient {
            keys,
            base_url: "https://example.invalid/api/service/".to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            verification_route: VerificationRoute::default(),
            http: Arc::new(transport),
        }
    }

    fn keys() -> ApiKeys {
        ApiKeys::with_pattern("plain-key", "pattern-key").unwrap()
    }

    fn recipient(value: &str) -> Recipient {
        Recipient::new(value).unwrap()
    }

    #[tokio::test]
    async fn send_posts_to_send_endpoint_with_plain_credential() {
        let transport = FakeTransport::respond(FakeResponse::json(
            200,
            r#"{"status":1,"message":"queued"}"#,
        ));
        let client = make_client(keys(), transport.clone());

        let envelope = client
            .send(
                &MessageText::new("hello").unwrap(),
                &recipient("09105660150"),
            )
            .await
            .unwrap();
        assert_eq!(envelope.status, 1);
        assert_eq!(envelope.message.as_deref(), Some("queued"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.invalid/api/service/send");
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].auth, AuthHeader::Bearer("plain-key".to_owned()));
        assert_eq!(
            requests[0].body,
            Some(json!({"message": "hello", "recipient": "09105660150"}))
        );
    }

    #[tokio::test]
    async fn send_synthesizes_envelope_for_empty_body_success() {
        let transport = FakeTransport::respond(FakeResponse::raw(200, None, ""));
        let client = make_client(keys(), transport);

        let envelope = client
            .send(&MessageText::new("hello").unwrap(), &recipient("0910"))
            .await
            .unwrap();
        assert_eq!(
            envelope,
            Envelope {
                status: 200,
                message: None,
                data: None,
            }
        );
    }

    #[tokio::test]
    async fn send_returns_gateway_error_envelope_without_failing() {
        let transport = FakeTransport::respond(FakeResponse::json(
            401,
            r#"{"status":401,"message":"unauthorized"}"#,
        ));
        let client = make_client(keys(), transport);

        let envelope = client
            .send(&MessageText::new("hello").unwrap(), &recipient("0910"))
            .await
            .unwrap();
        assert_eq!(envelope.status, 401);
        assert_eq!(envelope.message.as_deref(), Some("unauthorized"));
    }

    #[tokio::test]
    async fn send_wraps_parse_failure_with_cause() {
        use std::error::Error as _;

        let transport = FakeTransport::respond(FakeResponse::json(200, "{ not json }"));
        let client = make_client(keys(), transport);

        let err = client
            .send(&MessageText::new("hello").unwrap(), &recipient("0910"))
            .await
            .unwrap_err();
        match &err {
            Sms1IrError::SendFailed {
                recipient,
                attempts,
                source,
            } => {
                assert_eq!(recipient.as_str(), "0910");
                assert_eq!(*attempts, 1);
                assert!(matches!(**source, Sms1IrError::InvalidResponse(_)));
                assert!(source.source().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bulk_send_aligns_results_with_input_order() {
        let transport = FakeTransport::echo();
        let client = make_client(keys(), transport.clone());

        let recipients = vec![recipient("a"), recipient("b"), recipient("c")];
        let envelopes = client
            .bulk_send(&MessageText::new("hello").unwrap(), &recipients)
            .await
            .unwrap();

        assert_eq!(envelopes.len(), 3);
        for (envelope, recipient) in envelopes.iter().zip(&recipients) {
            assert_eq!(envelope.data, Some(json!(recipient.as_str())));
        }
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn bulk_send_is_all_or_nothing() {
        let transport = FakeTransport::echo().fail_for("b");
        let client = make_client(keys(), transport);

        let recipients = vec![recipient("a"), recipient("b"), recipient("c")];
        let err = client
            .bulk_send(&MessageText::new("hello").unwrap(), &recipients)
            .await
            .unwrap_err();
        match err {
            Sms1IrError::BulkSendFailed { recipient, .. } => {
                assert_eq!(recipient.as_str(), "b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bulk_send_partial_reports_per_recipient_outcomes() {
        let transport = FakeTransport::echo().fail_for("b");
        let client = make_client(keys(), transport);

        let recipients = vec![recipient("a"), recipient("b"), recipient("c")];
        let outcomes = client
            .bulk_send_partial(&MessageText::new("hello").unwrap(), &recipients)
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[0].as_ref().unwrap().data,
            Some(json!("a"))
        );
        assert!(matches!(
            outcomes[1],
            Err(Sms1IrError::SendFailed { .. })
        ));
        assert_eq!(
            outcomes[2].as_ref().unwrap().data,
            Some(json!("c"))
        );
    }

    #[tokio::test]
    async fn send_with_pattern_uses_pattern_credential_and_exact_body() {
        let transport =
            FakeTransport::respond(FakeResponse::json(200, r#"{"status":1}"#));
        let client = make_client(keys(), transport.clone());

        let mut pairs = BTreeMap::new();
        pairs.insert("otpCode".to_owned(), "987654".to_owned());
        client
            .send_with_pattern(TemplateId::new(125), &recipient("09105660150"), &pairs)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://example.invalid/api/service/patternSend"
        );
        assert_eq!(
            requests[0].auth,
            AuthHeader::Bearer("pattern-key".to_owned())
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "templateId": 125,
                "recipient": "09105660150",
                "pairs": {"otpCode": "987654"},
            }))
        );
    }

    #[tokio::test]
    async fn missing_pattern_key_sends_empty_bearer_token() {
        let transport = FakeTransport::respond(FakeResponse::json(
            401,
            r#"{"status":401,"message":"unauthorized"}"#,
        ));
        let client = make_client(ApiKeys::new("plain-key").unwrap(), transport.clone());

        // The gateway, not the client, rejects the call.
        let envelope = client
            .send_with_pattern(
                TemplateId::new(125),
                &recipient("0910"),
                &BTreeMap::new(),
            )
            .await
            .unwrap();
        assert_eq!(envelope.status, 401);
        assert_eq!(
            transport.requests()[0].auth,
            AuthHeader::Bearer(String::new())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhaustion_makes_exactly_four_attempts() {
        let transport = FakeTransport::respond(FakeResponse::json(200, "{ not json }"));
        let client = make_client(keys(), transport.clone());

        let err = client
            .send_with_retry(&MessageText::new("hello").unwrap(), &recipient("0910"))
            .await
            .unwrap_err();
        match err {
            Sms1IrError::SendFailed {
                recipient,
                attempts,
                ..
            } => {
                assert_eq!(recipient.as_str(), "0910");
                assert_eq!(attempts, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_stops_at_first_success() {
        let transport = FakeTransport::script(vec![
            FakeResponse::json(200, "{ not json }"),
            FakeResponse::json(200, "{ not json }"),
            FakeResponse::json(200, r#"{"status":1,"message":"queued"}"#),
        ]);
        let client = make_client(keys(), transport.clone());

        let envelope = client
            .send_with_retry(&MessageText::new("hello").unwrap(), &recipient("0910"))
            .await
            .unwrap();
        assert_eq!(envelope.status, 1);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn verification_code_routes_through_pattern_send_by_default() {
        let transport =
            FakeTransport::respond(FakeResponse::json(200, r#"{"status":1}"#));
        let client = make_client(keys(), transport.clone());

        client
            .send_verification_code("987654", &recipient("09105660150"), TemplateId::new(125))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("patternSend"));
        assert_eq!(
            requests[0].body,
            Some(json!({
                "templateId": 125,
                "recipient": "09105660150",
                "pairs": {"otpCode": "987654"},
            }))
        );
    }

    #[tokio::test]
    async fn verification_failure_is_wrapped_with_cause() {
        use std::error::Error as _;

        let transport = FakeTransport::respond(FakeResponse::json(200, "{ not json }"));
        let client = make_client(keys(), transport);

        let err = client
            .send_verification_code("987654", &recipient("0910"), TemplateId::new(125))
            .await
            .unwrap_err();
        match &err {
            Sms1IrError::VerificationSendFailed(source) => {
                assert!(matches!(**source, Sms1IrError::InvalidResponse(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.source().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn verification_code_can_use_the_plain_retrying_route() {
        let transport = FakeTransport::script(vec![
            FakeResponse::json(200, "{ not json }"),
            FakeResponse::json(200, r#"{"status":1}"#),
        ]);
        let client = Sms1IrClient {
            verification_route: VerificationRoute::PlainWithRetry,
            ..make_client(keys(), transport.clone())
        };

        client
            .send_verification_code("987654", &recipient("0910"), TemplateId::new(125))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.ends_with("/send"));
        assert_eq!(requests[0].auth, AuthHeader::Bearer("plain-key".to_owned()));
        assert_eq!(
            requests[0].body,
            Some(json!({
                "message": "Your verification code is: 987654",
                "recipient": "0910",
            }))
        );
    }

    #[test]
    fn builder_overrides_are_applied() {
        let client = Sms1IrClient::builder(keys())
            .base_url("https://example.invalid/api/service/")
            .max_retries(5)
            .retry_interval(Duration::from_millis(250))
            .verification_route(VerificationRoute::PlainWithRetry)
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://example.invalid/api/service/");
        assert_eq!(client.max_retries, 5);
        assert_eq!(client.retry_interval, Duration::from_millis(250));
        assert_eq!(
            client.verification_route,
            VerificationRoute::PlainWithRetry
        );
    }
}
