use crate::domain::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response from server: {0}")]
    Json(#[from] serde_json::Error),
}

/// Normalize a raw gateway response into an [`Envelope`].
///
/// The gateway is known to answer HTTP 200 with an empty body and no JSON
/// content type on successful sends; that case is synthesized as
/// `{status: 200}` without touching the body. Every other response must carry
/// a JSON envelope, and a body that fails to parse is a hard error.
pub fn decode_envelope(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<Envelope, TransportError> {
    if status == 200 && !content_type.is_some_and(is_json) {
        return Ok(Envelope {
            status: 200,
            message: None,
            data: None,
        });
    }
    Ok(serde_json::from_str(body)?)
}

fn is_json(content_type: &str) -> bool {
    content_type.contains("application/json")
}
