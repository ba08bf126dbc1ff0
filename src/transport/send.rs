use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::domain::{MessageText, Recipient, TemplateId};

/// Endpoint suffix for plain sends on the SMS1.ir gateway.
pub const SEND_ENDPOINT: &str = "send";

/// Endpoint suffix for templated sends on the SMS1.ir gateway.
pub const PATTERN_SEND_ENDPOINT: &str = "patternSend";

pub fn encode_send_body(message: &MessageText, recipient: &Recipient) -> Value {
    json!({
        "message": message.as_str(),
        "recipient": recipient.as_str(),
    })
}

pub fn encode_pattern_body(
    template_id: TemplateId,
    recipient: &Recipient,
    pairs: &BTreeMap<String, String>,
) -> Value {
    json!({
        "templateId": template_id.value(),
        "recipient": recipient.as_str(),
        "pairs": pairs,
    })
}
