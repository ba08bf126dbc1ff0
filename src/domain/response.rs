use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::domain::value::LineNumber;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The normalized shape every gateway response is coerced into.
///
/// `status` is whatever integer the gateway reported in the body; when the
/// gateway answers HTTP 200 with an empty or non-JSON body (observed on
/// successful sends), the transport layer synthesizes `{status: 200}` with no
/// message or data. `data` is kept as raw JSON because its shape varies per
/// endpoint; use [`Envelope::data_as`] to decode it into one of the typed
/// payloads.
pub struct Envelope {
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// Decode the `data` payload into a typed shape.
    ///
    /// Returns `Ok(None)` when the envelope carries no data at all.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.data {
            Some(data) => serde_json::from_value(data.clone()).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of `send/bulk` and `send/likeToLike`: the accepted batch.
pub struct SendPack {
    pub pack_id: String,
    pub message_ids: Vec<u64>,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of `send/verify`: the accepted verification message.
pub struct VerifySend {
    pub message_id: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of `DELETE send/scheduled/{packId}`.
pub struct DeletedScheduled {
    pub returned_credit_count: f64,
    pub sms_count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One sent message, as returned by `send/{id}`, `send/live`, `send/archive`
/// and `send/pack/{id}`.
pub struct MessageReport {
    pub message_id: u64,
    pub mobile: String,
    pub message_text: String,
    pub send_date_time: i64,
    pub line_number: LineNumber,
    pub cost: f64,
    #[serde(default)]
    pub delivery_state: Option<i64>,
    #[serde(default)]
    pub delivery_date_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One batch summary, as returned by `send/pack`.
pub struct PackSummary {
    pub pack_id: String,
    pub recipient_count: u64,
    pub creation_date_time: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One inbound message, as returned by the `receive/*` endpoints.
pub struct ReceivedMessage {
    pub message_text: String,
    pub number: LineNumber,
    pub mobile: String,
    pub received_date_time: i64,
}
