//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod envelope;
mod query;
mod send;

pub use envelope::{TransportError, decode_envelope};
pub use query::{
    CREDIT_ENDPOINT, LINE_ENDPOINT, RECEIVE_ARCHIVE_ENDPOINT, RECEIVE_LATEST_ENDPOINT,
    RECEIVE_LIVE_ENDPOINT, SEND_ARCHIVE_ENDPOINT, SEND_BULK_ENDPOINT, SEND_LIKE_TO_LIKE_ENDPOINT,
    SEND_LIVE_ENDPOINT, SEND_PACKS_ENDPOINT, SEND_VERIFY_ENDPOINT, archive_query, count_query,
    encode_bulk_body, encode_like_to_like_body, encode_verify_body, message_report_path,
    pack_report_path, page_query, scheduled_pack_path,
};
pub use send::{PATTERN_SEND_ENDPOINT, SEND_ENDPOINT, encode_pattern_body, encode_send_body};
