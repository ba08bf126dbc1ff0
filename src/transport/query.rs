use serde_json::{Value, json};

use crate::domain::{
    DateRange, LineNumber, MessageText, Page, Recipient, TemplateId, UnixTimestamp, VerifyParameter,
};

pub const SEND_BULK_ENDPOINT: &str = "send/bulk";
pub const SEND_LIKE_TO_LIKE_ENDPOINT: &str = "send/likeToLike";
pub const SEND_VERIFY_ENDPOINT: &str = "send/verify";
pub const SEND_PACKS_ENDPOINT: &str = "send/pack";
pub const SEND_LIVE_ENDPOINT: &str = "send/live";
pub const SEND_ARCHIVE_ENDPOINT: &str = "send/archive";
pub const RECEIVE_LATEST_ENDPOINT: &str = "receive/latest";
pub const RECEIVE_LIVE_ENDPOINT: &str = "receive/live";
pub const RECEIVE_ARCHIVE_ENDPOINT: &str = "receive/archive";
pub const CREDIT_ENDPOINT: &str = "credit";
pub const LINE_ENDPOINT: &str = "line";

pub fn scheduled_pack_path(pack_id: u64) -> String {
    format!("send/scheduled/{pack_id}")
}

pub fn message_report_path(message_id: u64) -> String {
    format!("send/{message_id}")
}

pub fn pack_report_path(pack_id: u64) -> String {
    format!("send/pack/{pack_id}")
}

// The v1 send endpoints mix casing on the wire (`lineNumber` next to
// `MessageText`); the keys below reproduce the gateway's exact spelling.

pub fn encode_bulk_body(
    line_number: &LineNumber,
    message: &MessageText,
    mobiles: &[Recipient],
    send_at: Option<UnixTimestamp>,
) -> Value {
    json!({
        "lineNumber": line_number,
        "MessageText": message.as_str(),
        "Mobiles": mobiles.iter().map(Recipient::as_str).collect::<Vec<_>>(),
        "SendDateTime": send_at.map(UnixTimestamp::value),
    })
}

pub fn encode_like_to_like_body(
    line_number: &LineNumber,
    messages: &[MessageText],
    mobiles: &[Recipient],
    send_at: Option<UnixTimestamp>,
) -> Value {
    json!({
        "lineNumber": line_number,
        "MessageTexts": messages.iter().map(MessageText::as_str).collect::<Vec<_>>(),
        "Mobiles": mobiles.iter().map(Recipient::as_str).collect::<Vec<_>>(),
        "SendDateTime": send_at.map(UnixTimestamp::value),
    })
}

pub fn encode_verify_body(
    mobile: &Recipient,
    template_id: TemplateId,
    parameters: &[VerifyParameter],
) -> Value {
    json!({
        "Mobile": mobile.as_str(),
        "TemplateId": template_id.value(),
        "Parameters": parameters,
    })
}

pub fn page_query(page: Page) -> Vec<(&'static str, String)> {
    vec![
        ("pageSize", page.size.to_string()),
        ("pageNumber", page.number.to_string()),
    ]
}

pub fn archive_query(range: DateRange, page: Page) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(from) = range.from {
        query.push(("fromDate", from.value().to_string()));
    }
    if let Some(to) = range.to {
        query.push(("toDate", to.value().to_string()));
    }
    query.extend(page_query(page));
    query
}

pub fn count_query(count: u32) -> Vec<(&'static str, String)> {
    vec![("count", count.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_builders_interpolate_ids() {
        assert_eq!(scheduled_pack_path(42), "send/scheduled/42");
        assert_eq!(message_report_path(7), "send/7");
        assert_eq!(pack_report_path(9), "send/pack/9");
    }

    #[test]
    fn bulk_body_uses_exact_wire_keys() {
        let line = LineNumber::number(3000);
        let message = MessageText::new("hello").unwrap();
        let mobiles = vec![
            Recipient::new("09105660150").unwrap(),
            Recipient::new("09105660151").unwrap(),
        ];

        assert_eq!(
            encode_bulk_body(&line, &message, &mobiles, None),
            json!({
                "lineNumber": 3000,
                "MessageText": "hello",
                "Mobiles": ["09105660150", "09105660151"],
                "SendDateTime": null,
            })
        );

        assert_eq!(
            encode_bulk_body(&line, &message, &mobiles, Some(UnixTimestamp::new(1_700_000_000)))
                ["SendDateTime"],
            json!(1_700_000_000i64)
        );
    }

    #[test]
    fn like_to_like_body_pairs_messages_with_mobiles() {
        let line = LineNumber::text("30002545").unwrap();
        let messages = vec![
            MessageText::new("hi a").unwrap(),
            MessageText::new("hi b").unwrap(),
        ];
        let mobiles = vec![
            Recipient::new("09105660150").unwrap(),
            Recipient::new("09105660151").unwrap(),
        ];

        assert_eq!(
            encode_like_to_like_body(&line, &messages, &mobiles, None),
            json!({
                "lineNumber": "30002545",
                "MessageTexts": ["hi a", "hi b"],
                "Mobiles": ["09105660150", "09105660151"],
                "SendDateTime": null,
            })
        );
    }

    #[test]
    fn verify_body_carries_named_parameters() {
        let mobile = Recipient::new("09105660150").unwrap();
        let parameters = vec![VerifyParameter::new("otpCode", "987654")];

        assert_eq!(
            encode_verify_body(&mobile, TemplateId::new(125), &parameters),
            json!({
                "Mobile": "09105660150",
                "TemplateId": 125,
                "Parameters": [{"name": "otpCode", "value": "987654"}],
            })
        );
    }

    #[test]
    fn page_query_defaults_to_first_page_of_100() {
        assert_eq!(
            page_query(Page::default()),
            vec![
                ("pageSize", "100".to_owned()),
                ("pageNumber", "1".to_owned()),
            ]
        );
    }

    #[test]
    fn archive_query_omits_absent_bounds() {
        let query = archive_query(DateRange::unbounded(), Page::default());
        assert!(!query.iter().any(|(key, _)| *key == "fromDate"));
        assert!(!query.iter().any(|(key, _)| *key == "toDate"));

        let range = DateRange::between(UnixTimestamp::new(100), UnixTimestamp::new(200));
        let query = archive_query(range, Page::number(2));
        assert_eq!(
            query,
            vec![
                ("fromDate", "100".to_owned()),
                ("toDate", "200".to_owned()),
                ("pageSize", "100".to_owned()),
                ("pageNumber", "2".to_owned()),
            ]
        );
    }
}
