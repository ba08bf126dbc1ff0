use serde::Serialize;

use crate::domain::value::{LineNumber, UnixTimestamp};

/// Default page size for report and listing endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pagination window for report and listing endpoints
/// (`pageSize`/`pageNumber` on the wire).
pub struct Page {
    pub size: u32,
    pub number: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            number: 1,
        }
    }
}

impl Page {
    /// A page window at the given page number with the default size.
    pub fn number(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Optional date bounds for archive queries (`fromDate`/`toDate` on the wire).
///
/// Either bound may be absent; the default is unbounded on both sides.
pub struct DateRange {
    pub from: Option<UnixTimestamp>,
    pub to: Option<UnixTimestamp>,
}

impl DateRange {
    /// The unbounded range.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A range between two inclusive bounds.
    pub fn between(from: UnixTimestamp, to: UnixTimestamp) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Optional parameters for the SMS.ir v1 send operations.
///
/// `line_number` falls back to the client's default line when absent;
/// `send_at` schedules delivery (immediate when absent).
pub struct SendOptions {
    pub line_number: Option<LineNumber>,
    pub send_at: Option<UnixTimestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One template variable for the SMS.ir v1 verify endpoint
/// (`Parameters: [{name, value}]` on the wire).
pub struct VerifyParameter {
    pub name: String,
    pub value: String,
}

impl VerifyParameter {
    /// Create a name/value pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
