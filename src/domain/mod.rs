//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{DEFAULT_PAGE_SIZE, DateRange, Page, SendOptions, VerifyParameter};
pub use response::{
    DeletedScheduled, Envelope, MessageReport, PackSummary, ReceivedMessage, SendPack, VerifySend,
};
pub use validation::ValidationError;
pub use value::{ApiKey, LineNumber, MessageText, Recipient, TemplateId, UnixTimestamp};
