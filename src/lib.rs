//! Typed Rust client for the SMS1.ir and SMS.ir HTTP APIs.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for wire-format quirks, and a client layer orchestrating requests. Two
//! clients share the transport plumbing: [`Sms1IrClient`] drives the SMS1.ir
//! send gateway (plain, bulk, templated and verification-code sends, with
//! bounded retry), and [`SmsIrClient`] drives the SMS.ir v1 report/query
//! gateway (delivery reports, received messages, credit and line listings).
//!
//! ```rust,no_run
//! use sms1ir::{ApiKeys, MessageText, Recipient, Sms1IrClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sms1ir::Sms1IrError> {
//!     let client = Sms1IrClient::new(ApiKeys::with_pattern("plain-key", "pattern-key")?);
//!     let recipient = Recipient::new("09105660150")?;
//!     let message = MessageText::new("hello")?;
//!     let envelope = client.send(&message, &recipient).await?;
//!     println!("gateway status: {}", envelope.status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ApiKeys, Sms1IrClient, Sms1IrClientBuilder, Sms1IrError, SmsIrClient, SmsIrClientBuilder,
    VerificationRoute,
};
pub use domain::{
    ApiKey, DEFAULT_PAGE_SIZE, DateRange, DeletedScheduled, Envelope, LineNumber, MessageReport,
    MessageText, PackSummary, Page, ReceivedMessage, Recipient, SendOptions, SendPack, TemplateId,
    UnixTimestamp, ValidationError, VerifyParameter, VerifySend,
};
