use std::io;

use sms1ir::{ApiKeys, Recipient, Sms1IrClient, TemplateId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mobile = std::env::var("SAMPLE_MOBILE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SAMPLE_MOBILE environment variable is required",
        )
    })?;
    let template_id = std::env::var("PATTERN_TEMPLATE_ID")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "PATTERN_TEMPLATE_ID environment variable is required",
            )
        })?;
    let code = std::env::var("SAMPLE_CODE").unwrap_or_else(|_| "987654".to_owned());

    let client = Sms1IrClient::new(ApiKeys::from_env()?);
    let recipient = Recipient::new(mobile)?;

    let envelope = client
        .send_verification_code(&code, &recipient, TemplateId::new(template_id))
        .await?;
    println!(
        "status: {}, message: {:?}",
        envelope.status, envelope.message
    );

    Ok(())
}
