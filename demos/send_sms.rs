use std::io;

use sms1ir::{ApiKeys, MessageText, Recipient, Sms1IrClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mobile = std::env::var("SAMPLE_MOBILE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SAMPLE_MOBILE environment variable is required",
        )
    })?;
    let message = std::env::var("SAMPLE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the sms1ir demo.".to_owned());

    let client = Sms1IrClient::new(ApiKeys::from_env()?);
    let recipient = Recipient::new(mobile)?;
    let text = MessageText::new(message)?;

    let envelope = client.send(&text, &recipient).await?;
    println!(
        "status: {}, message: {:?}",
        envelope.status, envelope.message
    );

    Ok(())
}
