use std::io;

use sms1ir::{ApiKeys, MessageText, Recipient, Sms1IrClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mobiles = std::env::var("SAMPLE_MOBILES").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SAMPLE_MOBILES environment variable is required (comma-separated)",
        )
    })?;
    let message = std::env::var("SAMPLE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the sms1ir demo.".to_owned());

    let recipients = mobiles
        .split(',')
        .map(Recipient::new)
        .collect::<Result<Vec<_>, _>>()?;
    let text = MessageText::new(message)?;

    let client = Sms1IrClient::new(ApiKeys::from_env()?);
    let envelopes = client.bulk_send(&text, &recipients).await?;
    for (recipient, envelope) in recipients.iter().zip(&envelopes) {
        println!("{recipient}: status {}", envelope.status);
    }

    Ok(())
}
