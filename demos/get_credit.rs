use sms1ir::SmsIrClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SmsIrClient::from_env()?;

    let envelope = client.credit().await?;
    match envelope.data_as::<f64>()? {
        Some(credit) => println!("remaining credit: {credit}"),
        None => println!("gateway returned no credit data: {:?}", envelope.message),
    }

    Ok(())
}
