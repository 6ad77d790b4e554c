use std::time::Duration;

use eodhd_rs::{EodClient, FundamentalsBuilder, token_override};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=eodhd_rs=debug shows the fetch plan and pruning stats.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. A client with a tighter timeout. The token comes from EODHD_API_KEY or `.env`,
    //    and falls back to the public demo token.
    let client = EodClient::builder()
        .timeout(Duration::from_secs(15))
        .build()?;

    // 2. One year of Apple fundamentals, Financials fetched per report date.
    let ticker = std::env::args().nth(1).unwrap_or_else(|| "AAPL.US".to_string());
    let mut builder = FundamentalsBuilder::new(&client, ticker.as_str())
        .from_date_str("2023-01-01")
        .to_date_str("2023-12-31")
        .concurrency(6);
    if let Some(token) = token_override(std::env::var("EODHD_CALL_TOKEN").ok().as_deref(), None) {
        builder = builder.token(token);
    }
    let doc = builder.fetch().await?;

    println!("--- {} ({}) ---", ticker, doc.asset_type().map(|t| t.to_string()).unwrap_or_default());
    for section in doc.sections() {
        println!("  {section}");
    }

    // 3. Report dates kept in the window.
    if let Some(fin) = doc.financials() {
        for cadence in ["quarterly", "yearly"] {
            let dates: Vec<&String> = fin["Balance_Sheet"][cadence]
                .as_object()
                .map(|m| m.keys().collect())
                .unwrap_or_default();
            println!("Balance_Sheet {cadence}: {dates:?}");
        }
    }

    // 4. An ETF with explicit sections. Windows only apply to common stock.
    let etf = FundamentalsBuilder::new(&client, "SPY.US")
        .sections(["ETF_Data"])
        .fetch()
        .await;
    match etf {
        Ok(doc) => println!("SPY.US sections: {:?}", doc.sections().collect::<Vec<_>>()),
        Err(e) => println!("SPY.US failed: {}", e.to_envelope()),
    }

    Ok(())
}
