use eodhd_rs::{AssetType, EodClient, FundamentalsBuilder};

#[tokio::test]
#[ignore]
async fn live_fundamentals_smoke() {
    if !crate::common::live_or_record_enabled() {
        return;
    }

    // Token comes from EODHD_API_KEY (or .env); the demo token covers AAPL.US.
    let client = EodClient::builder().build().unwrap();

    let doc = FundamentalsBuilder::new(&client, "AAPL.US")
        .from_date_str("2023-01-01")
        .to_date_str("2023-12-31")
        .fetch()
        .await
        .unwrap();

    assert_eq!(doc.asset_type(), Some(AssetType::CommonStock));
    if !crate::common::is_recording() {
        let fin = doc.financials().unwrap();
        assert!(fin["Balance_Sheet"]["quarterly"].is_object());
    }
}
