use eodhd_rs::{EodError, ErrorKind, FundamentalsBuilder};
use serde_json::json;

use crate::common::{STOCK_BULK_FILTER, StubService};

#[tokio::test]
async fn malformed_ticker_is_rejected_before_any_fetch() {
    let stub = StubService::apple();
    let err = FundamentalsBuilder::with_service(&stub, "AAPL")
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn bad_window_is_rejected_before_any_fetch() {
    let stub = StubService::apple();

    let err = FundamentalsBuilder::with_service(&stub, "AAPL.US")
        .from_date_str("2024-01-01")
        .to_date_str("2023-01-01")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, EodError::InvalidParams(_)), "{err:?}");

    let err = FundamentalsBuilder::with_service(&stub, "AAPL.US")
        .from_date_str("01/01/2023")
        .fetch()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'from'"), "{err}");

    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn general_failure_is_a_classification_error() {
    let stub = StubService::apple().fail("General", "Ticker Not Found.");
    let err = FundamentalsBuilder::with_service(&stub, "NOPE.US")
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Classification);
    assert!(err.to_string().contains("Ticker Not Found."), "{err}");
    assert_eq!(stub.calls().len(), 1);
}

#[tokio::test]
async fn general_without_type_is_a_classification_error() {
    for general in [json!({"Name": "x"}), json!({"Type": "  "}), json!(["General"])] {
        let stub = StubService::new().respond("General", general);
        let err = FundamentalsBuilder::with_service(&stub, "AAPL.US")
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, EodError::Classification(_)), "{err:?}");
    }
}

#[tokio::test]
async fn bulk_failure_names_the_section_list() {
    let stub = StubService::apple().fail(STOCK_BULK_FILTER, "Forbidden");
    let err = FundamentalsBuilder::with_service(&stub, "AAPL.US")
        .fetch()
        .await
        .unwrap_err();

    match &err {
        EodError::SectionFetch { sections, source } => {
            assert_eq!(sections.len(), 10);
            assert_eq!(sections[0], "Highlights");
            assert!(matches!(**source, EodError::Api(ref m) if m == "Forbidden"));
        }
        other => panic!("expected SectionFetch, got {other:?}"),
    }
    assert_eq!(err.to_envelope()["kind"], "section_fetch");
    assert!(stub.leaf_filters().is_empty());
}

#[tokio::test]
async fn failed_leaf_aborts_the_assembly() {
    let leaf = "Financials::Income_Statement::quarterly::2023-03-31";
    let stub = StubService::apple().fail(leaf, "Internal error");
    let err = FundamentalsBuilder::with_service(&stub, "AAPL.US")
        .from_date_str("2023-01-01")
        .to_date_str("2023-12-31")
        .concurrency(1)
        .fetch()
        .await
        .unwrap_err();

    match &err {
        EodError::FinancialsFetch { filter, .. } => assert_eq!(filter, leaf),
        other => panic!("expected FinancialsFetch, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::FinancialsFetch);
    // Serial mode stops at the failing leaf.
    assert_eq!(stub.leaf_filters().last().map(String::as_str), Some(leaf));
}

#[tokio::test]
async fn failed_discovery_is_a_financials_error() {
    let stub = StubService::apple().fail("outstandingShares", "Timeout");
    let err = FundamentalsBuilder::with_service(&stub, "AAPL.US")
        .from_date_str("2023-01-01")
        .fetch()
        .await
        .unwrap_err();

    assert!(
        matches!(err, EodError::FinancialsFetch { ref filter, .. } if filter == "outstandingShares"),
        "{err:?}"
    );
    assert!(stub.leaf_filters().is_empty());
}

#[tokio::test]
async fn null_leaf_is_stored_as_returned() {
    let leaf = "Financials::Cash_Flow::quarterly::2023-06-30";
    let stub = StubService::apple().respond(leaf, serde_json::Value::Null);
    let doc = FundamentalsBuilder::with_service(&stub, "AAPL.US")
        .from_date_str("2023-01-01")
        .to_date_str("2023-12-31")
        .fetch()
        .await
        .unwrap();

    let fin = doc.financials().unwrap();
    assert_eq!(fin["Cash_Flow"]["quarterly"]["2023-06-30"], serde_json::Value::Null);
    assert!(fin["Cash_Flow"]["quarterly"].as_object().unwrap().contains_key("2023-06-30"));
}
