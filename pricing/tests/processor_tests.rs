mod test_utils;

use std::sync::Arc;

use common::config::ProcessorConfig;
use common::test_helpers::generate_unique_id;

use pricing::aggregate::AggregateIndex;
use pricing::catalog::{RuleCatalog, RuleRecord};
use pricing::model::Resolution;
use pricing::processor::{FeeProcessor, InMemoryDirectory, ProcessError};

use test_utils::{MockMerchantDirectory, payment, profile};

fn record(id: i64) -> RuleRecord {
    RuleRecord {
        id,
        card_scheme: None,
        account_type: None,
        capture_delay: None,
        monthly_fraud_level: None,
        monthly_volume: None,
        merchant_category_code: None,
        is_credit: None,
        aci: None,
        fixed_amount: 0.1,
        rate: 19,
        intracountry: None,
    }
}

fn processor_config() -> ProcessorConfig {
    ProcessorConfig {
        workers: 2,
        log_level: "debug".to_string(),
    }
}

#[tokio::test]
async fn assess_returns_the_matched_fee() {
    let catalog = Arc::new(RuleCatalog::compile(vec![record(1)]).unwrap());

    let mut directory = MockMerchantDirectory::new();
    directory
        .expect_profile()
        .returning(|merchant| Ok(Some(profile(merchant))));

    let processor = FeeProcessor::new(
        &processor_config(),
        catalog,
        Arc::new(directory),
        Arc::new(AggregateIndex::default()),
    );

    let tx = payment(42, "Crossfit_Hanna", 1_000.0, "2023-01-05T10:00:00Z");
    let assessment = processor.assess(&tx).await.unwrap();

    assert_eq!(assessment.transaction_id, 42);
    match assessment.resolution {
        Resolution::Matched { rule_id, fee } => {
            assert_eq!(rule_id, 1);
            assert!((fee - 2.0).abs() < 1e-9);
        }
        other => panic!("expected a match, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_merchant_is_an_error_not_an_outcome() {
    let catalog = Arc::new(RuleCatalog::compile(vec![record(1)]).unwrap());

    let mut directory = MockMerchantDirectory::new();
    directory.expect_profile().returning(|_| Ok(None));

    let processor = FeeProcessor::new(
        &processor_config(),
        catalog,
        Arc::new(directory),
        Arc::new(AggregateIndex::default()),
    );

    let merchant = generate_unique_id("MERCHANT");
    let tx = payment(1, &merchant, 50.0, "2023-01-05T10:00:00Z");

    match processor.assess(&tx).await {
        Err(ProcessError::UnknownMerchant { merchant: m }) => assert_eq!(m, merchant),
        other => panic!("expected an unknown-merchant error, got {:?}", other),
    }
}

#[tokio::test]
async fn directory_failures_propagate() {
    let catalog = Arc::new(RuleCatalog::compile(vec![record(1)]).unwrap());

    let mut directory = MockMerchantDirectory::new();
    directory
        .expect_profile()
        .returning(|_| Err("directory offline".into()));

    let processor = FeeProcessor::new(
        &processor_config(),
        catalog,
        Arc::new(directory),
        Arc::new(AggregateIndex::default()),
    );

    let tx = payment(1, "Crossfit_Hanna", 50.0, "2023-01-05T10:00:00Z");
    assert!(matches!(
        processor.assess(&tx).await,
        Err(ProcessError::Directory(_))
    ));
}

#[tokio::test]
async fn uncovered_transactions_come_back_as_no_matching_rule() {
    // The only rule requires a scheme the context does not have.
    let catalog = Arc::new(
        RuleCatalog::compile(vec![RuleRecord {
            card_scheme: Some("GlobalCard".to_string()),
            ..record(1)
        }])
        .unwrap(),
    );

    let directory = InMemoryDirectory::new([profile("Crossfit_Hanna")]);
    let processor = FeeProcessor::new(
        &processor_config(),
        catalog,
        Arc::new(directory),
        Arc::new(AggregateIndex::default()),
    );

    let tx = payment(7, "Crossfit_Hanna", 50.0, "2023-01-05T10:00:00Z");
    let assessment = processor.assess(&tx).await.unwrap();
    assert_eq!(assessment.resolution, Resolution::NoMatchingRule);
}

#[tokio::test]
async fn monthly_aggregates_feed_the_matching_context() {
    let catalog = Arc::new(
        RuleCatalog::compile(vec![RuleRecord {
            monthly_volume: Some("100k-1m".to_string()),
            ..record(1)
        }])
        .unwrap(),
    );

    let history = vec![
        payment(1, "Crossfit_Hanna", 90_000.0, "2023-01-05T10:00:00Z"),
        payment(2, "Crossfit_Hanna", 60_000.0, "2023-01-20T10:00:00Z"),
        payment(3, "Golfclub_Baron_Friso", 10.0, "2023-01-09T10:00:00Z"),
    ];
    let aggregates = Arc::new(AggregateIndex::build(&history));

    let directory = InMemoryDirectory::new([
        profile("Crossfit_Hanna"),
        profile("Golfclub_Baron_Friso"),
    ]);
    let processor = FeeProcessor::new(
        &processor_config(),
        catalog,
        Arc::new(directory),
        aggregates,
    );

    // 150k monthly volume satisfies the rule.
    let covered = processor.assess(&history[0]).await.unwrap();
    assert!(matches!(covered.resolution, Resolution::Matched { .. }));

    // 10 EUR monthly volume does not.
    let uncovered = processor.assess(&history[2]).await.unwrap();
    assert_eq!(uncovered.resolution, Resolution::NoMatchingRule);
}

#[tokio::test]
async fn batches_preserve_input_order() {
    let catalog = Arc::new(RuleCatalog::compile(vec![record(1)]).unwrap());

    let directory = InMemoryDirectory::new([
        profile("Crossfit_Hanna"),
        profile("Golfclub_Baron_Friso"),
    ]);
    let processor = FeeProcessor::new(
        &processor_config(),
        catalog,
        Arc::new(directory),
        Arc::new(AggregateIndex::default()),
    );

    let batch = vec![
        payment(30, "Crossfit_Hanna", 10.0, "2023-01-05T10:00:00Z"),
        payment(10, "Golfclub_Baron_Friso", 20.0, "2023-01-05T11:00:00Z"),
        payment(20, "Crossfit_Hanna", 30.0, "2023-01-05T12:00:00Z"),
    ];

    let assessments = processor.assess_batch(&batch).await.unwrap();
    let ids: Vec<_> = assessments.iter().map(|a| a.transaction_id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}
