use std::error::Error;
use std::fs;
use std::sync::Arc;

use pricing::aggregate::AggregateIndex;
use pricing::model::Resolution;
use pricing::processor::{FeeProcessor, InMemoryDirectory};

use acquiring::executable_utils::initialize_executable;
use acquiring::loader::{load_catalog, load_merchants, load_payments};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = initialize_executable()?;

    let catalog = Arc::new(load_catalog(&config.data.catalog_path)?);
    let directory = Arc::new(InMemoryDirectory::new(load_merchants(
        &config.data.merchants_path,
    )?));
    let payments = load_payments(&config.data.payments_path)?;
    let aggregates = Arc::new(AggregateIndex::build(&payments));

    let processor = FeeProcessor::new(&config.processor, catalog, directory, aggregates);
    let assessments = processor.assess_batch(&payments).await?;

    let matched = assessments
        .iter()
        .filter(|a| matches!(a.resolution, Resolution::Matched { .. }))
        .count();
    tracing::info!(
        "Assessed {} transactions: {} matched, {} without a rule",
        assessments.len(),
        matched,
        assessments.len() - matched
    );

    // One JSON document per line so downstream tooling can stream it.
    let mut out = String::with_capacity(assessments.len() * 64);
    for assessment in &assessments {
        out.push_str(&serde_json::to_string(assessment)?);
        out.push('\n');
    }
    fs::write(&config.data.output_path, out)?;
    tracing::info!("Wrote assessments to {}", config.data.output_path);

    Ok(())
}
