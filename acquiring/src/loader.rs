use std::fs;

use anyhow::{Context, Result, bail};
use tracing::info;

use pricing::catalog::{RuleCatalog, RuleRecord};
use pricing::model::{MerchantProfile, Transaction};

use crate::import_model::{Importable, MerchantRecord, PaymentRecord};

/// Load and compile the rule catalog from a JSON array of records.
///
/// A malformed condition string anywhere in the file aborts the load; a
/// catalog is usable whole or not at all.
pub fn load_catalog(path: &str) -> Result<RuleCatalog> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading catalog {path}"))?;
    let records: Vec<RuleRecord> =
        serde_json::from_str(&contents).with_context(|| format!("parsing catalog {path}"))?;
    let catalog =
        RuleCatalog::compile(records).with_context(|| format!("compiling catalog {path}"))?;
    info!("Loaded {} rules from {}", catalog.len(), path);

    Ok(catalog)
}

/// Load merchant profiles from a JSON array of records.
pub fn load_merchants(path: &str) -> Result<Vec<MerchantProfile>> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading merchants {path}"))?;
    let records: Vec<MerchantRecord> =
        serde_json::from_str(&contents).with_context(|| format!("parsing merchants {path}"))?;

    let mut profiles = Vec::with_capacity(records.len());
    for record in records {
        if let Err(reason) = record.validate() {
            bail!("invalid merchant record in {path}: {reason}");
        }
        profiles.push(record.into());
    }
    info!("Loaded {} merchant profiles from {}", profiles.len(), path);

    Ok(profiles)
}

/// Load the payment history from a JSON array of records.
pub fn load_payments(path: &str) -> Result<Vec<Transaction>> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading payments {path}"))?;
    let records: Vec<PaymentRecord> =
        serde_json::from_str(&contents).with_context(|| format!("parsing payments {path}"))?;

    let mut payments = Vec::with_capacity(records.len());
    for record in records {
        if let Err(reason) = record.validate() {
            bail!("invalid payment record in {path}: {reason}");
        }
        payments.push(record.into());
    }
    info!("Loaded {} payments from {}", payments.len(), path);

    Ok(payments)
}
