use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Period, PeriodAggregate};
use crate::catalog::RuleId;

pub type ModelId = i64;

/// A resolved payment transaction, as handed over by the upstream pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: ModelId,
    pub merchant: String,
    pub scheme: String,
    pub amount: f64,
    pub is_credit: bool,
    pub aci: String,
    pub issuing_country: String,
    pub acquiring_country: String,
    pub fraudulent: bool,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Issuer and acquirer sit in the same jurisdiction.
    pub fn intracountry(&self) -> bool {
        self.issuing_country == self.acquiring_country
    }

    pub fn period(&self) -> Period {
        Period::of(&self.created_at)
    }
}

/// Capture-delay setting of a merchant: a keyword or a day count.
///
/// Decided once when the profile is built; the matcher never coerces one
/// form into the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaptureDelay {
    Keyword(String),
    Days(f64),
}

impl CaptureDelay {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_ascii_lowercase();
        match text.parse::<f64>() {
            Ok(days) => CaptureDelay::Days(days),
            Err(_) => CaptureDelay::Keyword(text),
        }
    }
}

/// Static merchant attributes used as matching dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub merchant: String,
    pub account_type: String,
    pub category_code: i64,
    pub capture_delay: CaptureDelay,
}

/// Everything the matcher sees for one transaction.
///
/// Assembled fresh per transaction from the transaction record, the
/// merchant's static profile and the merchant's period aggregate; never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub scheme: String,
    pub is_credit: bool,
    pub aci: String,
    pub intracountry: bool,
    pub amount: f64,
    pub account_type: String,
    pub category_code: i64,
    pub capture_delay: CaptureDelay,
    pub monthly_volume: f64,
    pub fraud_level: f64,
}

impl TransactionContext {
    pub fn assemble(
        tx: &Transaction,
        profile: &MerchantProfile,
        stats: &PeriodAggregate,
    ) -> Self {
        Self {
            scheme: tx.scheme.clone(),
            is_credit: tx.is_credit,
            aci: tx.aci.clone(),
            intracountry: tx.intracountry(),
            amount: tx.amount,
            account_type: profile.account_type.clone(),
            category_code: profile.category_code,
            capture_delay: profile.capture_delay.clone(),
            monthly_volume: stats.total_volume,
            fraud_level: stats.fraud_ratio,
        }
    }
}

/// Outcome of resolving one transaction against the catalog.
///
/// `NoMatchingRule` is an ordinary value, never an error: the caller decides
/// whether it is a data-integrity problem or an acceptable gap, and it is
/// never collapsed into a zero fee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Matched { rule_id: RuleId, fee: f64 },
    NoMatchingRule,
}

/// Per-transaction result emitted by the batch driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeAssessment {
    pub transaction_id: ModelId,
    #[serde(flatten)]
    pub resolution: Resolution,
}
