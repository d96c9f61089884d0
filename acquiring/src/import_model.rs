use chrono::{DateTime, Utc};
use serde::Deserialize;

use pricing::model::{CaptureDelay, MerchantProfile, Transaction};

/// Validation pass for raw imported records.
pub trait Importable {
    fn validate(&self) -> Result<(), String>;
}

/// One payment row from the upstream export.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub psp_reference: i64,
    pub merchant: String,
    pub card_scheme: String,
    pub eur_amount: f64,
    pub is_credit: bool,
    pub aci: String,
    pub issuing_country: String,
    pub acquirer_country: String,
    pub has_fraudulent_dispute: bool,
    pub created_at: DateTime<Utc>,
}

impl Importable for PaymentRecord {
    fn validate(&self) -> Result<(), String> {
        if self.merchant.trim().is_empty() {
            return Err(format!("payment {} has no merchant", self.psp_reference));
        }
        if self.eur_amount < 0.0 {
            return Err(format!(
                "payment {} has a negative amount {}",
                self.psp_reference, self.eur_amount
            ));
        }
        if self.issuing_country.len() != 2 || self.acquirer_country.len() != 2 {
            return Err(format!(
                "payment {} has malformed country codes",
                self.psp_reference
            ));
        }
        Ok(())
    }
}

impl From<PaymentRecord> for Transaction {
    fn from(record: PaymentRecord) -> Self {
        Transaction {
            id: record.psp_reference,
            merchant: record.merchant,
            scheme: record.card_scheme,
            amount: record.eur_amount,
            is_credit: record.is_credit,
            aci: record.aci,
            issuing_country: record.issuing_country,
            acquiring_country: record.acquirer_country,
            fraudulent: record.has_fraudulent_dispute,
            created_at: record.created_at,
        }
    }
}

/// One merchant profile row.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantRecord {
    pub merchant: String,
    pub account_type: String,
    pub merchant_category_code: i64,
    pub capture_delay: String,
}

impl Importable for MerchantRecord {
    fn validate(&self) -> Result<(), String> {
        if self.merchant.trim().is_empty() {
            return Err("merchant record has no merchant name".to_string());
        }
        if self.account_type.trim().is_empty() {
            return Err(format!("merchant {} has no account type", self.merchant));
        }
        Ok(())
    }
}

impl From<MerchantRecord> for MerchantProfile {
    fn from(record: MerchantRecord) -> Self {
        MerchantProfile {
            merchant: record.merchant,
            account_type: record.account_type,
            category_code: record.merchant_category_code,
            capture_delay: CaptureDelay::parse(&record.capture_delay),
        }
    }
}
