use std::error::Error;

use async_trait::async_trait;
use mockall::mock;

use pricing::model::{CaptureDelay, MerchantProfile, Transaction};
use pricing::processor::MerchantDirectory;

mock! {
    pub MerchantDirectory {}

    #[async_trait]
    impl MerchantDirectory for MerchantDirectory {
        async fn profile(
            &self,
            merchant: &str,
        ) -> Result<Option<MerchantProfile>, Box<dyn Error + Send + Sync>>;
    }
}

pub fn payment(id: i64, merchant: &str, amount: f64, created_at: &str) -> Transaction {
    Transaction {
        id,
        merchant: merchant.to_string(),
        scheme: "TransactPlus".to_string(),
        amount,
        is_credit: true,
        aci: "C".to_string(),
        issuing_country: "NL".to_string(),
        acquiring_country: "NL".to_string(),
        fraudulent: false,
        created_at: created_at.parse().unwrap(),
    }
}

pub fn profile(merchant: &str) -> MerchantProfile {
    MerchantProfile {
        merchant: merchant.to_string(),
        account_type: "R".to_string(),
        category_code: 5734,
        capture_delay: CaptureDelay::Days(1.0),
    }
}
