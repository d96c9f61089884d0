use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use common::config::ProcessorConfig;

use crate::aggregate::AggregateIndex;
use crate::catalog::RuleCatalog;
use crate::model::{FeeAssessment, MerchantProfile, Resolution, Transaction, TransactionContext};
use crate::resolver;

/// Source of merchant static profiles.
#[async_trait]
pub trait MerchantDirectory: Send + Sync {
    async fn profile(
        &self,
        merchant: &str,
    ) -> Result<Option<MerchantProfile>, Box<dyn Error + Send + Sync>>;
}

/// Directory backed by a map loaded up front.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    profiles: HashMap<String, MerchantProfile>,
}

impl InMemoryDirectory {
    pub fn new(profiles: impl IntoIterator<Item = MerchantProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.merchant.clone(), profile))
                .collect(),
        }
    }
}

#[async_trait]
impl MerchantDirectory for InMemoryDirectory {
    async fn profile(
        &self,
        merchant: &str,
    ) -> Result<Option<MerchantProfile>, Box<dyn Error + Send + Sync>> {
        Ok(self.profiles.get(merchant).cloned())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("merchant {merchant:?} has no profile")]
    UnknownMerchant { merchant: String },

    #[error("merchant directory failure: {0}")]
    Directory(#[source] Box<dyn Error + Send + Sync>),
}

/// Batch resolution driver.
///
/// Holds immutable snapshots of the catalog, the merchant directory and the
/// aggregate index. Individual transactions resolve independently, so a
/// batch fans out across `workers` concurrent assessments with no
/// synchronization beyond the snapshot handoff.
pub struct FeeProcessor {
    catalog: Arc<RuleCatalog>,
    directory: Arc<dyn MerchantDirectory>,
    aggregates: Arc<AggregateIndex>,
    workers: usize,
}

impl FeeProcessor {
    pub fn new(
        config: &ProcessorConfig,
        catalog: Arc<RuleCatalog>,
        directory: Arc<dyn MerchantDirectory>,
        aggregates: Arc<AggregateIndex>,
    ) -> Self {
        let workers = config.workers.max(1);
        info!("Initializing fee processor with {} workers", workers);
        Self {
            catalog,
            directory,
            aggregates,
            workers,
        }
    }

    /// Resolve a single transaction.
    ///
    /// An unknown merchant is an infrastructure error; a transaction no
    /// catalog rule covers is an ordinary `Resolution::NoMatchingRule`.
    pub async fn assess(&self, tx: &Transaction) -> Result<FeeAssessment, ProcessError> {
        debug!("Assessing transaction {}", tx.id);

        let profile = self
            .directory
            .profile(&tx.merchant)
            .await
            .map_err(ProcessError::Directory)?
            .ok_or_else(|| ProcessError::UnknownMerchant {
                merchant: tx.merchant.clone(),
            })?;

        let stats = self.aggregates.get(&tx.merchant, tx.period());
        let ctx = TransactionContext::assemble(tx, &profile, &stats);

        let resolution = match resolver::resolve(&ctx, &self.catalog) {
            Some(matched) => {
                debug!(
                    "Transaction {} matched rule {} (fee {:.4})",
                    tx.id, matched.rule.id, matched.fee
                );
                Resolution::Matched {
                    rule_id: matched.rule.id,
                    fee: matched.fee,
                }
            }
            None => {
                warn!("Transaction {} matched no catalog rule", tx.id);
                Resolution::NoMatchingRule
            }
        };

        Ok(FeeAssessment {
            transaction_id: tx.id,
            resolution,
        })
    }

    /// Resolve a batch; results come back in input order.
    pub async fn assess_batch(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<FeeAssessment>, ProcessError> {
        info!("Assessing batch of {} transactions", transactions.len());

        stream::iter(transactions)
            .map(|tx| self.assess(tx))
            .buffered(self.workers)
            .try_collect()
            .await
    }
}
