use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Transaction;

/// One calendar month of one merchant's activity.
///
/// Period boundaries are calendar months starting on day 1, never a rolling
/// window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

/// Volume and fraud statistics for one (merchant, period) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub total_volume: f64,
    pub fraud_volume: f64,
    pub fraud_ratio: f64,
}

impl PeriodAggregate {
    /// The aggregate of a month with no transactions: all zeros, ratio
    /// included.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_volumes(total_volume: f64, fraud_volume: f64) -> Self {
        // Volume-weighted ratio; an empty month is 0, never NaN.
        let fraud_ratio = if total_volume > 0.0 {
            fraud_volume / total_volume
        } else {
            0.0
        };
        Self {
            total_volume,
            fraud_volume,
            fraud_ratio,
        }
    }
}

/// Compute the aggregate for one merchant over one calendar month.
pub fn aggregate(transactions: &[Transaction], merchant: &str, period: Period) -> PeriodAggregate {
    let mut total_volume = 0.0;
    let mut fraud_volume = 0.0;
    for tx in transactions {
        if tx.merchant != merchant || tx.period() != period {
            continue;
        }
        total_volume += tx.amount;
        if tx.fraudulent {
            fraud_volume += tx.amount;
        }
    }

    PeriodAggregate::from_volumes(total_volume, fraud_volume)
}

/// Pre-computed aggregates for every (merchant, period) seen in a history.
///
/// Built in one pass before matching begins and shared read-only afterwards,
/// so no rule evaluation can observe a partially-updated aggregate.
#[derive(Debug, Clone, Default)]
pub struct AggregateIndex {
    by_merchant: HashMap<String, HashMap<Period, PeriodAggregate>>,
}

impl AggregateIndex {
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut volumes: HashMap<String, HashMap<Period, (f64, f64)>> = HashMap::new();
        for tx in transactions {
            let slot = volumes
                .entry(tx.merchant.clone())
                .or_default()
                .entry(tx.period())
                .or_default();
            slot.0 += tx.amount;
            if tx.fraudulent {
                slot.1 += tx.amount;
            }
        }

        let by_merchant: HashMap<String, HashMap<Period, PeriodAggregate>> = volumes
            .into_iter()
            .map(|(merchant, periods)| {
                let periods = periods
                    .into_iter()
                    .map(|(period, (total, fraud))| {
                        (period, PeriodAggregate::from_volumes(total, fraud))
                    })
                    .collect();
                (merchant, periods)
            })
            .collect();

        debug!("Indexed aggregates for {} merchants", by_merchant.len());
        Self { by_merchant }
    }

    /// Aggregate for a (merchant, period) pair; unseen pairs are empty.
    pub fn get(&self, merchant: &str, period: Period) -> PeriodAggregate {
        self.by_merchant
            .get(merchant)
            .and_then(|periods| periods.get(&period))
            .copied()
            .unwrap_or_else(PeriodAggregate::empty)
    }
}
