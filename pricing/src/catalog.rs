use serde::Deserialize;
use strum_macros::Display;
use thiserror::Error;
use tracing::info;

use crate::condition::{self, Condition, ConditionError, FieldKind};

pub type RuleId = i64;

/// Rule-matching dimensions a catalog rule may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    CardScheme,
    AccountType,
    CategoryCode,
    CaptureDelay,
    MonthlyVolume,
    FraudLevel,
    IsCredit,
    Aci,
    Intracountry,
}

/// Raw catalog entry as supplied by the upstream rule source.
///
/// Every dimension is optional; an absent or null dimension is a wildcard
/// that matches any transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRecord {
    pub id: RuleId,
    #[serde(default)]
    pub card_scheme: Option<String>,
    #[serde(default)]
    pub account_type: Option<Vec<String>>,
    #[serde(default)]
    pub capture_delay: Option<String>,
    #[serde(default)]
    pub monthly_fraud_level: Option<String>,
    #[serde(default)]
    pub monthly_volume: Option<String>,
    #[serde(default)]
    pub merchant_category_code: Option<Vec<i64>>,
    #[serde(default)]
    pub is_credit: Option<bool>,
    #[serde(default)]
    pub aci: Option<Vec<String>>,
    pub fixed_amount: f64,
    pub rate: i64,
    #[serde(default)]
    pub intracountry: Option<bool>,
}

/// A compiled rule: fee parameters plus the declared conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: RuleId,
    pub fixed_amount: f64,
    pub rate: i64,
    conditions: Vec<(Field, Condition)>,
}

impl Rule {
    pub fn new(
        id: RuleId,
        fixed_amount: f64,
        rate: i64,
        conditions: Vec<(Field, Condition)>,
    ) -> Self {
        Self {
            id,
            fixed_amount,
            rate,
            conditions,
        }
    }

    pub fn conditions(&self) -> &[(Field, Condition)] {
        &self.conditions
    }

    pub fn condition(&self, field: Field) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| c)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule {rule_id}, field {field}: {source}")]
    InvalidCondition {
        rule_id: RuleId,
        field: Field,
        #[source]
        source: ConditionError,
    },
}

/// Immutable, order-preserving rule catalog.
///
/// Iteration order is the declaration order of the source records; the
/// resolver's first-match-wins contract is defined over exactly this order.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Compile raw records into matchable rules.
    ///
    /// Any malformed condition string aborts compilation with the offending
    /// rule and field named; a catalog loads whole or not at all.
    pub fn compile(records: Vec<RuleRecord>) -> Result<Self, CatalogError> {
        let mut rules = Vec::with_capacity(records.len());
        for record in records {
            rules.push(compile_rule(record)?);
        }
        info!("Compiled {} catalog rules", rules.len());

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }
}

fn compile_rule(record: RuleRecord) -> Result<Rule, CatalogError> {
    let mut conditions = Vec::new();

    if let Some(scheme) = record.card_scheme {
        conditions.push((Field::CardScheme, Condition::Exact(scheme)));
    }
    if let Some(account_types) = record.account_type {
        conditions.push((Field::AccountType, Condition::AnyOf(account_types)));
    }
    if let Some(codes) = record.merchant_category_code {
        conditions.push((Field::CategoryCode, Condition::Codes(codes)));
    }
    if let Some(raw) = record.capture_delay.as_deref() {
        if let Some(cond) = parse_condition(record.id, Field::CaptureDelay, FieldKind::Delay, raw)? {
            conditions.push((Field::CaptureDelay, cond));
        }
    }
    if let Some(raw) = record.monthly_volume.as_deref() {
        if let Some(cond) = parse_condition(record.id, Field::MonthlyVolume, FieldKind::Volume, raw)?
        {
            conditions.push((Field::MonthlyVolume, cond));
        }
    }
    if let Some(raw) = record.monthly_fraud_level.as_deref() {
        if let Some(cond) = parse_condition(record.id, Field::FraudLevel, FieldKind::Ratio, raw)? {
            conditions.push((Field::FraudLevel, cond));
        }
    }
    if let Some(flag) = record.is_credit {
        conditions.push((Field::IsCredit, Condition::Flag(flag)));
    }
    if let Some(acis) = record.aci {
        conditions.push((Field::Aci, Condition::AnyOf(acis)));
    }
    if let Some(flag) = record.intracountry {
        conditions.push((Field::Intracountry, Condition::Flag(flag)));
    }

    Ok(Rule::new(
        record.id,
        record.fixed_amount,
        record.rate,
        conditions,
    ))
}

fn parse_condition(
    rule_id: RuleId,
    field: Field,
    kind: FieldKind,
    raw: &str,
) -> Result<Option<Condition>, CatalogError> {
    condition::parse(kind, raw).map_err(|source| CatalogError::InvalidCondition {
        rule_id,
        field,
        source,
    })
}
