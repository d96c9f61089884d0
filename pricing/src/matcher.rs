use crate::catalog::{Field, Rule};
use crate::condition::Condition;
use crate::model::{CaptureDelay, TransactionContext};

/// Evaluate one rule against one transaction context.
///
/// Every declared condition must hold; evaluation stops at the first failing
/// field. A rule with no conditions matches everything, and a non-match is an
/// ordinary `false`, never an error.
pub fn matches(rule: &Rule, ctx: &TransactionContext) -> bool {
    rule.conditions()
        .iter()
        .all(|(field, condition)| field_matches(*field, condition, ctx))
}

fn field_matches(field: Field, condition: &Condition, ctx: &TransactionContext) -> bool {
    match (field, condition) {
        (Field::CardScheme, Condition::Exact(scheme)) => *scheme == ctx.scheme,
        (Field::AccountType, Condition::AnyOf(types)) => {
            types.is_empty() || types.iter().any(|t| t == &ctx.account_type)
        }
        (Field::CategoryCode, Condition::Codes(codes)) => {
            codes.is_empty() || codes.contains(&ctx.category_code)
        }
        (Field::CaptureDelay, Condition::Exact(keyword)) => match &ctx.capture_delay {
            CaptureDelay::Keyword(value) => value == keyword,
            CaptureDelay::Days(_) => false,
        },
        (Field::CaptureDelay, Condition::Range(range)) => match ctx.capture_delay {
            CaptureDelay::Days(days) => range.contains(days),
            // A day-count condition never matches a keyword setting.
            CaptureDelay::Keyword(_) => false,
        },
        (Field::MonthlyVolume, Condition::Range(range)) => range.contains(ctx.monthly_volume),
        // Fraud levels compare in ratio units; the parser already converted
        // any percentage notation.
        (Field::FraudLevel, Condition::Range(range)) => range.contains(ctx.fraud_level),
        (Field::IsCredit, Condition::Flag(flag)) => *flag == ctx.is_credit,
        (Field::Aci, Condition::AnyOf(acis)) => {
            acis.is_empty() || acis.iter().any(|a| a == &ctx.aci)
        }
        (Field::Intracountry, Condition::Flag(flag)) => *flag == ctx.intracountry,
        // A structurally mismatched pairing is a definite non-match.
        _ => false,
    }
}
