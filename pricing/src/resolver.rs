use crate::catalog::{Rule, RuleCatalog};
use crate::matcher;
use crate::model::TransactionContext;

/// `fixed + rate * amount / 10_000`.
///
/// `rate` is an integer per-ten-thousand multiplier and the scaling is
/// applied exactly once, here.
pub fn compute_fee(amount: f64, rule: &Rule) -> f64 {
    rule.fixed_amount + rule.rate as f64 * amount / 10_000.0
}

/// A matched rule with its computed fee.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a> {
    pub rule: &'a Rule,
    pub fee: f64,
}

/// First matching rule in catalog order, if any.
///
/// The catalog's declaration order is the precedence contract: earlier rules
/// win. Stateless and idempotent; resolving the same context against the
/// same catalog always returns the same rule and fee.
pub fn resolve<'a>(ctx: &TransactionContext, catalog: &'a RuleCatalog) -> Option<RuleMatch<'a>> {
    catalog
        .rules()
        .iter()
        .find(|rule| matcher::matches(rule, ctx))
        .map(|rule| RuleMatch {
            rule,
            fee: compute_fee(ctx.amount, rule),
        })
}

/// Every matching rule, in catalog order.
pub fn resolve_all<'a>(ctx: &TransactionContext, catalog: &'a RuleCatalog) -> Vec<RuleMatch<'a>> {
    catalog
        .rules()
        .iter()
        .filter(|rule| matcher::matches(rule, ctx))
        .map(|rule| RuleMatch {
            rule,
            fee: compute_fee(ctx.amount, rule),
        })
        .collect()
}
