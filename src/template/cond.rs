//! Conditional evaluation.
//!
//! A conditional tests the field's post-filter, post-replacement value list
//! against the rendered right-hand side candidates. The test passes when
//! any (value, candidate) pair satisfies the operator; `not` inverts the
//! final result. Ordering and (in)equality operators compare numerically
//! when both operands parse as numbers, and lexicographically otherwise.

use std::cmp::Ordering;

use super::ast::{Cond, CondOp};

impl Cond {
    /// Evaluate the conditional for `lhs` against the rendered `rhs`
    /// candidates.
    pub(crate) fn evaluate(&self, lhs: &[String], rhs: &[String]) -> bool {
        let matched = lhs
            .iter()
            .any(|value| rhs.iter().any(|candidate| self.op.test(value, candidate)));
        matched != self.negated
    }
}

impl CondOp {
    fn test(&self, value: &str, candidate: &str) -> bool {
        match self {
            CondOp::Contains => value.contains(candidate),
            CondOp::Matches => value == candidate,
            CondOp::StartsWith => value.starts_with(candidate),
            CondOp::EndsWith => value.ends_with(candidate),
            CondOp::Eq => compare(value, candidate) == Ordering::Equal,
            CondOp::Ne => compare(value, candidate) != Ordering::Equal,
            CondOp::Lt => compare(value, candidate) == Ordering::Less,
            CondOp::Gt => compare(value, candidate) == Ordering::Greater,
            CondOp::Le => compare(value, candidate) != Ordering::Greater,
            CondOp::Ge => compare(value, candidate) != Ordering::Less,
        }
    }
}

/// Numeric comparison when both operands parse as numbers, string
/// comparison otherwise.
fn compare(value: &str, candidate: &str) -> Ordering {
    if let (Ok(a), Ok(b)) = (value.parse::<f64>(), candidate.parse::<f64>()) {
        if let Some(ordering) = a.partial_cmp(&b) {
            return ordering;
        }
    }
    value.cmp(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(op: CondOp, negated: bool) -> Cond {
        Cond {
            negated,
            op,
            rhs: Vec::new(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn contains_is_substring() {
        let c = cond(CondOp::Contains, false);
        assert!(c.evaluate(&strings(&["BeachDay", "sun"]), &strings(&["each"])));
        assert!(!c.evaluate(&strings(&["sun"]), &strings(&["moon"])));
    }

    #[test]
    fn matches_is_full_equality() {
        let c = cond(CondOp::Matches, false);
        assert!(c.evaluate(&strings(&["Foo", "Bar"]), &strings(&["Foo"])));
        assert!(!c.evaluate(&strings(&["Foo"]), &strings(&["Fo"])));
    }

    #[test]
    fn affix_operators() {
        assert!(cond(CondOp::StartsWith, false)
            .evaluate(&strings(&["fizz buzz"]), &strings(&["fizz"])));
        assert!(cond(CondOp::EndsWith, false)
            .evaluate(&strings(&["fizz buzz"]), &strings(&["buzz"])));
    }

    #[test]
    fn any_pair_semantics() {
        let c = cond(CondOp::StartsWith, false);
        assert!(c.evaluate(&strings(&["fizz buzz"]), &strings(&["buzz", "fizz"])));
    }

    #[test]
    fn negation_inverts() {
        let c = cond(CondOp::Contains, true);
        assert!(!c.evaluate(&strings(&["Foo"]), &strings(&["Foo"])));
        assert!(c.evaluate(&strings(&["Foo"]), &strings(&["X"])));
    }

    #[test]
    fn numeric_comparisons() {
        assert!(cond(CondOp::Lt, false).evaluate(&strings(&["50"]), &strings(&["100"])));
        assert!(cond(CondOp::Le, false).evaluate(&strings(&["42"]), &strings(&["42"])));
        assert!(cond(CondOp::Ge, false).evaluate(&strings(&["42"]), &strings(&["40"])));
        assert!(!cond(CondOp::Gt, false).evaluate(&strings(&["42"]), &strings(&["43"])));
        assert!(cond(CondOp::Eq, false).evaluate(&strings(&["42"]), &strings(&["42.0"])));
        assert!(cond(CondOp::Ne, false).evaluate(&strings(&["42"]), &strings(&["41"])));
    }

    #[test]
    fn string_comparison_when_not_numeric() {
        // "50" < "100" numerically, but "9" > "100" lexicographically when
        // one side is not a number.
        assert!(cond(CondOp::Gt, false).evaluate(&strings(&["9a"]), &strings(&["100"])));
        assert!(cond(CondOp::Lt, false).evaluate(&strings(&["apple"]), &strings(&["banana"])));
    }
}
