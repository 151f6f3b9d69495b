use super::budget::{Budget, BudgetStatus};
use super::format::format_thousands;
use crate::models::ModelSpec;

#[test]
fn format_thousands_groups_digits() {
    assert_eq!(format_thousands(0), "0");
    assert_eq!(format_thousands(999), "999");
    assert_eq!(format_thousands(1_000), "1,000");
    assert_eq!(format_thousands(128_000), "128,000");
    assert_eq!(format_thousands(1_234_567), "1,234,567");
}

#[test]
fn budget_at_limit_is_exhausted() {
    let model = ModelSpec::new("test", 100);
    let budget = Budget::compute(&model, 60, 30, 10).unwrap();
    assert_eq!(budget.total_token_used, 100);
    assert_eq!(budget.utilization, 100.0);
    assert_eq!(budget.status, BudgetStatus::Exception);
    assert!(!budget.can_submit());
    assert_eq!(budget.remaining(), 0);
}

#[test]
fn budget_below_limit_is_active() {
    let model = ModelSpec::new("test", 100);
    let budget = Budget::compute(&model, 60, 29, 10).unwrap();
    assert_eq!(budget.utilization, 99.0);
    assert!(budget.can_submit());
    assert_eq!(budget.remaining(), 1);
}

#[test]
fn budget_rejects_zero_max_tokens() {
    let model = ModelSpec::new("broken", 0);
    assert!(Budget::compute(&model, 0, 0, 0).is_err());
}

#[test]
fn budget_summary_uses_separators() {
    let model = ModelSpec::new("GPT-4", 8_192);
    let budget = Budget::compute(&model, 1_000, 200, 34).unwrap();
    assert_eq!(budget.summary(&model.name), "Token used: 1,234 / 8,192 (GPT-4)");
}
