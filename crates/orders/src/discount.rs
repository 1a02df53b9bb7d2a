//! Composable discount policy.
//!
//! A fixed, process-configured set of rules is evaluated uniformly: each
//! rule independently decides applicability and contributes an amount, and
//! the contributions are summed. Rules compose additively: a premium
//! requester over the volume threshold receives both discounts, not the
//! larger of the two.
//!
//! Rounding granularity (kept consistent on purpose, since it affects
//! penny-level totals when combining rules): each rule rounds its own
//! output half-up to the cent; the sum of integer cents is exact, so the
//! aggregate needs no second rounding.

use common::{Money, Role};

/// A single discount rule: a pure function of (subtotal, role).
///
/// Implementations must be deterministic and side-effect free; the policy
/// is shared across concurrent placements without synchronization.
pub trait DiscountRule: Send + Sync {
    /// Rule name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this rule contributes to the given order.
    fn is_applicable(&self, subtotal: Money, role: Role) -> bool;

    /// The contributed amount; non-negative, rounded to the cent.
    fn amount(&self, subtotal: Money, role: Role) -> Money;
}

/// Zero contribution for the default role, so the rule set is never empty
/// for regular customers.
struct BaselineRule;

impl DiscountRule for BaselineRule {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn is_applicable(&self, _subtotal: Money, role: Role) -> bool {
        role == Role::Customer
    }

    fn amount(&self, _subtotal: Money, _role: Role) -> Money {
        Money::zero()
    }
}

/// Percentage off every order placed by the preferential tier.
struct TierRule {
    rate_bp: i64,
}

impl DiscountRule for TierRule {
    fn name(&self) -> &'static str {
        "premium-tier"
    }

    fn is_applicable(&self, _subtotal: Money, role: Role) -> bool {
        role == Role::Premium
    }

    fn amount(&self, subtotal: Money, _role: Role) -> Money {
        subtotal.percentage_bp(self.rate_bp)
    }
}

/// Percentage off orders whose subtotal strictly exceeds a threshold,
/// regardless of role.
struct VolumeRule {
    threshold: Money,
    rate_bp: i64,
}

impl DiscountRule for VolumeRule {
    fn name(&self) -> &'static str {
        "high-volume"
    }

    fn is_applicable(&self, subtotal: Money, _role: Role) -> bool {
        subtotal > self.threshold
    }

    fn amount(&self, subtotal: Money, _role: Role) -> Money {
        subtotal.percentage_bp(self.rate_bp)
    }
}

/// Process-level configuration for the reference rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountConfig {
    /// Premium tier rate in basis points.
    pub premium_rate_bp: i64,
    /// Subtotal above which the volume rule applies (strictly).
    pub volume_threshold: Money,
    /// Volume rate in basis points.
    pub volume_rate_bp: i64,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            premium_rate_bp: 1000,                     // 10%
            volume_threshold: Money::from_cents(50_000), // $500.00
            volume_rate_bp: 500,                       // 5%
        }
    }
}

/// The discount policy engine: an ordered, immutable rule set.
pub struct DiscountPolicy {
    rules: Vec<Box<dyn DiscountRule>>,
}

impl DiscountPolicy {
    /// Builds the reference rule set (baseline, tier, volume) from config.
    pub fn new(config: DiscountConfig) -> Self {
        Self {
            rules: vec![
                Box::new(BaselineRule),
                Box::new(TierRule {
                    rate_bp: config.premium_rate_bp,
                }),
                Box::new(VolumeRule {
                    threshold: config.volume_threshold,
                    rate_bp: config.volume_rate_bp,
                }),
            ],
        }
    }

    /// Builds a policy from an arbitrary rule set.
    pub fn with_rules(rules: Vec<Box<dyn DiscountRule>>) -> Self {
        Self { rules }
    }

    /// Computes the aggregate discount for a subtotal and requester role.
    ///
    /// Filters rules by applicability, maps each to its amount, and sums.
    pub fn total_discount(&self, subtotal: Money, role: Role) -> Money {
        self.rules
            .iter()
            .filter(|rule| rule.is_applicable(subtotal, role))
            .map(|rule| {
                let amount = rule.amount(subtotal, role);
                tracing::debug!(rule = rule.name(), %amount, %subtotal, "discount rule applied");
                amount
            })
            .sum()
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self::new(DiscountConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> DiscountPolicy {
        DiscountPolicy::default()
    }

    #[test]
    fn test_no_discount_for_customer_under_threshold() {
        let discount = policy().total_discount(Money::from_cents(10_000), Role::Customer);
        assert_eq!(discount, Money::zero());
    }

    #[test]
    fn test_premium_discount_under_threshold() {
        // 10% of $100.00
        let discount = policy().total_discount(Money::from_cents(10_000), Role::Premium);
        assert_eq!(discount.cents(), 1000);
    }

    #[test]
    fn test_volume_discount_for_customer_over_threshold() {
        // 5% of $600.00
        let discount = policy().total_discount(Money::from_cents(60_000), Role::Customer);
        assert_eq!(discount.cents(), 3000);
    }

    #[test]
    fn test_tier_and_volume_compose_additively() {
        // 10% of $600.00 + 5% of $600.00 = $60.00 + $30.00 = $90.00
        let discount = policy().total_discount(Money::from_cents(60_000), Role::Premium);
        assert_eq!(discount.cents(), 9000);
    }

    #[test]
    fn test_admin_gets_only_volume_discount() {
        assert_eq!(
            policy().total_discount(Money::from_cents(10_000), Role::Admin),
            Money::zero()
        );
        assert_eq!(
            policy()
                .total_discount(Money::from_cents(60_000), Role::Admin)
                .cents(),
            3000
        );
    }

    #[test]
    fn test_volume_threshold_is_strict() {
        // Exactly $500.00 does not qualify.
        let at_threshold = policy().total_discount(Money::from_cents(50_000), Role::Customer);
        assert_eq!(at_threshold, Money::zero());

        // One cent above does.
        let above = policy().total_discount(Money::from_cents(50_001), Role::Customer);
        assert_eq!(above.cents(), 2500); // 5% of 50_001 = 2500.05 -> 2500
    }

    #[test]
    fn test_discount_bounded_by_subtotal() {
        let policy = policy();
        for cents in [0i64, 1, 99, 10_000, 50_000, 50_001, 1_000_000] {
            let subtotal = Money::from_cents(cents);
            for role in [Role::Customer, Role::Premium, Role::Admin] {
                let discount = policy.total_discount(subtotal, role);
                assert!(!discount.is_negative());
                assert!(discount <= subtotal, "discount {discount} > subtotal {subtotal}");
            }
        }
    }

    #[test]
    fn test_rule_output_rounds_half_up() {
        // 10% of $0.15 = 1.5 cents, rounds up to 2 cents.
        let discount = policy().total_discount(Money::from_cents(15), Role::Premium);
        assert_eq!(discount.cents(), 2);
    }

    #[test]
    fn test_zero_subtotal_zero_discount() {
        for role in [Role::Customer, Role::Premium, Role::Admin] {
            assert_eq!(policy().total_discount(Money::zero(), role), Money::zero());
        }
    }

    #[test]
    fn test_custom_rule_set() {
        struct FlatRule;
        impl DiscountRule for FlatRule {
            fn name(&self) -> &'static str {
                "flat"
            }
            fn is_applicable(&self, _subtotal: Money, _role: Role) -> bool {
                true
            }
            fn amount(&self, _subtotal: Money, _role: Role) -> Money {
                Money::from_cents(100)
            }
        }

        let policy = DiscountPolicy::with_rules(vec![Box::new(FlatRule), Box::new(FlatRule)]);
        let discount = policy.total_discount(Money::from_cents(1000), Role::Customer);
        assert_eq!(discount.cents(), 200);
    }
}
