use dough::{allocate, discount, Money};
use proptest::collection::vec;
use proptest::prelude::*;

fn total(parts: &[Money]) -> i128 {
    parts.iter().map(|m| i128::from(m.as_i64())).sum()
}

proptest! {
    #[test]
    fn allocations_sum_to_amount(amount in any::<i64>(), weights in vec(any::<u64>(), 1..12)) {
        let parts = allocate(Money(amount), &weights).unwrap();
        prop_assert_eq!(parts.len(), weights.len());
        prop_assert_eq!(total(&parts), i128::from(amount));
    }

    #[test]
    fn small_weights_sum_to_amount(amount in -1_000_000i64..1_000_000, weights in vec(0u64..20, 1..40)) {
        let parts = allocate(Money(amount), &weights).unwrap();
        prop_assert_eq!(total(&parts), i128::from(amount));
    }

    #[test]
    fn all_zero_weights_split_evenly(amount in any::<i64>(), n in 1usize..30) {
        let zeros = allocate(Money(amount), &vec![0; n]).unwrap();
        let ones = allocate(Money(amount), &vec![1; n]).unwrap();
        prop_assert_eq!(zeros, ones);
    }

    #[test]
    fn zero_weight_parties_get_nothing(
        amount in any::<i64>(),
        weights in vec(prop_oneof![Just(0u64), 1u64..1_000], 2..16)
    ) {
        prop_assume!(weights.iter().any(|&w| w > 0));
        let parts = allocate(Money(amount), &weights).unwrap();
        for (w, part) in weights.iter().zip(&parts) {
            if *w == 0 {
                prop_assert_eq!(*part, Money::ZERO);
            }
        }
    }

    #[test]
    fn allocations_never_cross_zero(amount in any::<i64>(), weights in vec(any::<u64>(), 1..12)) {
        let parts = allocate(Money(amount), &weights).unwrap();
        if amount >= 0 {
            prop_assert!(parts.iter().all(|m| m.as_i64() >= 0), "{:?}", parts);
        } else {
            prop_assert!(parts.iter().all(|m| m.as_i64() <= 0), "{:?}", parts);
        }
    }

    #[test]
    fn negation_mirrors_allocation(amount in -1_000_000_000i64..1_000_000_000, weights in vec(0u64..1_000, 1..12)) {
        let pos = allocate(Money(amount), &weights).unwrap();
        let neg = allocate(Money(-amount), &weights).unwrap();
        let mirrored: Vec<Money> = pos.iter().map(|m| -*m).collect();
        prop_assert_eq!(neg, mirrored);
    }

    #[test]
    fn allocation_is_deterministic(amount in any::<i64>(), weights in vec(any::<u64>(), 1..12)) {
        let first = allocate(Money(amount), &weights).unwrap();
        let second = allocate(Money(amount), &weights).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn shares_stay_within_one_unit_of_exact(amount in -1_000_000i64..1_000_000, weights in vec(1u64..100, 1..10)) {
        let sum: i128 = weights.iter().map(|&w| i128::from(w)).sum();
        let parts = allocate(Money(amount), &weights).unwrap();
        for (w, part) in weights.iter().zip(&parts) {
            let exact_trunc = i128::from(amount) * i128::from(*w) / sum;
            let diff = i128::from(part.as_i64()) - exact_trunc;
            prop_assert!(diff.abs() <= 1, "part {} vs truncated {}", part, exact_trunc);
        }
    }

    #[test]
    fn discount_parts_sum_to_amount(amount in any::<i64>(), pct in 0i64..=100) {
        let d = discount(Money(amount), pct).unwrap();
        prop_assert_eq!(
            i128::from(d.discounted.as_i64()) + i128::from(d.saved.as_i64()),
            i128::from(amount)
        );
    }

    #[test]
    fn discount_rejects_out_of_range(amount in any::<i64>(), pct in prop_oneof![i64::MIN..0, 101i64..]) {
        let err = discount(Money(amount), pct).unwrap_err();
        prop_assert!(err.is_invalid_argument());
    }
}
