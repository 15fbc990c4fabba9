//! Property-based tests for float arithmetic and conversion.

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use proptest::prelude::*;

    use crate::{Float, Rounding};

    // Finite, nonzero doubles across a wide exponent span
    fn regular_f64() -> impl Strategy<Value = f64> {
        (1.0f64..2.0, -300i32..300, any::<bool>())
            .prop_map(|(m, e, neg)| if neg { -m * 2f64.powi(e) } else { m * 2f64.powi(e) })
    }

    fn precision() -> impl Strategy<Value = u32> {
        2u32..400
    }

    fn rounding() -> impl Strategy<Value = Rounding> {
        prop::sample::select(Rounding::ALL.to_vec())
    }

    fn base() -> impl Strategy<Value = i32> {
        prop::sample::select(vec![2, 3, 8, 10, 16, 36, 62])
    }

    proptest! {
        // Text conversion

        #[test]
        fn string_round_trip(v in regular_f64(), prec in precision(), base in base()) {
            let x = Float::with_val(prec, v);
            let text = x.to_string_radix(base, 0).unwrap();
            let back = Float::parse_radix(&text, base, prec).unwrap();
            prop_assert_eq!(back, x);
        }

        #[test]
        fn default_display_round_trips(v in regular_f64()) {
            let x = Float::with_val(53, v);
            let back: Float = x.to_string().parse().unwrap();
            prop_assert_eq!(back.to_f64(), v);
        }

        // Identities hold exactly whatever the rounding

        #[test]
        fn additive_identity(v in regular_f64(), prec in precision(), mode in rounding()) {
            let x = Float::with_val(prec, v);
            let mut out = Float::with_precision(prec).with_rounding(mode);
            let status = Float::op_add(&mut out, &x, &Float::with_precision(prec));
            prop_assert_eq!(status, Ordering::Equal);
            prop_assert_eq!(out, x);
        }

        #[test]
        fn multiplicative_identity(v in regular_f64(), prec in precision(), mode in rounding()) {
            let x = Float::with_val(prec, v);
            let mut out = Float::with_precision(prec).with_rounding(mode);
            let status = Float::op_mul(&mut out, &x, 1.0);
            prop_assert_eq!(status, Ordering::Equal);
            prop_assert_eq!(out, x);
        }

        #[test]
        fn directed_rounding_brackets(a in regular_f64(), b in regular_f64(), prec in 2u32..64) {
            let (a, b) = (Float::with_val(64, a), Float::with_val(64, b));
            let mut down = Float::with_precision(prec).with_rounding(Rounding::TowardNegative);
            let mut up = Float::with_precision(prec).with_rounding(Rounding::TowardPositive);
            let low = Float::op_div(&mut down, &a, &b);
            let high = Float::op_div(&mut up, &a, &b);
            prop_assert!(down <= up);
            prop_assert_ne!(low, Ordering::Greater);
            prop_assert_ne!(high, Ordering::Less);
        }

        // Predicates

        #[test]
        fn nan_compares_false(v in regular_f64()) {
            let x = Float::with_val(64, v);
            let nan = Float::nan(64);
            prop_assert!(Float::op_unordered_p(&x, &nan));
            prop_assert!(!Float::op_equal_p(&x, &nan));
            prop_assert!(!Float::op_less_p(&x, &nan));
            prop_assert!(!Float::op_greater_p(&nan, &x));
            prop_assert!(x.partial_cmp(&nan).is_none());
        }

        #[test]
        fn total_order_agrees_with_numeric_order(a in regular_f64(), b in regular_f64()) {
            let (x, y) = (Float::with_val(64, a), Float::with_val(64, b));
            prop_assert_eq!(Some(x.total_cmp(&y)), x.partial_cmp(&y));
            prop_assert_eq!(x.total_cmp(&y), y.total_cmp(&x).reverse());
        }

        #[test]
        fn sum_matches_exact_integer_sum(values in prop::collection::vec(-1_000_000i32..1_000_000, 0..20)) {
            let floats: Vec<Float> = values.iter().map(|&v| Float::with_val(64, f64::from(v))).collect();
            let mut out = Float::with_precision(64);
            prop_assert_eq!(Float::op_sum(&mut out, &floats), Ok(Ordering::Equal));
            let expected: i64 = values.iter().map(|&v| i64::from(v)).sum();
            prop_assert_eq!(out.to_i64(), expected);
        }
    }
}
