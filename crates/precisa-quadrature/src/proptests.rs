//! Property-based tests for the quadrature engine.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use precisa_float::Float;

    use crate::TanhSinh;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn monomials_integrate_exactly(n in 0i32..8, b in 0.25f64..4.0) {
            let mut engine = TanhSinh::new(53);
            engine.set_integrand(move |out: &mut Float, x: &Float, _: &Float| {
                out.assign(x);
                out.pow_si_mut(n);
            });
            engine.set_bounds(0.0, b);
            engine.compile().unwrap();
            engine.integrate().unwrap();

            let exact = b.powi(n + 1) / f64::from(n + 1);
            let got = engine.integral_approx().to_f64();
            prop_assert!(engine.is_convergent_error());
            prop_assert!((got - exact).abs() <= 1e-13 * exact.abs().max(1.0), "{got} vs {exact}");
        }

        #[test]
        fn swapping_bounds_negates(a in -3.0f64..3.0, b in -3.0f64..3.0) {
            prop_assume!(a != b);
            let mut engine = TanhSinh::new(53);
            engine.set_integrand(|out: &mut Float, x: &Float, _: &Float| {
                Float::op_cos(out, x);
            });
            engine.compile().unwrap();

            engine.set_bounds(a, b);
            engine.integrate().unwrap();
            let forward = engine.integral_approx().clone();
            let forward_calls = engine.integrand_call_count();

            engine.set_bounds(b, a);
            engine.integrate().unwrap();
            prop_assert_eq!(engine.integral_approx().to_f64(), -forward.to_f64());
            prop_assert_eq!(engine.integrand_call_count(), forward_calls);
        }

        #[test]
        fn splitting_the_interval_adds_up(a in -2.0f64..0.0, m in 0.0f64..1.0, b in 1.0f64..3.0) {
            let mut engine = TanhSinh::new(53);
            engine.set_integrand(|out: &mut Float, x: &Float, _: &Float| {
                Float::op_exp(out, x);
            });
            engine.compile().unwrap();

            let mut integrate = |lo: f64, hi: f64| {
                engine.set_bounds(lo, hi);
                engine.integrate().unwrap();
                engine.integral_approx().to_f64()
            };
            let whole = integrate(a, b);
            let parts = integrate(a, m) + integrate(m, b);
            prop_assert!((whole - parts).abs() <= 1e-13 * whole.abs());
        }
    }
}
