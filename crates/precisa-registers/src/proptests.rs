//! Property-based tests for the register pool.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Register, RegisterPool};

    #[derive(Clone, Debug)]
    enum Step {
        Adopt(i32),
        Release(usize),
    }

    fn steps() -> impl Strategy<Value = Vec<Step>> {
        prop::collection::vec(
            prop_oneof![
                (-1000i32..1000).prop_map(Step::Adopt),
                any::<usize>().prop_map(Step::Release),
            ],
            0..200,
        )
    }

    proptest! {
        #[test]
        fn live_registers_keep_their_values(steps in steps()) {
            let mut pool = RegisterPool::new(64);
            let mut live: Vec<(Register, i32)> = Vec::new();

            for step in steps {
                match step {
                    Step::Adopt(v) => live.push((pool.adopt_value(f64::from(v)), v)),
                    Step::Release(i) if !live.is_empty() => {
                        let (reg, _) = live.swap_remove(i % live.len());
                        pool.release(reg);
                    }
                    Step::Release(_) => {}
                }
                prop_assert_eq!(pool.active_count(), live.len());
                for (reg, v) in &live {
                    prop_assert_eq!(pool.get(reg).to_f64(), f64::from(*v));
                }
            }

            let peak = pool.capacity();
            for (reg, _) in live {
                pool.release(reg);
            }
            prop_assert_eq!(pool.active_count(), 0);
            prop_assert_eq!(pool.allocation_count(), peak as u64);
        }

        #[test]
        fn depth_one_loops_allocate_one_slot(n in 1usize..500) {
            let mut pool = RegisterPool::new(32);
            for i in 0..n {
                let r = pool.adopt_value(i as f64);
                pool.release(r);
            }
            prop_assert_eq!(pool.allocation_count(), 1);
            prop_assert_eq!(pool.active_count(), 0);
        }

        #[test]
        fn balanced_chains_return_to_zero(values in prop::collection::vec(-100.0f64..100.0, 1..30)) {
            let mut pool = RegisterPool::new(64);
            let mut acc = pool.adopt_value(values[0]);
            for &v in &values[1..] {
                let term = pool.mul(v, v);
                acc = pool.add(acc, term);
            }
            prop_assert!(pool.active_count() == 1);
            let _ = pool.into_float(acc);
            prop_assert_eq!(pool.active_count(), 0);
            prop_assert!(pool.allocation_count() <= 2);
        }
    }
}
