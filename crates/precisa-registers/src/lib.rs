//! # precisa-registers
//!
//! Scratch registers for arithmetic on [`precisa_float::Float`] values.
//!
//! Evaluating `(a + b) * c / d` with owned floats allocates a limb buffer
//! for every intermediate. A [`RegisterPool`] keeps those buffers around:
//! intermediates live in pooled [`Register`]s that are handed back with
//! [`RegisterPool::release`] and recycled by the next
//! [`RegisterPool::adopt`]. Once the pool has warmed up, expression
//! chains run without touching the allocator.
//!
//! ```
//! use precisa_float::Float;
//! use precisa_registers::RegisterPool;
//!
//! let mut pool = RegisterPool::new(128);
//! let (a, b, c) = (Float::with_val(128, 1.5), Float::with_val(128, 2.5), Float::with_val(128, 3.0));
//!
//! let sum = pool.add(&a, &b);
//! let product = pool.mul(sum, &c);
//! assert_eq!(pool.get(&product).to_f64(), 12.0);
//! pool.release(product);
//! assert_eq!(pool.active_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod expr;
mod operand;
mod pool;

#[cfg(test)]
mod proptests;

pub use operand::Operand;
pub use pool::{Register, RegisterPool};
