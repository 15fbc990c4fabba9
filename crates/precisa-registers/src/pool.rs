//! The register pool.
//!
//! Physical slots never move once created. A position table splits them
//! into live registers (positions `0..active`) and free ones, so adopting
//! and releasing are O(1) swaps in that table and a [`Register`] keeps
//! naming the same slot however other registers come and go.

use std::fmt;

use precisa_float::{Context, Float, Rounding, Scalar};
use tracing::trace;

/// A live scratch value owned by a [`RegisterPool`].
///
/// Registers are not `Clone`: handing one back to the pool consumes it.
#[must_use = "registers must be released back to their pool"]
pub struct Register {
    slot: u32,
    epoch: u32,
}

impl Register {
    /// Returns the physical slot this register names.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reg({}@{})", self.slot, self.epoch)
    }
}

/// A recycling allocator of scratch [`Float`]s at a fixed precision.
pub struct RegisterPool {
    /// Physical storage; indices are stable.
    slots: Vec<Float>,
    /// Position to slot; positions below `active` are live.
    order: Vec<u32>,
    /// Slot to position; the inverse of `order`.
    positions: Vec<usize>,
    active: usize,
    allocated: u64,
    freed: u64,
    /// Bumped by `clean` so stale registers are caught.
    epoch: u32,
    precision: u32,
    rounding: Rounding,
}

impl RegisterPool {
    /// Creates an empty pool whose registers hold `precision` bits.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero.
    #[must_use]
    pub fn new(precision: u32) -> Self {
        assert!(
            precision >= precisa_float::PRECISION_MIN,
            "register precision must be at least {}",
            precisa_float::PRECISION_MIN
        );
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            positions: Vec::new(),
            active: 0,
            allocated: 0,
            freed: 0,
            epoch: 0,
            precision,
            rounding: Context::default_rounding(),
        }
    }

    /// Returns the precision of every register.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the rounding mode given to adopted registers.
    #[must_use]
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Sets the rounding mode for registers adopted from now on.
    pub fn set_rounding(&mut self, rounding: Rounding) {
        self.rounding = rounding;
    }

    /// Adopts a register holding `+0`.
    pub fn adopt(&mut self) -> Register {
        let register = self.claim();
        self.slots[register.slot as usize].set_zero();
        register
    }

    /// Adopts a register holding `value`, rounded into the pool precision.
    pub fn adopt_value<'a>(&mut self, value: impl Into<Scalar<'a>>) -> Register {
        let register = self.claim();
        self.slots[register.slot as usize].assign_scalar(value);
        register
    }

    fn claim(&mut self) -> Register {
        let slot = if self.active < self.order.len() {
            self.order[self.active]
        } else {
            let index = self.slots.len();
            assert!(index < u32::MAX as usize, "Register pool capacity exceeded");
            #[allow(clippy::cast_possible_truncation)]
            let slot = index as u32;
            self.slots.push(Float::with_precision(self.precision));
            self.order.push(slot);
            self.positions.push(self.active);
            self.allocated += 1;
            trace!(slot, precision = self.precision, "register pool grew");
            slot
        };
        self.slots[slot as usize].set_rounding(self.rounding);
        self.active += 1;
        Register {
            slot,
            epoch: self.epoch,
        }
    }

    /// Hands a register back for reuse.
    ///
    /// # Panics
    ///
    /// Panics if no register is live or `register` predates the last
    /// [`RegisterPool::clean`].
    pub fn release(&mut self, register: Register) {
        assert!(self.active > 0, "release register but no register adopted");
        self.check(&register);

        let slot = register.slot as usize;
        let position = self.positions[slot];
        debug_assert!(position < self.active, "register {register:?} is not live");
        let last = self.active - 1;
        let last_slot = self.order[last] as usize;

        self.order.swap(position, last);
        self.positions[slot] = last;
        self.positions[last_slot] = position;
        self.active = last;
    }

    /// Returns the value of a register.
    ///
    /// # Panics
    ///
    /// Panics if `register` predates the last [`RegisterPool::clean`].
    #[must_use]
    pub fn get(&self, register: &Register) -> &Float {
        self.check(register);
        &self.slots[register.slot as usize]
    }

    /// Returns the value of a register for writing.
    ///
    /// # Panics
    ///
    /// As [`RegisterPool::get`].
    pub fn get_mut(&mut self, register: &Register) -> &mut Float {
        self.check(register);
        &mut self.slots[register.slot as usize]
    }

    /// Borrows `target` for writing and `source` for reading.
    pub(crate) fn pair_mut(&mut self, target: &Register, source: &Register) -> (&mut Float, &Float) {
        self.check(target);
        self.check(source);
        let (t, s) = (target.slot as usize, source.slot as usize);
        assert_ne!(t, s, "two live registers share slot {t}");
        if t < s {
            let (head, tail) = self.slots.split_at_mut(s);
            (&mut head[t], &tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(t);
            (&mut tail[0], &head[s])
        }
    }

    /// Copies the value out and releases the register.
    #[must_use]
    pub fn into_float(&mut self, register: Register) -> Float {
        let value = self.get(&register).clone();
        self.release(register);
        value
    }

    /// Drops every slot.
    ///
    /// Registers adopted before the call become invalid; using one panics.
    pub fn clean(&mut self) {
        trace!(
            slots = self.slots.len(),
            active = self.active,
            "register pool cleaned"
        );
        self.freed += self.slots.len() as u64;
        self.slots.clear();
        self.order.clear();
        self.positions.clear();
        self.active = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Returns the number of live registers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Returns the number of slots ever created.
    #[must_use]
    pub fn allocation_count(&self) -> u64 {
        self.allocated
    }

    /// Returns the number of slots dropped by [`RegisterPool::clean`].
    #[must_use]
    pub fn freed_count(&self) -> u64 {
        self.freed
    }

    /// Returns the number of slots currently held, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn check(&self, register: &Register) {
        assert_eq!(
            register.epoch, self.epoch,
            "stale register {register:?} used after the pool was cleaned"
        );
    }
}

impl Default for RegisterPool {
    /// A pool at the context precision.
    fn default() -> Self {
        Self::new(Context::default_precision())
    }
}

impl fmt::Debug for RegisterPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPool")
            .field("precision", &self.precision)
            .field("active", &self.active)
            .field("capacity", &self.slots.len())
            .field("allocated", &self.allocated)
            .field("freed", &self.freed)
            .finish()
    }
}
