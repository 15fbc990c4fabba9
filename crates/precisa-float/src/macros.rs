//! Generators for the MPFR-backed operation families.
//!
//! Each generated `op_*` function rounds into its output with the output's
//! own precision and rounding mode. The `*_mut` twins operate in place,
//! relying on MPFR allowing results to alias operands.

/// `mpfr_fn(rop, op, rnd)`.
macro_rules! unary_rounded {
    ($($(#[$attr:meta])* $op:ident, $in_place:ident => $ffi:ident;)*) => {
        impl $crate::Float {
            $(
                $(#[$attr])*
                pub fn $op(out: &mut $crate::Float, op: &$crate::Float) -> ::std::cmp::Ordering {
                    let rnd = out.rounding().raw();
                    // SAFETY: both values are initialised and `out` is exclusively borrowed.
                    $crate::float::ternary(unsafe {
                        ::gmp_mpfr_sys::mpfr::$ffi(out.as_raw_mut(), op.as_raw(), rnd)
                    })
                }

                #[doc = concat!("In-place form of [`Float::", stringify!($op), "`].")]
                pub fn $in_place(&mut self) -> ::std::cmp::Ordering {
                    let rnd = self.rounding().raw();
                    let raw = self.as_raw_mut();
                    // SAFETY: MPFR allows the result to alias the operand.
                    $crate::float::ternary(unsafe { ::gmp_mpfr_sys::mpfr::$ffi(raw, raw, rnd) })
                }
            )*
        }
    };
}

/// `mpfr_fn(rop, op)`: integer rounding that ignores the rounding mode.
macro_rules! unary_exact {
    ($($(#[$attr:meta])* $op:ident, $in_place:ident => $ffi:ident;)*) => {
        impl $crate::Float {
            $(
                $(#[$attr])*
                pub fn $op(out: &mut $crate::Float, op: &$crate::Float) -> ::std::cmp::Ordering {
                    // SAFETY: both values are initialised and `out` is exclusively borrowed.
                    $crate::float::ternary(unsafe {
                        ::gmp_mpfr_sys::mpfr::$ffi(out.as_raw_mut(), op.as_raw())
                    })
                }

                #[doc = concat!("In-place form of [`Float::", stringify!($op), "`].")]
                pub fn $in_place(&mut self) -> ::std::cmp::Ordering {
                    let raw = self.as_raw_mut();
                    // SAFETY: MPFR allows the result to alias the operand.
                    $crate::float::ternary(unsafe { ::gmp_mpfr_sys::mpfr::$ffi(raw, raw) })
                }
            )*
        }
    };
}

/// `mpfr_fn(rop, op1, op2, rnd)`; the in-place form uses `self` as `op1`.
macro_rules! binary_rounded {
    ($($(#[$attr:meta])* $op:ident, $in_place:ident => $ffi:ident;)*) => {
        impl $crate::Float {
            $(
                $(#[$attr])*
                pub fn $op(
                    out: &mut $crate::Float,
                    a: &$crate::Float,
                    b: &$crate::Float,
                ) -> ::std::cmp::Ordering {
                    let rnd = out.rounding().raw();
                    // SAFETY: all values are initialised and `out` is exclusively borrowed.
                    $crate::float::ternary(unsafe {
                        ::gmp_mpfr_sys::mpfr::$ffi(out.as_raw_mut(), a.as_raw(), b.as_raw(), rnd)
                    })
                }

                #[doc = concat!("In-place form of [`Float::", stringify!($op), "`] with `self` as the first operand.")]
                pub fn $in_place(&mut self, other: &$crate::Float) -> ::std::cmp::Ordering {
                    let rnd = self.rounding().raw();
                    let raw = self.as_raw_mut();
                    // SAFETY: MPFR allows the result to alias an operand.
                    $crate::float::ternary(unsafe {
                        ::gmp_mpfr_sys::mpfr::$ffi(raw, raw, other.as_raw(), rnd)
                    })
                }
            )*
        }
    };
}

/// `mpfr_fn(rop, rnd)`: mathematical constants.
macro_rules! constant {
    ($($(#[$attr:meta])* $op:ident => $ffi:ident;)*) => {
        impl $crate::Float {
            $(
                $(#[$attr])*
                pub fn $op(out: &mut $crate::Float) -> ::std::cmp::Ordering {
                    let rnd = out.rounding().raw();
                    // SAFETY: `out` is initialised and exclusively borrowed.
                    $crate::float::ternary(unsafe { ::gmp_mpfr_sys::mpfr::$ffi(out.as_raw_mut(), rnd) })
                }
            )*
        }
    };
}

/// `mpfr_fn(rop, op1, d, rnd)` / `mpfr_fn(rop, op1, op2, rnd)` picked by [`Scalar`](crate::Scalar).
macro_rules! scalar_binary {
    ($($(#[$attr:meta])* $op:ident, $in_place:ident => $ffi:ident, $ffi_d:ident;)*) => {
        impl $crate::Float {
            $(
                $(#[$attr])*
                pub fn $op<'a>(
                    out: &mut $crate::Float,
                    a: &$crate::Float,
                    b: impl Into<$crate::Scalar<'a>>,
                ) -> ::std::cmp::Ordering {
                    let rnd = out.rounding().raw();
                    let rop = out.as_raw_mut();
                    // SAFETY: all values are initialised and `out` is exclusively borrowed.
                    $crate::float::ternary(unsafe {
                        match b.into() {
                            $crate::Scalar::Float(b) => ::gmp_mpfr_sys::mpfr::$ffi(rop, a.as_raw(), b.as_raw(), rnd),
                            $crate::Scalar::Double(d) => ::gmp_mpfr_sys::mpfr::$ffi_d(rop, a.as_raw(), d, rnd),
                        }
                    })
                }

                #[doc = concat!("In-place form of [`Float::", stringify!($op), "`] with `self` as the left operand.")]
                pub fn $in_place<'a>(&mut self, rhs: impl Into<$crate::Scalar<'a>>) -> ::std::cmp::Ordering {
                    let rnd = self.rounding().raw();
                    let raw = self.as_raw_mut();
                    // SAFETY: MPFR allows the result to alias an operand.
                    $crate::float::ternary(unsafe {
                        match rhs.into() {
                            $crate::Scalar::Float(b) => ::gmp_mpfr_sys::mpfr::$ffi(raw, raw, b.as_raw(), rnd),
                            $crate::Scalar::Double(d) => ::gmp_mpfr_sys::mpfr::$ffi_d(raw, raw, d, rnd),
                        }
                    })
                }
            )*
        }
    };
}
