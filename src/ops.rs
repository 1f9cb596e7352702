//! Atomic operations on bare pointers, for any `Word` and any `Cpu`.
//!
//! Loads and stores that fit in one instruction are left interruptible and
//! only get barriers. Everything else runs inside `run_exclusive`: that means
//! 64-bit loads and stores, and every read-modify-write at any width.
//!
//! A read-modify-write is a load and a store, each with the caller's ordering
//! and the barriers that ordering gets in the `MemOrder` tables.
//!
//! All of these are `unsafe`: the pointer must be valid and naturally aligned
//! for `T`. None of that is checked.

use core::ops::{BitAnd, BitOr, BitXor, Not};

use crate::barrier::{ordered_load, ordered_store};
use crate::cpu::Cpu;
use crate::critical::run_exclusive;
use crate::order::MemOrder;

mod sealed {
    pub trait Sealed {}
}

/// An integer type we can operate on atomically.
pub trait Word:
    Copy
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + sealed::Sealed
{
    /// Whether one aligned load or store instruction can move a value of this
    /// type on ARMv6-M. If not, loads and stores need a critical section too.
    const SINGLE_COPY: bool;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_word {
    ($t:ty, $single_copy:expr) => {
        impl sealed::Sealed for $t {}

        impl Word for $t {
            const SINGLE_COPY: bool = $single_copy;

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }
        }
    };
}

impl_word!(u8, true);
impl_word!(u16, true);
impl_word!(u32, true);
impl_word!(u64, false);

/// The arithmetic and logical read-modify-write operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RmwOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    And,
    Or,
    Xor,
    /// `!(old & val)`, as GCC defines it.
    Nand,
}

impl RmwOp {
    /// Computes the value that replaces `old`.
    #[inline(always)]
    pub fn apply<T: Word>(self, old: T, val: T) -> T {
        match self {
            Self::Add => old.wrapping_add(val),
            Self::Sub => old.wrapping_sub(val),
            Self::And => old & val,
            Self::Or => old | val,
            Self::Xor => old ^ val,
            Self::Nand => !(old & val),
        }
    }
}

/// Atomically loads `*ptr`.
///
/// # Safety
///
/// `ptr` must be valid for reads and naturally aligned.
#[inline(always)]
pub unsafe fn load<C: Cpu, T: Word>(ptr: *const T, order: MemOrder) -> T {
    if T::SINGLE_COPY {
        ordered_load::<C, T>(ptr, order)
    } else {
        run_exclusive::<C, _>(|| ordered_load::<C, T>(ptr, order))
    }
}

/// Atomically stores `val` into `*ptr`.
///
/// # Safety
///
/// `ptr` must be valid for writes and naturally aligned.
#[inline(always)]
pub unsafe fn store<C: Cpu, T: Word>(ptr: *mut T, val: T, order: MemOrder) {
    if T::SINGLE_COPY {
        ordered_store::<C, T>(ptr, val, order)
    } else {
        run_exclusive::<C, _>(|| ordered_store::<C, T>(ptr, val, order))
    }
}

/// Atomically replaces `*ptr` with `val`, returning the original contents.
///
/// # Safety
///
/// `ptr` must be valid for reads and writes and naturally aligned.
#[inline(always)]
pub unsafe fn exchange<C: Cpu, T: Word>(ptr: *mut T, val: T, order: MemOrder) -> T {
    fetch_update::<C, T>(ptr, order, |_| val)
}

/// If `*ptr` equals `current`, atomically replaces it with `new`.
///
/// Returns `Ok(current)` on success, `Err(actual_value)` on failure. On
/// failure memory is not written. The load is ordered by `success` joined with
/// `failure`; the store by `success`.
///
/// # Safety
///
/// `ptr` must be valid for reads and writes and naturally aligned.
#[inline(always)]
pub unsafe fn compare_exchange<C: Cpu, T: Word>(
    ptr: *mut T,
    current: T,
    new: T,
    success: MemOrder,
    failure: MemOrder,
) -> Result<T, T> {
    let lo = success.join(failure);
    run_exclusive::<C, _>(|| {
        let x = ordered_load::<C, T>(ptr, lo);
        if x == current {
            ordered_store::<C, T>(ptr, new, success);
            Ok(x)
        } else {
            Err(x)
        }
    })
}

/// Atomically applies `op` with operand `val` to `*ptr`, returning the
/// original contents.
///
/// # Safety
///
/// `ptr` must be valid for reads and writes and naturally aligned.
#[inline(always)]
pub unsafe fn fetch_op<C: Cpu, T: Word>(ptr: *mut T, op: RmwOp, val: T, order: MemOrder) -> T {
    fetch_update::<C, T>(ptr, order, |x| op.apply(x, val))
}

/// Shared body of the unconditional read-modify-writes: load, compute, store,
/// all in one critical section.
#[inline(always)]
unsafe fn fetch_update<C: Cpu, T: Word>(
    ptr: *mut T,
    order: MemOrder,
    f: impl FnOnce(T) -> T,
) -> T {
    run_exclusive::<C, _>(|| {
        let x = ordered_load::<C, T>(ptr, order);
        ordered_store::<C, T>(ptr, f(x), order);
        x
    })
}
