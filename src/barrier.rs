//! Plain memory accesses, dressed up in barriers to honor a `MemOrder`.
//!
//! Nothing here touches the interrupt mask. These are only atomic on their own
//! when the access is a single instruction; see `ops` for the rest.

use crate::cpu::Cpu;
use crate::order::MemOrder;

/// Reads `*ptr` with the barriers `order` asks for.
///
/// # Safety
///
/// `ptr` must be valid for reads and naturally aligned.
#[inline(always)]
pub unsafe fn ordered_load<C: Cpu, T: Copy>(ptr: *const T, order: MemOrder) -> T {
    let fences = order.load_fences();
    if fences.before {
        C::full_fence();
    }
    let value = ptr.read_volatile();
    if fences.after {
        C::full_fence();
    }
    value
}

/// Writes `value` to `*ptr` with the barriers `order` asks for.
///
/// # Safety
///
/// `ptr` must be valid for writes and naturally aligned.
#[inline(always)]
pub unsafe fn ordered_store<C: Cpu, T: Copy>(ptr: *mut T, value: T, order: MemOrder) {
    let fences = order.store_fences();
    if fences.before {
        C::full_fence();
    }
    ptr.write_volatile(value);
    if fences.after {
        C::full_fence();
    }
}
