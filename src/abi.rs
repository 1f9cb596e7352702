//! The `__atomic_*` symbols compilers call into.
//!
//! Names and signatures are the libatomic ones GCC and LLVM both emit calls
//! to. Orders arrive as the raw C `memory_order` value.

/// Generates the full set of entry points for one operand type.
///
/// `$cpu` is the `Cpu` to run on, `$t` the operand type, `$n` its size in
/// bytes (which goes into the symbol name). Any attributes given at the end
/// are applied to every function; that's how the real ones get
/// `#[no_mangle]`.
#[allow(unused_macros)]
macro_rules! entry_points {
    (@rmw $cpu:ty, $t:ty, $n:literal, $name:ident, $op:ident $(, #[$attr:meta])*) => {
        paste::item! {
            $(#[$attr])*
            #[inline(never)]
            pub unsafe extern "C" fn [<__atomic_fetch_ $name _ $n>](ptr: *mut $t, val: $t, order: i32) -> $t {
                $crate::ops::fetch_op::<$cpu, $t>(
                    ptr,
                    $crate::ops::RmwOp::$op,
                    val,
                    $crate::order::MemOrder::from_raw(order),
                )
            }

            $(#[$attr])*
            #[inline(never)]
            pub unsafe extern "C" fn [<__atomic_ $name _fetch_ $n>](ptr: *mut $t, val: $t, order: i32) -> $t {
                let old = $crate::ops::fetch_op::<$cpu, $t>(
                    ptr,
                    $crate::ops::RmwOp::$op,
                    val,
                    $crate::order::MemOrder::from_raw(order),
                );
                $crate::ops::RmwOp::$op.apply(old, val)
            }
        }
    };
    ($cpu:ty, $t:ty, $n:literal $(, #[$attr:meta])*) => {
        entry_points!(@rmw $cpu, $t, $n, add, Add $(, #[$attr])*);
        entry_points!(@rmw $cpu, $t, $n, sub, Sub $(, #[$attr])*);
        entry_points!(@rmw $cpu, $t, $n, and, And $(, #[$attr])*);
        entry_points!(@rmw $cpu, $t, $n, or, Or $(, #[$attr])*);
        entry_points!(@rmw $cpu, $t, $n, xor, Xor $(, #[$attr])*);
        entry_points!(@rmw $cpu, $t, $n, nand, Nand $(, #[$attr])*);

        paste::item! {
            $(#[$attr])*
            #[inline(never)]
            pub unsafe extern "C" fn [<__atomic_load_ $n>](ptr: *const $t, order: i32) -> $t {
                $crate::ops::load::<$cpu, $t>(ptr, $crate::order::MemOrder::from_raw(order))
            }

            $(#[$attr])*
            #[inline(never)]
            pub unsafe extern "C" fn [<__atomic_store_ $n>](ptr: *mut $t, val: $t, order: i32) {
                $crate::ops::store::<$cpu, $t>(ptr, val, $crate::order::MemOrder::from_raw(order))
            }

            $(#[$attr])*
            #[inline(never)]
            pub unsafe extern "C" fn [<__atomic_exchange_ $n>](ptr: *mut $t, val: $t, order: i32) -> $t {
                $crate::ops::exchange::<$cpu, $t>(ptr, val, $crate::order::MemOrder::from_raw(order))
            }

            /// On failure, the value actually found is written to `*expected`.
            $(#[$attr])*
            #[inline(never)]
            pub unsafe extern "C" fn [<__atomic_compare_exchange_ $n>](
                ptr: *mut $t,
                expected: *mut $t,
                desired: $t,
                success: i32,
                failure: i32,
            ) -> bool {
                let r = $crate::ops::compare_exchange::<$cpu, $t>(
                    ptr,
                    expected.read(),
                    desired,
                    $crate::order::MemOrder::from_raw(success),
                    $crate::order::MemOrder::from_raw(failure),
                );
                match r {
                    Ok(_) => true,
                    Err(actual) => {
                        expected.write(actual);
                        false
                    }
                }
            }
        }
    };
}

#[cfg(all(feature = "abi", target_arch = "arm"))]
mod exported {
    use crate::cpu::CortexM;

    entry_points!(CortexM, u8, 1, #[no_mangle]);
    entry_points!(CortexM, u16, 2, #[no_mangle]);
    entry_points!(CortexM, u32, 4, #[no_mangle]);
    entry_points!(CortexM, u64, 8, #[no_mangle]);
}
