//! The `__atomic_*` runtime routines for ARMv6-M, to use the term compilers
//! use for them: "libatomic."
//!
//! ARMv6-M processors like the Cortex-M0 don't support the fancier atomic
//! operations available on most other ARM processors. In particular, they have
//! no exclusive load/store instructions, so there is no way to build an atomic
//! swap or read-modify-write out of native instructions. They also can't move
//! 64 bits in a single instruction. When code asks for any of those things, the
//! compiler gives up and emits a call to a routine like `__atomic_exchange_4`
//! or `__atomic_load_8`, and expects somebody to provide it at link time. This
//! crate is that somebody.
//!
//! Operations that a single aligned load or store can do are implemented by
//! bracketing the access with `dmb` as the requested [`MemOrder`] requires.
//! Everything else runs with interrupts masked. This means that:
//!
//! 1. The masked operations hurt interrupt latency/jitter, by a handful of
//!    cycles. The M0 already has pretty poor interrupt latency/jitter because
//!    of uninterruptible instructions and lack of BASEPRI, so this is not a
//!    big loss.
//!
//! 2. They don't work in unprivileged mode, where `cpsid` is ignored.
//!
//! 3. They are only atomic with respect to the core that runs them. On a
//!    dual-core part like the RP2040, the other core can still observe a torn
//!    access. Don't share these between cores.
//!
//! The exported symbols live behind the `abi` feature (on by default). The
//! same operations are available to Rust code through [`ops`], generic over the
//! [`Cpu`] that provides fences and interrupt masking.

#![cfg_attr(not(test), no_std)]

pub mod barrier;
pub mod cpu;
pub mod critical;
pub mod ops;
pub mod order;

mod abi;

#[cfg(test)]
mod testing;

pub use cpu::Cpu;
pub use critical::run_exclusive;
pub use ops::{RmwOp, Word};
pub use order::{Fences, MemOrder};
