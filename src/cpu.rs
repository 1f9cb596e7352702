//! The processor hooks everything else in this crate is built from.

/// Fences and interrupt masking for a single-core processor.
///
/// There's exactly one of these per target, and it's never instantiated; the
/// operations in this crate take it as a type parameter.
pub trait Cpu {
    /// Issues a full memory barrier: no load or store moves across it, in
    /// either direction, whether by the compiler or the processor.
    fn full_fence();

    /// Checks whether interrupts are currently enabled (i.e. not masked).
    fn interrupts_enabled() -> bool;

    /// Masks interrupts.
    fn disable_interrupts();

    /// Unmasks interrupts.
    ///
    /// # Safety
    ///
    /// This can end a critical section that someone else is relying on. Only
    /// call it to restore a state observed with `interrupts_enabled`.
    unsafe fn enable_interrupts();
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        pub use self::cortex::CortexM;

        /// The `Cpu` for the target being built.
        pub type Native = CortexM;

        mod cortex {
            use cortex_m::register::primask;

            /// Any M-profile processor, using PRIMASK for masking.
            pub enum CortexM {}

            impl super::Cpu for CortexM {
                #[inline(always)]
                fn full_fence() {
                    // The cortex_m wrapper also includes a compiler fence on
                    // either side.
                    cortex_m::asm::dmb();
                }

                #[inline(always)]
                fn interrupts_enabled() -> bool {
                    primask::read().is_active()
                }

                #[inline(always)]
                fn disable_interrupts() {
                    cortex_m::interrupt::disable();
                }

                #[inline(always)]
                unsafe fn enable_interrupts() {
                    cortex_m::interrupt::enable();
                }
            }
        }
    }
}
