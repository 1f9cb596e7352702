//! Emulating atomicity by masking interrupts.

use crate::cpu::Cpu;

/// Runs `action` with interrupts masked, and puts the interrupt mask back the
/// way it found it afterwards.
///
/// If interrupts are already masked on entry, this does nothing to the mask at
/// all, on the way in or on the way out. That happens when we're nested inside
/// another critical section, or when someone masked them for their own
/// reasons. Only the outermost critical section unmasks.
///
/// This is `cortex_m::interrupt::free`, except that it's generic over the
/// processor and doesn't hand out a token.
#[inline(always)]
pub fn run_exclusive<C: Cpu, R>(action: impl FnOnce() -> R) -> R {
    let was_enabled = C::interrupts_enabled();
    if was_enabled {
        C::disable_interrupts();
    }
    let _restore = scopeguard::guard(was_enabled, |was_enabled| {
        if was_enabled {
            // Safety: we're restoring the state we observed on entry.
            unsafe { C::enable_interrupts() }
        }
    });

    action()
}
