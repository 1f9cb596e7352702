//! Memory orderings, and which barriers each one costs.

use core::sync::atomic::Ordering;

/// A memory ordering, as the C/C++ `memory_order` enum spells it.
///
/// The discriminants are the values compilers pass in the `int` order argument
/// of the `__atomic_*` routines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum MemOrder {
    Relaxed = 0,
    Consume = 1,
    Acquire = 2,
    Release = 3,
    AcqRel = 4,
    SeqCst = 5,
}

/// Where full barriers go around a single memory access.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Fences {
    /// Fence between preceding accesses and this one.
    pub before: bool,
    /// Fence between this access and following ones.
    pub after: bool,
}

impl Fences {
    /// Number of barrier instructions this plan issues.
    pub const fn count(self) -> usize {
        self.before as usize + self.after as usize
    }
}

impl MemOrder {
    /// Decodes an order argument as passed by compiled code.
    ///
    /// GCC keeps target-specific flags (like x86's HLE hints) above bit 15, so
    /// those are ignored. Anything we don't recognize gets `SeqCst`, which is
    /// never wrong, only slow.
    pub const fn from_raw(raw: i32) -> Self {
        match raw & 0xFFFF {
            0 => Self::Relaxed,
            1 => Self::Consume,
            2 => Self::Acquire,
            3 => Self::Release,
            4 => Self::AcqRel,
            _ => Self::SeqCst,
        }
    }

    /// Barriers for a plain store with this ordering.
    ///
    /// The acquire-flavored orderings also get a trailing barrier.
    pub const fn store_fences(self) -> Fences {
        Fences {
            before: !matches!(self, Self::Relaxed),
            after: matches!(self, Self::Acquire | Self::AcqRel | Self::SeqCst),
        }
    }

    /// Barriers for a plain load with this ordering.
    pub const fn load_fences(self) -> Fences {
        Fences {
            before: matches!(self, Self::Release | Self::AcqRel | Self::SeqCst),
            after: !matches!(self, Self::Relaxed),
        }
    }

    /// Returns the weakest ordering that is at least as strong as both `self`
    /// and `other`.
    pub const fn join(self, other: Self) -> Self {
        if matches!(self, Self::SeqCst) || matches!(other, Self::SeqCst) {
            return Self::SeqCst;
        }
        let acquire = self.acquires() || other.acquires();
        let release = self.releases() || other.releases();
        match (acquire, release) {
            (false, false) => Self::Relaxed,
            (true, false) => Self::Acquire,
            (false, true) => Self::Release,
            (true, true) => Self::AcqRel,
        }
    }

    const fn acquires(self) -> bool {
        matches!(self, Self::Consume | Self::Acquire | Self::AcqRel | Self::SeqCst)
    }

    const fn releases(self) -> bool {
        matches!(self, Self::Release | Self::AcqRel | Self::SeqCst)
    }
}

impl From<Ordering> for MemOrder {
    fn from(o: Ordering) -> Self {
        match o {
            Ordering::Relaxed => Self::Relaxed,
            Ordering::Acquire => Self::Acquire,
            Ordering::Release => Self::Release,
            Ordering::AcqRel => Self::AcqRel,
            _ => Self::SeqCst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MemOrder; 6] = [
        MemOrder::Relaxed,
        MemOrder::Consume,
        MemOrder::Acquire,
        MemOrder::Release,
        MemOrder::AcqRel,
        MemOrder::SeqCst,
    ];

    fn fences(before: bool, after: bool) -> Fences {
        Fences { before, after }
    }

    #[test]
    fn store_table() {
        use MemOrder::*;
        assert_eq!(Relaxed.store_fences(), fences(false, false));
        assert_eq!(Consume.store_fences(), fences(true, false));
        assert_eq!(Acquire.store_fences(), fences(true, true));
        assert_eq!(Release.store_fences(), fences(true, false));
        assert_eq!(AcqRel.store_fences(), fences(true, true));
        assert_eq!(SeqCst.store_fences(), fences(true, true));
    }

    #[test]
    fn load_table() {
        use MemOrder::*;
        assert_eq!(Relaxed.load_fences(), fences(false, false));
        assert_eq!(Consume.load_fences(), fences(false, true));
        assert_eq!(Acquire.load_fences(), fences(false, true));
        assert_eq!(Release.load_fences(), fences(true, true));
        assert_eq!(AcqRel.load_fences(), fences(true, true));
        assert_eq!(SeqCst.load_fences(), fences(true, true));
    }

    #[test]
    fn seq_cst_is_never_cheaper() {
        use MemOrder::*;
        for weaker in [Acquire, Release] {
            assert!(SeqCst.store_fences().count() >= weaker.store_fences().count());
            assert!(SeqCst.load_fences().count() >= weaker.load_fences().count());
        }
    }

    #[test]
    fn raw_codes_round_trip() {
        for o in ALL {
            assert_eq!(MemOrder::from_raw(o as i32), o);
        }
    }

    #[test]
    fn raw_flag_bits_are_ignored() {
        assert_eq!(MemOrder::from_raw(0x1_0002), MemOrder::Acquire);
        assert_eq!(MemOrder::from_raw(0x2_0003), MemOrder::Release);
    }

    #[test]
    fn unknown_raw_codes_are_seq_cst() {
        assert_eq!(MemOrder::from_raw(6), MemOrder::SeqCst);
        assert_eq!(MemOrder::from_raw(-1), MemOrder::SeqCst);
        assert_eq!(MemOrder::from_raw(0x7FFF), MemOrder::SeqCst);
    }

    #[test]
    fn join_is_an_upper_bound() {
        use MemOrder::*;
        assert_eq!(Relaxed.join(Relaxed), Relaxed);
        assert_eq!(Relaxed.join(Consume), Acquire);
        assert_eq!(Acquire.join(Release), AcqRel);
        assert_eq!(Release.join(Relaxed), Release);
        assert_eq!(AcqRel.join(SeqCst), SeqCst);
        for a in ALL {
            for b in ALL {
                let j = a.join(b);
                assert_eq!(j, b.join(a));
                for x in [a, b] {
                    assert!(j.load_fences().count() >= x.load_fences().count());
                }
            }
        }
    }

    #[test]
    fn from_core_ordering() {
        assert_eq!(MemOrder::from(Ordering::Relaxed), MemOrder::Relaxed);
        assert_eq!(MemOrder::from(Ordering::Acquire), MemOrder::Acquire);
        assert_eq!(MemOrder::from(Ordering::Release), MemOrder::Release);
        assert_eq!(MemOrder::from(Ordering::AcqRel), MemOrder::AcqRel);
        assert_eq!(MemOrder::from(Ordering::SeqCst), MemOrder::SeqCst);
    }
}
