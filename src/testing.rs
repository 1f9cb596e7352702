//! A pretend processor for host tests.
//!
//! The interrupt flag and an event trace live in thread-locals, so tests
//! running in parallel don't see each other.

use std::cell::{Cell, RefCell};

use crate::cpu::Cpu;

/// Something the pretend processor was asked to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Mask,
    Unmask,
    /// A barrier, noting whether interrupts were masked at the time and the
    /// value at the watched location, if any.
    Fence { masked: bool, seen: Option<u64> },
}

type Peek = (*const (), unsafe fn(*const ()) -> u64);

thread_local! {
    static ENABLED: Cell<bool> = Cell::new(true);
    static WATCHED: Cell<Option<Peek>> = Cell::new(None);
    static TRACE: RefCell<Vec<Event>> = RefCell::new(Vec::new());
}

/// Records what it's asked to do instead of doing it.
pub enum MockCpu {}

impl Cpu for MockCpu {
    fn full_fence() {
        let masked = !ENABLED.with(Cell::get);
        let seen = WATCHED.with(Cell::get).map(|(p, peek)| unsafe { peek(p) });
        record(Event::Fence { masked, seen });
    }

    fn interrupts_enabled() -> bool {
        ENABLED.with(Cell::get)
    }

    fn disable_interrupts() {
        ENABLED.with(|e| e.set(false));
        record(Event::Mask);
    }

    unsafe fn enable_interrupts() {
        ENABLED.with(|e| e.set(true));
        record(Event::Unmask);
    }
}

fn record(e: Event) {
    TRACE.with(|t| t.borrow_mut().push(e));
}

/// Starts over with an empty trace, nothing watched, and the given interrupt
/// state.
pub fn reset(interrupts_enabled: bool) {
    ENABLED.with(|e| e.set(interrupts_enabled));
    WATCHED.with(|w| w.set(None));
    TRACE.with(|t| t.borrow_mut().clear());
}

/// Samples `*ptr` at every fence from now on. `ptr` must stay valid until the
/// next `reset`.
pub fn watch<T: Copy + Into<u64>>(ptr: *const T) {
    unsafe fn peek<T: Copy + Into<u64>>(p: *const ()) -> u64 {
        p.cast::<T>().read_volatile().into()
    }
    WATCHED.with(|w| w.set(Some((ptr.cast(), peek::<T>))));
}

/// Returns the events recorded since the last call, and clears them.
pub fn take_trace() -> Vec<Event> {
    TRACE.with(|t| t.take())
}

/// Counts the barriers in `trace`.
pub fn fence_count(trace: &[Event]) -> usize {
    trace
        .iter()
        .filter(|e| matches!(e, Event::Fence { .. }))
        .count()
}
