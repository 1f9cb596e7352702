//! On-target tests for the `__atomic_*` routines, on a Cortex-M0+.
//!
//! These call the exported symbols the way compiled C would, through an
//! `extern "C"` block, so they also check that the symbols actually link.
//! Results come out over semihosting; a failure panics, and
//! `panic-semihosting` reports it and exits with an error.

#![no_std]
#![no_main]

use core::ptr::{addr_of, addr_of_mut};

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::register::primask;
use cortex_m_rt::{entry, exception};
use cortex_m_semihosting::{debug, hprintln};
use panic_semihosting as _;

// Pull in the symbols.
use armv6m_libatomic as _;

const RELAXED: i32 = 0;
const ACQUIRE: i32 = 2;
const RELEASE: i32 = 3;
const SEQ_CST: i32 = 5;

extern "C" {
    fn __atomic_load_1(ptr: *const u8, order: i32) -> u8;
    fn __atomic_load_2(ptr: *const u16, order: i32) -> u16;
    fn __atomic_load_4(ptr: *const u32, order: i32) -> u32;
    fn __atomic_load_8(ptr: *const u64, order: i32) -> u64;
    fn __atomic_store_1(ptr: *mut u8, val: u8, order: i32);
    fn __atomic_store_2(ptr: *mut u16, val: u16, order: i32);
    fn __atomic_store_4(ptr: *mut u32, val: u32, order: i32);
    fn __atomic_store_8(ptr: *mut u64, val: u64, order: i32);
    fn __atomic_exchange_1(ptr: *mut u8, val: u8, order: i32) -> u8;
    fn __atomic_exchange_2(ptr: *mut u16, val: u16, order: i32) -> u16;
    fn __atomic_exchange_4(ptr: *mut u32, val: u32, order: i32) -> u32;
    fn __atomic_exchange_8(ptr: *mut u64, val: u64, order: i32) -> u64;
    fn __atomic_compare_exchange_4(
        ptr: *mut u32,
        expected: *mut u32,
        desired: u32,
        success: i32,
        failure: i32,
    ) -> bool;
    fn __atomic_fetch_add_4(ptr: *mut u32, val: u32, order: i32) -> u32;
    fn __atomic_fetch_add_8(ptr: *mut u64, val: u64, order: i32) -> u64;
}

static TESTS: &[(&str, fn())] = &[
    ("store_load_all_widths", test_store_load_all_widths),
    ("exchange_all_widths", test_exchange_all_widths),
    ("exchange_4_seq_cst", test_exchange_4_seq_cst),
    ("relaxed_8_byte_store", test_relaxed_8_byte_store),
    ("compare_exchange", test_compare_exchange),
    ("interrupts_restored", test_interrupts_restored),
    ("masked_interrupts_stay_masked", test_masked_interrupts_stay_masked),
    ("preemption", test_preemption),
];

#[entry]
fn main() -> ! {
    for (name, test) in TESTS {
        hprintln!("{}...", name);
        test();
    }
    hprintln!("all {} tests passed", TESTS.len());

    debug::exit(debug::EXIT_SUCCESS);
    loop {
        cortex_m::asm::bkpt();
    }
}

fn test_store_load_all_widths() {
    for order in [RELAXED, ACQUIRE, RELEASE, SEQ_CST] {
        let mut a = 0u8;
        let mut b = 0u16;
        let mut c = 0u32;
        let mut d = 0u64;
        unsafe {
            __atomic_store_1(&mut a, 0xA5, order);
            __atomic_store_2(&mut b, 0xBEEF, order);
            __atomic_store_4(&mut c, 0xDEAD_BEEF, order);
            __atomic_store_8(&mut d, 0x0123_4567_89AB_CDEF, order);
            assert_eq!(__atomic_load_1(&a, order), 0xA5);
            assert_eq!(__atomic_load_2(&b, order), 0xBEEF);
            assert_eq!(__atomic_load_4(&c, order), 0xDEAD_BEEF);
            assert_eq!(__atomic_load_8(&d, order), 0x0123_4567_89AB_CDEF);
        }
    }
}

fn test_exchange_all_widths() {
    let mut a = 1u8;
    let mut b = 2u16;
    let mut c = 3u32;
    let mut d = 4u64;
    unsafe {
        assert_eq!(__atomic_exchange_1(&mut a, 10, SEQ_CST), 1);
        assert_eq!(__atomic_exchange_2(&mut b, 20, SEQ_CST), 2);
        assert_eq!(__atomic_exchange_4(&mut c, 30, SEQ_CST), 3);
        assert_eq!(__atomic_exchange_8(&mut d, 40, SEQ_CST), 4);
        assert_eq!(__atomic_load_1(&a, RELAXED), 10);
        assert_eq!(__atomic_load_2(&b, RELAXED), 20);
        assert_eq!(__atomic_load_4(&c, RELAXED), 30);
        assert_eq!(__atomic_load_8(&d, RELAXED), 40);
    }
}

fn test_exchange_4_seq_cst() {
    let mut x = 0u32;
    unsafe {
        assert_eq!(__atomic_exchange_4(&mut x, 42, SEQ_CST), 0);
        assert_eq!(__atomic_load_4(&x, SEQ_CST), 42);
    }
}

fn test_relaxed_8_byte_store() {
    let mut x = 0xFFFF_FFFF_FFFF_FFFFu64;
    unsafe {
        __atomic_store_8(&mut x, 0, RELAXED);
        assert_eq!(__atomic_load_8(&x, RELAXED), 0);
    }
}

fn test_compare_exchange() {
    let mut x = 7u32;
    let mut expected = 6u32;
    unsafe {
        assert!(!__atomic_compare_exchange_4(&mut x, &mut expected, 8, SEQ_CST, SEQ_CST));
        assert_eq!(expected, 7);
        assert!(__atomic_compare_exchange_4(&mut x, &mut expected, 8, SEQ_CST, RELAXED));
        assert_eq!(__atomic_load_4(&x, RELAXED), 8);
    }
}

fn test_interrupts_restored() {
    assert!(primask::read().is_active());
    let mut x = 0u64;
    unsafe {
        __atomic_store_8(&mut x, 1, SEQ_CST);
        __atomic_exchange_8(&mut x, 2, SEQ_CST);
        __atomic_fetch_add_8(&mut x, 3, SEQ_CST);
    }
    assert!(primask::read().is_active());
    assert_eq!(x, 5);
}

fn test_masked_interrupts_stay_masked() {
    let mut x = 0u32;
    cortex_m::interrupt::free(|_| {
        unsafe {
            __atomic_exchange_4(&mut x, 1, SEQ_CST);
            __atomic_fetch_add_4(&mut x, 1, SEQ_CST);
            __atomic_load_8(addr_of!(WIDE), SEQ_CST);
        }
        assert!(!primask::read().is_active());
    });
    assert!(primask::read().is_active());
    assert_eq!(x, 2);
}

/// Bumped by the SysTick handler. Both halves move together, so a torn read
/// shows up as unequal halves.
static mut WIDE: u64 = 0;
const WIDE_STEP: u64 = 0x0000_0001_0000_0001;

/// Bumped by both the handler and the main loop.
static mut SHARED: u32 = 0;
/// Number of times the handler has run.
static mut TICKS: u32 = 0;

const ROUNDS: u32 = 50_000;

fn test_preemption() {
    let mut cp = unsafe { cortex_m::Peripherals::steal() };
    cp.SYST.set_clock_source(SystClkSource::Core);
    cp.SYST.set_reload(500);
    cp.SYST.clear_current();
    cp.SYST.enable_counter();
    cp.SYST.enable_interrupt();

    for _ in 0..ROUNDS {
        let w = unsafe { __atomic_load_8(addr_of!(WIDE), SEQ_CST) };
        assert_eq!(w >> 32, w & 0xFFFF_FFFF, "torn read: {:#x}", w);
        unsafe {
            __atomic_fetch_add_4(addr_of_mut!(SHARED), 1, RELAXED);
        }
    }

    cp.SYST.disable_interrupt();
    cp.SYST.disable_counter();

    let ticks = unsafe { __atomic_load_4(addr_of!(TICKS), SEQ_CST) };
    let shared = unsafe { __atomic_load_4(addr_of!(SHARED), SEQ_CST) };
    hprintln!("  {} ticks during {} rounds", ticks, ROUNDS);
    assert!(ticks > 0, "SysTick never fired");
    assert_eq!(shared, ROUNDS + ticks, "lost an update");
}

#[exception]
fn SysTick() {
    unsafe {
        __atomic_fetch_add_8(addr_of_mut!(WIDE), WIDE_STEP, SEQ_CST);
        __atomic_fetch_add_4(addr_of_mut!(SHARED), 1, SEQ_CST);
        let t = __atomic_load_4(addr_of!(TICKS), RELAXED);
        __atomic_store_4(addr_of_mut!(TICKS), t + 1, RELAXED);
    }
}
