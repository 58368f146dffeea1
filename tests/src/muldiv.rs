use crate::flags::{check_flags, N, Z};
use crate::harness::Machine;

#[test]
fn mulu_widens_to_long() {
    let mut m = Machine::new(0x1000, &[0xC0C1]); // MULU D1, D0
    m.regs.d[0] = 0x1234;
    m.regs.d[1] = 0x10;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0001_2340);
    check_flags(&m.regs, 0);
}

#[test]
fn mulu_uses_only_the_low_words() {
    let mut m = Machine::new(0x1000, &[0xC0C1]); // MULU D1, D0
    m.regs.d[0] = 0xFFFF_0002;
    m.regs.d[1] = 0xABCD_0003;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 6);
}

#[test]
fn muls_is_signed() {
    let mut m = Machine::new(0x1000, &[0xC1C1]); // MULS D1, D0
    m.regs.d[0] = 0xFFFF; // -1
    m.regs.d[1] = 0x0002;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0xFFFF_FFFE);
    check_flags(&m.regs, N);
}

#[test]
fn mul_zero_sets_zero() {
    let mut m = Machine::new(0x1000, &[0xC0C1]); // MULU D1, D0
    m.regs.d[0] = 0x1234;
    m.regs.d[1] = 0;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0);
    check_flags(&m.regs, Z);
}

#[test]
fn divu_packs_remainder_and_quotient() {
    let mut m = Machine::new(0x1000, &[0x80C1]); // DIVU D1, D0
    m.regs.d[0] = 0x0001_0005;
    m.regs.d[1] = 0x10;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0005_1000);
    check_flags(&m.regs, 0);
}

#[test]
fn divu_overflow_leaves_the_destination() {
    let mut m = Machine::new(0x1000, &[0x80C1]); // DIVU D1, D0
    m.regs.d[0] = 0x0010_0000;
    m.regs.d[1] = 1;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0010_0000);
    assert!(m.regs.sr.overflow());
    assert!(!m.regs.sr.carry());
}

#[test]
fn divs_signed_division() {
    let mut m = Machine::new(0x1000, &[0x81C1]); // DIVS D1, D0
    m.regs.d[0] = (-10i32) as u32;
    m.regs.d[1] = 3;

    m.step().unwrap();
    // quotient -3, remainder -1
    assert_eq!(m.regs.d[0], 0xFFFF_FFFD);
    check_flags(&m.regs, N);
}

#[test]
fn divu_by_zero_takes_vector_5() {
    let mut m = Machine::new(0x1000, &[0x80C1]); // DIVU D1, D0
    m.regs.d[0] = 0x1234;
    m.regs.d[1] = 0;
    m.regs.ssp = 0x6000;
    m.write_u32(0x14, 0x4000); // zero-divide vector

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x4000);
    assert!(m.regs.sr.supervisor());
    check_flags(&m.regs, 0);

    // frame on the supervisor stack: SR then the return PC
    assert_eq!(m.regs.ssp, 0x5FFA);
    assert_eq!(m.read_u32(0x5FFC), 0x1002);
}
