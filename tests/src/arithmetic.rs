use crate::flags::{check_flags, C, N, V, X, Z};
use crate::harness::Machine;

#[test]
fn moveq_then_swap() {
    let mut m = Machine::new(0x1000, &[0x7042, 0x4840]); // MOVEQ #0x42, D0; SWAP D0

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0000_0042);
    assert_eq!(m.regs.pc, 0x1002);
    check_flags(&m.regs, 0);

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0042_0000);
    assert_eq!(m.regs.pc, 0x1004);
    check_flags(&m.regs, 0);
}

#[test]
fn add_word_overflow() {
    let mut m = Machine::new(0x1000, &[0xD041]); // ADD.W D1, D0
    m.regs.d[0] = 0x0000_7FFF;
    m.regs.d[1] = 0x0000_0001;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0000_8000);
    check_flags(&m.regs, N | V);
}

#[test]
fn add_byte_carry_sets_extend() {
    let mut m = Machine::new(0x1000, &[0xD001]); // ADD.B D1, D0
    m.regs.d[0] = 0xFF;
    m.regs.d[1] = 0x01;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x00);
    check_flags(&m.regs, Z | C | X);
}

#[test]
fn sub_word_borrow() {
    let mut m = Machine::new(0x1000, &[0x9041]); // SUB.W D1, D0
    m.regs.d[1] = 1;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x0000_FFFF);
    check_flags(&m.regs, N | C | X);
}

#[test]
fn addq_to_address_register_is_long_and_flagless() {
    let mut m = Machine::new(0x1000, &[0x5248]); // ADDQ.W #1, A0
    m.regs.a[0] = 0x0000_FFFF;
    m.regs.sr.set_zero(true);
    m.regs.sr.set_carry(true);

    m.step().unwrap();
    assert_eq!(m.regs.a[0], 0x0001_0000);
    check_flags(&m.regs, Z | C);
}

#[test]
fn addq_quick_zero_means_eight() {
    let mut m = Machine::new(0x1000, &[0x5040]); // ADDQ.W #8, D0
    m.regs.d[0] = 2;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 10);
}

#[test]
fn adda_word_source_is_sign_extended() {
    let mut m = Machine::new(0x1000, &[0xD0C0]); // ADDA.W D0, A0
    m.regs.d[0] = 0x0000_8000; // -32768 as a word
    m.regs.a[0] = 0x0001_0000;
    m.regs.sr.set_zero(true);

    m.step().unwrap();
    assert_eq!(m.regs.a[0], 0x0000_8000);
    check_flags(&m.regs, Z); // address arithmetic leaves flags alone
}

#[test]
fn cmpa_updates_flags_like_a_long_compare() {
    let mut m = Machine::new(0x1000, &[0xB0C0]); // CMPA.W D0, A0
    m.regs.d[0] = 5;
    m.regs.a[0] = 5;

    m.step().unwrap();
    assert_eq!(m.regs.a[0], 5);
    assert!(m.regs.sr.zero());
}

#[test]
fn addx_zero_flag_is_sticky() {
    let mut m = Machine::new(0x1000, &[0xD141]); // ADDX.W D1, D0
    m.regs.d[0] = 0xFFFF;
    m.regs.d[1] = 0;
    m.regs.sr.set_extend(true);
    m.regs.sr.set_zero(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0);
    // a zero result leaves Z untouched
    check_flags(&m.regs, Z | C | X);
}

#[test]
fn addx_nonzero_clears_zero() {
    let mut m = Machine::new(0x1000, &[0xD141]); // ADDX.W D1, D0
    m.regs.d[0] = 1;
    m.regs.d[1] = 1;
    m.regs.sr.set_zero(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 2);
    check_flags(&m.regs, 0);
}

#[test]
fn neg_twice_is_identity() {
    let mut m = Machine::new(0x1000, &[0x4440, 0x4440]); // NEG.W D0 twice
    m.regs.d[0] = 0x1234;

    m.run(2);
    assert_eq!(m.regs.d[0], 0x1234);
}

#[test]
fn neg_most_negative_overflows() {
    let mut m = Machine::new(0x1000, &[0x4440]); // NEG.W D0
    m.regs.d[0] = 0x8000;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x8000);
    check_flags(&m.regs, N | V | C | X);
}

#[test]
fn negx_subtracts_the_extend_bit() {
    let mut m = Machine::new(0x1000, &[0x4040]); // NEGX.W D0
    m.regs.d[0] = 0;
    m.regs.sr.set_extend(true);
    m.regs.sr.set_zero(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0xFFFF);
    check_flags(&m.regs, N | C | X);
}

#[test]
fn clr_sets_only_zero() {
    let mut m = Machine::new(0x1000, &[0x4240]); // CLR.W D0
    m.regs.d[0] = 0xFFFF_1234;
    m.regs.sr.set_negative(true);
    m.regs.sr.set_carry(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0xFFFF_0000);
    check_flags(&m.regs, Z);
}

#[test]
fn cmp_changes_no_registers() {
    let mut m = Machine::new(0x1000, &[0xB041]); // CMP.W D1, D0
    m.regs.d[0] = 5;
    m.regs.d[1] = 7;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 5);
    assert_eq!(m.regs.d[1], 7);
    check_flags(&m.regs, N | C);
}

#[test]
fn cmpm_steps_both_pointers() {
    let mut m = Machine::new(0x1000, &[0xB308]); // CMPM.B (A0)+, (A1)+
    m.regs.a[0] = 0x3000;
    m.regs.a[1] = 0x4000;
    m.write_u16(0x3000, 0x0500);
    m.write_u16(0x4000, 0x0500);

    m.step().unwrap();
    assert!(m.regs.sr.zero());
    assert_eq!(m.regs.a[0], 0x3001);
    assert_eq!(m.regs.a[1], 0x4001);
}

#[test]
fn addi_immediate() {
    let mut m = Machine::new(0x1000, &[0x0640, 0x0001]); // ADDI.W #1, D0
    m.regs.d[0] = 0x7FFF;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x8000);
    assert_eq!(m.regs.pc, 0x1004);
    check_flags(&m.regs, N | V);
}

#[test]
fn subq_decrements_memory() {
    let mut m = Machine::new(0x1000, &[0x5350, 0x0000]); // SUBQ.W #1, (A0)
    m.regs.a[0] = 0x3000;
    m.write_u16(0x3000, 5);

    m.step().unwrap();
    assert_eq!(m.read_u16(0x3000), 4);
}
