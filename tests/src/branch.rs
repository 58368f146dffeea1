use common::Error;

use crate::harness::Machine;

#[test]
fn bra_byte_displacement() {
    let mut m = Machine::new(0x1000, &[0x6004]); // BRA.B +4

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1006);
}

#[test]
fn bra_backward() {
    let mut m = Machine::new(0x1000, &[0x60FC]); // BRA.B -4

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x0FFE);
}

#[test]
fn bra_word_displacement() {
    let mut m = Machine::new(0x1000, &[0x6000, 0x0010]); // BRA.W +$10

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1012);
}

#[test]
fn bne_follows_the_zero_flag() {
    let mut m = Machine::new(0x1000, &[0x6604]); // BNE +4
    m.regs.sr.set_zero(true);
    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1002); // not taken

    let mut m = Machine::new(0x1000, &[0x6604]);
    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1006); // taken
}

#[test]
fn bsr_pushes_the_return_address() {
    let mut m = Machine::new(0x1000, &[0x6100, 0x000E]); // BSR.W +$0E

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1010);
    assert_eq!(m.regs.sp(), 0x7FFC);
    assert_eq!(m.read_u32(0x7FFC), 0x1004);
}

#[test]
fn dbf_counts_a_word_loop() {
    let mut m = Machine::new(0x1000, &[0x51C8, 0xFFFE]); // DBF D0, -2
    m.regs.d[0] = 0xABCD_0002;

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1000);
    assert_eq!(m.regs.d[0], 0xABCD_0001);

    m.step().unwrap();
    m.step().unwrap();
    // counter underflowed from 0 to -1: fall through
    assert_eq!(m.regs.pc, 0x1004);
    assert_eq!(m.regs.d[0], 0xABCD_FFFF);
}

#[test]
fn scc_writes_all_ones_or_zero() {
    let mut m = Machine::new(0x1000, &[0x57C0]); // SEQ D0
    m.regs.d[0] = 0x1234_5600;
    m.regs.sr.set_zero(true);
    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x1234_56FF);

    let mut m = Machine::new(0x1000, &[0x57C0]);
    m.regs.d[0] = 0x1234_56FF;
    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x1234_5600);
}

#[test]
fn jmp_indirect() {
    let mut m = Machine::new(0x1000, &[0x4ED0]); // JMP (A0)
    m.regs.a[0] = 0x4000;

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x4000);
}

#[test]
fn jmp_to_odd_address_fails() {
    let mut m = Machine::new(0x1000, &[0x4ED0]); // JMP (A0)
    m.regs.a[0] = 0xFF0001;

    assert_eq!(
        m.step(),
        Err(Error::UnalignedProgramCounter { pc: 0xFF0001 })
    );
}

#[test]
fn jsr_and_rts_round_trip() {
    let mut m = Machine::new(0x1000, &[0x4EB9, 0x0000, 0x2000]); // JSR $2000.l
    m.load_words(0x2000, &[0x4E75]); // RTS

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x2000);
    assert_eq!(m.regs.sp(), 0x7FFC);
    assert_eq!(m.read_u32(0x7FFC), 0x1006);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1006);
    assert_eq!(m.regs.sp(), 0x8000);
}
