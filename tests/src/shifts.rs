use crate::flags::{check_flags, C, N, V, X, Z};
use crate::harness::Machine;

#[test]
fn asl_byte_out_of_the_sign_bit() {
    let mut m = Machine::new(0x1000, &[0xE300]); // ASL.B #1, D0
    m.regs.d[0] = 0x80;

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFF, 0x00);
    check_flags(&m.regs, Z | V | C | X);
}

#[test]
fn asr_preserves_the_sign_bit() {
    let mut m = Machine::new(0x1000, &[0xE240]); // ASR.W #1, D0
    m.regs.d[0] = 0x8000;

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0xC000);
    check_flags(&m.regs, N);
}

#[test]
fn lsr_shifts_zeroes_in() {
    let mut m = Machine::new(0x1000, &[0xE448]); // LSR.W #2, D0
    m.regs.d[0] = 0x0006;

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x0001);
    check_flags(&m.regs, C | X);
}

#[test]
fn lsl_clears_overflow() {
    let mut m = Machine::new(0x1000, &[0xE348]); // LSL.W #1, D0
    m.regs.d[0] = 0x4000;
    m.regs.sr.set_overflow(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x8000);
    check_flags(&m.regs, N);
}

#[test]
fn rol_copies_the_rotated_bit_to_carry() {
    let mut m = Machine::new(0x1000, &[0xE358]); // ROL.W #1, D0
    m.regs.d[0] = 0x8001;

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x0003);
    check_flags(&m.regs, C);
}

#[test]
fn roxl_rotates_through_extend() {
    let mut m = Machine::new(0x1000, &[0xE350]); // ROXL.W #1, D0
    m.regs.d[0] = 0x0001;
    m.regs.sr.set_extend(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x0003);
    check_flags(&m.regs, 0);
}

#[test]
fn rox_with_zero_count_copies_x_to_carry() {
    let mut m = Machine::new(0x1000, &[0xE370]); // ROXL.W D1, D0
    m.regs.d[0] = 0x1234;
    m.regs.d[1] = 0;
    m.regs.sr.set_extend(true);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x1234);
    check_flags(&m.regs, C | X);
}

#[test]
fn shift_count_register_is_modulo_64() {
    let mut m = Machine::new(0x1000, &[0xE368]); // LSL.W D1, D0
    m.regs.d[0] = 1;
    m.regs.d[1] = 64; // 64 % 64 == 0: no shift

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 1);
    check_flags(&m.regs, 0);
}

#[test]
fn memory_shift_moves_one_bit() {
    let mut m = Machine::new(0x1000, &[0xE1F8, 0x3000]); // ASL.W $3000.w
    m.write_u16(0x3000, 0x4000);

    m.step().unwrap();
    assert_eq!(m.read_u16(0x3000), 0x8000);
    check_flags(&m.regs, N | V);
}
