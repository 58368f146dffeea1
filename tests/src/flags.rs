use m68k::{Registers, Status};

pub const C: u16 = Status::C;
pub const V: u16 = Status::V;
pub const Z: u16 = Status::Z;
pub const N: u16 = Status::N;
pub const X: u16 = Status::X;

pub fn check_flags(regs: &Registers, expected: u16) {
    assert_eq!(regs.sr.carry(), expected & C != 0, "carry flag");
    assert_eq!(regs.sr.overflow(), expected & V != 0, "overflow flag");
    assert_eq!(regs.sr.zero(), expected & Z != 0, "zero flag");
    assert_eq!(regs.sr.negative(), expected & N != 0, "negative flag");
    assert_eq!(regs.sr.extend(), expected & X != 0, "extend flag");
}
