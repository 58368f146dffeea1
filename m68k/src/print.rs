//! Textual form of decoded instructions, used by the host's "current
//! instruction" view. Immediate operands print as a bare `#`: their value
//! lives in the instruction stream, which a pure value cannot see.

use std::fmt;

use crate::instruction::{Instruction, Kind, Size};
use crate::target::Target;

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Target::DataRegister { index } => write!(f, "D{index}"),
            Target::AddressRegister { index } => write!(f, "A{index}"),
            Target::Address { index } => write!(f, "(A{index})"),
            Target::AddressIncrement { index, .. } => write!(f, "(A{index})+"),
            Target::AddressDecrement { index, .. } => write!(f, "-(A{index})"),
            Target::AddressDisplacement { index, ext0 } => {
                write!(f, "{}(A{index})", ext0 as i16)
            }
            Target::AddressIndex { index, ext0 } => {
                write!(f, "{}(A{index},{})", ext0 as i8, index_register(ext0))
            }
            Target::PcDisplacement { ext0 } => write!(f, "{}(PC)", ext0 as i16),
            Target::PcIndex { ext0 } => {
                write!(f, "{}(PC,{})", ext0 as i8, index_register(ext0))
            }
            Target::AbsoluteShort { ext0 } => write!(f, "(${ext0:04X}).w"),
            Target::AbsoluteLong { address } => write!(f, "(${address:08X}).l"),
            Target::Immediate { .. } => write!(f, "#"),
        }
    }
}

fn index_register(ext0: u16) -> String {
    let file = if ext0 & 0x8000 != 0 { 'A' } else { 'D' };
    let number = (ext0 >> 12) & 0x7;
    let width = if ext0 & 0x0800 != 0 { 'l' } else { 'w' };
    format!("{file}{number}.{width}")
}

impl Instruction {
    pub fn print(&self) -> String {
        let s = self.size.suffix();
        let src = self.src.as_ref();
        let dst = self.dst.as_ref();
        let two = |name: &str| {
            format!("{name} {}, {}", src.unwrap_or(&NONE), dst.unwrap_or(&NONE))
        };
        let two_sized = |name: &str| {
            format!("{name}.{s} {}, {}", src.unwrap_or(&NONE), dst.unwrap_or(&NONE))
        };

        match self.kind {
            Kind::Abcd => two("ABCD"),
            Kind::Sbcd => two("SBCD"),
            Kind::Nbcd => format!("NBCD {}", dst.unwrap_or(&NONE)),
            Kind::Or | Kind::Ori => two_sized("OR"),
            Kind::And | Kind::Andi => two_sized("AND"),
            Kind::Sub | Kind::Subi => two_sized("SUB"),
            Kind::Add | Kind::Addi => two_sized("ADD"),
            Kind::Eor | Kind::Eori => two_sized("EOR"),
            Kind::Cmp | Kind::Cmpi | Kind::Cmpm => two_sized("CMP"),
            Kind::Suba => two_sized("SUBA"),
            Kind::Cmpa => two_sized("CMPA"),
            Kind::Adda => two_sized("ADDA"),
            Kind::Subq => format!("SUBQ.{s} #{}, {}", quick(self.data), dst.unwrap_or(&NONE)),
            Kind::Addq => format!("ADDQ.{s} #{}, {}", quick(self.data), dst.unwrap_or(&NONE)),
            Kind::Subx => two_sized("SUBX"),
            Kind::Addx => two_sized("ADDX"),
            Kind::OriToCcr => "ORI #, CCR".into(),
            Kind::OriToSr => "ORI #, SR".into(),
            Kind::AndiToCcr => "ANDI #, CCR".into(),
            Kind::AndiToSr => "ANDI #, SR".into(),
            Kind::EoriToCcr => "EORI #, CCR".into(),
            Kind::EoriToSr => "EORI #, SR".into(),
            Kind::Asl | Kind::Asr | Kind::Lsl | Kind::Lsr | Kind::Rol | Kind::Ror | Kind::Roxl
            | Kind::Roxr => {
                let name = match self.kind {
                    Kind::Asl => "ASL",
                    Kind::Asr => "ASR",
                    Kind::Lsl => "LSL",
                    Kind::Lsr => "LSR",
                    Kind::Rol => "ROL",
                    Kind::Ror => "ROR",
                    Kind::Roxl => "ROXL",
                    _ => "ROXR",
                };
                match (src, dst) {
                    (Some(count), Some(dst)) => format!("{name}.{s} {count}, {dst}"),
                    (None, Some(dst @ Target::DataRegister { .. })) => {
                        format!("{name}.{s} #{}, {dst}", quick(self.data))
                    }
                    (_, d) => format!("{name}.{s} {}", d.unwrap_or(&NONE)),
                }
            }
            Kind::Bcc => format!("B{} {:+}", self.cond.mnemonic(), displacement(self)),
            Kind::Bsr => format!("BSR {:+}", displacement(self)),
            Kind::Dbcc => format!(
                "DB{} {}, {:+}",
                self.cond.mnemonic(),
                dst.unwrap_or(&NONE),
                self.data as u16 as i16
            ),
            Kind::Scc => format!("S{} {}", self.cond.mnemonic(), dst.unwrap_or(&NONE)),
            Kind::Btst => two("BTST"),
            Kind::Bchg => two("BCHG"),
            Kind::Bclr => two("BCLR"),
            Kind::Bset => two("BSET"),
            Kind::Chk => two("CHK"),
            Kind::Negx => format!("NEGX.{s} {}", dst.unwrap_or(&NONE)),
            Kind::Clr => format!("CLR.{s} {}", dst.unwrap_or(&NONE)),
            Kind::Neg => format!("NEG.{s} {}", dst.unwrap_or(&NONE)),
            Kind::Not => format!("NOT.{s} {}", dst.unwrap_or(&NONE)),
            Kind::Divs => two("DIVS"),
            Kind::Divu => two("DIVU"),
            Kind::Muls => two("MULS"),
            Kind::Mulu => two("MULU"),
            Kind::Exg => two("EXG"),
            Kind::Ext => format!("EXT.{s} {}", dst.unwrap_or(&NONE)),
            Kind::Jmp => format!("JMP {}", dst.unwrap_or(&NONE)),
            Kind::Jsr => format!("JSR {}", dst.unwrap_or(&NONE)),
            Kind::Lea => two("LEA"),
            Kind::Link => format!(
                "LINK {}, #{}",
                dst.unwrap_or(&NONE),
                self.data as u16 as i16
            ),
            Kind::Unlink => format!("UNLK {}", dst.unwrap_or(&NONE)),
            Kind::MoveFromSr => format!("MOVE SR, {}", dst.unwrap_or(&NONE)),
            Kind::MoveFromUsp => format!("MOVE USP, {}", dst.unwrap_or(&NONE)),
            Kind::MoveToCcr => format!("MOVE {}, CCR", src.unwrap_or(&NONE)),
            Kind::MoveToSr => format!("MOVE {}, SR", src.unwrap_or(&NONE)),
            Kind::MoveToUsp => format!("MOVE {}, USP", src.unwrap_or(&NONE)),
            Kind::Move => two_sized("MOVE"),
            Kind::Movea => two_sized("MOVEA"),
            Kind::Movep => two_sized("MOVEP"),
            Kind::Movem => {
                if let Some(src) = src {
                    format!("MOVEM.{s} {src}, #${:04X}", self.data)
                } else {
                    format!("MOVEM.{s} #${:04X}, {}", self.data, dst.unwrap_or(&NONE))
                }
            }
            Kind::Moveq => format!(
                "MOVEQ #{}, {}",
                self.data as u8 as i8,
                dst.unwrap_or(&NONE)
            ),
            Kind::Pea => format!("PEA {}", src.unwrap_or(&NONE)),
            Kind::Swap => format!("SWAP {}", dst.unwrap_or(&NONE)),
            Kind::Tas => format!("TAS {}", dst.unwrap_or(&NONE)),
            Kind::Tst => format!("TST.{s} {}", src.unwrap_or(&NONE)),
            Kind::Trap => format!("TRAP #{}", self.data.saturating_sub(32)),
            Kind::Trapv => "TRAPV".into(),
            Kind::Nop => "NOP".into(),
            Kind::Reset => "RESET".into(),
            Kind::Rte => "RTE".into(),
            Kind::Rts => "RTS".into(),
            Kind::Rtr => "RTR".into(),
        }
    }
}

const NONE: Target = Target::DataRegister { index: 0 };

fn quick(data: u32) -> u32 {
    if data == 0 {
        8
    } else {
        data
    }
}

fn displacement(ins: &Instruction) -> i32 {
    if ins.size == Size::Byte {
        i32::from(ins.data as u8 as i8)
    } else {
        i32::from(ins.data as u16 as i16)
    }
}
