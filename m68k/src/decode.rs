use num_traits::FromPrimitive;

use common::{Device, Error};

use crate::instruction::{Condition, Instruction, Kind, Size};
use crate::target::Target;
use crate::Context;

/// Test `word` against a bit-pattern rule: '0'/'1' must match, '.' is a
/// don't-care, spaces are ignored.
fn matches_pattern(word: u16, pattern: &str) -> bool {
    let mut mask = 0u16;
    let mut value = 0u16;
    for c in pattern.chars() {
        match c {
            ' ' => {}
            '0' | '1' => {
                mask = (mask << 1) | 1;
                value = (value << 1) | u16::from(c == '1');
            }
            _ => {
                mask <<= 1;
                value <<= 1;
            }
        }
    }
    word & mask == value
}

fn fetch_word(ctx: &mut Context) -> Result<u16, Error> {
    let word = ctx.bus.read_u16(ctx.regs.pc)?;
    ctx.regs.pc = ctx.regs.pc.wrapping_add(2);
    Ok(word)
}

/// Build an immediate operand pointing into the instruction stream and step
/// PC over it. A byte immediate lives in the low half of its word.
fn immediate(ctx: &mut Context, size: Size) -> Target {
    let pc = ctx.regs.pc;
    let address = if size == Size::Byte { pc.wrapping_add(1) } else { pc };
    ctx.regs.pc = pc.wrapping_add(if size == Size::Long { 4 } else { 2 });
    Target::Immediate { address }
}

struct Decoder {
    word: u16,
}

impl Decoder {
    fn bits(&self, begin: u32, len: u32) -> u16 {
        (self.word >> begin) & ((1 << len) - 1)
    }

    fn bit(&self, bit: u32) -> bool {
        self.bits(bit, 1) != 0
    }

    fn matches(&self, pattern: &str) -> bool {
        matches_pattern(self.word, pattern)
    }

    fn condition(&self) -> Condition {
        // a 4-bit field covers all sixteen conditions
        Condition::from_u16(self.bits(8, 4)).unwrap()
    }

    /// Size field at bits 6-7. The encoding 3 is illegal for these forms.
    fn size0(&self) -> Result<Size, Error> {
        match self.bits(6, 2) {
            0 => Ok(Size::Byte),
            1 => Ok(Size::Word),
            2 => Ok(Size::Long),
            _ => Err(Error::UnknownOpcode { opcode: self.word }),
        }
    }

    /// Addressing-mode subroutine: a 3-bit mode and a 3-bit register pick
    /// one of the twelve targets, consuming 0, 1 or 2 extension words.
    fn parse_target(
        &self,
        ctx: &mut Context,
        size: Size,
        mode_begin: u32,
        index_begin: u32,
    ) -> Result<Target, Error> {
        let mode = self.bits(mode_begin, 3);
        let index = self.bits(index_begin, 3) as u8;
        Ok(match mode {
            0 => Target::DataRegister { index },
            1 => Target::AddressRegister { index },
            2 => Target::Address { index },
            3 => Target::AddressIncrement { index, size },
            4 => Target::AddressDecrement { index, size },
            5 => Target::AddressDisplacement { index, ext0: fetch_word(ctx)? },
            6 => Target::AddressIndex { index, ext0: fetch_word(ctx)? },
            _ => match index {
                0 => Target::AbsoluteShort { ext0: fetch_word(ctx)? },
                1 => {
                    let high = fetch_word(ctx)?;
                    let low = fetch_word(ctx)?;
                    Target::AbsoluteLong {
                        address: (u32::from(high) << 16) | u32::from(low),
                    }
                }
                2 => Target::PcDisplacement { ext0: fetch_word(ctx)? },
                3 => Target::PcIndex { ext0: fetch_word(ctx)? },
                4 => immediate(ctx, size),
                _ => {
                    return Err(Error::UnknownAddressingMode { word: self.word });
                }
            },
        })
    }

    /// Default operand position: mode at bits 3-5, register at bits 0-2.
    fn parse_dst(&self, ctx: &mut Context, size: Size) -> Result<Target, Error> {
        self.parse_target(ctx, size, 3, 0)
    }

    // [ANDI|EORI|ORI] to [CCR|SR]
    fn try_status_register(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, Kind, u16); 3] = [
            (Kind::OriToCcr, Kind::OriToSr, 0),
            (Kind::AndiToCcr, Kind::AndiToSr, 1),
            (Kind::EoriToCcr, Kind::EoriToSr, 5),
        ];
        for (ccr_kind, sr_kind, index) in CASES {
            if self.matches("0000 ...0 0.11 1100") && self.bits(9, 3) == index {
                let is_word = self.bit(6);
                let pc = ctx.regs.pc;
                let src = Target::Immediate {
                    address: if is_word { pc } else { pc.wrapping_add(1) },
                };
                ctx.regs.pc = pc.wrapping_add(2);

                let kind = if is_word { sr_kind } else { ccr_kind };
                return Ok(Some(Instruction {
                    src: Some(src),
                    ..Instruction::bare(kind)
                }));
            }
        }
        Ok(None)
    }

    // BTST, BCHG, BCLR, BSET; the bit number comes from a data register or
    // an immediate byte. Mode 1 is excluded: that encoding is MOVEP.
    fn try_bit_op(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, &str, &str); 4] = [
            (Kind::Btst, "0000 ...1 00.. ....", "0000 1000 00.. ...."),
            (Kind::Bchg, "0000 ...1 01.. ....", "0000 1000 01.. ...."),
            (Kind::Bclr, "0000 ...1 10.. ....", "0000 1000 10.. ...."),
            (Kind::Bset, "0000 ...1 11.. ....", "0000 1000 11.. ...."),
        ];
        for (kind, register_pattern, immediate_pattern) in CASES {
            if self.matches(register_pattern) && self.bits(3, 3) != 1 {
                let src = Target::DataRegister { index: self.bits(9, 3) as u8 };
                let dst = self.parse_dst(ctx, Size::Byte)?;
                return Ok(Some(Instruction {
                    size: Size::Byte,
                    src: Some(src),
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                }));
            }
            if self.matches(immediate_pattern) {
                let src = Target::Immediate { address: ctx.regs.pc.wrapping_add(1) };
                ctx.regs.pc = ctx.regs.pc.wrapping_add(2);
                let dst = self.parse_dst(ctx, Size::Byte)?;
                return Ok(Some(Instruction {
                    size: Size::Byte,
                    src: Some(src),
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                }));
            }
        }
        Ok(None)
    }

    // NEGX, CLR, NEG, NOT
    fn try_unary(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, &str); 4] = [
            (Kind::Negx, "0100 0000 .... ...."),
            (Kind::Clr, "0100 0010 .... ...."),
            (Kind::Neg, "0100 0100 .... ...."),
            (Kind::Not, "0100 0110 .... ...."),
        ];
        for (kind, pattern) in CASES {
            if self.matches(pattern) && self.bits(6, 2) != 3 {
                let size = self.size0()?;
                let dst = self.parse_dst(ctx, size)?;
                return Ok(Some(Instruction {
                    size,
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                }));
            }
        }
        Ok(None)
    }

    // ASL/ASR, LSL/LSR, ROXL/ROXR, ROL/ROR; memory form shifts by one,
    // register form by an immediate (0 encodes 8) or a data register count.
    fn try_shift(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, Kind, u16); 4] = [
            (Kind::Asl, Kind::Asr, 0),
            (Kind::Lsl, Kind::Lsr, 1),
            (Kind::Roxl, Kind::Roxr, 2),
            (Kind::Rol, Kind::Ror, 3),
        ];
        for (left_kind, right_kind, index) in CASES {
            if self.matches("1110 0... 11.. ....") && self.bits(9, 2) == index {
                let kind = if self.bit(8) { left_kind } else { right_kind };
                let dst = self.parse_dst(ctx, Size::Word)?;
                return Ok(Some(Instruction {
                    size: Size::Word,
                    dst: Some(dst),
                    data: 1,
                    ..Instruction::bare(kind)
                }));
            }
            if self.matches("1110 .... .... ....")
                && self.bits(3, 2) == index
                && self.bits(6, 2) != 3
            {
                let kind = if self.bit(8) { left_kind } else { right_kind };
                let rotation = self.bits(9, 3);
                let dst = Target::DataRegister { index: self.bits(0, 3) as u8 };

                let mut ins = Instruction {
                    size: self.size0()?,
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                };
                if self.bit(5) {
                    // shift count is in a data register
                    ins.src = Some(Target::DataRegister { index: rotation as u8 });
                } else {
                    ins.data = rotation.into();
                }
                return Ok(Some(ins));
            }
        }
        Ok(None)
    }

    // SUBA, CMPA, ADDA
    fn try_binary_on_address(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, u16); 3] = [
            (Kind::Suba, 0),
            (Kind::Cmpa, 1),
            (Kind::Adda, 2),
        ];
        for (kind, index) in CASES {
            if self.matches("1..1 .... 11.. ....") && self.bits(13, 2) == index {
                let size = if self.bit(8) { Size::Long } else { Size::Word };
                let dst = Target::AddressRegister { index: self.bits(9, 3) as u8 };
                let src = self.parse_dst(ctx, size)?;
                return Ok(Some(Instruction {
                    size,
                    src: Some(src),
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                }));
            }
        }
        Ok(None)
    }

    // ORI, ANDI, SUBI, ADDI, EORI, CMPI; the immediate extension words come
    // before the destination's.
    fn try_binary_on_immediate(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, u16); 6] = [
            (Kind::Ori, 0),
            (Kind::Andi, 1),
            (Kind::Subi, 2),
            (Kind::Addi, 3),
            (Kind::Eori, 5),
            (Kind::Cmpi, 6),
        ];
        for (kind, index) in CASES {
            if self.matches("0000 ...0 .... ....") && self.bits(9, 3) == index {
                let size = self.size0()?;
                let src = immediate(ctx, size);
                let dst = self.parse_dst(ctx, size)?;
                return Ok(Some(Instruction {
                    size,
                    src: Some(src),
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                }));
            }
        }
        Ok(None)
    }

    // OR, SUB, EOR, AND, ADD with a data register on one side. When the
    // data register is the destination, the EOR encoding is actually CMP.
    fn try_binary(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        const CASES: [(Kind, u16); 5] = [
            (Kind::Or, 0),
            (Kind::Sub, 1),
            (Kind::Eor, 3),
            (Kind::And, 4),
            (Kind::Add, 5),
        ];
        for (kind, index) in CASES {
            if self.matches("1... .... .... ....") && self.bits(12, 3) == index {
                let size = self.size0()?;
                let mut kind = kind;
                let mut src = Target::DataRegister { index: self.bits(9, 3) as u8 };
                let mut dst = self.parse_dst(ctx, size)?;
                if !self.bit(8) {
                    if kind == Kind::Eor {
                        kind = Kind::Cmp;
                    }
                    std::mem::swap(&mut src, &mut dst);
                }
                return Ok(Some(Instruction {
                    size,
                    src: Some(src),
                    dst: Some(dst),
                    ..Instruction::bare(kind)
                }));
            }
        }
        Ok(None)
    }

    // MOVE, MOVEA, MOVEM, MOVEP, MOVEQ and the SR/CCR/USP moves.
    fn try_move(&self, ctx: &mut Context) -> Result<Option<Instruction>, Error> {
        // MOVE/MOVEA; the size field uses its own encoding
        if self.matches("00.. .... .... ....") {
            let size = match self.bits(12, 2) {
                0b01 => Some(Size::Byte),
                0b11 => Some(Size::Word),
                0b10 => Some(Size::Long),
                _ => None,
            };
            if let Some(size) = size {
                let src = self.parse_target(ctx, size, 3, 0)?;
                // the executor re-reads the source with this PC so that
                // PC-relative sources resolve against the decoded stream
                let pc = ctx.regs.pc;
                let dst = self.parse_target(ctx, size, 6, 9)?;
                let kind = if self.bits(6, 3) == 1 { Kind::Movea } else { Kind::Move };
                return Ok(Some(Instruction {
                    size,
                    src: Some(src),
                    dst: Some(dst),
                    data: pc,
                    ..Instruction::bare(kind)
                }));
            }
        }
        // MOVEP; bit 7 picks the transfer direction
        if self.matches("0000 ...1 ..00 1...") {
            let size = if self.bit(6) { Size::Long } else { Size::Word };
            let mut src = Target::DataRegister { index: self.bits(9, 3) as u8 };
            let mut dst = Target::AddressDisplacement {
                index: self.bits(0, 3) as u8,
                ext0: fetch_word(ctx)?,
            };
            if !self.bit(7) {
                std::mem::swap(&mut src, &mut dst);
            }
            return Ok(Some(Instruction {
                size,
                src: Some(src),
                dst: Some(dst),
                ..Instruction::bare(Kind::Movep)
            }));
        }
        // MOVEM; the register mask word precedes the target
        if self.matches("0100 1.00 1... ....") {
            let mask = fetch_word(ctx)?;
            let size = if self.bit(6) { Size::Long } else { Size::Word };
            let target = self.parse_dst(ctx, size)?;
            let mut ins = Instruction {
                size,
                data: mask.into(),
                ..Instruction::bare(Kind::Movem)
            };
            if self.bit(10) {
                ins.src = Some(target);
            } else {
                ins.dst = Some(target);
            }
            return Ok(Some(ins));
        }
        // MOVEQ
        if self.matches("0111 ...0 .... ....") {
            let dst = Target::DataRegister { index: self.bits(9, 3) as u8 };
            return Ok(Some(Instruction {
                dst: Some(dst),
                data: self.bits(0, 8).into(),
                ..Instruction::bare(Kind::Moveq)
            }));
        }
        // MOVE to CCR / MOVE to SR
        if self.matches("0100 01.0 11.. ....") {
            let src = self.parse_dst(ctx, Size::Word)?;
            let kind = if self.bit(9) { Kind::MoveToSr } else { Kind::MoveToCcr };
            return Ok(Some(Instruction {
                src: Some(src),
                ..Instruction::bare(kind)
            }));
        }
        // MOVE from SR
        if self.matches("0100 0000 11.. ....") {
            let dst = self.parse_dst(ctx, Size::Word)?;
            return Ok(Some(Instruction {
                dst: Some(dst),
                ..Instruction::bare(Kind::MoveFromSr)
            }));
        }
        // MOVE to USP
        if self.matches("0100 1110 0110 0...") {
            let src = Target::AddressRegister { index: self.bits(0, 3) as u8 };
            return Ok(Some(Instruction {
                src: Some(src),
                ..Instruction::bare(Kind::MoveToUsp)
            }));
        }
        // MOVE from USP
        if self.matches("0100 1110 0110 1...") {
            let dst = Target::AddressRegister { index: self.bits(0, 3) as u8 };
            return Ok(Some(Instruction {
                dst: Some(dst),
                ..Instruction::bare(Kind::MoveFromUsp)
            }));
        }
        Ok(None)
    }
}

const TRAP_VECTOR_OFFSET: u32 = 32;
const TRAPV_VECTOR: u32 = 7;

pub(crate) fn decode(ctx: &mut Context) -> Result<Instruction, Error> {
    let d = Decoder { word: fetch_word(ctx)? };

    // Fixed patterns first; the family parsers at the bottom only run when
    // none of these match. The order is load-bearing: several later
    // patterns are supersets of earlier ones.
    if d.matches("0100 1110 0111 0000") {
        Ok(Instruction::bare(Kind::Reset))
    } else if d.matches("0100 1110 0111 0001") {
        Ok(Instruction::bare(Kind::Nop))
    } else if d.matches("0101 .... 1100 1...") {
        let cond = d.condition();
        let dst = Target::DataRegister { index: d.bits(0, 3) as u8 };
        let displacement = fetch_word(ctx)?;
        Ok(Instruction {
            cond,
            dst: Some(dst),
            data: displacement.into(),
            size: Size::Word,
            ..Instruction::bare(Kind::Dbcc)
        })
    } else if d.matches("0101 .... 11.. ....") {
        let cond = d.condition();
        let dst = d.parse_dst(ctx, Size::Byte)?;
        Ok(Instruction {
            cond,
            dst: Some(dst),
            ..Instruction::bare(Kind::Scc)
        })
    } else if d.matches("0101 .... .... ....") {
        let size = d.size0()?;
        let dst = d.parse_dst(ctx, size)?;
        let kind = if d.bit(8) { Kind::Subq } else { Kind::Addq };
        Ok(Instruction {
            size,
            dst: Some(dst),
            data: d.bits(9, 3).into(),
            ..Instruction::bare(kind)
        })
    } else if d.matches("1.00 ...1 0000 ....") {
        let make = |index: u16| {
            if d.bit(3) {
                Target::AddressDecrement { index: index as u8, size: Size::Byte }
            } else {
                Target::DataRegister { index: index as u8 }
            }
        };
        let kind = if d.bit(14) { Kind::Abcd } else { Kind::Sbcd };
        Ok(Instruction {
            size: Size::Byte,
            src: Some(make(d.bits(0, 3))),
            dst: Some(make(d.bits(9, 3))),
            ..Instruction::bare(kind)
        })
    } else if d.matches("1.01 ...1 ..00 ....") && d.bits(6, 2) != 3 {
        let size = d.size0()?;
        let make = |index: u16| {
            if d.bit(3) {
                Target::AddressDecrement { index: index as u8, size }
            } else {
                Target::DataRegister { index: index as u8 }
            }
        };
        let kind = if d.bit(14) { Kind::Addx } else { Kind::Subx };
        Ok(Instruction {
            size,
            src: Some(make(d.bits(0, 3))),
            dst: Some(make(d.bits(9, 3))),
            ..Instruction::bare(kind)
        })
    } else if d.matches("0110 .... .... ....") {
        let cond = d.condition();
        let mut displacement = u32::from(d.bits(0, 8));
        let mut size = Size::Byte;
        if displacement == 0 {
            displacement = fetch_word(ctx)?.into();
            size = Size::Word;
        }

        // the False condition is actually BSR
        if cond == Condition::False {
            Ok(Instruction {
                size,
                data: displacement,
                ..Instruction::bare(Kind::Bsr)
            })
        } else {
            Ok(Instruction {
                size,
                cond,
                data: displacement,
                ..Instruction::bare(Kind::Bcc)
            })
        }
    } else if d.matches("0100 1110 1... ....") {
        let dst = d.parse_dst(ctx, Size::Long)?;
        let kind = if d.bit(6) { Kind::Jmp } else { Kind::Jsr };
        Ok(Instruction {
            dst: Some(dst),
            ..Instruction::bare(kind)
        })
    } else if d.matches("0100 ...1 11.. ....") {
        let src = d.parse_dst(ctx, Size::Long)?;
        let dst = Target::AddressRegister { index: d.bits(9, 3) as u8 };
        Ok(Instruction {
            src: Some(src),
            dst: Some(dst),
            ..Instruction::bare(Kind::Lea)
        })
    } else if d.matches("1011 ...1 ..00 1...") && d.bits(6, 2) != 3 {
        let size = d.size0()?;
        let src = Target::AddressIncrement { index: d.bits(0, 3) as u8, size };
        let dst = Target::AddressIncrement { index: d.bits(9, 3) as u8, size };
        Ok(Instruction {
            size,
            src: Some(src),
            dst: Some(dst),
            ..Instruction::bare(Kind::Cmpm)
        })
    } else if d.matches("0100 1000 0100 0...") {
        let dst = Target::DataRegister { index: d.bits(0, 3) as u8 };
        Ok(Instruction {
            dst: Some(dst),
            ..Instruction::bare(Kind::Swap)
        })
    } else if d.matches("0100 1000 01.. ....") {
        let src = d.parse_dst(ctx, Size::Long)?;
        Ok(Instruction {
            src: Some(src),
            ..Instruction::bare(Kind::Pea)
        })
    } else if d.matches("0100 1010 11.. ....") {
        let dst = d.parse_dst(ctx, Size::Byte)?;
        Ok(Instruction {
            size: Size::Byte,
            dst: Some(dst),
            ..Instruction::bare(Kind::Tas)
        })
    } else if d.matches("1100 ...1 ..00 ....") && d.bits(6, 2) != 3 {
        let src_index = d.bits(9, 3) as u8;
        let dst_index = d.bits(0, 3) as u8;
        let (src, dst) = match d.bits(3, 5) {
            0b01000 => (
                Target::DataRegister { index: src_index },
                Target::DataRegister { index: dst_index },
            ),
            0b01001 => (
                Target::AddressRegister { index: src_index },
                Target::AddressRegister { index: dst_index },
            ),
            _ => (
                Target::DataRegister { index: src_index },
                Target::AddressRegister { index: dst_index },
            ),
        };
        Ok(Instruction {
            src: Some(src),
            dst: Some(dst),
            ..Instruction::bare(Kind::Exg)
        })
    } else if d.matches("0100 1000 1.00 0...") {
        let dst = Target::DataRegister { index: d.bits(0, 3) as u8 };
        let size = if d.bit(6) { Size::Long } else { Size::Word };
        Ok(Instruction {
            size,
            dst: Some(dst),
            ..Instruction::bare(Kind::Ext)
        })
    } else if d.matches("0100 1110 0101 0...") {
        let dst = Target::AddressRegister { index: d.bits(0, 3) as u8 };
        let offset = fetch_word(ctx)?;
        Ok(Instruction {
            dst: Some(dst),
            data: offset.into(),
            ..Instruction::bare(Kind::Link)
        })
    } else if d.matches("0100 1110 0101 1...") {
        let dst = Target::AddressRegister { index: d.bits(0, 3) as u8 };
        Ok(Instruction {
            dst: Some(dst),
            ..Instruction::bare(Kind::Unlink)
        })
    } else if d.matches("0100 1110 0100 ....") {
        Ok(Instruction {
            data: TRAP_VECTOR_OFFSET + u32::from(d.bits(0, 4)),
            ..Instruction::bare(Kind::Trap)
        })
    } else if d.matches("0100 1110 0111 0110") {
        Ok(Instruction {
            data: TRAPV_VECTOR,
            ..Instruction::bare(Kind::Trapv)
        })
    } else if d.matches("0100 1110 0111 0011") {
        Ok(Instruction::bare(Kind::Rte))
    } else if d.matches("0100 1110 0111 0101") {
        Ok(Instruction::bare(Kind::Rts))
    } else if d.matches("0100 1110 0111 0111") {
        Ok(Instruction::bare(Kind::Rtr))
    } else if d.matches("0100 1010 .... ....") {
        let size = d.size0()?;
        let src = d.parse_dst(ctx, size)?;
        Ok(Instruction {
            size,
            src: Some(src),
            ..Instruction::bare(Kind::Tst)
        })
    } else if d.matches("0100 ...1 10.. ....") {
        // the bound operand is the source, the checked register the
        // destination
        let src = d.parse_dst(ctx, Size::Word)?;
        let dst = Target::DataRegister { index: d.bits(9, 3) as u8 };
        Ok(Instruction {
            size: Size::Word,
            src: Some(src),
            dst: Some(dst),
            ..Instruction::bare(Kind::Chk)
        })
    } else if d.matches("0100 1000 00.. ....") {
        let dst = d.parse_dst(ctx, Size::Byte)?;
        Ok(Instruction {
            size: Size::Byte,
            dst: Some(dst),
            ..Instruction::bare(Kind::Nbcd)
        })
    } else if d.matches("1100 .... 11.. ....") {
        let src = d.parse_dst(ctx, Size::Word)?;
        let dst = Target::DataRegister { index: d.bits(9, 3) as u8 };
        let kind = if d.bit(8) { Kind::Muls } else { Kind::Mulu };
        Ok(Instruction {
            src: Some(src),
            dst: Some(dst),
            ..Instruction::bare(kind)
        })
    } else if d.matches("1000 .... 11.. ....") {
        let src = d.parse_dst(ctx, Size::Word)?;
        let dst = Target::DataRegister { index: d.bits(9, 3) as u8 };
        let kind = if d.bit(8) { Kind::Divs } else { Kind::Divu };
        Ok(Instruction {
            src: Some(src),
            dst: Some(dst),
            ..Instruction::bare(kind)
        })
    } else {
        if let Some(ins) = d.try_status_register(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_bit_op(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_unary(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_shift(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_binary_on_address(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_binary_on_immediate(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_binary(ctx)? {
            return Ok(ins);
        }
        if let Some(ins) = d.try_move(ctx)? {
            return Ok(ins);
        }
        Err(Error::UnknownOpcode { opcode: d.word })
    }
}
