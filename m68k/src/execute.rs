use common::{Device, Error};

use crate::instruction::{Instruction, Kind, Size};
use crate::target::Target;
use crate::Context;

/// Grouping shared by the binary ALU families; CMP is SUB that never
/// writes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpType {
    Add,
    And,
    Cmp,
    Eor,
    Or,
    Sub,
}

fn op_type(kind: Kind) -> OpType {
    match kind {
        Kind::Add | Kind::Adda | Kind::Addi | Kind::Addq | Kind::Addx => OpType::Add,
        Kind::And | Kind::Andi | Kind::AndiToCcr | Kind::AndiToSr => OpType::And,
        Kind::Cmp | Kind::Cmpa | Kind::Cmpi | Kind::Cmpm => OpType::Cmp,
        Kind::Eor | Kind::Eori | Kind::EoriToCcr | Kind::EoriToSr => OpType::Eor,
        Kind::Or | Kind::Ori | Kind::OriToCcr | Kind::OriToSr => OpType::Or,
        Kind::Sub | Kind::Suba | Kind::Subi | Kind::Subq | Kind::Subx => OpType::Sub,
        _ => unreachable!("{kind:?} is not a binary ALU kind"),
    }
}

/// All binary ALU math runs at 64-bit width; carries and borrows land in
/// the bits above the operation size.
fn binary_op(op: OpType, lhs: u64, rhs: u64) -> u64 {
    match op {
        OpType::Add => lhs.wrapping_add(rhs),
        OpType::And => lhs & rhs,
        OpType::Eor => lhs ^ rhs,
        OpType::Or => lhs | rhs,
        OpType::Sub | OpType::Cmp => rhs.wrapping_sub(lhs),
    }
}

fn is_subtract(op: OpType) -> bool {
    matches!(op, OpType::Sub | OpType::Cmp)
}

/// Any bits set beyond the operation size.
fn is_carry(value: u64, size: Size) -> bool {
    value & (value ^ size.mask()) != 0
}

fn is_zero(value: u64, size: Size) -> bool {
    value & size.mask() == 0
}

fn msb(value: u64, size: Size) -> bool {
    (value >> (size.bits() - 1)) & 1 != 0
}

/// Signed-overflow test; subtraction flips the sign of the left operand
/// before applying the addition formula.
fn is_overflow(lhs: u64, rhs: u64, result: u64, size: Size, op: OpType) -> bool {
    let lhs_msb = msb(lhs, size) ^ is_subtract(op);
    let rhs_msb = msb(rhs, size);
    let result_msb = msb(result, size);
    (lhs_msb && rhs_msb && !result_msb) || (!lhs_msb && !rhs_msb && result_msb)
}

fn push_u16(ctx: &mut Context, value: u16) -> Result<(), Error> {
    let sp = ctx.regs.sp().wrapping_sub(2);
    ctx.regs.set_sp(sp);
    ctx.bus.write_u16(sp, value)
}

fn push_u32(ctx: &mut Context, value: u32) -> Result<(), Error> {
    let sp = ctx.regs.sp().wrapping_sub(4);
    ctx.regs.set_sp(sp);
    ctx.bus.write_u32(sp, value)
}

fn pop_u16(ctx: &mut Context) -> Result<u16, Error> {
    let sp = ctx.regs.sp();
    let value = ctx.bus.read_u16(sp)?;
    ctx.regs.set_sp(sp.wrapping_add(2));
    Ok(value)
}

fn pop_u32(ctx: &mut Context) -> Result<u32, Error> {
    let sp = ctx.regs.sp();
    let value = ctx.bus.read_u32(sp)?;
    ctx.regs.set_sp(sp.wrapping_add(4));
    Ok(value)
}

/// Take the CPU exception with the given vector number: supervisor mode
/// on, PC and SR pushed, PC loaded from the vector table.
fn enter_exception(ctx: &mut Context, vector: u32) -> Result<(), Error> {
    ctx.regs.sr.set_supervisor(true);
    push_u32(ctx, ctx.regs.pc)?;
    push_u16(ctx, ctx.regs.sr.to_raw())?;
    ctx.regs.pc = ctx.bus.read_u32(vector * 4)?;
    Ok(())
}

/// Move PC by the branch displacement in `data`. Word-sized displacements
/// are relative to the displacement word itself, so PC backs up over the
/// extension word it just consumed.
fn displace_pc(ctx: &mut Context, size: Size, data: u32, rewind_always: bool) -> Result<(), Error> {
    if size == Size::Byte {
        let offset = data as u8 as i8;
        ctx.regs.pc = ctx.regs.pc.wrapping_add(offset as i32 as u32);
    } else {
        let offset = data as u16 as i16;
        ctx.regs.pc = ctx.regs.pc.wrapping_add(offset as i32 as u32);
        if offset < 0 || rewind_always {
            ctx.regs.pc = ctx.regs.pc.wrapping_sub(2);
        }
    }
    if ctx.regs.pc & 1 != 0 {
        return Err(Error::UnalignedProgramCounter { pc: ctx.regs.pc });
    }
    Ok(())
}

/// Pre/post address-adjustment bookkeeping for one operand within one
/// instruction. The pre-decrement fires on the first read or write and
/// never again; the post-increment is applied at most once, either where
/// the operand's last use is or after execution.
struct Operand<'t> {
    target: Option<&'t Target>,
    count: u32,
    decremented: bool,
    incremented: bool,
}

impl<'t> Operand<'t> {
    fn new(target: Option<&'t Target>) -> Operand<'t> {
        Operand {
            target,
            count: 1,
            decremented: false,
            incremented: false,
        }
    }

    fn get(&self) -> &'t Target {
        self.target.expect("operand missing from decoded instruction")
    }

    fn pre_adjust(&mut self, ctx: &mut Context) {
        if !self.decremented {
            if let Some(target) = self.target {
                target.predecrement(ctx, self.count);
            }
            self.decremented = true;
        }
    }

    fn post_adjust(&mut self, ctx: &mut Context) {
        if !self.incremented {
            if let Some(target) = self.target {
                target.postincrement(ctx, self.count);
            }
            self.incremented = true;
        }
    }

    fn read(&mut self, ctx: &mut Context, buf: &mut [u8]) -> Result<(), Error> {
        self.pre_adjust(ctx);
        self.get().read(ctx, buf)
    }

    fn write(&mut self, ctx: &mut Context, buf: &[u8]) -> Result<(), Error> {
        self.pre_adjust(ctx);
        self.get().write(ctx, buf)
    }

    fn read_wide(&mut self, ctx: &mut Context, size: Size) -> Result<u64, Error> {
        self.pre_adjust(ctx);
        self.get().read_wide(ctx, size)
    }

    fn read_u8(&mut self, ctx: &mut Context) -> Result<u8, Error> {
        self.pre_adjust(ctx);
        self.get().read_u8(ctx)
    }

    fn read_u16(&mut self, ctx: &mut Context) -> Result<u16, Error> {
        self.pre_adjust(ctx);
        self.get().read_u16(ctx)
    }

    fn read_u32(&mut self, ctx: &mut Context) -> Result<u32, Error> {
        self.pre_adjust(ctx);
        self.get().read_u32(ctx)
    }

    fn write_u8(&mut self, ctx: &mut Context, value: u8) -> Result<(), Error> {
        self.pre_adjust(ctx);
        self.get().write_u8(ctx, value)
    }

    fn write_u16(&mut self, ctx: &mut Context, value: u16) -> Result<(), Error> {
        self.pre_adjust(ctx);
        self.get().write_u16(ctx, value)
    }

    fn write_u32(&mut self, ctx: &mut Context, value: u32) -> Result<(), Error> {
        self.pre_adjust(ctx);
        self.get().write_u32(ctx, value)
    }

    fn write_sized(&mut self, ctx: &mut Context, value: u32, size: Size) -> Result<(), Error> {
        self.pre_adjust(ctx);
        self.get().write_sized(ctx, value, size)
    }

    fn effective_address(&self, ctx: &Context) -> u32 {
        self.get().effective_address(ctx)
    }
}

/// MOVEM's register numbering: 0-7 are D0-D7, 8-14 are A0-A6, 15 is the
/// active stack pointer.
fn movem_reg(ctx: &Context, index: u32) -> u32 {
    if index < 8 {
        ctx.regs.d[index as usize]
    } else {
        ctx.regs.a((index - 8) as u8)
    }
}

fn set_movem_reg(ctx: &mut Context, index: u32, value: u32) {
    if index < 8 {
        ctx.regs.d[index as usize] = value;
    } else {
        ctx.regs.set_a((index - 8) as u8, value);
    }
}

pub(crate) fn execute(ins: &Instruction, ctx: &mut Context) -> Result<(), Error> {
    let mut src = Operand::new(ins.src.as_ref());
    let mut dst = Operand::new(ins.dst.as_ref());
    let size = ins.size;

    match ins.kind {
        Kind::Abcd => {
            let src_val = src.read_u8(ctx)?;
            let dst_val = dst.read_u8(ctx)?;
            let extend = ctx.regs.sr.extend() as i32;
            let binary = (i32::from(src_val) + i32::from(dst_val) + extend) as u16;

            let mut carry = false;
            let mut low = i32::from(src_val & 0x0F) + i32::from(dst_val & 0x0F) + extend;
            if low > 9 {
                carry = true;
                low -= 10;
            }
            let mut high =
                i32::from((src_val >> 4) & 0x0F) + i32::from((dst_val >> 4) & 0x0F) + i32::from(carry);
            carry = false;
            if low >= 16 {
                low -= 16;
                high += 1;
            }
            if high > 9 {
                carry = true;
                high -= 10;
            }
            let result = (((high << 4) + low) & 0xFF) as u16;

            dst.write_u8(ctx, result as u8)?;
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(result.into(), Size::Byte));
            sr.set_carry(carry);
            sr.set_extend(carry);
            sr.set_overflow((!binary & result & 0x80) != 0);
            if result != 0 {
                sr.set_zero(false);
            }
        }
        Kind::Sbcd | Kind::Nbcd => {
            let (byte0, byte1) = if ins.kind == Kind::Sbcd {
                let src_val = src.read_u8(ctx)?;
                let dst_val = dst.read_u8(ctx)?;
                (dst_val, src_val)
            } else {
                (0, dst.read_u8(ctx)?)
            };
            let extend = ctx.regs.sr.extend() as i32;
            let binary = (i32::from(byte0) - i32::from(byte1) - extend) as u16;

            let mut carry = false;
            let mut low = i32::from(byte0 & 0x0F) - i32::from(byte1 & 0x0F) - extend;
            if low < 0 {
                carry = true;
                low += 10;
            }
            let mut high =
                i32::from((byte0 >> 4) & 0x0F) - i32::from((byte1 >> 4) & 0x0F) - i32::from(carry);
            carry = false;
            if high < 0 {
                carry = true;
                high += 10;
            }
            if high == 0 && low < 0 {
                carry = true;
            }
            let result = (((high << 4) + low) & 0xFF) as u16;

            dst.write_u8(ctx, result as u8)?;
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(result.into(), Size::Byte));
            sr.set_carry(carry);
            sr.set_extend(carry);
            sr.set_overflow((binary & !result & 0x80) != 0);
            if result != 0 {
                sr.set_zero(false);
            }
        }
        Kind::Add
        | Kind::Addi
        | Kind::And
        | Kind::Andi
        | Kind::Cmp
        | Kind::Cmpi
        | Kind::Cmpm
        | Kind::Eor
        | Kind::Eori
        | Kind::Or
        | Kind::Ori
        | Kind::Sub
        | Kind::Subi => {
            let src_val = src.read_wide(ctx, size)?;
            src.post_adjust(ctx);
            let dst_val = dst.read_wide(ctx, size)?;

            let op = op_type(ins.kind);
            let result = binary_op(op, src_val, dst_val);
            if op != OpType::Cmp {
                dst.write_sized(ctx, result as u32, size)?;
            }

            let carry = is_carry(result, size);
            let overflow = is_overflow(src_val, dst_val, result, size, op);
            let sr = &mut ctx.regs.sr;
            if matches!(op, OpType::Add | OpType::Sub) {
                sr.set_extend(carry);
            }
            sr.set_negative(msb(result, size));
            sr.set_zero(is_zero(result, size));
            if matches!(op, OpType::Add | OpType::Sub | OpType::Cmp) {
                sr.set_overflow(overflow);
                sr.set_carry(carry);
            } else {
                sr.set_overflow(false);
                sr.set_carry(false);
            }
        }
        Kind::Adda | Kind::Cmpa | Kind::Suba => {
            let op = op_type(ins.kind);
            // word sources are sign-extended; the destination is always
            // accessed as a long
            let src_val = if size == Size::Word {
                src.read_u16(ctx)? as i16 as i64 as u64
            } else {
                src.read_u32(ctx)?.into()
            };
            let dst_val = u64::from(dst.read_u32(ctx)?);
            let result = binary_op(op, src_val, dst_val);

            if op == OpType::Cmp {
                let carry = is_carry(result ^ src_val, Size::Long);
                let overflow = is_overflow(src_val, dst_val, result, Size::Long, op);
                let sr = &mut ctx.regs.sr;
                sr.set_negative(msb(result, Size::Long));
                sr.set_zero(is_zero(result, Size::Long));
                sr.set_overflow(overflow);
                sr.set_carry(carry);
            } else {
                dst.write_sized(ctx, result as u32, Size::Long)?;
            }
        }
        Kind::Addq | Kind::Subq => {
            let op = op_type(ins.kind);
            let src_val = if ins.data != 0 { u64::from(ins.data) } else { 8 };
            if matches!(dst.get(), Target::AddressRegister { .. }) {
                // address destinations are full-width and leave flags alone
                let dst_val = u64::from(dst.read_u32(ctx)?);
                let result = binary_op(op, src_val, dst_val);
                dst.write_sized(ctx, result as u32, Size::Long)?;
            } else {
                let dst_val = dst.read_wide(ctx, size)?;
                let result = binary_op(op, src_val, dst_val);
                dst.write_sized(ctx, result as u32, size)?;

                let carry = is_carry(result, size);
                let overflow = is_overflow(src_val, dst_val, result, size, op);
                let sr = &mut ctx.regs.sr;
                sr.set_negative(msb(result, size));
                sr.set_carry(carry);
                sr.set_extend(carry);
                sr.set_overflow(overflow);
                sr.set_zero(is_zero(result, size));
            }
        }
        Kind::Addx | Kind::Subx => {
            let op = op_type(ins.kind);
            let src_val = src.read_wide(ctx, size)?;
            let dst_val = dst.read_wide(ctx, size)?;
            let extend = ctx.regs.sr.extend() as u64;
            let result = binary_op(op, src_val.wrapping_add(extend), dst_val);
            dst.write_sized(ctx, result as u32, size)?;

            let carry = is_carry(result, size);
            let overflow = is_overflow(src_val, dst_val, result, size, op);
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(result, size));
            sr.set_carry(carry);
            sr.set_extend(carry);
            sr.set_overflow(overflow);
            if !is_zero(result, size) {
                sr.set_zero(false);
            }
        }
        Kind::AndiToCcr | Kind::EoriToCcr | Kind::OriToCcr => {
            let value = src.read_u8(ctx)?;
            let op = op_type(ins.kind);
            let ccr = binary_op(op, u64::from(ctx.regs.sr.ccr()), value.into());
            ctx.regs.sr.set_ccr(ccr as u8);
        }
        Kind::MoveToCcr => {
            let value = src.read_u16(ctx)?;
            ctx.regs.sr.set_ccr(value as u8);
        }
        Kind::AndiToSr | Kind::EoriToSr | Kind::OriToSr => {
            let value = src.read_u16(ctx)?;
            let op = op_type(ins.kind);
            let raw = binary_op(op, u64::from(ctx.regs.sr.to_raw()), value.into());
            ctx.regs.sr.set_raw(raw as u16);
        }
        Kind::MoveToSr => {
            let value = src.read_u16(ctx)?;
            src.post_adjust(ctx);
            ctx.regs.sr.set_raw(value);
        }
        Kind::MoveFromSr => {
            dst.write_u16(ctx, ctx.regs.sr.to_raw())?;
        }
        Kind::MoveToUsp => {
            ctx.regs.usp = src.read_u32(ctx)?;
        }
        Kind::MoveFromUsp => {
            let usp = ctx.regs.usp;
            dst.write_u32(ctx, usp)?;
        }
        Kind::Asl | Kind::Asr | Kind::Lsl | Kind::Lsr | Kind::Rol | Kind::Ror | Kind::Roxl
        | Kind::Roxr => {
            let arithmetic = matches!(ins.kind, Kind::Asl | Kind::Asr);
            let rotate = matches!(ins.kind, Kind::Rol | Kind::Ror);
            let extend_rotate = matches!(ins.kind, Kind::Roxl | Kind::Roxr);
            let left = matches!(ins.kind, Kind::Asl | Kind::Lsl | Kind::Rol | Kind::Roxl);

            let dst_val = dst.read_wide(ctx, size)?;
            let rotation = if ins.src.is_some() {
                (src.read_wide(ctx, size)? % 64) as u32
            } else if ins.data != 0 {
                ins.data
            } else {
                8
            };

            let mut result = dst_val;
            let mut has_overflow = false;
            let mut cur_msb = msb(result, size);
            let mut last_bit = false;
            for i in 0..rotation {
                if left {
                    last_bit = msb(result, size);
                    result <<= 1;
                    if rotate {
                        result |= u64::from(last_bit);
                    } else if extend_rotate {
                        result |= ctx.regs.sr.extend() as u64;
                        ctx.regs.sr.set_extend(last_bit);
                        ctx.regs.sr.set_carry(last_bit);
                    }
                } else {
                    last_bit = if i >= size.bits() && arithmetic {
                        false
                    } else {
                        result & 1 != 0
                    };
                    if arithmetic {
                        // the sign bit shifts in a copy of itself
                        result = (result >> 1) | (result & (1 << (size.bits() - 1)));
                    } else {
                        result >>= 1;
                        if rotate {
                            result |= u64::from(last_bit) << (size.bits() - 1);
                        }
                        if extend_rotate {
                            result |= (ctx.regs.sr.extend() as u64) << (size.bits() - 1);
                            ctx.regs.sr.set_extend(last_bit);
                        }
                    }
                }
                let new_msb = msb(result, size);
                if cur_msb != new_msb {
                    has_overflow = true;
                }
                cur_msb = new_msb;
            }

            dst.write_sized(ctx, result as u32, size)?;

            let extend = ctx.regs.sr.extend();
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(result, size));
            sr.set_zero(is_zero(result, size));
            sr.set_overflow(arithmetic && has_overflow);
            if rotation == 0 {
                sr.set_carry(extend_rotate && extend);
            } else {
                if !rotate && !extend_rotate {
                    sr.set_extend(last_bit);
                }
                sr.set_carry(last_bit);
            }
        }
        Kind::Bcc => {
            if ins.cond.holds(ctx.regs.sr) {
                displace_pc(ctx, size, ins.data, true)?;
            }
        }
        Kind::Dbcc => {
            if !ins.cond.holds(ctx.regs.sr) {
                let counter = (dst.read_u16(ctx)? as i16).wrapping_sub(1);
                dst.write_u16(ctx, counter as u16)?;
                if counter != -1 {
                    // the displacement is relative to its own extension
                    // word; forward offsets still need the rewind
                    if (ins.data as u16 as i16) >= 0 {
                        ctx.regs.pc = ctx.regs.pc.wrapping_sub(2);
                    }
                    displace_pc(ctx, Size::Word, ins.data, false)?;
                }
            }
        }
        Kind::Scc => {
            let value = if ins.cond.holds(ctx.regs.sr) { 0xFF } else { 0x00 };
            dst.write_u8(ctx, value)?;
        }
        Kind::Bsr => {
            push_u32(ctx, ctx.regs.pc)?;
            displace_pc(ctx, size, ins.data, true)?;
        }
        Kind::Jmp | Kind::Jsr => {
            let old_pc = ctx.regs.pc;
            ctx.regs.pc = dst.effective_address(ctx);
            if ins.kind == Kind::Jsr {
                push_u32(ctx, old_pc)?;
            }
            if ctx.regs.pc & 1 != 0 {
                return Err(Error::UnalignedProgramCounter { pc: ctx.regs.pc });
            }
        }
        Kind::Lea => {
            let address = src.effective_address(ctx);
            dst.write_u32(ctx, address)?;
        }
        Kind::Pea => {
            let address = src.effective_address(ctx);
            push_u32(ctx, address)?;
        }
        Kind::Bchg | Kind::Bclr | Kind::Bset | Kind::Btst => {
            let bit_num = src.read_u8(ctx)?;
            let on_register = matches!(dst.get(), Target::DataRegister { .. });
            let bit_num = if on_register { bit_num % 32 } else { bit_num % 8 };

            let value: u64 = if on_register {
                dst.read_u32(ctx)?.into()
            } else {
                dst.read_u8(ctx)?.into()
            };

            let mask = 1u64 << bit_num;
            let new_value = match ins.kind {
                Kind::Bchg => value ^ mask,
                Kind::Bclr => value & !mask,
                Kind::Bset => value | mask,
                _ => value,
            };

            // Z reflects the state of the bit before modification
            ctx.regs.sr.set_zero(value & mask == 0);
            if new_value != value {
                if on_register {
                    dst.write_u32(ctx, new_value as u32)?;
                } else {
                    dst.write_u8(ctx, new_value as u8)?;
                }
            }
        }
        Kind::Clr | Kind::Neg | Kind::Negx | Kind::Not => {
            let dst_val = dst.read_wide(ctx, size)?;
            let mut result = dst_val;
            let mut has_overflow = false;

            match ins.kind {
                Kind::Clr => result = 0,
                Kind::Not => result = !result,
                _ => {
                    result = !result;
                    if ins.kind != Kind::Negx || !ctx.regs.sr.extend() {
                        // overflow when the operand was the most negative
                        // value of its size
                        let mask0 = (1u64 << (size.bits() - 1)) - 1;
                        let mask1 = (1u64 << size.bits()) - 1;
                        if result & mask1 == mask0 {
                            has_overflow = true;
                        }
                        result = result.wrapping_add(1);
                    }
                }
            }

            dst.write_sized(ctx, result as u32, size)?;

            let carry = is_carry(result, size);
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(result, size));
            let now_zero = is_zero(result, size);
            if ins.kind != Kind::Negx || !now_zero {
                sr.set_zero(now_zero);
            }
            if matches!(ins.kind, Kind::Neg | Kind::Negx) {
                sr.set_overflow(has_overflow);
                sr.set_carry(carry);
                sr.set_extend(carry);
            } else {
                sr.set_overflow(false);
                sr.set_carry(false);
            }
        }
        Kind::Move => {
            // read the source against the PC captured at decode so that
            // PC-relative sources resolve inside the instruction stream
            let current_pc = ctx.regs.pc;
            ctx.regs.pc = ins.data;
            let src_val = src.read_wide(ctx, size)?;
            src.post_adjust(ctx);
            ctx.regs.pc = current_pc;

            dst.write_sized(ctx, src_val as u32, size)?;

            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(src_val, size));
            sr.set_zero(is_zero(src_val, size));
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Movea => {
            let current_pc = ctx.regs.pc;
            ctx.regs.pc = ins.data;
            let src_val = if size == Size::Word {
                src.read_u16(ctx)? as i16 as i32 as u32
            } else {
                src.read_u32(ctx)?
            };
            src.post_adjust(ctx);
            ctx.regs.pc = current_pc;

            dst.write_u32(ctx, src_val)?;
        }
        Kind::Movep => {
            if matches!(dst.get(), Target::DataRegister { .. }) {
                // peripheral to register: gather every other byte
                let mut addr = src.effective_address(ctx);
                let odd = addr & 1 != 0;
                if odd {
                    addr -= 1;
                }
                let lane = |word: u16| -> u32 {
                    if odd {
                        (word & 0xFF).into()
                    } else {
                        (word >> 8).into()
                    }
                };
                if size == Size::Word {
                    let word0 = ctx.bus.read_u16(addr)?;
                    let word1 = ctx.bus.read_u16(addr.wrapping_add(2))?;
                    let result = (lane(word0) << 8) | lane(word1);
                    dst.write_u16(ctx, result as u16)?;
                } else {
                    let word0 = ctx.bus.read_u16(addr)?;
                    let word1 = ctx.bus.read_u16(addr.wrapping_add(2))?;
                    let word2 = ctx.bus.read_u16(addr.wrapping_add(4))?;
                    let word3 = ctx.bus.read_u16(addr.wrapping_add(6))?;
                    let result =
                        (lane(word0) << 24) | (lane(word1) << 16) | (lane(word2) << 8) | lane(word3);
                    dst.write_u32(ctx, result)?;
                }
            } else {
                // register to peripheral: scatter bytes onto one lane
                let mut addr = dst.effective_address(ctx);
                let odd = addr & 1 != 0;
                if odd {
                    addr -= 1;
                }
                let place = |byte: u32| -> u16 {
                    if odd {
                        byte as u16
                    } else {
                        (byte << 8) as u16
                    }
                };
                if size == Size::Word {
                    let reg = u32::from(src.read_u16(ctx)?);
                    ctx.bus.write_u16(addr, place((reg >> 8) & 0xFF))?;
                    ctx.bus.write_u16(addr.wrapping_add(2), place(reg & 0xFF))?;
                } else {
                    let reg = src.read_u32(ctx)?;
                    ctx.bus.write_u16(addr, place((reg >> 24) & 0xFF))?;
                    ctx.bus.write_u16(addr.wrapping_add(2), place((reg >> 16) & 0xFF))?;
                    ctx.bus.write_u16(addr.wrapping_add(4), place((reg >> 8) & 0xFF))?;
                    ctx.bus.write_u16(addr.wrapping_add(6), place(reg & 0xFF))?;
                }
            }
        }
        Kind::Movem => {
            let mask = ins.data as u16;
            let count = mask.count_ones();
            let bytes = size.bytes() as usize;

            if ins.src.is_some() {
                // memory to registers
                src.count = count;
                let mut data = [0u8; 64];
                src.read(ctx, &mut data[..count as usize * bytes])?;

                let mut pos = 0usize;
                for i in 0..16u32 {
                    if mask & (1 << i) == 0 {
                        continue;
                    }
                    // the postincrement register itself keeps its stepped
                    // value instead of the value from memory
                    let is_self = i >= 8
                        && matches!(src.get(),
                            Target::AddressIncrement { index, .. } if u32::from(*index) == i - 8);
                    if !is_self {
                        let value = if size == Size::Word {
                            common::mem::sign_extend_word(
                                common::mem::be_value(&data[pos..pos + 2]) as u16,
                            )
                        } else {
                            common::mem::be_value(&data[pos..pos + 4]) as u32
                        };
                        set_movem_reg(ctx, i, value);
                    }
                    pos += bytes;
                }
            } else {
                // registers to memory; the mask is reversed under
                // predecrement addressing
                let reversed = matches!(dst.get(), Target::AddressDecrement { .. });
                let mut data = [0u8; 64];
                let mut len = 0usize;
                for i in 0..16u32 {
                    let bit = if reversed { 15 - i } else { i };
                    if mask & (1 << bit) == 0 {
                        continue;
                    }
                    let reg = movem_reg(ctx, i);
                    if size == Size::Long {
                        data[len] = (reg >> 24) as u8;
                        data[len + 1] = (reg >> 16) as u8;
                        len += 2;
                    }
                    data[len] = (reg >> 8) as u8;
                    data[len + 1] = reg as u8;
                    len += 2;
                }
                dst.count = count;
                dst.write(ctx, &data[..len])?;
            }
        }
        Kind::Moveq => {
            let value = ins.data as u8 as i8 as i32 as u32;
            dst.write_u32(ctx, value)?;

            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(value.into(), Size::Long));
            sr.set_zero(value == 0);
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Swap => {
            let value = dst.read_u32(ctx)?;
            let value = value.rotate_left(16);
            dst.write_u32(ctx, value)?;

            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(value.into(), Size::Long));
            sr.set_zero(value == 0);
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Tas => {
            let old = dst.read_u8(ctx)?;
            dst.write_u8(ctx, old | 0x80)?;

            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(old.into(), Size::Byte));
            sr.set_zero(old == 0);
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Exg => {
            let src_val = src.read_u32(ctx)?;
            let dst_val = dst.read_u32(ctx)?;
            dst.write_u32(ctx, src_val)?;
            src.write_u32(ctx, dst_val)?;
        }
        Kind::Ext => {
            let value: u64;
            if size == Size::Word {
                let word = dst.read_u16(ctx)?;
                let result = (word as u8 as i8 as i16) as u16;
                value = result.into();
                dst.write_u16(ctx, result)?;
            } else {
                let long = dst.read_u32(ctx)?;
                let result = (long as u16 as i16 as i32) as u32;
                value = result.into();
                dst.write_u32(ctx, result)?;
            }
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(value, size));
            sr.set_zero(is_zero(value, size));
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Link => {
            let dst_val = dst.read_u32(ctx)?;
            // LINK A7 pushes the already-decremented stack pointer
            let pushed = if matches!(dst.get(), Target::AddressRegister { index: 7 }) {
                dst_val.wrapping_sub(4)
            } else {
                dst_val
            };
            push_u32(ctx, pushed)?;
            let sp = ctx.regs.sp();
            dst.write_u32(ctx, sp)?;
            let offset = ins.data as u16 as i16;
            ctx.regs.set_sp(sp.wrapping_add(offset as i32 as u32));
        }
        Kind::Unlink => {
            let frame = dst.read_u32(ctx)?;
            ctx.regs.set_sp(frame);
            let value = pop_u32(ctx)?;
            dst.write_u32(ctx, value)?;
        }
        Kind::Trap | Kind::Trapv => {
            if ins.kind != Kind::Trapv || ctx.regs.sr.overflow() {
                enter_exception(ctx, ins.data)?;
            }
        }
        Kind::Rte | Kind::Rtr | Kind::Rts => {
            let new_sr = if ins.kind == Kind::Rts { 0 } else { pop_u16(ctx)? };
            ctx.regs.pc = pop_u32(ctx)?;

            if ins.kind == Kind::Rte {
                ctx.regs.sr.set_raw(new_sr);
            } else if ins.kind == Kind::Rtr {
                ctx.regs.sr.set_ccr(new_sr as u8);
            }

            if ctx.regs.pc & 1 != 0 {
                return Err(Error::UnalignedProgramCounter { pc: ctx.regs.pc });
            }
        }
        Kind::Tst => {
            let value = src.read_wide(ctx, size)?;
            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(value, size));
            sr.set_zero(is_zero(value, size));
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Chk => {
            const CHK_VECTOR: u32 = 6;
            let bound = src.read_u16(ctx)? as i16;
            let value = dst.read_u16(ctx)? as i16;
            if value < 0 || value > bound {
                enter_exception(ctx, CHK_VECTOR)?;
                ctx.regs.sr.set_negative(value < 0);
            }
            let sr = &mut ctx.regs.sr;
            sr.set_zero(false);
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Mulu | Kind::Muls => {
            let src_val = src.read_u16(ctx)?;
            let dst_val = dst.read_u16(ctx)?;

            let result = if ins.kind == Kind::Mulu {
                u32::from(src_val) * u32::from(dst_val)
            } else {
                (i32::from(src_val as i16) * i32::from(dst_val as i16)) as u32
            };

            dst.write_u32(ctx, result)?;

            let sr = &mut ctx.regs.sr;
            sr.set_negative(msb(result.into(), Size::Long));
            sr.set_zero(result == 0);
            sr.set_overflow(false);
            sr.set_carry(false);
        }
        Kind::Divu | Kind::Divs => {
            const ZERO_DIVIDE_VECTOR: u32 = 5;
            let divisor = src.read_u16(ctx)?;
            let dividend = dst.read_u32(ctx)?;

            if divisor == 0 {
                enter_exception(ctx, ZERO_DIVIDE_VECTOR)?;
                let sr = &mut ctx.regs.sr;
                sr.set_negative(false);
                sr.set_zero(false);
                sr.set_overflow(false);
                sr.set_carry(false);
            } else {
                let (quotient, remainder, overflow) = if ins.kind == Kind::Divu {
                    let quotient = dividend / u32::from(divisor);
                    let remainder = dividend % u32::from(divisor);
                    (quotient, remainder, quotient > 0xFFFF)
                } else {
                    // wrapping division: MIN / -1 overflows and must not
                    // write a result, like any other quotient overflow
                    let signed_quotient = (dividend as i32).wrapping_div(i32::from(divisor as i16));
                    let signed_remainder = (dividend as i32).wrapping_rem(i32::from(divisor as i16));
                    let overflow = signed_quotient != i32::from(signed_quotient as i16);
                    (signed_quotient as u32, signed_remainder as u32, overflow)
                };

                if overflow {
                    // the destination is left untouched
                    ctx.regs.sr.set_overflow(true);
                } else {
                    let result = (remainder << 16) | (quotient & 0xFFFF);
                    dst.write_u32(ctx, result)?;
                    let sr = &mut ctx.regs.sr;
                    sr.set_overflow(false);
                    sr.set_negative(msb(quotient.into(), Size::Word));
                    sr.set_zero(quotient == 0);
                }
                ctx.regs.sr.set_carry(false);
            }
        }
        Kind::Nop | Kind::Reset => {}
    }

    src.post_adjust(ctx);
    dst.post_adjust(ctx);
    Ok(())
}
