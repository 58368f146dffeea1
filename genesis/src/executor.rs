use std::io;
use std::path::Path;

use common::{AddressRange, Bus, Device, Error, Shared};
use log::{error, trace};
use m68k::{Context, Instruction, Registers};

use crate::devices::{
    audio, controller, sram, trademark, vdp, work_ram, z80, ControllerPorts, FmSynth, Psg, Rom,
    SramRegister, TrademarkRegister, Vdp, WorkRam, Z80Control, Z80Ram,
};
use crate::header::RomHeader;
use crate::interrupt::InterruptClock;

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed,
    VblankInterrupt,
}

/// The instruction at PC, for hosts that display a trace.
#[derive(Debug, Clone)]
pub struct InstructionInfo {
    pub pc: u32,
    pub bytes: Vec<u8>,
    pub description: String,
}

/// The wired-up machine: bus, peripherals, register file and interrupt
/// clock, driven one instruction at a time.
pub struct Emulator {
    bus: Bus,
    regs: Registers,
    vdp: Shared<Vdp>,
    controllers: Shared<ControllerPorts>,
    clock: InterruptClock,
    header: RomHeader,
}

impl Emulator {
    /// Parse the ROM header, build every peripheral and register them on
    /// the bus at their fixed windows.
    pub fn new(rom: Vec<u8>) -> Result<Emulator, Error> {
        let header = RomHeader::parse(&rom)?;
        let vdp = Shared::new(Vdp::new());
        let controllers = Shared::new(ControllerPorts::new());

        let mut bus = Bus::new();
        let (rom_begin, rom_end) = header.metadata.rom_range;
        bus.add_device(AddressRange::new(rom_begin, rom_end), Box::new(Rom::new(rom)));
        // the FM window sits inside the Z80 address space, so it must be
        // registered first
        bus.add_device(
            AddressRange::new(audio::FM_BEGIN, audio::FM_END),
            Box::new(FmSynth),
        );
        bus.add_device(
            AddressRange::new(z80::Z80_RAM_BEGIN, z80::Z80_RAM_END),
            Box::new(Z80Ram::new()),
        );
        bus.add_device(
            AddressRange::new(controller::CONTROLLER_BEGIN, controller::CONTROLLER_END),
            Box::new(controllers.clone()),
        );
        bus.add_device(
            AddressRange::new(z80::Z80_CONTROL_BEGIN, z80::Z80_CONTROL_END),
            Box::new(Z80Control::new()),
        );
        bus.add_device(
            AddressRange::new(sram::SRAM_REGISTER, sram::SRAM_REGISTER),
            Box::new(SramRegister),
        );
        bus.add_device(
            AddressRange::new(trademark::TRADEMARK_BEGIN, trademark::TRADEMARK_END),
            Box::new(TrademarkRegister),
        );
        bus.add_device(
            AddressRange::new(vdp::VDP_BEGIN, vdp::VDP_END),
            Box::new(vdp.clone()),
        );
        bus.add_device(
            AddressRange::new(audio::PSG_BEGIN, audio::PSG_END),
            Box::new(Psg),
        );
        bus.add_device(
            AddressRange::new(work_ram::WORK_RAM_BEGIN, work_ram::WORK_RAM_END),
            Box::new(WorkRam::new()),
        );

        let mut regs = Registers::new();
        regs.usp = header.vectors.reset_sp;
        regs.pc = header.vectors.reset_pc;

        let clock = InterruptClock::new(header.vectors.vblank_pc);

        Ok(Emulator {
            bus,
            regs,
            vdp,
            controllers,
            clock,
            header,
        })
    }

    /// Run one instruction, or take the vblank interrupt if it is due.
    /// Interrupts only ever appear at instruction boundaries.
    pub fn step(&mut self) -> Result<Step, Error> {
        let vblank_enabled = self.vdp.borrow().vblank_interrupt_enabled();
        let mut ctx = Context {
            regs: &mut self.regs,
            bus: &mut self.bus,
        };

        if self.clock.check(&mut ctx, vblank_enabled)? {
            return Ok(Step::VblankInterrupt);
        }

        let begin_pc = ctx.regs.pc;
        let ins = Instruction::decode(&mut ctx)?;
        trace!("pc: {begin_pc:06x}: {}", ins.print());
        if let Err(err) = ins.execute(&mut ctx) {
            error!("execute error pc: {begin_pc:06x} what: {err}");
            return Err(err);
        }
        Ok(Step::Executed)
    }

    /// Step until the predicate says stop. The predicate is polled before
    /// each instruction, which makes it the cooperative cancellation point.
    pub fn run_until(&mut self, mut stop: impl FnMut(&Registers) -> bool) -> Result<(), Error> {
        while !stop(&self.regs) {
            self.step()?;
        }
        Ok(())
    }

    pub fn reset_interrupt_clock(&mut self) {
        self.clock.reset_time();
    }

    pub fn set_game_speed(&mut self, speed: f64) {
        self.clock.set_game_speed(speed);
    }

    /// Decode (but do not run) the instruction at PC. PC is restored
    /// afterwards, so this is safe to call at any point.
    pub fn current_instruction(&mut self) -> Result<InstructionInfo, Error> {
        let begin_pc = self.regs.pc;
        let mut ctx = Context {
            regs: &mut self.regs,
            bus: &mut self.bus,
        };
        let decoded = Instruction::decode(&mut ctx);
        let end_pc = self.regs.pc;
        self.regs.pc = begin_pc;
        let ins = decoded?;

        let mut bytes = vec![0u8; (end_pc - begin_pc) as usize];
        self.bus.read(begin_pc, &mut bytes)?;
        Ok(InstructionInfo {
            pc: begin_pc,
            bytes,
            description: ins.print(),
        })
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn rom_header(&self) -> &RomHeader {
        &self.header
    }

    pub fn vdp(&self) -> Shared<Vdp> {
        self.vdp.clone()
    }

    pub fn controllers(&self) -> Shared<ControllerPorts> {
        self.controllers.clone()
    }

    /// Write the VDP state dump to a file.
    pub fn save_state(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, self.vdp.borrow().dump_state())
    }

    /// Restore a VDP state dump from a file.
    pub fn load_state(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let state = std::fs::read(path)?;
        self.vdp
            .borrow_mut()
            .apply_state(&state)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }
}
