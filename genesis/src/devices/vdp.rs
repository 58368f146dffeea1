//! Video display processor. A 16-byte MMIO window with two data ports, two
//! control ports and the HV counter pairs; behind it three internal RAMs,
//! a 24-byte register file and a DMA engine.
//!
//! The control port runs a two-word protocol: either a register write
//! (high three bits `100`) or an address/command pair that selects a RAM,
//! an address within it and optionally arms DMA.

use common::{Addr, Device, Dummy, Error};
use log::debug;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

pub const VDP_BEGIN: Addr = 0xC00000;
pub const VDP_END: Addr = 0xC0000E;

const DATA_PORT_1: Addr = 0xC00000;
const DATA_PORT_2: Addr = 0xC00002;
const CTRL_PORT_1: Addr = 0xC00004;
const CTRL_PORT_2: Addr = 0xC00006;
const HV_COUNTER_FIRST: Addr = 0xC00008;
const HV_COUNTER_LAST: Addr = 0xC0000E;

const VRAM_SIZE: usize = 65536;
const VSRAM_SIZE: usize = 80;
const CRAM_SIZE: usize = 128;

const REG_FIRST: u8 = 0x80;
const REG_COUNT: usize = 24;

const PLANE_TABLE_SCALE: u32 = 0x2000;
const WINDOW_TABLE_SCALE: u32 = 0x800;
const SPRITE_TABLE_SCALE: u32 = 0x200;
const HSCROLL_TABLE_SCALE: u32 = 0x400;

// status word: NTSC, DMA idle, inside vblank, even frame, no collision or
// overflow, FIFO neither full nor empty
const STATUS_VBLANK: u16 = 1 << 3;

/// Each 4-bit CRAM channel only uses even values; the hardware expands the
/// 8 usable levels onto this ramp.
const CHANNEL_LEVELS: [u8; 8] = [0, 52, 87, 116, 144, 172, 206, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaType {
    MemoryToVram,
    VramFill,
    VramCopy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamKind {
    Vram,
    Vsram,
    Cram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalScrollMode {
    FullScreen,
    Invalid,
    EveryTile,
    EveryLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalScrollMode {
    FullScreen,
    EveryTwoTiles,
}

/// Byte-addressed register numbers accepted by the control port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
enum Reg {
    Mode1 = 0x80,
    Mode2 = 0x81,
    PlaneATable = 0x82,
    WindowTable = 0x83,
    PlaneBTable = 0x84,
    SpriteTable = 0x85,
    Unused86 = 0x86,
    BackgroundColor = 0x87,
    Unused88 = 0x88,
    Unused89 = 0x89,
    HblankRate = 0x8A,
    Mode3 = 0x8B,
    Mode4 = 0x8C,
    HscrollTable = 0x8D,
    Unused8E = 0x8E,
    AutoIncrement = 0x8F,
    PlaneSize = 0x90,
    WindowXDivision = 0x91,
    WindowYDivision = 0x92,
    DmaLengthLow = 0x93,
    DmaLengthHigh = 0x94,
    DmaSourceLow = 0x95,
    DmaSourceMiddle = 0x96,
    DmaSourceHigh = 0x97,
}

pub struct Vdp {
    // register-derived state
    vblank_interrupt_enabled: bool,
    dma_enabled: bool,
    dma_length_words: u32,
    dma_source_words: u32,
    dma_type: DmaType,
    auto_increment: u8,
    tile_width: u8,
    tile_height: u8,
    plane_width: u8,
    plane_height: u8,
    plane_a_table: u32,
    plane_b_table: u32,
    window_table: u32,
    sprite_table: u32,
    hscroll_table: u32,
    hscroll_mode: HorizontalScrollMode,
    vscroll_mode: VerticalScrollMode,
    background_palette: u8,
    background_index: u8,
    window_x_split: u16,
    window_right: bool,
    window_y_split: u16,
    window_below: bool,

    // command-port state
    pending_first_word: Option<u16>,
    use_dma: bool,
    ram_kind: RamKind,
    ram_address: u16,

    // register mirror and the three RAMs
    registers: [u8; REG_COUNT],
    vram: Vec<u8>,
    vsram: Vec<u8>,
    cram: Vec<u8>,
}

impl Default for Vdp {
    fn default() -> Self {
        Self::new()
    }
}

impl Vdp {
    pub fn new() -> Vdp {
        Vdp {
            vblank_interrupt_enabled: false,
            dma_enabled: false,
            dma_length_words: 0,
            dma_source_words: 0,
            dma_type: DmaType::MemoryToVram,
            auto_increment: 0,
            tile_width: 0,
            tile_height: 0,
            plane_width: 0,
            plane_height: 0,
            plane_a_table: 0,
            plane_b_table: 0,
            window_table: 0,
            sprite_table: 0,
            hscroll_table: 0,
            hscroll_mode: HorizontalScrollMode::FullScreen,
            vscroll_mode: VerticalScrollMode::FullScreen,
            background_palette: 0,
            background_index: 0,
            window_x_split: 0,
            window_right: false,
            window_y_split: 0,
            window_below: false,
            pending_first_word: None,
            use_dma: false,
            ram_kind: RamKind::Vram,
            ram_address: 0,
            registers: [0; REG_COUNT],
            vram: vec![0; VRAM_SIZE],
            vsram: vec![0; VSRAM_SIZE],
            cram: vec![0; CRAM_SIZE],
        }
    }

    pub fn vblank_interrupt_enabled(&self) -> bool {
        self.vblank_interrupt_enabled
    }

    /// Screen width in tiles (32 or 40).
    pub fn tile_width(&self) -> u8 {
        self.tile_width
    }

    /// Screen height in tiles (28 or 30).
    pub fn tile_height(&self) -> u8 {
        self.tile_height
    }

    /// Plane dimensions in tiles, out of {32, 64, 128}.
    pub fn plane_size(&self) -> (u8, u8) {
        (self.plane_width, self.plane_height)
    }

    pub fn plane_a_table(&self) -> u32 {
        self.plane_a_table
    }

    pub fn plane_b_table(&self) -> u32 {
        self.plane_b_table
    }

    pub fn window_table(&self) -> u32 {
        self.window_table
    }

    pub fn sprite_table(&self) -> u32 {
        self.sprite_table
    }

    pub fn hscroll_table(&self) -> u32 {
        self.hscroll_table
    }

    pub fn scroll_modes(&self) -> (HorizontalScrollMode, VerticalScrollMode) {
        (self.hscroll_mode, self.vscroll_mode)
    }

    pub fn background_color(&self) -> (u8, u8) {
        (self.background_palette, self.background_index)
    }

    pub fn window_x_division(&self) -> (u16, bool) {
        (self.window_x_split, self.window_right)
    }

    pub fn window_y_division(&self) -> (u16, bool) {
        (self.window_y_split, self.window_below)
    }

    pub fn vram(&self) -> &[u8] {
        &self.vram
    }

    pub fn vsram(&self) -> &[u8] {
        &self.vsram
    }

    pub fn cram(&self) -> &[u8] {
        &self.cram
    }

    /// Decode one CRAM entry to RGB. Entries pack blue in the low nibble
    /// of the even byte, green and red in the odd byte.
    pub fn color(&self, palette: u8, index: u8) -> [u8; 3] {
        let offset = usize::from(palette) * 32 + usize::from(index) * 2;
        let word = (u16::from(self.cram[offset]) << 8) | u16::from(self.cram[offset + 1]);
        let expand = |channel: u16| CHANNEL_LEVELS[usize::from(channel & 0xF) / 2];
        [
            expand(word),
            expand(word >> 4),
            expand(word >> 8),
        ]
    }

    /// Registers, then vram, vsram and cram, concatenated.
    pub fn dump_state(&self) -> Vec<u8> {
        let mut state = Vec::with_capacity(REG_COUNT + VRAM_SIZE + VSRAM_SIZE + CRAM_SIZE);
        state.extend_from_slice(&self.registers);
        state.extend_from_slice(&self.vram);
        state.extend_from_slice(&self.vsram);
        state.extend_from_slice(&self.cram);
        state
    }

    /// Replay the register writes (rebuilding the derived state), then copy
    /// the RAM images verbatim.
    pub fn apply_state(&mut self, state: &[u8]) -> Result<(), Error> {
        let expected = REG_COUNT + VRAM_SIZE + VSRAM_SIZE + CRAM_SIZE;
        if state.len() != expected {
            return Err(Error::InvalidRead {
                addr: state.len() as u32,
                what: format!("state dump must be {expected} bytes"),
            });
        }
        for (i, value) in state[..REG_COUNT].iter().enumerate() {
            let command = (u16::from(REG_FIRST + i as u8) << 8) | u16::from(*value);
            let _ = self.process_register(command);
        }
        let mut state = state;
        self.registers.copy_from_slice(&state[..REG_COUNT]);
        state = &state[REG_COUNT..];
        self.vram.copy_from_slice(&state[..VRAM_SIZE]);
        state = &state[VRAM_SIZE..];
        self.vsram.copy_from_slice(&state[..VSRAM_SIZE]);
        state = &state[VSRAM_SIZE..];
        self.cram.copy_from_slice(state);
        Ok(())
    }

    fn ram(&self) -> &[u8] {
        match self.ram_kind {
            RamKind::Vram => &self.vram,
            RamKind::Vsram => &self.vsram,
            RamKind::Cram => &self.cram,
        }
    }

    fn ram_mut(&mut self) -> &mut [u8] {
        match self.ram_kind {
            RamKind::Vram => &mut self.vram,
            RamKind::Vsram => &mut self.vsram,
            RamKind::Cram => &mut self.cram,
        }
    }

    fn ram_byte(&self, address: u16) -> u8 {
        self.ram().get(usize::from(address)).copied().unwrap_or(0)
    }

    fn read_status(&self) -> u16 {
        STATUS_VBLANK
    }

    /// Control port: a register write, or half of the two-word
    /// address/command sequence.
    fn process_control(&mut self, bus: &mut dyn Device, word: u16) -> Result<(), Error> {
        if word & 0b1110_0000_0000_0000 == 0b1000_0000_0000_0000 {
            return self.process_register(word);
        }

        let Some(first) = self.pending_first_word else {
            self.pending_first_word = Some(word);
            return Ok(());
        };

        let command = (u32::from(first) << 16) | u32::from(word);
        self.ram_address = (((command >> 16) & 0x3FFF) | ((command & 0x3) << 14)) as u16;
        let cd0 = (command >> 30) & 1;
        let cd1 = (command >> 31) & 1;
        let cd2 = (command >> 4) & 1;
        let cd3 = (command >> 5) & 1;
        let cd5 = (command >> 7) & 1;

        self.use_dma = cd5 != 0 && self.dma_enabled;

        let mask = (cd3 << 3) | (cd2 << 2) | (cd1 << 1) | cd0;
        self.ram_kind = match mask {
            0b0001 | 0b0000 => RamKind::Vram,
            0b0011 | 0b1000 => RamKind::Cram,
            0b0101 | 0b0100 => RamKind::Vsram,
            _ => {
                return Err(Error::InvalidWrite {
                    addr: CTRL_PORT_1,
                    what: format!("invalid RAM kind in command {command:08x}"),
                });
            }
        };

        debug!(
            "set RAM address: {:04x} ram_kind: {:?} use_dma: {}",
            self.ram_address, self.ram_kind, self.use_dma
        );

        if self.use_dma && self.dma_type == DmaType::VramCopy {
            return Err(Error::InvalidWrite {
                addr: CTRL_PORT_1,
                what: format!("unsupported DMA type for command {command:08x}"),
            });
        }

        if self.use_dma && self.dma_type == DmaType::MemoryToVram {
            self.dma_memory_to_ram(bus)?;
            self.use_dma = false;
        }

        self.pending_first_word = None;
        Ok(())
    }

    /// Bulk transfer from the bus into the selected RAM, performed
    /// immediately on command completion.
    fn dma_memory_to_ram(&mut self, bus: &mut dyn Device) -> Result<(), Error> {
        let source = self.dma_source_words << 1;
        let length = self.dma_length_words << 1;
        let auto_increment = self.auto_increment;
        debug!(
            "memory to {:?} DMA source: {source:06x} len: {length:04x} dest: {:04x} auto_increment: {auto_increment:x}",
            self.ram_kind, self.ram_address
        );

        if auto_increment == 2 {
            // the whole block in one bus read, clamped to the RAM bound
            let begin = usize::from(self.ram_address);
            let ram = self.ram_mut();
            let safe_len = (length as usize).min(ram.len().saturating_sub(begin));
            bus.read(source, &mut ram[begin..begin + safe_len])?;
            self.ram_address = self.ram_address.wrapping_add(length as u16);
        } else {
            // word by word, stepping by the auto-increment
            for i in 0..self.dma_length_words {
                let begin = usize::from(self.ram_address);
                let ram = self.ram_mut();
                if begin + 2 <= ram.len() {
                    bus.read(source + i * 2, &mut ram[begin..begin + 2])?;
                }
                self.ram_address = self.ram_address.wrapping_add(auto_increment.into());
            }
        }
        Ok(())
    }

    /// Data port: a VRAM fill when armed, otherwise a word into the
    /// selected RAM at the current address.
    fn process_data(&mut self, value: u16) -> Result<(), Error> {
        if self.use_dma {
            if self.dma_type != DmaType::VramFill {
                return Err(Error::InvalidWrite {
                    addr: DATA_PORT_1,
                    what: format!("unsupported DMA type for data write {value:04x}"),
                });
            }

            let length = self.dma_length_words << 1;
            debug!(
                "fill {:?} data: {value:04x} begin: {:04x} len: {length:04x} auto_increment: {}",
                self.ram_kind, self.ram_address, self.auto_increment
            );

            // the fill starts on the opposite byte of the current word
            if self.auto_increment > 1 {
                self.ram_address ^= 1;
            }

            for _ in 0..length {
                let address = usize::from(self.ram_address);
                let byte = value as u8;
                let ram = self.ram_mut();
                if let Some(slot) = ram.get_mut(address) {
                    *slot = byte;
                }
                self.ram_address = self.ram_address.wrapping_add(self.auto_increment.into());
            }
            self.use_dma = false;
            return Ok(());
        }

        let address = usize::from(self.ram_address);
        let bytes = value.to_be_bytes();
        let ram = self.ram_mut();
        if address + 1 < ram.len() {
            ram[address] = bytes[0];
            ram[address + 1] = bytes[1];
        }
        self.ram_address = self.ram_address.wrapping_add(self.auto_increment.into());
        Ok(())
    }

    fn process_register(&mut self, command: u16) -> Result<(), Error> {
        let code = (command >> 8) as u8;
        let value = command as u8;
        let Some(reg) = Reg::from_u8(code) else {
            return Err(Error::InvalidWrite {
                addr: CTRL_PORT_1,
                what: format!("invalid VDP register command {command:04x}"),
            });
        };

        match reg {
            Reg::Mode1 => {
                debug!(
                    "mode1 set enable_hblank_interrupt: {}",
                    value & (1 << 4) != 0
                );
            }
            Reg::Mode2 => {
                self.dma_enabled = value & (1 << 4) != 0;
                self.vblank_interrupt_enabled = value & (1 << 5) != 0;
                self.tile_height = if value & (1 << 3) != 0 { 30 } else { 28 };
                debug!(
                    "mode2 set allow_dma: {} enable_vblank_interrupt: {} height: {}",
                    self.dma_enabled, self.vblank_interrupt_enabled, self.tile_height
                );
            }
            Reg::PlaneATable => {
                self.plane_a_table = PLANE_TABLE_SCALE * u32::from((value >> 3) & 0xF);
                debug!("plane A table address: {:04x}", self.plane_a_table);
            }
            Reg::WindowTable => {
                self.window_table = WINDOW_TABLE_SCALE * u32::from((value >> 1) & 0x3F);
                debug!("window table address: {:04x}", self.window_table);
            }
            Reg::PlaneBTable => {
                self.plane_b_table = PLANE_TABLE_SCALE * u32::from(value & 0xF);
                debug!("plane B table address: {:04x}", self.plane_b_table);
            }
            Reg::SpriteTable => {
                self.sprite_table = SPRITE_TABLE_SCALE * u32::from(value);
                debug!("sprite table address: {:04x}", self.sprite_table);
            }
            Reg::BackgroundColor => {
                self.background_index = value & 0xF;
                self.background_palette = (value >> 4) & 0x3;
                debug!(
                    "background color palette: {} index: {}",
                    self.background_palette, self.background_index
                );
            }
            Reg::HblankRate => {
                debug!("hblank interrupt rate: {value}");
            }
            Reg::Mode3 => {
                self.hscroll_mode = match value & 0x3 {
                    0 => HorizontalScrollMode::FullScreen,
                    1 => HorizontalScrollMode::Invalid,
                    2 => HorizontalScrollMode::EveryTile,
                    _ => HorizontalScrollMode::EveryLine,
                };
                self.vscroll_mode = if value & (1 << 2) != 0 {
                    VerticalScrollMode::EveryTwoTiles
                } else {
                    VerticalScrollMode::FullScreen
                };
                debug!(
                    "mode3 set horizontal_scroll_mode: {:?} vertical_scroll_mode: {:?}",
                    self.hscroll_mode, self.vscroll_mode
                );
            }
            Reg::Mode4 => {
                self.tile_width = if value & 1 != 0 { 40 } else { 32 };
                debug!(
                    "mode4 set width: {} interlace_mode: {} shadow_highlight: {}",
                    self.tile_width,
                    (value >> 1) & 0x3,
                    value & (1 << 3) != 0
                );
            }
            Reg::HscrollTable => {
                self.hscroll_table = HSCROLL_TABLE_SCALE * u32::from(value & 0x7F);
                debug!("hscroll table address: {:04x}", self.hscroll_table);
            }
            Reg::AutoIncrement => {
                self.auto_increment = value;
                debug!("auto increment amount: {value}");
            }
            Reg::PlaneSize => {
                let to_tiles = |bits: u8| match bits & 0x3 {
                    0b01 => 64,
                    0b11 => 128,
                    _ => 32,
                };
                self.plane_width = to_tiles(value);
                self.plane_height = to_tiles(value >> 4);
                debug!(
                    "plane size width: {} height: {}",
                    self.plane_width, self.plane_height
                );
            }
            Reg::WindowXDivision => {
                self.window_x_split = u16::from(value & 0x1F) * 16;
                self.window_right = value & (1 << 7) != 0;
                debug!(
                    "window X division split: {} display_to_the_right: {}",
                    self.window_x_split, self.window_right
                );
            }
            Reg::WindowYDivision => {
                self.window_y_split = u16::from(value & 0x1F) * 8;
                self.window_below = value & (1 << 7) != 0;
                debug!(
                    "window Y division split: {} display_below: {}",
                    self.window_y_split, self.window_below
                );
            }
            Reg::DmaLengthLow => {
                self.dma_length_words = (self.dma_length_words & 0xFF00) | u32::from(value);
                debug!("DMA length: {:04x}", self.dma_length_words);
            }
            Reg::DmaLengthHigh => {
                self.dma_length_words =
                    (self.dma_length_words & 0x00FF) | (u32::from(value) << 8);
                debug!("DMA length: {:04x}", self.dma_length_words);
            }
            Reg::DmaSourceLow => {
                self.dma_source_words = (self.dma_source_words & 0xFF_FF00) | u32::from(value);
                debug!("DMA source: {:06x}", self.dma_source_words);
            }
            Reg::DmaSourceMiddle => {
                self.dma_source_words =
                    (self.dma_source_words & 0xFF_00FF) | (u32::from(value) << 8);
                debug!("DMA source: {:06x}", self.dma_source_words);
            }
            Reg::DmaSourceHigh => {
                self.dma_source_words =
                    (self.dma_source_words & 0x00_FFFF) | (u32::from(value & 0x3F) << 16);
                self.dma_type = match value >> 6 {
                    0b00 => DmaType::MemoryToVram,
                    0b01 => {
                        self.dma_source_words |= 1 << 22;
                        DmaType::MemoryToVram
                    }
                    0b10 => DmaType::VramFill,
                    _ => DmaType::VramCopy,
                };
                debug!(
                    "DMA source: {:06x} type: {:?}",
                    self.dma_source_words, self.dma_type
                );
            }
            Reg::Unused86 | Reg::Unused88 | Reg::Unused89 | Reg::Unused8E => {}
        }

        self.registers[usize::from(code - REG_FIRST)] = value;
        Ok(())
    }
}

impl Device for Vdp {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        let mut addr = addr;
        // a single-byte access names the odd half of its port
        if buf.len() == 1 {
            addr -= 1;
        }

        let mut i = 0;
        while i < buf.len() {
            let port = addr + i as Addr;
            match port {
                DATA_PORT_1 | DATA_PORT_2 => {
                    buf[i] = self.ram_byte(self.ram_address);
                    self.ram_address = self.ram_address.wrapping_add(1);
                    if buf.len() > 1 {
                        buf[i + 1] = self.ram_byte(self.ram_address);
                        self.ram_address = self.ram_address.wrapping_add(1);
                    }
                }
                CTRL_PORT_1 | CTRL_PORT_2 => {
                    let status = self.read_status();
                    if buf.len() == 1 {
                        buf[i] = status as u8;
                    } else {
                        buf[i] = (status >> 8) as u8;
                        buf[i + 1] = status as u8;
                    }
                }
                port if (HV_COUNTER_FIRST - 1..=HV_COUNTER_LAST).contains(&port) => {
                    // HV counters are not modelled
                    buf[i] = 0;
                    if buf.len() > 1 {
                        buf[i + 1] = 0;
                    }
                }
                _ => {
                    return Err(Error::InvalidRead {
                        addr: port,
                        what: format!("VDP read of size {}", buf.len()),
                    });
                }
            }
            i += 2;
        }
        Ok(())
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        // without the bus a memory-to-VRAM DMA has no source to read from
        let mut placeholder = Dummy;
        self.write_with_bus(&mut placeholder, addr, buf)
    }

    fn write_with_bus(
        &mut self,
        bus: &mut dyn Device,
        addr: Addr,
        buf: &[u8],
    ) -> Result<(), Error> {
        let mut i = 0;
        while i < buf.len() {
            let word = if i + 1 < buf.len() {
                (u16::from(buf[i]) << 8) | u16::from(buf[i + 1])
            } else {
                u16::from(buf[i])
            };
            match addr + i as Addr {
                DATA_PORT_1 | DATA_PORT_2 => self.process_data(word)?,
                CTRL_PORT_1 | CTRL_PORT_2 => self.process_control(bus, word)?,
                port => {
                    return Err(Error::InvalidWrite {
                        addr: port,
                        what: format!("VDP write of size {}", buf.len()),
                    });
                }
            }
            i += 2;
        }
        Ok(())
    }
}
