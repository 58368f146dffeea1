//! Cartridge header: the 256-byte vector table followed by 256 bytes of
//! metadata, all big-endian, at the very start of the ROM image.

use common::mem::be_value;
use common::Error;

pub const HEADER_SIZE: usize = 512;

const HBLANK_VECTOR_OFFSET: usize = 0x70;
const VBLANK_VECTOR_OFFSET: usize = 0x78;

/// Reset and interrupt entry points pulled out of the vector table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorTable {
    pub reset_sp: u32,
    pub reset_pc: u32,
    pub hblank_pc: u32,
    pub vblank_pc: u32,
}

/// Fixed-width ASCII metadata block. Text fields are stored padded on the
/// cartridge; they are exposed trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub system_type: String,
    pub copyright: String,
    pub domestic_title: String,
    pub overseas_title: String,
    pub serial_number: String,
    pub checksum: u16,
    pub device_support: String,
    pub rom_range: (u32, u32),
    pub ram_range: (u32, u32),
    pub region_support: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    pub vectors: VectorTable,
    pub metadata: Metadata,
}

impl RomHeader {
    pub fn parse(rom: &[u8]) -> Result<RomHeader, Error> {
        if rom.len() < HEADER_SIZE {
            return Err(Error::InvalidRead {
                addr: rom.len() as u32,
                what: "ROM image shorter than its 512-byte header".into(),
            });
        }

        let long = |offset: usize| be_value(&rom[offset..offset + 4]) as u32;
        let word = |offset: usize| be_value(&rom[offset..offset + 2]) as u16;
        let text = |offset: usize, len: usize| {
            String::from_utf8_lossy(&rom[offset..offset + len])
                .trim_end()
                .to_string()
        };

        Ok(RomHeader {
            vectors: VectorTable {
                reset_sp: long(0x00),
                reset_pc: long(0x04),
                hblank_pc: long(HBLANK_VECTOR_OFFSET),
                vblank_pc: long(VBLANK_VECTOR_OFFSET),
            },
            metadata: Metadata {
                system_type: text(0x100, 16),
                copyright: text(0x110, 16),
                domestic_title: text(0x120, 48),
                overseas_title: text(0x150, 48),
                serial_number: text(0x180, 14),
                checksum: word(0x18E),
                device_support: text(0x190, 16),
                rom_range: (long(0x1A0), long(0x1A4)),
                ram_range: (long(0x1A8), long(0x1AC)),
                region_support: text(0x1F0, 3),
            },
        })
    }
}
