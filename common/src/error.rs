use thiserror::Error;

/// Every failure the core can produce. These are plain values; the emulated
/// CPU never unwinds through them, and exceptions the CPU itself takes
/// (TRAP, CHK, divide by zero) are ordinary control flow, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unaligned memory read at {addr:06x} of size {size:x}")]
    UnalignedMemoryRead { addr: u32, size: usize },

    #[error("unaligned memory write at {addr:06x} of size {size:x}")]
    UnalignedMemoryWrite { addr: u32, size: usize },

    #[error("program counter set at {pc:06x}")]
    UnalignedProgramCounter { pc: u32 },

    #[error("unknown addressing mode in word {word:04x}")]
    UnknownAddressingMode { word: u16 },

    #[error("unknown opcode {opcode:04x}")]
    UnknownOpcode { opcode: u16 },

    #[error("protected read address: {addr:06x} size: {size:x}")]
    ProtectedRead { addr: u32, size: usize },

    #[error("protected write address: {addr:06x} size: {size:x}")]
    ProtectedWrite { addr: u32, size: usize },

    #[error("unmapped read address: {addr:06x} size: {size:x}")]
    UnmappedRead { addr: u32, size: usize },

    #[error("unmapped write address: {addr:06x} size: {size:x}")]
    UnmappedWrite { addr: u32, size: usize },

    #[error("invalid read address: {addr:06x}: {what}")]
    InvalidRead { addr: u32, what: String },

    #[error("invalid write address: {addr:06x}: {what}")]
    InvalidWrite { addr: u32, what: String },
}
