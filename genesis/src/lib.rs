pub mod devices;
pub mod executor;
pub mod header;
pub mod interrupt;

pub use executor::{Emulator, InstructionInfo, Step};
pub use header::RomHeader;
