pub mod instruction;
pub mod registers;
pub mod target;

mod decode;
mod execute;
mod print;

pub use instruction::{Condition, Instruction, Kind, Size};
pub use registers::{Registers, Status};
pub use target::Target;

use common::Device;

/// Everything an instruction needs to run: the register file and the bus.
/// Threaded explicitly through decode, execute and the effective-address
/// unit; there is no global state, so tests can build fresh contexts freely.
pub struct Context<'a> {
    pub regs: &'a mut Registers,
    pub bus: &'a mut dyn Device,
}
