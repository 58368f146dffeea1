pub mod audio;
pub mod controller;
pub mod rom;
pub mod sram;
pub mod trademark;
pub mod vdp;
pub mod work_ram;
pub mod z80;

pub use audio::{FmSynth, Psg};
pub use controller::{Button, ControllerPorts};
pub use rom::Rom;
pub use sram::SramRegister;
pub use trademark::TrademarkRegister;
pub use vdp::Vdp;
pub use work_ram::WorkRam;
pub use z80::{Z80Control, Z80Ram};
