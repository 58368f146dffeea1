use common::{Addr, Device, Error};
use log::debug;

pub const Z80_RAM_BEGIN: Addr = 0xA00000;
pub const Z80_RAM_END: Addr = 0xA0FFFF;

pub const Z80_CONTROL_BEGIN: Addr = 0xA11100;
pub const Z80_CONTROL_END: Addr = 0xA11201;

const Z80_RAM_SIZE: usize = 0x2000;
const BUS_REQUEST: Addr = 0xA11100;
const RESET: Addr = 0xA11200;

/// The sound CPU's 8K RAM, mirrored through its 64K window. The Z80 itself
/// is not emulated; the 68000 just gets somewhere to park the sound driver.
pub struct Z80Ram {
    data: Vec<u8>,
}

impl Z80Ram {
    pub fn new() -> Z80Ram {
        Z80Ram {
            data: vec![0; Z80_RAM_SIZE],
        }
    }
}

impl Default for Z80Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Z80Ram {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        for (i, out) in buf.iter_mut().enumerate() {
            let offset = (addr as usize + i - Z80_RAM_BEGIN as usize) & (Z80_RAM_SIZE - 1);
            *out = self.data[offset];
        }
        Ok(())
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        for (i, value) in buf.iter().enumerate() {
            let offset = (addr as usize + i - Z80_RAM_BEGIN as usize) & (Z80_RAM_SIZE - 1);
            self.data[offset] = *value;
        }
        Ok(())
    }
}

/// Z80 bus-request and reset lines. A bus request write flips the stored
/// value so that the 68000's acknowledge poll sees the grant it expects.
pub struct Z80Control {
    bus_value: u16,
}

impl Z80Control {
    pub fn new() -> Z80Control {
        Z80Control { bus_value: 0 }
    }
}

impl Default for Z80Control {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Z80Control {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        if buf.len() == 2 && addr == BUS_REQUEST {
            debug!("Z80 bus request read: {:04x}", self.bus_value);
            buf.copy_from_slice(&self.bus_value.to_be_bytes());
            return Ok(());
        }
        if buf.len() == 1 && addr == BUS_REQUEST {
            buf[0] = (self.bus_value >> 8) as u8;
            return Ok(());
        }
        Err(Error::UnmappedRead {
            addr,
            size: buf.len(),
        })
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        if buf.len() == 2 && addr == BUS_REQUEST {
            let value = u16::from_be_bytes([buf[0], buf[1]]);
            debug!("Z80 bus request write: {value:04x}");
            self.bus_value = if value == 0x100 { 0x000 } else { 0x100 };
            return Ok(());
        }
        if buf.len() == 2 && addr == RESET {
            debug!("Z80 reset write");
            return Ok(());
        }
        Err(Error::UnmappedWrite {
            addr,
            size: buf.len(),
        })
    }
}
