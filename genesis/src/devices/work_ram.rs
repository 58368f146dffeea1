use common::{Addr, Device, Error};
use log::error;

pub const WORK_RAM_BEGIN: Addr = 0xC00020;
pub const WORK_RAM_END: Addr = 0xFFFFFF;

// accesses below this are outside the hardware's mirrored 64K window
const RESERVED_END: Addr = 0xFF0000;

/// Main 68000 work RAM. The hardware mirrors a 64K RAM through the top of
/// the address space; this models the whole window as one flat vector and
/// logs traffic that lands in the reserved area below it.
pub struct WorkRam {
    data: Vec<u8>,
}

impl WorkRam {
    pub fn new() -> WorkRam {
        WorkRam {
            data: vec![0; (WORK_RAM_END - WORK_RAM_BEGIN + 1) as usize],
        }
    }
}

impl Default for WorkRam {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for WorkRam {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        if addr < RESERVED_END {
            error!("read from reserved address: {addr:x} size: {}", buf.len());
        }
        let base = (addr - WORK_RAM_BEGIN) as usize;
        buf.copy_from_slice(&self.data[base..base + buf.len()]);
        Ok(())
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        if addr < RESERVED_END {
            error!("write to reserved address: {addr:x} size: {}", buf.len());
        }
        let base = (addr - WORK_RAM_BEGIN) as usize;
        self.data[base..base + buf.len()].copy_from_slice(buf);
        Ok(())
    }
}
