use common::{Addr, Device, Error};
use log::debug;

pub const SRAM_REGISTER: Addr = 0xA130F1;

/// Cartridge SRAM bank-switch register; write-only, one byte at a time.
/// Battery-backed saves themselves are not modelled.
pub struct SramRegister;

impl Device for SramRegister {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        Err(Error::ProtectedRead {
            addr,
            size: buf.len(),
        })
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        if buf.len() != 1 {
            return Err(Error::InvalidWrite {
                addr,
                what: format!("SRAM register write of size {:x}", buf.len()),
            });
        }
        debug!("SRAM access register written: {:02x}", buf[0]);
        Ok(())
    }
}
