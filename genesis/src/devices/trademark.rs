use common::{Addr, Device, Error};
use log::debug;

pub const TRADEMARK_BEGIN: Addr = 0xA14000;
pub const TRADEMARK_END: Addr = 0xA14003;

// the ASCII bytes 'SEGA', big-endian
const UNLOCK_VALUE: u32 = 0x5345_4741;

/// The TMSS trademark register. Accepts exactly one 4-byte write of the
/// unlock value; everything else is rejected.
pub struct TrademarkRegister;

impl Device for TrademarkRegister {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        Err(Error::ProtectedRead {
            addr,
            size: buf.len(),
        })
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        if buf.len() != 4 {
            return Err(Error::InvalidWrite {
                addr,
                what: format!("trademark write of size {:x}", buf.len()),
            });
        }
        let value = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if value != UNLOCK_VALUE {
            return Err(Error::InvalidWrite {
                addr,
                what: format!("trademark write of value {value:08x}"),
            });
        }
        debug!("trademark activated");
        Ok(())
    }
}
