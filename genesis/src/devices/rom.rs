use common::{Addr, Device, Error};
use log::error;

/// Cartridge ROM. Reads past the image end return zero; writes are logged
/// and discarded, because plenty of games write to ROM addresses and would
/// break if that were an error.
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Rom {
        Rom { data }
    }
}

impl Device for Rom {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        for (i, out) in buf.iter_mut().enumerate() {
            *out = self
                .data
                .get(addr as usize + i)
                .copied()
                .unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        error!("protected write address: {addr:06x} size: {:x}", buf.len());
        Ok(())
    }
}
