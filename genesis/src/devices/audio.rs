//! Audio hardware stubs. Sound synthesis is out of scope; these exist so
//! that game code talking to the sound chips keeps running.

use common::{Addr, Device, Error};
use log::debug;

pub const PSG_BEGIN: Addr = 0xC00011;
pub const PSG_END: Addr = 0xC00012;

pub const FM_BEGIN: Addr = 0xA04000;
pub const FM_END: Addr = 0xA04003;

/// Programmable sound generator; write-only.
pub struct Psg;

impl Device for Psg {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        Err(Error::ProtectedRead {
            addr,
            size: buf.len(),
        })
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        let _ = addr;
        debug!("write to PSG byte: {:02x}", buf.first().copied().unwrap_or(0));
        Ok(())
    }
}

/// FM synthesizer; reads return zero (never busy), writes are dropped.
pub struct FmSynth;

impl Device for FmSynth {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        debug!("read from FM synth address: {addr:06x} size: {}", buf.len());
        buf.fill(0);
        Ok(())
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        debug!(
            "write to FM synth address: {addr:06x} byte: {:02x}",
            buf.first().copied().unwrap_or(0)
        );
        Ok(())
    }
}
