use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::error::Error;
use crate::mem::{be_value, store_be};
use crate::Addr;

/// A bus peripheral.
///
/// `read` fills `buf` with `buf.len()` bytes taken from the device at
/// `addr, addr + 1, ...`; `write` consumes bytes symmetrically. Multi-byte
/// integers are big-endian on the wire, and the typed helpers are the one
/// place that conversion happens.
pub trait Device {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error>;
    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error>;

    /// Write entry point used by the bus. A device that must read other
    /// peripherals while handling a write (the VDP pulling DMA data)
    /// overrides this; everything else falls through to `write`.
    fn write_with_bus(
        &mut self,
        bus: &mut dyn Device,
        addr: Addr,
        buf: &[u8],
    ) -> Result<(), Error> {
        let _ = bus;
        self.write(addr, buf)
    }

    fn read_u8(&mut self, addr: Addr) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.read(addr, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self, addr: Addr) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        self.read(addr, &mut buf)?;
        Ok(be_value(&buf) as u16)
    }

    fn read_u32(&mut self, addr: Addr) -> Result<u32, Error> {
        let mut buf = [0u8; 4];
        self.read(addr, &mut buf)?;
        Ok(be_value(&buf) as u32)
    }

    fn write_u8(&mut self, addr: Addr, value: u8) -> Result<(), Error> {
        self.write(addr, &[value])
    }

    fn write_u16(&mut self, addr: Addr, value: u16) -> Result<(), Error> {
        let mut buf = [0u8; 2];
        store_be(&mut buf, value.into());
        self.write(addr, &buf)
    }

    fn write_u32(&mut self, addr: Addr, value: u32) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        store_be(&mut buf, value.into());
        self.write(addr, &buf)
    }
}

/// Placeholder where a bus target does not exist. Both directions fail.
pub struct Dummy;

impl Device for Dummy {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        Err(Error::ProtectedRead {
            addr,
            size: buf.len(),
        })
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        Err(Error::ProtectedWrite {
            addr,
            size: buf.len(),
        })
    }
}

/// Clonable handle to a device. Lets the host keep access to a peripheral
/// (controller input, VDP state) after the bus has taken ownership of it.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(inner: T) -> Self {
        Shared(Rc::new(RefCell::new(inner)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(self.0.clone())
    }
}

impl<T: Device> Device for Shared<T> {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        self.0.borrow_mut().read(addr, buf)
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        self.0.borrow_mut().write(addr, buf)
    }

    fn write_with_bus(
        &mut self,
        bus: &mut dyn Device,
        addr: Addr,
        buf: &[u8],
    ) -> Result<(), Error> {
        self.0.borrow_mut().write_with_bus(bus, addr, buf)
    }
}
