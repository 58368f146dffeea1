use common::{Addr, Device, Error};
use log::debug;

pub const CONTROLLER_BEGIN: Addr = 0xA10001;
pub const CONTROLLER_END: Addr = 0xA1001F;

// byte registers sit at odd addresses; the even bytes of each pair read 0
const VERSION: Addr = 0xA10001;
const DATA_1: Addr = 0xA10003;
const DATA_2: Addr = 0xA10005;
const DATA_EXT: Addr = 0xA10007;
const CTRL_1: Addr = 0xA10009;
const CTRL_2: Addr = 0xA1000B;
const CTRL_EXT: Addr = 0xA1000D;
const SERIAL_CTRL_1: Addr = 0xA10013;
const SERIAL_CTRL_2: Addr = 0xA10019;
const SERIAL_CTRL_EXT: Addr = 0xA1001F;

// version register: revision F, no expansion unit, NTSC, overseas
const VERSION_ID: u8 = 0xAF;

const CONTROLLER_COUNT: usize = 3;
const BUTTON_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    A = 4,
    B = 5,
    C = 6,
    Start = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Step1,
    Step2,
}

/// The three controller ports. Each runs a two-step select machine:
/// writing 0x40 to the data register selects step 1, anything else step 2,
/// and reads return the negated pressed state of the buttons visible on
/// the current step.
pub struct ControllerPorts {
    pressed: [[bool; BUTTON_COUNT]; CONTROLLER_COUNT],
    step: [Step; CONTROLLER_COUNT],
    ctrl: [u8; CONTROLLER_COUNT],
}

impl ControllerPorts {
    pub fn new() -> ControllerPorts {
        ControllerPorts {
            pressed: [[false; BUTTON_COUNT]; CONTROLLER_COUNT],
            step: [Step::Step1; CONTROLLER_COUNT],
            ctrl: [0; CONTROLLER_COUNT],
        }
    }

    /// Host input hook.
    pub fn set_button(&mut self, controller: usize, button: Button, pressed: bool) {
        self.pressed[controller][button as usize] = pressed;
    }

    fn pressed_status(&self, controller: usize) -> u8 {
        let pressed = &self.pressed[controller];
        let bit = |button: Button, shift: u8| ((!pressed[button as usize]) as u8) << shift;
        match self.step[controller] {
            Step::Step1 => {
                bit(Button::Up, 0)
                    | bit(Button::Down, 1)
                    | bit(Button::Left, 2)
                    | bit(Button::Right, 3)
                    | bit(Button::B, 4)
                    | bit(Button::C, 5)
            }
            Step::Step2 => {
                bit(Button::Up, 0)
                    | bit(Button::Down, 1)
                    | bit(Button::A, 4)
                    | bit(Button::Start, 5)
            }
        }
    }
}

impl Default for ControllerPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for ControllerPorts {
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error> {
        for (i, out) in buf.iter_mut().enumerate() {
            *out = match addr + i as Addr {
                VERSION => {
                    debug!("read version: {VERSION_ID:02x}");
                    VERSION_ID
                }
                DATA_1 => self.pressed_status(0),
                DATA_2 => self.pressed_status(1),
                DATA_EXT => self.pressed_status(2),
                CTRL_1 => self.ctrl[0],
                CTRL_2 => self.ctrl[1],
                CTRL_EXT => self.ctrl[2],
                _ => 0,
            };
        }
        Ok(())
    }

    fn write(&mut self, addr: Addr, buf: &[u8]) -> Result<(), Error> {
        for (i, value) in buf.iter().enumerate() {
            let select = |value: u8| if value == 0x40 { Step::Step1 } else { Step::Step2 };
            match addr + i as Addr {
                DATA_1 => self.step[0] = select(*value),
                DATA_2 => self.step[1] = select(*value),
                DATA_EXT => self.step[2] = select(*value),
                CTRL_1 => self.ctrl[0] = *value,
                CTRL_2 => self.ctrl[1] = *value,
                CTRL_EXT => self.ctrl[2] = *value,
                SERIAL_CTRL_1 | SERIAL_CTRL_2 | SERIAL_CTRL_EXT => {}
                port => {
                    return Err(Error::InvalidWrite {
                        addr: port,
                        what: format!("controller write of {value:02x}"),
                    });
                }
            }
        }
        Ok(())
    }
}
