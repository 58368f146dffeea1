use std::time::{Duration, Instant};

use common::{Device, Error};
use log::debug;
use m68k::Context;

const VBLANK_LEVEL: u8 = 6;

// 60 frames per second for the NTSC machine modelled here
const NTSC_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Wall-clock vblank source. Polled between instructions; once a frame
/// period has elapsed it pushes an interrupt frame onto the supervisor
/// stack and jumps through the vblank vector.
pub struct InterruptClock {
    vblank_pc: u32,
    period: Duration,
    last_fire: Instant,
}

impl InterruptClock {
    pub fn new(vblank_pc: u32) -> InterruptClock {
        InterruptClock {
            vblank_pc,
            period: NTSC_FRAME,
            last_fire: Instant::now(),
        }
    }

    /// Scale the frame period; 1.0 is real-time NTSC.
    pub fn set_game_speed(&mut self, speed: f64) {
        if speed > 0.0 {
            self.period = NTSC_FRAME.div_f64(speed);
        }
    }

    /// Forget elapsed time, so the next vblank comes a full period from
    /// now. Hosts call this when resuming from pause; without it a long
    /// pause would fire a burst of interrupts.
    pub fn reset_time(&mut self) {
        self.last_fire = Instant::now();
    }

    /// Fire the vblank if it is enabled, not masked, and due. Returns true
    /// when the context has been switched into the handler.
    pub fn check(&mut self, ctx: &mut Context, vblank_enabled: bool) -> Result<bool, Error> {
        if !vblank_enabled || ctx.regs.sr.interrupt_mask() >= VBLANK_LEVEL {
            return Ok(false);
        }

        let now = Instant::now();
        if now.duration_since(self.last_fire) >= self.period {
            self.last_fire = now;
            self.call_vblank(ctx)?;
            return Ok(true);
        }

        Ok(false)
    }

    fn call_vblank(&self, ctx: &mut Context) -> Result<(), Error> {
        debug!("vblank interrupt, pc: {:06x}", ctx.regs.pc);

        // the frame goes onto the supervisor stack, but the saved SR is
        // the pre-interrupt one
        let old_sr = ctx.regs.sr.to_raw();
        ctx.regs.sr.set_supervisor(true);

        let sp = ctx.regs.sp().wrapping_sub(4);
        ctx.regs.set_sp(sp);
        ctx.bus.write_u32(sp, ctx.regs.pc)?;

        let sp = sp.wrapping_sub(2);
        ctx.regs.set_sp(sp);
        ctx.bus.write_u16(sp, old_sr)?;

        ctx.regs.sr.set_interrupt_mask(VBLANK_LEVEL);
        ctx.regs.pc = self.vblank_pc;
        Ok(())
    }
}
