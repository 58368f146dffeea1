use crate::flags::{check_flags, N};
use crate::harness::Machine;

#[test]
fn trap_jumps_through_the_vector_table() {
    let mut m = Machine::new(0x1000, &[0x4E40]); // TRAP #0
    m.regs.ssp = 0x6000;
    m.write_u32(32 * 4, 0x5000);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x5000);
    assert!(m.regs.sr.supervisor());
    assert_eq!(m.regs.ssp, 0x5FFA);
    assert_eq!(m.read_u32(0x5FFC), 0x1002);
    // the pushed SR already carries the supervisor bit
    assert_eq!(m.read_u16(0x5FFA) & 0x2000, 0x2000);
}

#[test]
fn trapv_fires_only_on_overflow() {
    let mut m = Machine::new(0x1000, &[0x4E76]); // TRAPV
    m.regs.ssp = 0x6000;
    m.write_u32(7 * 4, 0x5000);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1002); // V clear: nothing happens
    assert!(!m.regs.sr.supervisor());

    let mut m = Machine::new(0x1000, &[0x4E76]);
    m.regs.ssp = 0x6000;
    m.regs.sr.set_overflow(true);
    m.write_u32(7 * 4, 0x5000);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x5000);
    assert!(m.regs.sr.supervisor());
}

#[test]
fn chk_out_of_bounds_takes_vector_6() {
    let mut m = Machine::new(0x1000, &[0x4181]); // CHK D1, D0
    m.regs.d[0] = 0xFFFF; // -1: below the bound
    m.regs.d[1] = 0x0010;
    m.regs.ssp = 0x6000;
    m.write_u32(6 * 4, 0x4100);

    m.step().unwrap();
    assert!(m.regs.sr.supervisor());
    assert_eq!(m.regs.pc, 0x4100);
    check_flags(&m.regs, N);
}

#[test]
fn chk_above_the_bound_fires_too() {
    let mut m = Machine::new(0x1000, &[0x4181]); // CHK D1, D0
    m.regs.d[0] = 0x0020;
    m.regs.d[1] = 0x0010;
    m.regs.ssp = 0x6000;
    m.write_u32(6 * 4, 0x4100);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x4100);
    check_flags(&m.regs, 0); // N only when the value was negative
}

#[test]
fn chk_in_bounds_continues() {
    let mut m = Machine::new(0x1000, &[0x4181]); // CHK D1, D0
    m.regs.d[0] = 0x0005;
    m.regs.d[1] = 0x0010;
    m.regs.sr.set_zero(true);
    m.regs.sr.set_carry(true);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x1002);
    assert!(!m.regs.sr.supervisor());
    check_flags(&m.regs, 0); // Z, V and C are always cleared
}

#[test]
fn rte_restores_the_full_status_register() {
    let mut m = Machine::new(0x1000, &[0x4E73]); // RTE
    m.regs.sr.set_supervisor(true);
    m.regs.ssp = 0x6000;
    m.write_u16(0x6000, 0x0005);
    m.write_u32(0x6002, 0x3000);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x3000);
    assert_eq!(m.regs.sr.to_raw(), 0x0005);
    assert!(!m.regs.sr.supervisor());
    assert_eq!(m.regs.ssp, 0x6006);
}

#[test]
fn rtr_restores_only_the_condition_codes() {
    let mut m = Machine::new(0x1000, &[0x4E77]); // RTR
    m.regs.sr.set_supervisor(true);
    m.regs.ssp = 0x6000;
    m.write_u16(0x6000, 0xFF1F);
    m.write_u32(0x6002, 0x3000);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x3000);
    assert!(m.regs.sr.supervisor()); // system byte untouched
    assert_eq!(m.regs.sr.ccr(), 0x1F);
}

#[test]
fn rts_pops_the_return_address() {
    let mut m = Machine::new(0x1000, &[0x4E75]); // RTS
    m.regs.usp = 0x7FFC;
    m.write_u32(0x7FFC, 0x2000);

    m.step().unwrap();
    assert_eq!(m.regs.pc, 0x2000);
    assert_eq!(m.regs.sp(), 0x8000);
}

#[test]
fn nop_and_reset_do_nothing_observable() {
    let mut m = Machine::new(0x1000, &[0x4E71, 0x4E70]); // NOP; RESET
    m.regs.d[0] = 7;

    m.run(2);
    assert_eq!(m.regs.pc, 0x1004);
    assert_eq!(m.regs.d[0], 7);
    check_flags(&m.regs, 0);
}
