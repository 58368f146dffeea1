use crate::harness::Machine;

#[test]
fn movea_word_sign_extends_and_keeps_flags() {
    let mut m = Machine::new(0x1000, &[0x307C, 0x8000]); // MOVEA.W #$8000, A0
    m.regs.sr.set_zero(true);
    let sr_before = m.regs.sr;

    m.step().unwrap();
    assert_eq!(m.regs.a[0], 0xFFFF_8000);
    assert_eq!(m.regs.sr, sr_before);
}

#[test]
fn moveq_then_ext_long_is_a_no_op() {
    for value in [0x00u16, 0x01, 0x7F, 0x80, 0xFF] {
        let mut m = Machine::new(0x1000, &[0x7000 | value, 0x48C0]); // MOVEQ; EXT.L D0
        m.step().unwrap();
        let after_moveq = m.regs.d[0];
        assert_eq!(after_moveq, value as u8 as i8 as i32 as u32);

        m.step().unwrap();
        assert_eq!(m.regs.d[0], after_moveq, "EXT.L changed MOVEQ #{value:#x}");
    }
}

#[test]
fn ext_word_sign_extends_the_byte() {
    let mut m = Machine::new(0x1000, &[0x4880]); // EXT.W D0
    m.regs.d[0] = 0xFFFF_0080;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0xFFFF_FF80);
    assert!(m.regs.sr.negative());
}

#[test]
fn move_from_sr() {
    let mut m = Machine::new(0x1000, &[0x40C0]); // MOVE SR, D0
    m.regs.sr.set_ccr(0x15);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x15);
}

#[test]
fn move_to_sr_masks_unused_bits() {
    let mut m = Machine::new(0x1000, &[0x46FC, 0xFFFF]); // MOVE #$FFFF, SR

    m.step().unwrap();
    assert_eq!(m.regs.sr.to_raw(), 0b1010_1111_1111_1111);
}

#[test]
fn usp_moves_round_trip() {
    let mut m = Machine::new(0x1000, &[0x4E60, 0x4E69]); // MOVE A0, USP; MOVE USP, A1
    m.regs.sr.set_supervisor(true);
    m.regs.a[0] = 0x1234;

    m.run(2);
    assert_eq!(m.regs.usp, 0x1234);
    assert_eq!(m.regs.a[1], 0x1234);
}

#[test]
fn movem_store_with_predecrement_reverses_the_mask() {
    let mut m = Machine::new(0x1000, &[0x48E7, 0x8002]); // MOVEM.L D0/A6, -(A7)
    m.regs.d[0] = 0x1111_1111;
    m.regs.a[6] = 0x2222_2222;

    m.step().unwrap();
    assert_eq!(m.regs.sp(), 0x7FF8);
    assert_eq!(m.read_u32(0x7FF8), 0x1111_1111);
    assert_eq!(m.read_u32(0x7FFC), 0x2222_2222);
}

#[test]
fn movem_load_with_postincrement() {
    let mut m = Machine::new(0x1000, &[0x4CDF, 0x4001]); // MOVEM.L (A7)+, D0/A6
    m.regs.usp = 0x7000;
    m.write_u32(0x7000, 0x1111_1111);
    m.write_u32(0x7004, 0x2222_2222);

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x1111_1111);
    assert_eq!(m.regs.a[6], 0x2222_2222);
    assert_eq!(m.regs.sp(), 0x7008);
}

#[test]
fn movem_does_not_overwrite_the_postincrement_register() {
    let mut m = Machine::new(0x1000, &[0x4CDF, 0x8001]); // MOVEM.L (A7)+, D0/A7
    m.regs.usp = 0x7000;
    m.write_u32(0x7000, 0x1111_1111);
    m.write_u32(0x7004, 0x2222_2222);

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x1111_1111);
    // A7 keeps its stepped value, not the loaded one
    assert_eq!(m.regs.sp(), 0x7008);
}

#[test]
fn movem_word_loads_sign_extend() {
    let mut m = Machine::new(0x1000, &[0x4C90, 0x0001]); // MOVEM.W (A0), D0
    m.regs.a[0] = 0x3000;
    m.write_u16(0x3000, 0x8000);

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0xFFFF_8000);
}

#[test]
fn movep_word_scatters_onto_even_lanes() {
    let mut m = Machine::new(0x1000, &[0x0188, 0x0002]); // MOVEP.W D0, 2(A0)
    m.regs.d[0] = 0x1234;
    m.regs.a[0] = 0x3000;

    m.step().unwrap();
    assert_eq!(m.read_u8(0x3002), 0x12);
    assert_eq!(m.read_u8(0x3004), 0x34);
}

#[test]
fn movep_word_gathers_from_even_lanes() {
    let mut m = Machine::new(0x1000, &[0x0108, 0x0002]); // MOVEP.W 2(A0), D0
    m.regs.a[0] = 0x3000;
    m.write_u16(0x3002, 0xAB00);
    m.write_u16(0x3004, 0xCD00);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0xABCD);
}

#[test]
fn movep_long_round_trips() {
    // MOVEP.L D0, 0(A0); MOVEP.L 0(A0), D1
    let mut m = Machine::new(0x1000, &[0x01C8, 0x0000, 0x0348, 0x0000]);
    m.regs.d[0] = 0xDEAD_BEEF;
    m.regs.a[0] = 0x3000;

    m.run(2);
    assert_eq!(m.regs.d[1], 0xDEAD_BEEF);
}

#[test]
fn exg_swaps_register_pairs() {
    let mut m = Machine::new(0x1000, &[0xC141]); // EXG D0, D1
    m.regs.d[0] = 1;
    m.regs.d[1] = 2;
    m.step().unwrap();
    assert_eq!(m.regs.d[0], 2);
    assert_eq!(m.regs.d[1], 1);

    let mut m = Machine::new(0x1000, &[0xC189]); // EXG D0, A1
    m.regs.d[0] = 0xAAAA;
    m.regs.a[1] = 0xBBBB;
    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0xBBBB);
    assert_eq!(m.regs.a[1], 0xAAAA);
}

#[test]
fn swap_twice_is_identity() {
    let mut m = Machine::new(0x1000, &[0x4840, 0x4840]); // SWAP D0 twice
    m.regs.d[0] = 0x1234_5678;

    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x5678_1234);
    m.step().unwrap();
    assert_eq!(m.regs.d[0], 0x1234_5678);
}

#[test]
fn link_and_unlk_frame() {
    let mut m = Machine::new(0x1000, &[0x4E56, 0xFFF8, 0x4E5E]); // LINK A6, #-8; UNLK A6
    m.regs.a[6] = 0x1234_5678;

    m.step().unwrap();
    assert_eq!(m.read_u32(0x7FFC), 0x1234_5678);
    assert_eq!(m.regs.a[6], 0x7FFC);
    assert_eq!(m.regs.sp(), 0x7FF4);

    m.step().unwrap();
    assert_eq!(m.regs.a[6], 0x1234_5678);
    assert_eq!(m.regs.sp(), 0x8000);
}

#[test]
fn pea_pushes_the_effective_address() {
    let mut m = Machine::new(0x1000, &[0x4850]); // PEA (A0)
    m.regs.a[0] = 0x3000;

    m.step().unwrap();
    assert_eq!(m.regs.sp(), 0x7FFC);
    assert_eq!(m.read_u32(0x7FFC), 0x3000);
}

#[test]
fn move_pc_relative_source_reads_the_stream() {
    // MOVE.W $6(PC), D0 reads relative to its own extension word
    let mut m = Machine::new(0x1000, &[0x303A, 0x0006]);
    m.write_u16(0x1008, 0x4242);

    m.step().unwrap();
    assert_eq!(m.regs.d[0] & 0xFFFF, 0x4242);
}
