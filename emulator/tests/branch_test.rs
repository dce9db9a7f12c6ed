//! Branch predicates: taken/not-taken at signed, unsigned and equality
//! boundaries, forward and backward targets.

use riv32emu::{Emu, Mem};

const BEQ: u32 = 0b000;
const BNE: u32 = 0b001;
const BLT: u32 = 0b100;
const BGE: u32 = 0b101;
const BLTU: u32 = 0b110;
const BGEU: u32 = 0b111;

/// Encode a B-type instruction: imm[12|10:5] | rs2 | rs1 | funct3 |
/// imm[4:1|11] | opcode. `imm` must be even.
fn encode_branch(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 12) & 0x1) << 31)
        | (((imm >> 5) & 0x3F) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | (((imm >> 1) & 0xF) << 8)
        | (((imm >> 11) & 0x1) << 7)
        | 0b110_0011
}

/// Encode `addi rd, x0, imm`.
fn encode_li(rd: u32, imm: i32) -> u32 {
    ((imm as u32 & 0xFFF) << 20) | (rd << 7) | 0b001_0011
}

/// Run `addi x1, x0, a; addi x2, x0, b; <branch> x1, x2, +8` and report
/// whether the branch at pc = 8 was taken.
fn branch_taken(funct3: u32, a: i32, b: i32) -> bool {
    let mut emu = Emu::new(Mem::new());
    emu.mem_mut().write_u32(0, encode_li(1, a));
    emu.mem_mut().write_u32(4, encode_li(2, b));
    emu.mem_mut().write_u32(8, encode_branch(funct3, 1, 2, 8));

    emu.step().unwrap();
    emu.step().unwrap();
    emu.step().unwrap();

    match emu.pc() {
        16 => true,
        12 => false,
        pc => panic!("unexpected pc {pc} after branch"),
    }
}

#[test]
fn test_beq() {
    assert!(branch_taken(BEQ, 42, 42));
    assert!(!branch_taken(BEQ, 42, 43));
}

#[test]
fn test_bne() {
    assert!(branch_taken(BNE, 42, 43));
    assert!(!branch_taken(BNE, 42, 42));
}

#[test]
fn test_blt_signed() {
    assert!(branch_taken(BLT, 5, 10));
    assert!(branch_taken(BLT, -5, 10));
    assert!(!branch_taken(BLT, 10, -5));
    assert!(!branch_taken(BLT, 10, 10));
    // just-less / just-greater boundaries
    assert!(branch_taken(BLT, 9, 10));
    assert!(!branch_taken(BLT, 11, 10));
}

#[test]
fn test_bge_signed() {
    assert!(branch_taken(BGE, 10, -5));
    assert!(branch_taken(BGE, 10, 10));
    assert!(!branch_taken(BGE, -5, 10));
}

#[test]
fn test_bltu_unsigned() {
    assert!(branch_taken(BLTU, 5, 10));
    // -1 is 0xFFFFFFFF unsigned, the wraparound boundary
    assert!(branch_taken(BLTU, 10, -1));
    assert!(!branch_taken(BLTU, -1, 10));
    assert!(!branch_taken(BLTU, 10, 10));
}

#[test]
fn test_bgeu_unsigned() {
    assert!(branch_taken(BGEU, -1, 10));
    assert!(branch_taken(BGEU, 10, 10));
    assert!(!branch_taken(BGEU, 10, -1));
}

#[test]
fn test_signed_and_unsigned_compare_disagree_on_wraparound() {
    // same operands, opposite outcomes
    assert!(branch_taken(BLT, -1, 10));
    assert!(!branch_taken(BLTU, -1, 10));
}

#[test]
fn test_not_taken_advances_pc_by_four() {
    let mut emu = Emu::new(Mem::new());
    emu.mem_mut().write_u32(0, encode_li(1, 1));
    emu.mem_mut().write_u32(4, encode_branch(BEQ, 1, 0, 8));

    emu.step().unwrap();
    emu.step().unwrap();

    assert_eq!(emu.pc(), 8);
}

#[test]
fn test_taken_branch_lands_on_pc_plus_immediate() {
    let mut emu = Emu::new(Mem::new());
    emu.mem_mut().write_u32(0, encode_li(1, 7));
    emu.mem_mut().write_u32(4, encode_branch(BEQ, 1, 1, 24));

    emu.step().unwrap();
    emu.step().unwrap();

    assert_eq!(emu.pc(), 4 + 24);
}

#[test]
fn test_backward_branch() {
    let mut emu = Emu::new(Mem::new());
    // two addis, then beq x0, x0, -8 at pc = 8 returns to pc = 0
    emu.mem_mut().write_u32(0, encode_li(1, 1));
    emu.mem_mut().write_u32(4, encode_li(2, 2));
    emu.mem_mut().write_u32(8, encode_branch(BEQ, 0, 0, -8));

    emu.step().unwrap();
    emu.step().unwrap();
    emu.step().unwrap();

    assert_eq!(emu.pc(), 0);
}
