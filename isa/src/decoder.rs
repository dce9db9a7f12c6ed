//! Single-pass RV32I instruction decoder.
//!
//! [`EncodedInstruction`] parses every field position of a 32-bit word once;
//! the per-opcode decode functions then pick the relevant fields and map
//! `funct3`/`funct7` to the concrete [`Instruction`] variant. Encodings the
//! base set does not define are rejected with a [`DecodeError`] instead of
//! being skipped over.

use std::fmt;

use crate::bits::{field, sign_extend};
use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// Instruction-set families beyond RV32I that the decoder recognizes but
/// does not implement. Adding one means adding [`Instruction`] variants and
/// the matching decode rows; the dispatch itself stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// M - integer multiply/divide
    M,
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extension::M => write!(f, "M (multiply/divide)"),
        }
    }
}

/// Decoder errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("invalid instruction format")]
    InvalidFormat,

    #[error("unsupported extension: {0}")]
    UnsupportedExtension(Extension),
}

/// Parsed fields of a 32-bit RV32I instruction.
///
/// This is a union of all six instruction formats: every field and every
/// immediate variant is extracted up front, and the decoding functions pick
/// the ones their format defines. Extracting fields the format does not use
/// is redundant work, but bitwise operations are cheap and it keeps the
/// decode functions free of bit fiddling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInstruction {
    /// Original 32-bit instruction word
    pub raw: u32,

    /// Opcode field (bits [6:0]) as raw value
    pub opcode_raw: u8,

    /// Opcode as enum (if recognized)
    pub opcode: Option<Opcode>,

    /// Destination register (bits [11:7])
    pub rd: u8,

    /// Function code 3 (bits [14:12])
    pub funct3: u8,

    /// Source register 1 (bits [19:15])
    pub rs1: u8,

    /// Source register 2 (bits [24:20])
    pub rs2: u8,

    /// Function code 7 (bits [31:25])
    pub funct7: u8,

    /// I-type immediate (bits [31:20], sign-extended)
    pub i_immediate: i32,

    /// S-type immediate (split across bits [31:25] and [11:7], sign-extended)
    pub s_immediate: i32,

    /// B-type immediate (branch offset, sign-extended, bit 0 implicit zero)
    pub b_immediate: i32,

    /// U-type immediate (bits [31:12], carried pre-shifted left by 12)
    pub u_immediate: i32,

    /// J-type immediate (jump offset, sign-extended, bit 0 implicit zero)
    pub j_immediate: i32,

    /// Shift amount (5-bit, bits [24:20])
    pub shamt: u8,
}

impl EncodedInstruction {
    /// Parse all field positions of a 32-bit instruction word.
    pub fn new(raw: u32) -> Self {
        let opcode_raw = field(raw, 0, 6) as u8;
        let rd = field(raw, 7, 11) as u8;
        let funct3 = field(raw, 12, 14) as u8;
        let rs1 = field(raw, 15, 19) as u8;
        let rs2 = field(raw, 20, 24) as u8;
        let funct7 = field(raw, 25, 31) as u8;

        Self {
            raw,
            opcode_raw,
            opcode: Opcode::from_bits(opcode_raw),
            rd,
            funct3,
            rs1,
            rs2,
            funct7,
            i_immediate: Self::extract_i_immediate(raw),
            s_immediate: Self::extract_s_immediate(raw),
            b_immediate: Self::extract_b_immediate(raw),
            u_immediate: Self::extract_u_immediate(raw),
            j_immediate: Self::extract_j_immediate(raw),
            shamt: rs2,
        }
    }

    /// I-type: imm[11:0] = bits [31:20]
    fn extract_i_immediate(raw: u32) -> i32 {
        sign_extend(field(raw, 20, 31), 12)
    }

    /// S-type: imm[11:5] = bits [31:25], imm[4:0] = bits [11:7]
    fn extract_s_immediate(raw: u32) -> i32 {
        sign_extend((field(raw, 25, 31) << 5) | field(raw, 7, 11), 12)
    }

    /// B-type: imm[12] = bit 31, imm[11] = bit 7, imm[10:5] = bits [30:25],
    /// imm[4:1] = bits [11:8]; imm[0] is always zero
    fn extract_b_immediate(raw: u32) -> i32 {
        let imm = (field(raw, 31, 31) << 12)
            | (field(raw, 7, 7) << 11)
            | (field(raw, 25, 30) << 5)
            | (field(raw, 8, 11) << 1);
        sign_extend(imm, 13)
    }

    /// U-type: imm[31:12] = bits [31:12], repositioned to the upper 20 bits
    fn extract_u_immediate(raw: u32) -> i32 {
        (field(raw, 12, 31) << 12) as i32
    }

    /// J-type: imm[20] = bit 31, imm[19:12] = bits [19:12], imm[11] = bit 20,
    /// imm[10:1] = bits [30:21]; imm[0] is always zero
    fn extract_j_immediate(raw: u32) -> i32 {
        let imm = (field(raw, 31, 31) << 20)
            | (field(raw, 12, 19) << 12)
            | (field(raw, 20, 20) << 11)
            | (field(raw, 21, 30) << 1);
        sign_extend(imm, 21)
    }
}

/// Decode a 32-bit RV32I instruction word.
pub fn decode_instruction(bits: u32) -> Result<Instruction, DecodeError> {
    let encoded = EncodedInstruction::new(bits);

    match encoded.opcode {
        Some(Opcode::Lui) => decode_lui(&encoded),
        Some(Opcode::Auipc) => decode_auipc(&encoded),
        Some(Opcode::Jal) => decode_jal(&encoded),
        Some(Opcode::Jalr) => decode_jalr(&encoded),
        Some(Opcode::Branch) => decode_branch(&encoded),
        Some(Opcode::Load) => decode_load(&encoded),
        Some(Opcode::Store) => decode_store(&encoded),
        Some(Opcode::OpImm) => decode_op_imm(&encoded),
        Some(Opcode::Op) => decode_op(&encoded),

        None => Err(DecodeError::UnknownOpcode(encoded.opcode_raw)),
    }
}

/// Decode LUI (U-type).
fn decode_lui(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    Ok(Instruction::LUI { rd: encoded.rd, imm: encoded.u_immediate })
}

/// Decode AUIPC (U-type).
fn decode_auipc(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    Ok(Instruction::AUIPC { rd: encoded.rd, imm: encoded.u_immediate })
}

/// Decode JAL (J-type).
fn decode_jal(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    Ok(Instruction::JAL { rd: encoded.rd, offset: encoded.j_immediate })
}

/// Decode JALR (I-type). `funct3` must be zero.
fn decode_jalr(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    if encoded.funct3 != 0b000 {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(Instruction::JALR { rd: encoded.rd, rs1: encoded.rs1, offset: encoded.i_immediate })
}

/// Decode BRANCH instructions (B-type).
fn decode_branch(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    let rs1 = encoded.rs1;
    let rs2 = encoded.rs2;
    let offset = encoded.b_immediate;

    match encoded.funct3 {
        0b000 => Ok(Instruction::BEQ { rs1, rs2, offset }),
        0b001 => Ok(Instruction::BNE { rs1, rs2, offset }),
        0b100 => Ok(Instruction::BLT { rs1, rs2, offset }),
        0b101 => Ok(Instruction::BGE { rs1, rs2, offset }),
        0b110 => Ok(Instruction::BLTU { rs1, rs2, offset }),
        0b111 => Ok(Instruction::BGEU { rs1, rs2, offset }),
        _ => Err(DecodeError::InvalidFormat),
    }
}

/// Decode LOAD instructions (I-type).
fn decode_load(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    let rd = encoded.rd;
    let rs1 = encoded.rs1;
    let offset = encoded.i_immediate;

    match encoded.funct3 {
        0b000 => Ok(Instruction::LB { rd, rs1, offset }),
        0b001 => Ok(Instruction::LH { rd, rs1, offset }),
        0b010 => Ok(Instruction::LW { rd, rs1, offset }),
        0b100 => Ok(Instruction::LBU { rd, rs1, offset }),
        0b101 => Ok(Instruction::LHU { rd, rs1, offset }),
        _ => Err(DecodeError::InvalidFormat),
    }
}

/// Decode STORE instructions (S-type).
fn decode_store(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    let rs1 = encoded.rs1;
    let rs2 = encoded.rs2;
    let offset = encoded.s_immediate;

    match encoded.funct3 {
        0b000 => Ok(Instruction::SB { rs1, rs2, offset }),
        0b001 => Ok(Instruction::SH { rs1, rs2, offset }),
        0b010 => Ok(Instruction::SW { rs1, rs2, offset }),
        _ => Err(DecodeError::InvalidFormat),
    }
}

/// Decode OP-IMM instructions (I-type).
///
/// For the shift instructions the immediate field is repurposed: the shift
/// amount is its low 5 bits and the upper bits (the `funct7` position) must
/// be `0000000` for SLLI/SRLI and `0100000` for SRAI.
fn decode_op_imm(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    let rd = encoded.rd;
    let rs1 = encoded.rs1;
    let imm = encoded.i_immediate;
    let shamt = encoded.shamt;

    match encoded.funct3 {
        0b000 => Ok(Instruction::ADDI { rd, rs1, imm }),
        0b001 => match encoded.funct7 {
            0b000_0000 => Ok(Instruction::SLLI { rd, rs1, shamt }),
            _ => Err(DecodeError::InvalidFormat),
        },
        0b010 => Ok(Instruction::SLTI { rd, rs1, imm }),
        0b011 => Ok(Instruction::SLTIU { rd, rs1, imm }),
        0b100 => Ok(Instruction::XORI { rd, rs1, imm }),
        0b101 => match encoded.funct7 {
            0b000_0000 => Ok(Instruction::SRLI { rd, rs1, shamt }),
            0b010_0000 => Ok(Instruction::SRAI { rd, rs1, shamt }),
            _ => Err(DecodeError::InvalidFormat),
        },
        0b110 => Ok(Instruction::ORI { rd, rs1, imm }),
        0b111 => Ok(Instruction::ANDI { rd, rs1, imm }),
        _ => Err(DecodeError::InvalidFormat),
    }
}

/// Decode OP instructions (R-type).
///
/// The `funct7` row `0000001` belongs to the multiply/divide family; it is
/// recognized and declined until the M extension is implemented.
fn decode_op(encoded: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    let rd = encoded.rd;
    let rs1 = encoded.rs1;
    let rs2 = encoded.rs2;

    match (encoded.funct3, encoded.funct7) {
        (0b000, 0b000_0000) => Ok(Instruction::ADD { rd, rs1, rs2 }),
        (0b000, 0b010_0000) => Ok(Instruction::SUB { rd, rs1, rs2 }),
        (0b001, 0b000_0000) => Ok(Instruction::SLL { rd, rs1, rs2 }),
        (0b010, 0b000_0000) => Ok(Instruction::SLT { rd, rs1, rs2 }),
        (0b011, 0b000_0000) => Ok(Instruction::SLTU { rd, rs1, rs2 }),
        (0b100, 0b000_0000) => Ok(Instruction::XOR { rd, rs1, rs2 }),
        (0b101, 0b000_0000) => Ok(Instruction::SRL { rd, rs1, rs2 }),
        (0b101, 0b010_0000) => Ok(Instruction::SRA { rd, rs1, rs2 }),
        (0b110, 0b000_0000) => Ok(Instruction::OR { rd, rs1, rs2 }),
        (0b111, 0b000_0000) => Ok(Instruction::AND { rd, rs1, rs2 }),

        // Multiply/divide extension slot
        (_, 0b000_0001) => Err(DecodeError::UnsupportedExtension(Extension::M)),

        _ => Err(DecodeError::InvalidFormat),
    }
}
