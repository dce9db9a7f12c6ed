//! RV32I instruction decoder
//!
//! An instruction is a single command that tells the CPU what to do. RV32I
//! instructions can be grouped two ways:
//!     - By functionality: the base integer set plus optional extensions
//!       (multiply/divide, atomics, ...). This crate implements the base set
//!       only; extension encodings are recognized and declined.
//!     - By instruction format: how the 32 bits are laid out. The six base
//!       formats are R (register-register), I (immediates, loads, jalr),
//!       S (stores), B (branches), U (upper immediates) and J (jumps).
//!
//! Decoding happens in a single pass: [`decoder::EncodedInstruction`] parses
//! every field position once, then the opcode plus `funct3`/`funct7` select
//! the concrete [`Instruction`] variant. One convenient property of the
//! encoding is that a field always sits at the same bit position in every
//! format that carries it, which keeps the field parsing format-independent.

pub mod bits;
pub mod decoder;
pub mod instruction;
pub mod opcode;

pub use bits::{extract_bits, sign_extend, BitRangeError};
pub use decoder::{decode_instruction, DecodeError, Extension};
pub use instruction::Instruction;
pub use opcode::Opcode;
