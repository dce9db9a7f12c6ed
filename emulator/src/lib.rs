//! RV32I interpreter core.
//!
//! One [`Emu`] instance owns one [`Mem`] and one [`Registers`] file and
//! executes one instruction per [`Emu::step`] call: fetch the word at pc,
//! decode it, apply its effects, commit the next program counter. Program
//! loading is the caller's job: write little-endian instruction words into
//! memory, then drive `step()`.
//!
//! Multiple harts are just multiple independent `Emu` instances; the crate
//! holds no process-wide state.

pub mod emu;
pub mod mem;
pub mod registers;

mod executor;

pub use emu::{Emu, EmuError};
pub use mem::{Mem, DEFAULT_MEM_SIZE};
pub use registers::{Registers, ABI_NAMES};
