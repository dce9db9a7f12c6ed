//! The CPU core: fetch, decode, execute, commit.

use riv32_isa::{decode_instruction, DecodeError, Instruction};
use tracing::{debug, trace};

use crate::executor::execute_instruction;
use crate::mem::Mem;
use crate::registers::{Registers, ABI_NAMES};

/// Errors surfaced by [`Emu::step`].
#[derive(Debug, thiserror::Error)]
pub enum EmuError {
    /// The fetched word decodes to no RV32I instruction. The failing step
    /// mutates nothing: registers, memory and pc keep their prior values.
    #[error("illegal instruction {word:#010x} at pc {pc:#010x}: {source}")]
    IllegalInstruction {
        pc: u32,
        word: u32,
        #[source]
        source: DecodeError,
    },
}

/// One RV32I hart: a register file, a program counter and the memory it
/// executes from.
///
/// Construction binds exactly one [`Mem`]; there is no other runtime
/// configuration. Each [`Emu::step`] call is a pure function of the current
/// (registers, pc, memory) state.
pub struct Emu {
    mem: Mem,
    regs: Registers,
    pc: u32,
    step_count: u64,
}

impl Emu {
    /// Create a hart bound to `mem`, with pc and registers zeroed.
    pub fn new(mem: Mem) -> Self {
        Self { mem, regs: Registers::new(), pc: 0, step_count: 0 }
    }

    /// Execute exactly one instruction.
    ///
    /// Fetches the word at pc from 4 little-endian bytes (wrapping), decodes
    /// it, applies its effects and commits the next program counter: the
    /// control-flow target of a taken jump/branch, pc + 4 otherwise.
    pub fn step(&mut self) -> Result<(), EmuError> {
        let word = self.mem.read_u32(self.pc);
        let inst = decode_instruction(word).map_err(|source| {
            debug!(pc = self.pc, word, %source, "illegal instruction");
            EmuError::IllegalInstruction { pc: self.pc, word, source }
        })?;

        trace!(pc = self.pc, step = self.step_count, inst = %inst, "executing");

        let target = execute_instruction(&inst, self.pc, &mut self.regs, &mut self.mem);
        self.pc = target.unwrap_or(self.pc.wrapping_add(Instruction::size() as u32));
        self.step_count += 1;
        Ok(())
    }

    /// Read `x{index}` as a signed 32-bit value.
    pub fn register_value(&self, index: u8) -> i32 {
        self.regs.get_signed(index)
    }

    /// Current program counter.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Set the program counter, e.g. to a program's entry point.
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Number of instructions executed so far.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Memory, for inspection.
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Memory, for program loading.
    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Human-readable machine state, for diagnostics. Registers holding zero
    /// are omitted, except x0 itself.
    pub fn dump_state(&self) -> String {
        let mut out = format!("pc={:#010x} steps={}\n", self.pc, self.step_count);
        for index in 0..32u8 {
            let value = self.regs.get(index);
            if value != 0 || index == 0 {
                out.push_str(&format!(
                    "  {:>4} (x{:<2}) = {:#010x} ({})\n",
                    ABI_NAMES[index as usize], index, value, value as i32
                ));
            }
        }
        out
    }
}
