//! Control flow: JMP, JSR, RTS, BRK, RTI, NOP.

use crate::cpu::{CPU, IRQ_VECTOR};
use crate::memory::MemoryBus;

/// JMP: the effective address is already the final target for both the
/// absolute and indirect forms.
pub(crate) fn jmp<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.pc = addr;
}

/// JSR pushes the address of the last byte of the JSR instruction itself
/// (PC - 1 at this point), then takes the target. RTS undoes both.
pub(crate) fn jsr<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let return_addr = cpu.pc.wrapping_sub(1);
    cpu.push_word(return_addr);
    cpu.pc = addr;
}

pub(crate) fn rts<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.pc = cpu.pop_word().wrapping_add(1);
}

/// BRK: software interrupt.
///
/// PC is bumped past the byte after the opcode (that byte acts as a pad
/// and is skipped on return), then PC and P (with Break set) are pushed,
/// interrupts are disabled, and execution vectors through 0xFFFE. BRK is
/// not a halt by itself; programs that use it as one leave the IRQ vector
/// at zero so the subsequent PC=0 ends the run.
pub(crate) fn brk<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.pc = cpu.pc.wrapping_add(1);
    cpu.push_word(cpu.pc);
    let p = cpu.status() | 0b0001_0000;
    cpu.push(p);
    cpu.flag_i = true;
    cpu.pc = cpu.memory.read_word(IRQ_VECTOR);
}

/// RTI pops P (Break cleared, the unused bit is not stored), then PC.
pub(crate) fn rti<M: MemoryBus>(cpu: &mut CPU<M>) {
    let p = cpu.pop();
    cpu.set_status(p);
    cpu.flag_b = false;
    cpu.pc = cpu.pop_word();
}

pub(crate) fn nop<M: MemoryBus>(_cpu: &mut CPU<M>) {}
