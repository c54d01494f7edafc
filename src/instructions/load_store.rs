//! Load and store instructions: LDA, LDX, LDY, STA, STX, STY.
//!
//! Loads update Z and N from the loaded value; stores affect no flags.

use crate::cpu::CPU;
use crate::memory::MemoryBus;

pub(crate) fn lda<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.a = cpu.memory.read(addr);
    cpu.update_nz(cpu.a);
}

pub(crate) fn ldx<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.x = cpu.memory.read(addr);
    cpu.update_nz(cpu.x);
}

pub(crate) fn ldy<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.y = cpu.memory.read(addr);
    cpu.update_nz(cpu.y);
}

pub(crate) fn sta<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.memory.write(addr, cpu.a);
}

pub(crate) fn stx<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.memory.write(addr, cpu.x);
}

pub(crate) fn sty<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    cpu.memory.write(addr, cpu.y);
}
