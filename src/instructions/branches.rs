//! Conditional branches.
//!
//! By the time a handler runs, the relative addressing mode has already
//! turned the signed offset into an absolute target, so taking a branch is
//! just a PC assignment. Not taking it leaves PC on the next instruction.

use crate::cpu::CPU;
use crate::memory::MemoryBus;

pub(crate) fn bcc<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if !cpu.flag_c {
        cpu.pc = addr;
    }
}

pub(crate) fn bcs<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if cpu.flag_c {
        cpu.pc = addr;
    }
}

pub(crate) fn beq<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if cpu.flag_z {
        cpu.pc = addr;
    }
}

pub(crate) fn bne<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if !cpu.flag_z {
        cpu.pc = addr;
    }
}

pub(crate) fn bmi<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if cpu.flag_n {
        cpu.pc = addr;
    }
}

pub(crate) fn bpl<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if !cpu.flag_n {
        cpu.pc = addr;
    }
}

pub(crate) fn bvs<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if cpu.flag_v {
        cpu.pc = addr;
    }
}

pub(crate) fn bvc<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    if !cpu.flag_v {
        cpu.pc = addr;
    }
}
