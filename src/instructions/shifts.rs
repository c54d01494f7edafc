//! Shift and rotate instructions: ASL, LSR, ROL, ROR.
//!
//! Each exists in a memory form (read-modify-write at the effective
//! address) and an accumulator form. Carry receives the bit shifted out;
//! the rotates feed the previous carry into the vacated bit.

use crate::cpu::CPU;
use crate::memory::MemoryBus;

fn asl_value<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) -> u8 {
    cpu.flag_c = value & 0x80 != 0;
    let result = value << 1;
    cpu.update_nz(result);
    result
}

fn lsr_value<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) -> u8 {
    cpu.flag_c = value & 0x01 != 0;
    let result = value >> 1;
    cpu.update_nz(result);
    result
}

fn rol_value<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) -> u8 {
    let carry_in = cpu.flag_c as u8;
    cpu.flag_c = value & 0x80 != 0;
    let result = (value << 1) | carry_in;
    cpu.update_nz(result);
    result
}

fn ror_value<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) -> u8 {
    let carry_in = (cpu.flag_c as u8) << 7;
    cpu.flag_c = value & 0x01 != 0;
    let result = (value >> 1) | carry_in;
    cpu.update_nz(result);
    result
}

pub(crate) fn asl<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    let result = asl_value(cpu, value);
    cpu.memory.write(addr, result);
}

pub(crate) fn asl_a<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.a;
    cpu.a = asl_value(cpu, value);
}

pub(crate) fn lsr<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    let result = lsr_value(cpu, value);
    cpu.memory.write(addr, result);
}

pub(crate) fn lsr_a<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.a;
    cpu.a = lsr_value(cpu, value);
}

pub(crate) fn rol<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    let result = rol_value(cpu, value);
    cpu.memory.write(addr, result);
}

pub(crate) fn rol_a<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.a;
    cpu.a = rol_value(cpu, value);
}

pub(crate) fn ror<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.memory.read(addr);
    let result = ror_value(cpu, value);
    cpu.memory.write(addr, result);
}

pub(crate) fn ror_a<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.a;
    cpu.a = ror_value(cpu, value);
}
