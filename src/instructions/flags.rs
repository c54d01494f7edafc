//! Flag set/clear instructions.
//!
//! SED and CLD toggle the Decimal flag like the hardware does, but ADC and
//! SBC never consult it.

use crate::cpu::CPU;
use crate::memory::MemoryBus;

pub(crate) fn clc<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_c = false;
}

pub(crate) fn sec<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_c = true;
}

pub(crate) fn cli<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_i = false;
}

pub(crate) fn sei<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_i = true;
}

pub(crate) fn clv<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_v = false;
}

pub(crate) fn cld<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_d = false;
}

pub(crate) fn sed<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.flag_d = true;
}
