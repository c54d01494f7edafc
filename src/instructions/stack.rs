//! Stack push/pull instructions: PHA, PLA, PHP, PLP.

use crate::cpu::CPU;
use crate::memory::MemoryBus;

pub(crate) fn pha<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.push(cpu.a);
}

pub(crate) fn pla<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.a = cpu.pop();
    cpu.update_nz(cpu.a);
}

/// PHP pushes P with the Break bit set, as the hardware does for any push
/// initiated by an instruction rather than an interrupt line.
pub(crate) fn php<M: MemoryBus>(cpu: &mut CPU<M>) {
    let p = cpu.status() | 0b0001_0000;
    cpu.push(p);
}

/// PLP restores the flags from the stack; Break is a push-time artifact
/// and does not survive the pull.
pub(crate) fn plp<M: MemoryBus>(cpu: &mut CPU<M>) {
    let p = cpu.pop();
    cpu.set_status(p);
    cpu.flag_b = false;
}
