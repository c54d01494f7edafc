//! # CPU Core
//!
//! The 6502 processor state and its fetch-decode-execute loop.
//!
//! The CPU is generic over [`MemoryBus`], so the same core runs against
//! plain RAM in tests and against the memory-mapped I/O configuration in
//! the emulator binary. Status flags are kept as individual booleans and
//! packed into the architectural `P` byte only when an instruction needs
//! the register form (PHP, PLP, BRK, RTI).
//!
//! ## Execution model
//!
//! [`CPU::step`] executes exactly one instruction:
//!
//! 1. fetch the opcode byte at PC and advance PC,
//! 2. look it up in [`OPCODE_TABLE`]; undocumented opcodes halt with
//!    [`ExecutionError::IllegalOpcode`],
//! 3. compute the effective address for the entry's addressing mode
//!    (advancing PC past the operand bytes),
//! 4. run the handler and charge the base cycle cost.
//!
//! A PC of zero after an instruction is treated as an implicit halt: no
//! real program lives at address zero, so landing there means the program
//! ran off the end of its control flow. [`CPU::run`] steps until either
//! halt condition clears the `running` flag.

use crate::addressing::AddressingMode;
use crate::instructions::{alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer};
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;
use crate::ExecutionError;

/// Base address of the hardware stack (page 1).
pub const STACK_BASE: u16 = 0x0100;

/// Reset vector location: PC is loaded from this word on reset.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ/BRK vector location.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// NMI vector location.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Address ROM images are loaded at, and the largest image that fits
/// between there and the top of memory.
pub const ROM_BASE: u16 = 0x8000;
pub const ROM_MAX_SIZE: usize = 32768;

/// 6502 CPU state and execution context.
pub struct CPU<M: MemoryBus> {
    /// Accumulator.
    pub(crate) a: u8,

    /// X index register.
    pub(crate) x: u8,

    /// Y index register.
    pub(crate) y: u8,

    /// Program counter (address of the next byte to fetch).
    pub(crate) pc: u16,

    /// Stack pointer; the next free stack byte is `STACK_BASE + sp`.
    pub(crate) sp: u8,

    pub(crate) flag_n: bool,
    pub(crate) flag_v: bool,
    pub(crate) flag_b: bool,
    pub(crate) flag_d: bool,
    pub(crate) flag_i: bool,
    pub(crate) flag_z: bool,
    pub(crate) flag_c: bool,

    /// Total cycles charged since the last reset.
    pub(crate) cycles: u64,

    /// Cleared by an illegal opcode or a post-instruction PC of zero.
    pub(crate) running: bool,

    pub(crate) memory: M,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU in its cold state: registers zeroed, SP at 0xFF,
    /// flags clear, not running. Call [`CPU::reset`] after memory has been
    /// populated to latch the reset vector into PC.
    pub fn new(memory: M) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFF,
            flag_n: false,
            flag_v: false,
            flag_b: false,
            flag_d: false,
            flag_i: false,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            running: false,
            memory,
        }
    }

    /// Performs the reset sequence: PC is loaded from the word at
    /// [`RESET_VECTOR`], SP returns to 0xFF, the status register drops to
    /// its bare unused bit (0x20), the cycle counter clears, and the CPU
    /// is marked running.
    pub fn reset(&mut self) {
        self.pc = self.memory.read_word(RESET_VECTOR);
        self.sp = 0xFF;
        self.flag_n = false;
        self.flag_v = false;
        self.flag_b = false;
        self.flag_d = false;
        self.flag_i = false;
        self.flag_z = false;
        self.flag_c = false;
        self.cycles = 0;
        self.running = true;
    }

    /// Copies a ROM image into memory starting at [`ROM_BASE`].
    ///
    /// Images larger than [`ROM_MAX_SIZE`] do not fit under the vector page
    /// and are rejected.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), ExecutionError> {
        if data.len() > ROM_MAX_SIZE {
            return Err(ExecutionError::RomTooLarge { size: data.len() });
        }
        for (offset, &byte) in data.iter().enumerate() {
            self.memory.write(ROM_BASE.wrapping_add(offset as u16), byte);
        }
        Ok(())
    }

    /// Executes one instruction.
    ///
    /// Returns [`ExecutionError::IllegalOpcode`] (and stops the CPU) when
    /// the fetched byte has no documented decoding. The PC in the error is
    /// the address of the offending opcode.
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        let opcode_pc = self.pc;
        let opcode = self.memory.read(opcode_pc);
        self.pc = self.pc.wrapping_add(1);

        let info = &OPCODE_TABLE[opcode as usize];
        if !info.is_valid() {
            self.running = false;
            return Err(ExecutionError::IllegalOpcode {
                opcode,
                pc: opcode_pc,
            });
        }

        let addr = self.effective_address(info.mode);

        match info.mnemonic {
            "ADC" => alu::adc(self, addr),
            "AND" => alu::and(self, addr),
            "ASL" => match info.mode {
                AddressingMode::Accumulator => shifts::asl_a(self),
                _ => shifts::asl(self, addr),
            },
            "BCC" => branches::bcc(self, addr),
            "BCS" => branches::bcs(self, addr),
            "BEQ" => branches::beq(self, addr),
            "BIT" => alu::bit(self, addr),
            "BMI" => branches::bmi(self, addr),
            "BNE" => branches::bne(self, addr),
            "BPL" => branches::bpl(self, addr),
            "BRK" => control::brk(self),
            "BVC" => branches::bvc(self, addr),
            "BVS" => branches::bvs(self, addr),
            "CLC" => flags::clc(self),
            "CLD" => flags::cld(self),
            "CLI" => flags::cli(self),
            "CLV" => flags::clv(self),
            "CMP" => alu::cmp(self, addr),
            "CPX" => alu::cpx(self, addr),
            "CPY" => alu::cpy(self, addr),
            "DEC" => inc_dec::dec(self, addr),
            "DEX" => inc_dec::dex(self),
            "DEY" => inc_dec::dey(self),
            "EOR" => alu::eor(self, addr),
            "INC" => inc_dec::inc(self, addr),
            "INX" => inc_dec::inx(self),
            "INY" => inc_dec::iny(self),
            "JMP" => control::jmp(self, addr),
            "JSR" => control::jsr(self, addr),
            "LDA" => load_store::lda(self, addr),
            "LDX" => load_store::ldx(self, addr),
            "LDY" => load_store::ldy(self, addr),
            "LSR" => match info.mode {
                AddressingMode::Accumulator => shifts::lsr_a(self),
                _ => shifts::lsr(self, addr),
            },
            "NOP" => control::nop(self),
            "ORA" => alu::ora(self, addr),
            "PHA" => stack::pha(self),
            "PHP" => stack::php(self),
            "PLA" => stack::pla(self),
            "PLP" => stack::plp(self),
            "ROL" => match info.mode {
                AddressingMode::Accumulator => shifts::rol_a(self),
                _ => shifts::rol(self, addr),
            },
            "ROR" => match info.mode {
                AddressingMode::Accumulator => shifts::ror_a(self),
                _ => shifts::ror(self, addr),
            },
            "RTI" => control::rti(self),
            "RTS" => control::rts(self),
            "SBC" => alu::sbc(self, addr),
            "SEC" => flags::sec(self),
            "SED" => flags::sed(self),
            "SEI" => flags::sei(self),
            "STA" => load_store::sta(self, addr),
            "STX" => load_store::stx(self, addr),
            "STY" => load_store::sty(self, addr),
            "TAX" => transfer::tax(self),
            "TAY" => transfer::tay(self),
            "TSX" => transfer::tsx(self),
            "TXA" => transfer::txa(self),
            "TXS" => transfer::txs(self),
            "TYA" => transfer::tya(self),
            _ => {
                self.running = false;
                return Err(ExecutionError::IllegalOpcode {
                    opcode,
                    pc: opcode_pc,
                });
            }
        }

        self.cycles += info.base_cycles as u64;

        // Landing on address zero means the program fell off its control
        // flow (an unset vector, a return through a zeroed stack).
        if self.pc == 0 {
            self.running = false;
        }

        Ok(())
    }

    /// Steps until the CPU halts.
    ///
    /// Returns `Ok(())` on an orderly halt (PC reached zero) and the
    /// illegal-opcode error otherwise.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        while self.running {
            self.step()?;
        }
        Ok(())
    }

    /// Computes the effective address for an addressing mode, consuming
    /// the operand bytes at PC.
    ///
    /// Modes without an address (Implicit, Accumulator) return zero, which
    /// their handlers never look at.
    fn effective_address(&mut self, mode: AddressingMode) -> u16 {
        match mode {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                addr
            }
            AddressingMode::ZeroPage => {
                let addr = self.memory.read(self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                addr
            }
            AddressingMode::ZeroPageX => {
                let base = self.memory.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                base.wrapping_add(self.x) as u16
            }
            AddressingMode::ZeroPageY => {
                let base = self.memory.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                base.wrapping_add(self.y) as u16
            }
            AddressingMode::Absolute => {
                let addr = self.memory.read_word(self.pc);
                self.pc = self.pc.wrapping_add(2);
                addr
            }
            AddressingMode::AbsoluteX => {
                let base = self.memory.read_word(self.pc);
                self.pc = self.pc.wrapping_add(2);
                base.wrapping_add(self.x as u16)
            }
            AddressingMode::AbsoluteY => {
                let base = self.memory.read_word(self.pc);
                self.pc = self.pc.wrapping_add(2);
                base.wrapping_add(self.y as u16)
            }
            AddressingMode::Indirect => {
                let pointer = self.memory.read_word(self.pc);
                self.pc = self.pc.wrapping_add(2);
                self.memory.read_word(pointer)
            }
            AddressingMode::IndexedIndirect => {
                let base = self.memory.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                // The pointer itself wraps within page zero.
                self.memory.read_word(base.wrapping_add(self.x) as u16)
            }
            AddressingMode::IndirectIndexed => {
                let base = self.memory.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                self.memory
                    .read_word(base as u16)
                    .wrapping_add(self.y as u16)
            }
            AddressingMode::Relative => {
                let offset = self.memory.read(self.pc) as i8;
                self.pc = self.pc.wrapping_add(1);
                // Measured from the byte after the offset.
                self.pc.wrapping_add_signed(offset as i16)
            }
        }
    }

    // ========== Stack discipline ==========
    //
    // SP points at the next free byte in page 1: push stores then
    // decrements, pop increments then loads. 16-bit pushes store the high
    // byte first so that pops reconstruct the word little-endian.

    pub(crate) fn push(&mut self, value: u8) {
        self.memory.write(STACK_BASE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(STACK_BASE + self.sp as u16)
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push((value & 0xFF) as u8);
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }

    /// Sets Z and N from a freshly computed 8-bit result.
    pub(crate) fn update_nz(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
    }

    // ========== Status register packing ==========

    /// Returns the architectural `P` byte (NV-BDIZC, bit 5 always set).
    pub fn status(&self) -> u8 {
        let mut p: u8 = 0b0010_0000;
        if self.flag_n {
            p |= 0b1000_0000;
        }
        if self.flag_v {
            p |= 0b0100_0000;
        }
        if self.flag_b {
            p |= 0b0001_0000;
        }
        if self.flag_d {
            p |= 0b0000_1000;
        }
        if self.flag_i {
            p |= 0b0000_0100;
        }
        if self.flag_z {
            p |= 0b0000_0010;
        }
        if self.flag_c {
            p |= 0b0000_0001;
        }
        p
    }

    /// Unpacks a `P` byte into the individual flags. The unused bit is
    /// ignored; callers that must clear Break (PLP, RTI) do so afterwards.
    pub(crate) fn set_status(&mut self, p: u8) {
        self.flag_n = p & 0b1000_0000 != 0;
        self.flag_v = p & 0b0100_0000 != 0;
        self.flag_b = p & 0b0001_0000 != 0;
        self.flag_d = p & 0b0000_1000 != 0;
        self.flag_i = p & 0b0000_0100 != 0;
        self.flag_z = p & 0b0000_0010 != 0;
        self.flag_c = p & 0b0000_0001 != 0;
    }

    // ========== Register and flag accessors ==========

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// The full stack address of the next free byte is `0x0100 + sp()`.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Whether the CPU would execute another instruction.
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    pub fn flag_b(&self) -> bool {
        self.flag_b
    }

    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // Setters used by tests to arrange register state.

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}
