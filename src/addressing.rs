//! # Addressing Modes
//!
//! The 13 addressing modes of the 6502. The same enum is shared by both
//! halves of the toolchain: the assembler classifies operands into a mode
//! before encoding, and the emulator uses the mode to compute the effective
//! address of each fetched instruction.

/// 6502 addressing mode enumeration.
///
/// The mode determines how many operand bytes follow an opcode and how the
/// effective memory address is derived from them.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative,
///   IndexedIndirect, IndirectIndexed
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand; the operation is implied by the instruction itself.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: ASL A, LSR A, ROL A, ROR A
    Accumulator,

    /// The operand byte is the value itself.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address into page zero (0x0000-0x00FF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X; the sum wraps within page zero.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y; the sum wraps within page zero.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Jump through a 16-bit pointer; only JMP uses this mode.
    ///
    /// Example: JMP ($FFFC)
    Indirect,

    /// Indexed indirect, written `($40,X)`: X is added to the zero-page
    /// operand (wrapping within page zero), and the 16-bit address stored
    /// there becomes the effective address.
    IndexedIndirect,

    /// Indirect indexed, written `($40),Y`: the 16-bit address stored at
    /// the zero-page operand is fetched first, then Y is added.
    IndirectIndexed,

    /// Signed 8-bit branch offset, measured from the instruction that
    /// follows the branch.
    ///
    /// Example: BNE loop
    Relative,
}
