//! Full-pipeline scenarios: assemble a source, extract the ROM, load it
//! into an emulator with memory-mapped I/O, and observe the effects.

use std::cell::RefCell;
use std::rc::Rc;

use mos6502::{AssembleError, Assembler, IoMemory, CPU};

/// Assembles `source`, loads the 32 KiB ROM window at 0x8000, and runs to
/// halt. Returns the CPU and everything the display emitted.
fn assemble_and_run(source: &str) -> (CPU<IoMemory>, Vec<u8>) {
    let mut asm = Assembler::new();
    asm.assemble(source).unwrap();
    let rom = asm.rom_image(0x8000, 32768);
    assert_eq!(rom.len(), 32768);

    let captured = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&captured);
    let mut memory = IoMemory::new();
    memory.set_display(move |byte| sink.borrow_mut().push(byte));

    let mut cpu = CPU::new(memory);
    cpu.load_rom(&rom).unwrap();
    cpu.reset();
    cpu.run().unwrap();

    let output = captured.borrow().clone();
    (cpu, output)
}

#[test]
fn hello_world_rom_prints_hello() {
    let source = "\
.org $8000
start:
    LDA #$48    ; 'H'
    STA $F001
    LDA #$65    ; 'e'
    STA $F001
    LDA #$6C    ; 'l'
    STA $F001
    LDA #$6C    ; 'l'
    STA $F001
    LDA #$6F    ; 'o'
    STA $F001
    LDA #$0A    ; newline
    STA $F001
    BRK
.org $FFFC
.word start
";
    let (_cpu, output) = assemble_and_run(source);
    assert_eq!(output, b"Hello\n");
}

#[test]
fn branch_forward_loop_counts_to_three() {
    let source = "\
.org $8000
start:
    LDX #$00
loop:
    INX
    CPX #$03
    BNE loop
    BRK
.org $FFFC
.word start
";
    let (cpu, _) = assemble_and_run(source);
    assert_eq!(cpu.x(), 3);
    assert!(cpu.flag_z());
}

#[test]
fn indirect_jmp_lands_on_pointer_target() {
    let source = "\
.org $8000
start:
    JMP ($8010)
.org $8010
.word $8020
.org $8020
    LDA #$AA
    BRK
.org $FFFC
.word start
";
    let (cpu, _) = assemble_and_run(source);
    assert_eq!(cpu.a(), 0xAA);
}

#[test]
fn subroutine_round_trip_through_rom() {
    let source = "\
.org $8000
start:
    JSR emit
    LDA #$21    ; '!'
    STA $F001
    BRK
emit:
    LDA #$2A    ; '*'
    STA $F001
    RTS
.org $FFFC
.word start
";
    let (_cpu, output) = assemble_and_run(source);
    assert_eq!(output, b"*!");
}

#[test]
fn stack_order_observed_through_registers() {
    let source = "\
.org $8000
start:
    LDA #$12
    PHA
    LDA #$34
    PHA
    PLA
    TAX
    PLA
    TAY
    BRK
.org $FFFC
.word start
";
    let (cpu, _) = assemble_and_run(source);
    assert_eq!(cpu.x(), 0x34); // first pop
    assert_eq!(cpu.y(), 0x12); // second pop
}

#[test]
fn undefined_symbol_fails_assembly_naming_it() {
    let mut asm = Assembler::new();
    let err = asm
        .assemble(".org $8000\nJMP foo\n.org $FFFC\n.word $8000\n")
        .unwrap_err();
    assert!(matches!(err, AssembleError::UndefinedSymbol { ref name, .. } if name == "foo"));
    assert!(err.to_string().contains("foo"));
}

#[test]
fn out_of_range_branch_fails_assembly() {
    let mut source = String::from(".org $8000\nBEQ far\n");
    for _ in 0..200 {
        source.push_str("NOP\n");
    }
    source.push_str("far: BRK\n");

    let mut asm = Assembler::new();
    let err = asm.assemble(&source).unwrap_err();
    assert!(err.to_string().contains("branch out of range"));
}

#[test]
fn rom_window_carries_the_vectors() {
    let mut asm = Assembler::new();
    asm.assemble(".org $8000\nstart: NOP\n.org $FFFC\n.word start\n")
        .unwrap();
    let rom = asm.rom_image(0x8000, 32768);

    // The reset vector sits in the last four bytes of the window.
    assert_eq!(rom[0x7FFC], 0x00);
    assert_eq!(rom[0x7FFD], 0x80);
}

#[test]
fn keyboard_echo_program() {
    let source = "\
.org $8000
start:
    LDA $F004
    STA $F001
    LDA $F004
    STA $F001
    BRK
.org $FFFC
.word start
";
    let mut asm = Assembler::new();
    asm.assemble(source).unwrap();
    let rom = asm.rom_image(0x8000, 32768);

    let captured = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&captured);
    let mut memory = IoMemory::new();
    memory.set_display(move |byte| sink.borrow_mut().push(byte));
    let mut input = b"hi".iter().copied();
    memory.set_keyboard(move || input.next().unwrap_or(0));

    let mut cpu = CPU::new(memory);
    cpu.load_rom(&rom).unwrap();
    cpu.reset();
    cpu.run().unwrap();

    assert_eq!(captured.borrow().as_slice(), b"hi");
}
