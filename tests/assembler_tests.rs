//! Assembler behavior: encodings per addressing mode, directives, symbol
//! resolution, and error reporting.

use mos6502::{AssembleError, Assembler};

fn assemble(source: &str) -> Assembler {
    let mut asm = Assembler::new();
    asm.assemble(source).unwrap();
    asm
}

fn assemble_err(source: &str) -> AssembleError {
    let mut asm = Assembler::new();
    asm.assemble(source).unwrap_err()
}

fn bytes_at(asm: &Assembler, addr: u16, len: usize) -> Vec<u8> {
    asm.image()[addr as usize..addr as usize + len].to_vec()
}

#[test]
fn lda_across_addressing_modes() {
    let cases: &[(&str, &[u8])] = &[
        ("LDA #$10", &[0xA9, 0x10]),
        ("LDA $10", &[0xA5, 0x10]),
        ("LDA $10,X", &[0xB5, 0x10]),
        ("LDA $1234", &[0xAD, 0x34, 0x12]),
        ("LDA $1234,X", &[0xBD, 0x34, 0x12]),
        ("LDA $1234,Y", &[0xB9, 0x34, 0x12]),
        ("LDA ($40,X)", &[0xA1, 0x40]),
        ("LDA ($40),Y", &[0xB1, 0x40]),
    ];

    for (source, expected) in cases {
        let asm = assemble(&format!(".org $8000\n{source}\n"));
        assert_eq!(
            bytes_at(&asm, 0x8000, expected.len()),
            expected.to_vec(),
            "encoding {source}"
        );
        // Nothing spills past the instruction.
        assert_eq!(asm.image()[0x8000 + expected.len()], 0x00, "size of {source}");
    }
}

#[test]
fn implicit_and_accumulator_forms() {
    let asm = assemble(".org $8000\nINX\nASL A\nLSR a\n");
    assert_eq!(bytes_at(&asm, 0x8000, 3), vec![0xE8, 0x0A, 0x4A]);
}

#[test]
fn decimal_operands() {
    let asm = assemble(".org $8000\nLDA #65\nLDA 254\n");
    assert_eq!(bytes_at(&asm, 0x8000, 4), vec![0xA9, 65, 0xA5, 254]);
}

#[test]
fn location_counter_advances_by_size() {
    let asm = assemble(".org $8000\nLDA #$01\nSTA $0200\nNOP\n");
    assert_eq!(
        bytes_at(&asm, 0x8000, 6),
        vec![0xA9, 0x01, 0x8D, 0x00, 0x02, 0xEA]
    );
}

#[test]
fn org_moves_emission() {
    let asm = assemble(".org $1000\nNOP\n.org $2000\nNOP\n");
    assert_eq!(asm.image()[0x1000], 0xEA);
    assert_eq!(asm.image()[0x2000], 0xEA);
    assert_eq!(asm.image()[0x1001], 0x00);
}

#[test]
fn backward_reference() {
    let asm = assemble(".org $8000\nstart:\nJMP start\n");
    assert_eq!(bytes_at(&asm, 0x8000, 3), vec![0x4C, 0x00, 0x80]);
}

#[test]
fn forward_reference_resolves_identically() {
    // The same layout with the label defined before or after its use must
    // produce identical bytes.
    let forward = assemble(".org $8000\nJMP target\nNOP\ntarget: NOP\n");
    let backward = assemble(".org $8000\nentry: JMP entry\n");
    assert_eq!(bytes_at(&forward, 0x8000, 3), vec![0x4C, 0x04, 0x80]);
    assert_eq!(bytes_at(&backward, 0x8000, 3), vec![0x4C, 0x00, 0x80]);

    let first = assemble(".org $8000\nJMP done\ndone: NOP\n");
    let second = assemble(".org $8000\nJMP done\ndone: NOP\n");
    assert_eq!(first.image().as_slice(), second.image().as_slice());
}

#[test]
fn labels_are_case_sensitive() {
    let err = assemble_err(".org $8000\nJMP Start\nstart: NOP\n");
    assert!(matches!(err, AssembleError::UndefinedSymbol { ref name, .. } if name == "Start"));
}

#[test]
fn branch_forward_encoding() {
    // BEQ at $1000; target label lands at $1005.
    let asm = assemble(".org $1000\nBEQ target\nNOP\nNOP\nNOP\ntarget: NOP\n");
    assert_eq!(asm.image()[0x1000], 0xF0);
    // Offset measured from $1002.
    assert_eq!(asm.image()[0x1001], 0x03);
}

#[test]
fn branch_backward_encoding() {
    let asm = assemble(".org $1000\nloop: NOP\nBNE loop\n");
    // BNE sits at $1001, next instruction at $1003, offset -3.
    assert_eq!(asm.image()[0x1001], 0xD0);
    assert_eq!(asm.image()[0x1002], 0xFD);
}

#[test]
fn branch_to_numeric_target() {
    let asm = assemble(".org $1000\nBEQ $1008\n");
    assert_eq!(asm.image()[0x1001], 0x06);
}

#[test]
fn branch_out_of_range_is_rejected() {
    let mut source = String::from(".org $8000\nBEQ far\n");
    for _ in 0..200 {
        source.push_str("NOP\n");
    }
    source.push_str("far: BRK\n");

    let err = assemble_err(&source);
    assert!(matches!(err, AssembleError::BranchOutOfRange { offset: 200, .. }));
    assert!(err.to_string().contains("branch out of range"));
}

#[test]
fn undefined_symbol_is_named() {
    let err = assemble_err(".org $8000\nJMP foo\n");
    assert!(err.to_string().contains("foo"));
}

#[test]
fn duplicate_label_is_rejected() {
    let err = assemble_err("start: NOP\nstart: NOP\n");
    assert_eq!(
        err,
        AssembleError::DuplicateLabel {
            name: "start".to_string(),
            line: 2,
            previous: 1
        }
    );
}

#[test]
fn word_directive_with_value_and_label() {
    let asm = assemble(".org $8010\n.word $8020\n");
    assert_eq!(bytes_at(&asm, 0x8010, 2), vec![0x20, 0x80]);

    let asm = assemble(".org $FFFC\n.word reset\n.org $8000\nreset: NOP\n");
    assert_eq!(bytes_at(&asm, 0xFFFC, 2), vec![0x00, 0x80]);
}

#[test]
fn byte_directive_emits_inline_data() {
    let asm = assemble(".org $2000\n.byte $48, $65, 108, 108, $6F\n");
    assert_eq!(bytes_at(&asm, 0x2000, 5), b"Hello".to_vec());
}

#[test]
fn byte_directive_advances_pc() {
    let asm = assemble(".org $2000\n.byte 1, 2, 3\nNOP\n");
    assert_eq!(asm.image()[0x2003], 0xEA);
}

#[test]
fn invalid_addressing_mode_is_rejected() {
    // JSR has no immediate form.
    let err = assemble_err(".org $8000\nJSR #$10\n");
    assert!(
        matches!(err, AssembleError::InvalidAddressingMode { ref mnemonic, .. } if mnemonic == "JSR")
    );
}

#[test]
fn jmp_to_zero_page_address_promotes_to_absolute() {
    let asm = assemble(".org $8000\nJMP $0010\n");
    assert_eq!(bytes_at(&asm, 0x8000, 3), vec![0x4C, 0x10, 0x00]);
}

#[test]
fn indexed_zero_page_promotes_when_missing() {
    // LDA has no zero-page,Y form; the absolute,Y encoding steps in.
    let asm = assemble(".org $8000\nLDA $10,Y\n");
    assert_eq!(bytes_at(&asm, 0x8000, 3), vec![0xB9, 0x10, 0x00]);
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let asm = assemble(
        "; program header\n\n.org $8000\n  NOP ; spin\n\n  NOP\n",
    );
    assert_eq!(bytes_at(&asm, 0x8000, 2), vec![0xEA, 0xEA]);
}

#[test]
fn assembly_is_deterministic() {
    let source = "\
.org $8000
start:
    LDX #$00
loop:
    INX
    CPX #$05
    BNE loop
    JMP start
.org $FFFC
.word start
";
    let first = assemble(source);
    let second = assemble(source);
    assert_eq!(first.image().as_slice(), second.image().as_slice());
}

#[test]
fn untouched_image_stays_zero() {
    let asm = assemble(".org $4000\nNOP\n");
    assert!(asm.image()[..0x4000].iter().all(|&b| b == 0));
    assert!(asm.image()[0x4001..].iter().all(|&b| b == 0));
}
