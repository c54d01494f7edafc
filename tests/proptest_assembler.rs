//! Property-based tests for the assembler.

use mos6502::Assembler;
use proptest::prelude::*;

fn assemble(source: &str) -> Assembler {
    let mut asm = Assembler::new();
    asm.assemble(source).unwrap();
    asm
}

proptest! {
    #[test]
    fn immediate_operands_encode_their_low_byte(value in 0u8..=255) {
        let asm = assemble(&format!(".org $8000\nLDA #${value:02X}\n"));
        prop_assert_eq!(asm.image()[0x8000], 0xA9);
        prop_assert_eq!(asm.image()[0x8001], value);
    }

    #[test]
    fn byte_directive_is_verbatim(data in proptest::collection::vec(0u8..=255, 1..16)) {
        let list = data
            .iter()
            .map(|b| format!("${b:02X}"))
            .collect::<Vec<_>>()
            .join(", ");
        let asm = assemble(&format!(".org $2000\n.byte {list}\n"));
        prop_assert_eq!(&asm.image()[0x2000..0x2000 + data.len()], data.as_slice());
    }

    #[test]
    fn word_directive_is_little_endian(value in 0u16..=0xFFFF) {
        let asm = assemble(&format!(".org $3000\n.word ${value:04X}\n"));
        prop_assert_eq!(asm.image()[0x3000], (value & 0xFF) as u8);
        prop_assert_eq!(asm.image()[0x3001], (value >> 8) as u8);
    }

    #[test]
    fn assembly_is_deterministic(values in proptest::collection::vec(0u8..=255, 1..8)) {
        let mut source = String::from(".org $8000\nstart:\n");
        for v in &values {
            source.push_str(&format!("    LDA #${v:02X}\n    STA $0200\n"));
        }
        source.push_str("    JMP start\n");

        let first = assemble(&source);
        let second = assemble(&source);
        prop_assert_eq!(first.image().as_slice(), second.image().as_slice());
    }

    #[test]
    fn forward_labels_resolve_like_backward_ones(name in "z[a-z0-9_]{0,12}") {
        // Forward use of a label lands on the same address a backward
        // definition would have produced.
        let forward = assemble(&format!(".org $8000\nJMP {name}\n{name}: NOP\n"));
        prop_assert_eq!(&forward.image()[0x8000..0x8003], &[0x4C, 0x03, 0x80]);
    }

    #[test]
    fn org_places_code_anywhere(origin in 0u16..=0xFF00) {
        let asm = assemble(&format!(".org ${origin:04X}\nNOP\n"));
        prop_assert_eq!(asm.image()[origin as usize], 0xEA);
    }
}
