//! Syntactic analysis: token stream to item list.
//!
//! The parser walks the token stream once, skipping newlines and comments,
//! and emits one [`Item`] per construct: a label definition, an instruction
//! with its operand classified into an addressing mode, or a directive.
//!
//! Operand classification is purely local. Numeric operands pick zero page
//! versus absolute by value (<= 0xFF); symbol operands become absolute
//! items carrying the label name for pass-2 resolution (branch mnemonics
//! are re-moded to relative by the code generator). The full operand
//! grammar is accepted: `#value`, indexed suffixes `,X` / `,Y`, the
//! indirect forms `(addr)`, `(zp,X)`, `(zp),Y`, and the explicit
//! accumulator operand `A`.

use crate::addressing::AddressingMode;
use crate::assembler::lexer::{Token, TokenKind};
use crate::assembler::AssembleError;

/// Assembler directive discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `.org N`: moves the location counter.
    Org,
    /// `.word v | label`: reserves and fills two little-endian bytes.
    Word,
    /// `.byte v [, v]*`: inline data bytes.
    Byte,
}

/// A label definition (`name:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelItem {
    pub name: String,
    pub line: usize,
}

/// One machine instruction before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionItem {
    /// Uppercased mnemonic.
    pub mnemonic: String,
    pub mode: AddressingMode,
    /// Numeric operand value; zero when `operand_label` carries a symbol
    /// reference to be resolved in pass 2.
    pub operand: u16,
    pub operand_label: Option<String>,
    pub line: usize,
    /// Assigned by codegen pass 1.
    pub address: u16,
}

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveItem {
    pub kind: DirectiveKind,
    /// The `.org` target address.
    pub operand: u16,
    /// Inline data for `.word` / `.byte`.
    pub data: Vec<u8>,
    /// Forward label reference for `.word label`.
    pub operand_label: Option<String>,
    pub line: usize,
    /// Assigned by codegen pass 1.
    pub address: u16,
}

/// One assembly construct surviving to code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Label(LabelItem),
    Instruction(InstructionItem),
    Directive(DirectiveItem),
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

/// Parses a token stream into the flat item list.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Item>, AssembleError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    parser.run()
}

impl Parser {
    fn run(&mut self) -> Result<Vec<Item>, AssembleError> {
        let mut items = Vec::new();

        while self.position < self.tokens.len() {
            match self.current().kind {
                TokenKind::Eof => break,
                TokenKind::Newline | TokenKind::Comment => self.advance(),
                TokenKind::Label => {
                    let token = self.current().clone();
                    self.advance();
                    items.push(Item::Label(LabelItem {
                        name: token.text,
                        line: token.line,
                    }));
                }
                TokenKind::Mnemonic => items.push(self.parse_instruction()?),
                TokenKind::Directive => items.push(self.parse_directive()?),
                _ => {
                    let token = self.current();
                    return Err(AssembleError::UnexpectedToken {
                        text: token.text.clone(),
                        line: token.line,
                    });
                }
            }
        }

        Ok(items)
    }

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with an EOF token.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Eof | TokenKind::Newline | TokenKind::Comment
        )
    }

    fn parse_instruction(&mut self) -> Result<Item, AssembleError> {
        let token = self.current().clone();
        self.advance();

        let (mode, operand, operand_label) = self.parse_operand()?;

        Ok(Item::Instruction(InstructionItem {
            mnemonic: token.text,
            mode,
            operand,
            operand_label,
            line: token.line,
            address: 0,
        }))
    }

    /// Classifies the operand (if any) following a mnemonic.
    fn parse_operand(&mut self) -> Result<(AddressingMode, u16, Option<String>), AssembleError> {
        if self.at_line_end() {
            return Ok((AddressingMode::Implicit, 0, None));
        }

        match self.current().kind {
            TokenKind::Hash => {
                self.advance();
                let value = self.parse_value()?;
                Ok((AddressingMode::Immediate, value, None))
            }
            TokenKind::LParen => self.parse_indirect_operand(),
            TokenKind::Identifier => {
                let token = self.current().clone();
                self.advance();

                if token.text.eq_ignore_ascii_case("A") {
                    return Ok((AddressingMode::Accumulator, 0, None));
                }

                let mode = match self.parse_index_suffix()? {
                    Some('X') => AddressingMode::AbsoluteX,
                    Some('Y') => AddressingMode::AbsoluteY,
                    _ => AddressingMode::Absolute,
                };
                Ok((mode, 0, Some(token.text)))
            }
            TokenKind::Absolute | TokenKind::Number | TokenKind::Dollar => {
                let value = self.parse_value()?;
                let zero_page = value <= 0xFF;

                let mode = match self.parse_index_suffix()? {
                    Some('X') if zero_page => AddressingMode::ZeroPageX,
                    Some('X') => AddressingMode::AbsoluteX,
                    Some('Y') if zero_page => AddressingMode::ZeroPageY,
                    Some('Y') => AddressingMode::AbsoluteY,
                    _ if zero_page => AddressingMode::ZeroPage,
                    _ => AddressingMode::Absolute,
                };
                Ok((mode, value, None))
            }
            _ => {
                let token = self.current();
                Err(AssembleError::UnexpectedToken {
                    text: token.text.clone(),
                    line: token.line,
                })
            }
        }
    }

    /// Parses `(...)` operands: plain indirect (`JMP (ptr)`, label allowed),
    /// indexed indirect `($zp,X)`, and indirect indexed `($zp),Y`.
    fn parse_indirect_operand(
        &mut self,
    ) -> Result<(AddressingMode, u16, Option<String>), AssembleError> {
        let line = self.current().line;
        self.advance(); // '('

        if self.current().kind == TokenKind::Identifier {
            let name = self.current().text.clone();
            self.advance();
            self.expect(TokenKind::RParen)?;
            return Ok((AddressingMode::Indirect, 0, Some(name)));
        }

        let value = self.parse_value()?;

        match self.current().kind {
            TokenKind::Comma => {
                self.advance();
                match self.parse_index_register()? {
                    'X' => {
                        self.expect(TokenKind::RParen)?;
                        self.require_zero_page(value, line)?;
                        Ok((AddressingMode::IndexedIndirect, value, None))
                    }
                    register => Err(AssembleError::UnexpectedToken {
                        text: register.to_string(),
                        line,
                    }),
                }
            }
            TokenKind::RParen => {
                self.advance();
                if self.current().kind == TokenKind::Comma {
                    self.advance();
                    match self.parse_index_register()? {
                        'Y' => {
                            self.require_zero_page(value, line)?;
                            Ok((AddressingMode::IndirectIndexed, value, None))
                        }
                        register => Err(AssembleError::UnexpectedToken {
                            text: register.to_string(),
                            line,
                        }),
                    }
                } else {
                    Ok((AddressingMode::Indirect, value, None))
                }
            }
            _ => {
                let token = self.current();
                Err(AssembleError::UnexpectedToken {
                    text: token.text.clone(),
                    line: token.line,
                })
            }
        }
    }

    /// Consumes a `,X` / `,Y` suffix if present.
    fn parse_index_suffix(&mut self) -> Result<Option<char>, AssembleError> {
        if self.current().kind != TokenKind::Comma {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.parse_index_register()?))
    }

    fn parse_index_register(&mut self) -> Result<char, AssembleError> {
        let token = self.current().clone();
        if token.kind == TokenKind::Identifier {
            if token.text.eq_ignore_ascii_case("X") {
                self.advance();
                return Ok('X');
            }
            if token.text.eq_ignore_ascii_case("Y") {
                self.advance();
                return Ok('Y');
            }
        }
        Err(AssembleError::UnexpectedToken {
            text: token.text,
            line: token.line,
        })
    }

    fn require_zero_page(&self, value: u16, line: usize) -> Result<(), AssembleError> {
        if value > 0xFF {
            return Err(AssembleError::ByteOutOfRange { value, line });
        }
        Ok(())
    }

    /// Parses one numeric value: `$hex`, a bare `$` followed by digits, or
    /// a decimal number.
    fn parse_value(&mut self) -> Result<u16, AssembleError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Absolute => {
                self.advance();
                parse_hex(&token.text[1..], token.line)
            }
            TokenKind::Dollar => {
                // Compatibility with streams that split `$` from its
                // digits; the digits are still hex.
                self.advance();
                let digits = self.current().clone();
                if digits.kind != TokenKind::Number {
                    return Err(AssembleError::UnexpectedToken {
                        text: digits.text,
                        line: digits.line,
                    });
                }
                self.advance();
                parse_hex(&digits.text, digits.line)
            }
            TokenKind::Number => {
                self.advance();
                parse_decimal(&token.text, token.line)
            }
            _ => Err(AssembleError::UnexpectedToken {
                text: token.text,
                line: token.line,
            }),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), AssembleError> {
        let token = self.current();
        if token.kind != kind {
            return Err(AssembleError::UnexpectedToken {
                text: token.text.clone(),
                line: token.line,
            });
        }
        self.advance();
        Ok(())
    }

    fn parse_directive(&mut self) -> Result<Item, AssembleError> {
        let token = self.current().clone();
        self.advance();

        match token.text.to_lowercase().as_str() {
            ".org" => {
                let operand = self.parse_value()?;
                Ok(Item::Directive(DirectiveItem {
                    kind: DirectiveKind::Org,
                    operand,
                    data: Vec::new(),
                    operand_label: None,
                    line: token.line,
                    address: 0,
                }))
            }
            ".word" => {
                if self.current().kind == TokenKind::Identifier {
                    let name = self.current().text.clone();
                    self.advance();
                    return Ok(Item::Directive(DirectiveItem {
                        kind: DirectiveKind::Word,
                        operand: 0,
                        // Two bytes reserved, filled in pass 2.
                        data: vec![0, 0],
                        operand_label: Some(name),
                        line: token.line,
                        address: 0,
                    }));
                }

                let value = self.parse_value()?;
                Ok(Item::Directive(DirectiveItem {
                    kind: DirectiveKind::Word,
                    operand: 0,
                    data: vec![(value & 0xFF) as u8, (value >> 8) as u8],
                    operand_label: None,
                    line: token.line,
                    address: 0,
                }))
            }
            ".byte" => {
                let data = self.parse_byte_list()?;
                Ok(Item::Directive(DirectiveItem {
                    kind: DirectiveKind::Byte,
                    operand: 0,
                    data,
                    operand_label: None,
                    line: token.line,
                    address: 0,
                }))
            }
            _ => Err(AssembleError::UnknownDirective {
                name: token.text,
                line: token.line,
            }),
        }
    }

    fn parse_byte_list(&mut self) -> Result<Vec<u8>, AssembleError> {
        let mut data = Vec::new();

        loop {
            if self.at_line_end() {
                break;
            }

            let line = self.current().line;
            let value = self.parse_value()?;
            if value > 0xFF {
                return Err(AssembleError::ByteOutOfRange { value, line });
            }
            data.push(value as u8);

            if self.current().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }

        Ok(data)
    }
}

fn parse_decimal(text: &str, line: usize) -> Result<u16, AssembleError> {
    text.parse::<u16>()
        .map_err(|_| AssembleError::MalformedNumber {
            text: text.to_string(),
            line,
        })
}

fn parse_hex(digits: &str, line: usize) -> Result<u16, AssembleError> {
    if digits.is_empty() {
        return Err(AssembleError::MalformedNumber {
            text: format!("${digits}"),
            line,
        });
    }
    u16::from_str_radix(digits, 16).map_err(|_| AssembleError::MalformedNumber {
        text: format!("${digits}"),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::lexer::tokenize;

    fn parse_source(source: &str) -> Vec<Item> {
        parse(tokenize(source).unwrap()).unwrap()
    }

    fn single_instruction(source: &str) -> InstructionItem {
        let items = parse_source(source);
        assert_eq!(items.len(), 1, "expected one item from {source:?}");
        match items.into_iter().next().unwrap() {
            Item::Instruction(inst) => inst,
            other => panic!("expected instruction, got {other:?}"),
        }
    }

    #[test]
    fn implicit_and_accumulator() {
        assert_eq!(single_instruction("NOP").mode, AddressingMode::Implicit);
        assert_eq!(single_instruction("ASL A").mode, AddressingMode::Accumulator);
        assert_eq!(single_instruction("lsr a").mode, AddressingMode::Accumulator);
    }

    #[test]
    fn immediate_operands() {
        let inst = single_instruction("LDA #$42");
        assert_eq!(inst.mode, AddressingMode::Immediate);
        assert_eq!(inst.operand, 0x42);

        let inst = single_instruction("LDX #10");
        assert_eq!(inst.mode, AddressingMode::Immediate);
        assert_eq!(inst.operand, 10);
    }

    #[test]
    fn zero_page_vs_absolute_by_value() {
        assert_eq!(single_instruction("LDA $80").mode, AddressingMode::ZeroPage);
        assert_eq!(single_instruction("LDA $0100").mode, AddressingMode::Absolute);
        assert_eq!(single_instruction("LDA 255").mode, AddressingMode::ZeroPage);
        assert_eq!(single_instruction("LDA 256").mode, AddressingMode::Absolute);
    }

    #[test]
    fn indexed_operands() {
        assert_eq!(single_instruction("LDA $80,X").mode, AddressingMode::ZeroPageX);
        assert_eq!(single_instruction("LDA $1234,X").mode, AddressingMode::AbsoluteX);
        assert_eq!(single_instruction("LDX $80,Y").mode, AddressingMode::ZeroPageY);
        assert_eq!(single_instruction("LDA $1234,y").mode, AddressingMode::AbsoluteY);
    }

    #[test]
    fn indirect_operands() {
        let inst = single_instruction("JMP ($8010)");
        assert_eq!(inst.mode, AddressingMode::Indirect);
        assert_eq!(inst.operand, 0x8010);

        let inst = single_instruction("LDA ($40,X)");
        assert_eq!(inst.mode, AddressingMode::IndexedIndirect);
        assert_eq!(inst.operand, 0x40);

        let inst = single_instruction("LDA ($40),Y");
        assert_eq!(inst.mode, AddressingMode::IndirectIndexed);
        assert_eq!(inst.operand, 0x40);
    }

    #[test]
    fn indirect_through_label() {
        let inst = single_instruction("JMP (vector)");
        assert_eq!(inst.mode, AddressingMode::Indirect);
        assert_eq!(inst.operand_label.as_deref(), Some("vector"));
    }

    #[test]
    fn symbol_operands_are_absolute_forward_references() {
        let inst = single_instruction("JMP target");
        assert_eq!(inst.mode, AddressingMode::Absolute);
        assert_eq!(inst.operand, 0);
        assert_eq!(inst.operand_label.as_deref(), Some("target"));

        let inst = single_instruction("LDA table,X");
        assert_eq!(inst.mode, AddressingMode::AbsoluteX);
        assert_eq!(inst.operand_label.as_deref(), Some("table"));
    }

    #[test]
    fn labels_and_comments() {
        let items = parse_source("loop: ; spin\n  INX\n  BNE loop\n");
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], Item::Label(l) if l.name == "loop" && l.line == 1));
        assert!(matches!(&items[1], Item::Instruction(i) if i.mnemonic == "INX"));
        assert!(
            matches!(&items[2], Item::Instruction(i) if i.mnemonic == "BNE"
                && i.operand_label.as_deref() == Some("loop"))
        );
    }

    #[test]
    fn org_directive() {
        let items = parse_source(".org $8000");
        assert!(matches!(
            &items[0],
            Item::Directive(d) if d.kind == DirectiveKind::Org && d.operand == 0x8000
        ));
    }

    #[test]
    fn word_directive_value_and_label() {
        let items = parse_source(".word $8020");
        assert!(matches!(
            &items[0],
            Item::Directive(d) if d.kind == DirectiveKind::Word && d.data == vec![0x20, 0x80]
        ));

        let items = parse_source(".word reset");
        assert!(matches!(
            &items[0],
            Item::Directive(d) if d.kind == DirectiveKind::Word
                && d.operand_label.as_deref() == Some("reset")
                && d.data.len() == 2
        ));
    }

    #[test]
    fn byte_directive_lists() {
        let items = parse_source(".byte $48, 101, $6C");
        assert!(matches!(
            &items[0],
            Item::Directive(d) if d.kind == DirectiveKind::Byte && d.data == vec![0x48, 101, 0x6C]
        ));
    }

    #[test]
    fn byte_value_range_is_checked() {
        let err = parse(tokenize(".byte $100").unwrap()).unwrap_err();
        assert_eq!(err, AssembleError::ByteOutOfRange { value: 0x100, line: 1 });
    }

    #[test]
    fn unknown_directive_is_fatal() {
        let err = parse(tokenize(".include \"foo\"").unwrap()).unwrap_err();
        assert_eq!(
            err,
            AssembleError::UnknownDirective {
                name: ".include".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn stray_token_is_fatal() {
        let err = parse(tokenize("NOP\n$12").unwrap()).unwrap_err();
        assert_eq!(
            err,
            AssembleError::UnexpectedToken {
                text: "$12".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn malformed_number_reports_line() {
        let err = parse(tokenize("LDA #99999").unwrap()).unwrap_err();
        assert_eq!(
            err,
            AssembleError::MalformedNumber {
                text: "99999".to_string(),
                line: 1
            }
        );
    }
}
