//! Two-pass code generation.
//!
//! Pass 1 walks the item list assigning an address to every item and
//! defining labels at the current location counter; this is what makes
//! forward references work. Pass 2 walks again and emits bytes into the
//! 64 KiB image, resolving symbol references and computing branch offsets
//! now that every label has an address.
//!
//! Encoding decisions:
//!
//! - Branch mnemonics are forced to the relative mode regardless of how
//!   the parser classified their operand; the operand value is the branch
//!   *target*, and the emitted byte is the signed offset from the
//!   instruction that follows the branch.
//! - When a value classified as zero page has no zero-page encoding for
//!   the mnemonic (`JMP $0010`, `LDA $10,Y`), the absolute form is used
//!   instead of rejecting the line.

use crate::addressing::AddressingMode;
use crate::assembler::parser::{DirectiveKind, Item};
use crate::assembler::symbol_table::SymbolTable;
use crate::assembler::{AssembleError, IMAGE_SIZE};
use crate::opcodes;

pub struct CodeGenerator<'a> {
    symbols: &'a mut SymbolTable,
    pc: u16,
    verbose: bool,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(symbols: &'a mut SymbolTable, verbose: bool) -> Self {
        Self {
            symbols,
            pc: 0,
            verbose,
        }
    }

    /// Runs both passes over `items`, then fails if any referenced symbol
    /// never received a definition.
    pub fn generate(
        &mut self,
        items: &mut [Item],
        image: &mut [u8; IMAGE_SIZE],
    ) -> Result<(), AssembleError> {
        if self.verbose {
            println!("generating code for {} items", items.len());
        }

        self.first_pass(items)?;
        self.second_pass(items, image)?;

        if !self.symbols.is_resolved() {
            return Err(AssembleError::UndefinedSymbols {
                names: self.symbols.undefined_names(),
            });
        }

        Ok(())
    }

    /// Address assignment and label definition.
    fn first_pass(&mut self, items: &mut [Item]) -> Result<(), AssembleError> {
        self.pc = 0;

        for item in items.iter_mut() {
            match item {
                Item::Directive(directive) => match directive.kind {
                    DirectiveKind::Org => {
                        self.pc = directive.operand;
                    }
                    DirectiveKind::Word => {
                        directive.address = self.pc;
                        if let Some(name) = &directive.operand_label {
                            self.symbols.reference(name, directive.line);
                        }
                        self.pc = self.pc.wrapping_add(2);
                    }
                    DirectiveKind::Byte => {
                        directive.address = self.pc;
                        self.pc = self.pc.wrapping_add(directive.data.len() as u16);
                    }
                },
                Item::Label(label) => {
                    self.symbols.define(&label.name, self.pc, label.line)?;
                }
                Item::Instruction(inst) => {
                    inst.address = self.pc;
                    if let Some(name) = &inst.operand_label {
                        self.symbols.reference(name, inst.line);
                    }

                    let mode = encoded_mode(&inst.mnemonic, inst.mode);
                    let (_, size) = encoding_for(&inst.mnemonic, mode).ok_or_else(|| {
                        if opcodes::is_mnemonic(&inst.mnemonic) {
                            AssembleError::InvalidAddressingMode {
                                mnemonic: inst.mnemonic.clone(),
                                line: inst.line,
                            }
                        } else {
                            AssembleError::UnknownMnemonic {
                                mnemonic: inst.mnemonic.clone(),
                                line: inst.line,
                            }
                        }
                    })?;
                    self.pc = self.pc.wrapping_add(size as u16);
                }
            }
        }

        Ok(())
    }

    /// Byte emission with all symbols resolvable.
    fn second_pass(
        &mut self,
        items: &[Item],
        image: &mut [u8; IMAGE_SIZE],
    ) -> Result<(), AssembleError> {
        for item in items {
            match item {
                Item::Label(_) => {}
                Item::Directive(directive) => match directive.kind {
                    DirectiveKind::Org => {}
                    DirectiveKind::Word => {
                        let word = match &directive.operand_label {
                            Some(name) => {
                                let target = self.symbols.resolve(name).ok_or_else(|| {
                                    AssembleError::UndefinedSymbol {
                                        name: name.clone(),
                                        line: directive.line,
                                    }
                                })?;
                                if self.verbose {
                                    println!(
                                        "word {name} = ${target:04X} at ${:04X}",
                                        directive.address
                                    );
                                }
                                target
                            }
                            None => {
                                (directive.data[1] as u16) << 8 | directive.data[0] as u16
                            }
                        };
                        write_byte(image, directive.address, (word & 0xFF) as u8);
                        write_byte(image, directive.address.wrapping_add(1), (word >> 8) as u8);
                    }
                    DirectiveKind::Byte => {
                        for (i, &byte) in directive.data.iter().enumerate() {
                            write_byte(image, directive.address.wrapping_add(i as u16), byte);
                        }
                    }
                },
                Item::Instruction(inst) => {
                    let mode = encoded_mode(&inst.mnemonic, inst.mode);
                    // Pass 1 already proved this lookup succeeds.
                    let (opcode, size) = encoding_for(&inst.mnemonic, mode).ok_or_else(|| {
                        AssembleError::InvalidAddressingMode {
                            mnemonic: inst.mnemonic.clone(),
                            line: inst.line,
                        }
                    })?;

                    if self.verbose {
                        println!("{} -> ${opcode:02X} at ${:04X}", inst.mnemonic, inst.address);
                    }
                    write_byte(image, inst.address, opcode);

                    if size == 1 {
                        continue;
                    }

                    let operand = match &inst.operand_label {
                        Some(name) => self.symbols.resolve(name).ok_or_else(|| {
                            AssembleError::UndefinedSymbol {
                                name: name.clone(),
                                line: inst.line,
                            }
                        })?,
                        None => inst.operand,
                    };

                    if mode == AddressingMode::Relative {
                        // Offset is measured from the instruction after
                        // the two-byte branch.
                        let base = inst.address.wrapping_add(2);
                        let offset = operand as i32 - base as i32;
                        if !(-128..=127).contains(&offset) {
                            return Err(AssembleError::BranchOutOfRange {
                                offset,
                                line: inst.line,
                            });
                        }
                        write_byte(image, inst.address.wrapping_add(1), offset as i8 as u8);
                    } else if size == 2 {
                        write_byte(image, inst.address.wrapping_add(1), (operand & 0xFF) as u8);
                    } else {
                        write_byte(image, inst.address.wrapping_add(1), (operand & 0xFF) as u8);
                        write_byte(image, inst.address.wrapping_add(2), (operand >> 8) as u8);
                    }
                }
            }
        }

        Ok(())
    }
}

fn write_byte(image: &mut [u8; IMAGE_SIZE], addr: u16, value: u8) {
    image[addr as usize] = value;
}

/// The mode an instruction actually encodes at: branch mnemonics only
/// exist in relative form, whatever the parser saw.
fn encoded_mode(mnemonic: &str, parsed: AddressingMode) -> AddressingMode {
    if opcodes::is_branch(mnemonic) {
        AddressingMode::Relative
    } else {
        parsed
    }
}

/// Looks up the (opcode, size) encoding for a mnemonic and mode, promoting
/// zero-page forms to their absolute counterparts when the mnemonic lacks
/// the zero-page encoding.
fn encoding_for(mnemonic: &str, mode: AddressingMode) -> Option<(u8, u8)> {
    opcodes::lookup(mnemonic, mode)
        .or_else(|| {
            let promoted = match mode {
                AddressingMode::ZeroPage => AddressingMode::Absolute,
                AddressingMode::ZeroPageX => AddressingMode::AbsoluteX,
                AddressingMode::ZeroPageY => AddressingMode::AbsoluteY,
                _ => return None,
            };
            opcodes::lookup(mnemonic, promoted)
        })
        .map(|(byte, info)| (byte, info.size_bytes))
}
