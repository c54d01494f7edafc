//! Lexical analysis for 6502 assembly source.
//!
//! A single left-to-right scan over the source text, tracking 1-based line
//! and column positions, producing a [`Token`] stream terminated by an EOF
//! token. The lexer decides token boundaries and classes; everything
//! syntactic (which tokens may follow which) is the parser's business.
//!
//! Classification rules worth calling out:
//!
//! - An identifier immediately followed by `:` becomes a [`TokenKind::Label`]
//!   (the colon is consumed and not part of the text).
//! - An identifier whose uppercase form names one of the 56 documented
//!   mnemonics becomes a [`TokenKind::Mnemonic`], stored uppercased.
//!   Symbol names are stored verbatim and stay case-sensitive.
//! - `$` pulls in the following hex digit run as a single
//!   [`TokenKind::Absolute`] token whose text keeps the `$` prefix.
//! - A bare digit run is a [`TokenKind::Number`] and is strictly decimal;
//!   hex always needs the `$` prefix.

use crate::assembler::AssembleError;
use crate::opcodes;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Newline,
    /// `;` comment running to end of line. Emitted so the parser can use
    /// comments as operand terminators, then discarded.
    Comment,
    /// Identifier defined with a trailing `:`.
    Label,
    /// One of the 56 documented instruction names, uppercased.
    Mnemonic,
    /// `.`-prefixed directive name, e.g. `.org`.
    Directive,
    /// Reserved for immediate operand values; the parser classifies
    /// immediates from `#` followed by a literal instead.
    Immediate,
    /// `$`-prefixed hex literal, text includes the `$`.
    Absolute,
    /// Symbol reference (or any word that is neither label nor mnemonic).
    Identifier,
    /// Decimal digit run.
    Number,
    /// Double-quoted string literal, text includes the quotes.
    String,
    Comma,
    Hash,
    /// A bare `$` is never produced (hex digits are consumed eagerly), but
    /// the parser accepts the kind for sources that tokenize `$` apart
    /// from its digits.
    Dollar,
    LParen,
    RParen,
}

/// A lexical token with its source position (both 1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    source: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

/// Tokenizes an entire source text.
///
/// Returns the token sequence terminated by an EOF token, or the first
/// lexical error with its position.
pub fn tokenize(source: &str) -> Result<Vec<Token>, AssembleError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        position: 0,
        line: 1,
        column: 1,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<(), AssembleError> {
        while self.position < self.source.len() {
            self.next_token()?;
        }
        self.push(TokenKind::Eof, String::new(), self.line, self.column);
        Ok(())
    }

    fn next_token(&mut self) -> Result<(), AssembleError> {
        let (line, column) = (self.line, self.column);
        let ch = self.source[self.position];

        match ch {
            b'\n' => {
                self.push(TokenKind::Newline, "\n".into(), line, column);
                self.advance();
                self.line += 1;
                self.column = 1;
            }
            b'\r' => self.advance(),
            b';' => self.read_comment(),
            b'#' => {
                self.push(TokenKind::Hash, "#".into(), line, column);
                self.advance();
            }
            b',' => {
                self.push(TokenKind::Comma, ",".into(), line, column);
                self.advance();
            }
            b'(' => {
                self.push(TokenKind::LParen, "(".into(), line, column);
                self.advance();
            }
            b')' => {
                self.push(TokenKind::RParen, ")".into(), line, column);
                self.advance();
            }
            b'$' => {
                self.advance();
                self.read_hex_number(line, column);
            }
            b'.' => self.read_directive(),
            b'"' => self.read_string()?,
            _ if ch.is_ascii_whitespace() => self.skip_whitespace(),
            _ if ch.is_ascii_alphabetic() || ch == b'_' => self.read_identifier(),
            _ if ch.is_ascii_digit() => self.read_number(),
            _ => {
                return Err(AssembleError::UnexpectedCharacter {
                    ch: ch as char,
                    line,
                    column,
                });
            }
        }

        Ok(())
    }

    fn advance(&mut self) {
        self.position += 1;
        self.column += 1;
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.position).copied()
    }

    fn push(&mut self, kind: TokenKind, text: String, line: usize, column: usize) {
        self.tokens.push(Token {
            kind,
            text,
            line,
            column,
        });
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() && ch != b'\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_comment(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch == b'\n' {
                break;
            }
            self.advance();
        }
        let text = String::from_utf8_lossy(&self.source[start..self.position]).into_owned();
        self.push(TokenKind::Comment, text, line, column);
    }

    fn read_directive(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        self.advance(); // the '.'
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.source[start..self.position]).into_owned();
        self.push(TokenKind::Directive, text, line, column);
    }

    fn read_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let word = String::from_utf8_lossy(&self.source[start..self.position]).into_owned();

        if self.peek() == Some(b':') {
            self.advance();
            self.push(TokenKind::Label, word, line, column);
        } else if opcodes::is_mnemonic(&word.to_uppercase()) {
            self.push(TokenKind::Mnemonic, word.to_uppercase(), line, column);
        } else {
            self.push(TokenKind::Identifier, word, line, column);
        }
    }

    fn read_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.source[start..self.position]).into_owned();
        self.push(TokenKind::Number, text, line, column);
    }

    fn read_hex_number(&mut self, line: usize, column: usize) {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_hexdigit() {
                self.advance();
            } else {
                break;
            }
        }
        let digits = String::from_utf8_lossy(&self.source[start..self.position]);
        self.push(TokenKind::Absolute, format!("${digits}"), line, column);
    }

    fn read_string(&mut self) -> Result<(), AssembleError> {
        let (line, column) = (self.line, self.column);
        let start = self.position;
        self.advance(); // opening quote
        while let Some(ch) = self.peek() {
            if ch == b'"' {
                break;
            }
            self.advance();
        }

        if self.peek().is_none() {
            return Err(AssembleError::UnterminatedString { line });
        }

        self.advance(); // closing quote
        let text = String::from_utf8_lossy(&self.source[start..self.position]).into_owned();
        self.push(TokenKind::String, text, line, column);
        Ok(())
    }
}
