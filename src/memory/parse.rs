//! The textual program format.
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! A line holds either a raw byte written as binary digits or an uppercase
//! mnemonic with its operands (`LDI R0, 8`). Operands are register names
//! (`R0` through `R7`) or numbers, with `0b`, `0o` and `0x` prefixes for
//! the non-decimal radixes. Everything after `#` is a comment.

use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::cpu::isa::{decode, Opcode};
use crate::error::VmError;
use crate::registers::NUM_REGISTERS;

use super::{Byte, Memory};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("no instruction matching `{text}` was found")]
    UnknownInstruction { text: String },
    #[error("{mnemonic} takes {expected} operand(s), found {found}")]
    ArityMismatch {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("`{text}` does not name a register")]
    InvalidRegister { text: String },
    #[error("failed to parse `{text}` as a number with radix `{radix}`")]
    InvalidNumber { text: String, radix: u32 },
    #[error("value `{value}` does not fit in a byte")]
    ValueTooWide { value: u32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("error [ln: {line_nr}]: {kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    line_nr: usize,
}

impl ParseError {
    fn new(kind: ParseErrorKind, line_nr: usize) -> Self {
        Self { kind, line_nr }
    }

    /// What went wrong.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The line the failure was found on, starting at 1.
    pub fn line(&self) -> usize {
        self.line_nr
    }
}

/// Anything that can go wrong between a program file and a populated memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Memory(#[from] VmError),
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Translates program text into the bytes it describes.
///
/// # Errors
///
/// Parsing stops at the first line that fails, reporting its line number.
pub fn assemble(source: &str) -> Result<Vec<Byte>> {
    let mut program = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_nr = index + 1;
        let line = line.split('#').next().unwrap_or("").trim();

        if line.is_empty() {
            // Comment or empty line; skip
            continue;
        }

        if line.chars().all(|c| c == '0' || c == '1') {
            // Line is a raw byte.
            let value = u32::from_str_radix(line, 2).map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber {
                        text: line.to_string(),
                        radix: 2,
                    },
                    line_nr,
                )
            })?;
            let byte = fit_into_byte(value).map_err(|kind| ParseError::new(kind, line_nr))?;

            log::debug!("[{}] Byte {:#010b}", line_nr, byte);

            program.push(byte);
        } else {
            // Line is an instruction.
            parse_instruction(line, line_nr, &mut program)?;
        }
    }

    Ok(program)
}

/// Parses a mnemonic line (`LDI R0, 8`) and appends its bytes to `program`.
fn parse_instruction(line: &str, line_nr: usize, program: &mut Vec<Byte>) -> Result<()> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let mnemonic = parts.next().unwrap_or("");
    let operands: Vec<&str> = parts
        .next()
        .unwrap_or("")
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    let opcode = *Opcode::ALL
        .iter()
        .find(|opcode| mnemonic == opcode.name())
        .ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownInstruction {
                    text: mnemonic.to_string(),
                },
                line_nr,
            )
        })?;

    let expected = decode(opcode.into()).operand_count;
    if operands.len() != expected {
        return Err(ParseError::new(
            ParseErrorKind::ArityMismatch {
                mnemonic: opcode.name(),
                expected,
                found: operands.len(),
            },
            line_nr,
        ));
    }

    log::debug!("[{}] Found instruction {}", line_nr, opcode);

    program.push(opcode.into());
    for token in operands {
        program.push(parse_operand(token).map_err(|kind| ParseError::new(kind, line_nr))?);
    }

    Ok(())
}

/// Parses a single operand token: a register name or a number.
fn parse_operand(token: &str) -> Result<Byte, ParseErrorKind> {
    if let Some(digits) = token.strip_prefix('R') {
        let index: usize = digits.parse().map_err(|_| ParseErrorKind::InvalidRegister {
            text: token.to_string(),
        })?;
        if index >= NUM_REGISTERS {
            return Err(ParseErrorKind::InvalidRegister {
                text: token.to_string(),
            });
        }
        return Ok(index as Byte);
    }

    fit_into_byte(parse_number(token)?)
}

/// Parses a number, sniffing the radix from a `0b`/`0o`/`0x` prefix.
fn parse_number(token: &str) -> Result<u32, ParseErrorKind> {
    let (radix, offset) = match token.as_bytes() {
        [b'0', b'b', ..] => (2, 2),
        [b'0', b'o', ..] => (8, 2),
        [b'0', b'x', ..] => (16, 2),
        _ => (10, 0),
    };

    u32::from_str_radix(&token[offset..], radix).map_err(|_| ParseErrorKind::InvalidNumber {
        text: token.to_string(),
        radix,
    })
}

fn fit_into_byte(value: u32) -> Result<Byte, ParseErrorKind> {
    Byte::try_from(value).map_err(|_| ParseErrorKind::ValueTooWide { value })
}

impl FromStr for Memory {
    type Err = LoadError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let program = assemble(source)?;

        let mut memory = Self::default();
        memory.load(0, &program)?;
        Ok(memory)
    }
}

impl Memory {
    /// Reads program text from a file and assembles it into a fresh memory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path)?;
        Ok(source.parse()?)
    }
}
