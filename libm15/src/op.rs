use std::str::FromStr;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::word::{i32_to_word, Word, WordExt};

const OPCODE_OFFSET: u32 = 11;
const VALUE_OFFSET: u32 = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("`{0}` is not a valid operand")]
    InvalidOperand(String),

    #[error("`{opcode}` takes {expected} operand(s), found {found}")]
    OperandCount {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },
}

#[derive(FromPrimitive, EnumString, Display, EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Opcode {
    Mov = 0,
    Cmp = 1,
    Add = 2,
    Sub = 3,
    Lea = 4,
    Clr = 5,
    Not = 6,
    Inc = 7,
    Dec = 8,
    Jmp = 9,
    Bne = 10,
    Red = 11,
    Prn = 12,
    Jsr = 13,
    Rts = 14,
    Stop = 15,
}

impl Opcode {
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }

    pub fn from_word(word: Word) -> Option<Self> {
        FromPrimitive::from_u16(word.field(OPCODE_OFFSET, 4))
    }

    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Mov | Opcode::Cmp | Opcode::Add | Opcode::Sub | Opcode::Lea => 2,
            Opcode::Clr
            | Opcode::Not
            | Opcode::Inc
            | Opcode::Dec
            | Opcode::Jmp
            | Opcode::Bne
            | Opcode::Red
            | Opcode::Prn
            | Opcode::Jsr => 1,
            Opcode::Rts | Opcode::Stop => 0,
        }
    }
}

#[derive(EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Immediate = 0,
    Direct = 1,
    IndirectRegister = 2,
    DirectRegister = 3,
}

/// Relocation class of a word, stored one-hot in bits 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Are {
    External = 0,
    Relocatable = 1,
    Absolute = 2,
}

impl Are {
    pub fn bit(self) -> Word {
        1 << (self as u16)
    }

    pub fn from_word(word: Word) -> Option<Self> {
        match word.field(0, 3) {
            0b001 => Some(Are::External),
            0b010 => Some(Are::Relocatable),
            0b100 => Some(Are::Absolute),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl Side {
    fn mode_offset(self) -> u32 {
        match self {
            Side::Source => 7,
            Side::Destination => 3,
        }
    }

    fn register_offset(self) -> u32 {
        match self {
            Side::Source => 6,
            Side::Destination => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Immediate(i32),
    Direct(String),
    IndirectRegister(Register),
    DirectRegister(Register),
}

fn is_symbol_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

impl FromStr for Operand {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OpError::InvalidOperand(s.to_owned());

        if let Some(value) = s.strip_prefix('#') {
            value
                .parse::<i32>()
                .map(Operand::Immediate)
                .map_err(|_| invalid())
        } else if let Some(register) = s.strip_prefix('*') {
            Register::from_str(register)
                .map(Operand::IndirectRegister)
                .map_err(|_| invalid())
        } else if let Ok(register) = Register::from_str(s) {
            Ok(Operand::DirectRegister(register))
        } else if is_symbol_name(s) {
            Ok(Operand::Direct(s.to_owned()))
        } else {
            Err(invalid())
        }
    }
}

/// One word produced by the encoder. `symbol` is set when the word is a
/// placeholder waiting for the address of a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedWord {
    pub word: Word,
    pub symbol: Option<String>,
}

impl EncodedWord {
    fn absolute(word: Word) -> Self {
        Self {
            word: (word | Are::Absolute.bit()).masked(),
            symbol: None,
        }
    }
}

impl Operand {
    pub fn mode(&self) -> AddressMode {
        match self {
            Operand::Immediate(_) => AddressMode::Immediate,
            Operand::Direct(_) => AddressMode::Direct,
            Operand::IndirectRegister(_) => AddressMode::IndirectRegister,
            Operand::DirectRegister(_) => AddressMode::DirectRegister,
        }
    }

    pub fn register(&self) -> Option<Register> {
        match self {
            Operand::IndirectRegister(r) | Operand::DirectRegister(r) => Some(*r),
            _ => None,
        }
    }

    fn mode_bit(&self, side: Side) -> Word {
        1 << (side.mode_offset() + self.mode() as u32)
    }

    pub fn encode(&self, side: Side) -> EncodedWord {
        match self {
            Operand::Immediate(value) => EncodedWord::absolute(i32_to_word(*value << VALUE_OFFSET)),
            Operand::Direct(label) => EncodedWord {
                word: 0,
                symbol: Some(label.clone()),
            },
            Operand::IndirectRegister(r) | Operand::DirectRegister(r) => {
                EncodedWord::absolute((*r as Word) << side.register_offset())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub source: Option<Operand>,
    pub destination: Option<Operand>,
}

#[allow(clippy::len_without_is_empty)]
impl Instruction {
    /// Build an instruction from its operands in source order. A single
    /// operand is always the destination.
    pub fn new(opcode: Opcode, mut operands: Vec<Operand>) -> Result<Self, OpError> {
        let expected = opcode.operand_count();
        if operands.len() != expected {
            return Err(OpError::OperandCount {
                opcode,
                expected,
                found: operands.len(),
            });
        }

        let destination = operands.pop();
        let source = operands.pop();

        Ok(Self {
            opcode,
            source,
            destination,
        })
    }

    /// Two register operands are packed into a single shared word.
    fn register_pair(&self) -> Option<(Register, Register)> {
        match (&self.source, &self.destination) {
            (Some(s), Some(d)) => s.register().zip(d.register()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        if self.register_pair().is_some() {
            2
        } else {
            1 + self.source.is_some() as usize + self.destination.is_some() as usize
        }
    }

    pub fn first_word(&self) -> Word {
        let mut word = (self.opcode as Word) << OPCODE_OFFSET;
        if let Some(source) = &self.source {
            word |= source.mode_bit(Side::Source);
        }
        if let Some(destination) = &self.destination {
            word |= destination.mode_bit(Side::Destination);
        }
        (word | Are::Absolute.bit()).masked()
    }

    pub fn encode(&self) -> Vec<EncodedWord> {
        let mut words = vec![EncodedWord {
            word: self.first_word(),
            symbol: None,
        }];

        if let Some((s, d)) = self.register_pair() {
            words.push(EncodedWord::absolute(
                ((s as Word) << Side::Source.register_offset())
                    | ((d as Word) << Side::Destination.register_offset()),
            ));
        } else {
            if let Some(source) = &self.source {
                words.push(source.encode(Side::Source));
            }
            if let Some(destination) = &self.destination {
                words.push(destination.encode(Side::Destination));
            }
        }

        words
    }
}

/// The final form of a placeholder word once its label has an address.
pub fn symbol_word(address: usize, are: Are) -> Word {
    (((address as Word) << VALUE_OFFSET) | are.bit()).masked()
}
