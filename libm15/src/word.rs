/// A machine word. Only the low 15 bits are meaningful; bit 15 is always clear
/// once a value has gone through [`i32_to_word`] or [`WordExt::masked`].
/// Negative values are two's complement over those 15 bits.
pub type Word = u16;

pub const WORD_BITS: u32 = 15;
pub const WORD_MASK: Word = (1 << WORD_BITS) - 1;

pub trait WordExt {
    fn masked(self) -> Word;
    fn as_octal(&self) -> String;
    fn field(&self, offset: u32, width: u32) -> Word;
}

impl WordExt for Word {
    fn masked(self) -> Word {
        self & WORD_MASK
    }

    fn as_octal(&self) -> String {
        format!("{:05o}", self.masked())
    }

    fn field(&self, offset: u32, width: u32) -> Word {
        (self >> offset) & ((1 << width) - 1)
    }
}

/// Truncate any integer to a 15 bit word, keeping two's complement for negatives.
pub fn i32_to_word(i: i32) -> Word {
    let [_, _, a, b] = i.to_be_bytes();
    u16::from_be_bytes([a, b]).masked()
}

pub fn char_to_word(c: char) -> Word {
    i32_to_word(c as i32)
}
