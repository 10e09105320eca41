use std::str::FromStr;

use libm15::op::Opcode;
use strum::{Display, EnumIter, EnumString};

use crate::constants::{MACRO_END, MACRO_START};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Directive {
    #[strum(serialize = ".data")]
    Data,
    #[strum(serialize = ".string")]
    String,
    #[strum(serialize = ".entry")]
    Entry,
    #[strum(serialize = ".extern")]
    Extern,
}

impl Directive {
    pub fn from_name(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }
}

/// Operation and directive names can't be used as labels or macro names.
pub fn is_reserved(name: &str) -> bool {
    Opcode::from_mnemonic(name).is_some() || Directive::from_name(name).is_some()
}

pub fn is_macro_keyword(name: &str) -> bool {
    name == MACRO_START || name == MACRO_END
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names() {
        assert_eq!(Directive::from_name(".data"), Some(Directive::Data));
        assert_eq!(Directive::from_name(".extern"), Some(Directive::Extern));
        assert_eq!(Directive::from_name("data"), None);
        assert_eq!(Directive::String.to_string(), ".string");
        assert_eq!(Directive::iter().count(), 4);
    }

    #[test]
    fn reserved() {
        assert!(is_reserved("mov"));
        assert!(is_reserved("stop"));
        assert!(is_reserved(".entry"));
        assert!(!is_reserved("MAIN"));
        assert!(!is_reserved("r1"));
        assert!(is_macro_keyword("endmacr"));
        assert!(!is_macro_keyword("m_macr"));
    }
}
