use once_cell::sync::OnceCell;
use regex::Regex;

pub const INITIAL_IC: usize = 100;
pub const INITIAL_DC: usize = 0;

pub const MAX_LINE_LENGTH: usize = 80;
pub const MAX_LABEL_LENGTH: usize = 30;

pub const MACRO_START: &str = "macr";
pub const MACRO_END: &str = "endmacr";

pub static LINE_REGEX: OnceCell<Regex> = OnceCell::new();
pub static SYMBOL_REGEX: OnceCell<Regex> = OnceCell::new();
pub static NUMBER_REGEX: OnceCell<Regex> = OnceCell::new();

// An optional `label:` token, then the directive or operation, then whatever is left.
static LINE_REGEX_PATTERN: &str =
    r#"^\s*(?:(?P<label>\S*):(?:\s+|$))?(?P<head>\S+)?\s*(?P<rest>.*?)\s*$"#;
static SYMBOL_REGEX_PATTERN: &str = r#"^[A-Za-z][A-Za-z0-9]*$"#;
static NUMBER_REGEX_PATTERN: &str = r#"^[+-]?[0-9]+$"#;

pub fn line_regex() -> &'static Regex {
    LINE_REGEX.get_or_init(|| Regex::new(LINE_REGEX_PATTERN).expect("Invalid line regex"))
}

pub fn symbol_regex() -> &'static Regex {
    SYMBOL_REGEX.get_or_init(|| Regex::new(SYMBOL_REGEX_PATTERN).expect("Invalid symbol regex"))
}

pub fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| Regex::new(NUMBER_REGEX_PATTERN).expect("Invalid number regex"))
}
