pub use word::WordExt;

pub mod op;
pub mod word;
