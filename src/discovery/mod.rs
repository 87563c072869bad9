//! Work folder discovery: directory scanning and code recognition

pub mod code;
pub mod scanner;

pub use code::{CodeRecognizer, RjCodeRecognizer};
pub use scanner::{Scanner, DEFAULT_MAX_DEPTH};
