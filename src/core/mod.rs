// src/core/mod.rs

pub mod sanitize;

pub use sanitize::{clean_line, CleanLine};
