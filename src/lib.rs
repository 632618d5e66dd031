pub mod automaton;
pub mod config;
pub mod error;
pub mod format;
pub mod induction;
pub mod language;
pub mod logger;
pub mod regex;
pub mod sample;
pub mod validation;

pub use error::{Error, Result};
