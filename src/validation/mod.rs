//! Brute-force validation helpers, mainly for tests: languages are compared
//! by enumerating every word up to a bounded length.

pub mod same_language;

pub use same_language::{assert_inverse_language, assert_same_language, same_language};
