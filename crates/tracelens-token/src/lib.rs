//! # TraceLens Token
//!
//! Token counting and prompt budgeting for TraceLens.
//!
//! Fetched page text can be arbitrarily large; it is cut down to a
//! token budget before being sent to the classification model.

pub mod budget;

pub use budget::{count_tokens, truncate_to_char_boundary, truncate_to_tokens, Budgeted};
