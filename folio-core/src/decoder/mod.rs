//! Decoders for turning book bytes into readable content

mod text;

pub use text::{split_lines, DecodedText, TextDecoder};
