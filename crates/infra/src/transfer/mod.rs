//! File transfer adapters

pub mod local;

pub use local::{decode_text, parse_names, LocalFileTransfer};
