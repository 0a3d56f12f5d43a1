// File: ./src/model/mod.rs
// Aggregates the checklist model files
pub mod item;
pub mod parser;

pub use item::{CategoryBlock, ChecklistDocument, ChecklistItem};
pub use parser::{ChecklistLine, classify_line, clean_text};
