pub mod document;
pub mod item_text;

pub use document::{BuildDocumentParser, DocumentError};
pub use item_text::ItemTextParser;
