pub mod codec;
pub mod config;
pub mod import;
pub mod models;
pub mod parsing;
pub mod source;

// Re-export key types for easier usage
pub use codec::{CodeCodec, CodecError};
pub use config::ImportConfig;
pub use import::{ImportError, Importer};
pub use models::{Build, Item, Rarity};
pub use parsing::{BuildDocumentParser, DocumentError, ItemTextParser};
pub use source::{
    ResolvedSource, SourceError, SourceResolver, Transport, TransportError,
};
