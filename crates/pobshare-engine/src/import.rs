use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::codec::{CodeCodec, CodecError};
use crate::config::ImportConfig;
use crate::models::Build;
use crate::parsing::{BuildDocumentParser, DocumentError};
use crate::source::{ResolvedSource, SourceError, SourceResolver, Transport};

/// Any failure on the way from pasted input to a [`Build`].
///
/// Codec and source errors are surfaced verbatim: they tell the user
/// either that the paste is corrupt or that the source is blocked, both
/// of which they can act on.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The full import pipeline behind one caller-owned value.
///
/// Holds nothing but configuration-derived state; independent calls need
/// no locking and there is no process-wide cache.
#[derive(Debug)]
pub struct Importer {
    codec: CodeCodec,
    resolver: SourceResolver,
    parser: BuildDocumentParser,
    fetch_timeout: Duration,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

impl Importer {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            codec: CodeCodec::new(config),
            resolver: SourceResolver::new(config),
            parser: BuildDocumentParser::new(),
            fetch_timeout: config.fetch_timeout,
        }
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// Resolves the pasted input, fetches paste bodies through the
    /// injected transport where needed, and decodes the result.
    pub fn import<T: Transport>(&self, input: &str, transport: &T) -> Result<Build, ImportError> {
        match self.resolver.classify(input)? {
            ResolvedSource::RawCode(code) => self.decode_code(&code),
            ResolvedSource::FetchableUrl { host, url } => {
                debug!(%host, %url, "fetching paste body");
                let body = transport
                    .fetch(&url, self.fetch_timeout)
                    .map_err(|source| SourceError::FetchFailed {
                        host: host.clone(),
                        source,
                    })?;
                self.decode_code(body.trim())
            }
            ResolvedSource::UnsupportedUrl { host, guidance } => {
                Err(SourceError::UnsupportedHost { host, guidance }.into())
            }
        }
    }

    /// Decodes a share code that is already in hand (no fetch involved).
    pub fn decode_code(&self, code: &str) -> Result<Build, ImportError> {
        let document = self.codec.decode(code)?;
        Ok(self.parser.parse(&document)?)
    }
}
