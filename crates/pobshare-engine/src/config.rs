use std::time::Duration;

use crate::source::hosts::{self, GuideHost, PasteHost};

/// Reference bound on the encoded share-code length.
pub const DEFAULT_MAX_ENCODED_LEN: usize = 500_000;
/// Reference bound on the decompressed document size.
pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 10_000_000;
/// Default timeout handed to the injected transport.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Caller-owned configuration for the whole import pipeline.
///
/// There is deliberately no process-wide state: an embedding application
/// constructs one of these (usually `ImportConfig::default()`), tweaks
/// what it needs, and builds an [`Importer`](crate::Importer) from it.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Maximum accepted share-code length in characters, checked before
    /// any decoding work.
    pub max_encoded_len: usize,
    /// Maximum document size the decompressor will materialize.
    pub max_decompressed_len: usize,
    /// Timeout passed to [`Transport::fetch`](crate::Transport::fetch).
    pub fetch_timeout: Duration,
    /// Paste hosts we know how to rewrite into raw-content URLs.
    pub paste_hosts: Vec<PasteHost>,
    /// Build-guide sites we recognize only to give actionable guidance.
    pub guide_hosts: Vec<GuideHost>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            paste_hosts: hosts::default_paste_hosts(),
            guide_hosts: hosts::default_guide_hosts(),
        }
    }
}
