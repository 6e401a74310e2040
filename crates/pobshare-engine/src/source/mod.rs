pub mod hosts;
pub mod transport;

use thiserror::Error;
use url::Url;

use crate::config::ImportConfig;
use hosts::{GENERIC_GUIDANCE, GuideHost, PasteHost};
pub use transport::{Transport, TransportError};

/// The resolver's verdict on one pasted input string.
///
/// Consumed immediately by the caller to decide whether to fetch; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// The input is (or at least is not a URL, so is treated as) a share
    /// code to decode directly.
    RawCode(String),
    /// A supported paste host, rewritten to its raw-content endpoint.
    FetchableUrl { host: String, url: String },
    /// A URL we refuse to fetch, with guidance the user can act on.
    UnsupportedUrl { host: String, guidance: String },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot import from {host}: {guidance}")]
    UnsupportedHost { host: String, guidance: String },
    #[error("no content id found in the {host} URL")]
    NoContentId { host: String },
    #[error("failed to fetch paste from {host}: {source}")]
    FetchFailed {
        host: String,
        #[source]
        source: TransportError,
    },
}

/// Classifies pasted input as a raw share code, a fetchable paste URL, or
/// an unsupported site.
///
/// Host checks compare the parsed host component exactly (or with a
/// `www.` prefix) against the configured allow-lists. Substring matching
/// is exploitable (`evil.com/pastebin.com`,
/// `evil.com?redirect=maxroll.gg`) and is never used here.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    paste_hosts: Vec<PasteHost>,
    guide_hosts: Vec<GuideHost>,
}

impl SourceResolver {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            paste_hosts: config.paste_hosts.clone(),
            guide_hosts: config.guide_hosts.clone(),
        }
    }

    /// Decides what the pasted input is. Performs no I/O.
    pub fn classify(&self, input: &str) -> Result<ResolvedSource, SourceError> {
        let trimmed = input.trim();
        let Some(url) = parse_http_url(trimmed) else {
            return Ok(ResolvedSource::RawCode(trimmed.to_string()));
        };
        let Some(host) = url.host_str() else {
            return Ok(ResolvedSource::UnsupportedUrl {
                host: String::new(),
                guidance: GENERIC_GUIDANCE.to_string(),
            });
        };

        if let Some(paste) = self
            .paste_hosts
            .iter()
            .find(|p| host_matches(host, &p.host))
        {
            let id = content_id(&url).ok_or_else(|| SourceError::NoContentId {
                host: paste.host.clone(),
            })?;
            return Ok(ResolvedSource::FetchableUrl {
                host: paste.host.clone(),
                url: paste.raw_url(&id),
            });
        }

        if let Some(guide) = self
            .guide_hosts
            .iter()
            .find(|g| host_matches(host, &g.host))
        {
            return Ok(ResolvedSource::UnsupportedUrl {
                host: guide.host.clone(),
                guidance: guide.guidance.clone(),
            });
        }

        Ok(ResolvedSource::UnsupportedUrl {
            host: host.to_string(),
            guidance: GENERIC_GUIDANCE.to_string(),
        })
    }
}

/// Parses the input as a URL only when it really is one. Share codes are
/// base64-ish blobs and must never reach the host-matching path.
fn parse_http_url(input: &str) -> Option<Url> {
    let url = Url::parse(input).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Exact host match, with `www.` treated as equivalent.
fn host_matches(host: &str, allowed: &str) -> bool {
    host == allowed || host.strip_prefix("www.") == Some(allowed)
}

/// The paste id: the first path segment that is not itself the `raw`
/// marker, so both paste URLs and already-raw URLs resolve to the same
/// place.
fn content_id(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|segment| !segment.is_empty() && *segment != "raw")
        .map(str::to_string)
}
