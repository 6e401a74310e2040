/// Where a paste host serves the raw content relative to its paste URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawUrlShape {
    /// Raw content lives under `/raw/{id}` (pastebin.com).
    RawPrefix,
    /// Raw content lives under `/{id}/raw` (pobb.in).
    RawSuffix,
}

/// A paste host we can rewrite into a fetchable raw-content URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteHost {
    pub host: String,
    pub shape: RawUrlShape,
}

impl PasteHost {
    pub fn new(host: &str, shape: RawUrlShape) -> Self {
        Self {
            host: host.to_string(),
            shape,
        }
    }

    pub fn raw_url(&self, content_id: &str) -> String {
        match self.shape {
            RawUrlShape::RawPrefix => format!("https://{}/raw/{}", self.host, content_id),
            RawUrlShape::RawSuffix => format!("https://{}/{}/raw", self.host, content_id),
        }
    }
}

/// A build-guide site that does not expose share codes directly. Matched
/// only so the user gets site-specific guidance instead of a generic
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideHost {
    pub host: String,
    pub guidance: String,
}

impl GuideHost {
    pub fn new(host: &str, guidance: &str) -> Self {
        Self {
            host: host.to_string(),
            guidance: guidance.to_string(),
        }
    }
}

/// Guidance shown for URL-shaped input matching neither host list.
pub const GENERIC_GUIDANCE: &str =
    "this site cannot be imported from; paste the build share code itself \
     or a pastebin.com / pobb.in link";

pub fn default_paste_hosts() -> Vec<PasteHost> {
    vec![
        PasteHost::new("pastebin.com", RawUrlShape::RawPrefix),
        PasteHost::new("pobb.in", RawUrlShape::RawSuffix),
    ]
}

pub fn default_guide_hosts() -> Vec<GuideHost> {
    vec![
        GuideHost::new(
            "maxroll.gg",
            "maxroll.gg guides embed their planner; open the build in the \
             planner and use its export button to copy a share code",
        ),
        GuideHost::new(
            "mobalytics.gg",
            "mobalytics.gg guides usually link a pastebin or pobb.in paste \
             near the top of the page; import that link instead",
        ),
        GuideHost::new(
            "poe-vault.com",
            "poe-vault.com guides list an import code in their \"Build \
             Import\" section; copy that code and paste it here",
        ),
        GuideHost::new(
            "poebuilds.cc",
            "poebuilds.cc pages link the original paste at the bottom of \
             the build; import that link instead",
        ),
    ]
}
