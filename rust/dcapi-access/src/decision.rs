use serde::Serialize;

/// Outcome of a document authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "status", rename_all = "snake_case")]
pub enum Decision {
    /// The caller may open the document.
    Allow,
    /// The caller may not open the document.
    Deny,
    /// The document could not be fetched; carries the upstream status.
    UpstreamError(u16),
}

impl Decision {
    /// The HTTP status the boundary responds with.
    pub fn status_code(&self) -> u16 {
        match self {
            Decision::Allow => 204,
            Decision::Deny => 403,
            Decision::UpstreamError(status) => *status,
        }
    }

    /// Whether access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}
