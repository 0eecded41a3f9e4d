//! Committed/pending theme arbitration.
//!
//! The store holds the theme the UI is currently painted with and at most
//! one pending change. Every request gets the next id; a commit only lands
//! when it names the id that is still pending, so an animation that was
//! superseded can never apply its theme late.

use crate::palette::ThemeTokens;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic id of a theme change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A requested theme that has not been applied yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub request_id: RequestId,
    pub tokens: ThemeTokens,
}

/// Result of [`TransitionStore::commit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The pending change became the committed theme.
    Committed,
    /// The id did not match the pending change; nothing changed.
    Stale,
}

/// Owner of the committed theme and the single pending change.
///
/// # Example
///
/// ```rust
/// use themewipe::palette::{Contrast, ThemeTokens};
/// use themewipe::store::{CommitOutcome, TransitionStore};
///
/// let mut store = TransitionStore::new(ThemeTokens::derive("ghost", Contrast::Dark));
/// let first = store.request_change(ThemeTokens::derive("roylp", Contrast::Light));
/// let second = store.request_change(ThemeTokens::derive("palbr", Contrast::Light));
///
/// assert_eq!(store.commit(first), CommitOutcome::Stale);
/// assert_eq!(store.commit(second), CommitOutcome::Committed);
/// assert_eq!(store.committed().page.as_str(), "bg-palbr");
/// assert!(!store.is_transitioning());
/// ```
#[derive(Clone, Debug)]
pub struct TransitionStore {
    committed: ThemeTokens,
    pending: Option<PendingChange>,
    last_request: u64,
}

impl TransitionStore {
    pub fn new(initial: ThemeTokens) -> Self {
        Self {
            committed: initial,
            pending: None,
            last_request: 0,
        }
    }

    /// Queue `tokens` as the sole pending change, superseding any earlier one.
    pub fn request_change(&mut self, tokens: ThemeTokens) -> RequestId {
        self.last_request += 1;
        let request_id = RequestId(self.last_request);

        if let Some(previous) = &self.pending {
            tracing::debug!(
                superseded = %previous.request_id,
                request_id = %request_id,
                "pending theme change superseded"
            );
        }
        tracing::debug!(request_id = %request_id, page = %tokens.page, "theme change requested");

        self.pending = Some(PendingChange { request_id, tokens });
        request_id
    }

    /// Apply the pending change if `request_id` is still the pending one.
    pub fn commit(&mut self, request_id: RequestId) -> CommitOutcome {
        match self.pending.take() {
            Some(pending) if pending.request_id == request_id => {
                tracing::debug!(
                    request_id = %request_id,
                    page = %pending.tokens.page,
                    "theme committed"
                );
                self.committed = pending.tokens;
                CommitOutcome::Committed
            }
            other => {
                tracing::trace!(request_id = %request_id, "stale commit ignored");
                self.pending = other;
                CommitOutcome::Stale
            }
        }
    }

    /// The theme the UI should paint with.
    pub fn committed(&self) -> &ThemeTokens {
        &self.committed
    }

    pub fn pending(&self) -> Option<&PendingChange> {
        self.pending.as_ref()
    }

    /// Id of the pending change, if any.
    pub fn active_request(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|p| p.request_id)
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Where the theme is heading: the pending tokens, else the committed ones.
    pub fn latest_target(&self) -> &ThemeTokens {
        self.pending
            .as_ref()
            .map(|p| &p.tokens)
            .unwrap_or(&self.committed)
    }
}
