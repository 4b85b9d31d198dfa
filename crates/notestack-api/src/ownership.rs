//! Request-scoped ownership checks.
//!
//! Every handler that reads or mutates a single note or tag by id resolves it
//! through [`OwnershipGuard`] first. The guard fetches the resource and applies
//! [`notestack_core::ensure_owned`]; list and search endpoints instead scope
//! their store queries by owner.

use notestack_core::{ensure_owned, Note, Tag};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub struct OwnershipGuard<'a> {
    state: &'a AppState,
    requester: &'a str,
}

impl<'a> OwnershipGuard<'a> {
    pub fn new(state: &'a AppState, requester: &'a str) -> Self {
        Self { state, requester }
    }

    /// Fetch note `id`; `NotFound` if absent, `Unauthorized` if not the requester's.
    pub async fn note(&self, id: i64) -> Result<Note, ApiError> {
        let note = self.state.notes.fetch(id).await?;
        ensure_owned(note, id, self.requester).map_err(|e| self.denied("note", id, e))
    }

    /// Fetch tag `id`; `NotFound` if absent, `Unauthorized` if not the requester's.
    pub async fn tag(&self, id: i64) -> Result<Tag, ApiError> {
        let tag = self.state.tags.fetch(id).await?;
        ensure_owned(tag, id, self.requester).map_err(|e| self.denied("tag", id, e))
    }

    fn denied(&self, kind: &str, id: i64, err: notestack_core::Error) -> ApiError {
        debug!(
            subsystem = "api",
            component = "ownership",
            username = self.requester,
            kind,
            id,
            reason = %err,
            "Ownership check failed"
        );
        err.into()
    }
}
