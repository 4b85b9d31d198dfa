//! Ownership predicate shared by every single-resource operation.
//!
//! Notes and tags belong to exactly one user. Before a handler reads or
//! mutates one of them by id it resolves the resource and passes the lookup
//! result through [`ensure_owned`], which turns "absent" into `NotFound` and
//! "owned by someone else" into `Unauthorized`.

use crate::error::{Error, Result};
use crate::models::{Note, Tag};

/// A resource with a single, immutable owner.
pub trait Owned {
    /// Human-readable resource kind used in error messages.
    const KIND: &'static str;

    /// Username of the owner.
    fn owner(&self) -> &str;
}

impl Owned for Note {
    const KIND: &'static str = "note";

    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Owned for Tag {
    const KIND: &'static str = "tag";

    fn owner(&self) -> &str {
        &self.owner
    }
}

/// Lookup-then-compare: `None` → `NotFound`, owner mismatch → `Unauthorized`.
///
/// Owner comparison is exact string equality.
pub fn ensure_owned<R: Owned>(resource: Option<R>, id: i64, requester: &str) -> Result<R> {
    let resource =
        resource.ok_or_else(|| Error::NotFound(format!("{} {} not found", R::KIND, id)))?;

    if resource.owner() != requester {
        return Err(Error::Unauthorized(format!(
            "{} doesn't belong to the authenticated user",
            R::KIND
        )));
    }

    Ok(resource)
}
