//! Local vs. upstream branch comparison before committing.

use std::fmt;

use git2::Oid;
use tracing::debug;

use crate::error::GitError;
use crate::locale::Messages;

use super::gateway::RepositoryGateway;

/// How the current branch relates to its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRelation {
    NoUpstream,
    UpToDate,
    LocalAhead,
    RemoteAhead,
    Diverged,
    Detached,
}

impl BranchRelation {
    /// Whether committing on top of this relation must be refused.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            BranchRelation::RemoteAhead | BranchRelation::Diverged | BranchRelation::Detached
        )
    }

    /// User-facing notice for this relation, if it warrants one.
    pub fn notice<'a>(&self, messages: &'a Messages) -> Option<&'a str> {
        match self {
            BranchRelation::UpToDate => None,
            BranchRelation::NoUpstream => Some(messages.no_upstream),
            BranchRelation::LocalAhead => Some(messages.local_ahead),
            BranchRelation::RemoteAhead => Some(messages.blocked_remote_ahead),
            BranchRelation::Diverged => Some(messages.blocked_diverged),
            BranchRelation::Detached => Some(messages.blocked_detached),
        }
    }
}

impl fmt::Display for BranchRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchRelation::NoUpstream => "no upstream",
            BranchRelation::UpToDate => "up to date",
            BranchRelation::LocalAhead => "local ahead",
            BranchRelation::RemoteAhead => "remote ahead",
            BranchRelation::Diverged => "diverged",
            BranchRelation::Detached => "detached",
        };
        f.write_str(name)
    }
}

/// Resolved pointers the classification is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchPointers {
    /// Whether HEAD is on a named branch.
    pub on_branch: bool,
    pub local: Option<Oid>,
    pub upstream: Option<Oid>,
    pub merge_base: Option<Oid>,
}

/// Classify a set of pointers. Total over every combination.
///
/// Detached HEAD wins over everything; then a missing upstream (or an unborn
/// local branch) is informational; then the merge base decides. Unrelated
/// histories (no merge base) count as diverged.
pub fn classify(pointers: &BranchPointers) -> BranchRelation {
    if !pointers.on_branch {
        return BranchRelation::Detached;
    }

    let (Some(local), Some(upstream)) = (pointers.local, pointers.upstream) else {
        return BranchRelation::NoUpstream;
    };

    if local == upstream {
        return BranchRelation::UpToDate;
    }

    match pointers.merge_base {
        Some(base) if base == local => BranchRelation::RemoteAhead,
        Some(base) if base == upstream => BranchRelation::LocalAhead,
        _ => BranchRelation::Diverged,
    }
}

/// Evaluates the branch relation through a gateway.
///
/// Every call re-reads the pointers; nothing from a previous check is reused.
pub struct BranchSafetyGuard<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: RepositoryGateway + ?Sized> BranchSafetyGuard<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub fn check(&self) -> Result<BranchRelation, GitError> {
        let pointers = self.resolve()?;
        let relation = classify(&pointers);
        debug!("Branch relation: {} ({:?})", relation, pointers);
        Ok(relation)
    }

    fn resolve(&self) -> Result<BranchPointers, GitError> {
        let on_branch = self.gateway.head_branch()?.is_some();
        let local = self.gateway.local_ref()?;

        let upstream = if on_branch && local.is_some() {
            match self.gateway.upstream_ref() {
                Ok(oid) => Some(oid),
                Err(GitError::NoUpstream { .. }) => None,
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        let merge_base = match (local, upstream) {
            (Some(l), Some(u)) if l != u => self.gateway.merge_base(l, u)?,
            _ => None,
        };

        Ok(BranchPointers {
            on_branch,
            local,
            upstream,
            merge_base,
        })
    }
}
