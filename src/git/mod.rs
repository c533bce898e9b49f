//! Git access: the repository gateway and the branch safety check.

pub mod gateway;
pub mod safety;

pub use gateway::{GitCli, RepositoryGateway, exclude_pathspec};
pub use safety::{BranchPointers, BranchRelation, BranchSafetyGuard, classify};
