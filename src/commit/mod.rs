//! Building blocks of a commit: change summary, diff budget, prompt, finalizer.

pub mod budget;
pub mod finalize;
pub mod prompt;
pub mod summary;

pub use budget::{TRUNCATION_MARKER, budget_diff};
pub use finalize::CommitFinalizer;
pub use prompt::{GenerationRequest, NO_INTENT_PLACEHOLDER, build_request};
pub use summary::{ChangeSummary, summarize_status};
