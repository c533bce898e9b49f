//! Create the commit from a message file.

use std::io::Write;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::CommitError;
use crate::git::RepositoryGateway;

/// Commits the index with an exact message.
///
/// The message goes through a temporary file handed to `git commit --file`,
/// never through a command-line argument, so quotes, backticks, newlines and
/// shell metacharacters arrive byte-for-byte. The file is removed when the
/// call returns, on success or failure.
pub struct CommitFinalizer<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: RepositoryGateway + ?Sized> CommitFinalizer<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub async fn commit(&self, message: &str) -> Result<(), CommitError> {
        let mut file = tempfile::Builder::new()
            .prefix("gitscribe-msg-")
            .suffix(".txt")
            .tempfile()
            .map_err(CommitError::MessageFile)?;

        write_message(&mut file, message)?;
        debug!(
            "Committing with message file {} ({} bytes)",
            file.path().display(),
            message.len()
        );

        self.gateway.commit(file.path()).await?;
        Ok(())
    }
}

fn write_message(file: &mut NamedTempFile, message: &str) -> Result<(), CommitError> {
    file.write_all(message.as_bytes())
        .and_then(|()| file.flush())
        .map_err(CommitError::MessageFile)
}
