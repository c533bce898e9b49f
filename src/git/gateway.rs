//! Read/write operations against the repository.
//!
//! Staging, diffing, history, status and commit shell out to the system `git`
//! binary so the user's config, hooks and credential helpers apply. Branch
//! pointers are resolved with git2. Nothing is cached between calls.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use git2::{BranchType, ErrorCode, Oid, Repository};
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

/// Operations the commit workflow needs from version control.
///
/// "Not a repository" and "no upstream" surface as [`GitError::NotARepository`]
/// and [`GitError::NoUpstream`] so callers can tell them apart from generic
/// failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    fn is_inside_repo(&self) -> bool;

    /// Stage every change in the working tree (`git add -A`).
    async fn stage_all(&self) -> Result<(), GitError>;

    /// Unified diff of the index against HEAD, minus paths matching `excludes`.
    async fn staged_diff(&self, excludes: &[String]) -> Result<String, GitError>;

    /// Subjects of the last `limit` commits, newest first.
    async fn recent_subjects(&self, limit: usize) -> Result<Vec<String>, GitError>;

    /// Raw `git status --porcelain` lines.
    async fn status(&self) -> Result<Vec<String>, GitError>;

    /// Commit the index using `message_file` as the message, verbatim.
    async fn commit(&self, message_file: &Path) -> Result<(), GitError>;

    /// Short name of the checked-out branch, or `None` when HEAD is detached.
    fn head_branch(&self) -> Result<Option<String>, GitError>;

    /// Commit HEAD points at, or `None` on an unborn branch.
    fn local_ref(&self) -> Result<Option<Oid>, GitError>;

    /// Commit the upstream of the current branch points at.
    ///
    /// Fails with [`GitError::NoUpstream`] when none is configured.
    fn upstream_ref(&self) -> Result<Oid, GitError>;

    /// Best common ancestor of two commits, or `None` for unrelated histories.
    fn merge_base(&self, local: Oid, upstream: Oid) -> Result<Option<Oid>, GitError>;
}

/// [`RepositoryGateway`] backed by the `git` CLI and git2.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Gateway rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self, GitError> {
        let cwd = std::env::current_dir().map_err(GitError::SpawnFailed)?;
        Ok(Self::new(cwd))
    }

    fn open(&self) -> Result<Repository, GitError> {
        Repository::discover(&self.workdir).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitError::NotARepository
            } else {
                GitError::Repository(e)
            }
        })
    }

    /// Run a git command in the workdir and return its raw stdout.
    async fn run_git(&self, args: &[&str]) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(GitError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.to_lowercase().contains("not a git repository") {
                return Err(GitError::NotARepository);
            }
            return Err(GitError::CommandFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl RepositoryGateway for GitCli {
    fn is_inside_repo(&self) -> bool {
        self.open().is_ok()
    }

    async fn stage_all(&self) -> Result<(), GitError> {
        self.run_git(&["add", "-A"]).await.map(|_| ())
    }

    async fn staged_diff(&self, excludes: &[String]) -> Result<String, GitError> {
        let pathspecs: Vec<String> = excludes.iter().map(|g| exclude_pathspec(g)).collect();

        // `:/` is the repository root, so a run from a subdirectory still
        // sees everything `add -A` staged.
        let mut args = vec!["diff", "--cached", "--no-color", "--no-ext-diff", "--", ":/"];
        args.extend(pathspecs.iter().map(String::as_str));

        self.run_git(&args).await
    }

    async fn recent_subjects(&self, limit: usize) -> Result<Vec<String>, GitError> {
        if limit == 0 || self.local_ref()?.is_none() {
            return Ok(Vec::new());
        }

        let count = limit.to_string();
        let stdout = self
            .run_git(&["log", "-n", &count, "--no-color", "--pretty=format:%s"])
            .await?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }

    async fn status(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run_git(&["status", "--porcelain"]).await?;

        // Leading spaces are part of the two-character code, so no trimming.
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    async fn commit(&self, message_file: &Path) -> Result<(), GitError> {
        let path = message_file.to_string_lossy();
        self.run_git(&["commit", "--quiet", "--cleanup=verbatim", "--file", &path])
            .await
            .map(|_| ())
    }

    fn head_branch(&self) -> Result<Option<String>, GitError> {
        let repo = self.open()?;

        if repo.head_detached()? {
            return Ok(None);
        }

        // Read HEAD symbolically so unborn branches still report their name.
        let head = repo.find_reference("HEAD")?;
        Ok(head
            .symbolic_target()
            .map(|target| target.strip_prefix("refs/heads/").unwrap_or(target).to_string()))
    }

    fn local_ref(&self) -> Result<Option<Oid>, GitError> {
        let repo = self.open()?;
        match repo.head() {
            Ok(head) => Ok(head.target()),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(GitError::Repository(e)),
        }
    }

    fn upstream_ref(&self) -> Result<Oid, GitError> {
        let repo = self.open()?;
        let branch_name = self.head_branch()?.ok_or_else(|| GitError::NoUpstream {
            branch: "HEAD".to_string(),
        })?;
        let no_upstream = || GitError::NoUpstream {
            branch: branch_name.clone(),
        };

        let branch = match repo.find_branch(&branch_name, BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if e.code() == ErrorCode::NotFound => return Err(no_upstream()),
            Err(e) => return Err(GitError::Repository(e)),
        };

        let upstream = match branch.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == ErrorCode::NotFound => return Err(no_upstream()),
            Err(e) => return Err(GitError::Repository(e)),
        };

        upstream.get().target().ok_or_else(no_upstream)
    }

    fn merge_base(&self, local: Oid, upstream: Oid) -> Result<Option<Oid>, GitError> {
        let repo = self.open()?;
        match repo.merge_base(local, upstream) {
            Ok(base) => Ok(Some(base)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Repository(e)),
        }
    }
}

/// Build an exclude pathspec for a glob.
///
/// Bare file patterns match at any depth; patterns with a `/` are anchored at
/// the repository root.
pub fn exclude_pathspec(glob: &str) -> String {
    if glob.contains('/') {
        format!(":(exclude,glob){glob}")
    } else {
        format!(":(exclude,glob)**/{glob}")
    }
}
