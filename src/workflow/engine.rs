//! One commit session, from staging to a terminal outcome.

use tracing::{debug, info, warn};

use crate::claude::Generator;
use crate::commit::{CommitFinalizer, budget_diff, build_request, summarize_status};
use crate::config::Config;
use crate::editor::EditorBridge;
use crate::error::{GenerationError, PreconditionError, WorkflowError};
use crate::git::{BranchSafetyGuard, RepositoryGateway};
use crate::locale::Messages;
use crate::ui::{ProgressIndicator, Terminal, track};

use super::menu::MenuChoice;

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    Cancelled,
    NothingToCommit,
}

/// States of the draft/menu loop.
///
/// `Committed` and `Cancelled` are terminal. A failed generation leaves the
/// loop with an error instead of reaching the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Drafting,
    MenuOpen,
    Committing,
    Editing,
    Committed,
    Cancelled,
}

/// Inputs captured once per session and reused by every generation attempt.
#[derive(Debug)]
struct DraftInputs {
    history: Vec<String>,
    intent: Option<String>,
    diff: String,
}

/// Fails when the generator is unusable or the working directory is not
/// inside a repository. Touches neither the index nor the terminal.
pub async fn check_preconditions(
    gateway: &dyn RepositoryGateway,
    generator: &dyn Generator,
) -> Result<(), PreconditionError> {
    generator.ensure_available().await?;
    if !gateway.is_inside_repo() {
        return Err(PreconditionError::NotARepository);
    }
    Ok(())
}

/// Drives a single run against its collaborators.
pub struct CommitSession<'a> {
    gateway: &'a dyn RepositoryGateway,
    generator: &'a dyn Generator,
    editor: &'a dyn EditorBridge,
    terminal: &'a dyn Terminal,
    config: &'a Config,
    messages: &'static Messages,
}

impl<'a> CommitSession<'a> {
    pub fn new(
        gateway: &'a dyn RepositoryGateway,
        generator: &'a dyn Generator,
        editor: &'a dyn EditorBridge,
        terminal: &'a dyn Terminal,
        config: &'a Config,
        messages: &'static Messages,
    ) -> Self {
        Self {
            gateway,
            generator,
            editor,
            terminal,
            config,
            messages,
        }
    }

    /// Stage everything, draft a message and loop on the menu until the user
    /// commits or cancels.
    ///
    /// Preconditions are checked before anything is staged.
    pub async fn run(&self) -> Result<Outcome, WorkflowError> {
        check_preconditions(self.gateway, self.generator).await?;
        self.run_checked().await
    }

    /// [`run`](Self::run) for callers that already passed
    /// [`check_preconditions`].
    pub async fn run_checked(&self) -> Result<Outcome, WorkflowError> {
        self.terminal.info(self.messages.staging);
        self.gateway.stage_all().await?;

        let (diff, history, status) = tokio::try_join!(
            self.gateway.staged_diff(&self.config.excludes),
            self.gateway.recent_subjects(self.config.history_len),
            self.gateway.status(),
        )?;

        let summary = summarize_status(&status);
        if summary.is_empty() {
            info!("Nothing staged, skipping generation");
            self.terminal.info(self.messages.nothing_to_commit);
            return Ok(Outcome::NothingToCommit);
        }
        self.terminal
            .info(&format!("{}: {summary}", self.messages.changes_summary));

        self.report_branch_relation();

        let intent = match &self.config.intent {
            Some(intent) => Some(intent.clone()),
            None => self.terminal.read_intent(self.messages)?,
        };

        let inputs = DraftInputs {
            history,
            intent,
            diff: budget_diff(&diff, self.config.max_diff_chars),
        };

        self.interact(&inputs).await
    }

    async fn interact(&self, inputs: &DraftInputs) -> Result<Outcome, WorkflowError> {
        let mut state = LoopState::Drafting;
        let mut draft = String::new();

        loop {
            debug!("Session state: {:?}", state);
            state = match state {
                LoopState::Drafting => {
                    draft = self.draft(inputs).await?;
                    self.terminal.show_draft(self.messages, &draft);
                    LoopState::MenuOpen
                }
                LoopState::MenuOpen => self.read_choice(),
                LoopState::Editing => {
                    self.edit(&mut draft);
                    LoopState::MenuOpen
                }
                LoopState::Committing => {
                    if self.commit_allowed() {
                        CommitFinalizer::new(self.gateway).commit(&draft).await?;
                        LoopState::Committed
                    } else {
                        LoopState::MenuOpen
                    }
                }
                LoopState::Committed => {
                    self.terminal.success(self.messages.committed);
                    return Ok(Outcome::Committed);
                }
                LoopState::Cancelled => {
                    self.terminal.info(self.messages.cancelled);
                    return Ok(Outcome::Cancelled);
                }
            };
        }
    }

    /// One generation attempt with a freshly built request.
    async fn draft(&self, inputs: &DraftInputs) -> Result<String, GenerationError> {
        let request = build_request(
            self.messages.style_directive,
            &inputs.history,
            inputs.intent.as_deref(),
            &inputs.diff,
            self.messages.format_rules,
        );
        let text = request.render();
        debug!(
            "Generation request assembled at {} ({} chars)",
            request.created_at.format("%H:%M:%S"),
            text.chars().count()
        );

        let progress = if self.config.show_progress {
            ProgressIndicator::start(self.messages.generating)
        } else {
            ProgressIndicator::hidden()
        };

        let result = track(
            &progress,
            self.messages.still_generating,
            self.generator.generate(&text),
        )
        .await;

        match &result {
            Ok(_) => {
                let elapsed = progress.succeed(self.messages.generated);
                info!("Draft generated in {:?}", elapsed);
            }
            Err(e) => {
                let elapsed = progress.fail(self.messages.generation_failed);
                warn!("Generation failed after {:?}: {}", elapsed, e);
            }
        }

        result
    }

    fn read_choice(&self) -> LoopState {
        let input = match self.terminal.read_menu_input(self.messages) {
            Ok(input) => input,
            Err(e) => {
                warn!("Menu prompt failed, cancelling: {}", e);
                return LoopState::Cancelled;
            }
        };

        match MenuChoice::parse(&input) {
            Some(MenuChoice::Commit) => LoopState::Committing,
            Some(MenuChoice::Regenerate) => LoopState::Drafting,
            Some(MenuChoice::Edit) => LoopState::Editing,
            Some(MenuChoice::Cancel) => LoopState::Cancelled,
            None => {
                self.terminal.warn(self.messages.invalid_choice);
                LoopState::MenuOpen
            }
        }
    }

    /// The draft is replaced only by a real edit.
    fn edit(&self, draft: &mut String) {
        match self.editor.edit(draft) {
            Ok(Some(edited)) => {
                *draft = edited;
                self.terminal.show_draft(self.messages, draft);
            }
            Ok(None) => self.terminal.info(self.messages.edit_aborted),
            Err(e) => self
                .terminal
                .warn(&format!("{}: {e}", self.messages.edit_failed)),
        }
    }

    /// Informational check right after staging. Never blocks.
    fn report_branch_relation(&self) {
        match BranchSafetyGuard::new(self.gateway).check() {
            Ok(relation) => {
                if let Some(notice) = relation.notice(self.messages) {
                    if relation.is_blocking() {
                        self.terminal.warn(notice);
                    } else {
                        self.terminal.info(notice);
                    }
                }
            }
            Err(e) => debug!("Early branch check failed: {}", e),
        }
    }

    /// Fresh check immediately before committing. An unreadable branch state
    /// blocks the commit.
    fn commit_allowed(&self) -> bool {
        match BranchSafetyGuard::new(self.gateway).check() {
            Ok(relation) if relation.is_blocking() => {
                if let Some(notice) = relation.notice(self.messages) {
                    self.terminal.warn(notice);
                }
                false
            }
            Ok(_) => true,
            Err(e) => {
                self.terminal
                    .warn(&format!("{}: {e}", self.messages.safety_unknown));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use git2::Oid;

    use crate::claude::client::MockGenerator;
    use crate::commit::{NO_INTENT_PLACEHOLDER, TRUNCATION_MARKER};
    use crate::editor::MockEditorBridge;
    use crate::error::{EditorError, GitError};
    use crate::git::gateway::MockRepositoryGateway;
    use crate::locale::{Language, Messages};

    const DRAFT: &str = "feat(lib): add helper\n\n- lib.rs: add helper function";

    fn messages() -> &'static Messages {
        Language::English.messages()
    }

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    fn config() -> Config {
        Config {
            intent: Some("add a helper".to_string()),
            show_progress: false,
            ..Config::default()
        }
    }

    /// Terminal fed from a list of menu answers that records what was shown.
    #[derive(Default)]
    struct ScriptedTerminal {
        answers: Mutex<VecDeque<String>>,
        intent: Option<String>,
        intent_reads: Mutex<usize>,
        menu_reads: Mutex<usize>,
        drafts: Mutex<Vec<String>>,
        infos: Mutex<Vec<String>>,
        warnings: Mutex<Vec<String>>,
    }

    impl ScriptedTerminal {
        fn answering(answers: &[&str]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
                ..Default::default()
            }
        }

        fn warned(&self, text: &str) -> bool {
            self.warnings.lock().unwrap().iter().any(|w| w.contains(text))
        }

        fn informed(&self, text: &str) -> bool {
            self.infos.lock().unwrap().iter().any(|i| i.contains(text))
        }
    }

    impl Terminal for ScriptedTerminal {
        fn select_language(&self) -> Result<Language, dialoguer::Error> {
            Ok(Language::English)
        }

        fn read_intent(&self, _: &Messages) -> Result<Option<String>, dialoguer::Error> {
            *self.intent_reads.lock().unwrap() += 1;
            Ok(self.intent.clone())
        }

        fn show_draft(&self, _: &Messages, draft: &str) {
            self.drafts.lock().unwrap().push(draft.to_string());
        }

        fn read_menu_input(&self, _: &Messages) -> Result<String, dialoguer::Error> {
            *self.menu_reads.lock().unwrap() += 1;
            self.answers.lock().unwrap().pop_front().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted").into()
            })
        }

        fn info(&self, text: &str) {
            self.infos.lock().unwrap().push(text.to_string());
        }

        fn warn(&self, text: &str) {
            self.warnings.lock().unwrap().push(text.to_string());
        }

        fn success(&self, text: &str) {
            self.infos.lock().unwrap().push(text.to_string());
        }
    }

    /// Gateway with one modified file staged, on `main` without an upstream.
    fn gateway_with_changes() -> MockRepositoryGateway {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().returning(|| Ok(()));
        gateway.expect_staged_diff().returning(|_| {
            Ok("diff --git a/src/lib.rs b/src/lib.rs\n+pub fn helper() {}\n".to_string())
        });
        gateway
            .expect_recent_subjects()
            .returning(|_| Ok(vec!["feat: initial layout".to_string()]));
        gateway
            .expect_status()
            .returning(|| Ok(vec!["M  src/lib.rs".to_string()]));
        gateway
            .expect_head_branch()
            .returning(|| Ok(Some("main".to_string())));
        gateway.expect_local_ref().returning(|| Ok(Some(oid(1))));
        gateway.expect_upstream_ref().returning(|| {
            Err(GitError::NoUpstream {
                branch: "main".to_string(),
            })
        });
        gateway
    }

    /// Gateway whose branch has diverged from its upstream.
    fn diverged_gateway() -> MockRepositoryGateway {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().returning(|| Ok(()));
        gateway
            .expect_staged_diff()
            .returning(|_| Ok("+change\n".to_string()));
        gateway.expect_recent_subjects().returning(|_| Ok(vec![]));
        gateway
            .expect_status()
            .returning(|| Ok(vec!["A  new.rs".to_string()]));
        gateway
            .expect_head_branch()
            .returning(|| Ok(Some("main".to_string())));
        gateway.expect_local_ref().returning(|| Ok(Some(oid(1))));
        gateway.expect_upstream_ref().returning(|| Ok(oid(2)));
        gateway
            .expect_merge_base()
            .returning(|_, _| Ok(Some(oid(3))));
        gateway
    }

    fn capture_commits(gateway: &mut MockRepositoryGateway) -> Arc<Mutex<Vec<String>>> {
        let committed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&committed);
        gateway.expect_commit().returning(move |path| {
            sink.lock()
                .unwrap()
                .push(std::fs::read_to_string(path).unwrap());
            Ok(())
        });
        committed
    }

    fn generator_returning(message: &'static str) -> MockGenerator {
        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().returning(|| Ok(()));
        generator
            .expect_generate()
            .returning(move |_| Ok(message.to_string()));
        generator
    }

    fn capture_requests(generator: &mut MockGenerator) -> Arc<Mutex<Vec<String>>> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&requests);
        generator.expect_ensure_available().returning(|| Ok(()));
        generator.expect_generate().returning(move |request| {
            sink.lock().unwrap().push(request.to_string());
            Ok(DRAFT.to_string())
        });
        requests
    }

    async fn run_session(
        gateway: &MockRepositoryGateway,
        generator: &MockGenerator,
        editor: &MockEditorBridge,
        terminal: &ScriptedTerminal,
        config: &Config,
    ) -> Result<Outcome, WorkflowError> {
        CommitSession::new(gateway, generator, editor, terminal, config, messages())
            .run()
            .await
    }

    #[tokio::test]
    async fn test_nothing_staged_exits_before_generation() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().times(1).returning(|| Ok(()));
        gateway.expect_staged_diff().returning(|_| Ok(String::new()));
        gateway.expect_recent_subjects().returning(|_| Ok(vec![]));
        gateway.expect_status().returning(|| Ok(vec![]));

        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().returning(|| Ok(()));
        generator.expect_generate().never();
        let terminal = ScriptedTerminal::default();

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::NothingToCommit);
        assert!(terminal.informed(messages().nothing_to_commit));
        assert_eq!(*terminal.menu_reads.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rename_only_change_counts_as_nothing_to_commit() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().returning(|| Ok(()));
        gateway.expect_staged_diff().returning(|_| {
            Ok("diff --git a/a.rs b/b.rs\nsimilarity index 100%\n".to_string())
        });
        gateway.expect_recent_subjects().returning(|_| Ok(vec![]));
        gateway
            .expect_status()
            .returning(|| Ok(vec!["R  a.rs -> b.rs".to_string()]));
        gateway.expect_commit().never();

        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().returning(|| Ok(()));
        generator.expect_generate().never();
        let terminal = ScriptedTerminal::answering(&["1"]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::NothingToCommit);
        assert!(terminal.informed(messages().nothing_to_commit));
        assert_eq!(*terminal.menu_reads.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_generate_then_commit_uses_draft_verbatim() {
        let mut gateway = gateway_with_changes();
        let committed = capture_commits(&mut gateway);
        let generator = generator_returning(DRAFT);
        let terminal = ScriptedTerminal::answering(&["1"]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Committed);
        assert_eq!(*committed.lock().unwrap(), vec![DRAFT.to_string()]);
        assert_eq!(*terminal.drafts.lock().unwrap(), vec![DRAFT.to_string()]);
        assert!(terminal.informed(messages().no_upstream));
        assert!(terminal.informed("+0 ~1 -0"));
    }

    #[tokio::test]
    async fn test_auth_failure_is_fatal_and_never_opens_menu() {
        let gateway = gateway_with_changes();
        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().returning(|| Ok(()));
        generator.expect_generate().times(1).returning(|_| {
            Err(GenerationError::Rejected(
                "Invalid API key · Please run /login".to_string(),
            ))
        });
        let terminal = ScriptedTerminal::answering(&["1"]);

        let result = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await;

        match result {
            Err(WorkflowError::Generation { source }) => assert!(source.is_auth_failure()),
            other => panic!("Expected generation error, got {other:?}"),
        }
        assert_eq!(*terminal.menu_reads.lock().unwrap(), 0);
        assert!(terminal.drafts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_regeneration_ends_run_without_menu() {
        let mut gateway = gateway_with_changes();
        gateway.expect_commit().never();
        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().returning(|| Ok(()));
        let mut seq = mockall::Sequence::new();
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DRAFT.to_string()));
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(GenerationError::Unavailable("timed out".to_string())));
        let terminal = ScriptedTerminal::answering(&["2", "1"]);

        let result = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await;

        assert!(matches!(
            result,
            Err(WorkflowError::Generation {
                source: GenerationError::Unavailable(_)
            })
        ));
        assert_eq!(*terminal.menu_reads.lock().unwrap(), 1);
        assert_eq!(*terminal.drafts.lock().unwrap(), vec![DRAFT.to_string()]);
        assert_eq!(terminal.answers.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_diverged_branch_blocks_commit_and_returns_to_menu() {
        let mut gateway = diverged_gateway();
        gateway.expect_commit().never();
        let generator = generator_returning(DRAFT);
        let terminal = ScriptedTerminal::answering(&["1", "4"]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(*terminal.menu_reads.lock().unwrap(), 2);
        // Once after staging, once when Commit was chosen.
        let blocked = terminal
            .warnings
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.as_str() == messages().blocked_diverged)
            .count();
        assert_eq!(blocked, 2);
    }

    #[tokio::test]
    async fn test_unsaved_edit_keeps_draft() {
        let mut gateway = gateway_with_changes();
        let committed = capture_commits(&mut gateway);
        let generator = generator_returning(DRAFT);
        let mut editor = MockEditorBridge::new();
        editor
            .expect_edit()
            .times(1)
            .withf(|initial| initial == DRAFT)
            .returning(|_| Ok(None));
        let terminal = ScriptedTerminal::answering(&["3", "1"]);

        let outcome = run_session(&gateway, &generator, &editor, &terminal, &config())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Committed);
        assert!(terminal.informed(messages().edit_aborted));
        assert_eq!(*committed.lock().unwrap(), vec![DRAFT.to_string()]);
    }

    #[tokio::test]
    async fn test_saved_edit_replaces_draft() {
        let mut gateway = gateway_with_changes();
        let committed = capture_commits(&mut gateway);
        let generator = generator_returning(DRAFT);
        let mut editor = MockEditorBridge::new();
        editor
            .expect_edit()
            .returning(|_| Ok(Some("fix: \"quoted\" `tick`".to_string())));
        let terminal = ScriptedTerminal::answering(&["3", "1"]);

        run_session(&gateway, &generator, &editor, &terminal, &config())
            .await
            .unwrap();

        assert_eq!(
            *committed.lock().unwrap(),
            vec!["fix: \"quoted\" `tick`".to_string()]
        );
        assert_eq!(terminal.drafts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_editor_failure_is_reported_and_draft_kept() {
        let mut gateway = gateway_with_changes();
        let committed = capture_commits(&mut gateway);
        let generator = generator_returning(DRAFT);
        let mut editor = MockEditorBridge::new();
        editor.expect_edit().returning(|_| {
            Err(EditorError::Exited {
                editor: "vi".to_string(),
                code: Some(1),
            })
        });
        let terminal = ScriptedTerminal::answering(&["3", "1"]);

        run_session(&gateway, &generator, &editor, &terminal, &config())
            .await
            .unwrap();

        assert!(terminal.warned(messages().edit_failed));
        assert_eq!(*committed.lock().unwrap(), vec![DRAFT.to_string()]);
    }

    /// Initial attempt plus three regenerations.
    #[tokio::test]
    async fn test_three_regenerations_then_cancel() {
        let mut gateway = gateway_with_changes();
        gateway.expect_commit().never();
        let mut generator = MockGenerator::new();
        let requests = capture_requests(&mut generator);
        let terminal = ScriptedTerminal::answering(&["2", "2", "2", "4"]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|r| r == &requests[0]));
        assert!(terminal.informed(messages().cancelled));
    }

    #[tokio::test]
    async fn test_invalid_choices_reprompt() {
        let gateway = gateway_with_changes();
        let mut generator = MockGenerator::new();
        let requests = capture_requests(&mut generator);
        let terminal = ScriptedTerminal::answering(&["9", "commit", "", "4"]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(requests.lock().unwrap().len(), 1);
        let invalid = terminal
            .warnings
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.as_str() == messages().invalid_choice)
            .count();
        assert_eq!(invalid, 3);
    }

    #[tokio::test]
    async fn test_closed_input_at_menu_cancels() {
        let mut gateway = gateway_with_changes();
        gateway.expect_commit().never();
        let generator = generator_returning(DRAFT);
        let terminal = ScriptedTerminal::answering(&[]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
    }

    #[tokio::test]
    async fn test_unreadable_branch_state_blocks_commit() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().returning(|| Ok(()));
        gateway
            .expect_staged_diff()
            .returning(|_| Ok("+x\n".to_string()));
        gateway.expect_recent_subjects().returning(|_| Ok(vec![]));
        gateway
            .expect_status()
            .returning(|| Ok(vec!["M  a.rs".to_string()]));
        gateway.expect_head_branch().returning(|| {
            Err(GitError::CommandFailed {
                command: "rev-parse".to_string(),
                stderr: "corrupt".to_string(),
            })
        });
        gateway.expect_commit().never();
        let generator = generator_returning(DRAFT);
        let terminal = ScriptedTerminal::answering(&["1", "4"]);

        let outcome = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(terminal.warned(messages().safety_unknown));
    }

    #[tokio::test]
    async fn test_not_a_repository_stops_before_staging() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(false);
        gateway.expect_stage_all().never();
        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().returning(|| Ok(()));

        let result = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &ScriptedTerminal::default(),
            &config(),
        )
        .await;

        assert!(matches!(
            result,
            Err(WorkflowError::Precondition(PreconditionError::NotARepository))
        ));
    }

    #[tokio::test]
    async fn test_missing_generator_stops_before_staging() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().never();
        let mut generator = MockGenerator::new();
        generator
            .expect_ensure_available()
            .returning(|| Err(PreconditionError::GeneratorNotInstalled));

        let result = run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &ScriptedTerminal::default(),
            &config(),
        )
        .await;

        assert!(matches!(
            result,
            Err(WorkflowError::Precondition(
                PreconditionError::GeneratorNotInstalled
            ))
        ));
    }

    #[tokio::test]
    async fn test_preconditions_fail_outside_repository() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(false);
        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().times(1).returning(|| Ok(()));

        let result = check_preconditions(&gateway, &generator).await;

        assert!(matches!(result, Err(PreconditionError::NotARepository)));
    }

    #[tokio::test]
    async fn test_run_checked_skips_preflight() {
        let mut gateway = gateway_with_changes();
        let committed = capture_commits(&mut gateway);
        let mut generator = MockGenerator::new();
        generator.expect_ensure_available().never();
        generator
            .expect_generate()
            .returning(|_| Ok(DRAFT.to_string()));
        let terminal = ScriptedTerminal::answering(&["1"]);
        let config = config();

        let outcome = CommitSession::new(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config,
            messages(),
        )
        .run_checked()
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Committed);
        assert_eq!(committed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_intent_prompted_once_when_not_configured() {
        let gateway = gateway_with_changes();
        let mut generator = MockGenerator::new();
        let requests = capture_requests(&mut generator);
        let terminal = ScriptedTerminal::answering(&["2", "4"]);
        let config = Config {
            intent: None,
            ..config()
        };

        run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(*terminal.intent_reads.lock().unwrap(), 1);
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains(NO_INTENT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_configured_empty_intent_is_not_placeholder() {
        let gateway = gateway_with_changes();
        let mut generator = MockGenerator::new();
        let requests = capture_requests(&mut generator);
        let terminal = ScriptedTerminal::answering(&["4"]);
        let config = Config {
            intent: Some(String::new()),
            ..config()
        };

        run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(*terminal.intent_reads.lock().unwrap(), 0);
        assert!(!requests.lock().unwrap()[0].contains(NO_INTENT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_long_diff_is_budgeted_in_request() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_is_inside_repo().return_const(true);
        gateway.expect_stage_all().returning(|| Ok(()));
        gateway
            .expect_staged_diff()
            .returning(|_| Ok("+".repeat(500)));
        gateway.expect_recent_subjects().returning(|_| Ok(vec![]));
        gateway
            .expect_status()
            .returning(|| Ok(vec!["M  big.txt".to_string()]));
        gateway
            .expect_head_branch()
            .returning(|| Ok(Some("main".to_string())));
        gateway.expect_local_ref().returning(|| Ok(None));
        let mut generator = MockGenerator::new();
        let requests = capture_requests(&mut generator);
        let terminal = ScriptedTerminal::answering(&["4"]);
        let config = Config {
            max_diff_chars: 100,
            ..config()
        };

        run_session(
            &gateway,
            &generator,
            &MockEditorBridge::new(),
            &terminal,
            &config,
        )
        .await
        .unwrap();

        let request = &requests.lock().unwrap()[0];
        assert!(request.contains(TRUNCATION_MARKER));
        assert!(!request.contains(&"+".repeat(101)));
    }
}
