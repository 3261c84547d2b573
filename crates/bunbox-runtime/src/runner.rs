//! Execution dispatch for the managed Bun binary.
//!
//! The runner decides which executable a host invocation should hit (a
//! project-local binstub wins over the managed binary) and runs it either
//! as a process replacement or as a supervised subprocess.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use bunbox_core::events::RunEvent;
use bunbox_core::paths::{self, PathError};
use bunbox_core::ports::{NoopEmitter, RunEventEmitter};

/// Exit status used when the managed binary is missing: the conventional
/// "command not found" code, detectable by calling automation.
pub const EXIT_MISSING_BINARY: i32 = 127;

/// The executable a dispatch resolved to, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecTarget {
    /// A project-local binstub exists and takes precedence.
    Binstub(PathBuf),
    /// The managed binary from the cache directory.
    Managed(PathBuf),
}

impl ExecTarget {
    /// The path to invoke.
    pub fn path(&self) -> &Path {
        match self {
            Self::Binstub(path) | Self::Managed(path) => path,
        }
    }
}

/// How to run the resolved executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Replace the current process image. Never returns on success.
    ///
    /// On platforms without an exec primitive this spawns the child, waits,
    /// and exits with its code - an approximation with the same observable
    /// contract.
    Replace,
    /// Spawn as a child process and wait for completion.
    Subprocess,
}

/// Outcome of a supervised subprocess run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The child exited with status zero.
    Success,
    /// The child exited nonzero; `None` means it was killed by a signal.
    Failure(Option<i32>),
}

impl RunOutcome {
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Errors from a dispatch attempt.
///
/// A child that runs and fails is a [`RunOutcome::Failure`], not an error;
/// this type covers the indeterminate case where no child ran at all.
#[derive(Debug, Error)]
pub enum RunError {
    /// The target executable could not be started.
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Default paths could not be resolved.
    #[error("path error: {0}")]
    Path(#[from] PathError),
}

/// Arguments for a Bun invocation.
///
/// Accepts a single string or a sequence of strings; both forms are
/// normalized to whitespace-separated tokens and joined with single spaces
/// into one command line. Tokens are not escaped individually: values
/// containing spaces or shell metacharacters must be pre-quoted by the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BunArgs {
    tokens: Vec<String>,
}

impl BunArgs {
    /// The individual argument tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The tokens joined with single spaces.
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<&str> for BunArgs {
    fn from(args: &str) -> Self {
        Self {
            tokens: args.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl From<String> for BunArgs {
    fn from(args: String) -> Self {
        Self::from(args.as_str())
    }
}

impl From<Vec<String>> for BunArgs {
    fn from(args: Vec<String>) -> Self {
        Self {
            tokens: args
                .iter()
                .flat_map(|a| a.split_whitespace())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&[String]> for BunArgs {
    fn from(args: &[String]) -> Self {
        Self::from(args.to_vec())
    }
}

impl From<Vec<&str>> for BunArgs {
    fn from(args: Vec<&str>) -> Self {
        Self::from(
            args.into_iter()
                .map(str::to_string)
                .collect::<Vec<String>>(),
        )
    }
}

impl fmt::Display for BunArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

/// Seam between dispatch logic and the operating system.
///
/// Kept as a trait so tests can exercise the success / failure /
/// could-not-start outcomes without real child processes.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessSpawner: Send + Sync {
    /// Spawn `program` with `args`, wait for it, and return its exit code
    /// (`None` when terminated by a signal).
    fn spawn_and_wait(&self, program: &Path, args: &[String]) -> std::io::Result<Option<i32>>;

    /// Replace the current process image with `program`.
    ///
    /// Only returns on failure; on success the calling program ceases to
    /// exist.
    fn replace(&self, program: &Path, args: &[String]) -> std::io::Error;
}

/// The real spawner backed by `std::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn_and_wait(&self, program: &Path, args: &[String]) -> std::io::Result<Option<i32>> {
        let status = Command::new(program).args(args).status()?;
        Ok(status.code())
    }

    #[cfg(unix)]
    fn replace(&self, program: &Path, args: &[String]) -> std::io::Error {
        use std::os::unix::process::CommandExt;
        Command::new(program).args(args).exec()
    }

    #[cfg(not(unix))]
    fn replace(&self, program: &Path, args: &[String]) -> std::io::Error {
        // No exec primitive here: mirror the child's exit code instead.
        match Command::new(program).args(args).status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(e) => e,
        }
    }
}

/// Dispatches invocations of the managed Bun binary.
///
/// Target resolution is recomputed on every call - binstubs appear and
/// disappear while a host process lives, and the cheap check beats a stale
/// answer.
pub struct Runner {
    managed_binary: PathBuf,
    binstub: PathBuf,
    spawner: Arc<dyn ProcessSpawner>,
    emitter: Arc<dyn RunEventEmitter>,
}

impl Runner {
    /// Create a runner using the default managed-binary and binstub paths.
    pub fn new() -> Result<Self, PathError> {
        Ok(Self::with_paths(
            paths::bun_binary_path()?,
            paths::binstub_path(),
        ))
    }

    /// Create a runner with explicit paths.
    pub fn with_paths(managed_binary: PathBuf, binstub: PathBuf) -> Self {
        Self {
            managed_binary,
            binstub,
            spawner: Arc::new(SystemSpawner),
            emitter: Arc::new(NoopEmitter::new()),
        }
    }

    /// Replace the instrumentation emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<dyn RunEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Replace the process spawner.
    #[must_use]
    pub fn with_spawner(mut self, spawner: Arc<dyn ProcessSpawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// The managed binary path this runner checks before dispatching.
    pub fn managed_binary(&self) -> &Path {
        &self.managed_binary
    }

    /// Does the managed binary currently exist on disk?
    pub fn binary_exists(&self) -> bool {
        self.managed_binary.exists()
    }

    /// Resolve which executable an invocation should use.
    ///
    /// A project binstub wins unconditionally when it exists. Otherwise the
    /// managed path is returned whether or not the binary is currently on
    /// disk - existence is a run-time concern, not a resolution concern.
    pub fn resolve_target(&self) -> ExecTarget {
        if self.binstub.exists() {
            ExecTarget::Binstub(self.binstub.clone())
        } else {
            ExecTarget::Managed(self.managed_binary.clone())
        }
    }

    /// The preferred invocation path: the binstub when installed, the
    /// managed binary otherwise. Used by integrations when rewriting the
    /// commands of other tools.
    pub fn preferred_path(&self) -> PathBuf {
        self.resolve_target().path().to_path_buf()
    }

    /// Run Bun with `args`.
    ///
    /// If the managed binary is missing, prints a single warning line and
    /// exits the process with status 127 - even when a binstub exists and
    /// would have been dispatched to. The check is about baseline
    /// installation state, not the resolved target.
    ///
    /// In [`ExecMode::Replace`] this never returns on success. In
    /// [`ExecMode::Subprocess`] the child's exit is mapped to
    /// [`RunOutcome`]; a child that could not be started at all is a
    /// [`RunError::Spawn`].
    pub fn run(&self, args: impl Into<BunArgs>, mode: ExecMode) -> Result<RunOutcome, RunError> {
        let args = args.into();

        if !self.binary_exists() {
            eprintln!(
                "Unable to run Bun: executable not found at {}",
                self.managed_binary.display()
            );
            std::process::exit(EXIT_MISSING_BINARY);
        }

        let target = self.resolve_target();
        let command = command_line(target.path(), &args);
        debug!(command = %command, ?mode, "dispatching bun");

        match mode {
            ExecMode::Replace => {
                self.emitter.emit(RunEvent::new(command.clone(), None));
                let source = self.spawner.replace(target.path(), args.tokens());
                Err(RunError::Spawn { command, source })
            }
            ExecMode::Subprocess => {
                let started = Instant::now();
                let result = self.spawner.spawn_and_wait(target.path(), args.tokens());
                let duration = started.elapsed();
                self.emitter
                    .emit(RunEvent::new(command.clone(), Some(duration)));

                match result {
                    Ok(Some(0)) => Ok(RunOutcome::Success),
                    Ok(code) => Ok(RunOutcome::Failure(code)),
                    Err(source) => Err(RunError::Spawn { command, source }),
                }
            }
        }
    }
}

/// The full command line: target path and arguments joined with spaces.
fn command_line(target: &Path, args: &BunArgs) -> String {
    if args.is_empty() {
        target.display().to_string()
    } else {
        format!("{} {}", target.display(), args.joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    /// Records every emitted event for assertions.
    #[derive(Default, Clone)]
    struct CollectingEmitter {
        events: Arc<Mutex<Vec<RunEvent>>>,
    }

    impl RunEventEmitter for CollectingEmitter {
        fn emit(&self, event: RunEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn clone_box(&self) -> Box<dyn RunEventEmitter> {
            Box::new(self.clone())
        }
    }

    fn runner_with_managed_binary(tmp: &tempfile::TempDir) -> Runner {
        let managed = tmp.path().join("bun");
        fs::write(&managed, b"#!binary").unwrap();
        Runner::with_paths(managed, tmp.path().join("bin").join("bun"))
    }

    #[test]
    fn args_join_with_single_spaces() {
        let args = BunArgs::from(vec!["install", "--no-save"]);
        assert_eq!(args.joined(), "install --no-save");
        assert_eq!(args.tokens().len(), 2);
    }

    #[test]
    fn string_args_split_on_whitespace() {
        let args = BunArgs::from("run --bun build");
        assert_eq!(args.tokens(), ["run", "--bun", "build"]);
    }

    #[test]
    fn multi_token_elements_are_flattened() {
        // Mirrors what a shell would do with the joined command line.
        let args = BunArgs::from(vec!["x --bun".to_string(), "vite".to_string()]);
        assert_eq!(args.tokens(), ["x", "--bun", "vite"]);
    }

    #[test]
    fn command_line_includes_target_and_args() {
        let args = BunArgs::from(vec!["install", "--no-save"]);
        let line = command_line(Path::new("/cache/bun"), &args);
        assert_eq!(line, "/cache/bun install --no-save");
    }

    #[test]
    fn command_line_without_args_is_bare_target() {
        let line = command_line(Path::new("/cache/bun"), &BunArgs::default());
        assert_eq!(line, "/cache/bun");
    }

    #[test]
    fn binstub_wins_when_both_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let managed = tmp.path().join("bun");
        let binstub = tmp.path().join("bin").join("bun");
        fs::write(&managed, b"managed").unwrap();
        fs::create_dir_all(binstub.parent().unwrap()).unwrap();
        fs::write(&binstub, b"binstub").unwrap();

        let runner = Runner::with_paths(managed, binstub.clone());
        assert_eq!(runner.resolve_target(), ExecTarget::Binstub(binstub));
    }

    #[test]
    fn managed_path_is_returned_even_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let managed = tmp.path().join("bun");

        let runner = Runner::with_paths(managed.clone(), tmp.path().join("bin").join("bun"));
        // Resolution does not check existence.
        assert_eq!(runner.resolve_target(), ExecTarget::Managed(managed));
        assert!(!runner.binary_exists());
    }

    #[test]
    fn resolution_is_recomputed_per_call() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = runner_with_managed_binary(&tmp);

        assert!(matches!(runner.resolve_target(), ExecTarget::Managed(_)));

        let binstub = tmp.path().join("bin").join("bun");
        fs::create_dir_all(binstub.parent().unwrap()).unwrap();
        fs::write(&binstub, b"binstub").unwrap();

        assert!(matches!(runner.resolve_target(), ExecTarget::Binstub(_)));
    }

    #[test]
    fn subprocess_zero_exit_is_success() {
        let tmp = tempfile::tempdir().unwrap();
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn_and_wait()
            .returning(|_, _| Ok(Some(0)));

        let runner = runner_with_managed_binary(&tmp).with_spawner(Arc::new(spawner));
        let outcome = runner.run("--version", ExecMode::Subprocess).unwrap();
        assert_eq!(outcome, RunOutcome::Success);
    }

    #[test]
    fn subprocess_nonzero_exit_is_failure_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn_and_wait()
            .returning(|_, _| Ok(Some(3)));

        let runner = runner_with_managed_binary(&tmp).with_spawner(Arc::new(spawner));
        let outcome = runner
            .run(vec!["install", "--no-save"], ExecMode::Subprocess)
            .unwrap();
        assert_eq!(outcome, RunOutcome::Failure(Some(3)));
        assert!(!outcome.is_success());
    }

    #[test]
    fn subprocess_spawn_failure_is_indeterminate() {
        let tmp = tempfile::tempdir().unwrap();
        let mut spawner = MockProcessSpawner::new();
        spawner.expect_spawn_and_wait().returning(|_, _| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
        });

        let runner = runner_with_managed_binary(&tmp).with_spawner(Arc::new(spawner));
        let err = runner.run("install", ExecMode::Subprocess).unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[test]
    fn subprocess_dispatch_targets_the_resolved_binstub() {
        let tmp = tempfile::tempdir().unwrap();
        let managed = tmp.path().join("bun");
        let binstub = tmp.path().join("bin").join("bun");
        fs::write(&managed, b"managed").unwrap();
        fs::create_dir_all(binstub.parent().unwrap()).unwrap();
        fs::write(&binstub, b"binstub").unwrap();

        let expected = binstub.clone();
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn_and_wait()
            .withf(move |program, _| program == expected)
            .returning(|_, _| Ok(Some(0)));

        let runner = Runner::with_paths(managed, binstub).with_spawner(Arc::new(spawner));
        runner.run("--version", ExecMode::Subprocess).unwrap();
    }

    #[test]
    fn subprocess_run_emits_event_with_duration() {
        let tmp = tempfile::tempdir().unwrap();
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn_and_wait()
            .returning(|_, _| Ok(Some(0)));

        let emitter = Arc::new(CollectingEmitter::default());
        let runner = runner_with_managed_binary(&tmp)
            .with_spawner(Arc::new(spawner))
            .with_emitter({
                let e: Arc<dyn RunEventEmitter> = emitter.clone();
                e
            });

        runner
            .run(vec!["install", "--no-save"], ExecMode::Subprocess)
            .unwrap();

        let events = emitter.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].command.ends_with("bun install --no-save"));
        assert!(events[0].duration.is_some());
    }

    #[test]
    fn replace_failure_reports_spawn_error_and_untimed_event() {
        let tmp = tempfile::tempdir().unwrap();
        let mut spawner = MockProcessSpawner::new();
        spawner.expect_replace().returning(|_, _| {
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
        });

        let emitter = Arc::new(CollectingEmitter::default());
        let runner = runner_with_managed_binary(&tmp)
            .with_spawner(Arc::new(spawner))
            .with_emitter({
                let e: Arc<dyn RunEventEmitter> = emitter.clone();
                e
            });

        let err = runner.run("--version", ExecMode::Replace).unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));

        let events = emitter.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        // A replacement has no "after" to measure.
        assert!(events[0].duration.is_none());
    }
}
