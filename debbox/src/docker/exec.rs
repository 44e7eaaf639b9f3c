//! Command execution inside a running container.
//!
//! One entry point covers both modes. Batch execs drain the merged output
//! stream and then inspect the exit code explicitly, since the merged-TTY API
//! does not otherwise signal failure. Interactive execs attach host stdin,
//! put the terminal into raw mode for the duration of the session, and keep the
//! remote pseudo-terminal sized to the host window.

use std::io::IsTerminal;
use std::pin::Pin;

use bollard::container::LogOutput;
use bollard::exec::{CreateExecOptions, ResizeExecOptions, StartExecResults};
use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use super::terminal::{RawModeGuard, TerminalSize};
use super::DockerClient;
use crate::errors::{DebboxError, DebboxResult};

type OutputStream = Pin<Box<dyn Stream<Item = Result<LogOutput, bollard::errors::Error>> + Send>>;
type InputSink = Pin<Box<dyn AsyncWrite + Send>>;

/// Arguments for [`DockerClient::container_exec`].
#[derive(Debug, Clone, Default)]
pub struct ExecArgs {
    /// Target container name.
    pub name: String,
    /// Command passed to `bash -c`; empty means a bare interactive shell.
    pub cmd: String,
    /// Working directory inside the container; empty means the image default.
    pub work_dir: String,
    /// Run as root instead of the container's configured user.
    pub as_root: bool,
    /// Attach host stdin and, on a real terminal, forward resize events.
    pub interactive: bool,
    /// Report success without executing anything or touching the daemon.
    pub skip: bool,
    /// Network posture applied before the command runs.
    pub network: bool,
}

/// Commands run under a shell so that quoting and expansions behave the way
/// the packaging tools expect. Empty command means the bare shell.
fn shell_command(cmd: &str) -> Vec<String> {
    let mut shell = vec!["bash".to_string()];
    if !cmd.is_empty() {
        shell.push("-c".to_string());
        shell.push(cmd.to_string());
    }
    shell
}

/// Translate an inspected exit code into the step-facing result.
fn completion_status(exit_code: Option<i64>) -> DebboxResult<()> {
    match exit_code {
        Some(0) | None => Ok(()),
        Some(code) => Err(DebboxError::CommandFailed(code)),
    }
}

impl DockerClient {
    /// Execute a command inside a running container.
    ///
    /// A pseudo-terminal is always allocated server-side so stdout and
    /// stderr arrive merged and line-buffered the same way in both modes.
    /// Interactive sessions skip exit-code inspection: detaching the
    /// terminal ends the session regardless of the last command run inside.
    pub async fn container_exec(&self, args: ExecArgs) -> DebboxResult<()> {
        if args.skip {
            tracing::debug!(container = %args.name, "exec skip-flagged, nothing to do");
            return Ok(());
        }

        self.set_network_attached(&args.name, args.network).await?;

        let config = CreateExecOptions {
            cmd: Some(shell_command(&args.cmd)),
            user: args.as_root.then(|| "root".to_string()),
            working_dir: (!args.work_dir.is_empty()).then(|| args.work_dir.clone()),
            attach_stdin: Some(args.interactive),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(true),
            ..Default::default()
        };

        let exec = self.raw().create_exec(&args.name, config).await?;

        match self.raw().start_exec(&exec.id, None).await? {
            StartExecResults::Attached { output, input } => {
                if args.interactive && std::io::stdin().is_terminal() {
                    self.interactive_session(&exec.id, output, input).await?;
                } else {
                    // Interactive without a real terminal degrades to
                    // batch-like behavior: no raw mode, no resize, no stdin.
                    drain_output(output).await?;
                }
            }
            StartExecResults::Detached => {}
        }

        if !args.interactive {
            let inspect = self.raw().inspect_exec(&exec.id).await?;
            completion_status(inspect.exit_code)?;
        }

        Ok(())
    }

    /// Drive a terminal-attached session: raw mode for its duration, one
    /// immediate remote resize, a resize watcher, and a concurrent
    /// stdin→remote copy. Completion is detected by the output copy ending;
    /// both helper tasks are scoped to the session and reaped when it does.
    async fn interactive_session(
        &self,
        exec_id: &str,
        output: OutputStream,
        input: InputSink,
    ) -> DebboxResult<()> {
        let _raw = RawModeGuard::new()?;

        self.resize_exec(exec_id, TerminalSize::current()?).await?;

        let resize_task = spawn_resize_watcher(self.clone(), exec_id.to_string());
        let stdin_task = tokio::spawn(async move {
            let mut stdin = tokio::io::stdin();
            let mut input = input;
            let _ = tokio::io::copy(&mut stdin, &mut input).await;
        });

        let result = drain_output(output).await;

        // Stdin has no natural EOF on a terminal; abort rather than join.
        resize_task.abort();
        stdin_task.abort();

        result
    }

    /// Resize the remote pseudo-terminal to the given host dimensions.
    pub(crate) async fn resize_exec(&self, exec_id: &str, size: TerminalSize) -> DebboxResult<()> {
        self.raw()
            .resize_exec(
                exec_id,
                ResizeExecOptions {
                    height: size.rows,
                    width: size.cols,
                },
            )
            .await?;
        Ok(())
    }
}

/// Copy the merged remote output to host stdout until the command exits.
async fn drain_output(mut output: OutputStream) -> DebboxResult<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(chunk) = output.next().await {
        stdout.write_all(&chunk?.into_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

/// One watcher iteration: query the host dimensions and forward exactly that
/// size with a single remote call. A failed query forwards nothing.
async fn forward_current_size<Q, F, Fut>(query: Q, apply: F)
where
    Q: FnOnce() -> DebboxResult<TerminalSize>,
    F: FnOnce(TerminalSize) -> Fut,
    Fut: std::future::Future<Output = DebboxResult<()>>,
{
    match query() {
        Ok(size) => {
            if let Err(e) = apply(size).await {
                tracing::debug!("remote resize failed: {}", e);
            }
        }
        Err(e) => tracing::debug!("terminal size query failed: {}", e),
    }
}

/// Watch for host window-resize notifications and re-apply the current host
/// dimensions remotely on each one. Runs until aborted by the session.
fn spawn_resize_watcher(client: DockerClient, exec_id: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigwinch = match signal(SignalKind::window_change()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("failed to register SIGWINCH handler: {}", e);
                return;
            }
        };

        while sigwinch.recv().await.is_some() {
            forward_current_size(TerminalSize::current, |size| {
                client.resize_exec(&exec_id, size)
            })
            .await;
        }
    })
}
