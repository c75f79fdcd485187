//! Interactive shell built on the termhost crates.
//!
//! Run with: cargo run -p repl-shell-demo
//!
//! Type `help` for the command list; `exit [code]` leaves the shell.
//! Ctrl-C stops the session and cancels an in-flight command.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::StreamExt;
use termhost_core::{CommandRequest, ExecutionContext, ResultRelay, RunOutcome, Runner};
use termhost_registry::TerminalBuilder;
use termhost_session::HostedSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP_TEXT: &str = "commands:
  help          show this text
  echo <args>   print the arguments back
  sleep [secs]  wait (cancellable with Ctrl-C)
  exit [code]   stop the session";

struct HelpRunner;

#[async_trait]
impl Runner for HelpRunner {
    async fn run(&self, _ctx: ExecutionContext) -> anyhow::Result<RunOutcome> {
        Ok(RunOutcome::success_with(HELP_TEXT))
    }
}

struct EchoRunner;

#[async_trait]
impl Runner for EchoRunner {
    async fn run(&self, ctx: ExecutionContext) -> anyhow::Result<RunOutcome> {
        Ok(RunOutcome::success_with(ctx.args().join(" ")))
    }
}

struct SleepRunner;

#[async_trait]
impl Runner for SleepRunner {
    async fn run(&self, ctx: ExecutionContext) -> anyhow::Result<RunOutcome> {
        let secs: u64 = match ctx.args().first() {
            Some(arg) => arg.parse()?,
            None => 1,
        };
        tokio::select! {
            () = tokio::time::sleep(Duration::from_secs(secs)) => {
                Ok(RunOutcome::success_with(format!("slept {secs}s")))
            }
            () = ctx.cancelled() => Ok(RunOutcome::cancelled()),
        }
    }
}

struct ExitRunner;

#[async_trait]
impl Runner for ExitRunner {
    async fn run(&self, ctx: ExecutionContext) -> anyhow::Result<RunOutcome> {
        let code = match ctx.args().first() {
            Some(arg) => arg.parse()?,
            None => 0,
        };
        Ok(RunOutcome::exit(code))
    }
}

/// Renders each outcome as a JSON line on stdout.
struct JsonRelay;

impl ResultRelay for JsonRelay {
    fn relay(&self, command: &str, outcome: &RunOutcome) {
        match serde_json::to_string(outcome) {
            Ok(json) => println!("{command}: {json}"),
            Err(e) => tracing::error!("failed to serialize outcome: {e}"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let registry = TerminalBuilder::new()
        .register("help", HelpRunner)
        .register("echo", EchoRunner)
        .register("sleep", SleepRunner)
        .register("exit", ExitRunner)
        .build()
        .expect("command registration is collision-free");

    let mut session = HostedSession::new(Arc::new(registry), Arc::new(JsonRelay));
    session.start().expect("session start");

    // Ctrl-C stops the session and cancels in-flight work.
    let shutdown = session.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping session");
            shutdown.cancel();
        }
    });

    // Minimal stand-in for the real parsing layer: one command per line,
    // tokenized with shlex.
    let lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let commands = lines
        .filter_map(|line| async move {
            let line = line.ok()?;
            let mut tokens = shlex::split(&line)?.into_iter();
            let name = tokens.next()?;
            Some(CommandRequest::new(name, tokens))
        })
        .boxed();

    if let Err(e) = session.serve(commands).await {
        tracing::error!("session error: {e}");
    }
    tracing::info!(
        dispatched = session.commands_dispatched(),
        "session finished"
    );
    std::process::exit(session.exit_code().unwrap_or(0));
}
