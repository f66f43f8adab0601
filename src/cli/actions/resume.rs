//! Interactive resume request: email, then code, then the signed link.

use crate::{
    cli::globals::GlobalArgs,
    counters::{Counters, FileStore},
    error::GateError,
    gate::{CommandOpener, ConsoleOpener, GateConfig, GateState, LinkOpener, ResumeGate},
    gateway::{HostedConfig, HostedGateway},
    relay::FormRelay,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{future::Future, sync::Arc, time::Duration};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};
use url::Url;

/// How long a finished run waits for resume-view tracking before exiting.
const TRACKING_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub struct Args {
    pub project_url: Url,
    pub anon_key: SecretString,
    pub bucket: String,
    pub resume_object: String,
    pub link_ttl_seconds: u64,
    pub request_timeout: Duration,
    pub relay_url: Option<Url>,
    pub page: String,
    pub open_with: Option<String>,
}

type Input = Lines<BufReader<Stdin>>;

enum Step {
    Done,
    Restart,
    Cancelled,
}

enum Submission {
    Email(String),
    Code(String),
}

/// Execute the resume action.
/// # Errors
/// Returns an error if the gateway cannot be built or stdin/stdout fail.
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let gateway = HostedGateway::new(
        HostedConfig::new(args.project_url, args.anon_key).with_bucket(args.bucket),
    )
    .context("Failed to build identity gateway")?;

    let opener: Arc<dyn LinkOpener> = match args.open_with {
        Some(program) => Arc::new(CommandOpener::new(program)),
        None => Arc::new(ConsoleOpener),
    };

    let config = GateConfig::new()
        .with_object_id(args.resume_object)
        .with_link_ttl_seconds(args.link_ttl_seconds)
        .with_request_timeout(args.request_timeout);

    let mut gate = ResumeGate::new(Arc::new(gateway), opener, config);
    if let Some(relay_url) = args.relay_url {
        gate = gate.with_tracker(Arc::new(FormRelay::new(relay_url, args.page)?));
    }
    let gate = Arc::new(gate);

    let mut input = BufReader::new(io::stdin()).lines();

    gate.open().await;

    loop {
        match run_once(&gate, &mut input).await? {
            Step::Restart => continue,
            Step::Cancelled => {
                gate.close().await;
                println!("Cancelled.");
                return Ok(());
            }
            Step::Done => break,
        }
    }

    gate.flush_tracking(TRACKING_GRACE).await;

    let mut counters = Counters::new(FileStore::open(&globals.state_file)?);
    match counters.record_resume_click() {
        Ok(clicks) => info!("resume clicks: {clicks}"),
        Err(err) => warn!("failed to record resume click: {err:#}"),
    }

    Ok(())
}

async fn run_once(gate: &Arc<ResumeGate>, input: &mut Input) -> Result<Step> {
    loop {
        let Some(line) = prompt(input, "Email: ").await? else {
            return Ok(Step::Cancelled);
        };

        let Some(result) = submit(gate, Submission::Email(line), interrupted()).await? else {
            return Ok(Step::Cancelled);
        };

        match result {
            Ok(_) => {
                if let Some(message) = gate.session().await.status_message() {
                    println!("{message}");
                }
                break;
            }
            Err(err) => println!("{err}"),
        }
    }

    loop {
        let Some(line) = prompt(input, "Code: ").await? else {
            return Ok(Step::Cancelled);
        };

        let Some(result) = submit(gate, Submission::Code(line), interrupted()).await? else {
            return Ok(Step::Cancelled);
        };

        match result {
            Ok(GateState::Revealed) => return Ok(Step::Done),
            Ok(state) => warn!("unexpected gate state after verification: {state}"),
            Err(GateError::Abandoned) => return Ok(Step::Restart),
            Err(err) => {
                println!("{err}");
                if gate.session().await.state() == GateState::Idle {
                    return Ok(Step::Restart);
                }
            }
        }
    }
}

/// Runs one submission as its own task. When `cancel` fires first the gate
/// is closed and the call is still driven to completion, so a session that
/// verified in the meantime gets ended. Returns `None` when cancelled.
async fn submit<C>(
    gate: &Arc<ResumeGate>,
    submission: Submission,
    cancel: C,
) -> Result<Option<Result<GateState, GateError>>>
where
    C: Future<Output = ()>,
{
    let mut task = {
        let gate = Arc::clone(gate);
        tokio::spawn(async move {
            match submission {
                Submission::Email(input) => gate.submit_email(&input).await,
                Submission::Code(input) => gate.submit_code(&input).await,
            }
        })
    };

    tokio::select! {
        joined = &mut task => Ok(Some(joined?)),
        () = cancel => {
            gate.close().await;
            let late = task.await?;
            debug!("submission finished after cancel: {late:?}");
            Ok(None)
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Reads one line; `None` on end of input or Ctrl-C.
async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;

    tokio::select! {
        line = input.next_line() => Ok(line?),
        () = interrupted() => Ok(None),
    }
}
