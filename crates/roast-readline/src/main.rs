use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roast_application::{
    ConversationController, ConversationEvent, RoastEngine, StartKind, TurnOutcome,
};
use roast_core::random::{RandomSource, StdRandom};
use roast_core::session::SessionRepository;
use roast_core::storage::KeyValueStore;
use roast_infrastructure::{
    EnvOverrides, FileKeyValueStore, InMemoryKeyValueStore, KvSessionRepository, RoastPaths,
    Settings,
};
use roast_interaction::generator_from_config;

mod helper;
mod render;

use helper::CliHelper;

/// Transcript entries replayed when a stored session is restored.
const RESTORE_REPLAY: usize = 6;

#[derive(Parser, Debug)]
#[command(name = "roast")]
#[command(about = "!THERAPIST - a sarcastic not-a-therapist chat", long_about = None)]
struct Args {
    /// Display name; also lets the therapist greet you by name next time
    #[arg(long)]
    username: Option<String>,

    /// Override the data directory (session store)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the config directory (config.toml, secret.json)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Forget the stored session before starting
    #[arg(long)]
    reset: bool,

    /// Seed the random source for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds before an unanswered task is skipped
    #[arg(long)]
    countdown_secs: Option<u64>,

    /// Keep the session in memory only
    #[arg(long)]
    no_persist: bool,
}

enum Printed {
    Turn(TurnOutcome),
    Notice(String),
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// The main entry point for the roast REPL.
///
/// Sets up storage, the generation provider and the conversation
/// controller, then runs a rustyline loop. User actions are handled on
/// background tasks; a printer task renders their outcomes and countdown
/// expiries as they arrive.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    // ===== Configuration =====
    let paths = RoastPaths::resolve(args.config_dir.clone(), args.data_dir.clone())?;
    let settings = Settings::load(&paths, &EnvOverrides::from_env())?;
    let username = args.username.clone().or_else(|| settings.app.username.clone());
    let countdown = Duration::from_secs(
        args.countdown_secs
            .unwrap_or(settings.app.task_countdown_secs),
    );

    // ===== Backend Initialization =====
    let store: Arc<dyn KeyValueStore> = if args.no_persist {
        Arc::new(InMemoryKeyValueStore::new())
    } else {
        Arc::new(FileKeyValueStore::new(paths.store_dir()))
    };
    let repository = Arc::new(KvSessionRepository::new(store));
    if args.reset {
        repository.clear().await?;
    }

    let generator = generator_from_config(settings.gemini.as_ref(), &settings.app.generation);
    let engine = RoastEngine::new(generator)?;
    let rng: Arc<dyn RandomSource> = match args.seed {
        Some(seed) => Arc::new(StdRandom::seeded(seed)),
        None => Arc::new(StdRandom::from_entropy()),
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ConversationEvent>();
    let (controller, kind) = ConversationController::initialize(
        repository,
        engine,
        rng,
        countdown,
        Some(event_tx),
        username.as_deref(),
    )
    .await;
    info!(?kind, store = %paths.store_dir().display(), "Conversation ready");

    // ===== Output =====
    let (output_tx, mut output_rx) = mpsc::unbounded_channel::<Printed>();
    let printer = tokio::spawn(async move {
        loop {
            tokio::select! {
                output = output_rx.recv() => match output {
                    Some(Printed::Turn(outcome)) => render::outcome(&outcome, countdown),
                    Some(Printed::Notice(text)) => println!("{}", text.bright_black()),
                    None => break,
                },
                Some(event) = event_rx.recv() => match event {
                    ConversationEvent::TaskExpired { messages, .. } => {
                        println!("{}", "⏰ Time's up!".bright_red());
                        for message in &messages {
                            render::message(message);
                        }
                    }
                },
            }
        }
    });

    println!("{}", "=== !THERAPIST ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands, or 'quit' to exit.".bright_black());
    println!();

    let transcript = controller.messages().await;
    let replay_from = match kind {
        StartKind::Fresh => 0,
        StartKind::Restored => {
            println!("{}", "(restored your previous session)".bright_black());
            transcript.len().saturating_sub(RESTORE_REPLAY)
        }
    };
    for message in &transcript[replay_from..] {
        render::message(message);
    }

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Leaving already? Typical.".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                dispatch(trimmed, &controller, &output_tx, username.as_deref()).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    drop(output_tx);
    printer.abort();
    let _ = printer.await;

    Ok(())
}

/// Routes one input line to the controller.
///
/// Turn-producing actions run on a background task so a slow provider does
/// not block the prompt; their outcome reaches the printer over `output`.
async fn dispatch(
    input: &str,
    controller: &ConversationController,
    output: &mpsc::UnboundedSender<Printed>,
    username: Option<&str>,
) {
    let (command, rest) = match input.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command {
        "/help" => render::help(),
        "/status" => render::status(&controller.status().await),
        "/dismiss" => {
            let text = if controller.dismiss_paywall().await {
                "Paywall dismissed. It'll remember this."
            } else {
                "No paywall to dismiss. Yet."
            };
            let _ = output.send(Printed::Notice(text.to_string()));
        }
        "/reset" => {
            controller.reset(username).await;
            println!("{}", "Session wiped. Fresh start, same you.".bright_black());
            for message in controller.messages().await {
                render::message(&message);
            }
        }
        "/pay" => spawn_turn(controller, output, |c| async move { c.submit_payment().await }),
        "/skip" => spawn_turn(controller, output, |c| async move { c.skip_task().await }),
        "/confess" => {
            if rest.is_empty() {
                let _ = output.send(Printed::Notice("Usage: /confess <text>".to_string()));
                return;
            }
            let text = rest.to_string();
            spawn_turn(controller, output, move |c| async move {
                c.submit_confession(&text).await
            });
        }
        cmd if cmd.starts_with('/') => {
            let _ = output.send(Printed::Notice(format!("Unknown command: {}", cmd)));
        }
        _ => {
            // routed by the mode current when the controller takes the lock
            let text = input.to_string();
            spawn_turn(controller, output, move |c| async move {
                c.submit_user_text(&text).await
            });
        }
    }
}

fn spawn_turn<F, Fut>(
    controller: &ConversationController,
    output: &mpsc::UnboundedSender<Printed>,
    action: F,
) where
    F: FnOnce(ConversationController) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = TurnOutcome> + Send + 'static,
{
    let controller = controller.clone();
    let output = output.clone();
    tokio::spawn(async move {
        let outcome = action(controller).await;
        let _ = output.send(Printed::Turn(outcome));
    });
}
