use std::io::{self, Write};

use aura_core::config::EngineCfg;
use aura_core::engine::{Engine, Interaction};
use aura_core::lexicon::Lexicon;
use aura_core::persona::Persona;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }

    // AURA_LEXICON points at a JSON lexicon file; otherwise the built-in
    // bilingual table is used. A broken file falls back with a notice.
    let mut startup_notice: Option<String> = None;
    let lexicon = match std::env::var("AURA_LEXICON") {
        Ok(path) => match load_lexicon(&path) {
            Ok(lexicon) => {
                tracing::info!(path = %path, "lexicon loaded");
                lexicon
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "lexicon load failed, using built-in");
                startup_notice =
                    Some(format!("could not load lexicon from {path}: {e}; using built-in"));
                Lexicon::default()
            }
        },
        Err(_) => Lexicon::default(),
    };

    let engine = Engine::new(EngineCfg::default(), lexicon);

    let token = CancellationToken::new();
    spawn_sigint_canceler(token.clone());

    run_repl(engine, token, startup_notice).await
}

fn load_lexicon(path: &str) -> anyhow::Result<Lexicon> {
    let json = std::fs::read_to_string(path)?;
    Ok(Lexicon::from_json(&json)?)
}

async fn run_repl(
    engine: Engine,
    token: CancellationToken,
    startup_notice: Option<String>,
) -> anyhow::Result<()> {
    if let Some(notice) = startup_notice {
        println!("{notice}");
    }

    let personas = engine.personas();
    let mut active: Uuid = personas[0].id;
    println!("aura, emotional-state engine");
    println!("talking to: {}", persona_line(&personas[0]));
    println!("commands: /personas  /use <n>  /mood  /summary  /q");

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<InputEvent>();
    let (ready_tx, ready_rx) = std::sync::mpsc::channel::<()>();
    spawn_input_thread(line_tx, ready_rx);
    request_next_prompt(&ready_tx);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                break;
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    break;
                };
                match line {
                    InputEvent::Line(line) => {
                        let text = line.trim();
                        if text.is_empty() {
                            request_next_prompt(&ready_tx);
                            continue;
                        }
                        if matches!(text, "/q" | "/exit" | "/quit") {
                            break;
                        }
                        handle_line(&engine, &mut active, text)?;
                        request_next_prompt(&ready_tx);
                    }
                    InputEvent::Interrupted => {
                        token.cancel();
                        break;
                    }
                    InputEvent::Eof => break,
                    InputEvent::Error(err) => {
                        eprintln!("input error: {err}");
                        break;
                    }
                }
            }
        }
    }
    drop(ready_tx);

    println!();
    Ok(())
}

fn handle_line(engine: &Engine, active: &mut Uuid, text: &str) -> anyhow::Result<()> {
    if let Some(rest) = text.strip_prefix("/use ") {
        let personas = engine.personas();
        match rest.trim().parse::<usize>().ok().and_then(|n| personas.get(n)) {
            Some(persona) => {
                *active = persona.id;
                println!("talking to: {}", persona_line(persona));
            }
            None => println!("no persona #{rest}, see /personas"),
        }
        return Ok(());
    }

    match text {
        "/personas" => {
            for (i, persona) in engine.personas().iter().enumerate() {
                let marker = if persona.id == *active { "*" } else { " " };
                println!("{marker} [{i}] {}", persona_line(persona));
            }
        }
        "/mood" => match engine.mood(*active) {
            Some(mood) => println!(
                "mood {} · stability {:.2} · {} entries",
                mood.current_mood.as_str(),
                mood.stability,
                mood.history_len
            ),
            None => println!("no mood tracked for the active persona"),
        },
        "/summary" => {
            let summary = engine.summary();
            println!(
                "scorer {} · {} personas ({} active)",
                summary.scorer, summary.personas, summary.active_personas
            );
        }
        _ => match engine.process(*active, text) {
            Ok(outcome) => print_outcome(&outcome)?,
            Err(e) => println!("{e}"),
        },
    }
    Ok(())
}

fn print_outcome(outcome: &Interaction) -> anyhow::Result<()> {
    print!(
        "{} {:.2}",
        outcome.analysis.dominant.as_str(),
        outcome.analysis.confidence
    );
    // Secondary signals, if any
    let rest: Vec<String> = outcome
        .analysis
        .scores
        .entries()
        .filter(|&(e, v)| e != outcome.analysis.dominant && v > 0.0)
        .map(|(e, v)| format!("{} {:.2}", e.as_str(), v))
        .collect();
    if !rest.is_empty() {
        print!(" ({})", rest.join(", "));
    }
    println!(
        " · mood {} · stability {:.2}",
        outcome.mood.current_mood.as_str(),
        outcome.mood.stability
    );
    io::stdout().flush()?;
    Ok(())
}

fn persona_line(persona: &Persona) -> String {
    format!("{} ({})", persona.name, persona.description)
}

fn request_next_prompt(ready_tx: &std::sync::mpsc::Sender<()>) {
    let _ = ready_tx.send(());
}

fn spawn_input_thread(
    line_tx: mpsc::UnboundedSender<InputEvent>,
    ready_rx: std::sync::mpsc::Receiver<()>,
) {
    std::thread::spawn(move || {
        let mut editor = match rustyline::DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = line_tx.send(InputEvent::Error(e.to_string()));
                return;
            }
        };

        while ready_rx.recv().is_ok() {
            match editor.readline("You> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if line_tx.send(InputEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    let _ = line_tx.send(InputEvent::Interrupted);
                    break;
                }
                Err(ReadlineError::Eof) => {
                    let _ = line_tx.send(InputEvent::Eof);
                    break;
                }
                Err(e) => {
                    let _ = line_tx.send(InputEvent::Error(e.to_string()));
                    break;
                }
            }
        }
    });
}

enum InputEvent {
    Line(String),
    Interrupted,
    Eof,
    Error(String),
}

fn spawn_sigint_canceler(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            if let Ok(mut sigint) =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
            {
                let _ = sigint.recv().await;
                token.cancel();
            }
        }
        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });
}
