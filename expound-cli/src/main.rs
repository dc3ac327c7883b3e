use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use client::{
    ExplainSession, HttpBackend, JsonFileStore, KvStore, RenderedExplanation, SubmitOutcome,
    format_relative, model_display_name,
};
use colored::Colorize;

mod args;
mod logger;
mod term;

use args::{Args, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(&args);

    let store = JsonFileStore::open(state_path(&args)?);

    let backend = HttpBackend::new(args.endpoint.clone())?;
    let renderer = term::TermRenderer::from_store(&store);

    let mut session = ExplainSession::new(
        Box::new(backend),
        Box::new(renderer),
        Box::new(term::TermNotifier),
        store,
    );

    match args.command {
        Command::Explain { text, level, copy } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };

            finish(session.submit(&text, level).await, copy)
        }
        Command::Retry => finish(session.retry().await, false),
        Command::History => {
            list_history(&session);
            Ok(())
        }
        Command::Restore { index, copy } => {
            let Some(restored) = session.restore_from_history(index) else {
                eprintln!("{}", format!("No history entry at index {index}").yellow());
                std::process::exit(1);
            };

            println!("{}", restored.explanation.rendered);
            print_meta(&restored.explanation);

            if copy {
                copy_markdown(&restored.explanation.markdown);
            }

            Ok(())
        }
        Command::ClearHistory { yes } => {
            let cleared = session.clear_history(|| yes || term::confirm("Clear all recent explanations?"));

            if !cleared {
                eprintln!("History left untouched");
            }

            Ok(())
        }
        Command::Theme { value } => match value {
            Some(value) => set_theme(&mut session, &value),
            None => {
                println!("{}", session.theme().unwrap_or_else(|| "dark".to_string()));
                Ok(())
            }
        },
    }
}

fn finish(outcome: SubmitOutcome, copy: bool) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Completed(explanation) => {
            println!("{}", explanation.rendered);
            print_meta(&explanation);

            if copy {
                copy_markdown(&explanation.markdown);
            }

            Ok(())
        }
        SubmitOutcome::Busy | SubmitOutcome::Rejected | SubmitOutcome::Failed => {
            // The notifier already told the user what went wrong.
            std::process::exit(1);
        }
    }
}

fn print_meta(explanation: &RenderedExplanation) {
    println!(
        "{}",
        format!(
            "{} · {}s",
            model_display_name(&explanation.model),
            explanation.duration
        )
        .dimmed()
    );
}

fn copy_markdown(markdown: &str) {
    match term::copy_to_clipboard(markdown) {
        Ok(()) => eprintln!("Explanation copied to clipboard"),
        Err(e) => {
            log::debug!("Clipboard copy failed: {e}");
            eprintln!("{}", "Failed to copy. Please try manually.".yellow());
        }
    }
}

fn list_history<S: KvStore>(session: &ExplainSession<S>) {
    if session.history().is_empty() {
        println!("No explanations yet");
        return;
    }

    let now = jiff::Timestamp::now();

    for (index, entry) in session.history().iter().enumerate() {
        let ellipsis = if entry.input_truncated() { "..." } else { "" };

        println!("{index:>2}  {}{ellipsis}", entry.input.replace('\n', " "));
        println!(
            "    {}",
            format!(
                "{} · {} · {}",
                format_relative(entry.timestamp, now),
                model_display_name(&entry.model),
                entry.level
            )
            .dimmed()
        );
    }
}

fn set_theme<S: KvStore>(session: &mut ExplainSession<S>, value: &str) -> anyhow::Result<()> {
    match value {
        "dark" | "light" => {
            session.set_theme(value);
            Ok(())
        }
        other => Err(anyhow!("unknown theme '{other}', expected 'dark' or 'light'")),
    }
}

fn read_stdin() -> anyhow::Result<String> {
    use std::io::Read;

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;

    Ok(buffer)
}

fn state_path(args: &Args) -> anyhow::Result<PathBuf> {
    if let Some(path) = &args.state_path {
        return Ok(path.clone());
    }

    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow!("Could not determine the user data directory"))?;

    Ok(data_dir.join("expound").join("client.json"))
}
