use std::io::{BufRead, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use venba_lib::api;
use venba_lib::services::text_processor::preview;
use venba_lib::SessionOutcome;

#[derive(Parser)]
#[command(
    name = "venba",
    about = "Rewrite text to read more naturally, with an offline fallback",
    version
)]
struct Cli {
    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Humanize one piece of text
    Humanize {
        /// Text to rewrite (reads --file or stdin if omitted)
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(short, long, default_value = "standard")]
        mode: String,
        #[arg(short, long, default_value = "en")]
        language: String,
        /// Provider name, optionally `name:model`
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Humanize each stdin line in turn, tracking usage
    Session {
        #[arg(short, long, default_value = "standard")]
        mode: String,
        #[arg(short, long, default_value = "en")]
        language: String,
        #[arg(long)]
        provider: Option<String>,
    },
    /// List humanization modes
    Modes {
        #[arg(long)]
        json: bool,
    },
    /// List known chat providers
    Providers,
    /// List supported output languages
    Languages {
        #[arg(long)]
        json: bool,
    },
    /// Check whether the chat provider answers
    Health {
        #[arg(long)]
        provider: Option<String>,
    },
    /// Count words the way the word limit does
    Count { text: Option<String> },
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the config with API keys masked
    Show,
    SetKey { provider: String, key: String },
    DeleteKey { provider: String },
    SetUrl { provider: String, url: String },
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;
    Ok(input)
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

#[tokio::main]
async fn main() -> Result<()> {
    venba_lib::init_logging();

    let result = run(Cli::parse()).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "command.failed");
    }
    venba_lib::flush_logs();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let store = api::open_store(cli.config_dir)?;

    match cli.command {
        Command::Humanize {
            text,
            file,
            mode,
            language,
            provider,
            json,
        } => {
            let input = read_input(text, file)?;
            let config = api::get_config(&store)?;
            let session = api::build_session(&config, provider.as_deref())?;
            let ledger = api::new_ledger(&config);

            match api::humanize(&session, ledger, &input, &mode, &language).await? {
                SessionOutcome::Completed {
                    result,
                    detection,
                    ledger,
                    backend_connected,
                } => {
                    if json {
                        let out = serde_json::json!({
                            "result": result,
                            "detection": detection,
                            "usage": ledger,
                            "backendConnected": backend_connected,
                        });
                        println!("{}", serde_json::to_string_pretty(&out)?);
                    } else {
                        println!("{}", result.humanized_text);
                        eprintln!(
                            "[{}] mode={} language={} words={} time={:.2}s confidence={:.1} (synthetic)",
                            match result.source {
                                venba_lib::RewriteSource::Remote => "remote",
                                venba_lib::RewriteSource::RuleBased => "rule-based",
                            },
                            result.mode,
                            result.language,
                            result.word_count,
                            result.processing_time_seconds,
                            result.confidence_score,
                        );
                        eprintln!(
                            "simulated detection: {:.1}% AI by {} (not a real detector)",
                            detection.score, detection.detector
                        );
                        if !backend_connected {
                            eprintln!("backend unreachable, used offline rewriting");
                        }
                    }
                }
                SessionOutcome::Superseded { .. } => {
                    eprintln!("request superseded");
                }
            }
        }
        Command::Session {
            mode,
            language,
            provider,
        } => {
            let config = api::get_config(&store)?;
            let session = api::build_session(&config, provider.as_deref())?;
            let mut ledger = api::new_ledger(&config);

            for line in std::io::stdin().lock().lines() {
                let line = line.context("reading stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                match api::humanize(&session, ledger, &line, &mode, &language).await {
                    Ok(outcome) => {
                        ledger = outcome.ledger();
                        if let SessionOutcome::Completed { result, .. } = outcome {
                            println!("{}", result.humanized_text);
                        }
                        eprintln!(
                            "usage: today={} month={} remaining={} ({:.1}% used)",
                            ledger.words_today,
                            ledger.words_month,
                            ledger.remaining_words(),
                            ledger.percentage_used()
                        );
                    }
                    Err(e) => eprintln!("skipped {:?}: {}", preview(&line, 40), e),
                }
            }
        }
        Command::Modes { json } => {
            let modes = api::list_modes();
            if json {
                println!("{}", serde_json::to_string_pretty(&modes)?);
            } else {
                for m in modes {
                    println!("{:<10} {:<16} {}", m.id, m.name, m.description);
                }
            }
        }
        Command::Providers => {
            for name in api::get_providers() {
                println!("{}", name);
            }
        }
        Command::Languages { json } => {
            let languages = api::list_languages();
            if json {
                println!("{}", serde_json::to_string_pretty(languages)?);
            } else {
                for l in languages {
                    println!("{:<4} {} {}", l.code, l.flag, l.name);
                }
            }
        }
        Command::Health { provider } => {
            let config = api::get_config(&store)?;
            let session = api::build_session(&config, provider.as_deref())?;
            let healthy = api::check_health(&session).await;
            println!("{}", if healthy { "connected" } else { "unreachable" });
            if !healthy {
                bail!("chat provider did not answer the health check");
            }
        }
        Command::Count { text } => {
            let input = read_input(text, None)?;
            println!("{}", api::count_words(&input));
        }
        Command::Config(cmd) => match cmd {
            ConfigCommand::Show => {
                let mut config = api::get_config(&store)?;
                for key in config.api_keys.values_mut() {
                    *key = mask_key(key);
                }
                println!("{}", serde_json::to_string_pretty(&config)?);
                eprintln!("config file: {}", store.config_file().display());
            }
            ConfigCommand::SetKey { provider, key } => {
                api::store_api_key(&store, &provider, &key)?;
            }
            ConfigCommand::DeleteKey { provider } => {
                api::delete_api_key(&store, &provider)?;
            }
            ConfigCommand::SetUrl { provider, url } => {
                api::set_provider_url(&store, &provider, &url)?;
            }
        },
    }

    Ok(())
}
