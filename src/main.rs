//! Chat Widget terminal front end
//!
//! Drives the widget from stdin: plain lines are sent as messages, slash
//! commands manage attachments and history. The transcript goes to stdout,
//! logs go to stderr.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_widget::{
    ChatWidget, HttpTransport, SubmitReport, WidgetConfig, attachments::PendingAttachment,
    config::Cli,
};
use commands::{Command, HELP};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = match WidgetConfig::from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        name: "widget.config.loaded",
        base_url = %config.server.base_url,
        send_path = %config.server.send_path,
        timeout_secs = config.server.timeout_secs,
        "Widget configuration loaded"
    );

    let transport = Arc::new(HttpTransport::new(&config).context("building HTTP client")?);
    let mut widget = ChatWidget::new(&config, transport);
    let mut printed = 0;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Attach(paths) => match load_files(&paths).await {
                Ok(files) => {
                    widget.select_files(files);
                    print_files(&widget);
                }
                Err(e) => eprintln!("{e:#}"),
            },
            Command::Remove(index) => {
                if widget.remove_file(index) {
                    print_files(&widget);
                }
            }
            Command::Files => print_files(&widget),
            Command::ClearHistory => {
                if widget.clear_history().await {
                    printed = 0;
                    println!("History cleared.");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Invalid(reason) => eprintln!("{reason}"),
            Command::Message(text) => {
                widget.set_text(text);
                if widget.submit().await == SubmitReport::Skipped {
                    continue;
                }
            }
        }

        let messages = widget.transcript().messages();
        for message in messages.iter().skip(printed) {
            print!("{message}");
        }
        printed = messages.len();
    }

    Ok(())
}

/// Read every path; the selection only changes if all of them load.
async fn load_files(paths: &[String]) -> anyhow::Result<Vec<PendingAttachment>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = PendingAttachment::from_path(path)
            .await
            .with_context(|| format!("cannot attach {path}"))?;
        files.push(file);
    }
    Ok(files)
}

fn print_files(widget: &ChatWidget) {
    let previews = widget.attachments().previews();
    if previews.is_empty() {
        println!("No files attached.");
        return;
    }
    for preview in previews {
        println!(
            "  {}. [{}] {} ({})",
            preview.index + 1,
            preview.icon.label(),
            preview.name,
            preview.size
        );
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(true).with_writer(std::io::stderr)))
        .init();
}
