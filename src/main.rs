use anyhow::Context;
use clap::Parser;
use colored::*;
use std::io::Write;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use portalchat::api::HttpAnswerService;
use portalchat::cli::Args;
use portalchat::config::{Config, JsonConfig};
use portalchat::speech::speech_from_commands;
use portalchat::store::{FileStore, KeyValueStore, MemoryStore, RecordStore};
use portalchat::ui::{
    display_error, display_info, display_messages_from, display_portal_header, display_portals,
};
use portalchat::{ControllerOptions, PortalController, SubmitOutcome};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        display_error(&format!("{:#}", e));
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "portalchat=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("PORTAL_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    if args.config_init {
        let path = JsonConfig::init_user_config()?;
        display_info(&format!("Wrote example config to {}", path.display()));
        return Ok(());
    }

    let config = Config::from_env_and_args(&args)?;
    init_logging(config.verbose);

    let service = Arc::new(HttpAnswerService::new(
        &config.api_endpoint,
        config.api_token.as_deref(),
        config.request_timeout.map(Duration::from_secs),
    )?);

    if args.health {
        let status = service.health().await?;
        let label = status.label.as_deref().unwrap_or("answer service");
        if status.ok {
            display_info(&format!("{} at {} is up", label, service.base_url()));
        } else {
            display_error(&format!("{} at {} reports not ok", label, service.base_url()));
        }
        for (key, value) in &status.extra {
            println!("{}", format!("  {}: {}", key, value).dimmed());
        }
        return Ok(());
    }

    let store: Box<dyn KeyValueStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        match &config.store_path {
            Some(path) => Box::new(FileStore::open(path)?),
            None => Box::new(FileStore::open_default()?),
        }
    };

    let speech = speech_from_commands(
        config.speak_command.as_deref(),
        config.listen_command.as_deref(),
    );

    let options = ControllerOptions {
        user_id: config.user_id.clone(),
        mode: config.mode.clone(),
        advance_day: config.advance_day,
        auto_speak: config.speech_enabled,
        ..Default::default()
    };

    let mut controller = PortalController::new(
        config.portals.clone(),
        service,
        RecordStore::new(store),
        speech,
        options,
    );

    if args.clear {
        controller.clear_all()?;
        display_info("All portal progress cleared.");
        return Ok(());
    }

    if let Some(id) = &args.reset {
        controller.reset_portal(id)?;
        display_info(&format!("Progress for '{}' cleared.", id));
        return Ok(());
    }

    if args.list {
        list_portals(&controller);
        return Ok(());
    }

    let portal_id = args
        .portal
        .clone()
        .or_else(|| controller.active_portal().map(|p| p.id.clone()))
        .or_else(|| controller.portals().first().map(|p| p.id.clone()))
        .context("No portals configured")?;

    open_portal(&mut controller, &portal_id).await?;

    if let Some(notes) = &args.notes {
        controller.set_notes(notes)?;
        display_info("Notes saved.");
    }

    if args.listen {
        listen(&mut controller).await?;
        return Ok(());
    }

    if !args.question.is_empty() {
        ask(&mut controller, &args.question.join(" ")).await?;
        return Ok(());
    }

    if args.notes.is_some() {
        return Ok(());
    }

    prompt_loop(&mut controller).await
}

fn list_portals(controller: &PortalController) {
    let active = controller.active_portal().map(|p| p.id.as_str());
    display_portals(
        controller
            .portals()
            .iter()
            .map(|p| (p, controller.record(&p.id))),
        active,
    );
}

async fn open_portal(controller: &mut PortalController, id: &str) -> anyhow::Result<()> {
    controller.select_portal(id).await?;
    if let Some(portal) = controller.active_portal() {
        display_portal_header(portal, controller.record(&portal.id).as_ref());
    }
    display_messages_from(controller.transcript(), 0);
    Ok(())
}

async fn ask(controller: &mut PortalController, text: &str) -> anyhow::Result<SubmitOutcome> {
    let shown = controller.transcript().len();
    let outcome = controller.submit(text).await?;
    display_messages_from(controller.transcript(), shown);
    Ok(outcome)
}

async fn listen(controller: &mut PortalController) -> anyhow::Result<()> {
    if !controller.speech_caps().input {
        display_error("Speech input is not configured (speech.listen_command).");
        return Ok(());
    }
    println!("{}", "Listening...".dimmed());
    let shown = controller.transcript().len();
    if controller.listen_and_submit().await? == SubmitOutcome::Ignored {
        display_error("Nothing was heard.");
    }
    display_messages_from(controller.transcript(), shown);
    Ok(())
}

async fn prompt_loop(controller: &mut PortalController) -> anyhow::Result<()> {
    println!(
        "{}",
        "Type a question, /portals, /portal <id>, /notes <text>, /listen, /reset or /quit".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "›".cyan());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if let Some(command) = line.strip_prefix('/') {
            let (name, rest) = command
                .split_once(char::is_whitespace)
                .map(|(n, r)| (n, r.trim()))
                .unwrap_or((command, ""));

            let result = match name {
                "quit" | "exit" => break,
                "portals" => {
                    list_portals(controller);
                    Ok(())
                }
                "portal" if !rest.is_empty() => open_portal(controller, rest).await,
                "notes" => controller
                    .set_notes(rest)
                    .map(|_| display_info("Notes saved."))
                    .map_err(Into::into),
                "listen" => listen(controller).await,
                "reset" => match controller.active_portal().map(|p| p.id.clone()) {
                    Some(id) => controller
                        .reset_portal(&id)
                        .map(|_| display_info(&format!("Progress for '{}' cleared.", id)))
                        .map_err(Into::into),
                    None => Ok(()),
                },
                _ => {
                    display_error(&format!("Unknown command: /{}", command));
                    Ok(())
                }
            };

            if let Err(e) = result {
                display_error(&format!("{:#}", e));
            }
            continue;
        }

        if let Err(e) = ask(controller, line).await {
            display_error(&format!("{:#}", e));
        }
    }

    Ok(())
}
