//! Headless CLI over the onboarding controller.
//!
//! Every command prints one JSON document on stdout; logs go to stderr and
//! the log file.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fb_app::{GetOnboardingState, OnboardingController, ResetOnboarding};
use fb_core::config::AppConfig;
use fb_core::onboarding::{OnboardingIntent, OnboardingStep};
use serde_json::{json, Value};
use tracing::{info_span, warn, Instrument};

use crate::bootstrap::{self, wiring};

/// Fanboard onboarding CLI
#[derive(Debug, Parser)]
#[command(name = "fanboard")]
#[command(about = "Replay onboarding intents against the local onboarding state", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FANBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the data directory holding the storage slot and logs
    #[arg(long, env = "FANBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Identity token for the remote onboarding service
    #[arg(long, env = "FANBOARD_ID_TOKEN", hide_env_values = true)]
    pub id_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the persisted onboarding state
    State,

    /// Apply intents in order, e.g. '{"type":"toggle_sport","sport_id":"nfl"}'
    Apply {
        #[arg(required = true)]
        intents: Vec<String>,
    },

    /// Check whether forward navigation out of a step is allowed
    Validate {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        step: u8,
    },

    /// Re-send every completed step to the remote service
    Resync,

    /// Clear the persisted state to start onboarding over
    Reset,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = bootstrap::resolve_config(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    if let Err(err) = bootstrap::init_tracing_subscriber(&config.data_dir) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let output = execute(&cli.command, &config, cli.id_token.clone()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Runs one command and returns the JSON document to print.
pub async fn execute(
    command: &Command,
    config: &AppConfig,
    id_token: Option<String>,
) -> anyhow::Result<Value> {
    match command {
        Command::State => {
            let snapshot = GetOnboardingState::from_ports(
                wiring::build_storage_slot(config),
                wiring::build_catalog(config),
            )
            .execute()
            .await;
            Ok(serde_json::to_value(snapshot)?)
        }
        Command::Apply { intents } => {
            let intents = intents
                .iter()
                .map(|raw| {
                    serde_json::from_str::<OnboardingIntent>(raw)
                        .with_context(|| format!("Invalid intent JSON: {raw}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let controller = start_controller(config, id_token).await?;
            let mut results = Vec::with_capacity(intents.len());
            for intent in intents {
                let name = intent.name();
                let result = match controller.apply_intent(intent).await {
                    Ok(outcome) => {
                        json!({ "intent": name, "outcome": serde_json::to_value(outcome)? })
                    }
                    Err(err) => {
                        warn!(intent = name, error = %err, "intent rejected");
                        json!({ "intent": name, "error": err.to_string() })
                    }
                };
                results.push(result);
            }

            controller.shutdown().await;
            Ok(json!({
                "results": results,
                "sync": sync_summary(&controller).await,
            }))
        }
        Command::Validate { step } => {
            let step = OnboardingStep::from_number(*step)
                .with_context(|| format!("Unknown onboarding step: {step}"))?;
            let controller = start_controller(config, id_token).await?;
            let validation = controller.validation(step);
            controller.shutdown().await;
            Ok(json!({ "step": step, "validation": validation }))
        }
        Command::Resync => {
            let controller = start_controller(config, id_token).await?;
            let started = controller.resync().await;
            controller.shutdown().await;
            Ok(json!({
                "started": started,
                "sync": sync_summary(&controller).await,
            }))
        }
        Command::Reset => {
            ResetOnboarding::from_ports(wiring::build_storage_slot(config))
                .execute()
                .await?;
            Ok(json!({ "reset": true }))
        }
    }
}

async fn start_controller(
    config: &AppConfig,
    id_token: Option<String>,
) -> anyhow::Result<OnboardingController> {
    let deps = bootstrap::wire_onboarding(config, id_token)?;
    let span = info_span!("cli.start_controller", data_dir = %config.data_dir.display());
    Ok(OnboardingController::start(deps).instrument(span).await)
}

async fn sync_summary(controller: &OnboardingController) -> Value {
    let mut steps = serde_json::Map::new();
    for step in OnboardingStep::ALL {
        let status = controller.sync_status(step).await;
        steps.insert(
            step.name().to_string(),
            serde_json::to_value(status).unwrap_or(Value::Null),
        );
    }
    json!({
        "remoteAvailable": controller.remote_available(),
        "persistenceDegraded": controller.persistence_degraded(),
        "steps": steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_apply_with_multiple_intents() {
        let cli = Cli::try_parse_from([
            "fanboard",
            "--data-dir",
            "/tmp/fb",
            "apply",
            r#"{"type":"advance"}"#,
            r#"{"type":"toggle_sport","sport_id":"nfl"}"#,
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/fb")));
        match cli.command {
            Command::Apply { intents } => assert_eq!(intents.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_out_of_range_step() {
        assert!(Cli::try_parse_from(["fanboard", "validate", "6"]).is_err());
        assert!(Cli::try_parse_from(["fanboard", "validate", "4"]).is_ok());
    }

    #[test]
    fn test_cli_requires_at_least_one_intent() {
        assert!(Cli::try_parse_from(["fanboard", "apply"]).is_err());
    }
}
