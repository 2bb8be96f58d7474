use std::path::Path;

use clap::Parser;
use fanboard_lib::cli::{execute, Cli, Command};
use fb_core::config::AppConfig;
use serde_json::Value;
use serial_test::serial;
use tempfile::TempDir;

fn config_for(data_dir: &Path, base_url: &str) -> AppConfig {
    let mut config = AppConfig::with_system_defaults(data_dir.to_path_buf());
    config.slot_key = "fanboard.test".to_string();
    config.remote.base_url = base_url.to_string();
    config.remote.max_attempts = 1;
    config.team_sports = vec!["nfl".to_string()];
    config
}

fn apply(intents: &[&str]) -> Command {
    Command::Apply {
        intents: intents.iter().map(|raw| raw.to_string()).collect(),
    }
}

#[tokio::test]
async fn cli_flow_test_apply_persists_and_syncs_completed_step() {
    let mut server = mockito::Server::new_async().await;
    let sports = server
        .mock("POST", "/onboarding/steps/2")
        .match_header("authorization", "Bearer cli-token")
        .with_status(204)
        .create_async()
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path(), &server.url());

    let output = execute(
        &apply(&[
            r#"{"type":"advance"}"#,
            r#"{"type":"toggle_sport","sport_id":"nfl"}"#,
            r#"{"type":"advance"}"#,
        ]),
        &config,
        Some("cli-token".to_string()),
    )
    .await
    .unwrap();

    sports.assert_async().await;
    assert_eq!(output["results"][2]["outcome"]["state"]["currentStep"], 3);
    assert_eq!(output["sync"]["remoteAvailable"], true);
    assert_eq!(output["sync"]["steps"]["sports"]["status"], "succeeded");
    assert!(temp_dir.path().join("fanboard.test.json").exists());

    let state = execute(&Command::State, &config, None).await.unwrap();
    assert_eq!(state["hasPriorSession"], true);
    assert_eq!(state["state"]["selectedSports"][0]["sportId"], "nfl");
    assert_eq!(state["validation"]["status"], "blocked");
    assert_eq!(state["validation"]["reason"]["code"], "no_teams_selected");
}

#[tokio::test]
async fn cli_flow_test_without_remote_sync_stays_idle() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path(), "");

    let output = execute(
        &apply(&[r#"{"type":"advance"}"#, r#"{"type":"toggle_sport","sport_id":"golf"}"#, r#"{"type":"advance"}"#]),
        &config,
        Some("ignored".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(output["sync"]["steps"]["sports"]["status"], "idle");
    assert_eq!(output["sync"]["remoteAvailable"], true);
}

#[tokio::test]
async fn cli_flow_test_rejected_intent_is_reported_and_flow_continues() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path(), "");

    let output = execute(
        &apply(&[
            r#"{"type":"toggle_team","team_id":"patriots","sport_id":"nfl"}"#,
            r#"{"type":"toggle_sport","sport_id":"nfl"}"#,
        ]),
        &config,
        None,
    )
    .await
    .unwrap();

    let results = output["results"].as_array().unwrap();
    assert!(results[0]["error"].as_str().unwrap().contains("not selected"));
    assert_eq!(results[1]["outcome"]["state"]["selectedSports"][0]["rank"], 1);
}

#[tokio::test]
async fn cli_flow_test_invalid_intent_json_fails_before_any_change() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path(), "");

    let err = execute(&apply(&[r#"{"type":"fly"}"#]), &config, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid intent JSON"));
    assert!(!temp_dir.path().join("fanboard.test.json").exists());
}

#[tokio::test]
async fn cli_flow_test_reset_clears_progress() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path(), "");
    execute(&apply(&[r#"{"type":"advance"}"#]), &config, None)
        .await
        .unwrap();

    let output = execute(&Command::Reset, &config, None).await.unwrap();
    assert_eq!(output["reset"], true);

    let state: Value = execute(&Command::State, &config, None).await.unwrap();
    assert_eq!(state["hasPriorSession"], false);
    assert_eq!(state["state"]["currentStep"], 1);
}

#[tokio::test]
async fn cli_flow_test_validate_reports_current_gate() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path(), "");

    let output = execute(&Command::Validate { step: 2 }, &config, None)
        .await
        .unwrap();

    assert_eq!(output["step"], 2);
    assert_eq!(output["validation"]["reason"]["code"], "no_sports_selected");
}

#[test]
#[serial]
fn cli_flow_test_token_is_read_from_environment() {
    std::env::set_var("FANBOARD_ID_TOKEN", "env-token");
    let cli = Cli::try_parse_from(["fanboard", "resync"]).unwrap();
    std::env::remove_var("FANBOARD_ID_TOKEN");

    assert_eq!(cli.id_token.as_deref(), Some("env-token"));
    assert!(matches!(cli.command, Command::Resync));
}
