use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use superclaw_cli::commands::{config, doctor, migrate, seed, usage_reset};

const MEMORY_DB: &[(&str, &str)] = &[
    ("SUPERCLAW_DATABASE_URL", "sqlite::memory:?cache=shared"),
    ("SUPERCLAW_DATABASE_MAX_CONNECTIONS", "1"),
];

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(MEMORY_DB, || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_reports_config_failure_for_bad_database_url() {
    with_env(&[("SUPERCLAW_DATABASE_URL", "postgres://localhost/superclaw")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_creates_the_demo_dataset() {
    with_env(MEMORY_DB, || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("3 agents"), "unexpected message: {message}");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    // A file-backed database so the dataset survives between runs.
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("seed.db").display());

    with_env(&[("SUPERCLAW_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        let message = first_payload["message"].as_str().unwrap_or("");
        assert!(message.contains("created"), "unexpected message: {message}");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let payload = parse_payload(&second.output);
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("already present"), "unexpected message: {message}");
    });
}

#[test]
fn doctor_json_reports_all_checks_passing() {
    with_env(MEMORY_DB, || {
        let output = doctor::run(true);
        let payload = parse_payload(&output);

        assert_eq!(payload["overall_status"], "pass");
        let checks = payload["checks"].as_array().expect("checks array");
        assert_eq!(checks.len(), 3);
        assert!(checks.iter().any(|check| check["name"] == "llm_readiness"));
    });
}

#[test]
fn doctor_fails_when_api_key_is_missing_for_hosted_provider() {
    with_env(
        &[
            ("SUPERCLAW_DATABASE_URL", "sqlite::memory:?cache=shared"),
            ("SUPERCLAW_DATABASE_MAX_CONNECTIONS", "1"),
            ("SUPERCLAW_LLM_PROVIDER", "openai"),
        ],
        || {
            let output = doctor::run(true);
            let payload = parse_payload(&output);

            assert_eq!(payload["overall_status"], "fail");
            let checks = payload["checks"].as_array().expect("checks array");
            let llm = checks
                .iter()
                .find(|check| check["name"] == "llm_readiness")
                .expect("llm_readiness check");
            assert_eq!(llm["status"], "fail");
        },
    );
}

#[test]
fn config_redacts_the_api_key_and_attributes_sources() {
    with_env(
        &[
            ("SUPERCLAW_DATABASE_URL", "sqlite::memory:?cache=shared"),
            ("SUPERCLAW_LLM_API_KEY", "sk-super-secret"),
        ],
        || {
            let output = config::run();

            assert!(!output.contains("sk-super-secret"), "api key leaked into output");
            assert!(output.contains("- llm.api_key = <redacted>"));
            assert!(output.contains("env (SUPERCLAW_DATABASE_URL)"));
            assert!(output.contains("- rate_limit.max_requests = 50 (source: default)"));
        },
    );
}

#[test]
fn usage_reset_reports_the_reset_count() {
    with_env(MEMORY_DB, || {
        let result = usage_reset::run();
        assert_eq!(result.exit_code, 0, "expected usage-reset success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "usage-reset");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("billable users"), "unexpected message: {message}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "SUPERCLAW_DATABASE_URL",
        "SUPERCLAW_DATABASE_MAX_CONNECTIONS",
        "SUPERCLAW_DATABASE_TIMEOUT_SECS",
        "SUPERCLAW_LLM_PROVIDER",
        "SUPERCLAW_LLM_API_KEY",
        "SUPERCLAW_LLM_BASE_URL",
        "SUPERCLAW_LLM_MODEL",
        "SUPERCLAW_LLM_TIMEOUT_SECS",
        "SUPERCLAW_LLM_TEMPERATURE",
        "SUPERCLAW_LLM_MAX_TOKENS",
        "SUPERCLAW_SERVER_BIND_ADDRESS",
        "SUPERCLAW_SERVER_PORT",
        "SUPERCLAW_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "SUPERCLAW_QUOTA_ENFORCE_FREE_TIER",
        "SUPERCLAW_RATE_LIMIT_MAX_REQUESTS",
        "SUPERCLAW_RATE_LIMIT_WINDOW_SECS",
        "SUPERCLAW_LOGGING_LEVEL",
        "SUPERCLAW_LOGGING_FORMAT",
        "SUPERCLAW_LOG_LEVEL",
        "SUPERCLAW_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
