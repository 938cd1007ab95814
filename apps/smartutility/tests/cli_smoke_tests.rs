//! CLI smoke tests for the smartutility binary
//!
//! Each test gets its own home directory and store file, so the session
//! persisted by one invocation is visible to the next.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let home = dir.path().join("home");
        let config = dir.path().join("config.yaml");
        let yaml = format!(
            r#"
home_dir: "{}"
storage:
  backend: file
  path: "data/store.json"
logging:
  default:
    console_level: "off"
    file: ""
modules:
  utility_accounts:
    payment_delay_ms: 0
    notifications:
      mode: demo
      otp_delay_ms: 0
      alert_delay_ms: 0
      feedback_delay_ms: 0
"#,
            slash(&home)
        );
        std::fs::write(&config, yaml).expect("Failed to write config");
        Self { _dir: dir, config }
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_with_stdin(args, "")
    }

    fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_smartutility"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute smartutility");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(stdin.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait for smartutility")
    }

    fn ok(&self, args: &[&str]) -> String {
        let out = self.run(args);
        assert!(
            out.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).to_string()
    }

    fn register(&self, email: &str) -> String {
        self.ok(&[
            "register",
            "--name",
            "Asha",
            "--email",
            email,
            "--password",
            "pw",
            "--mobile",
            "9000000001",
            "--water-meter",
            "WAT001",
            "--electricity-meter",
            "ELE001",
        ])
    }
}

fn slash(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

fn run_bare(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smartutility"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute smartutility")
}

#[test]
fn test_cli_help_command() {
    let output = run_bare(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for sub in ["register", "login", "pay", "set-limits", "admin", "check"] {
        assert!(stdout.contains(sub), "Should list '{sub}'");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_invalid_command() {
    let output = run_bare(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the error: {stderr}");
}

#[test]
fn test_cli_missing_config_file() {
    let output = run_bare(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "{stderr}");
}

#[test]
fn test_cli_check_and_print_config() {
    let ws = Workspace::new();
    let out = ws.ok(&["check"]);
    assert!(out.contains("Configuration check passed"));

    let out = ws.ok(&["--print-config"]);
    assert!(out.contains("storage:"));
    assert!(out.contains("utility_accounts"));
}

#[test]
fn test_session_persists_between_invocations() {
    let ws = Workspace::new();
    assert!(ws.ok(&["whoami"]).contains("Not logged in"));

    let out = ws.register("asha@x.com");
    assert!(out.contains("Registered and logged in as Asha"));
    assert!(ws.ok(&["whoami"]).contains("asha@x.com"));

    assert!(ws.ok(&["logout"]).contains("Logged out"));
    assert!(ws.ok(&["whoami"]).contains("Not logged in"));

    let bad = ws.run(&["login", "--email", "asha@x.com", "--password", "nope"]);
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("Invalid email or password"));

    let out = ws.ok(&["login", "--email", "asha@x.com", "--password", "pw"]);
    assert!(out.contains("Logged in as Asha"));
}

#[test]
fn test_payment_and_history() {
    let ws = Workspace::new();
    ws.register("asha@x.com");

    let out = ws.ok(&["pay", "--bill-no", "ELE001", "--amount", "1632"]);
    assert!(out.contains("completed: electricity bill ELE001 amount 1632"));

    let history = ws.ok(&["history"]);
    assert!(history.contains("Transactions (1):"));
    assert!(history.contains("Paid electricity bill of 1632"));
    assert!(history.contains("Account Registered"));

    let wrong = ws.run(&["pay", "--bill-no", "ELE999", "--amount", "10"]);
    assert!(!wrong.status.success());
}

#[test]
fn test_limits_meter_and_feedback() {
    let ws = Workspace::new();
    ws.register("asha@x.com");

    let out = ws.ok(&[
        "set-limits",
        "--electricity-meter",
        "ELE001",
        "--electricity-limit",
        "300",
        "--water-meter",
        "WAT001",
        "--no-sms",
    ]);
    assert!(out.contains("Limits saved"));
    assert!(out.contains("Demo alert sent to asha@x.com for electricity limit: 300"));

    let out = ws.ok(&["meter", "--kind", "electricity"]);
    assert!(out.contains("electricity meter ELE001"));
    assert!(out.contains("4,892"));

    let out = ws.ok(&[
        "feedback",
        "--name",
        "Asha",
        "--email",
        "asha@x.com",
        "--services",
        "electricity",
        "--rating",
        "5",
    ]);
    assert!(out.contains("Demo confirmation email sent to asha@x.com"));

    let bad = ws.run(&[
        "feedback",
        "--name",
        "Asha",
        "--email",
        "asha@x.com",
        "--services",
        "water",
        "--rating",
        "9",
    ]);
    assert!(!bad.status.success());
}

#[test]
fn test_otp_verify_rejects_wrong_code() {
    let ws = Workspace::new();
    let out = ws.run_with_stdin(
        &["otp", "--channel", "sms", "--contact", "9000000001", "--verify"],
        "not-a-code\n",
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Demo OTP sent to 9000000001"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("OTP verification failed"));
}

#[test]
fn test_admin_dashboard_requires_admin() {
    let ws = Workspace::new();
    ws.register("asha@x.com");

    let denied = ws.run(&["admin", "overview"]);
    assert!(!denied.status.success());
    assert!(String::from_utf8_lossy(&denied.stderr).contains("Admin access required"));

    ws.ok(&["logout"]);
    ws.ok(&[
        "login",
        "--email",
        "admin@smartutility.com",
        "--password",
        "admin123",
    ]);
    let out = ws.ok(&["admin", "overview"]);
    assert!(out.contains("Total users:      1"));
    assert!(out.contains("Electricity use:  136 kWh"));

    let users = ws.ok(&["admin", "users"]);
    assert!(users.contains("asha@x.com"));
}
