use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn run_cmd(db_path: &Path, args: &[&str]) -> String {
    let output = cargo_bin_cmd!("rapport")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(db_path: &Path, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("rapport")
        .args(["--db-path", db_path.to_str().expect("db path"), "--json"])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

#[test]
fn cli_seed_run_and_lane_flow() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("rapport.sqlite3");

    let user = run_cmd_json(&db_path, &["users", "add", "--name", "Ada"]);
    let user_id = user["id"].as_str().expect("id").to_string();
    run_cmd(&db_path, &["users", "seen", &user_id]);

    run_cmd(
        &db_path,
        &[
            "relationships",
            "add",
            "--user",
            &user_id,
            "--name",
            "Grace Hopper",
            "--cadence",
            "biweekly",
            "--tier",
            "a",
            "--last-interaction-at",
            "2020-01-01",
        ],
    );

    let list = run_cmd_json(&db_path, &["relationships", "list", "--user", &user_id]);
    let items = list.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["display_name"], "Grace Hopper");
    assert_eq!(items[0]["status"], "due");

    let report = run_cmd_json(&db_path, &["run", "nurture"]);
    assert_eq!(report["success"], true);
    assert_eq!(report["created"], 1);

    let actions = run_cmd_json(&db_path, &["actions", "list", "--user", &user_id]);
    let actions = actions.as_array().expect("array");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["action_type"], "nurture");
    assert_eq!(actions[0]["state"], "new");
    assert!(actions[0]["next_move_score"].is_number());

    // A second run on the same day must not stack a duplicate.
    let again = run_cmd_json(&db_path, &["run", "nurture"]);
    assert_eq!(again["created"], 0);
}

#[test]
fn cli_action_state_transitions() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("rapport.sqlite3");

    let user = run_cmd_json(&db_path, &["users", "add", "--name", "Ada"]);
    let user_id = user["id"].as_str().expect("id").to_string();
    run_cmd(&db_path, &["users", "seen", &user_id]);
    run_cmd(
        &db_path,
        &[
            "relationships",
            "add",
            "--user",
            &user_id,
            "--name",
            "Grace",
            "--last-interaction-at",
            "2020-01-01",
        ],
    );
    run_cmd(&db_path, &["run", "nurture"]);

    let actions = run_cmd_json(&db_path, &["actions", "list", "--user", &user_id]);
    let id = actions.as_array().expect("array")[0]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let sent = run_cmd_json(&db_path, &["actions", "move", &id, "sent"]);
    assert_eq!(sent["state"], "sent");
    let replied = run_cmd_json(&db_path, &["actions", "move", &id, "replied"]);
    assert_eq!(replied["state"], "replied");

    // Replied is terminal.
    let output = cargo_bin_cmd!("rapport")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(["actions", "move", &id, "new"])
        .output()
        .expect("run command");
    assert!(!output.status.success());
}

#[test]
fn cli_touch_reschedules() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("rapport.sqlite3");

    let user = run_cmd_json(&db_path, &["users", "add", "--name", "Ada"]);
    let user_id = user["id"].as_str().expect("id").to_string();
    run_cmd(
        &db_path,
        &[
            "relationships",
            "add",
            "--user",
            &user_id,
            "--name",
            "Grace",
            "--last-interaction-at",
            "2020-01-01",
        ],
    );

    let list = run_cmd_json(&db_path, &["relationships", "list", "--user", &user_id]);
    let id = list.as_array().expect("array")[0]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let touched = run_cmd_json(&db_path, &["touch", &id]);
    assert!(touched["next_touch_due_at"].is_number());
    assert!(touched["last_interaction_at"].is_number());

    let after = run_cmd_json(&db_path, &["relationships", "list", "--user", &user_id]);
    assert_eq!(after.as_array().expect("array")[0]["status"], "on_track");
}

#[test]
fn cli_rejects_malformed_id_with_input_exit_code() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("rapport.sqlite3");

    let output = cargo_bin_cmd!("rapport")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(["touch", "not-a-uuid"])
        .output()
        .expect("run command");
    assert!(!output.status.success());
}

#[test]
fn cli_reply_rate_set_and_clear() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("rapport.sqlite3");

    let user = run_cmd_json(&db_path, &["users", "add", "--name", "Ada"]);
    let user_id = user["id"].as_str().expect("id").to_string();
    run_cmd(
        &db_path,
        &["relationships", "add", "--user", &user_id, "--name", "Grace"],
    );

    let list = run_cmd_json(&db_path, &["relationships", "list", "--user", &user_id]);
    let id = list.as_array().expect("array")[0]["id"]
        .as_str()
        .expect("id")
        .to_string();

    run_cmd(&db_path, &["relationships", "rate", &id, "--rate", "0.6"]);
    let rated = run_cmd_json(&db_path, &["relationships", "list", "--user", &user_id]);
    assert_eq!(rated.as_array().expect("array")[0]["reply_rate"], 0.6);

    run_cmd(&db_path, &["relationships", "rate", &id, "--clear"]);
    let cleared = run_cmd_json(&db_path, &["relationships", "list", "--user", &user_id]);
    assert!(cleared.as_array().expect("array")[0]["reply_rate"].is_null());

    // Out-of-range rates are invalid input.
    let output = cargo_bin_cmd!("rapport")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(["relationships", "rate", &id, "--rate", "1.5"])
        .output()
        .expect("run command");
    assert!(!output.status.success());
}
