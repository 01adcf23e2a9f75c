use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn taskboard(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskboard").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("TASKBOARD_FILE")
        .env_remove("TASKBOARD_DEBUG_LOG");
    cmd
}

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_str(&String::from_utf8_lossy(output)).expect("Failed to parse JSON output")
}

fn write_board(dir: &TempDir) -> String {
    let file = dir.path().join("board.json");
    let board = json!({
        "tasks": [
            {"id": "B", "name": "Fix login", "status": "TO_DO", "position": 1, "creatorId": "alice",
             "assignedUserId": "alice"},
            {"id": "A", "name": "Write docs", "status": "TO_DO", "position": 0, "creatorId": "alice"},
            {"id": "C", "name": "Ship release", "status": "IN_PROGRESS", "position": 0,
             "creatorId": "bob", "isPublic": true}
        ]
    });
    fs::write(&file, serde_json::to_vec_pretty(&board).unwrap()).unwrap();
    file.to_str().unwrap().to_string()
}

fn write_script(dir: &TempDir, events: Value) -> String {
    let file = dir.path().join("script.json");
    fs::write(&file, serde_json::to_vec(&events).unwrap()).unwrap();
    file.to_str().unwrap().to_string()
}

fn lane_ids(json: &Value, lane: usize) -> Vec<String> {
    json["data"]["lanes"][lane]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

fn drag_a_to_done() -> Value {
    json!([
        {"event": "down", "source": {"type": "task", "id": "A"}, "at": {"x": 10, "y": 10}},
        {"event": "move", "at": {"x": 10, "y": 40}, "over": {"type": "column", "id": "col-3", "index": -1}},
        {"event": "up"}
    ])
}

mod show_tests {
    use super::*;

    #[test]
    fn test_show_orders_by_position() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);

        let output = taskboard(dir.path())
            .args(["--file", &file, "show"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["data"]["task_count"], 3);
        assert_eq!(json["data"]["lanes"].as_array().unwrap().len(), 4);
        assert_eq!(json["data"]["lanes"][0]["column"]["title"], "Open");
        assert_eq!(lane_ids(&json, 0), vec!["A", "B"]);
        assert_eq!(lane_ids(&json, 1), vec!["C"]);
    }

    #[test]
    fn test_show_public_scope() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);

        let output = taskboard(dir.path())
            .args(["--file", &file, "show", "--scope", "public"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["data"]["task_count"], 1);
        assert!(lane_ids(&json, 0).is_empty());
        assert_eq!(lane_ids(&json, 1), vec!["C"]);
    }

    #[test]
    fn test_show_private_scope_and_search() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);

        let output = taskboard(dir.path())
            .args([
                "--file", &file, "show", "--scope", "private", "--user", "alice", "--search",
                "LOGIN",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["data"]["task_count"], 1);
        assert_eq!(lane_ids(&json, 0), vec!["B"]);
    }

    #[test]
    fn test_show_reads_file_from_env() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);

        taskboard(dir.path())
            .env("TASKBOARD_FILE", &file)
            .arg("show")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"task_count\":3"));
    }

    #[test]
    fn test_show_missing_file_is_empty_board() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("new.json");

        let output = taskboard(dir.path())
            .args(["--file", file.to_str().unwrap(), "show"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["data"]["task_count"], 0);
        assert_eq!(json["data"]["lanes"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_show_invalid_file_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{ not json").unwrap();

        taskboard(dir.path())
            .args(["--file", file.to_str().unwrap(), "show"])
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("\"success\":false"));
    }

    #[test]
    fn test_show_requires_file() {
        let dir = tempdir().unwrap();
        taskboard(dir.path())
            .arg("show")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--file is required"));
    }
}

mod replay_tests {
    use super::*;

    #[test]
    fn test_replay_moves_task_into_empty_column() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);
        let script = write_script(&dir, drag_a_to_done());

        let output = taskboard(dir.path())
            .args(["--file", &file, "replay", "--script", &script])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        let commands = json["data"]["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0]["taskId"], "A");
        assert_eq!(commands[0]["startStatus"], "TO_DO");
        assert_eq!(commands[0]["startPosition"], 0);
        assert_eq!(commands[0]["overStatus"], "DONE");
        assert_eq!(commands[0]["overPosition"], 0);

        assert_eq!(json["data"]["reports"][0]["applied"], true);
        assert_eq!(json["data"]["notifications"][0]["kind"], "success");

        let board = &json["data"]["board"];
        let todo: Vec<&str> = board["lanes"][0]["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        assert_eq!(todo, vec!["B"]);
        assert_eq!(board["lanes"][0]["tasks"][0]["position"], 0);
        assert_eq!(board["lanes"][2]["tasks"][0]["id"], "A");

        // Without --write the file is untouched.
        let saved: Value = serde_json::from_slice(&fs::read(&file).unwrap()).unwrap();
        assert_eq!(saved["tasks"][1]["status"], "TO_DO");
    }

    #[test]
    fn test_replay_write_persists_board() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);
        let script = write_script(&dir, drag_a_to_done());

        taskboard(dir.path())
            .args(["--file", &file, "replay", "--script", &script, "--write"])
            .assert()
            .success();

        let output = taskboard(dir.path())
            .args(["--file", &file, "show"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let json = parse_json_output(&output);
        assert_eq!(lane_ids(&json, 0), vec!["B"]);
        assert_eq!(lane_ids(&json, 2), vec!["A"]);
    }

    #[test]
    fn test_replay_click_and_self_drop_send_nothing() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);
        let script = write_script(
            &dir,
            json!([
                {"event": "down", "source": {"type": "task", "id": "A"}, "at": {"x": 0, "y": 0}},
                {"event": "move", "at": {"x": 5, "y": 5}, "over": {"type": "task", "id": "B"}},
                {"event": "up"},
                {"event": "down", "source": {"type": "task", "id": "A"}, "at": {"x": 0, "y": 0}},
                {"event": "move", "at": {"x": 0, "y": 50}, "over": {"type": "task", "id": "A"}},
                {"event": "up"},
                {"event": "down", "source": {"type": "columnHeader", "id": "col-1"}, "at": {"x": 0, "y": 0}},
                {"event": "move", "at": {"x": 90, "y": 0}, "over": {"type": "column", "id": "col-2", "index": 0}},
                {"event": "up"}
            ]),
        );

        let output = taskboard(dir.path())
            .args(["--file", &file, "replay", "--script", &script])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert!(json["data"]["commands"].as_array().unwrap().is_empty());
        assert!(json["data"]["notifications"].as_array().unwrap().is_empty());
        assert_eq!(json["data"]["board"]["lanes"][0]["tasks"][0]["id"], "A");
        assert_eq!(json["data"]["board"]["lanes"][0]["tasks"][1]["id"], "B");
    }

    #[test]
    fn test_replay_member_cannot_move_foreign_task() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);
        let script = write_script(&dir, drag_a_to_done());

        let output = taskboard(dir.path())
            .args([
                "--file", &file, "replay", "--script", &script, "--user", "bob", "--role",
                "member",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert!(json["data"]["commands"].as_array().unwrap().is_empty());
        // bob only sees the public task.
        assert_eq!(json["data"]["board"]["task_count"], 1);
        assert!(json["data"]["board"]["lanes"][0]["tasks"]
            .as_array()
            .unwrap()
            .is_empty());
        assert_eq!(json["data"]["board"]["lanes"][1]["tasks"][0]["id"], "C");
    }

    #[test]
    fn test_replay_member_write_keeps_hidden_tasks() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);
        let script = write_script(
            &dir,
            json!([
                {"event": "down", "source": {"type": "task", "id": "C"}, "at": {"x": 0, "y": 0}},
                {"event": "move", "at": {"x": 0, "y": 40}, "over": {"type": "column", "id": "col-1", "index": 0}},
                {"event": "up"}
            ]),
        );

        let output = taskboard(dir.path())
            .args([
                "--file", &file, "replay", "--script", &script, "--user", "bob", "--role",
                "member", "--write",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["data"]["reports"][0]["applied"], true);
        assert_eq!(json["data"]["board"]["lanes"][0]["tasks"][0]["id"], "C");

        let saved: Value = serde_json::from_slice(&fs::read(&file).unwrap()).unwrap();
        let mut ids: Vec<&str> = saved["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_replay_invalid_script_fails() {
        let dir = tempdir().unwrap();
        let file = write_board(&dir);
        let script = write_script(&dir, json!([{"event": "teleport"}]));

        taskboard(dir.path())
            .args(["--file", &file, "replay", "--script", &script])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid replay script"));
    }
}

#[test]
fn test_completions_do_not_need_a_file() {
    let dir = tempdir().unwrap();
    taskboard(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taskboard"));
}
