mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestDir;

#[test]
fn tasktalk_help_works() {
    let dir = TestDir::new();
    dir.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("conversational todo list"));
}

#[test]
fn subcommand_help_works() {
    let dir = TestDir::new();
    for cmd in ["add", "done", "remove", "list", "show", "tools", "chat"] {
        dir.cmd().arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn add_then_show_uses_default_state_file() {
    let dir = TestDir::new();
    dir.cmd()
        .args(["add", "Buy Milk", "Walk dog"])
        .assert()
        .success()
        .stdout(contains("Added: Buy Milk"))
        .stdout(contains("Added: Walk dog"));

    assert!(dir.state_path().exists());

    dir.cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(contains("Here are your tasks:"))
        .stdout(contains("⬜ Buy Milk"));
}

#[test]
fn done_by_partial_title_and_id() {
    let dir = TestDir::new();
    dir.cmd()
        .args(["add", "haircut at 10am", "Walk dog"])
        .assert()
        .success();

    dir.cmd()
        .args(["done", "haircut"])
        .assert()
        .success()
        .stdout(contains("Completed: haircut at 10am"));

    dir.cmd()
        .args(["remove", "2"])
        .assert()
        .success()
        .stdout(contains("Completed: Walk dog"));

    let state = dir.read_state().unwrap();
    assert!(state.todos.iter().all(|task| task.completed));
}

#[test]
fn unresolved_targets_are_messages_not_failures() {
    let dir = TestDir::new();
    dir.cmd()
        .args(["add", "Buy Milk", "Buy groceries"])
        .assert()
        .success();

    dir.cmd()
        .args(["done", "xyz"])
        .assert()
        .success()
        .stdout(contains("Error: Task not found."));

    dir.cmd()
        .args(["complete", "buy"])
        .assert()
        .success()
        .stdout(contains("Multiple matches"));
}

#[test]
fn state_flag_and_env_select_the_document() {
    let dir = TestDir::new();
    let custom = dir.path().join("nested").join("todos.json");
    std::fs::create_dir_all(custom.parent().unwrap()).unwrap();

    dir.cmd()
        .arg("--state")
        .arg(&custom)
        .args(["add", "flagged"])
        .assert()
        .success();
    assert!(custom.exists());

    dir.cmd()
        .env("TASKTALK_STATE", &custom)
        .arg("show")
        .assert()
        .success()
        .stdout(contains("⬜ flagged"));
}

#[test]
fn list_json_envelope() {
    let dir = TestDir::new();
    dir.cmd().args(["add", "Buy Milk"]).assert().success();

    let output = dir.cmd().args(["--json", "list"]).output().unwrap();
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["schema_version"], "tasktalk.v1");
    assert_eq!(payload["command"], "list");
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["data"][0]["task"], "Buy Milk");
    assert_eq!(payload["data"][0]["status"], "open");
}

#[test]
fn quiet_suppresses_human_output() {
    let dir = TestDir::new();
    dir.cmd()
        .args(["-q", "add", "silent"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
    assert_eq!(dir.read_state().unwrap().todos.len(), 1);
}

#[test]
fn tools_lists_every_tool() {
    let dir = TestDir::new();
    let output = dir.cmd().arg("tools").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in [
        "add_todo",
        "remove_task",
        "complete_task",
        "list_todos",
        "format_list",
    ] {
        assert!(stdout.contains(name), "missing {name}");
    }
}

#[test]
fn invalid_explicit_config_fails_with_json_error() {
    let dir = TestDir::new();
    let config = dir
        .write_file("bad.toml", "[chat]\nbubble_width = 5\n")
        .unwrap();

    let output = dir
        .cmd()
        .arg("--config")
        .arg(&config)
        .args(["--json", "show"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["command"], "show");
    assert_eq!(payload["error"]["kind"], "user_error");
}

#[test]
fn local_config_moves_state_file() {
    let dir = TestDir::new();
    dir.write_file(".tasktalk.toml", "[state]\npath = \"data/todo.json\"\n")
        .unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();

    dir.cmd().args(["add", "configured"]).assert().success();

    assert!(dir.path().join("data/todo.json").exists());
    assert!(!dir.state_path().exists());
}

#[test]
fn chat_session_over_stdin() {
    let dir = TestDir::new();
    dir.cmd()
        .arg("chat")
        .write_stdin("add rice, cereal and milk\nmark rice as done\nquit\n")
        .assert()
        .success()
        .stdout(contains("Todo List Assistant"))
        .stdout(contains("Completed: rice"))
        .stdout(contains("Goodbye!"));

    let state = dir.read_state().unwrap();
    assert_eq!(state.todos.len(), 3);
    assert!(state.todos[0].completed);
    assert_eq!(state.conversation.len(), 4);
}

#[test]
fn chat_is_the_default_command() {
    let dir = TestDir::new();
    dir.cmd()
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(contains("Goodbye!"));
}

#[test]
fn duplicate_add_reports_warning() {
    let dir = TestDir::new();
    dir.cmd().args(["add", "Buy Milk"]).assert().success();
    dir.cmd().args(["done", "Buy Milk"]).assert().success();

    let output = dir
        .cmd()
        .args(["--json", "add", "buy milk"])
        .output()
        .unwrap();
    let payload: Value = serde_json::from_slice(&output.stdout).unwrap();
    let message = payload["data"]["results"][0]["message"].as_str().unwrap();

    assert!(message.contains("activated it again"));
    assert_eq!(payload["warnings"][0], "\"buy milk\" was already on the list");
    assert_eq!(payload["data"]["tasks"][0]["status"], "open");
}
