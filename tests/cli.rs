use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn userdir(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("userdir").unwrap();
    cmd.env("USERDIR_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    userdir(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("11 default users"));
    data_dir
}

#[test]
fn init_seeds_default_users_once() {
    let data_dir = initialized();

    userdir(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("left untouched"));

    userdir(&data_dir)
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Peter Loew"))
        .stdout(predicate::str::contains("Total: 11 users (7 active)"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("users.json").exists());
}

#[test]
fn list_filters_by_active_state() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args(["user", "list", "--inactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Castor Troy"))
        .stdout(predicate::str::contains("Peter Loew").not());

    userdir(&data_dir)
        .args(["user", "list", "--active", "--inactive"])
        .assert()
        .failure();
}

#[test]
fn add_writes_created_record() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args([
            "user",
            "add",
            "--forename",
            "Alice",
            "--surname",
            "New",
            "--email",
            "alice.new@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user: Alice New (usr-12)"));

    userdir(&data_dir)
        .args(["log", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("Alice New"));

    userdir(&data_dir)
        .args(["log", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Before:   (none)"))
        .stdout(predicate::str::contains("Forename: \"Alice\""));
}

#[test]
fn add_rejects_invalid_user() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args([
            "user",
            "add",
            "--forename",
            "Alice",
            "--surname",
            "New",
            "--email",
            "not-an-email",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid email address"));

    userdir(&data_dir)
        .args(["log", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change records found."));
}

#[test]
fn edit_writes_updated_record() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args(["user", "edit", "ploew@example.com", "--surname", "Loew-Smith"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated user: Peter Loew-Smith (usr-1)"));

    userdir(&data_dir)
        .args(["log", "show", "log-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Change:   Updated"))
        .stdout(predicate::str::contains(
            "Summary:  Surname: \"Loew\" -> \"Loew-Smith\"",
        ));

    userdir(&data_dir)
        .args(["user", "logs", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Peter Loew-Smith"));
}

#[test]
fn delete_requires_force_and_is_not_logged() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args(["user", "delete", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force"));

    userdir(&data_dir)
        .args(["user", "delete", "3", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted user: Castor Troy"));

    userdir(&data_dir)
        .args(["user", "show", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not found: 3"));

    userdir(&data_dir)
        .args(["log", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change records found."));
}

#[test]
fn show_unknown_record_fails() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args(["log", "show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Change record not found: 99"));
}

#[test]
fn edit_can_clear_date_of_birth() {
    let data_dir = initialized();

    userdir(&data_dir)
        .args(["user", "edit", "1", "--clear-dob"])
        .assert()
        .success();

    userdir(&data_dir)
        .args(["user", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Born:     (unknown)"));

    userdir(&data_dir)
        .args(["user", "edit", "1", "--dob", "1968-01-08", "--clear-dob"])
        .assert()
        .failure();
}
