mod common;

use assert_cmd::prelude::*;
use common::{cli, write_json};
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn member(person_id: &str, first_name: &str, joined_at: &str, status: &str) -> Value {
    json!({
        "person_id": person_id,
        "first_name": first_name,
        "last_name": "Smith",
        "username": first_name.to_lowercase(),
        "emails": [{
            "address": format!("{}@example.com", first_name.to_lowercase()),
            "confirmed": true,
            "send_notifications": true
        }],
        "email_from_admins": true,
        "locale": "en",
        "joined_at": joined_at,
        "status": status,
        "custom_fields": { "Company": "Acme" }
    })
}

fn members() -> Value {
    json!([
        member("p1", "Joan", "2024-01-01T10:00:00", "accepted"),
        member("p2", "Kim", "2024-02-01T10:00:00", "banned"),
    ])
}

#[test]
fn test_export_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_json(dir.path(), "members.json", &members())?;

    let output = cli().arg("members-csv").arg(&path).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\"user_id\",\"first_name\""));
    assert!(lines[1].starts_with("\"p2\",\"Kim\""));
    assert!(lines[2].starts_with("\"p1\",\"Joan\""));

    Ok(())
}

#[test]
fn test_export_filters_and_extra_columns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_json(dir.path(), "members.json", &members())?;

    cli()
        .arg("members-csv")
        .arg(&path)
        .args(["--status", "banned", "--can-post-listings"])
        .args(["--custom-field", "Company"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"can_post_listings\",\"Company\""))
        .stdout(predicate::str::contains("\"banned\",\"0\",\"true\",\"en\",\"false\",\"Acme\""))
        .stdout(predicate::str::contains("Joan").not());

    Ok(())
}

#[test]
fn test_unknown_status_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_json(dir.path(), "members.json", &members())?;

    cli()
        .arg("members-csv")
        .arg(&path)
        .args(["--status", "sleeping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));

    Ok(())
}
