mod common;

use assert_cmd::prelude::*;
use common::{cli, write_json};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn settings_input() -> serde_json::Value {
    json!({
        "gateways": [
            { "gateway": "paypal", "confirmation_after_days": 14 },
            { "gateway": "stripe", "confirmation_after_days": 14 }
        ],
        "update": {
            "automatic_confirmation_after_days": 95,
            "main_search": "location",
            "limit_distance": true
        }
    })
}

#[test]
fn test_settings_limit_follows_stripe_flag() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = write_json(dir.path(), "settings.json", &settings_input())?;

    cli()
        .arg("settings")
        .arg(&input)
        .env("FEATURE_STRIPE_PAYMENTS", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("must be between 1 and 90"))
        .stdout(predicate::str::contains("\"confirmation_after_days\": 14"));

    cli()
        .arg("settings")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"errors\": []"))
        .stdout(predicate::str::contains("\"confirmation_after_days\": 95"))
        .stdout(predicate::str::contains("\"main_search\": \"keyword\""));

    Ok(())
}

#[test]
fn test_settings_search_needs_location_flag() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = write_json(dir.path(), "settings.json", &settings_input())?;

    cli()
        .arg("settings")
        .arg(&input)
        .env("FEATURE_LOCATION_SEARCH", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"main_search\": \"location\""))
        .stdout(predicate::str::contains("\"limit_search_distance\": true"));

    Ok(())
}

#[test]
fn test_listing_create_waits_for_approval() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = write_json(
        dir.path(),
        "listing.json",
        &json!({
            "listing": {
                "id": 7,
                "title": "Sledgehammer",
                "author_id": "author",
                "state": "approved",
                "open": true,
                "valid_until": null
            },
            "pre_approved_listings": true,
            "admin_ids": ["admin_1"]
        }),
    )?;

    cli()
        .arg("listing")
        .arg(&input)
        .args(["--action", "create"])
        .env("FEATURE_APPROVE_LISTINGS", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"approval_pending\""))
        .stdout(predicate::str::contains("\"kind\": \"submitted_for_review\""))
        .stdout(predicate::str::contains("\"show_approval_link\": true"));

    cli()
        .arg("listing")
        .arg(&input)
        .args(["--action", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"approved\""))
        .stdout(predicate::str::contains("\"notifications\": []"));

    Ok(())
}
