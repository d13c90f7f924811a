mod common;

use assert_cmd::prelude::*;
use common::{cli, write_json};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn account(country: &str) -> serde_json::Value {
    json!({
        "id": "acct_1",
        "legal_entity": {
            "first_name": "Aroha",
            "last_name": "Ngata",
            "address": { "country": country, "city": "Wellington" }
        }
    })
}

#[test]
fn test_new_zealand_composite_number() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let account = write_json(dir.path(), "account.json", &account("NZ"))?;
    let form = write_json(
        dir.path(),
        "bank.json",
        &json!({ "bank_account_number_common": "123-456-7890123-00" }),
    )?;

    cli()
        .arg("bank")
        .arg(&account)
        .arg("--form")
        .arg(&form)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"bank_routing_number\": \"123456\""))
        .stdout(predicate::str::contains("\"bank_account_number\": \"789012300\""))
        .stdout(predicate::str::contains("\"bank_currency\": \"NZD\""))
        .stdout(predicate::str::contains("\"bank_holder_name\": \"Aroha Ngata\""))
        .stdout(predicate::str::contains("\"errors\": []"));

    Ok(())
}

#[test]
fn test_malformed_composite_number_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let account = write_json(dir.path(), "account.json", &account("NZ"))?;
    let form = write_json(
        dir.path(),
        "bank.json",
        &json!({ "bank_account_number_common": "123-456" }),
    )?;

    cli()
        .arg("bank")
        .arg(&account)
        .arg("--form")
        .arg(&form)
        .assert()
        .success()
        .stdout(predicate::str::contains("bank_account_number_common"))
        .stdout(predicate::str::contains("\"payload\": null"));

    Ok(())
}

#[test]
fn test_profile_fields_without_form() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let account = write_json(dir.path(), "account.json", &account("DE"))?;

    cli()
        .arg("bank")
        .arg(&account)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"bank_country\": \"DE\""))
        .stdout(predicate::str::contains("\"bank_currency\": \"EUR\""))
        .stdout(predicate::str::contains("\"bank_account_number\": null"));

    Ok(())
}
