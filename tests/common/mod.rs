//! Shared test helpers for integration tests
//!
//! Fixtures are JSON bodies in the backend's envelope shape, served by a
//! wiremock server. CLI tests point `FERP_CONFIG_DIR` at a temp directory
//! so sessions never touch the real config.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;

use ferp::console::Console;
use ferp::core::config::Config;
use ferp::core::role::Role;
use ferp::core::session::{Session, SessionHandle, SessionStore};
use ferp::entities::user::User;

pub const TOKEN: &str = "tok-123";

/// Helper to get a ferp command bound to an isolated config directory
pub fn ferp(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("ferp"));
    cmd.env("FERP_CONFIG_DIR", config_dir.path())
        .env_remove("FERP_API_URL")
        .env_remove("FERP_PASSWORD")
        .env_remove("FERP_LOG")
        .env_remove("RUST_LOG");
    cmd
}

pub fn user(role: Role) -> User {
    let (name, email) = match role {
        Role::Admin => ("Sarah Admin", "sarah@mill.example"),
        Role::Sales => ("Sam Sales", "sam@mill.example"),
        Role::SamplingHead => ("Hana Head", "hana@mill.example"),
    };
    User {
        id: format!("u-{}", role).to_lowercase(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        created_at: None,
        updated_at: None,
    }
}

pub fn user_json(role: Role) -> Value {
    serde_json::to_value(user(role)).unwrap()
}

/// Write a signed-in session where the CLI will find it
pub fn seed_session(config_dir: &TempDir, role: Role) {
    SessionStore::new(config_dir.path().join("session.yaml"))
        .save(&Session::signed_in(user(role), TOKEN))
        .unwrap();
}

pub fn session_file_exists(config_dir: &TempDir) -> bool {
    config_dir.path().join("session.yaml").exists()
}

/// A console talking to `base_url`, signed in as `role`
pub fn console_as(base_url: &str, role: Role) -> Console {
    let config = Config {
        api_url: base_url.to_string(),
        ..Config::default()
    };
    let session = SessionHandle::new(Session::signed_in(user(role), TOKEN));
    Console::new(&config, session).unwrap()
}

/// Wrap `data` the way successful responses are wrapped
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn error_body(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

pub fn buyer_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "contactPerson": "Jane Doe",
        "email": "jane@acme.example",
        "phone": "+1-555-0123",
        "address": "12 Loom Street, Leeds",
        "isDeleted": false
    })
}

pub fn inventory_json(id: &str, fabric: &str, color: &str, gsm: u32, meters: f64) -> Value {
    json!({
        "_id": id,
        "fabricName": fabric,
        "color": color,
        "gsm": gsm,
        "availableMeters": meters
    })
}

pub fn item_json(id: &str, fabric: &str, status: &str, meters: f64) -> Value {
    json!({
        "_id": id,
        "fabricName": fabric,
        "color": "Navy",
        "gsm": 180,
        "requiredMeters": meters,
        "availableMeters": 500,
        "status": status
    })
}

pub fn request_json(id: &str, buyer: &str, required_by: &str, items: Vec<Value>) -> Value {
    json!({
        "_id": id,
        "buyerName": buyer,
        "contactPerson": "Jane Doe",
        "requiredByDate": required_by,
        "priority": "HIGH",
        "items": items
    })
}

pub fn request_page_json(requests: Vec<Value>, page: u32, total_pages: u32) -> Value {
    let total = requests.len();
    json!({
        "requests": requests,
        "total": total,
        "page": page,
        "totalPages": total_pages
    })
}
