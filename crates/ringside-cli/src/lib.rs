//! # ringside-cli: Command-Line Tools for Ringside
//!
//! ## Subcommands
//!
//! - `ringside catalog`: print the standard match types.
//! - `ringside match check <file>`: check a match file's sides and
//!   competitor counts against its match type.
//! - `ringside replay <script.yaml>`: run a lifecycle script against an
//!   in-memory roster on a controllable clock and check its expectations.
//!
//! ```bash
//! ringside catalog --json
//! ringside match check card/main-event.yaml
//! ringside replay scenarios/hart-foundation.yaml -v
//! ```

pub mod catalog;
pub mod matches;
pub mod replay;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read a YAML (`.yaml`/`.yml`) or JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("failed to parse YAML {}", path.display()))
    } else {
        serde_json::from_str(&content).with_context(|| format!("failed to parse JSON {}", path.display()))
    }
}
