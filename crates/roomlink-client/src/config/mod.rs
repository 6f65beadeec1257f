//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use roomlink_core::error::{Result, RoomlinkError};

pub use schema::{ChatConfig, EndpointSection, SessionSection};

pub fn load_from_file(path: &str) -> Result<ChatConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RoomlinkError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ChatConfig> {
    let cfg: ChatConfig = serde_yaml::from_str(s)
        .map_err(|e| RoomlinkError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
