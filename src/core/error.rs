use thiserror::Error;

use crate::battle::hex::HexCoord;
use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Coordinate out of bounds: ({}, {})", .0.row, .0.col)]
    OutOfBounds(HexCoord),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
