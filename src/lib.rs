//! Mech Tactics - deterministic hex-grid mech combat simulation core

pub mod battle;
pub mod combat;
pub mod core;
