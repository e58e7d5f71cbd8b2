//! Configuration loading
//!
//! Layers defaults, an optional config file and environment overrides.

pub mod loader;

pub use loader::{
    apply_env_overrides, load, load_from_env, load_from_file, load_with, probe_config_paths,
    validate,
};
