// src/core/mod.rs

pub mod config_loader;
pub mod environment;
pub mod flags;
pub mod logfile;
pub mod merger;
pub mod paths;
pub mod schema;
