//! Command-line interface for terraform-provider-istiolocal.
//!
//! Provides schema inspection and one command per resource lifecycle
//! operation and data source read.

mod commands;

pub use commands::{
    execute, load_attributes, parse_cli, provider_config, run_with_cli, Cli, Commands,
};
