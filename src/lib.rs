//! Game-script release packager.
//!
//! This crate reads the release number from a script's version marker,
//! stages the release inputs into a `<product>-v<version>` directory, writes
//! an uncompressed tar of that directory, and removes the staging directory.
//! It is used by the `gs-package` CLI binary and can be driven
//! programmatically through [`pipeline::package`].
//!
//! # Modules
//!
//! - [`archive`] - Deterministic tar creation
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Packager settings and `packager.toml` loading
//! - [`error`] - Configuration, staging, packaging, and cleanup errors
//! - [`filesystem`] - Injectable filesystem capability and host implementation
//! - [`naming`] - Package and release naming policy
//! - [`output`] - CLI message formatting
//! - [`pipeline`] - Sequential packaging pipeline
//! - [`sources`] - Release file set resolution
//! - [`stager`] - Copying inputs into the staging directory
//! - [`version`] - Version marker discovery

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod stager;
pub mod version;
