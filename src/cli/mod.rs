//! # CLI Module
//!
//! Command-line access to the loader, mostly for checking a description
//! snapshot before handing it to the test runner.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Load the description and print the group and context registries as JSON:
//!
//! ```bash
//! apisail inspect --description my_blog.yaml --pretty
//! ```
//!
//! ### `check`
//!
//! Report every required header (and, with `--require-parameter-examples`,
//! every required query parameter) that lacks an example. Exits with status 1
//! when anything is reported:
//!
//! ```bash
//! apisail check --description my_blog.yaml
//! ```
//!
//! ### `template`
//!
//! Print the URI template of every method, one per line, followed by the
//! template of each trait variant:
//!
//! ```bash
//! apisail template --description my_blog.yaml
//! GET /posts{?page,sort}
//! GET /posts{?page,sort,api%2Dkey} [secured]
//! ```
//!
//! `--description` falls back to `APISAIL_SOURCE_FILE` or the `source_file`
//! of the file passed with `--config`.

mod commands;


pub use commands::{run_cli, run_with_output, Cli, Commands};
