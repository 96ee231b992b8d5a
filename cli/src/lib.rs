//! CLI utilities for ttsprep.
//!
//! Config contexts, credential resolution and output helpers shared by the
//! command-line tools.

pub mod config;
pub mod credentials;
pub mod output;
pub mod paths;

pub use config::{Config, Context, load_config, mask_api_key};
pub use credentials::{Credentials, Resolver, api_key_env, base_url_env};
pub use output::{Output, OutputFormat};
pub use paths::Paths;
