//! Configuration: `.sesame.toml` settings merged under command-line flags.

pub mod settings;

pub use settings::Settings;
