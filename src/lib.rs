pub mod bases;
pub mod cave;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod dict;
pub mod errors;
