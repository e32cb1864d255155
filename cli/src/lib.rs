//! dockergen CLI - generate Dockerfiles and .dockerignore files from configuration.

pub mod commands;
pub mod output;
