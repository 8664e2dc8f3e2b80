//! Subcommand implementations.

/// Cache inspection command handler.
pub mod cache;

/// Language listing command handler.
pub mod languages;

/// Provider listing command handler.
pub mod providers;

/// Resource synchronization command handler.
pub mod sync;
