//! # strsync - Android string resource translation
//!
//! `strsync` keeps the localized copies of an Android `strings.xml` in sync
//! with the default resources. Each run loads the default file, merges it into
//! `values-{code}/strings.xml` for every target language and only sends new
//! or changed entries to the selected translation provider.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate into French and German with the default (Google) provider
//! strsync --to fr,de app/src/main/res/values/strings.xml
//!
//! # Retranslate everything with Baidu
//! strsync --provider baidu --overwrite --to zh-rCN app/src/main/res/values/strings.xml
//!
//! # List the languages DeepL supports
//! strsync languages --provider deepl
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/strsync/config.toml`:
//!
//! ```toml
//! [sync]
//! provider = "baidu"
//! to = ["fr", "de", "ja"]
//!
//! [providers.baidu]
//! app_id = "2015063000000001"
//! app_key_env = "BAIDU_APP_KEY"
//! ```

/// Translation memo (LRU) and its `SQLite` persistence.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// File system utilities.
pub mod fs;

/// Diagnostic logging setup.
pub mod logging;

/// Resource trees: value nodes, content runs and pass-through entries.
pub mod model;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration, cache and target resources.
pub mod paths;

/// Android `strings.xml` loading and writing.
pub mod resource;

/// The per-language merge engine.
pub mod sync;

/// Languages, providers and the request pipeline.
pub mod translation;

/// Terminal UI components (progress bar, colors).
pub mod ui;
