//! # Armory Architecture
//!
//! Armory is a **UI-agnostic tool-launching library**. This is not a CLI
//! application that happens to have some library code—it's a library that
//! happens to have a CLI client.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, menu.rs, wired by main.rs)             │
//! │  - Parses arguments, formats output, runs the menu loop     │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Holds the catalog, settings, and install-status cache    │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, pure where possible            │
//! │  - Operates on Rust types, returns Rust types               │
//! │  - Never writes to stdout/stderr                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  System Layer (probe.rs, terminal.rs)                       │
//! │  - Abstract SystemProbe trait                               │
//! │  - HostProbe (production), FakeProbe (testing)              │
//! │  - Terminal dispatch and wrapper-script lifecycle           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Launch Pipeline
//!
//! A launch composes sequentially: find the tool in the catalog → resolve
//! and validate parameter values against its schema → render the command
//! template ([`template`]) → write a wrapper script → spawn a terminal
//! emulator pointed at it ([`terminal`]), detached. The launcher never
//! waits on the tool; it runs interactively in its own window.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`model`]: Catalog data types (`ToolSpec`, `ParameterSpec`)
//! - [`catalog`]: Catalog persistence and the built-in tool set
//! - [`template`]: Command Builder—placeholder template rendering
//! - [`terminal`]: Terminal Dispatcher—emulator argv synthesis and
//!   wrapper-script lifecycle
//! - [`probe`]: System probe trait and implementations
//! - [`inventory`]: Install-status cache, aliases, version probes
//! - [`config`]: Settings management
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod inventory;
pub mod model;
pub mod probe;
pub mod template;
pub mod terminal;
