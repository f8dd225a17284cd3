//! # npcchat — command-line runner
//!
//! Glues `npcchat-core` (pipeline, rules, sinks) to `npcchat-llm` (remote
//! chat model) and exposes the `npcchat` binary.
//!
//! ## Modules
//!
//! - `cli` — clap arguments layered over the TOML configuration
//! - `remote` — the remote generative reply strategy
//! - `app` — startup wiring: tracing, credentials, responder, sinks

pub mod app;
pub mod cli;
pub mod remote;
