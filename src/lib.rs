// Library root
// -----------
// The binary (`main.rs`) only parses arguments, loads settings and hands an
// `Action` to the dispatcher; everything else lives here so it can be tested
// without spawning the process.
//
// Module responsibilities:
// - `cli`: flag definitions and action selection.
// - `config`: where settings live and how they are read and written.
// - `api`: HTTP calls to the image server.
// - `upload`: per-file preparation and the best-effort batch loop.
// - `commands`: guards and the flow behind each action.
// - `ui`: terminal output and progress spinners.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod media_type;
pub mod ui;
pub mod upload;

pub use error::{Result, TobsmgError};
