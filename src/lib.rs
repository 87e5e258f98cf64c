//! Core of the `taskpro` task manager: the task model, the state store that
//! owns every mutation, filter/search and stats derivations, and the
//! key-value persistence behind them. The binary adds a CLI and a terminal UI.

pub mod commands;
pub mod filter;
pub mod ids;
pub mod logging;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tui;
