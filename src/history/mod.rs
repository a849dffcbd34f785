//! Persistence of competitions and the competition history list.
//!
//! Two JSON documents: the single current competition and an array of
//! historical competitions, sorted newest first and keyed by start time.
//! The codec converts every parse or I/O failure into a "no data" signal at
//! this boundary; file access is behind the injected [`HistoryStorage`]
//! collaborator so the service is testable without real files.
//!
//! ## Example
//!
//! ```no_run
//! use mahjong_competition::history::{FileStorage, HistoryConfig, HistoryService};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let config = HistoryConfig::from_env();
//! let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
//! let history = HistoryService::new(storage, config);
//!
//! for competition in history.history().await {
//!     println!("{} ({})", competition.name, competition.start_time);
//! }
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod service;
pub mod storage;

pub use codec::{
    decode_competition, decode_history, encode_competition, encode_history, sort_history, upsert,
};
pub use config::HistoryConfig;
pub use service::HistoryService;
pub use storage::{FileStorage, HistoryStorage, MemoryStorage};
