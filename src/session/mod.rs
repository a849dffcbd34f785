//! Single-owner session around the current competition.
//!
//! The [`SessionActor`] owns the one mutable [`Competition`] and processes
//! messages from its inbox sequentially, so concurrent callers can never
//! interleave partial mutations. Callers hold a cheap cloneable
//! [`SessionHandle`]; reads return snapshots, mutations return a
//! [`SessionResponse`], and subscribers receive a [`SessionNotification`]
//! after every successful change.
//!
//! ## Example
//!
//! ```no_run
//! use mahjong_competition::history::{FileStorage, HistoryConfig, HistoryService};
//! use mahjong_competition::session::SessionActor;
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let config = HistoryConfig::from_env();
//! let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
//! let history = Arc::new(HistoryService::new(storage, config));
//!
//! let (actor, handle) = SessionActor::new(history);
//! tokio::spawn(actor.run());
//!
//! handle.prepare("Spring Open", 8, 4).await;
//! # }
//! ```
//!
//! [`Competition`]: crate::competition::Competition

pub mod actor;
pub mod messages;

pub use actor::{SessionActor, SessionHandle};
pub use messages::{SessionMessage, SessionNotification, SessionResponse};
