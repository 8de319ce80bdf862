//! # Eclipse Core Library
//!
//! This library provides the core logic for Eclipse, a pocket companion
//! that offers short stress-relief techniques. It follows a CLI-first
//! philosophy: every operation is available through the standalone
//! `eclipse-cli` binary, and any graphical front end is a thin layer over
//! the same library.
//!
//! ## Architecture
//!
//! - **Catalog**: read-only techniques and categories, bundled or loaded
//!   from JSON files
//! - **Selector**: filter pipeline plus an injectable random draw
//! - **Storage**: favorites, history, settings and one-shot flags in a
//!   SQLite key-value table, with TOML-based configuration
//! - **Timer**: a tick-driven guided timer and a tokio driver for it
//!
//! ## Key Components
//!
//! - [`Catalog`]: technique and category lookup
//! - [`Selector`]: filtered random draws
//! - [`UserStore`]: typed persistence over a [`KeyValueStore`]
//! - [`GuidedTimer`]: prepare / active / cooldown state machine
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod error;
pub mod events;
pub mod format;
pub mod selector;
pub mod storage;
pub mod timer;

pub use catalog::{Catalog, Category, Technique, Tier};
pub use error::{CatalogError, ConfigError, CoreError, StorageError};
pub use events::Event;
pub use selector::{DrawFilters, PcgRandom, RandomSource, Selector};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, Settings, UserStore};
pub use timer::{GuidedTimer, Phase, TimerDriver, TimerOptions};
