//! song-splitter - Split a song into stems with Demucs
//!
//! A command-line wrapper that makes sure Demucs, PyTorch and FFmpeg are
//! usable, then runs Demucs on one audio file, relaying its output live.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `toolchain`: Python module probes, pip installs, PATH lookup
//! - `separation`: Demucs command line, process runner, stem discovery
//! - `pipeline`: prerequisite checks and the separation run
//! - `export`: optional JSON run report
//!
//! # Example
//!
//! ```no_run
//! use song_splitter::{config::Settings, pipeline};
//!
//! let settings = Settings {
//!     input: "song.mp3".into(),
//!     ..Settings::default()
//! };
//! let summary = pipeline::run(&settings).expect("environment not usable");
//! println!("Separation {}", summary.outcome.kind());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod separation;
pub mod toolchain;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, SplitterError};
pub use types::{SeparationOutcome, StemPaths};
