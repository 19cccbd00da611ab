//! # Events Module
//!
//! Event-driven progress reporting for whatever front end drives a run.
//!
//! ## Design
//! The engine emits events through channels, so a CLI progress bar, a GUI
//! or a JSON log can all follow a run without the engine knowing about them.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::File(FileEvent::Classified { completed, total, .. }) = event {
//!             println!("{}/{}", completed, total);
//!         }
//!     }
//! });
//!
//! engine.run_with_events(ExecutionMode::Concurrent { workers: 4 }, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
