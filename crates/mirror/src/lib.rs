//! Incremental mirroring of ephemeral output panels into persistent views.
//!
//! A build panel is rewritten from scratch on every build and disappears when
//! closed. [`MirrorSync`] copies exactly the text appended to such a panel into
//! a regular document view, so results can live in their own pane and be
//! scrolled and searched like any file.
//!
//! # Components
//!
//! - [`delta`]: the offset tracker that yields newly appended text
//! - [`write`]: the fenced replace-range write onto the destination
//! - [`placement`]: pane selection and focus-preserving relocation
//! - [`sync`]: the per-source state machine tying them together
//!
//! Everything talks to the editor through the host traits in
//! `relay-primitives`. Failures are recovered inside the synchronizer and
//! reported through `tracing`; entry points return outcome values, never
//! errors.

pub mod config;
pub mod delta;
pub mod error;
pub mod placement;
pub mod sync;
pub mod write;

pub use config::MirrorConfig;
pub use delta::{Delta, DeltaTracker};
pub use error::{ConfigError, MirrorError};
pub use sync::{ContextSnapshot, MirrorSync, ModifyOutcome, SessionOutcome};
