//! Core types shared between the mirroring engine and its hosts.
//!
//! The mirroring engine never owns surfaces or windows. Everything it knows
//! about the host editor flows through the traits in [`host`], using the
//! identifiers and value types defined here.

/// Host error type.
pub mod error;
/// Host collaborator traits.
pub mod host;
/// Identifier types for surfaces, windows, sessions and markers.
pub mod ids;
/// Pane placement types.
pub mod layout;
/// Display-affecting settings propagated between surfaces.
pub mod settings;
/// Deferred work handed to the host scheduler.
pub mod task;
/// Char-indexed text access.
pub mod text;
/// Session trigger events.
pub mod trigger;

pub use error::{HostError, HostResult};
pub use host::{Deferred, Host, Layout, Surfaces};
pub use ids::{DestinationMarker, SessionEpoch, SurfaceId, WindowId};
pub use layout::{Origin, PaneSlot};
pub use ropey::Rope;
pub use settings::{DisplayMode, SurfaceSettings};
pub use task::{DeferredKind, DeferredTask};
pub use text::TextSource;
pub use trigger::{SessionTrigger, TriggerArgs};
