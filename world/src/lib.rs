#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative mutable state for the Mural engine.
//!
//! Three independently owned, explicitly constructed state objects live
//! here: the decoded-image cache ([`ImageStore`]), the canvas registry
//! ([`CanvasRegistry`]), and the per-user placement sessions
//! ([`PlacementSessions`]). Sessions are ephemeral; the image cache and the
//! canvas registry live for the whole process, and the registry is the one
//! piece of state that survives restarts through the persistence adapter.

mod canvases;
mod images;
mod sessions;

pub use canvases::CanvasRegistry;
pub use images::{ImageLoadError, ImageStore};
pub use sessions::PlacementSessions;
