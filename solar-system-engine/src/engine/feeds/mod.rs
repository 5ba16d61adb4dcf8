//! External HTTP feeds.
//!
//! Requests run on the IO task pool and are polled each frame. Their tasks
//! live on scene entities, so teardown drops and cancels them, and results
//! are only applied while the scene's liveness token holds.

/// Endpoints, credentials and the HTTP transport.
pub mod client;
/// Cancellation token tied to the running scene.
pub mod liveness;
/// Latest solar flare from the DONKI feed.
pub mod space_weather;
