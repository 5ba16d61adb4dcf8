//! Sound: the ambient drone steered by the simulation, and narrated
//! body descriptions from the speech feed.

pub mod ambience;
pub mod speech;
