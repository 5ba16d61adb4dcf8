//! Static scene data: the embedded body/mission catalog and the reference
//! facts loaded as a JSON asset.

/// Descriptive reference data keyed by body name, with landmarks.
pub mod body_facts;

/// Orbital parameters, moons, interiors and mission paths.
pub mod solar_system;
