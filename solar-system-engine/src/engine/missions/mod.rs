//! Mission markers travelling closed spline loops as a function of sim time.

pub mod path;
pub mod tracker;
