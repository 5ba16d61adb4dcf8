/// Gravity-mode grid deformed around the selected mass
pub mod spacetime_grid;
/// Background star points
pub mod starfield;
