pub mod audio;
pub mod bodies;
pub mod camera;
pub mod catalog;
pub mod core;
pub mod feeds;
pub mod missions;
pub mod overlay;
pub mod picking;
pub mod scene;
pub mod state;
pub mod systems;
pub mod textures;
