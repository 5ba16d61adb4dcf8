use bevy::prelude::*;

/// Ordered stages of one frame. Chained in `create_app`, so every system in a
/// later set sees the results of the earlier ones within the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Snapshot,
    Clock,
    Ambience,
    Bodies,
    Missions,
    SpacetimeGrid,
    Camera,
}

/// Top-level entity owned by the current scene. Despawned recursively on teardown.
#[derive(Component, Debug, Default)]
pub struct SceneEntity;

/// Asset stores borrowed while the scene is being constructed.
pub struct SceneAssets<'a> {
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub images: &'a mut Assets<Image>,
    pub asset_server: Option<&'a AssetServer>,
}
