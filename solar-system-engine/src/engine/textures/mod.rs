//! Surface textures.
//!
//! Every body gets a deterministic procedural texture at construction time.
//! A body may additionally name a photographic texture; it replaces the
//! procedural one once loaded and is dropped with a warning if it fails.

use bevy::asset::LoadState;
use bevy::prelude::*;

pub mod procedural;

/// Photographic texture still in flight for a surface material.
#[derive(Component, Debug, Clone)]
pub struct PendingSurfaceTexture {
    pub image: Handle<Image>,
    pub material: Handle<StandardMaterial>,
}

pub fn apply_loaded_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    pending: Query<(Entity, &PendingSurfaceTexture)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, texture) in &pending {
        match asset_server.load_state(&texture.image) {
            LoadState::Loaded => {
                if let Some(material) = materials.get_mut(&texture.material) {
                    material.base_color_texture = Some(texture.image.clone());
                }
                commands.entity(entity).remove::<PendingSurfaceTexture>();
            }
            LoadState::Failed(error) => {
                warn!("Surface texture failed to load, keeping procedural surface: {error}");
                commands.entity(entity).remove::<PendingSurfaceTexture>();
            }
            _ => {}
        }
    }
}
