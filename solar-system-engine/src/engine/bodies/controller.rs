use bevy::prelude::*;
use constants::orbital::{
    ATMOSPHERE_ALPHA_HEATMAP, ATMOSPHERE_ALPHA_NORMAL, ATMOSPHERE_ALPHA_STRUCTURAL,
    CORONA_ALPHA_AMPLITUDE, CORONA_ALPHA_BASE, CORONA_ALPHA_FREQUENCY, CORONA_PULSE_AMPLITUDE,
    CORONA_PULSE_BASE, CORONA_PULSE_FREQUENCY, STAR_EMISSIVE_STRENGTH,
    SURFACE_ALPHA_HEATMAP, SURFACE_ALPHA_STRUCTURAL,
};
use std::f32::consts::TAU;

use crate::engine::feeds::space_weather::SpaceWeather;
use crate::engine::state::view_state::{BodyId, FrameSnapshot};
use crate::engine::state::visual_modes::{VisualMode, VisualModes};
use crate::engine::systems::simulation_clock::SimulationClock;

/// Layers owned by a star.
#[derive(Debug, Clone)]
pub struct StarLayers {
    pub surface_material: Handle<StandardMaterial>,
    pub corona: Entity,
    pub corona_material: Handle<StandardMaterial>,
    pub base_emissive: LinearRgba,
}

/// Layers owned by a planet. Optional layers only exist when the catalog asks for them.
#[derive(Debug, Clone)]
pub struct PlanetLayers {
    pub surface_material: Handle<StandardMaterial>,
    pub atmosphere_material: Option<Handle<StandardMaterial>>,
    /// Mantle then core.
    pub interior: Option<[Entity; 2]>,
    pub heatmap: Option<Entity>,
}

/// Closed set of body visuals. Each variant knows which layers it owns.
#[derive(Debug, Clone)]
pub enum BodyVisual {
    Star(StarLayers),
    Planet(PlanetLayers),
    Moon,
    Belt,
}

/// Per-body visual controller, attached to the body's root entity.
///
/// `spinner` is the child carrying every rotating layer; moons hang off the
/// root instead so self-rotation never drags them along.
#[derive(Component, Debug, Clone)]
pub struct BodyController {
    pub id: BodyId,
    pub spinner: Entity,
    pub spin_rate: f32,
    pub axial_tilt: f32,
    pub visual: BodyVisual,
}

/// Resolved appearance of a planet's layers for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerState {
    pub surface_alpha: f32,
    pub atmosphere_alpha: f32,
    pub interior_visible: bool,
    pub heatmap_visible: bool,
}

/// Structural mode suppresses every heatmap; only the selected body opens
/// its cut-away. The heatmap applies to any body that has one otherwise.
pub fn resolve_layers(modes: VisualModes, is_selected: bool) -> LayerState {
    let structural_mode = modes.contains(VisualMode::Structural);
    let structural = structural_mode && is_selected;
    let heatmap = modes.contains(VisualMode::Heatmap) && !structural_mode;

    if structural {
        LayerState {
            surface_alpha: SURFACE_ALPHA_STRUCTURAL,
            atmosphere_alpha: ATMOSPHERE_ALPHA_STRUCTURAL,
            interior_visible: true,
            heatmap_visible: false,
        }
    } else if heatmap {
        LayerState {
            surface_alpha: SURFACE_ALPHA_HEATMAP,
            atmosphere_alpha: ATMOSPHERE_ALPHA_HEATMAP,
            interior_visible: false,
            heatmap_visible: true,
        }
    } else {
        LayerState {
            surface_alpha: 1.0,
            atmosphere_alpha: ATMOSPHERE_ALPHA_NORMAL,
            interior_visible: false,
            heatmap_visible: false,
        }
    }
}

/// Absolute self-rotation, so running time backwards unwinds the spin.
pub fn spin_rotation(sim_time: f32, spin_rate: f32, axial_tilt: f32) -> Quat {
    let angle = (sim_time * spin_rate).rem_euclid(TAU);
    Quat::from_rotation_z(axial_tilt) * Quat::from_rotation_y(angle)
}

/// Corona scale and opacity for a flare intensity multiplier.
pub fn corona_pulse(sim_time: f32, flare_intensity: f32) -> (f32, f32) {
    let scale = (CORONA_PULSE_BASE
        + (sim_time * CORONA_PULSE_FREQUENCY).sin() * CORONA_PULSE_AMPLITUDE)
        * flare_intensity;
    let alpha = ((CORONA_ALPHA_BASE
        + (sim_time * CORONA_ALPHA_FREQUENCY).sin() * CORONA_ALPHA_AMPLITUDE)
        * flare_intensity)
        .clamp(0.0, 1.0);
    (scale, alpha)
}

impl BodyController {
    pub fn rotate(&self, sim_time: f32, transforms: &mut Query<&mut Transform>) {
        if let Ok(mut transform) = transforms.get_mut(self.spinner) {
            transform.rotation = spin_rotation(sim_time, self.spin_rate, self.axial_tilt);
        }
    }

    /// Apply mode-driven layer changes to the owned subtree only.
    pub fn apply_visual_mode(
        &self,
        sim_time: f32,
        modes: VisualModes,
        is_selected: bool,
        flare_intensity: f32,
        transforms: &mut Query<&mut Transform>,
        visibility: &mut Query<&mut Visibility>,
        materials: &mut Assets<StandardMaterial>,
    ) {
        match &self.visual {
            BodyVisual::Star(star) => {
                let (scale, alpha) = corona_pulse(sim_time, flare_intensity);
                if let Ok(mut transform) = transforms.get_mut(star.corona) {
                    transform.scale = Vec3::splat(scale);
                }
                set_alpha(materials, &star.corona_material, alpha);
                let emissive = star.base_emissive * (STAR_EMISSIVE_STRENGTH * flare_intensity);
                if let Some(material) = materials.get(&star.surface_material) {
                    if material.emissive != emissive {
                        if let Some(material) = materials.get_mut(&star.surface_material) {
                            material.emissive = emissive;
                        }
                    }
                }
            }
            BodyVisual::Planet(planet) => {
                let layers = resolve_layers(modes, is_selected);
                set_alpha(materials, &planet.surface_material, layers.surface_alpha);
                if let Some(atmosphere) = &planet.atmosphere_material {
                    set_alpha(materials, atmosphere, layers.atmosphere_alpha);
                }
                if let Some(interior) = planet.interior {
                    for layer in interior {
                        set_visible(visibility, layer, layers.interior_visible);
                    }
                }
                if let Some(heatmap) = planet.heatmap {
                    set_visible(visibility, heatmap, layers.heatmap_visible);
                }
            }
            BodyVisual::Moon | BodyVisual::Belt => {}
        }
    }
}

/// Write a material's alpha only when it changed, switching blend mode with it.
pub fn set_alpha(materials: &mut Assets<StandardMaterial>, handle: &Handle<StandardMaterial>, alpha: f32) {
    let Some(material) = materials.get(handle) else {
        return;
    };
    if (material.base_color.alpha() - alpha).abs() < f32::EPSILON {
        return;
    }
    if let Some(material) = materials.get_mut(handle) {
        material.base_color.set_alpha(alpha);
        let blended = alpha < 1.0;
        if blended && material.alpha_mode == AlphaMode::Opaque {
            material.alpha_mode = AlphaMode::Blend;
        } else if !blended && material.alpha_mode == AlphaMode::Blend {
            material.alpha_mode = AlphaMode::Opaque;
        }
    }
}

pub fn set_visible(visibility: &mut Query<&mut Visibility>, entity: Entity, visible: bool) {
    if let Ok(mut current) = visibility.get_mut(entity) {
        let target = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        current.set_if_neq(target);
    }
}

/// Frame step for every body: spin, then mode-driven layers.
pub fn update_body_visuals(
    clock: Res<SimulationClock>,
    snapshot: Res<FrameSnapshot>,
    weather: Res<SpaceWeather>,
    controllers: Query<&BodyController>,
    mut transforms: Query<&mut Transform>,
    mut visibility: Query<&mut Visibility>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let state = &snapshot.state;
    let flare_intensity = weather.flare_intensity();

    for controller in &controllers {
        controller.rotate(clock.sim_time, &mut transforms);
        controller.apply_visual_mode(
            clock.sim_time,
            state.visual_modes,
            state.is_selected(&controller.id),
            flare_intensity,
            &mut transforms,
            &mut visibility,
            &mut materials,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_needs_selection() {
        let modes = VisualModes::empty().with(VisualMode::Structural);
        let unselected = resolve_layers(modes, false);
        assert!(!unselected.interior_visible);
        assert_eq!(unselected.surface_alpha, 1.0);

        let selected = resolve_layers(modes, true);
        assert!(selected.interior_visible);
        assert_eq!(selected.surface_alpha, SURFACE_ALPHA_STRUCTURAL);
    }

    #[test]
    fn test_structural_beats_heatmap_on_selected_body() {
        let modes = VisualModes::empty()
            .with(VisualMode::Structural)
            .with(VisualMode::Heatmap);

        let selected = resolve_layers(modes, true);
        assert!(selected.interior_visible);
        assert!(!selected.heatmap_visible);

        let other = resolve_layers(modes, false);
        assert!(!other.interior_visible);
        assert!(!other.heatmap_visible);
        assert_eq!(other.surface_alpha, 1.0);
    }

    #[test]
    fn test_heatmap_alone_shows_on_every_body() {
        let modes = VisualModes::empty().with(VisualMode::Heatmap);
        for selected in [true, false] {
            let layers = resolve_layers(modes, selected);
            assert!(layers.heatmap_visible);
            assert!(!layers.interior_visible);
            assert_eq!(layers.surface_alpha, SURFACE_ALPHA_HEATMAP);
        }
    }

    #[test]
    fn test_no_modes_is_fully_opaque() {
        let layers = resolve_layers(VisualModes::empty(), true);
        assert_eq!(layers.surface_alpha, 1.0);
        assert_eq!(layers.atmosphere_alpha, ATMOSPHERE_ALPHA_NORMAL);
        assert!(!layers.heatmap_visible);
    }

    #[test]
    fn test_spin_is_absolute_and_reversible() {
        let forward = spin_rotation(12.0, 0.036, 0.4);
        let again = spin_rotation(12.0, 0.036, 0.4);
        assert_eq!(forward, again);
        let origin = spin_rotation(0.0, 0.036, 0.4);
        assert!(origin.abs_diff_eq(Quat::from_rotation_z(0.4), 1e-6));
    }

    #[test]
    fn test_corona_scales_with_flare() {
        let (calm, calm_alpha) = corona_pulse(0.0, 1.0);
        let (flare, flare_alpha) = corona_pulse(0.0, 1.8);
        assert!((calm - CORONA_PULSE_BASE).abs() < 1e-6);
        assert!((flare - CORONA_PULSE_BASE * 1.8).abs() < 1e-6);
        assert!(flare_alpha > calm_alpha);
        assert!(flare_alpha <= 1.0);
    }
}
