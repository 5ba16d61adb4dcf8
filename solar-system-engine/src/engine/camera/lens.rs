use bevy::prelude::*;
use bevy::render::view::{ColorGrading, ColorGradingGlobal, ColorGradingSection};

use super::orbit_controls::MainCamera;
use crate::engine::state::view_state::{FrameSnapshot, LensMode};

/// Colour grading for a lens. Purely cosmetic, applied to the whole frame.
pub fn lens_grading(lens: LensMode) -> ColorGrading {
    match lens {
        LensMode::Normal => ColorGrading::default(),
        LensMode::Thermal => ColorGrading::with_identical_sections(
            ColorGradingGlobal {
                temperature: 0.9,
                tint: 0.3,
                hue: -0.3,
                post_saturation: 1.6,
                ..default()
            },
            ColorGradingSection {
                contrast: 1.3,
                ..default()
            },
        ),
        LensMode::XRay => ColorGrading::with_identical_sections(
            ColorGradingGlobal {
                temperature: -0.8,
                post_saturation: 0.0,
                exposure: 0.4,
                ..default()
            },
            ColorGradingSection {
                contrast: 1.6,
                gamma: 0.8,
                ..default()
            },
        ),
        LensMode::Retro => ColorGrading::with_identical_sections(
            ColorGradingGlobal {
                temperature: 0.4,
                tint: 0.1,
                post_saturation: 0.55,
                ..default()
            },
            ColorGradingSection {
                contrast: 0.85,
                lift: 0.05,
                ..default()
            },
        ),
    }
}

pub fn apply_lens(
    snapshot: Res<FrameSnapshot>,
    mut applied: Local<Option<LensMode>>,
    mut cameras: Query<&mut ColorGrading, With<MainCamera>>,
) {
    let lens = snapshot.state.lens;
    if *applied == Some(lens) {
        return;
    }
    let Ok(mut grading) = cameras.single_mut() else {
        return;
    };
    *grading = lens_grading(lens);
    *applied = Some(lens);
    debug!("Lens set to {}", lens.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xray_drops_saturation() {
        assert_eq!(lens_grading(LensMode::XRay).global.post_saturation, 0.0);
        assert_eq!(lens_grading(LensMode::Normal).global.post_saturation, 1.0);
    }
}
