use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;

use crate::engine::core::error::SceneBuildError;

/// Scene catalog baked into the binary so construction never waits on I/O.
const EMBEDDED_CATALOG: &str = include_str!("../../../assets/data/solar_system.json");

/// Broad role of a top-level catalog body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyClass {
    Star,
    Planet,
    Belt,
}

/// Recipe used by the procedural surface generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStyle {
    Stellar,
    Cratered,
    Veiled,
    Oceanic,
    Dusty,
    Banded,
    Icy,
}

/// Mantle and core radii as fractions of the body radius.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InteriorSpec {
    pub mantle: f32,
    pub core: f32,
}

/// Ring inner and outer radii as multiples of the body radius.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RingSpec {
    pub inner: f32,
    pub outer: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoonSpec {
    pub name: String,
    pub radius: f32,
    pub distance: f32,
    pub speed: f32,
    pub colour: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub kind: BodyClass,
    pub distance: f32,
    pub speed: f32,
    pub radius: f32,
    pub spin_rate: f32,
    #[serde(default)]
    pub axial_tilt: f32,
    pub colour: String,
    pub surface: SurfaceStyle,
    #[serde(default)]
    pub interior: Option<InteriorSpec>,
    #[serde(default)]
    pub heatmap: bool,
    #[serde(default)]
    pub atmosphere: Option<String>,
    #[serde(default)]
    pub rings: Option<RingSpec>,
    #[serde(default)]
    pub gravity_mass: Option<f32>,
    /// Optional photographic surface, relative to the asset root.
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub moons: Vec<MoonSpec>,
}

impl BodySpec {
    /// Mass fed to the spacetime grid when this body is selected.
    pub fn gravity_mass(&self) -> f32 {
        self.gravity_mass.unwrap_or(self.radius * 2.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissionSpec {
    pub name: String,
    pub agency: String,
    pub colour: String,
    pub target: String,
    pub launch: String,
    pub status: String,
    #[serde(default)]
    pub path: Option<Vec<[f32; 3]>>,
}

impl MissionSpec {
    /// Control points, or `None` when the mission cannot be placed in 3D.
    pub fn control_points(&self) -> Option<Vec<Vec3>> {
        let path = self.path.as_ref()?;
        if path.len() < 2 {
            return None;
        }
        Some(path.iter().map(|p| Vec3::from_array(*p)).collect())
    }
}

/// Static list of bodies and missions with their orbital parameters.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct SolarSystemCatalog {
    pub bodies: Vec<BodySpec>,
    #[serde(default)]
    pub missions: Vec<MissionSpec>,
}

impl SolarSystemCatalog {
    pub fn embedded() -> Result<Self, SceneBuildError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, SceneBuildError> {
        let catalog: SolarSystemCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn star(&self) -> Option<&BodySpec> {
        self.bodies.iter().find(|b| b.kind == BodyClass::Star)
    }

    pub fn body(&self, name: &str) -> Option<&BodySpec> {
        self.bodies.iter().find(|b| b.name == name)
    }

    fn validate(&self) -> Result<(), SceneBuildError> {
        let mut stars = self.bodies.iter().filter(|b| b.kind == BodyClass::Star);
        if stars.next().is_none() {
            return Err(SceneBuildError::MissingStar);
        }
        if let Some(extra) = stars.next() {
            return Err(SceneBuildError::MultipleStars(extra.name.clone()));
        }

        let mut seen = HashSet::new();
        let mut claim = |name: &str| {
            if seen.insert(name.to_string()) {
                Ok(())
            } else {
                Err(SceneBuildError::DuplicateBody(name.to_string()))
            }
        };

        for body in &self.bodies {
            claim(&body.name)?;
            check_parameter(&body.name, "radius", body.radius)?;
            check_parameter(&body.name, "distance", body.distance)?;
            check_finite(&body.name, "speed", body.speed)?;
            check_finite(&body.name, "spin_rate", body.spin_rate)?;
            check_finite(&body.name, "axial_tilt", body.axial_tilt)?;
            if let Some(mass) = body.gravity_mass {
                check_parameter(&body.name, "gravity_mass", mass)?;
            }
            if let Some(interior) = body.interior {
                // Nested shells: 0 < core <= mantle <= 1.
                if !(interior.core > 0.0 && interior.core <= interior.mantle && interior.mantle <= 1.0) {
                    return Err(SceneBuildError::InvalidParameter {
                        body: body.name.clone(),
                        field: "interior",
                    });
                }
            }
            if let Some(rings) = body.rings {
                if !(rings.inner > 0.0 && rings.inner < rings.outer && rings.outer.is_finite()) {
                    return Err(SceneBuildError::InvalidParameter {
                        body: body.name.clone(),
                        field: "rings",
                    });
                }
            }
            parse_colour(&body.name, &body.colour)?;
            if let Some(atmosphere) = &body.atmosphere {
                parse_colour(&body.name, atmosphere)?;
            }

            for moon in &body.moons {
                claim(&moon.name)?;
                check_parameter(&moon.name, "radius", moon.radius)?;
                check_parameter(&moon.name, "distance", moon.distance)?;
                check_finite(&moon.name, "speed", moon.speed)?;
                parse_colour(&moon.name, &moon.colour)?;
            }
        }

        for mission in &self.missions {
            claim(&mission.name)?;
            parse_colour(&mission.name, &mission.colour)?;
            if let Some(points) = &mission.path {
                if points.iter().flatten().any(|c| !c.is_finite()) {
                    return Err(SceneBuildError::InvalidParameter {
                        body: mission.name.clone(),
                        field: "path",
                    });
                }
            }
        }

        Ok(())
    }
}

fn check_parameter(body: &str, field: &'static str, value: f32) -> Result<(), SceneBuildError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneBuildError::InvalidParameter {
            body: body.to_string(),
            field,
        })
    }
}

/// Orbital and spin rates may run backwards but must be numbers.
fn check_finite(body: &str, field: &'static str, value: f32) -> Result<(), SceneBuildError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SceneBuildError::InvalidParameter {
            body: body.to_string(),
            field,
        })
    }
}

/// Parse a `#rrggbb` catalog colour.
pub fn parse_colour(body: &str, value: &str) -> Result<Color, SceneBuildError> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|_| SceneBuildError::InvalidColour {
            body: body.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = SolarSystemCatalog::embedded().unwrap();
        let star = catalog.star().unwrap();
        assert_eq!(star.name, "Sun");
        assert_eq!(star.gravity_mass(), 30.0);

        let mars = catalog.body("Mars").unwrap();
        assert_eq!(mars.distance, 85.0);
        assert_eq!(mars.speed, 0.45);
    }

    #[test]
    fn test_embedded_catalog_has_placeable_missions() {
        let catalog = SolarSystemCatalog::embedded().unwrap();
        let placeable = catalog
            .missions
            .iter()
            .filter(|m| m.control_points().is_some())
            .count();
        assert!(placeable > 0);
        assert!(placeable < catalog.missions.len());
    }

    #[test]
    fn test_missing_star_is_rejected() {
        let json = r##"{"bodies":[{"name":"Rock","kind":"planet","distance":10,"speed":1,
            "radius":1,"spin_rate":0.1,"colour":"#ffffff","surface":"cratered"}]}"##;
        assert!(matches!(
            SolarSystemCatalog::from_json(json),
            Err(SceneBuildError::MissingStar)
        ));
    }

    #[test]
    fn test_duplicate_moon_name_is_rejected() {
        let json = r##"{"bodies":[
            {"name":"Sun","kind":"star","distance":0,"speed":0,"radius":8,"spin_rate":0,
             "colour":"#ffcc00","surface":"stellar"},
            {"name":"Rock","kind":"planet","distance":10,"speed":1,"radius":1,"spin_rate":0.1,
             "colour":"#ffffff","surface":"cratered",
             "moons":[{"name":"Sun","radius":0.1,"distance":2,"speed":1,"colour":"#aaaaaa"}]}
        ]}"##;
        assert!(matches!(
            SolarSystemCatalog::from_json(json),
            Err(SceneBuildError::DuplicateBody(name)) if name == "Sun"
        ));
    }

    fn with_planet(planet_fields: &str) -> String {
        format!(
            r##"{{"bodies":[
            {{"name":"Sun","kind":"star","distance":0,"speed":0,"radius":8,"spin_rate":0,
             "colour":"#ffcc00","surface":"stellar"}},
            {{"name":"Rock","kind":"planet","distance":10,"speed":1,"radius":1,"spin_rate":0.1,
             "colour":"#ffffff","surface":"cratered",{planet_fields}}}
        ]}}"##
        )
    }

    fn rejected_field(json: &str) -> Option<&'static str> {
        match SolarSystemCatalog::from_json(json) {
            Err(SceneBuildError::InvalidParameter { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_negative_gravity_mass_is_rejected() {
        assert_eq!(
            rejected_field(&with_planet(r#""gravity_mass":-4"#)),
            Some("gravity_mass")
        );
        assert!(SolarSystemCatalog::from_json(&with_planet(r#""gravity_mass":4"#)).is_ok());
    }

    #[test]
    fn test_out_of_range_interior_is_rejected() {
        assert_eq!(
            rejected_field(&with_planet(r#""interior":{"mantle":0.5,"core":0.8}"#)),
            Some("interior")
        );
        assert_eq!(
            rejected_field(&with_planet(r#""interior":{"mantle":1.5,"core":0.2}"#)),
            Some("interior")
        );
        assert_eq!(
            rejected_field(&with_planet(r#""rings":{"inner":2.0,"outer":1.0}"#)),
            Some("rings")
        );
    }

    #[test]
    fn test_non_finite_moon_speed_is_rejected() {
        // JSON has no NaN literal; 1e39 overflows f32 to infinity.
        let moon = r##""moons":[{"name":"Pebble","radius":0.1,"distance":2,"speed":1e39,"colour":"#aaaaaa"}]"##;
        assert_eq!(rejected_field(&with_planet(moon)), Some("speed"));
    }

    #[test]
    fn test_bad_colour_is_rejected() {
        let json = r##"{"bodies":[{"name":"Sun","kind":"star","distance":0,"speed":0,
            "radius":8,"spin_rate":0,"colour":"yellow","surface":"stellar"}]}"##;
        assert!(matches!(
            SolarSystemCatalog::from_json(json),
            Err(SceneBuildError::InvalidColour { .. })
        ));
    }

    #[test]
    fn test_gravity_mass_defaults_to_twice_radius() {
        let catalog = SolarSystemCatalog::embedded().unwrap();
        let jupiter = catalog.body("Jupiter").unwrap();
        assert_eq!(jupiter.gravity_mass(), jupiter.radius * 2.0);
    }
}
