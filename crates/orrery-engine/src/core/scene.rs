use std::collections::HashMap;

use glam::{DVec2, Vec2};

use crate::api::settings::Settings;
use crate::api::simulation::{EngineConfig, Simulation};
use crate::api::types::{BodyRef, MoonId, PlanetId, StarId};
use crate::assets::catalog::Catalog;
use crate::components::body::{Moon, Orbit, Planet, Star};
use crate::components::ring::{Ring, RingAnchor};
use crate::core::rng::Rng;
use crate::error::SetupError;
use crate::renderer::camera::Camera;
use crate::renderer::traits::Surface;

/// Scene registry: every body and ring of one star system.
///
/// Stars, planets and moons share a single name space. Iteration order is
/// insertion order: stars, then planets, then moons. An empty registry (the
/// catalog has not arrived yet) updates and draws nothing.
pub struct Solarsystem {
    stars: Vec<Star>,
    planets: Vec<Planet>,
    moons: Vec<Moon>,
    rings: Vec<Ring>,
    names: HashMap<String, BodyRef>,
    camera: Camera,
    ring_seed: u64,
}

impl Solarsystem {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            stars: Vec::new(),
            planets: Vec::new(),
            moons: Vec::new(),
            rings: Vec::new(),
            names: HashMap::new(),
            camera: Camera::new(config.viewport_width, config.viewport_height),
            ring_seed: config.ring_seed,
        }
    }

    /// Populate the registry from a catalog: stars, then planets, then moons,
    /// then rings, each resolved against what already exists.
    ///
    /// All-or-nothing: on error the registry keeps its previous contents.
    pub fn setup(&mut self, catalog: &Catalog, settings: &Settings) -> Result<(), SetupError> {
        let mut stars = Vec::with_capacity(catalog.stars.len());
        let mut planets = Vec::with_capacity(catalog.planets.len());
        let mut moons = Vec::with_capacity(catalog.moons.len());
        let mut rings = Vec::with_capacity(catalog.rings.len());
        let mut names = HashMap::with_capacity(catalog.body_count());

        let mut claim = |name: &str, body: BodyRef| -> Result<(), SetupError> {
            if names.insert(name.to_string(), body).is_some() {
                return Err(SetupError::DuplicateName(name.to_string()));
            }
            Ok(())
        };

        for desc in &catalog.stars {
            let id = StarId(stars.len());
            claim(&desc.name, BodyRef::Star(id))?;
            let pos = DVec2::new(desc.center.x, desc.center.y);
            stars.push(Star::new(&desc.name, pos, desc.radius_size, desc.color));
        }

        for desc in &catalog.planets {
            check_rotation_time(&desc.name, desc.rotation_time)?;
            let star_id = match star_index(&stars, &desc.star) {
                Some(i) => StarId(i),
                None => {
                    return Err(SetupError::UnknownStar {
                        planet: desc.name.clone(),
                        star: desc.star.clone(),
                    })
                }
            };
            let id = PlanetId(planets.len());
            claim(&desc.name, BodyRef::Planet(id))?;
            let orbit = Orbit {
                radius_rot: desc.radius_rot,
                radius_size: desc.radius_size,
                rotation_time: desc.rotation_time,
                retrograde: desc.retrograde,
            };
            planets.push(Planet::new(
                &desc.name,
                (star_id, &stars[star_id.0]),
                orbit,
                desc.color,
                settings,
            ));
        }

        for desc in &catalog.moons {
            check_rotation_time(&desc.name, desc.rotation_time)?;
            let planet_id = match planets.iter().position(|p: &Planet| p.name == desc.planet) {
                Some(i) => PlanetId(i),
                None => {
                    return Err(SetupError::UnknownPlanet {
                        moon: desc.name.clone(),
                        planet: desc.planet.clone(),
                    })
                }
            };
            let id = MoonId(moons.len());
            claim(&desc.name, BodyRef::Moon(id))?;
            let orbit = Orbit {
                radius_rot: desc.radius_rot,
                radius_size: desc.radius_size,
                rotation_time: desc.rotation_time,
                retrograde: desc.retrograde,
            };
            moons.push(Moon::new(
                &desc.name,
                (planet_id, &planets[planet_id.0]),
                orbit,
                desc.color,
                settings,
            ));
        }

        let mut rng = Rng::new(self.ring_seed);
        for desc in &catalog.rings {
            let (min, max) = (desc.min_radius, desc.max_radius);
            if !(min.is_finite() && max.is_finite() && min >= 0.0 && max >= min) {
                return Err(SetupError::InvalidRingSpan {
                    anchor: desc.anchor.clone(),
                    min,
                    max,
                });
            }
            let ring = if let Some(i) = planets.iter().position(|p: &Planet| p.name == desc.anchor) {
                Ring::around_planet(PlanetId(i), min, max, desc.color)
            } else if let Some(i) = star_index(&stars, &desc.anchor) {
                Ring::around_star(StarId(i), min, max, desc.color, &mut rng)
            } else {
                return Err(SetupError::UnknownAnchor(desc.anchor.clone()));
            };
            rings.push(ring);
        }

        log::info!(
            "solarsystem: {} stars, {} planets, {} moons, {} rings",
            stars.len(),
            planets.len(),
            moons.len(),
            rings.len()
        );

        self.stars = stars;
        self.planets = planets;
        self.moons = moons;
        self.rings = rings;
        self.names = names;
        Ok(())
    }

    /// Parse a catalog document and set up from it.
    pub fn setup_json(&mut self, json: &str, settings: &Settings) -> Result<(), SetupError> {
        let catalog = Catalog::from_json(json)?;
        self.setup(&catalog, settings)
    }

    /// Advance every planet, then every moon, so moons read their planet's
    /// position from the same tick.
    pub fn update(&mut self, dt: f64, settings: &Settings) {
        for planet in &mut self.planets {
            let star_pos = self.stars[planet.star.0].pos;
            planet.update(dt, star_pos, settings);
        }
        for moon in &mut self.moons {
            let planet_pos = self.planets[moon.planet.0].pos;
            moon.update(dt, planet_pos, settings);
        }
    }

    /// Draw one frame.
    ///
    /// A resolvable `focus` overwrites the camera offset first; the offset is
    /// then read once and used for every body. Paint order is stars, planets,
    /// moons, rings.
    pub fn output(&self, settings: &mut Settings, surface: &mut dyn Surface) {
        let focused = if settings.has_focus() {
            self.position_of(&settings.focus)
        } else {
            None
        };
        if let Some(pos) = focused {
            let offset = self.camera.focus_offset(pos);
            settings.offset_x = offset.x;
            settings.offset_y = offset.y;
        }

        let settings: &Settings = settings;
        let offset = DVec2::new(settings.offset_x, settings.offset_y);

        surface.clear(Vec2::ZERO, self.camera.size().as_vec2());

        for star in &self.stars {
            star.draw(settings, offset, surface);
        }
        for planet in &self.planets {
            let star_size = self.stars[planet.star.0].size(settings);
            planet.draw(star_size, settings, offset, surface);
        }
        for moon in &self.moons {
            let planet = &self.planets[moon.planet.0];
            let star_size = self.stars[planet.star.0].size(settings);
            moon.draw(planet, star_size, settings, offset, surface);
        }
        for ring in &self.rings {
            let (pos, size) = match ring.anchor {
                RingAnchor::Star(id) => {
                    let star = &self.stars[id.0];
                    (star.pos, star.size(settings))
                }
                RingAnchor::Planet(id) => {
                    let planet = &self.planets[id.0];
                    (planet.pos, planet.size(settings))
                }
            };
            ring.draw(pos, size, settings, offset, surface);
        }
    }

    /// Name of the body whose bounding box (`pos ± size`, exclusive) contains
    /// `point`. Every body is tested in registry order and a later match
    /// replaces an earlier one, so under overlap the last body wins.
    pub fn find_object(&self, point: DVec2, settings: &Settings) -> Option<&str> {
        let contains = |pos: DVec2, size: f64| {
            point.x < pos.x + size
                && point.x > pos.x - size
                && point.y < pos.y + size
                && point.y > pos.y - size
        };

        let mut found = None;
        for star in &self.stars {
            if contains(star.pos, star.size(settings)) {
                found = Some(star.name.as_str());
            }
        }
        for planet in &self.planets {
            if contains(planet.pos, planet.size(settings)) {
                found = Some(planet.name.as_str());
            }
        }
        for moon in &self.moons {
            if contains(moon.pos, moon.size(settings)) {
                found = Some(moon.name.as_str());
            }
        }
        found
    }

    /// Resolve a body name. Empty and unknown names resolve to `None`.
    pub fn lookup(&self, name: &str) -> Option<BodyRef> {
        self.names.get(name).copied()
    }

    /// Current position of the named body.
    pub fn position_of(&self, name: &str) -> Option<DVec2> {
        Some(match self.lookup(name)? {
            BodyRef::Star(id) => self.stars[id.0].pos,
            BodyRef::Planet(id) => self.planets[id.0].pos,
            BodyRef::Moon(id) => self.moons[id.0].pos,
        })
    }

    /// Every body name in registry order, e.g. for a focus menu.
    pub fn body_names(&self) -> Vec<&str> {
        self.stars
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.planets.iter().map(|p| p.name.as_str()))
            .chain(self.moons.iter().map(|m| m.name.as_str()))
            .collect()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn moons(&self) -> &[Moon] {
        &self.moons
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn planet(&self, name: &str) -> Option<&Planet> {
        match self.lookup(name)? {
            BodyRef::Planet(id) => Some(&self.planets[id.0]),
            _ => None,
        }
    }

    pub fn moon(&self, name: &str) -> Option<&Moon> {
        match self.lookup(name)? {
            BodyRef::Moon(id) => Some(&self.moons[id.0]),
            _ => None,
        }
    }

    /// Number of named bodies.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Track a host viewport resize.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.camera.resize(width, height);
    }
}

fn star_index(stars: &[Star], name: &str) -> Option<usize> {
    stars.iter().position(|s| s.name == name)
}

fn check_rotation_time(name: &str, value: f64) -> Result<(), SetupError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidRotationTime {
            name: name.to_string(),
            value,
        })
    }
}

impl Default for Solarsystem {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Simulation for Solarsystem {
    fn update(&mut self, dt: f64, settings: &Settings) {
        Solarsystem::update(self, dt, settings);
    }

    fn output(&self, settings: &mut Settings, surface: &mut dyn Surface) {
        Solarsystem::output(self, settings, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::{DrawCommand, RecordingSurface};

    const CATALOG: &str = r#"{
        "stars": [ { "name": "Sol", "center": { "x": 0, "y": 0 }, "radiusSize": 10 } ],
        "planets": [
            { "name": "Terra", "star": "Sol", "radiusRot": 100, "radiusSize": 4, "rotationTime": 10 },
            { "name": "Ares", "star": "Sol", "radiusRot": 200, "radiusSize": 3, "rotationTime": 20, "retrograde": true }
        ],
        "moons": [
            { "name": "Luna", "planet": "Terra", "radiusRot": 15, "radiusSize": 1, "rotationTime": 2 }
        ],
        "rings": [
            { "anchor": "Ares", "minRadius": 2, "maxRadius": 6 },
            { "anchor": "Sol", "minRadius": 120, "maxRadius": 160 }
        ]
    }"#;

    fn system(settings: &Settings) -> Solarsystem {
        let mut sys = Solarsystem::default();
        sys.setup_json(CATALOG, settings).unwrap();
        sys
    }

    #[test]
    fn setup_resolves_hierarchy() {
        let settings = Settings::default();
        let sys = system(&settings);
        assert_eq!(sys.len(), 4);
        assert_eq!(sys.body_names(), vec!["Sol", "Terra", "Ares", "Luna"]);
        assert_eq!(sys.moon("Luna").unwrap().planet, PlanetId(0));
        assert_eq!(sys.rings()[0].anchor, RingAnchor::Planet(PlanetId(1)));
        assert_eq!(sys.rings()[1].anchor, RingAnchor::Star(StarId(0)));
        assert_eq!(sys.position_of("Terra"), Some(DVec2::new(100.0, 0.0)));
        assert_eq!(sys.position_of("Luna"), Some(DVec2::new(115.0, 0.0)));
    }

    #[test]
    fn ring_anchor_prefers_planet() {
        let json = r#"{
            "stars": [ { "name": "Twin", "radiusSize": 1 } ],
            "planets": [ { "name": "Other", "star": "Twin", "radiusRot": 50, "radiusSize": 2, "rotationTime": 1 } ],
            "rings": [ { "anchor": "Other", "minRadius": 1, "maxRadius": 2 } ]
        }"#;
        let mut sys = Solarsystem::default();
        sys.setup_json(json, &Settings::default()).unwrap();
        assert!(matches!(sys.rings()[0].anchor, RingAnchor::Planet(_)));
    }

    #[test]
    fn missing_parent_is_rejected() {
        let settings = Settings::default();
        let mut sys = Solarsystem::default();

        let orphan_planet = r#"{ "planets": [ { "name": "P", "star": "Nope", "radiusRot": 1, "radiusSize": 1, "rotationTime": 1 } ] }"#;
        assert!(matches!(
            sys.setup_json(orphan_planet, &settings),
            Err(SetupError::UnknownStar { .. })
        ));

        let orphan_moon = r#"{ "moons": [ { "name": "M", "planet": "Nope", "radiusRot": 1, "radiusSize": 1, "rotationTime": 1 } ] }"#;
        assert!(matches!(
            sys.setup_json(orphan_moon, &settings),
            Err(SetupError::UnknownPlanet { .. })
        ));

        let orphan_ring = r#"{ "rings": [ { "anchor": "Nope", "minRadius": 1, "maxRadius": 2 } ] }"#;
        assert!(matches!(
            sys.setup_json(orphan_ring, &settings),
            Err(SetupError::UnknownAnchor(_))
        ));
        assert!(sys.is_empty());
    }

    #[test]
    fn failed_setup_keeps_previous_registry() {
        let settings = Settings::default();
        let mut sys = system(&settings);
        let bad = r#"{ "stars": [ { "name": "A", "radiusSize": 1 }, { "name": "A", "radiusSize": 1 } ] }"#;
        assert!(matches!(sys.setup_json(bad, &settings), Err(SetupError::DuplicateName(n)) if n == "A"));
        assert_eq!(sys.len(), 4);
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let json = r#"{
            "stars": [ { "name": "Dup", "radiusSize": 1 } ],
            "planets": [ { "name": "Dup", "star": "Dup", "radiusRot": 5, "radiusSize": 1, "rotationTime": 1 } ]
        }"#;
        let mut sys = Solarsystem::default();
        assert!(matches!(
            sys.setup_json(json, &Settings::default()),
            Err(SetupError::DuplicateName(_))
        ));
    }

    #[test]
    fn non_positive_rotation_time_is_rejected() {
        let json = r#"{
            "stars": [ { "name": "S", "radiusSize": 1 } ],
            "planets": [ { "name": "P", "star": "S", "radiusRot": 5, "radiusSize": 1, "rotationTime": 0 } ]
        }"#;
        let mut sys = Solarsystem::default();
        assert!(matches!(
            sys.setup_json(json, &Settings::default()),
            Err(SetupError::InvalidRotationTime { .. })
        ));
    }

    #[test]
    fn inverted_ring_is_rejected() {
        let json = r#"{
            "stars": [ { "name": "S", "radiusSize": 1 } ],
            "rings": [ { "anchor": "S", "minRadius": 5, "maxRadius": 1 } ]
        }"#;
        let mut sys = Solarsystem::default();
        assert!(matches!(
            sys.setup_json(json, &Settings::default()),
            Err(SetupError::InvalidRingSpan { .. })
        ));
    }

    #[test]
    fn bad_json_is_rejected() {
        let mut sys = Solarsystem::default();
        assert!(matches!(
            sys.setup_json("{ not json", &Settings::default()),
            Err(SetupError::Json(_))
        ));
    }

    #[test]
    fn star_never_moves() {
        let settings = Settings::default();
        let mut sys = system(&settings);
        let before = sys.stars()[0].pos;
        for _ in 0..600 {
            sys.update(1.0 / 60.0, &settings);
        }
        assert_eq!(sys.stars()[0].pos, before);
    }

    #[test]
    fn moon_tracks_planet_within_tick() {
        let settings = Settings::default();
        let mut sys = system(&settings);
        for _ in 0..37 {
            sys.update(1.0 / 60.0, &settings);
            let terra = sys.planet("Terra").unwrap();
            let luna = sys.moon("Luna").unwrap();
            assert!((luna.pos.distance(terra.pos) - 15.0).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let mut settings = Settings::default();
        let mut sys = Solarsystem::default();
        sys.update(1.0 / 60.0, &settings);
        let mut surface = RecordingSurface::new();
        sys.output(&mut settings, &mut surface);
        assert_eq!(surface.commands().len(), 1);
        assert!(matches!(surface.commands()[0], DrawCommand::Clear { .. }));
        assert_eq!(sys.find_object(DVec2::ZERO, &settings), None);
    }

    #[test]
    fn focus_recentres_camera_before_drawing() {
        let mut settings = Settings::default();
        settings.focus = "Terra".into();
        settings.offset_x = -999.0;
        let sys = system(&settings);
        let mut surface = RecordingSurface::new();
        sys.output(&mut settings, &mut surface);

        // Terra at (100, 0), viewport 800x600.
        assert_eq!(settings.offset_x, 100.0 - 400.0);
        assert_eq!(settings.offset_y, -300.0);

        let translates: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Translate { delta } => Some(*delta),
                _ => None,
            })
            .collect();
        assert!(!translates.is_empty());
        assert!(translates.iter().all(|d| *d == Vec2::new(300.0, 300.0)));
    }

    #[test]
    fn unknown_focus_keeps_manual_offset() {
        let mut settings = Settings::default();
        settings.focus = "Vulcan".into();
        settings.offset_x = 12.0;
        settings.offset_y = -3.0;
        let sys = system(&settings);
        let mut surface = RecordingSurface::new();
        sys.output(&mut settings, &mut surface);
        assert_eq!((settings.offset_x, settings.offset_y), (12.0, -3.0));
    }

    #[test]
    fn empty_focus_ignores_an_unnamed_body() {
        let json = r#"{ "stars": [ { "name": "", "center": { "x": 50, "y": 50 }, "radiusSize": 5 } ] }"#;
        let mut settings = Settings::default();
        settings.offset_x = 7.0;
        let mut sys = Solarsystem::default();
        sys.setup_json(json, &settings).unwrap();
        assert!(sys.position_of("").is_some());

        let mut surface = RecordingSurface::new();
        sys.output(&mut settings, &mut surface);
        assert_eq!((settings.offset_x, settings.offset_y), (7.0, 0.0));
    }

    #[test]
    fn paint_order_is_stars_planets_moons_rings() {
        let mut settings = Settings::default();
        settings.planet_paths = false;
        settings.moon_paths = false;
        let sys = system(&settings);
        let mut surface = RecordingSurface::new();
        sys.output(&mut settings, &mut surface);

        let paints: Vec<&DrawCommand> = surface.commands().iter().filter(|c| c.is_paint()).collect();
        let fills: Vec<f32> = paints
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        // Sol, Terra, Ares, Luna.
        assert_eq!(fills, vec![10.0, 4.0, 3.0, 1.0]);
        // Everything after the four disks is a ring stroke.
        assert!(matches!(paints[0], DrawCommand::FillCircle { .. }));
        assert!(paints[4..].iter().all(|c| matches!(c, DrawCommand::StrokeCircle { .. })));
        assert!(paints.len() > 4);
    }

    #[test]
    fn find_object_hits_and_misses() {
        let settings = Settings::default();
        let sys = system(&settings);
        assert_eq!(sys.find_object(DVec2::new(1.0, 1.0), &settings), Some("Sol"));
        assert_eq!(sys.find_object(DVec2::new(200.5, 0.5), &settings), Some("Ares"));
        assert_eq!(sys.find_object(DVec2::new(500.0, 500.0), &settings), None);
        // Bounding box, not a disk: the corner of Terra's box still hits.
        assert_eq!(sys.find_object(DVec2::new(103.9, 3.9), &settings), Some("Terra"));
        // Edges are exclusive.
        assert_eq!(sys.find_object(DVec2::new(104.0, 0.0), &settings), None);
    }

    #[test]
    fn find_object_last_match_wins_under_overlap() {
        // Luna's box (115 ± 1) sits inside Terra's enlarged box: the later
        // body in registry order is reported. Kept for compatibility.
        let mut settings = Settings::default();
        settings.planet_size_scaling = 5.0; // Terra box 100 ± 20
        let sys = system(&settings);
        assert_eq!(sys.find_object(DVec2::new(115.0, 0.0), &settings), Some("Luna"));
        assert_eq!(sys.find_object(DVec2::new(110.0, 0.0), &settings), Some("Terra"));
    }

    #[test]
    fn builtin_catalog_sets_up() {
        let settings = Settings::default();
        let mut sys = Solarsystem::default();
        sys.setup(&Catalog::builtin(), &settings).unwrap();
        assert!(sys.lookup("Sun").is_some());
        assert!(sys.planet("Saturn").is_some());
        assert_eq!(sys.len(), Catalog::builtin().body_count());
    }
}
