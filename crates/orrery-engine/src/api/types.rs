/// Index of a star in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarId(pub usize);

/// Index of a planet in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanetId(pub usize);

/// Index of a moon in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoonId(pub usize);

/// Which variant of orbital body a name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
}

/// Typed handle into the registry's shared name space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Star(StarId),
    Planet(PlanetId),
    Moon(MoonId),
}
