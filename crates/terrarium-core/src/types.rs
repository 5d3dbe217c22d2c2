//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an organism instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodId(pub Uuid);

impl FoodId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FoodId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer tag grouping organisms descended from the same founder.
///
/// Organisms with differing lineage ids treat each other as hostile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageId(pub u32);

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render palette for lineages; also the key for per-color kill counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineageColor {
    Brown,
    Blue,
    Purple,
    Cyan,
    Gold,
    Magenta,
}

impl LineageColor {
    pub const ALL: [LineageColor; 6] = [
        LineageColor::Brown,
        LineageColor::Blue,
        LineageColor::Purple,
        LineageColor::Cyan,
        LineageColor::Gold,
        LineageColor::Magenta,
    ];

    /// RGB triple handed to the renderer
    pub fn rgb(&self) -> [f32; 3] {
        match self {
            LineageColor::Brown => [0.6, 0.4, 0.2],
            LineageColor::Blue => [0.0, 0.0, 1.0],
            LineageColor::Purple => [0.6, 0.2, 0.6],
            LineageColor::Cyan => [0.0, 1.0, 1.0],
            LineageColor::Gold => [1.0, 0.8, 0.0],
            LineageColor::Magenta => [1.0, 0.0, 1.0],
        }
    }

    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Position in world space.
///
/// A planar world is the degenerate case `z == 0`; clamping against a
/// zero-depth extent keeps it there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, other: Vec3) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: Vec3) -> f64 {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
        .length()
    }

    /// Unit vector pointing at `target`.
    ///
    /// Zero-vector when the distance is zero, so callers never divide by it.
    pub fn heading_to(&self, target: Vec3) -> Self {
        let dist = self.distance(target);
        if dist == 0.0 {
            return Self::ZERO;
        }
        Self {
            x: (target.x - self.x) / dist,
            y: (target.y - self.y) / dist,
            z: (target.z - self.z) / dist,
        }
    }

    /// Advance toward `target` by at most `speed`, never overshooting.
    pub fn step_toward(&self, target: Vec3, speed: f64) -> Self {
        let dist = self.distance(target);
        if dist == 0.0 {
            return *self;
        }
        let step = speed.min(dist);
        self.add(self.heading_to(target).scale(step))
    }

    /// Clamp each axis into `[0, extent]`.
    pub fn clamp(&self, extent: Vec3) -> Self {
        Self {
            x: self.x.clamp(0.0, extent.x.max(0.0)),
            y: self.y.clamp(0.0, extent.y.max(0.0)),
            z: self.z.clamp(0.0, extent.z.max(0.0)),
        }
    }

    /// Uniform random unit heading; confined to the XY plane when `planar`.
    pub fn random_heading<R: Rng>(rng: &mut R, planar: bool) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        if planar {
            return Self::new(angle.cos(), angle.sin(), 0.0);
        }
        let z = rng.gen_range(-1.0..=1.0f64);
        let r = (1.0 - z * z).sqrt();
        Self::new(r * angle.cos(), r * angle.sin(), z)
    }
}

/// Discretized bucket coordinate used by the spatial grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Bucket containing a world position; each axis rounds to the nearest cell.
    pub fn containing(pos: Vec3, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).round() as i32,
            y: (pos.y / cell_size).round() as i32,
            z: (pos.z / cell_size).round() as i32,
        }
    }
}
