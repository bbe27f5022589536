//! Circle-vs-circle collision shared by every entity category
//!
//! Ships, cannonballs and islands are all circles. Combat hits use a
//! forgiveness margin because the drawn hulls are bigger than the hitboxes;
//! island deliveries use plain overlap since they only flip a flag.

use glam::Vec2;

use super::state::{Island, Projectile, Ship};
use crate::consts::COLLISION_MARGIN;

/// Anything with a collision circle
pub trait Body {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

impl Body for Ship {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Body for Projectile {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Body for Island {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Combat hit test: `distance < r1 + r2 - COLLISION_MARGIN`
#[inline]
pub fn collides(a: &impl Body, b: &impl Body) -> bool {
    a.center().distance(b.center()) < a.radius() + b.radius() - COLLISION_MARGIN
}

/// Plain overlap: `distance < r1 + r2`
#[inline]
pub fn overlaps(a: &impl Body, b: &impl Body) -> bool {
    a.center().distance(b.center()) < a.radius() + b.radius()
}

/// True if `pos` lies inside the square world `[0, size]²`
#[inline]
pub fn in_world(pos: Vec2, size: f32) -> bool {
    (0.0..=size).contains(&pos.x) && (0.0..=size).contains(&pos.y)
}
