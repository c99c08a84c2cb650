// ============================================================================
// VEC2 — minimal 2-component f32 vector for shader-style coordinate math
// ============================================================================
//
// Just enough surface for the tiling remap: componentwise arithmetic,
// floor/fract, a dot product, and a component swap (the GLSL `.yx` swizzle).
// No length/normalize/angle machinery — nothing in the crate needs it.

use std::ops::{Add, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    /// Both components set to the same value.
    #[inline]
    pub const fn splat(v: f32) -> Vec2 {
        Vec2 { x: v, y: v }
    }

    /// Components swapped — the GLSL `.yx` swizzle.
    #[inline]
    pub const fn swap(self) -> Vec2 {
        Vec2 {
            x: self.y,
            y: self.x,
        }
    }

    /// Componentwise floor.
    #[inline]
    pub fn floor(self) -> Vec2 {
        Vec2 {
            x: self.x.floor(),
            y: self.y.floor(),
        }
    }

    /// Componentwise fractional part, GLSL convention: `x - floor(x)`,
    /// always in [0, 1) for finite inputs (unlike `f32::fract`, which is
    /// negative for negative inputs).
    #[inline]
    pub fn fract_gl(self) -> Vec2 {
        Vec2 {
            x: self.x - self.x.floor(),
            y: self.y - self.y.floor(),
        }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}
