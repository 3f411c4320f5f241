
//! Simple math utilities.

use std::ops::{Add, Mul, Sub};


/// Simple two-dimensional vector of any numerical type.
/// Supports only few mathematical operations
/// as this is used mainly as data struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Vec2<T> (pub T, pub T);

impl<T> Vec2<T> {

    /// Maps all components of this vector to a new type, yielding a vector of that new type.
    pub fn map<B>(self, map: impl Fn(T) -> B) -> Vec2<B> {
        Vec2(map(self.0), map(self.1))
    }

    /// Seeing this vector as a dimension or size (width and height),
    /// this returns the area that this dimensions contains (`width * height`).
    pub fn area(self) -> T where T: std::ops::Mul<T, Output = T> {
        self.0 * self.1
    }

    /// The first component of this 2D vector.
    #[inline]
    pub fn x(self) -> T { self.0 }

    /// The second component of this 2D vector.
    #[inline]
    pub fn y(self) -> T { self.1 }

    /// The first component of this 2D vector.
    #[inline]
    pub fn width(self) -> T { self.0 }

    /// The second component of this 2D vector.
    #[inline]
    pub fn height(self) -> T { self.1 }
}

impl<T> From<(T, T)> for Vec2<T> {
    fn from((x, y): (T, T)) -> Self { Vec2(x, y) }
}

impl<T> From<Vec2<T>> for (T, T) {
    fn from(vec2: Vec2<T>) -> Self { (vec2.0, vec2.1) }
}


/// Round up or down in specific calculations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RoundingMode {

    /// Round down.
    Down,

    /// Round up.
    Up,
}

impl RoundingMode {
    pub(crate) fn divide(self, dividend: usize, divisor: usize) -> usize {
        match self {
            RoundingMode::Up => (dividend + divisor - 1) / divisor, // only works for positive numbers
            RoundingMode::Down => dividend / divisor,
        }
    }
}


/// Four float lanes, processed by value.
/// One lane per color channel, in `r, g, b, a` order.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec4(pub [f32; 4]);

impl Vec4 {

    /// All lanes zero.
    pub const ZERO: Vec4 = Vec4([0.0; 4]);

    /// Create a vector from its four lanes.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self { Vec4([x, y, z, w]) }

    /// The same value in every lane.
    #[inline]
    pub const fn splat(value: f32) -> Self { Vec4([value; 4]) }

    /// Lane `0`.
    #[inline] pub fn x(self) -> f32 { self.0[0] }

    /// Lane `1`.
    #[inline] pub fn y(self) -> f32 { self.0[1] }

    /// Lane `2`.
    #[inline] pub fn z(self) -> f32 { self.0[2] }

    /// Lane `3`.
    #[inline] pub fn w(self) -> f32 { self.0[3] }

    /// Lane-wise product.
    #[inline]
    pub fn multiply(self, other: Vec4) -> Vec4 {
        self.zip(other, |a, b| a * b)
    }

    /// Linear interpolation from `self` (at `t = 0`) to `other` (at `t = 1`).
    #[inline]
    pub fn lerp(self, other: Vec4, t: f32) -> Vec4 {
        self.zip(other, |a, b| a + (b - a) * t)
    }

    /// Take each lane from `other` where the mask is set, and from `self` otherwise.
    #[inline]
    pub fn select(self, other: Vec4, mask: [bool; 4]) -> Vec4 {
        let mut lanes = self.0;
        for (lane, (&take, &value)) in lanes.iter_mut().zip(mask.iter().zip(other.0.iter())) {
            if take { *lane = value; }
        }

        Vec4(lanes)
    }

    /// Reorder the lanes. `Vec4::swizzle::<2,1,0,3>` swaps the first and third lane.
    #[inline]
    pub fn swizzle<const X: usize, const Y: usize, const Z: usize, const W: usize>(self) -> Vec4 {
        Vec4([self.0[X], self.0[Y], self.0[Z], self.0[W]])
    }

    /// Replace lane `3`.
    #[inline]
    pub fn with_w(self, w: f32) -> Vec4 {
        let mut lanes = self.0;
        lanes[3] = w;
        Vec4(lanes)
    }

    /// Sum of the lane-wise product.
    #[inline]
    pub fn dot(self, other: Vec4) -> f32 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Clamp every lane to the unit interval. Not-a-number becomes zero.
    #[inline]
    pub fn saturate(self) -> Vec4 {
        self.map(|lane| if lane.is_nan() { 0.0 } else { lane.max(0.0).min(1.0) })
    }

    /// Lane-wise minimum.
    #[inline]
    pub fn min(self, other: Vec4) -> Vec4 { self.zip(other, f32::min) }

    /// Lane-wise maximum.
    #[inline]
    pub fn max(self, other: Vec4) -> Vec4 { self.zip(other, f32::max) }

    /// Apply a function to every lane.
    #[inline]
    pub fn map(self, map: impl Fn(f32) -> f32) -> Vec4 {
        Vec4([ map(self.0[0]), map(self.0[1]), map(self.0[2]), map(self.0[3]) ])
    }

    #[inline]
    fn zip(self, other: Vec4, combine: impl Fn(f32, f32) -> f32) -> Vec4 {
        Vec4([
            combine(self.0[0], other.0[0]), combine(self.0[1], other.0[1]),
            combine(self.0[2], other.0[2]), combine(self.0[3], other.0[3]),
        ])
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, other: Vec4) -> Vec4 { self.zip(other, |a, b| a + b) }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, other: Vec4) -> Vec4 { self.zip(other, |a, b| a - b) }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, scale: f32) -> Vec4 { self.map(|lane| lane * scale) }
}
