//! 2D points, vectors and axis aligned rectangles.
//!
//! [`Point2`] is generic over [`Lane`]: `Point2D` holds one point, `Point2D4`
//! holds four points in structure-of-arrays layout (`x` lanes, `y` lanes).
//! Distances are millimetres, angles radians.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::angle::normalize_angle_rd;
use crate::simd::{F32x4, Lane, LANE_COUNT};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

pub type Point2D = Point2<f32>;
/// Vectors and points share a representation.
pub type Vector2D = Point2D;
pub type Point2D4 = Point2<F32x4>;
pub type Vector2D4 = Point2D4;

impl<T: Lane> Point2<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::splat(0.0), T::splat(0.0))
    }

    /// Repeats a single point in every lane.
    #[inline]
    pub fn expand(p: Point2D) -> Self {
        Self::new(T::splat(p.x), T::splat(p.y))
    }

    /// `(cos θ, sin θ) · magnitude`
    #[inline]
    pub fn from_polar(magnitude: T, angle: T) -> Self {
        Self::new(angle.cos() * magnitude, angle.sin() * magnitude)
    }

    #[inline]
    pub fn magnitude(self) -> T {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle of the vector from the x axis, in `[-π, π]`.
    #[inline]
    pub fn direction(self) -> T {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn distance_to(self, other: Self) -> T {
        (other - self).magnitude()
    }

    /// Bearing of `target` seen from this point while facing `orientation`,
    /// normalized to `[-π, π]`.
    #[inline]
    pub fn bearing_to(self, target: Self, orientation: T) -> T {
        debug_assert!(
            orientation.all_within(-std::f32::consts::PI, std::f32::consts::PI),
            "bearing_to: orientation {orientation:?} not normalized"
        );
        let d = target - self;
        normalize_angle_rd(d.y.atan2(d.x) - orientation)
    }

    /// Component-wise square root.
    #[inline]
    pub fn sqrt(self) -> Self {
        Self::new(self.x.sqrt(), self.y.sqrt())
    }

    /// Sums the points held in the lanes.
    #[inline]
    pub fn reduce_add(self) -> Point2D {
        Point2D::new(self.x.reduce_add(), self.y.reduce_add())
    }
}

impl Point2D4 {
    pub fn from_points(points: [Point2D; LANE_COUNT]) -> Self {
        Self::new(
            F32x4::from_array(points.map(|p| p.x)),
            F32x4::from_array(points.map(|p| p.y)),
        )
    }

    #[inline]
    pub fn lane(self, index: usize) -> Point2D {
        Point2D::new(self.x.lane(index), self.y.lane(index))
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

impl<T: Lane> Add for Point2<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Lane> Sub for Point2<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product.
impl<T: Lane> Mul for Point2<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl<T: Lane> Mul<T> for Point2<T> {
    type Output = Self;

    #[inline]
    fn mul(self, scale: T) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }
}

impl<T: Lane> Div<T> for Point2<T> {
    type Output = Self;

    #[inline]
    fn div(self, scale: T) -> Self {
        Self::new(self.x / scale, self.y / scale)
    }
}

impl<T: Lane> AddAssign for Point2<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Lane> SubAssign for Point2<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Axis aligned rectangle, stored as its bottom-left and top-right corners.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectangleCorners", into = "RectangleCorners")]
pub struct Rectangle {
    lo: Point2D,
    hi: Point2D,
}

/// Serialized form: any two opposite corners.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
struct RectangleCorners {
    corner_a: [f32; 2],
    corner_b: [f32; 2],
}

impl From<RectangleCorners> for Rectangle {
    fn from(corners: RectangleCorners) -> Self {
        Rectangle::new(
            Point2D::new(corners.corner_a[0], corners.corner_a[1]),
            Point2D::new(corners.corner_b[0], corners.corner_b[1]),
        )
    }
}

impl From<Rectangle> for RectangleCorners {
    fn from(rect: Rectangle) -> Self {
        RectangleCorners {
            corner_a: [rect.lo.x, rect.lo.y],
            corner_b: [rect.hi.x, rect.hi.y],
        }
    }
}

impl Rectangle {
    /// Builds the rectangle spanned by two opposite corners, in any order.
    pub fn new(a: Point2D, b: Point2D) -> Self {
        Self {
            lo: Point2D::new(a.x.min(b.x), a.y.min(b.y)),
            hi: Point2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// A `width` × `height` rectangle centred on the origin.
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Point2D::new(width / 2.0, height / 2.0);
        Self::new(Point2D::zero() - half, half)
    }

    pub fn bottom_left(&self) -> Point2D {
        self.lo
    }

    pub fn top_right(&self) -> Point2D {
        self.hi
    }

    pub fn width(&self) -> f32 {
        self.hi.x - self.lo.x
    }

    pub fn height(&self) -> f32 {
        self.hi.y - self.lo.y
    }

    pub fn contains(&self, p: Point2D) -> bool {
        (self.lo.x..=self.hi.x).contains(&p.x) && (self.lo.y..=self.hi.y).contains(&p.y)
    }
}
