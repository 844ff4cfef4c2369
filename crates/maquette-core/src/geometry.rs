//! Geometric primitives and their compact string codec.
//!
//! Layout documents store object placement as space-separated number
//! strings: `"x y width height"` for a frame and `"a b c d e f"` for a 2D
//! affine transform. This module provides the numeric structs used
//! in-memory and the codec that keeps the textual encoding confined to the
//! storage boundary.
//!
//! # Overview
//!
//! - [`Rect`] - An object's frame: origin plus size, page-local coordinates
//! - [`Transform`] - A 2D affine matrix (`a,b,c,d` scale/rotate/skew, `e,f` translate)
//!
//! # Malformed input
//!
//! Parsing never fails. A component that is missing or not a number parses
//! to `NaN`, and callers are expected to skip or hide the affected object
//! rather than abort. [`Rect::is_renderable`] and
//! [`Transform::is_renderable`] report whether every component is finite.
//!
//! # Coordinate System
//!
//! Origin at the page's top-left corner, x increasing rightward and y
//! increasing downward, matching the catalogue's layout JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An object's frame in page-local coordinates.
///
/// Encoded on the wire as `"x y width height"`. Round-tripping through the
/// string form is lossless for finite values.
///
/// # Examples
///
/// ```
/// # use maquette_core::geometry::Rect;
/// let rect: Rect = "10 20 300 120".parse().unwrap();
/// assert_eq!(rect.x(), 10.0);
/// assert_eq!(rect.height(), 120.0);
/// assert_eq!(rect.to_string(), "10 20 300 120");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a new rect with the specified origin and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the x-coordinate of the origin
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the origin
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the width of the frame
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height of the frame
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns true when every component is finite.
    ///
    /// A rect parsed from malformed input carries `NaN` components and is
    /// not renderable; callers hide such objects instead of failing.
    pub fn is_renderable(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl FromStr for Rect {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, width, height] = parse_components(s);
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

impl Serialize for Rect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// A 2D affine transform.
///
/// Encoded on the wire as `"a b c d e f"` where `a,b,c,d` carry
/// scale/rotate/skew and `e,f` carry the translation. Round-tripping
/// through the string form is lossless for finite values.
///
/// # Examples
///
/// ```
/// # use maquette_core::geometry::Transform;
/// let t: Transform = "1 0 0 1 25 50".parse().unwrap();
/// assert_eq!(t.translation(), (25.0, 50.0));
/// assert_eq!(t.to_string(), "1 0 0 1 25 50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Transform {
    /// The identity transform
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Creates a new transform from the six matrix components
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Returns the `a` (horizontal scale) component
    pub fn a(self) -> f64 {
        self.a
    }

    /// Returns the `b` (vertical skew) component
    pub fn b(self) -> f64 {
        self.b
    }

    /// Returns the `c` (horizontal skew) component
    pub fn c(self) -> f64 {
        self.c
    }

    /// Returns the `d` (vertical scale) component
    pub fn d(self) -> f64 {
        self.d
    }

    /// Returns the translation components `(e, f)`
    pub fn translation(self) -> (f64, f64) {
        (self.e, self.f)
    }

    /// Returns the scale components `(a, d)`
    pub fn scale(self) -> (f64, f64) {
        (self.a, self.d)
    }

    /// Returns true when every component is finite
    pub fn is_renderable(self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromStr for Transform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [a, b, c, d, e, f] = parse_components(s);
        Ok(Self { a, b, c, d, e, f })
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

impl Serialize for Transform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Transform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_else(|_| Transform::IDENTITY))
    }
}

/// Splits on whitespace and parses `N` numbers positionally.
///
/// Missing or unparseable components become `NaN`; extra components are
/// ignored.
fn parse_components<const N: usize>(s: &str) -> [f64; N] {
    let mut parts = s.split_whitespace();
    std::array::from_fn(|_| {
        parts
            .next()
            .and_then(|part| part.parse().ok())
            .unwrap_or(f64::NAN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_parse() {
        let rect: Rect = "12.5 40 200 85.25".parse().unwrap();
        assert_eq!(rect.x(), 12.5);
        assert_eq!(rect.y(), 40.0);
        assert_eq!(rect.width(), 200.0);
        assert_eq!(rect.height(), 85.25);
        assert!(rect.is_renderable());
    }

    #[test]
    fn test_rect_parse_negative_origin() {
        let rect: Rect = "-4 -8.5 100 50".parse().unwrap();
        assert_eq!(rect.x(), -4.0);
        assert_eq!(rect.y(), -8.5);
    }

    #[test]
    fn test_rect_display_roundtrip() {
        let rect = Rect::new(1.0, 2.0, 3.5, 4.25);
        let encoded = rect.to_string();
        let decoded: Rect = encoded.parse().unwrap();
        assert_eq!(decoded, rect);
    }

    #[test]
    fn test_rect_malformed_is_nan_not_error() {
        let rect: Rect = "10 oops 30 40".parse().unwrap();
        assert_eq!(rect.x(), 10.0);
        assert!(rect.y().is_nan());
        assert_eq!(rect.width(), 30.0);
        assert!(!rect.is_renderable());
    }

    #[test]
    fn test_rect_missing_components_are_nan() {
        let rect: Rect = "10 20".parse().unwrap();
        assert_eq!(rect.x(), 10.0);
        assert_eq!(rect.y(), 20.0);
        assert!(rect.width().is_nan());
        assert!(rect.height().is_nan());
        assert!(!rect.is_renderable());
    }

    #[test]
    fn test_rect_empty_string() {
        let rect: Rect = "".parse().unwrap();
        assert!(!rect.is_renderable());
    }

    #[test]
    fn test_rect_extra_components_ignored() {
        let rect: Rect = "1 2 3 4 99 100".parse().unwrap();
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_transform_parse() {
        let t: Transform = "0.5 0 0 0.5 120 240".parse().unwrap();
        assert_eq!(t.scale(), (0.5, 0.5));
        assert_eq!(t.translation(), (120.0, 240.0));
        assert!(t.is_renderable());
    }

    #[test]
    fn test_transform_identity() {
        assert_eq!(Transform::default(), Transform::IDENTITY);
        assert_eq!(Transform::IDENTITY.to_string(), "1 0 0 1 0 0");
    }

    #[test]
    fn test_transform_malformed_is_nan_not_error() {
        let t: Transform = "1 0 x 1 0 0".parse().unwrap();
        assert!(t.c().is_nan());
        assert!(!t.is_renderable());
    }

    #[test]
    fn test_serde_passes_through_string_form() {
        let json = r#""5 10 15 20""#;
        let rect: Rect = serde_json::from_str(json).unwrap();
        assert_eq!(rect, Rect::new(5.0, 10.0, 15.0, 20.0));
        assert_eq!(serde_json::to_string(&rect).unwrap(), json);

        let json = r#""1 0 0 1 -3 7.5""#;
        let t: Transform = serde_json::from_str(json).unwrap();
        assert_eq!(t, Transform::new(1.0, 0.0, 0.0, 1.0, -3.0, 7.5));
        assert_eq!(serde_json::to_string(&t).unwrap(), json);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn finite_f64() -> impl Strategy<Value = f64> {
        -1.0e12f64..1.0e12
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (finite_f64(), finite_f64(), finite_f64(), finite_f64())
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    fn transform_strategy() -> impl Strategy<Value = Transform> {
        (
            finite_f64(),
            finite_f64(),
            finite_f64(),
            finite_f64(),
            finite_f64(),
            finite_f64(),
        )
            .prop_map(|(a, b, c, d, e, f)| Transform::new(a, b, c, d, e, f))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Encoding then parsing a rect must reproduce it exactly.
    fn check_rect_roundtrip_is_lossless(rect: Rect) -> Result<(), TestCaseError> {
        let decoded: Rect = rect.to_string().parse().unwrap();
        prop_assert_eq!(decoded, rect);
        Ok(())
    }

    /// Encoding then parsing a transform must reproduce it exactly.
    fn check_transform_roundtrip_is_lossless(t: Transform) -> Result<(), TestCaseError> {
        let decoded: Transform = t.to_string().parse().unwrap();
        prop_assert_eq!(decoded, t);
        Ok(())
    }

    /// The serde form must agree with the Display form.
    fn check_serde_matches_display(rect: Rect) -> Result<(), TestCaseError> {
        let json = serde_json::to_string(&rect).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", rect));
        Ok(())
    }

    /// Any finite rect is renderable.
    fn check_finite_rect_is_renderable(rect: Rect) -> Result<(), TestCaseError> {
        prop_assert!(rect.is_renderable());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn rect_roundtrip_is_lossless(rect in rect_strategy()) {
            check_rect_roundtrip_is_lossless(rect)?;
        }

        #[test]
        fn transform_roundtrip_is_lossless(t in transform_strategy()) {
            check_transform_roundtrip_is_lossless(t)?;
        }

        #[test]
        fn serde_matches_display(rect in rect_strategy()) {
            check_serde_matches_display(rect)?;
        }

        #[test]
        fn finite_rect_is_renderable(rect in rect_strategy()) {
            check_finite_rect_is_renderable(rect)?;
        }
    }
}
