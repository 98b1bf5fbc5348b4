// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of methods for three-dimensional vector.

use std::fmt;
use std::ops::{Add, Deref, DerefMut, Mul, Sub};

use nalgebra::base::Vector3;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Describes a position of a point in space (in nm) or a displacement.
/// Implemented using `nalgebra`'s Vector3.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vector3D(pub(crate) Vector3<f64>);

impl From<[f64; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

impl From<Vector3D> for [f64; 3] {
    #[inline]
    fn from(vec: Vector3D) -> Self {
        [vec.0.x, vec.0.y, vec.0.z]
    }
}

/// Allows accessing fields of `Vector3D` as `.x`, `.y`, and `.z`.
#[repr(C)]
pub struct Vector3Raw {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Deref for Vector3D {
    type Target = Vector3Raw;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // nalgebra stores Vector3 as three contiguous f64 values
        unsafe { &*(self.0.as_ptr() as *const Vector3Raw) }
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *(self.0.as_mut_ptr() as *mut Vector3Raw) }
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    /// Calculate length of the vector.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let vector = Vector3D::new(1.0, 2.0, 3.0);
    /// assert_approx_eq!(f64, vector.len(), 3.7416573867739413, epsilon = 1e-12);
    /// ```
    #[inline]
    pub fn len(&self) -> f64 {
        self.0.magnitude()
    }

    /// Calculate squared length of the vector.
    #[inline]
    pub fn len_squared(&self) -> f64 {
        self.0.magnitude_squared()
    }

    /// Calculate the dot product of two vectors.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let vector1 = Vector3D::new(4.0, 2.0, -1.0);
    /// let vector2 = Vector3D::new(1.0, -3.0, 2.0);
    ///
    /// assert_approx_eq!(f64, vector1.dot(&vector2), -4.0);
    /// ```
    #[inline]
    pub fn dot(&self, vector: &Vector3D) -> f64 {
        self.0.dot(&vector.0)
    }

    /// Calculate distance between two points. No periodic boundary conditions are applied.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let point1 = Vector3D::new(1.0, 2.0, 3.0);
    /// let point2 = Vector3D::new(3.5, 1.0, 2.0);
    ///
    /// assert_approx_eq!(f64, point1.distance(&point2), 2.8722813232690143, epsilon = 1e-12);
    /// ```
    #[inline]
    pub fn distance(&self, point: &Vector3D) -> f64 {
        (self.0 - point.0).magnitude()
    }

    /// Returns `true` if all the fields of the vector are exactly zero.
    /// Otherwise, returns `false`.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.x == 0.0 && self.0.y == 0.0 && self.0.z == 0.0
    }
}

impl Default for Vector3D {
    /// Create a zero vector.
    fn default() -> Self {
        Vector3D(Vector3::new(0.0, 0.0, 0.0))
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn add(self, other: Vector3D) -> Vector3D {
        Vector3D(self.0 + other.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, other: Vector3D) -> Vector3D {
        Vector3D(self.0 - other.0)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn mul(self, scalar: f64) -> Vector3D {
        Vector3D(self.0 * scalar)
    }
}

impl Serialize for Vector3D {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.0.x)?;
        seq.serialize_element(&self.0.y)?;
        seq.serialize_element(&self.0.z)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Vector3D {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Vector3DVisitor;

        impl<'de> Visitor<'de> for Vector3DVisitor {
            type Value = Vector3D;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of three floats")
            }

            fn visit_seq<S>(self, mut seq: S) -> Result<Vector3D, S::Error>
            where
                S: SeqAccess<'de>,
            {
                let x = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let y = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let z = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;

                if seq.next_element::<f64>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(Vector3D(Vector3::new(x, y, z)))
            }
        }

        deserializer.deserialize_seq(Vector3DVisitor)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
