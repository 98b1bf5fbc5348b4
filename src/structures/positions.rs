// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the Positions structure: ordered particle coordinates in nm.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::structures::vector3d::Vector3D;

/// Ordered sequence of particle coordinates. One position per particle, in nm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Positions(Vec<Vector3D>);

impl Positions {
    /// Create positions for `n_particles` particles, all located at the origin.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// #
    /// let positions = Positions::zeros(2);
    /// assert_eq!(positions.get_n_particles(), 2);
    /// assert!(positions.iter().all(|pos| pos.is_zero()));
    /// ```
    pub fn zeros(n_particles: usize) -> Self {
        Positions(vec![Vector3D::default(); n_particles])
    }

    /// Get the number of particles.
    #[inline(always)]
    pub fn get_n_particles(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no positions are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get position of the particle with the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Vector3D> {
        self.0.get(index)
    }

    /// Get mutable position of the particle with the given index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Vector3D> {
        self.0.get_mut(index)
    }

    /// Append position of a new particle.
    #[inline]
    pub fn push(&mut self, position: Vector3D) {
        self.0.push(position);
    }

    /// Iterate over the positions.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Vector3D> {
        self.0.iter()
    }

    /// Get the positions as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[Vector3D] {
        &self.0
    }
}

impl From<Vec<Vector3D>> for Positions {
    fn from(positions: Vec<Vector3D>) -> Self {
        Positions(positions)
    }
}

impl FromIterator<Vector3D> for Positions {
    fn from_iter<I: IntoIterator<Item = Vector3D>>(iter: I) -> Self {
        Positions(iter.into_iter().collect())
    }
}

impl Index<usize> for Positions {
    type Output = Vector3D;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Positions {
    type Item = &'a Vector3D;
    type IntoIter = std::slice::Iter<'a, Vector3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
