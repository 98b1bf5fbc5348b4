// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the hierarchical Topology structure (chains → residues → atoms).

use serde::{Deserialize, Serialize};

use crate::errors::TopologyError;
use crate::structures::element::Element;

/// Chain of residues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    index: usize,
    id: String,
    residues: Vec<usize>,
}

impl Chain {
    /// Index of the chain in the topology.
    #[inline(always)]
    pub fn get_index(&self) -> usize {
        self.index
    }

    /// Identifier of the chain.
    #[inline(always)]
    pub fn get_id(&self) -> &str {
        &self.id
    }

    /// Indices of residues forming the chain.
    #[inline(always)]
    pub fn get_residues(&self) -> &[usize] {
        &self.residues
    }
}

/// Residue composed of atoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residue {
    index: usize,
    name: String,
    id: String,
    chain: usize,
    atoms: Vec<usize>,
}

impl Residue {
    /// Index of the residue in the topology.
    #[inline(always)]
    pub fn get_index(&self) -> usize {
        self.index
    }

    /// Name of the residue.
    #[inline(always)]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Identifier of the residue (typically the residue sequence number).
    #[inline(always)]
    pub fn get_id(&self) -> &str {
        &self.id
    }

    /// Index of the chain this residue belongs to.
    #[inline(always)]
    pub fn get_chain(&self) -> usize {
        self.chain
    }

    /// Indices of atoms forming the residue.
    #[inline(always)]
    pub fn get_atoms(&self) -> &[usize] {
        &self.atoms
    }
}

/// Atom of the topology. Index of the atom matches index of the particle in the `ParticleSystem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyAtom {
    index: usize,
    name: String,
    element: Option<Element>,
    residue: usize,
}

impl TopologyAtom {
    /// Index of the atom in the topology.
    #[inline(always)]
    pub fn get_index(&self) -> usize {
        self.index
    }

    /// Name of the atom.
    #[inline(always)]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Element of the atom, if known.
    #[inline(always)]
    pub fn get_element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Index of the residue this atom belongs to.
    #[inline(always)]
    pub fn get_residue(&self) -> usize {
        self.residue
    }
}

/// Structural description of a molecular system, independent of its geometry.
///
/// ## Example
/// Build topology of two argon atoms, each in its own residue.
/// ```
/// # use testsys_rs::prelude::*;
/// #
/// let argon = Element::by_symbol("Ar").unwrap();
///
/// let mut topology = Topology::new();
/// let chain = topology.add_chain(None);
/// for _ in 0..2 {
///     let residue = topology.add_residue("Ar", chain, None).unwrap();
///     topology.add_atom("Ar", Some(argon.clone()), residue).unwrap();
/// }
///
/// assert_eq!(topology.get_n_chains(), 1);
/// assert_eq!(topology.get_n_residues(), 2);
/// assert_eq!(topology.get_n_atoms(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    chains: Vec<Chain>,
    residues: Vec<Residue>,
    atoms: Vec<TopologyAtom>,
}

impl Topology {
    /// Create a new empty topology.
    pub fn new() -> Self {
        Topology::default()
    }

    /// Add a new chain to the topology. Returns index of the new chain.
    ///
    /// ## Notes
    /// - If `id` is not provided, the chain is assigned id corresponding to its
    /// position in the topology, starting from "1".
    pub fn add_chain(&mut self, id: Option<&str>) -> usize {
        let index = self.chains.len();
        let id = match id {
            Some(x) => x.to_owned(),
            None => (index + 1).to_string(),
        };

        self.chains.push(Chain {
            index,
            id,
            residues: Vec::new(),
        });

        index
    }

    /// Add a new residue to the chain with index `chain`. Returns index of the new residue.
    ///
    /// ## Notes
    /// - If `id` is not provided, the residue is assigned id corresponding to its
    /// position in the topology, starting from "1".
    pub fn add_residue(
        &mut self,
        name: &str,
        chain: usize,
        id: Option<&str>,
    ) -> Result<usize, TopologyError> {
        let index = self.residues.len();
        let id = match id {
            Some(x) => x.to_owned(),
            None => (index + 1).to_string(),
        };

        self.chains
            .get_mut(chain)
            .ok_or(TopologyError::InvalidChain(chain))?
            .residues
            .push(index);

        self.residues.push(Residue {
            index,
            name: name.to_owned(),
            id,
            chain,
            atoms: Vec::new(),
        });

        Ok(index)
    }

    /// Add a new atom to the residue with index `residue`. Returns index of the new atom.
    pub fn add_atom(
        &mut self,
        name: &str,
        element: Option<Element>,
        residue: usize,
    ) -> Result<usize, TopologyError> {
        let index = self.atoms.len();

        self.residues
            .get_mut(residue)
            .ok_or(TopologyError::InvalidResidue(residue))?
            .atoms
            .push(index);

        self.atoms.push(TopologyAtom {
            index,
            name: name.to_owned(),
            element,
            residue,
        });

        Ok(index)
    }

    /// Get the number of chains.
    #[inline(always)]
    pub fn get_n_chains(&self) -> usize {
        self.chains.len()
    }

    /// Get the number of residues.
    #[inline(always)]
    pub fn get_n_residues(&self) -> usize {
        self.residues.len()
    }

    /// Get the number of atoms.
    #[inline(always)]
    pub fn get_n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Get chain with the given index.
    #[inline]
    pub fn get_chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    /// Get residue with the given index.
    #[inline]
    pub fn get_residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    /// Get atom with the given index.
    #[inline]
    pub fn get_atom(&self, index: usize) -> Option<&TopologyAtom> {
        self.atoms.get(index)
    }

    /// Iterate over the chains of the topology.
    pub fn chains_iter(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    /// Iterate over the residues of the topology.
    pub fn residues_iter(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    /// Iterate over the atoms of the topology.
    pub fn atoms_iter(&self) -> std::slice::Iter<'_, TopologyAtom> {
        self.atoms.iter()
    }

    /// Returns `true` if the topology contains no chains, residues, or atoms.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.residues.is_empty() && self.atoms.is_empty()
    }
}
