// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the AnalysisTopology structure: a flat, read-only atom table
//! derived from a hierarchical `Topology` for use by trajectory-analysis code.

use getset::{CopyGetters, Getters};

use crate::structures::topology::Topology;

/// Single row of the atom table.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct AnalysisAtom {
    /// Serial number of the atom. Atoms are numbered starting from 1.
    #[getset(get_copy = "pub")]
    serial: usize,
    /// Name of the atom.
    #[getset(get = "pub")]
    name: String,
    /// Symbol of the element of the atom.
    #[getset(get = "pub")]
    element: Option<String>,
    /// Mass of the atom in amu (from its element).
    #[getset(get_copy = "pub")]
    mass: Option<f64>,
    /// Residue sequence number.
    #[getset(get_copy = "pub")]
    res_seq: usize,
    /// Name of the residue.
    #[getset(get = "pub")]
    res_name: String,
    /// Index of the residue in the topology.
    #[getset(get_copy = "pub")]
    residue_index: usize,
    /// Index of the chain in the topology.
    #[getset(get_copy = "pub")]
    chain_index: usize,
    /// Identifier of the chain.
    #[getset(get = "pub")]
    chain_id: String,
}

/// Flattened view of a `Topology`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisTopology {
    atoms: Vec<AnalysisAtom>,
    n_residues: usize,
    n_chains: usize,
}

impl AnalysisTopology {
    /// Build the atom table from the provided topology.
    ///
    /// ## Notes
    /// - Residue ids that can not be parsed as numbers are replaced by the
    /// position of the residue in the topology (starting from 1).
    pub fn from_topology(topology: &Topology) -> Self {
        let mut atoms = Vec::with_capacity(topology.get_n_atoms());

        for atom in topology.atoms_iter() {
            // a topology built through its API always references existing residues and chains
            let residue = topology
                .get_residue(atom.get_residue())
                .expect("FATAL TESTSYS ERROR | AnalysisTopology::from_topology | Atom references nonexistent residue.");
            let chain = topology
                .get_chain(residue.get_chain())
                .expect("FATAL TESTSYS ERROR | AnalysisTopology::from_topology | Residue references nonexistent chain.");

            let res_seq = residue
                .get_id()
                .trim()
                .parse::<usize>()
                .unwrap_or(residue.get_index() + 1);

            atoms.push(AnalysisAtom {
                serial: atom.get_index() + 1,
                name: atom.get_name().to_owned(),
                element: atom.get_element().map(|e| e.get_symbol().to_owned()),
                mass: atom.get_element().map(|e| e.get_mass()),
                res_seq,
                res_name: residue.get_name().to_owned(),
                residue_index: residue.get_index(),
                chain_index: chain.get_index(),
                chain_id: chain.get_id().to_owned(),
            });
        }

        AnalysisTopology {
            atoms,
            n_residues: topology.get_n_residues(),
            n_chains: topology.get_n_chains(),
        }
    }

    /// Get the number of atoms.
    #[inline(always)]
    pub fn get_n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Get the number of residues.
    #[inline(always)]
    pub fn get_n_residues(&self) -> usize {
        self.n_residues
    }

    /// Get the number of chains.
    #[inline(always)]
    pub fn get_n_chains(&self) -> usize {
        self.n_chains
    }

    /// Get atom with the given index.
    #[inline]
    pub fn get_atom(&self, index: usize) -> Option<&AnalysisAtom> {
        self.atoms.get(index)
    }

    /// Iterate over all atoms.
    pub fn atoms_iter(&self) -> std::slice::Iter<'_, AnalysisAtom> {
        self.atoms.iter()
    }

    /// Get indices of atoms belonging to residues with the given name.
    pub fn select_residue_name(&self, res_name: &str) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.res_name == res_name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get indices of atoms of the given element. The symbol is matched case-insensitively.
    pub fn select_element(&self, symbol: &str) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| {
                atom.element
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(symbol.trim()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Calculate total mass of all atoms with known element.
    pub fn get_total_mass(&self) -> f64 {
        self.atoms.iter().filter_map(|atom| atom.mass).sum()
    }
}
