// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of functions for reading and writing pdb files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::{ParsePdbError, WritePdbError};
use crate::structures::element::{Element, SupportedElements};
use crate::structures::positions::Positions;
use crate::structures::topology::Topology;
use crate::structures::vector3d::Vector3D;

/// Structure read from a pdb file.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbStructure {
    /// Content of the last TITLE line, if any.
    pub title: Option<String>,
    pub topology: Topology,
    pub positions: Positions,
}

/// Atom as parsed from a single ATOM/HETATM line.
#[derive(Debug, Clone)]
struct PdbAtom {
    name: String,
    residue_name: String,
    residue_number: String,
    chain: Option<char>,
    position: Vector3D,
    element: Element,
}

/// Read a pdb file and construct topology and positions of the molecule.
///
/// ## Supported keywords
/// This function can handle lines starting with ATOM, HETATM, TITLE, TER, ENDMDL, and END.
/// All other lines are ignored.
///
/// ## Notes
/// - Reading ends once `ENDMDL`, `END`, or the end of file is reached.
/// - A new residue is started whenever the residue number, residue name, or chain changes.
/// - A new chain is started whenever the chain identifier changes or after a `TER` line.
/// - Elements are read from columns 77-78. If the element column is missing,
/// the element is guessed from the atom name.
pub fn read_pdb(
    filename: impl AsRef<Path>,
    elements: &SupportedElements,
) -> Result<PdbStructure, ParsePdbError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ParsePdbError::FileNotFound(Box::from(filename.as_ref())))?;

    let reader = BufReader::new(file);

    let mut title = None;
    let mut topology = Topology::new();
    let mut positions = Positions::default();

    // chain of the previous atom and whether a TER line was encountered since
    let mut current_chain: Option<(usize, Option<char>)> = None;
    let mut current_residue: Option<(usize, String, String)> = None;
    let mut chain_terminated = false;

    for raw_line in reader.lines() {
        let line =
            raw_line.map_err(|_| ParsePdbError::LineNotFound(Box::from(filename.as_ref())))?;

        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            let atom = line_as_atom(&line, elements)?;

            let chain_index = match current_chain {
                Some((index, chain)) if chain == atom.chain && !chain_terminated => index,
                _ => {
                    let id = atom.chain.map(|c| c.to_string());
                    let index = topology.add_chain(id.as_deref());
                    current_chain = Some((index, atom.chain));
                    current_residue = None;
                    chain_terminated = false;
                    index
                }
            };

            let residue_index = match &current_residue {
                Some((index, name, number))
                    if *name == atom.residue_name && *number == atom.residue_number =>
                {
                    *index
                }
                _ => {
                    let index = topology
                        .add_residue(&atom.residue_name, chain_index, Some(&atom.residue_number))
                        .expect("FATAL TESTSYS ERROR | pdb_io::read_pdb | Chain should exist.");
                    current_residue =
                        Some((index, atom.residue_name.clone(), atom.residue_number.clone()));
                    index
                }
            };

            topology
                .add_atom(&atom.name, Some(atom.element), residue_index)
                .expect("FATAL TESTSYS ERROR | pdb_io::read_pdb | Residue should exist.");
            positions.push(atom.position);
        } else if line.starts_with("TITLE") {
            title = line_as_title(&line);
        } else if line.starts_with("TER") {
            chain_terminated = true;
        } else if line.starts_with("END") {
            break;
        }
    }

    if topology.get_n_atoms() == 0 {
        return Err(ParsePdbError::NoAtoms(Box::from(filename.as_ref())));
    }

    log::debug!(
        "Read {} atoms in {} residues and {} chains from `{}`.",
        topology.get_n_atoms(),
        topology.get_n_residues(),
        topology.get_n_chains(),
        filename.as_ref().display()
    );

    Ok(PdbStructure {
        title,
        topology,
        positions,
    })
}

/// Write topology and positions into a pdb file.
///
/// ## Returns
/// `Ok` if writing has been successful. Otherwise `WritePdbError`.
///
/// ## Notes
/// - All atoms are written as 'ATOM'.
/// - Atom and residue names longer than 4 characters are shortened.
/// Atom numbers larger than 99,999 and residue numbers larger than 9,999 are wrapped.
/// - Chains with identifiers longer than one character are labeled by letters
/// based on their position in the topology.
pub fn write_pdb(
    filename: impl AsRef<Path>,
    title: &str,
    topology: &Topology,
    positions: &Positions,
) -> Result<(), WritePdbError> {
    if topology.get_n_atoms() != positions.get_n_particles() {
        return Err(WritePdbError::AtomCountMismatch {
            topology: topology.get_n_atoms(),
            positions: positions.get_n_particles(),
        });
    }

    let output = File::create(&filename)
        .map_err(|_| WritePdbError::CouldNotCreate(Box::from(filename.as_ref())))?;

    let mut writer = BufWriter::new(output);

    write_line(&mut writer, &format!("TITLE     {}", title))?;
    write_line(&mut writer, "MODEL        1")?;

    let mut previous_chain = None;
    for (atom, position) in topology.atoms_iter().zip(positions.iter()) {
        let residue = topology
            .get_residue(atom.get_residue())
            .expect("FATAL TESTSYS ERROR | pdb_io::write_pdb | Residue should exist.");
        let chain = topology
            .get_chain(residue.get_chain())
            .expect("FATAL TESTSYS ERROR | pdb_io::write_pdb | Chain should exist.");

        if previous_chain.is_some_and(|c| c != chain.get_index()) {
            write_line(&mut writer, "TER")?;
        }
        previous_chain = Some(chain.get_index());

        let format_atomname = match atom.get_name().len() {
            0..=3 => format!(" {:<3}", atom.get_name()),
            _ => format!("{:<4}", atom.get_name().chars().take(4).collect::<String>()),
        };

        let format_resname = match residue.get_name().len() {
            0..=3 => format!("{:>3} ", residue.get_name()),
            _ => format!("{:>4}", residue.get_name().chars().take(4).collect::<String>()),
        };

        let mut chain_chars = chain.get_id().chars();
        let format_chain = match (chain_chars.next(), chain_chars.next()) {
            (Some(c), None) => c,
            _ => (b'A' + (chain.get_index() % 26) as u8) as char,
        };

        let residue_number = residue
            .get_id()
            .trim()
            .parse::<usize>()
            .unwrap_or(residue.get_index() + 1);

        let symbol = atom
            .get_element()
            .map(|e| e.get_symbol().to_uppercase())
            .unwrap_or_default();

        write_line(
            &mut writer,
            &format!(
                "ATOM  {:>5} {} {}{}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00          {:>2}",
                (atom.get_index() + 1) % 100000,
                format_atomname,
                format_resname,
                format_chain,
                residue_number % 10000,
                position.x * 10.0,
                position.y * 10.0,
                position.z * 10.0,
                symbol,
            ),
        )?;
    }

    write_line(&mut writer, "TER\nENDMDL\nEND")?;

    writer.flush().map_err(|_| WritePdbError::CouldNotWrite)?;

    Ok(())
}

/// Parse a single line from a pdb file as an atom.
///
/// ## Notes
/// - Parses lines starting with ATOM or HETATM.
fn line_as_atom(line: &str, elements: &SupportedElements) -> Result<PdbAtom, ParsePdbError> {
    let error = || ParsePdbError::ParseAtomLineErr(line.to_string());

    // check line length
    if line.len() < 54 {
        return Err(error());
    }

    // columns are byte ranges and may split a non-ascii character
    let column = |start: usize, end: usize| line.get(start..end).ok_or_else(error);

    // atom number must be present even though the atoms are renumbered
    column(6, 11)?
        .trim()
        .parse::<usize>()
        .map_err(|_| error())?;

    // parsing atom name
    let name = column(12, 16)?.trim().to_string();
    if name.is_empty() {
        return Err(error());
    }

    // parsing residue name
    let residue_name = column(17, 21)?.trim().to_string();
    if residue_name.is_empty() {
        return Err(error());
    }

    // parsing chain
    let chain = column(21, 22)?.chars().next().filter(|&x| !x.is_whitespace());

    // parsing residue number
    let residue_number = column(22, 26)?.trim().to_string();
    if residue_number.parse::<i64>().is_err() {
        return Err(error());
    }

    // parsing position
    let mut curr = 30usize;
    let mut position = [0.0, 0.0, 0.0];
    for pos in &mut position {
        *pos = column(curr, curr + 8)?
            .trim()
            .parse::<f64>()
            .map(|x| x / 10.0)
            .map_err(|_| error())?;

        curr += 8;
    }

    // parsing element
    let symbol = line.get(76..78).map(str::trim).filter(|s| !s.is_empty());
    let element = match symbol {
        Some(s) => elements.get_by_symbol(s),
        None => elements.guess_from_atom_name(&name, &residue_name),
    }
    .cloned()
    .ok_or_else(|| ParsePdbError::UnknownElement(name.clone()))?;

    Ok(PdbAtom {
        name,
        residue_name,
        residue_number,
        chain,
        position: position.into(),
        element,
    })
}

/// Parse a single line as a title.
///
/// ## Notes
/// - Parses a line starting with TITLE.
/// - Returns `None` if the TITLE line is empty.
fn line_as_title(line: &str) -> Option<String> {
    let title = line[5..].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<(), WritePdbError> {
    writeln!(writer, "{}", line).map_err(|_| WritePdbError::CouldNotWrite)
}

/******************************/
/*         UNIT TESTS         */
/******************************/


#[cfg(test)]
mod tests_write {
    use super::*;
    use crate::structures::element::default_elements;
    use file_diff;
    use tempfile::NamedTempFile;

    #[test]
    fn write_read_back() {
        let pdb = read_pdb("test_files/lysozyme_fragment.pdb", default_elements()).unwrap();

        let pdb_output = NamedTempFile::new().unwrap();
        let path_to_output = pdb_output.path();

        write_pdb(path_to_output, "LYSOZYME FRAGMENT", &pdb.topology, &pdb.positions).unwrap();

        let mut result = File::open(path_to_output).unwrap();
        let mut expected = File::open("test_files/lysozyme_fragment_written.pdb").unwrap();

        assert!(file_diff::diff_files(&mut result, &mut expected));

        let reread = read_pdb(path_to_output, default_elements()).unwrap();
        assert_eq!(reread.topology, pdb.topology);
    }

    #[test]
    fn write_count_mismatch() {
        let pdb = read_pdb("test_files/lysozyme_fragment.pdb", default_elements()).unwrap();

        assert_eq!(
            write_pdb(
                "should_not_be_created.pdb",
                "Title",
                &pdb.topology,
                &Positions::zeros(3)
            ),
            Err(WritePdbError::AtomCountMismatch {
                topology: 17,
                positions: 3
            })
        );
        assert!(!Path::new("should_not_be_created.pdb").exists());
    }

    #[test]
    fn write_fails() {
        match write_pdb(
            "Xhfguiaghqueiowhd/nonexistent.pdb",
            "Title",
            &Topology::new(),
            &Positions::default(),
        ) {
            Err(WritePdbError::CouldNotCreate(e)) => {
                assert_eq!(e, Box::from(Path::new("Xhfguiaghqueiowhd/nonexistent.pdb")))
            }
            Ok(_) => panic!("Writing should have failed, but it did not."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }
}
