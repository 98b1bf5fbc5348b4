// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the Element structure and the table of supported elements.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use crate::errors::{ElementError, ParseElementError};

/// Contains information about a specific chemical element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Name of the element (e.g. `argon`).
    name: String,
    /// Chemical symbol of the element (e.g. `Ar`).
    symbol: String,
    /// Atomic mass in amu.
    mass: f64,
    /// Van der Waals radius in nm.
    #[serde(skip_serializing_if = "Option::is_none")]
    vdw: Option<f64>,
    /// Intrinsic Born radius in nm.
    #[serde(skip_serializing_if = "Option::is_none")]
    gb_radius: Option<f64>,
    /// Descreening scale factor for generalized Born models.
    #[serde(skip_serializing_if = "Option::is_none")]
    gb_scale: Option<f64>,
}

impl Element {
    /// Get an element from the default table of supported elements by its symbol.
    /// The symbol is matched case-insensitively.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// #
    /// let argon = Element::by_symbol("Ar").unwrap();
    /// assert_eq!(argon.get_name(), "argon");
    /// ```
    pub fn by_symbol(symbol: &str) -> Result<Element, ElementError> {
        default_elements()
            .get_by_symbol(symbol)
            .cloned()
            .ok_or_else(|| ElementError::UnknownSymbol(symbol.to_owned()))
    }

    /// Get the name of the element.
    #[inline(always)]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Get the chemical symbol of the element.
    #[inline(always)]
    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the atomic mass of the element in amu.
    #[inline(always)]
    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    /// Get the van der Waals radius of the element in nm.
    #[inline(always)]
    pub fn get_vdw(&self) -> Option<f64> {
        self.vdw
    }

    /// Get the intrinsic Born radius of the element in nm.
    #[inline(always)]
    pub fn get_gb_radius(&self) -> Option<f64> {
        self.gb_radius
    }

    /// Get the generalized Born descreening scale factor of the element.
    #[inline(always)]
    pub fn get_gb_scale(&self) -> Option<f64> {
        self.gb_scale
    }

    /// Update fields of `self` based on an element entry read from a yaml file.
    fn update(&mut self, entry: ElementEntry) {
        if let Some(symbol) = entry.symbol {
            self.symbol = symbol;
        }

        if let Some(mass) = entry.mass {
            self.mass = mass;
        }

        if entry.vdw.is_some() {
            self.vdw = entry.vdw;
        }

        if entry.gb_radius.is_some() {
            self.gb_radius = entry.gb_radius;
        }

        if entry.gb_scale.is_some() {
            self.gb_scale = entry.gb_scale;
        }
    }
}

/// Element as specified in the yaml file. All fields are optional so that
/// the file can be used to update an existing table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementEntry {
    symbol: Option<String>,
    mass: Option<f64>,
    vdw: Option<f64>,
    gb_radius: Option<f64>,
    gb_scale: Option<f64>,
}

impl ElementEntry {
    /// Check that all provided numerical values are positive and finite.
    fn validate(&self, name: &str) -> Result<(), ParseElementError> {
        let fields = [
            ("mass", self.mass),
            ("vdw", self.vdw),
            ("gb_radius", self.gb_radius),
            ("gb_scale", self.gb_scale),
        ];

        for (field, value) in fields {
            match value {
                Some(v) if !v.is_finite() || v <= 0.0 => {
                    return Err(ParseElementError::InvalidValue(name.to_owned(), field, v))
                }
                _ => (),
            }
        }

        Ok(())
    }

    /// Convert the entry into a complete element. Symbol and mass must be provided.
    fn into_element(self, name: &str) -> Result<Element, ParseElementError> {
        let symbol = self
            .symbol
            .ok_or_else(|| ParseElementError::MissingField(name.to_owned(), "symbol"))?;
        let mass = self
            .mass
            .ok_or_else(|| ParseElementError::MissingField(name.to_owned(), "mass"))?;

        Ok(Element {
            name: name.to_owned(),
            symbol,
            mass,
            vdw: self.vdw,
            gb_radius: self.gb_radius,
            gb_scale: self.gb_scale,
        })
    }
}

/// Contains information about all elements that can occur in the test systems.
#[derive(Debug, Clone)]
pub struct SupportedElements {
    /// All supported elements. Keys are names of the elements.
    elements: IndexMap<String, Element>,
    /// Converts normalized element symbol to element name.
    symbols2names: HashMap<String, String>,
}

impl Default for SupportedElements {
    /// Construct a default `SupportedElements` structure.
    ///
    /// ## Notes
    /// - This function parses YAML content from `src/config/elements.yaml`
    /// which is included in the library at compile time.
    /// - Use [`default_elements`] to access a shared, lazily constructed instance.
    fn default() -> Self {
        let yaml = include_str!("../config/elements.yaml");

        SupportedElements::new_from_string(yaml)
            .expect("FATAL TESTSYS ERROR | SupportedElements::default | Default `elements.yaml` file could not be parsed.")
    }
}

impl SupportedElements {
    /// Construct a new `SupportedElements` structure from the provided YAML file.
    ///
    /// ## Notes
    /// - For an example of the 'elements yaml file', see `src/config/elements.yaml`.
    pub fn new_from_file(filename: impl AsRef<Path>) -> Result<Self, ParseElementError> {
        SupportedElements::new_from_string(&SupportedElements::load_yaml_to_string(filename)?)
    }

    /// Parse yaml string into `SupportedElements` structure.
    fn new_from_string(yaml: &str) -> Result<Self, ParseElementError> {
        let entries: IndexMap<String, ElementEntry> =
            serde_yaml::from_str(yaml).map_err(ParseElementError::CouldNotParseYaml)?;

        let mut elements = IndexMap::new();
        for (name, entry) in entries.into_iter() {
            entry.validate(&name)?;
            let element = entry.into_element(&name)?;
            elements.insert(name, element);
        }

        let symbols2names = SupportedElements::make_symbols2names(&elements)?;

        Ok(SupportedElements {
            elements,
            symbols2names,
        })
    }

    /// Update `SupportedElements` structure using data from the provided YAML file.
    ///
    /// ## Returns
    /// `Ok` if the parsing was successful.
    /// `ParseElementError` otherwise. If an error occurs, the `SupportedElements` structure is not changed.
    ///
    /// ## Example
    /// A yaml file adding selenium and changing the Born radius of sulfur:
    /// ```yaml
    /// ---
    /// sulfur:
    ///   gb_radius: 0.185
    /// selenium:
    ///   symbol: Se
    ///   mass: 78.971
    /// ...
    /// ```
    ///
    /// ```no_run
    /// # use testsys_rs::prelude::*;
    /// #
    /// let mut elements = SupportedElements::default();
    /// elements.update_from_file("my_elements.yaml").unwrap();
    /// ```
    pub fn update_from_file(&mut self, filename: impl AsRef<Path>) -> Result<(), ParseElementError> {
        let yaml = SupportedElements::load_yaml_to_string(filename)?;
        let entries: IndexMap<String, ElementEntry> =
            serde_yaml::from_str(&yaml).map_err(ParseElementError::CouldNotParseYaml)?;

        // work on a copy so that `self` stays unchanged on error
        let mut elements = self.elements.clone();
        for (name, entry) in entries.into_iter() {
            entry.validate(&name)?;

            match elements.get_mut(&name) {
                Some(old) => old.update(entry),
                None => {
                    let element = entry.into_element(&name)?;
                    elements.insert(name, element);
                }
            }
        }

        self.symbols2names = SupportedElements::make_symbols2names(&elements)?;
        self.elements = elements;

        Ok(())
    }

    /// Get element by its name (e.g. `carbon`).
    #[inline]
    pub fn get_by_name(&self, name: &str) -> Option<&Element> {
        self.elements.get(name)
    }

    /// Get element by its chemical symbol. The symbol is matched case-insensitively.
    pub fn get_by_symbol(&self, symbol: &str) -> Option<&Element> {
        self.symbols2names
            .get(&normalize_symbol(symbol))
            .and_then(|name| self.elements.get(name))
    }

    /// Guess the element of an atom from its name, as commonly done for PDB files
    /// lacking the element column.
    ///
    /// ## Notes
    /// - Leading digits are skipped (e.g. `1HB` is hydrogen).
    /// - Two-letter symbols are only considered for atom names which are not
    /// typical protein atom names, so `CA` is carbon and not calcium.
    pub fn guess_from_atom_name(&self, atom_name: &str, residue_name: &str) -> Option<&Element> {
        let letters: String = atom_name
            .trim()
            .chars()
            .skip_while(|c| c.is_ascii_digit())
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();

        if letters.is_empty() {
            return None;
        }

        // ions and single-atom residues: the residue name is the symbol
        if atom_name.trim().eq_ignore_ascii_case(residue_name.trim()) {
            if let Some(element) = self.get_by_symbol(residue_name.trim()) {
                return Some(element);
            }
        }

        self.get_by_symbol(&letters[0..1])
            .or_else(|| letters.get(0..2).and_then(|two| self.get_by_symbol(two)))
    }

    /// Get the number of supported elements.
    #[inline]
    pub fn get_n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Iterate over the supported elements in the order in which they were defined.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Opens the specified file and loads its contents into a string.
    fn load_yaml_to_string(filename: impl AsRef<Path>) -> Result<String, ParseElementError> {
        let mut yaml_file = File::open(&filename)
            .map_err(|_| ParseElementError::FileNotFound(Box::from(filename.as_ref())))?;

        let mut yaml_string = String::new();
        yaml_file
            .read_to_string(&mut yaml_string)
            .map_err(|_| ParseElementError::CouldNotRead(Box::from(filename.as_ref())))?;

        Ok(yaml_string)
    }

    /// Creates new `symbols2names` hashmap from the provided `elements`.
    fn make_symbols2names(
        elements: &IndexMap<String, Element>,
    ) -> Result<HashMap<String, String>, ParseElementError> {
        let mut symbols2names = HashMap::new();

        for (name, element) in elements.iter() {
            if let Some(previous) =
                symbols2names.insert(normalize_symbol(&element.symbol), name.to_owned())
            {
                return Err(ParseElementError::DuplicateSymbol(
                    element.symbol.to_owned(),
                    name.to_owned(),
                    previous,
                ));
            }
        }

        Ok(symbols2names)
    }
}

/// Get reference to the shared default table of supported elements.
/// The table is parsed on first use.
pub fn default_elements() -> &'static SupportedElements {
    static ELEMENTS: OnceLock<SupportedElements> = OnceLock::new();
    ELEMENTS.get_or_init(SupportedElements::default)
}

/// Convert symbol to the canonical form: first letter uppercase, the rest lowercase.
fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn elements_default() {
        let elements = SupportedElements::default();

        assert_eq!(elements.get_n_elements(), 13);
        assert_eq!(elements.symbols2names.len(), 13);

        let first = elements.iter().next().unwrap();
        assert_eq!(first.get_name(), "hydrogen");
        assert_eq!(first.get_symbol(), "H");
        assert_approx_eq!(f64, first.get_mass(), 1.008);

        let argon = elements.get_by_name("argon").unwrap();
        assert_eq!(argon.get_symbol(), "Ar");
        assert_approx_eq!(f64, argon.get_mass(), 39.948);
        assert_approx_eq!(f64, argon.get_vdw().unwrap(), 0.188);
        assert_approx_eq!(f64, argon.get_gb_radius().unwrap(), 0.150);
        assert_approx_eq!(f64, argon.get_gb_scale().unwrap(), 0.80);
    }

    #[test]
    fn elements_from_file() {
        let default_elements = SupportedElements::default();
        let from_file = SupportedElements::new_from_file("src/config/elements.yaml").unwrap();

        assert_eq!(default_elements.get_n_elements(), from_file.get_n_elements());
        for (e1, e2) in default_elements.iter().zip(from_file.iter()) {
            assert_eq!(e1, e2);
        }
    }

    #[test]
    fn elements_nonexistent_file() {
        match SupportedElements::new_from_file("test_files/nonexistent.yaml") {
            Err(ParseElementError::FileNotFound(path)) => {
                assert_eq!(path, Box::from(Path::new("test_files/nonexistent.yaml")))
            }
            Ok(_) => panic!("Parsing should have failed."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }

    #[test]
    fn elements_invalid_field() {
        match SupportedElements::new_from_string("carbon:\n  symbol: C\n  mass: 12.0\n  charge: 0.0\n") {
            Err(ParseElementError::CouldNotParseYaml(_)) => (),
            Ok(_) => panic!("Parsing should have failed."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }

    #[test]
    fn elements_invalid_mass() {
        match SupportedElements::new_from_string("carbon:\n  symbol: C\n  mass: -12.0\n") {
            Err(ParseElementError::InvalidValue(name, field, value)) => {
                assert_eq!(name, "carbon");
                assert_eq!(field, "mass");
                assert_approx_eq!(f64, value, -12.0);
            }
            Ok(_) => panic!("Parsing should have failed."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }

    #[test]
    fn elements_missing_symbol() {
        match SupportedElements::new_from_string("carbon:\n  mass: 12.0\n") {
            Err(ParseElementError::MissingField(name, field)) => {
                assert_eq!(name, "carbon");
                assert_eq!(field, "symbol");
            }
            Ok(_) => panic!("Parsing should have failed."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }

    #[test]
    fn elements_duplicate_symbol() {
        let yaml = "carbon:\n  symbol: C\n  mass: 12.0\ncalcium:\n  symbol: c\n  mass: 40.0\n";
        match SupportedElements::new_from_string(yaml) {
            Err(ParseElementError::DuplicateSymbol(symbol, name, previous)) => {
                assert_eq!(symbol, "c");
                assert_eq!(name, "calcium");
                assert_eq!(previous, "carbon");
            }
            Ok(_) => panic!("Parsing should have failed."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }

    #[test]
    fn elements_update() {
        let mut elements = SupportedElements::default();
        elements
            .update_from_file("test_files/elements_update.yaml")
            .unwrap();

        assert_eq!(elements.get_n_elements(), 14);

        let sulfur = elements.get_by_symbol("S").unwrap();
        assert_approx_eq!(f64, sulfur.get_gb_radius().unwrap(), 0.185);
        assert_approx_eq!(f64, sulfur.get_mass(), 32.06);

        let selenium = elements.get_by_symbol("Se").unwrap();
        assert_eq!(selenium.get_name(), "selenium");
        assert_approx_eq!(f64, selenium.get_mass(), 78.971);
        assert!(selenium.get_gb_radius().is_none());
    }

    #[test]
    fn elements_update_fails_unchanged() {
        let mut elements = SupportedElements::default();
        assert!(elements
            .update_from_file("test_files/elements_update_invalid.yaml")
            .is_err());

        assert_eq!(elements.get_n_elements(), 13);
        assert!(elements.get_by_symbol("Se").is_none());
    }

    #[test]
    fn get_by_symbol_case_insensitive() {
        let elements = SupportedElements::default();

        assert_eq!(elements.get_by_symbol("AR").unwrap().get_name(), "argon");
        assert_eq!(elements.get_by_symbol("ar").unwrap().get_name(), "argon");
        assert_eq!(elements.get_by_symbol(" Cl ").unwrap().get_name(), "chlorine");
        assert!(elements.get_by_symbol("Xx").is_none());
        assert!(elements.get_by_symbol("").is_none());
    }

    #[test]
    fn by_symbol_default_table() {
        assert_eq!(Element::by_symbol("N").unwrap().get_name(), "nitrogen");
        assert_eq!(
            Element::by_symbol("Uuo"),
            Err(ElementError::UnknownSymbol("Uuo".to_owned()))
        );
    }

    #[test]
    fn guess_from_atom_name() {
        let elements = SupportedElements::default();

        assert_eq!(elements.guess_from_atom_name("CA", "ALA").unwrap().get_symbol(), "C");
        assert_eq!(elements.guess_from_atom_name("1HB", "ALA").unwrap().get_symbol(), "H");
        assert_eq!(elements.guess_from_atom_name("OD1", "ASN").unwrap().get_symbol(), "O");
        assert_eq!(elements.guess_from_atom_name("SD", "MET").unwrap().get_symbol(), "S");
        assert_eq!(elements.guess_from_atom_name("CL", "CL").unwrap().get_symbol(), "Cl");
        assert_eq!(elements.guess_from_atom_name("AR", "AR").unwrap().get_symbol(), "Ar");
        assert!(elements.guess_from_atom_name("123", "UNK").is_none());
    }
}
