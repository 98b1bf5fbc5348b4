// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Enum capturing file types supported by `testsys_rs`.

use std::path::Path;

/// Types of files supported by `testsys_rs`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FileType {
    Unknown,
    PDB,
    YAML,
}

impl FileType {
    /// Identify file type from the name of the file (based on file extension).
    pub fn from_name(filename: impl AsRef<Path>) -> FileType {
        let extension = match filename.as_ref().extension() {
            Some(x) => x,
            None => return FileType::Unknown,
        };

        match extension.to_str() {
            Some("pdb") => FileType::PDB,
            Some("yaml") | Some("yml") => FileType::YAML,
            Some(_) | None => FileType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_pdb() {
        assert_eq!(FileType::from_name("file.pdb"), FileType::PDB);
    }

    #[test]
    fn identify_yaml() {
        assert_eq!(FileType::from_name("file.yaml"), FileType::YAML);
        assert_eq!(FileType::from_name("output/system.yml"), FileType::YAML);
    }

    #[test]
    fn identify_unknown() {
        assert_eq!(FileType::from_name("file.xml"), FileType::Unknown);
        assert_eq!(FileType::from_name("file.PDB"), FileType::Unknown);
    }

    #[test]
    fn identify_noextension() {
        assert_eq!(FileType::from_name("file"), FileType::Unknown);
    }
}
