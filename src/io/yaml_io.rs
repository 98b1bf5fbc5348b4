// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of functions for reading parameter files and writing serialized test systems.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::errors::{ExportError, ParseConfigError};

/// Read a yaml file and deserialize it into `T`.
pub fn read_yaml<T: DeserializeOwned>(filename: impl AsRef<Path>) -> Result<T, ParseConfigError> {
    let mut file = File::open(filename.as_ref())
        .map_err(|_| ParseConfigError::FileNotFound(Box::from(filename.as_ref())))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|_| ParseConfigError::CouldNotRead(Box::from(filename.as_ref())))?;

    serde_yaml::from_str(&content).map_err(ParseConfigError::CouldNotParseYaml)
}

/// Write one or more yaml documents into a single file.
/// Documents after the first one are separated by `---`.
pub fn write_yaml_documents(
    filename: impl AsRef<Path>,
    documents: &[&str],
) -> Result<(), ExportError> {
    let output = File::create(filename.as_ref())
        .map_err(|_| ExportError::CouldNotCreate(Box::from(filename.as_ref())))?;

    let mut writer = BufWriter::new(output);
    let write_error = || ExportError::CouldNotWrite(Box::from(filename.as_ref()));

    for (i, document) in documents.iter().enumerate() {
        if i > 0 {
            writeln!(writer, "---").map_err(|_| write_error())?;
        }

        write!(writer, "{}", document).map_err(|_| write_error())?;
    }

    writer.flush().map_err(|_| write_error())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Simple {
        value: f64,
    }

    #[test]
    fn read_nonexistent() {
        match read_yaml::<Simple>("test_files/nonexistent.yaml") {
            Err(ParseConfigError::FileNotFound(path)) => {
                assert_eq!(path, Box::from(Path::new("test_files/nonexistent.yaml")))
            }
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn read_invalid() {
        match read_yaml::<Simple>("test_files/lj_params_unknown_field.yaml") {
            Err(ParseConfigError::CouldNotParseYaml(_)) => (),
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn write_documents() {
        let output = NamedTempFile::new().unwrap();
        write_yaml_documents(output.path(), &["a: 1\n", "b: 2\n"]).unwrap();

        let content = fs::read_to_string(output.path()).unwrap();
        assert_eq!(content, "a: 1\n---\nb: 2\n");

        let documents: Vec<serde_yaml::Value> = serde_yaml::Deserializer::from_str(&content)
            .map(serde_yaml::Value::deserialize)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(documents.len(), 2);
    }

    #[test]
    fn write_fails() {
        match write_yaml_documents("Xhfguiaghqueiowhd/nonexistent.yaml", &["a: 1\n"]) {
            Err(ExportError::CouldNotCreate(e)) => {
                assert_eq!(e, Box::from(Path::new("Xhfguiaghqueiowhd/nonexistent.yaml")))
            }
            Ok(_) => panic!("Writing should have failed, but it did not."),
            Err(e) => panic!("Incorrect error type `{:?}` was returned.", e),
        }
    }
}
