use std::{
    collections::HashMap,
    io::{Read, Write},
};

use serde::{Deserialize, Serialize};

use crate::CodeError;

/// Metadata stored next to an encoded stream.
///
/// The code table carries no length information, so the number of meaningful
/// bits travels here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    /// Number of distinct symbols in the code
    pub symbols: usize,
    /// Number of encoded symbols
    pub length: usize,
    /// Number of meaningful bits in the encoded stream
    pub bits: usize,
}

fn parse_value(map: &HashMap<String, String>, key: &str) -> Result<usize, CodeError> {
    let value = map.get(key).ok_or_else(|| CodeError::Properties {
        key: key.to_owned(),
        message: "missing".to_owned(),
    })?;

    value.trim().parse().map_err(|_| CodeError::Properties {
        key: key.to_owned(),
        message: format!("{:?} is not a non-negative integer", value),
    })
}

impl TryFrom<HashMap<String, String>> for Properties {
    type Error = CodeError;

    fn try_from(value: HashMap<String, String>) -> Result<Self, Self::Error> {
        Ok(Properties {
            symbols: parse_value(&value, "symbols")?,
            length: parse_value(&value, "length")?,
            bits: parse_value(&value, "bits")?,
        })
    }
}

impl From<&Properties> for HashMap<String, String> {
    fn from(props: &Properties) -> Self {
        HashMap::from([
            ("symbols".to_owned(), props.symbols.to_string()),
            ("length".to_owned(), props.length.to_string()),
            ("bits".to_owned(), props.bits.to_string()),
        ])
    }
}

impl Properties {
    /// Reads a java-properties file.
    pub fn read<R: Read>(input: R) -> Result<Self, CodeError> {
        Self::try_from(java_properties::read(input)?)
    }

    pub fn write<W: Write>(&self, output: W) -> Result<(), CodeError> {
        java_properties::write(output, &HashMap::from(self))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs::File,
        io::{BufReader, BufWriter, Write},
    };

    use super::*;

    #[test]
    fn test_properties_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("message.properties");
        let props = Properties { symbols: 27, length: 1000, bits: 4211 };

        let mut output = BufWriter::new(File::create(&path).unwrap());
        props.write(&mut output).unwrap();
        output.flush().unwrap();

        let loaded = Properties::read(BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(loaded, props);
    }

    #[test]
    fn test_properties_parsing() {
        let input = "# comment\nsymbols = 2\nlength=3\nbits=4\nextra=yes\n";

        let props = Properties::read(input.as_bytes()).unwrap();

        assert_eq!(props, Properties { symbols: 2, length: 3, bits: 4 });
    }

    #[test]
    fn test_missing_property() {
        let err = Properties::read("symbols=2\nlength=3\n".as_bytes()).unwrap_err();

        assert!(matches!(err, CodeError::Properties { key, .. } if key == "bits"));
    }

    #[test]
    fn test_malformed_property() {
        let err = Properties::read("symbols=2\nlength=-3\nbits=1\n".as_bytes()).unwrap_err();

        assert!(matches!(err, CodeError::Properties { key, .. } if key == "length"));
    }
}
