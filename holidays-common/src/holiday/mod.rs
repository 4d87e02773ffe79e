use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

// Needed by strum's EnumString in tests
#[allow(unused_imports)]
use std::str::FromStr;

/// Countries the workflow pulls public holidays for.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum CountryCode {
    Ru,
    By,
    Ua,
}

impl CountryCode {
    /// Fixed processing order, `load_source_api_N` handles `ALL[N - 1]`.
    pub const ALL: [CountryCode; 3] = [CountryCode::Ru, CountryCode::By, CountryCode::Ua];
}

/// Storage tier requested when writing a staged object.
#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageClass {
    Standard,
    #[default]
    Cold,
}

/// Key of the object handed off between the fetch and load stages.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StagedObjectKey {
    pub year: i32,
    pub country: CountryCode,
}

impl StagedObjectKey {
    pub fn new(year: i32, country: CountryCode) -> Self {
        Self { year, country }
    }

    /// `{year}/{country}.csv`
    pub fn object_key(&self) -> String {
        format!("{}/{}.csv", self.year, self.country)
    }
}

impl fmt::Display for StagedObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.object_key())
    }
}

/// Schema-qualified target table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl Default for TableRef {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            name: "holidays".to_string(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_format() {
        let key = StagedObjectKey::new(2023, CountryCode::By);
        assert_eq!(key.object_key(), "2023/BY.csv");
        assert_eq!(key.to_string(), "2023/BY.csv");
    }

    #[test]
    fn test_country_code_parsing() {
        assert_eq!(CountryCode::from_str("RU").unwrap(), CountryCode::Ru);
        assert_eq!(CountryCode::from_str("ua").unwrap(), CountryCode::Ua);
        assert!(CountryCode::from_str("PL").is_err());
        assert_eq!(CountryCode::Ua.to_string(), "UA");
    }

    #[test]
    fn test_storage_class_renders_upper_case() {
        assert_eq!(StorageClass::default(), StorageClass::Cold);
        assert_eq!(StorageClass::Cold.to_string(), "COLD");
    }

    #[test]
    fn test_default_table() {
        assert_eq!(TableRef::default().to_string(), "public.holidays");
    }
}
