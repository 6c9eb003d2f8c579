use std::path::{Path, PathBuf};

const MAPPING_SUFFIX: &str = " Mapping.csv";
const GENERIC_MAPPING: &str = "Mapping.csv";
const OTHER: &str = "Other";

/// A property (entity) has its own mapping file `"<name> Mapping.csv"`. Everything else uses
/// the generic `Mapping.csv` and is exported as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Property {
    Named(String),
    Other,
}

impl Property {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case(OTHER) {
            Property::Other
        } else {
            Property::Named(name.to_string())
        }
    }

    /// Guess the property from a mapping file name, e.g. `Oak Street Mapping.csv`.
    pub fn from_mapping_path(path: &Path) -> Self {
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => match name.strip_suffix(MAPPING_SUFFIX) {
                Some(property) if !property.is_empty() => Property::Named(property.to_string()),
                _ => Property::Other,
            },
            None => Property::Other,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Property::Named(name) => name,
            Property::Other => OTHER,
        }
    }

    pub fn mapping_path(&self, mapping_dir: &Path) -> PathBuf {
        match self {
            Property::Named(name) => mapping_dir.join(format!("{name}{MAPPING_SUFFIX}")),
            Property::Other => mapping_dir.join(GENERIC_MAPPING),
        }
    }
}

/// List the properties that have a mapping file in `mapping_dir`, sorted by name, followed by
/// [Property::Other].
pub fn discover_properties(mapping_dir: &Path) -> std::io::Result<Vec<Property>> {
    let mut properties = Vec::new();
    for entry in std::fs::read_dir(mapping_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            log::warn!("Ignoring non-utf8 file name {:?}", entry.file_name());
            continue;
        };
        if let Some(property) = file_name.strip_suffix(MAPPING_SUFFIX) {
            if !property.is_empty() {
                properties.push(Property::Named(property.to_string()));
            }
        }
    }
    properties.sort();
    properties.push(Property::Other);
    Ok(properties)
}
