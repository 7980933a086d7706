//! Display options bitmask

use std::fmt;

/// Which member categories the reflective handler lists
///
/// Unknown bits are carried but ignored. No option excludes another.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayOptions(u8);

impl DisplayOptions {
    pub const NONE: Self = Self(0);
    pub const FIELDS: Self = Self(1);
    pub const PROPERTIES: Self = Self(1 << 1);
    pub const BACKING_FIELDS: Self = Self(1 << 2);

    /// Option names in bit order, for toggles and config files
    pub const NAMES: [&'static str; 3] = ["fields", "properties", "backing_fields"];

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Copy with `option` switched on or off
    pub const fn with(self, option: Self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | option.0)
        } else {
            Self(self.0 & !option.0)
        }
    }

    /// Option at position `index` of [`Self::NAMES`]
    pub fn by_index(index: usize) -> Option<Self> {
        (index < Self::NAMES.len()).then(|| Self(1 << index))
    }

    pub fn is_set_index(self, index: usize) -> bool {
        Self::by_index(index).is_some_and(|option| self.contains(option))
    }

    pub fn with_index(self, index: usize, enabled: bool) -> Self {
        match Self::by_index(index) {
            Some(option) => self.with(option, enabled),
            None => self,
        }
    }

    /// Look up an option by name (case-insensitive, `-` and `_` interchangeable)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::NAMES
            .iter()
            .position(|candidate| *candidate == normalized)
            .and_then(Self::by_index)
    }

    /// Combine named options; returns the unknown names separately
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> (Self, Vec<String>) {
        let mut options = Self::NONE;
        let mut unknown = Vec::new();
        for name in names {
            match Self::from_name(name) {
                Some(option) => options = options.with(option, true),
                None => unknown.push(name.to_string()),
            }
        }
        (options, unknown)
    }

    /// Names of the enabled known options
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .enumerate()
            .filter(|(index, _)| self.is_set_index(*index))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::FIELDS.with(Self::PROPERTIES, true)
    }
}

impl fmt::Debug for DisplayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayOptions({})", self.names().join("|"))
    }
}
