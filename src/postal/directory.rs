//! PIN-code reference directory.
//!
//! Exact six-digit PIN entries plus a coarser first-digit fallback table.
//! Providers sit behind a trait so tests can substitute fixture tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Macro-region implied by the first digit of a PIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    /// Region for a PIN's first digit. Digits 7-9 are East, with 9 also
    /// covering the military postal authorities.
    pub fn from_first_digit(digit: char) -> Option<Self> {
        match digit {
            '1' | '2' => Some(Self::North),
            '3' | '4' => Some(Self::West),
            '5' | '6' => Some(Self::South),
            '7' | '8' | '9' => Some(Self::East),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
        }
    }
}

/// One exact PIN-to-place reference row. Immutable, loaded once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub pincode: String,
    pub region: Region,
    pub state: String,
    pub district: String,
}

impl ReferenceEntry {
    pub fn new(pincode: &str, region: Region, state: &str, district: &str) -> Self {
        Self {
            pincode: pincode.to_string(),
            region,
            state: state.to_string(),
            district: district.to_string(),
        }
    }
}

/// Read-only source of PIN reference data.
pub trait PincodeDirectory: Send + Sync {
    /// Exact six-digit PIN lookup.
    fn lookup_exact(&self, pin: &str) -> Option<&ReferenceEntry>;

    /// Acceptable state/authority tokens for a PIN's first digit.
    fn lookup_fallback(&self, first_digit: char) -> Option<&[String]>;
}

/// In-memory directory backed by literal tables.
pub struct StaticDirectory {
    entries: HashMap<String, ReferenceEntry>,
    fallback: HashMap<char, Vec<String>>,
}

impl StaticDirectory {
    pub fn new(entries: Vec<ReferenceEntry>, fallback: Vec<(char, Vec<&str>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.pincode.clone(), e))
                .collect(),
            fallback: fallback
                .into_iter()
                .map(|(digit, tokens)| {
                    (digit, tokens.into_iter().map(str::to_string).collect())
                })
                .collect(),
        }
    }

    /// The bundled reference tables shipped with the binary.
    pub fn bundled() -> Self {
        use Region::{East, North, South, West};
        Self::new(
            vec![
                ReferenceEntry::new("500001", South, "Telangana", "Hyderabad"),
                ReferenceEntry::new("560001", South, "Karnataka", "Bangalore"),
                ReferenceEntry::new("600001", South, "Tamil Nadu", "Chennai"),
                ReferenceEntry::new("682001", South, "Kerala", "Ernakulam"),
                ReferenceEntry::new("110001", North, "Delhi", "New Delhi"),
                ReferenceEntry::new("110002", North, "Delhi", "New Delhi"),
                ReferenceEntry::new("110003", North, "Delhi", "New Delhi"),
                ReferenceEntry::new("400001", West, "Maharashtra", "Mumbai"),
                ReferenceEntry::new("700001", East, "West Bengal", "Kolkata"),
                ReferenceEntry::new("302001", North, "Rajasthan", "Jaipur"),
            ],
            vec![
                (
                    '1',
                    vec![
                        "Delhi", "Haryana", "Punjab", "Himachal", "Jammu", "Kashmir",
                        "Chandigarh",
                    ],
                ),
                ('2', vec!["Uttar Pradesh", "Uttarakhand"]),
                ('3', vec!["Rajasthan", "Gujarat", "Daman", "Diu", "Dadra"]),
                (
                    '4',
                    vec!["Maharashtra", "Goa", "Madhya Pradesh", "Chhattisgarh"],
                ),
                ('5', vec!["Andhra Pradesh", "Telangana", "Karnataka"]),
                ('6', vec!["Tamil Nadu", "Kerala", "Puducherry", "Lakshadweep"]),
                (
                    '7',
                    vec![
                        "West Bengal", "Odisha", "Assam", "Sikkim", "Arunachal", "Nagaland",
                        "Manipur", "Mizoram", "Tripura", "Meghalaya",
                    ],
                ),
                ('8', vec!["Bihar", "Jharkhand"]),
                ('9', vec!["Army Postal Service", "Field Post Office"]),
            ],
        )
    }
}

impl PincodeDirectory for StaticDirectory {
    fn lookup_exact(&self, pin: &str) -> Option<&ReferenceEntry> {
        self.entries.get(pin)
    }

    fn lookup_fallback(&self, first_digit: char) -> Option<&[String]> {
        self.fallback.get(&first_digit).map(Vec::as_slice)
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self::bundled()
    }
}
