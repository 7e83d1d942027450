//! Built-in list of countries, consulates and visa types.

use serde::Serialize;

pub const DEFAULT_COUNTRY: &str = "Canada";
pub const DEFAULT_CONSULATE: &str = "Toronto, Canada";
pub const DEFAULT_VISA_TYPE: &str = "F-1 Student Visa";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Consulate {
    /// Short display name, e.g. "Toronto"
    pub name: &'static str,
    /// Identifier passed to the oracle, e.g. "Toronto, Canada"
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub consulates: &'static [Consulate],
}

const fn consulate(name: &'static str, value: &'static str) -> Consulate {
    Consulate { name, value }
}

pub static COUNTRIES: &[Country] = &[
    Country {
        name: "Canada",
        consulates: &[
            consulate("Toronto", "Toronto, Canada"),
            consulate("Vancouver", "Vancouver, Canada"),
            consulate("Montreal", "Montreal, Canada"),
        ],
    },
    Country {
        name: "India",
        consulates: &[
            consulate("New Delhi", "New Delhi, India"),
            consulate("Mumbai", "Mumbai, India"),
            consulate("Chennai", "Chennai, India"),
        ],
    },
    Country {
        name: "Germany",
        consulates: &[
            consulate("Berlin", "Berlin, Germany"),
            consulate("Frankfurt", "Frankfurt, Germany"),
            consulate("Munich", "Munich, Germany"),
        ],
    },
    Country {
        name: "Mexico",
        consulates: &[
            consulate("Mexico City", "Mexico City, Mexico"),
            consulate("Tijuana", "Tijuana, Mexico"),
            consulate("Guadalajara", "Guadalajara, Mexico"),
        ],
    },
];

pub static VISA_TYPES: &[&str] = &["F-1 Student Visa", "B1/B2 Visitor Visa", "H-1B Work Visa"];

/// Case-insensitive country lookup.
pub fn find_country(name: &str) -> Option<&'static Country> {
    COUNTRIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

/// Consulates of `country`; empty for unknown countries.
pub fn consulates(country: &str) -> &'static [Consulate] {
    find_country(country).map(|c| c.consulates).unwrap_or(&[])
}

pub fn default_consulate(country: &str) -> Option<&'static Consulate> {
    consulates(country).first()
}

/// Resolves a consulate of `country` by short name or full value.
pub fn find_consulate(country: &str, name: &str) -> Option<&'static Consulate> {
    let name = name.trim();
    consulates(country)
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name) || c.value.eq_ignore_ascii_case(name))
}

/// Resolves a visa type by exact name or by its leading code (e.g. "H-1B").
pub fn find_visa_type(name: &str) -> Option<&'static str> {
    let name = name.trim();
    VISA_TYPES.iter().copied().find(|v| {
        v.eq_ignore_ascii_case(name)
            || v.split_whitespace()
                .next()
                .is_some_and(|code| code.eq_ignore_ascii_case(name))
    })
}
