use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    (
        "scalability",
        &["Scalability", "scalability", "SCALABILITY", "Scale"],
    ),
    (
        "integrations",
        &[
            "Integrations",
            "Integrations & Extensibility",
            "integrations-extensibility",
            "integrations_extensibility",
            "Integration",
            "integration",
        ],
    ),
    (
        "easeOfUse",
        &[
            "Ease of Use",
            "ease of use",
            "ease-of-use",
            "ease_of_use",
            "EaseOfUse",
            "Usability",
        ],
    ),
    (
        "flexibility",
        &[
            "Flexibility",
            "Flexibility & Customization",
            "flexibility-customization",
            "flexibility_customization",
            "Customization",
        ],
    ),
    (
        "ppmFeatures",
        &[
            "PPM Features",
            "ppm features",
            "ppm-features",
            "ppm_features",
            "PPMFeatures",
            "Portfolio Management",
        ],
    ),
    (
        "reporting",
        &[
            "Reporting",
            "Reporting & Analytics",
            "reporting-analytics",
            "reporting_analytics",
            "Analytics",
        ],
    ),
    (
        "security",
        &[
            "Security",
            "Security & Compliance",
            "security-compliance",
            "security_compliance",
            "Compliance",
        ],
    ),
];

/// Alternate `ratings` keys under which a canonical criterion id may appear.
///
/// Aliases are tried in insertion order. The table serializes as a plain JSON
/// object of `id -> [alias, ...]` so deployments can ship extensions as files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table covering the criteria shipped with the default criteria list.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (id, aliases) in BUILTIN_ALIASES {
            table.register(*id, aliases.iter().copied());
        }
        table
    }

    /// Appends aliases for `criterion_id`, skipping ones already present.
    pub fn register<I, S>(&mut self, criterion_id: impl Into<String>, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known = self.entries.entry(criterion_id.into()).or_default();
        for alias in aliases {
            let alias = alias.into();
            if !alias.is_empty() && !known.contains(&alias) {
                known.push(alias);
            }
        }
    }

    /// Merges every entry of `other` into this table.
    pub fn extend(&mut self, other: AliasTable) {
        for (id, aliases) in other.entries {
            self.register(id, aliases);
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn aliases_for(&self, criterion_id: &str) -> &[String] {
        self.entries
            .get(criterion_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
