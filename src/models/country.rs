//! Country identity, resolved once at ingestion.

use serde::Serialize;

/// Reserved snapshot identifier for the cross-country rollup series.
pub const GLOBAL_ID: &str = "GLOBAL";

/// Display name of the rollup series.
pub const GLOBAL_NAME: &str = "Global";

/// Canonical identity of a reporting entity.
///
/// Feeds key rows by inconsistent free-text labels and codes; every row is
/// resolved to one of these variants at ingestion and identity is never
/// re-derived downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CountryIdentity {
    /// An ISO 3166-1 registered country.
    Registered {
        alpha2: String,
        alpha3: String,
        name: String,
    },

    /// A non-ISO entity (cruise ship, partially recognized state, rollup),
    /// keyed by a stable reserved pseudo-code.
    Special { code: String, name: String },
}

impl CountryIdentity {
    /// Build an identity from an ISO registry entry.
    pub fn registered(entry: &rust_iso3166::CountryCode) -> Self {
        Self::Registered {
            alpha2: entry.alpha2.to_string(),
            alpha3: entry.alpha3.to_string(),
            name: entry.name.to_string(),
        }
    }

    /// Build a special-entity identity with a reserved pseudo-code.
    pub fn special(code: &str, name: &str) -> Self {
        Self::Special {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    /// The rollup identity under the reserved `GLOBAL` identifier.
    pub fn global() -> Self {
        Self::special(GLOBAL_ID, GLOBAL_NAME)
    }

    /// Canonical identifier: alpha-3 for registered countries, the reserved
    /// pseudo-code for special entities. Snapshot key.
    pub fn id(&self) -> &str {
        match self {
            Self::Registered { alpha3, .. } => alpha3,
            Self::Special { code, .. } => code,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Registered { name, .. } | Self::Special { name, .. } => name,
        }
    }
}
