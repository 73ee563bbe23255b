//! Canonical name resolution for database unit folders
//!
//! Unit folders in a version carry a prefix, e.g. `Ordering-Counterparty`
//! for the `Counterparty` unit. Resolution picks the first configured unit
//! name contained in the raw folder name. Folders that match nothing get a
//! derived `(Unknown)` bucket name instead of failing the run.

/// Marker appended to the bucket name of an unmatched unit folder.
pub const UNKNOWN_MARKER: &str = "(Unknown)";

/// Outcome of resolving a raw folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A configured canonical name matched.
    Canonical(String),
    /// Nothing matched; holds the derived `<suffix>(Unknown)` bucket name.
    Unmatched(String),
}

impl Resolution {
    /// Destination directory name for this resolution.
    pub fn dir_name(&self) -> &str {
        match self {
            Resolution::Canonical(name) | Resolution::Unmatched(name) => name,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Resolution::Unmatched(_))
    }
}

/// Resolve `raw_name` against `candidates`, first match wins.
pub fn resolve<S: AsRef<str>>(raw_name: &str, candidates: &[S]) -> Resolution {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| raw_name.contains(candidate))
        .map(|candidate| Resolution::Canonical(candidate.to_string()))
        .unwrap_or_else(|| Resolution::Unmatched(format!("{}{}", derived_suffix(raw_name), UNKNOWN_MARKER)))
}

/// Portion of `raw_name` after its last `-`, or the whole name.
pub fn derived_suffix(raw_name: &str) -> &str {
    match raw_name.rfind('-') {
        Some(idx) => &raw_name[idx + 1..],
        None => raw_name,
    }
}
