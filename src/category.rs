//! Category classification of version subfolders

use crate::config::CategoryNames;

/// Artifact kind of a subfolder inside a version folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Application,
    Database,
    Report,
    Unknown,
}

impl Category {
    /// Known categories, in classification priority order.
    pub const KNOWN: [Category; 3] = [Category::Application, Category::Database, Category::Report];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Application => "application",
            Category::Database => "database",
            Category::Report => "report",
            Category::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a subfolder by which canonical category name it contains.
///
/// Rules are tried Application, Database, Report; the first containment
/// match wins. Anything else is `Unknown`.
pub fn classify(subfolder_name: &str, names: &CategoryNames) -> Category {
    names
        .in_priority_order()
        .into_iter()
        .find(|(_, canonical)| subfolder_name.contains(canonical))
        .map(|(category, _)| category)
        .unwrap_or(Category::Unknown)
}
