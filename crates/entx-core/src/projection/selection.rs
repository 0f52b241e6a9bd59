use std::collections::BTreeSet;

use crate::errors::{EntityError, Result};

pub const ID_KEY: &str = "__id";
pub const LABEL_KEY: &str = "label";
pub const SYSTEM_KEY: &str = "__system";

/// Top-level keys no dataset property may render onto
pub const RESERVED_KEYS: [&str; 3] = [ID_KEY, LABEL_KEY, SYSTEM_KEY];

/// Sub-fields of `__system`, in output order
pub const SYSTEM_FIELDS: [&str; 7] = [
    "createdAt",
    "creatorId",
    "creatorName",
    "updatedAt",
    "updates",
    "version",
    "conflict",
];

/// Which parts of the projection to keep
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// Accepted tokens: `__id`, `label`, `__system`, `__system/<field>` and
    /// canonical dataset property names
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn includes(&self, token: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(tokens) => tokens.contains(token),
        }
    }

    /// Whether the `__system` sub-field `field` survives
    pub fn includes_system_field(&self, field: &str) -> bool {
        self.includes(SYSTEM_KEY) || self.includes(&format!("{}/{}", SYSTEM_KEY, field))
    }

    /// Whether any part of `__system` survives
    pub fn includes_system(&self) -> bool {
        SYSTEM_FIELDS.iter().any(|f| self.includes_system_field(f))
    }
}

/// Parse a `$select` query against a dataset's property names
///
/// Tokens are separated by commas and/or whitespace. An absent or empty
/// query, or any `*` token, selects everything.
///
/// # Errors
///
/// `PropertyNotFound` for the first token that names nothing selectable.
pub fn resolve_selection(query: Option<&str>, properties: &[&str]) -> Result<Selection> {
    let tokens: Vec<&str> = query
        .unwrap_or("")
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() || tokens.contains(&"*") {
        return Ok(Selection::All);
    }

    let mut selected = BTreeSet::new();
    for token in tokens {
        if !is_selectable(token, properties) {
            return Err(EntityError::PropertyNotFound {
                property: token.to_string(),
            });
        }
        selected.insert(token.to_string());
    }
    Ok(Selection::Only(selected))
}

fn is_selectable(token: &str, properties: &[&str]) -> bool {
    if token == ID_KEY || token == LABEL_KEY || token == SYSTEM_KEY {
        return true;
    }
    if let Some(field) = token
        .strip_prefix(SYSTEM_KEY)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        return SYSTEM_FIELDS.contains(&field);
    }
    properties.contains(&token)
}
