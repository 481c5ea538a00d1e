use crate::host::Resource;

/// A known person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Display name, never empty.
    pub label: String,
    pub handle: Resource,
}

impl EntityRecord {
    pub fn from_resource(resource: Resource) -> Option<Self> {
        let label = resource.stem();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            label,
            handle: resource,
        })
    }
}

/// Explanation shown instead of inserting text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub summary: String,
    pub details: String,
}

impl Diagnostic {
    pub fn roster_unavailable(reason: &str) -> Self {
        Self {
            summary: "People source unavailable, select for details".to_string(),
            details: format!(
                "The people roster could not be read: {reason}.\n\n\
                 Make sure `general.vault_path` points at an existing vault and that \
                 `people.entity_source` is empty (whole vault), a folder such as \
                 \"People\", or a tag such as #person. Change it at runtime with \
                 `:set people.entity_source <selector>`."
            ),
        }
    }
}

/// One ranked row in the suggestion popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Existing(EntityRecord),
    /// The typed query, offered as a person to create.
    NewEntity { label: String },
    Diagnostic(Diagnostic),
}

impl Suggestion {
    pub fn label(&self) -> &str {
        match self {
            Suggestion::Existing(record) => &record.label,
            Suggestion::NewEntity { label } => label,
            Suggestion::Diagnostic(diagnostic) => &diagnostic.summary,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Suggestion::NewEntity { .. })
    }
}

/// Modifier keys held while accepting a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Insert the label verbatim instead of a link (Shift).
    pub raw: bool,
}

impl Modifiers {
    pub const RAW: Self = Self { raw: true };
}
