use super::trigger::TriggerRegion;
use super::types::{Diagnostic, Modifiers, Suggestion};
use crate::host::{LinkFormatter, OpenOptions, TextSource};
use crate::model::config::PeopleSettings;
use crate::model::cursor::Position;

/// A person note to create once the link text is in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub folder: String,
    pub label: String,
    pub open: OpenOptions,
}

/// What accepting a suggestion does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementAction {
    /// Nothing to replace.
    Noop,
    ShowDiagnostic(Diagnostic),
    Replace {
        from: Position,
        to: Position,
        text: String,
        create: Option<CreateRequest>,
    },
}

impl ReplacementAction {
    /// Perform the text edit. Any creation request is handed back untouched
    /// so the caller starts it only after the link is in the buffer.
    pub fn apply(self, text: &mut dyn TextSource) -> Option<CreateRequest> {
        match self {
            ReplacementAction::Replace {
                from,
                to,
                text: replacement,
                create,
            } => {
                text.replace_range(&replacement, from, to);
                create
            }
            ReplacementAction::Noop | ReplacementAction::ShowDiagnostic(_) => None,
        }
    }
}

pub fn resolve_selection(
    suggestion: &Suggestion,
    modifiers: Modifiers,
    session: Option<&TriggerRegion>,
    settings: &PeopleSettings,
    formatter: &dyn LinkFormatter,
) -> ReplacementAction {
    if let Suggestion::Diagnostic(diagnostic) = suggestion {
        return ReplacementAction::ShowDiagnostic(diagnostic.clone());
    }

    let Some(session) = session else {
        tracing::warn!("suggestion selected without an active session, nothing replaced");
        return ReplacementAction::Noop;
    };

    let replace = |text: String, create: Option<CreateRequest>| ReplacementAction::Replace {
        from: session.start,
        to: session.end,
        text,
        create,
    };

    if modifiers.raw {
        return replace(suggestion.label().to_string(), None);
    }

    match suggestion {
        Suggestion::Existing(record) => replace(formatter.link(&record.handle.stem(), None), None),
        Suggestion::NewEntity { label } if !settings.create_if_not_exists => {
            replace(label.clone(), None)
        }
        Suggestion::NewEntity { label } => replace(
            formatter.link(label, None),
            Some(CreateRequest {
                folder: settings.new_person_location.clone(),
                label: label.clone(),
                open: OpenOptions::new_person(settings.open_in_split_pane),
            }),
        ),
        Suggestion::Diagnostic(diagnostic) => ReplacementAction::ShowDiagnostic(diagnostic.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Placement, Resource, SplitDirection};
    use crate::suggest::types::EntityRecord;
    use crate::vault::link::{LinkStyle, VaultLinkFormatter};

    fn session() -> TriggerRegion {
        TriggerRegion {
            start: Position::new(0, 6),
            end: Position::new(0, 10),
            query: "ali".to_string(),
        }
    }

    fn alice() -> Suggestion {
        Suggestion::Existing(EntityRecord {
            label: "Alice".to_string(),
            handle: Resource::new("/vault/People/Alice.md"),
        })
    }

    fn zoe() -> Suggestion {
        Suggestion::NewEntity {
            label: "Zoe".to_string(),
        }
    }

    fn resolve(
        suggestion: &Suggestion,
        modifiers: Modifiers,
        settings: &PeopleSettings,
    ) -> ReplacementAction {
        let session = session();
        resolve_selection(
            suggestion,
            modifiers,
            Some(&session),
            settings,
            &VaultLinkFormatter::new(LinkStyle::Wiki),
        )
    }

    fn replaced_text(action: &ReplacementAction) -> Option<&str> {
        match action {
            ReplacementAction::Replace { text, .. } => Some(text),
            _ => None,
        }
    }

    #[test]
    fn existing_entity_becomes_link() {
        let action = resolve(&alice(), Modifiers::default(), &PeopleSettings::default());
        assert_eq!(
            action,
            ReplacementAction::Replace {
                from: Position::new(0, 6),
                to: Position::new(0, 10),
                text: "[[Alice]]".to_string(),
                create: None,
            }
        );
    }

    #[test]
    fn raw_modifier_inserts_label_for_every_kind() {
        let settings = PeopleSettings::default();
        for suggestion in [alice(), zoe()] {
            let action = resolve(&suggestion, Modifiers::RAW, &settings);
            assert_eq!(replaced_text(&action), Some(suggestion.label()));
            assert!(matches!(action, ReplacementAction::Replace { create: None, .. }));
        }
    }

    #[test]
    fn new_entity_links_and_requests_creation() {
        let settings = PeopleSettings {
            new_person_location: "People".to_string(),
            open_in_split_pane: true,
            ..PeopleSettings::default()
        };
        let action = resolve(&zoe(), Modifiers::default(), &settings);

        let ReplacementAction::Replace { text, create, .. } = action else {
            panic!("expected a replacement, got {action:?}");
        };
        assert_eq!(text, "[[Zoe]]");
        let request = create.unwrap();
        assert_eq!(request.folder, "People");
        assert_eq!(request.label, "Zoe");
        assert_eq!(request.open.placement, Placement::Split(SplitDirection::Vertical));
        assert!(request.open.focus);
    }

    #[test]
    fn creation_disabled_behaves_like_raw() {
        let settings = PeopleSettings {
            create_if_not_exists: false,
            ..PeopleSettings::default()
        };
        assert_eq!(
            resolve(&zoe(), Modifiers::default(), &settings),
            resolve(&zoe(), Modifiers::RAW, &settings)
        );
    }

    #[test]
    fn tab_placement_when_split_disabled() {
        let settings = PeopleSettings {
            open_in_split_pane: false,
            ..PeopleSettings::default()
        };
        let ReplacementAction::Replace { create: Some(request), .. } =
            resolve(&zoe(), Modifiers::default(), &settings)
        else {
            panic!("expected a creation request");
        };
        assert_eq!(request.open.placement, Placement::Tab);
    }

    #[test]
    fn diagnostic_never_replaces_text() {
        let diagnostic = Diagnostic::roster_unavailable("gone");
        let suggestion = Suggestion::Diagnostic(diagnostic.clone());
        assert_eq!(
            resolve(&suggestion, Modifiers::RAW, &PeopleSettings::default()),
            ReplacementAction::ShowDiagnostic(diagnostic)
        );
    }

    #[test]
    fn missing_session_is_a_noop() {
        let action = resolve_selection(
            &alice(),
            Modifiers::default(),
            None,
            &PeopleSettings::default(),
            &VaultLinkFormatter::default(),
        );
        assert_eq!(action, ReplacementAction::Noop);
    }
}
