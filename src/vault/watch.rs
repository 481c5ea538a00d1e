use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

use crate::host::{Resource, RosterEvent, RosterEventKind};
use crate::vault::path::NOTE_EXTENSION;

/// Translate a filesystem notification into roster events for notes.
pub fn roster_events(event: &notify::Event) -> Vec<RosterEvent> {
    let notes = || {
        event.paths.iter().filter(|path| {
            path.extension().and_then(|ext| ext.to_str()) == Some(NOTE_EXTENSION)
        })
    };
    let each = |kind: RosterEventKind| -> Vec<RosterEvent> {
        notes()
            .map(|path| RosterEvent {
                kind,
                resource: Resource::new(path.clone()),
                old_path: None,
            })
            .collect()
    };

    match event.kind {
        EventKind::Remove(_) => each(RosterEventKind::Delete),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            let (from, to) = (&event.paths[0], &event.paths[1]);
            vec![RosterEvent {
                kind: RosterEventKind::Rename,
                resource: Resource::new(to.clone()),
                old_path: Some(from.clone()),
            }]
        }
        EventKind::Modify(ModifyKind::Name(_)) => each(RosterEventKind::Rename),
        EventKind::Create(_) | EventKind::Modify(_) => each(RosterEventKind::Update),
        _ => Vec::new(),
    }
}
