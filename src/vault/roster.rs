use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use ignore::WalkBuilder;
use regex::Regex;

use crate::error::RosterError;
use crate::host::{EntityRoster, Resource, ResourceDescriptor, RosterEvent, RosterListener};
use crate::vault::path::{NOTE_EXTENSION, escapes_vault, normalize_path};

/// Which notes count as people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Folder(String),
    Tag(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, RosterError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Selector::All);
        }

        if let Some(tag) = raw.strip_prefix('#') {
            if tag.is_empty() || tag.contains(char::is_whitespace) {
                return Err(RosterError::InvalidSelector(raw.to_string()));
            }
            return Ok(Selector::Tag(tag.to_string()));
        }

        let folder = raw
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(raw);
        if folder.contains('"') || escapes_vault(folder) {
            return Err(RosterError::InvalidSelector(raw.to_string()));
        }

        match normalize_path(folder).as_str() {
            "/" => Ok(Selector::All),
            normalized => Ok(Selector::Folder(normalized.to_string())),
        }
    }
}

/// Roster over a vault directory on disk.
pub struct VaultRoster {
    root: PathBuf,
    listeners: Mutex<Vec<RosterListener>>,
}

impl VaultRoster {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fan a change notification out to every subscriber.
    pub fn dispatch(&self, event: &RosterEvent) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(
            "roster event {:?} {} ({} listeners)",
            event.kind,
            event.resource.path.display(),
            listeners.len()
        );
        for listener in listeners.iter() {
            listener(event);
        }
    }

    fn notes_under(&self, dir: &Path) -> Vec<PathBuf> {
        WalkBuilder::new(dir)
            .hidden(false)
            .build()
            .flatten()
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                let path = entry.path();
                let is_note = metadata.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(NOTE_EXTENSION);
                is_note.then(|| path.to_path_buf())
            })
            .collect()
    }
}

impl EntityRoster for VaultRoster {
    fn pages(&self, selector: &str) -> Result<Vec<ResourceDescriptor>, RosterError> {
        if !self.root.is_dir() {
            return Err(RosterError::Unavailable(format!(
                "vault {} does not exist",
                self.root.display()
            )));
        }

        let paths = match Selector::parse(selector)? {
            Selector::All => self.notes_under(&self.root),
            Selector::Folder(folder) => {
                let dir = self.root.join(folder);
                if dir.is_dir() {
                    self.notes_under(&dir)
                } else {
                    Vec::new()
                }
            }
            Selector::Tag(tag) => {
                let pattern = tag_regex(&tag);
                self.notes_under(&self.root)
                    .into_iter()
                    .filter(|path| {
                        std::fs::read_to_string(path)
                            .map(|contents| has_tag(&contents, &tag, pattern.as_ref()))
                            .unwrap_or(false)
                    })
                    .collect()
            }
        };

        Ok(paths
            .into_iter()
            .map(|path| {
                let recency = recency_of(&path);
                ResourceDescriptor {
                    resource: Resource::new(path),
                    recency,
                }
            })
            .collect())
    }

    fn subscribe(&self, listener: RosterListener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }
}

fn recency_of(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .unwrap_or(UNIX_EPOCH)
}

fn tag_regex(tag: &str) -> Option<Regex> {
    let escaped = regex::escape(tag);
    Regex::new(&format!(r"(?m)(?:^|\s)#{escaped}(?:[\s,.;:!?)\]]|$)")).ok()
}

/// Inline `#tag` anywhere, or `tags:` in leading frontmatter.
fn has_tag(contents: &str, tag: &str, inline: Option<&Regex>) -> bool {
    if inline.is_some_and(|re| re.is_match(contents)) {
        return true;
    }

    let mut lines = contents.lines();
    if lines.next().map(str::trim) != Some("---") {
        return false;
    }

    let mut in_tags = false;
    for line in lines {
        let trimmed = line.trim();
        if trimmed == "---" {
            break;
        }
        if let Some(rest) = trimmed.strip_prefix("tags:") {
            in_tags = true;
            let inline_list = rest.trim().trim_start_matches('[').trim_end_matches(']');
            if inline_list
                .split([',', ' '])
                .map(|item| item.trim().trim_start_matches('#'))
                .any(|item| item == tag)
            {
                return true;
            }
        } else if in_tags {
            match trimmed.strip_prefix("- ") {
                Some(item) if item.trim().trim_start_matches('#') == tag => return true,
                Some(_) => {}
                None => in_tags = false,
            }
        }
    }
    false
}
