//! Capabilities the suggestion engine consumes from its host.
//!
//! Nothing in [`crate::suggest`] reaches for global editor state; every
//! collaborator is one of these traits, handed in at construction or per call.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{CreateError, RosterError};
use crate::model::cursor::Position;

/// Read and edit access to the text being typed into.
pub trait TextSource {
    /// Text of a line without its trailing newline.
    fn line(&self, row: usize) -> Option<String>;

    /// Text between two positions. Out-of-range positions are clamped.
    fn range(&self, from: Position, to: Position) -> String;

    fn replace_range(&mut self, text: &str, from: Position, to: Position);

    fn cursor(&self) -> Position;
}

/// A note backing an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub path: PathBuf,
}

impl Resource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension; this is what people are called.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// One entry returned by the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub resource: Resource,
    /// Creation time when the platform has it, otherwise modification time.
    pub recency: SystemTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEventKind {
    Rename,
    Delete,
    Update,
}

impl RosterEventKind {
    /// Only renames and deletes change which people exist; updates are ignored.
    pub fn invalidates_roster(self) -> bool {
        matches!(self, RosterEventKind::Rename | RosterEventKind::Delete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEvent {
    pub kind: RosterEventKind,
    pub resource: Resource,
    pub old_path: Option<PathBuf>,
}

pub type RosterListener = Box<dyn Fn(&RosterEvent) + Send + Sync>;

/// The external query that enumerates candidate people.
pub trait EntityRoster {
    fn pages(&self, selector: &str) -> Result<Vec<ResourceDescriptor>, RosterError>;

    /// Register for change notifications. Called once per listener.
    fn subscribe(&self, listener: RosterListener);
}

/// Creates new person notes. Runs off the event loop, hence `Send + Sync`.
pub trait ResourceCreator: Send + Sync {
    /// Create `name` inside `folder`, appending `.md` when absent and creating
    /// missing folders.
    fn create(&self, folder: &str, name: &str) -> Result<Resource, CreateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Tab,
    Split(SplitDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Default,
    Source,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub placement: Placement,
    pub focus: bool,
    pub mode: ViewMode,
}

impl OpenOptions {
    pub fn new_person(split: bool) -> Self {
        Self {
            placement: if split {
                Placement::Split(SplitDirection::Vertical)
            } else {
                Placement::Tab
            },
            focus: true,
            mode: ViewMode::Default,
        }
    }
}

pub trait ViewOpener {
    fn open(&mut self, resource: &Resource, options: OpenOptions) -> anyhow::Result<()>;
}

/// Produces link text pointing at a note.
pub trait LinkFormatter {
    /// `target` is the note name without extension.
    fn link(&self, target: &str, alias: Option<&str>) -> String;
}
