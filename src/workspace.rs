use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use peoplelink::host::{OpenOptions, Placement, Resource, ViewOpener};
use peoplelink::model::buffer::Buffer;

/// Open buffers: the active one, tabs, and an optional note shown beside it.
pub struct Workspace {
    pub buffer: Buffer,
    inactive_buffers: HashMap<PathBuf, Buffer>,
    pub open_tabs: Vec<PathBuf>,
    /// Tab shown read-only next to the active buffer.
    pub split: Option<PathBuf>,
    scroll_off: u16,
}

impl Workspace {
    pub fn new(mut buffer: Buffer, scroll_off: u16) -> Self {
        buffer.viewport.scroll_off = scroll_off;
        let open_tabs = buffer.path.iter().cloned().collect();
        Self {
            buffer,
            inactive_buffers: HashMap::new(),
            open_tabs,
            split: None,
            scroll_off,
        }
    }

    pub fn pending_write_count(&self) -> usize {
        let active = usize::from(self.buffer.dirty || self.buffer.save_debounce.is_some());
        active
            + self
                .inactive_buffers
                .values()
                .filter(|buffer| buffer.dirty || buffer.save_debounce.is_some())
                .count()
    }

    /// Inactive buffers to write: those whose debounce deadline has passed
    /// by `due_by`, or with `None` every one that has pending writes.
    pub fn inactive_to_save(&self, due_by: Option<Instant>) -> Vec<PathBuf> {
        self.inactive_buffers
            .iter()
            .filter(|(_, buffer)| match due_by {
                Some(now) => buffer.save_debounce.is_some_and(|deadline| now >= deadline),
                None => buffer.dirty || buffer.save_debounce.is_some(),
            })
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn inactive_mut(&mut self, path: &Path) -> Option<&mut Buffer> {
        self.inactive_buffers.get_mut(path)
    }

    pub fn split_buffer(&self) -> Option<&Buffer> {
        let path = self.split.as_ref()?;
        self.inactive_buffers.get(path)
    }

    pub fn forget(&mut self, path: &Path) {
        self.open_tabs.retain(|tab| !same_file_path(tab, path));
        self.inactive_buffers.retain(|tab, _| !same_file_path(tab, path));
        if self.split.as_deref().is_some_and(|split| same_file_path(split, path)) {
            self.split = None;
        }
    }

    pub fn switch_tab_relative(&mut self, delta: isize) -> Result<()> {
        if self.open_tabs.len() <= 1 {
            return Ok(());
        }

        let Some(current_idx) = self.active_tab_index() else {
            return Ok(());
        };

        let len = self.open_tabs.len() as isize;
        let next = (current_idx as isize + delta).rem_euclid(len) as usize;
        let path = self.open_tabs[next].clone();
        self.activate_tab(path)
    }

    pub fn active_tab_index(&self) -> Option<usize> {
        let active = self.buffer.path.as_ref()?;
        self.open_tabs.iter().position(|p| same_file_path(p, active))
    }

    pub fn activate_tab(&mut self, path: PathBuf) -> Result<()> {
        if self
            .buffer
            .path
            .as_ref()
            .is_some_and(|current| same_file_path(current, &path))
        {
            return Ok(());
        }

        let mut next = match self.inactive_buffers.remove(&path) {
            Some(buf) => buf,
            None => Buffer::from_file(path.clone())?,
        };
        next.viewport.scroll_off = self.scroll_off;
        next.viewport.height = self.buffer.viewport.height;

        let previous = std::mem::replace(&mut self.buffer, next);
        if let Some(previous_path) = previous.path.clone() {
            self.inactive_buffers.insert(previous_path, previous);
        }

        if !self.open_tabs.iter().any(|p| same_file_path(p, &path)) {
            self.open_tabs.push(path);
        }
        Ok(())
    }
}

impl ViewOpener for Workspace {
    fn open(&mut self, resource: &Resource, options: OpenOptions) -> Result<()> {
        let previous = self.buffer.path.clone();
        self.activate_tab(resource.path.clone())?;

        // Terminal panes only split side by side.
        let split = matches!(options.placement, Placement::Split(_));
        match previous {
            Some(previous) if !options.focus => {
                self.activate_tab(previous)?;
                if split {
                    self.split = Some(resource.path.clone());
                }
            }
            previous => {
                if split {
                    self.split = previous;
                }
            }
        }

        tracing::debug!(
            "opened {} (split: {split}, focus: {}, {:?} mode)",
            resource.path.display(),
            options.focus,
            options.mode
        );
        Ok(())
    }
}

pub fn same_file_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }

    let a_canon = std::fs::canonicalize(a);
    let b_canon = std::fs::canonicalize(b);
    matches!((a_canon, b_canon), (Ok(ca), Ok(cb)) if ca == cb)
}
