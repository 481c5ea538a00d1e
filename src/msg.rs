use crossterm::event::KeyEvent;
use std::path::PathBuf;

use peoplelink::host::RosterEvent;
use peoplelink::suggest::CreationEvent;

/// All possible messages that drive state transitions.
#[derive(Debug)]
pub enum Msg {
    // -- Input events (raw)
    Key(KeyEvent),
    Resize(u16, u16),

    // -- File I/O
    SaveAllBuffers,
    FileChanged(PathBuf),

    // -- People
    Roster(RosterEvent),
    Creation(CreationEvent),

    // -- System
    Tick,
}
