//! Filesystem-backed implementations of the host capabilities.

pub mod create;
pub mod link;
pub mod path;
pub mod roster;
pub mod watch;

pub use create::VaultCreator;
pub use link::{LinkStyle, VaultLinkFormatter};
pub use roster::{Selector, VaultRoster};
