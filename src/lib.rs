//! People autosuggest for markdown vaults.
//!
//! Typing the trigger prefix (default `@`) opens a suggestion session over the
//! notes that describe people. Accepting a suggestion inserts a link, the raw
//! name, or a link to a note that is created on the spot.

pub mod error;
pub mod host;
pub mod model;
pub mod suggest;
pub mod vault;

pub use error::{ConfigError, CreateError, RosterError};
pub use suggest::{PeopleSuggest, Selection, Suggestion};
