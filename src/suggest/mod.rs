//! The people autosuggest engine.
//!
//! A keystroke goes through [`PeopleSuggest::on_text_changed`], which detects
//! or re-validates the trigger region. [`PeopleSuggest::suggestions`] ranks the
//! cached roster for the session's query, and [`PeopleSuggest::select`]
//! replaces the region and hands back any note that still has to be created.

pub mod cache;
pub mod creation;
pub mod matcher;
pub mod rank;
pub mod select;
pub mod session;
pub mod trigger;
pub mod types;

use std::sync::Arc;

use crate::host::{EntityRoster, LinkFormatter, TextSource, ViewOpener};
use crate::model::config::PeopleSettings;
use crate::vault::link::{LinkStyle, VaultLinkFormatter};

pub use cache::{CacheInvalidator, CacheView, CandidateCache};
pub use creation::{CreationEvent, spawn_creation};
pub use matcher::{ScoredMatch, SimilarityMatcher, SkimSimilarity};
pub use rank::{RankOptions, rank};
pub use select::{CreateRequest, ReplacementAction, resolve_selection};
pub use session::SessionState;
pub use trigger::{TriggerRegion, detect_trigger};
pub use types::{Diagnostic, EntityRecord, Modifiers, Suggestion};

/// Result of accepting a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Ignored,
    ShowDiagnostic(Diagnostic),
    /// Text was replaced. A request means the note does not exist yet.
    Inserted(Option<CreateRequest>),
}

pub struct PeopleSuggest {
    settings: PeopleSettings,
    roster: Arc<dyn EntityRoster>,
    matcher: Box<dyn SimilarityMatcher>,
    formatter: Box<dyn LinkFormatter>,
    cache: CandidateCache,
    session: SessionState,
}

impl PeopleSuggest {
    pub fn new(
        settings: PeopleSettings,
        roster: Arc<dyn EntityRoster>,
        matcher: Box<dyn SimilarityMatcher>,
        formatter: Box<dyn LinkFormatter>,
    ) -> Self {
        Self {
            settings,
            roster,
            matcher,
            formatter,
            cache: CandidateCache::new(),
            session: SessionState::default(),
        }
    }

    /// Skim matching and vault links styled per `use_markdown_links`.
    pub fn with_defaults(settings: PeopleSettings, roster: Arc<dyn EntityRoster>) -> Self {
        let formatter = VaultLinkFormatter::new(LinkStyle::from_markdown_flag(
            settings.use_markdown_links,
        ));
        Self::new(
            settings,
            roster,
            Box::new(SkimSimilarity::default()),
            Box::new(formatter),
        )
    }

    pub fn settings(&self) -> &PeopleSettings {
        &self.settings
    }

    /// Swap in new settings. A different people source invalidates the cache
    /// and a different link style replaces the default formatter.
    pub fn update_settings(&mut self, settings: PeopleSettings) {
        if settings.entity_source != self.settings.entity_source {
            self.cache.invalidate();
        }
        if settings.use_markdown_links != self.settings.use_markdown_links {
            self.formatter = Box::new(VaultLinkFormatter::new(LinkStyle::from_markdown_flag(
                settings.use_markdown_links,
            )));
        }
        if settings.trigger_prefix != self.settings.trigger_prefix {
            self.session.update(None);
        }
        self.settings = settings;
    }

    pub fn set_formatter(&mut self, formatter: Box<dyn LinkFormatter>) {
        self.formatter = formatter;
    }

    pub fn session(&self) -> Option<&TriggerRegion> {
        self.session.active()
    }

    pub fn cancel(&mut self) {
        self.session.update(None);
    }

    /// Re-run trigger detection at the text's cursor.
    pub fn on_text_changed(&mut self, text: &dyn TextSource) -> Option<&TriggerRegion> {
        let region = detect_trigger(
            text.cursor(),
            text,
            &self.settings.trigger_prefix,
            self.session.active(),
        );
        self.session.update(region)
    }

    /// Ranked suggestions for the active session; empty without one.
    pub fn suggestions(&mut self) -> Vec<Suggestion> {
        let Some(query) = self.session.active().map(|s| s.query.clone()) else {
            return Vec::new();
        };
        self.rank_query(&query)
    }

    pub fn rank_query(&mut self, query: &str) -> Vec<Suggestion> {
        let options = RankOptions::from_settings(&self.settings);
        let view = self
            .cache
            .get(self.roster.as_ref(), &self.settings.entity_source);
        rank(query, view, self.matcher.as_ref(), &options)
    }

    /// Accept `suggestion`: the region is replaced before this returns, and
    /// a returned [`CreateRequest`] should then be passed to
    /// [`spawn_creation`].
    pub fn select(
        &mut self,
        suggestion: &Suggestion,
        modifiers: Modifiers,
        text: &mut dyn TextSource,
    ) -> Selection {
        let action = resolve_selection(
            suggestion,
            modifiers,
            self.session.active(),
            &self.settings,
            self.formatter.as_ref(),
        );
        tracing::debug!("selected `{}` -> {action:?}", suggestion.label());

        match action {
            ReplacementAction::Noop => Selection::Ignored,
            ReplacementAction::ShowDiagnostic(diagnostic) => {
                self.session.update(None);
                Selection::ShowDiagnostic(diagnostic)
            }
            replace @ ReplacementAction::Replace { .. } => {
                let create = replace.apply(text);
                self.session.end();
                Selection::Inserted(create)
            }
        }
    }

    /// Finish a detached creation: open the note and drop the cache, since
    /// creating a file does not raise a roster notification. Returns a notice
    /// for the user when something went wrong.
    pub fn on_creation_event(
        &mut self,
        event: CreationEvent,
        opener: &mut dyn ViewOpener,
    ) -> Option<String> {
        match event {
            CreationEvent::Created { resource, open } => {
                let notice = opener.open(&resource, open).err().map(|err| {
                    tracing::warn!("could not open {}: {err}", resource.path.display());
                    format!("Created {} but could not open it: {err}", resource.stem())
                });
                self.cache.invalidate();
                notice
            }
            CreationEvent::Failed { label, error } => {
                Some(format!("Unable to create new person {label}: {error}"))
            }
        }
    }

    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    pub fn cache_invalidator(&self) -> CacheInvalidator {
        self.cache.invalidator()
    }
}
