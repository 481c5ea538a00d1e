use super::trigger::TriggerRegion;

/// The single active trigger region, if any.
#[derive(Debug, Default)]
pub struct SessionState {
    active: Option<TriggerRegion>,
}

impl SessionState {
    pub fn active(&self) -> Option<&TriggerRegion> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Record the latest detection result; `None` ends the session.
    pub fn update(&mut self, region: Option<TriggerRegion>) -> Option<&TriggerRegion> {
        match (&self.active, &region) {
            (None, Some(region)) => {
                tracing::debug!("suggest session started at {:?}", region.start)
            }
            (Some(_), None) => tracing::debug!("suggest session ended"),
            _ => {}
        }
        self.active = region;
        self.active.as_ref()
    }

    pub fn end(&mut self) -> Option<TriggerRegion> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cursor::Position;

    fn region(start: usize, end: usize, query: &str) -> TriggerRegion {
        TriggerRegion {
            start: Position::new(0, start),
            end: Position::new(0, end),
            query: query.to_string(),
        }
    }

    #[test]
    fn update_replaces_and_resets() {
        let mut state = SessionState::default();
        assert!(!state.is_active());

        state.update(Some(region(3, 4, "")));
        state.update(Some(region(3, 6, "al")));
        assert_eq!(state.active().map(|r| r.query.as_str()), Some("al"));

        state.update(None);
        assert!(state.active().is_none());
    }

    #[test]
    fn end_hands_back_the_region() {
        let mut state = SessionState::default();
        state.update(Some(region(0, 2, "b")));
        assert_eq!(state.end(), Some(region(0, 2, "b")));
        assert!(!state.is_active());
    }
}
