use crate::host::TextSource;
use crate::model::cursor::Position;

/// Extra characters, beyond the prefix itself, searched backwards for a
/// trigger prefix.
pub const SCAN_BACK_SLACK: usize = 10;

/// The text span a suggestion will replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRegion {
    pub start: Position,
    pub end: Position,
    /// Text between the prefix and the cursor.
    pub query: String,
}

/// Decide whether `cursor` sits in a trigger region.
///
/// With an active session the region keeps its start and is only re-checked.
/// Otherwise the prefix is looked for at `cursor - len(prefix)`, then one
/// character earlier, then as the rightmost occurrence within
/// [`SCAN_BACK_SLACK`] characters. A prefix glued to a word or a backtick is
/// ignored.
pub fn detect_trigger(
    cursor: Position,
    text: &dyn TextSource,
    prefix: &str,
    active: Option<&TriggerRegion>,
) -> Option<TriggerRegion> {
    if prefix.is_empty() {
        return None;
    }

    let line = text.line(cursor.row)?;
    if !line.is_char_boundary(cursor.col) || cursor.col > line.len() {
        return None;
    }

    let start = match active {
        Some(session) => revalidate(&line, cursor, prefix, session)?,
        None => locate_prefix(&line, cursor.col, prefix)?,
    };

    if glued_to_word(&line, start) {
        return None;
    }

    Some(TriggerRegion {
        start: Position::new(cursor.row, start),
        end: cursor,
        query: line[start + prefix.len()..cursor.col].to_string(),
    })
}

fn revalidate(
    line: &str,
    cursor: Position,
    prefix: &str,
    session: &TriggerRegion,
) -> Option<usize> {
    if session.start.row != cursor.row {
        return None;
    }
    let start = session.start.col;
    line.get(start..cursor.col)
        .is_some_and(|typed| typed.starts_with(prefix))
        .then_some(start)
}

fn locate_prefix(line: &str, cursor: usize, prefix: &str) -> Option<usize> {
    let fixed = cursor.checked_sub(prefix.len());
    let retry = fixed.and_then(|start| previous_boundary(line, start));

    [fixed, retry]
        .into_iter()
        .flatten()
        .find(|&start| {
            line.get(start..cursor)
                .is_some_and(|typed| typed.starts_with(prefix))
        })
        .or_else(|| scan_back(line, cursor, prefix))
}

fn scan_back(line: &str, cursor: usize, prefix: &str) -> Option<usize> {
    let window = prefix.chars().count() + SCAN_BACK_SLACK;
    let window_start = line[..cursor]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(cursor, |(idx, _)| idx);

    line[window_start..cursor]
        .rfind(prefix)
        .map(|offset| window_start + offset)
}

fn previous_boundary(line: &str, idx: usize) -> Option<usize> {
    line.get(..idx)?
        .chars()
        .next_back()
        .map(|ch| idx - ch.len_utf8())
}

/// `true` when the character before `start` is alphanumeric or a backtick,
/// as in e-mail addresses and code spans.
fn glued_to_word(line: &str, start: usize) -> bool {
    line[..start]
        .chars()
        .next_back()
        .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '`')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::Buffer;

    fn detect(line: &str, col: usize, prefix: &str) -> Option<TriggerRegion> {
        let buffer = Buffer::from_text(line);
        detect_trigger(Position::new(0, col), &buffer, prefix, None)
    }

    #[test]
    fn finds_prefix_before_query() {
        let region = detect("hello @wor", 10, "@").unwrap();
        assert_eq!(region.start, Position::new(0, 6));
        assert_eq!(region.end, Position::new(0, 10));
        assert_eq!(region.query, "wor");
    }

    #[test]
    fn bare_prefix_gives_empty_query() {
        let region = detect("hi @", 4, "@").unwrap();
        assert_eq!(region.start.col, 3);
        assert_eq!(region.query, "");
    }

    #[test]
    fn retry_one_character_back() {
        let region = detect("@a", 2, "@").unwrap();
        assert_eq!(region.start.col, 0);
        assert_eq!(region.query, "a");
    }

    #[test]
    fn prefix_inside_word_is_rejected() {
        assert_eq!(detect("a@b", 3, "@"), None);
        assert_eq!(detect("mail me at bob@example", 22, "@"), None);
        assert_eq!(detect("`@code", 6, "@"), None);
    }

    #[test]
    fn scan_back_window_is_bounded() {
        assert!(detect("@abcdefghij", 11, "@").is_some());
        assert_eq!(detect("@abcdefghijk", 12, "@"), None);
    }

    #[test]
    fn multi_character_prefix() {
        let region = detect("ping ++ann", 10, "++").unwrap();
        assert_eq!(region.start.col, 5);
        assert_eq!(region.query, "ann");
        assert_eq!(detect("ping +ann", 9, "++"), None);
    }

    #[test]
    fn rightmost_prefix_wins() {
        let region = detect("@al @bo", 7, "@").unwrap();
        assert_eq!(region.start.col, 4);
        assert_eq!(region.query, "bo");
    }

    #[test]
    fn multibyte_text_before_cursor() {
        let line = "José @zoë";
        let region = detect(line, line.len(), "@").unwrap();
        assert_eq!(region.query, "zoë");
    }

    #[test]
    fn active_session_keeps_its_start() {
        let buffer = Buffer::from_text("call @alice smith now");
        let session = TriggerRegion {
            start: Position::new(0, 5),
            end: Position::new(0, 8),
            query: "al".to_string(),
        };
        // Beyond the scan-back window, still anchored by the session.
        let region = detect_trigger(Position::new(0, 17), &buffer, "@", Some(&session)).unwrap();
        assert_eq!(region.start, Position::new(0, 5));
        assert_eq!(region.query, "alice smith");
    }

    #[test]
    fn session_ends_when_prefix_is_deleted() {
        let buffer = Buffer::from_text("call alice");
        let session = TriggerRegion {
            start: Position::new(0, 5),
            end: Position::new(0, 7),
            query: "a".to_string(),
        };
        assert_eq!(
            detect_trigger(Position::new(0, 7), &buffer, "@", Some(&session)),
            None
        );
        assert_eq!(
            detect_trigger(Position::new(0, 4), &buffer, "@", Some(&session)),
            None
        );
    }

    #[test]
    fn detection_is_idempotent() {
        let first = detect("hello @wor", 10, "@");
        let second = detect("hello @wor", 10, "@");
        assert_eq!(first, second);
    }
}
