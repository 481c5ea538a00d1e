//! Vault-relative path helpers. Vault paths always use `/`.

pub const NOTE_EXTENSION: &str = "md";

/// Join path segments, dropping empty and `.` segments. A leading `/` on the
/// first segment is preserved.
pub fn join(segments: &[&str]) -> String {
    let absolute = segments
        .iter()
        .find(|segment| !segment.is_empty())
        .is_some_and(|segment| segment.starts_with('/'));

    let parts: Vec<&str> = segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Last path component without its extension.
pub fn basename(full_path: &str) -> &str {
    let base = full_path.rsplit('/').next().unwrap_or(full_path);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}

/// Canonical vault path: backslashes become `/`, repeated slashes collapse,
/// leading and trailing slashes go, non-breaking spaces become spaces.
pub fn normalize_path(path: &str) -> String {
    let replaced: String = path
        .chars()
        .map(|ch| match ch {
            '\\' => '/',
            '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        })
        .collect();

    let normalized = replaced
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        "/".to_string()
    } else {
        normalized
    }
}

/// `true` when any segment is `..`, so the path could leave the vault.
pub fn escapes_vault(path: &str) -> bool {
    path.split(['/', '\\']).any(|part| part == "..")
}

/// Vault-relative path of a note called `name` in `folder`.
pub fn note_path(folder: &str, name: &str) -> String {
    let suffix = format!(".{NOTE_EXTENSION}");
    let file_name = if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    };
    normalize_path(&join(&[folder, &file_name]))
}
