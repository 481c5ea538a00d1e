use crate::host::LinkFormatter;
use crate::vault::path::{NOTE_EXTENSION, normalize_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// `[[Alice]]`
    #[default]
    Wiki,
    /// `[Alice](Alice.md)`
    Markdown,
}

impl LinkStyle {
    pub fn from_markdown_flag(use_markdown_links: bool) -> Self {
        if use_markdown_links {
            LinkStyle::Markdown
        } else {
            LinkStyle::Wiki
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VaultLinkFormatter {
    pub style: LinkStyle,
}

impl VaultLinkFormatter {
    pub fn new(style: LinkStyle) -> Self {
        Self { style }
    }
}

impl LinkFormatter for VaultLinkFormatter {
    fn link(&self, target: &str, alias: Option<&str>) -> String {
        let path = normalize_path(target);
        match self.style {
            LinkStyle::Wiki => match alias {
                Some(alias) => format!("[[{path}|{alias}]]"),
                None => format!("[[{path}]]"),
            },
            LinkStyle::Markdown => {
                let text = alias.unwrap_or(target);
                let href = format!("{path}.{NOTE_EXTENSION}").replace(' ', "%20");
                format!("[{text}]({href})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiki_links() {
        let fmt = VaultLinkFormatter::new(LinkStyle::Wiki);
        assert_eq!(fmt.link("Alice Smith", None), "[[Alice Smith]]");
        assert_eq!(fmt.link("Alice Smith", Some("Al")), "[[Alice Smith|Al]]");
    }

    #[test]
    fn markdown_links_escape_spaces() {
        let fmt = VaultLinkFormatter::new(LinkStyle::Markdown);
        assert_eq!(fmt.link("Alice Smith", None), "[Alice Smith](Alice%20Smith.md)");
        assert_eq!(fmt.link("People/Bob", Some("Bobby")), "[Bobby](People/Bob.md)");
    }

    #[test]
    fn style_follows_vault_flag() {
        assert_eq!(LinkStyle::from_markdown_flag(true), LinkStyle::Markdown);
        assert_eq!(LinkStyle::from_markdown_flag(false), LinkStyle::Wiki);
    }
}
