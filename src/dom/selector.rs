use lazy_static::lazy_static;
use regex::Regex;

use super::ElementData;

lazy_static! {
    static ref SELECTOR_RE: Regex =
        Regex::new(r"^(?P<tag>[a-zA-Z][a-zA-Z0-9-]*)?(?P<classes>(?:\.[A-Za-z0-9_-]+)*)$")
            .expect("selector pattern is valid");
}

/// Compound selector: optional tag plus any number of classes, e.g. `form.event.event--edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        if source.is_empty() {
            return None;
        }
        let captures = SELECTOR_RE.captures(source)?;
        let tag = captures
            .name("tag")
            .map(|tag| tag.as_str().to_ascii_lowercase());
        let classes = captures
            .name("classes")
            .map(|classes| {
                classes
                    .as_str()
                    .split('.')
                    .filter(|class| !class.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { tag, classes })
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if &element.tag != tag {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| element.classes.iter().any(|own| own == class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, classes: &[&str]) -> ElementData {
        ElementData {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..ElementData::default()
        }
    }

    #[test]
    fn test_class_selector() {
        let selector = Selector::parse(".event__rollup-btn").unwrap();
        assert!(selector.matches(&element("button", &["event__rollup-btn"])));
        assert!(!selector.matches(&element("button", &["event__favorite-btn"])));
    }

    #[test]
    fn test_compound_selector() {
        let selector = Selector::parse("form.event.event--edit").unwrap();
        assert!(selector.matches(&element("form", &["event", "event--edit"])));
        assert!(!selector.matches(&element("div", &["event", "event--edit"])));
        assert!(!selector.matches(&element("form", &["event"])));
    }

    #[test]
    fn test_rejects_unsupported_syntax() {
        assert!(Selector::parse("").is_none());
        assert!(Selector::parse("ul > li").is_none());
        assert!(Selector::parse("[data-id]").is_none());
    }
}
