//! Element trees supplied by views before they are materialized.

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupChild {
    Element(Markup),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Markup {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub dataset: Vec<(String, String)>,
    pub value: Option<String>,
    pub checked: bool,
    pub disabled: bool,
    pub children: Vec<MarkupChild>,
}

/// Start an element of the given tag.
pub fn el(tag: &str) -> Markup {
    Markup {
        tag: tag.to_string(),
        ..Markup::default()
    }
}

impl Markup {
    /// Adds one or more space separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn class_if(self, condition: bool, classes: &str) -> Self {
        if condition {
            self.class(classes)
        } else {
            self
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.dataset.push((key.to_string(), value.into()));
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(MarkupChild::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.children.push(MarkupChild::Element(child));
        self
    }

    pub fn child_if(self, child: Option<Markup>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Markup>,
    {
        self.children
            .extend(children.into_iter().map(MarkupChild::Element));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_parts() {
        let markup = el("button")
            .class("event__favorite-btn  event__favorite-btn--active")
            .class_if(false, "hidden")
            .attr("type", "button")
            .data("event-id", "42")
            .text("Add to favorite");

        assert_eq!(markup.tag, "button");
        assert_eq!(markup.classes, vec!["event__favorite-btn", "event__favorite-btn--active"]);
        assert_eq!(markup.attrs, vec![("type".to_string(), "button".to_string())]);
        assert_eq!(markup.dataset[0].1, "42");
        assert_eq!(markup.children, vec![MarkupChild::Text("Add to favorite".into())]);
    }
}
