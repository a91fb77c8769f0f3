// src/ui/mod.rs
//
// Draws the headless document with iced widgets. Every interactive node
// maps back to a `ShellMessage` carrying its node id.

use iced::widget::{button, checkbox, container, row, text, text_input, Column, Row, Space};
use iced::{Alignment, Color, Element, Length};

use crate::dom::NodeId;
use crate::models::FilterKind;
use crate::store::TripData;
use crate::utils::capitalize;
use crate::view::{Dom, SHAKE_CLASS_NAME};

pub mod styles;

use styles::{
    CardStyle, DestructiveButtonStyle, FilterTabStyle, GhostButtonStyle, InputStyle, PrimaryButtonStyle,
    ZEN_FAVORITE, ZEN_SUBTEXT,
};

/// Messages of the desktop window.
#[derive(Debug, Clone)]
pub enum ShellMessage {
    /// A button, radio or checkbox node was clicked
    Click(NodeId),
    /// A text field node was edited
    Input(NodeId, String),
    /// A key was pressed anywhere in the window
    Key(String),
    /// A filter tab was chosen
    Filter(FilterKind),
    /// Animation clock tick
    Tick(std::time::Instant),
    /// Trip data finished loading
    Loaded(Result<TripData, String>),
}

/// Containers whose children are laid out horizontally.
const ROW_CLASSES: &[&str] = &[
    "event__header",
    "event__field-group",
    "event__schedule",
    "event__time",
    "event__price",
    "event__offer",
    "event__offer-selector",
    "event__photos-tape",
    "trip-sort",
    "trip-sort__item",
];

pub fn render_node<'a>(doc: &Dom, node: NodeId) -> Element<'a, ShellMessage> {
    let Some(element) = doc.element(node) else {
        return text(doc.text_content(node)).size(14).into();
    };
    if is_hidden(doc, node) {
        return Space::new(Length::Shrink, Length::Shrink).into();
    }

    match element.tag.as_str() {
        "button" => render_button(doc, node),
        "input" => render_input(doc, node),
        "img" | "datalist" | "option" => Space::new(Length::Shrink, Length::Shrink).into(),
        tag if doc.element_children(node).is_empty() => {
            let size = if tag == "h3" { 18 } else { 14 };
            text(doc.text_content(node)).size(size).into()
        }
        _ => render_container(doc, node),
    }
}

/// Hidden helpers, and labels already drawn next to their input.
fn is_hidden(doc: &Dom, node: NodeId) -> bool {
    if doc.matches(node, "input") {
        return false;
    }
    if doc.has_class(node, "visually-hidden") {
        return true;
    }
    doc.matches(node, "label") && previous_element(doc, node).is_some_and(|input| is_toggle(doc, input))
}

fn is_toggle(doc: &Dom, node: NodeId) -> bool {
    doc.matches(node, "input") && matches!(doc.attr(node, "type"), Some("radio") | Some("checkbox"))
}

fn previous_element(doc: &Dom, node: NodeId) -> Option<NodeId> {
    let siblings = doc.element_children(doc.parent(node)?);
    let index = siblings.iter().position(|id| *id == node)?;
    index.checked_sub(1).map(|previous| siblings[previous])
}

fn next_element(doc: &Dom, node: NodeId) -> Option<NodeId> {
    let siblings = doc.element_children(doc.parent(node)?);
    let index = siblings.iter().position(|id| *id == node)?;
    siblings.get(index + 1).copied()
}

fn render_container<'a>(doc: &Dom, node: NodeId) -> Element<'a, ShellMessage> {
    let children: Vec<Element<'a, ShellMessage>> = doc
        .children(node)
        .iter()
        .map(|child| render_node(doc, *child))
        .collect();

    let horizontal = ROW_CLASSES.iter().any(|class| doc.has_class(node, class))
        || doc.matches(node, "div.event");
    let content: Element<'a, ShellMessage> = if horizontal {
        Row::with_children(children)
            .spacing(8)
            .align_items(Alignment::Center)
            .into()
    } else {
        Column::with_children(children).spacing(6).into()
    };

    if doc.matches(node, "li.trip-events__item") {
        container(content)
            .padding(12)
            .width(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(CardStyle {
                shaking: doc.has_class(node, SHAKE_CLASS_NAME),
            })))
            .into()
    } else {
        content
    }
}

fn render_button<'a>(doc: &Dom, node: NodeId) -> Element<'a, ShellMessage> {
    let style: Box<dyn button::StyleSheet<Style = iced::Theme>> =
        if doc.has_class(node, "event__save-btn") || doc.has_class(node, "trip-main__event-add-btn") {
            Box::new(PrimaryButtonStyle)
        } else if doc.has_class(node, "event__reset-btn") {
            Box::new(DestructiveButtonStyle)
        } else if doc.has_class(node, "event__favorite-btn--active") {
            Box::new(GhostButtonStyle { color: ZEN_FAVORITE })
        } else {
            Box::new(GhostButtonStyle { color: ZEN_SUBTEXT })
        };

    let mut widget = button(text(doc.text_content(node)).size(14))
        .padding([6, 12])
        .style(iced::theme::Button::Custom(style));
    if !doc.is_disabled(node) {
        widget = widget.on_press(ShellMessage::Click(node));
    }
    widget.into()
}

fn render_input<'a>(doc: &Dom, node: NodeId) -> Element<'a, ShellMessage> {
    if is_toggle(doc, node) {
        let label = next_element(doc, node)
            .filter(|label| doc.matches(*label, "label"))
            .map(|label| doc.text_content(label))
            .unwrap_or_default();
        let mut widget = checkbox(label, doc.is_checked(node)).size(16).text_size(14);
        if !doc.is_disabled(node) {
            widget = widget.on_toggle(move |_| ShellMessage::Click(node));
        }
        return widget.into();
    }

    let placeholder = doc.attr(node, "name").unwrap_or_default();
    text_input(placeholder, doc.value(node).unwrap_or_default())
        .on_input(move |value| ShellMessage::Input(node, value))
        .style(iced::theme::TextInput::Custom(Box::new(InputStyle)))
        .width(Length::Fixed(160.0))
        .into()
}

/// Everything / Future / Present / Past tabs.
pub fn filter_bar<'a>(active: FilterKind) -> Element<'a, ShellMessage> {
    let tabs = FilterKind::ALL.iter().map(|kind| -> Element<'a, ShellMessage> {
        button(text(capitalize(kind.as_str())).size(14))
            .padding([6, 12])
            .style(iced::theme::Button::Custom(Box::new(FilterTabStyle {
                active: *kind == active,
            })))
            .on_press(ShellMessage::Filter(*kind))
            .into()
    });
    Row::with_children(tabs).spacing(4).into()
}

pub fn status_line<'a>(status: &str, color: Color) -> Element<'a, ShellMessage> {
    row![text(status.to_string()).size(12).style(iced::theme::Text::Color(color))]
        .padding([4, 12])
        .into()
}
