//! HTML content types for tree nodes.
//!
//! This module provides `HtmlContent`, which represents the content of a
//! document node: an element (tag name plus ordered attributes), a text
//! run, or a comment.

/// Represents the content of an HTML node.
#[derive(Debug, Clone)]
pub enum HtmlContent {
    /// An element with a tag name and attributes.
    Element(HtmlElement),
    /// A text run.
    Text(HtmlText),
    /// A comment.
    Comment(HtmlComment),
}

impl HtmlContent {
    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, HtmlContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, HtmlContent::Text(_))
    }

    /// Returns true if this is a comment node.
    pub fn is_comment(&self) -> bool {
        matches!(self, HtmlContent::Comment(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            HtmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a reference to the text, if this is a text node.
    pub fn as_text(&self) -> Option<&HtmlText> {
        match self {
            HtmlContent::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns a reference to the comment, if this is a comment node.
    pub fn as_comment(&self) -> Option<&HtmlComment> {
        match self {
            HtmlContent::Comment(c) => Some(c),
            _ => None,
        }
    }
}

/// An HTML element with a tag name and ordered attributes.
///
/// Attribute order is preserved as it appeared in the document and is
/// significant for label comparison.
#[derive(Debug, Clone)]
pub struct HtmlElement {
    /// The tag name of the element (e.g., "div").
    name: String,
    /// Attributes as ordered key-value pairs.
    attributes: Vec<(String, String)>,
}

impl HtmlElement {
    /// Creates a new element with the given name and attributes.
    pub fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        HtmlElement { name, attributes }
    }

    /// Returns the tag name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes as ordered key-value pairs.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

impl std::fmt::Display for HtmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, ">")
    }
}

/// HTML text content.
#[derive(Debug, Clone)]
pub struct HtmlText {
    /// The text content.
    text: String,
}

impl HtmlText {
    /// Creates a new text node from a string.
    pub fn new(text: &str) -> Self {
        HtmlText {
            text: text.to_string(),
        }
    }

    /// Returns the text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the text consists only of whitespace.
    ///
    /// Whitespace-only text nodes are never considered template nodes.
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl std::fmt::Display for HtmlText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// HTML comment content.
#[derive(Debug, Clone)]
pub struct HtmlComment {
    /// The comment text (without the `<!--` and `-->` markers).
    text: String,
}

impl HtmlComment {
    /// Creates a new comment node from a string.
    pub fn new(text: &str) -> Self {
        HtmlComment {
            text: text.to_string(),
        }
    }

    /// Returns the comment text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for HtmlComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<!--{}-->", self.text)
    }
}
