//! CSS-like selector parsing for element queries.
//!
//! Supports:
//! - `"select"` - by tag name
//! - `"#submit-btn"` - by ID
//! - `".bm-custom-select"` - by class
//! - `"[data-name='sortOrder']"` - by attribute value
//! - `"[data-value]"` - by attribute presence
//! - `"div.open"` - compound of the above
//! - `".bm-custom-select .bm-custom-select-option"` - descendant combinator

use custom_select_core::{DomHost, MemoryDom, NodeId};
use thiserror::Error;

/// One simple selector component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simple {
    /// Match by tag name
    Tag(String),
    /// Match by ID (e.g., `#my-id`)
    Id(String),
    /// Match by class (e.g., `.my-class`)
    Class(String),
    /// Match by attribute (e.g., `[data-value='asc']`), or by presence
    /// alone when `value` is `None` (e.g., `[data-value]`)
    Attribute { name: String, value: Option<String> },
}

impl Simple {
    fn matches(&self, dom: &MemoryDom, node: NodeId) -> bool {
        match self {
            Self::Tag(tag) => dom.tag(node) == *tag,
            Self::Id(id) => dom.attribute(&node, "id").as_deref() == Some(id.as_str()),
            Self::Class(class) => dom.has_class(&node, class),
            Self::Attribute { name, value } => match (dom.attribute(&node, name), value) {
                (Some(actual), Some(expected)) => actual == *expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
        }
    }
}

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every component must match the same element (e.g., `div.open`)
    Compound(Vec<Simple>),
    /// Descendant combinator (e.g., `.widget .option`)
    Descendant(Box<Selector>, Box<Selector>),
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// Check if this selector matches an element.
    #[must_use]
    pub fn matches(&self, dom: &MemoryDom, node: NodeId) -> bool {
        match self {
            Self::Compound(parts) => parts.iter().all(|p| p.matches(dom, node)),
            Self::Descendant(ancestor, inner) => {
                inner.matches(dom, node)
                    && dom
                        .ancestors_inclusive(node)
                        .into_iter()
                        .skip(1)
                        .any(|a| ancestor.matches(dom, a))
            }
        }
    }

    /// Every element under the document root matching this selector.
    #[must_use]
    pub fn query_all(&self, dom: &MemoryDom) -> Vec<NodeId> {
        dom.descendants(dom.root())
            .into_iter()
            .filter(|&n| self.matches(dom, n))
            .collect()
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();

        if self.peek_char().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut selector = self.parse_compound()?;
        loop {
            self.skip_whitespace();
            if self.peek_char().is_none() {
                return Ok(selector);
            }
            let inner = self.parse_compound()?;
            selector = Selector::Descendant(Box::new(selector), Box::new(inner));
        }
    }

    fn parse_compound(&mut self) -> Result<Selector, SelectorError> {
        let mut parts = Vec::new();
        while let Some(c) = self.peek_char() {
            let part = match c {
                '#' => self.parse_id()?,
                '.' => self.parse_class()?,
                '[' => self.parse_attribute()?,
                _ if c.is_whitespace() => break,
                _ if c.is_alphabetic() && parts.is_empty() => self.parse_tag()?,
                _ => return Err(SelectorError::UnexpectedChar(c)),
            };
            parts.push(part);
        }
        Ok(Selector::Compound(parts))
    }

    fn parse_id(&mut self) -> Result<Simple, SelectorError> {
        self.advance(); // Skip '#'
        Ok(Simple::Id(self.read_identifier()?))
    }

    fn parse_class(&mut self) -> Result<Simple, SelectorError> {
        self.advance(); // Skip '.'
        Ok(Simple::Class(self.read_identifier()?))
    }

    fn parse_tag(&mut self) -> Result<Simple, SelectorError> {
        Ok(Simple::Tag(self.read_identifier()?.to_ascii_lowercase()))
    }

    fn parse_attribute(&mut self) -> Result<Simple, SelectorError> {
        self.advance(); // Skip '['

        let name = self.read_until_any(&['=', ']']).trim().to_string();
        if name.is_empty() || self.peek_char().is_none() {
            return Err(SelectorError::InvalidAttribute);
        }

        if self.peek_char() == Some(']') {
            self.advance();
            return Ok(Simple::Attribute { name, value: None });
        }

        self.advance(); // Skip '='

        let quote = self.peek_char();
        if quote == Some('\'') || quote == Some('"') {
            self.advance();
        }

        let value = self.read_until_any(&['\'', '"', ']']);

        if self.peek_char() == Some('\'') || self.peek_char() == Some('"') {
            self.advance();
        }

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        Ok(Simple::Attribute {
            name,
            value: Some(value),
        })
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until_any(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stops.contains(&c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
}
