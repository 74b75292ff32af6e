//! Selectors - Locating the subtree an engine manages.
//!
//! A deliberately small selector language:
//!
//! ```text
//! div            type
//! #app           id
//! .panel         class
//! *              any element
//! div#app.panel  compound
//! #app .panel    descendant combinator
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use super::document::{Document, ElementData, NodeId};
use crate::error::SelectorError;

/// A parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        !self.universal && self.tag.is_none() && self.id.is_none() && self.classes.is_empty()
    }

    fn matches(&self, element: &ElementData) -> bool {
        self.tag.as_deref().is_none_or(|tag| element.tag == tag)
            && self.id.as_deref().is_none_or(|id| element.id() == Some(id))
            && self.classes.iter().all(|class| element.has_class(class))
    }
}

fn take_name(chars: &mut Peekable<CharIndices<'_>>, offset: usize) -> Result<String, SelectorError> {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if name.is_empty() {
        return Err(SelectorError::ExpectedName { offset });
    }
    Ok(name)
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut compounds = Vec::new();
        let mut current = Compound::default();
        let mut chars = input.char_indices().peekable();

        while let Some(&(offset, c)) = chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    chars.next();
                    if !current.is_empty() {
                        compounds.push(std::mem::take(&mut current));
                    }
                }
                '#' => {
                    chars.next();
                    current.id = Some(take_name(&mut chars, offset + 1)?);
                }
                '.' => {
                    chars.next();
                    current.classes.push(take_name(&mut chars, offset + 1)?);
                }
                '*' if current.is_empty() => {
                    chars.next();
                    current.universal = true;
                }
                c if c.is_alphabetic() && current.is_empty() => {
                    current.tag = Some(take_name(&mut chars, offset)?.to_ascii_lowercase());
                }
                found => return Err(SelectorError::Unexpected { found, offset }),
            }
        }

        if !current.is_empty() {
            compounds.push(current);
        }
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { compounds })
    }

    /// Does `node` match this selector?
    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !document.element(node).is_some_and(|element| last.matches(element)) {
            return false;
        }

        // Descendant combinators only, so greedy nearest-ancestor matching is exact
        let mut cursor = node;
        for compound in ancestors.iter().rev() {
            let found = document.ancestors(cursor).find(|&ancestor| {
                document
                    .element(ancestor)
                    .is_some_and(|element| compound.matches(element))
            });
            match found {
                Some(ancestor) => cursor = ancestor,
                None => return false,
            }
        }
        true
    }
}

impl Document {
    /// First element in document order matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .find(|&node| selector.matches(self, node)))
    }

    /// Every element in document order matching `selector`.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .filter(|&node| selector.matches(self, node))
            .collect())
    }
}
