//! Markup Parser - Builds document nodes from an HTML-like fragment.
//!
//! Supports what directive-bearing templates need and nothing more:
//! - Elements with quoted, unquoted and boolean attributes
//! - Self-closing tags (`<br/>`) and the HTML void elements
//! - Text and comments
//! - The common character entities (`&amp;`, `&lt;`, `&#39;`, ...)
//!
//! Whitespace-only text is kept as text nodes, the same way a browser does.
//! Mismatched or unclosed tags are errors rather than being repaired.

use super::document::{Document, ElementData, NodeId, is_void_element};
use crate::error::ParseError;

/// Parse `markup` and append the resulting nodes to `parent`.
///
/// Returns the top-level nodes that were appended.
pub fn parse_fragment(
    document: &mut Document,
    parent: NodeId,
    markup: &str,
) -> Result<Vec<NodeId>, ParseError> {
    let mut parser = Parser {
        src: markup,
        pos: 0,
    };
    let mut open: Vec<(NodeId, String)> = Vec::new();
    let mut top_level = Vec::new();

    while parser.pos < parser.src.len() {
        let current = open.last().map_or(parent, |(node, _)| *node);
        let rest = parser.rest();

        if rest.starts_with("<!--") {
            let start = parser.pos;
            let body = &rest[4..];
            let end = body
                .find("-->")
                .ok_or(ParseError::UnterminatedComment { offset: start })?;
            let node = document.create_comment(&body[..end]);
            document.append_child(current, node)?;
            if open.is_empty() {
                top_level.push(node);
            }
            parser.pos += 4 + end + 3;
        } else if rest.starts_with("</") {
            let start = parser.pos;
            let close = rest
                .find('>')
                .ok_or_else(|| ParseError::UnterminatedTag {
                    tag: rest[2..].trim().to_string(),
                    offset: start,
                })?;
            let tag = rest[2..close].trim().to_ascii_lowercase();
            match open.last() {
                Some((_, open_tag)) if *open_tag == tag => {
                    open.pop();
                }
                _ => return Err(ParseError::UnexpectedClosingTag { tag, offset: start }),
            }
            parser.pos += close + 1;
        } else if starts_tag(rest) {
            let (element, self_closing) = parser.start_tag()?;
            let tag = element.tag.clone();
            let node = document.adopt_element(element);
            document.append_child(current, node)?;
            if open.is_empty() {
                top_level.push(node);
            }
            if !self_closing && !is_void_element(&tag) {
                open.push((node, tag));
            }
        } else {
            let text = parser.text();
            let node = document.create_text(&decode_entities(text));
            document.append_child(current, node)?;
            if open.is_empty() {
                top_level.push(node);
            }
        }
    }

    if let Some((_, tag)) = open.pop() {
        return Err(ParseError::Unclosed { tag });
    }
    Ok(top_level)
}

/// Does `rest` begin a start tag, closing tag or comment?
fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn starts_markup(rest: &str) -> bool {
    starts_tag(rest) || rest.starts_with("</") || rest.starts_with("<!--")
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Text up to the next markup construct. A stray `<` is kept as text.
    fn text(&mut self) -> &'a str {
        let start = self.pos;
        self.bump();
        while self.pos < self.src.len() && !starts_markup(self.rest()) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Parse `<tag attr="v" ...>` or `<tag .../>`. Position is at the `<`.
    fn start_tag(&mut self) -> Result<(ElementData, bool), ParseError> {
        let start = self.pos;
        self.bump();
        let tag = self.take_while(is_name_char);
        let mut element = ElementData::new(tag);

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((element, true));
            }
            match self.peek() {
                None => {
                    return Err(ParseError::UnterminatedTag {
                        tag: element.tag,
                        offset: start,
                    });
                }
                Some('>') => {
                    self.bump();
                    return Ok((element, false));
                }
                Some(_) => {}
            }

            let name_offset = self.pos;
            let name = self.take_while(is_attribute_name_char);
            if name.is_empty() {
                let found = self.peek().unwrap_or('\0');
                return Err(ParseError::UnexpectedChar {
                    found,
                    offset: name_offset,
                });
            }
            let name = name.to_ascii_lowercase();

            self.skip_whitespace();
            let value = if self.peek() == Some('=') {
                self.bump();
                self.skip_whitespace();
                self.attribute_value()?
            } else {
                String::new()
            };
            element.set_attribute(&name, &value);
        }
    }

    fn attribute_value(&mut self) -> Result<String, ParseError> {
        let offset = self.pos;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let value = self.take_while(|c| c != quote);
                if self.bump() != Some(quote) {
                    return Err(ParseError::UnterminatedAttribute { offset });
                }
                Ok(decode_entities(value))
            }
            _ => {
                let mut value = self.take_while(|c| !c.is_whitespace() && c != '>');
                // `<a x=y/>` is a self-closing tag, not the value "y/"
                if value.len() > 1 && value.ends_with('/') && self.peek() == Some('>') {
                    value = &value[..value.len() - 1];
                    self.pos -= 1;
                }
                Ok(decode_entities(value))
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_'
}

fn is_attribute_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
}

/// Decode the handful of character references templates actually use.
fn decode_entities(source: &str) -> String {
    if !source.contains('&') {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => None,
            };
            c.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeData;

    #[test]
    fn test_parse_nested_elements() {
        let doc = Document::parse(r#"<div id="app"><p class="a b">Hi</p><br></div>"#).unwrap();
        let app = doc.children(doc.root())[0];

        let element = doc.element(app).unwrap();
        assert_eq!(element.tag, "div");
        assert_eq!(element.id(), Some("app"));

        let children = doc.children(app);
        assert_eq!(children.len(), 2);
        assert!(doc.element(children[0]).unwrap().has_class("b"));
        assert_eq!(doc.text_content(children[0]), "Hi");
        assert_eq!(doc.element(children[1]).unwrap().tag, "br");
        assert!(doc.children(children[1]).is_empty());
    }

    #[test]
    fn test_parse_attribute_forms() {
        let doc = Document::parse(
            r#"<input disabled value=plain title='single' data-x = "a &amp; b" @click="save"/>"#,
        )
        .unwrap();
        let input = doc.children(doc.root())[0];

        assert_eq!(doc.attribute(input, "disabled"), Some(""));
        assert_eq!(doc.attribute(input, "value"), Some("plain"));
        assert_eq!(doc.attribute(input, "title"), Some("single"));
        assert_eq!(doc.attribute(input, "data-x"), Some("a & b"));
        assert_eq!(doc.attribute(input, "@click"), Some("save"));
    }

    #[test]
    fn test_parse_unquoted_self_closing() {
        let doc = Document::parse("<span x=y/><b></b>").unwrap();
        let children = doc.children(doc.root());
        assert_eq!(children.len(), 2);
        assert_eq!(doc.attribute(children[0], "x"), Some("y"));
    }

    #[test]
    fn test_parse_style_attribute() {
        let doc = Document::parse(r#"<p style="display: inline; color: red">x</p>"#).unwrap();
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.style(p, "display"), Some("inline"));
        assert_eq!(doc.attribute(p, "style"), None);
    }

    #[test]
    fn test_parse_comments_and_whitespace() {
        let doc = Document::parse("<ul>\n  <!-- note -->\n  <li>1 &lt; 2</li>\n</ul>").unwrap();
        let ul = doc.children(doc.root())[0];
        let children = doc.children(ul);

        assert_eq!(children.len(), 5);
        assert!(doc.is_comment(children[1]));
        assert_eq!(doc.data(children[1]), Some(&NodeData::Comment(" note ".into())));
        assert_eq!(doc.text_content(children[3]), "1 < 2");
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let doc = Document::parse("<p>a < b</p>").unwrap();
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.text_content(p), "a < b");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Document::parse("<div><p></div>"),
            Err(ParseError::UnexpectedClosingTag { ref tag, offset: 8 }) if tag == "div"
        ));
        assert!(matches!(
            Document::parse("<div>"),
            Err(ParseError::Unclosed { ref tag }) if tag == "div"
        ));
        assert!(matches!(
            Document::parse("<!-- open"),
            Err(ParseError::UnterminatedComment { offset: 0 })
        ));
        assert!(matches!(
            Document::parse(r#"<p title="x>"#),
            Err(ParseError::UnterminatedAttribute { offset: 9 })
        ));
        assert!(matches!(
            Document::parse("<p"),
            Err(ParseError::UnterminatedTag { .. })
        ));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;&quot;&#65;&bogus;&"), "<\"&#65;&bogus;&");
    }
}
