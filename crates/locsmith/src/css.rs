//! CSS selector subset used to check locator uniqueness.
//!
//! Supports exactly what the synthesizer emits plus the few selectors the
//! page scan needs: type and universal selectors, `#id`, `.class`,
//! `[attr]`, `[attr="value"]`, `:nth-of-type(n)`, the child and descendant
//! combinators, and `,` groups. Identifiers and strings accept backslash
//! and hex escapes.

use crate::dom::{DomTree, NodeId};
use crate::result::{LocsmithError, LocsmithResult};

/// Escape a value for use inside a CSS identifier or quoted attribute value.
///
/// Every character outside `[A-Za-z0-9_-]` is prefixed with a backslash.
/// Control characters and a digit in leading position (`1a`, `-1a`) become
/// hex escapes (`\31 a`) so the result is also a valid identifier.
#[must_use]
pub fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let leading_hyphen = value.starts_with('-');
    for (index, ch) in value.chars().enumerate() {
        let leading_digit =
            ch.is_ascii_digit() && (index == 0 || (index == 1 && leading_hyphen));
        if leading_digit || ch.is_control() {
            out.push_str(&format!("\\{:x} ", u32::from(ch)));
        } else if ch == '-' && index == 0 && value.len() == 1 {
            out.push_str("\\-");
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

/// Relation of a compound selector to the one on its left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { name: String },
    Equals { name: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    nth_of_type: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    compound: Compound,
    combinator: Option<Combinator>,
}

/// A parsed selector group (`a > b, c`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    chains: Vec<Vec<Part>>,
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(selector: &str) -> LocsmithResult<Self> {
        let mut cursor = Cursor::new(selector);
        let mut chains = Vec::new();
        loop {
            cursor.skip_whitespace();
            chains.push(cursor.parse_chain()?);
            cursor.skip_whitespace();
            match cursor.peek() {
                None => break,
                Some(',') => {
                    cursor.bump();
                }
                Some(other) => {
                    return Err(cursor.error(format!("unexpected '{other}'")));
                }
            }
        }
        Ok(Self {
            source: selector.to_string(),
            chains,
        })
    }

    /// Original selector text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any selector of the group
    pub fn matches<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        dom.is_element(node) && self.chains.iter().any(|chain| matches_chain(dom, node, chain))
    }

    /// All matching elements in document order
    pub fn select<D: DomTree + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        dom.elements()
            .into_iter()
            .filter(|node| self.matches(dom, *node))
            .collect()
    }
}

fn matches_chain<D: DomTree + ?Sized>(dom: &D, node: NodeId, chain: &[Part]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !matches_compound(dom, node, &last.compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match last.combinator {
        Some(Combinator::Child) => dom
            .parent_element(node)
            .is_some_and(|parent| matches_chain(dom, parent, rest)),
        Some(Combinator::Descendant) | None => dom
            .ancestors(node)
            .into_iter()
            .any(|ancestor| matches_chain(dom, ancestor, rest)),
    }
}

fn matches_compound<D: DomTree + ?Sized>(dom: &D, node: NodeId, compound: &Compound) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    if let Some(expected) = &compound.tag {
        if !tag.eq_ignore_ascii_case(expected) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if dom.attribute(node, "id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let classes = dom.class_list(node);
        if !compound
            .classes
            .iter()
            .all(|class| classes.contains(&class.as_str()))
        {
            return false;
        }
    }
    let attrs_ok = compound.attrs.iter().all(|cond| match cond {
        AttrCondition::Exists { name } => dom.attribute(node, name).is_some(),
        AttrCondition::Equals { name, value } => dom.attribute(node, name) == Some(value.as_str()),
    });
    if !attrs_ok {
        return false;
    }
    compound
        .nth_of_type
        .map_or(true, |n| dom.position_of_type(node) == n)
}

struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn error(&self, message: impl Into<String>) -> LocsmithError {
        LocsmithError::invalid_selector(
            self.source,
            format!("{} at offset {}", message.into(), self.pos),
        )
    }

    fn parse_chain(&mut self) -> LocsmithResult<Vec<Part>> {
        let mut parts: Vec<Part> = Vec::new();
        let mut pending: Option<Combinator> = None;
        loop {
            let spaced = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    if parts.is_empty() || pending == Some(Combinator::Child) {
                        return Err(self.error("misplaced '>'"));
                    }
                    self.bump();
                    pending = Some(Combinator::Child);
                    continue;
                }
                Some(_) => {
                    if !parts.is_empty() && pending.is_none() && !spaced {
                        return Err(self.error("expected combinator"));
                    }
                }
            }
            let compound = self.parse_compound()?;
            let combinator = if parts.is_empty() {
                None
            } else {
                Some(pending.take().unwrap_or(Combinator::Descendant))
            };
            parts.push(Part {
                compound,
                combinator,
            });
        }
        if parts.is_empty() {
            return Err(self.error("empty selector"));
        }
        if pending.is_some() {
            return Err(self.error("dangling combinator"));
        }
        Ok(parts)
    }

    fn parse_compound(&mut self) -> LocsmithResult<Compound> {
        let mut compound = Compound::default();
        let mut consumed = false;
        if self.peek() == Some('*') {
            self.bump();
            consumed = true;
        } else if self.peek().is_some_and(is_ident_start) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            consumed = true;
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.parse_ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attrs.push(self.parse_attr()?);
                }
                Some(':') => {
                    self.bump();
                    compound.nth_of_type = Some(self.parse_pseudo()?);
                }
                _ => break,
            }
            consumed = true;
        }
        if consumed {
            Ok(compound)
        } else {
            Err(self.error("expected a simple selector"))
        }
    }

    fn parse_attr(&mut self) -> LocsmithResult<AttrCondition> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        match self.bump() {
            Some(']') => Ok(AttrCondition::Exists { name }),
            Some('=') => {
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        self.parse_string(quote)?
                    }
                    _ => self.parse_ident()?,
                };
                self.skip_whitespace();
                if self.bump() == Some(']') {
                    Ok(AttrCondition::Equals { name, value })
                } else {
                    Err(self.error("expected ']'"))
                }
            }
            _ => Err(self.error("unsupported attribute operator")),
        }
    }

    fn parse_pseudo(&mut self) -> LocsmithResult<usize> {
        let name = self.parse_ident()?.to_ascii_lowercase();
        if name != "nth-of-type" || self.bump() != Some('(') {
            return Err(self.error(format!("unsupported pseudo-class ':{name}'")));
        }
        self.skip_whitespace();
        let mut digits = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            digits.push(ch);
            self.pos += 1;
        }
        self.skip_whitespace();
        if self.bump() != Some(')') {
            return Err(self.error("expected ')'"));
        }
        match digits.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(self.error("nth-of-type expects a positive integer")),
        }
    }

    fn parse_ident(&mut self) -> LocsmithResult<String> {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.bump();
                out.push(self.parse_escape()?);
            } else if is_ident_char(ch) {
                out.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            Err(self.error("expected identifier"))
        } else {
            Ok(out)
        }
    }

    fn parse_string(&mut self, quote: char) -> LocsmithResult<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(ch) => out.push(ch),
            }
        }
    }

    /// Called with the cursor just past a backslash
    fn parse_escape(&mut self) -> LocsmithResult<char> {
        let Some(first) = self.bump() else {
            return Err(self.error("dangling escape"));
        };
        if !first.is_ascii_hexdigit() {
            return Ok(first);
        }
        let mut hex = String::from(first);
        while hex.len() < 6 {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    hex.push(ch);
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        let code = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
        Ok(char::from_u32(code)
            .filter(|ch| *ch != '\0')
            .unwrap_or('\u{FFFD}'))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '-' || ch == '\\' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii()
}
