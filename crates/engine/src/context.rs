//! Caret context for prop completion.
//!
//! A forward lexer over the text before the caret. It tracks just enough of
//! JSX-style markup to tell a prop name position apart from everything else:
//!
//! ```text
//! Outside ──<Upper──> TagName ──ws──> Props ──ident──> AttrName ──=──> AfterEquals
//!    ▲                   │              │ ▲                             │
//!    └──── > or /> ──────┴──────────────┘ └──── closing quote / } ──────┤
//!                                                Quoted / Expression ◄──┘
//! ```
//!
//! Only `Props` and an identifier-shaped `AttrName` are eligible. Quote and
//! brace state is tracked from the last tag open, so a caret inside an
//! unterminated attribute value is never mistaken for a prop position.
//! Elements nested inside an attribute expression are followed by depth, and
//! quotes in their text content are plain characters.

use serde::Serialize;
use signal_protocol::{is_component_name, CursorContext};
use std::ops::Range;

/// Where the caret sits, as far as the lexer can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaretState {
    OutsideTag,
    TagName,
    PropRegion,
    AttributeName,
    AfterEquals,
    StringLiteral,
    Expression,
    UnquotedValue,
    MalformedTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Outside,
    TagName,
    Props,
    AttrName { identifier: bool },
    AfterEquals,
    Quoted(char),
    Expression(Expr),
    Unquoted,
    Malformed,
}

impl Lex {
    fn caret_state(self) -> CaretState {
        match self {
            Self::Outside => CaretState::OutsideTag,
            Self::TagName => CaretState::TagName,
            Self::Props => CaretState::PropRegion,
            Self::AttrName { .. } => CaretState::AttributeName,
            Self::AfterEquals => CaretState::AfterEquals,
            Self::Quoted(_) => CaretState::StringLiteral,
            Self::Expression(_) => CaretState::Expression,
            Self::Unquoted => CaretState::UnquotedValue,
            Self::Malformed => CaretState::MalformedTag,
        }
    }
}

/// Markup nested inside an attribute expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nested {
    Script,
    OpenTag,
    SelfClosing,
    CloseTag,
    Text,
}

/// A `{...}` attribute value being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expr {
    depth: usize,
    quote: Option<char>,
    escaped: bool,
    nested: Nested,
    /// Nested elements opened and not yet closed
    elements: usize,
}

impl Expr {
    const OPEN: Self = Self {
        depth: 1,
        quote: None,
        escaped: false,
        nested: Nested::Script,
        elements: 0,
    };

    /// State after `c`; `None` once the outermost `}` closes the value.
    /// Quotes in the text of a nested element are plain characters.
    fn step(mut self, c: char, next: Option<char>) -> Option<Self> {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return Some(self);
        }

        let tag_follows = next.is_some_and(|n| n.is_ascii_alphabetic());
        match (self.nested, c) {
            (Nested::Text, '"' | '\'' | '`') => {}
            (_, '"' | '\'' | '`') => self.quote = Some(c),
            (Nested::Script | Nested::Text, '<') if tag_follows => self.nested = Nested::OpenTag,
            (Nested::Script | Nested::Text, '<') if next == Some('/') => {
                self.nested = Nested::CloseTag;
            }
            (Nested::OpenTag, '/') if next == Some('>') => self.nested = Nested::SelfClosing,
            (Nested::OpenTag, '>') => {
                self.elements += 1;
                self.nested = Nested::Text;
            }
            (Nested::CloseTag, '>') => {
                self.elements = self.elements.saturating_sub(1);
                self.nested = self.after_markup();
            }
            (Nested::SelfClosing, '>') => self.nested = self.after_markup(),
            (_, '{') => {
                self.depth += 1;
                if self.nested == Nested::Text {
                    self.nested = Nested::Script;
                }
            }
            (_, '}') if self.depth <= 1 => return None,
            (_, '}') => {
                self.depth -= 1;
                if self.nested == Nested::Script {
                    self.nested = self.after_markup();
                }
            }
            _ => {}
        }
        Some(self)
    }

    fn after_markup(&self) -> Nested {
        if self.elements > 0 {
            Nested::Text
        } else {
            Nested::Script
        }
    }
}

struct PrefixLexer<'a> {
    text: &'a str,
    state: Lex,
    /// Byte range of the open tag's name
    tag_name: Range<usize>,
    attr_start: usize,
    /// Name range and end offset of the last `<Name ... />`
    self_closed: Option<(Range<usize>, usize)>,
}

impl<'a> PrefixLexer<'a> {
    fn run(text: &'a str) -> Self {
        let mut lexer = Self {
            text,
            state: Lex::Outside,
            tag_name: 0..0,
            attr_start: 0,
            self_closed: None,
        };

        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let next = chars.peek().map(|&(_, n)| n);
            let opens_tag = c == '<' && next.is_some_and(|n| n.is_ascii_uppercase());
            let closes_self = c == '/' && next == Some('>');

            lexer.state = match lexer.state {
                Lex::Outside => {
                    if opens_tag {
                        lexer.open_tag(i)
                    } else {
                        Lex::Outside
                    }
                }
                Lex::TagName => {
                    if c.is_ascii_alphanumeric() {
                        lexer.tag_name.end = i + c.len_utf8();
                        Lex::TagName
                    } else if c.is_whitespace() {
                        Lex::Props
                    } else if c == '>' {
                        Lex::Outside
                    } else if closes_self {
                        chars.next();
                        lexer.close_self(i + 2)
                    } else {
                        Lex::Malformed
                    }
                }
                Lex::Props => {
                    if c.is_whitespace() || (c == '/' && !closes_self) {
                        Lex::Props
                    } else if opens_tag {
                        lexer.open_tag(i)
                    } else if c == '>' {
                        Lex::Outside
                    } else if closes_self {
                        chars.next();
                        lexer.close_self(i + 2)
                    } else {
                        lexer.after_prop_char(i, c)
                    }
                }
                Lex::AttrName { identifier } => {
                    if c.is_whitespace() {
                        Lex::Props
                    } else if c == '=' {
                        Lex::AfterEquals
                    } else if opens_tag {
                        lexer.open_tag(i)
                    } else if c == '>' {
                        Lex::Outside
                    } else if closes_self {
                        chars.next();
                        lexer.close_self(i + 2)
                    } else if matches!(c, '"' | '\'' | '{') {
                        lexer.after_prop_char(i, c)
                    } else {
                        Lex::AttrName {
                            identifier: identifier && c.is_ascii_alphanumeric(),
                        }
                    }
                }
                Lex::AfterEquals => match c {
                    c if c.is_whitespace() => Lex::AfterEquals,
                    '"' | '\'' => Lex::Quoted(c),
                    '{' => Lex::Expression(Expr::OPEN),
                    '>' => Lex::Outside,
                    _ => Lex::Unquoted,
                },
                Lex::Quoted(quote) => {
                    if c == quote {
                        Lex::Props
                    } else {
                        Lex::Quoted(quote)
                    }
                }
                Lex::Expression(expr) => expr.step(c, next).map_or(Lex::Props, Lex::Expression),
                Lex::Unquoted => {
                    if c.is_whitespace() {
                        Lex::Props
                    } else if c == '>' {
                        Lex::Outside
                    } else if closes_self {
                        chars.next();
                        lexer.close_self(i + 2)
                    } else {
                        Lex::Unquoted
                    }
                }
                Lex::Malformed => {
                    if opens_tag {
                        lexer.open_tag(i)
                    } else if c == '>' {
                        Lex::Outside
                    } else {
                        Lex::Malformed
                    }
                }
            };
        }

        lexer
    }

    fn open_tag(&mut self, lt: usize) -> Lex {
        // `<` is one byte; the name starts right after it
        self.tag_name = (lt + 1)..(lt + 1);
        self.self_closed = None;
        Lex::TagName
    }

    fn close_self(&mut self, end: usize) -> Lex {
        self.self_closed = Some((self.tag_name.clone(), end));
        Lex::Outside
    }

    /// A non-whitespace char where a prop name may start
    fn after_prop_char(&mut self, i: usize, c: char) -> Lex {
        match c {
            '"' | '\'' => Lex::Quoted(c),
            '{' => Lex::Expression(Expr::OPEN),
            '=' => Lex::AfterEquals,
            _ => {
                self.attr_start = i;
                Lex::AttrName {
                    identifier: c.is_ascii_alphabetic(),
                }
            }
        }
    }

    fn tag_name(&self) -> &'a str {
        let text = self.text;
        &text[self.tag_name.clone()]
    }

    fn context(&self) -> CursorContext {
        let partial = match self.state {
            Lex::Props => "",
            Lex::AttrName { identifier: true } => &self.text[self.attr_start..],
            _ => return CursorContext::outside(),
        };
        let name = self.tag_name();
        if !is_component_name(name) {
            log::debug!("Ignoring tag with malformed component name {name:?}");
            return CursorContext::outside();
        }
        CursorContext::inside(name, partial)
    }
}

/// Decide whether the caret (at the end of `text_before_caret`) is at a prop
/// name position of a component's opening tag.
pub fn analyze(text_before_caret: &str) -> CursorContext {
    PrefixLexer::run(text_before_caret).context()
}

/// [`analyze`] on `buffer[..caret]`; the caret is a byte offset, clamped to
/// the buffer and moved back to a char boundary.
pub fn analyze_at(buffer: &str, caret: usize) -> CursorContext {
    analyze(prefix_at(buffer, caret))
}

/// Lexer state at the end of the prefix
pub fn caret_state(text_before_caret: &str) -> CaretState {
    PrefixLexer::run(text_before_caret).state.caret_state()
}

/// Name of the component being authored: the open tag around the caret, or
/// a self-closing `<Name ... />` that ends the prefix.
pub fn component_name(text_before_caret: &str) -> Option<String> {
    let lexer = PrefixLexer::run(text_before_caret);
    if let Some(name) = lexer.context().component_name {
        return Some(name);
    }
    let (range, end) = lexer.self_closed.clone()?;
    if !text_before_caret[end..].trim().is_empty() {
        return None;
    }
    let name = &text_before_caret[range];
    is_component_name(name).then(|| name.to_string())
}

pub fn prefix_at(buffer: &str, caret: usize) -> &str {
    let mut caret = caret.min(buffer.len());
    while !buffer.is_char_boundary(caret) {
        caret -= 1;
    }
    &buffer[..caret]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn space_after_component_name_is_eligible() {
        assert_eq!(analyze("<Button primary "), CursorContext::inside("Button", ""));
        assert_eq!(analyze("<Button "), CursorContext::inside("Button", ""));
    }

    #[test]
    fn caret_inside_unterminated_string_is_not_eligible() {
        assert_eq!(analyze("<Button href=\"/x primary"), CursorContext::outside());
        assert_eq!(caret_state("<Button href=\"/x primary"), CaretState::StringLiteral);
        assert_eq!(analyze("<Button title='it "), CursorContext::outside());
    }

    #[test]
    fn partial_word_is_the_trailing_identifier() {
        assert_eq!(analyze("<Button pri"), CursorContext::inside("Button", "pri"));
        assert_eq!(
            analyze("<Button href=\"/x\" hov"),
            CursorContext::inside("Button", "hov")
        );
    }

    #[test]
    fn tag_name_needs_trailing_whitespace() {
        assert_eq!(caret_state("<Butt"), CaretState::TagName);
        assert!(!analyze("<Butt").is_eligible());
        assert!(!analyze("<button ").is_eligible());
    }

    #[test]
    fn value_positions_are_not_eligible() {
        assert_eq!(caret_state("<Button size="), CaretState::AfterEquals);
        assert!(!analyze("<Button size=").is_eligible());
        assert!(!analyze("<Button onClick={() => go(").is_eligible());
        assert!(!analyze("<Button size=lg").is_eligible());
    }

    #[test]
    fn closed_expressions_and_strings_return_to_props() {
        let prefix = r#"<Button onClick={() => go("}", {a: 1})} label="a>b" {...rest} "#;
        assert_eq!(analyze(prefix), CursorContext::inside("Button", ""));
    }

    #[test]
    fn closed_tags_are_not_eligible() {
        assert!(!analyze("<Button primary>Click ").is_eligible());
        assert!(!analyze("<Button primary />").is_eligible());
        assert!(!analyze("<Button primary></Button> ").is_eligible());
        assert!(!analyze("plain text ").is_eligible());
    }

    #[test]
    fn multi_line_and_nested_markup() {
        let prefix = "<div className=\"row\">\n  <Card\n    elevated\n    ti";
        assert_eq!(analyze(prefix), CursorContext::inside("Card", "ti"));

        let nested = "<Layout>\n  <Button icon={<Icon name=\"x\" />} ";
        assert_eq!(analyze(nested), CursorContext::inside("Button", ""));
    }

    #[test]
    fn quotes_in_nested_element_text_are_not_strings() {
        let prefix = "<Button icon={<span>Don't</span>} ";
        assert_eq!(analyze(prefix), CursorContext::inside("Button", ""));

        let prefix = "<Button icon={<b>{count}'s \"x\"</b>} lab";
        assert_eq!(analyze(prefix), CursorContext::inside("Button", "lab"));

        let prefix = "<Button icon={ok ? <i>It's</i> : 'no}'} ";
        assert_eq!(analyze(prefix), CursorContext::inside("Button", ""));
    }

    #[test]
    fn unclosed_nested_element_keeps_expression_open() {
        assert_eq!(
            caret_state("<Button icon={<span title=\"a}\">Don't "),
            CaretState::Expression
        );
        assert!(!analyze("<Button icon={<span>it's ").is_eligible());
    }

    #[test]
    fn later_tag_open_supersedes_unclosed_one() {
        assert_eq!(analyze("<Card \n<Button "), CursorContext::inside("Button", ""));
    }

    #[test]
    fn malformed_names_are_not_eligible() {
        assert_eq!(caret_state("<Foo.Bar "), CaretState::MalformedTag);
        assert!(!analyze("<Foo.Bar ").is_eligible());
        assert!(!analyze("<Button data-te").is_eligible());
    }

    #[test]
    fn component_name_accepts_self_closing_tag() {
        assert_eq!(component_name("<Button primary />").as_deref(), Some("Button"));
        assert_eq!(component_name("<Icon/>  ").as_deref(), Some("Icon"));
        assert_eq!(component_name("<Button primary ").as_deref(), Some("Button"));
        assert_eq!(component_name("<Button primary /> text"), None);
        assert_eq!(component_name("<Button primary>"), None);
    }

    #[test]
    fn analyze_at_clamps_caret() {
        let buffer = "<Button primary lg>";
        assert_eq!(analyze_at(buffer, 16), CursorContext::inside("Button", ""));
        assert_eq!(analyze_at(buffer, 18), CursorContext::inside("Button", "lg"));
        assert!(!analyze_at(buffer, 1_000).is_eligible());

        let wide = "<Card é";
        assert_eq!(prefix_at(wide, 7), "<Card ");
    }
}
