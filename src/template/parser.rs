//! Recursive-descent parser for the template grammar.
//!
//! A field reads, in order: an optional delimiter prefix ending in `+`, the
//! name, an optional `:subfield`, dot-path attributes, `|filter` chains, a
//! `[find,replace|…]` block, a conditional introduced by a single space, a
//! `?bool` branch, and a `,default` branch. Each nested template position
//! is parsed in place as a sub-AST; the terminator set passed to
//! [`Parser::parse_template`] is what distinguishes the positions.

use super::ast::{Cond, CondOp, FieldExpr, FilterSpec, Segment, Template};
use super::error::{Span, TemplateError};
use super::filters;
use super::lexer::{
    FILTER_TERMINATORS, NAME_TERMINATORS, PATH_TERMINATORS, SUBFIELD_TERMINATORS, Scanner,
};

/// Terminators for a conditional right-hand side: `|` splits alternatives,
/// the rest end the conditional.
const COND_RHS_TERMINATORS: &[char] = &['|', '?', ',', '}'];

/// Terminators for the replace text of a find/replace pair.
const REPLACE_TERMINATORS: &[char] = &['|', ']'];

pub(crate) struct Parser<'a> {
    sc: Scanner<'a>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            sc: Scanner::new(source),
        }
    }

    /// Parse a complete template.
    pub(crate) fn parse(mut self) -> Result<Template, TemplateError> {
        self.parse_template(&[])
    }

    /// Parse segments until end of input or an unconsumed character from
    /// `terminators` at this nesting level. `{` always opens a field; a `}`
    /// that is not an expected terminator is a syntax error.
    fn parse_template(&mut self, terminators: &[char]) -> Result<Template, TemplateError> {
        let start = self.sc.pos();
        let mut segments = Vec::new();
        let mut literal = String::new();

        loop {
            match self.sc.peek() {
                None => break,
                Some('{') => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(self.parse_field()?));
                }
                Some(c) if terminators.contains(&c) => break,
                Some('}') => {
                    return Err(TemplateError::parse(
                        self.sc.pos(),
                        "unexpected '}' outside a template field",
                    ));
                }
                Some(c) => {
                    literal.push(c);
                    self.sc.bump();
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            segments,
            span: Span::new(start, self.sc.pos()),
        })
    }

    fn parse_field(&mut self) -> Result<FieldExpr, TemplateError> {
        let start = self.sc.pos();
        self.sc.bump(); // consume '{'

        let (delim, in_place) = match self.sc.find_delim_plus() {
            Some(plus_offset) => {
                let text = self.sc.take_bytes(plus_offset).to_string();
                self.sc.bump(); // consume '+'
                (if text.is_empty() { None } else { Some(text) }, true)
            }
            None => (None, false),
        };

        let name = self.sc.take_until(NAME_TERMINATORS).to_string();
        if name.is_empty() {
            return Err(TemplateError::parse(self.sc.pos(), "empty field name"));
        }

        let subfield = if self.sc.eat(':') {
            Some(self.sc.take_until(SUBFIELD_TERMINATORS).to_string())
        } else {
            None
        };

        let mut path = Vec::new();
        while self.sc.eat('.') {
            let attr = self.sc.take_until(PATH_TERMINATORS).to_string();
            if attr.is_empty() {
                return Err(TemplateError::parse(self.sc.pos(), "empty path attribute"));
            }
            path.push(attr);
        }

        let mut filters = Vec::new();
        while self.sc.eat('|') {
            filters.push(self.parse_filter()?);
        }

        let replacements = if self.sc.eat('[') {
            self.parse_find_replace()?
        } else {
            Vec::new()
        };

        let conditional = if self.sc.peek() == Some(' ') {
            self.sc.bump();
            Some(self.parse_conditional()?)
        } else {
            None
        };

        let bool_branch = if self.sc.eat('?') {
            Some(self.parse_template(&[',', '}'])?)
        } else {
            None
        };

        let default_branch = if self.sc.eat(',') {
            Some(self.parse_template(&['}'])?)
        } else {
            None
        };

        if !self.sc.eat('}') {
            return Err(match self.sc.peek() {
                Some(c) => TemplateError::parse(
                    self.sc.pos(),
                    format!("expected '}}' but found '{c}'"),
                ),
                None => TemplateError::parse(
                    start,
                    "unterminated template field (missing '}')",
                ),
            });
        }

        Ok(FieldExpr {
            span: Span::new(start, self.sc.pos()),
            delim,
            in_place,
            name,
            subfield,
            path,
            filters,
            replacements,
            conditional,
            bool_branch,
            default_branch,
        })
    }

    fn parse_filter(&mut self) -> Result<FilterSpec, TemplateError> {
        let start = self.sc.pos();
        let name = self.sc.take_until(FILTER_TERMINATORS).to_string();
        if name.is_empty() {
            return Err(TemplateError::parse(start, "empty filter name"));
        }

        let arg = if self.sc.eat('(') {
            Some(self.take_filter_argument(start)?)
        } else {
            None
        };

        filters::validate(&name, arg.as_deref())
            .map_err(|message| TemplateError::parse(start, message))?;

        Ok(FilterSpec {
            name,
            arg,
            span: Span::new(start, self.sc.pos()),
        })
    }

    /// Consume a filter argument up to the matching `)`. Parentheses nest;
    /// everything else is taken verbatim.
    fn take_filter_argument(&mut self, filter_start: usize) -> Result<String, TemplateError> {
        let mut depth = 1usize;
        let mut arg = String::new();
        loop {
            match self.sc.bump() {
                Some('(') => {
                    depth += 1;
                    arg.push('(');
                }
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(arg);
                    }
                    arg.push(')');
                }
                Some(c) => arg.push(c),
                None => {
                    return Err(TemplateError::parse(
                        filter_start,
                        "unterminated filter argument (missing ')')",
                    ));
                }
            }
        }
    }

    /// Parse the body of a `[find,replace|find,replace|…]` block; the `[`
    /// has been consumed.
    fn parse_find_replace(&mut self) -> Result<Vec<(String, Template)>, TemplateError> {
        let block_start = self.sc.pos();
        let mut pairs = Vec::new();
        loop {
            pairs.push(self.parse_find_replace_pair()?);
            if self.sc.eat('|') {
                continue;
            }
            if self.sc.eat(']') {
                return Ok(pairs);
            }
            return Err(TemplateError::parse(
                block_start,
                "unterminated find/replace block (missing ']')",
            ));
        }
    }

    /// One `find,replace` pair. The find side is plain text; only the
    /// replace side may contain nested fields. The split point is the
    /// *last* comma outside braces, so a find text may itself contain
    /// commas (`[,,%pipe]` replaces `,` with the value of `%pipe`). `|`
    /// belongs to the block as a pair separator, so a pair cannot contain
    /// one.
    fn parse_find_replace_pair(&mut self) -> Result<(String, Template), TemplateError> {
        let pair_start = self.sc.pos();
        let mut depth = 0usize;
        let mut last_comma = None;
        let mut terminated = false;
        for (i, c) in self.sc.rest().char_indices() {
            match c {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => last_comma = Some(i),
                '|' | ']' if depth == 0 => {
                    terminated = true;
                    break;
                }
                _ => {}
            }
        }

        if !terminated {
            return Err(TemplateError::parse(
                pair_start,
                "unterminated find/replace block (missing ']')",
            ));
        }
        let Some(comma) = last_comma else {
            return Err(TemplateError::parse(
                pair_start,
                "find/replace pair must contain ',' separating find from replace",
            ));
        };

        let find = self.sc.take_bytes(comma).to_string();
        self.sc.bump(); // consume ','
        let replace = self.parse_template(REPLACE_TERMINATORS)?;
        Ok((find, replace))
    }

    fn parse_conditional(&mut self) -> Result<Cond, TemplateError> {
        let negated = self.sc.eat_str("not ");

        let op_start = self.sc.pos();
        let token = self.sc.take_until(&[' ', '?', ',', '}']).to_string();
        let op = CondOp::from_token(&token).ok_or_else(|| {
            TemplateError::parse(op_start, format!("unknown conditional operator '{token}'"))
        })?;
        if !self.sc.eat(' ') {
            return Err(TemplateError::parse(
                self.sc.pos(),
                "expected a space after the conditional operator",
            ));
        }

        let mut rhs = vec![self.parse_template(COND_RHS_TERMINATORS)?];
        while self.sc.eat('|') {
            rhs.push(self.parse_template(COND_RHS_TERMINATORS)?);
        }

        Ok(Cond { negated, op, rhs })
    }
}
