//! Recursive-descent parser for the canonical selector grammar.

use crate::selector::errors::SelectorSyntaxError;
use crate::selector::shorthand::split_regex_literal;
use crate::selector::syntax::{
    compile_regex, Attribute, AttributeTest, Combinator, CompareOp, Complex, Compound, Literal,
    Pseudo, SelectorList,
};

type Result<T> = std::result::Result<T, SelectorSyntaxError>;

pub(crate) fn parse_selector(text: &str) -> Result<SelectorList> {
    let mut parser = SelectorParser { text, pos: 0 };
    let list = parser.parse_list()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(list),
        Some(found) => Err(parser.unexpected(found)),
    }
}

struct SelectorParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn parse_list(&mut self) -> Result<SelectorList> {
        let mut alternatives = vec![self.parse_complex()?];
        loop {
            self.skip_ws();
            if !self.eat(',') {
                break;
            }
            alternatives.push(self.parse_complex()?);
        }
        Ok(SelectorList { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex> {
        self.skip_ws();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('~') => Combinator::Sibling,
                Some('+') => Combinator::Adjacent,
                Some(',') | Some(')') | None => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(found) => return Err(self.unexpected(found)),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_ws();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let start = self.pos;
        let mut compound = Compound::default();

        if self.eat('*') {
            compound.kind = None;
        } else if let Some(name) = self.ident() {
            if name == "Kind" && self.eat('=') {
                let kind = self.ident().ok_or_else(|| self.expected("node kind"))?;
                compound.kind = Some(kind.to_string());
            } else {
                compound.kind = Some(name.to_string());
            }
        }

        loop {
            match self.peek() {
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.parse_attribute()?);
                }
                Some(':') => {
                    self.bump();
                    compound.pseudos.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.expected("selector"));
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<Attribute> {
        self.skip_ws();
        let mut path = vec![self
            .ident()
            .ok_or_else(|| self.expected("attribute name"))?
            .to_string()];
        while self.eat('.') {
            let segment = self.ident().ok_or_else(|| self.expected("attribute name"))?;
            path.push(segment.to_string());
        }
        self.skip_ws();

        if self.eat(']') {
            return Ok(Attribute {
                path,
                test: AttributeTest::Present,
            });
        }

        let op = self.parse_operator()?;
        self.skip_ws();

        let test = match self.peek() {
            Some('/') => {
                self.bump();
                let negated = match op {
                    CompareOp::Eq => false,
                    CompareOp::Ne => true,
                    other => {
                        return Err(SelectorSyntaxError::RegexOperator { op: other.as_str() })
                    }
                };
                let (body, flags) = self.regex_literal()?;
                AttributeTest::Regex {
                    regex: compile_regex(&body, flags)?,
                    negated,
                }
            }
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let literal = Literal::quoted(self.quoted(quote)?);
                AttributeTest::Compare { op, literal }
            }
            _ => {
                let token = self.bare_token();
                if token.is_empty() {
                    return Err(self.expected("attribute value"));
                }
                AttributeTest::Compare {
                    op,
                    literal: Literal::bare(token),
                }
            }
        };

        self.skip_ws();
        if !self.eat(']') {
            return Err(self.expected("']'"));
        }
        Ok(Attribute { path, test })
    }

    fn parse_operator(&mut self) -> Result<CompareOp> {
        let op = if self.eat_str("!=") {
            CompareOp::Ne
        } else if self.eat_str("<=") {
            CompareOp::Le
        } else if self.eat_str(">=") {
            CompareOp::Ge
        } else if self.eat('=') {
            CompareOp::Eq
        } else if self.eat('<') {
            CompareOp::Lt
        } else if self.eat('>') {
            CompareOp::Gt
        } else {
            return Err(self.expected("attribute operator or ']'"));
        };
        Ok(op)
    }

    fn parse_pseudo(&mut self) -> Result<Pseudo> {
        let name = self
            .ident()
            .ok_or_else(|| self.expected("pseudo-class name"))?;

        let pseudo = match name {
            "not" => Pseudo::Not(self.parenthesized_list()?),
            "matches" | "is" => Pseudo::Matches(self.parenthesized_list()?),
            "has" => Pseudo::Has(self.parenthesized_list()?),
            "first-child" => Pseudo::FirstChild,
            "last-child" => Pseudo::LastChild,
            "nth-child" => Pseudo::NthChild(self.parenthesized_index()?),
            "nth-last-child" => Pseudo::NthLastChild(self.parenthesized_index()?),
            "statement" => Pseudo::Statement,
            "expression" => Pseudo::Expression,
            other => {
                return Err(SelectorSyntaxError::UnknownPseudo {
                    name: other.to_string(),
                })
            }
        };
        Ok(pseudo)
    }

    fn parenthesized_list(&mut self) -> Result<SelectorList> {
        if !self.eat('(') {
            return Err(self.expected("'('"));
        }
        let list = self.parse_list()?;
        self.skip_ws();
        if !self.eat(')') {
            return Err(self.expected("')'"));
        }
        Ok(list)
    }

    fn parenthesized_index(&mut self) -> Result<usize> {
        if !self.eat('(') {
            return Err(self.expected("'('"));
        }
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let index = self.text[start..self.pos]
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| SelectorSyntaxError::Expected {
                selector: self.text.to_string(),
                offset: start,
                expected: "positive index",
            })?;
        self.skip_ws();
        if !self.eat(')') {
            return Err(self.expected("')'"));
        }
        Ok(index)
    }

    fn regex_literal(&mut self) -> Result<(String, &'a str)> {
        let rest = &self.text[self.pos..];
        let (body, remainder) =
            split_regex_literal(rest).ok_or_else(|| self.expected("closing '/' of regex"))?;
        self.pos = self.text.len() - remainder.len();

        let flags_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        Ok((body, &self.text[flags_start..self.pos]))
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.expected("closing quote")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.expected("closing quote")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn bare_token(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != ']') {
            self.bump();
        }
        self.text[start..self.pos].trim_end()
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '$'))
        {
            self.bump();
        }
        (self.pos > start).then(|| &self.text[start..self.pos])
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.text[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn expected(&self, expected: &'static str) -> SelectorSyntaxError {
        SelectorSyntaxError::Expected {
            selector: self.text.to_string(),
            offset: self.pos,
            expected,
        }
    }

    fn unexpected(&self, found: char) -> SelectorSyntaxError {
        SelectorSyntaxError::Unexpected {
            selector: self.text.to_string(),
            offset: self.pos,
            found,
        }
    }
}
