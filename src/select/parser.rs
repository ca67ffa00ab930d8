//! Recursive-descent parser for the PyMOL-style selection language.
//!
//! Precedence from loosest to tightest: `or`, `and` (explicit or implied by juxtaposition),
//! `not`, then atomic terms. `within D of X` is an atomic term whose target binds like a `not`
//! operand, so `resn HOH within 3.5 of chain A` reads as `resn HOH and (within 3.5 of chain A)`.

use super::{NamePattern, Query, SelectionError};
use crate::model::types::Element;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write!(f, "{word}"),
            Token::Quoted(text) => write!(f, "\"{text}\""),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    All,
    None,
    Chain,
    ResidueName,
    ResidueNumber,
    AtomName,
    Element,
    AltLoc,
    Solvent,
    Polymer,
    Hetero,
    Backbone,
    Within,
    Of,
    And,
    Or,
    Not,
}

impl Keyword {
    fn lookup(word: &str) -> Option<Self> {
        let keyword = match word.to_ascii_lowercase().as_str() {
            "all" => Keyword::All,
            "none" => Keyword::None,
            "chain" | "c." => Keyword::Chain,
            "resn" | "r." => Keyword::ResidueName,
            "resi" | "i." => Keyword::ResidueNumber,
            "name" | "n." => Keyword::AtomName,
            "elem" | "e." => Keyword::Element,
            "alt" => Keyword::AltLoc,
            "solvent" | "sol." => Keyword::Solvent,
            "polymer" | "pol." => Keyword::Polymer,
            "hetatm" | "het" => Keyword::Hetero,
            "backbone" | "bb." => Keyword::Backbone,
            "within" | "w." => Keyword::Within,
            "of" => Keyword::Of,
            "and" | "&" => Keyword::And,
            "or" | "|" => Keyword::Or,
            "not" | "!" => Keyword::Not,
            _ => return None,
        };
        Some(keyword)
    }
}

/// Parses a selection expression into a [`Query`].
///
/// # Errors
///
/// Returns [`SelectionError`] for empty input, unknown keywords, malformed arguments, or
/// unbalanced parentheses and quotes.
///
/// # Examples
///
/// ```
/// use water_bridge::select::{parse, Query};
///
/// let query = parse("chain A and not solvent").unwrap();
/// assert_eq!(query, Query::chain("A").and(Query::Solvent.negate()));
/// ```
pub fn parse(input: &str) -> Result<Query, SelectionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut parser = Parser { tokens, position: 0 };
    let query = parser.parse_or()?;

    match parser.peek() {
        Some(token) => Err(SelectionError::unexpected(token.to_string(), parser.position)),
        None => Ok(query),
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        match self.peek() {
            Some(Token::Word(word)) => Keyword::lookup(word),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<Query, SelectionError> {
        let mut left = self.parse_and()?;
        while self.peek_keyword() == Some(Keyword::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Query, SelectionError> {
        let mut left = self.parse_not()?;
        loop {
            match (self.peek(), self.peek_keyword()) {
                (None, _) | (Some(Token::RightParen), _) => break,
                (_, Some(Keyword::Or | Keyword::Of)) => break,
                (_, Some(Keyword::And)) => {
                    self.advance();
                }
                _ => {}
            }
            let right = self.parse_not()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Query, SelectionError> {
        if self.peek_keyword() == Some(Keyword::Not) {
            self.advance();
            return Ok(self.parse_not()?.negate());
        }
        self.parse_atomic()
    }

    fn parse_atomic(&mut self) -> Result<Query, SelectionError> {
        let position = self.position;
        let token = self.advance().ok_or(SelectionError::UnexpectedEnd {
            expected: "a selection term",
        })?;

        let word = match token {
            Token::LeftParen => {
                let inner = self.parse_or()?;
                return match self.advance() {
                    Some(Token::RightParen) => Ok(inner),
                    Some(other) => Err(SelectionError::unexpected(
                        other.to_string(),
                        self.position - 1,
                    )),
                    None => Err(SelectionError::UnexpectedEnd { expected: "')'" }),
                };
            }
            Token::Word(word) => word,
            other => return Err(SelectionError::unexpected(other.to_string(), position)),
        };

        let keyword =
            Keyword::lookup(&word).ok_or_else(|| SelectionError::UnknownKeyword { word: word.clone() })?;

        match keyword {
            Keyword::All => Ok(Query::All),
            Keyword::None => Ok(Query::None),
            Keyword::Solvent => Ok(Query::Solvent),
            Keyword::Polymer => Ok(Query::Polymer),
            Keyword::Hetero => Ok(Query::Hetero),
            Keyword::Backbone => Ok(Query::Backbone),
            Keyword::Chain => {
                let values = self.expect_values("chain identifier")?;
                Ok(Query::Chain(values))
            }
            Keyword::ResidueName => {
                let values = self.expect_values("residue name")?;
                Ok(Query::ResidueName(values))
            }
            Keyword::AtomName => {
                let values = self.expect_values("atom name")?;
                Ok(Query::AtomName(
                    values.iter().map(|v| NamePattern::from(v.as_str())).collect(),
                ))
            }
            Keyword::Element => {
                let values = self.expect_values("element symbol")?;
                let elements = values
                    .into_iter()
                    .map(|symbol| {
                        Element::from_str(&symbol)
                            .map_err(|_| SelectionError::InvalidElement { symbol })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Query::Element(elements))
            }
            Keyword::ResidueNumber => {
                let values = self.expect_values("residue number")?;
                let ranges = values
                    .iter()
                    .map(|v| parse_residue_range(v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Query::ResidueNumber(ranges))
            }
            Keyword::AltLoc => self.parse_alt_loc(),
            Keyword::Within => self.parse_within(),
            Keyword::Of | Keyword::And | Keyword::Or | Keyword::Not => {
                Err(SelectionError::unexpected(word, position))
            }
        }
    }

    /// Reads one argument token and splits it on `+` and `,`.
    fn expect_values(&mut self, expected: &'static str) -> Result<Vec<String>, SelectionError> {
        let position = self.position;
        match self.advance() {
            Some(Token::Quoted(text)) => Ok(vec![text]),
            Some(Token::Word(word)) if Keyword::lookup(&word).is_none() => Ok(word
                .split(['+', ','])
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()),
            Some(other) => Err(SelectionError::unexpected(other.to_string(), position)),
            None => Err(SelectionError::UnexpectedEnd { expected }),
        }
    }

    fn parse_alt_loc(&mut self) -> Result<Query, SelectionError> {
        let position = self.position;
        match self.advance() {
            Some(Token::Quoted(text)) if text.trim().is_empty() => Ok(Query::AltLoc(None)),
            Some(Token::Quoted(text)) | Some(Token::Word(text)) if text.chars().count() == 1 => {
                Ok(Query::AltLoc(text.chars().next()))
            }
            Some(other) => Err(SelectionError::unexpected(other.to_string(), position)),
            None => Err(SelectionError::UnexpectedEnd {
                expected: "alternate location",
            }),
        }
    }

    fn parse_within(&mut self) -> Result<Query, SelectionError> {
        let distance = match self.advance() {
            Some(Token::Word(text)) => text
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or_else(|| SelectionError::invalid_number("distance", text))?,
            Some(other) => return Err(SelectionError::invalid_number("distance", other.to_string())),
            None => return Err(SelectionError::UnexpectedEnd { expected: "distance" }),
        };

        if self.peek_keyword() != Some(Keyword::Of) {
            return match self.peek() {
                Some(token) => Err(SelectionError::unexpected(token.to_string(), self.position)),
                None => Err(SelectionError::UnexpectedEnd { expected: "'of'" }),
            };
        }
        self.advance();

        let target = self.parse_not()?;
        Ok(Query::within(distance, target))
    }
}

fn parse_residue_range(text: &str) -> Result<(i32, i32), SelectionError> {
    let invalid = || SelectionError::invalid_number("residue number", text);
    let number = |s: &str| s.parse::<i32>().map_err(|_| invalid());

    // A leading '-' belongs to the first number.
    let split = text
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i);

    match split {
        Some(i) => {
            let (start, end) = (number(&text[..i])?, number(&text[i + 1..])?);
            if start > end {
                return Err(invalid());
            }
            Ok((start, end))
        }
        None => {
            let n = number(text)?;
            Ok((n, n))
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, SelectionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '"' | '\'' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == c {
                        closed = true;
                        break;
                    }
                    text.push(inner);
                }
                if !closed {
                    return Err(SelectionError::UnterminatedQuote { offset });
                }
                tokens.push(Token::Quoted(text));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '(' | ')' | '"' | '\'') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}
