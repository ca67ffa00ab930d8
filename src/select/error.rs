use thiserror::Error;

/// Errors raised while parsing a selection expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The expression contained no tokens.
    #[error("selection expression is empty")]
    Empty,

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected '{token}' at token {position}")]
    UnexpectedToken { token: String, position: usize },

    /// The expression ended while the parser still expected input.
    #[error("selection ended early: expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// A bare word that is neither a keyword nor an argument.
    #[error("unknown selection keyword '{word}'")]
    UnknownKeyword { word: String },

    /// A numeric argument could not be parsed.
    #[error("invalid {what} '{text}'")]
    InvalidNumber { what: &'static str, text: String },

    /// An element symbol not known to the toolkit.
    #[error("unknown element symbol '{symbol}'")]
    InvalidElement { symbol: String },

    /// A quoted string was never closed.
    #[error("unterminated quote starting at character {offset}")]
    UnterminatedQuote { offset: usize },
}

impl SelectionError {
    pub fn unexpected(token: impl Into<String>, position: usize) -> Self {
        Self::UnexpectedToken {
            token: token.into(),
            position,
        }
    }

    pub fn invalid_number(what: &'static str, text: impl Into<String>) -> Self {
        Self::InvalidNumber {
            what,
            text: text.into(),
        }
    }
}
