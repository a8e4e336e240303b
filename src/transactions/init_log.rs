//! Pool-initialisation parameters from AMM v4 program logs.
//!
//! The program prints its `InitializeInstruction2` with Rust's `Debug`
//! formatting, e.g.
//!
//! ```text
//! Program log: initialize2: InitializeInstruction2 { nonce: 254, open_time: 1700000000, init_pc_amount: 100000000, init_coin_amount: 300 }
//! ```
//!
//! The payload is tokenised on `{ } : ,` and whitespace and read as a flat
//! list of `key: value` pairs. Anything outside that shape is reported as
//! malformed rather than guessed at.

use std::collections::HashMap;

use crate::error::LogParseError;

pub const INIT_LOG_MARKER: &str = "Program log: initialize2: InitializeInstruction2 ";

/// `pc` is the quote side, `coin` the base side, in on-chain order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitParams {
    pub init_quote_amount: u64,
    pub init_base_amount: u64,
    pub open_time: u64,
    pub nonce: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Colon,
    Comma,
    Word(&'a str),
}

fn tokenize(payload: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start = None;

    for (i, c) in payload.char_indices() {
        let delimiter = match c {
            '{' => Some(Token::Open),
            '}' => Some(Token::Close),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            c if c.is_whitespace() => None,
            _ => {
                word_start.get_or_insert(i);
                continue;
            }
        };
        if let Some(start) = word_start.take() {
            tokens.push(Token::Word(&payload[start..i]));
        }
        tokens.extend(delimiter);
    }
    if let Some(start) = word_start {
        tokens.push(Token::Word(&payload[start..]));
    }
    tokens
}

/// Find the first init log line and read its parameters.
///
/// `Ok(None)` when no line carries the marker; `Err` when one does but its
/// payload cannot be read.
pub fn parse_pool_init<S: AsRef<str>>(logs: &[S]) -> Result<Option<InitParams>, LogParseError> {
    let Some(line) = logs.iter().map(AsRef::as_ref).find(|l| l.contains(INIT_LOG_MARKER)) else {
        return Ok(None);
    };

    let malformed = |reason: String| LogParseError::Malformed {
        line: line.to_string(),
        reason,
    };

    let payload = line
        .split_once(INIT_LOG_MARKER)
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    let fields = read_pairs(&tokenize(payload)).map_err(malformed)?;

    let field = |name: &str| -> Result<u64, LogParseError> {
        let raw = fields
            .get(name)
            .ok_or_else(|| malformed(format!("missing field `{name}`")))?;
        raw.parse::<u64>()
            .map_err(|_| malformed(format!("field `{name}` is not an unsigned integer: `{raw}`")))
    };

    Ok(Some(InitParams {
        init_quote_amount: field("init_pc_amount")?,
        init_base_amount: field("init_coin_amount")?,
        open_time: field("open_time")?,
        nonce: field("nonce")?,
    }))
}

/// `{ key: value (, key: value)* [,] }` with nothing after the closing brace.
fn read_pairs<'a>(tokens: &[Token<'a>]) -> Result<HashMap<&'a str, &'a str>, String> {
    let mut iter = tokens.iter().copied();
    if iter.next() != Some(Token::Open) {
        return Err("payload does not start with `{`".into());
    }

    let mut fields = HashMap::new();
    loop {
        let key = match iter.next() {
            Some(Token::Close) => break,
            Some(Token::Word(key)) => key,
            Some(other) => return Err(format!("expected a field name, found {other:?}")),
            None => return Err("unterminated payload".into()),
        };
        if iter.next() != Some(Token::Colon) {
            return Err(format!("expected `:` after `{key}`"));
        }
        let value = match iter.next() {
            Some(Token::Word(value)) => value,
            other => return Err(format!("expected a value for `{key}`, found {other:?}")),
        };
        if fields.insert(key, value).is_some() {
            return Err(format!("duplicate field `{key}`"));
        }
        match iter.next() {
            Some(Token::Comma) => {}
            Some(Token::Close) => break,
            Some(other) => return Err(format!("unexpected {other:?} after `{key}`")),
            None => return Err("unterminated payload".into()),
        }
    }

    if let Some(extra) = iter.next() {
        return Err(format!("trailing {extra:?} after `}}`"));
    }
    Ok(fields)
}
