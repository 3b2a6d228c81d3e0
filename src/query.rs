// src/query.rs
//! Local reading of the kcdb query language, used to hint at mistakes before
//! the backend rejects a query. The backend stays authoritative: queries are
//! always sent as typed.
//!
//! Grammar: space-separated tokens. `key=value` tokens are specifiers, every
//! other token is a keyword. At least one keyword is required.

use thiserror::Error;

const PIN_COUNT_KEYS: &[&str] = &["pin_count", "pc", "pinc", "pin_c", "p_count", "pin_cnt"];
const ATTR_KEYS: &[&str] = &["attr", "at", "attribute"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub keywords: Vec<String>,
    pub pin_count: Option<i64>,
    pub attr: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("could not understand specifier {0:?}")]
    UnknownSpecifier(String),
    #[error("pin count {0:?} is not a whole number")]
    BadPinCount(String),
    #[error("Keywords must be specified")]
    NoKeywords,
}

pub fn parse_query(q: &str) -> Result<ParsedQuery, QueryError> {
    let mut out = ParsedQuery::default();

    for token in q.split_whitespace() {
        if !token.contains('=') {
            out.keywords.push(token.to_string());
            continue;
        }
        let mut parts = token.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();

        if PIN_COUNT_KEYS.contains(&key) {
            let n = value
                .parse::<i64>()
                .map_err(|_| QueryError::BadPinCount(value.to_string()))?;
            out.pin_count = Some(n);
        } else if ATTR_KEYS.contains(&key) {
            out.attr = Some(value.to_string());
        } else {
            return Err(QueryError::UnknownSpecifier(key.to_string()));
        }
    }

    if out.keywords.is_empty() {
        return Err(QueryError::NoKeywords);
    }
    Ok(out)
}
