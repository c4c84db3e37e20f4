//! Map file references as token lists.
//!
//! A map file reference such as `/srv/maps/prec_wms_2023_10.map` is parsed
//! into text runs and the three token kinds the range pickers rewrite:
//! `wms_<year>`, an ISO-shaped date (`YYYY-MM-DD`) and a bare number that
//! may be a period code. Rewrites operate on tokens and the string is
//! re-emitted afterwards, so one rewrite never sees the output of another.

use std::fmt;

use geoclima_model::{DateFormat, PeriodKey};

const WMS_PREFIX: &[u8] = b"wms_";
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapFileToken {
    Text(String),
    /// `wms_` followed by exactly four digits.
    WmsYear(i32),
    /// Digits in `DDDD-DD-DD` shape, not adjacent to other digits.
    Date(String),
    /// A digit run delimited by `_`, `.`, `-` or `/`.
    Number(String),
}

impl fmt::Display for MapFileToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Date(text) | Self::Number(text) => f.write_str(text),
            Self::WmsYear(year) => write!(f, "wms_{year:04}"),
        }
    }
}

/// A parsed map file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFileName {
    tokens: Vec<MapFileToken>,
}

impl MapFileName {
    pub fn parse(input: &str) -> Self {
        let bytes = input.as_bytes();
        let mut tokens = Vec::new();
        let mut text_start = 0;
        let mut index = 0;
        while index < bytes.len() {
            // Tokens start on ASCII bytes, so `index` is a char boundary here.
            match token_at(bytes, index) {
                Some((token, len)) => {
                    if text_start < index {
                        tokens.push(MapFileToken::Text(input[text_start..index].to_string()));
                    }
                    tokens.push(token);
                    index += len;
                    text_start = index;
                }
                None => index += 1,
            }
        }
        if text_start < bytes.len() {
            tokens.push(MapFileToken::Text(input[text_start..].to_string()));
        }
        Self { tokens }
    }

    pub fn tokens(&self) -> &[MapFileToken] {
        &self.tokens
    }

    /// Replace the period code in the file-name part (after the last `/`).
    ///
    /// The last number token equal to one of `known` is replaced by `code`.
    /// Returns `None` when the file name carries no recognised code.
    pub fn with_period_code(&self, code: &PeriodKey, known: &[PeriodKey]) -> Option<Self> {
        let file_start = self
            .tokens
            .iter()
            .rposition(|token| matches!(token, MapFileToken::Text(text) if text.contains('/')))
            .map_or(0, |position| position + 1);
        let target = self.tokens[file_start..]
            .iter()
            .rposition(|token| match token {
                MapFileToken::Number(value) => known.iter().any(|key| key.as_str() == value),
                _ => false,
            })?
            + file_start;
        let mut tokens = self.tokens.clone();
        tokens[target] = MapFileToken::Number(code.as_str().to_string());
        Some(Self { tokens })
    }

    /// Replace every `wms_<year>` token.
    #[must_use]
    pub fn with_year(&self, year: i32) -> Self {
        self.map_tokens(|token| match token {
            MapFileToken::WmsYear(_) => MapFileToken::WmsYear(year),
            other => other.clone(),
        })
    }

    /// Replace every date token with `stamp`.
    #[must_use]
    pub fn with_date(&self, stamp: &str) -> Self {
        self.map_tokens(|token| match token {
            MapFileToken::Date(_) => MapFileToken::Date(stamp.to_string()),
            other => other.clone(),
        })
    }

    pub fn has_date(&self) -> bool {
        self.tokens.iter().any(|token| matches!(token, MapFileToken::Date(_)))
    }

    fn map_tokens(&self, f: impl Fn(&MapFileToken) -> MapFileToken) -> Self {
        Self {
            tokens: self.tokens.iter().map(f).collect(),
        }
    }
}

impl fmt::Display for MapFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

fn token_at(bytes: &[u8], index: usize) -> Option<(MapFileToken, usize)> {
    let previous = index.checked_sub(1).map(|at| bytes[at]);
    if let Some(len) = date_len_at(bytes, index, previous) {
        let text = String::from_utf8_lossy(&bytes[index..index + len]).into_owned();
        return Some((MapFileToken::Date(text), len));
    }
    if let Some(year) = wms_year_at(bytes, index) {
        return Some((MapFileToken::WmsYear(year), WMS_PREFIX.len() + 4));
    }
    number_at(bytes, index, previous)
}

fn date_len_at(bytes: &[u8], index: usize, previous: Option<u8>) -> Option<usize> {
    if previous.is_some_and(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let candidate = bytes.get(index..index + DATE_LEN)?;
    let shaped = candidate.iter().enumerate().all(|(at, byte)| match at {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    });
    let next_is_digit = bytes
        .get(index + DATE_LEN)
        .is_some_and(|byte| byte.is_ascii_digit());
    (shaped && !next_is_digit).then_some(DATE_LEN)
}

fn wms_year_at(bytes: &[u8], index: usize) -> Option<i32> {
    let rest = bytes.get(index..)?;
    let digits = rest.strip_prefix(WMS_PREFIX)?.get(..4)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if rest
        .get(WMS_PREFIX.len() + 4)
        .is_some_and(|byte| byte.is_ascii_digit())
    {
        return None;
    }
    Some(digits.iter().fold(0, |acc, digit| acc * 10 + i32::from(digit - b'0')))
}

fn number_at(bytes: &[u8], index: usize, previous: Option<u8>) -> Option<(MapFileToken, usize)> {
    if !bytes[index].is_ascii_digit() {
        return None;
    }
    if previous.is_some_and(|byte| !matches!(byte, b'_' | b'.' | b'/' | b'-')) {
        return None;
    }
    let len = bytes[index..]
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    let next = bytes.get(index + len);
    if next.is_some_and(|byte| !matches!(byte, b'_' | b'.' | b'-')) {
        return None;
    }
    let text = String::from_utf8_lossy(&bytes[index..index + len]).into_owned();
    Some((MapFileToken::Number(text), len))
}

/// Layer name carrying `stamp` as its trailing date.
///
/// A trailing `_<date>` already present (ISO-shaped or in `format`) is
/// replaced rather than stacked.
pub fn rename_with_date(name: &str, stamp: &str, format: &DateFormat) -> String {
    let base = match name.rsplit_once('_') {
        Some((base, tail)) if is_date_text(tail, format) => base,
        _ => name,
    };
    format!("{base}_{stamp}")
}

/// Layer title in the `<label> – <date>` shape.
pub fn retitle_with_date(title: &str, stamp: &str) -> String {
    let label = title.split('–').next().unwrap_or_default().trim();
    format!("{label} – {stamp}")
}

fn is_date_text(text: &str, format: &DateFormat) -> bool {
    matches!(MapFileName::parse(text).tokens(), [MapFileToken::Date(_)]) || format.parse(text).is_ok()
}
