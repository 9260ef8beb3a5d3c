use {
    chrono::{Duration, NaiveDateTime},
    serde::{Deserialize, Serialize},
    std::fmt,
    thiserror::Error,
};

pub const CURSOR_FORMAT: &str = "%Y%m%d%H%M%S";
const CURSOR_LEN: usize = 14;
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
const UTC8_OFFSET_HOURS: i64 = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("cursor must be 14 digits, got {0:?}")]
    Malformed(String),
    #[error("cursor {0:?} is not a valid calendar time")]
    InvalidTime(String),
}

/// Position token in `YYYYMMDDHHmmss` form (UTC).
///
/// The fixed width makes string order equal to chronological order, so the
/// derived `Ord` compares positions correctly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cursor(String);

impl Cursor {
    pub fn parse(text: &str) -> Result<Self, CursorError> {
        if text.len() != CURSOR_LEN || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CursorError::Malformed(text.to_string()));
        }
        NaiveDateTime::parse_from_str(text, CURSOR_FORMAT)
            .map_err(|_| CursorError::InvalidTime(text.to_string()))?;
        Ok(Self(text.to_string()))
    }

    pub fn from_naive(time: NaiveDateTime) -> Self {
        Self(time.format(CURSOR_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, CURSOR_FORMAT).ok()
    }

    /// Axis label text: `YYYY-MM-DD HH:mm` in UTC+8.
    pub fn to_display_utc8(&self) -> String {
        self.to_naive()
            .and_then(|t| t.checked_add_signed(Duration::hours(UTC8_OFFSET_HOURS)))
            .map(|t| t.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| self.0.clone())
    }
}

impl TryFrom<String> for Cursor {
    type Error = CursorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cursor> for String {
    fn from(cursor: Cursor) -> Self {
        cursor.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
