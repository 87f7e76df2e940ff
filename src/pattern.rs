use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const PATTERN_LEN: usize = 16;

/// Prefix of the fixture's hex line.
pub const TARGET_HEX_PREFIX: &str = "Target 16 bytes (hex):";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("expected 16 bytes, got {0}")]
    Length(usize),
    #[error("'{0}' is not a hex byte")]
    Byte(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern([u8; PATTERN_LEN]);

impl Pattern {
    /// `A`..`P`, used when nobody supplies the bytes.
    pub fn auto() -> Self {
        let mut bytes = [0u8; PATTERN_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = 0x41 + (i % 26) as u8;
        }
        Self(bytes)
    }

    /// Picks the pattern out of a line printed by `target_program`.
    pub fn from_target_line(line: &str) -> Option<Self> {
        line.trim().strip_prefix(TARGET_HEX_PREFIX)?.parse().ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != PATTERN_LEN {
            return Err(PatternError::Length(tokens.len()));
        }
        let mut bytes = [0u8; PATTERN_LEN];
        for (b, tok) in bytes.iter_mut().zip(&tokens) {
            let digits = tok.trim_start_matches("0x");
            if digits.is_empty() || digits.len() > 2 {
                return Err(PatternError::Byte(tok.to_string()));
            }
            *b = u8::from_str_radix(digits, 16).map_err(|_| PatternError::Byte(tok.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
