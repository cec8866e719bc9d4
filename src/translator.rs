//! Token substitution
//!
//! Rewrites Korean surface tokens into their Lua equivalents. Everything
//! that is not a whole-word vocabulary match (whitespace, comments, string
//! literals, other identifiers) passes through untouched; no Lua parsing
//! takes place.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

use crate::error::Result;
use crate::vocabulary::{TokenCategory, Vocabulary};

/// A vocabulary token found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    /// Byte range of the surface token in the source
    pub span: Range<usize>,
    pub surface: &'a str,
    pub canonical: &'a str,
    pub category: TokenCategory,
}

/// Compiled substitution engine for one vocabulary
///
/// The pattern is built once and reused for every call.
#[derive(Debug, Clone)]
pub struct Translator {
    vocabulary: Vocabulary,
    /// `None` for an empty vocabulary
    pattern: Option<Regex>,
}

impl Translator {
    /// Compile a translator for the given vocabulary
    pub fn new(vocabulary: Vocabulary) -> Result<Self> {
        let pattern = build_pattern(&vocabulary)?;
        debug!(
            "Compiled translator for {} vocabulary entries",
            vocabulary.len()
        );
        Ok(Self {
            vocabulary,
            pattern,
        })
    }

    /// Shared translator for the built-in Korean → Lua table
    pub fn korean_lua() -> &'static Translator {
        &KOREAN_LUA
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Replace every whole-word surface token with its canonical token
    pub fn translate(&self, source: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return source.to_string();
        };

        pattern
            .replace_all(source, |caps: &Captures| {
                let surface = &caps[1];
                // Every alternative comes from the table, so lookup can't miss.
                self.vocabulary.lookup(surface).unwrap_or(surface).to_string()
            })
            .into_owned()
    }

    /// Vocabulary tokens in `source`, left to right, non-overlapping
    pub fn matches<'s>(&'s self, source: &'s str) -> Vec<TokenMatch<'s>> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(source)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let entry = self.vocabulary.entry(m.as_str())?;
                Some(TokenMatch {
                    span: m.range(),
                    surface: m.as_str(),
                    canonical: &entry.canonical,
                    category: entry.category,
                })
            })
            .collect()
    }
}

/// One alternation, each alternative fenced by word boundaries on both
/// sides. Order follows the table, so the first listed alternative wins.
fn build_pattern(vocabulary: &Vocabulary) -> Result<Option<Regex>> {
    if vocabulary.is_empty() {
        return Ok(None);
    }

    let alternatives: Vec<String> = vocabulary
        .entries()
        .iter()
        .map(|e| format!(r"\b{}\b", regex::escape(&e.surface)))
        .collect();
    let pattern = format!("({})", alternatives.join("|"));

    Ok(Some(Regex::new(&pattern)?))
}

static KOREAN_LUA: Lazy<Translator> = Lazy::new(|| {
    let vocabulary = Vocabulary::korean_lua().clone();
    let pattern = match build_pattern(&vocabulary) {
        Ok(pattern) => pattern,
        Err(e) => {
            // Escaped literals always compile; keep running as identity.
            error!("Built-in vocabulary pattern failed to compile: {}", e);
            None
        }
    };
    Translator {
        vocabulary,
        pattern,
    }
});
