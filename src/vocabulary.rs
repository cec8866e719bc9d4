//! Korean keyword vocabulary
//!
//! Maps surface tokens (the Korean words a user writes) to the Lua
//! keywords and library functions they stand for. The built-in table is
//! created once per process and never mutated.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Keyword group a vocabulary entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Conditional,
    Loop,
    Function,
    StandardFunction,
    Table,
    String,
    Math,
    Coroutine,
    Metatable,
    Boolean,
    Misc,
    Logic,
}

impl TokenCategory {
    /// All categories in listing order
    pub const ALL: [TokenCategory; 12] = [
        TokenCategory::Conditional,
        TokenCategory::Loop,
        TokenCategory::Function,
        TokenCategory::StandardFunction,
        TokenCategory::Table,
        TokenCategory::String,
        TokenCategory::Math,
        TokenCategory::Coroutine,
        TokenCategory::Metatable,
        TokenCategory::Boolean,
        TokenCategory::Misc,
        TokenCategory::Logic,
    ];

    /// Stable lowercase name, as used on the command line
    pub fn name(self) -> &'static str {
        match self {
            TokenCategory::Conditional => "conditional",
            TokenCategory::Loop => "loop",
            TokenCategory::Function => "function",
            TokenCategory::StandardFunction => "standard_function",
            TokenCategory::Table => "table",
            TokenCategory::String => "string",
            TokenCategory::Math => "math",
            TokenCategory::Coroutine => "coroutine",
            TokenCategory::Metatable => "metatable",
            TokenCategory::Boolean => "boolean",
            TokenCategory::Misc => "misc",
            TokenCategory::Logic => "logic",
        }
    }

    /// Parse a category from its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One surface token and the canonical Lua token it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    pub surface: String,
    pub canonical: String,
    pub category: TokenCategory,
}

impl VocabularyEntry {
    pub fn new(surface: &str, canonical: &str, category: TokenCategory) -> Self {
        Self {
            surface: surface.to_string(),
            canonical: canonical.to_string(),
            category,
        }
    }
}

/// Immutable surface → canonical lookup table
///
/// Entry order matters: the translator tries alternatives in this order,
/// so an earlier entry wins when two could match at the same position.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a table from entries, rejecting duplicated surface tokens
    pub fn from_entries(entries: Vec<VocabularyEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.surface.clone(), i).is_some() {
                return Err(Error::DuplicateSurfaceToken {
                    surface: entry.surface.clone(),
                });
            }
        }
        Ok(Self { entries, index })
    }

    /// The built-in Korean → Lua table
    pub fn korean_lua() -> &'static Vocabulary {
        &KOREAN_LUA
    }

    /// Canonical token for a surface token, if it is in the table
    pub fn lookup(&self, surface: &str) -> Option<&str> {
        self.index
            .get(surface)
            .map(|&i| self.entries[i].canonical.as_str())
    }

    /// Full entry for a surface token
    pub fn entry(&self, surface: &str) -> Option<&VocabularyEntry> {
        self.index.get(surface).map(|&i| &self.entries[i])
    }

    /// Entries in table order
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Entries of one category, in table order
    pub fn by_category(&self, category: TokenCategory) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static KOREAN_LUA: Lazy<Vocabulary> = Lazy::new(|| {
    use TokenCategory::*;

    let table: &[(&str, &str, TokenCategory)] = &[
        ("만일", "if", Conditional),
        ("이라면", "then", Conditional),
        ("아니면", "else", Conditional),
        ("그렇지않으면", "elseif", Conditional),
        ("끝", "end", Conditional),
        ("반복", "for", Loop),
        ("동안", "while", Loop),
        ("반복하기", "repeat", Loop),
        ("까지", "until", Loop),
        ("반복멈추기", "break", Misc),
        ("돌려주기", "return", Function),
        ("하기", "do", Misc),
        ("함수", "function", Function),
        ("지역", "local", Function),
        ("출력", "print", StandardFunction),
        ("숫자로", "tonumber", StandardFunction),
        ("문자열로", "tostring", StandardFunction),
        ("자료형", "type", StandardFunction),
        ("요구", "require", StandardFunction),
        ("오류", "error", StandardFunction),
        ("확인", "assert", StandardFunction),
        ("추가", "table.insert", Table),
        ("제거", "table.remove", Table),
        ("정렬", "table.sort", Table),
        ("다음", "next", Table),
        ("길이", "string.len", String),
        ("부분문자열", "string.sub", String),
        ("찾기", "string.find", String),
        ("대체", "string.gsub", String),
        ("형식", "string.format", String),
        ("절댓값", "math.abs", Math),
        ("올림", "math.ceil", Math),
        ("버림", "math.floor", Math),
        ("최댓값", "math.max", Math),
        ("최솟값", "math.min", Math),
        ("거듭제곱", "math.pow", Math),
        ("무작위", "math.random", Math),
        ("제곱근", "math.sqrt", Math),
        ("코루틴_만들기", "coroutine.create", Coroutine),
        ("코루틴_시작", "coroutine.resume", Coroutine),
        ("코루틴_일시중지", "coroutine.yield", Coroutine),
        ("코루틴_상태", "coroutine.status", Coroutine),
        ("메타설정", "setmetatable", Metatable),
        ("메타가져오기", "getmetatable", Metatable),
        ("파일실행", "dofile", Misc),
        ("파일읽기", "loadfile", Misc),
        ("반복자_인덱스", "ipairs", Misc),
        ("반복자_모두", "pairs", Misc),
        ("참", "true", Boolean),
        ("거짓", "false", Boolean),
        ("또는", "or", Logic),
        ("그리고", "and", Logic),
        ("아니다", "not", Logic),
    ];

    let entries: Vec<VocabularyEntry> = table
        .iter()
        .map(|&(surface, canonical, category)| VocabularyEntry::new(surface, canonical, category))
        .collect();
    let index = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.surface.clone(), i))
        .collect();

    Vocabulary { entries, index }
});
