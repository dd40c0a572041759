//! Ordered line classification.
//!
//! Each non-blank line is tested against a fixed list of rules, top to
//! bottom. The first rule that matches produces the [`Block`]; a line that
//! matches nothing becomes a [`Block::Paragraph`].
//!
//! The rule order is:
//!
//! 1. **Item**: `<number>. <text> [URL:<url>]`, optionally followed by one
//!    bracketed annotation which is ignored.
//! 2. **Title**: either a literal separator (default `" | "`) or a
//!    two-group pattern matched against the whole line. Only one title
//!    grammar is active at a time.

use std::sync::LazyLock;

use regex::Regex;

use super::Block;

/// The separator used by the default title grammar.
pub const DEFAULT_SEPARATOR: &str = " | ";

static ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s+(.*)\s+\[URL:(.*?)\]\s*(?:\[[^\]]*\])?\s*$")
        .expect("item pattern must compile")
});

/// How title lines are recognised.
#[derive(Debug, Clone)]
pub enum TitleGrammar {
    /// The line contains a literal separator; it is split at the first
    /// occurrence.
    Separator(String),

    /// The whole line matches a pattern with exactly two capture groups.
    Pattern(Regex),
}

impl TitleGrammar {
    /// Creates a separator-based title grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the separator is empty, since an empty separator
    /// would classify every line as a title.
    pub fn separator(separator: impl Into<String>) -> Result<Self, Error> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(Error::EmptySeparator);
        }
        Ok(Self::Separator(separator))
    }

    /// Creates a pattern-based title grammar.
    ///
    /// The pattern is anchored to the whole line.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile or does not have
    /// exactly two capture groups.
    pub fn pattern(pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;

        // `captures_len` counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 2 {
            return Err(Error::GroupCount(groups));
        }

        Ok(Self::Pattern(regex))
    }

    fn extract(&self, line: &str) -> Option<Block> {
        let (primary, secondary) = match self {
            Self::Separator(separator) => line.split_once(separator.as_str())?,
            Self::Pattern(regex) => {
                let captures = regex.captures(line)?;
                (captures.get(1)?.as_str(), captures.get(2)?.as_str())
            }
        };

        Some(Block::Title {
            primary: primary.trim().to_string(),
            secondary: secondary.trim().to_string(),
        })
    }
}

impl Default for TitleGrammar {
    fn default() -> Self {
        Self::Separator(DEFAULT_SEPARATOR.to_string())
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Item,
    Title(TitleGrammar),
}

impl Rule {
    fn extract(&self, line: &str) -> Option<Block> {
        match self {
            Self::Item => {
                let captures = ITEM_PATTERN.captures(line)?;
                Some(Block::Item {
                    text: captures[1].trim().to_string(),
                    url: captures[2].trim().to_string(),
                })
            }
            Self::Title(grammar) => grammar.extract(line),
        }
    }
}

/// The ordered set of classification rules.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    /// Creates a grammar using the given title rule.
    #[must_use]
    pub fn new(title: TitleGrammar) -> Self {
        Self {
            rules: vec![Rule::Item, Rule::Title(title)],
        }
    }

    /// Classifies a single trimmed, non-blank line.
    #[must_use]
    pub fn classify(&self, line: &str) -> Block {
        self.rules
            .iter()
            .find_map(|rule| rule.extract(line))
            .unwrap_or_else(|| Block::Paragraph(line.to_string()))
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new(TitleGrammar::default())
    }
}

/// Errors that can occur while building a title grammar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The title separator was empty.
    #[error("title separator must not be empty")]
    EmptySeparator,

    /// The title pattern failed to compile.
    #[error("invalid title pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The title pattern did not have exactly two capture groups.
    #[error("title pattern must have exactly 2 capture groups, found {0}")]
    GroupCount(usize),
}
