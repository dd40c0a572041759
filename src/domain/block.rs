use std::fmt;

/// A single classified line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A heading made of two labels, rendered as `primary - secondary`.
    Title {
        /// The label before the separator.
        primary: String,
        /// The label after the separator.
        secondary: String,
    },

    /// A numbered link entry.
    Item {
        /// The anchor text.
        text: String,
        /// The link target.
        url: String,
    },

    /// Any other non-blank line, carried through verbatim.
    Paragraph(String),
}

impl Block {
    /// Returns `true` if this block belongs inside a list grouping.
    #[must_use]
    pub const fn is_item(&self) -> bool {
        matches!(self, Self::Item { .. })
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title { primary, secondary } => write!(f, "<h2>{primary} - {secondary}</h2>"),
            Self::Item { text, url } => write!(
                f,
                r#"<li><a href="{url}" target="_blank" rel="noopener noreferrer">{text}</a></li>"#
            ),
            Self::Paragraph(line) => write!(f, "<p>{line}</p>"),
        }
    }
}

/// One element of the rendered body, in output order.
///
/// List groupings are explicit so that the body is a flat sequence of
/// markup fragments joined by newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Opens an ordered list.
    ListOpen,
    /// Closes the currently open ordered list.
    ListClose,
    /// A classified block.
    Block(Block),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListOpen => f.write_str("<ol>"),
            Self::ListClose => f.write_str("</ol>"),
            Self::Block(block) => block.fmt(f),
        }
    }
}
