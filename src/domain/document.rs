use super::{Block, Grammar, Node};

/// Embedded stylesheet for rendered documents.
const STYLESHEET: &str = "        body {
            max-width: 46em;
            margin: 2em auto;
            padding: 0 1em;
            background: #C7EDCC;
            color: #3C3C3C;
            font-family: -apple-system, \"Segoe UI\", \"Noto Sans\", \"PingFang SC\", \"Microsoft YaHei\", sans-serif;
            line-height: 1.6;
        }
        h2 { margin-top: 1.6em; border-bottom: 1px solid #9DBFA2; }
        ol { padding-left: 2em; }
        li { margin-bottom: 0.4em; }
        a { text-decoration: none; color: #3C3C3C; }
        a:hover { text-decoration: underline; }
";

/// Whether a list grouping is currently open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ListState {
    #[default]
    Closed,
    Open,
}

/// Accumulates output nodes while tracking the list grouping.
#[derive(Debug, Default)]
struct Builder {
    state: ListState,
    nodes: Vec<Node>,
}

impl Builder {
    fn push(&mut self, block: Block) {
        match (block.is_item(), self.state) {
            (true, ListState::Closed) => {
                self.nodes.push(Node::ListOpen);
                self.state = ListState::Open;
            }
            (false, ListState::Open) => self.close(),
            _ => {}
        }
        self.nodes.push(Node::Block(block));
    }

    fn close(&mut self) {
        if self.state == ListState::Open {
            self.nodes.push(Node::ListClose);
            self.state = ListState::Closed;
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.close();
        self.nodes
    }
}

/// A parsed text document, ready to be rendered as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    nodes: Vec<Node>,
}

impl Document {
    /// Parses a sequence of lines into a document.
    ///
    /// Lines are trimmed before classification. Blank lines produce no output
    /// but close any open list grouping.
    #[must_use]
    pub fn parse<'a, I>(title: impl Into<String>, lines: I, grammar: &Grammar) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = Builder::default();

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                builder.close();
                continue;
            }
            builder.push(grammar.classify(line));
        }

        Self {
            title: title.into(),
            nodes: builder.finish(),
        }
    }

    /// The document title, used in the HTML `<title>` element.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The output nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns an iterator over the blocks, skipping list markers.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Block(block) => Some(block),
            Node::ListOpen | Node::ListClose => None,
        })
    }

    /// Renders the body markup, one node per line.
    #[must_use]
    pub fn body(&self) -> String {
        self.nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the complete HTML document.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <title>{title}</title>
    <style>
{STYLESHEET}    </style>
</head>
<body>
{body}
</body>
</html>
",
            title = self.title,
            body = self.body(),
        )
    }
}
