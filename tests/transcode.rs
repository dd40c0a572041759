//! End-to-end rendering of text files through the public API.

#![allow(missing_docs)]

use std::fs;

use tempfile::TempDir;
use txtwatch::{Block, Config, Node, Transcoder, domain::TitleConfig};

fn render(name: &str, content: &str) -> String {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join(name);
    fs::write(&input, content).unwrap();

    let output = Transcoder::default().transcode(&input).unwrap();
    fs::read_to_string(output).unwrap()
}

#[test]
fn link_list_document() {
    let html = render(
        "links.txt",
        "Search Engines | 搜索引擎\n\
         1. Example [URL:http://example.com]\n\
         2. Another [URL:http://another.example] [MOBILE:http://m.another.example]\n\
         \n\
         Last updated yesterday.\n",
    );

    let body = html
        .split_once("<body>\n")
        .and_then(|(_, rest)| rest.split_once("\n</body>"))
        .map(|(body, _)| body)
        .unwrap();

    assert_eq!(
        body,
        "<h2>Search Engines - 搜索引擎</h2>\n\
         <ol>\n\
         <li><a href=\"http://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">Example</a></li>\n\
         <li><a href=\"http://another.example\" target=\"_blank\" rel=\"noopener noreferrer\">Another</a></li>\n\
         </ol>\n\
         <p>Last updated yesterday.</p>"
    );
    assert!(html.contains("<title>links</title>"));
}

#[test]
fn blank_only_file_has_empty_body() {
    let html = render("blank.txt", "\n\n   \n");
    assert!(html.contains("<title>blank</title>"));
    assert!(html.contains("<body>\n\n</body>"));
}

#[test]
fn unicode_passes_through() {
    let html = render("unicode.txt", "Ünïcödé ✓ 日本語\n");
    assert!(html.contains("<p>Ünïcödé ✓ 日本語</p>"));
}

#[test]
fn windows_line_endings() {
    let html = render("crlf.txt", "A | B\r\n1. x [URL:y]\r\n");
    assert!(html.contains("<h2>A - B</h2>\n<ol>\n<li><a href=\"y\""));
}

#[test]
fn windows_line_endings_keep_items_in_one_list() {
    let html = render("crlf.txt", "1. a [URL:a]\r\n2. b [URL:b]\r\n");
    assert_eq!(html.matches("<ol>").count(), 1);
    assert_eq!(html.matches("<li>").count(), 2);
}

#[test]
fn classic_mac_line_endings() {
    let html = render("cr.txt", "A | B\r1. x [URL:y]\rplain");
    assert!(html.contains("<h2>A - B</h2>\n<ol>\n<li><a href=\"y\""));
    assert!(html.contains("</ol>\n<p>plain</p>"));
}

#[test]
fn config_rejects_output_over_source() {
    let result = toml::from_str::<Config>("_version = \"1\"\noutput_extension = \"txt\"\n");
    assert!(result.is_err());
}

#[test]
fn pattern_title_grammar_from_config() {
    let config: Config = toml::from_str(
        r#"_version = "1"

[title]
grammar = "pattern"
pattern = '(.+?)\s*:\s*(.+)'
"#,
    )
    .unwrap();
    assert!(matches!(config.title, TitleConfig::Pattern { .. }));

    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("notes.txt");
    fs::write(&input, "Tools: 工具\nA | B\n").unwrap();

    let transcoder = Transcoder::from_config(&config).unwrap();
    let document = transcoder.parse(&input).unwrap();

    assert_eq!(document.title(), "notes");

    assert_eq!(
        document.nodes(),
        &[
            Node::Block(Block::Title {
                primary: "Tools".to_string(),
                secondary: "工具".to_string(),
            }),
            Node::Block(Block::Paragraph("A | B".to_string())),
        ]
    );
}
