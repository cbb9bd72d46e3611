//! Line-oriented parser for the markdown subset the assistant produces.
//!
//! Recognizes `##`/`###` headings, `**bold**` runs, `N.` numbered items,
//! and blank lines. Everything else is a paragraph. The parser only
//! builds typed blocks; rendering them is the caller's concern.

use serde::{Deserialize, Serialize};

/// Heading depth. The assistant templates only emit these two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H2,
    H3,
}

/// A styled run within a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Heading { level: HeadingLevel, text: String },
    Paragraph(Vec<Inline>),
    NumberedItem { number: u32, content: Vec<Inline> },
    Blank,
}

/// Parse a document into blocks, one per input line.
pub fn parse(content: &str) -> Vec<Block> {
    content.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix("### ") {
        return Block::Heading {
            level: HeadingLevel::H3,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Heading {
            level: HeadingLevel::H2,
            text: rest.to_string(),
        };
    }
    if let Some(item) = parse_numbered(line) {
        return item;
    }
    if line.trim().is_empty() {
        return Block::Blank;
    }
    Block::Paragraph(parse_inlines(line))
}

/// Matches `N. rest` where N is a run of ASCII digits followed by a dot
/// and exactly one whitespace character.
fn parse_numbered(line: &str) -> Option<Block> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let rest = &line[digits_end..];
    let mut chars = rest.chars();
    if chars.next() != Some('.') {
        return None;
    }
    let mut after_dot = chars.as_str().chars();
    if !after_dot.next()?.is_whitespace() {
        return None;
    }
    let number = line[..digits_end].parse::<u32>().ok()?;

    Some(Block::NumberedItem {
        number,
        content: parse_inlines(after_dot.as_str()),
    })
}

/// Split a line into text and bold runs. An unpaired `**` stays literal.
fn parse_inlines(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find("**") {
        let Some(len) = rest[start + 2..].find("**") else {
            break;
        };
        if start > 0 {
            spans.push(Inline::Text(rest[..start].to_string()));
        }
        spans.push(Inline::Bold(rest[start + 2..start + 2 + len].to_string()));
        rest = &rest[start + 2 + len + 2..];
    }

    if !rest.is_empty() {
        spans.push(Inline::Text(rest.to_string()));
    }
    spans
}

impl Block {
    /// Flatten to plain text, dropping styling.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { text, .. } => text.clone(),
            Block::Paragraph(spans) => flatten(spans),
            Block::NumberedItem { number, content } => {
                format!("{}. {}", number, flatten(content))
            }
            Block::Blank => String::new(),
        }
    }
}

fn flatten(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) | Inline::Bold(text) => text.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headings() {
        assert_eq!(
            parse("## Title"),
            vec![Block::Heading {
                level: HeadingLevel::H2,
                text: "Title".to_string()
            }]
        );
        assert_eq!(
            parse("### Sub"),
            vec![Block::Heading {
                level: HeadingLevel::H3,
                text: "Sub".to_string()
            }]
        );
    }

    #[test]
    fn test_four_hashes_is_a_paragraph() {
        assert_eq!(
            parse("#### deeper"),
            vec![Block::Paragraph(vec![Inline::Text(
                "#### deeper".to_string()
            )])]
        );
    }

    #[test]
    fn test_heading_keeps_styling_literal() {
        // Headings take the raw rest of the line; bold markers are not
        // interpreted inside them
        assert_eq!(
            parse("### A **B**"),
            vec![Block::Heading {
                level: HeadingLevel::H3,
                text: "A **B**".to_string()
            }]
        );
    }

    #[test]
    fn test_bold_runs() {
        assert_eq!(
            parse("say **this** loudly"),
            vec![Block::Paragraph(vec![
                Inline::Text("say ".to_string()),
                Inline::Bold("this".to_string()),
                Inline::Text(" loudly".to_string()),
            ])]
        );
    }

    #[test]
    fn test_adjacent_bold_runs() {
        assert_eq!(
            parse("**a****b**"),
            vec![Block::Paragraph(vec![
                Inline::Bold("a".to_string()),
                Inline::Bold("b".to_string()),
            ])]
        );
    }

    #[test]
    fn test_unterminated_bold_stays_literal() {
        assert_eq!(
            parse("broken **bold"),
            vec![Block::Paragraph(vec![Inline::Text(
                "broken **bold".to_string()
            )])]
        );
    }

    #[test]
    fn test_numbered_items() {
        assert_eq!(
            parse("1. first\n12. twelfth"),
            vec![
                Block::NumberedItem {
                    number: 1,
                    content: vec![Inline::Text("first".to_string())],
                },
                Block::NumberedItem {
                    number: 12,
                    content: vec![Inline::Text("twelfth".to_string())],
                },
            ]
        );
    }

    #[test]
    fn test_numbered_item_with_bold() {
        assert_eq!(
            parse("1. do **this**"),
            vec![Block::NumberedItem {
                number: 1,
                content: vec![
                    Inline::Text("do ".to_string()),
                    Inline::Bold("this".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn test_dot_without_space_is_a_paragraph() {
        assert_eq!(
            parse("1.no space"),
            vec![Block::Paragraph(vec![Inline::Text(
                "1.no space".to_string()
            )])]
        );
    }

    #[test]
    fn test_blank_lines_preserved() {
        assert_eq!(
            parse("a\n\nb"),
            vec![
                Block::Paragraph(vec![Inline::Text("a".to_string())]),
                Block::Blank,
                Block::Paragraph(vec![Inline::Text("b".to_string())]),
            ]
        );
        // Whitespace-only lines count as blank
        assert_eq!(parse("   "), vec![Block::Blank]);
    }

    #[test]
    fn test_assistant_plan_template() {
        let plan = "### Crystallized Goal\nMove from pain to freedom.\n\n1. **Breathe** deeply\n2. Walk barefoot";
        let blocks = parse(plan);
        assert_eq!(blocks.len(), 5);
        assert!(matches!(
            blocks[0],
            Block::Heading {
                level: HeadingLevel::H3,
                ..
            }
        ));
        assert_eq!(blocks[2], Block::Blank);
        assert!(matches!(blocks[3], Block::NumberedItem { number: 1, .. }));
    }

    #[test]
    fn test_plain_text_flattening() {
        let blocks = parse("### Goal\n1. do **this**");
        assert_eq!(blocks[0].plain_text(), "Goal");
        assert_eq!(blocks[1].plain_text(), "1. do this");
    }
}
