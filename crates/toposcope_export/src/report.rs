//! Line-oriented report markup.
//!
//! The PDF composer describes its pages in a small text grammar and
//! interprets the blocks while laying out pages. One line is one block;
//! blank lines are skipped.
//!
//! ```text
//! # heading
//! ## subheading
//! **bold line**
//! |cell|cell|         table row
//! - bullet
//! ---pagebreak---     forced page break
//! anything else       paragraph
//! ```

/// One layout block of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Subheading(String),
    Bold(String),
    TableRow(Vec<String>),
    Bullet(String),
    PageBreak,
    Paragraph(String),
}

impl Block {
    /// Font size in points, zero for non-text blocks.
    pub(crate) fn font_size(&self) -> f32 {
        match self {
            Block::Heading(_) => 18.0,
            Block::Subheading(_) => 14.0,
            Block::Bold(_) => 11.0,
            Block::TableRow(_) | Block::Bullet(_) | Block::Paragraph(_) => 10.0,
            Block::PageBreak => 0.0,
        }
    }

    /// Vertical space the block consumes, in millimeters.
    pub(crate) fn height_mm(&self) -> f32 {
        match self {
            Block::Heading(_) => 10.0,
            Block::Subheading(_) => 8.0,
            Block::TableRow(_) => 7.0,
            Block::Bold(_) | Block::Bullet(_) | Block::Paragraph(_) => 6.0,
            Block::PageBreak => 0.0,
        }
    }

    /// Whether the block renders with the bold face.
    pub(crate) fn is_bold(&self) -> bool {
        matches!(self, Block::Heading(_) | Block::Subheading(_) | Block::Bold(_))
    }
}

/// Parses report text into layout blocks, one block per non-empty line.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Block {
    if line == "---pagebreak---" {
        return Block::PageBreak;
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Subheading(rest.to_string());
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Block::Heading(rest.to_string());
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Block::Bullet(rest.to_string());
    }
    if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        return Block::Bold(line[2..line.len() - 2].to_string());
    }
    if line.len() > 1 && line.starts_with('|') && line.ends_with('|') {
        let cells = line[1..line.len() - 1]
            .split('|')
            .map(|cell| cell.trim().to_string())
            .collect();
        return Block::TableRow(cells);
    }
    Block::Paragraph(line.to_string())
}
