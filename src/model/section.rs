//! SQL template sections
//!
//! A template is a SQL script split by marker comment lines:
//!
//! ```text
//! --#PreSQL
//! /*--!*/
//! DELETE FROM staging;
//!
//! --#MainSQL
//! /*--!*/
//! INSERT INTO orders SELECT * FROM staging;
//! ```
//!
//! Parsing keeps at most one body per section name. Serialization always
//! writes sections in canonical order, so parse -> serialize -> parse is
//! stable.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Placeholder line written directly after each marker
pub const PLACEHOLDER: &str = "/*--!*/";

/// Matches a marker line such as `--#MainSQL`
static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--#(\w+)\s*$").expect("marker regex is valid"));

/// Known section names. Declaration order is the canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionName {
    PreSql,
    PreProdSql,
    CountSql,
    SelectSql,
    MainSql,
    PostSql,
}

impl SectionName {
    /// All section names in canonical order
    pub fn all() -> [SectionName; 6] {
        [
            SectionName::PreSql,
            SectionName::PreProdSql,
            SectionName::CountSql,
            SectionName::SelectSql,
            SectionName::MainSql,
            SectionName::PostSql,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::PreSql => "PreSQL",
            SectionName::PreProdSql => "PreProdSQL",
            SectionName::CountSql => "CountSQL",
            SectionName::SelectSql => "SelectSQL",
            SectionName::MainSql => "MainSQL",
            SectionName::PostSql => "PostSQL",
        }
    }

    /// The literal marker line for this section
    pub fn marker(&self) -> &'static str {
        match self {
            SectionName::PreSql => "--#PreSQL",
            SectionName::PreProdSql => "--#PreProdSQL",
            SectionName::CountSql => "--#CountSQL",
            SectionName::SelectSql => "--#SelectSQL",
            SectionName::MainSql => "--#MainSQL",
            SectionName::PostSql => "--#PostSQL",
        }
    }

    /// Resolve an exact section name such as `"MainSQL"`
    pub fn from_name(name: &str) -> Option<SectionName> {
        SectionName::all().into_iter().find(|s| s.as_str() == name)
    }

    /// Hint comment used by the example template
    pub fn hint(&self) -> &'static str {
        match self {
            SectionName::PreSql => "--請放置前置語法",
            SectionName::PreProdSql => "--請放置正式環境前置語法",
            SectionName::CountSql => "--請放置Count語法",
            SectionName::SelectSql => "--請放置異動前/後語法",
            SectionName::MainSql => "--請放置異動語法",
            SectionName::PostSql => "--請放置後置語法",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line terminator used when serializing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// CRLF if the text contains any `\r\n`, LF otherwise
    pub fn detect(text: &str) -> LineEnding {
        if text.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Return the section a line opens, if it is a marker line for a known section
pub fn parse_marker(line: &str) -> Option<SectionName> {
    let captures = MARKER_REGEX.captures(line)?;
    SectionName::from_name(captures.get(1)?.as_str())
}

/// A parsed template: at most one body per section name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlTemplate {
    sections: BTreeMap<SectionName, String>,
    line_ending: LineEnding,
}

impl SqlTemplate {
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            sections: BTreeMap::new(),
            line_ending,
        }
    }

    /// Split raw text into sections
    pub fn parse(text: &str) -> SqlTemplate {
        let mut template = SqlTemplate::new(LineEnding::detect(text));
        let mut current: Option<(SectionName, Vec<&str>)> = None;
        let mut expect_placeholder = false;
        let mut discarded = 0usize;

        for raw in text.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some(name) = parse_marker(line) {
                if let Some((previous, lines)) = current.take() {
                    template.insert_parsed(previous, &lines);
                }
                current = Some((name, Vec::new()));
                expect_placeholder = true;
                continue;
            }

            match current.as_mut() {
                Some((_, lines)) => {
                    let is_placeholder = expect_placeholder && line.trim() == PLACEHOLDER;
                    expect_placeholder = false;
                    if !is_placeholder {
                        lines.push(line);
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        discarded += 1;
                    }
                }
            }
        }

        if let Some((name, lines)) = current.take() {
            template.insert_parsed(name, &lines);
        }

        if discarded > 0 {
            tracing::debug!(lines = discarded, "discarded text before the first section marker");
        }

        template
    }

    fn insert_parsed(&mut self, name: SectionName, lines: &[&str]) {
        let body = join_trimmed(lines);
        if self.sections.insert(name, body).is_some() {
            tracing::warn!(section = %name, "section repeated, keeping the last occurrence");
        }
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn get(&self, name: SectionName) -> Option<&str> {
        self.sections.get(&name).map(String::as_str)
    }

    /// Insert or replace a section body. Line endings are normalized and
    /// trailing blank lines dropped, matching what parsing produces.
    pub fn set(&mut self, name: SectionName, body: &str) {
        let lines: Vec<&str> = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        self.sections.insert(name, join_trimmed(&lines));
    }

    pub fn remove(&mut self, name: SectionName) -> Option<String> {
        self.sections.remove(&name)
    }

    /// Sections in canonical order
    pub fn sections(&self) -> impl Iterator<Item = (SectionName, &str)> {
        self.sections.iter().map(|(name, body)| (*name, body.as_str()))
    }

    pub fn names(&self) -> Vec<SectionName> {
        self.sections.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Reassemble marker text: marker, placeholder, body, blank separator
    pub fn to_sql(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        for (index, (name, body)) in self.sections().enumerate() {
            if index > 0 {
                lines.push("");
            }
            lines.push(name.marker());
            lines.push(PLACEHOLDER);
            if !body.is_empty() {
                lines.extend(body.split('\n'));
            }
        }
        lines.join(self.line_ending.as_str())
    }
}

/// Join lines with `\n`, dropping trailing blank lines
fn join_trimmed(lines: &[&str]) -> String {
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}
