// Line patterns recognised while typing: list items, task items and fence
// openers. Only ever applied to the active line.

use regex::Regex;
use std::sync::OnceLock;

use crate::block::FenceKind;

static LIST_REGEX: OnceLock<Regex> = OnceLock::new();
static TASK_REGEX: OnceLock<Regex> = OnceLock::new();
static TOGGLE_TASK_REGEX: OnceLock<Regex> = OnceLock::new();
static CODE_OPEN_REGEX: OnceLock<Regex> = OnceLock::new();
static MATH_OPEN_REGEX: OnceLock<Regex> = OnceLock::new();

/// A list or task item found at the start of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem<'a> {
    Bullet {
        indent: &'a str,
        marker: &'a str,
        text: &'a str,
    },
    Task {
        indent: &'a str,
        checked: bool,
        text: &'a str,
    },
}

impl<'a> ListItem<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            ListItem::Bullet { text, .. } | ListItem::Task { text, .. } => text,
        }
    }

    /// Prefix for the next item of the same list. Tasks restart unchecked.
    pub fn continuation(&self) -> String {
        match self {
            ListItem::Bullet { indent, marker, .. } => format!("{indent}{marker} "),
            ListItem::Task { indent, .. } => format!("{indent}- [ ] "),
        }
    }
}

fn list_regex() -> &'static Regex {
    LIST_REGEX.get_or_init(|| Regex::new(r"^(\s*)([-*+]|\d+\.)\s(.*)$").expect("Invalid list regex"))
}

fn task_regex() -> &'static Regex {
    TASK_REGEX.get_or_init(|| Regex::new(r"^(\s*)- \[([ x])\]\s(.*)$").expect("Invalid task regex"))
}

fn toggle_task_regex() -> &'static Regex {
    TOGGLE_TASK_REGEX
        .get_or_init(|| Regex::new(r"^(\s*)- \[( |x)\]\s(.+)$").expect("Invalid task regex"))
}

fn code_open_regex() -> &'static Regex {
    CODE_OPEN_REGEX.get_or_init(|| Regex::new(r"^\s*```(.*)$").expect("Invalid fence regex"))
}

fn math_open_regex() -> &'static Regex {
    MATH_OPEN_REGEX.get_or_init(|| Regex::new(r"^\s*\$\$(.*)$").expect("Invalid fence regex"))
}

/// Match a task item first, then a plain list item
pub fn list_item(line: &str) -> Option<ListItem<'_>> {
    if let Some(caps) = task_regex().captures(line) {
        return Some(ListItem::Task {
            indent: caps.get(1).map_or("", |m| m.as_str()),
            checked: caps.get(2).is_some_and(|m| m.as_str() == "x"),
            text: caps.get(3).map_or("", |m| m.as_str()),
        });
    }

    let caps = list_regex().captures(line)?;
    Some(ListItem::Bullet {
        indent: caps.get(1).map_or("", |m| m.as_str()),
        marker: caps.get(2).map_or("", |m| m.as_str()),
        text: caps.get(3).map_or("", |m| m.as_str()),
    })
}

/// Flip `- [ ]` and `- [x]`. Returns `None` unless the line is a task with text.
pub fn toggle_task(line: &str) -> Option<String> {
    let caps = toggle_task_regex().captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let text = caps.get(3).map_or("", |m| m.as_str());
    let mark = if caps.get(2).is_some_and(|m| m.as_str() == "x") { ' ' } else { 'x' };
    Some(format!("{indent}- [{mark}] {text}"))
}

/// Which fence, if any, a line typed by the user opens; with the trimmed
/// language tag for code fences.
pub fn fence_opener(line: &str) -> Option<(FenceKind, Option<String>)> {
    if let Some(caps) = code_open_regex().captures(line) {
        let lang = caps.get(1).map_or("", |m| m.as_str()).trim();
        let lang = (!lang.is_empty()).then(|| lang.to_string());
        return Some((FenceKind::Code, lang));
    }
    if math_open_regex().is_match(line) {
        return Some((FenceKind::Math, None));
    }
    None
}

/// Text of the line echoing a fence opener
pub fn open_marker(kind: FenceKind, language: Option<&str>) -> String {
    format!("{}{}", kind.token(), language.unwrap_or(""))
}
