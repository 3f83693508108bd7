//! Text normalization applied to raw model output before line classification.
//!
//! Order matters:
//!   1. line endings are unified to `\n`
//!   2. fenced blocks (```...```) are removed together with their contents
//!   3. a leading `-` bullet is stripped from every line
//!
//! The result is the list of non-empty, trimmed lines.

use std::sync::LazyLock;

use regex::Regex;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)`{3}.*?`{3}").expect("valid regex"));

static LEADING_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-[ \t]*").expect("valid regex"));

pub fn normalize_lines(raw: &str) -> Vec<String> {
  let text = raw.replace("\r\n", "\n").replace('\r', "\n");
  let text = CODE_FENCE.replace_all(&text, "");
  let text = LEADING_BULLET.replace_all(&text, "");

  text
    .split('\n')
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(str::to_string)
    .collect()
}
