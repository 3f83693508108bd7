//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values in a
/// single pass: substituted text is never scanned again, and braces that do
/// not name a known key are kept as they are.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  while let Some(start) = rest.find('{') {
    out.push_str(&rest[..start]);
    let after = &rest[start + 1..];
    let hit = after.find('}').and_then(|end| {
      let key = &after[..end];
      pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| (*v, end))
    });
    match hit {
      Some((value, end)) => {
        out.push_str(value);
        rest = &after[end + 1..];
      }
      None => {
        out.push('{');
        rest = after;
      }
    }
  }
  out.push_str(rest);
  out
}

/// Log-safe truncation for large strings (model prompts and responses).
/// Cuts on a char boundary so multi-byte text never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fills_all_occurrences() {
    let out = fill_template("{a} and {a} then {b}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and x then y");
  }

  #[test]
  fn values_are_not_expanded_again() {
    let out = fill_template("{a} / {b}", &[("a", "{b}"), ("b", "y")]);
    assert_eq!(out, "{b} / y");
  }

  #[test]
  fn unknown_and_literal_braces_survive() {
    let tpl = r#"{"themes": {"<concept>": <count>}} for {topic} and {other}"#;
    let out = fill_template(tpl, &[("topic", "Rust")]);
    assert_eq!(out, r#"{"themes": {"<concept>": <count>}} for Rust and {other}"#);
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let out = trunc_for_log("ééé", 3);
    assert!(out.starts_with("é…"), "{out}");
    assert!(out.ends_with("(6 bytes total)"));
  }
}
