//! Small string helpers shared by the extractors and templates.

/// `LoginScreen` -> `login_screen`, `HTTPClient` -> `http_client`
pub fn snake_case(name: &str) -> String {
  let chars: Vec<char> = name.chars().collect();
  let mut out = String::with_capacity(name.len() + 4);

  for (i, &c) in chars.iter().enumerate() {
    if c.is_uppercase() {
      let prev = i.checked_sub(1).map(|p| chars[p]);
      let next = chars.get(i + 1).copied();
      let boundary = match prev {
        Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
        Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
        _ => false,
      };
      if boundary && !out.ends_with('_') {
        out.push('_');
      }
      out.extend(c.to_lowercase());
    } else if c.is_alphanumeric() {
      out.push(c);
    } else if !out.is_empty() && !out.ends_with('_') {
      out.push('_');
    }
  }

  out.trim_matches('_').to_string()
}

/// Split on anything that is not a letter or digit
pub fn words(text: &str) -> impl Iterator<Item = &str> {
  text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// Uppercase the first character, keep the rest
pub fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// `login_screen` -> `LoginScreen`, `user profile` -> `UserProfile`
pub fn pascal_case(text: &str) -> String {
  words(text).map(capitalize).collect()
}

/// Truncate to at most `max` characters without splitting a UTF-8 sequence
pub fn truncate_chars(text: &str, max: usize) -> &str {
  match text.char_indices().nth(max) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

/// Render `text` as a single-quoted Dart string literal
pub fn dart_string(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('\'');
  for c in text.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '$' => out.push_str("\\$"),
      '\n' => out.push_str("\\n"),
      '\r' => {}
      '\t' => out.push_str("\\t"),
      c => out.push(c),
    }
  }
  out.push('\'');
  out
}

/// Byte offset just past the brace block that opens at or after `from`.
///
/// Truncated responses are common, so an unbalanced block runs to the end
/// of the text instead of failing.
pub fn brace_block_end(text: &str, from: usize) -> usize {
  let Some(open) = text[from..].find('{').map(|i| i + from) else {
    return text[from..].find('\n').map(|i| i + from).unwrap_or(text.len());
  };

  let mut depth = 0usize;
  for (i, c) in text[open..].char_indices() {
    match c {
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return open + i + 1;
        }
      }
      _ => {}
    }
  }
  text.len()
}
