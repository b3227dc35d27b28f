//! Markdown code fence scanning
//!
//! Model output is not trusted to be well formed: an opening fence with no
//! closing fence runs to the end of the text.

/// One fenced block in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence<'a> {
  /// Info string after the backticks (`dart`, `json`, or empty)
  pub lang: &'a str,
  /// Everything between the fence lines
  pub body: &'a str,
  /// Byte offset of the opening fence line
  pub start: usize,
  /// Byte offset just past the closing fence line
  pub end: usize,
}

impl<'a> Fence<'a> {
  /// First non-blank line of the body
  pub fn header(&self) -> Option<&'a str> {
    self.body.lines().find(|l| !l.trim().is_empty())
  }

  /// Body with its first non-blank line removed
  pub fn body_after_header(&self) -> &'a str {
    let trimmed = self.body.trim_start();
    match trimmed.find('\n') {
      Some(idx) => &trimmed[idx + 1..],
      None => "",
    }
  }

  pub fn contains(&self, offset: usize) -> bool {
    (self.start..self.end).contains(&offset)
  }

  /// Distance from `offset` to the nearest edge of this block
  pub fn distance_to(&self, offset: usize) -> usize {
    if self.contains(offset) {
      0
    } else if offset < self.start {
      self.start - offset
    } else {
      offset - self.end
    }
  }
}

/// Scan `text` for fenced blocks in order of appearance
pub fn scan_fences(text: &str) -> Vec<Fence<'_>> {
  let mut fences = Vec::new();
  let mut open: Option<(usize, &str, usize)> = None;
  let mut offset = 0;

  for line in text.split_inclusive('\n') {
    let line_start = offset;
    offset += line.len();
    let trimmed = line.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
      continue;
    };

    match open.take() {
      None => {
        let lang = rest.split_whitespace().next().unwrap_or("");
        open = Some((line_start, lang, offset));
      }
      Some((start, lang, body_start)) => {
        fences.push(Fence {
          lang,
          body: &text[body_start..line_start],
          start,
          end: offset,
        });
      }
    }
  }

  if let Some((start, lang, body_start)) = open {
    fences.push(Fence {
      lang,
      body: &text[body_start.min(text.len())..],
      start,
      end: text.len(),
    });
  }

  fences
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_scan_two_blocks() {
    let text = "intro\n```dart\n// a.dart\nclass A {}\n```\nmiddle\n```json\n[]\n```\n";
    let fences = scan_fences(text);

    assert_eq!(fences.len(), 2);
    assert_eq!(fences[0].lang, "dart");
    assert_eq!(fences[0].body, "// a.dart\nclass A {}\n");
    assert_eq!(fences[0].header(), Some("// a.dart"));
    assert_eq!(fences[0].body_after_header(), "class A {}\n");
    assert_eq!(fences[1].lang, "json");
    assert_eq!(fences[1].body, "[]\n");
    assert!(fences[0].end <= fences[1].start);
  }

  #[test]
  fn test_unterminated_block_runs_to_end() {
    let text = "```dart\n// b.dart\nclass B {";
    let fences = scan_fences(text);

    assert_eq!(fences.len(), 1);
    assert_eq!(fences[0].body, "// b.dart\nclass B {");
    assert_eq!(fences[0].end, text.len());
  }

  #[test]
  fn test_no_fences() {
    assert!(scan_fences("just prose, no code").is_empty());
  }

  #[test]
  fn test_distance() {
    let text = "aaaa\n```\nx\n```\nbbbb";
    let fence = &scan_fences(text)[0];
    assert_eq!(fence.distance_to(fence.start + 1), 0);
    assert_eq!(fence.distance_to(0), fence.start);
    assert_eq!(fence.distance_to(text.len()), text.len() - fence.end);
  }
}
