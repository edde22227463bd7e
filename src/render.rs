//! Presentation of diffs as escaped HTML markup.
//!
//! Strictly derived output: each function walks its input once, escapes the
//! text, and tags it by operation kind for downstream styling. The result is
//! safe to hand to a display surface that trusts pre-escaped input.

use crate::{conflict::ConflictBlock, diff::DiffOp};

/// Render a character-level diff as HTML.
///
/// Unchanged text is wrapped in `<span>`, removed text in `<del>`, and added
/// text in `<ins>`; `&`, `<`, `>`, and `"` are escaped and newlines become
/// `<br>`.
///
/// ```
/// use redline::{diff_chars, render_char_diff};
///
/// let diff = diff_chars("The cat sat.", "The dog sat.");
/// assert_eq!(
///     render_char_diff(&diff),
///     "<span>The </span><del>cat</del><ins>dog</ins><span> sat.</span>",
/// );
/// ```
pub fn render_char_diff(diff: &[DiffOp]) -> String {
    let mut markup = String::new();

    for op in diff {
        let (open, close) = match op {
            DiffOp::Equal(_) => ("<span>", "</span>"),
            DiffOp::Delete(_) => ("<del>", "</del>"),
            DiffOp::Insert(_) => ("<ins>", "</ins>"),
        };
        markup.push_str(open);
        push_escaped(&mut markup, op.text());
        markup.push_str(close);
    }

    markup
}

/// Render a conflict block as HTML, removed lines as `<del>` and added lines
/// as `<ins>`, one `<br>`-terminated line each.
pub fn render_conflict(block: &ConflictBlock) -> String {
    let mut markup = String::new();

    for line in block.removed_lines() {
        markup.push_str("<del>");
        push_escaped(&mut markup, line);
        markup.push_str("</del><br>");
    }
    for line in block.added_lines() {
        markup.push_str("<ins>");
        push_escaped(&mut markup, line);
        markup.push_str("</ins><br>");
    }

    markup
}

fn push_escaped(markup: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => markup.push_str("&amp;"),
            '<' => markup.push_str("&lt;"),
            '>' => markup.push_str("&gt;"),
            '"' => markup.push_str("&quot;"),
            '\n' => markup.push_str("<br>"),
            c => markup.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_patch, diff_chars};

    #[test]
    fn escapes_markup_characters() {
        let diff = diff_chars("a < b\n", "a & \"b\"\n");
        let markup = render_char_diff(&diff);
        assert!(!markup.contains("a < b"));
        assert!(markup.contains("&lt;") || markup.contains("&amp;"));
        assert!(!markup.contains('\n'));
    }

    #[test]
    fn tags_every_segment_kind() {
        let markup = render_char_diff(&diff_chars("The cat sat.", "The dog sat."));
        assert_eq!(
            markup,
            "<span>The </span><del>cat</del><ins>dog</ins><span> sat.</span>",
        );
    }

    #[test]
    fn empty_diff_renders_nothing() {
        assert_eq!(render_char_diff(&[]), "");
    }

    #[test]
    fn renders_conflict_sides() {
        let patch = create_patch("a\nb\nc\n", "a\nB\nc\n");
        let block = crate::ConflictBlock::from_patch(&patch);
        assert_eq!(render_conflict(&block), "<del>b</del><br><ins>B</ins><br>");
    }
}
