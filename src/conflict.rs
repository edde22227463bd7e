//! A two-way conflict preview of the first changed block of a patch.

use crate::patch::{Line, Patch};
use std::fmt;

const CONFLICT_START: &str = "<<<<<<<";
const CONFLICT_SEPARATOR: &str = "=======";
const CONFLICT_END: &str = ">>>>>>>";

/// The first block of differing lines of a [`Patch`], projected as the two
/// sides of a conflict.
///
/// This is a single-change preview: only the first hunk of a patch is
/// represented, and a patch with no hunks yields an empty block. It is not a
/// three-way merge and cannot reconcile multiple divergent hunks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictBlock {
    removed_lines: Vec<String>,
    added_lines: Vec<String>,
}

impl ConflictBlock {
    /// Project the first hunk of `patch` into a conflict block.
    ///
    /// The hunk's deleted lines become the removed side and its inserted
    /// lines the added side, in order; context lines are not part of either
    /// side. Line terminators are stripped.
    pub fn from_patch(patch: &Patch<'_>) -> Self {
        let mut removed_lines = Vec::new();
        let mut added_lines = Vec::new();

        if let Some(hunk) = patch.hunks().first() {
            for line in hunk.lines() {
                match line {
                    Line::Delete(line) => removed_lines.push(trim_terminator(line).to_owned()),
                    Line::Insert(line) => added_lines.push(trim_terminator(line).to_owned()),
                    Line::Context(_) => {}
                }
            }
        }

        Self {
            removed_lines,
            added_lines,
        }
    }

    /// Parse conflict-marker text back into its two sides.
    ///
    /// A three-state line parser: lines between the start marker and the
    /// separator belong to the removed side, lines between the separator and
    /// the end marker to the added side. Lines outside any marker pair are
    /// shared context and are kept on *both* sides, so context surrounding a
    /// conflict doesn't need to be written twice. Marker lines are matched
    /// by prefix, allowing the usual `<<<<<<< label` spelling.
    pub fn from_conflict_text(text: &str) -> Self {
        enum State {
            Outside,
            InRemoved,
            InAdded,
        }

        let mut state = State::Outside;
        let mut removed_lines = Vec::new();
        let mut added_lines = Vec::new();

        for line in text.lines() {
            if line.starts_with(CONFLICT_START) {
                state = State::InRemoved;
            } else if line.starts_with(CONFLICT_SEPARATOR) {
                state = State::InAdded;
            } else if line.starts_with(CONFLICT_END) {
                state = State::Outside;
            } else {
                match state {
                    State::Outside => {
                        removed_lines.push(line.to_owned());
                        added_lines.push(line.to_owned());
                    }
                    State::InRemoved => removed_lines.push(line.to_owned()),
                    State::InAdded => added_lines.push(line.to_owned()),
                }
            }
        }

        Self {
            removed_lines,
            added_lines,
        }
    }

    /// The lines the change removes, without terminators
    pub fn removed_lines(&self) -> &[String] {
        &self.removed_lines
    }

    /// The lines the change adds, without terminators
    pub fn added_lines(&self) -> &[String] {
        &self.added_lines
    }

    pub fn is_empty(&self) -> bool {
        self.removed_lines.is_empty() && self.added_lines.is_empty()
    }
}

impl fmt::Display for ConflictBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} original", CONFLICT_START)?;
        for line in &self.removed_lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", CONFLICT_SEPARATOR)?;
        for line in &self.added_lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{} modified", CONFLICT_END)?;
        Ok(())
    }
}

fn trim_terminator(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_patch;

    #[test]
    fn projects_first_hunk_only() {
        let original = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\n";
        let modified = "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nK\nl\n";
        let mut options = crate::DiffOptions::new();
        options.set_context_len(1);
        let patch = options.create_patch(original, modified);
        assert_eq!(patch.hunks().len(), 2);

        let block = ConflictBlock::from_patch(&patch);
        assert_eq!(block.removed_lines(), ["b"]);
        assert_eq!(block.added_lines(), ["B"]);
    }

    #[test]
    fn empty_patch_projects_empty_block() {
        let patch = create_patch("same\n", "same\n");
        let block = ConflictBlock::from_patch(&patch);
        assert!(block.is_empty());
    }

    #[test]
    fn renders_conflict_markers() {
        let patch = create_patch("a\nb\nc\n", "a\nB\nc\n");
        let block = ConflictBlock::from_patch(&patch);

        let expected = "\
<<<<<<< original
b
=======
B
>>>>>>> modified
";
        assert_eq!(block.to_string(), expected);
    }

    #[test]
    fn parse_round_trips_render() {
        let patch = create_patch("a\nb\nc\n", "a\nB\nc\n");
        let block = ConflictBlock::from_patch(&patch);
        assert_eq!(ConflictBlock::from_conflict_text(&block.to_string()), block);
    }

    #[test]
    fn unmarked_text_is_shared_context() {
        let block = ConflictBlock::from_conflict_text("a\nb\n");
        assert_eq!(block.removed_lines(), ["a", "b"]);
        assert_eq!(block.added_lines(), ["a", "b"]);
    }

    #[test]
    fn context_around_markers_lands_on_both_sides() {
        let text = "\
shared before
<<<<<<< original
old line
=======
new line
>>>>>>> modified
shared after
";
        let block = ConflictBlock::from_conflict_text(text);
        assert_eq!(
            block.removed_lines(),
            ["shared before", "old line", "shared after"],
        );
        assert_eq!(
            block.added_lines(),
            ["shared before", "new line", "shared after"],
        );
    }
}
