use crate::{
    patch::{Hunk, Line, Patch},
    utils::LineIter,
};
use hashbrown::HashSet;
use std::fmt;

/// An error returned when applying a [`Patch`] fails
///
/// Application is all-or-nothing: on error the base text has not been
/// touched, and no partially patched output exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApplyError {
    /// The base text no longer matches what the hunk at this index (0-based,
    /// within the patch) expects to find at its recorded position.
    Conflict(usize),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyError::Conflict(idx) => {
                write!(f, "hunk {} does not apply: the base text has changed", idx)
            }
        }
    }
}

impl std::error::Error for ApplyError {}

/// Apply a `Patch` to a base text
///
/// Each hunk's context and deleted lines must match the base text exactly at
/// the position the hunk records; the first hunk that doesn't match fails
/// the whole operation with [`ApplyError::Conflict`] carrying that hunk's
/// index. There is no searching for an alternate position: a patch whose
/// base has drifted should be recomputed against the current text, not
/// guessed into place.
///
/// ```
/// use redline::{Patch, apply};
///
/// let s = "\
/// --- original
/// +++ modified
/// @@ -1,4 +1,6 @@
///  First:
///      Life before death,
///      strength before weakness,
///      journey before destination.
/// +Second:
/// +    I will protect those who cannot protect themselves.
/// ";
///
/// let patch = Patch::from_str(s).unwrap();
///
/// let base = "\
/// First:
///     Life before death,
///     strength before weakness,
///     journey before destination.
/// ";
///
/// let expected = "\
/// First:
///     Life before death,
///     strength before weakness,
///     journey before destination.
/// Second:
///     I will protect those who cannot protect themselves.
/// ";
///
/// assert_eq!(apply(base, &patch).unwrap(), expected);
/// ```
pub fn apply(base: &str, patch: &Patch<'_>) -> Result<String, ApplyError> {
    let hunks: Vec<_> = patch.hunks().iter().enumerate().collect();
    apply_hunks(base, &hunks)
}

/// Apply only the accepted hunks of a `Patch` to a base text
///
/// `accepted` holds indices into [`Patch::hunks`]; hunks keep their original
/// order, duplicate and out-of-range indices are ignored, and hunks left out
/// leave their lines of the base text untouched. An empty `accepted` returns
/// the base text unchanged. Failure semantics match [`apply`], and a
/// conflict reports the hunk's index within the original patch.
pub fn apply_partial(
    base: &str,
    patch: &Patch<'_>,
    accepted: &[usize],
) -> Result<String, ApplyError> {
    let accepted: HashSet<usize> = accepted.iter().copied().collect();
    let hunks: Vec<_> = patch
        .hunks()
        .iter()
        .enumerate()
        .filter(|(idx, _)| accepted.contains(idx))
        .collect();
    apply_hunks(base, &hunks)
}

fn apply_hunks(base: &str, hunks: &[(usize, &Hunk<'_>)]) -> Result<String, ApplyError> {
    let lines: Vec<&str> = LineIter::new(base).collect();

    let mut patched = String::with_capacity(base.len());
    let mut cursor = 0;

    for &(idx, hunk) in hunks {
        let pos = hunk_position(hunk);
        if pos < cursor || !pre_image_matches(&lines, hunk, pos) {
            return Err(ApplyError::Conflict(idx));
        }

        for line in &lines[cursor..pos] {
            patched.push_str(line);
        }
        for line in post_image(hunk.lines()) {
            patched.push_str(line);
        }
        cursor = pos + pre_image_line_count(hunk.lines());
    }

    for line in &lines[cursor..] {
        patched.push_str(line);
    }

    Ok(patched)
}

// The 0-based line index where a hunk's pre-image begins. A zero-length old
// range already records the insertion point as a count of preceding lines.
fn hunk_position(hunk: &Hunk<'_>) -> usize {
    if hunk.old_range().is_empty() {
        hunk.old_range().start()
    } else {
        hunk.old_range().start().saturating_sub(1)
    }
}

fn pre_image_matches(lines: &[&str], hunk: &Hunk<'_>, pos: usize) -> bool {
    let len = pre_image_line_count(hunk.lines());

    match lines.get(pos..pos + len) {
        Some(image) => pre_image(hunk.lines()).eq(image.iter().copied()),
        None => false,
    }
}

fn pre_image_line_count(lines: &[Line<'_>]) -> usize {
    pre_image(lines).count()
}

fn pre_image<'a, 'b>(lines: &'b [Line<'a>]) -> impl Iterator<Item = &'a str> + 'b {
    lines.iter().filter_map(|line| match line {
        Line::Context(l) | Line::Delete(l) => Some(*l),
        Line::Insert(_) => None,
    })
}

fn post_image<'a, 'b>(lines: &'b [Line<'a>]) -> impl Iterator<Item = &'a str> + 'b {
    lines.iter().filter_map(|line| match line {
        Line::Context(l) | Line::Insert(l) => Some(*l),
        Line::Delete(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_patch;

    #[test]
    fn full_apply_recovers_modified_text() {
        let original = "a\nb\nc\nd\ne\n";
        let modified = "a\nB\nc\nd\nE\n";
        let patch = create_patch(original, modified);
        assert_eq!(apply(original, &patch).unwrap(), modified);
    }

    #[test]
    fn apply_without_trailing_newline() {
        let original = "a\nb\nc";
        let modified = "a\nB\nc";
        let patch = create_patch(original, modified);
        assert_eq!(apply(original, &patch).unwrap(), modified);
    }

    #[test]
    fn apply_pure_insertion_at_eof() {
        let original = "a\nb\n";
        let modified = "a\nb\nc\nd\n";
        let patch = create_patch(original, modified);
        assert_eq!(apply(original, &patch).unwrap(), modified);
    }

    #[test]
    fn apply_to_empty_base() {
        let original = "";
        let modified = "a\nb\n";
        let patch = create_patch(original, modified);
        assert_eq!(apply(original, &patch).unwrap(), modified);
    }

    #[test]
    fn conflict_when_base_has_drifted() {
        let original = "a\nb\nc\n";
        let modified = "a\nB\nc\n";
        let patch = create_patch(original, modified);

        let drifted = "a\nx\nc\n";
        assert_eq!(apply(drifted, &patch), Err(ApplyError::Conflict(0)));
    }

    #[test]
    fn conflict_reports_first_mismatching_hunk() {
        let original = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\n";
        let modified = "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nK\nl\n";
        let mut options = crate::DiffOptions::new();
        options.set_context_len(1);
        let patch = options.create_patch(original, modified);
        assert_eq!(patch.hunks().len(), 2);

        // Drift inside the second hunk's context only.
        let drifted = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nx\nl\n";
        assert_eq!(apply(drifted, &patch), Err(ApplyError::Conflict(1)));
    }

    #[test]
    fn partial_apply_with_empty_set_is_identity() {
        let original = "a\nb\nc\n";
        let patch = create_patch(original, "a\nB\nc\n");
        assert_eq!(apply_partial(original, &patch, &[]).unwrap(), original);
    }

    #[test]
    fn partial_apply_with_all_hunks_matches_full_apply() {
        let original = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\n";
        let modified = "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nK\nl\n";
        let mut options = crate::DiffOptions::new();
        options.set_context_len(1);
        let patch = options.create_patch(original, modified);
        assert_eq!(patch.hunks().len(), 2);

        let all: Vec<usize> = (0..patch.hunks().len()).collect();
        assert_eq!(
            apply_partial(original, &patch, &all).unwrap(),
            apply(original, &patch).unwrap(),
        );
    }

    #[test]
    fn partial_apply_changes_only_accepted_hunks() {
        let original = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\n";
        let modified = "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nK\nl\n";
        let mut options = crate::DiffOptions::new();
        options.set_context_len(1);
        let patch = options.create_patch(original, modified);
        assert_eq!(patch.hunks().len(), 2);

        assert_eq!(
            apply_partial(original, &patch, &[0]).unwrap(),
            "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\n",
        );
        assert_eq!(
            apply_partial(original, &patch, &[1]).unwrap(),
            "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nK\nl\n",
        );
    }

    #[test]
    fn partial_apply_ignores_out_of_range_indices() {
        let original = "a\nb\nc\n";
        let modified = "a\nB\nc\n";
        let patch = create_patch(original, modified);
        assert_eq!(
            apply_partial(original, &patch, &[0, 7, 7]).unwrap(),
            modified,
        );
    }
}
