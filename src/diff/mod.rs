use crate::{
    patch::{Hunk, HunkRange, Line, Patch},
    range::DiffRange,
    utils::Classifier,
};
use std::{borrow::Cow, cmp, ops};

mod myers;

#[cfg(test)]
mod tests;

/// A segment of a character-level diff.
///
/// A diff is an ordered list of segments: concatenating the text of every
/// `Equal` and `Delete` segment reproduces the original input, while
/// concatenating every `Equal` and `Insert` segment reproduces the modified
/// input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffOp {
    /// Text present in both versions
    Equal(String),
    /// Text removed from the original version
    Delete(String),
    /// Text added in the modified version
    Insert(String),
}

impl DiffOp {
    /// The text carried by this segment, regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            DiffOp::Equal(text) | DiffOp::Delete(text) | DiffOp::Insert(text) => text,
        }
    }
}

impl From<DiffRange<'_, '_, char>> for DiffOp {
    fn from(diff: DiffRange<'_, '_, char>) -> Self {
        match diff {
            DiffRange::Equal(range, _) => DiffOp::Equal(range.iter().collect()),
            DiffRange::Delete(range) => DiffOp::Delete(range.iter().collect()),
            DiffRange::Insert(range) => DiffOp::Insert(range.iter().collect()),
        }
    }
}

/// Compute a character-level diff between two texts.
///
/// The raw edit script is post-processed so that segment boundaries line up
/// with word boundaries where an equally sized alignment exists, trading
/// strict minimality for readability.
///
/// ```
/// use redline::{DiffOp, diff_chars};
///
/// let diff = diff_chars("The cat sat.", "The dog sat.");
/// assert_eq!(
///     diff,
///     vec![
///         DiffOp::Equal("The ".into()),
///         DiffOp::Delete("cat".into()),
///         DiffOp::Insert("dog".into()),
///         DiffOp::Equal(" sat.".into()),
///     ],
/// );
/// ```
pub fn diff_chars(original: &str, modified: &str) -> Vec<DiffOp> {
    let old: Vec<char> = original.chars().collect();
    let new: Vec<char> = modified.chars().collect();

    let mut solution = myers::diff(&old, &new);
    compact(&mut solution);

    solution.into_iter().map(DiffOp::from).collect()
}

/// A collection of options for modifying the way a diff is performed
#[derive(Debug)]
pub struct DiffOptions {
    context_len: usize,
    original_label: Option<String>,
    modified_label: Option<String>,
}

impl DiffOptions {
    /// Construct a new `DiffOptions` with default settings
    ///
    /// ## Defaults
    /// * context_len = 3
    /// * labels = "original" / "modified"
    pub fn new() -> Self {
        Self {
            context_len: 3,
            original_label: None,
            modified_label: None,
        }
    }

    /// Set the number of context lines that should be used when producing a patch
    pub fn set_context_len(&mut self, context_len: usize) -> &mut Self {
        self.context_len = context_len;
        self
    }

    /// Set the label used for the original text when formatting a patch
    pub fn set_original_label<L: Into<String>>(&mut self, label: L) -> &mut Self {
        self.original_label = Some(label.into());
        self
    }

    /// Set the label used for the modified text when formatting a patch
    pub fn set_modified_label<L: Into<String>>(&mut self, label: L) -> &mut Self {
        self.modified_label = Some(label.into());
        self
    }

    /// Produce a patch between two texts using these options
    pub fn create_patch<'a>(&self, original: &'a str, modified: &'a str) -> Patch<'a> {
        let mut classifier = Classifier::default();
        let (old_lines, old_ids) = classifier.classify_lines(original);
        let (new_lines, new_ids) = classifier.classify_lines(modified);

        let mut solution = myers::diff(&old_ids, &new_ids);
        compact(&mut solution);

        let script = build_edit_script(&solution);
        let hunks = DiffLines::new(old_lines, new_lines, script).to_hunks(self.context_len);

        Patch::new(
            self.label(&self.original_label, "original"),
            self.label(&self.modified_label, "modified"),
            hunks,
        )
    }

    fn label<'a>(&self, label: &Option<String>, default: &'static str) -> Cow<'a, str> {
        match label {
            Some(label) => Cow::Owned(label.clone()),
            None => Cow::Borrowed(default),
        }
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Produce a patch between two texts, with the default three lines of context
/// around each change.
///
/// ```
/// use redline::create_patch;
///
/// let original = "a\nb\nc\n";
/// let modified = "a\nB\nc\n";
///
/// let expected = "\
/// --- original
/// +++ modified
/// @@ -1,3 +1,3 @@
///  a
/// -b
/// +B
///  c
/// ";
///
/// assert_eq!(create_patch(original, modified).to_string(), expected);
/// ```
pub fn create_patch<'a>(original: &'a str, modified: &'a str) -> Patch<'a> {
    DiffOptions::default().create_patch(original, modified)
}

// Walks through all edits and shifts them up and then down, trying to see if
// they run into similar edits which can be merged
fn compact<'a, 'b, T: PartialEq>(diffs: &mut Vec<DiffRange<'a, 'b, T>>) {
    // First attempt to compact all Deletions
    let mut pointer = 0;
    while let Some(&diff) = diffs.get(pointer) {
        if let DiffRange::Delete(_) = diff {
            pointer = shift_diff_up(diffs, pointer);
            pointer = shift_diff_down(diffs, pointer);
        }
        pointer += 1;
    }

    // Then attempt to compact all Insertions
    let mut pointer = 0;
    while let Some(&diff) = diffs.get(pointer) {
        if let DiffRange::Insert(_) = diff {
            pointer = shift_diff_up(diffs, pointer);
            pointer = shift_diff_down(diffs, pointer);
        }
        pointer += 1;
    }
}

// Attempts to shift the Insertion or Deletion at location `pointer` as far upwards as possible.
fn shift_diff_up<'a, 'b, T: PartialEq>(
    diffs: &mut Vec<DiffRange<'a, 'b, T>>,
    mut pointer: usize,
) -> usize {
    while let Some(&prev_diff) = pointer.checked_sub(1).and_then(|idx| diffs.get(idx)) {
        match (diffs[pointer], prev_diff) {
            //
            // Shift Inserts Upwards
            //
            (DiffRange::Insert(this_diff), DiffRange::Equal(prev_diff1, _)) => {
                // check common suffix for the amount we can shift
                let suffix_len = this_diff.common_suffix_len(prev_diff1);
                if suffix_len != 0 {
                    if let Some(DiffRange::Equal(..)) = diffs.get(pointer + 1) {
                        diffs[pointer + 1].grow_up(suffix_len);
                    } else {
                        diffs.insert(
                            pointer + 1,
                            DiffRange::Equal(
                                prev_diff1.slice(prev_diff1.len() - suffix_len..),
                                this_diff.slice(this_diff.len() - suffix_len..),
                            ),
                        );
                    }
                    diffs[pointer].shift_up(suffix_len);
                    diffs[pointer - 1].shrink_back(suffix_len);

                    if diffs[pointer - 1].is_empty() {
                        diffs.remove(pointer - 1);
                        pointer -= 1;
                    }
                } else if diffs[pointer - 1].is_empty() {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                } else {
                    // We can't shift upwards anymore
                    break;
                }
            }

            //
            // Shift Deletions Upwards
            //
            (DiffRange::Delete(this_diff), DiffRange::Equal(_, prev_diff2)) => {
                // check common suffix for the amount we can shift
                let suffix_len = this_diff.common_suffix_len(prev_diff2);
                if suffix_len != 0 {
                    if let Some(DiffRange::Equal(..)) = diffs.get(pointer + 1) {
                        diffs[pointer + 1].grow_up(suffix_len);
                    } else {
                        diffs.insert(
                            pointer + 1,
                            DiffRange::Equal(
                                this_diff.slice(this_diff.len() - suffix_len..),
                                prev_diff2.slice(prev_diff2.len() - suffix_len..),
                            ),
                        );
                    }
                    diffs[pointer].shift_up(suffix_len);
                    diffs[pointer - 1].shrink_back(suffix_len);

                    if diffs[pointer - 1].is_empty() {
                        diffs.remove(pointer - 1);
                        pointer -= 1;
                    }
                } else if diffs[pointer - 1].is_empty() {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                } else {
                    // We can't shift upwards anymore
                    break;
                }
            }

            //
            // Swap the Delete and Insert
            //
            (DiffRange::Insert(_), DiffRange::Delete(_))
            | (DiffRange::Delete(_), DiffRange::Insert(_)) => {
                diffs.swap(pointer - 1, pointer);
                pointer -= 1;
            }

            //
            // Merge the two ranges
            //
            (this_diff @ DiffRange::Insert(_), DiffRange::Insert(_))
            | (this_diff @ DiffRange::Delete(_), DiffRange::Delete(_)) => {
                diffs[pointer - 1].grow_down(this_diff.len());
                diffs.remove(pointer);
                pointer -= 1;
            }

            _ => panic!("range to shift must be either Insert or Delete"),
        }
    }

    pointer
}

// Attempts to shift the Insertion or Deletion at location `pointer` as far downwards as possible.
fn shift_diff_down<'a, 'b, T: PartialEq>(
    diffs: &mut Vec<DiffRange<'a, 'b, T>>,
    mut pointer: usize,
) -> usize {
    while let Some(&next_diff) = pointer.checked_add(1).and_then(|idx| diffs.get(idx)) {
        match (diffs[pointer], next_diff) {
            //
            // Shift Insert Downward
            //
            (DiffRange::Insert(this_diff), DiffRange::Equal(next_diff1, _)) => {
                // check common prefix for the amount we can shift
                let prefix_len = this_diff.common_prefix_len(next_diff1);
                if prefix_len != 0 {
                    if let Some(DiffRange::Equal(..)) =
                        pointer.checked_sub(1).and_then(|idx| diffs.get(idx))
                    {
                        diffs[pointer - 1].grow_down(prefix_len);
                    } else {
                        diffs.insert(
                            pointer,
                            DiffRange::Equal(
                                next_diff1.slice(..prefix_len),
                                this_diff.slice(..prefix_len),
                            ),
                        );
                        pointer += 1;
                    }

                    diffs[pointer].shift_down(prefix_len);
                    diffs[pointer + 1].shrink_front(prefix_len);

                    if diffs[pointer + 1].is_empty() {
                        diffs.remove(pointer + 1);
                    }
                } else if diffs[pointer + 1].is_empty() {
                    diffs.remove(pointer + 1);
                } else {
                    // We can't shift downwards anymore
                    break;
                }
            }

            //
            // Shift Deletion Downward
            //
            (DiffRange::Delete(this_diff), DiffRange::Equal(_, next_diff2)) => {
                // check common prefix for the amount we can shift
                let prefix_len = this_diff.common_prefix_len(next_diff2);
                if prefix_len != 0 {
                    if let Some(DiffRange::Equal(..)) =
                        pointer.checked_sub(1).and_then(|idx| diffs.get(idx))
                    {
                        diffs[pointer - 1].grow_down(prefix_len);
                    } else {
                        diffs.insert(
                            pointer,
                            DiffRange::Equal(
                                this_diff.slice(..prefix_len),
                                next_diff2.slice(..prefix_len),
                            ),
                        );
                        pointer += 1;
                    }

                    diffs[pointer].shift_down(prefix_len);
                    diffs[pointer + 1].shrink_front(prefix_len);

                    if diffs[pointer + 1].is_empty() {
                        diffs.remove(pointer + 1);
                    }
                } else if diffs[pointer + 1].is_empty() {
                    diffs.remove(pointer + 1);
                } else {
                    // We can't shift downwards anymore
                    break;
                }
            }

            //
            // Swap the Delete and Insert
            //
            (DiffRange::Insert(_), DiffRange::Delete(_))
            | (DiffRange::Delete(_), DiffRange::Insert(_)) => {
                diffs.swap(pointer, pointer + 1);
                pointer += 1;
            }

            //
            // Merge the two ranges
            //
            (DiffRange::Insert(_), next_diff @ DiffRange::Insert(_))
            | (DiffRange::Delete(_), next_diff @ DiffRange::Delete(_)) => {
                diffs[pointer].grow_down(next_diff.len());
                diffs.remove(pointer + 1);
            }

            _ => panic!("range to shift must be either Insert or Delete"),
        }
    }

    pointer
}

#[derive(Debug)]
struct DiffLines<'a> {
    a_text: Vec<&'a str>,
    b_text: Vec<&'a str>,
    edit_script: Vec<EditRange>,
}

impl<'a> DiffLines<'a> {
    fn new(a_text: Vec<&'a str>, b_text: Vec<&'a str>, edit_script: Vec<EditRange>) -> Self {
        Self {
            a_text,
            b_text,
            edit_script,
        }
    }

    // Group the edit script into hunks, expanding each by up to `context_len`
    // unchanged lines on either side. Adjacent edits whose expanded context
    // windows would overlap in the original are folded into a single hunk.
    fn to_hunks(&self, context_len: usize) -> Vec<Hunk<'a>> {
        fn calc_end(
            context_len: usize,
            text1_len: usize,
            text2_len: usize,
            script1_end: usize,
            script2_end: usize,
        ) -> (usize, usize) {
            let post_context_len = cmp::min(
                context_len,
                cmp::min(
                    text1_len.saturating_sub(script1_end),
                    text2_len.saturating_sub(script2_end),
                ),
            );

            let end1 = script1_end + post_context_len;
            let end2 = script2_end + post_context_len;

            (end1, end2)
        }

        let mut hunks = Vec::new();

        let mut idx = 0;
        while let Some(mut script) = self.edit_script.get(idx) {
            let start1 = script.old.start.saturating_sub(context_len);
            let start2 = script.new.start.saturating_sub(context_len);

            let (mut end1, mut end2) = calc_end(
                context_len,
                self.a_text.len(),
                self.b_text.len(),
                script.old.end,
                script.new.end,
            );

            let mut lines = Vec::new();

            // Pre-context
            for line in self
                .b_text
                .get(start2..script.new.start)
                .into_iter()
                .flatten()
            {
                lines.push(Line::Context(line));
            }

            loop {
                // Delete lines from text1
                for line in self
                    .a_text
                    .get(script.old.start..script.old.end)
                    .into_iter()
                    .flatten()
                {
                    lines.push(Line::Delete(line));
                }

                // Insert lines from text2
                for line in self
                    .b_text
                    .get(script.new.start..script.new.end)
                    .into_iter()
                    .flatten()
                {
                    lines.push(Line::Insert(line));
                }

                if let Some(s) = self.edit_script.get(idx + 1) {
                    // Check to see if we can merge the hunks
                    let start1_next =
                        cmp::min(s.old.start, self.a_text.len() - 1).saturating_sub(context_len);
                    if start1_next < end1 {
                        // Context lines between hunks
                        for (_i1, i2) in
                            (script.old.end..s.old.start).zip(script.new.end..s.new.start)
                        {
                            if let Some(line) = self.b_text.get(i2) {
                                lines.push(Line::Context(line));
                            }
                        }

                        // Calc the new end
                        let (e1, e2) = calc_end(
                            context_len,
                            self.a_text.len(),
                            self.b_text.len(),
                            s.old.end,
                            s.new.end,
                        );

                        end1 = e1;
                        end2 = e2;
                        script = s;
                        idx += 1;
                        continue;
                    }
                }

                break;
            }

            // Post-context
            for line in self.b_text.get(script.new.end..end2).into_iter().flatten() {
                lines.push(Line::Context(line));
            }

            let len1 = end1 - start1;
            let old_range = HunkRange::new(if len1 > 0 { start1 + 1 } else { start1 }, len1);

            let len2 = end2 - start2;
            let new_range = HunkRange::new(if len2 > 0 { start2 + 1 } else { start2 }, len2);

            hunks.push(Hunk::new(old_range, new_range, None, lines));
            idx += 1;
        }

        hunks
    }
}

#[derive(Debug)]
struct EditRange {
    old: ops::Range<usize>,
    new: ops::Range<usize>,
}

impl EditRange {
    fn new(old: ops::Range<usize>, new: ops::Range<usize>) -> Self {
        Self { old, new }
    }
}

fn build_edit_script<T>(solution: &[DiffRange<'_, '_, T>]) -> Vec<EditRange> {
    let mut idx_a = 0;
    let mut idx_b = 0;

    let mut edit_script: Vec<EditRange> = Vec::new();
    let mut script = None;

    for diff in solution {
        match diff {
            DiffRange::Equal(range1, range2) => {
                idx_a += range1.len();
                idx_b += range2.len();
                if let Some(script) = script.take() {
                    edit_script.push(script);
                }
            }
            DiffRange::Delete(range) => {
                match &mut script {
                    Some(s) => s.old.end += range.len(),
                    None => {
                        script = Some(EditRange::new(idx_a..idx_a + range.len(), idx_b..idx_b));
                    }
                }
                idx_a += range.len();
            }
            DiffRange::Insert(range) => {
                match &mut script {
                    Some(s) => s.new.end += range.len(),
                    None => {
                        script = Some(EditRange::new(idx_a..idx_a, idx_b..idx_b + range.len()));
                    }
                }
                idx_b += range.len();
            }
        }
    }

    if let Some(script) = script.take() {
        edit_script.push(script);
    }

    edit_script
}
