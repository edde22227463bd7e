mod format;
mod parse;

pub use format::PatchFormatter;
pub use parse::ParsePatchError;

use std::{borrow::Cow, fmt, ops};

const NO_NEWLINE_AT_EOF: &str = "\\ No newline at end of file";

/// A set of line-level changes between an original and a modified text,
/// grouped into [`Hunk`]s and tagged with a label for either side.
///
/// The labels identify the two texts for human readers; they carry no other
/// meaning. Hunks are sorted by their position in the original text and
/// never overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch<'a> {
    original: Filename<'a>,
    modified: Filename<'a>,
    hunks: Vec<Hunk<'a>>,
}

impl<'a> Patch<'a> {
    pub(crate) fn new<O, M>(original: O, modified: M, hunks: Vec<Hunk<'a>>) -> Self
    where
        O: Into<Cow<'a, str>>,
        M: Into<Cow<'a, str>>,
    {
        Self {
            original: Filename(original.into()),
            modified: Filename(modified.into()),
            hunks,
        }
    }

    /// Parse a patch from its serialized unified-diff form.
    ///
    /// The `---`/`+++` header lines are optional; when absent the default
    /// labels are used. A malformed header, an unknown line prefix, or a
    /// hunk whose body doesn't match its advertised line counts fails the
    /// whole parse; no partial result is produced.
    pub fn from_str(s: &'a str) -> Result<Patch<'a>, ParsePatchError> {
        parse::parse(s)
    }

    /// The label for the original text
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The label for the modified text
    pub fn modified(&self) -> &str {
        &self.modified
    }

    /// The hunks making up this patch, in order of appearance in the original text
    pub fn hunks(&self) -> &[Hunk<'a>] {
        &self.hunks
    }
}

impl fmt::Display for Patch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PatchFormatter::new().fmt_patch(self))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Filename<'a>(Cow<'a, str>);

impl Filename<'_> {
    const ESCAPED_CHARS: &'static [char] = &['\n', '\t', '\0', '\r', '\"', '\\'];

    fn needs_to_be_escaped(&self) -> bool {
        self.0.contains(Self::ESCAPED_CHARS)
    }
}

impl AsRef<str> for Filename<'_> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ops::Deref for Filename<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Filename<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        if self.needs_to_be_escaped() {
            f.write_char('\"')?;
            for c in self.0.chars() {
                match c {
                    '\n' => f.write_str("\\n")?,
                    '\t' => f.write_str("\\t")?,
                    '\0' => f.write_str("\\0")?,
                    '\r' => f.write_str("\\r")?,
                    '\"' => f.write_str("\\\"")?,
                    '\\' => f.write_str("\\\\")?,
                    c => f.write_char(c)?,
                }
            }
            f.write_char('\"')?;
        } else {
            f.write_str(&self.0)?;
        }

        Ok(())
    }
}

/// A contiguous block of changed lines along with the unchanged context
/// anchoring it in both texts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk<'a> {
    old_range: HunkRange,
    new_range: HunkRange,

    function_context: Option<&'a str>,

    lines: Vec<Line<'a>>,
}

fn hunk_lines_count(lines: &[Line<'_>]) -> (usize, usize) {
    lines.iter().fold((0, 0), |count, line| match line {
        Line::Context(_) => (count.0 + 1, count.1 + 1),
        Line::Delete(_) => (count.0 + 1, count.1),
        Line::Insert(_) => (count.0, count.1 + 1),
    })
}

impl<'a> Hunk<'a> {
    pub(crate) fn new(
        old_range: HunkRange,
        new_range: HunkRange,
        function_context: Option<&'a str>,
        lines: Vec<Line<'a>>,
    ) -> Self {
        let (old_count, new_count) = hunk_lines_count(&lines);

        assert_eq!(old_range.len, old_count);
        assert_eq!(new_range.len, new_count);

        Self {
            old_range,
            new_range,
            function_context,
            lines,
        }
    }

    /// The range of lines this hunk covers in the original text
    pub fn old_range(&self) -> HunkRange {
        self.old_range
    }

    /// The range of lines this hunk covers in the modified text
    pub fn new_range(&self) -> HunkRange {
        self.new_range
    }

    pub fn function_context(&self) -> Option<&str> {
        self.function_context.as_deref()
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }
}

/// The range of lines a hunk covers in one of the two texts.
///
/// `start` is 1-based. A zero-length range marks a pure insertion point and
/// its `start` is instead the 0-based number of lines preceding it, matching
/// the unified-diff convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HunkRange {
    /// The starting line number of a hunk
    start: usize,
    /// The hunk size (number of lines)
    len: usize,
}

impl HunkRange {
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn range(&self) -> ops::Range<usize> {
        self.start..self.end()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for HunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if self.len != 1 {
            write!(f, ",{}", self.len)?;
        }
        Ok(())
    }
}

/// A line of a hunk. Lines keep their terminating `\n`; only the final line
/// of a text may lack one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// A line providing context in the diff which is present in both the old and new file
    Context(&'a str),
    /// A line deleted from the old file
    Delete(&'a str),
    /// A line inserted to the new file
    Insert(&'a str),
}
