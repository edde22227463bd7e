use super::*;
use crate::range::{DiffRange, Range};

fn assemble_original(diff: &[DiffOp]) -> String {
    diff.iter()
        .filter_map(|op| match op {
            DiffOp::Equal(text) | DiffOp::Delete(text) => Some(text.as_str()),
            DiffOp::Insert(_) => None,
        })
        .collect()
}

fn assemble_modified(diff: &[DiffOp]) -> String {
    diff.iter()
        .filter_map(|op| match op {
            DiffOp::Equal(text) | DiffOp::Insert(text) => Some(text.as_str()),
            DiffOp::Delete(_) => None,
        })
        .collect()
}

#[test]
fn diff_chars_classic_myers_case() {
    let solution = diff_chars("ABCABBA", "CBABAC");
    assert_eq!(
        solution,
        vec![
            DiffOp::Delete("AB".into()),
            DiffOp::Equal("C".into()),
            DiffOp::Delete("A".into()),
            DiffOp::Equal("B".into()),
            DiffOp::Insert("A".into()),
            DiffOp::Equal("BA".into()),
            DiffOp::Insert("C".into()),
        ]
    );
}

#[test]
fn diff_chars_sparse_overlap() {
    let solution = diff_chars("abgdef", "gh");
    assert_eq!(
        solution,
        vec![
            DiffOp::Delete("ab".into()),
            DiffOp::Equal("g".into()),
            DiffOp::Delete("def".into()),
            DiffOp::Insert("h".into()),
        ]
    );
}

#[test]
fn diff_chars_interleaved_edits() {
    let solution = diff_chars("bat", "map");
    assert_eq!(
        solution,
        vec![
            DiffOp::Delete("b".into()),
            DiffOp::Insert("m".into()),
            DiffOp::Equal("a".into()),
            DiffOp::Delete("t".into()),
            DiffOp::Insert("p".into()),
        ]
    );
}

#[test]
fn diff_chars_disjoint_texts() {
    let solution = diff_chars("abc", "def");
    assert_eq!(
        solution,
        vec![DiffOp::Delete("abc".into()), DiffOp::Insert("def".into())]
    );
}

#[test]
fn diff_chars_compacts_shifted_insertions() {
    let solution = diff_chars("ACZBDZ", "ACBCBDEFD");
    assert_eq!(
        solution,
        vec![
            DiffOp::Equal("AC".into()),
            DiffOp::Delete("Z".into()),
            DiffOp::Equal("B".into()),
            DiffOp::Insert("CBDEF".into()),
            DiffOp::Equal("D".into()),
            DiffOp::Delete("Z".into()),
        ]
    );
}

#[test]
fn diff_chars_aligns_to_word_boundaries() {
    let solution = diff_chars("The cat sat.", "The dog sat.");
    assert_eq!(
        solution,
        vec![
            DiffOp::Equal("The ".into()),
            DiffOp::Delete("cat".into()),
            DiffOp::Insert("dog".into()),
            DiffOp::Equal(" sat.".into()),
        ]
    );
}

#[test]
fn diff_chars_never_splits_scalar_values() {
    // Unicode snowman and unicode comet share their first two UTF-8 bytes; a
    // byte-based diff would report a partial-character overlap.
    let snowman = "\u{2603}";
    let comet = "\u{2604}";
    assert_eq!(snowman.as_bytes()[..2], comet.as_bytes()[..2]);

    let solution = diff_chars(snowman, comet);
    assert_eq!(
        solution,
        vec![
            DiffOp::Delete(snowman.into()),
            DiffOp::Insert(comet.into())
        ]
    );
}

#[test]
fn diff_chars_empty_inputs() {
    assert_eq!(diff_chars("", ""), vec![]);
    assert_eq!(diff_chars("", "ab"), vec![DiffOp::Insert("ab".into())]);
    assert_eq!(diff_chars("ab", ""), vec![DiffOp::Delete("ab".into())]);
}

#[test]
fn diff_chars_reassembles_both_inputs() {
    let cases = [
        ("ABCABBA", "CBABAC"),
        ("The cat sat.", "The dog sat."),
        ("", "anything"),
        ("multi\nline\ninput\n", "multi\nline edited\ninput\n"),
        ("caf\u{e9} au lait", "caf\u{e9} cr\u{e8}me"),
    ];

    for (original, modified) in cases {
        let diff = diff_chars(original, modified);
        assert_eq!(assemble_original(&diff), original);
        assert_eq!(assemble_modified(&diff), modified);
    }
}

#[test]
fn compact_shifts_and_merges_ranges() {
    let a = "ACZBDZ".as_bytes();
    let b = "ACBCBDEFD".as_bytes();

    let mut solution = vec![
        DiffRange::Equal(Range::new(a, ..2), Range::new(b, ..2)),
        DiffRange::Delete(Range::new(a, 2..3)),
        DiffRange::Insert(Range::new(b, 2..4)),
        DiffRange::Equal(Range::new(a, 3..5), Range::new(b, 4..6)),
        DiffRange::Delete(Range::new(a, 5..6)),
        DiffRange::Insert(Range::new(b, 6..)),
    ];

    compact(&mut solution);

    let compacted: Vec<(char, &[u8])> = solution
        .iter()
        .map(|diff| match diff {
            DiffRange::Equal(range, _) => ('=', range.as_slice()),
            DiffRange::Delete(range) => ('-', range.as_slice()),
            DiffRange::Insert(range) => ('+', range.as_slice()),
        })
        .collect();

    assert_eq!(
        compacted,
        vec![
            ('=', &b"AC"[..]),
            ('-', &b"Z"[..]),
            ('=', &b"B"[..]),
            ('+', &b"CBDEF"[..]),
            ('=', &b"D"[..]),
            ('-', &b"Z"[..]),
        ]
    );
}

#[test]
fn patch_single_line_replacement() {
    let mut options = DiffOptions::new();
    options.set_context_len(1);
    let patch = options.create_patch("a\nb\nc\n", "a\nB\nc\n");

    assert_eq!(patch.hunks().len(), 1);
    let hunk = &patch.hunks()[0];
    assert_eq!(hunk.old_range().start(), 1);
    assert_eq!(hunk.old_range().len(), 3);
    assert_eq!(hunk.new_range().start(), 1);
    assert_eq!(hunk.new_range().len(), 3);
    assert_eq!(
        hunk.lines(),
        [
            Line::Context("a\n"),
            Line::Delete("b\n"),
            Line::Insert("B\n"),
            Line::Context("c\n"),
        ]
    );
}

#[test]
fn patch_merges_hunks_with_overlapping_context() {
    // Changes three lines apart share context at the default width, so they
    // fold into one hunk; at width one they stay separate.
    let original = "a\nb\nc\nd\ne\nf\ng\nh\n";
    let modified = "a\nB\nc\nd\ne\nF\ng\nh\n";

    let patch = create_patch(original, modified);
    assert_eq!(patch.hunks().len(), 1);

    let mut options = DiffOptions::new();
    options.set_context_len(1);
    let patch = options.create_patch(original, modified);
    assert_eq!(patch.hunks().len(), 2);
}

#[test]
fn patch_sample() {
    let lao = "\
The Way that can be told of is not the eternal Way;
The name that can be named is not the eternal name.
The Nameless is the origin of Heaven and Earth;
The Named is the mother of all things.
Therefore let there always be non-being,
  so we may see their subtlety,
And let there always be being,
  so we may see their outcome.
The two are the same,
But after they are produced,
  they have different names.
";

    let tzu = "\
The Nameless is the origin of Heaven and Earth;
The named is the mother of all things.

Therefore let there always be non-being,
  so we may see their subtlety,
And let there always be being,
  so we may see their outcome.
The two are the same,
But after they are produced,
  they have different names.
They both may be called deep and profound.
Deeper and more profound,
The door of all subtleties!
";

    let expected = "\
--- original
+++ modified
@@ -1,7 +1,6 @@
-The Way that can be told of is not the eternal Way;
-The name that can be named is not the eternal name.
 The Nameless is the origin of Heaven and Earth;
-The Named is the mother of all things.
+The named is the mother of all things.
+
 Therefore let there always be non-being,
   so we may see their subtlety,
 And let there always be being,
@@ -9,3 +8,6 @@
 The two are the same,
 But after they are produced,
   they have different names.
+They both may be called deep and profound.
+Deeper and more profound,
+The door of all subtleties!
";
    assert_eq!(create_patch(lao, tzu).to_string(), expected);

    let expected = "\
--- original
+++ modified
@@ -1,2 +0,0 @@
-The Way that can be told of is not the eternal Way;
-The name that can be named is not the eternal name.
@@ -4 +2,2 @@
-The Named is the mother of all things.
+The named is the mother of all things.
+
@@ -11,0 +11,3 @@
+They both may be called deep and profound.
+Deeper and more profound,
+The door of all subtleties!
";
    let mut options = DiffOptions::new();
    options.set_context_len(0);
    assert_eq!(options.create_patch(lao, tzu).to_string(), expected);

    let expected = "\
--- original
+++ modified
@@ -1,5 +1,4 @@
-The Way that can be told of is not the eternal Way;
-The name that can be named is not the eternal name.
 The Nameless is the origin of Heaven and Earth;
-The Named is the mother of all things.
+The named is the mother of all things.
+
 Therefore let there always be non-being,
@@ -11 +10,4 @@
   they have different names.
+They both may be called deep and profound.
+Deeper and more profound,
+The door of all subtleties!
";
    let mut options = DiffOptions::new();
    options.set_context_len(1);
    assert_eq!(options.create_patch(lao, tzu).to_string(), expected);
}

#[test]
fn patch_missing_trailing_newline_is_marked() {
    let patch = create_patch("a\nb\nc", "a\nB\nc");
    let expected = "\
--- original
+++ modified
@@ -1,3 +1,3 @@
 a
-b
+B
 c
\\ No newline at end of file
";
    assert_eq!(patch.to_string(), expected);
}

#[test]
fn patch_custom_labels() {
    let mut options = DiffOptions::new();
    options
        .set_original_label("before.txt")
        .set_modified_label("after.txt");
    let patch = options.create_patch("a\n", "b\n");

    assert_eq!(patch.original(), "before.txt");
    assert_eq!(patch.modified(), "after.txt");
    assert!(patch.to_string().starts_with("--- before.txt\n+++ after.txt\n"));
}

#[test]
fn patch_identical_inputs_has_no_hunks() {
    let patch = create_patch("same\ntext\n", "same\ntext\n");
    assert!(patch.hunks().is_empty());
}
