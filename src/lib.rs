//! Tools for computing, rendering, and selectively reapplying differences
//! between two versions of a text document.
//!
//! Every operation in this crate is a synchronous pure function of its
//! inputs: nothing is cached or shared, so any number of diffs may be
//! computed or applied concurrently without coordination.
//!
//! # Diffing at character granularity
//!
//! [`diff_chars`] produces an ordered list of [`DiffOp`] segments suitable
//! for inline highlighting, and [`render_char_diff`] turns that list into
//! escaped HTML markup.
//!
//! # Diffing at line granularity
//!
//! [`create_patch`] (or [`DiffOptions`] for non-default context widths)
//! produces a [`Patch`]: line-level changes grouped into hunks with
//! surrounding context. A patch serializes to unified-diff text via
//! [`Display`](std::fmt::Display) and parses back with [`Patch::from_str`].
//!
//! [`apply`] reapplies a patch to a base text, and [`apply_partial`]
//! reapplies only an accepted subset of its hunks, so callers can offer
//! per-change review. Both verify each hunk at its recorded position and
//! fail with [`ApplyError::Conflict`] when the base text has drifted,
//! leaving the base untouched.
//!
//! # Conflict previews
//!
//! [`ConflictBlock`] projects the first changed block of a patch as the two
//! sides of a git-style conflict, renders it with marker lines, and parses
//! such text back apart.
//!
//! # Trailing newlines
//!
//! Texts are treated as a sequence of lines each keeping its terminating
//! `\n`. No implicit trailing newline is ever added or assumed; a final
//! line without one is serialized using the `\ No newline at end of file`
//! marker, so `apply(a, &create_patch(a, b))` reproduces `b` byte-for-byte.

mod apply;
mod conflict;
mod diff;
mod patch;
mod range;
mod render;
mod utils;

pub use apply::{ApplyError, apply, apply_partial};
pub use conflict::ConflictBlock;
pub use diff::{DiffOp, DiffOptions, create_patch, diff_chars};
pub use patch::{Hunk, HunkRange, Line, ParsePatchError, Patch, PatchFormatter};
pub use render::{render_char_diff, render_conflict};
