//! Myers' divide-and-conquer diff algorithm.
//!
//! "An O(ND) Difference Algorithm and Its Variations" (Myers, 1986), using
//! the linear-space refinement: find the middle snake of an optimal path,
//! then recurse on the two halves. A record is only ever marked as changed,
//! so the result is a pair of changed-flag vectors that a final walk turns
//! into an edit script.

use crate::range::{DiffRange, Range};
use std::ops::{Index, IndexMut};

/// `V` holds the endpoints of the furthest reaching D-paths, indexed by
/// diagonal `k`. For an endpoint `(x, y)` only `x` is stored because
/// `y = x - k`. Since `k` can be negative, `V` wraps a `Vec` together with
/// an offset that maps `k` back to a non-negative index.
#[derive(Debug, Clone)]
struct V {
    offset: isize,
    v: Vec<usize>,
}

impl V {
    fn new(size: usize, offset: usize) -> Self {
        Self {
            offset: offset as isize,
            v: vec![0; size],
        }
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl Index<isize> for V {
    type Output = usize;

    fn index(&self, index: isize) -> &Self::Output {
        &self.v[(index + self.offset) as usize]
    }
}

impl IndexMut<isize> for V {
    fn index_mut(&mut self, index: isize) -> &mut Self::Output {
        &mut self.v[(index + self.offset) as usize]
    }
}

/// A run of diagonal edges in the edit graph, possibly of length zero.
#[derive(Debug)]
struct Snake {
    x_start: usize,
    y_start: usize,
}

/// A slice of records paired with their changed flags.
struct Records<'a, T> {
    inner: &'a [T],
    changed: &'a mut [bool],
}

impl<'a, T> Records<'a, T> {
    fn new(inner: &'a [T], changed: &'a mut [bool]) -> Self {
        debug_assert!(inner.len() == changed.len());
        Records { inner, changed }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn slice(&mut self, begin: usize, end: usize) -> Records<'_, T> {
        Records::new(&self.inner[begin..end], &mut self.changed[begin..end])
    }

    fn split_at_mut(&mut self, mid: usize) -> (Records<'_, T>, Records<'_, T>) {
        let (left_inner, right_inner) = self.inner.split_at(mid);
        let (left_changed, right_changed) = self.changed.split_at_mut(mid);

        (
            Records::new(left_inner, left_changed),
            Records::new(right_inner, right_changed),
        )
    }
}

// The divide step: run the basic algorithm simultaneously from the top-left
// and bottom-right corner until the furthest reaching forward and reverse
// paths overlap, which yields the middle snake of an optimal D-path.
fn find_middle_snake<T: PartialEq>(old: &[T], new: &[T], vf: &mut V, vb: &mut V) -> Snake {
    let n = old.len();
    let m = new.len();

    let max = n + m;

    // By Lemma 1 in the paper, the optimal edit script length is odd or even
    // as `delta` is odd or even.
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;

    debug_assert!(vf.len() >= max + 3);
    debug_assert!(vb.len() >= max + 3);

    // The initial point at (0, -1)
    vf[1] = 0;
    // The initial point at (N, M+1)
    vb[1] = 0;

    // We only need to explore ceil(D/2) + 1
    let d_max = ((max + 1) / 2 + 1) as isize;
    for d in 0..d_max {
        // Forward path
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                vf[k + 1]
            } else {
                vf[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;

            // The coordinate of the start of a snake
            let (x0, y0) = (x, y);
            // Slide down the diagonal for as long as the records match
            while x < n && y < m && old[x] == new[y] {
                x += 1;
                y += 1;
            }

            // This is the new best x value
            vf[k] = x;

            // Only check for overlap from the forward search when delta is
            // odd and the reciprocal k line has been reached from the other
            // direction.
            if odd && (k - delta).abs() <= (d - 1) && vf[k] + vb[-(k - delta)] >= n {
                return Snake {
                    x_start: x0,
                    y_start: y0,
                };
            }
        }

        // Backward path
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                vb[k + 1]
            } else {
                vb[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;

            while x < n && y < m && old[n - x - 1] == new[m - y - 1] {
                x += 1;
                y += 1;
            }

            // This is the new best x value
            vb[k] = x;

            if !odd && (k - delta).abs() <= d && vb[k] + vf[-(k - delta)] >= n {
                return Snake {
                    x_start: n - x,
                    y_start: m - y,
                };
            }
        }
    }

    unreachable!("unable to find a middle snake");
}

fn conquer<T: PartialEq>(mut old: Records<'_, T>, mut new: Records<'_, T>, vf: &mut V, vb: &mut V) {
    let mut start_old = 0;
    let mut start_new = 0;
    let mut end_old = old.len();
    let mut end_new = new.len();

    // Strip any common prefix and suffix before splitting further; they can
    // never be part of an edit.
    while start_old < end_old
        && start_new < end_new
        && old.inner[start_old] == new.inner[start_new]
    {
        start_old += 1;
        start_new += 1;
    }
    while start_old < end_old
        && start_new < end_new
        && old.inner[end_old - 1] == new.inner[end_new - 1]
    {
        end_old -= 1;
        end_new -= 1;
    }

    let mut old = old.slice(start_old, end_old);
    let mut new = new.slice(start_new, end_new);

    if old.is_empty() {
        for changed in new.changed {
            *changed = true;
        }
    } else if new.is_empty() {
        for changed in old.changed {
            *changed = true;
        }
    } else {
        let snake = find_middle_snake(old.inner, new.inner, vf, vb);

        let (old_a, old_b) = old.split_at_mut(snake.x_start);
        let (new_a, new_b) = new.split_at_mut(snake.y_start);

        conquer(old_a, new_a, vf, vb);
        conquer(old_b, new_b, vf, vb);
    }
}

fn do_diff<T: PartialEq>(old: &[T], new: &[T]) -> (Vec<bool>, Vec<bool>) {
    let mut old_changed = vec![false; old.len()];
    let old_recs = Records::new(old, &mut old_changed);
    let mut new_changed = vec![false; new.len()];
    let new_recs = Records::new(new, &mut new_changed);

    // The arrays that hold the 'best possible x values' in search from:
    // `vf`: top left to bottom right
    // `vb`: bottom right to top left
    let max = old.len() + new.len();
    let mut vf = V::new(max + 3, new.len() + 1);
    let mut vb = V::new(max + 3, new.len() + 1);

    conquer(old_recs, new_recs, &mut vf, &mut vb);

    (old_changed, new_changed)
}

/// Diff two sequences, returning the edit script as a list of ranges.
///
/// Maximal runs are emitted in old-then-new order: at any point where both a
/// deletion and an insertion begin, the deletion comes first.
pub fn diff<'a, 'b, T: PartialEq>(old: &'a [T], new: &'b [T]) -> Vec<DiffRange<'a, 'b, T>> {
    let (old_changed, new_changed) = do_diff(old, new);

    let mut solution = Vec::new();
    let mut idx_old = 0;
    let mut idx_new = 0;

    while idx_old < old.len() || idx_new < new.len() {
        if idx_old < old.len() && old_changed[idx_old] {
            let start = idx_old;
            while idx_old < old.len() && old_changed[idx_old] {
                idx_old += 1;
            }
            solution.push(DiffRange::Delete(Range::new(old, start..idx_old)));
        } else if idx_new < new.len() && new_changed[idx_new] {
            let start = idx_new;
            while idx_new < new.len() && new_changed[idx_new] {
                idx_new += 1;
            }
            solution.push(DiffRange::Insert(Range::new(new, start..idx_new)));
        } else {
            let (start_old, start_new) = (idx_old, idx_new);
            while idx_old < old.len()
                && idx_new < new.len()
                && !old_changed[idx_old]
                && !new_changed[idx_new]
            {
                idx_old += 1;
                idx_new += 1;
            }
            solution.push(DiffRange::Equal(
                Range::new(old, start_old..idx_old),
                Range::new(new, start_new..idx_new),
            ));
        }
    }

    solution
}
