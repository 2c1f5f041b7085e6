//! Line splitting: fit one styled line into an identifier slot plus overflow.
//!
//! A sidebar row is transported as a short identifier (at most
//! [`IDENTIFIER_BUDGET`] characters) followed by an overflow segment. The
//! splitter cuts a [`StyledText`] at the identifier budget and carries the
//! style in effect at the cut into the overflow, so colours and decorations
//! continue across the boundary.
//!
//! # Algorithm
//!
//! 1. If the plain text fits the identifier budget, return it unchanged.
//! 2. Flatten the tree into runs with fully-resolved styles (pre-order).
//! 3. Walk the runs until the budget is reached, cutting mid-run if needed.
//! 4. Build the head from everything before the cut, the tail from the rest.
//! 5. The tail's root style is the style of the last character before the cut;
//!    the tail's runs keep their own styles, which win on conflict.
//!
//! Lengths are counted in extended grapheme clusters, so a cut never lands
//! inside a user-perceived character.

use super::style::Style;
use super::styled::{Run, StyledText};
use unicode_segmentation::UnicodeSegmentation;

/// Maximum characters in the identifier (head) segment.
pub const IDENTIFIER_BUDGET: usize = 16;

/// Maximum characters in one transport segment.
pub const SEGMENT_BUDGET: usize = 128;

/// Maximum characters kept across head and tail together.
pub const TOTAL_BUDGET: usize = SEGMENT_BUDGET * 2;

/// Result of splitting a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    /// Identifier-fitting prefix.
    pub head: StyledText,
    /// Overflow suffix, empty when no split was needed.
    pub tail: StyledText,
}

impl SplitResult {
    /// Whether the line needed no split.
    pub fn is_unsplit(&self) -> bool {
        self.tail.is_blank()
    }
}

/// Where the cut falls: run index and grapheme offset within that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cut {
    run: usize,
    offset: usize,
}

/// Split `text` into an identifier-sized head and an overflow tail.
///
/// Deterministic: the same input always produces the same output.
pub fn split(text: &StyledText) -> SplitResult {
    let total = text.plain_len();
    if total <= IDENTIFIER_BUDGET {
        return SplitResult {
            head: text.clone(),
            tail: StyledText::empty(),
        };
    }

    let runs = text.runs();
    let cut = find_cut(&runs, IDENTIFIER_BUDGET);

    let mut head_runs: Vec<Run> = runs[..cut.run].to_vec();
    let mut tail_runs: Vec<Run> = Vec::new();

    if cut.offset > 0 {
        let run = &runs[cut.run];
        let (left, right) = split_at_grapheme(&run.text, cut.offset);
        head_runs.push(Run {
            text: left.to_owned(),
            style: run.style,
        });
        if !right.is_empty() {
            tail_runs.push(Run {
                text: right.to_owned(),
                style: run.style,
            });
        }
        tail_runs.extend_from_slice(&runs[cut.run + 1..]);
    } else {
        tail_runs.extend_from_slice(&runs[cut.run..]);
    }

    // Style of the character just before the cut.
    let carried = head_runs.last().map_or(Style::EMPTY, |run| run.style);

    truncate_runs(&mut tail_runs, TOTAL_BUDGET - IDENTIFIER_BUDGET);

    SplitResult {
        head: build(Style::EMPTY, head_runs),
        tail: build(carried, tail_runs),
    }
}

/// Locate the cut after `budget` graphemes.
///
/// Only called when the runs hold more than `budget` graphemes.
fn find_cut(runs: &[Run], budget: usize) -> Cut {
    let mut count = 0;
    for (index, run) in runs.iter().enumerate() {
        let len = run.len();
        if count + len <= budget {
            count += len;
            if count == budget {
                return Cut {
                    run: index + 1,
                    offset: 0,
                };
            }
        } else {
            return Cut {
                run: index,
                offset: budget - count,
            };
        }
    }
    Cut {
        run: runs.len(),
        offset: 0,
    }
}

/// Split a string after `graphemes` grapheme clusters.
fn split_at_grapheme(text: &str, graphemes: usize) -> (&str, &str) {
    let byte = text
        .grapheme_indices(true)
        .nth(graphemes)
        .map_or(text.len(), |(index, _)| index);
    text.split_at(byte)
}

/// Drop content beyond `budget` graphemes.
fn truncate_runs(runs: &mut Vec<Run>, budget: usize) {
    let mut remaining = budget;
    let mut keep = 0;
    for run in runs.iter_mut() {
        if remaining == 0 {
            break;
        }
        let len = run.len();
        if len > remaining {
            let (left, _) = split_at_grapheme(&run.text, remaining);
            run.text = left.to_owned();
            remaining = 0;
        } else {
            remaining -= len;
        }
        keep += 1;
    }
    runs.truncate(keep);
}

/// A single run becomes a leaf under an empty root; otherwise a container.
fn build(root: Style, runs: Vec<Run>) -> StyledText {
    if runs.is_empty() {
        return StyledText::empty();
    }
    let mut children: Vec<StyledText> = runs
        .into_iter()
        .map(|run| StyledText::styled(run.text, run.style))
        .collect();
    if children.len() == 1 && root.is_empty() {
        return children.pop().unwrap_or_default();
    }
    StyledText::container(root, children)
}
