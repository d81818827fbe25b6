//! Finalization (§4.M.d): marking whatever the visit left uncovered,
//! merging adjacent equal-text runs, and filling in the literal matched
//! text for every span.
//!
//! Spans don't need to arrive in source order — each group is sorted by
//! `start` here before anything else runs, which is what lets
//! [`crate::visit`] emit a nested command's spans (say) before the
//! terminator that closes it without any extra bookkeeping.

use shex_util::group_continuous;

use crate::result::MatchResult;
use crate::state::MatcherState;

pub fn finalize(state: MatcherState, input: &str) -> Vec<crate::result::MatchGroup> {
    let MatcherState { mut groups, mut next_index, .. } = state;

    mark_unparsed(&mut groups, input, &mut next_index);
    for group in &mut groups {
        group.results.sort_by_key(|r| r.start);
        merge_adjacent(&mut group.results);
        for result in &mut group.results {
            result.matched = input[result.start..result.end].to_string();
        }
    }
    groups
}

/// Marks every input byte not already covered by some span. Whitespace
/// bytes are considered covered without needing a span of their own. A
/// `#` starting an otherwise-uncovered run that reaches the end of input
/// is folded into a single comment span instead of one unknown span per
/// character (the lexer already drops `#...` from the token stream
/// entirely, so without this pass it would be pure gap).
fn mark_unparsed(groups: &mut [crate::result::MatchGroup], input: &str, next_index: &mut usize) {
    let len = input.len();
    let mut covered = vec![false; len];
    for group in groups.iter() {
        for result in &group.results {
            for byte in covered.iter_mut().take(result.end.min(len)).skip(result.start) {
                *byte = true;
            }
        }
    }
    for (i, byte) in covered.iter_mut().enumerate() {
        if input.as_bytes()[i].is_ascii_whitespace() {
            *byte = true;
        }
    }

    let uncovered: Vec<usize> = (0..len).filter(|&i| !covered[i]).collect();
    if uncovered.is_empty() {
        return;
    }
    let runs = group_continuous(uncovered, |i| *i as i64);

    let shell = &mut groups[0].results;
    for run in runs {
        let start = *run.first().unwrap();
        let end = *run.last().unwrap() + 1;
        if input.as_bytes()[start] == b'#' && end == len {
            let index = *next_index;
            *next_index += 1;
            shell.push(MatchResult {
                start,
                end,
                text: Some(shex_help::COMMENT.to_string()),
                matched: String::new(),
                index,
            });
        } else {
            for &pos in &run {
                let index = *next_index;
                *next_index += 1;
                shell.push(MatchResult {
                    start: pos,
                    end: pos + 1,
                    text: None,
                    matched: String::new(),
                    index,
                });
            }
        }
    }
}

/// Collapses consecutive equal-text spans into one, e.g. the three `-v`
/// spans in `foo -v -v -v` (§4.M.d rule 2). Spans must already be sorted
/// by `start`; "consecutive" here means adjacent in that sorted order,
/// not contiguous in byte position — whitespace between them is fine.
fn merge_adjacent(results: &mut Vec<MatchResult>) {
    let taken = std::mem::take(results);
    let mut iter = taken.into_iter();
    let Some(mut current) = iter.next() else { return };
    for next in iter {
        if next.text == current.text && next.index == current.index + 1 {
            current.end = next.end;
            current.index = next.index;
        } else {
            results.push(current);
            current = next;
        }
    }
    results.push(current);
}
