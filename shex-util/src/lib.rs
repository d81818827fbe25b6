//! Small iterator and graph helpers used by the lexer, option extractor and
//! matcher: an index-tracking peekable iterator, a run-length grouping
//! helper, and a topological sort.
//!
//! `Peekable` exists here rather than reusing `std::iter::Peekable` because
//! the matcher needs the peeked item's index, not just its value.

use std::collections::HashSet;

/// An iterator adapter that can look at the next item without consuming it,
/// and that remembers how many items have been yielded by [`next`](Iterator::next) so far.
///
/// This differs from [`std::iter::Peekable`] in that it exposes
/// [`Peekable::index`], the count of items already consumed, which the
/// matcher uses to recover the global position of a peeked token.
#[derive(Clone, Debug)]
pub struct Peekable<I: Iterator> {
    iter: I,
    peeked: Option<Option<I::Item>>,
    index: usize,
}

impl<I: Iterator> Peekable<I> {
    pub fn new(iter: I) -> Self {
        Peekable {
            iter,
            peeked: None,
            index: 0,
        }
    }

    /// Returns a reference to the next item without consuming it.
    pub fn peek(&mut self) -> Option<&I::Item> {
        let iter = &mut self.iter;
        self.peeked.get_or_insert_with(|| iter.next()).as_ref()
    }

    /// Returns `true` if there is a next item.
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    /// The number of items already returned by [`next`](Iterator::next).
    ///
    /// Equivalently, the index that the *next* call to `next()` will return,
    /// if any.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<I: Iterator> Iterator for Peekable<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let item = match self.peeked.take() {
            Some(v) => v,
            None => self.iter.next(),
        };
        if item.is_some() {
            self.index += 1;
        }
        item
    }
}

/// Groups consecutive items of `iter` whose `key` values form a run of
/// consecutive integers.
///
/// ```
/// use shex_util::group_continuous;
///
/// let groups = group_continuous([1, 2, 4, 5, 7, 8, 10], |x: &i32| *x as i64);
/// assert_eq!(groups, vec![vec![1, 2], vec![4, 5], vec![7, 8], vec![10]]);
/// ```
pub fn group_continuous<T, F>(iter: impl IntoIterator<Item = T>, mut key: F) -> Vec<Vec<T>>
where
    F: FnMut(&T) -> i64,
{
    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut last_key: Option<i64> = None;
    for item in iter {
        let k = key(&item);
        match last_key {
            Some(prev) if k == prev + 1 => groups.last_mut().unwrap().push(item),
            _ => groups.push(vec![item]),
        }
        last_key = Some(k);
    }
    groups
}

/// Returns the vertices of a DAG in topological order.
///
/// `parents(v)` must return the vertices that have to precede `v` in the
/// result. Vertices are compared by the identity given by `id`; a cycle
/// (a vertex that transitively depends on itself) is reported as `Err`
/// with the offending vertex's id.
pub fn toposort<T, I, F>(graph: &[T], mut id: impl FnMut(&T) -> I, mut parents: F) -> Result<Vec<usize>, I>
where
    I: Eq + std::hash::Hash + Clone,
    F: FnMut(&T) -> Vec<I>,
{
    let ids: Vec<I> = graph.iter().map(&mut id).collect();
    let mut used = HashSet::new();
    let mut result = Vec::with_capacity(graph.len());

    fn visit<I: Eq + std::hash::Hash + Clone>(
        idx: usize,
        ids: &[I],
        parents_of: &[Vec<I>],
        top: &I,
        used: &mut HashSet<usize>,
        result: &mut Vec<usize>,
    ) -> Result<(), I> {
        if used.contains(&idx) {
            return Ok(());
        }
        for parent_id in &parents_of[idx] {
            if parent_id == top {
                return Err(top.clone());
            }
            if let Some(parent_idx) = ids.iter().position(|i| i == parent_id) {
                visit(parent_idx, ids, parents_of, top, used, result)?;
            }
        }
        used.insert(idx);
        result.push(idx);
        Ok(())
    }

    let parents_of: Vec<Vec<I>> = graph.iter().map(&mut parents).collect();
    for (idx, top) in ids.iter().enumerate() {
        visit(idx, &ids, &parents_of, top, &mut used, &mut result)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peekable_tracks_index_and_peek() {
        let mut it = Peekable::new("abc".chars());
        assert_eq!(it.index(), 0);
        assert_eq!(it.peek(), Some(&'a'));
        assert_eq!(it.index(), 0);
        assert_eq!(it.next(), Some('a'));
        assert_eq!(it.index(), 1);
        assert_eq!(it.peek(), Some(&'b'));
        assert_eq!(it.next(), Some('b'));
        assert_eq!(it.next(), Some('c'));
        assert_eq!(it.index(), 3);
        assert_eq!(it.peek(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn group_continuous_splits_on_gaps() {
        let groups = group_continuous(0..5, |x: &i32| *x as i64);
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4]]);

        let empty: Vec<i32> = vec![];
        assert!(group_continuous(empty, |x: &i32| *x as i64).is_empty());
    }

    #[test]
    fn toposort_orders_dependencies_before_dependents() {
        // b depends on a, c depends on b
        let graph = ["a", "b", "c"];
        let order = toposort(
            &graph,
            |v| *v,
            |v| match *v {
                "b" => vec!["a"],
                "c" => vec!["b"],
                _ => vec![],
            },
        )
        .unwrap();
        let positions: Vec<&str> = order.iter().map(|&i| graph[i]).collect();
        assert_eq!(positions, vec!["a", "b", "c"]);
    }

    #[test]
    fn toposort_detects_cycle() {
        let graph = ["a", "b"];
        let err = toposort(
            &graph,
            |v| *v,
            |v| match *v {
                "a" => vec!["b"],
                "b" => vec!["a"],
                _ => vec![],
            },
        );
        assert!(err.is_err());
    }
}
