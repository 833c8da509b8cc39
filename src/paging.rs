//! Client-side accumulation of cursor-paginated collections
//!
//! A list screen shows one logical list while the server delivers it page by
//! page. `Accumulator` holds every edge fetched so far plus the page info of
//! the most recent page; the next fetch uses `next_cursor()` as its `after`
//! variable.

use crate::graphql::{Connection, Edge, PageInfo};

/// Stable row identity for list rendering
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Every page fetched so far for one list screen
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator<T> {
    edges: Vec<Edge<T>>,
    page_info: PageInfo,
}

impl<T> Accumulator<T> {
    /// Seed the accumulator with the first page
    pub fn initialize(first_page: Connection<T>) -> Self {
        Self {
            edges: first_page.edges,
            page_info: first_page.page_info,
        }
    }

    /// Append the next page.
    ///
    /// Items are appended in server order and `page_info` is replaced
    /// wholesale. A page without edges leaves the state untouched, including
    /// its page info.
    pub fn load_more(mut self, next_page: Connection<T>) -> Self {
        if next_page.edges.is_empty() {
            return self;
        }
        self.edges.extend(next_page.edges);
        self.page_info = next_page.page_info;
        self
    }

    pub fn can_load_more(&self) -> bool {
        self.page_info.has_next_page
    }

    /// Cursor to pass as `after` when fetching the next page
    pub fn next_cursor(&self) -> Option<&str> {
        self.page_info.end_cursor.as_deref()
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.edges.get(index).map(|edge| &edge.node)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<T: Keyed> Accumulator<T> {
    /// Row keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes().map(Keyed::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str);

    impl Keyed for Row {
        fn key(&self) -> &str {
            self.0
        }
    }

    fn page(ids: &[&'static str], page_info: PageInfo) -> Connection<Row> {
        Connection::new(ids.iter().map(|id| Row(id)).collect(), page_info)
    }

    #[test]
    fn test_initialize_then_load_more() {
        let first = page(&["A", "B"], PageInfo::more("c1"));
        let second = page(&["C"], PageInfo::last(Some("c2")));

        let state = Accumulator::initialize(first);
        assert!(state.can_load_more());
        assert_eq!(state.next_cursor(), Some("c1"));

        let state = state.load_more(second);
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(state.page_info(), &PageInfo::last(Some("c2")));
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_empty_page_is_identity() {
        let state = Accumulator::initialize(page(&["A"], PageInfo::more("c1")));
        let before = state.clone();

        let state = state.load_more(page(&[], PageInfo::last(Some("c9"))));
        assert_eq!(state, before);
        assert!(state.can_load_more());
    }

    #[test]
    fn test_sequence_of_loads_concatenates_pages() {
        let pages = vec![
            page(&["A", "B"], PageInfo::more("c1")),
            page(&["C", "D"], PageInfo::more("c2")),
            page(&["E"], PageInfo::more("c3")),
            page(&["F", "G", "H"], PageInfo::last(Some("c4"))),
        ];

        let mut iter = pages.into_iter();
        let mut state = Accumulator::initialize(iter.next().unwrap());
        for next in iter {
            state = state.load_more(next);
        }

        assert_eq!(
            state.keys().collect::<Vec<_>>(),
            vec!["A", "B", "C", "D", "E", "F", "G", "H"]
        );
        assert_eq!(state.next_cursor(), Some("c4"));
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_duplicates_across_pages_are_kept() {
        let state = Accumulator::initialize(page(&["A", "B"], PageInfo::more("c1")))
            .load_more(page(&["B", "C"], PageInfo::last(Some("c2"))));
        assert_eq!(state.len(), 4);
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["A", "B", "B", "C"]);
    }

    #[test]
    fn test_empty_first_page() {
        let state = Accumulator::initialize(page(&[], PageInfo::last(None)));
        assert!(state.is_empty());
        assert!(!state.can_load_more());
        assert_eq!(state.next_cursor(), None);
    }
}
