//! Rows and the row arena.
//!
//! The host supplies a forest of [`TreeRow`]s. The engine flattens it once
//! into a [`RowArena`]: a `Vec` of [`Row`]s in parent-before-children order,
//! with parent and child links stored as arena indices. Every pipeline stage
//! works on index views over the arena; records are never cloned.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use gridwork_core::logging::targets;
use serde::{Deserialize, Serialize};

/// Stable identity of a row.
///
/// By default this is the row's index path in the supplied forest (`"0"`,
/// `"0.1"`, `"0.1.2"`). Hosts that replace data and want selection and
/// expansion to follow their records supply their own id function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for RowId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Function deriving a row id from a record.
pub type RowIdFn<T> = Arc<dyn Fn(&T) -> RowId + Send + Sync>;

/// A record together with its child records, as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow<T> {
    /// The application record.
    pub data: T,
    /// Child records, in display order.
    pub sub_rows: Vec<TreeRow<T>>,
}

impl<T> TreeRow<T> {
    /// A row without children.
    pub fn new(data: T) -> Self {
        Self {
            data,
            sub_rows: Vec::new(),
        }
    }

    /// Sets the children of this row.
    pub fn with_sub_rows(mut self, sub_rows: impl IntoIterator<Item = TreeRow<T>>) -> Self {
        self.sub_rows = sub_rows.into_iter().collect();
        self
    }
}

impl<T> From<T> for TreeRow<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

/// A row in the arena.
#[derive(Debug, Clone)]
pub struct Row<T> {
    id: RowId,
    index: usize,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    data: T,
}

impl<T> Row<T> {
    /// The row's identity.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Position in the arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Nesting depth, 0 for top-level rows.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Arena index of the parent row.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Arena indices of the child rows, in supplied order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Returns `true` if the row has children.
    pub fn can_expand(&self) -> bool {
        !self.children.is_empty()
    }

    /// The application record.
    pub fn data(&self) -> &T {
        &self.data
    }
}

/// Flat storage for a row forest.
#[derive(Debug, Clone)]
pub struct RowArena<T> {
    rows: Vec<Row<T>>,
    roots: Vec<usize>,
    by_id: HashMap<RowId, usize>,
}

impl<T> Default for RowArena<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            roots: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<T> RowArena<T> {
    /// Flattens a forest, assigning index-path ids.
    pub fn from_forest(forest: Vec<TreeRow<T>>) -> Self {
        Self::build(forest, None)
    }

    /// Flattens a forest, assigning ids with the given function.
    ///
    /// A duplicate id falls back to the row's index path.
    pub fn from_forest_with_ids(forest: Vec<TreeRow<T>>, id_fn: &RowIdFn<T>) -> Self {
        Self::build(forest, Some(id_fn))
    }

    fn build(forest: Vec<TreeRow<T>>, id_fn: Option<&RowIdFn<T>>) -> Self {
        let mut arena = Self::default();
        for (position, tree) in forest.into_iter().enumerate() {
            let index = arena.insert(tree, None, position.to_string(), 0, id_fn);
            arena.roots.push(index);
        }
        arena
    }

    fn insert(
        &mut self,
        tree: TreeRow<T>,
        parent: Option<usize>,
        path: String,
        depth: usize,
        id_fn: Option<&RowIdFn<T>>,
    ) -> usize {
        let TreeRow { data, sub_rows } = tree;
        let index = self.rows.len();

        let mut id = id_fn.map_or_else(|| RowId::new(path.clone()), |f| f(&data));
        if self.by_id.contains_key(&id) {
            tracing::warn!(target: targets::PIPELINE, %id, %path, "duplicate row id, using index path");
            id = RowId::new(path.clone());
        }
        self.by_id.insert(id.clone(), index);

        self.rows.push(Row {
            id,
            index,
            depth,
            parent,
            children: Vec::new(),
            data,
        });

        for (position, child) in sub_rows.into_iter().enumerate() {
            let child_path = format!("{path}.{position}");
            let child_index = self.insert(child, Some(index), child_path, depth + 1, id_fn);
            self.rows[index].children.push(child_index);
        }

        index
    }

    /// Number of rows, descendants included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Arena indices of the top-level rows.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// The row at an arena index.
    pub fn get(&self, index: usize) -> Option<&Row<T>> {
        self.rows.get(index)
    }

    /// Looks up a row by id.
    pub fn by_id(&self, id: &str) -> Option<&Row<T>> {
        self.index_of(id).and_then(|index| self.rows.get(index))
    }

    /// Arena index of the row with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Returns `true` if a row with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All rows in parent-before-children order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row<T>> {
        self.rows.iter()
    }
}

impl<T> std::ops::Index<usize> for RowArena<T> {
    type Output = Row<T>;

    fn index(&self, index: usize) -> &Row<T> {
        &self.rows[index]
    }
}

impl<'a, T> IntoIterator for &'a RowArena<T> {
    type Item = &'a Row<T>;
    type IntoIter = std::slice::Iter<'a, Row<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<TreeRow<&'static str>> {
        vec![
            TreeRow::new("A").with_sub_rows([TreeRow::new("AA").with_sub_rows([TreeRow::new("AAA")])]),
            TreeRow::new("B").with_sub_rows([TreeRow::new("BA"), TreeRow::new("BB")]),
            TreeRow::new("C"),
        ]
    }

    #[test]
    fn test_flattening_is_parent_before_children() {
        let arena = RowArena::from_forest(forest());
        let names: Vec<_> = arena.iter().map(|row| *row.data()).collect();
        assert_eq!(names, ["A", "AA", "AAA", "B", "BA", "BB", "C"]);
        assert_eq!(arena.len(), 7);
        assert_eq!(arena.roots(), &[0, 3, 6]);
    }

    #[test]
    fn test_index_path_ids_and_links() {
        let arena = RowArena::from_forest(forest());
        let aaa = arena.by_id("0.0.0").unwrap();
        assert_eq!(*aaa.data(), "AAA");
        assert_eq!(aaa.depth(), 2);
        assert_eq!(aaa.parent(), Some(1));
        assert!(!aaa.can_expand());

        let b = arena.by_id("1").unwrap();
        assert_eq!(b.children(), &[4, 5]);
        assert!(b.can_expand());
        assert_eq!(arena[5].id().as_str(), "1.1");
    }

    #[test]
    fn test_custom_ids() {
        let id_fn: RowIdFn<&'static str> = Arc::new(|name| RowId::new(name.to_lowercase()));
        let arena = RowArena::from_forest_with_ids(forest(), &id_fn);
        assert_eq!(arena.index_of("bb"), Some(5));
        assert!(!arena.contains("1.1"));
    }

    #[test]
    fn test_duplicate_custom_ids_fall_back_to_path() {
        let id_fn: RowIdFn<&'static str> = Arc::new(|_| RowId::from("same"));
        let arena = RowArena::from_forest_with_ids(vec![TreeRow::new("x"), TreeRow::new("y")], &id_fn);
        assert_eq!(arena[0].id().as_str(), "same");
        assert_eq!(arena[1].id().as_str(), "1");
    }

    #[test]
    fn test_empty_forest() {
        let arena = RowArena::<()>::from_forest(Vec::new());
        assert!(arena.is_empty());
        assert!(arena.roots().is_empty());
    }
}
