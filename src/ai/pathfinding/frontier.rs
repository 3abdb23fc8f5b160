//! Open list for best-first search
//!
//! A vector kept in descending f order so the cheapest entry sits at the
//! back and pops in O(1). Insertion places a new entry behind every entry
//! with an equal f, which makes ties pop last-in first-out.

/// Frontier of a best-first search
#[derive(Debug, Clone)]
pub struct OpenList<Id> {
    /// `(f, id)` pairs, highest f at the front
    entries: Vec<(f32, Id)>,
}

impl<Id: Copy> OpenList<Id> {
    /// Create an empty open list
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an entry with its f cost.
    ///
    /// The same id may be pushed more than once; each entry keeps the f it
    /// was pushed with.
    pub fn push(&mut self, id: Id, f: f32) {
        let at = self.entries.partition_point(|(existing, _)| *existing >= f);
        self.entries.insert(at, (f, id));
    }

    /// Remove the entry with the lowest f (the latest pushed among ties)
    pub fn pop(&mut self) -> Option<Id> {
        self.entries.pop().map(|(_, id)| id)
    }

    /// Entry that `pop` would return, with its f
    #[must_use]
    pub fn peek(&self) -> Option<(Id, f32)> {
        self.entries.last().map(|&(f, id)| (id, f))
    }

    /// Iterate ids from the front (highest f) to the back
    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.entries.iter().map(|&(_, id)| id)
    }

    /// Number of entries, duplicates included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Id: Copy> Default for OpenList<Id> {
    fn default() -> Self {
        Self::new()
    }
}
