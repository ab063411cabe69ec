use std::collections::HashSet;

/// Issues unique numeric identifiers, avoiding collisions with identifiers
/// already present in the scope it was seeded from. Conversion and merge
/// each construct their own allocator; no state leaks across invocations.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    used: HashSet<i64>,
    next: i64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the allocator from a set of ids already in use
    pub fn with_used(used: impl IntoIterator<Item = i64>) -> Self {
        Self {
            used: used.into_iter().collect(),
            next: 0,
        }
    }

    /// Mint a fresh id, strictly positive and never seen before
    pub fn mint(&mut self) -> i64 {
        loop {
            self.next += 1;
            if self.used.insert(self.next) {
                return self.next;
            }
        }
    }

    /// Record an id as used without minting. Returns false if it was
    /// already taken.
    pub fn claim(&mut self, id: i64) -> bool {
        self.used.insert(id)
    }

    pub fn is_used(&self, id: i64) -> bool {
        self.used.contains(&id)
    }
}
