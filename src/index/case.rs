use crate::models::{Folder, TestCase};
use std::collections::HashMap;

/// Index over the test-case tree of an Apidog collection, used to resolve
/// `testCaseRef` targets (id needed for output) and `link` targets (full
/// document needed to copy steps).
#[derive(Debug, Clone, Default)]
pub struct CaseIndex {
    entries: Vec<TestCase>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<i64, usize>,
}

impl CaseIndex {
    /// Build the index from the folder tree of test cases
    pub fn build(folders: &[Folder<TestCase>]) -> Self {
        let mut index = Self::default();
        for folder in folders {
            index.add_folder(folder);
        }
        index
    }

    fn add_folder(&mut self, folder: &Folder<TestCase>) {
        for case in &folder.items {
            let idx = self.entries.len();
            self.entries.push(case.clone());
            // First definition wins for duplicate names
            self.by_name.entry(case.name.clone()).or_insert(idx);
            self.by_id.entry(case.id).or_insert(idx);
        }
        for child in &folder.children {
            self.add_folder(child);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TestCase> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn find_by_id(&self, id: i64) -> Option<&TestCase> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunSettings;

    fn case(id: i64, name: &str) -> TestCase {
        TestCase {
            id,
            name: name.to_string(),
            description: None,
            priority: 2,
            ordering: 0,
            folder: None,
            tags: vec![],
            settings: RunSettings::default(),
            steps: vec![],
            datasets: vec![],
        }
    }

    #[test]
    fn test_index_recurses_through_folders() {
        let mut root = Folder::new("Root");
        root.items.push(case(1, "Login"));
        let mut nested = Folder::new("Orders");
        nested.items.push(case(2, "Create order"));
        root.children.push(nested);

        let index = CaseIndex::build(&[root]);
        assert_eq!(index.find_by_name("Create order").map(|c| c.id), Some(2));
        assert_eq!(index.find_by_id(1).map(|c| c.name.as_str()), Some("Login"));
        assert!(index.find_by_name("Missing").is_none());
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let mut root = Folder::new("Root");
        root.items.push(case(1, "Login"));
        root.items.push(case(2, "Login"));

        let index = CaseIndex::build(&[root]);
        assert_eq!(index.find_by_name("Login").map(|c| c.id), Some(1));
    }
}
