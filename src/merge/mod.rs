//! Folds converted test cases into a master collection document.
//!
//! Id collisions are never errors: every colliding id is remapped through a
//! per-case table so all occurrences of one original id receive the same
//! replacement. Placement is by folder tag, replacement is by name within
//! the target folder, and items are kept sorted by their `ordering` key.

use crate::convert::IdAllocator;
use crate::models::{ApidogCollection, Folder, TestCase};
use std::collections::HashMap;
use tracing::debug;

/// What a merge run did, for command output.
#[derive(Debug, Default)]
pub struct MergeReport {
    pub inserted: Vec<String>,
    pub updated: Vec<String>,
    pub remapped_ids: usize,
}

impl MergeReport {
    pub fn total(&self) -> usize {
        self.inserted.len() + self.updated.len()
    }
}

/// Merge incoming test cases into the collection's test-case tree.
///
/// The used-id set spans the whole document, both the endpoint tree and the
/// test-case tree, so remapped ids can never collide with anything already
/// present.
pub fn merge_test_cases(
    collection: &mut ApidogCollection,
    incoming: Vec<TestCase>,
) -> MergeReport {
    let mut ids = IdAllocator::with_used(collection.used_ids());
    let mut report = MergeReport::default();

    if collection.test_case_collection.is_empty() {
        collection.test_case_collection.push(Folder::new("Root"));
    }
    let root = &mut collection.test_case_collection[0];

    for mut case in incoming {
        remap_collisions(&mut case, &mut ids, &mut report);

        let target = match &case.folder {
            Some(folder) => find_or_create_folder(root, folder),
            None => &mut *root,
        };

        debug!(case = %case.name, folder = ?case.folder, "merging test case");

        match target.items.iter_mut().find(|item| item.name == case.name) {
            Some(existing) => {
                report.updated.push(case.name.clone());
                *existing = case;
            }
            None => {
                report.inserted.push(case.name.clone());
                target.items.push(case);
            }
        }
    }

    sort_by_ordering(root);
    report
}

/// Reassign every id that collides with the used set, consistently for all
/// occurrences of the same original id inside one test case.
fn remap_collisions(case: &mut TestCase, ids: &mut IdAllocator, report: &mut MergeReport) {
    let mut table: HashMap<i64, i64> = HashMap::new();
    let mut remapped = 0usize;

    case.remap_ids(&mut |id| {
        *table.entry(id).or_insert_with(|| {
            if ids.claim(id) {
                id
            } else {
                remapped += 1;
                ids.mint()
            }
        })
    });

    report.remapped_ids += remapped;
}

/// Locate the named folder one level below the root, creating it when
/// missing. Repeated merges with the same folder name reuse the folder.
fn find_or_create_folder<'a>(
    root: &'a mut Folder<TestCase>,
    name: &str,
) -> &'a mut Folder<TestCase> {
    let position = root.children.iter().position(|child| child.name == name);
    match position {
        Some(index) => &mut root.children[index],
        None => {
            root.children.push(Folder::new(name));
            root.children.last_mut().unwrap()
        }
    }
}

/// Stable ascending sort by the `ordering` key, root items and every
/// folder's items alike
fn sort_by_ordering(root: &mut Folder<TestCase>) {
    root.items.sort_by_key(|item| item.ordering);
    for child in &mut root.children {
        sort_by_ordering(child);
    }
}
