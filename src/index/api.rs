use crate::models::{ApiDefinition, Folder};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Index over the endpoint tree of an Apidog collection.
///
/// Endpoint display names are not guaranteed unique (the same name may be
/// reused across folders), so the name index keeps an ordered list of
/// candidates instead of overwriting. The synthetic "folder/path/name" key
/// is unique and allows exact addressing.
#[derive(Debug, Clone, Default)]
pub struct ApiIndex {
    entries: Vec<ApiDefinition>,
    by_name: IndexMap<String, Vec<usize>>,
    by_folder_path: HashMap<String, usize>,
}

/// Outcome of a name-based lookup.
#[derive(Debug, Clone, Copy)]
pub enum NameLookup<'a> {
    /// Exactly one candidate matched
    Unique(&'a ApiDefinition),
    /// Several candidates remained; the first-indexed one was selected
    Ambiguous(&'a ApiDefinition),
    NotFound,
}

impl<'a> NameLookup<'a> {
    pub fn resolved(self) -> Option<&'a ApiDefinition> {
        match self {
            NameLookup::Unique(api) | NameLookup::Ambiguous(api) => Some(api),
            NameLookup::NotFound => None,
        }
    }
}

impl ApiIndex {
    /// Build the index from the folder tree of endpoint definitions
    pub fn build(folders: &[Folder<ApiDefinition>]) -> Self {
        let mut index = Self::default();
        for folder in folders {
            index.add_folder(folder, "");
        }
        index
    }

    fn add_folder(&mut self, folder: &Folder<ApiDefinition>, prefix: &str) {
        let folder_path = if prefix.is_empty() {
            folder.name.clone()
        } else {
            format!("{}/{}", prefix, folder.name)
        };

        for api in &folder.items {
            let idx = self.entries.len();
            self.entries.push(api.clone());
            self.by_name.entry(api.name.clone()).or_default().push(idx);
            self.by_folder_path
                .insert(format!("{}/{}", folder_path, api.name), idx);
        }

        for child in &folder.children {
            self.add_folder(child, &folder_path);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear scan in index order; returns the first endpoint whose declared
    /// path matches, with a case-insensitive method match when one is given.
    pub fn find_by_method_and_path(
        &self,
        method: Option<&str>,
        path: &str,
    ) -> Option<&ApiDefinition> {
        self.entries.iter().find(|api| {
            api.path == path
                && method.is_none_or(|m| api.method.eq_ignore_ascii_case(m))
        })
    }

    /// Name-based lookup with the "first wins with diagnostic" ambiguity
    /// policy. A folder-qualified key is tried first when `folder_path` is
    /// given; a provided `expected_path` must then also match.
    pub fn find_by_name_and_path(
        &self,
        name: &str,
        expected_path: Option<&str>,
        expected_method: Option<&str>,
        folder_path: Option<&str>,
    ) -> NameLookup<'_> {
        if let Some(folder) = folder_path {
            let key = format!("{}/{}", folder, name);
            if let Some(&idx) = self.by_folder_path.get(&key) {
                let api = &self.entries[idx];
                if expected_path.is_none_or(|p| api.path == p) {
                    return NameLookup::Unique(api);
                }
            }
        }

        let Some(indices) = self.by_name.get(name) else {
            return NameLookup::NotFound;
        };

        let candidates: Vec<&ApiDefinition> =
            indices.iter().map(|&idx| &self.entries[idx]).collect();

        disambiguate(&candidates, expected_path, expected_method)
    }
}

/// Pick one endpoint out of an ordered candidate list: exact declared-path
/// match first, then exact method match, then the first-indexed candidate
/// (flagged as ambiguous when more than one remains).
fn disambiguate<'a>(
    candidates: &[&'a ApiDefinition],
    expected_path: Option<&str>,
    expected_method: Option<&str>,
) -> NameLookup<'a> {
    match candidates {
        [] => NameLookup::NotFound,
        [only] => NameLookup::Unique(only),
        _ => {
            if let Some(path) = expected_path
                && let Some(api) = candidates.iter().copied().find(|api| api.path == path)
            {
                return NameLookup::Unique(api);
            }

            if let Some(method) = expected_method {
                let by_method: Vec<&ApiDefinition> = candidates
                    .iter()
                    .copied()
                    .filter(|api| api.method.eq_ignore_ascii_case(method))
                    .collect();
                match by_method.as_slice() {
                    [only] => return NameLookup::Unique(only),
                    [first, ..] => return NameLookup::Ambiguous(first),
                    [] => {}
                }
            }

            NameLookup::Ambiguous(candidates[0])
        }
    }
}
