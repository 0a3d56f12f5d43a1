// File: ./src/model/item.rs
// Parsed checklist structure

/// A single indented checklist entry. Becomes a subtask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub text: String,
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self {
            text: text.into(),
            checked,
        }
    }
}

/// A top-level checklist entry and the items nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

impl CategoryBlock {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }
}

/// Categories in the order they appear in the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistDocument {
    pub categories: Vec<CategoryBlock>,
}

impl ChecklistDocument {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Total number of sub-items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn checked_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.items)
            .filter(|i| i.checked)
            .count()
    }
}

impl<'a> IntoIterator for &'a ChecklistDocument {
    type Item = &'a CategoryBlock;
    type IntoIter = std::slice::Iter<'a, CategoryBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
