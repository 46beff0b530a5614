use std::fmt;

/// Identity of one logical result set: the normalized (query, category) pair.
///
/// Both components are trimmed on construction, so `" phone "` and `"phone"`
/// name the same set. An empty component means "not filtered by this".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FetchKey {
    query: String,
    category: String,
}

/// How a [`FetchKey`] selects rows from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode<'a> {
    /// Free-text search. The category is ignored in this mode.
    Search(&'a str),
    /// Listing scoped to one category slug.
    Category(&'a str),
    /// Unfiltered listing.
    All,
}

impl FetchKey {
    pub fn new(query: &str, category: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            category: category.trim().to_string(),
        }
    }

    /// The unfiltered key.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Selection policy: search wins over category, category wins over
    /// the unfiltered listing.
    pub fn mode(&self) -> FetchMode<'_> {
        if !self.query.is_empty() {
            FetchMode::Search(&self.query)
        } else if !self.category.is_empty() {
            FetchMode::Category(&self.category)
        } else {
            FetchMode::All
        }
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.query.is_empty(), self.category.is_empty()) {
            (true, true) => write!(f, "all"),
            (false, true) => write!(f, "q={:?}", self.query),
            (true, false) => write!(f, "category={}", self.category),
            (false, false) => write!(f, "q={:?} category={}", self.query, self.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_trimmed() {
        assert_eq!(FetchKey::new("  phone ", " smartphones"), FetchKey::new("phone", "smartphones"));
        assert_eq!(FetchKey::new("   ", ""), FetchKey::all());
    }

    #[test]
    fn changing_either_component_changes_identity() {
        let base = FetchKey::new("phone", "");
        assert_ne!(base, FetchKey::new("phone", "smartphones"));
        assert_ne!(base, FetchKey::new("phones", ""));
    }

    #[test]
    fn search_takes_priority_over_category() {
        assert_eq!(FetchKey::new("phone", "laptops").mode(), FetchMode::Search("phone"));
        assert_eq!(FetchKey::new("", "laptops").mode(), FetchMode::Category("laptops"));
        assert_eq!(FetchKey::all().mode(), FetchMode::All);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(FetchKey::all().to_string(), "all");
        assert_eq!(FetchKey::new("", "beauty").to_string(), "category=beauty");
    }
}
