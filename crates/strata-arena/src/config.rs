//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for a [`PagedArena`](crate::PagedArena).
///
/// Controls page sizing and the growth limit. Validated at construction;
/// all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of elements held by each page.
    ///
    /// Default: 1024. Must be non-zero.
    pub page_capacity: usize,

    /// Maximum number of pages the arena may own.
    ///
    /// `None` lets the arena grow until the system allocator refuses.
    pub max_pages: Option<usize>,
}

impl ArenaConfig {
    /// Default page capacity in elements.
    pub const DEFAULT_PAGE_CAPACITY: usize = 1024;

    /// Create a config with the given page capacity and no page limit.
    pub fn new(page_capacity: usize) -> Self {
        Self {
            page_capacity,
            max_pages: None,
        }
    }

    /// Builder-style setter for [`max_pages`](Self::max_pages).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Check the config for values no arena can work with.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.page_capacity == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "page_capacity must be greater than 0".into(),
            });
        }
        if self.max_pages == Some(0) {
            return Err(ArenaError::InvalidConfig {
                reason: "max_pages must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Maximum number of elements the arena can ever index, if bounded.
    pub fn max_elements(&self) -> Option<usize> {
        self.max_pages
            .and_then(|pages| pages.checked_mul(self.page_capacity))
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_capacity_is_1024() {
        let config = ArenaConfig::default();
        assert_eq!(config.page_capacity, 1024);
        assert_eq!(config.max_pages, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_page_capacity_rejected() {
        let result = ArenaConfig::new(0).validate();
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn zero_max_pages_rejected() {
        let result = ArenaConfig::new(4).with_max_pages(0).validate();
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn max_elements_multiplies_pages() {
        assert_eq!(ArenaConfig::new(8).with_max_pages(3).max_elements(), Some(24));
        assert_eq!(ArenaConfig::new(8).max_elements(), None);
    }
}
