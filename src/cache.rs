//! Thread-local selector compilation cache.
//!
//! Rule files and directory walks compile the same selector text over and
//! over; this keeps compiled selectors per thread, keyed by their text.
//! Cache is capped at 256 entries and cleared when full.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::selector::{Selector, SelectorSyntaxError};

const MAX_CACHE_ENTRIES: usize = 256;

thread_local! {
    static SELECTOR_CACHE: RefCell<HashMap<String, Arc<Selector>>> =
        RefCell::new(HashMap::new());
}

/// Get a compiled selector from cache, or compile and cache it.
///
/// Compile errors are returned and never cached.
pub fn get_or_compile(text: &str) -> Result<Arc<Selector>, SelectorSyntaxError> {
    if let Some(hit) = SELECTOR_CACHE.with(|cache| cache.borrow().get(text).cloned()) {
        return Ok(hit);
    }

    let compiled = Arc::new(Selector::compile(text)?);
    SELECTOR_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.len() >= MAX_CACHE_ENTRIES {
            tracing::trace!(entries = cache.len(), "selector cache full, clearing");
            cache.clear();
        }
        cache.insert(text.to_string(), Arc::clone(&compiled));
    });
    Ok(compiled)
}

/// Clear the selector cache (mainly for testing).
pub fn clear_cache() {
    SELECTOR_CACHE.with(|cache| {
        cache.borrow_mut().clear();
    });
}

/// Number of cached selectors on this thread.
pub fn cache_size() -> usize {
    SELECTOR_CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_hits_the_cache() {
        clear_cache();
        let first = get_or_compile("Identifier").unwrap();
        let second = get_or_compile("Identifier").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache_size(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        clear_cache();
        assert!(get_or_compile("Identifier[").is_err());
        assert_eq!(cache_size(), 0);
    }

    #[test]
    fn cache_is_cleared_at_capacity() {
        clear_cache();
        for i in 0..MAX_CACHE_ENTRIES {
            get_or_compile(&format!("Identifier[name=n{i}]")).unwrap();
        }
        assert_eq!(cache_size(), MAX_CACHE_ENTRIES);
        get_or_compile("Number").unwrap();
        assert_eq!(cache_size(), 1);
    }
}
