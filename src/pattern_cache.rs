//! Thread-local cache of compiled patterns
//!
//! Backs the one-shot [`find`](crate::find): each schema type is compiled
//! once per thread and option set, then reused. The cache is never shared
//! between threads, so lookups take no lock.

use hashbrown::HashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::sync::Arc;

use crate::error::CompileError;
use crate::options::Options;
use crate::pattern::Pattern;
use crate::schema::Schema;

type Entry = Arc<dyn Any + Send + Sync>;

thread_local! {
    /// Compiled patterns keyed by schema type and options
    static PATTERN_CACHE: RefCell<HashMap<(TypeId, Options), Entry>> = RefCell::new(HashMap::new());
}

/// Get the cached pattern for `T`, compiling it on first use
///
/// Compile errors are not cached; a failing schema is recompiled (and fails
/// again) on every call.
pub fn get_or_compile<T: Schema>(options: Options) -> Result<Arc<Pattern<T>>, CompileError> {
    let key = (TypeId::of::<T>(), options);

    let cached = PATTERN_CACHE.with(|cache| cache.borrow().get(&key).cloned());
    if let Some(pattern) = cached.and_then(|entry| entry.downcast::<Pattern<T>>().ok()) {
        return Ok(pattern);
    }

    // Compiled outside the borrow: descriptors may compile other schemas.
    log_debug!("pattern cache miss for {}", std::any::type_name::<T>());
    let pattern = Arc::new(Pattern::<T>::compile_with(options)?);
    let entry: Entry = pattern.clone();
    PATTERN_CACHE.with(|cache| cache.borrow_mut().insert(key, entry));
    Ok(pattern)
}

/// Clear this thread's pattern cache
pub fn clear_cache() {
    PATTERN_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Number of patterns cached by this thread
pub fn cache_size() -> usize {
    PATTERN_CACHE.with(|cache| cache.borrow().len())
}
