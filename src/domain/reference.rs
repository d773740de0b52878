//! Navigation reference: either not yet fetched or holding the related value.

/// Cached navigation reference.
///
/// Starts out unloaded. Loading code either overwrites it (`set`, explicit
/// loading) or fills it only when empty (`get_or_try_load`, lazy loading).
/// Once loaded, reads never touch storage again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<T>(Option<T>);

impl<T> Default for Reference<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Reference<T> {
    pub fn unloaded() -> Self {
        Self(None)
    }

    pub fn loaded(value: T) -> Self {
        Self(Some(value))
    }

    pub fn is_loaded(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Replace whatever is cached with `value`.
    pub fn set(&mut self, value: T) -> &mut T {
        self.0.insert(value)
    }

    /// Return the cached value, running `fetch` only if nothing is cached yet.
    pub fn get_or_try_load<E, F>(&mut self, fetch: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let value = match self.0.take() {
            Some(v) => v,
            None => fetch()?,
        };
        Ok(self.0.insert(value))
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}
