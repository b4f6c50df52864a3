use crate::error::ApiError;

/// Generic loading state for async data.
///
/// This enum enforces proper handling of all loading states at compile time,
/// preventing bugs like displaying stale data while loading.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing held: never loaded, torn down, or the resource was removed
    #[default]
    Idle,
    /// Data is being fetched
    Loading,
    /// Data successfully loaded
    Loaded(T),
    /// Loading failed
    Error(ApiError),
}

impl<T> LoadState<T> {
    /// Check if currently loading
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Check if data is loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    /// Check if in error state
    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    /// Get reference to loaded data if available
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Get the error if in error state
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            LoadState::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ApiError>> for LoadState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(err) => LoadState::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state: LoadState<u32> = LoadState::default();
        assert_eq!(state, LoadState::Idle);
        assert!(!state.is_loading());
        assert!(state.data().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_from_result() {
        let loaded: LoadState<u32> = Ok(7).into();
        assert!(loaded.is_loaded());
        assert_eq!(loaded.data(), Some(&7));

        let failed: LoadState<u32> = Err(ApiError::new(500, "boom", None)).into();
        assert!(failed.is_error());
        assert_eq!(failed.error().map(|e| e.status), Some(500));
        assert!(!failed.is_loading());
    }
}
