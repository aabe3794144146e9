use super::{ApiError, RequestDescriptor};

/// A pipeline stage applied uniformly to every call made through an
/// [`ApiClient`](super::ApiClient).
///
/// `on_request` runs in registration order after client defaults are applied;
/// an error returned there is delivered to the caller like any other failure.
/// `on_error` only observes: the caller always receives the original error.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, _request: &mut RequestDescriptor) -> Result<(), ApiError> {
        Ok(())
    }

    fn on_error(&self, _error: &ApiError) {}
}
