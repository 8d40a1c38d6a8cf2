//! Invocation tracking.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::call::Function;

/// Handle for tracking and cancelling one workspace function call.
///
/// The handle owns nothing but a cancellation token; the connection opened
/// for the call lives inside the call's future and is released when that
/// future finishes or is dropped.
pub struct Invocation {
    /// Unique invocation identifier
    id: Uuid,
    /// Function being invoked
    function: Function,
    /// Cancellation token for abandoning the call
    cancel_token: CancellationToken,
    /// Invocation start time
    started_at: DateTime<Utc>,
}

impl Invocation {
    /// Create a new invocation handle.
    pub fn new(function: Function) -> Self {
        Self::with_token(function, CancellationToken::new())
    }

    /// Create an invocation tied to a caller-owned token.
    ///
    /// Cancelling the parent token (or any ancestor) cancels this invocation.
    pub fn with_token(function: Function, cancel_token: CancellationToken) -> Self {
        Self { id: Uuid::new_v4(), function, cancel_token, started_at: Utc::now() }
    }

    /// Get the unique invocation identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the function being invoked.
    pub fn function(&self) -> Function {
        self.function
    }

    /// Get when the invocation started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        tracing::debug!(invocation_id = %self.id, "Cancellation requested");
        self.cancel_token.cancel();
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Wait for cancellation.
    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }

    /// Get a clone of the cancellation token.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("id", &self.id)
            .field("function", &self.function)
            .field("started_at", &self.started_at)
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocations_have_unique_ids() {
        let a = Invocation::new(Function::Tables);
        let b = Invocation::new(Function::Tables);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.function(), Function::Tables);
    }

    #[test]
    fn test_cancel_sets_flag() {
        let invocation = Invocation::new(Function::ColumnType);
        assert!(!invocation.is_cancelled());
        invocation.cancel();
        assert!(invocation.is_cancelled());
    }

    #[test]
    fn test_parent_token_cancels_child() {
        let parent = CancellationToken::new();
        let invocation = Invocation::with_token(Function::TableColumns, parent.child_token());
        parent.cancel();
        assert!(invocation.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves_after_cancel() {
        let invocation = Invocation::new(Function::Tables);
        let token = invocation.cancel_token();
        tokio::spawn(async move { token.cancel() });
        invocation.cancelled().await;
        assert!(invocation.is_cancelled());
    }
}
