//! Shared cancellation helpers for use cases.

use tokio_util::sync::CancellationToken;

/// Whether cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Resolves once cancellation is requested; never resolves without a token.
pub(crate) async fn cancelled(token: &Option<CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_is_cancelled() {
        assert!(!is_cancelled(&None));
        let token = CancellationToken::new();
        let some = Some(token.clone());
        assert!(!is_cancelled(&some));
        token.cancel();
        assert!(is_cancelled(&some));
    }

    #[tokio::test]
    async fn test_cancelled_without_token_never_resolves() {
        let waited = tokio::time::timeout(Duration::from_millis(20), cancelled(&None)).await;
        assert!(waited.is_err());
    }
}
