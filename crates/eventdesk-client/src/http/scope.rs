//! Cooperative cancellation for in-flight requests.
//!
//! A view creates a scope when it starts loading and keeps the
//! [`ScopeHandle`]. Dropping or cancelling the handle resolves every call
//! still running under the scope with [`ClientError::Cancelled`], so late
//! results never reach a view that has gone away.

use std::future::Future;
use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};

/// Owner side of a request scope. Cancels on drop.
#[derive(Debug)]
pub struct ScopeHandle {
    tx: watch::Sender<bool>,
}

/// Shared side of a request scope.
#[derive(Debug, Clone)]
pub struct RequestScope {
    rx: watch::Receiver<bool>,
}

/// Create a new, live scope.
pub fn request_scope() -> (ScopeHandle, RequestScope) {
    let (tx, rx) = watch::channel(false);
    (ScopeHandle { tx }, RequestScope { rx })
}

impl ScopeHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Drop for ScopeHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl RequestScope {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Drive `fut` unless the scope is cancelled first.
    pub async fn run<T, F>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let mut rx = self.rx.clone();
        tokio::select! {
            result = fut => result,
            _ = wait_cancelled(&mut rx) => {
                tracing::debug!("Request abandoned by its scope");
                Err(ClientError::Cancelled)
            }
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_live_scope_passes_result_through() {
        let (_handle, scope) = request_scope();
        let value = scope.run(async { Ok::<_, ClientError>(5) }).await.unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_call() {
        let (handle, scope) = request_scope();
        let pending = tokio::spawn(async move {
            scope
                .run(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, ClientError>(())
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), pending)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_dropped_handle_cancels() {
        let (handle, scope) = request_scope();
        drop(handle);
        assert!(scope.is_cancelled());
        let result = scope.run(async { Ok::<_, ClientError>(1) }).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }
}
