//! Request-scoped context
//!
//! Every lifecycle call receives a Context carrying a request id for log
//! correlation, a cancellation signal and arbitrary typed values.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// Pass this as first parameter to all async trait methods
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    request_id: Uuid,
    values: RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>,
    done: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
}

impl Context {
    pub fn new() -> Self {
        let (done_tx, done_rx) = watch::channel(false);

        Self {
            inner: Arc::new(ContextInner {
                request_id: Uuid::new_v4(),
                values: RwLock::new(HashMap::new()),
                done: done_rx,
                done_tx,
            }),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.inner.request_id
    }

    pub async fn with_value<T: Send + Sync + 'static>(self, key: &str, value: T) -> Self {
        let mut values = self.inner.values.write().await;
        values.insert(key.to_string(), Box::new(value));
        drop(values);
        self
    }

    pub async fn get_value<T>(&self, key: &str) -> Option<T>
    where
        T: Send + Sync + Clone + 'static,
    {
        let values = self.inner.values.read().await;
        values.get(key).and_then(|v| v.downcast_ref::<T>()).cloned()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.done.borrow()
    }

    /// Receiver that flips to true once the context is cancelled
    pub fn done(&self) -> watch::Receiver<bool> {
        self.inner.done.clone()
    }

    pub fn cancel(&self) {
        let _ = self.inner.done_tx.send(true);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_stores_and_retrieves_values() {
        let ctx = Context::new();
        let ctx = ctx.with_value("environment", "prod".to_string()).await;

        let value: Option<String> = ctx.get_value("environment").await;
        assert_eq!(value, Some("prod".to_string()));

        let wrong_type: Option<u32> = ctx.get_value("environment").await;
        assert!(wrong_type.is_none());
    }

    #[tokio::test]
    async fn test_context_manual_cancel_is_shared_by_clones() {
        let ctx = Context::new();
        let clone = ctx.clone();
        let mut done = ctx.done();

        assert!(!clone.is_cancelled());

        ctx.cancel();

        assert!(clone.is_cancelled());
        assert!(done.changed().await.is_ok());
        assert!(*done.borrow());
    }

    #[test]
    fn test_each_context_gets_its_own_request_id() {
        let a = Context::new();
        let b = Context::default();
        assert_ne!(a.request_id(), b.request_id());
        assert_eq!(a.request_id(), a.clone().request_id());
    }
}
