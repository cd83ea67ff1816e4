//! Document selection — the thin event source driving re-renders.

use std::sync::Arc;

use decal_core::DocumentRegistry;
use tokio::sync::mpsc;

use crate::pipeline::Msg;

/// Holds the current document key and forwards selection events into the
/// pipeline loop.
///
/// Selecting an already-selected key still emits an event: downstream state
/// may have changed since the last render, so selection is deliberately not
/// idempotent.
pub struct DocumentSelector {
    registry: Arc<DocumentRegistry>,
    current: String,
    tx: mpsc::Sender<Msg>,
}

impl DocumentSelector {
    pub(crate) fn new(
        registry: Arc<DocumentRegistry>,
        initial: String,
        tx: mpsc::Sender<Msg>,
    ) -> Self {
        assert!(
            registry.contains(&initial),
            "unknown document key: {initial}"
        );
        Self { registry, current: initial, tx }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Switch the selection and notify the pipeline.
    ///
    /// # Panics
    ///
    /// Keys outside the closed registry are a caller contract violation and
    /// panic immediately.
    pub async fn select(&mut self, key: &str) {
        assert!(self.registry.contains(key), "unknown document key: {key}");
        self.current = key.to_string();
        if self.tx.send(Msg::Select(key.to_string())).await.is_err() {
            log::warn!("Selection '{key}' dropped: pipeline is gone");
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_selector() -> (DocumentSelector, mpsc::Receiver<Msg>) {
        let registry = Arc::new(DocumentRegistry::builtin());
        let (tx, rx) = mpsc::channel(8);
        (DocumentSelector::new(registry, "helloworld".into(), tx), rx)
    }

    #[tokio::test]
    async fn test_select_emits_event() {
        let (mut selector, mut rx) = test_selector();
        selector.select("cta-card").await;

        assert_eq!(selector.current(), "cta-card");
        match rx.recv().await {
            Some(Msg::Select(key)) => assert_eq!(key, "cta-card"),
            other => panic!("Expected Select, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reselect_same_key_emits_again() {
        let (mut selector, mut rx) = test_selector();
        selector.select("helloworld").await;
        selector.select("helloworld").await;

        assert!(matches!(rx.recv().await, Some(Msg::Select(_))));
        assert!(matches!(rx.recv().await, Some(Msg::Select(_))));
    }

    #[test]
    #[should_panic(expected = "unknown document key")]
    fn test_invalid_key_panics() {
        let registry = Arc::new(DocumentRegistry::builtin());
        let (tx, _rx) = mpsc::channel(8);
        DocumentSelector::new(registry, "not-a-document".into(), tx);
    }

    #[tokio::test]
    #[should_panic(expected = "unknown document key")]
    async fn test_invalid_select_panics() {
        let (mut selector, _rx) = test_selector();
        selector.select("not-a-document").await;
    }
}
