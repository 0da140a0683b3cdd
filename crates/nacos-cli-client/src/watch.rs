//! Polling config watcher
//!
//! Periodically fetches one config and notifies a listener when its MD5
//! changes. Failed polls are logged and retried on the next tick; the client
//! itself never retries.

use std::sync::Arc;
use std::time::Duration;

use md5::{Digest, Md5};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::NacosClient;
use crate::error::Result;

/// A config whose content changed since the previous poll.
#[derive(Clone, Debug)]
pub struct ConfigChange {
    pub data_id: String,
    pub group: String,
    pub tenant: String,
    pub content: String,
    pub md5: String,
}

/// Receives the content of a watched config each time it changes.
///
/// Implemented for any `Fn(ConfigChange)` closure, which is what most callers
/// hand to [`ConfigWatcher::new`].
pub trait ConfigChangeListener: Send + Sync + 'static {
    fn on_change(&self, change: ConfigChange);
}

impl<F> ConfigChangeListener for F
where
    F: Fn(ConfigChange) + Send + Sync + 'static,
{
    fn on_change(&self, change: ConfigChange) {
        self(change)
    }
}

/// Compute MD5 hash of a string, returning the hex digest.
pub fn compute_md5(content: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(content.as_bytes());
    const_hex::encode(hasher.finalize())
}

/// Watches a single config key by polling
pub struct ConfigWatcher {
    client: Arc<NacosClient>,
    data_id: String,
    group: String,
    interval: Duration,
    last_md5: Option<String>,
    listener: Box<dyn ConfigChangeListener>,
}

impl ConfigWatcher {
    pub fn new(
        client: Arc<NacosClient>,
        data_id: &str,
        group: &str,
        interval: Duration,
        listener: impl ConfigChangeListener,
    ) -> Self {
        Self {
            client,
            data_id: data_id.to_string(),
            group: group.to_string(),
            interval,
            last_md5: None,
            listener: Box::new(listener),
        }
    }

    /// MD5 of the last content delivered to the listener
    pub fn last_md5(&self) -> Option<&str> {
        self.last_md5.as_deref()
    }

    /// Fetch once and notify on change. The first successful fetch always
    /// counts as a change. Returns whether the listener was notified.
    pub async fn poll_once(&mut self) -> Result<bool> {
        let content = self.client.get_config(&self.data_id, &self.group).await?;
        let md5 = compute_md5(&content);

        if self.last_md5.as_deref() == Some(md5.as_str()) {
            debug!("Config {}@{} unchanged", self.data_id, self.group);
            return Ok(false);
        }

        info!(
            "Config {}@{} changed, md5={}",
            self.data_id, self.group, md5
        );
        self.last_md5 = Some(md5.clone());
        self.listener.on_change(ConfigChange {
            data_id: self.data_id.clone(),
            group: self.group.clone(),
            tenant: self.client.namespace().to_string(),
            content,
            md5,
        });
        Ok(true)
    }

    /// Poll until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        warn!(
                            "Polling config {}@{} failed: {}",
                            self.data_id, self.group, e
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Config watcher for {}@{} stopped", self.data_id, self.group);
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_compute_md5() {
        assert_eq!(compute_md5("hello world"), "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(compute_md5(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_closure_is_listener() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let listener: Box<dyn ConfigChangeListener> = Box::new(move |change: ConfigChange| {
            assert_eq!(change.data_id, "test-id");
            flag.store(true, Ordering::SeqCst);
        });

        listener.on_change(ConfigChange {
            data_id: "test-id".to_string(),
            group: "DEFAULT_GROUP".to_string(),
            tenant: "public".to_string(),
            content: "test content".to_string(),
            md5: compute_md5("test content"),
        });

        assert!(called.load(Ordering::SeqCst));
    }
}
