//! Mock edge-subscription service for testing
//!
//! Keeps a ledger of every subscription ever made so tests can verify which
//! pins were registered with which edge kinds, and that deinitialization
//! returned the tokens.

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::platform::{
    error::{EdgeError, PlatformError},
    traits::{EdgeInterface, EdgeKind, EdgeToken},
    Result,
};

/// One ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    /// Token handed to the subscriber
    pub token: EdgeToken,
    /// Subscribed pin
    pub pin: u8,
    /// Subscribed edge kind
    pub kind: EdgeKind,
    /// False once unsubscribed
    pub active: bool,
}

#[derive(Debug, Default)]
struct EdgesInner {
    subscriptions: Vec<Subscription>,
    next_id: u32,
    fail_subscribe_in: Option<u32>,
    fail_unsubscribe: bool,
}

/// Mock edge-subscription service
///
/// Clones share the ledger, so a test can keep a handle after the service has
/// been moved into the chassis.
#[derive(Debug, Clone, Default)]
pub struct MockEdges {
    inner: Arc<Mutex<EdgesInner>>,
}

impl MockEdges {
    /// Create a new service with an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Active subscriptions as (pin, kind) pairs, in registration order
    pub fn active(&self) -> Vec<(u8, EdgeKind)> {
        self.inner
            .lock()
            .unwrap()
            .subscriptions
            .iter()
            .filter(|s| s.active)
            .map(|s| (s.pin, s.kind))
            .collect()
    }

    /// Number of active subscriptions
    pub fn active_count(&self) -> usize {
        self.active().len()
    }

    /// Full ledger, including cancelled entries
    pub fn ledger(&self) -> Vec<Subscription> {
        self.inner.lock().unwrap().subscriptions.clone()
    }

    /// Make the next `subscribe` call fail (one-shot)
    pub fn fail_next_subscribe(&self) {
        self.fail_subscribe_after(0);
    }

    /// Make the `subscribe` call after `calls` more successful ones fail
    /// (one-shot)
    pub fn fail_subscribe_after(&self, calls: u32) {
        self.inner.lock().unwrap().fail_subscribe_in = Some(calls);
    }

    /// Force `unsubscribe` calls to fail
    pub fn fail_unsubscribe(&self, fail: bool) {
        self.inner.lock().unwrap().fail_unsubscribe = fail;
    }
}

impl EdgeInterface for MockEdges {
    fn subscribe(&mut self, pin: u8, kind: EdgeKind) -> Result<EdgeToken> {
        let mut inner = self.inner.lock().unwrap();
        match inner.fail_subscribe_in {
            Some(0) => {
                inner.fail_subscribe_in = None;
                return Err(PlatformError::Edge(EdgeError::Exhausted));
            }
            Some(n) => inner.fail_subscribe_in = Some(n - 1),
            None => {}
        }
        let token = EdgeToken::new(inner.next_id);
        inner.next_id += 1;
        inner.subscriptions.push(Subscription {
            token,
            pin,
            kind,
            active: true,
        });
        Ok(token)
    }

    fn unsubscribe(&mut self, token: EdgeToken) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_unsubscribe {
            return Err(PlatformError::Edge(EdgeError::UnknownToken));
        }
        match inner
            .subscriptions
            .iter_mut()
            .find(|s| s.token == token && s.active)
        {
            Some(sub) => {
                sub.active = false;
                Ok(())
            }
            None => Err(PlatformError::Edge(EdgeError::UnknownToken)),
        }
    }
}
