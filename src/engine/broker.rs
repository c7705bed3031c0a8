// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-flight message broker.
//!
//! The broker coalesces concurrent requests for the same key into one
//! computation. The first subscriber for a key is told to compute; everyone
//! who subscribes while that computation is in flight receives a
//! [`PromiseSlot`] that is filled exactly once when the result is stored;
//! everyone who subscribes afterwards receives a slot that is already filled
//! from the cache.
//!
//! # Per-key lifecycle
//!
//! ```text
//! UNSEEN --subscribe--> PENDING(0) --subscribe--> PENDING(n) --store--> CACHED
//! ```
//!
//! `CACHED` is terminal: records are never removed while the broker lives.
//! Scope a broker to a single run to bound its memory.
//!
//! # Atomicity
//!
//! Records live in a [`DashMap`]. Both `try_subscribe` and `store_result`
//! perform their whole read-modify-write while holding the shard guard for
//! the key, so a subscribe either completes before a store (and is included
//! in its broadcast) or starts after it (and sees the cached value). Neither
//! operation awaits while holding the guard.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::errors::BrokerError;
use crate::observability::messages::broker::{ResultStored, SubscriptionOpened};
use crate::observability::messages::StructuredLog;

/// Broker entry for one key.
struct SubscriptionRecord<V> {
    waiter_count: usize,
    waiters: Vec<oneshot::Sender<V>>,
    cached_result: Option<V>,
}

impl<V> SubscriptionRecord<V> {
    fn pending() -> Self {
        Self {
            waiter_count: 0,
            waiters: Vec::new(),
            cached_result: None,
        }
    }
}

/// Single-use delivery point for one waiter.
#[derive(Debug)]
pub struct PromiseSlot<V> {
    rx: oneshot::Receiver<V>,
}

impl<V> PromiseSlot<V> {
    /// Wait for the one delivery this slot will receive.
    pub async fn wait(self) -> Result<V, BrokerError> {
        self.rx.await.map_err(|_| BrokerError::SlotClosed)
    }
}

/// Outcome of [`MessageBroker::try_subscribe`].
#[derive(Debug)]
pub enum Subscription<V> {
    /// First request for this key: the caller computes and stores the result.
    First,
    /// The result is cached or being computed: wait on the slot.
    Wait(PromiseSlot<V>),
}

impl<V> Subscription<V> {
    pub fn must_wait(&self) -> bool {
        matches!(self, Subscription::Wait(_))
    }
}

/// Counters describing how subscriptions were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrokerStats {
    /// Subscriptions that created a record and had to compute.
    pub computed: usize,
    /// Subscriptions that joined an in-flight computation.
    pub coalesced: usize,
    /// Subscriptions served straight from the cache.
    pub replayed: usize,
}

pub struct MessageBroker<K, V> {
    records: DashMap<K, SubscriptionRecord<V>>,
    computed: AtomicUsize,
    coalesced: AtomicUsize,
    replayed: AtomicUsize,
}

impl<K, V> MessageBroker<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            computed: AtomicUsize::new(0),
            coalesced: AtomicUsize::new(0),
            replayed: AtomicUsize::new(0),
        }
    }

    /// Subscribe to the result for `key`.
    ///
    /// Returns [`Subscription::First`] exactly once per key; the caller is
    /// then responsible for calling [`store_result`](Self::store_result).
    pub fn try_subscribe(&self, key: K) -> Subscription<V> {
        match self.records.entry(key) {
            Entry::Vacant(vacant) => {
                SubscriptionOpened {
                    key: vacant.key(),
                    outcome: "compute",
                }
                .log();
                vacant.insert(SubscriptionRecord::pending());
                self.computed.fetch_add(1, Ordering::Relaxed);
                Subscription::First
            }
            Entry::Occupied(mut occupied) => {
                let (tx, rx) = oneshot::channel();
                let record = occupied.get_mut();
                let outcome = match &record.cached_result {
                    Some(cached) => {
                        // Receiver is held right here, the send cannot fail.
                        let _ = tx.send(cached.clone());
                        self.replayed.fetch_add(1, Ordering::Relaxed);
                        "replay"
                    }
                    None => {
                        record.waiter_count += 1;
                        record.waiters.push(tx);
                        self.coalesced.fetch_add(1, Ordering::Relaxed);
                        "coalesce"
                    }
                };
                SubscriptionOpened {
                    key: occupied.key(),
                    outcome,
                }
                .log();
                Subscription::Wait(PromiseSlot { rx })
            }
        }
    }

    /// Broadcast `value` to every waiter on `key` and cache it.
    pub fn store_result(&self, key: &K, value: V) -> Result<(), BrokerError> {
        let mut guard = self
            .records
            .get_mut(key)
            .ok_or_else(|| BrokerError::UnknownKey {
                key: format!("{:?}", key),
            })?;
        let record = &mut *guard;

        if record.cached_result.is_some() {
            return Err(BrokerError::AlreadyCached {
                key: format!("{:?}", key),
            });
        }
        if record.waiter_count != record.waiters.len() {
            return Err(BrokerError::WaiterCountMismatch {
                key: format!("{:?}", key),
                counted: record.waiter_count,
                registered: record.waiters.len(),
            });
        }

        let mut delivered = 0;
        let mut undelivered = 0;
        for waiter in record.waiters.drain(..) {
            match waiter.send(value.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => undelivered += 1,
            }
            record.waiter_count -= 1;
        }
        record.cached_result = Some(value);

        ResultStored {
            key,
            delivered,
            undelivered,
        }
        .log();
        Ok(())
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> BrokerStats {
        BrokerStats {
            computed: self.computed.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            replayed: self.replayed.load(Ordering::Relaxed),
        }
    }
}

impl<K, V> Default for MessageBroker<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
