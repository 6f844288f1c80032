// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Change notification.
//!
//! Every model instance owns its observer list. A change is delivered
//! synchronously, after storage is updated, first to listeners on the
//! field channel of the accessor that was written and then to tree-wide
//! listeners. Writes that leave the stored value unchanged notify nobody.
//!
//! # Usage
//!
//! ```
//! use fieldkit::{Field, Model, SchemaBuilder, Value};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! let schema = SchemaBuilder::new("Shape")
//!     .field(Field::integer("width").with_default(32))
//!     .build()
//!     .unwrap();
//! let mut shape = Model::with_defaults(&schema);
//!
//! let seen = Arc::new(AtomicU32::new(0));
//! let counter = seen.clone();
//! shape.on_change(move |_model, _event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! shape.set("width", 64).unwrap();
//! shape.set("width", 64).unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

use crate::model::Model;
use crate::value::{Key, Value};
use std::fmt;
use std::sync::Arc;

/// Payload of one change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Top-level field that changed.
    pub field: String,
    /// Keys leading to the changed element; empty for property writes.
    pub path: Vec<Key>,
    /// New stored value at `path`.
    pub value: Value,
}

/// Receiver of change notifications.
///
/// Listeners run inline with the write that triggered them and must not
/// block.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, model: &Model, event: &ChangeEvent);
}

/// Closure-based listener.
pub struct ClosureListener<F: Fn(&Model, &ChangeEvent) + Send + Sync> {
    callback: F,
}

impl<F: Fn(&Model, &ChangeEvent) + Send + Sync> ClosureListener<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: Fn(&Model, &ChangeEvent) + Send + Sync> ChangeListener for ClosureListener<F> {
    fn on_change(&self, model: &Model, event: &ChangeEvent) {
        (self.callback)(model, event);
    }
}

/// Handle returned by a subscription, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Channel {
    /// Every change of the instance.
    Tree,
    /// Changes written through one accessor.
    Field(String),
}

/// Observer list owned by one model instance.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(Subscription, Channel, Arc<dyn ChangeListener>)>,
}

impl Observers {
    pub(crate) fn subscribe(
        &mut self,
        channel: Channel,
        listener: Arc<dyn ChangeListener>,
    ) -> Subscription {
        self.next_id += 1;
        let sub = Subscription(self.next_id);
        self.entries.push((sub, channel, listener));
        sub
    }

    pub(crate) fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _, _)| *id != sub);
        self.entries.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Field channel of `accessor` first, then the tree channel.
    pub(crate) fn emit(&self, model: &Model, accessor: &str, event: &ChangeEvent) {
        let field_listeners = self
            .entries
            .iter()
            .filter(|(_, channel, _)| matches!(channel, Channel::Field(name) if name == accessor));
        let tree_listeners = self
            .entries
            .iter()
            .filter(|(_, channel, _)| *channel == Channel::Tree);
        for (_, _, listener) in field_listeners.chain(tree_listeners) {
            listener.on_change(model, event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.entries.len())
            .finish()
    }
}
