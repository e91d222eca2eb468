// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Change notifications between mutating services and whoever displays the
//! data.
//!
//! A handler registered for a table runs after every mutation of that table.
//! It may run more than once for the same logical change and in any order
//! relative to other tables, so the event is only a hint to re-fetch. Once a
//! [`Subscription`] is dropped or unsubscribed its handler never runs again,
//! even when a publish was already in flight.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Profiles,
    ExpenseBoards,
    Expenses,
    Categories,
    SharedUsers,
    Notifications,
    Settings,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::ExpenseBoards => "expense_boards",
            Table::Expenses => "expenses",
            Table::Categories => "categories",
            Table::SharedUsers => "shared_users",
            Table::Notifications => "notifications",
            Table::Settings => "settings",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: Option<i64>,
}

type Handler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Entry {
    table: Table,
    active: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    entries: Mutex<BTreeMap<u64, Entry>>,
}

impl Registry {
    fn remove(&self, id: u64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(&id);
        }
    }
}

#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Registry>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change<F>(&self, table: Table, handler: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        let entry = Entry {
            table,
            active: active.clone(),
            handler: Arc::new(handler),
        };
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.insert(id, entry);
        }
        tracing::debug!(%table, id, "subscribed");
        Subscription {
            parts: vec![(id, active)],
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Registers one handler on several tables behind a single handle.
    pub fn on_any<F>(&self, tables: &[Table], handler: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let mut combined = Subscription {
            parts: Vec::new(),
            registry: Arc::downgrade(&self.inner),
        };
        for table in tables {
            let h = handler.clone();
            let mut sub = self.on_change(*table, move |ev| h(ev));
            combined.parts.append(&mut sub.parts);
        }
        combined
    }

    pub fn publish(&self, table: Table, kind: ChangeKind, id: Option<i64>) {
        let event = ChangeEvent { table, kind, id };
        // Dispatch outside the lock so handlers may subscribe or unsubscribe.
        let targets: Vec<(Arc<AtomicBool>, Handler)> = match self.inner.entries.lock() {
            Ok(entries) => entries
                .values()
                .filter(|e| e.table == table)
                .map(|e| (e.active.clone(), e.handler.clone()))
                .collect(),
            Err(_) => return,
        };
        tracing::debug!(%table, ?kind, ?id, subscribers = targets.len(), "publish");
        for (active, handler) in targets {
            if active.load(Ordering::Acquire) {
                handler(&event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

/// Handle returned by [`EventBus::on_change`]; detaches on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    parts: Vec<(u64, Arc<AtomicBool>)>,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    pub fn is_active(&self) -> bool {
        self.parts.iter().any(|(_, a)| a.load(Ordering::Acquire))
    }

    fn detach(&mut self) {
        let registry = self.registry.upgrade();
        for (id, active) in self.parts.drain(..) {
            active.store(false, Ordering::Release);
            if let Some(r) = &registry {
                r.remove(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("handlers", &self.parts.len())
            .finish()
    }
}

/// Tables whose changes alter the dashboard.
pub const DASHBOARD_TABLES: [Table; 3] = [Table::Expenses, Table::ExpenseBoards, Table::Categories];

pub fn subscribe_dashboard<F>(bus: &EventBus, handler: F) -> Subscription
where
    F: Fn(&ChangeEvent) + Send + Sync + 'static,
{
    bus.on_any(&DASHBOARD_TABLES, handler)
}

/// Dirty flag for a view: handlers mark it, the view drains it before
/// re-fetching. Any number of notifications between two drains collapse
/// into one refresh.
#[derive(Debug, Clone, Default)]
pub struct Refresh {
    dirty: Arc<AtomicBool>,
}

impl Refresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// A subscription that marks this flag on every change to `tables`.
    pub fn watch(&self, bus: &EventBus, tables: &[Table]) -> Subscription {
        let flag = self.clone();
        bus.on_any(tables, move |_| flag.mark())
    }
}
