// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::cell::{Cell, RefCell};

use crate::error::Result;
use crate::events::{ChangeKind, EventBus, Table};
use crate::notify::{Dispatcher, LogDispatcher};

/// Change events and pushes held back until the surrounding transaction
/// commits.
#[derive(Default)]
struct Outbox {
    events: Vec<(Table, ChangeKind, Option<i64>)>,
    pushes: Vec<(String, String)>,
}

/// Everything a service call needs: the data store, the change bus that
/// mirrors its mutations, and the outbound notification channel.
pub struct Store {
    conn: Connection,
    bus: EventBus,
    dispatcher: Box<dyn Dispatcher>,
    in_tx: Cell<bool>,
    outbox: RefCell<Outbox>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Store {
            conn,
            bus: EventBus::new(),
            dispatcher: Box::new(LogDispatcher),
            in_tx: Cell::new(false),
            outbox: RefCell::new(Outbox::default()),
        }
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::db::init_schema(&conn)?;
        Ok(Store::new(conn))
    }

    pub fn with_dispatcher(mut self, dispatcher: impl Dispatcher + 'static) -> Self {
        self.dispatcher = Box::new(dispatcher);
        self
    }

    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn dispatcher(&self) -> &dyn Dispatcher {
        self.dispatcher.as_ref()
    }

    /// Runs `f` inside one transaction. Events and pushes raised by `f`
    /// go out only after the commit; on error everything is rolled back
    /// and nothing is published. Nested calls join the outer transaction.
    pub fn atomically<T>(&self, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        if self.in_tx.get() {
            return f(self);
        }
        let tx = self.conn.unchecked_transaction()?;
        self.in_tx.set(true);
        let result = f(self).and_then(|v| {
            tx.commit()?;
            Ok(v)
        });
        self.in_tx.set(false);
        let outbox = self.outbox.take();
        match result {
            Ok(v) => {
                for (title, body) in &outbox.pushes {
                    self.dispatcher.schedule(title, body);
                }
                for (table, kind, id) in outbox.events {
                    self.bus.publish(table, kind, id);
                }
                Ok(v)
            }
            Err(e) => {
                tracing::debug!(error = %e, dropped = outbox.events.len(), "transaction rolled back");
                Err(e)
            }
        }
    }

    pub(crate) fn changed(&self, table: Table, kind: ChangeKind, id: i64) {
        self.emit(table, kind, Some(id));
    }

    /// A change touching an unknown set of rows.
    pub(crate) fn changed_many(&self, table: Table, kind: ChangeKind) {
        self.emit(table, kind, None);
    }

    pub(crate) fn push(&self, title: &str, body: &str) {
        if self.in_tx.get() {
            self.outbox
                .borrow_mut()
                .pushes
                .push((title.to_string(), body.to_string()));
        } else {
            self.dispatcher.schedule(title, body);
        }
    }

    fn emit(&self, table: Table, kind: ChangeKind, id: Option<i64>) {
        if self.in_tx.get() {
            self.outbox.borrow_mut().events.push((table, kind, id));
        } else {
            self.bus.publish(table, kind, id);
        }
    }
}
