// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::models::{Category, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON, NewCategory, NewNotification};
use crate::session::Session;
use crate::store::Store;
use crate::utils::{ensure_name, validate_color};

use super::{notifications, query_in};

/// Seeded by `import_defaults`: (name, description, icon, colour).
const DEFAULTS: [(&str, &str, &str, &str); 8] = [
    ("Education", "Education and learning", "book", "#D4A5A5"),
    ("Housing", "Housing and accommodation", "home", "#1ABC9C"),
    ("Food", "Groceries and dining out", "food", "#FF6B6B"),
    ("Transport", "Fuel, fares and parking", "car", "#4ECDC4"),
    ("Shopping", "Clothes and everyday purchases", "shopping", "#FFA07A"),
    ("Entertainment", "Movies, games and events", "movie", "#9B59B6"),
    ("Health", "Medical and fitness", "heart-pulse", "#E74C3C"),
    ("Utilities", "Power, water and internet", "flash", "#F1C40F"),
];

fn normalised(new: NewCategory) -> Result<NewCategory> {
    Ok(NewCategory {
        name: ensure_name("Category name", &new.name)?,
        description: new.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        icon: new.icon.map(|i| i.trim().to_string()).filter(|i| !i.is_empty()),
        color: new.color.as_deref().map(validate_color).transpose()?,
    })
}

pub fn list(store: &Store, session: &Session) -> Result<Vec<Category>> {
    let me = session.require()?;
    let mut stmt = store
        .conn()
        .prepare("SELECT * FROM categories WHERE user_id=?1 ORDER BY name")?;
    let rows = stmt.query_map(params![me], Category::from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn create(store: &Store, session: &Session, new: NewCategory) -> Result<Category> {
    let me = session.require()?;
    let new = normalised(new)?;
    if find_by_name(store.conn(), me, &new.name)?.is_some() {
        return Err(TrackerError::Validation(format!(
            "Category '{}' already exists",
            new.name
        )));
    }
    store.conn().execute(
        "INSERT INTO categories(user_id, name, description, icon, color, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            me,
            new.name,
            new.description,
            new.icon.as_deref().unwrap_or(DEFAULT_CATEGORY_ICON),
            new.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR),
            Utc::now()
        ],
    )?;
    let id = store.conn().last_insert_rowid();
    tracing::info!(id, name = %new.name, "category created");
    store.changed(Table::Categories, ChangeKind::Insert, id);
    let cat = owned(store.conn(), me, id)?;
    notifications::raise(
        store,
        me,
        NewNotification {
            kind: "category_created".into(),
            title: "Category created".into(),
            message: format!("Category '{}' is ready to use", cat.name),
            icon: Some(cat.icon.clone()),
            icon_color: Some(cat.color.clone()),
            ..Default::default()
        },
    )?;
    Ok(cat)
}

pub fn update(store: &Store, session: &Session, id: i64, new: NewCategory) -> Result<Category> {
    let me = session.require()?;
    let current = owned(store.conn(), me, id)?;
    let new = normalised(new)?;
    if let Some(other) = find_by_name(store.conn(), me, &new.name)? {
        if other.id != id {
            return Err(TrackerError::Validation(format!(
                "Category '{}' already exists",
                new.name
            )));
        }
    }
    store.conn().execute(
        "UPDATE categories SET name=?1, description=?2, icon=?3, color=?4 WHERE id=?5 AND user_id=?6",
        params![
            new.name,
            new.description,
            new.icon.unwrap_or(current.icon),
            new.color.unwrap_or(current.color),
            id,
            me
        ],
    )?;
    tracing::info!(id, "category updated");
    store.changed(Table::Categories, ChangeKind::Update, id);
    owned(store.conn(), me, id)
}

/// Expenses keep pointing at the removed id and read as "Uncategorized".
pub fn delete(store: &Store, session: &Session, id: i64) -> Result<()> {
    let me = session.require()?;
    let n = store.conn().execute(
        "DELETE FROM categories WHERE id=?1 AND user_id=?2",
        params![id, me],
    )?;
    if n == 0 {
        return Err(TrackerError::NotFound(format!("Category {}", id)));
    }
    tracing::info!(id, "category deleted");
    store.changed(Table::Categories, ChangeKind::Delete, id);
    Ok(())
}

/// Adds the stock categories the caller does not have yet.
pub fn import_defaults(store: &Store, session: &Session) -> Result<Vec<Category>> {
    store.atomically(|store| {
        let me = session.require()?;
        let now = Utc::now();
        let mut added = 0;
        for (name, description, icon, color) in DEFAULTS {
            added += store.conn().execute(
                "INSERT OR IGNORE INTO categories(user_id, name, description, icon, color, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![me, name, description, icon, color, now],
            )?;
        }
        tracing::info!(added, "default categories imported");
        if added > 0 {
            store.changed_many(Table::Categories, ChangeKind::Insert);
        }
        list(store, session)
    })
}

pub fn owned(conn: &Connection, user_id: i64, id: i64) -> Result<Category> {
    conn.query_row(
        "SELECT * FROM categories WHERE id=?1 AND user_id=?2",
        params![id, user_id],
        Category::from_row,
    )
    .optional()?
    .ok_or_else(|| TrackerError::NotFound(format!("Category {}", id)))
}

pub fn find_by_name(conn: &Connection, user_id: i64, name: &str) -> Result<Option<Category>> {
    let c = conn
        .query_row(
            "SELECT * FROM categories WHERE user_id=?1 AND name=?2 COLLATE NOCASE",
            params![user_id, name.trim()],
            Category::from_row,
        )
        .optional()?;
    Ok(c)
}

/// Looks categories up by id regardless of owner; ids with no row are
/// simply absent from the map.
pub fn lookup(conn: &Connection, ids: &[i64]) -> Result<HashMap<i64, Category>> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    let rows = query_in(conn, "SELECT * FROM categories WHERE id IN ({ids})", &ids, Category::from_row)?;
    Ok(rows.into_iter().map(|c| (c.id, c)).collect())
}
