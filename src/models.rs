// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sharing::ShareStatus;
use crate::utils::decimal_column;

pub const DEFAULT_BOARD_ICON: &str = "view-grid";
pub const DEFAULT_BOARD_COLOR: &str = "#6C5CE7";
pub const DEFAULT_CATEGORY_ICON: &str = "shape";
pub const DEFAULT_CATEGORY_COLOR: &str = "#45B7D1";
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub(crate) fn from_row(r: &Row) -> rusqlite::Result<Self> {
        Ok(Profile {
            id: r.get("id")?,
            full_name: r.get("full_name")?,
            email: r.get("email")?,
            push_token: r.get("push_token")?,
            created_at: r.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub total_budget: Decimal,
    pub share_code: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Board {
    pub(crate) fn from_row(r: &Row) -> rusqlite::Result<Self> {
        let budget: String = r.get("total_budget")?;
        let icon: Option<String> = r.get("icon")?;
        let color: Option<String> = r.get("color")?;
        Ok(Board {
            id: r.get("id")?,
            name: r.get("name")?,
            description: r.get("description")?,
            color: color.unwrap_or_else(|| DEFAULT_BOARD_COLOR.into()),
            icon: icon.unwrap_or_else(|| DEFAULT_BOARD_ICON.into()),
            total_budget: decimal_column(5, &budget)?,
            share_code: r.get("share_code")?,
            created_by: r.get("created_by")?,
            created_at: r.get("created_at")?,
            updated_at: r.get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewBoard {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub total_budget: Decimal,
    pub share_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub(crate) fn from_row(r: &Row) -> rusqlite::Result<Self> {
        let icon: Option<String> = r.get("icon")?;
        let color: Option<String> = r.get("color")?;
        Ok(Category {
            id: r.get("id")?,
            user_id: r.get("user_id")?,
            name: r.get("name")?,
            description: r.get("description")?,
            icon: icon.unwrap_or_else(|| DEFAULT_CATEGORY_ICON.into()),
            color: color.unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.into()),
            created_at: r.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub board_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn from_row(r: &Row) -> rusqlite::Result<Self> {
        let amount: String = r.get("amount")?;
        Ok(Expense {
            id: r.get("id")?,
            board_id: r.get("board_id")?,
            category_id: r.get("category_id")?,
            amount: decimal_column(3, &amount)?,
            description: r.get("description")?,
            date: r.get("date")?,
            payment_method: r.get("payment_method")?,
            created_by: r.get("created_by")?,
            created_at: r.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub board_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub payment_method: Option<String>,
}

/// Expense reshaped for listings: category look and creator name resolved,
/// with fallbacks for whatever no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseView {
    pub id: i64,
    pub board_id: i64,
    pub board: String,
    pub category: String,
    pub icon: String,
    pub color: String,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub payment_method: String,
    pub created_by: i64,
    pub created_by_name: Option<String>,
}

/// Fallback look for an expense whose category is unset or gone.
#[derive(Debug, Clone, Copy)]
pub struct ViewDefaults {
    pub icon: &'static str,
    pub color: &'static str,
    pub board: &'static str,
    pub payment_method: &'static str,
}

impl ViewDefaults {
    /// Used by the paginated expense list.
    pub const LIST: ViewDefaults = ViewDefaults {
        icon: "receipt",
        color: "#6C5CE7",
        board: "Default Board",
        payment_method: "Unknown",
    };
    /// Used by the dashboard's recent activity.
    pub const RECENT: ViewDefaults = ViewDefaults {
        icon: "dots-horizontal",
        color: "#45B7D1",
        board: "Default Board",
        payment_method: "Unknown",
    };
}

impl ExpenseView {
    pub fn build(
        expense: &Expense,
        category: Option<&Category>,
        board_name: Option<&str>,
        creator: Option<&Profile>,
        defaults: ViewDefaults,
    ) -> Self {
        ExpenseView {
            id: expense.id,
            board_id: expense.board_id,
            board: board_name.unwrap_or(defaults.board).to_string(),
            category: category
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            icon: category
                .map(|c| c.icon.clone())
                .unwrap_or_else(|| defaults.icon.to_string()),
            color: category
                .map(|c| c.color.clone())
                .unwrap_or_else(|| defaults.color.to_string()),
            amount: expense.amount,
            description: expense.description.clone(),
            date: expense.date,
            payment_method: expense
                .payment_method
                .clone()
                .unwrap_or_else(|| defaults.payment_method.to_string()),
            created_by: expense.created_by,
            created_by_name: creator.map(|p| p.full_name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareGrant {
    pub id: i64,
    pub board_id: i64,
    pub shared_by: i64,
    pub shared_with: String, // target e-mail
    pub user_id: Option<i64>,
    pub is_accepted: bool,
    pub status: ShareStatus,
    pub created_at: DateTime<Utc>,
}

impl ShareGrant {
    pub(crate) fn from_row(r: &Row) -> rusqlite::Result<Self> {
        let status: String = r.get("status")?;
        let status = status.parse::<ShareStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(ShareGrant {
            id: r.get("id")?,
            board_id: r.get("board_id")?,
            shared_by: r.get("shared_by")?,
            shared_with: r.get("shared_with")?,
            user_id: r.get("user_id")?,
            is_accepted: r.get("is_accepted")?,
            status,
            created_at: r.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub board_name: Option<String>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn from_row(r: &Row) -> rusqlite::Result<Self> {
        Ok(Notification {
            id: r.get("id")?,
            user_id: r.get("user_id")?,
            kind: r.get("type")?,
            title: r.get("title")?,
            message: r.get("message")?,
            board_name: r.get("board_name")?,
            icon: r.get("icon")?,
            icon_color: r.get("icon_color")?,
            read: r.get("read")?,
            created_at: r.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub board_name: Option<String>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
}
