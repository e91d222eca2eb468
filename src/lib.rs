// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod notify;
pub mod services;
pub mod session;
pub mod settings;
pub mod sharing;
pub mod store;
pub mod utils;

pub use error::{Result, TrackerError};
pub use session::Session;
pub use store::Store;
