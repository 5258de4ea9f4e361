// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod chart;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod labels;
pub mod log;
pub mod models;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod timeline;
pub mod utils;
pub mod valuation;
