// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod prices;
pub mod funds;
pub mod transactions;
pub mod checkpoint;
pub mod timeline;
pub mod reports;
pub mod importer;
pub mod exporter;
pub mod config;
pub mod doctor;
