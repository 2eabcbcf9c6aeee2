// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod models;
pub mod present;
pub mod report;
pub mod reshape;
pub mod sources;
pub mod utils;
