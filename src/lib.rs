// Copyright 2026 Pagesift Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pagesift: adaptive web scraping engine.
//!
//! Extracts structured, labeled content sections from arbitrary web
//! pages. A cheap static fetch is tried first; a heuristic over the
//! static document decides whether the page needs a headless browser,
//! in which case basic user interaction (tab clicks, "load more",
//! pagination, infinite scroll) is simulated before extraction.
//!
//! The library surface is [`engine::ScrapeEngine`]; the binary wraps it
//! in an HTTP API (`serve`) and a one-shot CLI (`scrape`).

pub mod cli;
pub mod config;
pub mod detect;
pub mod dom;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod interact;
pub mod model;
pub mod renderer;
pub mod rest;
