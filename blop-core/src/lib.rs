//! Core transforms for the blop event site.
//!
//! Rows from the community spreadsheet come in as loosely formatted text.
//! This crate turns them into typed events and everything the page renderer
//! needs afterwards:
//! - `date` and `state` normalize the free-text columns
//! - `canonical` collapses duplicate submissions
//! - `group` buckets events by date for the index page
//! - `ics` writes one floating-time calendar file per event
//! - `site` runs the whole pipeline and produces the build manifest

pub mod canonical;
pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod event;
pub mod feed;
pub mod group;
pub mod ics;
pub mod links;
pub mod location;
pub mod site;
pub mod state;

pub use event::{Event, EventRow};
