//! tubeseo — YouTube SEO suggestions and analytics from a streaming backend.
//!
//! The backend streams newline-delimited `{type, data}` records for a
//! keyword; [`stream`] reassembles and decodes them, [`dispatch`] routes each
//! one into a named region of a [`render::Surface`], and [`analytics`]
//! fetches and formats per-video performance snapshots. The [`cli`] and the
//! local [`web`] dashboard are thin layers over those pieces.

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod render;
pub mod stream;
pub mod web;
