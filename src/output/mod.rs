// usbtop - Output Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Renderers turning registry snapshots into console or CSV output.

mod console;
mod csv;
mod format;

pub use console::ConsoleRenderer;
pub use csv::CsvRenderer;
pub use format::format_rate;

use anyhow::Result;

use crate::bus::BusSnapshot;

/// Something that can display one refresh worth of statistics.
pub trait Renderer {
    /// Render every bus in `snapshots`.
    fn render(&mut self, snapshots: &[BusSnapshot]) -> Result<()>;
}
