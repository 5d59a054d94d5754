// usbtop - Bus Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Registry of observed USB buses and their devices.

pub mod models;
mod registry;

pub use models::{BusSnapshot, BusTotals, DeviceSnapshot, UsbPacket};
pub use registry::{UsbBus, UsbBuses};
