// usbtop - Capture Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Packet capture through the Linux usbmon text interface.
//!
//! # Data Sources
//!
//! - `/sys/kernel/debug/usb/usbmon/<N>u` - per-bus event stream
//! - `/sys/bus/usb/devices/usb<N>/product` - host controller name
//! - `/sys/bus/usb/devices/<N>-*/devnum` - attached device numbers
//!
//! ```text
//! usbmon line → UsbEvent → UsbPacket → UsbBuses
//! ```

mod discovery;
mod sniffer;
pub mod usbmon;

pub use discovery::{attached_devices, bus_description, list_buses, BusInfo};
pub use sniffer::{capture_bus, CaptureStats};
pub use usbmon::{parse_line, EventType, TransferType, UsbEvent};

/// Default usbmon debugfs directory.
pub const USBMON_DIR: &str = "/sys/kernel/debug/usb/usbmon";

/// sysfs directory holding one `usb<N>` entry per root hub.
pub const SYSFS_USB_DEVICES: &str = "/sys/bus/usb/devices";
