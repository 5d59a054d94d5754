// usbtop - usbmon Parser
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Parser for the usbmon `u` text format.
//!
//! Each line is one URB event:
//!
//! ```text
//! ffff8880a1b2c3d4 3575914555 S Ci:1:001:0 s a3 00 0000 0003 0004 4 <
//! ffff8880a1b2c3d4 3575914560 C Ci:1:001:0 0 4 = 01050000
//! ffff8880c0ffee00 4128379752 S Bo:1:005:2 -115 31 = 55534243 ...
//! ffff8880aaaa0000 1254441283 C Ii:2:003:1 0:8 8 = 0000000000000000
//! ffff8880bbbb0000 2110003310 C Zi:1:004:1 0:1:1234:0 2 0:0:192 0:192:192 384 = ...
//! ```
//!
//! Fields: URB tag, timestamp (µs), event type, address word, then a setup
//! packet or a status word, isochronous descriptors, and the data length.

use crate::bus::UsbPacket;
use crate::stats::Direction;

/// Maximum number of isochronous descriptors printed per line.
const ISODESC_MAX: usize = 5;

/// Kind of URB event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Submission,
    Callback,
    Error,
}

/// USB transfer type from the address word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Isochronous,
    Interrupt,
    Control,
    Bulk,
}

impl TransferType {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'Z' => Some(Self::Isochronous),
            'I' => Some(Self::Interrupt),
            'C' => Some(Self::Control),
            'B' => Some(Self::Bulk),
            _ => None,
        }
    }
}

/// One parsed usbmon line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbEvent {
    pub timestamp_us: u64,
    pub event_type: EventType,
    pub transfer_type: TransferType,
    pub direction: Direction,
    pub bus_id: u16,
    pub device_id: u16,
    pub endpoint: u8,
    /// Status word, `None` when a setup packet was printed instead.
    pub status: Option<i32>,
    /// URB data length in bytes.
    pub length: u64,
}

impl UsbEvent {
    /// Bytes that actually crossed the bus with this event.
    ///
    /// OUT data moves when the URB is submitted, IN data when it completes.
    /// Every other event is bookkeeping and carries no payload.
    pub fn payload(&self) -> Option<u64> {
        match (self.event_type, self.direction) {
            (EventType::Submission, Direction::ToDevice)
            | (EventType::Callback, Direction::FromDevice) => Some(self.length),
            _ => None,
        }
    }

    /// Convert into a registry packet stamped at `timestamp`, if the event
    /// carries payload.
    pub fn to_packet(&self, timestamp: f64) -> Option<UsbPacket> {
        self.payload().map(|size| UsbPacket {
            timestamp,
            size,
            direction: self.direction,
            device_id: self.device_id,
            bus_id: self.bus_id,
        })
    }
}

/// Parse one usbmon text line. Returns `None` for malformed lines.
pub fn parse_line(line: &str) -> Option<UsbEvent> {
    let mut fields = line.split_whitespace();

    let _urb_tag = fields.next()?;
    let timestamp_us: u64 = fields.next()?.parse().ok()?;
    let event_type = match fields.next()? {
        "S" => EventType::Submission,
        "C" => EventType::Callback,
        "E" => EventType::Error,
        _ => return None,
    };
    let (transfer_type, direction, bus_id, device_id, endpoint) = parse_address(fields.next()?)?;

    let first = fields.next()?;
    let status = if first == "s" {
        // bmRequestType bRequest wValue wIndex wLength
        for _ in 0..5 {
            fields.next()?;
        }
        None
    } else {
        let status: i32 = first.split(':').next()?.parse().ok()?;
        if transfer_type == TransferType::Isochronous && event_type != EventType::Error {
            let ndesc: usize = fields.next()?.parse().ok()?;
            for _ in 0..ndesc.min(ISODESC_MAX) {
                fields.next()?;
            }
        }
        Some(status)
    };

    let length: u64 = fields.next()?.parse().ok()?;

    Some(UsbEvent {
        timestamp_us,
        event_type,
        transfer_type,
        direction,
        bus_id,
        device_id,
        endpoint,
        status,
        length,
    })
}

/// Parse an address word such as `Bo:1:005:2`.
fn parse_address(word: &str) -> Option<(TransferType, Direction, u16, u16, u8)> {
    let mut parts = word.split(':');

    let mut kind = parts.next()?.chars();
    let transfer_type = TransferType::from_char(kind.next()?)?;
    let direction = match kind.next()? {
        'i' => Direction::FromDevice,
        'o' => Direction::ToDevice,
        _ => return None,
    };
    if kind.next().is_some() {
        return None;
    }

    let bus_id: u16 = parts.next()?.parse().ok()?;
    let device_id: u16 = parts.next()?.parse().ok()?;
    let endpoint: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some((transfer_type, direction, bus_id, device_id, endpoint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_control_setup() {
        let event = parse_line("ffff8880a1b2c3d4 3575914555 S Ci:1:001:0 s a3 00 0000 0003 0004 4 <").unwrap();
        assert_eq!(event.timestamp_us, 3575914555);
        assert_eq!(event.event_type, EventType::Submission);
        assert_eq!(event.transfer_type, TransferType::Control);
        assert_eq!(event.direction, Direction::FromDevice);
        assert_eq!(event.bus_id, 1);
        assert_eq!(event.device_id, 1);
        assert_eq!(event.endpoint, 0);
        assert_eq!(event.status, None);
        assert_eq!(event.length, 4);
        // IN submission carries no data yet
        assert_eq!(event.payload(), None);
    }

    #[test]
    fn test_parse_control_completion() {
        let event = parse_line("ffff8880a1b2c3d4 3575914560 C Ci:1:001:0 0 4 = 01050000").unwrap();
        assert_eq!(event.status, Some(0));
        assert_eq!(event.payload(), Some(4));
    }

    #[test]
    fn test_parse_bulk_out() {
        let submit = parse_line("ffff8880c0ffee00 4128379752 S Bo:1:005:2 -115 31 = 55534243 5e000000 00000000 00000600 00000000 00000000 00000000 000000").unwrap();
        assert_eq!(submit.transfer_type, TransferType::Bulk);
        assert_eq!(submit.direction, Direction::ToDevice);
        assert_eq!(submit.status, Some(-115));
        assert_eq!(submit.payload(), Some(31));

        let complete = parse_line("ffff8880c0ffee00 4128379808 C Bo:1:005:2 0 31 >").unwrap();
        assert_eq!(complete.payload(), None);
    }

    #[test]
    fn test_parse_interrupt_status_interval() {
        let event = parse_line("ffff8880aaaa0000 1254441283 C Ii:2:003:1 0:8 8 = 0000000000000000").unwrap();
        assert_eq!(event.transfer_type, TransferType::Interrupt);
        assert_eq!(event.bus_id, 2);
        assert_eq!(event.device_id, 3);
        assert_eq!(event.endpoint, 1);
        assert_eq!(event.status, Some(0));
        assert_eq!(event.payload(), Some(8));
    }

    #[test]
    fn test_parse_isochronous_descriptors() {
        let event = parse_line("ffff8880bbbb0000 2110003310 C Zi:1:004:1 0:1:1234:0 2 0:0:192 0:192:192 384 = 00000000").unwrap();
        assert_eq!(event.transfer_type, TransferType::Isochronous);
        assert_eq!(event.length, 384);
        assert_eq!(event.payload(), Some(384));
    }

    #[test]
    fn test_parse_isochronous_caps_descriptors() {
        let event = parse_line(
            "ffff8880bbbb0000 2110003310 C Zi:1:004:1 0:1:1234:0 8 0:0:8 0:8:8 0:16:8 0:24:8 0:32:8 64 <",
        )
        .unwrap();
        assert_eq!(event.length, 64);
    }

    #[test]
    fn test_parse_error_event() {
        let event = parse_line("ffff8880c0ffee00 4128379900 E Bo:1:005:2 -32 0").unwrap();
        assert_eq!(event.event_type, EventType::Error);
        assert_eq!(event.status, Some(-32));
        assert_eq!(event.payload(), None);
    }

    #[test]
    fn test_to_packet() {
        let event = parse_line("ffff8880c0ffee00 4128379752 S Bo:3:012:2 -115 512 = 00").unwrap();
        let packet = event.to_packet(1.5).unwrap();
        assert_eq!(packet.timestamp, 1.5);
        assert_eq!(packet.size, 512);
        assert_eq!(packet.bus_id, 3);
        assert_eq!(packet.device_id, 12);
        assert_eq!(packet.direction, Direction::ToDevice);
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("garbage"), None);
        assert_eq!(parse_line("ffff 123 X Bo:1:005:2 0 31 >"), None);
        assert_eq!(parse_line("ffff 123 S Xo:1:005:2 0 31 >"), None);
        assert_eq!(parse_line("ffff 123 S Bx:1:005:2 0 31 >"), None);
        assert_eq!(parse_line("ffff 123 S Bo:1:005 0 31 >"), None);
        assert_eq!(parse_line("ffff 123 S Bo:1:005:2 0"), None);
        assert_eq!(parse_line("ffff 123 S Ci:1:001:0 s a3 00"), None);
        assert_eq!(parse_line("ffff abc S Bo:1:005:2 0 31 >"), None);
    }
}
