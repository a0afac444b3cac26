// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Location of isochronous packets inside a transfer buffer.
//!
//! Packets are laid out back to back in the transfer buffer, so the offset of a packet is the
//! sum of the lengths of the packets before it. Packet indices are limited to `0..=32767`
//! because the wire protocol indexes packets with a signed 16-bit value.

use std::ops::Range;

use crate::usb_transfer::Transfer;
use crate::Error;
use crate::Result;
use crate::TransferStatus;

/// Largest packet index that can be addressed.
pub const MAX_ISO_PACKET_INDEX: i32 = i16::MAX as i32;

/// Length and outcome of one packet of an isochronous transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsoPacketDescriptor {
    pub length: u32,
    pub actual_length: u32,
    pub status: TransferStatus,
}

fn packet_index(transfer: &Transfer, packet: i32) -> Option<usize> {
    if !(0..=MAX_ISO_PACKET_INDEX).contains(&packet) {
        return None;
    }
    let index = usize::try_from(packet).ok()?;
    if index >= transfer.num_iso_packets() {
        return None;
    }
    Some(index)
}

/// Byte offset of `packet` in the transfer buffer: the sum of the lengths of all earlier
/// packets. Returns `None` for an index outside the packet table.
pub fn iso_packet_offset(transfer: &Transfer, packet: i32) -> Option<usize> {
    let index = packet_index(transfer, packet)?;
    Some(
        transfer.iso_packets()[..index]
            .iter()
            .map(|p| p.length as usize)
            .sum(),
    )
}

/// Byte offset of `packet` assuming every packet has the length of the first one, as after
/// `set_iso_packet_lengths`.
pub fn iso_packet_offset_simple(transfer: &Transfer, packet: i32) -> Option<usize> {
    let index = packet_index(transfer, packet)?;
    Some(transfer.iso_packets()[0].length as usize * index)
}

/// Set the length of every packet of the transfer.
pub fn set_iso_packet_lengths(transfer: &mut Transfer, length: u32) {
    for p in transfer.iso_packets_mut() {
        p.length = length;
    }
}

// Byte range of `packet` in the buffer, checked against the buffer size. `simple` sizes and
// places every packet like the first one.
fn packet_range(transfer: &Transfer, packet: i32, simple: bool) -> Result<Range<usize>> {
    let index = packet_index(transfer, packet).ok_or(Error::InvalidPacketIndex(packet))?;
    let packets = transfer.iso_packets();
    let (start, len) = if simple {
        let len = packets[0].length as usize;
        (len * index, len)
    } else {
        (
            packets[..index].iter().map(|p| p.length as usize).sum(),
            packets[index].length as usize,
        )
    };
    let end = start + len;
    if end > transfer.buffer().len() {
        return Err(Error::BufferTooSmall {
            required: end,
            actual: transfer.buffer().len(),
        });
    }
    Ok(start..end)
}

/// Bytes of `packet` in the transfer buffer.
pub fn iso_packet_buffer(transfer: &Transfer, packet: i32) -> Result<&[u8]> {
    let range = packet_range(transfer, packet, false)?;
    Ok(&transfer.buffer()[range])
}

pub fn iso_packet_buffer_mut(transfer: &mut Transfer, packet: i32) -> Result<&mut [u8]> {
    let range = packet_range(transfer, packet, false)?;
    Ok(&mut transfer.buffer_mut()[range])
}

/// Bytes of `packet` assuming every packet has the length of the first one.
pub fn iso_packet_buffer_simple(transfer: &Transfer, packet: i32) -> Result<&[u8]> {
    let range = packet_range(transfer, packet, true)?;
    Ok(&transfer.buffer()[range])
}
