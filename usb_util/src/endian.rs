// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Conversion between host byte order and USB wire order.
//!
//! USB multi-byte fields are always little-endian on the bus. Both directions
//! of each conversion perform the same swap; the two names only document
//! which way a value is travelling.

/// Convert a host-order 16-bit value to wire order.
#[inline]
pub const fn to_wire_order16(x: u16) -> u16 {
    x.to_le()
}

/// Convert a wire-order 16-bit value to host order.
#[inline]
pub const fn from_wire_order16(x: u16) -> u16 {
    u16::from_le(x)
}

/// Convert a host-order 32-bit value to wire order.
#[inline]
pub const fn to_wire_order32(x: u32) -> u32 {
    x.to_le()
}

/// Convert a wire-order 32-bit value to host order.
#[inline]
pub const fn from_wire_order32(x: u32) -> u32 {
    u32::from_le(x)
}
