// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The boundary to whatever actually moves bytes over a USB bus.

use std::result;

use log::debug;

use crate::usb_transfer::Transfer;
use crate::ErrorCode;

pub type TransportResult<T> = result::Result<T, ErrorCode>;

/// Identifies a submitted transfer so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransferHandle(u64);

impl TransferHandle {
    pub fn new(id: u64) -> Self {
        TransferHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can carry out transfers on a device.
///
/// A transport takes ownership of each submitted transfer and reports the outcome by calling
/// `Transfer::complete`, possibly from another thread.
pub trait Transport {
    /// Submit `transfer`. On failure the transfer is dropped without its callback running.
    fn submit(&self, transfer: Transfer) -> TransportResult<TransferHandle>;

    /// Ask for a submitted transfer to be cancelled. It still completes, with status
    /// `Cancelled`. Fails with `ErrorCode::NotFound` if it already completed.
    fn cancel(&self, handle: &TransferHandle) -> TransportResult<()>;
}

/// Source of the list of attached devices. Each device handed out carries one reference that
/// must be given back through `unref_device`.
pub trait DeviceSource {
    type Device;

    fn get_device_list(&self) -> TransportResult<Vec<Self::Device>>;

    fn unref_device(&self, device: Self::Device);
}

/// List of attached devices. Every device still in the list when it is dropped is handed back
/// to its source exactly once.
pub struct DeviceList<'a, S: DeviceSource> {
    source: &'a S,
    devices: Vec<Option<S::Device>>,
}

impl<'a, S: DeviceSource> DeviceList<'a, S> {
    /// Returns a list of USB devices currently attached to the system.
    pub fn new(source: &'a S) -> TransportResult<Self> {
        let devices = source.get_device_list()?;
        Ok(DeviceList {
            source,
            devices: devices.into_iter().map(Some).collect(),
        })
    }

    /// Number of entries, including ones already taken.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&S::Device> {
        self.devices.get(index)?.as_ref()
    }

    /// Devices still held by the list.
    pub fn iter(&self) -> impl Iterator<Item = &S::Device> {
        self.devices.iter().flatten()
    }

    /// Move a device out of the list together with its reference. The caller becomes
    /// responsible for giving the reference back.
    pub fn take(&mut self, index: usize) -> Option<S::Device> {
        self.devices.get_mut(index)?.take()
    }
}

impl<'a, S: DeviceSource> Drop for DeviceList<'a, S> {
    fn drop(&mut self) {
        let mut released = 0;
        for device in self.devices.drain(..).flatten() {
            self.source.unref_device(device);
            released += 1;
        }
        debug!("device list released {} devices", released);
    }
}
