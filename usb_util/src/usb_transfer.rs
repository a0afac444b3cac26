// Copyright 2019 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;

use crate::iso::IsoPacketDescriptor;
use crate::setup::read_setup;
use crate::setup::ControlSetup;
use crate::setup::CONTROL_SETUP_SIZE;
use crate::Error;
use crate::Result;
use crate::TransferFlags;
use crate::TransferStatus;
use crate::TransferType;

/// Completion callback. It receives the finished transfer back and runs at most once.
pub type TransferCallback = Box<dyn FnOnce(Transfer) + Send + 'static>;

/// Kind of a transfer, with the data only some kinds carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferKind {
    Control,
    Isochronous(Vec<IsoPacketDescriptor>),
    Bulk,
    BulkStream(u32),
    Interrupt,
}

impl TransferKind {
    pub fn transfer_type(&self) -> TransferType {
        match self {
            TransferKind::Control => TransferType::Control,
            TransferKind::Isochronous(_) => TransferType::Isochronous,
            TransferKind::Bulk => TransferType::Bulk,
            TransferKind::BulkStream(_) => TransferType::BulkStream,
            TransferKind::Interrupt => TransferType::Interrupt,
        }
    }
}

/// A transfer request, owned by the caller until it is handed to a transport.
pub struct Transfer {
    endpoint: u8,
    kind: TransferKind,
    flags: TransferFlags,
    timeout: u32,
    buffer: Vec<u8>,
    length: usize,
    actual_length: usize,
    status: TransferStatus,
    user_data: usize,
    callback: Option<TransferCallback>,
}

/// Length of a control transfer: the setup packet plus the data stage it announces.
///
/// A buffer too short to hold a setup packet keeps its own length, so an empty buffer gives 0
/// and a partial header is passed through unchanged for the transport to reject.
fn control_length(buffer: &[u8]) -> usize {
    match read_setup(buffer) {
        Ok(setup) => CONTROL_SETUP_SIZE + usize::from(setup.length),
        // Empty or shorter than a setup packet.
        Err(_) => buffer.len(),
    }
}

/// Collects the fields shared by every transfer kind and fills in the kind-specific ones.
#[derive(Default)]
pub struct TransferBuilder {
    endpoint: u8,
    timeout: u32,
    buffer: Vec<u8>,
    length: Option<usize>,
    flags: TransferFlags,
    user_data: usize,
    callback: Option<TransferCallback>,
    num_iso_packets: usize,
    stream_id: u32,
}

impl TransferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target endpoint. Ignored for control transfers, which always use endpoint 0.
    pub fn endpoint(mut self, endpoint: u8) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Timeout in milliseconds; 0 means no timeout.
    pub fn timeout(mut self, timeout: u32) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn buffer(mut self, buffer: Vec<u8>) -> Self {
        self.buffer = buffer;
        self
    }

    /// Number of bytes to transfer. Defaults to the buffer length. Control transfers derive it
    /// from the setup packet instead.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn flags(mut self, flags: TransferFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn user_data(mut self, user_data: usize) -> Self {
        self.user_data = user_data;
        self
    }

    pub fn callback<C: 'static + FnOnce(Transfer) + Send>(mut self, cb: C) -> Self {
        self.callback = Some(Box::new(cb));
        self
    }

    pub fn num_iso_packets(mut self, num_iso_packets: usize) -> Self {
        self.num_iso_packets = num_iso_packets;
        self
    }

    pub fn stream_id(mut self, stream_id: u32) -> Self {
        self.stream_id = stream_id;
        self
    }

    /// Build a transfer of the given type.
    pub fn build(self, transfer_type: TransferType) -> Transfer {
        let (endpoint, length) = match transfer_type {
            TransferType::Control => (0, control_length(&self.buffer)),
            _ => (
                self.endpoint,
                self.length.unwrap_or(self.buffer.len()),
            ),
        };
        let kind = match transfer_type {
            TransferType::Control => TransferKind::Control,
            TransferType::Isochronous => TransferKind::Isochronous(vec![
                IsoPacketDescriptor::default();
                self.num_iso_packets
            ]),
            TransferType::Bulk => TransferKind::Bulk,
            TransferType::BulkStream => TransferKind::BulkStream(self.stream_id),
            TransferType::Interrupt => TransferKind::Interrupt,
        };
        Transfer {
            endpoint,
            kind,
            flags: self.flags,
            timeout: self.timeout,
            buffer: self.buffer,
            length,
            actual_length: 0,
            status: TransferStatus::Completed,
            user_data: self.user_data,
            callback: self.callback,
        }
    }

    /// Build a transfer from a raw transfer type code.
    pub fn build_from_code(self, code: u8) -> Result<Transfer> {
        let transfer_type =
            TransferType::from_code(code).ok_or(Error::UnsupportedTransferKind(code))?;
        Ok(self.build(transfer_type))
    }
}

/// Build a control transfer. `buffer` starts with the setup packet, followed by room for the
/// data stage.
pub fn control_transfer(buffer: Vec<u8>, timeout: u32) -> Transfer {
    TransferBuilder::new()
        .buffer(buffer)
        .timeout(timeout)
        .build(TransferType::Control)
}

/// Build a control transfer for `setup`, with a zeroed data stage of `setup.length` bytes.
pub fn control_transfer_with_setup(setup: &ControlSetup, timeout: u32) -> Result<Transfer> {
    let mut buffer = vec![0; CONTROL_SETUP_SIZE + usize::from(setup.length)];
    setup.write_to(&mut buffer)?;
    Ok(control_transfer(buffer, timeout))
}

/// Build a data transfer.
pub fn bulk_transfer(endpoint: u8, buffer: Vec<u8>, length: usize, timeout: u32) -> Transfer {
    TransferBuilder::new()
        .endpoint(endpoint)
        .buffer(buffer)
        .length(length)
        .timeout(timeout)
        .build(TransferType::Bulk)
}

/// Build a bulk transfer on stream `stream_id` of a stream-capable endpoint.
pub fn bulk_stream_transfer(
    endpoint: u8,
    stream_id: u32,
    buffer: Vec<u8>,
    length: usize,
    timeout: u32,
) -> Transfer {
    TransferBuilder::new()
        .endpoint(endpoint)
        .stream_id(stream_id)
        .buffer(buffer)
        .length(length)
        .timeout(timeout)
        .build(TransferType::BulkStream)
}

/// Build a data transfer.
pub fn interrupt_transfer(endpoint: u8, buffer: Vec<u8>, length: usize, timeout: u32) -> Transfer {
    TransferBuilder::new()
        .endpoint(endpoint)
        .buffer(buffer)
        .length(length)
        .timeout(timeout)
        .build(TransferType::Interrupt)
}

/// Build an isochronous transfer with `num_iso_packets` zero-length packets. Set the packet
/// lengths with `set_iso_packet_lengths` or `iso_packets_mut` before submitting.
pub fn iso_transfer(
    endpoint: u8,
    buffer: Vec<u8>,
    length: usize,
    num_iso_packets: usize,
    timeout: u32,
) -> Transfer {
    TransferBuilder::new()
        .endpoint(endpoint)
        .buffer(buffer)
        .length(length)
        .num_iso_packets(num_iso_packets)
        .timeout(timeout)
        .build(TransferType::Isochronous)
}

impl Transfer {
    pub fn endpoint(&self) -> u8 {
        self.endpoint
    }

    pub fn kind(&self) -> &TransferKind {
        &self.kind
    }

    pub fn transfer_type(&self) -> TransferType {
        self.kind.transfer_type()
    }

    pub fn flags(&self) -> TransferFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: TransferFlags) {
        self.flags = flags;
    }

    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Get a reference to the buffer.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Get a mutable reference to the buffer.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Give up the transfer and keep its buffer.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// Number of bytes the transport should transfer.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Get actual length of data that was transferred.
    pub fn actual_length(&self) -> usize {
        self.actual_length
    }

    /// Get the transfer status of this transfer.
    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn user_data(&self) -> usize {
        self.user_data
    }

    pub fn set_user_data(&mut self, user_data: usize) {
        self.user_data = user_data;
    }

    /// Set callback function for transfer completion.
    pub fn set_callback<C: 'static + FnOnce(Transfer) + Send>(&mut self, cb: C) {
        self.callback = Some(Box::new(cb));
    }

    /// Stream id of a bulk-stream transfer.
    pub fn stream_id(&self) -> Option<u32> {
        match self.kind {
            TransferKind::BulkStream(stream_id) => Some(stream_id),
            _ => None,
        }
    }

    /// Change the stream of a bulk-stream transfer.
    pub fn set_stream_id(&mut self, stream_id: u32) -> Result<()> {
        match &mut self.kind {
            TransferKind::BulkStream(id) => {
                *id = stream_id;
                Ok(())
            }
            kind => Err(Error::TransferKindMismatch {
                expected: TransferType::BulkStream,
                actual: kind.transfer_type(),
            }),
        }
    }

    /// Setup packet at the start of a control transfer's buffer.
    pub fn control_setup(&self) -> Result<ControlSetup> {
        match self.kind {
            TransferKind::Control => read_setup(&self.buffer),
            _ => Err(Error::TransferKindMismatch {
                expected: TransferType::Control,
                actual: self.transfer_type(),
            }),
        }
    }

    /// Data stage of a control transfer: the buffer after the setup packet.
    pub fn control_data(&self) -> &[u8] {
        match self.kind {
            TransferKind::Control => self.buffer.get(CONTROL_SETUP_SIZE..).unwrap_or_default(),
            _ => &[],
        }
    }

    pub fn num_iso_packets(&self) -> usize {
        self.iso_packets().len()
    }

    /// Per-packet descriptors of an isochronous transfer; empty for other kinds.
    pub fn iso_packets(&self) -> &[IsoPacketDescriptor] {
        match &self.kind {
            TransferKind::Isochronous(packets) => packets,
            _ => &[],
        }
    }

    pub fn iso_packets_mut(&mut self) -> &mut [IsoPacketDescriptor] {
        match &mut self.kind {
            TransferKind::Isochronous(packets) => packets,
            _ => &mut [],
        }
    }

    /// Record the outcome reported by the transport and run the completion callback.
    ///
    /// The callback is taken out of the transfer before it runs, so it runs at most once even
    /// if the callback hands the transfer back for completion again.
    pub fn complete(mut self, status: TransferStatus, actual_length: usize) {
        self.status = status;
        self.actual_length = actual_length;
        // Callback is reset to None.
        if let Some(cb) = self.callback.take() {
            cb(self);
        }
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Transfer")
            .field("endpoint", &self.endpoint)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("timeout", &self.timeout)
            .field("length", &self.length)
            .field("actual_length", &self.actual_length)
            .field("status", &self.status)
            .field("user_data", &self.user_data)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}
