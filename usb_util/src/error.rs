// Copyright 2019 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use remain::sorted;
use thiserror::Error;

use crate::types::TransferType;

/// Reason a descriptor could not be decoded.
#[sorted]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFault {
    #[error("bLength {declared} does not match the fixed size {expected}")]
    LengthMismatch { declared: usize, expected: usize },
    #[error("bLength {declared} runs past the end of the buffer ({available} bytes left)")]
    LengthOverrun { declared: usize, available: usize },
    #[error("bLength {declared} is smaller than the minimum size {minimum}")]
    LengthTooShort { declared: usize, minimum: usize },
    #[error("buffer holds {available} bytes, at least {needed} are needed")]
    Truncated { needed: usize, available: usize },
    #[error("unexpected descriptor type 0x{found:02x}, expected 0x{expected:02x}")]
    UnexpectedType { found: u8, expected: u8 },
}

#[sorted]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("buffer too small: {required} bytes required, {actual} available")]
    BufferTooSmall { required: usize, actual: usize },
    #[error("invalid isochronous packet index {0}")]
    InvalidPacketIndex(i32),
    #[error("malformed {descriptor} descriptor: {fault}")]
    MalformedDescriptor {
        descriptor: &'static str,
        fault: DescriptorFault,
    },
    #[error("operation requires a {expected:?} transfer, transfer is {actual:?}")]
    TransferKindMismatch {
        expected: TransferType,
        actual: TransferType,
    },
    #[error("unsupported transfer type {0}")]
    UnsupportedTransferKind(u8),
}

impl Error {
    pub(crate) fn malformed(descriptor: &'static str, fault: DescriptorFault) -> Self {
        Error::MalformedDescriptor { descriptor, fault }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
