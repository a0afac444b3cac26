// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Code-stable enumerations of the USB protocol.
//!
//! Every enum carries an explicit discriminant equal to its wire code. Lookups
//! from a raw code go through `from_code`, which returns `None` for codes this
//! crate does not know about (for example ones added by a newer revision of the
//! USB specification), so callers can keep going with the raw value.

use std::fmt;

use bitflags::bitflags;
use enumn::N;

macro_rules! impl_codes {
    ($($ty:ty => $repr:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Look up the variant with the given code.
                pub fn from_code(code: $repr) -> Option<Self> {
                    Self::n(code)
                }

                /// Numeric code of this variant.
                pub fn code(self) -> $repr {
                    self as $repr
                }
            }
        )*
    };
}

/// Descriptor types as defined by the USB specification (bDescriptorType).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum DescriptorType {
    Device = 0x01,
    Configuration = 0x02,
    String = 0x03,
    Interface = 0x04,
    Endpoint = 0x05,
    Bos = 0x0f,
    DeviceCapability = 0x10,
    Hid = 0x21,
    Report = 0x22,
    Physical = 0x23,
    Hub = 0x29,
    SuperSpeedHub = 0x2a,
    SsEndpointCompanion = 0x30,
}

/// Device and interface class codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum ClassCode {
    PerInterface = 0x00,
    Audio = 0x01,
    Comm = 0x02,
    Hid = 0x03,
    Physical = 0x05,
    Image = 0x06,
    Printer = 0x07,
    MassStorage = 0x08,
    Hub = 0x09,
    Data = 0x0a,
    SmartCard = 0x0b,
    ContentSecurity = 0x0d,
    Video = 0x0e,
    PersonalHealthcare = 0x0f,
    DiagnosticDevice = 0xdc,
    Wireless = 0xe0,
    Miscellaneous = 0xef,
    Application = 0xfe,
    VendorSpecific = 0xff,
}

/// Standard requests, as defined in table 9-5 of the USB 3.0 specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum StandardControlRequest {
    GetStatus = 0x00,
    ClearFeature = 0x01,
    SetFeature = 0x03,
    SetAddress = 0x05,
    GetDescriptor = 0x06,
    SetDescriptor = 0x07,
    GetConfiguration = 0x08,
    SetConfiguration = 0x09,
    GetInterface = 0x0a,
    SetInterface = 0x0b,
    SynchFrame = 0x0c,
    SetSel = 0x30,
    SetIsochDelay = 0x31,
}

/// Request type, bits 5-6 of bmRequestType.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum ControlRequestType {
    Standard = 0,
    Class = 1,
    Vendor = 2,
    Reserved = 3,
}

/// Recipient, bits 0-4 of bmRequestType. Values 4 through 31 are reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum ControlRequestRecipient {
    Device = 0,
    Interface = 1,
    Endpoint = 2,
    Other = 3,
}

/// Data direction, bit 7 of both bmRequestType and bEndpointAddress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum EndpointDirection {
    HostToDevice = 0,
    DeviceToHost = 1,
}

/// Endpoint transfer type, bits 0-1 of an endpoint's bmAttributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum EndpointType {
    Control = 0,
    Isochronous = 1,
    Bulk = 2,
    Interrupt = 3,
}

/// Transfer type of a transfer request.
///
/// `BulkStream` has code 4, which does not fit the 2-bit endpoint transfer
/// type field; it only ever appears in transfer requests, never in endpoint
/// attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum TransferType {
    Control = 0,
    Isochronous = 1,
    Bulk = 2,
    Interrupt = 3,
    BulkStream = 4,
}

impl From<EndpointType> for TransferType {
    fn from(t: EndpointType) -> Self {
        match t {
            EndpointType::Control => TransferType::Control,
            EndpointType::Isochronous => TransferType::Isochronous,
            EndpointType::Bulk => TransferType::Bulk,
            EndpointType::Interrupt => TransferType::Interrupt,
        }
    }
}

/// Synchronization type of isochronous endpoints, bits 2-3 of bmAttributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum IsoSyncType {
    None = 0,
    Async = 1,
    Adaptive = 2,
    Sync = 3,
}

/// Usage type of isochronous endpoints, bits 4-5 of bmAttributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum IsoUsageType {
    Data = 0,
    Feedback = 1,
    Implicit = 2,
}

/// Speed a device is operating at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum DeviceSpeed {
    Unknown = 0,
    /// 1.5 Mbit/s
    Low = 1,
    /// 12 Mbit/s
    Full = 2,
    /// 480 Mbit/s
    High = 3,
    /// 5000 Mbit/s
    Super = 4,
    /// 10000 Mbit/s
    SuperPlus = 5,
}

/// BOS device capability types (bDevCapabilityType).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum BosType {
    WirelessUsbDeviceCapability = 1,
    Usb20Extension = 2,
    SsUsbDeviceCapability = 3,
    ContainerId = 4,
}

/// Capabilities a USB library implementation may report for its platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(u32)]
pub enum LibraryCapability {
    HasCapability = 0x0000,
    HasHotplug = 0x0001,
    HasHidAccess = 0x0100,
    SupportsDetachKernelDriver = 0x0101,
}

/// Final status of a transfer, or of a single isochronous packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, N)]
#[repr(u8)]
pub enum TransferStatus {
    #[default]
    Completed = 0,
    Error = 1,
    TimedOut = 2,
    Cancelled = 3,
    Stall = 4,
    NoDevice = 5,
    Overflow = 6,
}

/// Canonical USB library error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, N)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    Io = -1,
    InvalidParam = -2,
    Access = -3,
    NoDevice = -4,
    NotFound = -5,
    Busy = -6,
    Timeout = -7,
    Overflow = -8,
    Pipe = -9,
    Interrupted = -10,
    NoMem = -11,
    NotSupported = -12,
    Other = -99,
}

impl ErrorCode {
    /// Number of error codes in the core set, success included.
    pub const ERROR_COUNT: usize = 14;

    pub const ALL: [ErrorCode; ErrorCode::ERROR_COUNT] = [
        ErrorCode::Success,
        ErrorCode::Io,
        ErrorCode::InvalidParam,
        ErrorCode::Access,
        ErrorCode::NoDevice,
        ErrorCode::NotFound,
        ErrorCode::Busy,
        ErrorCode::Timeout,
        ErrorCode::Overflow,
        ErrorCode::Pipe,
        ErrorCode::Interrupted,
        ErrorCode::NoMem,
        ErrorCode::NotSupported,
        ErrorCode::Other,
    ];

    /// Symbolic name of the error code, for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Success => "LIBUSB_SUCCESS",
            ErrorCode::Io => "LIBUSB_ERROR_IO",
            ErrorCode::InvalidParam => "LIBUSB_ERROR_INVALID_PARAM",
            ErrorCode::Access => "LIBUSB_ERROR_ACCESS",
            ErrorCode::NoDevice => "LIBUSB_ERROR_NO_DEVICE",
            ErrorCode::NotFound => "LIBUSB_ERROR_NOT_FOUND",
            ErrorCode::Busy => "LIBUSB_ERROR_BUSY",
            ErrorCode::Timeout => "LIBUSB_ERROR_TIMEOUT",
            ErrorCode::Overflow => "LIBUSB_ERROR_OVERFLOW",
            ErrorCode::Pipe => "LIBUSB_ERROR_PIPE",
            ErrorCode::Interrupted => "LIBUSB_ERROR_INTERRUPTED",
            ErrorCode::NoMem => "LIBUSB_ERROR_NO_MEM",
            ErrorCode::NotSupported => "LIBUSB_ERROR_NOT_SUPPORTED",
            ErrorCode::Other => "LIBUSB_ERROR_OTHER",
        }
    }

    /// End-user description of the error code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Io => "Input/Output Error",
            ErrorCode::InvalidParam => "Invalid parameter",
            ErrorCode::Access => "Access denied (insufficient permissions)",
            ErrorCode::NoDevice => "No such device (it may have been disconnected)",
            ErrorCode::NotFound => "Entity not found",
            ErrorCode::Busy => "Resource busy",
            ErrorCode::Timeout => "Operation timed out",
            ErrorCode::Overflow => "Overflow",
            ErrorCode::Pipe => "Pipe error",
            ErrorCode::Interrupted => "System call interrupted (perhaps due to signal)",
            ErrorCode::NoMem => "Insufficient memory",
            ErrorCode::NotSupported => "Operation not supported or unimplemented on this platform",
            ErrorCode::Other => "Other error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl std::error::Error for ErrorCode {}

impl_codes! {
    DescriptorType => u8,
    ClassCode => u8,
    StandardControlRequest => u8,
    ControlRequestType => u8,
    ControlRequestRecipient => u8,
    EndpointDirection => u8,
    EndpointType => u8,
    TransferType => u8,
    IsoSyncType => u8,
    IsoUsageType => u8,
    DeviceSpeed => u8,
    BosType => u8,
    LibraryCapability => u32,
    TransferStatus => u8,
    ErrorCode => i32,
}

bitflags! {
    /// Configuration descriptor bmAttributes.
    #[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct ConfigAttributes: u8 {
        const REMOTE_WAKEUP = 0x20;
        const SELF_POWERED = 0x40;
        /// Must always be set for USB 1.1 and later.
        const RESERVED1 = 0x80;
    }
}

bitflags! {
    /// wSpeedSupported of the SuperSpeed USB device capability.
    #[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct SupportedSpeeds: u16 {
        const LOW_SPEED = 1 << 0;
        const FULL_SPEED = 1 << 1;
        const HIGH_SPEED = 1 << 2;
        const SUPER_SPEED = 1 << 3;
    }
}

bitflags! {
    /// bmAttributes of the USB 2.0 extension capability.
    #[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct Usb20ExtensionAttributes: u32 {
        const LPM_SUPPORT = 1 << 1;
    }
}

bitflags! {
    /// bmAttributes of the SuperSpeed USB device capability.
    #[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct SsDeviceCapabilityAttributes: u8 {
        const LTM_SUPPORT = 1 << 1;
    }
}

bitflags! {
    /// Flags passed to the transport along with a transfer.
    #[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
    #[repr(transparent)]
    pub struct TransferFlags: u8 {
        /// Report a short transfer as an error.
        const SHORT_NOT_OK = 1 << 0;
        /// Terminate an OUT transfer that is a multiple of the packet size with a zero-length
        /// packet.
        const ADD_ZERO_PACKET = 1 << 3;
    }
}
