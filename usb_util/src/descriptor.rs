// Copyright 2019 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Standard USB descriptors and the trees built from them.
//!
//! Fixed-layout records are plain `#[repr(C, packed)]` structs holding host-order values.
//! Decoding reads the wire bytes and converts every multi-byte field from wire order; encoding
//! does the reverse. Bytes that are not standard descriptors (class or vendor specific) are
//! kept verbatim in the `extra` region of the descriptor they follow, so a decoded tree encodes
//! back to the exact bytes it came from.

use std::collections::BTreeMap;
use std::mem::size_of;
use std::ops::Deref;

use log::warn;
use static_assertions::const_assert_eq;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

use crate::error::DescriptorFault;
use crate::ClassCode;
use crate::ConfigAttributes;
use crate::DescriptorType;
use crate::EndpointDirection;
use crate::EndpointType;
use crate::Error;
use crate::IsoSyncType;
use crate::IsoUsageType;
use crate::Result;

pub const DESCRIPTOR_HEADER_SIZE: usize = 2;
pub const DEVICE_DESCRIPTOR_SIZE: usize = 18;
pub const CONFIG_DESCRIPTOR_SIZE: usize = 9;
pub const INTERFACE_DESCRIPTOR_SIZE: usize = 9;
pub const ENDPOINT_DESCRIPTOR_SIZE: usize = 7;
pub const ENDPOINT_AUDIO_DESCRIPTOR_SIZE: usize = 9;
pub const SS_ENDPOINT_COMPANION_DESCRIPTOR_SIZE: usize = 6;

pub const ENDPOINT_NUMBER_MASK: u8 = 0x0f;
pub const ENDPOINT_DIRECTION_OFFSET: u8 = 7;
pub const ENDPOINT_DIRECTION_MASK: u8 = 1 << ENDPOINT_DIRECTION_OFFSET;
pub const TRANSFER_TYPE_MASK: u8 = 0x03;
pub const ISO_SYNC_TYPE_OFFSET: u8 = 2;
pub const ISO_SYNC_TYPE_MASK: u8 = 0x03 << ISO_SYNC_TYPE_OFFSET;
pub const ISO_USAGE_TYPE_OFFSET: u8 = 4;
pub const ISO_USAGE_TYPE_MASK: u8 = 0x03 << ISO_USAGE_TYPE_OFFSET;

/// A fixed-layout descriptor record.
pub trait Descriptor: Copy + FromBytes + IntoBytes + Immutable + KnownLayout {
    /// Name used in decode errors and log messages.
    const NAME: &'static str;
    /// Whether bLength must equal the record size, rather than merely cover it.
    const EXACT_LENGTH: bool;

    fn descriptor_type() -> DescriptorType;

    /// Convert the multi-byte fields of a record read off the wire to host order.
    fn from_wire(self) -> Self;

    /// Convert the multi-byte fields of a host-order record to wire order.
    fn to_wire(self) -> Self;

    /// Decode the record at the start of `data`, checking its type and declared length.
    fn decode(data: &[u8]) -> Result<Self> {
        read_descriptor(data)
    }

    /// Encode the fixed part of this record.
    fn encode(&self) -> Vec<u8> {
        (*self).to_wire().as_bytes().to_vec()
    }
}

macro_rules! impl_descriptor {
    (
        $ty:ty,
        $name:literal,
        $desc_type:expr,
        exact: $exact:literal,
        wire16: [$($f16:ident),*],
        wire32: [$($f32:ident),*] $(,)?
    ) => {
        impl $crate::descriptor::Descriptor for $ty {
            const NAME: &'static str = $name;
            const EXACT_LENGTH: bool = $exact;

            fn descriptor_type() -> $crate::DescriptorType {
                $desc_type
            }

            #[allow(unused_mut)]
            fn from_wire(mut self) -> Self {
                $(self.$f16 = $crate::endian::from_wire_order16(self.$f16);)*
                $(self.$f32 = $crate::endian::from_wire_order32(self.$f32);)*
                self
            }

            #[allow(unused_mut)]
            fn to_wire(mut self) -> Self {
                $(self.$f16 = $crate::endian::to_wire_order16(self.$f16);)*
                $(self.$f32 = $crate::endian::to_wire_order32(self.$f32);)*
                self
            }
        }
    };
}

pub(crate) use impl_descriptor;

/// Read a descriptor of type `T` from the start of `data`.
///
/// `data` may extend past the descriptor. bLength must cover the fixed record (or equal it for
/// exact-length types) and must not run past the end of `data`.
pub(crate) fn read_descriptor<T: Descriptor>(data: &[u8]) -> Result<T> {
    let size = size_of::<T>();
    let fault = |f| Error::malformed(T::NAME, f);
    if data.len() < size {
        return Err(fault(DescriptorFault::Truncated {
            needed: size,
            available: data.len(),
        }));
    }

    let declared = usize::from(data[0]);
    let found = data[1];
    let expected = T::descriptor_type() as u8;
    if found != expected {
        return Err(fault(DescriptorFault::UnexpectedType { found, expected }));
    }
    if T::EXACT_LENGTH && declared != size {
        return Err(fault(DescriptorFault::LengthMismatch {
            declared,
            expected: size,
        }));
    }
    if declared < size {
        return Err(fault(DescriptorFault::LengthTooShort {
            declared,
            minimum: size,
        }));
    }
    if declared > data.len() {
        return Err(fault(DescriptorFault::LengthOverrun {
            declared,
            available: data.len(),
        }));
    }

    let (desc, _) = T::read_from_prefix(data).map_err(|_| {
        fault(DescriptorFault::Truncated {
            needed: size,
            available: data.len(),
        })
    })?;
    Ok(desc.from_wire())
}

/// Descriptor types that start a new node of a configuration tree. Anything else is extra.
fn is_structural(desc_type: u8) -> bool {
    [
        DescriptorType::Device,
        DescriptorType::Configuration,
        DescriptorType::Interface,
        DescriptorType::Endpoint,
    ]
    .iter()
    .any(|&t| t as u8 == desc_type)
}

fn peek_type(data: &[u8], cursor: usize) -> Option<u8> {
    data.get(cursor + 1).copied()
}

/// Advance `cursor` over every non-structural descriptor and return the bytes skipped.
fn take_extra<'a>(owner: &'static str, data: &'a [u8], cursor: &mut usize) -> Result<&'a [u8]> {
    let start = *cursor;
    while *cursor < data.len() {
        let available = data.len() - *cursor;
        if available < DESCRIPTOR_HEADER_SIZE {
            return Err(Error::malformed(
                owner,
                DescriptorFault::Truncated {
                    needed: DESCRIPTOR_HEADER_SIZE,
                    available,
                },
            ));
        }
        let declared = usize::from(data[*cursor]);
        if declared < DESCRIPTOR_HEADER_SIZE {
            return Err(Error::malformed(
                owner,
                DescriptorFault::LengthTooShort {
                    declared,
                    minimum: DESCRIPTOR_HEADER_SIZE,
                },
            ));
        }
        if declared > available {
            return Err(Error::malformed(
                owner,
                DescriptorFault::LengthOverrun {
                    declared,
                    available,
                },
            ));
        }
        if is_structural(data[*cursor + 1]) {
            break;
        }
        *cursor += declared;
    }
    Ok(&data[start..*cursor])
}

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DescriptorHeader {
    pub bLength: u8,
    pub bDescriptorType: u8,
}

const_assert_eq!(size_of::<DescriptorHeader>(), DESCRIPTOR_HEADER_SIZE);

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DeviceDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bcdUSB: u16,
    pub bDeviceClass: u8,
    pub bDeviceSubClass: u8,
    pub bDeviceProtocol: u8,
    pub bMaxPacketSize0: u8,
    pub idVendor: u16,
    pub idProduct: u16,
    pub bcdDevice: u16,
    pub iManufacturer: u8,
    pub iProduct: u8,
    pub iSerialNumber: u8,
    pub bNumConfigurations: u8,
}

const_assert_eq!(size_of::<DeviceDescriptor>(), DEVICE_DESCRIPTOR_SIZE);

impl_descriptor!(
    DeviceDescriptor,
    "device",
    DescriptorType::Device,
    exact: true,
    wire16: [bcdUSB, idVendor, idProduct, bcdDevice],
    wire32: [],
);

impl DeviceDescriptor {
    /// Device class, if it is one of the well-known class codes.
    pub fn device_class(&self) -> Option<ClassCode> {
        ClassCode::from_code(self.bDeviceClass)
    }
}

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ConfigDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub wTotalLength: u16,
    pub bNumInterfaces: u8,
    pub bConfigurationValue: u8,
    pub iConfiguration: u8,
    pub bmAttributes: u8,
    pub bMaxPower: u8,
}

const_assert_eq!(size_of::<ConfigDescriptor>(), CONFIG_DESCRIPTOR_SIZE);

impl_descriptor!(
    ConfigDescriptor,
    "configuration",
    DescriptorType::Configuration,
    exact: false,
    wire16: [wTotalLength],
    wire32: [],
);

impl ConfigDescriptor {
    pub fn attributes(&self) -> ConfigAttributes {
        ConfigAttributes::from_bits_retain(self.bmAttributes)
    }
}

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct InterfaceDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bInterfaceNumber: u8,
    pub bAlternateSetting: u8,
    pub bNumEndpoints: u8,
    pub bInterfaceClass: u8,
    pub bInterfaceSubClass: u8,
    pub bInterfaceProtocol: u8,
    pub iInterface: u8,
}

const_assert_eq!(size_of::<InterfaceDescriptor>(), INTERFACE_DESCRIPTOR_SIZE);

impl_descriptor!(
    InterfaceDescriptor,
    "interface",
    DescriptorType::Interface,
    exact: false,
    wire16: [],
    wire32: [],
);

impl InterfaceDescriptor {
    pub fn interface_class(&self) -> Option<ClassCode> {
        ClassCode::from_code(self.bInterfaceClass)
    }
}

/// The 7-byte endpoint descriptor common to all endpoints.
#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EndpointDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bEndpointAddress: u8,
    pub bmAttributes: u8,
    pub wMaxPacketSize: u16,
    pub bInterval: u8,
}

const_assert_eq!(size_of::<EndpointDescriptor>(), ENDPOINT_DESCRIPTOR_SIZE);

impl_descriptor!(
    EndpointDescriptor,
    "endpoint",
    DescriptorType::Endpoint,
    exact: false,
    wire16: [wMaxPacketSize],
    wire32: [],
);

impl EndpointDescriptor {
    // Get direction of this endpoint.
    pub fn get_direction(&self) -> EndpointDirection {
        if self.bEndpointAddress & ENDPOINT_DIRECTION_MASK != 0 {
            EndpointDirection::DeviceToHost
        } else {
            EndpointDirection::HostToDevice
        }
    }

    // Get endpoint number.
    pub fn get_endpoint_number(&self) -> u8 {
        self.bEndpointAddress & ENDPOINT_NUMBER_MASK
    }

    // Get endpoint type.
    pub fn get_endpoint_type(&self) -> EndpointType {
        match self.bmAttributes & TRANSFER_TYPE_MASK {
            0 => EndpointType::Control,
            1 => EndpointType::Isochronous,
            2 => EndpointType::Bulk,
            _ => EndpointType::Interrupt,
        }
    }

    pub fn get_iso_sync_type(&self) -> IsoSyncType {
        match (self.bmAttributes & ISO_SYNC_TYPE_MASK) >> ISO_SYNC_TYPE_OFFSET {
            0 => IsoSyncType::None,
            1 => IsoSyncType::Async,
            2 => IsoSyncType::Adaptive,
            _ => IsoSyncType::Sync,
        }
    }

    /// Usage type of an isochronous endpoint. The reserved value 3 yields `None`.
    pub fn get_iso_usage_type(&self) -> Option<IsoUsageType> {
        IsoUsageType::from_code((self.bmAttributes & ISO_USAGE_TYPE_MASK) >> ISO_USAGE_TYPE_OFFSET)
    }
}

/// Pack an endpoint number and direction into a bEndpointAddress byte.
pub fn endpoint_address(number: u8, direction: EndpointDirection) -> u8 {
    ((direction as u8) << ENDPOINT_DIRECTION_OFFSET) | (number & ENDPOINT_NUMBER_MASK)
}

/// Pack transfer, sync and usage types into an endpoint bmAttributes byte.
pub fn endpoint_attributes(
    endpoint_type: EndpointType,
    sync_type: IsoSyncType,
    usage_type: IsoUsageType,
) -> u8 {
    (endpoint_type as u8)
        | ((sync_type as u8) << ISO_SYNC_TYPE_OFFSET)
        | ((usage_type as u8) << ISO_USAGE_TYPE_OFFSET)
}

/// Trailing fields present only in 9-byte audio endpoint descriptors.
#[allow(non_snake_case)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndpointAudioFields {
    pub bRefresh: u8,
    pub bSynchAddress: u8,
}

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SsEndpointCompanionDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bMaxBurst: u8,
    pub bmAttributes: u8,
    pub wBytesPerInterval: u16,
}

const_assert_eq!(
    size_of::<SsEndpointCompanionDescriptor>(),
    SS_ENDPOINT_COMPANION_DESCRIPTOR_SIZE
);

impl_descriptor!(
    SsEndpointCompanionDescriptor,
    "SuperSpeed endpoint companion",
    DescriptorType::SsEndpointCompanion,
    exact: false,
    wire16: [wBytesPerInterval],
    wire32: [],
);

impl SsEndpointCompanionDescriptor {
    /// Number of streams supported by a bulk endpoint, as the exponent of a power of two.
    pub fn max_streams(&self) -> u8 {
        self.bmAttributes & 0x1f
    }

    /// Maximum number of packets per service interval of an isochronous endpoint, minus one.
    pub fn mult(&self) -> u8 {
        self.bmAttributes & 0x03
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointDescriptorTree {
    inner: EndpointDescriptor,
    audio: Option<EndpointAudioFields>,
    // Surplus bytes of this descriptor followed by any class-specific descriptors.
    extra: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDescriptorTree {
    inner: InterfaceDescriptor,
    extra: Vec<u8>,
    endpoints: Vec<EndpointDescriptorTree>,
}

/// All alternate settings sharing one bInterfaceNumber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    altsettings: Vec<InterfaceDescriptorTree>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigDescriptorTree {
    inner: ConfigDescriptor,
    extra: Vec<u8>,
    interfaces: Vec<Interface>,
}

#[derive(Clone, Debug)]
pub struct DeviceDescriptorTree {
    // Full descriptor tree in the original format returned by the device.
    raw: Vec<u8>,
    inner: DeviceDescriptor,
    // Map of bConfigurationValue to ConfigDescriptor
    config_descriptors: BTreeMap<u8, ConfigDescriptorTree>,
    // Map of config index to bConfigurationValue.
    config_values: BTreeMap<u8, u8>,
}

impl EndpointDescriptorTree {
    pub fn new(
        inner: EndpointDescriptor,
        audio: Option<EndpointAudioFields>,
        extra: Vec<u8>,
    ) -> Self {
        EndpointDescriptorTree {
            inner,
            audio,
            extra,
        }
    }

    /// Decode a standalone endpoint descriptor and the class-specific descriptors after it.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut cursor = 0;
        Self::decode_at(data, &mut cursor)
    }

    fn decode_at(data: &[u8], cursor: &mut usize) -> Result<Self> {
        let start = *cursor;
        let inner: EndpointDescriptor = read_descriptor(data.get(start..).unwrap_or_default())?;
        let end = start + usize::from(inner.bLength);
        let audio = if end - start >= ENDPOINT_AUDIO_DESCRIPTOR_SIZE {
            Some(EndpointAudioFields {
                bRefresh: data[start + ENDPOINT_DESCRIPTOR_SIZE],
                bSynchAddress: data[start + ENDPOINT_DESCRIPTOR_SIZE + 1],
            })
        } else {
            None
        };
        let fixed = if audio.is_some() {
            ENDPOINT_AUDIO_DESCRIPTOR_SIZE
        } else {
            ENDPOINT_DESCRIPTOR_SIZE
        };
        let mut extra = data[start + fixed..end].to_vec();
        *cursor = end;
        extra.extend_from_slice(take_extra(EndpointDescriptor::NAME, data, cursor)?);
        Ok(EndpointDescriptorTree {
            inner,
            audio,
            extra,
        })
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.inner.encode());
        if let Some(audio) = self.audio {
            out.push(audio.bRefresh);
            out.push(audio.bSynchAddress);
        }
        out.extend_from_slice(&self.extra);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    pub fn audio(&self) -> Option<&EndpointAudioFields> {
        self.audio.as_ref()
    }

    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    /// Find the SuperSpeed endpoint companion among the descriptors following this endpoint.
    pub fn ss_endpoint_companion(&self) -> Result<Option<SsEndpointCompanionDescriptor>> {
        let mut offset = 0;
        while offset + DESCRIPTOR_HEADER_SIZE <= self.extra.len() {
            let len = usize::from(self.extra[offset]);
            if self.extra[offset + 1] == DescriptorType::SsEndpointCompanion as u8 {
                return read_descriptor(&self.extra[offset..]).map(Some);
            }
            if len < DESCRIPTOR_HEADER_SIZE {
                break;
            }
            offset += len;
        }
        Ok(None)
    }
}

impl Deref for EndpointDescriptorTree {
    type Target = EndpointDescriptor;

    fn deref(&self) -> &EndpointDescriptor {
        &self.inner
    }
}

impl InterfaceDescriptorTree {
    pub fn new(
        inner: InterfaceDescriptor,
        extra: Vec<u8>,
        endpoints: Vec<EndpointDescriptorTree>,
    ) -> Self {
        InterfaceDescriptorTree {
            inner,
            extra,
            endpoints,
        }
    }

    fn decode_at(data: &[u8], cursor: &mut usize) -> Result<Self> {
        let start = *cursor;
        let inner: InterfaceDescriptor = read_descriptor(data.get(start..).unwrap_or_default())?;
        let end = start + usize::from(inner.bLength);
        let mut extra = data[start + INTERFACE_DESCRIPTOR_SIZE..end].to_vec();
        *cursor = end;
        extra.extend_from_slice(take_extra(InterfaceDescriptor::NAME, data, cursor)?);

        let mut endpoints = Vec::new();
        while peek_type(data, *cursor) == Some(DescriptorType::Endpoint as u8) {
            endpoints.push(EndpointDescriptorTree::decode_at(data, cursor)?);
        }
        if endpoints.len() != usize::from(inner.bNumEndpoints) {
            warn!(
                "interface {} altsetting {} declares {} endpoints, found {}",
                inner.bInterfaceNumber,
                inner.bAlternateSetting,
                inner.bNumEndpoints,
                endpoints.len()
            );
        }

        Ok(InterfaceDescriptorTree {
            inner,
            extra,
            endpoints,
        })
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.inner.encode());
        out.extend_from_slice(&self.extra);
        for endpoint in &self.endpoints {
            endpoint.encode_into(out);
        }
    }

    /// Get endpoint by its position in this interface descriptor.
    pub fn get_endpoint_descriptor(&self, ep_idx: u8) -> Option<&EndpointDescriptorTree> {
        self.endpoints.get(usize::from(ep_idx))
    }

    pub fn endpoints(&self) -> &[EndpointDescriptorTree] {
        &self.endpoints
    }

    pub fn extra(&self) -> &[u8] {
        &self.extra
    }
}

impl Deref for InterfaceDescriptorTree {
    type Target = InterfaceDescriptor;

    fn deref(&self) -> &InterfaceDescriptor {
        &self.inner
    }
}

impl Interface {
    pub fn new(altsettings: Vec<InterfaceDescriptorTree>) -> Self {
        Interface { altsettings }
    }

    // Consecutive interface descriptors with the same bInterfaceNumber form one interface.
    fn decode_at(data: &[u8], cursor: &mut usize) -> Result<Self> {
        let first = InterfaceDescriptorTree::decode_at(data, cursor)?;
        let number = first.bInterfaceNumber;
        let mut altsettings = vec![first];
        while peek_type(data, *cursor) == Some(DescriptorType::Interface as u8)
            && data.get(*cursor + 2) == Some(&number)
        {
            altsettings.push(InterfaceDescriptorTree::decode_at(data, cursor)?);
        }
        Ok(Interface { altsettings })
    }

    pub fn altsettings(&self) -> &[InterfaceDescriptorTree] {
        &self.altsettings
    }

    pub fn interface_number(&self) -> Option<u8> {
        self.altsettings.first().map(|alt| alt.bInterfaceNumber)
    }
}

impl ConfigDescriptorTree {
    pub fn new(inner: ConfigDescriptor, extra: Vec<u8>, interfaces: Vec<Interface>) -> Self {
        ConfigDescriptorTree {
            inner,
            extra,
            interfaces,
        }
    }

    /// Decode a configuration descriptor together with everything nested in it.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (config, consumed) = Self::decode_prefix(data)?;
        if consumed < data.len() {
            warn!(
                "ignoring {} bytes after configuration {}",
                data.len() - consumed,
                config.bConfigurationValue
            );
        }
        Ok(config)
    }

    // Returns the configuration and the number of bytes it spans in `data`.
    fn decode_prefix(data: &[u8]) -> Result<(Self, usize)> {
        let inner: ConfigDescriptor = read_descriptor(data)?;
        let header_len = usize::from(inner.bLength);
        let total = usize::from(inner.wTotalLength);
        let config_value = inner.bConfigurationValue;
        if total < header_len {
            return Err(Error::malformed(
                ConfigDescriptor::NAME,
                DescriptorFault::LengthTooShort {
                    declared: total,
                    minimum: header_len,
                },
            ));
        }

        let window = match data.get(..total) {
            Some(window) => window,
            None => {
                warn!(
                    "configuration {} declares {} bytes, only {} available",
                    config_value,
                    total,
                    data.len()
                );
                data
            }
        };

        let mut cursor = header_len;
        let mut extra = window[CONFIG_DESCRIPTOR_SIZE..header_len].to_vec();
        extra.extend_from_slice(take_extra(ConfigDescriptor::NAME, window, &mut cursor)?);

        let mut interfaces = Vec::new();
        while peek_type(window, cursor) == Some(DescriptorType::Interface as u8) {
            interfaces.push(Interface::decode_at(window, &mut cursor)?);
        }
        if interfaces.len() != usize::from(inner.bNumInterfaces) {
            warn!(
                "configuration {} declares {} interfaces, found {}",
                config_value,
                inner.bNumInterfaces,
                interfaces.len()
            );
        }

        // Anything left is a structural descriptor with no place in the tree: an endpoint
        // outside any interface, or a nested device or configuration descriptor.
        if let Some(found) = peek_type(window, cursor) {
            return Err(Error::malformed(
                ConfigDescriptor::NAME,
                DescriptorFault::UnexpectedType {
                    found,
                    expected: DescriptorType::Interface as u8,
                },
            ));
        }

        Ok((
            ConfigDescriptorTree {
                inner,
                extra,
                interfaces,
            },
            window.len(),
        ))
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.inner.encode());
        out.extend_from_slice(&self.extra);
        for interface in &self.interfaces {
            for alt in &interface.altsettings {
                alt.encode_into(out);
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    /// Get interface by number and alt setting.
    pub fn get_interface_descriptor(
        &self,
        interface_num: u8,
        alt_setting: u8,
    ) -> Option<&InterfaceDescriptorTree> {
        self.interfaces
            .iter()
            .flat_map(|interface| interface.altsettings.iter())
            .find(|alt| alt.bInterfaceNumber == interface_num && alt.bAlternateSetting == alt_setting)
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn extra(&self) -> &[u8] {
        &self.extra
    }
}

impl Deref for ConfigDescriptorTree {
    type Target = ConfigDescriptor;

    fn deref(&self) -> &ConfigDescriptor {
        &self.inner
    }
}

impl DeviceDescriptorTree {
    pub fn get_config_descriptor(&self, config_value: u8) -> Option<&ConfigDescriptorTree> {
        self.config_descriptors.get(&config_value)
    }

    /// Retrieve the Nth configuration descriptor in the device descriptor.
    /// `config_index`: 0-based index into the list of configuration descriptors.
    pub fn get_config_descriptor_by_index(
        &self,
        config_index: u8,
    ) -> Option<&ConfigDescriptorTree> {
        self.config_descriptors
            .get(self.config_values.get(&config_index)?)
    }

    /// Configurations in the order the device reported them.
    pub fn config_descriptors(&self) -> impl Iterator<Item = &ConfigDescriptorTree> {
        self.config_values
            .values()
            .filter_map(|value| self.config_descriptors.get(value))
    }

    /// Access the raw descriptor tree as a slice of bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for DeviceDescriptorTree {
    type Target = DeviceDescriptor;

    fn deref(&self) -> &DeviceDescriptor {
        &self.inner
    }
}

/// Given `data` containing a full set of descriptors as provided by the Linux kernel
/// usbdevfs `descriptors` file, parse the descriptors into a tree data structure.
pub fn parse_usbfs_descriptors(data: &[u8]) -> Result<DeviceDescriptorTree> {
    let inner = DeviceDescriptor::decode(data)?;
    let mut device_descriptor = DeviceDescriptorTree {
        raw: data.into(),
        inner,
        config_descriptors: BTreeMap::new(),
        config_values: BTreeMap::new(),
    };

    let mut offset = usize::from(inner.bLength);
    for cfg_idx in 0..inner.bNumConfigurations {
        match ConfigDescriptorTree::decode_prefix(&data[offset..]) {
            Ok((config_descriptor, consumed)) => {
                offset += consumed;
                let config_value = config_descriptor.bConfigurationValue;
                device_descriptor
                    .config_values
                    .insert(cfg_idx, config_value);
                device_descriptor
                    .config_descriptors
                    .insert(config_value, config_descriptor);
            }
            Err(e) => {
                warn!("Could not read config descriptor {}: {}", cfg_idx, e);
                break;
            }
        }
    }

    Ok(device_descriptor)
}

#[cfg(test)]
#[allow(clippy::useless_conversion)]
mod tests {
    use super::*;

    #[test]
    fn parse_descriptors_mass_storage() {
        let data: &[u8] = &[
            0x12, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x09, 0x81, 0x07, 0x80, 0x55, 0x10, 0x00,
            0x01, 0x02, 0x03, 0x01, 0x09, 0x02, 0x2C, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, 0x09,
            0x04, 0x00, 0x00, 0x02, 0x08, 0x06, 0x50, 0x00, 0x07, 0x05, 0x81, 0x02, 0x00, 0x04,
            0x00, 0x06, 0x30, 0x0F, 0x00, 0x00, 0x00, 0x07, 0x05, 0x02, 0x02, 0x00, 0x04, 0x00,
            0x06, 0x30, 0x0F, 0x00, 0x00, 0x00,
        ];

        let d = parse_usbfs_descriptors(data).expect("parse_usbfs_descriptors failed");

        // The seemingly-redundant u16::from() calls avoid borrows of packed fields.

        assert_eq!(u16::from(d.bcdUSB), 0x03_00);
        assert_eq!(d.bDeviceClass, 0x00);
        assert_eq!(d.device_class(), Some(ClassCode::PerInterface));
        assert_eq!(d.bMaxPacketSize0, 9);
        assert_eq!(u16::from(d.idVendor), 0x0781);
        assert_eq!(u16::from(d.idProduct), 0x5580);
        assert_eq!(u16::from(d.bcdDevice), 0x00_10);
        assert_eq!(d.iManufacturer, 1);
        assert_eq!(d.iProduct, 2);
        assert_eq!(d.iSerialNumber, 3);
        assert_eq!(d.bNumConfigurations, 1);

        let c = d
            .get_config_descriptor(1)
            .expect("could not get config descriptor 1");
        assert_eq!(u16::from(c.wTotalLength), 44);
        assert_eq!(c.bNumInterfaces, 1);
        assert_eq!(c.bConfigurationValue, 1);
        assert_eq!(c.iConfiguration, 0);
        assert_eq!(c.attributes(), ConfigAttributes::RESERVED1);
        assert_eq!(c.bMaxPower, 50);
        assert!(c.extra().is_empty());

        let i = c
            .get_interface_descriptor(0, 0)
            .expect("could not get interface descriptor 0 alt setting 0");
        assert_eq!(i.bNumEndpoints, 2);
        assert_eq!(i.interface_class(), Some(ClassCode::MassStorage));
        assert_eq!(i.bInterfaceSubClass, 0x06);
        assert_eq!(i.bInterfaceProtocol, 0x50);

        let e = i
            .get_endpoint_descriptor(0)
            .expect("could not get endpoint 0 descriptor");
        assert_eq!(e.bEndpointAddress, 0x81);
        assert_eq!(e.get_direction(), EndpointDirection::DeviceToHost);
        assert_eq!(e.get_endpoint_number(), 1);
        assert_eq!(e.get_endpoint_type(), EndpointType::Bulk);
        assert_eq!(u16::from(e.wMaxPacketSize), 0x0400);
        assert_eq!(e.bInterval, 0);
        assert_eq!(e.audio(), None);
        assert_eq!(e.extra(), &[0x06, 0x30, 0x0f, 0x00, 0x00, 0x00]);

        let companion = e
            .ss_endpoint_companion()
            .unwrap()
            .expect("no SuperSpeed endpoint companion");
        assert_eq!(companion.bMaxBurst, 0x0f);
        assert_eq!(companion.max_streams(), 0);
        assert_eq!(u16::from(companion.wBytesPerInterval), 0);

        let e = i
            .get_endpoint_descriptor(1)
            .expect("could not get endpoint 1 descriptor");
        assert_eq!(e.bEndpointAddress, 0x02);
        assert_eq!(e.get_direction(), EndpointDirection::HostToDevice);
        assert_eq!(e.bmAttributes, 0x02);
        assert_eq!(u16::from(e.wMaxPacketSize), 0x0400);

        assert_eq!(c.encode(), &data[18..]);
    }

    #[test]
    fn parse_descriptors_servo() {
        let data: &[u8] = &[
            0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd1, 0x18, 0x1b, 0x50, 0x00, 0x01,
            0x01, 0x02, 0x03, 0x01, 0x09, 0x02, 0x7c, 0x00, 0x06, 0x01, 0x04, 0xc0, 0xfa, 0x09,
            0x04, 0x00, 0x00, 0x02, 0xff, 0x50, 0x01, 0x06, 0x07, 0x05, 0x81, 0x02, 0x40, 0x00,
            0x0a, 0x07, 0x05, 0x01, 0x02, 0x40, 0x00, 0x00, 0x09, 0x04, 0x02, 0x00, 0x02, 0xff,
            0x52, 0x01, 0x05, 0x07, 0x05, 0x83, 0x02, 0x40, 0x00, 0x0a, 0x07, 0x05, 0x03, 0x02,
            0x40, 0x00, 0x00, 0x09, 0x04, 0x03, 0x00, 0x02, 0xff, 0x50, 0x01, 0x07, 0x07, 0x05,
            0x84, 0x02, 0x10, 0x00, 0x0a, 0x07, 0x05, 0x04, 0x02, 0x10, 0x00, 0x00, 0x09, 0x04,
            0x04, 0x00, 0x02, 0xff, 0x50, 0x01, 0x08, 0x07, 0x05, 0x85, 0x02, 0x10, 0x00, 0x0a,
            0x07, 0x05, 0x05, 0x02, 0x10, 0x00, 0x00, 0x09, 0x04, 0x05, 0x00, 0x02, 0xff, 0x53,
            0xff, 0x09, 0x07, 0x05, 0x86, 0x02, 0x40, 0x00, 0x0a, 0x07, 0x05, 0x06, 0x02, 0x40,
            0x00, 0x00,
        ];

        // Note: configuration 1 has bNumInterfaces == 6, but it actually only contains 5
        // interface descriptors, and wTotalLength covers more bytes than the dump holds. Both
        // are tolerated so that the rest of the descriptors stay usable.
        let d = parse_usbfs_descriptors(data).expect("parse_usbfs_descriptors failed");

        assert_eq!(u16::from(d.idVendor), 0x18d1);
        assert_eq!(u16::from(d.idProduct), 0x501b);
        assert_eq!(d.bMaxPacketSize0, 64);

        let c = d
            .get_config_descriptor(1)
            .expect("could not get config descriptor 1");
        assert_eq!(u16::from(c.wTotalLength), 124);
        assert_eq!(c.bNumInterfaces, 6);
        assert_eq!(c.interfaces().len(), 5);
        assert_eq!(c.iConfiguration, 4);
        assert_eq!(
            c.attributes(),
            ConfigAttributes::RESERVED1 | ConfigAttributes::SELF_POWERED
        );
        assert_eq!(c.bMaxPower, 250);

        assert!(c.get_interface_descriptor(1, 0).is_none());

        let expected = [
            (0u8, 0x50u8, 0x01u8, 6u8, 0x81u8, 0x40u16),
            (2, 0x52, 0x01, 5, 0x83, 0x40),
            (3, 0x50, 0x01, 7, 0x84, 0x10),
            (4, 0x50, 0x01, 8, 0x85, 0x10),
            (5, 0x53, 0xff, 9, 0x86, 0x40),
        ];
        for (num, subclass, protocol, string, in_ep, max_packet) in expected {
            let i = c
                .get_interface_descriptor(num, 0)
                .expect("missing interface descriptor");
            assert_eq!(i.bInterfaceNumber, num);
            assert_eq!(i.bAlternateSetting, 0);
            assert_eq!(i.bNumEndpoints, 2);
            assert_eq!(i.bInterfaceClass, 0xff);
            assert_eq!(i.bInterfaceSubClass, subclass);
            assert_eq!(i.bInterfaceProtocol, protocol);
            assert_eq!(i.iInterface, string);

            let e = i.get_endpoint_descriptor(0).expect("missing endpoint 0");
            assert_eq!(e.bEndpointAddress, in_ep);
            assert_eq!(u16::from(e.wMaxPacketSize), max_packet);
            assert_eq!(e.bInterval, 10);

            let e = i.get_endpoint_descriptor(1).expect("missing endpoint 1");
            assert_eq!(e.bEndpointAddress, in_ep & ENDPOINT_NUMBER_MASK);
            assert_eq!(u16::from(e.wMaxPacketSize), max_packet);
            assert_eq!(e.bInterval, 0);
        }

        assert_eq!(c.encode(), &data[18..]);
    }

    #[test]
    fn parse_descriptors_adb() {
        let data: &[u8] = &[
            0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd1, 0x18, 0xe7, 0x4e, 0x10, 0x03,
            0x01, 0x02, 0x03, 0x01, 0x09, 0x02, 0x20, 0x00, 0x01, 0x01, 0x00, 0x80, 0xfa, 0x09,
            0x04, 0x00, 0x00, 0x02, 0xff, 0x42, 0x01, 0x05, 0x07, 0x05, 0x01, 0x02, 0x00, 0x02,
            0x00, 0x07, 0x05, 0x81, 0x02, 0x00, 0x02, 0x00,
        ];

        let d = parse_usbfs_descriptors(data).expect("parse_usbfs_descriptors failed");

        assert_eq!(u16::from(d.bcdUSB), 0x02_00);
        assert_eq!(u16::from(d.idProduct), 0x4ee7);
        assert_eq!(u16::from(d.bcdDevice), 0x03_10);

        let c = d
            .get_config_descriptor_by_index(0)
            .expect("could not get config descriptor at index 0");
        assert_eq!(c.bConfigurationValue, 1);
        assert_eq!(u16::from(c.wTotalLength), 32);

        let i = c
            .get_interface_descriptor(0, 0)
            .expect("could not get interface descriptor 0 alt setting 0");
        assert_eq!(i.interface_class(), Some(ClassCode::VendorSpecific));
        assert_eq!(i.bInterfaceSubClass, 0x42);
        assert_eq!(i.iInterface, 5);
        assert_eq!(i.endpoints().len(), 2);

        let e = i
            .get_endpoint_descriptor(0)
            .expect("could not get endpoint 0 descriptor");
        assert_eq!(e.bEndpointAddress, 0x01);
        assert_eq!(u16::from(e.wMaxPacketSize), 0x200);

        let e = i
            .get_endpoint_descriptor(1)
            .expect("could not get endpoint 1 descriptor");
        assert_eq!(e.bEndpointAddress, 0x81);
        assert_eq!(e.ss_endpoint_companion(), Ok(None));

        assert!(d.get_config_descriptor_by_index(1).is_none());
        assert_eq!(d.config_descriptors().count(), 1);
        assert_eq!(d.raw(), data);
    }

    #[test]
    fn parse_descriptors_multiple_altsettings() {
        let data: &[u8] = &[
            // DeviceDescriptor
            0x12, 0x01, 0x00, 0x02, 0xef, 0x02, 0x01, 0x40, 0x6d, 0x04, 0x43, 0x08, 0x13, 0x00,
            0x00, 0x02, 0x01, 0x01, // ConfigDescriptor
            0x09, 0x02, 0x0d, 0x0a, 0x03, 0x01, 0x00, 0x80, 0xfa,
            // InterfaceDescriptor 0, 0
            0x09, 0x04, 0x00, 0x00, 0x01, 0x0e, 0x01, 0x00, 0x00, // EndpointDescriptor
            0x07, 0x05, 0x86, 0x03, 0x40, 0x00, 0x08, // InterfaceDescriptor 1, 0
            0x09, 0x04, 0x01, 0x00, 0x00, 0x0e, 0x02, 0x00, 0x00,
            // InterfaceDescriptor 1, 1
            0x09, 0x04, 0x01, 0x01, 0x01, 0x0e, 0x02, 0x00, 0x00, // EndpointDescriptor
            0x07, 0x05, 0x81, 0x05, 0xc0, 0x00, 0x01, // InterfaceDescriptor 2, 0
            0x09, 0x04, 0x02, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00,
        ];

        let d = parse_usbfs_descriptors(data).expect("parse_usbfs_descriptors failed");

        assert_eq!(d.device_class(), Some(ClassCode::Miscellaneous));
        assert_eq!(u16::from(d.idVendor), 0x046d);
        assert_eq!(u16::from(d.idProduct), 0x0843);

        let c = d
            .get_config_descriptor(1)
            .expect("could not get config descriptor 1");
        assert_eq!(u16::from(c.wTotalLength), 2573);
        assert_eq!(c.bNumInterfaces, 3);

        let groups: Vec<usize> = c
            .interfaces()
            .iter()
            .map(|interface| interface.altsettings().len())
            .collect();
        assert_eq!(groups, vec![1, 2, 1]);
        assert_eq!(c.interfaces()[1].interface_number(), Some(1));

        let i = c
            .get_interface_descriptor(0, 0)
            .expect("could not get interface descriptor 0 alt setting 0");
        assert_eq!(i.bInterfaceClass, 0x0e);
        let e = i
            .get_endpoint_descriptor(0)
            .expect("could not get endpoint 0 descriptor");
        assert_eq!(e.bEndpointAddress, 0x86);
        assert_eq!(e.get_endpoint_type(), EndpointType::Interrupt);
        assert_eq!(e.bInterval, 0x08);

        let i = c
            .get_interface_descriptor(1, 0)
            .expect("could not get interface descriptor 1 alt setting 0");
        assert_eq!(i.bNumEndpoints, 0);
        assert!(i.endpoints().is_empty());

        let i = c
            .get_interface_descriptor(1, 1)
            .expect("could not get interface descriptor 1 alt setting 1");
        let e = i
            .get_endpoint_descriptor(0)
            .expect("could not get endpoint 0 descriptor");
        assert_eq!(e.bEndpointAddress, 0x81);
        assert_eq!(e.get_endpoint_type(), EndpointType::Isochronous);
        assert_eq!(e.get_iso_sync_type(), IsoSyncType::Async);
        assert_eq!(e.get_iso_usage_type(), Some(IsoUsageType::Data));
        assert_eq!(u16::from(e.wMaxPacketSize), 0xc0);

        let i = c
            .get_interface_descriptor(2, 0)
            .expect("could not get interface descriptor 2 alt setting 0");
        assert_eq!(i.interface_class(), Some(ClassCode::Audio));

        assert_eq!(c.encode(), &data[18..]);
    }

    #[test]
    fn parse_descriptors_length_0() {
        // Device descriptor followed by a bogus descriptor with bLength == 0.
        // Note that this was generated by a fuzzer, so field values may not make sense.
        let data: &[u8] = &[
            0x10, 0x00, 0x18, 0x25, 0x80, 0x80, 0xAC, 0x03, 0x22, 0x05, 0x00, 0x00, 0x00, 0x00,
            0xC3, 0x2A, 0x00, 0x32, 0x00,
        ];

        let d = parse_usbfs_descriptors(data);
        if d.is_ok() {
            panic!("parse_usbfs_descriptors should have failed");
        }
    }

    #[test]
    fn device_descriptor_length_must_match() {
        let mut data = [
            0x12, 0x01, 0x10, 0x02, 0x00, 0x00, 0x00, 0x40, 0x34, 0x12, 0x78, 0x56, 0x00, 0x01,
            0x01, 0x02, 0x00, 0x01,
        ];
        let d = DeviceDescriptor::decode(&data).unwrap();
        assert_eq!(u16::from(d.bcdUSB), 0x0210);
        assert_eq!(u16::from(d.idVendor), 0x1234);
        assert_eq!(u16::from(d.idProduct), 0x5678);
        assert_eq!(d.encode(), data);

        data[0] = 0x13;
        assert_eq!(
            DeviceDescriptor::decode(&data),
            Err(Error::MalformedDescriptor {
                descriptor: "device",
                fault: DescriptorFault::LengthMismatch {
                    declared: 19,
                    expected: 18
                }
            })
        );

        assert_eq!(
            DeviceDescriptor::decode(&data[..17]),
            Err(Error::MalformedDescriptor {
                descriptor: "device",
                fault: DescriptorFault::Truncated {
                    needed: 18,
                    available: 17
                }
            })
        );
    }

    #[test]
    fn wrong_descriptor_type() {
        let data = [0x07, 0x04, 0x81, 0x02, 0x00, 0x02, 0x00];
        assert_eq!(
            EndpointDescriptor::decode(&data),
            Err(Error::MalformedDescriptor {
                descriptor: "endpoint",
                fault: DescriptorFault::UnexpectedType {
                    found: 0x04,
                    expected: 0x05
                }
            })
        );
    }

    #[test]
    fn audio_endpoint() {
        let data = [0x09, 0x05, 0x01, 0x09, 0xc0, 0x00, 0x01, 0x00, 0x82];
        let e = EndpointDescriptorTree::decode(&data).unwrap();
        assert_eq!(
            e.audio(),
            Some(&EndpointAudioFields {
                bRefresh: 0x00,
                bSynchAddress: 0x82
            })
        );
        assert_eq!(e.get_iso_sync_type(), IsoSyncType::Adaptive);
        assert!(e.extra().is_empty());
        assert_eq!(e.encode(), data);
    }

    #[test]
    fn oversized_endpoint_keeps_surplus_in_extra() {
        let data = [0x08, 0x05, 0x02, 0x02, 0x40, 0x00, 0x00, 0xaa];
        let e = EndpointDescriptorTree::decode(&data).unwrap();
        assert_eq!(e.audio(), None);
        assert_eq!(e.extra(), &[0xaa]);
        assert_eq!(e.encode(), data);
    }

    #[test]
    fn endpoint_too_short() {
        let data = [0x06, 0x05, 0x02, 0x02, 0x40, 0x00, 0x00];
        assert!(matches!(
            EndpointDescriptorTree::decode(&data),
            Err(Error::MalformedDescriptor {
                fault: DescriptorFault::LengthTooShort {
                    declared: 6,
                    minimum: 7
                },
                ..
            })
        ));
    }

    #[test]
    fn class_specific_descriptors_attach_to_their_owner() {
        let data: &[u8] = &[
            // Config, 1 interface, wTotalLength 43
            0x09, 0x02, 0x2b, 0x00, 0x01, 0x01, 0x00, 0xa0, 0x32,
            // Vendor descriptor owned by the configuration
            0x04, 0xff, 0x01, 0x02,
            // HID interface
            0x09, 0x04, 0x00, 0x00, 0x01, 0x03, 0x01, 0x01, 0x00,
            // HID class descriptor
            0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x3f, 0x00,
            // Interrupt IN endpoint
            0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x0a,
            // Vendor descriptor owned by the endpoint
            0x05, 0xfe, 0x01, 0x02, 0x03,
        ];

        let c = ConfigDescriptorTree::decode(data).unwrap();
        assert_eq!(
            c.attributes(),
            ConfigAttributes::RESERVED1 | ConfigAttributes::REMOTE_WAKEUP
        );
        assert_eq!(c.extra(), &[0x04, 0xff, 0x01, 0x02]);

        let i = c.get_interface_descriptor(0, 0).unwrap();
        assert_eq!(i.interface_class(), Some(ClassCode::Hid));
        assert_eq!(i.extra()[1], DescriptorType::Hid as u8);
        assert_eq!(i.extra().len(), 9);

        let e = i.get_endpoint_descriptor(0).unwrap();
        assert_eq!(e.extra(), &[0x05, 0xfe, 0x01, 0x02, 0x03]);
        assert_eq!(e.ss_endpoint_companion(), Ok(None));

        assert_eq!(c.encode(), data);
        assert_eq!(ConfigDescriptorTree::decode(&c.encode()).unwrap(), c);
    }

    #[test]
    fn zero_length_nested_descriptor_is_rejected() {
        let data: &[u8] = &[
            0x09, 0x02, 0x0e, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, 0x00, 0x24, 0x01, 0x02, 0x03,
        ];
        assert_eq!(
            ConfigDescriptorTree::decode(data),
            Err(Error::MalformedDescriptor {
                descriptor: "configuration",
                fault: DescriptorFault::LengthTooShort {
                    declared: 0,
                    minimum: 2
                }
            })
        );
    }

    #[test]
    fn nested_descriptor_past_end_is_rejected() {
        let data: &[u8] = &[
            0x09, 0x02, 0x0c, 0x00, 0x00, 0x01, 0x00, 0x80, 0x32, 0x05, 0x24, 0x01,
        ];
        assert!(matches!(
            ConfigDescriptorTree::decode(data),
            Err(Error::MalformedDescriptor {
                fault: DescriptorFault::LengthOverrun {
                    declared: 5,
                    available: 3
                },
                ..
            })
        ));
    }

    #[test]
    fn config_total_length_below_header() {
        let data: &[u8] = &[0x09, 0x02, 0x04, 0x00, 0x00, 0x01, 0x00, 0x80, 0x32];
        assert!(ConfigDescriptorTree::decode(data).is_err());
    }

    #[test]
    fn endpoint_outside_interface_is_rejected() {
        let data: &[u8] = &[
            0x09, 0x02, 0x10, 0x00, 0x00, 0x01, 0x00, 0x80, 0x32, 0x07, 0x05, 0x81, 0x02, 0x40,
            0x00, 0x00,
        ];
        assert_eq!(
            ConfigDescriptorTree::decode(data),
            Err(Error::MalformedDescriptor {
                descriptor: "configuration",
                fault: DescriptorFault::UnexpectedType {
                    found: 0x05,
                    expected: 0x04
                }
            })
        );
    }

    #[test]
    fn nested_configuration_is_rejected() {
        let data: &[u8] = &[
            0x09, 0x02, 0x1b, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, 0x09, 0x04, 0x00, 0x00, 0x00,
            0xff, 0x00, 0x00, 0x00, 0x09, 0x02, 0x09, 0x00, 0x00, 0x02, 0x00, 0x80, 0x32,
        ];
        assert!(matches!(
            ConfigDescriptorTree::decode(data),
            Err(Error::MalformedDescriptor {
                fault: DescriptorFault::UnexpectedType { found: 0x02, .. },
                ..
            })
        ));
        // The same bytes inside a usbfs dump stop parsing at that configuration.
        let mut usbfs = vec![
            0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd1, 0x18, 0xe7, 0x4e, 0x10, 0x03,
            0x01, 0x02, 0x03, 0x01,
        ];
        usbfs.extend_from_slice(data);
        let d = parse_usbfs_descriptors(&usbfs).unwrap();
        assert!(d.get_config_descriptor(1).is_none());
    }

    #[test]
    fn endpoint_byte_packing() {
        assert_eq!(endpoint_address(1, EndpointDirection::DeviceToHost), 0x81);
        assert_eq!(endpoint_address(0x12, EndpointDirection::HostToDevice), 0x02);
        assert_eq!(
            endpoint_attributes(
                EndpointType::Isochronous,
                IsoSyncType::Async,
                IsoUsageType::Feedback
            ),
            0x15
        );

        let e = EndpointDescriptor {
            bLength: ENDPOINT_DESCRIPTOR_SIZE as u8,
            bDescriptorType: DescriptorType::Endpoint as u8,
            bEndpointAddress: 0x83,
            bmAttributes: 0x3d,
            wMaxPacketSize: 0x0400,
            bInterval: 1,
        };
        assert_eq!(e.get_endpoint_number(), 3);
        assert_eq!(e.get_direction(), EndpointDirection::DeviceToHost);
        assert_eq!(e.get_endpoint_type(), EndpointType::Isochronous);
        assert_eq!(e.get_iso_sync_type(), IsoSyncType::Sync);
        assert_eq!(e.get_iso_usage_type(), None);
        assert_eq!(
            endpoint_address(e.get_endpoint_number(), e.get_direction()),
            e.bEndpointAddress
        );
        assert_eq!(e.encode(), [0x07, 0x05, 0x83, 0x3d, 0x00, 0x04, 0x01]);
    }
}
