// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Binary Device Object Store (BOS) descriptor and its device capabilities.

use std::mem::size_of;
use std::ops::Deref;

use log::warn;
use static_assertions::const_assert_eq;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

use crate::descriptor::impl_descriptor;
use crate::descriptor::read_descriptor;
use crate::descriptor::Descriptor;
use crate::error::DescriptorFault;
use crate::BosType;
use crate::DescriptorType;
use crate::Error;
use crate::Result;
use crate::SsDeviceCapabilityAttributes;
use crate::SupportedSpeeds;
use crate::Usb20ExtensionAttributes;

pub const BOS_DESCRIPTOR_SIZE: usize = 5;
pub const DEVICE_CAPABILITY_DESCRIPTOR_SIZE: usize = 3;
pub const USB_2_0_EXTENSION_SIZE: usize = 7;
pub const SS_USB_DEVICE_CAPABILITY_SIZE: usize = 10;
pub const CONTAINER_ID_SIZE: usize = 20;

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct BosDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub wTotalLength: u16,
    pub bNumDeviceCaps: u8,
}

const_assert_eq!(size_of::<BosDescriptor>(), BOS_DESCRIPTOR_SIZE);

impl_descriptor!(
    BosDescriptor,
    "BOS",
    DescriptorType::Bos,
    exact: true,
    wire16: [wTotalLength],
    wire32: [],
);

/// The prefix shared by every device capability descriptor.
#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct BosDevCapabilityHeader {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDevCapabilityType: u8,
}

const_assert_eq!(
    size_of::<BosDevCapabilityHeader>(),
    DEVICE_CAPABILITY_DESCRIPTOR_SIZE
);

impl_descriptor!(
    BosDevCapabilityHeader,
    "device capability",
    DescriptorType::DeviceCapability,
    exact: false,
    wire16: [],
    wire32: [],
);

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Usb20ExtensionDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDevCapabilityType: u8,
    pub bmAttributes: u32,
}

const_assert_eq!(size_of::<Usb20ExtensionDescriptor>(), USB_2_0_EXTENSION_SIZE);

impl_descriptor!(
    Usb20ExtensionDescriptor,
    "USB 2.0 extension",
    DescriptorType::DeviceCapability,
    exact: false,
    wire16: [],
    wire32: [bmAttributes],
);

impl Usb20ExtensionDescriptor {
    pub fn attributes(&self) -> Usb20ExtensionAttributes {
        Usb20ExtensionAttributes::from_bits_retain(self.bmAttributes)
    }
}

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SsUsbDeviceCapabilityDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDevCapabilityType: u8,
    pub bmAttributes: u8,
    pub wSpeedSupported: u16,
    pub bFunctionalitySupport: u8,
    pub bU1DevExitLat: u8,
    pub bU2DevExitLat: u16,
}

const_assert_eq!(
    size_of::<SsUsbDeviceCapabilityDescriptor>(),
    SS_USB_DEVICE_CAPABILITY_SIZE
);

impl_descriptor!(
    SsUsbDeviceCapabilityDescriptor,
    "SuperSpeed USB device capability",
    DescriptorType::DeviceCapability,
    exact: false,
    wire16: [wSpeedSupported, bU2DevExitLat],
    wire32: [],
);

impl SsUsbDeviceCapabilityDescriptor {
    pub fn attributes(&self) -> SsDeviceCapabilityAttributes {
        SsDeviceCapabilityAttributes::from_bits_retain(self.bmAttributes)
    }

    pub fn speeds_supported(&self) -> SupportedSpeeds {
        SupportedSpeeds::from_bits_retain(self.wSpeedSupported)
    }
}

#[allow(non_snake_case)]
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ContainerIdDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDevCapabilityType: u8,
    pub bReserved: u8,
    pub ContainerID: [u8; 16],
}

const_assert_eq!(size_of::<ContainerIdDescriptor>(), CONTAINER_ID_SIZE);

impl_descriptor!(
    ContainerIdDescriptor,
    "container ID",
    DescriptorType::DeviceCapability,
    exact: false,
    wire16: [],
    wire32: [],
);

/// A device capability of any type: the common prefix and the raw capability-specific bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BosDevCapabilityDescriptor {
    header: BosDevCapabilityHeader,
    dev_capability_data: Vec<u8>,
}

impl BosDevCapabilityDescriptor {
    pub fn new(header: BosDevCapabilityHeader, dev_capability_data: Vec<u8>) -> Self {
        BosDevCapabilityDescriptor {
            header,
            dev_capability_data,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header: BosDevCapabilityHeader = read_descriptor(data)?;
        let end = usize::from(header.bLength);
        Ok(BosDevCapabilityDescriptor {
            header,
            dev_capability_data: data[DEVICE_CAPABILITY_DESCRIPTOR_SIZE..end].to_vec(),
        })
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.header.encode());
        out.extend_from_slice(&self.dev_capability_data);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    /// Capability type, if it is one this crate knows about.
    pub fn capability_type(&self) -> Option<BosType> {
        BosType::from_code(self.header.bDevCapabilityType)
    }

    pub fn dev_capability_data(&self) -> &[u8] {
        &self.dev_capability_data
    }

    // Reinterpret this capability as the typed record `T`, which must be of capability `expected`.
    fn typed<T: Descriptor>(&self, expected: BosType) -> Result<T> {
        let found = self.header.bDevCapabilityType;
        if found != expected as u8 {
            return Err(Error::malformed(
                T::NAME,
                DescriptorFault::UnexpectedType {
                    found,
                    expected: expected as u8,
                },
            ));
        }
        read_descriptor(&self.encode())
    }

    pub fn as_usb20_extension(&self) -> Result<Usb20ExtensionDescriptor> {
        self.typed(BosType::Usb20Extension)
    }

    pub fn as_ss_usb_device_capability(&self) -> Result<SsUsbDeviceCapabilityDescriptor> {
        self.typed(BosType::SsUsbDeviceCapability)
    }

    pub fn as_container_id(&self) -> Result<ContainerIdDescriptor> {
        self.typed(BosType::ContainerId)
    }
}

impl Deref for BosDevCapabilityDescriptor {
    type Target = BosDevCapabilityHeader;

    fn deref(&self) -> &BosDevCapabilityHeader {
        &self.header
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BosDescriptorTree {
    inner: BosDescriptor,
    capabilities: Vec<BosDevCapabilityDescriptor>,
}

impl BosDescriptorTree {
    pub fn new(inner: BosDescriptor, capabilities: Vec<BosDevCapabilityDescriptor>) -> Self {
        BosDescriptorTree {
            inner,
            capabilities,
        }
    }

    /// Decode a BOS descriptor followed by its device capabilities.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let inner: BosDescriptor = read_descriptor(data)?;
        let total = usize::from(inner.wTotalLength);
        if total < BOS_DESCRIPTOR_SIZE {
            return Err(Error::malformed(
                BosDescriptor::NAME,
                DescriptorFault::LengthTooShort {
                    declared: total,
                    minimum: BOS_DESCRIPTOR_SIZE,
                },
            ));
        }

        let window = match data.get(..total) {
            Some(window) => window,
            None => {
                warn!(
                    "BOS descriptor declares {} bytes, only {} available",
                    total,
                    data.len()
                );
                data
            }
        };

        let mut offset = BOS_DESCRIPTOR_SIZE;
        let mut capabilities = Vec::new();
        // Capabilities run up to wTotalLength; a trailing fragment is an error.
        while offset < window.len() {
            let capability = BosDevCapabilityDescriptor::decode(&window[offset..])?;
            offset += usize::from(capability.bLength);
            capabilities.push(capability);
        }
        if capabilities.len() != usize::from(inner.bNumDeviceCaps) {
            warn!(
                "BOS descriptor declares {} capabilities, found {}",
                inner.bNumDeviceCaps,
                capabilities.len()
            );
        }

        Ok(BosDescriptorTree {
            inner,
            capabilities,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.inner.encode();
        for capability in &self.capabilities {
            capability.encode_into(&mut out);
        }
        out
    }

    pub fn capabilities(&self) -> &[BosDevCapabilityDescriptor] {
        &self.capabilities
    }

    fn find(&self, capability_type: BosType) -> Option<&BosDevCapabilityDescriptor> {
        self.capabilities
            .iter()
            .find(|cap| cap.bDevCapabilityType == capability_type as u8)
    }

    pub fn usb20_extension(&self) -> Result<Option<Usb20ExtensionDescriptor>> {
        self.find(BosType::Usb20Extension)
            .map(BosDevCapabilityDescriptor::as_usb20_extension)
            .transpose()
    }

    pub fn ss_usb_device_capability(&self) -> Result<Option<SsUsbDeviceCapabilityDescriptor>> {
        self.find(BosType::SsUsbDeviceCapability)
            .map(BosDevCapabilityDescriptor::as_ss_usb_device_capability)
            .transpose()
    }

    pub fn container_id(&self) -> Result<Option<ContainerIdDescriptor>> {
        self.find(BosType::ContainerId)
            .map(BosDevCapabilityDescriptor::as_container_id)
            .transpose()
    }
}

impl Deref for BosDescriptorTree {
    type Target = BosDescriptor;

    fn deref(&self) -> &BosDescriptor {
        &self.inner
    }
}
