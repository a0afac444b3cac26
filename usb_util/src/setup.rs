// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::mem::size_of;

use static_assertions::const_assert_eq;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

use crate::endian::from_wire_order16;
use crate::endian::to_wire_order16;
use crate::ControlRequestRecipient;
use crate::ControlRequestType;
use crate::DescriptorType;
use crate::EndpointDirection;
use crate::Error;
use crate::Result;
use crate::StandardControlRequest;

/// Size of the setup packet at the start of every control transfer buffer.
pub const CONTROL_SETUP_SIZE: usize = 8;

pub const CONTROL_REQUEST_RECIPIENT_MASK: u8 = 0x1f;
pub const CONTROL_REQUEST_TYPE_OFFSET: u8 = 5;
pub const CONTROL_REQUEST_TYPE_MASK: u8 = 0x03 << CONTROL_REQUEST_TYPE_OFFSET;
pub const DATA_PHASE_DIRECTION_OFFSET: u8 = 7;
pub const DATA_PHASE_DIRECTION: u8 = 1u8 << DATA_PHASE_DIRECTION_OFFSET;

/// Pack recipient, request type and direction into a bmRequestType byte.
pub fn build_request_type(
    recipient: ControlRequestRecipient,
    type_: ControlRequestType,
    dir: EndpointDirection,
) -> u8 {
    ((dir as u8) << DATA_PHASE_DIRECTION_OFFSET)
        | ((type_ as u8) << CONTROL_REQUEST_TYPE_OFFSET)
        | (recipient as u8)
}

/// Split a bmRequestType byte into its parts.
///
/// Returns `None` when the recipient bits hold one of the reserved values 4..=31.
pub fn decompose_request_type(
    request_type: u8,
) -> Option<(
    ControlRequestRecipient,
    ControlRequestType,
    EndpointDirection,
)> {
    let recipient =
        ControlRequestRecipient::from_code(request_type & CONTROL_REQUEST_RECIPIENT_MASK)?;
    let type_ = ControlRequestType::from_code(
        (request_type & CONTROL_REQUEST_TYPE_MASK) >> CONTROL_REQUEST_TYPE_OFFSET,
    )?;
    let dir = EndpointDirection::from_code(request_type >> DATA_PHASE_DIRECTION_OFFSET)?;
    Some((recipient, type_, dir))
}

/// Setup packet of a control transfer. Fields are held in host order; `write_setup` and
/// `read_setup` convert the 16-bit fields to and from wire order.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ControlSetup {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

const_assert_eq!(size_of::<ControlSetup>(), CONTROL_SETUP_SIZE);

/// Store a setup packet into the first 8 bytes of `buffer`.
pub fn write_setup(
    buffer: &mut [u8],
    request_type: u8,
    request: u8,
    value: u16,
    index: u16,
    length: u16,
) -> Result<()> {
    let wire = ControlSetup {
        request_type,
        request,
        value: to_wire_order16(value),
        index: to_wire_order16(index),
        length: to_wire_order16(length),
    };
    let actual = buffer.len();
    wire.write_to_prefix(buffer)
        .map_err(|_| Error::BufferTooSmall {
            required: CONTROL_SETUP_SIZE,
            actual,
        })
}

/// Read the setup packet stored in the first 8 bytes of `buffer`.
pub fn read_setup(buffer: &[u8]) -> Result<ControlSetup> {
    let (wire, _) = ControlSetup::read_from_prefix(buffer).map_err(|_| Error::BufferTooSmall {
        required: CONTROL_SETUP_SIZE,
        actual: buffer.len(),
    })?;
    Ok(ControlSetup {
        request_type: wire.request_type,
        request: wire.request,
        value: from_wire_order16(wire.value),
        index: from_wire_order16(wire.index),
        length: from_wire_order16(wire.length),
    })
}

impl ControlSetup {
    pub fn new(request_type: u8, request: u8, value: u16, index: u16, length: u16) -> Self {
        ControlSetup {
            request_type,
            request,
            value,
            index,
            length,
        }
    }

    /// Write this setup packet to the start of `buffer`.
    pub fn write_to(&self, buffer: &mut [u8]) -> Result<()> {
        write_setup(
            buffer,
            self.request_type,
            self.request,
            self.value,
            self.index,
            self.length,
        )
    }

    /// Get the recipient of this control request, if it is not a reserved value.
    pub fn get_recipient(&self) -> Option<ControlRequestRecipient> {
        ControlRequestRecipient::from_code(self.request_type & CONTROL_REQUEST_RECIPIENT_MASK)
    }

    /// Get the request type of this control request.
    pub fn get_type(&self) -> ControlRequestType {
        match (self.request_type & CONTROL_REQUEST_TYPE_MASK) >> CONTROL_REQUEST_TYPE_OFFSET {
            0 => ControlRequestType::Standard,
            1 => ControlRequestType::Class,
            2 => ControlRequestType::Vendor,
            _ => ControlRequestType::Reserved,
        }
    }

    /// Get the direction of the data phase.
    pub fn get_direction(&self) -> EndpointDirection {
        if self.request_type & DATA_PHASE_DIRECTION != 0 {
            EndpointDirection::DeviceToHost
        } else {
            EndpointDirection::HostToDevice
        }
    }

    /// Get the standard request, for requests of the standard type.
    pub fn get_standard_request(&self) -> Option<StandardControlRequest> {
        if self.get_type() != ControlRequestType::Standard {
            return None;
        }
        StandardControlRequest::from_code(self.request)
    }

    fn standard(
        recipient: ControlRequestRecipient,
        dir: EndpointDirection,
        request: StandardControlRequest,
        value: u16,
        index: u16,
        length: u16,
    ) -> Self {
        ControlSetup::new(
            build_request_type(recipient, ControlRequestType::Standard, dir),
            request as u8,
            value,
            index,
            length,
        )
    }

    pub fn get_status(recipient: ControlRequestRecipient, index: u16) -> Self {
        Self::standard(
            recipient,
            EndpointDirection::DeviceToHost,
            StandardControlRequest::GetStatus,
            0,
            index,
            2,
        )
    }

    pub fn clear_feature(recipient: ControlRequestRecipient, feature: u16, index: u16) -> Self {
        Self::standard(
            recipient,
            EndpointDirection::HostToDevice,
            StandardControlRequest::ClearFeature,
            feature,
            index,
            0,
        )
    }

    pub fn set_feature(recipient: ControlRequestRecipient, feature: u16, index: u16) -> Self {
        Self::standard(
            recipient,
            EndpointDirection::HostToDevice,
            StandardControlRequest::SetFeature,
            feature,
            index,
            0,
        )
    }

    /// GET_DESCRIPTOR for descriptor `desc_index` of type `desc_type`; `language` is only
    /// meaningful for string descriptors.
    pub fn get_descriptor(
        desc_type: DescriptorType,
        desc_index: u8,
        language: u16,
        length: u16,
    ) -> Self {
        Self::standard(
            ControlRequestRecipient::Device,
            EndpointDirection::DeviceToHost,
            StandardControlRequest::GetDescriptor,
            ((desc_type as u16) << 8) | u16::from(desc_index),
            language,
            length,
        )
    }

    pub fn set_configuration(config_value: u8) -> Self {
        Self::standard(
            ControlRequestRecipient::Device,
            EndpointDirection::HostToDevice,
            StandardControlRequest::SetConfiguration,
            config_value.into(),
            0,
            0,
        )
    }

    pub fn set_interface(interface: u8, alt_setting: u8) -> Self {
        Self::standard(
            ControlRequestRecipient::Interface,
            EndpointDirection::HostToDevice,
            StandardControlRequest::SetInterface,
            alt_setting.into(),
            interface.into(),
            0,
        )
    }
}
