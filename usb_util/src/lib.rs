// Copyright 2019 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! USB wire formats: descriptors, control setup packets and transfer requests.

mod bos;
mod descriptor;
mod endian;
mod error;
mod iso;
mod setup;
mod transport;
mod types;
mod usb_transfer;

pub use self::bos::BosDescriptor;
pub use self::bos::BosDescriptorTree;
pub use self::bos::BosDevCapabilityDescriptor;
pub use self::bos::BosDevCapabilityHeader;
pub use self::bos::ContainerIdDescriptor;
pub use self::bos::SsUsbDeviceCapabilityDescriptor;
pub use self::bos::Usb20ExtensionDescriptor;
pub use self::bos::BOS_DESCRIPTOR_SIZE;
pub use self::bos::CONTAINER_ID_SIZE;
pub use self::bos::DEVICE_CAPABILITY_DESCRIPTOR_SIZE;
pub use self::bos::SS_USB_DEVICE_CAPABILITY_SIZE;
pub use self::bos::USB_2_0_EXTENSION_SIZE;
pub use self::descriptor::endpoint_address;
pub use self::descriptor::endpoint_attributes;
pub use self::descriptor::parse_usbfs_descriptors;
pub use self::descriptor::ConfigDescriptor;
pub use self::descriptor::ConfigDescriptorTree;
pub use self::descriptor::Descriptor;
pub use self::descriptor::DescriptorHeader;
pub use self::descriptor::DeviceDescriptor;
pub use self::descriptor::DeviceDescriptorTree;
pub use self::descriptor::EndpointAudioFields;
pub use self::descriptor::EndpointDescriptor;
pub use self::descriptor::EndpointDescriptorTree;
pub use self::descriptor::Interface;
pub use self::descriptor::InterfaceDescriptor;
pub use self::descriptor::InterfaceDescriptorTree;
pub use self::descriptor::SsEndpointCompanionDescriptor;
pub use self::descriptor::CONFIG_DESCRIPTOR_SIZE;
pub use self::descriptor::DESCRIPTOR_HEADER_SIZE;
pub use self::descriptor::DEVICE_DESCRIPTOR_SIZE;
pub use self::descriptor::ENDPOINT_AUDIO_DESCRIPTOR_SIZE;
pub use self::descriptor::ENDPOINT_DESCRIPTOR_SIZE;
pub use self::descriptor::ENDPOINT_DIRECTION_MASK;
pub use self::descriptor::ENDPOINT_DIRECTION_OFFSET;
pub use self::descriptor::ENDPOINT_NUMBER_MASK;
pub use self::descriptor::INTERFACE_DESCRIPTOR_SIZE;
pub use self::descriptor::ISO_SYNC_TYPE_MASK;
pub use self::descriptor::ISO_USAGE_TYPE_MASK;
pub use self::descriptor::SS_ENDPOINT_COMPANION_DESCRIPTOR_SIZE;
pub use self::descriptor::TRANSFER_TYPE_MASK;
pub use self::endian::from_wire_order16;
pub use self::endian::from_wire_order32;
pub use self::endian::to_wire_order16;
pub use self::endian::to_wire_order32;
pub use self::error::DescriptorFault;
pub use self::error::Error;
pub use self::error::Result;
pub use self::iso::iso_packet_buffer;
pub use self::iso::iso_packet_buffer_mut;
pub use self::iso::iso_packet_buffer_simple;
pub use self::iso::iso_packet_offset;
pub use self::iso::iso_packet_offset_simple;
pub use self::iso::set_iso_packet_lengths;
pub use self::iso::IsoPacketDescriptor;
pub use self::iso::MAX_ISO_PACKET_INDEX;
pub use self::setup::build_request_type;
pub use self::setup::decompose_request_type;
pub use self::setup::read_setup;
pub use self::setup::write_setup;
pub use self::setup::ControlSetup;
pub use self::setup::CONTROL_REQUEST_RECIPIENT_MASK;
pub use self::setup::CONTROL_REQUEST_TYPE_MASK;
pub use self::setup::CONTROL_SETUP_SIZE;
pub use self::setup::DATA_PHASE_DIRECTION;
pub use self::transport::DeviceList;
pub use self::transport::DeviceSource;
pub use self::transport::TransferHandle;
pub use self::transport::Transport;
pub use self::transport::TransportResult;
pub use self::types::BosType;
pub use self::types::ClassCode;
pub use self::types::ConfigAttributes;
pub use self::types::ControlRequestRecipient;
pub use self::types::ControlRequestType;
pub use self::types::DescriptorType;
pub use self::types::DeviceSpeed;
pub use self::types::EndpointDirection;
pub use self::types::EndpointType;
pub use self::types::ErrorCode;
pub use self::types::IsoSyncType;
pub use self::types::IsoUsageType;
pub use self::types::LibraryCapability;
pub use self::types::SsDeviceCapabilityAttributes;
pub use self::types::StandardControlRequest;
pub use self::types::SupportedSpeeds;
pub use self::types::TransferFlags;
pub use self::types::TransferStatus;
pub use self::types::TransferType;
pub use self::types::Usb20ExtensionAttributes;
pub use self::usb_transfer::bulk_stream_transfer;
pub use self::usb_transfer::bulk_transfer;
pub use self::usb_transfer::control_transfer;
pub use self::usb_transfer::control_transfer_with_setup;
pub use self::usb_transfer::interrupt_transfer;
pub use self::usb_transfer::iso_transfer;
pub use self::usb_transfer::Transfer;
pub use self::usb_transfer::TransferBuilder;
pub use self::usb_transfer::TransferCallback;
pub use self::usb_transfer::TransferKind;
