// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Human readable dumps of decoded descriptors and setup packets.

use std::io::Write;

use anyhow::Result;
use usb_util::decompose_request_type;
use usb_util::BosDescriptorTree;
use usb_util::BosDevCapabilityDescriptor;
use usb_util::BosType;
use usb_util::ConfigDescriptorTree;
use usb_util::ControlSetup;
use usb_util::DeviceDescriptorTree;
use usb_util::EndpointDescriptorTree;
use usb_util::EndpointType;
use usb_util::InterfaceDescriptorTree;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_extra(w: &mut dyn Write, indent: &str, extra: &[u8]) -> Result<()> {
    if !extra.is_empty() {
        writeln!(w, "{}extra ({} bytes): {}", indent, extra.len(), hex(extra))?;
    }
    Ok(())
}

pub fn print_device(w: &mut dyn Write, tree: &DeviceDescriptorTree) -> Result<()> {
    let (bcd_usb, vendor, product, bcd_device) =
        (tree.bcdUSB, tree.idVendor, tree.idProduct, tree.bcdDevice);
    writeln!(w, "Device {:04x}:{:04x}", vendor, product)?;
    writeln!(w, "  bcdUSB {:04x}  bcdDevice {:04x}", bcd_usb, bcd_device)?;
    match tree.device_class() {
        Some(class) => writeln!(w, "  class {:?}", class)?,
        None => writeln!(w, "  class {:#04x}", tree.bDeviceClass)?,
    }
    writeln!(
        w,
        "  subclass {:#04x}  protocol {:#04x}  max packet size 0: {}",
        tree.bDeviceSubClass, tree.bDeviceProtocol, tree.bMaxPacketSize0
    )?;
    writeln!(w, "  configurations: {}", tree.bNumConfigurations)?;
    for config in tree.config_descriptors() {
        print_config(w, config)?;
    }
    Ok(())
}

fn print_config(w: &mut dyn Write, config: &ConfigDescriptorTree) -> Result<()> {
    let total_length = config.wTotalLength;
    writeln!(
        w,
        "  Configuration {} (total length {}, {} interfaces)",
        config.bConfigurationValue, total_length, config.bNumInterfaces
    )?;
    writeln!(
        w,
        "    attributes {:?}  max power {} mA",
        config.attributes(),
        u32::from(config.bMaxPower) * 2
    )?;
    print_extra(w, "    ", config.extra())?;
    for interface in config.interfaces() {
        for alt in interface.altsettings() {
            print_interface(w, alt)?;
        }
    }
    Ok(())
}

fn print_interface(w: &mut dyn Write, interface: &InterfaceDescriptorTree) -> Result<()> {
    write!(
        w,
        "    Interface {} alt {}",
        interface.bInterfaceNumber, interface.bAlternateSetting
    )?;
    match interface.interface_class() {
        Some(class) => writeln!(w, " class {:?}", class)?,
        None => writeln!(w, " class {:#04x}", interface.bInterfaceClass)?,
    }
    print_extra(w, "      ", interface.extra())?;
    for endpoint in interface.endpoints() {
        print_endpoint(w, endpoint)?;
    }
    Ok(())
}

fn print_endpoint(w: &mut dyn Write, endpoint: &EndpointDescriptorTree) -> Result<()> {
    let max_packet_size = endpoint.wMaxPacketSize;
    let endpoint_type = endpoint.get_endpoint_type();
    writeln!(
        w,
        "      Endpoint {:#04x} {:?} {:?} max packet size {} interval {}",
        endpoint.bEndpointAddress,
        endpoint.get_direction(),
        endpoint_type,
        max_packet_size,
        endpoint.bInterval
    )?;
    if endpoint_type == EndpointType::Isochronous {
        writeln!(
            w,
            "        sync {:?} usage {:?}",
            endpoint.get_iso_sync_type(),
            endpoint.get_iso_usage_type()
        )?;
    }
    if let Some(audio) = endpoint.audio() {
        writeln!(
            w,
            "        refresh {} synch address {:#04x}",
            audio.bRefresh, audio.bSynchAddress
        )?;
    }
    if let Some(companion) = endpoint.ss_endpoint_companion()? {
        let bytes_per_interval = companion.wBytesPerInterval;
        writeln!(
            w,
            "        companion max burst {} bytes per interval {}",
            companion.bMaxBurst, bytes_per_interval
        )?;
    }
    print_extra(w, "        ", endpoint.extra())
}

pub fn print_bos(w: &mut dyn Write, tree: &BosDescriptorTree) -> Result<()> {
    let total_length = tree.wTotalLength;
    writeln!(
        w,
        "BOS (total length {}, {} capabilities)",
        total_length, tree.bNumDeviceCaps
    )?;
    for capability in tree.capabilities() {
        print_capability(w, capability)?;
    }
    Ok(())
}

fn print_capability(w: &mut dyn Write, capability: &BosDevCapabilityDescriptor) -> Result<()> {
    match capability.capability_type() {
        Some(BosType::Usb20Extension) => {
            let ext = capability.as_usb20_extension()?;
            writeln!(w, "  USB 2.0 extension: {:?}", ext.attributes())?;
        }
        Some(BosType::SsUsbDeviceCapability) => {
            let ss = capability.as_ss_usb_device_capability()?;
            let u2_exit_latency = ss.bU2DevExitLat;
            writeln!(
                w,
                "  SuperSpeed USB: {:?} speeds {:?}",
                ss.attributes(),
                ss.speeds_supported()
            )?;
            writeln!(
                w,
                "    functionality support {:#04x}  U1 exit {} us  U2 exit {} us",
                ss.bFunctionalitySupport, ss.bU1DevExitLat, u2_exit_latency
            )?;
        }
        Some(BosType::ContainerId) => {
            let container = capability.as_container_id()?;
            writeln!(w, "  Container ID: {}", hex(&container.ContainerID))?;
        }
        _ => {
            writeln!(
                w,
                "  Capability {:#04x}: {}",
                capability.bDevCapabilityType,
                hex(capability.dev_capability_data())
            )?;
        }
    }
    Ok(())
}

pub fn print_setup(w: &mut dyn Write, setup: &ControlSetup) -> Result<()> {
    let (request_type, value, index, length) =
        (setup.request_type, setup.value, setup.index, setup.length);
    match decompose_request_type(request_type) {
        Some((recipient, kind, direction)) => writeln!(
            w,
            "bmRequestType {:#04x}: {:?} {:?} {:?}",
            request_type, direction, kind, recipient
        )?,
        None => writeln!(w, "bmRequestType {:#04x}: reserved recipient", request_type)?,
    }
    match setup.get_standard_request() {
        Some(request) => writeln!(w, "bRequest {:#04x}: {:?}", setup.request, request)?,
        None => writeln!(w, "bRequest {:#04x}", setup.request)?,
    }
    writeln!(
        w,
        "wValue {:#06x}  wIndex {:#06x}  wLength {}",
        value, index, length
    )?;
    Ok(())
}
