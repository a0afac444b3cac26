// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Decodes and dumps USB descriptor blobs and control setup packets.

mod print;

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use argh::FromArgs;
use log::debug;
use usb_util::parse_usbfs_descriptors;
use usb_util::read_setup;
use usb_util::BosDescriptorTree;
use usb_util::CONTROL_SETUP_SIZE;

#[derive(FromArgs)]
/// Decode USB descriptors and control requests.
struct Options {
    /// log decoder diagnostics at debug level
    #[argh(switch, short = 'v')]
    verbose: bool,
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Descriptors(DescriptorsCommand),
    Bos(BosCommand),
    Setup(SetupCommand),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "descriptors")]
/// Dump a device descriptor followed by its configurations, as read from usbfs.
struct DescriptorsCommand {
    #[argh(positional)]
    /// file holding the raw descriptors
    file: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "bos")]
/// Dump a Binary device Object Store descriptor set.
struct BosCommand {
    #[argh(positional)]
    /// file holding the raw BOS descriptor
    file: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "setup")]
/// Decode an 8-byte control setup packet.
struct SetupCommand {
    #[argh(positional, from_str_fn(parse_hex))]
    /// packet bytes in hex, optionally separated by spaces or colons
    packet: HexBytes,
}

struct HexBytes(Vec<u8>);

fn parse_hex(s: &str) -> std::result::Result<HexBytes, String> {
    let digits: Vec<char> = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{}'", s));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16).map_err(|_| format!("invalid hex byte '{}'", byte))
        })
        .collect::<std::result::Result<_, _>>()
        .map(HexBytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    debug!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

fn run(command: Command, out: &mut dyn io::Write) -> Result<()> {
    match command {
        Command::Descriptors(cmd) => {
            let data = read_file(&cmd.file)?;
            let tree = parse_usbfs_descriptors(&data)
                .with_context(|| format!("failed to parse {}", cmd.file.display()))?;
            print::print_device(out, &tree)
        }
        Command::Bos(cmd) => {
            let data = read_file(&cmd.file)?;
            let tree = BosDescriptorTree::decode(&data)
                .with_context(|| format!("failed to parse {}", cmd.file.display()))?;
            print::print_bos(out, &tree)
        }
        Command::Setup(cmd) => {
            let packet = cmd.packet.0;
            if packet.len() != CONTROL_SETUP_SIZE {
                bail!(
                    "setup packet must be {} bytes, got {}",
                    CONTROL_SETUP_SIZE,
                    packet.len()
                );
            }
            let setup = read_setup(&packet)?;
            print::print_setup(out, &setup)
        }
    }
}

fn usbwire_main() -> Result<()> {
    let options: Options = argh::from_env();

    let default_level = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(options.command, &mut out)
}

fn main() {
    if let Err(e) = usbwire_main() {
        eprintln!("usbwire: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn run_to_string(command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn temp_file(data: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(data).unwrap();
        f
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("8006").unwrap().0, vec![0x80, 0x06]);
        assert_eq!(parse_hex("80 06:00").unwrap().0, vec![0x80, 0x06, 0x00]);
        assert!(parse_hex("").unwrap().0.is_empty());
        assert!(parse_hex("800").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn args() {
        let options = Options::from_args(&["usbwire"], &["-v", "setup", "8006000100001200"])
            .unwrap();
        assert!(options.verbose);
        match options.command {
            Command::Setup(cmd) => assert_eq!(cmd.packet.0.len(), 8),
            _ => panic!("wrong subcommand"),
        }
        assert!(Options::from_args(&["usbwire"], &["setup", "8g"]).is_err());
    }

    #[test]
    fn setup_command() {
        let s = run_to_string(Command::Setup(SetupCommand {
            packet: parse_hex("00 09 01 00 00 00 00 00").unwrap(),
        }))
        .unwrap();
        assert!(s.contains("bRequest 0x09: SetConfiguration"));

        let err = run_to_string(Command::Setup(SetupCommand {
            packet: HexBytes(vec![0; 7]),
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "setup packet must be 8 bytes, got 7");
    }

    #[test]
    fn descriptors_command() {
        let f = temp_file(&[
            0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd1, 0x18, 0xe7, 0x4e, 0x10, 0x03,
            0x01, 0x02, 0x03, 0x01, 0x09, 0x02, 0x12, 0x00, 0x01, 0x01, 0x00, 0x80, 0xfa, 0x09,
            0x04, 0x00, 0x00, 0x00, 0xff, 0x42, 0x01, 0x05,
        ]);
        let s = run_to_string(Command::Descriptors(DescriptorsCommand {
            file: f.path().to_path_buf(),
        }))
        .unwrap();
        assert!(s.starts_with("Device 18d1:4ee7\n"));
        assert!(s.contains("Interface 0 alt 0 class VendorSpecific"));
    }

    #[test]
    fn malformed_file() {
        let f = temp_file(&[0x12, 0x01, 0x00]);
        let err = run_to_string(Command::Descriptors(DescriptorsCommand {
            file: f.path().to_path_buf(),
        }))
        .unwrap_err();
        assert!(format!("{:#}", err).starts_with("failed to parse"));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_to_string(Command::Bos(BosCommand {
            file: dir.path().join("missing"),
        }))
        .unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
