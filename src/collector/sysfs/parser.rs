//! Parsers for small `/sys` attribute files.

use crate::collector::error::ParseError;
use crate::model::{InterfaceType, LinkState};

/// Completed reads and writes from a block device `stat` line.
///
/// Accepts the 11-field layout and the newer 15-field (discard) and 17-field
/// (flush) layouts. Reads are field 1 and writes field 5 in all of them.
pub fn parse_block_stat(content: &str) -> Result<(u64, u64), ParseError> {
    let fields: Vec<u64> = content
        .split_whitespace()
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| ParseError::new(format!("non-numeric stat field: {}", e)))?;

    match fields.len() {
        11 | 15 | 17 => Ok((fields[0], fields[4])),
        n => Err(ParseError::new(format!("expected 11, 15 or 17 stat fields, got {}", n))),
    }
}

/// Maps `operstate` to a link state. Anything but `up` or `down` is unknown.
pub fn parse_operstate(content: &str) -> LinkState {
    match content.trim() {
        "up" => LinkState::Up,
        "down" => LinkState::Down,
        _ => LinkState::Unknown,
    }
}

/// Classifies an interface by the bus prefix of its `device/modalias`.
pub fn parse_modalias(content: &str) -> InterfaceType {
    let bus = content.split(':').next().unwrap_or_default().trim();
    match bus.to_ascii_uppercase().as_str() {
        "PCI" => InterfaceType::Pci,
        "USB" => InterfaceType::Usb,
        _ => InterfaceType::NotAvailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_stat_layouts() {
        let classic = "  100 1 2 3 200 4 5 6 0 7 8\n";
        let discard = "100 1 2 3 200 4 5 6 0 7 8 0 0 0 0";
        let flush = "100 1 2 3 200 4 5 6 0 7 8 0 0 0 0 9 10";

        assert_eq!(parse_block_stat(classic), Ok((100, 200)));
        assert_eq!(parse_block_stat(discard), Ok((100, 200)));
        assert_eq!(parse_block_stat(flush), Ok((100, 200)));
    }

    #[test]
    fn test_parse_block_stat_rejects_other_shapes() {
        assert!(parse_block_stat("").is_err());
        assert!(parse_block_stat("1 2 3 4 5").is_err());
        assert!(parse_block_stat("not a stat line").is_err());
        assert!(parse_block_stat("1 2 3 4 5 6 7 8 9 10 x").is_err());
    }

    #[test]
    fn test_parse_operstate() {
        assert_eq!(parse_operstate("up\n"), LinkState::Up);
        assert_eq!(parse_operstate("down"), LinkState::Down);
        assert_eq!(parse_operstate("dormant"), LinkState::Unknown);
        assert_eq!(parse_operstate("unknown"), LinkState::Unknown);
    }

    #[test]
    fn test_parse_modalias() {
        assert_eq!(
            parse_modalias("pci:v00008086d0000100Esv00008086sd0000001Ebc02sc00i00"),
            InterfaceType::Pci
        );
        assert_eq!(parse_modalias("usb:v0BDAp8153d3000"), InterfaceType::Usb);
        assert_eq!(parse_modalias("platform:bcm2835"), InterfaceType::NotAvailable);
        assert_eq!(parse_modalias(""), InterfaceType::NotAvailable);
    }
}
