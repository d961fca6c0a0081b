//! Block segmentation for bulk-import pastes.
//!
//! The source material is one long paste of concatenated listings. A line
//! holding only the letter "L" acts as a weak separator, but the same token
//! also shows up mid-listing, so it cannot be trusted on its own. The reliable
//! anchor is the place-name header ("GENT (9000) Kerkstraat"): every listing
//! starts with one, so a header line flushes the block in progress and opens
//! the next one. Anything before the first header is noise and is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

/// Place-name header: a run of uppercase words (a hyphenated second part is
/// common, e.g. SINT-NIKLAAS), a 4-digit postal code in parentheses, and an
/// optional trailing street address.
static RE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\p{Lu}[\p{Lu}'’]*(?:[ \-]\p{Lu}[\p{Lu}'’]*)*)\s*\((\d{4})\)\s*(.*)$").unwrap()
});

/// Parsed pieces of a header line: place name, postal code, address remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub plaats: String,
    pub postcode: String,
    pub adres: String,
}

/// Try to read a line as a place-name header.
pub fn parse_header(line: &str) -> Option<Header> {
    let caps = RE_HEADER.captures(line.trim())?;
    Some(Header {
        plaats: caps.get(1)?.as_str().trim().to_string(),
        postcode: caps.get(2)?.as_str().to_string(),
        adres: caps.get(3)?.as_str().trim().to_string(),
    })
}

pub fn is_header_line(line: &str) -> bool {
    RE_HEADER.is_match(line.trim())
}

/// Split a raw paste into per-listing blocks of trimmed, non-blank lines.
///
/// Pure function of its input: a header line starts a new block, date lines
/// and any other non-empty line are appended to the current one, delimiter
/// lines ("L" on its own) are dropped. No block is emitted without a header.
pub fn segment(raw: &str) -> Vec<Vec<String>> {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line == "L" {
            continue;
        }
        if is_header_line(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(vec![line.to_string()]);
        } else if let Some(block) = current.as_mut() {
            // Date lines and plain content alike belong to the open block.
            debug_assert!(!line.is_empty());
            block.push(line.to_string());
        }
        // Content before the first header is discarded.
    }

    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        let h = parse_header("GENT (9000) Kerkstraat").unwrap();
        assert_eq!(h.plaats, "GENT");
        assert_eq!(h.postcode, "9000");
        assert_eq!(h.adres, "Kerkstraat");

        let h = parse_header("SINT-NIKLAAS (9100)").unwrap();
        assert_eq!(h.plaats, "SINT-NIKLAAS");
        assert_eq!(h.adres, "");

        let h = parse_header("DE PANNE (8660) Zeelaan 21").unwrap();
        assert_eq!(h.plaats, "DE PANNE");
        assert_eq!(h.adres, "Zeelaan 21");

        assert!(parse_header("Gent (9000)").is_none());
        assert!(parse_header("GENT 9000").is_none());
    }

    #[test]
    fn test_segment_splits_on_headers() {
        let raw = "GENT (9000) Kerkstraat\nza 12 juli 2025\nRommelmarkt Centrum\nL\nBRUGGE (8000)\nzo 13 juli 2025\n";
        let blocks = segment(raw);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0][0], "GENT (9000) Kerkstraat");
        assert_eq!(blocks[0].len(), 3);
        assert_eq!(blocks[1][0], "BRUGGE (8000)");
    }

    #[test]
    fn test_segment_drops_leading_noise_and_delimiters() {
        let raw = "Bekijk alle markten\nL\n\nGENT (9000)\nza 12 juli 2025\nL\n10:00 - 16:00\n";
        let blocks = segment(raw);
        assert_eq!(blocks.len(), 1);
        // Delimiter inside the block is dropped, the time line is kept.
        assert_eq!(blocks[0], vec!["GENT (9000)", "za 12 juli 2025", "10:00 - 16:00"]);
    }

    #[test]
    fn test_segment_empty_input() {
        assert!(segment("").is_empty());
        assert!(segment("L\nL\nno header here\n").is_empty());
    }
}
