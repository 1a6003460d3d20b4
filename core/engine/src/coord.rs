//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Utilities for converting between spreadsheet coordinate formats.
//! CONTEXT: Converts between A1-style notation (e.g., "A1", "AA100") and the
//! 1-based (row, col) indices used by the Grid. Column "A" = 1, "Z" = 26,
//! "AA" = 27. Row 1 in A1 notation = row 1 internally.

/// A cell coordinate as (row, col) with 1-based indices.
pub type CellCoord = (u32, u32);

/// Converts a column string (e.g., "A", "AA", "ABC") to a 1-based column index.
/// "A" -> 1, "B" -> 2, ..., "Z" -> 26, "AA" -> 27.
///
/// Returns None for an empty string, non-alphabetic input, or overflow.
pub fn col_to_index(col_str: &str) -> Option<u32> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: u32 = 0;
    for c in col_str.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result)
}

/// Converts a 1-based column index to a column string.
/// 1 -> "A", 26 -> "Z", 27 -> "AA". Index 0 has no letter form and yields "".
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    while col_index > 0 {
        let remainder = (col_index - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        col_index = (col_index - 1) / 26;
    }
    result
}

/// Parses an A1-style reference into a 1-based (row, col) coordinate.
/// "A1" -> (1, 1), "B2" -> (2, 2), "AA100" -> (100, 27).
///
/// Absolute markers ("$A$1") are accepted. Returns None when the reference
/// is not a letters-then-digits pair or either part is zero/out of range.
pub fn parse_a1(reference: &str) -> Option<CellCoord> {
    let cleaned: String = reference.trim().chars().filter(|c| *c != '$').collect();
    let split = cleaned.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cleaned.split_at(split);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let col = col_to_index(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row, col))
}

/// Parses a range reference ("A1:B3") into its two corner coordinates.
/// A single-cell reference ("C4") yields the same coordinate twice.
pub fn parse_a1_range(reference: &str) -> Option<(CellCoord, CellCoord)> {
    match reference.split_once(':') {
        Some((start, end)) => Some((parse_a1(start)?, parse_a1(end)?)),
        None => {
            let single = parse_a1(reference)?;
            Some((single, single))
        }
    }
}

/// Converts a 1-based (row, col) coordinate to an A1-style reference string.
/// (1, 1) -> "A1", (2, 2) -> "B2", (100, 27) -> "AA100"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row)
}

/// Returns true when `reference` is a strict upper-case A1 reference such as
/// "B12" (no `$`, no whitespace, no lower-case letters).
pub fn is_strict_a1(reference: &str) -> bool {
    let split = match reference.find(|c: char| c.is_ascii_digit()) {
        Some(split) if split > 0 => split,
        _ => return false,
    };
    let (letters, digits) = reference.split_at(split);
    letters.chars().all(|c| c.is_ascii_uppercase())
        && digits.chars().all(|c| c.is_ascii_digit())
}
