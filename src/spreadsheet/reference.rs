//! Conversions between A1-style cell references and 0-based indexes.

/// Columns of an xlsx worksheet (`A` to `XFD`).
const MAX_COLUMNS: usize = 16_384;

/// Rows of an xlsx worksheet.
const MAX_ROWS: usize = 1_048_576;

/// Converts column letters ("A", "AB") to a 0-based column index.
/// Columns past `XFD` are rejected.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    letters
        .to_ascii_uppercase()
        .bytes()
        .map(|letter| (letter - b'A') as usize + 1)
        .fold(0usize, |index, digit| index * 26 + digit)
        .checked_sub(1)
        .filter(|column| *column < MAX_COLUMNS)
}

/// Converts a 1-based row number string to a 0-based row index.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|row| (1..=MAX_ROWS).contains(row))
        .map(|row| row - 1)
}

/// Splits "B12" into 0-based (row, col).
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let col = col_to_index(&reference[..split])?;
    let row = row_to_index(&reference[split..])?;
    Some((row, col))
}

/// Converts 0-based (row, col) to an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut column = col + 1;
    let mut letters = Vec::new();
    while column > 0 {
        column -= 1;
        letters.push(b'A' + (column % 26) as u8);
        column /= 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("AD"), Some(29));
        assert_eq!(col_to_index(""), None);
        assert_eq!(col_to_index("A1"), None);
        assert_eq!(col_to_index("XFD"), Some(16_383));
        assert_eq!(col_to_index("XFE"), None);
        assert_eq!(col_to_index("ZZZZZZ"), None);
    }

    #[test]
    fn references() {
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("X7"), Some((6, 23)));
        assert_eq!(reference_to_index("A0"), None);
        assert_eq!(reference_to_index("12"), None);
        assert_eq!(reference_to_index("XFD1048576"), Some((1_048_575, 16_383)));
        assert_eq!(reference_to_index("ZZZZZZ1"), None);
        assert_eq!(reference_to_index("A1048577"), None);
    }

    #[test]
    fn reference_names() {
        assert_eq!(index_to_reference(0, 0), "A1");
        assert_eq!(index_to_reference(9, 27), "AB10");
        assert_eq!(index_to_reference(2, 701), "ZZ3");
    }
}
