//! Utilities.

/// Returns bit-represented value of an integer, truncated to `width` bits.
///
/// The returned vector is LSB first.
pub fn u64_to_bitvec(width: usize, value: u64) -> Vec<bool> {
    (0..width).map(|i| i < u64::BITS as usize && (value >> i) & 1 == 1).collect()
}

/// Returns the integer value of LSB-first bits. Returns `None` if a set bit does not fit in `u64`.
pub fn bitvec_to_u64(bits: &[bool]) -> Option<u64> {
    bits.iter().enumerate().try_fold(0u64, |acc, (i, bit)| match (*bit, i < u64::BITS as usize) {
        (false, _) => Some(acc),
        (true, true) => Some(acc | (1 << i)),
        (true, false) => None,
    })
}

/// Indents every line in the string.
pub fn indent(str: String, indent: usize) -> String {
    str.lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("{}{}", " ".repeat(indent), l) })
        .collect::<Vec<_>>()
        .join("\n")
}
