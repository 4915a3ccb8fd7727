//! Integer rounding and alignment
//!
//! An alignment of 0 behaves like 1. Results saturate at `u64::MAX`.

/// Next multiple of `alignment` strictly greater than `value` when `value` is
/// already aligned, otherwise the next multiple
pub fn round_up(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    (value / alignment).saturating_add(1).saturating_mul(alignment)
}

/// Smallest multiple of `alignment` greater than or equal to `value`
pub fn align(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    match value % alignment {
        0 => value,
        rem => value.saturating_add(alignment - rem),
    }
}

/// True if `value` is a multiple of `alignment`
pub fn is_aligned(value: u64, alignment: u64) -> bool {
    value % alignment.max(1) == 0
}

/// Bytes needed to pad `value` up to `alignment`
pub fn padding_for(value: u64, alignment: u64) -> u64 {
    align(value, alignment) - value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_strictly_advances() {
        assert_eq!(round_up(0, 16), 16);
        assert_eq!(round_up(16, 16), 32);
        assert_eq!(round_up(17, 16), 32);
        assert_eq!(round_up(31, 16), 32);
    }

    #[test]
    fn test_align_is_idempotent_on_multiples() {
        assert_eq!(align(0, 0x200), 0);
        assert_eq!(align(0x200, 0x200), 0x200);
        assert_eq!(align(0x201, 0x200), 0x400);
        assert_eq!(align(align(0x201, 0x200), 0x200), 0x400);
    }

    #[test]
    fn test_zero_alignment_and_helpers() {
        assert_eq!(align(7, 0), 7);
        assert_eq!(round_up(7, 0), 8);
        assert!(is_aligned(0x1000, 0x1000));
        assert!(!is_aligned(0x1001, 0x1000));
        assert_eq!(padding_for(0x1C, 0x10), 4);
        assert_eq!(align(u64::MAX, 16), u64::MAX);
    }
}
