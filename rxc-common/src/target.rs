//! Target configuration
//!
//! The pointer width is fixed per build. Every width-sensitive lowering
//! decision (usize/isize, address arithmetic) reads it from here.

/// Width of a pointer (and of `usize`/`isize`) in bits.
#[cfg(not(feature = "ptr64"))]
pub const POINTER_BITS: u32 = 32;

/// Width of a pointer (and of `usize`/`isize`) in bits.
#[cfg(feature = "ptr64")]
pub const POINTER_BITS: u32 = 64;

pub const USIZE_BITS: u32 = POINTER_BITS;
pub const ISIZE_BITS: u32 = POINTER_BITS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_sized_integers_follow_pointer_width() {
        assert_eq!(USIZE_BITS, POINTER_BITS);
        assert_eq!(ISIZE_BITS, POINTER_BITS);
    }

    #[cfg(not(feature = "ptr64"))]
    #[test]
    fn test_default_pointer_width() {
        assert_eq!(POINTER_BITS, 32);
    }
}
