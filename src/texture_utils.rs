pub fn align(value: usize, increment: usize) -> usize {
    if increment <= 1 {
        value
    } else {
        let tmp = value % increment;
        if tmp > 0 {
            value + (increment - tmp)
        } else {
            value
        }
    }
}

/// Extent of one image dimension once laid out in 8x8 tiles: rounded up to a
/// multiple of 8, then to the next power of two if requested, never below 8.
pub fn padded_dimension(dimension: u32, pad_to_power_of_2: bool) -> u32 {
    let aligned = align(dimension as usize, 8) as u32;
    let padded = if pad_to_power_of_2 {
        aligned.next_power_of_two()
    } else {
        aligned
    };
    padded.max(8)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn align_rounds_up() {
        assert_eq!(0, align(0, 8));
        assert_eq!(8, align(1, 8));
        assert_eq!(8, align(8, 8));
        assert_eq!(0x4C, align(0x49, 4));
        assert_eq!(13, align(13, 1));
    }

    #[test]
    fn padded_dimension_without_padding() {
        assert_eq!(8, padded_dimension(1, false));
        assert_eq!(24, padded_dimension(20, false));
        assert_eq!(400, padded_dimension(400, false));
    }

    #[test]
    fn padded_dimension_with_padding() {
        assert_eq!(8, padded_dimension(1, true));
        assert_eq!(32, padded_dimension(20, true));
        assert_eq!(512, padded_dimension(400, true));
        assert_eq!(256, padded_dimension(256, true));
    }
}
