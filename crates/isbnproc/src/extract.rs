//! Isolating the ISBN digits from a line of OCR text.

/// Keeps only the decimal digits of `raw`, in their original order.
///
/// Hyphens, spaces, prefixes such as `ISBN` and any stray characters the OCR service picked up
/// are dropped. No length or checksum validation happens here.
///
/// # Examples
///
/// ```
/// assert_eq!("9780134685991", isbnproc::extract("ISBN 978-0-13-468599-1"));
/// assert_eq!("", isbnproc::extract("no digits"));
/// ```
#[must_use]
pub fn extract(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::extract;

    #[test]
    fn strips_prefix_and_hyphens() {
        assert_eq!("9780134685991", extract("ISBN 978-0-13-468599-1"));
        assert_eq!("0735619670", extract("ISBN: 0-7356-1967-0"));
    }

    #[test]
    fn digits_in_the_prefix_are_kept() {
        assert_eq!("100735619670", extract("ISBN-10: 0-7356-1967-0"));
    }

    #[test]
    fn keeps_digits_in_original_order() {
        assert_eq!("321", extract("3a2b1c"));
        assert_eq!("0007", extract(" 0 0 0 7 "));
    }

    #[test]
    fn empty_and_digitless_input_yield_empty_output() {
        assert_eq!("", extract(""));
        assert_eq!("", extract("ISBN --- X"));
    }

    #[test]
    fn non_ascii_numerals_are_not_decimal_digits() {
        // Arabic-indic and fullwidth digits are dropped.
        assert_eq!("12", extract("1\u{0663}\u{ff15}2"));
    }

    #[test]
    fn output_is_exactly_the_digits_of_the_input() {
        let samples = ["978 1 4493 5573 9", "x", "12-34-56", "\t9\n8\r7", "ÉÀ9é8"];
        for s in samples {
            let expected: String = s.chars().filter(|c| ('0'..='9').contains(c)).collect();
            assert_eq!(expected, extract(s), "input {s:?}");
        }
    }
}
