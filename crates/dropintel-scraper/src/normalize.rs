//! Price-text cleaning for scraped listing fields.

/// Strips every non-digit character from raw price text and parses the
/// remainder as an unsigned integer.
///
/// Yields `0` when the text contains no digits (or the digit run does
/// not fit in a `u64`); callers treat a cleaned price of `0` as
/// extraction noise rather than an error. Applying the rule to an
/// already-clean integer is a no-op.
///
/// `"₲ 2.800.000"` → `2_800_000`, `"Gratis"` → `0`.
#[must_use]
pub fn clean_price(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarani_formatted_price() {
        assert_eq!(clean_price("₲ 2.800.000"), 2_800_000);
    }

    #[test]
    fn thousands_separators_and_currency_words() {
        assert_eq!(clean_price("Gs. 1.250.000 c/u"), 1_250_000);
    }

    #[test]
    fn no_digits_yields_zero() {
        assert_eq!(clean_price("Gratis"), 0);
    }

    #[test]
    fn empty_string_yields_zero() {
        assert_eq!(clean_price(""), 0);
    }

    #[test]
    fn cleaning_is_idempotent_on_clean_integers() {
        let once = clean_price("₲ 3.500.000");
        let twice = clean_price(&once.to_string());
        assert_eq!(once, twice);
    }

    #[test]
    fn unicode_digits_are_not_counted() {
        // Only ASCII digits survive the strip.
        assert_eq!(clean_price("٣٥"), 0);
    }

    #[test]
    fn overflowing_digit_runs_yield_zero() {
        assert_eq!(clean_price("99999999999999999999999999"), 0);
    }
}
