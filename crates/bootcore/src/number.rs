//! Integer to decimal text.
//!
//! Digits are produced least-significant first by repeated `% 10` and `/ 10`
//! into a fixed scratch array, then read back in reading order. Zero renders
//! as a bare `0`. The magnitude is taken with `unsigned_abs`, so `i64::MIN`
//! formats correctly instead of overflowing on negation.

/// Longest rendering: a sign followed by the 19 digits of `i64::MIN`.
pub const MAX_INTEGER_LEN: usize = 20;

/// Which sign marker precedes the digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignStyle {
    /// `-` for negative values, nothing otherwise. The canonical style.
    #[default]
    NegativeOnly,
    /// `+` or `-` on every value, zero included.
    Always,
}

/// Stack-resident decimal rendering of one integer.
#[derive(Debug, Clone, Copy)]
pub struct Digits {
    buf: [u8; MAX_INTEGER_LEN],
    start: usize,
}

impl Digits {
    #[must_use]
    pub fn new(value: i64, style: SignStyle) -> Self {
        let mut buf = [0u8; MAX_INTEGER_LEN];
        let mut magnitude = value.unsigned_abs();
        let mut start = MAX_INTEGER_LEN;

        loop {
            start -= 1;
            #[expect(clippy::cast_possible_truncation, reason = "a remainder of 10 fits in u8")]
            let digit = (magnitude % 10) as u8;
            buf[start] = b'0' + digit;
            magnitude /= 10;
            if magnitude == 0 {
                break;
            }
        }

        let sign = match (style, value < 0) {
            (_, true) => Some(b'-'),
            (SignStyle::Always, false) => Some(b'+'),
            (SignStyle::NegativeOnly, false) => None,
        };
        if let Some(sign) = sign {
            start -= 1;
            buf[start] = sign;
        }

        Self { buf, start }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::QuickCheck;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, SignStyle::NegativeOnly, "0")]
    #[case(7, SignStyle::NegativeOnly, "7")]
    #[case(-7, SignStyle::NegativeOnly, "-7")]
    #[case(120, SignStyle::NegativeOnly, "120")]
    #[case(0, SignStyle::Always, "+0")]
    #[case(42, SignStyle::Always, "+42")]
    #[case(-42, SignStyle::Always, "-42")]
    #[case(i64::MAX, SignStyle::NegativeOnly, "9223372036854775807")]
    #[case(i64::MIN, SignStyle::NegativeOnly, "-9223372036854775808")]
    #[case(i64::MIN, SignStyle::Always, "-9223372036854775808")]
    fn renders(#[case] value: i64, #[case] style: SignStyle, #[case] expected: &str) {
        assert_eq!(Digits::new(value, style).as_bytes(), expected.as_bytes());
    }

    #[test]
    fn non_negative_values_round_trip() {
        fn prop(n: u64) -> bool {
            let n = i64::try_from(n % 1_000_000_000_000_000_000).unwrap();
            let digits = Digits::new(n, SignStyle::NegativeOnly);
            let text = std::str::from_utf8(digits.as_bytes()).unwrap();
            text.parse::<i64>() == Ok(n)
        }

        let tests = if is_ci::cached() { 10_000 } else { 1_000 };
        QuickCheck::new().tests(tests).quickcheck(prop as fn(u64) -> bool);
    }

    #[test]
    fn signed_values_match_std_formatting() {
        fn prop(n: i64) -> bool {
            let always = Digits::new(n, SignStyle::Always);
            let plain = Digits::new(n, SignStyle::NegativeOnly);
            always.as_bytes() == format!("{n:+}").as_bytes()
                && plain.as_bytes() == n.to_string().as_bytes()
        }

        let tests = if is_ci::cached() { 10_000 } else { 1_000 };
        QuickCheck::new().tests(tests).quickcheck(prop as fn(i64) -> bool);
    }
}
