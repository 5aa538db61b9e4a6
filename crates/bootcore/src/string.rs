//! Immutable byte strings.
//!
//! A [`ByteString`] owns its bytes outright and never changes after
//! construction. Everything that looks like mutation (concatenation, numeric
//! formatting) builds a new value with a fresh identity.
//!
//! Equality is by content: two strings are equal when they have the same
//! length and the same bytes in the same positions, regardless of which
//! objects they are.
use core::{
    fmt,
    hash::{Hash, Hasher},
};

use bstr::{BStr, ByteSlice};

use crate::{
    error::BoundsError,
    identity::{Identity, RuntimeObject},
    number::{Digits, SignStyle},
};

pub struct ByteString {
    identity: Identity,
    bytes: Box<[u8]>,
}

impl ByteString {
    /// Takes ownership of `bytes` as the string's content.
    #[must_use]
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            identity: Identity::next(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::<u8>::new())
    }

    /// Decimal rendering of `value` in the canonical style: a leading `-` for
    /// negative values and no marker otherwise.
    #[must_use]
    pub fn from_integer(value: i64) -> Self {
        Self::from_integer_with(value, SignStyle::NegativeOnly)
    }

    #[must_use]
    pub fn from_integer_with(value: i64, style: SignStyle) -> Self {
        Self::new(Digits::new(value, style).as_bytes())
    }

    /// The backing bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.bytes.as_bstr()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The byte at `index`.
    ///
    /// # Errors
    ///
    /// [`BoundsError::Index`] when `index` is not below [`len`](Self::len).
    pub fn char_at(&self, index: usize) -> Result<u8, BoundsError> {
        self.bytes.get(index).copied().ok_or(BoundsError::Index {
            index,
            len: self.bytes.len(),
        })
    }

    /// Content equality against any runtime object. Objects that are not
    /// string-like are never equal to a string.
    #[must_use]
    pub fn equals(&self, other: &dyn RuntimeObject) -> bool {
        other.as_byte_string().is_some_and(|other| self == other)
    }

    /// A new string holding `self` followed by `other`. Neither operand
    /// changes.
    #[must_use]
    pub fn append(&self, other: &ByteString) -> ByteString {
        let mut joined = Vec::with_capacity(self.len() + other.len());
        joined.extend_from_slice(&self.bytes);
        joined.extend_from_slice(&other.bytes);
        ByteString::new(joined)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }
}

impl RuntimeObject for ByteString {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "String"
    }

    fn as_byte_string(&self) -> Option<&ByteString> {
        Some(self)
    }

    /// A string describes itself as its own content.
    fn describe(&self) -> ByteString {
        self.clone()
    }
}

/// Cloning constructs a new object: same content, fresh identity.
impl Clone for ByteString {
    fn clone(&self) -> Self {
        Self::new(self.bytes.clone())
    }
}

impl Default for ByteString {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ByteString {}

impl Hash for ByteString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl PartialEq<[u8]> for ByteString {
    fn eq(&self, other: &[u8]) -> bool {
        *self.bytes == *other
    }
}

impl PartialEq<&[u8]> for ByteString {
    fn eq(&self, other: &&[u8]) -> bool {
        *self.bytes == **other
    }
}

impl PartialEq<str> for ByteString {
    fn eq(&self, other: &str) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

impl PartialEq<&str> for ByteString {
    fn eq(&self, other: &&str) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for ByteString {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl From<String> for ByteString {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteString({:?})", self.as_bstr())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{self, SeqAccess, Visitor},
    };

    use super::ByteString;

    impl Serialize for ByteString {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.bytes())
        }
    }

    struct ByteStringVisitor;

    impl<'de> Visitor<'de> for ByteStringVisitor {
        type Value = ByteString;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte string")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<ByteString, E> {
            Ok(ByteString::from(v))
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<ByteString, E> {
            Ok(ByteString::from(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<ByteString, E> {
            Ok(ByteString::from(v))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ByteString, A::Error> {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(byte) = seq.next_element::<u8>()? {
                bytes.push(byte);
            }
            Ok(ByteString::from(bytes))
        }
    }

    impl<'de> Deserialize<'de> for ByteString {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_byte_buf(ByteStringVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::QuickCheck;
    use rstest::rstest;

    use super::*;
    use crate::identity::Object;

    #[test]
    fn construction_preserves_bytes_and_length() {
        #[allow(clippy::needless_pass_by_value)]
        fn prop(bytes: Vec<u8>) -> bool {
            let s = ByteString::new(bytes.clone());
            s.bytes() == bytes.as_slice() && s.len() == bytes.len()
        }

        let tests = if is_ci::cached() { 10_000 } else { 1_000 };
        QuickCheck::new()
            .tests(tests)
            .quickcheck(prop as fn(Vec<u8>) -> bool);
    }

    #[test]
    fn append_concatenates_without_touching_operands() {
        #[allow(clippy::needless_pass_by_value)]
        fn prop(left: Vec<u8>, right: Vec<u8>) -> bool {
            let s = ByteString::new(left.clone());
            let t = ByteString::new(right.clone());
            let joined = s.append(&t);

            let mut expected = left.clone();
            expected.extend_from_slice(&right);

            joined.len() == s.len() + t.len()
                && joined == expected.as_slice()
                && s == left.as_slice()
                && t == right.as_slice()
        }

        let tests = if is_ci::cached() { 10_000 } else { 1_000 };
        QuickCheck::new()
            .tests(tests)
            .quickcheck(prop as fn(Vec<u8>, Vec<u8>) -> bool);
    }

    #[test]
    fn equality_is_by_content_not_identity() {
        let a = ByteString::from("hello");
        let b = ByteString::from("hello");
        assert_ne!(a.identity(), b.identity());
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_ne!(a, ByteString::from("hellO"));
        assert_ne!(a, ByteString::from("hell"));
    }

    #[test]
    fn equals_rejects_objects_that_are_not_strings() {
        let s = ByteString::from("Object");
        let object = Object::new();
        assert!(!s.equals(&object));
        assert!(s.equals(&ByteString::from("Object")));
    }

    #[test]
    fn clone_is_a_new_object_with_equal_content() {
        let a = ByteString::from("abc");
        let b = a.clone();
        assert_eq!(a, b);
        assert!(!a.same_object(&b));
    }

    #[rstest]
    #[case(0, Ok(b'a'))]
    #[case(2, Ok(b'c'))]
    #[case(3, Err(BoundsError::Index { index: 3, len: 3 }))]
    #[case(usize::MAX, Err(BoundsError::Index { index: usize::MAX, len: 3 }))]
    fn char_at_checks_bounds(#[case] index: usize, #[case] expected: Result<u8, BoundsError>) {
        assert_eq!(ByteString::from("abc").char_at(index), expected);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(1234, "1234")]
    #[case(-56, "-56")]
    fn from_integer_uses_canonical_sign_style(#[case] value: i64, #[case] expected: &str) {
        assert_eq!(ByteString::from_integer(value), expected);
    }

    #[test]
    fn from_integer_with_always_marks_sign() {
        assert_eq!(ByteString::from_integer_with(5, SignStyle::Always), "+5");
        assert_eq!(ByteString::from_integer_with(-5, SignStyle::Always), "-5");
    }

    #[test]
    fn display_is_lossy_utf8() {
        let s = ByteString::new(vec![b'o', b'k', 0xFF]);
        assert_eq!(s.to_string(), "ok\u{FFFD}");
        assert_eq!(format!("{s:?}"), r#"ByteString("ok\xFF")"#);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_reads_text_or_byte_arrays() {
        let text: ByteString = serde_json::from_str(r#""hi""#).unwrap();
        let array: ByteString = serde_json::from_str("[104,105]").unwrap();
        assert_eq!(text, "hi");
        assert_eq!(array, "hi");
        assert_eq!(serde_json::to_string(&text).unwrap(), "[104,105]");
    }

    #[test]
    fn describe_of_a_string_is_its_content() {
        let s = ByteString::from("text");
        assert_eq!(s.describe(), "text");
    }
}
