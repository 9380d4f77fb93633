//! Module for writing JSON data
//!
//! [`Document`] is the entry point: it owns the output sink and the writer state.
//! [`Object`] and [`Array`] are scoped handles which open their container when
//! created and close it when dropped, [`Node`] represents a single position where
//! exactly one value may be written, and [`JsonValue`] routes any supported value
//! type to the matching writer primitive.
//!
//! # Custom types
//!
//! Any type becomes serializable by implementing [`JsonValue`]. The implementation
//! only uses the public scope operations (`obj`/`ar`/`val`); the writer never
//! inspects the type itself:
//!
//! ```
//! # use jotson::writer::*;
//! struct Person {
//!     name: String,
//!     age: u32,
//!     pets: Vec<String>,
//! }
//!
//! impl JsonValue for Person {
//!     fn write_json<W: std::io::Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
//!         let mut obj = node.obj()?;
//!         obj.val("name", &self.name)?;
//!         obj.val("age", self.age)?;
//!         obj.val("pets", &self.pets)?;
//!         obj.end()
//!     }
//! }
//!
//! let mut document = Document::new(Vec::<u8>::new());
//! document.val(Person {
//!     name: "Alice B.".to_owned(),
//!     age: 35,
//!     pets: vec!["Lucky".to_owned(), "Fido".to_owned()],
//! })?;
//!
//! assert_eq!(
//!     r#"{"name":"Alice B.","age":35,"pets":["Lucky","Fido"]}"#,
//!     String::from_utf8(document.finish()?)?
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error handling
//!
//! The methods of the writer return a [`Result::Err`] when an error occurs while
//! writing the JSON document. When encountering an error, writing the JSON
//! document **must** be aborted; the output produced up to that point is
//! incomplete and not valid JSON. [`JsonError::Protocol`] errors indicate
//! incorrect usage by the caller and are not meant to be recovered from.
//!
//! In general it is recommended to handle errors with the `?` operator of Rust
//! and to abort writing the JSON document when an error occurs.

use std::io::Write;

use duplicate::duplicate_item;
use thiserror::Error;

mod document;
mod scope;
pub use document::*;
pub use scope::*;

/// Largest integer magnitude which a binary64 float can represent exactly (2^53)
///
/// JSON numbers are commonly parsed into doubles, so integers beyond this bound
/// are rejected instead of being written with silent precision loss.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_992;

pub(crate) const INTEGER_TOO_BIG: &str = "Integer value is bigger than maximum allowed for JSON";
pub(crate) const FLOAT_NOT_FINITE: &str =
    "Floating point value is not finite. Not supported by JSON";

/// Error which occurred while writing a JSON document
#[derive(Error, Debug)]
pub enum JsonError {
    /// A number cannot be represented by JSON
    ///
    /// Either an integer whose magnitude exceeds [`MAX_SAFE_INTEGER`], or a
    /// non-finite floating point value (NaN or Infinity). The data of this enum
    /// variant is a message explaining why the number was rejected.
    #[error("{0}")]
    Range(String),
    /// The writer was driven in an order which would produce malformed JSON
    ///
    /// For example a key was pushed while another key was still pending, or the
    /// document was finished while containers were still open. This indicates
    /// incorrect usage by the caller; the error exists to fail loudly, not to be
    /// recovered from.
    #[error("{0}")]
    Protocol(String),
    /// An IO error occurred while writing to the underlying sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sealed trait for integer number types such as `u32`
///
/// Types no wider than 32 bits always fit a JSON number. Wider types are checked
/// against [`MAX_SAFE_INTEGER`] and rejected with [`JsonError::Range`] when their
/// value cannot be represented exactly by a double.
///
/// Implementing this trait for custom number types is not possible.
pub trait JsonInt: private::Sealed {
    /// Converts this number to a JSON number string
    ///
    /// The JSON number string is passed to the given `consumer`. Returns an error
    /// if the value is outside the safely representable range.
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError>;
}

/// Sealed trait for floating point number types (`f32` and `f64`)
///
/// Non-finite values are rejected with [`JsonError::Range`] because JSON has no
/// representation for NaN or Infinity. Finite values are converted using Rust's
/// `Display` implementation, which produces the shortest decimal representation
/// that parses back to the identical value.
///
/// Implementing this trait for custom number types is not possible.
pub trait JsonFloat: private::Sealed {
    /// Converts this number to a JSON number string
    ///
    /// The JSON number string is passed to the given `consumer`. Returns an error
    /// if this number is not finite.
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError>;
}

mod private {
    use duplicate::duplicate_item;

    // Sealed trait, see https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
    pub trait Sealed {}

    // Use `duplicate` crate to avoid repeating code for all supported types, see https://stackoverflow.com/a/61467564
    #[duplicate_item(type_template; [u8]; [i8]; [u16]; [i16]; [u32]; [i32]; [u64]; [i64]; [u128]; [i128]; [usize]; [isize]; [f32]; [f64])]
    impl Sealed for type_template {}
}

// Integers up to 32 bits always fit the 2^53 bound, no range check needed
#[duplicate_item(type_template; [u8]; [i8]; [u16]; [i16]; [u32]; [i32])]
impl JsonInt for type_template {
    #[inline(always)]
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError> {
        consumer(&self.to_string())
    }
}

#[duplicate_item(type_template; [u64]; [u128])]
impl JsonInt for type_template {
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError> {
        #[allow(clippy::useless_conversion /* for u128 -> u128 */)]
        let value = u128::from(*self);
        if value <= u128::from(MAX_SAFE_INTEGER) {
            consumer(&self.to_string())
        } else {
            Err(JsonError::Range(INTEGER_TOO_BIG.to_owned()))
        }
    }
}

#[duplicate_item(type_template; [i64]; [i128])]
impl JsonInt for type_template {
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError> {
        let max = i128::from(MAX_SAFE_INTEGER as i64);
        #[allow(clippy::useless_conversion /* for i128 -> i128 */)]
        let value = i128::from(*self);
        if value >= -max && value <= max {
            consumer(&self.to_string())
        } else {
            Err(JsonError::Range(INTEGER_TOO_BIG.to_owned()))
        }
    }
}

// `usize` and `isize` have no `From` conversion to the 128 bit types, so they
// route through their fixed-width equivalents (lossless on all supported
// platforms)
impl JsonInt for usize {
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError> {
        (*self as u64).use_json_number(consumer)
    }
}

impl JsonInt for isize {
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError> {
        (*self as i64).use_json_number(consumer)
    }
}

#[duplicate_item(type_template; [f32]; [f64])]
impl JsonFloat for type_template {
    #[inline(always)]
    fn use_json_number<C: FnOnce(&str) -> Result<(), JsonError>>(
        &self,
        consumer: C,
    ) -> Result<(), JsonError> {
        if self.is_finite() {
            consumer(&self.to_string())
        } else {
            Err(JsonError::Range(FLOAT_NOT_FINITE.to_owned()))
        }
    }
}

/// The JSON `null` literal
///
/// A dedicated marker type because Rust has no value-level counterpart for
/// `null`; `Option::None` cannot be used since an absent [`Option`] means
/// "omit the member entirely" rather than "write `null`".
///
/// ```
/// # use jotson::writer::*;
/// let mut document = Document::new(Vec::<u8>::new());
/// document.val(Null)?;
/// assert_eq!("null", String::from_utf8(document.finish()?)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Null;

/// A value which can be written to a JSON document
///
/// Implementations exist for booleans, [`Null`], integers, floating point
/// numbers, strings, `Option` (where `None` omits the value entirely), slices
/// and `Vec`s of values. Custom types implement this trait themselves, see the
/// [module documentation](self) for an example.
pub trait JsonValue {
    /// Writes this value to the given value position
    ///
    /// Exactly one value must be written to `node`: either a primitive via
    /// [`Node::val`], or a container opened with [`Node::obj`] or [`Node::ar`]
    /// and filled field by field.
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError>;
}

impl JsonValue for bool {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        node.doc().bool_value(*self)
    }
}

impl JsonValue for Null {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        node.doc().null_value()
    }
}

impl JsonValue for str {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        node.doc().string_value(self)
    }
}

impl JsonValue for String {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        self.as_str().write_json(node)
    }
}

/// `None` omits the value: in an object the pending key is discarded and the
/// member does not appear in the output at all, it is *not* written as `null`.
impl<T: JsonValue> JsonValue for Option<T> {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        match self {
            Some(value) => value.write_json(node),
            None => {
                node.doc().write_absent();
                Ok(())
            }
        }
    }
}

impl<T: JsonValue + ?Sized> JsonValue for &T {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        (**self).write_json(node)
    }
}

#[duplicate_item(type_template; [u8]; [i8]; [u16]; [i16]; [u32]; [i32]; [u64]; [i64]; [u128]; [i128]; [usize]; [isize])]
impl JsonValue for type_template {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        node.doc().int_value(*self)
    }
}

#[duplicate_item(type_template; [f32]; [f64])]
impl JsonValue for type_template {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        node.doc().float_value(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Display;

    fn number_string<T: JsonInt + Display>(number: T) -> Result<String, JsonError> {
        let mut number_string = String::new();
        number.use_json_number(|json_number| {
            number_string.push_str(json_number);
            Ok(())
        })?;
        Ok(number_string)
    }

    #[test]
    fn small_integers_are_unchecked() {
        assert_eq!("-128", number_string(i8::MIN).unwrap());
        assert_eq!("255", number_string(u8::MAX).unwrap());
        assert_eq!("-2147483648", number_string(i32::MIN).unwrap());
        assert_eq!("4294967295", number_string(u32::MAX).unwrap());
    }

    #[test]
    fn wide_integers_within_bound() {
        assert_eq!("900000000000000", number_string(900_000_000_000_000_u64).unwrap());
        assert_eq!(
            "9007199254740992",
            number_string(MAX_SAFE_INTEGER).unwrap()
        );
        assert_eq!(
            "-9007199254740992",
            number_string(-(MAX_SAFE_INTEGER as i64)).unwrap()
        );
        assert_eq!("0", number_string(0_u128).unwrap());
        assert_eq!("4000000000", number_string(4_000_000_000_usize).unwrap());
        assert_eq!("-2000000000", number_string(-2_000_000_000_isize).unwrap());
    }

    #[test]
    fn wide_integers_outside_bound() {
        fn assert_range_error<T: JsonInt + Display + Copy>(number: T) {
            match number_string(number) {
                Err(JsonError::Range(message)) => assert_eq!(INTEGER_TOO_BIG, message),
                other => panic!("Expected range error for {number}, got {other:?}"),
            }
        }

        assert_range_error(MAX_SAFE_INTEGER + 1);
        assert_range_error(1_u64 << 55);
        assert_range_error(-(MAX_SAFE_INTEGER as i64) - 1);
        assert_range_error(i64::MIN);
        assert_range_error(u64::MAX);
        assert_range_error(u128::MAX);
        assert_range_error(i128::MIN);
        #[cfg(target_pointer_width = "64")]
        {
            assert_range_error(usize::MAX);
            assert_range_error(isize::MIN);
        }
    }

    #[test]
    fn floats() {
        fn float_string<T: JsonFloat>(number: T) -> Result<String, JsonError> {
            let mut number_string = String::new();
            number.use_json_number(|json_number| {
                number_string.push_str(json_number);
                Ok(())
            })?;
            Ok(number_string)
        }

        assert_eq!("1.5", float_string(1.5_f32).unwrap());
        assert_eq!("-2.5", float_string(-2.5_f64).unwrap());
        assert_eq!("3.1", float_string(3.1_f32).unwrap());
        assert_eq!("0", float_string(0.0_f64).unwrap());

        // Shortest representation round-trips to the identical value
        let value = 0.1_f64 + 0.2_f64;
        let text = float_string(value).unwrap();
        assert_eq!(value, text.parse::<f64>().unwrap());

        for number in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            match float_string(number) {
                Err(JsonError::Range(message)) => assert_eq!(FLOAT_NOT_FINITE, message),
                other => panic!("Expected range error, got {other:?}"),
            }
        }
        match float_string(f32::NAN) {
            Err(JsonError::Range(message)) => assert_eq!(FLOAT_NOT_FINITE, message),
            other => panic!("Expected range error, got {other:?}"),
        }
    }
}
