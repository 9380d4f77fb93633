#![warn(missing_docs)]
#![forbid(unsafe_code)]
// Allow needless `return` because that makes it sometimes more obvious that
// an expression is the result of the function
#![allow(clippy::needless_return)]
// Allow `assert_eq!(true, ...)` because in some cases it is used to check a bool
// value and not a 'flag' / 'state', and `assert_eq!` makes that more explicit
#![allow(clippy::bool_assert_comparison)]
// Enable 'unused' warnings for doc tests (are disabled by default)
#![doc(test(no_crate_inject))]
#![doc(test(attr(warn(unused))))]
// Fail on warnings in doc tests
#![doc(test(attr(deny(warnings))))]

//! Jotson is a streaming JSON serializer which emits [RFC 8259](https://www.rfc-editor.org/rfc/rfc8259.html)
//! conformant JSON text directly to an output sink, without building an intermediate
//! document tree.
//!
//! The API is scope based: a [`Document`](writer::Document) owns the sink and the
//! writer state, and nested [`Object`](writer::Object) and [`Array`](writer::Array)
//! scopes borrow it. A scope opens its container when it is created and closes it
//! when it goes out of scope, so brackets are balanced on every exit path,
//! including early returns. Values of any type implementing
//! [`JsonValue`](writer::JsonValue) can be written wherever a value is expected.
//!
//! # Terminology
//!
//! This crate uses the same terminology as the JSON specification:
//!
//! - *object*: `{ ... }`
//!   - *member*: Entry in an object. For example the JSON object `{"a": 1}` has the member
//!     `"a": 1` where `"a"` is the member *key* and `1` is the member *value*.
//! - *array*: `[ ... ]`
//! - *literal*:
//!   - *boolean*: `true` or `false`
//!   - `null`
//! - *number*: number value, for example `123.4`
//! - *string*: string value, for example `"text in \"quotes\""`
//!
//! # Usage example
//!
//! ```
//! # use jotson::writer::*;
//! // In this example JSON bytes are stored in a Vec;
//! // normally they would be written to a file or network connection
//! let mut document = Document::new(Vec::<u8>::new());
//!
//! {
//!     let mut obj = document.obj()?;
//!     obj.val("name", "Alice B.")?;
//!     obj.val("age", 35)?;
//!
//!     let mut pets = obj.ar("pets")?;
//!     pets.val("Lucky")?;
//!     pets.val("Fido")?;
//! }
//!
//! // Ensures that the JSON document is complete and flushes the buffer
//! let bytes = document.finish()?;
//! assert_eq!(
//!     r#"{"name":"Alice B.","age":35,"pets":["Lucky","Fido"]}"#,
//!     String::from_utf8(bytes)?
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Custom types become serializable by implementing [`JsonValue`](writer::JsonValue),
//! which only uses the public scope operations; the writer itself never inspects
//! the type. See the [`writer`] module documentation for an example.
//!
//! # Numbers
//!
//! JSON numbers are commonly parsed into IEEE 754 doubles, so this crate rejects
//! integers whose magnitude exceeds 2^53 (the largest integer a double can
//! represent exactly) as well as non-finite floating point values, instead of
//! silently losing precision. See [`JsonError::Range`](writer::JsonError::Range).

pub mod ext;
pub mod writer;

mod escape;
