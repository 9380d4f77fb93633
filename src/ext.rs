//! Adapters for serializing sequence collections
//!
//! Any ordered collection becomes serializable by routing it through
//! [`write_seq`], which opens an array scope and writes each element in
//! iteration order. The adapters here only use the public scope operations;
//! the writer core knows nothing about collection types.
//!
//! ```
//! # use jotson::writer::*;
//! let mut document = Document::new(Vec::<u8>::new());
//! document.val(&[1, 2, 3, 4][..])?;
//! assert_eq!("[1,2,3,4]", String::from_utf8(document.finish()?)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Write;

use crate::writer::{JsonError, JsonValue, Node};

/// Writes the elements of `values` as a JSON array at the given position
///
/// This is the building block for [`JsonValue`] implementations of collection
/// types which are not covered by the built-in slice and `Vec` implementations:
///
/// ```
/// # use std::collections::VecDeque;
/// # use jotson::{ext, writer::*};
/// struct Queue(VecDeque<u32>);
///
/// impl JsonValue for Queue {
///     fn write_json<W: std::io::Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
///         ext::write_seq(node, &self.0)
///     }
/// }
///
/// let mut document = Document::new(Vec::<u8>::new());
/// document.val(Queue(VecDeque::from([3, 1, 2])))?;
/// assert_eq!("[3,1,2]", String::from_utf8(document.finish()?)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_seq<W, I>(node: Node<'_, W>, values: I) -> Result<(), JsonError>
where
    W: Write,
    I: IntoIterator,
    I::Item: JsonValue,
{
    let mut ar = node.ar()?;
    for value in values {
        ar.val(value)?;
    }
    ar.end()
}

impl<T: JsonValue> JsonValue for [T] {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        write_seq(node, self)
    }
}

impl<T: JsonValue, const N: usize> JsonValue for [T; N] {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        write_seq(node, self)
    }
}

impl<T: JsonValue> JsonValue for Vec<T> {
    fn write_json<W: Write>(&self, node: Node<'_, W>) -> Result<(), JsonError> {
        self.as_slice().write_json(node)
    }
}
