//! Scoped handles for JSON containers and value positions
//!
//! [`Object`] and [`Array`] are the only places where containers are opened and
//! closed: creating one writes the opening bracket, dropping it writes the
//! closing bracket. Because a child scope mutably borrows its parent, the borrow
//! checker enforces the strictly nested open/close order at compile time.

use std::io::Write;

use super::{Document, JsonError, JsonValue};

/// A position where exactly one JSON value may be written
///
/// A node is consumed by writing a value ([`val`](Self::val)) or by opening a
/// container ([`obj`](Self::obj), [`ar`](Self::ar)). It is handed to
/// [`JsonValue::write_json`] so that value implementations can describe their
/// shape using only the public scope operations.
pub struct Node<'a, W: Write> {
    doc: &'a mut Document<W>,
}

impl<'a, W: Write> Node<'a, W> {
    pub(crate) fn new(doc: &'a mut Document<W>) -> Self {
        Node { doc }
    }

    pub(crate) fn doc(self) -> &'a mut Document<W> {
        self.doc
    }

    /// Opens a JSON object at this position
    pub fn obj(self) -> Result<Object<'a, W>, JsonError> {
        Object::open(self.doc)
    }

    /// Opens a JSON array at this position
    pub fn ar(self) -> Result<Array<'a, W>, JsonError> {
        Array::open(self.doc)
    }

    /// Writes `value` at this position
    pub fn val<V: JsonValue>(self, value: V) -> Result<(), JsonError> {
        value.write_json(self)
    }
}

/// A currently open JSON object
///
/// Created by [`Document::obj`], [`Node::obj`], [`Array::obj`] or
/// [`Object::obj`]. The closing `}` is written when this scope is dropped or
/// explicitly [ended](Self::end), on every exit path including unwinding.
///
/// # Examples
/// ```
/// # use jotson::writer::*;
/// let mut document = Document::new(Vec::<u8>::new());
/// {
///     let mut obj = document.obj()?;
///     obj.val("a", 1)?;
///     obj.val("b", "two")?;
/// }
/// assert_eq!(r#"{"a":1,"b":"two"}"#, String::from_utf8(document.finish()?)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Object<'a, W: Write> {
    doc: &'a mut Document<W>,
    closed: bool,
}

impl<'a, W: Write> Object<'a, W> {
    pub(crate) fn open(doc: &'a mut Document<W>) -> Result<Self, JsonError> {
        doc.open_object()?;
        Ok(Object { doc, closed: false })
    }

    /// Stages the key of the next member and returns the position for its value
    ///
    /// Usually the combined methods [`val`](Self::val), [`obj`](Self::obj) and
    /// [`ar`](Self::ar) are more convenient.
    ///
    /// Duplicate keys are not detected or prevented; avoiding them is the
    /// caller's responsibility.
    ///
    /// # Errors
    /// Returns a [`JsonError::Protocol`] error when a key is already pending
    /// because a previously returned node was discarded without writing a value.
    pub fn key(&mut self, key: &str) -> Result<Node<'_, W>, JsonError> {
        self.doc.push_key(key)?;
        Ok(Node::new(self.doc))
    }

    /// Opens a JSON object as the value of the member `key`
    pub fn obj(&mut self, key: &str) -> Result<Object<'_, W>, JsonError> {
        self.key(key)?.obj()
    }

    /// Opens a JSON array as the value of the member `key`
    pub fn ar(&mut self, key: &str) -> Result<Array<'_, W>, JsonError> {
        self.key(key)?.ar()
    }

    /// Writes a member with the given key and value
    ///
    /// Writing an `Option` which is `None` omits the member entirely: neither
    /// the key nor a `null` appears in the output.
    ///
    /// ```
    /// # use jotson::writer::*;
    /// let mut document = Document::new(Vec::<u8>::new());
    /// {
    ///     let mut obj = document.obj()?;
    ///     obj.val("present", Some(1))?;
    ///     obj.val("absent", None::<i32>)?;
    /// }
    /// assert_eq!(r#"{"present":1}"#, String::from_utf8(document.finish()?)?);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn val<V: JsonValue>(&mut self, key: &str, value: V) -> Result<(), JsonError> {
        self.key(key)?.val(value)
    }

    /// Closes this object explicitly
    ///
    /// Equivalent to dropping the scope, except that an error from writing the
    /// closing bracket is returned here instead of being deferred to
    /// [`Document::finish`].
    pub fn end(mut self) -> Result<(), JsonError> {
        self.closed = true;
        self.doc.close_object()?;
        Ok(())
    }
}

impl<W: Write> Drop for Object<'_, W> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(error) = self.doc.close_object() {
                self.doc.note_deferred_error(error);
            }
        }
    }
}

/// A currently open JSON array
///
/// Created by [`Document::ar`], [`Node::ar`], [`Object::ar`] or [`Array::ar`].
/// The closing `]` is written when this scope is dropped or explicitly
/// [ended](Self::end), on every exit path including unwinding.
///
/// Note that JSON arrays can contain values of different types, so for example
/// `[1,"str",true,null]` is valid JSON.
pub struct Array<'a, W: Write> {
    doc: &'a mut Document<W>,
    closed: bool,
}

impl<'a, W: Write> Array<'a, W> {
    pub(crate) fn open(doc: &'a mut Document<W>) -> Result<Self, JsonError> {
        doc.open_array()?;
        Ok(Array { doc, closed: false })
    }

    /// Opens a JSON object as the next array element
    pub fn obj(&mut self) -> Result<Object<'_, W>, JsonError> {
        Object::open(self.doc)
    }

    /// Opens a JSON array as the next array element
    pub fn ar(&mut self) -> Result<Array<'_, W>, JsonError> {
        Array::open(self.doc)
    }

    /// Writes `value` as the next array element
    pub fn val<V: JsonValue>(&mut self, value: V) -> Result<(), JsonError> {
        Node::new(self.doc).val(value)
    }

    /// Closes this array explicitly
    ///
    /// Equivalent to dropping the scope, except that an error from writing the
    /// closing bracket is returned here instead of being deferred to
    /// [`Document::finish`].
    pub fn end(mut self) -> Result<(), JsonError> {
        self.closed = true;
        self.doc.close_array()?;
        Ok(())
    }
}

impl<W: Write> Drop for Array<'_, W> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(error) = self.doc.close_array() {
                self.doc.note_deferred_error(error);
            }
        }
    }
}
