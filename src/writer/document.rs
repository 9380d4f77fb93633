//! The writer state machine behind a JSON document

use std::io::Write;

use super::{Array, JsonError, JsonFloat, JsonInt, JsonValue, Node, Object};
use crate::escape;

type IoError = std::io::Error;

/// Settings to customize the JSON writer behavior
///
/// These settings only have an effect on how the JSON output will look like
/// without affecting its data in any way. All compliant JSON readers should
/// consider the data identical.
///
/// The settings are used by [`Document::new_custom`]. To avoid repeating the
/// default values for unchanged settings `..Default::default()` can be used.
#[derive(Clone, Debug)]
pub struct WriterSettings {
    /// Whether to pretty print the JSON output
    ///
    /// When enabled every value and container bracket starts on its own line,
    /// indented with 2 spaces per nesting level, and closing brackets line up
    /// with the line that opened them. Otherwise the JSON output is compact and
    /// has no whitespace. Pretty printed JSON output might for example look
    /// like this:
    /// ```json
    /// {
    ///   "a":[
    ///     1,
    ///     2
    ///   ]
    /// }
    /// ```
    /// Whereas compact JSON output would look like this:
    /// ```json
    /// {"a":[1,2]}
    /// ```
    ///
    /// This setting does not have any effect on the validity of the JSON output.
    pub pretty_print: bool,
}

impl Default for WriterSettings {
    /// Creates the default JSON writer settings
    ///
    /// - pretty print: disabled (= compact JSON will be written)
    fn default() -> Self {
        WriterSettings {
            pretty_print: false,
        }
    }
}

pub(crate) const WRITER_BUF_SIZE: usize = 1024;

/// A streaming JSON document being written to a [`Write`]
///
/// The document owns the output sink and the complete writer state: the current
/// nesting depth, the pending member key, and whether the current container
/// already holds a value. All structural punctuation (`{`, `}`, `[`, `]`, `,`,
/// `:` and pretty-print whitespace) is emitted here and nowhere else.
///
/// Data is buffered internally, so it is normally not necessary to wrap the
/// provided sink in a [`std::io::BufWriter`].
///
/// Values and containers appear in the output in exactly the order in which the
/// corresponding operations are invoked; nothing is reordered or held back
/// beyond the byte buffer.
///
/// Once the document is complete, [`finish`](Self::finish) has to be called to
/// verify that all containers have been closed and to flush the internal buffer
/// to the underlying sink. Dropping the document will not flush the buffer,
/// because that would silently discard errors.
///
/// # Examples
/// ```
/// # use jotson::writer::*;
/// let mut document = Document::new(Vec::<u8>::new());
///
/// {
///     let mut obj = document.obj()?;
///     obj.val("hello", "world")?;
/// }
///
/// let bytes = document.finish()?;
/// assert_eq!(r#"{"hello":"world"}"#, String::from_utf8(bytes)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Document<W: Write> {
    sink: W,
    buf: [u8; WRITER_BUF_SIZE],
    /// Index (starting at 0) within [`buf`](Self::buf) where to write next,
    /// respectively how many bytes have already been written to the buffer
    buf_write_pos: usize,
    /// Key staged by `push_key`, consumed by the next value or container write
    ///
    /// Stored as an owned string so the document type carries no lifetime
    /// parameter; the allocation is reused across keys.
    pending_key: String,
    has_pending_key: bool,
    /// Whether the current container already holds a value; decides whether a
    /// comma is needed before the next one
    has_value: bool,
    /// Current nesting depth; also the indentation level when pretty printing
    depth: u32,
    /// First error raised by a container close that ran during a scope drop,
    /// where it could not be returned to the caller; surfaced by `finish`
    deferred_error: Option<IoError>,

    settings: WriterSettings,
}

// Implementation with public constructor methods
impl<W: Write> Document<W> {
    /// Creates a document with [default settings](WriterSettings::default)
    pub fn new(sink: W) -> Self {
        Document::new_custom(sink, WriterSettings::default())
    }

    /// Creates a document with custom settings
    ///
    /// The settings can be used to customize how the JSON output will look like.
    pub fn new_custom(sink: W, settings: WriterSettings) -> Self {
        Self {
            sink,
            buf: [0_u8; WRITER_BUF_SIZE],
            buf_write_pos: 0,
            pending_key: String::new(),
            has_pending_key: false,
            has_value: false,
            depth: 0,
            deferred_error: None,
            settings,
        }
    }
}

// Implementation with low level byte writing methods
impl<W: Write> Document<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        let mut pos = 0;
        while pos < bytes.len() {
            let copied_count = (self.buf.len() - self.buf_write_pos).min(bytes.len() - pos);
            self.buf[self.buf_write_pos..(self.buf_write_pos + copied_count)]
                .copy_from_slice(&bytes[pos..(pos + copied_count)]);
            self.buf_write_pos += copied_count;
            pos += copied_count;

            if self.buf_write_pos >= self.buf.len() {
                // write_all retries on `ErrorKind::Interrupted`, as desired
                self.sink.write_all(&self.buf)?;
                self.buf_write_pos = 0;
            }
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        // write_all retries on `ErrorKind::Interrupted`, as desired
        self.sink.write_all(&self.buf[0..self.buf_write_pos])?;
        self.buf_write_pos = 0;
        self.sink.flush()
    }
}

// Implementation with structural emission methods
impl<W: Write> Document<W> {
    /// Writes a line break followed by the indentation of the current depth
    ///
    /// Does nothing in compact mode, and also not before the very first token
    /// of the document.
    fn new_line(&mut self) -> Result<(), IoError> {
        if !self.settings.pretty_print {
            return Ok(());
        }
        if self.depth == 0 && !self.has_value {
            // No line break before the initial token
            return Ok(());
        }

        self.write_bytes(b"\n")?;
        for _ in 0..self.depth {
            self.write_bytes(b"  ")?;
        }
        Ok(())
    }

    /// Preamble shared by every value and container-open write
    ///
    /// Emits the member separator if the current container already has a value,
    /// the pretty-print line break, and the pending key (if any) as `"key":`.
    /// Afterwards the current container is marked as having a value.
    fn before_value(&mut self) -> Result<(), IoError> {
        if self.has_value {
            self.write_bytes(b",")?;
        }

        self.new_line()?;

        if self.has_pending_key {
            self.has_pending_key = false;
            // Take the key out to side-step borrowing `self` twice; the
            // allocation is handed back afterwards
            let key = std::mem::take(&mut self.pending_key);
            self.write_quoted_escaped(&key)?;
            self.write_bytes(b":")?;
            self.pending_key = key;
        }

        self.has_value = true;
        Ok(())
    }

    fn write_quoted_escaped(&mut self, value: &str) -> Result<(), IoError> {
        self.write_bytes(b"\"")?;
        escape::for_each_escaped_piece(value, |piece| self.write_bytes(piece))?;
        self.write_bytes(b"\"")
    }

    fn open(&mut self, bracket: &[u8]) -> Result<(), IoError> {
        self.before_value()?;
        self.write_bytes(bracket)?;
        self.has_value = false;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, bracket: &[u8]) -> Result<(), IoError> {
        debug_assert!(self.depth > 0, "container close without matching open");
        self.depth -= 1;
        if self.has_value {
            self.new_line()?;
        }
        self.write_bytes(bracket)?;
        self.has_value = true;
        Ok(())
    }

    pub(crate) fn open_object(&mut self) -> Result<(), IoError> {
        self.open(b"{")
    }

    pub(crate) fn close_object(&mut self) -> Result<(), IoError> {
        self.close(b"}")
    }

    pub(crate) fn open_array(&mut self) -> Result<(), IoError> {
        self.open(b"[")
    }

    pub(crate) fn close_array(&mut self) -> Result<(), IoError> {
        self.close(b"]")
    }

    /// Stages `key` to be emitted in front of the next value or container
    pub(crate) fn push_key(&mut self, key: &str) -> Result<(), JsonError> {
        if self.has_pending_key {
            return Err(JsonError::Protocol(format!(
                "key {key:?} pushed while key {:?} is already pending; every key must be followed by a value",
                self.pending_key
            )));
        }
        self.pending_key.clear();
        self.pending_key.push_str(key);
        self.has_pending_key = true;
        Ok(())
    }

    /// Discards a pending key without emitting anything
    ///
    /// Models a member whose optional value is absent: the key simply does not
    /// appear in the output. Must not touch the has-value flag.
    pub(crate) fn write_absent(&mut self) {
        self.has_pending_key = false;
    }

    pub(crate) fn note_deferred_error(&mut self, error: IoError) {
        if self.deferred_error.is_none() {
            self.deferred_error = Some(error);
        }
    }
}

// Implementation with value writing methods
impl<W: Write> Document<W> {
    pub(crate) fn bool_value(&mut self, value: bool) -> Result<(), JsonError> {
        self.before_value()?;
        self.write_bytes(if value { b"true" } else { b"false" })?;
        Ok(())
    }

    pub(crate) fn null_value(&mut self) -> Result<(), JsonError> {
        self.before_value()?;
        self.write_bytes(b"null")?;
        Ok(())
    }

    pub(crate) fn string_value(&mut self, value: &str) -> Result<(), JsonError> {
        self.before_value()?;
        self.write_quoted_escaped(value)?;
        Ok(())
    }

    pub(crate) fn int_value<N: JsonInt>(&mut self, value: N) -> Result<(), JsonError> {
        value.use_json_number(|number| {
            self.before_value()?;
            self.write_bytes(number.as_bytes())?;
            Ok(())
        })
    }

    pub(crate) fn float_value<N: JsonFloat>(&mut self, value: N) -> Result<(), JsonError> {
        value.use_json_number(|number| {
            self.before_value()?;
            self.write_bytes(number.as_bytes())?;
            Ok(())
        })
    }
}

// Implementation with the public root scope operations
impl<W: Write> Document<W> {
    /// Opens a JSON object as the next value
    ///
    /// The returned scope borrows this document; the object's closing bracket is
    /// written when the scope is dropped or [ended](Object::end).
    pub fn obj(&mut self) -> Result<Object<'_, W>, JsonError> {
        Object::open(self)
    }

    /// Opens a JSON array as the next value
    ///
    /// The returned scope borrows this document; the array's closing bracket is
    /// written when the scope is dropped or [ended](Array::end).
    pub fn ar(&mut self) -> Result<Array<'_, W>, JsonError> {
        Array::open(self)
    }

    /// Writes `value` as the next value
    ///
    /// ```
    /// # use jotson::writer::*;
    /// let mut document = Document::new(Vec::<u8>::new());
    /// document.val(5)?;
    /// assert_eq!("5", String::from_utf8(document.finish()?)?);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn val<V: JsonValue>(&mut self, value: V) -> Result<(), JsonError> {
        value.write_json(Node::new(self))
    }

    /// Verifies that the JSON document is complete, flushes the buffer and
    /// returns the sink
    ///
    /// This method **must** be called explicitly; dropping the document will not
    /// flush the buffer.
    ///
    /// # Errors
    /// Returns a [`JsonError::Protocol`] error when containers are still open or
    /// a key is still pending, and surfaces any error that occurred while a
    /// scope was closed during drop. Container balance is only checked here, on
    /// ordinary completion; a document abandoned during unwinding is not
    /// checked, since doing so would mask the original failure.
    pub fn finish(mut self) -> Result<W, JsonError> {
        if let Some(error) = self.deferred_error.take() {
            return Err(error.into());
        }
        if self.has_pending_key {
            return Err(JsonError::Protocol(format!(
                "cannot finish document while key {:?} is pending",
                self.pending_key
            )));
        }
        if self.depth != 0 {
            return Err(JsonError::Protocol(format!(
                "cannot finish document while {} container(s) are still open",
                self.depth
            )));
        }
        self.flush()?;
        Ok(self.sink)
    }
}
