use std::{cell::RefCell, io::Write, rc::Rc};

/// An in-memory output sink whose clones share one buffer.
///
/// Hand one clone to [`Interpreter::with_output`] and keep another to read
/// what the program printed.
///
/// [`Interpreter::with_output`]: crate::interpreter::evaluator::Interpreter::with_output
///
/// # Example
/// ```
/// use std::io::Write;
///
/// use pyrite::interpreter::output::OutputBuffer;
///
/// let buffer = OutputBuffer::default();
/// let mut writer = buffer.clone();
/// writer.write_all(b"hello").unwrap();
///
/// assert_eq!(buffer.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Returns the contents and empties the buffer.
    #[must_use]
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
