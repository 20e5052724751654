use crate::error::{DecodeError, Error};

use super::{private, Read};

/// A reader over an in-memory byte slice.
#[derive(Debug)]
pub struct SliceReader<'s> {
    slice: &'s [u8],
    consumed: usize,
}

impl<'s> SliceReader<'s> {
    /// Creates a new slice reader.
    pub fn new(slice: &'s [u8]) -> Self {
        Self { slice, consumed: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'s [u8], Error> {
        if self.slice.len() < n {
            return Err(DecodeError::UnexpectedEof.into());
        }
        let (taken, remaining) = self.slice.split_at(n);
        self.slice = remaining;
        self.consumed += n;
        Ok(taken)
    }
}

impl<'s> private::Sealed for SliceReader<'s> {}

impl<'s> Read for SliceReader<'s> {
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        Ok(self.slice.first().copied())
    }

    fn next(&mut self) -> Result<Option<u8>, Error> {
        if self.slice.is_empty() {
            return Ok(None);
        }
        let byte = self.take(1)?[0];
        Ok(Some(byte))
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let slice = self.take(buf.len())?;
        buf.copy_from_slice(slice);
        Ok(())
    }

    fn position(&self) -> usize {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::{Read, SliceReader};

    const SHORT_BUFFER: &[u8] = &[0, 1, 2];
    const LONG_BUFFER: &[u8] = &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20,
    ];

    #[test]
    fn peek_does_not_consume() {
        let mut reader = SliceReader::new(SHORT_BUFFER);

        let peek0 = reader.peek().unwrap().unwrap();
        let peek1 = reader.peek().unwrap().unwrap();

        assert_eq!(peek0, SHORT_BUFFER[0]);
        assert_eq!(peek1, SHORT_BUFFER[0]);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn next_consumes_in_order() {
        let mut reader = SliceReader::new(SHORT_BUFFER);

        for (i, expected) in SHORT_BUFFER.iter().enumerate() {
            let peek = reader.peek().unwrap().unwrap();
            let next = reader.next().unwrap().unwrap();

            assert_eq!(peek, *expected);
            assert_eq!(next, *expected);
            assert_eq!(reader.position(), i + 1);
        }

        assert_eq!(reader.peek().unwrap(), None);
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn read_const_bytes_advances_position() {
        let mut reader = SliceReader::new(LONG_BUFFER);

        const N: usize = 10;
        let first = reader.read_const_bytes::<N>().unwrap();
        assert_eq!(&first[..], &LONG_BUFFER[..N]);

        let second = reader.read_const_bytes::<N>().unwrap();
        assert_eq!(&second[..], &LONG_BUFFER[N..2 * N]);

        assert!(reader.read_const_bytes::<N>().is_err());
        assert_eq!(reader.position(), 2 * N);
    }

    #[test]
    fn incomplete_read_const_bytes_errs() {
        let mut reader = SliceReader::new(SHORT_BUFFER);

        assert!(reader.read_const_bytes::<10>().is_err());
        assert_eq!(reader.peek().unwrap(), Some(SHORT_BUFFER[0]));
    }

    #[test]
    fn read_bytes_then_eof() {
        let mut reader = SliceReader::new(LONG_BUFFER);

        let bytes = reader.read_bytes(LONG_BUFFER.len()).unwrap();
        assert_eq!(bytes, LONG_BUFFER);
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn require_next_errs_on_eof() {
        let mut reader = SliceReader::new(&[]);
        assert!(reader.require_next().is_err());
        assert!(reader.require_peek().is_err());
    }
}
