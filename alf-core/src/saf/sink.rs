/// Something the SAF writer can emit bytes and big-endian integers into.
pub(super) trait Sink {
    fn write_u8(&mut self, value: u8);
    fn write_i32(&mut self, value: i32);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_u8(b);
        }
    }
}

/// Writes into a preallocated slice. The slice must be large enough for everything that is
/// written, which [`super::compute_size`] guarantees.
pub(super) struct SliceSink<'a> {
    buf: &'a mut [u8],
    position: usize,
}

impl<'a> SliceSink<'a> {
    pub(super) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, position: 0 }
    }

    pub(super) fn written(&self) -> usize {
        self.position
    }
}

impl Sink for SliceSink<'_> {
    fn write_u8(&mut self, value: u8) {
        self.buf[self.position] = value;
        self.position += 1;
    }

    fn write_i32(&mut self, value: i32) {
        let end = self.position + super::WORD_BYTES;
        self.buf[self.position..end].copy_from_slice(&value.to_be_bytes());
        self.position = end;
    }
}

/// Collects everything into a growable vector, used to cross-check the size computation.
#[cfg(test)]
#[derive(Default)]
pub(super) struct VecSink(pub(super) Vec<u8>);

#[cfg(test)]
impl Sink for VecSink {
    fn write_u8(&mut self, value: u8) {
        self.0.push(value)
    }

    fn write_i32(&mut self, value: i32) {
        self.0.extend_from_slice(&value.to_be_bytes())
    }
}
