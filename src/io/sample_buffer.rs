//! Sample windowing utilities
//!
//! Walks a sample slice in overlapping fixed-size frames. Only full frames are
//! produced; callers that need at least one frame pad short signals first.

/// Overlapping frame reader over a borrowed sample buffer
#[derive(Debug, Clone)]
pub struct SampleBuffer<'a> {
    /// Buffer data
    data: &'a [f32],
    /// Frame length in samples
    frame_size: usize,
    /// Advance between frames in samples
    hop_size: usize,
    /// Start of the next frame
    position: usize,
}

impl<'a> SampleBuffer<'a> {
    /// Create a frame reader; `frame_size` and `hop_size` must be non-zero
    pub fn new(data: &'a [f32], frame_size: usize, hop_size: usize) -> Self {
        Self {
            data,
            frame_size: frame_size.max(1),
            hop_size: hop_size.max(1),
            position: 0,
        }
    }

    /// Number of full frames the buffer yields from the start
    pub fn frame_count(&self) -> usize {
        if self.data.len() < self.frame_size {
            0
        } else {
            (self.data.len() - self.frame_size) / self.hop_size + 1
        }
    }
}

impl<'a> Iterator for SampleBuffer<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.position.checked_add(self.frame_size)?;
        if end > self.data.len() {
            return None;
        }

        let window = &self.data[self.position..end];
        self.position += self.hop_size;
        Some(window)
    }
}
