/// Bytes per pixel in a decoded frame buffer (R, G, B).
pub const CHANNELS: usize = 3;

/// One decoded frame of an animated image.
///
/// The pixel buffer is flat and row-major: pixel `(x, y)` starts at
/// `(y * width + x) * 3` and holds `[r, g, b]`. Frames are immutable once
/// built; the constructor checks the buffer length against the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    index: usize,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    /// Display duration in milliseconds, 0 when the source does not say.
    duration_ms: u32,
}

impl Frame {
    pub fn new(
        index: usize,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        duration_ms: u32,
    ) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(FrameError::BufferSize {
                index,
                got: pixels.len(),
                expected,
            });
        }
        Ok(Self {
            index,
            width,
            height,
            pixels,
            duration_ms,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Number of channel samples in the buffer (`width * height * 3`).
    pub fn sample_count(&self) -> u64 {
        self.pixels.len() as u64
    }
}

/// An ordered, non-empty run of frames sharing one width and height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifSequence {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
}

impl GifSequence {
    pub fn new(frames: Vec<Frame>) -> Result<Self, FrameError> {
        let (width, height) = frames.first().ok_or(FrameError::Empty)?.dimensions();
        if let Some(bad) = frames.iter().find(|f| f.dimensions() != (width, height)) {
            return Err(FrameError::DimensionMismatch {
                index: bad.index(),
                expected: (width, height),
                got: bad.dimensions(),
            });
        }
        Ok(Self {
            width,
            height,
            frames,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Sum of every frame's display duration.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms() as u64).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame {index} buffer has {got} bytes, expected {expected}")]
    BufferSize {
        index: usize,
        got: usize,
        expected: usize,
    },
    #[error("image contains no frames")]
    Empty,
    #[error("frame {index} is {got:?}, expected {expected:?} like the first frame")]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        got: (u32, u32),
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(index: usize, w: u32, h: u32, rgb: [u8; 3], duration_ms: u32) -> Frame {
        let pixels = rgb.repeat(w as usize * h as usize);
        Frame::new(index, w, h, pixels, duration_ms).unwrap()
    }

    #[test]
    fn frame_rejects_short_buffer() {
        let result = Frame::new(0, 2, 2, vec![0; 11], 0);
        assert!(matches!(
            result,
            Err(FrameError::BufferSize { got: 11, expected: 12, .. })
        ));
    }

    #[test]
    fn frame_sample_count() {
        let frame = solid(0, 4, 3, [1, 2, 3], 40);
        assert_eq!(frame.sample_count(), 36);
        assert_eq!(&frame.pixels()[..3], &[1, 2, 3]);
    }

    #[test]
    fn sequence_requires_frames() {
        assert!(matches!(GifSequence::new(vec![]), Err(FrameError::Empty)));
    }

    #[test]
    fn sequence_rejects_mixed_dimensions() {
        let frames = vec![solid(0, 2, 2, [0; 3], 0), solid(1, 3, 2, [0; 3], 0)];
        match GifSequence::new(frames) {
            Err(FrameError::DimensionMismatch { index, expected, got }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, (2, 2));
                assert_eq!(got, (3, 2));
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn sequence_totals() {
        let frames = vec![
            solid(0, 2, 2, [0; 3], 100),
            solid(1, 2, 2, [9; 3], 0),
            solid(2, 2, 2, [0; 3], 50),
        ];
        let seq = GifSequence::new(frames).unwrap();
        assert_eq!(seq.frame_count(), 3);
        assert_eq!((seq.width(), seq.height()), (2, 2));
        assert_eq!(seq.total_duration_ms(), 150);
    }
}
