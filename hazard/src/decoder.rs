use gif_hazard_common::frame::{Frame, FrameError, GifSequence};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Frames};
use std::io::{BufRead, Cursor, Seek};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("not a decodable animated image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Streaming frame decoder.
///
/// Yields frames one at a time, expanded from the GIF palette to flat RGB,
/// so a consumer only has to keep the frames it is comparing. Every frame
/// is checked against the first frame's dimensions; after the first error
/// the iterator is fused and yields nothing more.
pub struct FrameDecoder<'a> {
    frames: Frames<'a>,
    next_index: usize,
    dimensions: Option<(u32, u32)>,
    failed: bool,
}

impl<'a> FrameDecoder<'a> {
    pub fn new<R: BufRead + Seek + 'a>(reader: R) -> Result<Self, DecodeError> {
        let decoder = GifDecoder::new(reader)?;
        Ok(Self {
            frames: decoder.into_frames(),
            next_index: 0,
            dimensions: None,
            failed: false,
        })
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        Self::new(Cursor::new(bytes))
    }

    fn convert(&mut self, frame: image::Frame) -> Result<Frame, DecodeError> {
        let index = self.next_index;
        let duration_ms = delay_ms(frame.delay());
        let rgba = frame.into_buffer();
        let (width, height) = rgba.dimensions();

        let expected = *self.dimensions.get_or_insert((width, height));
        if expected != (width, height) {
            return Err(FrameError::DimensionMismatch {
                index,
                expected,
                got: (width, height),
            }
            .into());
        }

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for px in rgba.pixels() {
            pixels.extend_from_slice(&px.0[..3]);
        }

        debug!(index, width, height, duration_ms, "decoded frame");
        Ok(Frame::new(index, width, height, pixels, duration_ms)?)
    }
}

impl Iterator for FrameDecoder<'_> {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = match self.frames.next()? {
            Ok(frame) => self.convert(frame),
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(_) => self.next_index += 1,
            Err(_) => self.failed = true,
        }
        Some(result)
    }
}

/// Decode a whole image into a [`GifSequence`]. Any bad frame fails the call.
pub fn decode(bytes: &[u8]) -> Result<GifSequence, DecodeError> {
    let frames = FrameDecoder::from_bytes(bytes)?.collect::<Result<Vec<_>, _>>()?;
    Ok(GifSequence::new(frames)?)
}

fn delay_ms(delay: image::Delay) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 {
        0
    } else {
        numer / denom
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};

    /// Encode solid-colour frames as an animated GIF.
    pub fn encode_gif(width: u32, height: u32, frames: &[([u8; 3], u32)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut buf);
            let frames = frames.iter().map(|&(rgb, duration_ms)| {
                let image =
                    RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]));
                Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(duration_ms, 1))
            });
            encoder.encode_frames(frames).unwrap();
        }
        buf
    }
}
