use ndarray::{ArrayView3, ArrayViewMut3};
use thiserror::Error;

use crate::shared::face_region::PixelRect;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame {index}: pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    LengthMismatch {
        index: usize,
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
        channels: u8,
    },
    #[error("frame {index} has an empty extent ({width}x{height})")]
    EmptyExtent { index: usize, width: u32, height: u32 },
}

/// A single video/image frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the smoothing
/// pipeline treats pixel data as opaque channel values.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            expected_len(width, height, channels),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Builds a frame from an untrusted pixel source, rejecting buffers that
    /// do not match the declared extent.
    pub fn try_new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
    ) -> Result<Self, FrameError> {
        let frame = Self {
            data,
            width,
            height,
            channels,
            index,
        };
        frame.validate()?;
        Ok(frame)
    }

    pub fn filled(width: u32, height: u32, value: u8, index: usize) -> Self {
        Self::new(
            vec![value; expected_len(width, height, 3)],
            width,
            height,
            3,
            index,
        )
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 || self.channels == 0 {
            return Err(FrameError::EmptyExtent {
                index: self.index,
                width: self.width,
                height: self.height,
            });
        }
        let expected = expected_len(self.width, self.height, self.channels);
        if self.data.len() != expected {
            return Err(FrameError::LengthMismatch {
                index: self.index,
                actual: self.data.len(),
                expected,
                width: self.width,
                height: self.height,
                channels: self.channels,
            });
        }
        Ok(())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        &self.data[offset..offset + c]
    }

    /// Copies a rectangle that lies fully inside the frame into a new frame.
    ///
    /// The crop keeps this frame's index so filters can correlate it.
    pub fn crop(&self, rect: PixelRect) -> Frame {
        debug_assert!(rect.x >= 0 && rect.y >= 0);
        debug_assert!(rect.right() <= self.width as i32 && rect.bottom() <= self.height as i32);

        let c = self.channels as usize;
        let fw = self.width as usize;
        let (rx, ry) = (rect.x as usize, rect.y as usize);
        let (rw, rh) = (rect.width as usize, rect.height as usize);

        let mut out = Vec::with_capacity(rw * rh * c);
        for row in ry..ry + rh {
            let start = (row * fw + rx) * c;
            out.extend_from_slice(&self.data[start..start + rw * c]);
        }
        Frame::new(out, rect.width as u32, rect.height as u32, self.channels, self.index)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn expected_len(width: u32, height: u32, channels: u8) -> usize {
    (width as usize) * (height as usize) * (channels as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.extent(), (2, 2));
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_try_new_rejects_short_buffer() {
        let err = Frame::try_new(vec![0u8; 10], 2, 2, 3, 7).unwrap_err();
        assert_eq!(
            err,
            FrameError::LengthMismatch {
                index: 7,
                actual: 10,
                expected: 12,
                width: 2,
                height: 2,
                channels: 3,
            }
        );
    }

    #[test]
    fn test_try_new_rejects_empty_extent() {
        let err = Frame::try_new(Vec::new(), 0, 4, 3, 0).unwrap_err();
        assert!(matches!(err, FrameError::EmptyExtent { width: 0, .. }));
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::filled(2, 2, 100, 0);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    fn test_pixel_reads_row_major() {
        let mut frame = Frame::filled(3, 2, 0, 0);
        frame.data_mut()[(3 + 2) * 3 + 1] = 77; // row=1, col=2, G
        assert_eq!(frame.pixel(2, 1), &[0, 77, 0]);
    }

    #[test]
    fn test_crop_copies_rows() {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|v| v as u8).collect();
        let frame = Frame::new(data, 4, 3, 3, 9);
        let crop = frame.crop(PixelRect::new(1, 1, 2, 2));
        assert_eq!(crop.extent(), (2, 2));
        assert_eq!(crop.index(), 9);
        assert_eq!(crop.pixel(0, 0), frame.pixel(1, 1));
        assert_eq!(crop.pixel(1, 1), frame.pixel(2, 2));
    }

    #[test]
    fn test_as_ndarray_shape_and_access() {
        let mut data = vec![0u8; 24]; // 2x4x3
        data[(4 + 1) * 3 + 2] = 128; // row=1, col=1, B
        let frame = Frame::new(data, 4, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]);
        assert_eq!(arr[[1, 1, 2]], 128);
    }

    #[test]
    fn test_as_ndarray_mut_modification() {
        let mut frame = Frame::filled(2, 2, 0, 0);
        {
            let mut arr = frame.as_ndarray_mut();
            arr[[0, 1, 2]] = 128;
        }
        assert_eq!(frame.pixel(1, 0)[2], 128);
    }
}
