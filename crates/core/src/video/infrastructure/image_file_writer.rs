use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::display_surface::DisplaySurface;

/// Where presented frames end up on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// Every frame overwrites the same file (single-image runs).
    File(PathBuf),
    /// One `frame_NNNNNN.png` per frame index.
    Directory(PathBuf),
}

/// Presents frames by writing them as image files with the `image` crate.
pub struct ImageFileWriter {
    target: OutputTarget,
    written: usize,
}

impl ImageFileWriter {
    pub fn new(target: OutputTarget) -> Self {
        Self { target, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path_for(&self, frame: &Frame) -> PathBuf {
        match &self.target {
            OutputTarget::File(path) => path.clone(),
            OutputTarget::Directory(dir) => dir.join(format!("frame_{:06}.png", frame.index())),
        }
    }

    pub fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(path)?;
        Ok(())
    }
}

impl DisplaySurface for ImageFileWriter {
    fn present(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.path_for(frame);
        self.write(&path, frame)?;
        self.written += 1;
        log::debug!("Wrote frame {} to {}", frame.index(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 3, index)
    }

    #[test]
    fn test_present_to_file_roundtrips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut writer = ImageFileWriter::new(OutputTarget::File(path.clone()));
        writer.present(&make_frame(20, 10, [50, 100, 200], 0)).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
        assert_eq!(writer.written(), 1);
    }

    #[test]
    fn test_present_to_directory_names_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("frames");
        let mut writer = ImageFileWriter::new(OutputTarget::Directory(out_dir.clone()));
        writer.present(&make_frame(4, 4, [0, 0, 0], 0)).unwrap();
        writer.present(&make_frame(4, 4, [0, 0, 0], 12)).unwrap();

        assert!(out_dir.join("frame_000000.png").exists());
        assert!(out_dir.join("frame_000012.png").exists());
        assert_eq!(writer.written(), 2);
    }

    #[test]
    fn test_write_to_missing_root_fails() {
        let writer = ImageFileWriter::new(OutputTarget::File(PathBuf::from("unused.png")));
        let frame = make_frame(2, 2, [0, 0, 0], 0);
        assert!(writer
            .write(Path::new("/proc/nonexistent/dir/out.png"), &frame)
            .is_err());
    }
}
