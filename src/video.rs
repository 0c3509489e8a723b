// src/video.rs

use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::{QuadtrackError, QuadtrackResult};

pub struct VideoReader {
    cap: VideoCapture,
    pub fps: f64,
    pub width: i32,
    pub height: i32,
}

impl VideoReader {
    pub fn open(path: &Path) -> QuadtrackResult<Self> {
        if !path.is_file() {
            return Err(QuadtrackError::NotFound {
                path: path.to_path_buf(),
            });
        }

        info!("Opening video: {}", path.display());

        let cap = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
        if !cap.is_opened()? {
            return Err(QuadtrackError::open(
                "video decoder",
                path,
                "container could not be decoded",
            ));
        }

        let fps = cap.get(videoio::CAP_PROP_FPS)?;
        let total_frames = cap.get(videoio::CAP_PROP_FRAME_COUNT)? as i32;
        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;

        info!(
            "Video properties: {}x{} @ {:.1} FPS, {} frames",
            width, height, fps, total_frames
        );

        Ok(Self {
            cap,
            fps,
            width,
            height,
        })
    }

    /// Next BGR frame, or `None` once the stream is exhausted. A frame
    /// that fails to decode ends the stream cleanly rather than erroring.
    pub fn read_frame(&mut self) -> QuadtrackResult<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.cap.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    pub fn release(&mut self) -> QuadtrackResult<()> {
        self.cap.release()?;
        Ok(())
    }
}

/// Open the annotated-output encoder with the same geometry and rate as
/// the input. Fatal if the encoder cannot initialize.
pub fn open_writer(
    path: &Path,
    fps: f64,
    width: i32,
    height: i32,
) -> QuadtrackResult<VideoWriter> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    info!("Output video: {}", path.display());

    let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
    let writer = VideoWriter::new(
        &path.to_string_lossy(),
        fourcc,
        fps,
        Size::new(width, height),
        true,
    )?;

    if !writer.is_opened()? {
        return Err(QuadtrackError::open(
            "video encoder",
            path,
            "encoder could not be initialized",
        ));
    }

    Ok(writer)
}
