// src/detection.rs
//
// HSV color segmentation and contour-to-centroid reduction. The
// detector is behind a trait so the tracking pipeline can be driven by
// scripted detection lists in tests.

use opencv::{
    core::{self, Mat, Point, Scalar, Vector},
    imgproc,
};
use tracing::debug;

use crate::errors::QuadtrackResult;
use crate::types::{ColorBand, Detection, DetectionConfig};

/// Per-frame blob detection capability.
pub trait BallDetector {
    /// Detect candidate balls in a BGR frame. Detections come out in
    /// band order; the order of multiple blobs within one band is
    /// whatever the contour extraction yields and is not guaranteed.
    fn detect(&self, frame: &Mat) -> QuadtrackResult<Vec<Detection>>;
}

/// Color-range detector: one binary mask per configured band, contours
/// above the area threshold reduced to their bounding-box centers.
pub struct HsvBallDetector {
    bands: Vec<ColorBand>,
    min_area: f64,
}

impl HsvBallDetector {
    pub fn new(bands: Vec<ColorBand>, min_area: f64) -> Self {
        Self { bands, min_area }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.bands.clone(), config.min_contour_area)
    }
}

fn passes_area_filter(area: f64, min_area: f64) -> bool {
    // Strict: a contour sitting exactly on the threshold is noise.
    area > min_area
}

fn band_scalar(bound: [u8; 3]) -> Scalar {
    Scalar::new(bound[0] as f64, bound[1] as f64, bound[2] as f64, 0.0)
}

impl BallDetector for HsvBallDetector {
    fn detect(&self, frame: &Mat) -> QuadtrackResult<Vec<Detection>> {
        let mut hsv = Mat::default();
        imgproc::cvt_color(frame, &mut hsv, imgproc::COLOR_BGR2HSV, 0)?;

        let mut detections = Vec::new();

        for band in &self.bands {
            let mut mask = Mat::default();
            core::in_range(
                &hsv,
                &band_scalar(band.lower),
                &band_scalar(band.upper),
                &mut mask,
            )?;

            let mut contours: Vector<Vector<Point>> = Vector::new();
            imgproc::find_contours(
                &mask,
                &mut contours,
                imgproc::RETR_TREE,
                imgproc::CHAIN_APPROX_SIMPLE,
                Point::new(0, 0),
            )?;

            let mut kept = 0usize;
            for contour in contours.iter() {
                let area = imgproc::contour_area(&contour, false)?;
                if !passes_area_filter(area, self.min_area) {
                    continue;
                }
                let rect = imgproc::bounding_rect(&contour)?;
                detections.push(Detection {
                    color: band.name.clone(),
                    centroid: (rect.x + rect.width / 2, rect.y + rect.height / 2),
                });
                kept += 1;
            }

            if kept > 0 {
                debug!("band '{}': {} blob(s) above threshold", band.name, kept);
            }
        }

        Ok(detections)
    }
}
