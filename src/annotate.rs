// src/annotate.rs
//
// Frame overlay: quadrant grid, quadrant labels, and the transient
// event captions for the frame in which a transition fired. Geometry
// and colors are fixed; downstream consumers compare annotated output
// bit-for-bit, so keep them stable.

use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc,
};

use crate::errors::QuadtrackResult;
use crate::quadrants::QuadrantGrid;
use crate::tracker::Transition;
use crate::types::Detection;

const GRID_THICKNESS: i32 = 2;
const LABEL_SCALE: f64 = 1.0;
const CAPTION_SCALE: f64 = 0.6;
const TEXT_THICKNESS: i32 = 2;

fn red() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

fn white() -> Scalar {
    Scalar::new(255.0, 255.0, 255.0, 0.0)
}

/// Caption for the transition a detection caused. A move is captioned
/// as an Exit stamped with the quadrant just entered; the wording is
/// kept verbatim for compatibility with existing output.
pub fn caption_text(color: &str, transition: Transition) -> String {
    match transition {
        Transition::Entered(quadrant) => format!("{color} Entry at Q{quadrant}"),
        Transition::Moved { to, .. } => format!("{color} Exit at Q{to}"),
    }
}

/// Draw the caption just above the detection's centroid.
pub fn draw_caption(
    frame: &mut Mat,
    detection: &Detection,
    transition: Transition,
) -> QuadtrackResult<()> {
    let (cx, cy) = detection.centroid;
    imgproc::put_text(
        frame,
        &caption_text(&detection.color, transition),
        Point::new(cx, cy - 10),
        imgproc::FONT_HERSHEY_SIMPLEX,
        CAPTION_SCALE,
        white(),
        TEXT_THICKNESS,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// Draw the four quadrant rectangles and their `Q{n}` labels.
pub fn draw_grid(frame: &mut Mat, grid: &QuadrantGrid) -> QuadtrackResult<()> {
    for (id, region) in grid.iter() {
        imgproc::rectangle(
            frame,
            Rect::new(
                region.x1,
                region.y1,
                region.x2 - region.x1,
                region.y2 - region.y1,
            ),
            red(),
            GRID_THICKNESS,
            imgproc::LINE_8,
            0,
        )?;
        imgproc::put_text(
            frame,
            &format!("Q{id}"),
            Point::new(region.x1 + 10, region.y1 + 30),
            imgproc::FONT_HERSHEY_SIMPLEX,
            LABEL_SCALE,
            white(),
            TEXT_THICKNESS,
            imgproc::LINE_8,
            false,
        )?;
    }
    Ok(())
}
