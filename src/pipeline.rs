// src/pipeline.rs
//
// Single-threaded frame loop: read -> detect -> classify -> track ->
// annotate -> write, one frame fully processed before the next is read.
// Ball state and the event log live here for the duration of a run and
// nowhere else.

use std::path::Path;
use std::time::Instant;

use opencv::prelude::*;
use tracing::{info, warn};

use crate::annotate;
use crate::detection::BallDetector;
use crate::errors::QuadtrackResult;
use crate::event_log;
use crate::quadrants::QuadrantGrid;
use crate::tracker::{EventTracker, Transition};
use crate::types::Detection;
use crate::video::{self, VideoReader};

#[derive(Debug, Clone)]
pub struct ProcessingStats {
    pub frames: u64,
    pub events: usize,
    pub duration_secs: f64,
    pub avg_fps: f64,
}

/// Classify one frame's detections and feed them to the tracker, in
/// detection order. Returns the detections that caused a transition,
/// paired with it, for the annotator.
///
/// A centroid that lands outside every quadrant is skipped: no event,
/// no state change, one warning. With a grid derived from the frame's
/// own dimensions this should not happen for in-frame centroids.
pub fn apply_detections(
    grid: &QuadrantGrid,
    tracker: &mut EventTracker,
    detections: Vec<Detection>,
    timestamp: f64,
) -> Vec<(Detection, Transition)> {
    let mut transitions = Vec::new();

    for detection in detections {
        let Some(quadrant) = grid.classify(detection.centroid) else {
            warn!(
                "skipping {} detection at {:?}: outside every quadrant",
                detection.color, detection.centroid
            );
            continue;
        };

        if let Some(transition) = tracker.observe(&detection.color, quadrant, timestamp) {
            transitions.push((detection, transition));
        }
    }

    transitions
}

/// Run the whole pipeline over one video.
pub fn run<D: BallDetector>(
    detector: &D,
    input: &Path,
    output_video: &Path,
    output_log: &Path,
) -> QuadtrackResult<ProcessingStats> {
    let started = Instant::now();

    let mut reader = VideoReader::open(input)?;
    let mut writer = video::open_writer(output_video, reader.fps, reader.width, reader.height)?;
    let log = event_log::EventLogWriter::create(output_log)?;

    let mut tracker = EventTracker::new();
    let mut grid: Option<QuadrantGrid> = None;
    let mut frame_index = 0u64;

    while let Some(mut frame) = reader.read_frame()? {
        // The grid is fixed from the first frame's dimensions.
        let grid = grid.get_or_insert_with(|| QuadrantGrid::define(reader.width, reader.height));

        let timestamp = frame_index as f64 / reader.fps;
        let detections = detector.detect(&frame)?;
        let transitions = apply_detections(grid, &mut tracker, detections, timestamp);

        for (detection, transition) in &transitions {
            annotate::draw_caption(&mut frame, detection, *transition)?;
        }
        annotate::draw_grid(&mut frame, grid)?;

        writer.write(&frame)?;
        frame_index += 1;
    }

    reader.release()?;
    writer.release()?;

    log.write_all(tracker.events())?;

    let duration_secs = started.elapsed().as_secs_f64();
    let stats = ProcessingStats {
        frames: frame_index,
        events: tracker.events().len(),
        duration_secs,
        avg_fps: frame_index as f64 / duration_secs.max(1e-9),
    };

    info!(
        "Processed {} frame(s), {} event(s) in {:.1}s ({:.1} FPS)",
        stats.frames, stats.events, stats.duration_secs, stats.avg_fps
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn det(color: &str, centroid: (i32, i32)) -> Detection {
        Detection {
            color: color.to_string(),
            centroid,
        }
    }

    #[test]
    fn test_two_frame_move_scenario() {
        // The synthetic reference clip: a green blob at (20,20) in frame
        // 0, then at (80,80) in frame 1, on a 100x100 frame at 25 FPS.
        let grid = QuadrantGrid::define(100, 100);
        let mut tracker = EventTracker::new();
        let fps = 25.0;

        let t0 = apply_detections(&grid, &mut tracker, vec![det("green", (20, 20))], 0.0 / fps);
        assert_eq!(t0.len(), 1);
        assert_eq!(t0[0].1, Transition::Entered(3));

        let t1 = apply_detections(&grid, &mut tracker, vec![det("green", (80, 80))], 1.0 / fps);
        assert_eq!(t1.len(), 1);
        assert_eq!(t1[0].1, Transition::Moved { from: 3, to: 1 });

        let events = tracker.events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            (events[0].kind, events[0].quadrant, events[0].timestamp),
            (EventKind::Entry, 3, 0.0)
        );
        assert_eq!(
            (events[1].kind, events[1].quadrant, events[1].timestamp),
            (EventKind::Entry, 1, 0.04)
        );
        assert_eq!(
            (events[2].kind, events[2].quadrant, events[2].timestamp),
            (EventKind::Exit, 3, 0.04)
        );

        let lines: Vec<String> = events.iter().map(event_log::format_line).collect();
        assert_eq!(
            lines,
            vec![
                "0.00, 3, green, Entry",
                "0.04, 1, green, Entry",
                "0.04, 3, green, Exit",
            ]
        );
    }

    #[test]
    fn test_same_color_blobs_last_processed_wins() {
        let grid = QuadrantGrid::define(100, 100);
        let mut tracker = EventTracker::new();

        // Two green blobs in one frame, in quadrants 3 then 1: the
        // tracker keeps one quadrant per color, so the later detection
        // decides where green resides.
        let transitions = apply_detections(
            &grid,
            &mut tracker,
            vec![det("green", (20, 20)), det("green", (80, 80))],
            0.0,
        );

        assert_eq!(transitions.len(), 2);
        assert_eq!(tracker.position_of("green"), Some(1));
    }

    #[test]
    fn test_out_of_grid_centroid_is_skipped() {
        let grid = QuadrantGrid::define(100, 100);
        let mut tracker = EventTracker::new();

        let transitions =
            apply_detections(&grid, &mut tracker, vec![det("green", (500, 500))], 0.0);

        assert!(transitions.is_empty());
        assert!(tracker.events().is_empty());
        assert_eq!(tracker.position_of("green"), None);
    }

    #[test]
    fn test_stationary_blob_only_transitions_once() {
        let grid = QuadrantGrid::define(100, 100);
        let mut tracker = EventTracker::new();
        let fps = 30.0;

        for frame in 0..10u32 {
            let transitions = apply_detections(
                &grid,
                &mut tracker,
                vec![det("white", (75, 25))],
                frame as f64 / fps,
            );
            assert_eq!(transitions.len(), usize::from(frame == 0));
        }

        assert_eq!(tracker.events().len(), 1);
        assert_eq!(tracker.position_of("white"), Some(4));
    }
}
