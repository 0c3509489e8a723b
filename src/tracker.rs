// src/tracker.rs
//
// Per-color quadrant residency state machine. The only state carried
// across frames is the color -> last-known-quadrant map; everything
// else is derived per frame.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::types::{EventKind, QuadrantEvent};

/// What a single observation did to the tracked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First sighting of this color.
    Entered(u32),
    /// The color changed quadrant since its last sighting.
    Moved { from: u32, to: u32 },
}

/// Tracks the last known quadrant per color and accumulates the event
/// log. One entry per distinct color ever observed; a color can occupy
/// at most one quadrant at a time, so when a frame carries several
/// blobs of the same color the last one processed wins.
pub struct EventTracker {
    positions: HashMap<String, u32>,
    log: Vec<QuadrantEvent>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            log: Vec::new(),
        }
    }

    /// Feed one classified detection. Returns the transition it caused,
    /// if any; the corresponding events are appended to the log.
    ///
    /// On a quadrant change the Entry for the new quadrant is logged
    /// before the Exit for the old one. Downstream consumers of the log
    /// depend on that ordering, so it is load-bearing.
    pub fn observe(&mut self, color: &str, quadrant: u32, timestamp: f64) -> Option<Transition> {
        match self.positions.get(color).copied() {
            None => {
                self.positions.insert(color.to_string(), quadrant);
                self.log.push(QuadrantEvent {
                    timestamp,
                    quadrant,
                    color: color.to_string(),
                    kind: EventKind::Entry,
                });
                info!("{} entered Q{} at {:.2}s", color, quadrant, timestamp);
                Some(Transition::Entered(quadrant))
            }
            Some(previous) if previous != quadrant => {
                self.log.push(QuadrantEvent {
                    timestamp,
                    quadrant,
                    color: color.to_string(),
                    kind: EventKind::Entry,
                });
                self.log.push(QuadrantEvent {
                    timestamp,
                    quadrant: previous,
                    color: color.to_string(),
                    kind: EventKind::Exit,
                });
                self.positions.insert(color.to_string(), quadrant);
                info!(
                    "{} moved Q{} -> Q{} at {:.2}s",
                    color, previous, quadrant, timestamp
                );
                Some(Transition::Moved {
                    from: previous,
                    to: quadrant,
                })
            }
            Some(_) => {
                debug!("{} still in Q{}", color, quadrant);
                None
            }
        }
    }

    pub fn position_of(&self, color: &str) -> Option<u32> {
        self.positions.get(color).copied()
    }

    pub fn events(&self) -> &[QuadrantEvent] {
        &self.log
    }
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_emits_single_entry() {
        let mut tracker = EventTracker::new();

        let transition = tracker.observe("green", 3, 0.0);
        assert_eq!(transition, Some(Transition::Entered(3)));

        let events = tracker.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Entry);
        assert_eq!(events[0].quadrant, 3);
        assert_eq!(events[0].color, "green");
        assert_eq!(events[0].timestamp, 0.0);
    }

    #[test]
    fn test_stationary_color_never_exits() {
        let mut tracker = EventTracker::new();
        let fps = 30.0;

        // Seen in Q2 for 50 consecutive frames, then the stream ends.
        for frame in 0..50u32 {
            tracker.observe("orange", 2, frame as f64 / fps);
        }

        let events = tracker.events();
        assert_eq!(events.len(), 1, "exactly one Entry, zero Exits");
        assert_eq!(events[0].kind, EventKind::Entry);
        // No synthetic Exit is emitted for the final resident quadrant.
        assert_eq!(tracker.position_of("orange"), Some(2));
    }

    #[test]
    fn test_move_logs_entry_before_exit() {
        let mut tracker = EventTracker::new();
        let fps = 25.0;

        // Q1 for frames 0..5, then Q2 for frames 5..10.
        for frame in 0..5u32 {
            tracker.observe("yellow", 1, frame as f64 / fps);
        }
        for frame in 5..10u32 {
            tracker.observe("yellow", 2, frame as f64 / fps);
        }

        let events = tracker.events();
        assert_eq!(events.len(), 3, "3 events, not 4, and no Exit from Q2");

        assert_eq!(events[0].kind, EventKind::Entry);
        assert_eq!(events[0].quadrant, 1);
        assert_eq!(events[0].timestamp, 0.0);

        // Entry for the new quadrant is logged before the Exit for the
        // old one, both stamped with the move frame's timestamp.
        assert_eq!(events[1].kind, EventKind::Entry);
        assert_eq!(events[1].quadrant, 2);
        assert_eq!(events[1].timestamp, 5.0 / fps);

        assert_eq!(events[2].kind, EventKind::Exit);
        assert_eq!(events[2].quadrant, 1);
        assert_eq!(events[2].timestamp, 5.0 / fps);
    }

    #[test]
    fn test_colors_are_tracked_independently() {
        let mut tracker = EventTracker::new();

        tracker.observe("green", 1, 0.0);
        tracker.observe("white", 4, 0.0);
        tracker.observe("green", 2, 0.5);

        assert_eq!(tracker.position_of("green"), Some(2));
        assert_eq!(tracker.position_of("white"), Some(4));
        assert_eq!(tracker.events().len(), 4);
    }

    #[test]
    fn test_same_color_last_observation_wins() {
        let mut tracker = EventTracker::new();

        // Two green blobs in the same frame: the second observation
        // overwrites the first, leaving green resident in Q4.
        tracker.observe("green", 1, 0.0);
        tracker.observe("green", 4, 0.0);

        assert_eq!(tracker.position_of("green"), Some(4));
    }
}
