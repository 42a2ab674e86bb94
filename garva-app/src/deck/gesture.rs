use super::timeline::{Direction, Neighbors};
use std::time::Duration;

/// Drag distance (px) before a peek direction is picked.
pub const DEAD_ZONE: f64 = 20.0;
/// Drag distance (px) that commits a swipe on release.
pub const SWIPE_THRESHOLD: f64 = 80.0;
/// How far the card follows the pointer.
pub const DRAG_ELASTIC: f64 = 0.6;

const EXIT_DURATION: Duration = Duration::from_millis(320);
const SNAP_BACK_DURATION: Duration = Duration::from_millis(240);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging {
        offset: f64,
    },
    Committing(Direction),
    SnappingBack,
}

/// Animation to play after a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Exit(Direction),
    SnapBack,
}

impl Motion {
    /// CSS transform for the end state of the motion.
    pub fn transform(&self) -> &'static str {
        match self {
            // Forward swipes leave to the left.
            Self::Exit(Direction::Forward) => "translateX(-130%) rotate(-12deg)",
            Self::Exit(Direction::Backward) => "translateX(130%) rotate(12deg)",
            Self::SnapBack => "translateX(0px) rotate(0deg)",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Exit(_) => EXIT_DURATION,
            Self::SnapBack => SNAP_BACK_DURATION,
        }
    }

    pub fn transition(&self) -> String {
        let easing = match self {
            Self::Exit(_) => "cubic-bezier(0.3, 0.7, 0.4, 1.2)",
            Self::SnapBack => "cubic-bezier(0.2, 0.9, 0.3, 1.1)",
        };
        format!("transform {}ms {}", self.duration().as_millis(), easing)
    }
}

/// Turns pointer drags on the top card into swipe decisions.
///
/// Offsets are horizontal pointer displacement; negative means forward.
/// While a motion is playing every new gesture is rejected, which is what
/// keeps two quick swipes from committing twice.
#[derive(Debug, Clone, Default)]
pub struct SwipeController {
    phase: GesturePhase,
    peek: Direction,
}

impl SwipeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn peek(&self) -> Direction {
        self.peek
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            GesturePhase::Committing(_) | GesturePhase::SnappingBack
        )
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Current pointer displacement, zero unless a drag is in progress.
    pub fn offset(&self) -> f64 {
        match self.phase {
            GesturePhase::Dragging { offset } => offset,
            _ => 0.0,
        }
    }

    /// CSS transform while the card follows the pointer.
    pub fn drag_transform(&self) -> String {
        format!("translateX({:.1}px) rotate(0deg)", self.offset() * DRAG_ELASTIC)
    }

    /// Starts a drag. Returns false while a motion is still playing.
    pub fn begin(&mut self) -> bool {
        match self.phase {
            GesturePhase::Idle => {
                self.phase = GesturePhase::Dragging { offset: 0.0 };
                true
            }
            GesturePhase::Dragging { .. } => true,
            GesturePhase::Committing(_) | GesturePhase::SnappingBack => false,
        }
    }

    pub fn drag(&mut self, offset: f64, neighbors: Neighbors) {
        if !self.is_dragging() {
            return;
        }
        self.phase = GesturePhase::Dragging { offset };

        if offset > DEAD_ZONE && neighbors.has_previous {
            self.peek = Direction::Backward;
        } else if offset < -DEAD_ZONE && neighbors.has_next {
            self.peek = Direction::Forward;
        }
    }

    /// Ends the drag and decides which motion to play.
    pub fn release(&mut self, offset: f64, neighbors: Neighbors) -> Option<Motion> {
        if !self.is_dragging() {
            return None;
        }

        let motion = if offset < -SWIPE_THRESHOLD {
            Motion::Exit(Direction::Forward)
        } else if offset > SWIPE_THRESHOLD && neighbors.has_previous {
            Motion::Exit(Direction::Backward)
        } else {
            Motion::SnapBack
        };

        self.phase = match motion {
            Motion::Exit(direction) => GesturePhase::Committing(direction),
            Motion::SnapBack => GesturePhase::SnappingBack,
        };
        tracing::trace!(?motion, offset, "Swipe released");
        Some(motion)
    }

    /// Called when the motion finished playing. Yields the direction the deck
    /// should move in, if the motion was a commit.
    pub fn finish(&mut self) -> Option<Direction> {
        let committed = match self.phase {
            GesturePhase::Committing(direction) => Some(direction),
            GesturePhase::SnappingBack => None,
            GesturePhase::Idle | GesturePhase::Dragging { .. } => return None,
        };
        self.phase = GesturePhase::Idle;
        self.peek = Direction::Forward;
        committed
    }
}
