//! Swipe gesture state machine
//!
//! Per card: `Idle → Swiping(dir) → Swiped(dir) → (next card) Idle`. A drag
//! released past the threshold commits; anything shorter snaps back. Button
//! taps jump straight to `Swiped`.

use std::future::Future;

use crate::{
    config::SwipeSettings,
    error::{AppError, AppResult},
    models::FeedbackType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction from the sign of a horizontal delta; `None` for zero
    pub fn from_delta(delta_x: f64) -> Option<Self> {
        if delta_x > 0.0 {
            Some(SwipeDirection::Right)
        } else if delta_x < 0.0 {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }

    pub fn feedback_type(self) -> FeedbackType {
        match self {
            SwipeDirection::Right => FeedbackType::Like,
            SwipeDirection::Left => FeedbackType::Dislike,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeState {
    #[default]
    Idle,
    Swiping(SwipeDirection),
    Swiped(SwipeDirection),
}

/// Animation phase of the card on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Enter,
    Center,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEvent {
    Drag { delta_x: f64 },
    Release { delta_x: f64 },
    Button(SwipeDirection),
    /// Submission failed or the drag was abandoned
    Reset,
    /// The next card took the place of a swiped one
    Advance,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwipeError {
    #[error("illegal swipe transition from {from:?} on {event:?}")]
    IllegalTransition { from: SwipeState, event: SwipeEvent },
}

impl From<SwipeError> for AppError {
    fn from(err: SwipeError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Pure transition function; `threshold_px` is strict (`>`)
pub fn transition(
    from: SwipeState,
    event: SwipeEvent,
    threshold_px: f64,
) -> Result<SwipeState, SwipeError> {
    use SwipeState::*;

    let next = match (from, event) {
        (Idle | Swiping(_), SwipeEvent::Drag { delta_x }) => {
            SwipeDirection::from_delta(delta_x).map_or(Idle, Swiping)
        }
        (Idle | Swiping(_), SwipeEvent::Release { delta_x }) => {
            match SwipeDirection::from_delta(delta_x) {
                Some(direction) if delta_x.abs() > threshold_px => Swiped(direction),
                _ => Idle,
            }
        }
        (Idle | Swiping(_), SwipeEvent::Button(direction)) => Swiped(direction),
        (_, SwipeEvent::Reset) => Idle,
        (Swiped(_), SwipeEvent::Advance) => Idle,
        (Swiped(_), SwipeEvent::Drag { .. } | SwipeEvent::Release { .. } | SwipeEvent::Button(_))
        | (Idle | Swiping(_), SwipeEvent::Advance) => {
            return Err(SwipeError::IllegalTransition { from, event })
        }
    };

    Ok(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Result of a committed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeOutcome {
    pub direction: SwipeDirection,
    pub feedback_type: FeedbackType,
}

/// Drives one card at a time through drag, classification and animation
#[derive(Debug)]
pub struct SwipeController {
    settings: SwipeSettings,
    state: SwipeState,
    phase: CardPhase,
    origin: Option<Position>,
    offset: Position,
    dragging: bool,
    notification: Option<String>,
}

impl SwipeController {
    pub fn new(settings: SwipeSettings) -> Self {
        Self {
            settings,
            state: SwipeState::Idle,
            phase: CardPhase::Center,
            origin: None,
            offset: Position::ORIGIN,
            dragging: false,
            notification: None,
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    /// Current card displacement from its resting position
    pub fn offset(&self) -> Position {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Takes the pending error notification, if any
    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    /// Starts a drag session; ignored while one is active or a card is leaving
    pub fn pointer_down(&mut self, at: Position) -> bool {
        if self.dragging || matches!(self.state, SwipeState::Swiped(_)) {
            return false;
        }
        self.dragging = true;
        self.origin = Some(at);
        true
    }

    pub fn pointer_move(&mut self, at: Position) -> SwipeState {
        let Some(origin) = self.origin.filter(|_| self.dragging) else {
            return self.state;
        };

        self.offset = Position::new(at.x - origin.x, at.y - origin.y);
        if let Ok(next) = transition(
            self.state,
            SwipeEvent::Drag {
                delta_x: self.offset.x,
            },
            self.settings.threshold_px,
        ) {
            self.state = next;
        }
        self.state
    }

    /// Ends the drag; returns the direction when the release commits a swipe
    pub fn pointer_up(&mut self) -> Option<SwipeDirection> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.origin = None;

        let next = transition(
            self.state,
            SwipeEvent::Release {
                delta_x: self.offset.x,
            },
            self.settings.threshold_px,
        )
        .ok()?;

        match next {
            SwipeState::Swiped(direction) => {
                self.state = next;
                self.phase = CardPhase::Exit;
                Some(direction)
            }
            _ => {
                self.snap_back();
                None
            }
        }
    }

    /// Like/dislike button: same classification, no drag
    pub fn press(&mut self, direction: SwipeDirection) -> AppResult<()> {
        self.state = transition(
            self.state,
            SwipeEvent::Button(direction),
            self.settings.threshold_px,
        )?;
        self.dragging = false;
        self.origin = None;
        self.phase = CardPhase::Exit;
        Ok(())
    }

    /// Submits the swiped card's classification and animates to the next card
    ///
    /// On failure the card snaps back, a notification is queued and the error
    /// is returned so the caller does not advance.
    pub async fn commit<F, Fut>(&mut self, submit: F) -> AppResult<SwipeOutcome>
    where
        F: FnOnce(FeedbackType) -> Fut,
        Fut: Future<Output = AppResult<()>>,
    {
        let SwipeState::Swiped(direction) = self.state else {
            return Err(SwipeError::IllegalTransition {
                from: self.state,
                event: SwipeEvent::Advance,
            }
            .into());
        };
        let feedback_type = direction.feedback_type();

        if let Err(e) = submit(feedback_type).await {
            tracing::warn!(error = %e, feedback_type = %feedback_type, "Swipe submission failed");
            self.notification = Some(e.user_message());
            self.snap_back();
            return Err(e);
        }

        tokio::time::sleep(self.settings.exit_animation).await;

        self.state = transition(self.state, SwipeEvent::Advance, self.settings.threshold_px)?;
        self.offset = Position::ORIGIN;
        self.phase = CardPhase::Enter;

        tokio::time::sleep(self.settings.enter_animation).await;
        self.phase = CardPhase::Center;

        Ok(SwipeOutcome {
            direction,
            feedback_type,
        })
    }

    fn snap_back(&mut self) {
        self.state = SwipeState::Idle;
        self.offset = Position::ORIGIN;
        self.phase = CardPhase::Center;
        self.dragging = false;
        self.origin = None;
    }
}
