// src/selection_logic.rs
// Pure selection state, no toolkit types here so it can be tested headless.

use serde::Serialize;

/// A point in screen coordinates, as reported by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        ScreenPoint { x, y }
    }
}

/// Rectangular screen region. Field order is the metadata JSON key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub top: i32,
    pub left: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Region { top, left, width, height }
    }

    /// Normalized bounds of the rectangle spanned by two corners.
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Region {
            top: a.y.min(b.y),
            left: a.x.min(b.x),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    /// Zero width or zero height means "no selection".
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left as i64 || bottom <= top as i64 {
            return None;
        }
        Some(Region {
            top,
            left,
            width: (right - left as i64) as u32,
            height: (bottom - top as i64) as u32,
        })
    }

    /// Smallest region containing both.
    pub fn union(&self, other: &Region) -> Region {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Region {
            top,
            left,
            width: (right - left as i64) as u32,
            height: (bottom - top as i64) as u32,
        }
    }
}

/// How a selection session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected(Region),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Dragging { anchor: ScreenPoint, current: ScreenPoint },
    Finalized(Region),
    Cancelled,
}

/// Selection state machine driven by the overlay's pointer and key handlers.
///
/// `Idle -> Dragging -> Finalized` or `Idle/Dragging -> Cancelled`. Once
/// finalized or cancelled every further input is ignored, so a session
/// resolves exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    state: SelectionState,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Selection { state: SelectionState::Idle }
    }

    #[cfg(test)]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SelectionState::Finalized(_) | SelectionState::Cancelled)
    }

    /// Pointer-down: records the anchor.
    pub fn press(&mut self, at: ScreenPoint) {
        if let SelectionState::Idle = self.state {
            self.state = SelectionState::Dragging { anchor: at, current: at };
        }
    }

    /// Pointer-move. Returns true when the visible rectangle changed.
    pub fn drag(&mut self, to: ScreenPoint) -> bool {
        match &mut self.state {
            SelectionState::Dragging { current, .. } if *current != to => {
                *current = to;
                true
            }
            _ => false,
        }
    }

    /// Pointer-up. A release without a prior press is ignored.
    pub fn release(&mut self, at: ScreenPoint) -> Option<SelectionOutcome> {
        match self.state {
            SelectionState::Dragging { anchor, .. } => {
                let region = Region::from_corners(anchor, at);
                self.state = SelectionState::Finalized(region);
                Some(SelectionOutcome::Selected(region))
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<SelectionOutcome> {
        if self.is_resolved() {
            return None;
        }
        self.state = SelectionState::Cancelled;
        Some(SelectionOutcome::Cancelled)
    }

    /// Rectangle to draw right now, if any.
    pub fn current_region(&self) -> Option<Region> {
        match self.state {
            SelectionState::Dragging { anchor, current } => Some(Region::from_corners(anchor, current)),
            SelectionState::Finalized(region) => Some(region),
            _ => None,
        }
    }
}
