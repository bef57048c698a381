//! Shared highlight between the hourly chart and the hourly card list
//!
//! Both views of one hour sequence write the same [`HighlightSync`]; the last
//! event wins regardless of which view sent it. When a highlight lands on a
//! card that is not fully visible, the list scrolls smoothly so that card is
//! centred.

use tracing::debug;

/// Pointer and keyboard events from either view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightEvent {
    ChartEnter(usize),
    ChartLeave,
    ListEnter(usize),
    ListTap(usize),
    ListLeave,
}

/// Highlighted index for one displayed hour sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSync {
    active: Option<usize>,
    len: usize,
}

impl HighlightSync {
    pub fn new(len: usize) -> Self {
        Self { active: None, len }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Applies an event, returning the newly highlighted index if it changed
    /// to a value
    ///
    /// Indices outside the current sequence are ignored.
    pub fn apply(&mut self, event: HighlightEvent) -> Option<usize> {
        let next = match event {
            HighlightEvent::ChartEnter(i)
            | HighlightEvent::ListEnter(i)
            | HighlightEvent::ListTap(i) => {
                if i >= self.len {
                    debug!(index = i, len = self.len, "ignoring out-of-range highlight");
                    return None;
                }
                Some(i)
            }
            HighlightEvent::ChartLeave | HighlightEvent::ListLeave => None,
        };
        let changed = next != self.active;
        self.active = next;
        if changed {
            next
        } else {
            None
        }
    }

    /// Moves the highlight by `delta`, starting at the first or last item
    /// when nothing is highlighted
    pub fn step(&mut self, delta: isize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let last = self.len - 1;
        let target = match self.active {
            None if delta < 0 => last,
            None => 0,
            Some(i) => (i as isize + delta).clamp(0, last as isize) as usize,
        };
        self.apply(HighlightEvent::ListEnter(target))
    }

    /// Replaces the underlying sequence, clearing any highlight
    pub fn replace_sequence(&mut self, len: usize) {
        if self.active.is_some() {
            debug!(old_len = self.len, new_len = len, "sequence replaced, highlight cleared");
        }
        self.active = None;
        self.len = len;
    }
}

/// Extent of one card along the scroll axis, in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemBounds {
    pub start: u16,
    pub len: u16,
}

impl ItemBounds {
    pub fn end(&self) -> u16 {
        self.start.saturating_add(self.len)
    }
}

/// Visible window of the scroll container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: u16,
    pub len: u16,
    pub content_len: u16,
}

impl Viewport {
    pub fn max_offset(&self) -> u16 {
        self.content_len.saturating_sub(self.len)
    }

    pub fn contains(&self, item: ItemBounds) -> bool {
        item.start >= self.offset && item.end() <= self.offset.saturating_add(self.len)
    }
}

/// Offset that centres `item`, or `None` if it is already fully visible
pub fn scroll_target(item: ItemBounds, viewport: Viewport) -> Option<u16> {
    if viewport.contains(item) {
        return None;
    }
    let item_centre = i32::from(item.start) + i32::from(item.len) / 2;
    let target = item_centre - i32::from(viewport.len) / 2;
    let clamped = target.clamp(0, i32::from(viewport.max_offset()));
    Some(clamped as u16)
}

/// Eased scroll position advanced once per UI tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    position: f64,
    target: f64,
}

/// Fraction of the remaining distance covered per tick
const EASE_FACTOR: f64 = 0.35;

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SmoothScroll {
    pub fn new(offset: u16) -> Self {
        Self {
            position: f64::from(offset),
            target: f64::from(offset),
        }
    }

    pub fn offset(&self) -> u16 {
        self.position.round().max(0.0) as u16
    }

    pub fn target(&self) -> u16 {
        self.target.round().max(0.0) as u16
    }

    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }

    pub fn scroll_to(&mut self, offset: u16) {
        self.target = f64::from(offset);
    }

    /// Jumps without animation
    pub fn jump_to(&mut self, offset: u16) {
        self.position = f64::from(offset);
        self.target = self.position;
    }

    /// Advances one step; returns true while still moving
    pub fn tick(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        let remaining = self.target - self.position;
        if remaining.abs() < 0.5 {
            self.position = self.target;
        } else {
            self.position += remaining * EASE_FACTOR;
        }
        self.is_animating()
    }

    /// Starts a scroll that centres `item` if it is not fully visible
    pub fn reveal(&mut self, item: ItemBounds, viewport_len: u16, content_len: u16) -> bool {
        let viewport = Viewport {
            offset: self.offset(),
            len: viewport_len,
            content_len,
        };
        match scroll_target(item, viewport) {
            Some(target) => {
                self.scroll_to(target);
                true
            }
            None => false,
        }
    }
}
