use tracing::trace;

/// Rows below the top of the page that act as the reading anchor. A section
/// owns the current position when its span contains `scroll_offset + anchor`.
pub const NAV_ANCHOR_OFFSET: u16 = 120;

/// Vertical extent of one rendered section, in page rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub id: String,
    pub top: u16,
    pub height: u16,
}

impl SectionSpan {
    /// Whether `row` falls inside `[top, top + height)`.
    pub fn contains(&self, row: u16) -> bool {
        self.top <= row && self.top.saturating_add(self.height) > row
    }
}

/// One navigation link in the top bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub target_id: String,
    pub active: bool,
}

impl NavEntry {
    pub fn new(label: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target_id: target_id.into(),
            active: false,
        }
    }
}

/// Keeps the top-bar links in sync with the scroll position.
///
/// Every recompute walks all section spans without an early exit, so when
/// spans overlap the one listed last owns the anchor. At most one entry ends
/// up active; if no span contains the anchor row, none does.
#[derive(Debug, Clone, Default)]
pub struct NavRouter {
    entries: Vec<NavEntry>,
}

impl NavRouter {
    pub fn new(entries: Vec<NavEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target id of the active entry, if any.
    pub fn active_target(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.active)
            .map(|e| e.target_id.as_str())
    }

    /// Re-derive the active entry for `scroll_offset`. Runs on every scroll
    /// step and once at startup before any scrolling.
    pub fn recompute(&mut self, scroll_offset: u16, spans: &[SectionSpan]) {
        let anchor = scroll_offset.saturating_add(NAV_ANCHOR_OFFSET);

        let mut owner: Option<&str> = None;
        for span in spans {
            if span.contains(anchor) {
                owner = Some(span.id.as_str());
            }
        }

        let active_idx = owner.and_then(|id| {
            self.entries.iter().position(|e| e.target_id == id)
        });
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.active = Some(i) == active_idx;
        }

        trace!(
            scroll_offset,
            anchor,
            active = ?self.active_target(),
            "Nav recomputed"
        );
    }
}
