use tracing::debug;

/// Fraction of a section that must be inside the viewport before it is
/// revealed.
pub const REVEAL_THRESHOLD: f32 = 0.12;

/// One visibility measurement for a tracked section.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: String,
    pub ratio: f32,
}

#[derive(Debug, Clone)]
struct RevealTarget {
    id: String,
    shown: bool,
}

/// One-shot reveal tracking for page sections.
///
/// Registered sections start hidden. The first measurement at or above
/// [`REVEAL_THRESHOLD`] marks a section shown and releases it: later
/// measurements for that id are ignored, so a revealed section never
/// un-reveals no matter how far it scrolls back out.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    targets: Vec<RevealTarget>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section for tracking. Re-registering an id keeps its
    /// current state.
    pub fn observe(&mut self, id: &str) {
        if !self.targets.iter().any(|t| t.id == id) {
            self.targets.push(RevealTarget {
                id: id.to_string(),
                shown: false,
            });
        }
    }

    /// Feed one batch of measurements. Returns the ids revealed by this
    /// batch, in batch order.
    pub fn apply_batch(&mut self, entries: &[IntersectionEntry]) -> Vec<String> {
        let mut newly = Vec::new();
        for entry in entries {
            if entry.ratio < REVEAL_THRESHOLD {
                continue;
            }
            if let Some(target) = self
                .targets
                .iter_mut()
                .find(|t| t.id == entry.id && !t.shown)
            {
                target.shown = true;
                debug!(section = %target.id, ratio = entry.ratio, "Section revealed");
                newly.push(target.id.clone());
            }
        }
        newly
    }

    /// Whether this id is registered and has been revealed.
    pub fn is_shown(&self, id: &str) -> bool {
        self.targets.iter().any(|t| t.id == id && t.shown)
    }

    /// Whether this id is registered and still waiting to reveal. Renderers
    /// dim pending sections; unregistered content is never dimmed.
    pub fn is_pending(&self, id: &str) -> bool {
        self.targets.iter().any(|t| t.id == id && !t.shown)
    }

    pub fn pending_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.shown).count()
    }
}
