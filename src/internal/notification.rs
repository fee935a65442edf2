use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

impl NoticeKind {
    fn timeout(self) -> Duration {
        match self {
            NoticeKind::Info => Duration::from_secs(3),
            NoticeKind::Error => Duration::from_secs(6),
        }
    }
}

/// Transient toast shown above the status bar. Expiry is polled from the
/// render tick rather than timer-driven, so a notice simply stops drawing
/// once its deadline passes.
#[derive(Debug, Clone)]
pub struct Notice {
    text: String,
    kind: NoticeKind,
    deadline: Instant,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, NoticeKind::Info)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, NoticeKind::Error)
    }

    fn new(text: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            text: text.into(),
            kind,
            deadline: Instant::now() + kind.timeout(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_notice_is_not_expired() {
        let notice = Notice::info("theme: dark");
        assert!(!notice.expired());
        assert_eq!(notice.kind(), NoticeKind::Info);
        assert_eq!(notice.text(), "theme: dark");
    }

    #[test]
    fn errors_outlive_infos() {
        assert!(NoticeKind::Error.timeout() > NoticeKind::Info.timeout());
    }

    #[test]
    fn past_deadline_reads_as_expired() {
        let notice = Notice {
            text: "stale".into(),
            kind: NoticeKind::Info,
            deadline: Instant::now() - Duration::from_secs(1),
        };
        assert!(notice.expired());
    }
}
