use jiff::Zoned;

/// Current calendar year, for the footer line.
pub fn current_year() -> i16 {
    Zoned::now().year()
}

/// Format a zoned timestamp into a short relative string like "2d ago",
/// "3h ago", "15m ago", or "just now". Used for the preference file's
/// updated-at stamp in debug logging.
pub fn format_relative(then: &Zoned) -> String {
    let now = Zoned::now();
    let delta = now.timestamp().as_second() - then.timestamp().as_second();

    if delta <= 0 {
        return "just now".to_string();
    }

    let days = delta / 86_400;
    if days > 0 {
        return format!("{}d ago", days);
    }

    let hours = delta / 3_600;
    if hours > 0 {
        return format!("{}h ago", hours);
    }

    let minutes = delta / 60;
    if minutes > 0 {
        return format!("{}m ago", minutes);
    }

    "just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{Span, ToSpan};

    fn ago(span: Span) -> Zoned {
        Zoned::now().checked_sub(span).expect("span in range")
    }

    #[test]
    fn year_is_plausible() {
        assert!(current_year() >= 2025);
    }

    #[test]
    fn relative_formats_buckets() {
        assert_eq!(format_relative(&Zoned::now()), "just now");
        assert_eq!(format_relative(&ago(30.seconds())), "just now");
        assert_eq!(format_relative(&ago(5.minutes())), "5m ago");
        assert_eq!(format_relative(&ago(2.hours())), "2h ago");
        assert_eq!(format_relative(&ago(72.hours())), "3d ago");
    }
}
