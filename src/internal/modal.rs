/// Single overlay dialog. There is no stack: `show` replaces whatever is
/// currently displayed, visible or not.
#[derive(Debug, Clone, Default)]
pub struct Modal {
    visible: bool,
    title: String,
    body: String,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and display the overlay.
    pub fn show(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.title = title.into();
        self.body = body.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden() {
        let modal = Modal::new();
        assert!(!modal.is_visible());
    }

    #[test]
    fn show_sets_content_and_visibility() {
        let mut modal = Modal::new();
        modal.show("Message sent", "Thanks Ann.");
        assert!(modal.is_visible());
        assert_eq!(modal.title(), "Message sent");
        assert_eq!(modal.body(), "Thanks Ann.");
    }

    #[test]
    fn second_show_overwrites_unconditionally() {
        let mut modal = Modal::new();
        modal.show("First", "one");
        modal.show("Second", "two");

        assert!(modal.is_visible());
        assert_eq!(modal.title(), "Second");
        assert_eq!(modal.body(), "two");
    }

    #[test]
    fn hide_keeps_content_for_the_next_show() {
        let mut modal = Modal::new();
        modal.show("First", "one");
        modal.hide();
        assert!(!modal.is_visible());

        modal.show("Second", "two");
        assert_eq!(modal.body(), "two");
    }
}
