#![allow(clippy::single_match)]
use anyhow::Result;
use std::path::Path;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::AppConfig;
use crate::content::PageContent;
use crate::internal::contact::{ContactForm, SEND_DELAY, SendRequest};
use crate::internal::filter::ProjectFilter;
use crate::internal::modal::Modal;
use crate::internal::nav::{NavEntry, NavRouter};
use crate::internal::notification::Notice;
use crate::internal::prefs::PrefStore;
use crate::internal::reveal::{IntersectionEntry, RevealTracker};
use crate::internal::typing::TypingBanner;
use crate::internal::ui::keybindings::KeyBindingMap;
use crate::internal::ui::view::{ChromeHits, PageDoc};
use crate::utils::theme::{Palette, Theme, load_palette};

use ratatui::Frame;

/// Scroll offset past which the back-to-top control appears.
pub const TOP_BUTTON_THRESHOLD: u16 = 20;

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: i32 = 3;

/// Input modes for the UI.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Search,
    Form,
}

/// Actions/messages sent through the app action channel.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    BackToTop,
    BottomOfPage,
    JumpToSection(usize),
    NextChip,
    PrevChip,
    NextProject,
    PrevProject,
    OpenProjectLink,
    FocusForm,
    ToggleTheme,
    ShowHelp,
    ClearSearch,
    SelectChip(usize),
    TypingTick,
    SendElapsed(SendRequest),
}

// Manual Serialize/Deserialize implementation for Action
// Only config-relevant variants are supported
impl serde::Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Action::Quit => serializer.serialize_unit_variant("Action", 0, "Quit"),
            Action::ScrollUp => serializer.serialize_unit_variant("Action", 1, "ScrollUp"),
            Action::ScrollDown => serializer.serialize_unit_variant("Action", 2, "ScrollDown"),
            Action::PageUp => serializer.serialize_unit_variant("Action", 3, "PageUp"),
            Action::PageDown => serializer.serialize_unit_variant("Action", 4, "PageDown"),
            Action::BackToTop => serializer.serialize_unit_variant("Action", 5, "BackToTop"),
            Action::BottomOfPage => {
                serializer.serialize_unit_variant("Action", 6, "BottomOfPage")
            }
            Action::JumpToSection(index) => {
                serializer.serialize_newtype_variant("Action", 7, "JumpToSection", index)
            }
            Action::NextChip => serializer.serialize_unit_variant("Action", 8, "NextChip"),
            Action::PrevChip => serializer.serialize_unit_variant("Action", 9, "PrevChip"),
            Action::NextProject => serializer.serialize_unit_variant("Action", 10, "NextProject"),
            Action::PrevProject => serializer.serialize_unit_variant("Action", 11, "PrevProject"),
            Action::OpenProjectLink => {
                serializer.serialize_unit_variant("Action", 12, "OpenProjectLink")
            }
            Action::FocusForm => serializer.serialize_unit_variant("Action", 13, "FocusForm"),
            Action::ToggleTheme => serializer.serialize_unit_variant("Action", 14, "ToggleTheme"),
            Action::ShowHelp => serializer.serialize_unit_variant("Action", 15, "ShowHelp"),
            Action::ClearSearch => serializer.serialize_unit_variant("Action", 16, "ClearSearch"),
            // Non-serializable variants
            _ => Err(serde::ser::Error::custom(
                "Cannot serialize runtime-only Action variant",
            )),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ActionVisitor;

        impl<'de> Visitor<'de> for ActionVisitor {
            type Value = Action;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("enum Action")
            }

            fn visit_str<E>(self, value: &str) -> Result<Action, E>
            where
                E: de::Error,
            {
                match value {
                    "Quit" => Ok(Action::Quit),
                    "ScrollUp" => Ok(Action::ScrollUp),
                    "ScrollDown" => Ok(Action::ScrollDown),
                    "PageUp" => Ok(Action::PageUp),
                    "PageDown" => Ok(Action::PageDown),
                    "BackToTop" => Ok(Action::BackToTop),
                    "BottomOfPage" => Ok(Action::BottomOfPage),
                    "NextChip" => Ok(Action::NextChip),
                    "PrevChip" => Ok(Action::PrevChip),
                    "NextProject" => Ok(Action::NextProject),
                    "PrevProject" => Ok(Action::PrevProject),
                    "OpenProjectLink" => Ok(Action::OpenProjectLink),
                    "FocusForm" => Ok(Action::FocusForm),
                    "ToggleTheme" => Ok(Action::ToggleTheme),
                    "ShowHelp" => Ok(Action::ShowHelp),
                    "ClearSearch" => Ok(Action::ClearSearch),
                    _ => Err(de::Error::unknown_variant(
                        value,
                        &[
                            "Quit",
                            "ScrollUp",
                            "ScrollDown",
                            "PageUp",
                            "PageDown",
                            "BackToTop",
                            "BottomOfPage",
                            "JumpToSection",
                            "NextChip",
                            "PrevChip",
                            "NextProject",
                            "PrevProject",
                            "OpenProjectLink",
                            "FocusForm",
                            "ToggleTheme",
                            "ShowHelp",
                            "ClearSearch",
                        ],
                    )),
                }
            }

            fn visit_map<V>(self, mut map: V) -> Result<Action, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut variant_name: Option<String> = None;
                let mut section_index: Option<usize> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "JumpToSection" => {
                            section_index = Some(map.next_value()?);
                            variant_name = Some("JumpToSection".to_string());
                        }
                        other => {
                            variant_name = Some(other.to_string());
                            let _ = map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }

                match variant_name.as_deref() {
                    Some("JumpToSection") => match section_index {
                        Some(index) => Ok(Action::JumpToSection(index)),
                        None => Err(de::Error::missing_field("JumpToSection inner value")),
                    },
                    Some(v) => self.visit_str(v),
                    None => Err(de::Error::missing_field("variant")),
                }
            }
        }

        deserializer.deserialize_any(ActionVisitor)
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub app_version: String,
    pub config: AppConfig,
    pub content: PageContent,
    pub theme: Theme,
    pub palette: Palette,
    pub prefs: PrefStore,
    pub typing: TypingBanner,
    pub reveal: RevealTracker,
    pub filter: ProjectFilter,
    pub nav: NavRouter,
    pub form: ContactForm,
    pub modal: Modal,
    pub notification: Option<Notice>,
    pub input_mode: InputMode,
    /// Search text as typed; applied to the filter on every keystroke.
    pub search_input: String,
    pub selected_project: Option<usize>,
    pub show_help: bool,
    pub show_top_button: bool,
    /// First visible page row.
    pub scroll_offset: u16,
    /// Destination of an in-flight smooth scroll.
    pub scroll_target: Option<u16>,
    /// Height of the page viewport as of the last layout pass.
    pub viewport_rows: u16,
    pub page: PageDoc,
    pub chrome: ChromeHits,
    pub keybindings: KeyBindingMap,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    #[tracing::instrument]
    pub fn new() -> Self {
        Self::with_config(AppConfig::load(), PrefStore::open())
    }

    pub fn with_config(config: AppConfig, prefs: PrefStore) -> Self {
        let content = PageContent::load(&config.content_file);
        Self::with_parts(config, content, prefs)
    }

    pub fn with_parts(config: AppConfig, content: PageContent, prefs: PrefStore) -> Self {
        let start = std::time::Instant::now();
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        // The persisted theme wins; the system default is written back on
        // first load so the preference exists from then on.
        let theme = match prefs.theme() {
            Some(t) => t,
            None => {
                let detected = Theme::detect_system();
                prefs.set_theme(detected);
                detected
            }
        };
        let palette = Self::load_palette_for(&config, theme);

        let typing = TypingBanner::new(content.typing_words().to_vec());
        let filter = ProjectFilter::new(content.chips(), content.projects().len());

        let mut reveal = RevealTracker::new();
        for id in content.section_ids() {
            reveal.observe(id);
        }

        let nav = NavRouter::new(
            content
                .sections
                .iter()
                .map(|s| NavEntry::new(s.label.clone(), s.id.clone()))
                .collect(),
        );

        let mut keybindings =
            crate::internal::ui::keybindings_default::create_default_keybindings();
        if let Some(custom_bindings) = &config.keybindings {
            keybindings.merge_config(custom_bindings);
        }

        tracing::info!(
            elapsed = ?start.elapsed(),
            sections = content.sections.len(),
            projects = content.projects().len(),
            theme = %theme,
            "App initialized"
        );

        let mut app = Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            content,
            theme,
            palette,
            prefs,
            typing,
            reveal,
            filter,
            nav,
            form: ContactForm::new(),
            modal: Modal::new(),
            notification: None,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            selected_project: None,
            show_help: false,
            show_top_button: false,
            scroll_offset: 0,
            scroll_target: None,
            viewport_rows: 0,
            page: PageDoc::default(),
            chrome: ChromeHits::default(),
            action_tx,
            action_rx,
            keybindings,
        };

        // Lay the page out once before the first frame so the nav state and
        // initial reveals are in place pre-scroll. The first draw corrects
        // the guessed terminal size.
        app.refresh_layout(80, 24);
        app
    }

    fn load_palette_for(config: &AppConfig, theme: Theme) -> Palette {
        match &config.theme_file {
            Some(path) => match load_palette(Path::new(path), theme) {
                Ok(palette) => palette,
                Err(e) => {
                    tracing::warn!("Failed to load palette from {}: {}", path, e);
                    Palette::for_theme(theme)
                }
            },
            None => Palette::for_theme(theme),
        }
    }

    /// Set an info notification
    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notice::info(message));
    }

    /// Set an error notification
    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notice::error(message));
    }

    /// Rebuild the page document for the given text width and viewport
    /// height, clamp scrolling into range, and re-derive everything that
    /// depends on the scroll position.
    pub fn refresh_layout(&mut self, width: u16, height: u16) {
        self.viewport_rows = height;
        self.page = crate::internal::ui::view::build_page(self, width);

        let max = self.max_scroll();
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
        if let Some(target) = self.scroll_target {
            let clamped = target.min(max);
            self.scroll_target = match clamped == self.scroll_offset {
                true => None,
                false => Some(clamped),
            };
        }

        let pending_before = self.reveal.pending_count();
        self.sync_scroll_effects();
        if self.reveal.pending_count() != pending_before {
            // Sections revealed by this pass must not render dimmed.
            self.page = crate::internal::ui::view::build_page(self, width);
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.page.height.saturating_sub(self.viewport_rows)
    }

    /// Everything a scroll step re-derives: nav highlighting, reveal
    /// measurements, and the back-to-top control.
    fn sync_scroll_effects(&mut self) {
        self.nav.recompute(self.scroll_offset, &self.page.spans);

        let batch = self.intersection_batch();
        let newly = self.reveal.apply_batch(&batch);
        if !newly.is_empty() {
            tracing::debug!(sections = ?newly, "Revealed");
        }

        self.show_top_button = self.scroll_offset > TOP_BUTTON_THRESHOLD;
    }

    /// Visible fraction of every section at the current scroll position.
    fn intersection_batch(&self) -> Vec<IntersectionEntry> {
        let vp_top = self.scroll_offset;
        let vp_bottom = vp_top.saturating_add(self.viewport_rows);

        self.page
            .spans
            .iter()
            .map(|span| {
                let s_bottom = span.top.saturating_add(span.height);
                let overlap = vp_bottom.min(s_bottom).saturating_sub(vp_top.max(span.top));
                let ratio = match span.height {
                    0 => 0.0,
                    h => f32::from(overlap) / f32::from(h),
                };
                IntersectionEntry {
                    id: span.id.clone(),
                    ratio,
                }
            })
            .collect()
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        // Kick off the hero animation
        if self.typing.enabled() {
            let _ = self.action_tx.send(Action::TypingTick);
        }

        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            self.step_smooth_scroll();

            // Auto-dismiss expired notifications
            if let Some(notice) = &self.notification
                && notice.expired()
            {
                self.notification = None;
            }

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    // Check for terminal events
                    if event::poll(std::time::Duration::from_millis(0))? {
                        match event::read()? {
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key_event(key);
                            }
                            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                            _ => {}
                        }
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    pub fn ui(&mut self, f: &mut Frame) {
        crate::internal::ui::view::draw(self, f);
    }

    /// Advance an in-flight smooth scroll one step. The step size shrinks
    /// as the target nears, giving the ease-out feel of the page.
    fn step_smooth_scroll(&mut self) {
        let Some(target) = self.scroll_target else {
            return;
        };
        if self.scroll_offset == target {
            self.scroll_target = None;
            return;
        }

        let step = (target.abs_diff(self.scroll_offset) / 4).max(1);
        self.scroll_offset = match target > self.scroll_offset {
            true => self.scroll_offset.saturating_add(step),
            false => self.scroll_offset.saturating_sub(step),
        };
        if self.scroll_offset == target {
            self.scroll_target = None;
        }
    }

    /// Jump-style scroll: cancels any smooth scroll in flight.
    fn scroll_by(&mut self, delta: i32) {
        self.scroll_target = None;
        self.scroll_offset = match delta >= 0 {
            true => self
                .scroll_offset
                .saturating_add(delta.unsigned_abs().min(u16::MAX as u32) as u16),
            false => self
                .scroll_offset
                .saturating_sub(delta.unsigned_abs().min(u16::MAX as u32) as u16),
        };
        // The next layout pass clamps against the page end.
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // The modal traps input until dismissed
        if self.modal.is_visible() {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.modal.hide(),
                _ => {}
            }
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                    self.show_help = false;
                }
                // Swallow other keys while help is shown
                _ => {}
            }
            return;
        }

        match self.input_mode {
            InputMode::Search => self.handle_search_input(key),
            InputMode::Form => self.handle_form_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => {
                // Ignore / in search mode (it's the key that enters search mode)
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.apply_search_live();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.apply_search_live();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                // Cancel search - clear and exit
                self.search_input.clear();
                self.apply_search_live();
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    /// Re-run the title search after every edit so results track the
    /// keystroke, then keep the card selection on something visible.
    fn apply_search_live(&mut self) {
        self.filter
            .apply_search(&self.search_input, self.content.projects());
        self.reselect_project();
    }

    fn reselect_project(&mut self) {
        if let Some(current) = self.selected_project
            && !self.filter.is_visible(current)
        {
            self.selected_project = self.filter.visible_indices().first().copied();
        }
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.push_char(c),
            KeyCode::Backspace => self.form.backspace(),
            _ => {}
        }
    }

    /// Validate and, on success, start the simulated send. The completion
    /// is delivered back through the action channel after the fixed delay;
    /// overlapping submissions each get their own timer.
    fn submit_form(&mut self) {
        if let Some(request) = self.form.submit() {
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(SEND_DELAY).await;
                let _ = tx.send(Action::SendElapsed(request));
            });
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) {
        use crate::internal::ui::keybindings::KeyBindingContext;

        // Check for configured keybinding
        if let Some(action) = self.keybindings.get_action(&key, KeyBindingContext::Page) {
            let _ = self.action_tx.send(action);
            return;
        }

        // Mode switches that need immediate state changes
        match key.code {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                // Editing resumes from the applied query
                self.search_input = self.filter.query().to_string();
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_STEP),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_STEP),
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.column, mouse.row);
            }
            _ => {}
        }
    }

    /// Resolve a left click against the chrome and the page document.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        // A visible modal owns every click: its close control and anything
        // on the backdrop dismiss it, clicks on the dialog body do nothing.
        if self.modal.is_visible() {
            if self.chrome.hit_modal_close(column, row) || !self.chrome.hit_modal_body(column, row)
            {
                self.modal.hide();
            }
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if let Some(section) = self.chrome.hit_nav(column, row) {
            let _ = self.action_tx.send(Action::JumpToSection(section));
            return;
        }
        if self.chrome.hit_theme_toggle(column, row) {
            let _ = self.action_tx.send(Action::ToggleTheme);
            return;
        }
        if self.chrome.hit_top_button(column, row) {
            let _ = self.action_tx.send(Action::BackToTop);
            return;
        }

        let Some((page_col, page_row)) = self.chrome.page_position(column, row, self.scroll_offset)
        else {
            return;
        };

        if let Some(chip) = self.page.chip_at(page_col, page_row) {
            let _ = self.action_tx.send(Action::SelectChip(chip));
            return;
        }
        if self.page.is_search_row(page_row) {
            self.input_mode = InputMode::Search;
            self.search_input = self.filter.query().to_string();
            return;
        }
        if let Some(field) = self.page.form_field_at(page_row) {
            self.input_mode = InputMode::Form;
            while self.form.focused() != field {
                self.form.focus_next();
            }
            return;
        }
        if let Some(project) = self.page.project_at(page_row) {
            self.selected_project = Some(project);
        }
    }

    /// Apply one action to the app state. Everything the key, mouse, and
    /// timer paths do funnels through here.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollDown => self.scroll_by(1),
            Action::PageUp => self.scroll_by(-i32::from(self.viewport_rows.max(1))),
            Action::PageDown => self.scroll_by(i32::from(self.viewport_rows.max(1))),
            Action::BackToTop => self.scroll_target = Some(0),
            Action::BottomOfPage => self.scroll_target = Some(self.max_scroll()),
            Action::JumpToSection(index) => {
                if let Some(span) = self.page.spans.get(index) {
                    self.scroll_target = Some(span.top);
                }
            }
            Action::NextChip => self.step_chip(1),
            Action::PrevChip => self.step_chip(-1),
            Action::SelectChip(index) => {
                self.filter.select_chip(index, self.content.projects());
                self.reselect_project();
            }
            Action::NextProject => self.step_project(1),
            Action::PrevProject => self.step_project(-1),
            Action::OpenProjectLink => self.open_selected_link(),
            Action::FocusForm => self.focus_form(),
            Action::ToggleTheme => self.toggle_theme(),
            Action::ShowHelp => self.show_help = !self.show_help,
            Action::ClearSearch => {
                self.search_input.clear();
                self.apply_search_live();
            }
            Action::TypingTick => self.advance_typing(),
            Action::SendElapsed(request) => self.finish_send(&request),
        }
    }

    fn step_chip(&mut self, delta: i32) {
        let len = self.filter.chips().len();
        if len == 0 {
            return;
        }
        let current = self.filter.active_chip().unwrap_or(0);
        let next = match delta >= 0 {
            true => (current + 1) % len,
            false => (current + len - 1) % len,
        };
        self.filter.select_chip(next, self.content.projects());
        self.reselect_project();
    }

    fn step_project(&mut self, delta: i32) {
        let visible = self.filter.visible_indices();
        if visible.is_empty() {
            self.selected_project = None;
            return;
        }

        let next = match self
            .selected_project
            .and_then(|current| visible.iter().position(|&v| v == current))
        {
            Some(pos) => {
                let pos = match delta >= 0 {
                    true => (pos + 1).min(visible.len() - 1),
                    false => pos.saturating_sub(1),
                };
                visible[pos]
            }
            None => visible[0],
        };

        self.selected_project = Some(next);
        self.ensure_project_visible(next);
    }

    fn ensure_project_visible(&mut self, index: usize) {
        let Some((top, height)) = self.page.project_rows(index) else {
            return;
        };
        let bottom = top.saturating_add(height);
        let vp_top = self.scroll_offset;
        let vp_bottom = vp_top.saturating_add(self.viewport_rows);

        if top < vp_top {
            self.scroll_target = Some(top.saturating_sub(1));
        } else if bottom > vp_bottom {
            self.scroll_target = Some(bottom.saturating_sub(self.viewport_rows));
        }
    }

    fn open_selected_link(&mut self) {
        let Some(index) = self.selected_project else {
            self.notify_info("No project selected; press n to pick one");
            return;
        };
        let link = self
            .content
            .projects()
            .get(index)
            .and_then(|p| p.link.clone());

        match link {
            Some(url) => match open::that(&url) {
                Ok(()) => self.notify_info(format!("Opening {}", url)),
                Err(e) => self.notify_error(format!("Failed to open {}: {}", url, e)),
            },
            None => self.notify_info("This project has no public link"),
        }
    }

    /// Jump to the contact section and start editing. Does nothing but
    /// report when the page has no contact section.
    fn focus_form(&mut self) {
        let Some(contact_id) = self.content.contact_section_id().map(str::to_string) else {
            self.notify_info("This page has no contact section");
            return;
        };

        self.input_mode = InputMode::Form;
        if let Some(span) = self.page.spans.iter().find(|s| s.id == contact_id) {
            self.scroll_target = Some(span.top);
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.palette = Self::load_palette_for(&self.config, self.theme);
        self.prefs.set_theme(self.theme);
        self.notify_info(format!("Theme: {}", self.theme));
    }

    fn advance_typing(&mut self) {
        if !self.typing.enabled() {
            return;
        }
        let delay = self.typing.tick();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::TypingTick);
        });
    }

    fn finish_send(&mut self, request: &SendRequest) {
        let (title, body) = self.form.complete_send(request);
        self.modal.show(title, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_prefs(name: &str) -> PrefStore {
        let path = std::env::temp_dir().join(name);
        let _ = std::fs::remove_file(&path);
        PrefStore::with_path(path)
    }

    fn test_app(name: &str) -> App {
        App::with_parts(
            AppConfig::default(),
            PageContent::default(),
            temp_prefs(name),
        )
    }

    #[test]
    fn bindable_actions_round_trip_through_serde() {
        let json = serde_json::to_string(&Action::Quit).unwrap();
        assert_eq!(json, "\"Quit\"");
        assert!(matches!(
            serde_json::from_str::<Action>(&json).unwrap(),
            Action::Quit
        ));

        let json = serde_json::to_string(&Action::JumpToSection(3)).unwrap();
        assert_eq!(json, "{\"JumpToSection\":3}");
        assert!(matches!(
            serde_json::from_str::<Action>(&json).unwrap(),
            Action::JumpToSection(3)
        ));
    }

    #[test]
    fn runtime_actions_refuse_to_serialize() {
        assert!(serde_json::to_string(&Action::TypingTick).is_err());
        assert!(serde_json::to_string(&Action::SelectChip(1)).is_err());
    }

    #[test]
    fn unknown_action_name_is_an_error() {
        assert!(serde_json::from_str::<Action>("\"Teleport\"").is_err());
    }

    #[test]
    fn startup_lays_out_every_section() {
        let app = test_app("app_startup.json");

        assert_eq!(app.page.spans.len(), app.content.sections.len());
        assert!(app.page.height > 0);
        // Startup ran the router once before any scrolling.
        let active = app.nav.entries().iter().filter(|e| e.active).count();
        assert!(active <= 1);
    }

    #[test]
    fn theme_toggle_persists_and_notifies() {
        let path = std::env::temp_dir().join("app_theme_toggle.json");
        let _ = std::fs::remove_file(&path);

        let mut app = App::with_parts(
            AppConfig::default(),
            PageContent::default(),
            PrefStore::with_path(path.clone()),
        );
        let before = app.theme;

        app.handle_action(Action::ToggleTheme);

        assert_eq!(app.theme, before.toggle());
        assert!(app.notification.is_some());
        // A fresh store over the same file sees the toggled value.
        assert_eq!(PrefStore::with_path(path.clone()).theme(), Some(app.theme));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn first_load_writes_the_detected_preference() {
        let path = std::env::temp_dir().join("app_first_load.json");
        let _ = std::fs::remove_file(&path);

        let app = App::with_parts(
            AppConfig::default(),
            PageContent::default(),
            PrefStore::with_path(path.clone()),
        );

        assert_eq!(PrefStore::with_path(path.clone()).theme(), Some(app.theme));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn chip_stepping_wraps_and_filters() {
        let mut app = test_app("app_chips.json");
        let chips = app.filter.chips().len();
        assert!(chips >= 2);

        app.handle_action(Action::PrevChip);
        assert_eq!(app.filter.active_chip(), Some(chips - 1));

        app.handle_action(Action::NextChip);
        assert_eq!(app.filter.active_chip(), Some(0));
        assert_eq!(app.filter.visible_count(), app.content.projects().len());
    }

    #[test]
    fn search_keystrokes_filter_live() {
        let mut app = test_app("app_search.json");

        app.handle_key_event(KeyEvent::from(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);

        for c in "flux".chars() {
            app.handle_key_event(KeyEvent::from(KeyCode::Char(c)));
        }
        assert_eq!(app.filter.visible_count(), 1);

        // Esc clears the query and restores every card.
        app.handle_key_event(KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filter.visible_count(), app.content.projects().len());
    }

    #[test]
    fn modal_traps_keys_until_dismissed() {
        let mut app = test_app("app_modal_trap.json");
        app.modal.show("Message sent", "Thanks.");

        // 'q' would normally quit; with the modal up it only closes it.
        app.handle_key_event(KeyEvent::from(KeyCode::Char('q')));
        assert!(app.running);
        assert!(!app.modal.is_visible());
    }

    #[test]
    fn backdrop_click_closes_the_modal_but_body_does_not() {
        use ratatui::layout::Rect;

        let mut app = test_app("app_modal_click.json");
        app.modal.show("Message sent", "Thanks.");
        app.chrome.modal_body = Some(Rect::new(20, 8, 40, 10));
        app.chrome.modal_close = Some(Rect::new(56, 8, 3, 1));

        // Inside the dialog body: stays open.
        app.handle_click(30, 12);
        assert!(app.modal.is_visible());

        // On the backdrop: closes.
        app.handle_click(1, 1);
        assert!(!app.modal.is_visible());

        // The close control sits inside the body but still dismisses.
        app.modal.show("Again", "body");
        app.chrome.modal_body = Some(Rect::new(20, 8, 40, 10));
        app.chrome.modal_close = Some(Rect::new(56, 8, 3, 1));
        app.handle_click(57, 8);
        assert!(!app.modal.is_visible());
    }

    #[test]
    fn jump_targets_the_section_top() {
        let mut app = test_app("app_jump.json");
        let projects_index = app
            .content
            .sections
            .iter()
            .position(|s| s.id == "projects")
            .unwrap();

        app.handle_action(Action::JumpToSection(projects_index));
        assert_eq!(
            app.scroll_target,
            Some(app.page.spans[projects_index].top)
        );

        // Out-of-range jumps are ignored.
        app.scroll_target = None;
        app.handle_action(Action::JumpToSection(99));
        assert_eq!(app.scroll_target, None);
    }

    #[test]
    fn smooth_scroll_eases_toward_the_target() {
        let mut app = test_app("app_smooth.json");
        app.scroll_target = Some(40);

        let mut last = app.scroll_offset;
        for _ in 0..64 {
            app.step_smooth_scroll();
            assert!(app.scroll_offset >= last);
            last = app.scroll_offset;
            if app.scroll_target.is_none() {
                break;
            }
        }
        assert_eq!(app.scroll_offset, 40);
        assert_eq!(app.scroll_target, None);
    }

    #[test]
    fn typing_banner_disabled_without_a_hero() {
        let content = PageContent {
            site_title: "t".into(),
            author: "a".into(),
            sections: Vec::new(),
        };
        let app = App::with_parts(AppConfig::default(), content, temp_prefs("app_no_hero.json"));
        assert!(!app.typing.enabled());
    }

    #[test]
    fn focus_form_fails_closed_without_contact_section() {
        let content = PageContent {
            site_title: "t".into(),
            author: "a".into(),
            sections: Vec::new(),
        };
        let mut app =
            App::with_parts(AppConfig::default(), content, temp_prefs("app_no_contact.json"));

        app.handle_action(Action::FocusForm);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.notification.is_some());
    }
}
