use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Padding, Paragraph};

use crate::content::SectionBody;
use crate::internal::contact::{FormField, StatusTone};
use crate::internal::nav::SectionSpan;
use crate::internal::notification::NoticeKind;
use crate::internal::ui::app::{App, InputMode};
use crate::utils::datetime::current_year;

/// One chip's position in page coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipHit {
    pub index: usize,
    pub row: u16,
    pub start: u16,
    pub end: u16,
}

/// Rows occupied by one visible project card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHit {
    pub index: usize,
    pub top: u16,
    pub height: u16,
}

/// The rendered page as a flat list of rows. Rebuilt on every frame, so the
/// spans and hit positions always describe exactly what is on screen.
///
/// All coordinates are page rows: row 0 is the top of the document, not the
/// top of the viewport.
#[derive(Debug, Clone, Default)]
pub struct PageDoc {
    pub lines: Vec<Line<'static>>,
    pub height: u16,
    pub spans: Vec<SectionSpan>,
    pub chips: Vec<ChipHit>,
    pub projects: Vec<ProjectHit>,
    pub search_row: Option<u16>,
    pub form_rows: Vec<(FormField, u16)>,
}

impl PageDoc {
    pub fn chip_at(&self, col: u16, row: u16) -> Option<usize> {
        self.chips
            .iter()
            .find(|c| c.row == row && c.start <= col && col < c.end)
            .map(|c| c.index)
    }

    pub fn is_search_row(&self, row: u16) -> bool {
        self.search_row == Some(row)
    }

    pub fn form_field_at(&self, row: u16) -> Option<FormField> {
        self.form_rows
            .iter()
            .find(|(_, r)| *r == row)
            .map(|(field, _)| *field)
    }

    pub fn project_at(&self, row: u16) -> Option<usize> {
        self.projects
            .iter()
            .find(|p| p.top <= row && row < p.top.saturating_add(p.height))
            .map(|p| p.index)
    }

    /// Top row and height of the card for project `index`, when visible.
    pub fn project_rows(&self, index: usize) -> Option<(u16, u16)> {
        self.projects
            .iter()
            .find(|p| p.index == index)
            .map(|p| (p.top, p.height))
    }
}

/// Screen rectangles of the clickable chrome, refreshed on every draw.
#[derive(Debug, Clone, Default)]
pub struct ChromeHits {
    pub nav: Vec<(usize, Rect)>,
    pub theme_toggle: Option<Rect>,
    pub top_button: Option<Rect>,
    pub modal_body: Option<Rect>,
    pub modal_close: Option<Rect>,
    pub page_inner: Option<Rect>,
}

fn rect_hit(rect: Option<Rect>, column: u16, row: u16) -> bool {
    rect.is_some_and(|r| r.contains(Position::new(column, row)))
}

impl ChromeHits {
    pub fn hit_nav(&self, column: u16, row: u16) -> Option<usize> {
        self.nav
            .iter()
            .find(|(_, r)| r.contains(Position::new(column, row)))
            .map(|(i, _)| *i)
    }

    pub fn hit_theme_toggle(&self, column: u16, row: u16) -> bool {
        rect_hit(self.theme_toggle, column, row)
    }

    pub fn hit_top_button(&self, column: u16, row: u16) -> bool {
        rect_hit(self.top_button, column, row)
    }

    pub fn hit_modal_close(&self, column: u16, row: u16) -> bool {
        rect_hit(self.modal_close, column, row)
    }

    pub fn hit_modal_body(&self, column: u16, row: u16) -> bool {
        rect_hit(self.modal_body, column, row)
    }

    /// Translate a screen click inside the page area into page coordinates.
    pub fn page_position(&self, column: u16, row: u16, scroll_offset: u16) -> Option<(u16, u16)> {
        let inner = self.page_inner?;
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        Some((
            column - inner.x,
            (row - inner.y).saturating_add(scroll_offset),
        ))
    }
}

/// Wrap text to `width` columns. Newlines are kept as hard breaks.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    text.lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Lay the whole page out at `width` columns. Hidden projects are left out
/// entirely; sections that have not revealed yet render dimmed.
pub fn build_page(app: &App, width: u16) -> PageDoc {
    let width = width.max(16);
    let palette = &app.palette;

    let heading = Style::default()
        .fg(palette.heading)
        .add_modifier(Modifier::BOLD);
    let body = Style::default().fg(palette.foreground);
    let muted = Style::default().fg(palette.muted);
    let accent = Style::default().fg(palette.accent);

    let mut doc = PageDoc::default();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for section in &app.content.sections {
        let top = lines.len() as u16;
        let section_start = lines.len();

        if !matches!(section.body, SectionBody::Hero { .. }) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(section.label.clone(), heading)));
            lines.push(Line::from(Span::styled(
                "─".repeat((section.label.chars().count() + 2).min(width as usize)),
                Style::default().fg(palette.border),
            )));
        }

        match &section.body {
            SectionBody::Hero { headline, lead, .. } => {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(headline.clone(), heading)));
                if app.typing.enabled() {
                    lines.push(Line::from(vec![
                        Span::styled("· ", muted),
                        Span::styled(format!("{}█", app.typing.text()), accent),
                    ]));
                }
                lines.push(Line::default());
                for row in wrap_text(lead, width) {
                    lines.push(Line::from(Span::styled(row, body)));
                }
            }
            SectionBody::Text { paragraphs } => {
                for (i, paragraph) in paragraphs.iter().enumerate() {
                    if i > 0 {
                        lines.push(Line::default());
                    }
                    for row in wrap_text(paragraph, width) {
                        lines.push(Line::from(Span::styled(row, body)));
                    }
                }
            }
            SectionBody::Projects { .. } => {
                build_projects(app, &mut doc, &mut lines, width);
            }
            SectionBody::Contact { intro } => {
                build_contact(app, &mut doc, &mut lines, width, intro);
            }
        }

        lines.push(Line::default());
        let height = lines.len() as u16 - top;

        if app.reveal.is_pending(&section.id) {
            for line in &mut lines[section_start..] {
                line.style = line.style.add_modifier(Modifier::DIM);
            }
        }

        doc.spans.push(SectionSpan {
            id: section.id.clone(),
            top,
            height,
        });
    }

    lines.push(Line::from(Span::styled(
        "─".repeat(width as usize),
        Style::default().fg(palette.border),
    )));
    lines.push(Line::from(Span::styled(
        format!("© {} {}", current_year(), app.content.author),
        muted,
    )));

    doc.height = lines.len() as u16;
    doc.lines = lines;
    tracing::trace!(rows = doc.height, width, "Page rebuilt");
    doc
}

fn build_projects(app: &App, doc: &mut PageDoc, lines: &mut Vec<Line<'static>>, width: u16) {
    let palette = &app.palette;
    let muted = Style::default().fg(palette.muted);
    let body = Style::default().fg(palette.foreground);
    let active_chip = Style::default()
        .bg(palette.selection_bg)
        .fg(palette.selection_fg)
        .add_modifier(Modifier::BOLD);

    // Chip row
    let chip_row = lines.len() as u16;
    let mut spans = vec![Span::styled("Filter: ", muted)];
    let mut col: u16 = 8;
    for (i, chip) in app.filter.chips().iter().enumerate() {
        let text = format!(" {} ", chip.token);
        let chip_width = text.chars().count() as u16;
        let style = match chip.active {
            true => active_chip,
            false => body,
        };
        spans.push(Span::styled(text, style));
        doc.chips.push(ChipHit {
            index: i,
            row: chip_row,
            start: col,
            end: col + chip_width,
        });
        spans.push(Span::raw(" "));
        col += chip_width + 1;
    }
    lines.push(Line::from(spans));
    lines.push(Line::default());

    // Search row
    let search_row = lines.len() as u16;
    let editing = app.input_mode == InputMode::Search;
    let query = match editing {
        true => app.search_input.as_str(),
        false => app.filter.query(),
    };
    let mut spans = vec![
        Span::styled("Search: ", muted),
        Span::styled(query.to_string(), body),
    ];
    if editing {
        spans.push(Span::styled("█", Style::default().fg(palette.accent)));
    } else if query.is_empty() {
        spans.push(Span::styled("press / to search titles", muted));
    }
    lines.push(Line::from(spans));
    doc.search_row = Some(search_row);
    lines.push(Line::default());

    // Cards, visible ones only
    if app.filter.visible_count() == 0 {
        lines.push(Line::from(Span::styled(
            "No projects match.",
            muted.add_modifier(Modifier::ITALIC),
        )));
    }
    for (i, project) in app.content.projects().iter().enumerate() {
        if !app.filter.is_visible(i) {
            continue;
        }
        let card_top = lines.len() as u16;
        let selected = app.selected_project == Some(i);

        let marker = match selected {
            true => "▶ ",
            false => "  ",
        };
        let title_style = match selected {
            true => Style::default()
                .bg(palette.selection_bg)
                .fg(palette.selection_fg)
                .add_modifier(Modifier::BOLD),
            false => Style::default()
                .fg(palette.heading)
                .add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(palette.accent)),
            Span::styled(project.title.clone(), title_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", project.tech),
            muted.add_modifier(Modifier::ITALIC),
        )));
        for row in wrap_text(&project.blurb, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(format!("  {}", row), body)));
        }
        if let Some(link) = &project.link {
            lines.push(Line::from(Span::styled(
                format!("  ↗ {}", link),
                Style::default().fg(palette.accent),
            )));
        }

        doc.projects.push(ProjectHit {
            index: i,
            top: card_top,
            height: lines.len() as u16 - card_top,
        });
        lines.push(Line::default());
    }
}

fn build_contact(
    app: &App,
    doc: &mut PageDoc,
    lines: &mut Vec<Line<'static>>,
    width: u16,
    intro: &str,
) {
    let palette = &app.palette;
    let muted = Style::default().fg(palette.muted);
    let body = Style::default().fg(palette.foreground);

    for row in wrap_text(intro, width) {
        lines.push(Line::from(Span::styled(row, body)));
    }
    lines.push(Line::default());

    let editing = app.input_mode == InputMode::Form;
    for field in [FormField::Name, FormField::Email, FormField::Message] {
        let row = lines.len() as u16;
        let focused = editing && app.form.focused() == field;
        let label_style = match focused {
            true => Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
            false => muted,
        };
        let mut spans = vec![
            Span::styled(format!("{:>8}: ", field.label()), label_style),
            Span::styled(app.form.field(field).to_string(), body),
        ];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(palette.accent)));
        }
        lines.push(Line::from(spans));
        doc.form_rows.push((field, row));
    }
    lines.push(Line::default());

    let hint = match editing {
        true => "Enter sends · Tab moves · Esc leaves the form",
        false => "Press f to write a message",
    };
    lines.push(Line::from(Span::styled(hint, muted)));

    if let Some(status) = app.form.status() {
        let color = match status.tone {
            StatusTone::Ok => palette.ok,
            StatusTone::Err => palette.alert,
        };
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(color),
        )));
    }
}

pub fn draw(app: &mut App, f: &mut Frame) {
    let start = std::time::Instant::now();
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    let padding = app.config.ui.padding;
    let page_block = Block::default()
        .style(Style::default().bg(app.palette.background))
        .padding(Padding::new(
            padding.horizontal,
            padding.horizontal,
            padding.vertical,
            padding.vertical,
        ));
    let inner = page_block.inner(chunks[1]);

    app.chrome = ChromeHits::default();
    app.chrome.page_inner = Some(inner);
    app.refresh_layout(inner.width, inner.height);

    f.render_widget(page_block, chunks[1]);
    render_page(app, f, inner);
    render_top_bar(app, f, chunks[0]);
    render_status_bar(app, f, chunks[2]);

    if app.notification.is_some() {
        render_notification(app, f, area);
    }
    if app.show_help {
        render_help_overlay(app, f, area);
    }
    if app.modal.is_visible() {
        render_modal(app, f, area);
    }

    if app.config.logging.enable_performance_metrics && cfg!(debug_assertions) {
        tracing::debug!(elapsed = ?start.elapsed(), "render.draw");
    }
}

fn render_page(app: &App, f: &mut Frame, inner: Rect) {
    let paragraph = Paragraph::new(app.page.lines.clone())
        .style(
            Style::default()
                .fg(app.palette.foreground)
                .bg(app.palette.background),
        )
        .scroll((app.scroll_offset, 0));
    f.render_widget(paragraph, inner);
}

fn render_top_bar(app: &mut App, f: &mut Frame, area: Rect) {
    let base = Style::default()
        .bg(app.palette.selection_bg)
        .fg(app.palette.selection_fg);

    let mut spans: Vec<Span> = Vec::new();
    let mut col = area.x;

    let title = format!(" {} ", app.content.site_title);
    col += title.chars().count() as u16;
    spans.push(Span::styled(title, base.add_modifier(Modifier::BOLD)));

    for (i, entry) in app.nav.entries().iter().enumerate() {
        let text = format!(" {} ", entry.label);
        let entry_width = text.chars().count() as u16;
        let style = match entry.active {
            true => base.add_modifier(Modifier::REVERSED | Modifier::BOLD),
            false => base,
        };
        spans.push(Span::styled(text, style));
        app.chrome.nav.push((
            i,
            Rect {
                x: col,
                y: area.y,
                width: entry_width,
                height: 1,
            },
        ));
        col += entry_width;
    }

    // Theme toggle glyph pinned to the right edge
    let glyph = format!(" {} ", app.theme.indicator());
    let glyph_width = glyph.chars().count() as u16;
    let glyph_x = area.x + area.width.saturating_sub(glyph_width);
    if glyph_x >= col {
        spans.push(Span::styled(" ".repeat((glyph_x - col) as usize), base));
        spans.push(Span::styled(glyph, base.add_modifier(Modifier::BOLD)));
        app.chrome.theme_toggle = Some(Rect {
            x: glyph_x,
            y: area.y,
            width: glyph_width,
            height: 1,
        });
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}

fn render_status_bar(app: &mut App, f: &mut Frame, area: Rect) {
    let base = Style::default()
        .bg(app.palette.selection_bg)
        .fg(app.palette.selection_fg);

    let text = match app.config.accessibility.verbose_status {
        true => get_verbose_status(app),
        false => parse_status_bar_format(app),
    };
    let text = format!(" {}", text);
    let used = text.chars().count() as u16;
    let mut spans = vec![Span::styled(text, base)];

    if app.show_top_button {
        let label = " ↑ Top ";
        let label_width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(label_width);
        if x >= area.x + used {
            spans.push(Span::styled(
                " ".repeat((x - area.x - used) as usize),
                base,
            ));
            spans.push(Span::styled(
                label,
                base.add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ));
            app.chrome.top_button = Some(Rect {
                x,
                y: area.y,
                width: label_width,
                height: 1,
            });
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}

fn active_section_label(app: &App) -> Option<&str> {
    app.nav
        .entries()
        .iter()
        .find(|e| e.active)
        .map(|e| e.label.as_str())
}

fn active_chip_token(app: &App) -> &str {
    app.filter
        .active_chip()
        .map(|i| app.filter.chips()[i].token.as_str())
        .unwrap_or(crate::internal::filter::FILTER_ALL)
}

/// Expand the configured status template, or fall back to the built-in
/// layout when none is set.
fn parse_status_bar_format(app: &App) -> String {
    let format = &app.config.ui.status_bar_format;
    if format.is_empty() {
        return default_status(app);
    }

    format
        .replace("{section}", active_section_label(app).unwrap_or("·"))
        .replace("{theme}", &app.theme.to_string())
        .replace("{filter}", active_chip_token(app))
        .replace("{query}", app.filter.query().trim())
        .replace("{shown}", &app.filter.visible_count().to_string())
        .replace("{total}", &app.content.projects().len().to_string())
        .replace("{year}", &current_year().to_string())
        .replace("{version}", &app.app_version)
        .replace("{shortcuts}", "? help · q quit")
}

fn default_status(app: &App) -> String {
    let section = active_section_label(app).unwrap_or("·");
    let shown = app.filter.visible_count();
    let total = app.content.projects().len();
    let query = app.filter.query().trim();

    let filter_desc = match query.is_empty() {
        true => format!("filter {}", active_chip_token(app)),
        false => format!("search \"{}\"", query),
    };

    format!(
        "{} · {} · {}/{} projects · ? help · q quit",
        section, filter_desc, shown, total
    )
}

/// Full sentences for screen-reader friendly terminals.
fn get_verbose_status(app: &App) -> String {
    let mut out = match active_section_label(app) {
        Some(label) => format!("Viewing the {} section. ", label),
        None => "Viewing the page. ".to_string(),
    };
    out.push_str(&format!("Theme is {}. ", app.theme));

    let shown = app.filter.visible_count();
    let total = app.content.projects().len();
    let query = app.filter.query().trim();
    if query.is_empty() {
        out.push_str(&format!(
            "Filter {} shows {} of {} projects. ",
            active_chip_token(app),
            shown,
            total
        ));
    } else {
        out.push_str(&format!(
            "Search \"{}\" shows {} of {} projects. ",
            query, shown, total
        ));
    }

    out.push_str("Press question mark for help.");
    out
}

fn render_notification(app: &App, f: &mut Frame, area: Rect) {
    let Some(notice) = &app.notification else {
        return;
    };

    let width = (notice.text().chars().count() as u16 + 4).min(area.width.saturating_sub(2));
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(5),
        width,
        height: 3,
    }
    .intersection(area);

    let color = match notice.kind() {
        NoticeKind::Info => app.palette.accent,
        NoticeKind::Error => app.palette.alert,
    };

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(notice.text())
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(color)))
            .style(Style::default().fg(color).bg(app.palette.background)),
        popup,
    );
}

fn render_help_overlay(app: &App, f: &mut Frame, area: Rect) {
    let entries: &[(&str, &str)] = &[
        ("j / k", "scroll"),
        ("PgUp / PgDn", "page up / down"),
        ("g / G", "top / bottom"),
        ("1-6", "jump to a section"),
        ("c / C", "cycle filter chips"),
        ("/", "search project titles"),
        ("Q", "clear the search"),
        ("n / N", "next / previous project"),
        ("o", "open the project link"),
        ("f", "go to the contact form"),
        ("t", "toggle light / dark"),
        ("?", "this help"),
        ("q", "quit"),
    ];

    let rows: Vec<Line> = entries
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>12}", key),
                    Style::default()
                        .fg(app.palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", what), Style::default().fg(app.palette.foreground)),
            ])
        })
        .collect();

    let width = 44.min(area.width.saturating_sub(2));
    let height = (rows.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect(width, height, area);

    let block = Block::bordered()
        .title(" Help ")
        .border_style(Style::default().fg(app.palette.border))
        .style(Style::default().bg(app.palette.background));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(rows).block(block), popup);
}

fn render_modal(app: &mut App, f: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(4).min(58);
    let body_rows = wrap_text(app.modal.body(), width.saturating_sub(6));
    let height = (body_rows.len() as u16 + 5).min(area.height.saturating_sub(2));
    let dialog = centered_rect(width, height, area);

    let mut text: Vec<Line> = Vec::with_capacity(body_rows.len() + 3);
    text.push(Line::default());
    for row in body_rows {
        text.push(Line::from(Span::styled(
            row,
            Style::default().fg(app.palette.foreground),
        )));
    }
    text.push(Line::default());
    text.push(
        Line::from(Span::styled(
            "Enter or Esc closes",
            Style::default().fg(app.palette.muted),
        ))
        .right_aligned(),
    );

    let block = Block::bordered()
        .title(format!(" {} ", app.modal.title()))
        .title_top(Line::from(" ✕ ").right_aligned())
        .border_style(Style::default().fg(app.palette.accent))
        .padding(Padding::new(2, 2, 0, 0))
        .style(
            Style::default()
                .bg(app.palette.background)
                .fg(app.palette.foreground),
        );

    f.render_widget(Clear, dialog);
    f.render_widget(Paragraph::new(text).block(block), dialog);

    app.chrome.modal_body = Some(dialog);
    app.chrome.modal_close = Some(Rect {
        x: (dialog.x + dialog.width).saturating_sub(4),
        y: dialog.y,
        width: 3,
        height: 1,
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
