use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tui_portfolio::config::AppConfig;
use tui_portfolio::content::PageContent;
use tui_portfolio::internal::contact::{FormPhase, SEND_DELAY};
use tui_portfolio::internal::prefs::PrefStore;
use tui_portfolio::internal::ui::app::{Action, App, InputMode};
use tui_portfolio::utils::theme::Theme;

fn fresh_app(name: &str) -> App {
    let path = std::env::temp_dir().join(name);
    let _ = std::fs::remove_file(&path);
    let prefs = PrefStore::with_path(path);
    prefs.set_theme(Theme::Dark);
    App::with_parts(AppConfig::default(), PageContent::default(), prefs)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key_event(KeyEvent::from(KeyCode::Char(c)));
    }
}

fn fill_form(app: &mut App, name: &str, email: &str, message: &str) {
    app.handle_action(Action::FocusForm);
    assert_eq!(app.input_mode, InputMode::Form);

    type_text(app, name);
    app.handle_key_event(KeyEvent::from(KeyCode::Tab));
    type_text(app, email);
    app.handle_key_event(KeyEvent::from(KeyCode::Tab));
    type_text(app, message);
}

#[tokio::test(start_paused = true)]
async fn a_valid_submission_confirms_after_the_send_delay() {
    let mut app = fresh_app("behavior_submit.json");

    fill_form(
        &mut app,
        "Ann",
        "ann@example.com",
        "Saw the clock-drift monitor, let's talk.",
    );
    app.handle_key_event(KeyEvent::from(KeyCode::Enter));

    assert_eq!(app.form.phase(), FormPhase::Sending);
    assert_eq!(app.form.status().unwrap().text, "Sending…");
    assert!(!app.modal.is_visible());

    // Just short of the delay, nothing has arrived yet.
    tokio::time::advance(SEND_DELAY - Duration::from_millis(1)).await;
    assert!(app.action_rx.try_recv().is_err());

    let action = app.action_rx.recv().await.expect("confirmation action");
    app.handle_action(action);

    assert_eq!(app.form.phase(), FormPhase::Sent);
    assert!(app.modal.is_visible());
    assert_eq!(app.modal.title(), "Message sent");
    insta::assert_snapshot!(
        app.modal.body(),
        @"Thanks Ann — your message was received. I'll reach out to ann@example.com soon."
    );

    // The confirmation cleared the fields for the next visitor.
    assert!(app.form.name.is_empty());
    assert!(app.form.email.is_empty());
    assert!(app.form.message.is_empty());
}

#[tokio::test(start_paused = true)]
async fn overlapping_submissions_each_confirm() {
    let mut app = fresh_app("behavior_overlap.json");

    fill_form(&mut app, "Ann", "ann@example.com", "hello");
    app.handle_key_event(KeyEvent::from(KeyCode::Enter));
    // A second Enter while the first send is in flight starts another timer.
    app.handle_key_event(KeyEvent::from(KeyCode::Enter));

    let first = app.action_rx.recv().await.expect("first confirmation");
    let second = app.action_rx.recv().await.expect("second confirmation");
    assert!(matches!(first, Action::SendElapsed(_)));
    assert!(matches!(second, Action::SendElapsed(_)));

    app.handle_action(first);
    app.handle_action(second);

    assert_eq!(app.form.phase(), FormPhase::Sent);
    assert!(app.modal.is_visible());
}

#[tokio::test(start_paused = true)]
async fn invalid_input_never_schedules_a_send() {
    let mut app = fresh_app("behavior_invalid.json");

    fill_form(&mut app, "Ann", "", "");
    app.handle_key_event(KeyEvent::from(KeyCode::Enter));
    assert_eq!(app.form.phase(), FormPhase::Invalid);
    assert_eq!(app.form.status().unwrap().text, "Please fill all fields.");

    type_text(&mut app, "hi");
    app.handle_key_event(KeyEvent::from(KeyCode::BackTab));
    type_text(&mut app, "not-an-email");
    app.handle_key_event(KeyEvent::from(KeyCode::Enter));
    assert_eq!(app.form.status().unwrap().text, "Please enter a valid email.");

    // No timer was started by either rejection.
    tokio::time::advance(SEND_DELAY * 2).await;
    assert!(app.action_rx.try_recv().is_err());
    assert!(!app.modal.is_visible());
}

#[tokio::test(start_paused = true)]
async fn the_hero_banner_types_through_the_action_channel() {
    let mut app = fresh_app("behavior_typing.json");
    assert!(app.typing.enabled());
    assert_eq!(app.typing.text(), "");

    app.handle_action(Action::TypingTick);
    assert_eq!(app.typing.text(), "D");

    // Each step schedules the next one.
    for _ in 0..3 {
        let action = app.action_rx.recv().await.expect("next tick");
        app.handle_action(action);
    }
    assert_eq!(app.typing.text(), "Deve");
}

#[tokio::test(start_paused = true)]
async fn the_quit_binding_stops_the_app() {
    let mut app = fresh_app("behavior_quit.json");
    assert!(app.running);

    app.handle_key_event(KeyEvent::from(KeyCode::Char('q')));
    let action = app.action_rx.recv().await.expect("bound action");
    app.handle_action(action);

    assert!(!app.running);
}

#[test]
fn the_theme_choice_survives_a_restart() {
    let path = std::env::temp_dir().join("behavior_theme.json");
    let _ = std::fs::remove_file(&path);

    let chosen = {
        let mut app = App::with_parts(
            AppConfig::default(),
            PageContent::default(),
            PrefStore::with_path(path.clone()),
        );
        app.handle_action(Action::ToggleTheme);
        app.theme
    };

    // A fresh session over the same store sees the persisted choice, not
    // the system default.
    let reopened = App::with_parts(
        AppConfig::default(),
        PageContent::default(),
        PrefStore::with_path(path.clone()),
    );
    assert_eq!(reopened.theme, chosen);

    let _ = std::fs::remove_file(path);
}
