use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

/// Simulated network latency between submit and the confirmation.
pub const SEND_DELAY: Duration = Duration::from_millis(900);

/// Shape check only: one or more non-space, `@`, non-space, `.`, non-space.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email shape pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    Invalid,
    Sending,
    Sent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Message,
            Self::Message => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Message => Self::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Ok,
    Err,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub text: String,
    pub tone: StatusTone,
}

/// Payload captured at submit time. The delayed confirmation uses these
/// values even if the fields change while the send is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub name: String,
    pub email: String,
}

/// The simulated contact form.
///
/// Submission validates presence first, then the email shape, and on
/// success enters `Sending`. There is no real transport: the caller waits
/// out [`SEND_DELAY`] and feeds the request back via [`complete_send`],
/// which produces the confirmation. Nothing de-duplicates overlapping
/// sends; a submit during `Sending` starts another timer and each fires.
///
/// [`complete_send`]: ContactForm::complete_send
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    focused: FormField,
    phase: FormPhase,
    status: Option<FormStatus>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            focused: FormField::Name,
            phase: FormPhase::Empty,
            status: None,
        }
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    pub fn focused(&self) -> FormField {
        self.focused
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focused {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        }
    }

    /// Validate and, when everything checks out, begin the simulated send.
    /// Returns the request the caller should complete after [`SEND_DELAY`].
    pub fn submit(&mut self) -> Option<SendRequest> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let message = self.message.trim().to_string();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            self.phase = FormPhase::Invalid;
            self.set_status("Please fill all fields.", StatusTone::Err);
            return None;
        }

        if !EMAIL_SHAPE.is_match(&email) {
            self.phase = FormPhase::Invalid;
            self.set_status("Please enter a valid email.", StatusTone::Err);
            debug!(email, "Rejected malformed email");
            return None;
        }

        self.phase = FormPhase::Sending;
        self.set_status("Sending…", StatusTone::Ok);
        info!(name, "Simulated send started");

        Some(SendRequest {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Finish a simulated send: post the thank-you, clear the fields, and
    /// hand back modal content for the confirmation.
    pub fn complete_send(&mut self, request: &SendRequest) -> (String, String) {
        self.phase = FormPhase::Sent;
        self.set_status(
            &format!(
                "Thanks {}! Message received. I'll reply to {}.",
                request.name, request.email
            ),
            StatusTone::Ok,
        );

        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.focused = FormField::Name;
        info!(name = %request.name, "Simulated send completed");

        (
            "Message sent".to_string(),
            format!(
                "Thanks {} — your message was received. I'll reach out to {} soon.",
                request.name, request.email
            ),
        )
    }

    fn set_status(&mut self, text: &str, tone: StatusTone) {
        self.status = Some(FormStatus {
            text: text.to_string(),
            tone,
        });
    }
}
