//! Contact Relay Client - Form, validation and send status
//!
//! Three required fields are collected, validated like a browser form and
//! handed to a [`RelayTransport`] as one request. The status moves
//! `Idle → Sending → {Sent | Failed}`:
//!
//! - **Sent** clears every field.
//! - **Failed** keeps them so the user can resubmit.
//!
//! Nothing retries automatically.
//!
//! Sending is split in three steps so the request can leave the UI thread:
//! [`ContactClient::begin`] validates and flips to `Sending`,
//! [`PendingSubmission::send`] performs the request anywhere, and
//! [`ContactClient::finish`] applies the outcome. [`ContactClient::submit`]
//! chains the three synchronously.

mod relay;

pub use relay::{EmailRelay, RelayTransport};

use std::fmt;
use std::sync::Arc;

use spark_signals::{signal, Signal};

use crate::error::{RelayError, SubmitError, ValidationError};

// =============================================================================
// FIELDS
// =============================================================================

/// One input of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContactField {
    #[default]
    Name,
    Email,
    Message,
}

impl ContactField {
    /// Tab order.
    pub const ORDER: [ContactField; 3] = [Self::Name, Self::Email, Self::Message];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }

    pub const fn next(&self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Message,
            Self::Message => Self::Name,
        }
    }

    pub const fn previous(&self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Message => Self::Email,
        }
    }

    /// Whether the field accepts line breaks.
    pub const fn is_multiline(&self) -> bool {
        matches!(self, Self::Message)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// FORM
// =============================================================================

/// What is sent: the three field values, email trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Entered values plus the focused field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    focus: ContactField,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    pub fn focus(&self) -> ContactField {
        self.focus
    }

    pub fn set_focus(&mut self, field: ContactField) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Type into the focused field. Line breaks only go into the message.
    pub fn push_char(&mut self, c: char) {
        if c == '\n' && !self.focus.is_multiline() {
            return;
        }
        if c.is_control() && c != '\n' {
            return;
        }
        let focus = self.focus;
        self.get_mut(focus).push(c);
    }

    /// Backspace in the focused field.
    pub fn pop_char(&mut self) -> Option<char> {
        let focus = self.focus;
        self.get_mut(focus).pop()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }

    /// Required-field check in tab order.
    ///
    /// Name and message must be non-empty. The email is trimmed, then must be
    /// non-empty and shaped like `local@domain`.
    pub fn validate(&self) -> Result<ContactSubmission, ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::Missing(ContactField::Name));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::Missing(ContactField::Email));
        }
        if !is_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.message.is_empty() {
            return Err(ValidationError::Missing(ContactField::Message));
        }

        Ok(ContactSubmission {
            name: self.name.clone(),
            email: email.to_string(),
            message: self.message.clone(),
        })
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

// =============================================================================
// SEND STATUS
// =============================================================================

/// Where the last submit stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SendStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    /// `reason` is for logs; users see the generic prompt.
    Failed { reason: String },
}

impl SendStatus {
    pub fn is_sending(&self) -> bool {
        matches!(self, Self::Sending)
    }

    /// Status line shown under the form, if any.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Sending => Some("Sending..."),
            Self::Sent => Some("Message sent successfully!"),
            Self::Failed { .. } => Some("Failed to send message. Please try again."),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// A validated submission on its way out. Owns everything it needs so it
/// can be moved to a worker thread.
pub struct PendingSubmission {
    submission: ContactSubmission,
    transport: Arc<dyn RelayTransport>,
}

impl PendingSubmission {
    pub fn submission(&self) -> &ContactSubmission {
        &self.submission
    }

    /// Issue the single outbound request.
    pub fn send(self) -> Result<(), RelayError> {
        self.transport.send(&self.submission)
    }
}

impl fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}

/// The contact form bound to a relay.
pub struct ContactClient {
    form: ContactForm,
    status: Signal<SendStatus>,
    transport: Arc<dyn RelayTransport>,
}

impl ContactClient {
    pub fn new(transport: Arc<dyn RelayTransport>) -> Self {
        Self {
            form: ContactForm::new(),
            status: signal(SendStatus::Idle),
            transport,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// The form for editing, or None while a request is in flight.
    pub fn form_mut(&mut self) -> Option<&mut ContactForm> {
        if self.is_sending() {
            return None;
        }
        Some(&mut self.form)
    }

    pub fn status(&self) -> SendStatus {
        self.status.get()
    }

    /// Reactive status.
    pub fn status_signal(&self) -> Signal<SendStatus> {
        self.status.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.status().is_sending()
    }

    /// Validate and move to `Sending`.
    ///
    /// Nothing changes when validation fails or a request is already in
    /// flight; no request may be issued in either case.
    pub fn begin(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.is_sending() {
            return Err(SubmitError::AlreadySending);
        }
        let submission = self.form.validate().inspect_err(|err| {
            log::debug!("contact form rejected: {err}");
        })?;

        log::info!("sending contact message from {}", submission.email);
        self.status.set(SendStatus::Sending);
        Ok(PendingSubmission {
            submission,
            transport: Arc::clone(&self.transport),
        })
    }

    /// Apply the outcome of a [`PendingSubmission::send`].
    ///
    /// Success clears the form; failure keeps it. The outcome is handed
    /// back unchanged. Outcomes arriving while not `Sending` are ignored.
    pub fn finish(&mut self, outcome: Result<(), RelayError>) -> Result<(), RelayError> {
        if !self.is_sending() {
            log::warn!("dropping relay outcome received outside of a send");
            return outcome;
        }

        match &outcome {
            Ok(()) => {
                log::info!("contact message sent");
                self.form.clear();
                self.status.set(SendStatus::Sent);
            }
            Err(err) => {
                log::warn!("contact message failed: {err}");
                self.status.set(SendStatus::Failed {
                    reason: err.to_string(),
                });
            }
        }
        outcome
    }

    /// begin, send and finish on the calling thread.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        let pending = self.begin()?;
        self.finish(pending.send())?;
        Ok(())
    }
}

impl fmt::Debug for ContactClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactClient")
            .field("form", &self.form)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every request and answers with a fixed outcome.
    #[derive(Default)]
    struct Recording {
        calls: AtomicUsize,
        last: Mutex<Option<ContactSubmission>>,
        fail_with: Option<u16>,
    }

    impl RelayTransport for Recording {
        fn send(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last.lock() {
                *last = Some(submission.clone());
            }
            match self.fail_with {
                None => Ok(()),
                Some(status) => Err(RelayError::Rejected {
                    status,
                    body: "nope".into(),
                }),
            }
        }
    }

    fn filled(client: &mut ContactClient) {
        let form = client.form_mut().unwrap();
        form.set(ContactField::Name, "Ada");
        form.set(ContactField::Email, "  ada@example.com ");
        form.set(ContactField::Message, "Hello");
    }

    #[test]
    fn test_field_cycle() {
        let mut form = ContactForm::new();
        assert_eq!(form.focus(), ContactField::Name);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus(), ContactField::Message);
        form.focus_next();
        assert_eq!(form.focus(), ContactField::Name);
        form.focus_previous();
        assert_eq!(form.focus(), ContactField::Message);
    }

    #[test]
    fn test_typing() {
        let mut form = ContactForm::new();
        for c in "Al\nx".chars() {
            form.push_char(c);
        }
        assert_eq!(form.name, "Alx");
        assert_eq!(form.pop_char(), Some('x'));
        form.set_focus(ContactField::Message);
        form.push_char('a');
        form.push_char('\n');
        assert_eq!(form.message, "a\n");
    }

    #[test]
    fn test_validation_order() {
        let mut form = ContactForm::new();
        assert_eq!(form.validate(), Err(ValidationError::Missing(ContactField::Name)));
        form.name = "Ada".into();
        form.email = "   ".into();
        assert_eq!(form.validate(), Err(ValidationError::Missing(ContactField::Email)));
        form.email = "ada".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
        form.email = "ada@example.com".into();
        assert_eq!(form.validate(), Err(ValidationError::Missing(ContactField::Message)));
        form.message = "hi".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b"));
        assert!(is_email("first.last@mail.example.org"));
        assert!(!is_email("@b"));
        assert!(!is_email("a@"));
        assert!(!is_email("a@b@c"));
        assert!(!is_email("a b@c"));
        assert!(!is_email("a@.com"));
    }

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::Missing(ContactField::Email);
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn test_submit_success_clears() {
        let relay = Arc::new(Recording::default());
        let mut client = ContactClient::new(relay.clone());
        filled(&mut client);

        client.submit().unwrap();
        assert_eq!(client.status(), SendStatus::Sent);
        assert!(client.form().is_empty());
        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
        let sent = relay.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.email, "ada@example.com");
    }

    #[test]
    fn test_submit_failure_retains() {
        let relay = Arc::new(Recording {
            fail_with: Some(500),
            ..Default::default()
        });
        let mut client = ContactClient::new(relay);
        filled(&mut client);
        let before = client.form().clone();

        let err = client.submit().unwrap_err();
        assert!(matches!(err, SubmitError::Relay(RelayError::Rejected { status: 500, .. })));
        assert!(matches!(client.status(), SendStatus::Failed { .. }));
        assert_eq!(client.form(), &before);
        assert_eq!(
            client.status().user_message(),
            Some("Failed to send message. Please try again.")
        );
    }

    #[test]
    fn test_invalid_form_never_sends() {
        let relay = Arc::new(Recording::default());
        let mut client = ContactClient::new(relay.clone());
        client.form_mut().unwrap().set(ContactField::Name, "Ada");

        assert!(matches!(client.submit(), Err(SubmitError::Validation(_))));
        assert_eq!(client.status(), SendStatus::Idle);
        assert_eq!(relay.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_single_flight() {
        let relay = Arc::new(Recording::default());
        let mut client = ContactClient::new(relay.clone());
        filled(&mut client);

        let pending = client.begin().unwrap();
        assert!(client.is_sending());
        assert!(client.form_mut().is_none());
        assert!(matches!(client.begin(), Err(SubmitError::AlreadySending)));

        client.finish(pending.send()).unwrap();
        assert_eq!(client.status(), SendStatus::Sent);
        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stray_outcome_ignored() {
        let mut client = ContactClient::new(Arc::new(Recording::default()));
        filled(&mut client);
        let _ = client.finish(Ok(()));
        assert_eq!(client.status(), SendStatus::Idle);
        assert!(!client.form().is_empty());
    }

    #[test]
    fn test_resubmit_after_failure() {
        let failing = Arc::new(Recording {
            fail_with: Some(503),
            ..Default::default()
        });
        let mut client = ContactClient::new(failing.clone());
        filled(&mut client);
        let _ = client.submit();
        let _ = client.submit();
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    }
}
