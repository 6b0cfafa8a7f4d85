//! App - The page, the theme and the contact form behind one command loop.
//!
//! Everything runs on the UI thread except the relay request, which is
//! handed to a worker thread and reported back over a channel drained by
//! [`App::poll_relay`].
//!
//! One effect watches the scroll offset, the reveal count, the color scheme
//! and the send status, and marks the screen dirty when any of them changes.
//! [`App::draw`] only paints when the screen is dirty or an entrance is
//! still playing.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use spark_signals::effect;

use crate::config::PageConfig;
use crate::contact::{ContactClient, ContactForm, SendStatus};
use crate::content::SectionId;
use crate::error::{FolioError, RelayError, SubmitError};
use crate::pipeline::MountedPage;
use crate::renderer::{paint_form, paint_page, FormView, Header, Line};
use crate::state::input::{Mode, PageCommand};
use crate::state::scroll::{next_section, previous_section};
use crate::theme::ThemeToggle;

/// Status shown in the form when no relay is configured.
pub const OFFLINE_NOTICE: &str = "Offline: messages cannot be sent from this session.";

type RelayOutcome = Result<(), RelayError>;

/// The running application.
pub struct App {
    page: MountedPage,
    theme: ThemeToggle,
    contact: Option<ContactClient>,
    mode: Mode,
    scroll_step: i32,
    problem: Option<String>,
    relay_tx: Sender<RelayOutcome>,
    relay_rx: Receiver<RelayOutcome>,
    running: bool,
    dirty: Rc<Cell<bool>>,
    animating: bool,
    stop_watch: Option<Box<dyn FnOnce()>>,
}

impl App {
    /// `contact` is None when running offline.
    pub fn new(
        page: MountedPage,
        theme: ThemeToggle,
        contact: Option<ContactClient>,
        config: &PageConfig,
    ) -> Self {
        let (relay_tx, relay_rx) = mpsc::channel();
        let dirty = Rc::new(Cell::new(true));
        let stop_watch = watch(&page, &theme, contact.as_ref(), dirty.clone());
        Self {
            page,
            theme,
            contact,
            mode: Mode::Browse,
            scroll_step: config.scroll_step.max(1),
            problem: None,
            relay_tx,
            relay_rx,
            running: true,
            dirty,
            animating: false,
            stop_watch: Some(stop_watch),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn page(&self) -> &MountedPage {
        &self.page
    }

    pub fn theme(&self) -> &ThemeToggle {
        &self.theme
    }

    pub fn contact(&self) -> Option<&ContactClient> {
        self.contact.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last validation problem, cleared by the next edit.
    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    /// Apply one command at time `now`.
    pub fn handle(&mut self, command: PageCommand, now: Duration) -> Result<(), FolioError> {
        use PageCommand::*;

        // Mode, form text and size are plain state; the effect covers the rest.
        let plain = matches!(
            command,
            OpenForm | CloseForm | Insert(_) | DeleteBack | NextField | PreviousField
        );
        if plain || matches!(command, Submit | Resize(..)) {
            self.dirty.set(true);
        }

        match command {
            ScrollBy(delta) => {
                self.page.scroll_by(delta.saturating_mul(self.scroll_step), now);
            }
            PageDown => {
                self.page.page_down(now);
            }
            PageUp => {
                self.page.page_up(now);
            }
            Top => {
                self.page.scroll_to(0, now);
            }
            Bottom => {
                self.page.scroll_to(self.page.scroll().max(), now);
            }
            NextSection => {
                if let Some(id) = next_section(self.page.current_section()) {
                    self.page.scroll_to_section(id, now);
                }
            }
            PreviousSection => {
                if let Some(id) = previous_section(self.page.current_section()) {
                    self.page.scroll_to_section(id, now);
                }
            }
            JumpTo(id) => {
                self.page.scroll_to_section(id, now);
            }
            ToggleTheme => {
                let scheme = self.theme.toggle();
                log::debug!("theme set to {scheme}");
            }
            FollowSystemTheme => self.theme.clear_override(),
            OpenForm => {
                self.page.scroll_to_section(SectionId::Contact, now);
                self.mode = Mode::Form;
            }
            CloseForm => {
                self.mode = Mode::Browse;
                self.problem = None;
            }
            Insert(c) => self.edit(|form| form.push_char(c)),
            DeleteBack => self.edit(|form| {
                form.pop_char();
            }),
            NextField => self.edit(ContactForm::focus_next),
            PreviousField => self.edit(ContactForm::focus_previous),
            Submit => self.submit(),
            Resize(width, height) => self.page.resize(width, height, now)?,
            Quit => self.running = false,
        }
        Ok(())
    }

    fn edit(&mut self, apply: impl FnOnce(&mut ContactForm)) {
        if let Some(form) = self.contact.as_mut().and_then(ContactClient::form_mut) {
            apply(form);
            self.problem = None;
        }
    }

    fn submit(&mut self) {
        let Some(contact) = self.contact.as_mut() else {
            log::debug!("submit ignored while offline");
            return;
        };

        match contact.begin() {
            Ok(pending) => {
                self.problem = None;
                let tx = self.relay_tx.clone();
                thread::spawn(move || {
                    // The app may have quit; nobody is left to tell.
                    let _ = tx.send(pending.send());
                });
            }
            Err(SubmitError::Validation(err)) => self.problem = Some(err.to_string()),
            Err(err) => log::debug!("submit ignored: {err}"),
        }
    }

    /// Apply any finished relay requests. Returns how many were applied.
    pub fn poll_relay(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.relay_rx.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Block up to `timeout` for one relay result.
    pub fn wait_relay(&mut self, timeout: Duration) -> bool {
        match self.relay_rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    fn apply_outcome(&mut self, outcome: RelayOutcome) {
        if let Some(contact) = self.contact.as_mut() {
            // Failures are logged by the client and shown as its status.
            let _ = contact.finish(outcome);
        }
    }

    /// Whether an entrance is still playing at `now`.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.page.frame(now).animating
    }

    /// Whether the next [`App::draw`] would paint.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get() || self.animating
    }

    /// The screen at `now`, or None when it cannot differ from the last one.
    ///
    /// A frame is painted while anything animates and once more after the
    /// last entrance settles.
    pub fn draw(&mut self, now: Duration) -> Option<Vec<Line>> {
        let animating = self.is_animating(now);
        if !self.is_dirty() && !animating {
            return None;
        }
        self.dirty.set(false);
        self.animating = animating;
        Some(self.render(now))
    }

    /// Draw the whole screen at `now`.
    pub fn render(&self, now: Duration) -> Vec<Line> {
        let frame = self.page.frame(now);
        let palette = self.theme.palette();
        let header = Header::new(self.page.spec().owner.clone(), self.theme.scheme());
        let mut canvas = paint_page(&frame, self.page.spec(), &palette, &header);

        if self.mode == Mode::Form {
            let blank = ContactForm::new();
            let (form, status) = match &self.contact {
                Some(contact) => (contact.form(), contact.status()),
                None => (&blank, SendStatus::Idle),
            };
            let view = FormView {
                form,
                status: &status,
                problem: self.problem.as_deref(),
                notice: self.contact.is_none().then_some(OFFLINE_NOTICE),
            };
            paint_form(&mut canvas, &view, &palette);
        }

        canvas.into_lines()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_watch.take() {
            stop();
        }
    }
}

/// Effect that sets `dirty` whenever a watched signal changes.
fn watch(
    page: &MountedPage,
    theme: &ThemeToggle,
    contact: Option<&ContactClient>,
    dirty: Rc<Cell<bool>>,
) -> Box<dyn FnOnce()> {
    let offset = page.scroll().offset_signal();
    let revealed = page.revealed_signal();
    let scheme = theme.scheme_signal();
    let status = contact.map(ContactClient::status_signal);

    Box::new(effect(move || {
        offset.get();
        revealed.get();
        scheme.get();
        if let Some(status) = &status {
            status.get();
        }
        dirty.set(true);
    }))
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("mode", &self.mode)
            .field("scheme", &self.theme.scheme())
            .field("contact", &self.contact)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::contact::{ContactField, ContactSubmission, RelayTransport};
    use crate::content::{portfolio, ElementKey};
    use crate::pipeline::mount;
    use crate::state::observer::reset_observers;
    use crate::theme::{ColorScheme, ColorSchemeQuery};

    struct Accepting;

    impl RelayTransport for Accepting {
        fn send(&self, _submission: &ContactSubmission) -> Result<(), RelayError> {
            Ok(())
        }
    }

    fn setup(contact: bool) -> App {
        reset_observers();
        let page = mount(portfolio(), (80, 24), Duration::ZERO).unwrap();
        let theme = ThemeToggle::mount(ColorSchemeQuery::new(false));
        let client = contact.then(|| ContactClient::new(Arc::new(Accepting)));
        App::new(page, theme, client, &PageConfig::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle(PageCommand::Insert(c), Duration::ZERO).unwrap();
        }
    }

    #[test]
    fn test_open_form_jumps_to_contact() {
        let mut app = setup(true);
        app.handle(PageCommand::OpenForm, Duration::from_secs(1)).unwrap();
        assert_eq!(app.mode(), Mode::Form);
        assert!(app.page().is_revealed(ElementKey::title(SectionId::Contact)));
        app.handle(PageCommand::CloseForm, Duration::from_secs(2)).unwrap();
        assert_eq!(app.mode(), Mode::Browse);
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut app = setup(true);
        app.handle(PageCommand::OpenForm, Duration::ZERO).unwrap();
        type_text(&mut app, "Ada");
        app.handle(PageCommand::NextField, Duration::ZERO).unwrap();
        type_text(&mut app, "ada@example.comx");
        app.handle(PageCommand::DeleteBack, Duration::ZERO).unwrap();

        let form = app.contact().unwrap().form();
        assert_eq!(form.get(ContactField::Name), "Ada");
        assert_eq!(form.get(ContactField::Email), "ada@example.com");
        assert_eq!(form.focus(), ContactField::Email);
    }

    #[test]
    fn test_submit_runs_on_worker() {
        let mut app = setup(true);
        app.handle(PageCommand::OpenForm, Duration::ZERO).unwrap();
        type_text(&mut app, "Ada");
        app.handle(PageCommand::NextField, Duration::ZERO).unwrap();
        type_text(&mut app, "ada@example.com");
        app.handle(PageCommand::NextField, Duration::ZERO).unwrap();
        type_text(&mut app, "Hello");
        app.handle(PageCommand::Submit, Duration::ZERO).unwrap();

        assert!(app.contact().unwrap().is_sending());
        assert!(app.wait_relay(Duration::from_secs(5)));
        let contact = app.contact().unwrap();
        assert_eq!(contact.status(), SendStatus::Sent);
        assert!(contact.form().is_empty());
    }

    #[test]
    fn test_invalid_submit_shows_problem() {
        let mut app = setup(true);
        app.handle(PageCommand::OpenForm, Duration::ZERO).unwrap();
        app.handle(PageCommand::Submit, Duration::ZERO).unwrap();
        assert_eq!(app.problem(), Some("Name is required"));
        assert_eq!(app.contact().unwrap().status(), SendStatus::Idle);

        type_text(&mut app, "A");
        assert_eq!(app.problem(), None);
    }

    #[test]
    fn test_offline_form_shows_notice() {
        let mut app = setup(false);
        app.handle(PageCommand::OpenForm, Duration::ZERO).unwrap();
        type_text(&mut app, "ignored");
        app.handle(PageCommand::Submit, Duration::ZERO).unwrap();
        assert_eq!(app.poll_relay(), 0);

        let lines = app.render(Duration::ZERO);
        assert!(lines.iter().any(|l| l.text().contains(OFFLINE_NOTICE)));
    }

    #[test]
    fn test_toggle_theme_command() {
        let mut app = setup(true);
        assert_eq!(app.theme().scheme(), ColorScheme::Light);
        app.handle(PageCommand::ToggleTheme, Duration::ZERO).unwrap();
        assert_eq!(app.theme().scheme(), ColorScheme::Dark);
        assert!(app.theme().is_overridden());
        app.handle(PageCommand::FollowSystemTheme, Duration::ZERO).unwrap();
        assert_eq!(app.theme().scheme(), ColorScheme::Light);
    }

    #[test]
    fn test_section_navigation() {
        let mut app = setup(true);
        app.handle(PageCommand::NextSection, Duration::ZERO).unwrap();
        assert_eq!(app.page().current_section(), SectionId::About);
        app.handle(PageCommand::JumpTo(SectionId::Skills), Duration::ZERO).unwrap();
        assert_eq!(app.page().current_section(), SectionId::Skills);
        app.handle(PageCommand::PreviousSection, Duration::ZERO).unwrap();
        assert_eq!(app.page().current_section(), SectionId::Education);
    }

    /// Draw at `now` and again a minute later, when every entrance has
    /// settled. Returns the later time.
    fn settle(app: &mut App, now: Duration) -> Duration {
        app.draw(now);
        let later = now + Duration::from_secs(60);
        app.draw(later);
        later
    }

    #[test]
    fn test_draw_skips_unchanged_screen() {
        let mut app = setup(true);
        let t = settle(&mut app, Duration::ZERO);
        assert!(!app.is_dirty());
        assert!(app.draw(t).is_none());

        app.handle(PageCommand::ScrollBy(1), t).unwrap();
        assert!(app.is_dirty());
        assert!(app.draw(t).is_some());
        let t = settle(&mut app, t);
        assert!(app.draw(t).is_none());

        app.handle(PageCommand::ToggleTheme, t).unwrap();
        assert!(app.draw(t).is_some());
        assert!(app.draw(t).is_none());
    }

    #[test]
    fn test_draw_follows_os_preference() {
        reset_observers();
        let os = ColorSchemeQuery::new(false);
        let page = mount(portfolio(), (80, 24), Duration::ZERO).unwrap();
        let theme = ThemeToggle::mount(os.clone());
        let mut app = App::new(page, theme, None, &PageConfig::default());
        let t = settle(&mut app, Duration::ZERO);
        assert!(app.draw(t).is_none());

        os.set_prefers_dark(true);
        assert!(app.is_dirty());
        assert!(app.draw(t).is_some());
    }

    #[test]
    fn test_draw_paints_until_entrance_settles() {
        let mut app = setup(true);
        let mut t = settle(&mut app, Duration::ZERO);
        app.handle(PageCommand::JumpTo(SectionId::Skills), t).unwrap();

        assert!(app.draw(t).is_some());
        while app.is_animating(t) {
            t += Duration::from_millis(100);
            assert!(app.draw(t).is_some());
        }
        assert!(app.draw(t + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_relay_result_marks_dirty() {
        let mut app = setup(true);
        app.handle(PageCommand::OpenForm, Duration::ZERO).unwrap();
        type_text(&mut app, "Ada");
        app.handle(PageCommand::NextField, Duration::ZERO).unwrap();
        type_text(&mut app, "ada@example.com");
        app.handle(PageCommand::NextField, Duration::ZERO).unwrap();
        type_text(&mut app, "Hello");
        app.handle(PageCommand::Submit, Duration::ZERO).unwrap();

        let t = settle(&mut app, Duration::ZERO);
        assert!(app.draw(t).is_none());
        assert!(app.wait_relay(Duration::from_secs(5)));
        assert!(app.draw(t).is_some());
    }

    #[test]
    fn test_quit() {
        let mut app = setup(true);
        app.handle(PageCommand::Quit, Duration::ZERO).unwrap();
        assert!(!app.is_running());
    }
}
