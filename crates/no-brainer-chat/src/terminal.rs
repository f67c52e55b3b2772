//! A [`Surface`] for line-based terminals.
//!
//! Nothing is drawn directly. The surface turns what the widget does into
//! [`TerminalEvent`]s, so the host decides when and where to print them.

use std::collections::HashSet;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard};

use no_brainer_chat_interface::{
    Bubble, BubbleKind, BubbleNode, Class, Element, Surface,
};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";

/// Output produced by a [`TerminalSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A complete line, already styled.
    Line(String),
    /// Text to append to the current line, for streamed answers.
    Delta(String),
    /// The loading indicator was switched on or off.
    Loading(bool),
}

type EventSink = Arc<dyn Fn(TerminalEvent) + Send + Sync>;

#[derive(Default)]
struct Screen {
    input_text: String,
    feedback: Vec<String>,
    classes: HashSet<(Element, Class)>,
    agent_name: String,
    removed: bool,
}

/// A surface that reports its output through a callback.
pub struct TerminalSurface {
    screen: Arc<Mutex<Screen>>,
    sink: EventSink,
}

impl TerminalSurface {
    /// Creates a surface that sends every event to `sink`.
    pub fn new(sink: impl Fn(TerminalEvent) + Send + Sync + 'static) -> Self {
        Self {
            screen: Default::default(),
            sink: Arc::new(sink),
        }
    }

    /// Returns a handle to the input field.
    #[inline]
    pub fn input(&self) -> TerminalInput {
        TerminalInput {
            screen: Arc::clone(&self.screen),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Screen> {
        lock_screen(&self.screen)
    }

    #[inline]
    fn emit(&self, event: TerminalEvent) {
        (self.sink)(event);
    }

    fn emit_feedback(&self, class: Class) {
        let feedback = self.lock().feedback.clone();
        for line in feedback {
            let line = match class {
                Class::Error => format!("✖ {line}").red().to_string(),
                _ => format!("⚠ {line}").yellow().to_string(),
            };
            self.emit(TerminalEvent::Line(line));
        }
    }
}

impl Surface for TerminalSurface {
    fn input_text(&self) -> String {
        self.lock().input_text.clone()
    }

    fn set_input_text(&mut self, text: &str) {
        self.lock().input_text = text.to_owned();
    }

    fn focus_input(&mut self) {}

    fn set_feedback(&mut self, lines: &[String]) {
        self.lock().feedback = lines.to_vec();
    }

    fn set_class(&mut self, element: Element, class: Class, on: bool) {
        let changed = {
            let mut screen = self.lock();
            if on {
                screen.classes.insert((element, class))
            } else {
                screen.classes.remove(&(element, class))
            }
        };
        // Feedback is printed every time it is flagged, since its text may
        // change while the flag stays on.
        if let (Element::Feedback, Class::Warning | Class::Error, true) =
            (element, class, on)
        {
            self.emit_feedback(class);
            return;
        }
        // Everything else only reports transitions.
        if !changed {
            return;
        }

        match (element, class, on) {
            (Element::Loader, Class::Show, _) => {
                self.emit(TerminalEvent::Loading(on));
            }
            (Element::Panel, Class::Show, true) => {
                let header =
                    format!("── chat with {} ──", self.lock().agent_name);
                self.emit(TerminalEvent::Line(header.dimmed().to_string()));
            }
            (Element::Panel, Class::Show, false) => {
                let footer = "── chat collapsed, /open to expand ──";
                self.emit(TerminalEvent::Line(footer.dimmed().to_string()));
            }
            (Element::Opener, Class::HasNewMessage, true) => {
                let notice = "● new message".bright_magenta().to_string();
                self.emit(TerminalEvent::Line(notice));
            }
            _ => {}
        }
    }

    fn has_class(&self, element: Element, class: Class) -> bool {
        self.lock().classes.contains(&(element, class))
    }

    fn append_bubble(&mut self, kind: BubbleKind) -> Bubble {
        let node = TerminalBubble {
            kind,
            agent_name: self.lock().agent_name.clone(),
            sink: Arc::clone(&self.sink),
            state: Default::default(),
        };
        Bubble::new(kind, node)
    }

    fn scroll_to_bottom(&mut self) {}

    fn set_theme_variable(&mut self, name: &str, value: &str) {
        trace!("theme variable {name} = {value}");
    }

    fn set_avatar_url(&mut self, url: &str) {
        trace!("avatar url = {url}");
    }

    fn set_agent_name(&mut self, name: &str) {
        self.lock().agent_name = name.to_owned();
    }

    fn remove(&mut self) {
        let mut screen = self.lock();
        if screen.removed {
            return;
        }
        screen.removed = true;
        drop(screen);
        self.emit(TerminalEvent::Line("── bye ──".dimmed().to_string()));
    }
}

/// Lets the host type into the input field of a [`TerminalSurface`].
#[derive(Clone)]
pub struct TerminalInput {
    screen: Arc<Mutex<Screen>>,
}

impl TerminalInput {
    /// Replaces the input text.
    pub fn type_text<S: Into<String>>(&self, text: S) {
        lock_screen(&self.screen).input_text = text.into();
    }

    /// Returns the current input text.
    pub fn text(&self) -> String {
        lock_screen(&self.screen).input_text.clone()
    }
}

#[derive(Default)]
struct BubbleState {
    content: String,
    pending: bool,
    streamed: bool,
    failed: bool,
}

/// The bubble node created by [`TerminalSurface`].
///
/// Text set while an answer is pending is held back until the widget sets
/// the final text. Streamed text is passed through as
/// [`TerminalEvent::Delta`]s right away.
pub struct TerminalBubble {
    kind: BubbleKind,
    agent_name: String,
    sink: EventSink,
    state: Mutex<BubbleState>,
}

impl TerminalBubble {
    #[inline]
    fn lock(&self) -> MutexGuard<'_, BubbleState> {
        // A poisoned bubble is still worth printing.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn prefix(&self, failed: bool) -> String {
        match self.kind {
            BubbleKind::Outbound => {
                format!("{}{} ", BAR_CHAR.bright_green(), "you:".bold())
            }
            BubbleKind::Inbound if failed => {
                format!("{}{} ", BAR_CHAR.red(), self.agent_name.bold())
            }
            BubbleKind::Inbound => {
                format!("{}{} ", BAR_CHAR.bright_cyan(), self.agent_name.bold())
            }
        }
    }

    fn line(&self, content: &str, failed: bool) -> TerminalEvent {
        let body = if failed {
            content.red().to_string()
        } else {
            content.bright_white().to_string()
        };
        TerminalEvent::Line(format!("{}{body}", self.prefix(failed)))
    }
}

impl BubbleNode for TerminalBubble {
    fn content(&self) -> String {
        self.lock().content.clone()
    }

    fn set_content(&self, content: &str) {
        let mut state = self.lock();
        let shown = state.content == content;
        state.content = content.to_owned();
        if state.pending {
            return;
        }
        let streamed = mem::take(&mut state.streamed);
        let failed = state.failed;
        drop(state);

        if streamed {
            // End the streamed line.
            (self.sink)(TerminalEvent::Line(String::new()));
            if shown {
                return;
            }
        }
        (self.sink)(self.line(content, failed));
    }

    fn push_str(&self, delta: &str) {
        let mut state = self.lock();
        state.content.push_str(delta);
        let event = if state.streamed {
            TerminalEvent::Delta(delta.to_owned())
        } else {
            state.streamed = true;
            TerminalEvent::Delta(format!("{}{delta}", self.prefix(false)))
        };
        drop(state);
        (self.sink)(event);
    }

    fn set_placeholder(&self, placeholder: bool) {
        self.lock().pending = placeholder;
    }

    fn set_failed(&self, failed: bool) {
        self.lock().failed = failed;
    }
}

#[inline]
fn lock_screen(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(|err| err.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> (TerminalSurface, Arc<Mutex<Vec<TerminalEvent>>>) {
        let events = Arc::new(Mutex::new(vec![]));
        let surface = TerminalSurface::new({
            let events = Arc::clone(&events);
            move |event| events.lock().unwrap().push(event)
        });
        (surface, events)
    }

    fn take(events: &Mutex<Vec<TerminalEvent>>) -> Vec<TerminalEvent> {
        std::mem::take(&mut *events.lock().unwrap())
    }

    fn assert_line_contains(event: &TerminalEvent, text: &str) {
        match event {
            TerminalEvent::Line(line) => assert!(line.contains(text), "{line}"),
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_loading_transitions() {
        let (mut surface, events) = surface();
        surface.set_class(Element::Loader, Class::Show, true);
        surface.set_class(Element::Loader, Class::Show, true);
        surface.set_class(Element::Loader, Class::Show, false);
        assert_eq!(
            take(&events),
            vec![TerminalEvent::Loading(true), TerminalEvent::Loading(false)]
        );
        assert!(!surface.has_class(Element::Loader, Class::Show));
    }

    #[test]
    fn test_input() {
        let (mut surface, _events) = surface();
        let input = surface.input();
        input.type_text("hello");
        assert_eq!(surface.input_text(), "hello");
        surface.set_input_text("");
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_feedback() {
        let (mut surface, events) = surface();
        surface.set_feedback(&["too short".to_owned()]);
        surface.set_class(Element::Feedback, Class::Error, true);
        let events = take(&events);
        assert_eq!(events.len(), 1);
        assert_line_contains(&events[0], "too short");
    }

    #[test]
    fn test_repeated_feedback() {
        let (mut surface, events) = surface();
        for warning in ["first warning", "second warning"] {
            surface.set_feedback(&[warning.to_owned()]);
            surface.set_class(Element::Feedback, Class::Warning, true);
            surface.set_class(Element::Feedback, Class::Error, false);
        }
        for error in ["first error", "second error"] {
            surface.set_class(Element::Feedback, Class::Warning, false);
            surface.set_feedback(&[error.to_owned()]);
            surface.set_class(Element::Feedback, Class::Error, true);
        }

        let events = take(&events);
        assert_eq!(events.len(), 4);
        assert_line_contains(&events[0], "first warning");
        assert_line_contains(&events[1], "second warning");
        assert_line_contains(&events[2], "first error");
        assert_line_contains(&events[3], "second error");
    }

    #[test]
    fn test_streamed_bubble() {
        let (mut surface, events) = surface();
        surface.set_agent_name("Echo");
        let bubble = surface.append_bubble(BubbleKind::Inbound);
        bubble.set_placeholder(true);
        bubble.push_str("Hel");
        bubble.push_str("lo");
        bubble.set_placeholder(false);
        // Kept text only ends the streamed line.
        bubble.set_content("Hello");

        let events = take(&events);
        assert_eq!(events.len(), 3);
        let TerminalEvent::Delta(first) = &events[0] else {
            panic!("expected a delta, got {:?}", events[0]);
        };
        assert!(first.contains("Echo"));
        assert!(first.ends_with("Hel"));
        assert_eq!(events[1], TerminalEvent::Delta("lo".to_owned()));
        assert_eq!(events[2], TerminalEvent::Line(String::new()));
        assert_eq!(bubble.content(), "Hello");
    }

    #[test]
    fn test_streamed_then_replaced() {
        let (mut surface, events) = surface();
        let bubble = surface.append_bubble(BubbleKind::Inbound);
        bubble.set_placeholder(true);
        bubble.push_str("draft");
        bubble.set_placeholder(false);
        bubble.set_content("final");

        let events = take(&events);
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], TerminalEvent::Line(String::new()));
        assert_line_contains(&events[2], "final");
    }

    #[test]
    fn test_pending_draft_is_held_back() {
        let (mut surface, events) = surface();
        let outbound = surface.append_bubble(BubbleKind::Outbound);
        outbound.set_content("hi");
        assert_eq!(take(&events).len(), 1);

        let inbound = surface.append_bubble(BubbleKind::Inbound);
        inbound.set_placeholder(true);
        inbound.set_content("draft");
        inbound.set_placeholder(false);
        assert!(take(&events).is_empty());

        inbound.set_content("final");
        let events = take(&events);
        assert_eq!(events.len(), 1);
        assert_line_contains(&events[0], "final");
    }

    #[test]
    fn test_failed_bubble() {
        let (mut surface, events) = surface();
        let bubble = surface.append_bubble(BubbleKind::Inbound);
        bubble.set_placeholder(true);
        bubble.set_placeholder(false);
        bubble.set_failed(true);
        bubble.set_content("oops");

        let events = take(&events);
        assert_eq!(events.len(), 1);
        assert_line_contains(&events[0], "oops");
    }

    #[test]
    fn test_remove_once() {
        let (mut surface, events) = surface();
        surface.remove();
        surface.remove();
        assert_eq!(take(&events).len(), 1);
    }
}
