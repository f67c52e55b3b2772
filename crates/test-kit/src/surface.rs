use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use no_brainer_chat_interface::{
    Bubble, BubbleKind, BubbleNode, Class, Element, Surface,
};

/// What a [`TestSurface`] currently shows.
#[derive(Clone, Debug, Default)]
pub struct TestDom {
    pub input_text: String,
    pub feedback: Vec<String>,
    pub classes: BTreeSet<(Element, Class)>,
    pub bubbles: Vec<Bubble>,
    pub theme: BTreeMap<String, String>,
    pub avatar_url: Option<String>,
    pub agent_name: Option<String>,
    pub focus_count: usize,
    pub scroll_count: usize,
    pub removed: bool,
}

impl TestDom {
    #[inline]
    pub fn has(&self, element: Element, class: Class) -> bool {
        self.classes.contains(&(element, class))
    }

    /// Returns kind and content of every bubble, oldest first.
    pub fn messages(&self) -> Vec<(BubbleKind, String)> {
        self.bubbles
            .iter()
            .map(|bubble| (bubble.kind(), bubble.content()))
            .collect()
    }
}

/// An in-memory surface for testing purpose.
///
/// Clones share the same state, so a test can keep one clone to inspect
/// while the widget owns the other.
#[derive(Clone, Default)]
pub struct TestSurface {
    dom: Arc<Mutex<TestDom>>,
}

impl TestSurface {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the input text, as if the user typed it.
    #[inline]
    pub fn type_text<S: Into<String>>(&self, text: S) {
        self.lock().input_text = text.into();
    }

    /// Returns a copy of the current state.
    #[inline]
    pub fn snapshot(&self) -> TestDom {
        self.lock().clone()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, TestDom> {
        self.dom.lock().unwrap()
    }
}

impl Surface for TestSurface {
    fn input_text(&self) -> String {
        self.lock().input_text.clone()
    }

    fn set_input_text(&mut self, text: &str) {
        self.lock().input_text = text.to_owned();
    }

    fn focus_input(&mut self) {
        self.lock().focus_count += 1;
    }

    fn set_feedback(&mut self, lines: &[String]) {
        self.lock().feedback = lines.to_vec();
    }

    fn set_class(&mut self, element: Element, class: Class, on: bool) {
        let mut dom = self.lock();
        if on {
            dom.classes.insert((element, class));
        } else {
            dom.classes.remove(&(element, class));
        }
    }

    fn has_class(&self, element: Element, class: Class) -> bool {
        self.lock().has(element, class)
    }

    fn append_bubble(&mut self, kind: BubbleKind) -> Bubble {
        let bubble = Bubble::new(kind, TestBubbleNode::default());
        self.lock().bubbles.push(bubble.clone());
        bubble
    }

    fn scroll_to_bottom(&mut self) {
        self.lock().scroll_count += 1;
    }

    fn set_theme_variable(&mut self, name: &str, value: &str) {
        self.lock().theme.insert(name.to_owned(), value.to_owned());
    }

    fn set_avatar_url(&mut self, url: &str) {
        self.lock().avatar_url = Some(url.to_owned());
    }

    fn set_agent_name(&mut self, name: &str) {
        self.lock().agent_name = Some(name.to_owned());
    }

    fn remove(&mut self) {
        self.lock().removed = true;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct BubbleState {
    content: String,
    placeholder: bool,
    failed: bool,
}

/// The bubble node created by [`TestSurface`].
#[derive(Debug, Default)]
pub struct TestBubbleNode {
    state: Mutex<BubbleState>,
}

impl TestBubbleNode {
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.state.lock().unwrap().placeholder
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.state.lock().unwrap().failed
    }
}

impl BubbleNode for TestBubbleNode {
    fn content(&self) -> String {
        self.state.lock().unwrap().content.clone()
    }

    fn set_content(&self, content: &str) {
        self.state.lock().unwrap().content = content.to_owned();
    }

    fn push_str(&self, delta: &str) {
        self.state.lock().unwrap().content.push_str(delta);
    }

    fn set_placeholder(&self, placeholder: bool) {
        self.state.lock().unwrap().placeholder = placeholder;
    }

    fn set_failed(&self, failed: bool) {
        self.state.lock().unwrap().failed = failed;
    }
}
