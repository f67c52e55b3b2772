use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use no_brainer_chat_interface::{
    Bubble, BubbleKind, BubbleNode, Class, Element, Styles, Surface,
};

#[derive(Default)]
struct FakeNode {
    content: Mutex<String>,
    placeholder: Mutex<bool>,
}

impl BubbleNode for FakeNode {
    fn content(&self) -> String {
        self.content.lock().unwrap().clone()
    }

    fn set_content(&self, content: &str) {
        *self.content.lock().unwrap() = content.to_owned();
    }

    fn set_placeholder(&self, placeholder: bool) {
        *self.placeholder.lock().unwrap() = placeholder;
    }
}

/// Renders the widget into an HTML-ish string, like a page would.
#[derive(Default)]
struct FakeSurface {
    input: String,
    feedback: Vec<String>,
    classes: BTreeSet<(Element, Class)>,
    bubbles: Vec<Bubble>,
    variables: BTreeMap<String, String>,
}

impl FakeSurface {
    fn render_messages(&self) -> String {
        self.bubbles
            .iter()
            .map(|bubble| {
                format!(
                    "<p class=\"{}\">{}</p>",
                    bubble.kind().class_name(),
                    bubble.content()
                )
            })
            .collect()
    }

    fn render_style(&self) -> String {
        self.variables
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn class_list(&self, element: Element) -> Vec<&'static str> {
        self.classes
            .iter()
            .filter(|(e, _)| *e == element)
            .map(|(_, class)| class.as_str())
            .collect()
    }
}

impl Surface for FakeSurface {
    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn set_input_text(&mut self, text: &str) {
        self.input = text.to_owned();
    }

    fn focus_input(&mut self) {}

    fn set_feedback(&mut self, lines: &[String]) {
        self.feedback = lines.to_vec();
    }

    fn set_class(&mut self, element: Element, class: Class, on: bool) {
        if on {
            self.classes.insert((element, class));
        } else {
            self.classes.remove(&(element, class));
        }
    }

    fn has_class(&self, element: Element, class: Class) -> bool {
        self.classes.contains(&(element, class))
    }

    fn append_bubble(&mut self, kind: BubbleKind) -> Bubble {
        let bubble = Bubble::new(kind, FakeNode::default());
        self.bubbles.push(bubble.clone());
        bubble
    }

    fn scroll_to_bottom(&mut self) {}

    fn set_theme_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_owned(), value.to_owned());
    }

    fn set_avatar_url(&mut self, _url: &str) {}

    fn set_agent_name(&mut self, _name: &str) {}

    fn remove(&mut self) {
        self.bubbles.clear();
    }
}

#[test]
fn test_surface_as_trait_object() {
    let mut surface: Box<dyn Surface> = Box::new(FakeSurface::default());
    surface.set_class(Element::Panel, Class::Show, true);
    surface.set_class(Element::Opener, Class::HasNewMessage, true);
    surface.set_class(Element::Opener, Class::HasNewMessage, false);
    assert!(surface.has_class(Element::Panel, Class::Show));
    assert!(!surface.has_class(Element::Opener, Class::HasNewMessage));

    surface.set_input_text("draft");
    assert_eq!(surface.input_text(), "draft");
}

#[test]
fn test_render_bubbles() {
    let mut surface = FakeSurface::default();
    let question = surface.append_bubble(BubbleKind::for_role("user"));
    question.set_content("What is 6 * 7?");

    let answer = surface.append_bubble(BubbleKind::for_role("Assistant"));
    answer.set_placeholder(true);

    // Streaming from another task only needs a clone of the handle.
    let streamed = answer.clone();
    std::thread::spawn(move || {
        streamed.push_str("4");
        streamed.push_str("2");
    })
    .join()
    .unwrap();
    answer.set_placeholder(false);

    assert_eq!(
        surface.render_messages(),
        "<p class=\"message-out\">What is 6 * 7?</p>\
         <p class=\"message-in\">42</p>"
    );
    assert!(!*answer.node::<FakeNode>().unwrap().placeholder.lock().unwrap());
}

#[test]
fn test_apply_styles() {
    let mut surface = FakeSurface::default();
    let styles = Styles {
        opener_bg_color: "#202123".to_owned(),
        opener_fill_color: "#413e50".to_owned(),
        chat_bg_color: "#343541".to_owned(),
        chat_text_color: "#fff".to_owned(),
        chat_textarea_bg_color: "#514f60".to_owned(),
        chat_header_bg_color: "#202123".to_owned(),
        chat_buttons_bg_color: "#473f56".to_owned(),
        chat_textarea_color: "#fff".to_owned(),
        font_family: "system-ui".to_owned(),
        loader_color: "#9880ff".to_owned(),
    };
    for (name, value) in styles.variables() {
        surface.set_theme_variable(name, value);
    }
    surface.set_feedback(&["careful".to_owned()]);
    surface.set_class(Element::Feedback, Class::Warning, true);

    let style = surface.render_style();
    assert!(style.contains("--no-brainer-chat-bg-color: #343541;"));
    assert!(style.contains("--no-brainer-font: system-ui;"));
    assert_eq!(surface.variables.len(), 10);
    assert_eq!(surface.class_list(Element::Feedback), vec!["warning"]);
    assert_eq!(surface.feedback, vec!["careful".to_owned()]);

    let shared = Arc::new(Mutex::new(surface));
    shared.lock().unwrap().remove();
    assert_eq!(shared.lock().unwrap().render_messages(), "");
}
