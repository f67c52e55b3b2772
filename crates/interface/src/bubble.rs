use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::history::USER_ROLE;

/// Which side of the conversation a bubble is rendered on.
///
/// The kind is fixed when the bubble is created. Only the content of a
/// bubble may change afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BubbleKind {
    /// A message sent by the user.
    Outbound,
    /// A message from the agent, the system, or any other role.
    Inbound,
}

impl BubbleKind {
    /// Classifies a role string.
    ///
    /// Only the exact, case-sensitive string `"user"` is outbound. Every
    /// other role, including unknown and empty ones, is inbound.
    #[inline]
    pub fn for_role(role: &str) -> Self {
        if role == USER_ROLE {
            Self::Outbound
        } else {
            Self::Inbound
        }
    }

    /// Returns the CSS class that marks this kind of bubble.
    #[inline]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Outbound => "message-out",
            Self::Inbound => "message-in",
        }
    }
}

/// A rendered message node owned by the host.
///
/// Nodes are shared between the widget and a pending answer, which may
/// stream text into them from another task, so implementations must use
/// interior mutability.
pub trait BubbleNode: Send + Sync {
    /// Returns the current text of the node.
    fn content(&self) -> String;

    /// Replaces the text of the node.
    ///
    /// When an answer resolves, the widget first turns the placeholder
    /// look off and then sets the final text, even if that text is what
    /// the responder already wrote.
    fn set_content(&self, content: &str);

    /// Appends text to the node.
    fn push_str(&self, delta: &str) {
        let mut content = self.content();
        content.push_str(delta);
        self.set_content(&content);
    }

    /// Switches the transparent "waiting for an answer" look on or off.
    fn set_placeholder(&self, placeholder: bool);

    /// Marks the node as holding a failed answer.
    fn set_failed(&self, _failed: bool) {}
}

/// A handle to a message bubble.
///
/// This is the narrow capability the widget passes to a responder: it can
/// read and write the content of one bubble and nothing else. Cloning is
/// cheap, and two handles are equal when they point at the same node.
#[derive(Clone)]
pub struct Bubble {
    kind: BubbleKind,
    node: Arc<dyn BubbleObject>,
}

impl Bubble {
    /// Wraps a host node into a bubble of the given kind.
    #[inline]
    pub fn new<T: BubbleNode + 'static>(kind: BubbleKind, node: T) -> Self {
        Self {
            kind,
            node: Arc::new(node),
        }
    }

    /// Returns the kind this bubble was created with.
    #[inline]
    pub fn kind(&self) -> BubbleKind {
        self.kind
    }

    /// Returns the current text of the bubble.
    #[inline]
    pub fn content(&self) -> String {
        self.node.content()
    }

    /// Replaces the text of the bubble.
    #[inline]
    pub fn set_content(&self, content: &str) {
        self.node.set_content(content);
    }

    /// Appends text to the bubble, for streaming answers.
    #[inline]
    pub fn push_str(&self, delta: &str) {
        self.node.push_str(delta);
    }

    /// Switches the placeholder look on or off.
    #[inline]
    pub fn set_placeholder(&self, placeholder: bool) {
        self.node.set_placeholder(placeholder);
    }

    /// Marks the bubble as holding a failed answer.
    #[inline]
    pub fn set_failed(&self, failed: bool) {
        self.node.set_failed(failed);
    }

    /// Returns the host node if it is of type `T`.
    #[inline]
    pub fn node<T: 'static>(&self) -> Option<&T> {
        self.node.as_any().downcast_ref()
    }
}

impl Debug for Bubble {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bubble")
            .field("kind", &self.kind)
            .field("content", &self.content())
            .finish()
    }
}

impl PartialEq for Bubble {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Bubble {}

trait BubbleObject: BubbleNode {
    fn as_any(&self) -> &dyn Any;
}

impl<T: BubbleNode + 'static> BubbleObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
