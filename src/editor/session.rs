//! The authoring session: one tree, one log, one publisher.
//!
//! Every edit is applied to the local tree first. A change then appends an
//! action to the log, emits an [`EditorEvent`], and queues the new snapshot
//! plus the action on the publisher. Edits that leave the tree unchanged do
//! none of that.

use std::fmt;

use crossbeam::channel::{self, Receiver, Sender};

use super::publisher::Publisher;
use super::script::EditStep;
use super::viewport::ScreenSelector;
use crate::codec::{
    Action, ActionData, ActionKind, ActionLog, Codec, Snapshot, Viewport, ViewportError,
};
use crate::debug;
use crate::model::{Node, StyleMap, Tree, normalize_value};
use crate::utils::plural::plural_count;

/// Notifications for whoever renders the session (canvas, outline, panels).
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Changed {
        kind: &'static str,
        element_id: String,
        nodes: usize,
    },
    Selected(Option<String>),
    Viewport(Viewport),
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed { kind, element_id, nodes } => {
                write!(f, "{kind} {element_id} ({})", plural_count(*nodes, "node"))
            }
            Self::Selected(Some(id)) => write!(f, "selected {id}"),
            Self::Selected(None) => f.write_str("selection cleared"),
            Self::Viewport(v) => write!(f, "screen {}x{}", v.width, v.height),
        }
    }
}

/// Sending half of the session's event channel.
#[derive(Debug, Clone)]
pub struct EditorEvents {
    tx: Sender<EditorEvent>,
}

impl EditorEvents {
    pub fn channel() -> (Self, Receiver<EditorEvent>) {
        let (tx, rx) = channel::unbounded();
        (Self { tx }, rx)
    }

    fn emit(&self, event: EditorEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.tx.send(event);
    }
}

/// What one script step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Applied {
    /// Whether the tree changed.
    Document(bool),
    Viewport(Viewport),
    /// Whether the selection changed.
    Selection(bool),
}

pub struct EditorSession {
    tree: Tree,
    log: ActionLog,
    codec: Codec,
    publisher: Option<Publisher>,
    events: EditorEvents,
    screen: ScreenSelector,
    selected: Option<String>,
}

impl EditorSession {
    /// `publisher: None` keeps the session local.
    pub fn new(codec: Codec, publisher: Option<Publisher>, events: EditorEvents) -> Self {
        Self {
            tree: Tree::new(),
            log: ActionLog::new(),
            codec,
            publisher,
            events,
            screen: ScreenSelector::default(),
            selected: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn actions(&self) -> &[Action] {
        self.log.actions()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn screen(&self) -> &ScreenSelector {
        &self.screen
    }

    /// Current document, stamped with the selected screen size.
    pub fn snapshot(&self) -> Snapshot {
        self.codec.snapshot(&self.tree, Some(self.screen.viewport()))
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn insert_root(&mut self, node: Node) -> bool {
        let id = node.id.clone();
        let next = self.tree.insert_root(node);
        self.commit_insert(next, id, None)
    }

    pub fn insert_child(&mut self, parent_id: &str, node: Node) -> bool {
        let id = node.id.clone();
        let next = self.tree.insert_as_child(parent_id, node);
        self.commit_insert(next, id, Some(parent_id))
    }

    /// Insert after `after_id`; the action names the sibling as `parentId`.
    pub fn insert_sibling(&mut self, after_id: &str, node: Node) -> bool {
        let id = node.id.clone();
        let next = self.tree.insert_as_sibling(after_id, node);
        self.commit_insert(next, id, Some(after_id))
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let next = self.tree.remove(id);
        let action = self.codec.element_action(ActionKind::Remove, id, None);
        if !self.commit(next, action) {
            return false;
        }
        if self.selected.as_deref().is_some_and(|sel| !self.tree.contains(sel)) {
            self.select(None);
        }
        true
    }

    pub fn move_node(&mut self, id: &str, new_parent: Option<&str>) -> bool {
        let next = self.tree.move_node(id, new_parent);
        let data = ActionData {
            parent_id: self.tree.parent_of(id).flatten().map(str::to_owned),
            new_parent_id: new_parent.map(str::to_owned),
            ..ActionData::default()
        };
        let action = self.codec.element_action(ActionKind::Move, id, Some(data));
        self.commit(next, action)
    }

    /// Merge `styles` into the node's style map.
    pub fn update_style(&mut self, id: &str, styles: StyleMap) -> bool {
        let next = self.tree.update_style(id, &styles);
        let data = ActionData {
            css: Some(styles),
            ..ActionData::default()
        };
        let action = self.codec.element_action(ActionKind::Update, id, Some(data));
        self.commit(next, action)
    }

    /// Set one property the way the properties panel does: bare lengths
    /// gain `px`, and the log records a `css-update`.
    pub fn set_property(&mut self, id: &str, property: &str, value: &str) -> bool {
        let value = normalize_value(property, value);
        let styles = StyleMap::from([(property.to_owned(), value.clone())]);
        let next = self.tree.update_style(id, &styles);
        let action = self.codec.property_action(id, property, value);
        self.commit(next, action)
    }

    /// Select an existing node, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        if id.is_some_and(|id| !self.tree.contains(id)) || self.selected.as_deref() == id {
            return false;
        }
        self.selected = id.map(str::to_owned);
        self.events.emit(EditorEvent::Selected(self.selected.clone()));
        true
    }

    /// Start over with an empty document and history. Returns whether there
    /// was anything to drop.
    pub fn reset(&mut self) -> bool {
        if self.tree.is_empty() && self.log.is_empty() {
            return false;
        }
        self.tree = Tree::new();
        self.log.clear();
        self.select(None);
        if let Some(publisher) = &self.publisher {
            publisher.publish(self.snapshot(), None);
        }
        true
    }

    /// Apply one scripted edit.
    pub fn apply(&mut self, step: EditStep) -> Result<Applied, ViewportError> {
        let applied = match step {
            EditStep::InsertRoot { node } => Applied::Document(self.insert_root(node.into_node())),
            EditStep::InsertChild { parent, node } => {
                Applied::Document(self.insert_child(&parent, node.into_node()))
            }
            EditStep::InsertSibling { after, node } => {
                Applied::Document(self.insert_sibling(&after, node.into_node()))
            }
            EditStep::Remove { id } => Applied::Document(self.remove(&id)),
            EditStep::Move { id, parent } => Applied::Document(self.move_node(&id, parent.as_deref())),
            EditStep::Style { id, css } => Applied::Document(self.update_style(&id, css)),
            EditStep::Property { id, property, value } => {
                Applied::Document(self.set_property(&id, &property, &value))
            }
            EditStep::Select { id } => Applied::Selection(self.select(id.as_deref())),
            EditStep::Viewport { device, width, height } => {
                let mut viewport = match device {
                    Some(device) => self.screen.select(device),
                    None => self.screen.viewport(),
                };
                if width.is_some() || height.is_some() {
                    viewport = self.screen.set_size(
                        width.unwrap_or(viewport.width),
                        height.unwrap_or(viewport.height),
                    )?;
                }
                self.events.emit(EditorEvent::Viewport(viewport));
                Applied::Viewport(viewport)
            }
            EditStep::Reset => Applied::Document(self.reset()),
            EditStep::Rotate => {
                let viewport = self.screen.toggle_orientation();
                self.events.emit(EditorEvent::Viewport(viewport));
                Applied::Viewport(viewport)
            }
        };
        Ok(applied)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn commit_insert(&mut self, next: Tree, id: String, parent_id: Option<&str>) -> bool {
        let data = ActionData {
            element: next.find(&id).cloned(),
            parent_id: parent_id.map(str::to_owned),
            ..ActionData::default()
        };
        let action = self.codec.element_action(ActionKind::Add, id, Some(data));
        self.commit(next, action)
    }

    fn commit(&mut self, next: Tree, action: Action) -> bool {
        if next == self.tree {
            debug!("editor"; "{} {} left the document unchanged", action.kind(), action.element_id());
            return false;
        }
        self.tree = next;
        self.events.emit(EditorEvent::Changed {
            kind: action.kind(),
            element_id: action.element_id().to_owned(),
            nodes: self.tree.len(),
        });
        self.log.push(action.clone());
        if let Some(publisher) = &self.publisher {
            publisher.publish(self.snapshot(), Some(action));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::runtime::Handle;

    use super::*;
    use crate::codec::to_markup;
    use crate::editor::client::RelayClient;
    use crate::editor::script::parse_script;
    use crate::editor::viewport::DevicePreset;
    use crate::relay::http::TestEndpoints;
    use crate::relay::memory::MemoryChannel;
    use crate::relay::{Envelope, Hub};

    fn local() -> (EditorSession, Receiver<EditorEvent>) {
        let (events, rx) = EditorEvents::channel();
        (EditorSession::new(Codec::new(), None, events), rx)
    }

    #[test]
    fn test_edits_build_the_tree_and_log() {
        let (mut session, rx) = local();
        assert!(session.insert_root(Node::with_id("a", "div", "Div")));
        assert!(session.insert_child("a", Node::with_id("b", "span", "Span")));
        assert!(session.insert_sibling("b", Node::with_id("c", "p", "P")));

        assert_eq!(
            to_markup(session.tree().roots()),
            "<div id=\"a\">\n  <span id=\"b\"></span>\n  <p id=\"c\"></p>\n</div>"
        );
        let kinds: Vec<_> = session.actions().iter().map(Action::kind).collect();
        assert_eq!(kinds, ["add", "add", "add"]);

        let Action::Add { data: Some(data), .. } = &session.actions()[1] else {
            panic!("expected add with data");
        };
        assert_eq!(data.parent_id.as_deref(), Some("a"));
        assert_eq!(data.element.as_ref().and_then(|n| n.parent.as_deref()), Some("a"));

        let Action::Add { data: Some(data), .. } = &session.actions()[2] else {
            panic!("expected add with data");
        };
        assert_eq!(data.parent_id.as_deref(), Some("b"));

        assert_eq!(rx.try_iter().count(), 3);
    }

    #[test]
    fn test_no_op_edits_are_not_recorded() {
        let (mut session, rx) = local();
        session.insert_root(Node::with_id("a", "div", "Div"));
        rx.try_iter().count();

        assert!(!session.remove("missing"));
        assert!(!session.insert_root(Node::with_id("a", "div", "Again")));
        assert!(!session.insert_child("missing", Node::with_id("x", "p", "P")));
        assert!(!session.move_node("a", Some("a")));
        assert!(session.set_property("a", "width", "10"));
        assert!(!session.set_property("a", "width", "10px"));

        assert_eq!(session.actions().len(), 2);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_move_records_both_parents() {
        let (mut session, _rx) = local();
        session.insert_root(Node::with_id("a", "div", "Div"));
        session.insert_root(Node::with_id("b", "div", "Div"));
        session.insert_child("a", Node::with_id("c", "p", "P"));

        assert!(session.move_node("c", Some("b")));
        assert_eq!(session.tree().parent_of("c"), Some(Some("b")));
        let Some(Action::Move { data: Some(data), .. }) = session.actions().last() else {
            panic!("expected move with data");
        };
        assert_eq!(data.parent_id.as_deref(), Some("a"));
        assert_eq!(data.new_parent_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_set_property_normalizes() {
        let (mut session, _rx) = local();
        session.insert_root(Node::with_id("a", "div", "Div"));
        session.set_property("a", "padding", "16");

        assert_eq!(session.tree().find("a").unwrap().css["padding"], "16px");
        assert!(matches!(
            session.actions().last(),
            Some(Action::CssUpdate { property, value, .. }) if property == "padding" && value == "16px"
        ));
    }

    #[test]
    fn test_removing_selected_node_clears_selection() {
        let (mut session, rx) = local();
        session.insert_root(Node::with_id("a", "div", "Div").child(Node::with_id("b", "p", "P")));
        assert!(session.select(Some("b")));
        assert!(!session.select(Some("missing")));
        assert!(session.remove("a"));

        assert_eq!(session.selected(), None);
        let selections: Vec<_> = rx
            .try_iter()
            .filter_map(|event| match event {
                EditorEvent::Selected(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(selections, [Some("b".to_owned()), None]);
    }

    #[test]
    fn test_apply_script() {
        let script = r##"
{"op": "insertRoot", "node": {"id": "page", "type": "div"}}
{"op": "insertChild", "parent": "page", "node": {"id": "title", "type": "h1"}}
{"op": "style", "id": "title", "css": {"color": "#ff0000", "font-size": "24px"}}
{"op": "viewport", "device": "tablet"}
{"op": "rotate"}
{"op": "viewport", "width": 500}
{"op": "remove", "id": "nope"}
"##;
        let (mut session, _rx) = local();
        let applied: Vec<_> = parse_script(script)
            .unwrap()
            .into_iter()
            .map(|step| session.apply(step).unwrap())
            .collect();

        assert_eq!(applied[2], Applied::Document(true));
        assert_eq!(applied[3], Applied::Viewport(Viewport { width: 768.0, height: 1024.0 }));
        assert_eq!(applied[4], Applied::Viewport(Viewport { width: 1024.0, height: 768.0 }));
        assert_eq!(applied[5], Applied::Viewport(Viewport { width: 500.0, height: 768.0 }));
        assert_eq!(applied[6], Applied::Document(false));
        assert_eq!(session.screen().device(), DevicePreset::Custom);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(snapshot.metadata.screen_size, Some(Viewport { width: 500.0, height: 768.0 }));
    }

    #[test]
    fn test_event_display() {
        let changed = EditorEvent::Changed {
            kind: "add",
            element_id: "a".into(),
            nodes: 1,
        };
        assert_eq!(changed.to_string(), "add a (1 node)");
        assert_eq!(EditorEvent::Selected(None).to_string(), "selection cleared");
        assert_eq!(
            EditorEvent::Viewport(Viewport { width: 375.0, height: 812.0 }).to_string(),
            "screen 375x812"
        );
    }

    #[test]
    fn test_invalid_viewport_step() {
        let (mut session, _rx) = local();
        let step = EditStep::Viewport { device: None, width: Some(-1.0), height: None };
        assert!(session.apply(step).is_err());
    }

    #[test]
    fn test_reset() {
        let (mut session, _rx) = local();
        session.insert_root(Node::with_id("a", "div", "Div"));
        session.select(Some("a"));
        assert!(session.reset());
        assert!(!session.reset());
        assert!(session.tree().is_empty());
        assert!(session.actions().is_empty());
        assert_eq!(session.selected(), None);
    }

    #[tokio::test]
    async fn test_edits_reach_observers() {
        let hub = Arc::new(Hub::new());
        let observer = MemoryChannel::new("o");
        hub.accept(observer.boxed());
        let endpoints = TestEndpoints::start(Arc::clone(&hub));

        let client = RelayClient::new(&endpoints.url()).unwrap();
        let publisher = Publisher::spawn(client, &Handle::current());
        let mut session = EditorSession::new(Codec::new(), Some(publisher.clone()), EditorEvents::channel().0);

        session.insert_root(Node::with_id("a", "div", "Div"));
        session.remove("missing");
        session.set_property("a", "color", "red");
        publisher.flush().await;

        assert_eq!(
            observer.kinds(),
            ["welcome", "documentUpdate", "actionUpdate", "documentUpdate", "actionUpdate"]
        );
        let last = observer
            .sent()
            .iter()
            .rev()
            .find_map(|text| match Envelope::from_json(text) {
                Some(Envelope::DocumentUpdate { document, .. }) => Snapshot::from_value(document).ok(),
                _ => None,
            })
            .unwrap();
        assert_eq!(last.into_tree(), *session.tree());
    }
}
