//! Drag session lifecycle

use serde::{Deserialize, Serialize};

use crate::model::{ListId, TodoItem, Uid};

/// Where a dragged item is released
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropTarget {
    /// Before this item's row
    Item { uid: Uid },
    /// After the last item of the list
    EndZone,
}

impl DropTarget {
    pub fn item(uid: impl Into<Uid>) -> Self {
        DropTarget::Item { uid: uid.into() }
    }
}

/// The item being dragged and the list it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub item: TodoItem,
    pub from: ListId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Dropped,
}

/// Tracks one drag gesture at a time
#[derive(Debug, Default)]
pub struct DragCoordinator {
    phase: DragPhase,
    session: Option<DragSession>,
    active_target: Option<(ListId, DropTarget)>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// The one drop target currently highlighted
    pub fn active_target(&self) -> Option<(&ListId, &DropTarget)> {
        self.active_target.as_ref().map(|(list, target)| (list, target))
    }

    /// Begin dragging `item` out of `from`; replaces any unfinished gesture
    pub fn start(&mut self, from: ListId, item: TodoItem) {
        if let Some(previous) = &self.session {
            tracing::warn!(
                uid = %previous.item.uid,
                list = %previous.from,
                "Drag started while another was in flight; discarding it"
            );
        }

        tracing::debug!(uid = %item.uid, list = %from, "Drag start");
        self.session = Some(DragSession { item, from });
        self.active_target = None;
        self.phase = DragPhase::Dragging;
    }

    /// Mark `target` as the active drop target, clearing any other
    pub fn over(&mut self, list: &ListId, target: DropTarget) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        self.active_target = Some((list.clone(), target));
    }

    /// Clear the marker if `target` holds it
    pub fn leave(&mut self, list: &ListId, target: &DropTarget) {
        let is_active = matches!(
            &self.active_target,
            Some((active_list, active)) if active_list == list && active == target
        );
        if is_active {
            self.active_target = None;
        }
    }

    /// Finish the gesture and hand back the session, if one was in flight
    pub fn release(&mut self, list: &ListId, target: &DropTarget) -> Option<DragSession> {
        self.active_target = None;
        let session = self.session.take()?;
        self.phase = DragPhase::Dropped;

        tracing::debug!(
            uid = %session.item.uid,
            from = %session.from,
            to = %list,
            target = ?target,
            "Drop"
        );
        Some(session)
    }

    /// Abandon the gesture (drag end without a drop)
    pub fn cancel(&mut self) {
        self.session = None;
        self.active_target = None;
        self.phase = DragPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(name: &str) -> ListId {
        ListId::parse(&format!("todo.{}", name)).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let mut dnd = DragCoordinator::new();
        assert_eq!(dnd.phase(), DragPhase::Idle);

        dnd.start(list("a"), TodoItem::new("1", "Milk"));
        assert_eq!(dnd.phase(), DragPhase::Dragging);
        assert_eq!(dnd.session().unwrap().item.uid, "1");

        let session = dnd.release(&list("a"), &DropTarget::EndZone).unwrap();
        assert_eq!(session.from, list("a"));
        assert_eq!(dnd.phase(), DragPhase::Dropped);
        assert!(dnd.session().is_none());

        // A second drop without a new gesture yields nothing
        assert!(dnd.release(&list("a"), &DropTarget::EndZone).is_none());
    }

    #[test]
    fn test_single_active_target() {
        let mut dnd = DragCoordinator::new();

        // Ignored while idle
        dnd.over(&list("a"), DropTarget::item("2"));
        assert!(dnd.active_target().is_none());

        dnd.start(list("a"), TodoItem::new("1", "Milk"));
        dnd.over(&list("a"), DropTarget::item("2"));
        dnd.over(&list("b"), DropTarget::EndZone);
        assert_eq!(
            dnd.active_target(),
            Some((&list("b"), &DropTarget::EndZone))
        );

        // Leaving a target that is not active changes nothing
        dnd.leave(&list("a"), &DropTarget::item("2"));
        assert!(dnd.active_target().is_some());

        dnd.leave(&list("b"), &DropTarget::EndZone);
        assert!(dnd.active_target().is_none());
    }

    #[test]
    fn test_restart_overwrites_session() {
        let mut dnd = DragCoordinator::new();
        dnd.start(list("a"), TodoItem::new("1", "Milk"));
        dnd.start(list("b"), TodoItem::new("2", "Eggs"));

        let session = dnd.session().unwrap();
        assert_eq!(session.item.uid, "2");
        assert_eq!(session.from, list("b"));
    }

    #[test]
    fn test_cancel() {
        let mut dnd = DragCoordinator::new();
        dnd.start(list("a"), TodoItem::new("1", "Milk"));
        dnd.over(&list("a"), DropTarget::EndZone);
        dnd.cancel();

        assert_eq!(dnd.phase(), DragPhase::Idle);
        assert!(dnd.session().is_none());
        assert!(dnd.active_target().is_none());
    }

    #[test]
    fn test_drop_target_serde() {
        let json = serde_json::to_string(&DropTarget::item("abc")).unwrap();
        assert_eq!(json, r#"{"type":"item","uid":"abc"}"#);
        let zone: DropTarget = serde_json::from_str(r#"{"type":"end_zone"}"#).unwrap();
        assert_eq!(zone, DropTarget::EndZone);
    }
}
