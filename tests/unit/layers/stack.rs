use super::*;

fn abc() -> (LayerStack, LayerId, LayerId, LayerId) {
    let mut s = LayerStack::new("A", None);
    let a = s.active_id();
    let b = s.add_layer("B", None);
    let c = s.add_layer("C", None);
    (s, a, b, c)
}

#[test]
fn ids_are_monotonic_and_never_reused() {
    let (mut s, a, b, c) = abc();
    assert!(a < b && b < c);
    s.remove_layer(c).unwrap();
    let d = s.add_layer("D", None);
    assert!(d > c);
}

#[test]
fn add_selects_new_layer_with_default_transform() {
    let mut s = LayerStack::new("base", None);
    let id = s.add_layer("x", None);
    assert_eq!(s.active_id(), id);
    assert_eq!(s.active().transform, LayerTransform::default());
    assert_eq!(s.active().name, "x");
}

#[test]
fn add_then_remove_round_trips() {
    let (mut s, ..) = abc();
    let before = s.ids();
    let id = s.add_layer("tmp", None);
    s.remove_layer(id).unwrap();
    assert_eq!(s.ids(), before);
    assert_eq!(s.len(), 3);
}

#[test]
fn sole_layer_cannot_be_removed() {
    let mut s = LayerStack::new("base", None);
    let id = s.active_id();
    assert!(matches!(s.remove_layer(id), Err(StackError::LastLayer)));
    assert_eq!(s.request_remove(id), Err(StackError::LastLayer));
    assert_eq!(s.len(), 1);
    assert_eq!(s.ids(), vec![id]);
    assert_eq!(StackError::LastLayer.to_string(), "cannot delete base layer");
}

#[test]
fn removal_selects_adjacent_entry() {
    let (mut s, a, b, c) = abc();
    s.select(b).unwrap();
    s.remove_layer(b).unwrap();
    assert_eq!(s.active_id(), c);
    s.remove_layer(c).unwrap();
    assert_eq!(s.active_id(), a);
}

#[test]
fn unknown_ids_are_reported() {
    let (mut s, ..) = abc();
    let ghost = LayerId(99);
    assert!(matches!(
        s.remove_layer(ghost),
        Err(StackError::UnknownLayer(id)) if id == ghost
    ));
    assert_eq!(s.select(ghost), Err(StackError::UnknownLayer(ghost)));
    assert_eq!(s.reorder(ghost, 0, 3), Err(StackError::UnknownLayer(ghost)));
}

#[test]
fn reorder_moves_to_index() {
    let (mut s, a, b, c) = abc();
    s.reorder(c, 0, 3).unwrap();
    assert_eq!(s.ids(), vec![c, a, b]);
    s.reorder(c, 2, 3).unwrap();
    assert_eq!(s.ids(), vec![a, b, c]);
}

#[test]
fn reorder_rejects_desync_without_mutation() {
    let (mut s, a, b, c) = abc();
    assert_eq!(
        s.reorder(c, 0, 2),
        Err(StackError::OrderDesync {
            visual: 2,
            model: 3
        })
    );
    assert_eq!(s.ids(), vec![a, b, c]);
    assert_eq!(
        s.reorder(c, 3, 3),
        Err(StackError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(s.ids(), vec![a, b, c]);
}

#[test]
fn confirm_flow_removes_requested_layer() {
    let (mut s, a, b, c) = abc();
    assert_eq!(s.confirm_remove().unwrap_err(), StackError::NoPendingRemoval);
    s.request_remove(b).unwrap();
    assert_eq!(s.pending_removal(), Some(b));
    s.cancel_remove();
    assert_eq!(s.confirm_remove().unwrap_err(), StackError::NoPendingRemoval);
    s.request_remove(b).unwrap();
    let removed = s.confirm_remove().unwrap();
    assert_eq!(removed.id, b);
    assert_eq!(s.ids(), vec![a, c]);
    assert_eq!(s.pending_removal(), None);
}

#[test]
fn rename_updates_name() {
    let (mut s, a, ..) = abc();
    s.rename(a, "Sky").unwrap();
    assert_eq!(s.get(a).unwrap().name, "Sky");
}
