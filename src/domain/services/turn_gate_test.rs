use super::TurnGate;

#[test]
fn it_refuses_a_second_permit_while_held() {
    let gate = TurnGate::default();

    let permit = gate.try_begin();
    assert!(permit.is_some());
    assert!(gate.try_begin().is_none());
}

#[test]
fn it_releases_the_slot_on_drop() {
    let gate = TurnGate::default();

    let permit = gate.try_begin();
    assert!(permit.is_some());
    drop(permit);

    assert!(gate.try_begin().is_some());
}
