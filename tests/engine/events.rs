//! Integration tests for event channels

use std::cell::RefCell;
use std::rc::Rc;

use tickwork_engine::EventBus;

#[derive(Debug, Clone, PartialEq)]
enum GameEvent {
    Spawned(u32),
    Died(u32),
}

#[test]
fn channels_are_independent() {
    let spawned = Rc::new(RefCell::new(Vec::new()));
    let died = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::new();

    let sink = Rc::clone(&spawned);
    bus.subscribe("spawn", move |e: &GameEvent| sink.borrow_mut().push(e.clone()));
    let sink = Rc::clone(&died);
    bus.subscribe("death", move |e: &GameEvent| sink.borrow_mut().push(e.clone()));

    assert_eq!(bus.publish("spawn", &GameEvent::Spawned(1)), 1);
    assert_eq!(bus.publish("death", &GameEvent::Died(1)), 1);
    assert_eq!(bus.publish("unknown", &GameEvent::Died(2)), 0);

    assert_eq!(*spawned.borrow(), vec![GameEvent::Spawned(1)]);
    assert_eq!(*died.borrow(), vec![GameEvent::Died(1)]);
}

#[test]
fn unsubscribe_only_affects_that_subscriber() {
    let hits = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::new();

    let sink = Rc::clone(&hits);
    let first = bus.subscribe("ping", move |n: &u32| sink.borrow_mut().push(("first", *n)));
    let sink = Rc::clone(&hits);
    bus.subscribe("ping", move |n: &u32| sink.borrow_mut().push(("second", *n)));

    bus.publish("ping", &1);
    assert!(bus.unsubscribe("ping", first));
    bus.publish("ping", &2);

    assert_eq!(*hits.borrow(), vec![("first", 1), ("second", 1), ("second", 2)]);
    assert_eq!(bus.subscriber_count("ping"), 1);
}
