use std::sync::Arc;
use std::thread;

use crate::event::manager::{DefaultEventManager, EventManager};
use crate::event::resolver::TypeRef;
use super::common::{NormalSuffix, Tick, TickCounter};

const THREADS: usize = 8;
const ROUNDS: usize = 50;

#[test]
fn test_concurrent_subscribe_and_unsubscribe() {
    let manager = DefaultEventManager::new();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let manager = manager.clone();
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    let listener = Arc::new(NormalSuffix { suffix: "-x" });
                    manager.subscribe(&listener);
                    assert!(manager.unsubscribe(&listener));
                }
            });
        }
    });

    assert!(manager.listeners().is_empty());
}

#[test]
fn test_dispatch_while_registering() {
    let manager = DefaultEventManager::new();
    manager.register_events(&[TypeRef::of::<TickCounter>()]);

    thread::scope(|scope| {
        let writer = manager.clone();
        scope.spawn(move || {
            for _ in 0..ROUNDS {
                let counter = Arc::new(TickCounter);
                writer.subscribe(&counter);
                writer.unsubscribe(&counter);
            }
        });

        for _ in 0..THREADS {
            let reader = manager.clone();
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    // The type-level handler always runs; instance handlers come and go
                    let count = reader.on_event(Tick::default()).count;
                    assert!((1..=12).contains(&count), "count {count}");
                }
            });
        }
    });

    assert_eq!(manager.on_event(Tick::default()).count, 1);
}
