use common::timer::Timers;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    A,
    B,
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_one_shot_fires_once() {
    let start = Instant::now();
    let mut timers = Timers::new();
    timers.after(start, ms(100), Task::A);

    assert!(timers.poll(start + ms(99)).is_empty());
    let fired = timers.poll(start + ms(100));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].1, Task::A);
    assert!(timers.poll(start + ms(1000)).is_empty());
}

#[test]
fn test_recurring_catches_up() {
    let start = Instant::now();
    let mut timers = Timers::new();
    timers.every(start, ms(10), Task::A);

    // A late poll fires once per elapsed period.
    let fired = timers.poll(start + ms(35));
    assert_eq!(fired.len(), 3);

    let fired = timers.poll(start + ms(40));
    assert_eq!(fired.len(), 1);
}

#[test]
fn test_cancel() {
    let start = Instant::now();
    let mut timers = Timers::new();
    let a = timers.after(start, ms(10), Task::A);
    timers.every(start, ms(10), Task::B);

    assert!(timers.cancel(a));
    assert!(!timers.cancel(a));

    let fired = timers.poll(start + ms(10));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].1, Task::B);
}

#[test]
fn test_fires_in_deadline_order() {
    let start = Instant::now();
    let mut timers = Timers::new();
    timers.after(start, ms(20), Task::B);
    timers.after(start, ms(10), Task::A);

    let fired: Vec<Task> = timers
        .poll(start + ms(25))
        .into_iter()
        .map(|(_, task)| task)
        .collect();
    assert_eq!(fired, [Task::A, Task::B]);
}

#[test]
fn test_next_deadline() {
    let start = Instant::now();
    let mut timers = Timers::new();
    assert!(timers.next_deadline().is_none());

    timers.after(start, ms(30), Task::A);
    timers.after(start, ms(20), Task::B);
    assert_eq!(timers.next_deadline(), Some(start + ms(20)));

    timers.clear();
    assert!(timers.next_deadline().is_none());
}
