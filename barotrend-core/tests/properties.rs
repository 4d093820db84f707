//! Property-based checks of the queue and the trend detector

use std::collections::VecDeque;

use barotrend_core::{
    errors::QueueError,
    queue::TelemetryQueue,
    telemetry::TelemetryMessage,
    trend::{Trend, TrendDetector},
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(u16),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u16>().prop_map(Op::Push),
        2 => Just(Op::Pop),
    ]
}

fn message(id: u16) -> TelemetryMessage {
    let topic = format!("home/sketch/bmp280/{}", id);
    TelemetryMessage::new(&topic, "{}", false).unwrap()
}

proptest! {
    #[test]
    fn queue_matches_bounded_fifo_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut queue: TelemetryQueue<10> = TelemetryQueue::new();
        let mut model: VecDeque<u16> = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(id) => {
                    let result = queue.enqueue(message(id));
                    if model.len() == 10 {
                        prop_assert_eq!(result, Err(QueueError::Full { capacity: 10 }));
                    } else {
                        prop_assert!(result.is_ok());
                        model.push_back(id);
                    }
                }
                Op::Pop => match model.pop_front() {
                    Some(id) => {
                        let popped = queue.dequeue().unwrap();
                        prop_assert_eq!(popped, message(id));
                    }
                    None => prop_assert_eq!(queue.dequeue(), Err(QueueError::Empty)),
                },
            }

            prop_assert_eq!(queue.len(), model.len());
            prop_assert!(queue.len() <= queue.capacity());
            prop_assert_eq!(queue.peek().cloned(), model.front().map(|&id| message(id)));
        }

        let stats = queue.stats();
        prop_assert_eq!(stats.pushed - stats.popped, model.len() as u32);
        prop_assert!(stats.max_depth as usize <= 10);
    }

    #[test]
    fn fewer_than_six_readings_are_training(
        readings in prop::collection::vec(900.0f64..1100.0, 1..6)
    ) {
        let mut detector = TrendDetector::new();
        for reading in readings {
            prop_assert_eq!(detector.classify(reading), Trend::Training);
        }
    }

    #[test]
    fn constant_window_is_steady(
        prefix in prop::collection::vec(900.0f64..1100.0, 0..20),
        level in 900i32..1100,
    ) {
        let mut detector = TrendDetector::new();
        for reading in prefix {
            detector.classify(reading);
        }

        let mut trend = Trend::Training;
        for _ in 0..6 {
            trend = detector.classify(f64::from(level));
        }
        prop_assert_eq!(trend, Trend::Steady);
    }

    #[test]
    fn linear_series_follows_its_slope(
        start in 900i32..1100,
        step in prop_oneof![-20i32..=-1, 1i32..=20],
    ) {
        let mut detector = TrendDetector::new();
        let mut trend = Trend::Training;
        for i in 0..6 {
            trend = detector.classify(f64::from(start + step * i));
        }

        let expected = if step > 0 { Trend::Rising } else { Trend::Falling };
        prop_assert_eq!(trend, expected);
    }
}
