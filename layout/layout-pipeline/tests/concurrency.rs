//! Concurrent first use of a shared service.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Barrier};
use std::thread;

use layout_models::ScheduleConfig;
use layout_pipeline::{LayoutService, PipelineConfig};
use layout_types::ConstraintGraph;

fn graph() -> ConstraintGraph {
    ConstraintGraph::from_json(
        r#"{"nodes": [
                {"id": "a", "label": "Living", "type": "living_room"},
                {"id": "b", "label": "Bath", "type": "bathroom"}
            ],
            "links": [{"source": "a", "target": "b", "type": "adjacent"}]}"#,
    )
    .unwrap()
}

#[test]
fn concurrent_first_requests_load_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default()
        .with_checkpoint_dir(dir.path())
        .with_schedule(ScheduleConfig::new(5));
    let service = Arc::new(LayoutService::cpu(config).unwrap());

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|seed| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.generate_seeded(&graph(), seed as u64).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap();
        assert_eq!(outcome.rooms.len(), 2);
    }
    assert_eq!(service.load_count(), 1);
}

#[test]
fn shared_weights_give_matching_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default()
        .with_checkpoint_dir(dir.path())
        .with_schedule(ScheduleConfig::new(5));
    let service = Arc::new(LayoutService::cpu(config).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.generate_seeded(&graph(), 99).unwrap().rooms)
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}
