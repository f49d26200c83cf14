//! Decoder properties over arbitrary layout vectors.

#![allow(clippy::unwrap_used)]

use layout_pipeline::{DecoderConfig, LayoutDecoder};
use layout_types::{ConstraintGraph, LayoutVector, RoomNode};
use proptest::prelude::*;

fn graph(n: usize) -> ConstraintGraph {
    let nodes = (0..n)
        .map(|i| RoomNode::new(format!("room{i}"), "Room", "other"))
        .collect();
    ConstraintGraph::new(nodes, Vec::new(), Default::default()).unwrap()
}

proptest! {
    #[test]
    fn footprint_floor_and_length(
        n in 0usize..14,
        values in prop::collection::vec(-1.0e4f32..1.0e4, 32),
    ) {
        let g = graph(n);
        let layout = LayoutVector::new(g.node_order(), 8, values).unwrap();
        let rooms = LayoutDecoder::new(DecoderConfig::default()).decode(&layout, &g).unwrap();

        prop_assert_eq!(rooms.len(), n.min(8));
        for room in &rooms {
            prop_assert!(room.width >= 20.0);
            prop_assert!(room.height >= 20.0);
            prop_assert!((room.x + room.width / 2.0 - room.center_x).abs() < 1e-6);
            prop_assert!((room.y + room.height / 2.0 - room.center_y).abs() < 1e-6);
        }
    }

    #[test]
    fn rooms_follow_node_order(n in 1usize..8) {
        let g = graph(n);
        let layout = LayoutVector::new(g.node_order(), 8, vec![0.0; 32]).unwrap();
        let rooms = LayoutDecoder::default().decode(&layout, &g).unwrap();
        for (slot, room) in rooms.iter().enumerate() {
            prop_assert_eq!(&room.id, &format!("room{slot}"));
        }
    }
}
