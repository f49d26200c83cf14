//! End-to-end extrusion into GLB.

#![allow(clippy::unwrap_used)]

use layout_scene::{
    BackendStatus, Extruder, ExtrusionConfig, SOLIDS_PER_ROOM, Scene3D, SolidKind, WALL_COLOR,
    floor_color, parse_glb,
};
use layout_types::RoomGeometry;

fn grid(count: usize) -> Vec<RoomGeometry> {
    let types = ["living_room", "kitchen", "bedroom", "bathroom", "storage"];
    (0..count)
        .map(|i| {
            let col = f64::from(u32::try_from(i % 4).unwrap());
            let row = f64::from(u32::try_from(i / 4).unwrap());
            RoomGeometry::from_center(
                format!("room_{i}"),
                format!("Room {i}"),
                types[i % types.len()],
                100.0 + col * 150.0,
                100.0 + row * 120.0,
                120.0,
                90.0,
            )
        })
        .collect()
}

#[test]
fn solid_count_is_five_per_room() {
    for k in [0, 1, 3, 8] {
        let scene = Scene3D::from_rooms(&grid(k), &ExtrusionConfig::default()).unwrap();
        assert_eq!(scene.len(), SOLIDS_PER_ROOM * k);

        let extruder = Extruder::with_status(ExtrusionConfig::default(), BackendStatus::Ready);
        let asset = extruder.extrude(&grid(k)).unwrap();
        assert_eq!(parse_glb(asset.as_bytes()).unwrap().mesh_count(), SOLIDS_PER_ROOM * k);
    }
}

#[test]
fn floors_follow_palette_and_walls_are_gray() {
    let scene = Scene3D::from_rooms(&grid(5), &ExtrusionConfig::default()).unwrap();
    for solid in scene.solids() {
        match solid.kind {
            SolidKind::Floor => {
                let room = grid(5).into_iter().find(|r| r.id == solid.room_id).unwrap();
                assert_eq!(solid.color, floor_color(&room.room_type));
            }
            SolidKind::Wall(_) => assert_eq!(solid.color, WALL_COLOR),
        }
    }
}

#[test]
fn one_bad_room_spoils_the_request_not_the_process() {
    let extruder = Extruder::with_status(ExtrusionConfig::default(), BackendStatus::Ready);

    let mut rooms = grid(3);
    rooms[2].width = -5.0;
    assert!(extruder.extrude(&rooms).unwrap().is_placeholder());

    let asset = extruder.extrude(&grid(3)).unwrap();
    assert!(!asset.is_placeholder());
}

#[test]
fn disabled_backend_never_exports() {
    let extruder = Extruder::with_status(
        ExtrusionConfig::default(),
        BackendStatus::disabled("geometry backend missing"),
    );
    for k in [0, 2, 8] {
        assert!(extruder.extrude(&grid(k)).is_none());
    }
}

#[test]
fn asset_is_base64_transportable() {
    let extruder = Extruder::with_status(ExtrusionConfig::default(), BackendStatus::Ready);
    let encoded = extruder.extrude(&grid(2)).unwrap().to_base64();
    assert!(encoded.starts_with("Z2xURg"));
}
