//! Runs the `floorplan` binary end to end.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const PROGRAM: &str = r#"{
    "rooms": [
        {"id": "lr", "name": "Living", "type": "living_room", "constraints": {"min_area": 25}},
        {"id": "kt", "name": "Kitchen", "type": "kitchen"},
        {"id": "bd", "name": "Bedroom", "type": "bedroom"}
    ],
    "adjacencies": [{"room_id_a": "lr", "room_id_b": "kt", "type": "direct"}]
}"#;

fn floorplan(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_floorplan"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn program_to_svg_and_geometry() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("program.json"), PROGRAM).unwrap();

    let out = floorplan(dir.path(), &["build-graph", "program.json", "-o", "graph.json"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("3 rooms"));

    let out = floorplan(
        dir.path(),
        &[
            "generate",
            "graph.json",
            "--seed",
            "7",
            "--steps",
            "4",
            "--svg",
            "plan.svg",
            "--geometry",
            "rooms.json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("untrained"));

    let svg = fs::read_to_string(dir.path().join("plan.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<rect").count(), 3);

    let rooms: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("rooms.json")).unwrap()).unwrap();
    assert_eq!(rooms.as_array().unwrap().len(), 3);
    assert_eq!(rooms[1]["id"], "kt");
}

#[test]
fn extrude_writes_glb() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("rooms.json"),
        r#"[{"id": "k", "name": "Kitchen", "type": "kitchen",
             "x": 350, "y": 275, "width": 100, "height": 50,
             "center_x": 400, "center_y": 300}]"#,
    )
    .unwrap();

    let out = floorplan(dir.path(), &["extrude", "rooms.json", "-o", "scene.glb"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let bytes = fs::read(dir.path().join("scene.glb")).unwrap();
    assert_eq!(&bytes[..4], b"glTF");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = floorplan(dir.path(), &["generate", "absent.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("absent.json"));
}
