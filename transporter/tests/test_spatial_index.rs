use transporter::indexing::{ChunkPos, GateMap, Indices, Point, Role, Volume};

fn volume(gate: &str, world: &str, blocks: &[[i32; 3]]) -> Volume {
    let mut volume = Volume::new(gate, world);
    for [x, y, z] in blocks {
        volume.add_point(&Point::new(world, *x, *y, *z));
    }
    volume
}

#[test]
fn test_last_put_wins_shared_point() {
    let mut map = GateMap::default();
    let shared = Point::new("overworld", 1, 64, 1);
    map.put(&volume("overworld.A", "overworld", &[[0, 64, 0], [1, 64, 1]]));
    map.put(&volume("overworld.B", "overworld", &[[1, 64, 1], [2, 64, 2]]));

    assert_eq!(map.get_gate(&shared), Some("overworld.B"));
    assert_eq!(map.len(), 3);

    assert_eq!(map.remove_gate("overworld.B"), 2);
    assert_eq!(map.get_gate(&shared), None);
    assert_eq!(
        map.get_gate(&Point::new("overworld", 0, 64, 0)),
        Some("overworld.A")
    );
}

#[test]
fn test_remove_gate_keeps_overwritten_points_of_others() {
    let mut map = GateMap::default();
    let shared = Point::new("overworld", 5, 64, 5);
    map.put(&volume("overworld.A", "overworld", &[[5, 64, 5]]));
    map.put(&volume("overworld.B", "overworld", &[[5, 64, 5]]));

    assert_eq!(map.remove_gate("overworld.A"), 0);
    assert_eq!(map.get_gate(&shared), Some("overworld.B"));
}

#[test]
fn test_negative_coordinates_use_floor_chunks() {
    assert_eq!(ChunkPos::of([-1, 0, -16]), ChunkPos { x: -1, z: -1 });
    assert_eq!(ChunkPos::of([-17, 0, 15]), ChunkPos { x: -2, z: 0 });
    assert_eq!(ChunkPos::of([16, 0, 0]), ChunkPos { x: 1, z: 0 });

    let mut map = GateMap::default();
    map.put(&volume("overworld.A", "overworld", &[[-1, 64, -1], [0, 64, 0]]));
    assert_eq!(
        map.get_gate(&Point::new("overworld", -1, 64, -1)),
        Some("overworld.A")
    );
    assert_eq!(map.describe("overworld").len(), 2);
}

#[test]
fn test_worlds_are_separated() {
    let mut map = GateMap::default();
    map.put(&volume("overworld.A", "overworld", &[[0, 64, 0]]));
    map.put(&volume("nether.A", "nether", &[[0, 64, 0]]));

    assert_eq!(map.get_gate(&Point::new("nether", 0, 64, 0)), Some("nether.A"));
    map.remove_gate("nether.A");
    assert_eq!(map.get_gate(&Point::new("nether", 0, 64, 0)), None);
    assert_eq!(
        map.get_gate(&Point::new("overworld", 0, 64, 0)),
        Some("overworld.A")
    );
}

#[test]
fn test_rename_gate_moves_ownership() {
    let mut map = GateMap::default();
    map.put(&volume("overworld.A", "overworld", &[[0, 64, 0], [40, 64, 40]]));
    map.rename_gate("overworld.A", "overworld.Alpha");

    assert_eq!(
        map.get_gate(&Point::new("overworld", 40, 64, 40)),
        Some("overworld.Alpha")
    );
    assert_eq!(map.remove_gate("overworld.A"), 0);
    assert_eq!(map.remove_gate("overworld.Alpha"), 2);
    assert!(map.is_empty());
}

#[test]
fn test_volume_rejects_other_world() {
    let mut volume = Volume::new("overworld.A", "overworld");
    assert!(volume.add_point(&Point::new("overworld", 0, 0, 0)));
    assert!(!volume.add_point(&Point::new("nether", 1, 0, 0)));
    assert_eq!(volume.len(), 1);
    assert!(!volume.contains(&Point::new("nether", 0, 0, 0)));
}

#[test]
fn test_indices_replace_drops_stale_points() {
    let mut indices = Indices::default();
    indices.put(Role::Screen, &volume("overworld.A", "overworld", &[[0, 65, 0]]));
    indices.replace(Role::Screen, &volume("overworld.A", "overworld", &[[1, 65, 0]]));

    assert_eq!(indices.find(Role::Screen, &Point::new("overworld", 0, 65, 0)), None);
    assert_eq!(
        indices.find(Role::Screen, &Point::new("overworld", 1, 65, 0)),
        Some("overworld.A")
    );
    assert_eq!(indices.find(Role::Portal, &Point::new("overworld", 1, 65, 0)), None);

    indices.remove_gate("overworld.A");
    assert!(indices.map(Role::Screen).is_empty());
}
