//! Property tests for floor generation.

use fleshtower::{
    generate_floor, Entity, FloorKind, GameMap, GenerationConfig, Generator, Position,
    RoomCorridorGenerator, RoomType,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn dungeon(seed: u64, floor: u32) -> GameMap {
    let mut rng = StdRng::seed_from_u64(seed);
    RoomCorridorGenerator::new()
        .generate(&GenerationConfig::new(floor), &mut rng)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rooms_never_overlap(seed in any::<u64>(), floor in 1u32..20) {
        let map = dungeon(seed, floor);
        for (i, a) in map.rooms.iter().enumerate() {
            for b in &map.rooms[i + 1..] {
                prop_assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn room_interiors_are_walkable(seed in any::<u64>(), floor in 1u32..20) {
        let map = dungeon(seed, floor);
        for room in &map.rooms {
            for pos in room.floor_positions() {
                prop_assert!(map.is_walkable(pos));
            }
        }
    }

    #[test]
    fn player_starts_in_first_room(seed in any::<u64>(), floor in 1u32..20) {
        let map = dungeon(seed, floor);
        let first = &map.rooms[0];
        prop_assert_eq!(first.room_type, RoomType::Start);
        prop_assert!(first.contains(map.player_start));
        prop_assert!(map.is_walkable(map.player_start));
        prop_assert!(map.living_actors().all(|actor| !first.contains(actor.position())));
    }

    #[test]
    fn entities_stand_on_floor(seed in any::<u64>(), floor in 1u32..20) {
        let map = dungeon(seed, floor);
        for entity in &map.entities {
            prop_assert!(map.is_walkable(fleshtower::Entity::position(entity)));
        }
        prop_assert!(map.living_actors().filter(|a| a.is_vendor()).count() <= 1);
    }

    #[test]
    fn small_maps_still_terminate(
        seed in any::<u64>(),
        width in 3u32..20,
        height in 3u32..20,
        min in 1u32..8,
        extra in 0u32..6,
    ) {
        let mut config = GenerationConfig::new(2);
        config.map_width = width;
        config.map_height = height;
        config.room_min_size = min;
        config.room_max_size = min + extra;
        let mut rng = StdRng::seed_from_u64(seed);
        let map = generate_floor(&config, FloorKind::Dungeon, &mut rng).unwrap();
        prop_assert!(!map.rooms.is_empty());
        prop_assert!(map.is_walkable(map.player_start));
    }

    #[test]
    fn every_fifth_floor_is_a_boss(level in 1u32..40, shop_roll in any::<bool>()) {
        let floor = level * 5;
        prop_assert_eq!(FloorKind::route(floor, shop_roll), FloorKind::Boss);
        prop_assert_ne!(FloorKind::route(floor + 1, shop_roll), FloorKind::Boss);
    }
}

#[test]
fn first_floor_is_never_a_shop() {
    assert_eq!(FloorKind::route(1, true), FloorKind::Dungeon);
}

#[test]
fn special_floors_validate() {
    let mut rng = StdRng::seed_from_u64(77);
    for (floor, kind) in [
        (0, FloorKind::ClassSelect),
        (5, FloorKind::Boss),
        (10, FloorKind::Boss),
        (3, FloorKind::Shop),
    ] {
        let map = generate_floor(&GenerationConfig::new(floor), kind, &mut rng).unwrap();
        assert_eq!(map.floor, floor);
        assert!(map.upstairs.is_some());
        assert_ne!(map.upstairs, Some(map.player_start));
        assert_ne!(map.player_start, Position::origin());
    }
}
