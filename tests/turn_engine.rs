//! Whole-game behavior of the turn engine.

use fleshtower::{
    spawn_monster, spawn_player, AutoPilot, AutoStep, BumpAction, Direction, Entity, Fighter,
    GameMap, GameState, MonsterKind, PlayerClass, Position, Settings, Tile, TowerError,
    TowerResult, TurnOutcome, WaitAction,
};

fn corridor(length: i32) -> GameMap {
    let mut map = GameMap::new(length as u32 + 2, 3, 1);
    for x in 1..=length {
        map.set_tile(Position::new(x, 1), Tile::floor()).unwrap();
    }
    map
}

#[test]
fn test_fighter_example_stats() {
    let mut fighter = Fighter::new(30, 1, 2);
    assert_eq!(fighter.max_hp(), 30);
    assert_eq!(fighter.power(), 2);
    assert_eq!(fighter.defense(), 1);

    fighter.derive_stats(false);
    fighter.derive_stats(false);
    assert_eq!(fighter.max_hp(), 30);
    assert_eq!(fighter.hp(), 30);
}

#[test]
fn test_defense_soaks_damage() {
    let mut fighter = Fighter::new(30, 3, 2);
    assert_eq!(fighter.take_damage(10, false), 7);
    assert_eq!(fighter.hp(), 23);
    assert_eq!(fighter.take_damage(2, false), 0);
    assert_eq!(fighter.hp(), 23);
    assert_eq!(fighter.take_damage(2, true), 2);
}

#[test]
fn test_hp_is_clamped() {
    let mut fighter = Fighter::new(30, 0, 2);
    fighter.set_hp(500);
    assert_eq!(fighter.hp(), 30);
    fighter.set_hp(-5);
    assert_eq!(fighter.hp(), 0);
}

#[test]
fn test_enemy_closes_in_and_attacks() -> TowerResult<()> {
    let mut map = corridor(10);
    let player = spawn_player(Position::new(1, 1));
    let player_id = player.id();
    map.add_entity(player);
    let troll = spawn_monster(MonsterKind::Troll, Position::new(6, 1));
    let troll_id = troll.id();
    map.add_entity(troll);
    let mut state = GameState::with_map(map, player_id, Settings::for_testing(), 4)?;

    let mut adjacent_after = None;
    for turn in 0..40 {
        state.handle_player_action(&WaitAction::new(player_id).into())?;
        if state.is_game_over() {
            break;
        }
        let distance = state.actor(troll_id)?.position().chebyshev_distance(Position::new(1, 1));
        if distance == 1 && adjacent_after.is_none() {
            adjacent_after = Some(turn);
        }
    }
    assert_eq!(adjacent_after, Some(3));
    assert!(state.statistics.damage_taken > 0);
    Ok(())
}

#[test]
fn test_rejected_bump_keeps_world_still() -> TowerResult<()> {
    let mut map = corridor(10);
    let player = spawn_player(Position::new(1, 1));
    let player_id = player.id();
    map.add_entity(player);
    let orc = spawn_monster(MonsterKind::Orc, Position::new(7, 1));
    let orc_id = orc.id();
    map.add_entity(orc);
    let mut state = GameState::with_map(map, player_id, Settings::for_testing(), 4)?;

    let outcome = state.handle_player_action(&BumpAction::new(player_id, Direction::North).into())?;
    assert!(matches!(outcome, TurnOutcome::Rejected(_)));
    assert_eq!(state.actor(orc_id)?.position(), Position::new(7, 1));
    assert_eq!(state.turn_number, 0);
    Ok(())
}

#[test]
fn test_only_the_player_acts_through_the_engine() -> TowerResult<()> {
    let mut map = corridor(5);
    let player = spawn_player(Position::new(1, 1));
    let player_id = player.id();
    map.add_entity(player);
    let rat = spawn_monster(MonsterKind::Rat, Position::new(4, 1));
    let rat_id = rat.id();
    map.add_entity(rat);
    let mut state = GameState::with_map(map, player_id, Settings::for_testing(), 4)?;

    let result = state.handle_player_action(&WaitAction::new(rat_id).into());
    assert!(matches!(result, Err(TowerError::InvalidState(_))));
    Ok(())
}

#[test]
fn test_autopilot_plays_a_seeded_game() -> TowerResult<()> {
    let mut settings = Settings::for_testing();
    settings.god_mode = true;
    let mut state = GameState::new(2024, settings)?;
    let mut pilot = AutoPilot::new(PlayerClass::Fighter);

    for _ in 0..400 {
        match pilot.next_step(&state)? {
            AutoStep::LevelUp(boost) => state.level_up(boost)?,
            AutoStep::Act(action) => {
                if let TurnOutcome::Rejected(_) = state.handle_player_action(&action)? {
                    state.handle_player_action(&WaitAction::new(state.player_id).into())?;
                }
            }
            AutoStep::Stuck => break,
        }
        if state.current_floor >= 2 {
            break;
        }
    }

    assert_eq!(state.player()?.player_class, PlayerClass::Fighter);
    assert!(state.current_floor >= 1);
    assert!(state.statistics.steps_taken > 0);
    Ok(())
}
