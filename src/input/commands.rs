//! # Command Definitions
//!
//! Text commands for scripted or line-based play, e.g. `move ne`,
//! `use 0 12 7`, `level strength`, `cheat god`.

use crate::game::level::StatBoost;
use crate::game::settings::CheatCommand;
use crate::game::{Direction, Position};
use crate::input::PlayerInput;
use crate::{TowerError, TowerResult};

/// Parses one command line.
///
/// # Examples
///
/// ```
/// use fleshtower::{parse_command, Direction, PlayerInput};
///
/// assert_eq!(parse_command("move sw").unwrap(), PlayerInput::Move(Direction::Southwest));
/// assert_eq!(parse_command("buy 2").unwrap(), PlayerInput::Buy(2));
/// assert!(parse_command("dance").is_err());
/// ```
pub fn parse_command(line: &str) -> TowerResult<PlayerInput> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = words.split_first() else {
        return Err(TowerError::impossible("Say something."));
    };
    let input = match verb.to_ascii_lowercase().as_str() {
        "move" | "m" => PlayerInput::Move(parse_direction(args.first().copied())?),
        "wait" | "rest" => PlayerInput::Wait,
        "pickup" | "get" => PlayerInput::PickUp,
        "stairs" | "up" => PlayerInput::TakeStairs,
        "eat" => PlayerInput::ConsumeCorpse,
        "equip" => PlayerInput::Equip(parse_index(args.first().copied())?),
        "drop" => PlayerInput::Drop(parse_index(args.first().copied())?),
        "use" => PlayerInput::UseItem {
            index: parse_index(args.first().copied())?,
            target: parse_target(&args[args.len().min(1)..])?,
        },
        "cast" => PlayerInput::CastSpell(parse_index(args.first().copied())?),
        "buy" => PlayerInput::Buy(parse_index(args.first().copied())?),
        "level" => PlayerInput::LevelUp(parse_boost(args.first().copied())?),
        "cheat" => PlayerInput::Cheat(parse_cheat(args.first().copied())?),
        "inventory" | "inv" => PlayerInput::ShowInventory,
        "help" => PlayerInput::Help,
        "quit" | "exit" => PlayerInput::Quit,
        other => {
            return Err(TowerError::impossible(format!("Unknown command '{}'.", other)));
        }
    };
    Ok(input)
}

fn parse_direction(word: Option<&str>) -> TowerResult<Direction> {
    let direction = match word.map(str::to_ascii_lowercase).as_deref() {
        Some("n" | "north") => Direction::North,
        Some("s" | "south") => Direction::South,
        Some("e" | "east") => Direction::East,
        Some("w" | "west") => Direction::West,
        Some("ne" | "northeast") => Direction::Northeast,
        Some("nw" | "northwest") => Direction::Northwest,
        Some("se" | "southeast") => Direction::Southeast,
        Some("sw" | "southwest") => Direction::Southwest,
        _ => return Err(TowerError::impossible("Which way?")),
    };
    Ok(direction)
}

fn parse_index(word: Option<&str>) -> TowerResult<usize> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| TowerError::impossible("Which one?"))
}

fn parse_target(args: &[&str]) -> TowerResult<Option<Position>> {
    match args {
        [] => Ok(None),
        [x, y] => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Ok(Some(Position::new(x, y))),
            _ => Err(TowerError::impossible("That is not a place.")),
        },
        _ => Err(TowerError::impossible("Give a target as two numbers.")),
    }
}

fn parse_boost(word: Option<&str>) -> TowerResult<StatBoost> {
    let boost = match word.map(str::to_ascii_lowercase).as_deref() {
        Some("constitution" | "hp") => StatBoost::Constitution,
        Some("strength" | "str") => StatBoost::Strength,
        Some("agility" | "agi") => StatBoost::Agility,
        Some("mana" | "mp") => StatBoost::Mana,
        _ => return Err(TowerError::impossible("Grow how?")),
    };
    Ok(boost)
}

fn parse_cheat(word: Option<&str>) -> TowerResult<CheatCommand> {
    let cheat = match word.map(str::to_ascii_lowercase).as_deref() {
        Some("shop") => CheatCommand::SpawnShop,
        Some("up") => CheatCommand::FloorUp,
        Some("down") => CheatCommand::FloorDown,
        Some("level") => CheatCommand::LevelUp,
        Some("god") => CheatCommand::ToggleGodMode,
        Some("noclip") => CheatCommand::ToggleNoclip,
        _ => return Err(TowerError::impossible("No such cheat.")),
    };
    Ok(cheat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_with_and_without_target() {
        assert_eq!(
            parse_command("use 1").unwrap(),
            PlayerInput::UseItem {
                index: 1,
                target: None
            }
        );
        assert_eq!(
            parse_command("USE 0 12 7").unwrap(),
            PlayerInput::UseItem {
                index: 0,
                target: Some(Position::new(12, 7))
            }
        );
        assert!(parse_command("use 0 12").is_err());
        assert!(parse_command("use").is_err());
    }

    #[test]
    fn test_level_and_cheats() {
        assert_eq!(parse_command("level hp").unwrap(), PlayerInput::LevelUp(StatBoost::Constitution));
        assert_eq!(parse_command("cheat noclip").unwrap(), PlayerInput::Cheat(CheatCommand::ToggleNoclip));
        assert!(parse_command("cheat fly").unwrap_err().is_impossible());
    }

    #[test]
    fn test_blank_line() {
        assert!(parse_command("   ").is_err());
    }
}
