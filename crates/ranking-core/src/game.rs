//! Game selection and the store paths derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Games whose scores live in the record store.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameType {
    #[default]
    Memotest,
    Trivia,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn all() -> impl Iterator<Item = GameType> {
        Self::iter()
    }
}

/// Subtree of the record store holding one game's participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordPath {
    /// `games/<game>/usuarios`
    Game(GameType),
    /// Flat `usuarios` tree from before games were namespaced.
    Legacy,
}

impl RecordPath {
    pub fn for_game(game: GameType, legacy: bool) -> Self {
        if legacy { Self::Legacy } else { Self::Game(game) }
    }

    /// Game identifier used in export file names.
    pub fn game_id(&self) -> &'static str {
        match self {
            Self::Game(game) => game.as_str(),
            Self::Legacy => "legacy",
        }
    }

    pub fn to_path_string(&self) -> String {
        match self {
            Self::Game(game) => format!("games/{}/usuarios", game),
            Self::Legacy => "usuarios".to_string(),
        }
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_game_is_memotest() {
        assert_eq!(GameType::default(), GameType::Memotest);
    }

    #[test]
    fn test_parse_game_type() {
        assert_eq!(GameType::from_str("trivia").unwrap(), GameType::Trivia);
        assert_eq!(GameType::from_str("MEMOTEST").unwrap(), GameType::Memotest);
        assert!(GameType::from_str("chess").is_err());
    }

    #[test]
    fn test_game_paths() {
        assert_eq!(
            RecordPath::Game(GameType::Trivia).to_path_string(),
            "games/trivia/usuarios"
        );
        assert_eq!(RecordPath::Legacy.to_path_string(), "usuarios");
        assert_eq!(
            RecordPath::for_game(GameType::Trivia, true),
            RecordPath::Legacy
        );
    }

    #[test]
    fn test_all_games_listed() {
        let games: Vec<&str> = GameType::all().map(|g| g.as_str()).collect();
        assert_eq!(games, vec!["memotest", "trivia"]);
    }
}
