//! PGN game-record parsing
//!
//! Produces the raw SAN move list plus tag metadata. Legality is not
//! checked here: replaying the moves (and deciding what to do with an
//! illegal one) is the analysis orchestrator's job.

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::san::San;
use std::io::Cursor;
use std::ops::ControlFlow;

use thiserror::Error;

/// Represents a parsed chess game
#[derive(Debug, Clone)]
pub struct PgnGame {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub white_elo: Option<u16>,
    pub black_elo: Option<u16>,
    /// Mainline moves in game order, one SAN per ply
    pub sans: Vec<San>,
}

impl PgnGame {
    pub fn move_count(&self) -> usize {
        self.sans.len()
    }

    /// White player name, empty string when the tag is absent
    pub fn white_name(&self) -> &str {
        self.white.as_deref().unwrap_or("")
    }

    /// Black player name, empty string when the tag is absent
    pub fn black_name(&self) -> &str {
        self.black.as_deref().unwrap_or("")
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

#[derive(Default)]
struct GameTags {
    event: Option<String>,
    site: Option<String>,
    date: Option<String>,
    white: Option<String>,
    black: Option<String>,
    result: Option<String>,
    white_elo: Option<u16>,
    black_elo: Option<u16>,
}

struct GameMoves {
    tags: GameTags,
    sans: Vec<San>,
}

struct GameParser;

impl Visitor for GameParser {
    type Tags = GameTags;
    type Movetext = GameMoves;
    type Output = PgnGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name_str = String::from_utf8_lossy(name);
        let value_str = value.decode_utf8_lossy().to_string();

        match name_str.as_ref() {
            "Event" => tags.event = Some(value_str),
            "Site" => tags.site = Some(value_str),
            "Date" => tags.date = Some(value_str),
            "White" => tags.white = Some(value_str),
            "Black" => tags.black = Some(value_str),
            "Result" => tags.result = Some(value_str),
            "WhiteElo" => tags.white_elo = value_str.parse().ok(),
            "BlackElo" => tags.black_elo = value_str.parse().ok(),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(GameMoves {
            tags,
            sans: Vec::new(),
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        movetext.sans.push(san.san);
        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        PgnGame {
            event: movetext.tags.event,
            site: movetext.tags.site,
            date: movetext.tags.date,
            white: movetext.tags.white,
            black: movetext.tags.black,
            result: movetext.tags.result,
            white_elo: movetext.tags.white_elo,
            black_elo: movetext.tags.black_elo,
            sans: movetext.sans,
        }
    }
}

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("no game found in PGN")]
    NoGame,
    #[error("parse error: {0}")]
    Parse(String),
}

/// Parses the first game from a PGN string
pub fn parse_game(pgn: &str) -> Result<PgnGame, PgnError> {
    let mut parser = GameParser;

    let cursor = Cursor::new(pgn.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    match reader.read_game(&mut parser) {
        Ok(Some(game)) => Ok(game),
        Ok(None) => Err(PgnError::NoGame),
        Err(e) => Err(PgnError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PGN: &str = r#"[Event "Test"]
[White "Alice"]
[Black "Bob"]
[Result "1-0"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 1-0
"#;

    #[test]
    fn test_parse_game() {
        let game = parse_game(SAMPLE_PGN).unwrap();
        assert_eq!(game.white.as_deref(), Some("Alice"));
        assert_eq!(game.black.as_deref(), Some("Bob"));
        assert_eq!(game.result.as_deref(), Some("1-0"));
        assert_eq!(game.move_count(), 5);
        assert_eq!(game.sans[0].to_string(), "e4");
        assert_eq!(game.sans[2].to_string(), "Nf3");
    }

    #[test]
    fn test_game_summary() {
        let game = parse_game(SAMPLE_PGN).unwrap();
        assert_eq!(game.summary(), "Alice vs Bob - 1-0");
    }

    #[test]
    fn test_missing_names_are_empty() {
        let game = parse_game("1. e4 e5").unwrap();
        assert_eq!(game.white_name(), "");
        assert_eq!(game.black_name(), "");
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn test_empty_input_is_no_game() {
        assert!(matches!(parse_game(""), Err(PgnError::NoGame)));
        assert!(matches!(parse_game("   \n  "), Err(PgnError::NoGame)));
    }

    #[test]
    fn test_variations_are_skipped() {
        let game = parse_game("1. e4 (1. d4 d5) 1... e5 2. Nf3").unwrap();
        let sans: Vec<String> = game.sans.iter().map(|s| s.to_string()).collect();
        assert_eq!(sans, vec!["e4", "e5", "Nf3"]);
    }
}
