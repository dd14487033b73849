//! CSV output for game records.
//!
//! One row per game plus the move list flattened into a compact string,
//! so results load directly into the analysis notebooks.

use crate::recording::game_record::GameRecord;
use crate::Result;
use std::path::Path;

pub struct CsvRecorder {
    writer: csv::Writer<std::fs::File>,
}

impl CsvRecorder {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<CsvRecorder> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "game_id",
            "finished_at",
            "player1",
            "player2",
            "winner",
            "player1_score",
            "player2_score",
            "move_count",
            "moves",
        ])?;
        Ok(CsvRecorder { writer })
    }

    pub fn write_game(&mut self, record: &GameRecord) -> Result<()> {
        let winner = match record.winner {
            Some(player) => player.to_string(),
            None => "draw".to_string(),
        };
        let moves = record
            .moves
            .iter()
            .map(|m| format!("t{}h{}", m.tile, m.cell))
            .collect::<Vec<_>>()
            .join(" ");

        self.writer.write_record([
            record.game_id.to_string(),
            record.finished_at.clone(),
            record.player1.to_string(),
            record.player2.to_string(),
            winner,
            record.player1_score.to_string(),
            record.player2_score.to_string(),
            record.move_count.to_string(),
            moves,
        ])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Player;
    use crate::recording::game_record::{MoveRecord, PlayerKind};

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.csv");

        let mut recorder = CsvRecorder::create(&path).unwrap();
        recorder
            .write_game(&GameRecord {
                game_id: 1,
                finished_at: "2026-01-01T00:00:00Z".to_string(),
                player1: PlayerKind::Hybrid,
                player2: PlayerKind::Random,
                winner: Some(Player::One),
                player1_score: 210,
                player2_score: 180,
                move_count: 18,
                moves: vec![MoveRecord {
                    turn: 0,
                    player: Player::One,
                    cell: 4,
                    tile: 9,
                    source: None,
                }],
            })
            .unwrap();
        recorder.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("game_id,"));
        let row = lines.next().unwrap();
        assert!(row.contains("hybrid"));
        assert!(row.contains("t9h4"));
        assert!(row.contains("210"));
    }
}
