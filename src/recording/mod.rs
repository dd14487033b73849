pub mod csv_writer;
pub mod game_record;

pub use csv_writer::CsvRecorder;
pub use game_record::{GameRecord, MoveRecord, PlayerKind};
