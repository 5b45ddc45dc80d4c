use anyhow::Context;
use nba_dfs_api::{GameDate, ScoredPlayer};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Column names, matching the serialized field names of [`ScoredPlayer`].
pub const CSV_HEADER: [&str; 12] = [
    "player",
    "position",
    "team",
    "pts",
    "reb",
    "ast",
    "stl",
    "blk",
    "threePM",
    "turnovers",
    "fanduelScore",
    "draftkingsScore",
];

pub fn export_file_name(date: GameDate) -> String {
    format!("dfs_scores_{date}.csv")
}

/// Header row first (even with no players), then one row per player.
pub fn write_csv<W: io::Write>(writer: W, players: &[ScoredPlayer]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for player in players {
        wtr.serialize(player)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(dir: &Path, date: GameDate, players: &[ScoredPlayer]) -> anyhow::Result<PathBuf> {
    let path = dir.join(export_file_name(date));
    let file = File::create(&path).with_context(|| format!("could not create {}", path.display()))?;
    write_csv(file, players)?;
    Ok(path)
}
