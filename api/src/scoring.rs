//! FanDuel and DraftKings NBA scoring.
use crate::StatLine;

/// DraftKings multi-category bonus, decided by how many of PTS, REB, AST,
/// STL and BLK reach double digits. Tiers are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DkBonus {
    None,
    DoubleDouble,
    TripleDouble,
}

impl DkBonus {
    pub fn for_line(line: &StatLine) -> Self {
        let double_digit = [line.pts, line.reb, line.ast, line.stl, line.blk]
            .iter()
            .filter(|&&v| v >= 10)
            .count();
        if double_digit >= 3 {
            DkBonus::TripleDouble
        } else if double_digit >= 2 {
            DkBonus::DoubleDouble
        } else {
            DkBonus::None
        }
    }

    pub fn points(self) -> f64 {
        match self {
            DkBonus::None => 0.0,
            DkBonus::DoubleDouble => 1.5,
            DkBonus::TripleDouble => 3.0,
        }
    }
}

/// PTS=1, REB=1.2, AST=1.5, STL=3, BLK=3, TO=-1. No bonuses.
pub fn fanduel(line: &StatLine) -> f64 {
    let score = f64::from(line.pts)
        + f64::from(line.reb) * 1.2
        + f64::from(line.ast) * 1.5
        + f64::from(line.stl) * 3.0
        + f64::from(line.blk) * 3.0
        - f64::from(line.turnovers);
    round2(score)
}

/// PTS=1, 3PM=0.5, REB=1.25, AST=1.5, STL=2, BLK=2, TO=-0.5, plus
/// +1.5 double-double or +3 triple-double.
pub fn draftkings(line: &StatLine) -> f64 {
    let score = f64::from(line.pts)
        + f64::from(line.three_pm) * 0.5
        + f64::from(line.reb) * 1.25
        + f64::from(line.ast) * 1.5
        + f64::from(line.stl) * 2.0
        + f64::from(line.blk) * 2.0
        - f64::from(line.turnovers) * 0.5;
    round2(score + DkBonus::for_line(line).points())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
