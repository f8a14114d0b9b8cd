//! Difficulty keys and the per-difficulty tables modes are parameterised with.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    /// Parse a difficulty key. Unknown keys fall back to `Normal`.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "normal" => Difficulty::Normal,
            "hard" => Difficulty::Hard,
            "insane" => Difficulty::Insane,
            other => {
                log::warn!("unknown difficulty '{other}', using normal");
                Difficulty::Normal
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }
}

/// One value per difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedTable {
    pub easy: f64,
    pub normal: f64,
    pub hard: f64,
    pub insane: f64,
}

impl SpeedTable {
    pub const fn new(easy: f64, normal: f64, hard: f64, insane: f64) -> Self {
        Self { easy, normal, hard, insane }
    }

    pub fn get(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
            Difficulty::Insane => self.insane,
        }
    }

    /// Lookup by raw key; unknown keys resolve like `normal`.
    pub fn for_key(&self, key: &str) -> f64 {
        self.get(Difficulty::from_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_parse() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_key(d.key()), d);
        }
        assert_eq!(Difficulty::from_key(" HARD "), Difficulty::Hard);
    }

    #[test]
    fn unknown_key_is_normal() {
        assert_eq!(Difficulty::from_key("nightmare"), Difficulty::Normal);
        assert_eq!(Difficulty::from_key(""), Difficulty::Normal);
    }

    #[test]
    fn table_lookup_by_key_falls_back() {
        let t = SpeedTable::new(0.4, 0.7, 1.1, 1.6);
        assert_eq!(t.for_key("bogus"), t.for_key("normal"));
        assert_eq!(t.for_key("insane"), 1.6);
    }
}
