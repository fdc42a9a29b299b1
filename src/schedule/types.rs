use std::fmt;
use serde::{Serialize, Deserialize};

pub type PlayerId = u32;

/// Generated schedule, in match-slot order
pub type Schedule = Vec<Match>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Only carried by the overall-parity bye
    Neutral,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Game format requested for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Singles,
    MaleDoubles,
    FemaleDoubles,
    MixedDoubles,
}

impl Mode {
    /// Gender a same-gender doubles mode draws from
    pub fn doubles_gender(&self) -> Option<Gender> {
        match self {
            Mode::MaleDoubles => Some(Gender::Male),
            Mode::FemaleDoubles => Some(Gender::Female),
            Mode::Singles | Mode::MixedDoubles => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Singles => "Singles",
            Mode::MaleDoubles => "Men's Doubles",
            Mode::FemaleDoubles => "Women's Doubles",
            Mode::MixedDoubles => "Mixed Doubles",
        }
    }
}

/// A roster entry. Placeholders ("Bye") fill a seat but are never counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            is_placeholder: false,
        }
    }

    pub fn placeholder(id: PlayerId, gender: Gender) -> Self {
        Self {
            id,
            name: "Bye".to_string(),
            gender,
            is_placeholder: true,
        }
    }

    pub fn is_real(&self) -> bool {
        !self.is_placeholder
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Match {
    Singles {
        a: Player,
        b: Player,
    },
    Doubles {
        team_a: (Player, Player),
        team_b: (Player, Player),
    },
}

impl Match {
    /// Every seat in the match, byes included
    pub fn players(&self) -> Vec<&Player> {
        match self {
            Match::Singles { a, b } => vec![a, b],
            Match::Doubles { team_a, team_b } => vec![&team_a.0, &team_a.1, &team_b.0, &team_b.1],
        }
    }

    /// The two sides as player lists, for display
    pub fn sides(&self) -> (Vec<&Player>, Vec<&Player>) {
        match self {
            Match::Singles { a, b } => (vec![a], vec![b]),
            Match::Doubles { team_a, team_b } => (vec![&team_a.0, &team_a.1], vec![&team_b.0, &team_b.1]),
        }
    }

    #[cfg(test)]
    pub fn involves(&self, id: PlayerId) -> bool {
        self.players().iter().any(|p| p.id == id)
    }
}
