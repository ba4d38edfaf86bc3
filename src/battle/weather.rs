use serde::{Deserialize, Serialize};

/// Weather conditions that can affect a battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

impl Weather {
    /// Whether the weather chips HP at the end of each turn.
    pub fn is_damaging(&self) -> bool {
        matches!(self, Weather::Sandstorm | Weather::Hail)
    }

    /// Per-turn flavor line, if any.
    pub fn flavor_text(&self) -> Option<&'static str> {
        match self {
            Weather::Clear => None,
            Weather::Sun => Some("The sunlight is strong!"),
            Weather::Rain => Some("Rain continues to fall!"),
            Weather::Sandstorm => Some("The sandstorm rages!"),
            Weather::Hail => Some("The hail continues to fall!"),
        }
    }

    /// Message when the weather runs out.
    pub fn subsided_text(&self) -> Option<&'static str> {
        match self {
            Weather::Clear => None,
            Weather::Sun => Some("The harsh sunlight subsided."),
            Weather::Rain => Some("The rain subsided."),
            Weather::Sandstorm => Some("The sandstorm subsided."),
            Weather::Hail => Some("The hail subsided."),
        }
    }

    /// What the buffet message calls this weather.
    pub fn buffet_name(&self) -> Option<&'static str> {
        match self {
            Weather::Sandstorm => Some("sandstorm"),
            Weather::Hail => Some("hail"),
            _ => None,
        }
    }
}
