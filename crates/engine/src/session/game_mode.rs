use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    ThirdPerson,
    #[default]
    Interaction,
}

impl GameMode {
    pub fn as_token(self) -> &'static str {
        match self {
            GameMode::ThirdPerson => "third_person",
            GameMode::Interaction => "interaction",
        }
    }
}
