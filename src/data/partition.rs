use serde::{Deserialize, Serialize};

/// Selects which of a trainer's sample sets an evaluation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Train,
    Validation,
    Test,
}

impl Partition {
    pub fn name(self) -> &'static str {
        match self {
            Partition::Train => "training",
            Partition::Validation => "validation",
            Partition::Test => "test",
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
