use std::fmt;
use std::io;
use std::path::PathBuf;

/// Problems with the wave table.  All of them are fatal: the spawn director
/// has no fallback roster.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    NoWaves,
    ZeroKillTarget { wave: usize },
    EmptyRoster { wave: usize },
    WeightCountMismatch { wave: usize, types: usize, weights: usize },
    InvalidWeight { wave: usize, weight: f64 },
    WaveOutOfRange { wave: usize, count: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read wave data {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "invalid wave data: {e}"),
            Self::NoWaves => write!(f, "wave data contains no waves"),
            Self::ZeroKillTarget { wave } => {
                write!(f, "wave {wave}: EnemiesToKill must be at least 1")
            }
            Self::EmptyRoster { wave } => write!(f, "wave {wave}: EnemyTypes is empty"),
            Self::WeightCountMismatch {
                wave,
                types,
                weights,
            } => write!(
                f,
                "wave {wave}: {types} enemy types but {weights} weights"
            ),
            Self::InvalidWeight { wave, weight } => {
                write!(f, "wave {wave}: weight {weight} must be a positive number")
            }
            Self::WaveOutOfRange { wave, count } => {
                write!(f, "wave {wave} out of range (1..={count})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
