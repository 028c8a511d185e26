//! Wave configuration and the wave-progression state machine.
//!
//! Waves `1..count` are scripted: a bounded spawn budget and a kill target.
//! Wave `count` is endless.  Clearing a scripted wave latches a completion
//! timestamp; the next wave starts once the pause has run out.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::entities::EnemyKind;
use crate::error::ConfigError;
use crate::spawn::Roster;

// ── Configuration data ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WaveRecord {
    #[serde(rename = "WaveName")]
    pub name: String,
    #[serde(rename = "EnemiesToKill")]
    pub kill_target: u32,
    #[serde(rename = "EnemyTypes")]
    pub enemy_types: Vec<EnemyKind>,
    #[serde(rename = "EnemyTypesWeights")]
    pub weights: Vec<f64>,
}

#[derive(Deserialize)]
struct WaveFile {
    #[serde(rename = "WaveData")]
    waves: Vec<WaveRecord>,
}

/// Where wave records come from.  Numbers are 1-based.
pub trait WaveSource {
    fn wave_count(&self) -> usize;
    fn wave(&self, number: usize) -> Result<WaveRecord, ConfigError>;
}

/// A validated, in-memory wave table.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveTable {
    waves: Vec<WaveRecord>,
}

impl WaveTable {
    pub fn new(waves: Vec<WaveRecord>) -> Result<Self, ConfigError> {
        if waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for (i, record) in waves.iter().enumerate() {
            validate_record(i + 1, record)?;
        }
        Ok(Self { waves })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: WaveFile = serde_json::from_str(text)?;
        Self::new(file.waves)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&text)?;
        tracing::info!("loaded {} waves from {}", table.waves.len(), path.display());
        Ok(table)
    }
}

impl WaveSource for WaveTable {
    fn wave_count(&self) -> usize {
        self.waves.len()
    }

    fn wave(&self, number: usize) -> Result<WaveRecord, ConfigError> {
        number
            .checked_sub(1)
            .and_then(|i| self.waves.get(i))
            .cloned()
            .ok_or(ConfigError::WaveOutOfRange {
                wave: number,
                count: self.waves.len(),
            })
    }
}

pub(crate) fn validate_record(wave: usize, record: &WaveRecord) -> Result<(), ConfigError> {
    if record.kill_target == 0 {
        return Err(ConfigError::ZeroKillTarget { wave });
    }
    if record.enemy_types.is_empty() {
        return Err(ConfigError::EmptyRoster { wave });
    }
    if record.weights.len() != record.enemy_types.len() {
        return Err(ConfigError::WeightCountMismatch {
            wave,
            types: record.enemy_types.len(),
            weights: record.weights.len(),
        });
    }
    if let Some(&weight) = record
        .weights
        .iter()
        .find(|w| !w.is_finite() || **w <= 0.0)
    {
        return Err(ConfigError::InvalidWeight { wave, weight });
    }
    Ok(())
}

// ── Active wave cache ─────────────────────────────────────────────────────────

/// The record for the wave being played, with its spawn roster prepared.
/// Reloaded from the source only when the wave number changes.
#[derive(Clone, Debug)]
pub struct ActiveWave {
    pub number: usize,
    pub record: WaveRecord,
    pub roster: Roster,
}

impl ActiveWave {
    pub fn load(source: &impl WaveSource, number: usize) -> Result<Self, ConfigError> {
        let record = source.wave(number)?;
        let roster = Roster::new(number, &record.enemy_types, &record.weights)?;
        Ok(Self {
            number,
            record,
            roster,
        })
    }

    /// Returns `true` if the cache was reloaded.
    pub fn refresh(&mut self, source: &impl WaveSource, number: usize) -> Result<bool, ConfigError> {
        if self.number == number {
            return Ok(false);
        }
        *self = Self::load(source, number)?;
        Ok(true)
    }
}

// ── Progress state machine ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    InWave(usize),
    Endless,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveTransition {
    /// Kill target reached; the pause has started.
    Completed { wave: usize },
    /// Pause over; counters reset for the new wave.
    Advanced { from: usize, to: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveProgress {
    /// 1-based.
    pub number: usize,
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    pub completed: bool,
    pub completed_at: Option<u64>,
}

impl Default for WaveProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveProgress {
    pub fn new() -> Self {
        Self {
            number: 1,
            enemies_spawned: 0,
            enemies_killed: 0,
            completed: false,
            completed_at: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_endless(&self, wave_count: usize) -> bool {
        self.number >= wave_count
    }

    pub fn phase(&self, wave_count: usize) -> WavePhase {
        if self.is_endless(wave_count) {
            WavePhase::Endless
        } else {
            WavePhase::InWave(self.number)
        }
    }

    /// Fraction of the kill target reached, for the progress bar.
    pub fn fraction(&self, kill_target: u32, wave_count: usize) -> f32 {
        if self.is_endless(wave_count) || kill_target == 0 {
            return 1.0;
        }
        (self.enemies_killed as f32 / kill_target as f32).min(1.0)
    }

    /// Scripted waves stop spawning once the budget (= kill target) is used.
    pub fn may_spawn(&self, kill_target: u32, wave_count: usize) -> bool {
        self.is_endless(wave_count) || self.enemies_spawned < kill_target
    }

    pub fn update(
        &mut self,
        kill_target: u32,
        wave_count: usize,
        pause_ms: u64,
        now_ms: u64,
    ) -> Option<WaveTransition> {
        if self.is_endless(wave_count) || self.enemies_killed < kill_target {
            return None;
        }

        let done_at = match self.completed_at {
            Some(t) if self.completed => t,
            _ => {
                self.completed = true;
                self.completed_at = Some(now_ms);
                return Some(WaveTransition::Completed { wave: self.number });
            }
        };

        if now_ms.saturating_sub(done_at) > pause_ms {
            let from = self.number;
            self.number += 1;
            self.enemies_spawned = 0;
            self.enemies_killed = 0;
            self.completed = false;
            self.completed_at = None;
            return Some(WaveTransition::Advanced {
                from,
                to: self.number,
            });
        }
        None
    }
}
