// Two-pass composition: a free melody, then a counter-melody built against it.
//
// The melody is an unconstrained random walk. The counter-melody walks with
// its own range and intervals while the harmonic ranker scores every step
// against the melody. Both voices share one RNG, melody first, so a seed
// fixes the whole duet.

use crate::builder::{GenerationParams, build};
use crate::note::{Note, note_name, total_length};
use duet_prng::DuetRng;
use log::info;
use serde::{Deserialize, Serialize};

/// Walk settings for one voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    pub target_length: u32,
    pub min_pitch: i32,
    pub max_pitch: i32,
    pub allowed_intervals: Vec<u32>,
    pub allowed_durations: Vec<u32>,
    /// Only consulted for the counter-melody.
    pub allow_crossover: bool,
}

impl VoiceConfig {
    fn params<'a>(&self) -> GenerationParams<'a> {
        let mut params = GenerationParams::new(
            self.target_length,
            self.min_pitch,
            self.max_pitch,
            self.allowed_intervals.clone(),
            self.allowed_durations.clone(),
        );
        params.allow_crossover = self.allow_crossover;
        params
    }
}

/// Settings for both voices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuetConfig {
    pub melody: VoiceConfig,
    pub counter: VoiceConfig,
}

impl Default for DuetConfig {
    /// Eight whole-beat notes per voice over semitone, whole-tone, tritone,
    /// minor-seventh and major-seventh steps. The counter-melody starts a
    /// tritone up and may not dip to or below the melody.
    fn default() -> Self {
        let intervals = vec![1, 2, 6, 10, 11];
        DuetConfig {
            melody: VoiceConfig {
                target_length: 32,
                min_pitch: 0,
                max_pitch: 87,
                allowed_intervals: intervals.clone(),
                allowed_durations: vec![4],
                allow_crossover: true,
            },
            counter: VoiceConfig {
                target_length: 32,
                min_pitch: 6,
                max_pitch: 87,
                allowed_intervals: intervals,
                allowed_durations: vec![4],
                allow_crossover: false,
            },
        }
    }
}

impl DuetConfig {
    /// Set the length budget of both voices.
    pub fn with_length(mut self, target_length: u32) -> Self {
        self.melody.target_length = target_length;
        self.counter.target_length = target_length;
        self
    }
}

/// A finished two-voice piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duet {
    pub melody: Vec<Note>,
    pub counter_melody: Vec<Note>,
}

impl Duet {
    /// One line per voice of note names, melody first.
    pub fn summary(&self) -> String {
        format!(
            "melody:  {}\ncounter: {}\n",
            voice_names(&self.melody),
            voice_names(&self.counter_melody)
        )
    }
}

fn voice_names(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| note_name(n.pitch))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the melody, then the counter-melody against it.
pub fn compose(config: &DuetConfig, rng: &mut DuetRng) -> Duet {
    let melody = build(&config.melody.params(), rng);
    info!(
        "melody: {} notes, length {}",
        melody.len(),
        total_length(&melody)
    );

    let counter_params = config
        .counter
        .params()
        .against(&melody, config.counter.allow_crossover);
    let counter_melody = build(&counter_params, rng);
    info!(
        "counter-melody: {} notes, length {}",
        counter_melody.len(),
        total_length(&counter_melody)
    );

    Duet {
        melody,
        counter_melody,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{notes_in_timespan, timespan_of};

    #[test]
    fn test_default_config() {
        let config = DuetConfig::default();
        assert_eq!(config.melody.target_length, 32);
        assert_eq!(config.melody.min_pitch, 0);
        assert_eq!(config.counter.min_pitch, 6);
        assert_eq!(config.counter.allowed_intervals, vec![1, 2, 6, 10, 11]);
        assert!(!config.counter.allow_crossover);
    }

    #[test]
    fn test_compose_default_duet() {
        let duet = compose(&DuetConfig::default(), &mut DuetRng::new(42));

        assert_eq!(duet.melody.len(), 8);
        assert_eq!(duet.melody[0], Note::new(0, 4));
        assert_eq!(total_length(&duet.melody), 32);

        assert!(total_length(&duet.counter_melody) <= 32);
        if let Some(first) = duet.counter_melody.first() {
            assert_eq!(first.pitch, 6);
        }
        for i in 0..duet.counter_melody.len() {
            let span = timespan_of(&duet.counter_melody, i);
            for under in notes_in_timespan(&duet.melody, &span) {
                assert!(duet.counter_melody[i].pitch > under.pitch);
            }
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let config = DuetConfig::default();
        let a = compose(&config, &mut DuetRng::new(1234));
        let b = compose(&config, &mut DuetRng::new(1234));
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_length() {
        let config = DuetConfig::default().with_length(8);
        let duet = compose(&config, &mut DuetRng::new(5));
        assert_eq!(duet.melody.len(), 2);
        assert!(duet.counter_melody.len() <= 2);
    }

    #[test]
    fn test_summary_lists_note_names() {
        let duet = Duet {
            melody: vec![Note::new(0, 4), Note::new(2, 4)],
            counter_melody: vec![Note::new(6, 4), Note::new(61, 4)],
        };
        assert_eq!(duet.summary(), "melody:  C0 D0\ncounter: F#0 C#5\n");
    }

    #[test]
    fn test_duet_json_roundtrip() {
        let duet = compose(&DuetConfig::default(), &mut DuetRng::new(9));
        let json = serde_json::to_string(&duet).unwrap();
        let restored: Duet = serde_json::from_str(&json).unwrap();
        assert_eq!(duet, restored);
    }
}
