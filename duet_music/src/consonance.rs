// Harmonic ranking of pitch candidates against a reference voice.
//
// When a second voice is built against a first one, each candidate pitch for
// the next note is scored against every reference note sounding during the
// new note's timespan. The score is the mean table value of the pitch-class
// distances; the highest-scoring candidates win and ties are broken at random.
//
// The table assigns 0 to unison/octave and the perfect fifth and its largest
// values to semitone and major-seventh distances. Selection takes the
// maximum, so the ranker leans toward tension rather than rest.
//
// Optionally, candidates that would cross the reference voice are removed
// before ranking. Used by builder.rs.

use crate::note::{Note, Timespan, notes_in_timespan, pitch_class_interval};
use duet_prng::DuetRng;
use log::debug;

/// Score for each pitch-class distance 0-11.
pub const CONSONANCE: [u32; 12] = [0, 3, 2, 1, 1, 2, 2, 0, 1, 1, 2, 3];

/// Which side of the reference voice the generated voice lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Above,
    Below,
}

impl Register {
    /// A voice whose lowest allowed pitch is above the reference's opening
    /// pitch sits above it; anything else counts as below.
    pub fn relative_to(min_pitch: i32, reference: &[Note]) -> Register {
        match reference.first() {
            Some(first) if min_pitch > first.pitch => Register::Above,
            _ => Register::Below,
        }
    }

    /// True if `pitch` reaches or passes `reference_pitch` from this side.
    pub fn crosses(self, pitch: i32, reference_pitch: i32) -> bool {
        match self {
            Register::Above => pitch <= reference_pitch,
            Register::Below => pitch >= reference_pitch,
        }
    }
}

/// Everything the ranker needs to know about the voice being harmonized.
#[derive(Debug, Clone, Copy)]
pub struct Harmony<'a> {
    pub reference: &'a [Note],
    pub allow_crossover: bool,
    pub register: Register,
}

/// Mean consonance score of `pitch` against `overlapped`; 0 when nothing
/// overlaps.
pub fn score_pitch(pitch: i32, overlapped: &[Note]) -> f64 {
    if overlapped.is_empty() {
        return 0.0;
    }
    let sum: u32 = overlapped
        .iter()
        .map(|note| CONSONANCE[pitch_class_interval(pitch, note.pitch)])
        .sum();
    sum as f64 / overlapped.len() as f64
}

/// Score every distinct candidate, in first-seen order, after dropping any
/// that would cross the reference (when crossover is disallowed).
pub fn rank_candidates(
    candidates: &[i32],
    span: &Timespan,
    harmony: &Harmony,
) -> Vec<(i32, f64)> {
    let overlapped = notes_in_timespan(harmony.reference, span);

    let allowed: Vec<i32> = if harmony.allow_crossover {
        candidates.to_vec()
    } else {
        candidates
            .iter()
            .copied()
            .filter(|&pitch| {
                let crossing = overlapped
                    .iter()
                    .any(|note| harmony.register.crosses(pitch, note.pitch));
                if crossing {
                    debug!("removed pitch {pitch}: crosses reference voice");
                }
                !crossing
            })
            .collect()
    };

    let mut ranked: Vec<(i32, f64)> = Vec::with_capacity(allowed.len());
    for pitch in allowed {
        if ranked.iter().any(|&(p, _)| p == pitch) {
            continue;
        }
        ranked.push((pitch, score_pitch(pitch, &overlapped)));
    }
    debug!("ranked candidates over {span:?}: {ranked:?}");
    ranked
}

/// Pick a pitch from `candidates` for a note occupying `span`.
///
/// Returns `None` if every candidate was removed by the crossover filter (or
/// there were none to begin with).
pub fn rank_and_select(
    candidates: &[i32],
    span: &Timespan,
    harmony: &Harmony,
    rng: &mut DuetRng,
) -> Option<i32> {
    let ranked = rank_candidates(candidates, span, harmony);

    let mut best: Vec<i32> = Vec::new();
    let mut highest = f64::NEG_INFINITY;
    for (pitch, score) in ranked {
        if score > highest {
            best.clear();
            best.push(pitch);
            highest = score;
        } else if score == highest {
            best.push(pitch);
        }
    }

    rng.choose(&best).copied()
}
