// Sequence builder: grows one voice note by note as a constrained random walk.
//
// Each step picks a duration that still fits in the remaining length budget,
// then a pitch one allowed interval away from the previous note (the first
// note always sits on `min_pitch`). Without a reference voice the pitch is a
// uniform pick; with one, the choice is delegated to consonance.rs.
//
// The walk stops as soon as no duration fits, no pitch stays inside the
// range, or (when crossover is forbidden) every pitch would cross the
// reference. Whatever has been built so far is returned; there are no errors.

use crate::consonance::{Harmony, Register, rank_and_select};
use crate::note::{Note, Timespan};
use duet_prng::DuetRng;
use log::debug;

/// Constraints for building one voice.
///
/// `min_pitch` and `max_pitch` are exclusive bounds for every note after the
/// first. `allowed_intervals` are unsigned step sizes usable in either
/// direction.
#[derive(Debug, Clone)]
pub struct GenerationParams<'a> {
    pub target_length: u32,
    pub min_pitch: i32,
    pub max_pitch: i32,
    pub allowed_intervals: Vec<u32>,
    pub allowed_durations: Vec<u32>,
    /// Voice to harmonize against. An empty slice is treated like `None`.
    pub reference: Option<&'a [Note]>,
    /// When false, pitches that reach or pass an overlapping reference note
    /// are never chosen.
    pub allow_crossover: bool,
}

impl<'a> GenerationParams<'a> {
    pub fn new(
        target_length: u32,
        min_pitch: i32,
        max_pitch: i32,
        allowed_intervals: Vec<u32>,
        allowed_durations: Vec<u32>,
    ) -> Self {
        GenerationParams {
            target_length,
            min_pitch,
            max_pitch,
            allowed_intervals,
            allowed_durations,
            reference: None,
            allow_crossover: true,
        }
    }

    /// Harmonize against `reference`.
    pub fn against(mut self, reference: &'a [Note], allow_crossover: bool) -> Self {
        self.reference = Some(reference);
        self.allow_crossover = allow_crossover;
        self
    }

    fn harmony(&self) -> Option<Harmony<'a>> {
        let reference = self.reference.filter(|r| !r.is_empty())?;
        Some(Harmony {
            reference,
            allow_crossover: self.allow_crossover,
            register: Register::relative_to(self.min_pitch, reference),
        })
    }
}

/// Durations that fit in what is left of the budget. Zero durations are
/// skipped since they would never use up length.
pub fn candidate_durations(params: &GenerationParams, remaining: u32) -> Vec<u32> {
    params
        .allowed_durations
        .iter()
        .copied()
        .filter(|&d| d > 0 && d <= remaining)
        .collect()
}

/// Pitches the next note may take after `notes`.
///
/// For each interval, the step up is listed before the step down. Duplicates
/// are kept, so a pitch reachable by two intervals is twice as likely under a
/// uniform pick.
///
/// Steps are taken in `i64`, so an interval or pitch near the ends of `i32`
/// yields no candidate rather than a wrapped one.
pub fn candidate_pitches(notes: &[Note], params: &GenerationParams) -> Vec<i32> {
    let Some(last) = notes.last() else {
        return vec![params.min_pitch];
    };

    let (min, max) = (i64::from(params.min_pitch), i64::from(params.max_pitch));
    let last = i64::from(last.pitch);
    let mut pitches = Vec::with_capacity(params.allowed_intervals.len() * 2);
    for &interval in &params.allowed_intervals {
        let step = i64::from(interval);
        for p in [last + step, last - step] {
            if min < p && p < max {
                pitches.extend(i32::try_from(p).ok());
            }
        }
    }
    pitches
}

/// Build one voice under `params`.
pub fn build(params: &GenerationParams, rng: &mut DuetRng) -> Vec<Note> {
    let harmony = params.harmony();
    let mut notes: Vec<Note> = Vec::new();
    let mut consumed: u32 = 0;

    loop {
        let remaining = params.target_length.saturating_sub(consumed);
        let durations = candidate_durations(params, remaining);
        let Some(&duration) = rng.choose(&durations) else {
            break;
        };

        let pitches = candidate_pitches(&notes, params);
        if pitches.is_empty() {
            debug!(
                "no pitch within ({}, {}) after {} notes, stopping",
                params.min_pitch,
                params.max_pitch,
                notes.len()
            );
            break;
        }

        let chosen = match &harmony {
            None => rng.choose(&pitches).copied(),
            Some(h) => {
                let span = Timespan::new(consumed, consumed + duration);
                rank_and_select(&pitches, &span, h, rng)
            }
        };
        let Some(pitch) = chosen else {
            debug!(
                "every candidate crosses the reference at t={}, stopping",
                consumed
            );
            break;
        };

        notes.push(Note::new(pitch, duration));
        consumed += duration;
    }

    notes
}
