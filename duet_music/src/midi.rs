// MIDI output for finished duets.
//
// Both voices go into one track of a format-0 Standard MIDI File, each on its
// own channel: the counter-melody on channel 0 and the melody on channel 1.
// One note duration unit is one beat (quarter note) at a fixed 60 BPM, so a
// note of duration 4 lasts four seconds. Every note is struck at velocity 64.
//
// Uses the `midly` crate for encoding. Output files are named after the local
// time they were written, e.g. `03-05-2024_07-08-09.mid`.

use crate::compose::Duet;
use crate::note::Note;
use chrono::NaiveDateTime;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ticks per quarter note (one duration unit).
pub const TICKS_PER_BEAT: u16 = 480;

pub const TEMPO_BPM: u32 = 60;

pub const VELOCITY: u8 = 64;

pub const TRACK_NAME: &str = "Track 1";

/// Largest delta time a MIDI event can carry.
const MAX_TICK: u64 = (1 << 28) - 1;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("pitch {pitch} is not a valid MIDI key (0-127)")]
    PitchOutOfRange { pitch: i32 },
    #[error("note ending at tick {tick} does not fit in a MIDI file")]
    TimelineOverflow { tick: u64 },
    #[error("failed to write MIDI: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MidiError>;

/// Encode a duet as an in-memory SMF.
pub fn duet_to_smf(duet: &Duet) -> Result<Smf<'static>> {
    let voices: [&[Note]; 2] = [&duet.counter_melody, &duet.melody];

    // (absolute tick, event), ordered below so note-offs precede note-ons on
    // the same tick.
    let mut timed: Vec<(u64, TrackEventKind<'static>)> = Vec::new();
    for (channel, voice) in voices.iter().enumerate() {
        let channel = u4::new(channel as u8);
        let mut beat: u64 = 0;
        for note in voice.iter() {
            let start = beat * TICKS_PER_BEAT as u64;
            beat += note.duration as u64;
            let end = beat * TICKS_PER_BEAT as u64;
            if end > MAX_TICK {
                return Err(MidiError::TimelineOverflow { tick: end });
            }
            if note.duration == 0 {
                continue;
            }
            let key = midi_key(note.pitch)?;
            timed.push((
                start,
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key,
                        vel: u7::new(VELOCITY),
                    },
                },
            ));
            timed.push((
                end,
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key,
                        vel: u7::new(0),
                    },
                },
            ));
        }
    }
    timed.sort_by_key(|(tick, kind)| (*tick, event_order(kind)));

    let mut track: Track<'static> = Vec::with_capacity(timed.len() + 3);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(TRACK_NAME.as_bytes())),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(60_000_000 / TEMPO_BPM))),
    });

    let mut last_tick: u64 = 0;
    for (tick, kind) in timed {
        track.push(TrackEvent {
            delta: u28::new((tick - last_tick) as u32),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

/// Encode a duet to SMF bytes.
pub fn encode_duet(duet: &Duet) -> Result<Vec<u8>> {
    let smf = duet_to_smf(duet)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Write a duet to `dir`, named after `now`. Returns the path written.
pub fn write_duet(duet: &Duet, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
    let bytes = encode_duet(duet)?;
    let path = dir.join(timestamped_file_name(now));
    std::fs::write(&path, &bytes)?;
    Ok(path)
}

/// `MM-DD-YYYY_HH-MM-SS.mid`
pub fn timestamped_file_name(now: NaiveDateTime) -> String {
    format!("{}.mid", now.format("%m-%d-%Y_%H-%M-%S"))
}

fn midi_key(pitch: i32) -> Result<u7> {
    if (0..=127).contains(&pitch) {
        Ok(u7::new(pitch as u8))
    } else {
        Err(MidiError::PitchOutOfRange { pitch })
    }
}

fn event_order(kind: &TrackEventKind) -> u8 {
    match kind {
        TrackEventKind::Midi {
            message: MidiMessage::NoteOff { .. },
            ..
        } => 0,
        _ => 1,
    }
}
