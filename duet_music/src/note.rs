// Notes, sequences, and the time/pitch arithmetic shared by the builder and
// the harmonic ranker.
//
// A voice is a plain `Vec<Note>`: notes are laid end to end starting at time
// 0, so a note's position is never stored, only recomputed from the durations
// before it. Times are in abstract ticks (one tick = one beat in MIDI output).

use serde::{Deserialize, Serialize};

/// A single pitched note.
///
/// `pitch` is a semitone number with MIDI numbering (60 = middle C) but no
/// bounds of its own; the generation parameters decide what range is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub pitch: i32,
    pub duration: u32,
}

impl Note {
    pub fn new(pitch: i32, duration: u32) -> Self {
        Note { pitch, duration }
    }
}

/// Half-open time range `[start_time, end_time)` occupied by a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timespan {
    pub start_time: u32,
    pub end_time: u32,
}

impl Timespan {
    pub fn new(start_time: u32, end_time: u32) -> Self {
        Timespan {
            start_time,
            end_time,
        }
    }

    /// True if the two spans share any instant. Spans that only touch at a
    /// boundary (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, other: &Timespan) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Sum of all durations in the sequence.
pub fn total_length(notes: &[Note]) -> u32 {
    notes.iter().map(|n| n.duration).sum()
}

/// Timespan of the note at `index`: it starts once every earlier note has
/// finished.
///
/// Panics if `index` is out of bounds.
pub fn timespan_of(notes: &[Note], index: usize) -> Timespan {
    let start = total_length(&notes[..index]);
    Timespan::new(start, start + notes[index].duration)
}

/// All notes of `notes` whose timespan overlaps `span`, in sequence order.
pub fn notes_in_timespan(notes: &[Note], span: &Timespan) -> Vec<Note> {
    let mut overlapped = Vec::new();
    let mut start = 0;
    for note in notes {
        let ts = Timespan::new(start, start + note.duration);
        if ts.overlaps(span) {
            overlapped.push(*note);
        }
        start = ts.end_time;
        if start >= span.end_time {
            break;
        }
    }
    overlapped
}

/// Distance between the pitch classes of two pitches, 0-11.
///
/// This is the plain difference of the two classes, not the folded interval
/// class: C against B is 11, not 1.
pub fn pitch_class_interval(pitch_a: i32, pitch_b: i32) -> usize {
    (pitch_a.rem_euclid(12) - pitch_b.rem_euclid(12)).unsigned_abs() as usize
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Sharp-spelled note name with octave, e.g. `61 -> "C#5"`.
///
/// The octave is `pitch / 12` truncated toward zero, so pitch 0 is `C0`.
pub fn note_name(pitch: i32) -> String {
    let name = NOTE_NAMES[pitch.rem_euclid(12) as usize];
    format!("{}{}", name, pitch / 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(notes: &[(i32, u32)]) -> Vec<Note> {
        notes.iter().map(|&(p, d)| Note::new(p, d)).collect()
    }

    #[test]
    fn test_total_length() {
        assert_eq!(total_length(&[]), 0);
        assert_eq!(total_length(&seq(&[(60, 4), (62, 2), (64, 1)])), 7);
    }

    #[test]
    fn test_timespan_of_starts_after_all_previous_notes() {
        let notes = seq(&[(60, 4), (62, 2), (64, 3)]);
        assert_eq!(timespan_of(&notes, 0), Timespan::new(0, 4));
        assert_eq!(timespan_of(&notes, 1), Timespan::new(4, 6));
        // Index 2 starts after both earlier notes, not just the first one.
        assert_eq!(timespan_of(&notes, 2), Timespan::new(6, 9));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = Timespan::new(0, 4);
        assert!(a.overlaps(&Timespan::new(0, 4)));
        assert!(a.overlaps(&Timespan::new(2, 6)));
        assert!(a.overlaps(&Timespan::new(1, 2)));
        assert!(Timespan::new(1, 2).overlaps(&a));
        assert!(Timespan::new(0, 8).overlaps(&a));
        // Touching at a boundary is not an overlap.
        assert!(!a.overlaps(&Timespan::new(4, 8)));
        assert!(!Timespan::new(4, 8).overlaps(&a));
    }

    #[test]
    fn test_notes_in_timespan() {
        let reference = seq(&[(60, 4), (62, 2), (64, 2), (65, 4)]);

        let aligned = notes_in_timespan(&reference, &Timespan::new(0, 4));
        assert_eq!(aligned, seq(&[(60, 4)]));

        let spanning = notes_in_timespan(&reference, &Timespan::new(4, 8));
        assert_eq!(spanning, seq(&[(62, 2), (64, 2)]));

        let partial = notes_in_timespan(&reference, &Timespan::new(3, 5));
        assert_eq!(partial, seq(&[(60, 4), (62, 2)]));
    }

    #[test]
    fn test_notes_in_timespan_includes_last_note() {
        let reference = seq(&[(60, 4), (62, 4)]);
        let last = notes_in_timespan(&reference, &Timespan::new(4, 8));
        assert_eq!(last, seq(&[(62, 4)]));
    }

    #[test]
    fn test_notes_in_timespan_past_end_is_empty() {
        let reference = seq(&[(60, 4)]);
        assert!(notes_in_timespan(&reference, &Timespan::new(4, 8)).is_empty());
        assert!(notes_in_timespan(&[], &Timespan::new(0, 8)).is_empty());
    }

    #[test]
    fn test_pitch_class_interval() {
        assert_eq!(pitch_class_interval(60, 67), 7);
        assert_eq!(pitch_class_interval(67, 60), 7);
        assert_eq!(pitch_class_interval(60, 72), 0);
        // Unfolded: C vs B is 11, not 1.
        assert_eq!(pitch_class_interval(60, 71), 11);
        assert_eq!(pitch_class_interval(0, 1), 1);
        // Negative pitches use euclidean pitch classes.
        assert_eq!(pitch_class_interval(-2, 0), 10);
    }

    #[test]
    fn test_note_name() {
        assert_eq!(note_name(0), "C0");
        assert_eq!(note_name(6), "F#0");
        assert_eq!(note_name(61), "C#5");
        assert_eq!(note_name(86), "D7");
        assert_eq!(note_name(-1), "B0");
    }
}
