// Duet: two-voice melody generator.
//
// Builds a melody as a constrained random walk over semitone steps, then
// builds a second voice against it, choosing each pitch by how it scores
// against whatever the first voice is sounding at the same time. Both voices
// are written to a single-track MIDI file.
//
// Architecture:
// - note.rs: Note values, sequence length/timespan helpers, pitch-class
//   intervals and note names
// - consonance.rs: interval score table and the harmonic ranker that picks a
//   pitch against a reference voice
// - builder.rs: generation parameters and the note-by-note sequence builder
// - compose.rs: the melody -> counter-melody pipeline and its default settings
// - midi.rs: Standard MIDI File output via `midly`, timestamped file names
//
// Generation is deterministic given a seeded `DuetRng`.

pub mod builder;
pub mod compose;
pub mod consonance;
pub mod midi;
pub mod note;
