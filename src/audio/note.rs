const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Nearest MIDI note for a frequency in Hz (A4 = 440 Hz = 69), clamped to
/// 0..=127.
///
/// Non-positive and NaN input maps to 0, while `+inf` clamps to 127 like any
/// other frequency above the MIDI range. 0 is a real note (C-1), not "no
/// pitch"; callers that can fail to find a pitch should never reach this
/// function for such a slice.
pub fn frequency_to_midi(freq: f32) -> u8 {
    if !(freq > 0.0) {
        return 0;
    }
    let midi = 69.0 + 12.0 * (freq / 440.0).log2();
    midi.round().clamp(0.0, 127.0) as u8
}

/// Display name such as `A4` or `C#3`. Negative input (the no-pitch
/// sentinel) gives `N/A`.
pub fn midi_to_note_name(midi: i32) -> String {
    if midi < 0 {
        return "N/A".to_string();
    }
    let name = NOTE_NAMES[(midi % 12) as usize];
    let octave = midi / 12 - 1;
    format!("{}{}", name, octave)
}
