//! Benchmarks for per-word pitch analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vocal_note_tagger::{analyze_pitch, AnalyzerConfig, AudioSegment, PitchConfig, WordAnalyzer, WordToken};

fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (i as f32 * freq * 2.0 * std::f32::consts::PI / sample_rate as f32).sin() * 0.5)
        .collect()
}

fn bench_analyze_pitch(c: &mut Criterion) {
    // One typical sung word: 400 ms at 44.1kHz
    let samples = sine(440.0, 44100, 17640);
    let config = PitchConfig::default();

    c.bench_function("analyze_pitch_400ms", |b| {
        b.iter(|| {
            let _ = analyze_pitch(black_box(&samples), black_box(44100), black_box(&config));
        });
    });
}

fn bench_analyze_words(c: &mut Criterion) {
    // 60 seconds of audio, one word every half second
    let audio = AudioSegment::new(sine(330.0, 44100, 44100 * 60), 44100);
    let analyzer = WordAnalyzer::new(&audio, &AnalyzerConfig::default()).unwrap();
    let tokens: Vec<WordToken> = (0..120)
        .map(|i| WordToken::new("la", i as f64 * 0.5, i as f64 * 0.5 + 0.4))
        .collect();

    c.bench_function("analyze_words_120", |b| {
        b.iter(|| {
            let mut batch = tokens.clone();
            let _ = analyzer.analyze_words(black_box(&mut batch));
        });
    });
}

criterion_group!(benches, bench_analyze_pitch, bench_analyze_words);
criterion_main!(benches);
