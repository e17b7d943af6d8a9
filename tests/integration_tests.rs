//! Integration tests for the tempo analysis engine

use rhythmic_dsp::{
    analyze_audio, estimate_tempo, AnalysisConfig, AnalysisError, TempoAnalyzer, TempoHandler,
};
use std::path::PathBuf;

/// Mono click track: a short decaying 1.7 kHz burst at every beat
fn click_track(bpm: f32, seconds: f32, sample_rate: u32) -> Vec<f32> {
    let len = (seconds * sample_rate as f32) as usize;
    let period = sample_rate as f32 * 60.0 / bpm;
    let burst = (sample_rate as f32 * 0.01) as usize;
    let omega = 2.0 * std::f32::consts::PI * 1700.0 / sample_rate as f32;

    let mut samples = vec![0.0f32; len];
    let mut beat = 0usize;
    loop {
        let start = (beat as f32 * period).round() as usize;
        if start >= len {
            break;
        }
        for (i, s) in samples[start..].iter_mut().take(burst).enumerate() {
            let decay = (-(i as f32) / (burst as f32 / 4.0)).exp();
            *s = 0.8 * (i as f32 * omega).sin() * decay;
        }
        beat += 1;
    }
    samples
}

/// Deterministic uniform values in [0, 1)
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}

fn white_noise(seconds: f32, sample_rate: u32, seed: u64) -> Vec<f32> {
    let mut rng = Lcg(seed);
    let len = (seconds * sample_rate as f32) as usize;
    (0..len).map(|_| rng.next_f32() - 0.5).collect()
}

/// Clicks at random gaps between 0.15 s and 1.2 s
fn random_clicks(seconds: f32, sample_rate: u32, seed: u64) -> Vec<f32> {
    let mut rng = Lcg(seed);
    let len = (seconds * sample_rate as f32) as usize;
    let burst = (sample_rate as f32 * 0.01) as usize;
    let omega = 2.0 * std::f32::consts::PI * 1700.0 / sample_rate as f32;

    let mut samples = vec![0.0f32; len];
    let mut t = 0.0f32;
    while (t * sample_rate as f32) < len as f32 {
        let start = (t * sample_rate as f32) as usize;
        for (i, s) in samples[start..].iter_mut().take(burst).enumerate() {
            *s = 0.8 * (i as f32 * omega).sin() * (-(i as f32) / (burst as f32 / 4.0)).exp();
        }
        t += 0.15 + 1.05 * rng.next_f32();
    }
    samples
}

fn interleave_stereo(mono: &[f32]) -> Vec<f32> {
    mono.iter().flat_map(|&s| [s, s * 0.5]).collect()
}

fn bpm_of(samples: &[f32], sample_rate: u32, channels: usize) -> f32 {
    analyze_audio(samples, sample_rate, channels, &AnalysisConfig::default())
        .expect("analysis should succeed")
        .tempo
        .bpm
}

/// Write a 16-bit WAV into the temp directory
fn write_wav(name: &str, interleaved: &[f32], sample_rate: u32, channels: u16) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rhythmic_dsp_{}_{}.wav", std::process::id(), name));
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("create wav");
    for &s in interleaved {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .expect("write sample");
    }
    writer.finalize().expect("finalize wav");
    path
}

#[test]
fn test_120bpm_click_track() {
    let samples = click_track(120.0, 30.0, 44100);
    let result = analyze_audio(&samples, 44100, 1, &AnalysisConfig::default()).unwrap();

    assert!(
        (result.tempo.bpm - 120.0).abs() <= 2.0,
        "BPM should be close to 120, got {:.2}",
        result.tempo.bpm
    );
    assert!(result.tempo.confidence > 0.1 && result.tempo.confidence <= 1.0);
    assert!(!result.candidates.is_empty());

    let metadata = &result.metadata;
    assert_eq!(metadata.sample_rate, 22050);
    assert_eq!(metadata.source_channels, 1);
    assert!(metadata.duration_seconds > 28.0 && metadata.duration_seconds <= 30.0);
    assert!(metadata.envelope_frames > 2000);
    assert_eq!(metadata.onset_method, "spectral_flux");
    assert_eq!(metadata.algorithm_version, env!("CARGO_PKG_VERSION"));

    // Clicks peak at 0.8, about -1.9 dBFS
    assert!((metadata.input_peak_db + 1.94).abs() < 1.0, "peak {:.2} dB", metadata.input_peak_db);
    assert!(metadata.input_rms_db < metadata.input_peak_db);
}

#[test]
fn test_octave_robustness() {
    for bpm in [60.0f32, 240.0] {
        let estimate = bpm_of(&click_track(bpm, 30.0, 44100), 44100, 1);
        let ratio = estimate / 120.0;
        let related = [0.5f32, 1.0, 2.0]
            .iter()
            .any(|&r| (ratio - r).abs() / r < 0.03);
        assert!(related, "{} BPM stimulus gave {:.2}", bpm, estimate);
    }
}

#[test]
fn test_idempotent() {
    let samples = interleave_stereo(&click_track(100.0, 20.0, 44100));
    let config = AnalysisConfig::default();

    let first = analyze_audio(&samples, 44100, 2, &config).unwrap();
    let second = analyze_audio(&samples, 44100, 2, &config).unwrap();

    assert_eq!(first.tempo, second.tempo);
    assert_eq!(first.candidates, second.candidates);
    assert_eq!(first.metadata.flags, second.metadata.flags);
}

#[test]
fn test_silence_has_no_dominant_tempo() {
    let config = AnalysisConfig::default();

    let zeros = vec![0.0f32; 44100 * 10];
    let result = analyze_audio(&zeros, 44100, 1, &config);
    assert!(matches!(result, Err(AnalysisError::NoDominantTempo(_))));

    // -80 dBFS clicks stay below the -60 dBFS gate
    let quiet: Vec<f32> = click_track(120.0, 10.0, 44100)
        .iter()
        .map(|s| s * 1e-4)
        .collect();
    let result = analyze_audio(&quiet, 44100, 1, &config);
    assert!(result.as_ref().err().map_or(false, |e| e.is_no_dominant_tempo()));
}

#[test]
fn test_sample_rate_invariance() {
    let at_44k = bpm_of(&click_track(120.0, 30.0, 44100), 44100, 1);
    let at_48k = bpm_of(&click_track(120.0, 30.0, 48000), 48000, 1);

    assert!((at_44k - 120.0).abs() <= 2.0, "44.1 kHz gave {:.2}", at_44k);
    assert!((at_48k - 120.0).abs() <= 2.0, "48 kHz gave {:.2}", at_48k);
    assert!((at_44k - at_48k).abs() <= 1.0);
}

#[test]
fn test_out_of_range_tempi_fold_into_range() {
    let slow = bpm_of(&click_track(30.0, 40.0, 44100), 44100, 1);
    assert!((slow - 60.0).abs() <= 2.0, "30 BPM stimulus gave {:.2}", slow);

    let fast = bpm_of(&click_track(230.0, 30.0, 44100), 44100, 1);
    assert!((fast - 115.0).abs() <= 2.0, "230 BPM stimulus gave {:.2}", fast);
}

#[test]
fn test_invalid_buffers() {
    let config = AnalysisConfig::default();

    assert!(matches!(
        analyze_audio(&[], 44100, 1, &config),
        Err(AnalysisError::InvalidInput(_))
    ));
    assert!(matches!(
        analyze_audio(&[0.1, f32::NAN, 0.2], 44100, 1, &config),
        Err(AnalysisError::InvalidInput(_))
    ));
    assert!(matches!(
        analyze_audio(&[0.1; 100], 0, 1, &config),
        Err(AnalysisError::InvalidInput(_))
    ));
}

#[test]
fn test_duration_guard() {
    let config = AnalysisConfig {
        max_duration_seconds: 5.0,
        ..Default::default()
    };
    let samples = click_track(120.0, 10.0, 22050);
    let result = analyze_audio(&samples, 22050, 1, &config);
    assert!(matches!(result, Err(AnalysisError::ResourceExhausted(_))));
}

#[test]
fn test_arrhythmic_input_has_no_dominant_tempo() {
    let config = AnalysisConfig::default();

    for seed in [1u64, 7, 42] {
        let noise = white_noise(20.0, 22050, seed);
        let result = analyze_audio(&noise, 22050, 1, &config);
        assert!(
            matches!(result, Err(AnalysisError::NoDominantTempo(_))),
            "noise seed {} gave {:?}",
            seed,
            result.map(|r| r.tempo)
        );
    }

    let clicks = random_clicks(40.0, 22050, 3);
    let result = analyze_audio(&clicks, 22050, 1, &config);
    assert!(
        matches!(result, Err(AnalysisError::NoDominantTempo(_))),
        "random clicks gave {:?}",
        result.map(|r| r.tempo)
    );
}

#[test]
fn test_arrhythmic_wav_yields_sentinel() {
    let path = write_wav("noise", &white_noise(15.0, 22050, 11), 22050, 1);
    let path_str = path.to_string_lossy().to_string();

    let result = TempoAnalyzer::new().estimate_tempo(&path_str);
    assert!(result.as_ref().err().map_or(false, |e| e.is_no_dominant_tempo()));
    assert_eq!(TempoHandler::new().analyze_rhythm(&path_str), 0.0);
    assert_eq!(TempoHandler::new().tempo(&path_str, None), None);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_long_wav_rejected_by_decoder() {
    let path = write_wav("long", &click_track(120.0, 12.0, 22050), 22050, 1);
    let path_str = path.to_string_lossy().to_string();
    let config = AnalysisConfig {
        max_duration_seconds: 5.0,
        ..Default::default()
    };

    let result = TempoAnalyzer::with_config(config.clone()).analyze_file(&path_str);
    assert!(matches!(result, Err(AnalysisError::ResourceExhausted(_))));
    assert_eq!(TempoHandler::with_config(config).analyze_rhythm(&path_str), 0.0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_invalid_config_rejected() {
    let config = AnalysisConfig {
        min_bpm: 200.0,
        max_bpm: 100.0,
        ..Default::default()
    };
    let samples = click_track(120.0, 10.0, 22050);
    let result = analyze_audio(&samples, 22050, 1, &config);
    assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
}

#[test]
fn test_wav_file_through_facade() {
    let samples = interleave_stereo(&click_track(120.0, 30.0, 44100));
    let path = write_wav("click_120", &samples, 44100, 2);
    let path_str = path.to_string_lossy().to_string();

    let analyzer = TempoAnalyzer::new();
    let result = analyzer.analyze_file(&path_str).unwrap();
    assert!((result.tempo.bpm - 120.0).abs() <= 2.0, "got {:.2}", result.tempo.bpm);
    assert_eq!(result.metadata.source_channels, 2);

    let estimate = estimate_tempo(&format!("file://{}", path_str), &AnalysisConfig::default()).unwrap();
    assert_eq!(estimate, result.tempo);

    let handler = TempoHandler::new();
    let bpm = handler.analyze_rhythm(&path_str);
    assert_eq!(bpm, result.tempo.bpm);
    assert_eq!(handler.tempo(&path_str, None), Some(f64::from(bpm)));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_silent_wav_yields_sentinel() {
    let path = write_wav("silence", &vec![0.0f32; 44100 * 5], 44100, 1);
    let path_str = path.to_string_lossy().to_string();

    let result = TempoAnalyzer::new().estimate_tempo(&path_str);
    assert!(matches!(result, Err(AnalysisError::NoDominantTempo(_))));
    assert_eq!(TempoHandler::new().analyze_rhythm(&path_str), 0.0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_unreadable_sources() {
    let handler = TempoHandler::new();
    assert_eq!(handler.analyze_rhythm("/definitely/not/here.wav"), 0.0);
    assert_eq!(handler.analyze_rhythm("https://example.com/track.mp3"), 0.0);

    let garbage = std::env::temp_dir().join(format!("rhythmic_dsp_{}_garbage.wav", std::process::id()));
    std::fs::write(&garbage, b"not audio at all").unwrap();
    let result = TempoAnalyzer::new().estimate_tempo(&garbage.to_string_lossy());
    assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    let _ = std::fs::remove_file(&garbage);
}

#[test]
fn test_batch_in_input_order() {
    let a = write_wav("batch_a", &click_track(120.0, 20.0, 22050), 22050, 1);
    let b = write_wav("batch_b", &click_track(100.0, 20.0, 22050), 22050, 1);
    let sources = vec![
        a.to_string_lossy().to_string(),
        "/missing/file.wav".to_string(),
        b.to_string_lossy().to_string(),
    ];

    let results = TempoAnalyzer::new().analyze_batch(&sources);
    assert_eq!(results.len(), 3);
    assert!((results[0].as_ref().unwrap().tempo.bpm - 120.0).abs() <= 2.0);
    assert!(results[1].is_err());
    assert!((results[2].as_ref().unwrap().tempo.bpm - 100.0).abs() <= 2.0);

    let _ = std::fs::remove_file(&a);
    let _ = std::fs::remove_file(&b);
}
