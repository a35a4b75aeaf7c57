use std::f64::consts::PI;
use std::fs;

use wave_mfcc::error::FeatureError;
use wave_mfcc::{
    AppConfig, FramesCollection, Mfcc, MfccConfig, SignalBuffer, SignalSource, StereoChannel,
    WaveFile,
};

const SAMPLE_RATE: u32 = 16000;

/// One second of 440 Hz whose amplitude grows linearly from 100 to 20000
fn rising_tone() -> Vec<f64> {
    let len = SAMPLE_RATE as usize;
    (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            let amplitude = 100.0 + 19900.0 * t;
            (amplitude * (2.0 * PI * 440.0 * t).sin()).round()
        })
        .collect()
}

fn speech_config() -> MfccConfig {
    MfccConfig {
        frame_size: 400,
        num_filters: 26,
        num_features: 12,
        ..MfccConfig::default()
    }
}

#[test]
fn energy_rises_with_envelope_after_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tone.wav");
    WaveFile::save(&SignalBuffer::new(rising_tone(), SAMPLE_RATE, 16), &path).expect("save tone");

    let wave = WaveFile::open(&path, StereoChannel::Left).expect("open tone");
    let config = speech_config();
    let mfcc = Mfcc::new(wave.sample_rate(), &config).expect("pipeline");
    let frames = FramesCollection::new(&wave, config.frame_size, 0).expect("frames");
    assert_eq!(frames.count(), 40);

    let features = mfcc.calculate_all(&frames).expect("features");
    assert_eq!(features.len(), 40);
    for vector in &features {
        assert_eq!(vector.len(), 12);
        assert!(vector.iter().all(|c| c.is_finite()), "non-finite in {vector:?}");
    }
    for pair in features.windows(2) {
        assert!(
            pair[1][0] > pair[0][0],
            "log-energy should increase: {} then {}",
            pair[0][0],
            pair[1][0]
        );
    }
}

#[test]
fn batch_matches_single_frame_calls() {
    let source = SignalBuffer::new(rising_tone(), SAMPLE_RATE, 16);
    let config = speech_config();
    let mfcc = Mfcc::new(SAMPLE_RATE, &config).expect("pipeline");
    let frames = FramesCollection::new(&source, 400, 200).expect("frames");
    assert_eq!(frames.count(), (16000 - 200) / 200);

    let batch = mfcc.calculate_all(&frames).expect("batch");
    for (frame, vector) in frames.iter().zip(&batch) {
        assert_eq!(&mfcc.calculate(frame).expect("single"), vector);
    }

    // second frame starts half a frame into the signal
    let direct = mfcc
        .calculate_frame(&source.to_array()[200..600])
        .expect("direct");
    assert_eq!(batch[1], direct);
}

#[test]
fn silence_gives_epsilon_energy() {
    let source = SignalBuffer::new(vec![0.0; 1024], SAMPLE_RATE, 16);
    let mfcc = Mfcc::new(SAMPLE_RATE, &MfccConfig::default()).expect("pipeline");
    let frames = FramesCollection::new(&source, 512, 0).expect("frames");

    let features = mfcc.calculate_all(&frames).expect("features");
    assert_eq!(features.len(), 2);
    for vector in features {
        assert_eq!(vector[0], f64::EPSILON.ln());
    }
}

#[test]
fn wrong_sample_rate_is_rejected() {
    let mfcc = Mfcc::new(SAMPLE_RATE, &speech_config()).expect("pipeline");
    let source = SignalBuffer::new(vec![1.0; 400], 8000, 16);
    let err = mfcc.calculate(&source).expect_err("rate mismatch");
    assert_eq!(
        err,
        FeatureError::SampleRateMismatch {
            expected: 16000,
            actual: 8000
        }
    );
}

#[test]
fn configuration_file_drives_pipeline_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "mfcc": { "frame_size": 256, "num_filters": 20, "num_features": 13,
                       "lifter": { "formula": "sine_window" } } }"#,
    )
    .expect("write config");

    let config = AppConfig::load_from_file(&path);
    assert_eq!(config.mfcc.frame_size, 256);
    assert_eq!(config.mfcc.lifter.coefficient, 22.0);

    let mfcc = Mfcc::new(SAMPLE_RATE, &config.mfcc).expect("pipeline");
    assert_eq!(mfcc.filter_bank().len(), 20);

    let source = SignalBuffer::new(rising_tone(), SAMPLE_RATE, 16);
    let frames = FramesCollection::new(&source, config.mfcc.frame_size, 0).expect("frames");
    let features = mfcc.calculate_all(&frames).expect("features");
    assert_eq!(features.len(), 16000 / 256);
    assert!(features.iter().all(|v| v.len() == 13));
}
