//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;

use veronica::voice::{
    PLAYBACK_SAMPLE_RATE, SAMPLE_RATE, SegmenterState, SpeechSegmenter, calculate_energy,
    decode_mp3, resample, samples_to_wav,
};

/// 100ms of audio at 16kHz
const CHUNK: usize = 1600;

/// Generate sine wave audio samples
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Feed `samples` in 100ms chunks, returning true if any chunk completed an utterance
fn feed(segmenter: &mut SpeechSegmenter, samples: &[f32]) -> bool {
    samples.chunks(CHUNK).any(|chunk| segmenter.process(chunk))
}

#[test]
fn test_silence_does_not_trigger() {
    let mut segmenter = SpeechSegmenter::new();

    assert!(!feed(&mut segmenter, &vec![0.0; CHUNK * 10]));
    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert!(segmenter.take_segment().is_empty());
}

#[test]
fn test_utterance_completes_after_trailing_silence() {
    let mut segmenter = SpeechSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!feed(&mut segmenter, &speech));
    assert!(segmenter.is_speaking());

    // 0.4s of silence is not enough to end the utterance
    let silence = vec![0.0; CHUNK];
    for _ in 0..4 {
        assert!(!segmenter.process(&silence));
    }

    // The fifth chunk reaches 0.5s of silence
    assert!(segmenter.process(&silence));

    let segment = segmenter.take_segment();
    assert_eq!(segment.len(), speech.len() + CHUNK * 5);
    assert_eq!(segmenter.state(), SegmenterState::Idle);
}

#[test]
fn test_short_blip_is_discarded() {
    let mut segmenter = SpeechSegmenter::new();

    // 0.1s of sound is below the minimum speech length
    assert!(!segmenter.process(&generate_sine_samples(440.0, 0.1, 0.3)));
    assert!(segmenter.is_speaking());

    assert!(!feed(&mut segmenter, &vec![0.0; CHUNK * 5]));
    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert!(segmenter.take_segment().is_empty());
}

#[test]
fn test_calibration_ignores_ambient_noise() {
    let mut segmenter = SpeechSegmenter::new();
    segmenter.calibrate(&vec![0.05; CHUNK * 10]);

    // Quieter than 2.5x the ambient level
    let murmur = generate_sine_samples(440.0, 0.5, 0.1);
    assert!(calculate_energy(&murmur) > 0.01);
    assert!(!feed(&mut segmenter, &murmur));
    assert_eq!(segmenter.state(), SegmenterState::Idle);

    let speech = generate_sine_samples(440.0, 0.5, 0.5);
    feed(&mut segmenter, &speech);
    assert!(segmenter.is_speaking());
}

#[test]
fn test_reset_keeps_calibration() {
    let mut segmenter = SpeechSegmenter::new();
    segmenter.calibrate(&vec![0.1; CHUNK]);
    let threshold = segmenter.threshold();

    segmenter.process(&generate_sine_samples(440.0, 0.1, 0.9));
    segmenter.reset();

    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert!((segmenter.threshold() - threshold).abs() < f32::EPSILON);
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44);
}

#[test]
fn test_wav_readback() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav_data)).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
    assert_eq!(read_samples[0], 0);
    assert!(read_samples[3] > 32000);
    assert!(read_samples[4] < -32000);
}

/// Silent MPEG-1 Layer III stream: 128 kbps, 44.1 kHz, stereo, no CRC
fn silent_mp3_44k(frames: usize) -> Vec<u8> {
    // 144 * 128000 / 44100, no padding
    const FRAME_LEN: usize = 417;

    let mut frame = vec![0u8; FRAME_LEN];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    frame.repeat(frames)
}

#[test]
fn test_decode_reports_source_rate() {
    let decoded = decode_mp3(&silent_mp3_44k(40)).unwrap();

    assert_eq!(decoded.sample_rate, 44100);
    assert!(!decoded.samples.is_empty());
    assert_eq!(decoded.samples.len() % 1152, 0);
}

#[test]
fn test_resample_keeps_duration() {
    // One second at 44.1 kHz plays for one second at the output rate
    let tone: Vec<f32> = (0..44100)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / 44100.0;
            0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
        })
        .collect();

    let resampled = resample(&tone, 44100, PLAYBACK_SAMPLE_RATE).unwrap();

    assert_eq!(resampled.len(), PLAYBACK_SAMPLE_RATE as usize);

    // Energy survives the conversion
    let energy = calculate_energy(&resampled[2400..21600]);
    assert!((energy - calculate_energy(&tone)).abs() < 0.05);
}
