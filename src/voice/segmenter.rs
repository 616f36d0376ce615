//! Speech endpointing
//!
//! Splits a microphone stream into utterances using RMS energy. The speech
//! threshold is calibrated against ambient noise before each capture.

/// Lowest speech threshold, used in a silent room
const ENERGY_FLOOR: f32 = 0.01;

/// Speech must be this many times louder than the ambient level
const AMBIENT_FACTOR: f32 = 2.5;

/// Minimum duration of speech to count as an utterance (in samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Silence duration that ends an utterance (in samples)
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// State of the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Waiting for speech
    Idle,
    /// Speech detected, accumulating the utterance
    Speaking,
}

/// Detects the start and end of an utterance in audio
pub struct SpeechSegmenter {
    threshold: f32,
    state: SegmenterState,
    segment: Vec<f32>,
    speech_samples: usize,
    silence_counter: usize,
}

impl Default for SpeechSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSegmenter {
    /// Create a segmenter with the floor threshold
    #[must_use]
    pub const fn new() -> Self {
        Self {
            threshold: ENERGY_FLOOR,
            state: SegmenterState::Idle,
            segment: Vec::new(),
            speech_samples: 0,
            silence_counter: 0,
        }
    }

    /// Adjust the speech threshold to the ambient noise in `samples`
    pub fn calibrate(&mut self, samples: &[f32]) {
        let ambient = calculate_energy(samples);
        self.threshold = (ambient * AMBIENT_FACTOR).max(ENERGY_FLOOR);
        tracing::debug!(ambient, threshold = self.threshold, "calibrated for ambient noise");
    }

    /// Process audio samples
    ///
    /// Returns true once an utterance is complete (speech followed by silence)
    pub fn process(&mut self, samples: &[f32]) -> bool {
        if samples.is_empty() {
            return false;
        }

        let energy = calculate_energy(samples);
        let is_speech = energy > self.threshold;

        match self.state {
            SegmenterState::Idle => {
                if is_speech {
                    self.state = SegmenterState::Speaking;
                    self.segment.clear();
                    self.segment.extend_from_slice(samples);
                    self.speech_samples = samples.len();
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech detected");
                }
            }
            SegmenterState::Speaking => {
                self.segment.extend_from_slice(samples);

                if is_speech {
                    self.speech_samples += samples.len();
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                if self.silence_counter >= SILENCE_SAMPLES {
                    if self.speech_samples >= MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.segment.len(), "utterance complete");
                        return true;
                    }

                    // A blip too short to be speech, followed by silence
                    tracing::trace!("false start - resetting");
                    self.reset();
                }
            }
        }

        false
    }

    /// Take the accumulated utterance and return to idle
    pub fn take_segment(&mut self) -> Vec<f32> {
        let segment = std::mem::take(&mut self.segment);
        self.reset();
        segment
    }

    /// Check if an utterance is in progress
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.state == SegmenterState::Speaking
    }

    /// Current speech threshold
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> SegmenterState {
        self.state
    }

    /// Reset to idle, keeping the calibration
    pub fn reset(&mut self) {
        self.state = SegmenterState::Idle;
        self.segment.clear();
        self.speech_samples = 0;
        self.silence_counter = 0;
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
pub fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_calculation() {
        let silence = vec![0.0f32; 100];
        assert!(calculate_energy(&silence) < 0.001);

        let loud = vec![0.5f32; 100];
        assert!(calculate_energy(&loud) > 0.4);
    }

    #[test]
    fn test_calibration_raises_threshold() {
        let mut segmenter = SpeechSegmenter::new();
        assert!((segmenter.threshold() - ENERGY_FLOOR).abs() < f32::EPSILON);

        segmenter.calibrate(&vec![0.1f32; 1600]);
        assert!(segmenter.threshold() > 0.2);

        // Quiet room never drops below the floor
        segmenter.calibrate(&vec![0.0f32; 1600]);
        assert!((segmenter.threshold() - ENERGY_FLOOR).abs() < f32::EPSILON);
    }

    #[test]
    fn test_take_segment_resets() {
        let mut segmenter = SpeechSegmenter::new();
        segmenter.process(&vec![0.5f32; 1600]);
        assert!(segmenter.is_speaking());

        let segment = segmenter.take_segment();
        assert_eq!(segment.len(), 1600);
        assert_eq!(segmenter.state(), SegmenterState::Idle);
        assert!(segmenter.take_segment().is_empty());
    }
}
