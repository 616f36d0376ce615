//! Audio playback to speakers

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
pub const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Plays audio to the default output device
///
/// Holds only the negotiated stream config; the output stream is opened per
/// playback, so the handle is `Send` and can be moved to a blocking task.
#[derive(Debug, Clone)]
pub struct AudioPlayback {
    config: StreamConfig,
}

impl AudioPlayback {
    /// Create a new audio playback instance
    ///
    /// # Errors
    ///
    /// Returns error if audio device cannot be opened
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supports = |channels: u16| {
            device.supported_output_configs().ok()?.find(|c| {
                c.channels() == channels
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
        };

        // Prefer mono, fall back to stereo
        let supported_config = supports(1)
            .or_else(|| supports(2))
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { config })
    }

    /// Play MP3 bytes, blocking until playback finishes
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub fn play_mp3_blocking(&self, mp3_data: &[u8]) -> Result<()> {
        let decoded = decode_mp3(mp3_data)?;
        let samples = if decoded.sample_rate == PLAYBACK_SAMPLE_RATE {
            decoded.samples
        } else {
            tracing::debug!(
                from = decoded.sample_rate,
                to = PLAYBACK_SAMPLE_RATE,
                "resampling synthesized audio"
            );
            resample(&decoded.samples, decoded.sample_rate, PLAYBACK_SAMPLE_RATE)?
        };
        self.play_blocking(samples)
    }

    /// Play mono f32 samples, blocking until playback finishes
    ///
    /// # Errors
    ///
    /// Returns error if the output stream cannot be opened
    pub fn play_blocking(&self, samples: Vec<f32>) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device".to_string()))?;

        let channels = usize::from(self.config.channels);
        let sample_count = samples.len();

        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stream = {
            let samples = Arc::clone(&samples);
            let position = Arc::clone(&position);
            let finished = Arc::clone(&finished);

            device
                .build_output_stream(
                    &self.config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        let mut pos = position.load(Ordering::Relaxed);

                        for frame in data.chunks_mut(channels) {
                            let sample = samples.get(pos).copied().unwrap_or_else(|| {
                                finished.store(true, Ordering::Release);
                                0.0
                            });
                            frame.fill(sample);

                            if pos < samples.len() {
                                pos += 1;
                            }
                        }

                        position.store(pos, Ordering::Relaxed);
                    },
                    |err| {
                        tracing::error!(error = %err, "audio playback error");
                    },
                    None,
                )
                .map_err(|e| Error::Audio(e.to_string()))?
        };

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        // Poll for completion, bounded by the clip length plus slack
        let duration_ms = (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
        let timeout = Duration::from_millis(duration_ms + 500);
        let start = Instant::now();

        while !finished.load(Ordering::Acquire) && start.elapsed() <= timeout {
            std::thread::sleep(Duration::from_millis(50));
        }

        // Let the device drain its last buffer
        std::thread::sleep(Duration::from_millis(100));

        drop(stream);
        tracing::debug!(samples = sample_count, "playback complete");

        Ok(())
    }
}

/// Mono PCM decoded from a compressed stream
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    /// Rate of the first decoded frame
    pub sample_rate: u32,
}

/// Decode MP3 bytes to mono f32 samples
///
/// An empty stream decodes to no samples at [`PLAYBACK_SAMPLE_RATE`].
///
/// # Errors
///
/// Returns error if the data is not valid MP3
pub fn decode_mp3(mp3_data: &[u8]) -> Result<DecodedAudio> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate: Option<u32> = None;

    loop {
        let frame = match decoder.next_frame() {
            Ok(frame) => frame,
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        };

        #[allow(clippy::cast_sign_loss)]
        sample_rate.get_or_insert(frame.sample_rate as u32);

        if frame.channels == 2 {
            // Stereo: average channels
            samples.extend(frame.data.chunks(2).map(|chunk| {
                let left = f32::from(chunk[0]) / 32768.0;
                let right = f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                f32::midpoint(left, right)
            }));
        } else {
            samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
        }
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.unwrap_or(PLAYBACK_SAMPLE_RATE),
    })
}

/// Resample mono audio with rubato
///
/// The tail is zero-padded to a whole chunk and the result trimmed to the
/// duration of the input.
///
/// # Errors
///
/// Returns error if the resampler rejects the rates
#[allow(clippy::cast_possible_truncation)]
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    use rubato::{FftFixedIn, Resampler};

    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let chunk_size = 1024;
    let sub_chunks = 2;

    let mut resampler =
        FftFixedIn::<f64>::new(from_rate as usize, to_rate as usize, chunk_size, sub_chunks, 1)
            .map_err(|e| Error::Audio(format!("resampler init failed: {e}")))?;

    let expected = (samples.len() as u64 * u64::from(to_rate) / u64::from(from_rate)) as usize;

    // One extra chunk flushes the resampler's internal delay
    let chunks = samples.len().div_ceil(chunk_size) + 1;
    let mut input: Vec<f64> = samples.iter().map(|&s| f64::from(s)).collect();
    input.resize(chunks * chunk_size, 0.0);

    let mut output = Vec::with_capacity(expected + chunk_size);
    for chunk in input.chunks(chunk_size) {
        let result = resampler
            .process(&[chunk], None)
            .map_err(|e| Error::Audio(format!("resample failed: {e}")))?;
        output.extend(result[0].iter().map(|&s| s as f32));
    }

    output.truncate(expected);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_mp3() {
        let decoded = decode_mp3(&[]).unwrap();
        assert!(decoded.samples.is_empty());
        assert_eq!(decoded.sample_rate, PLAYBACK_SAMPLE_RATE);
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(resample(&samples, 24000, 24000).unwrap(), samples);
    }
}
