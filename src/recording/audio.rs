//! Audio capture module.
//!
//! This module handles audio input device management and PCM sample capture.
//! Audio is captured from the configured input device, downmixed to mono i16,
//! and kept in memory until the recording stops. The finished clip can be
//! encoded as a WAV file for upload or playback.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use hound::WavWriter;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// A finished mono recording held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedClip {
    /// Mono i16 PCM samples
    pub samples: Vec<i16>,
    /// Sample rate the samples were captured at
    pub sample_rate: u32,
}

impl RecordedClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length of the clip.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    /// Encodes the clip as a 16-bit mono PCM WAV file in memory.
    ///
    /// # Errors
    /// - If the WAV writer fails
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, self.wav_spec())?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }

    /// Writes the clip as a WAV file at `path`.
    ///
    /// # Errors
    /// - If the file cannot be created or written
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let mut writer = WavWriter::create(path, self.wav_spec())?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        tracing::debug!("Clip written to {}", path.display());
        Ok(())
    }
}

/// Records audio from a specified or default input device.
///
/// Features:
/// - Captures from a specified input device or system default at its native sample rate
/// - Accepts i16, u16 and f32 device formats
/// - Converts multi-channel audio to mono by averaging channels
pub struct AudioRecorder {
    /// Actual recording sample rate from device
    sample_rate: u32,
    /// Recorded audio samples (i16 PCM mono)
    samples: Arc<Mutex<Vec<i16>>>,
    /// Active audio input stream (kept alive during recording)
    stream: Option<cpal::Stream>,
    /// Device name or "default" to use the system default device
    device_name: String,
}

impl AudioRecorder {
    /// Creates a new audio recorder with requested sample rate and device.
    ///
    /// The actual recording sample rate may differ based on device capabilities.
    /// Call `sample_rate()` after `start_recording()` to get the actual rate.
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            device_name,
        }
    }

    /// Starts a fresh recording from the configured input device.
    ///
    /// Any samples from a previous recording are discarded.
    ///
    /// # Errors
    /// - If the specified device is not available
    /// - If the device uses an unsupported sample format
    /// - If audio stream creation fails
    pub fn start_recording(&mut self) -> Result<()> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();
            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {}", device_name);

        let device_config = device.default_input_config()?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;
        let sample_format = device_config.sample_format();

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Recording at device rate.",
                self.sample_rate,
                device_sample_rate
            );
        }

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            device_sample_rate,
            num_channels,
            sample_format
        );

        self.sample_rate = device_sample_rate;
        self.samples
            .lock()
            .map_err(|_| anyhow!("Sample buffer lock poisoned"))?
            .clear();

        let stream_config: cpal::StreamConfig = device_config.into();
        let stream = match sample_format {
            cpal::SampleFormat::I16 => self.build_stream::<i16>(&device, &stream_config, num_channels)?,
            cpal::SampleFormat::U16 => self.build_stream::<u16>(&device, &stream_config, num_channels)?,
            cpal::SampleFormat::F32 => self.build_stream::<f32>(&device, &stream_config, num_channels)?,
            other => return Err(anyhow!("Unsupported sample format: {other:?}")),
        };

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started");
        Ok(())
    }

    fn build_stream<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        num_channels: usize,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + Send + 'static,
        i16: FromSample<T>,
    {
        let samples_arc = Arc::clone(&self.samples);
        let stream = device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let converted: Vec<i16> = data.iter().map(|&s| s.to_sample::<i16>()).collect();
                let mono = downmix_to_mono(&converted, num_channels);
                if let Ok(mut samples) = samples_arc.lock() {
                    samples.extend_from_slice(&mono);
                }
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;
        Ok(stream)
    }

    /// Stops recording and hands back the captured clip.
    ///
    /// Returns `None` when no samples were captured.
    pub fn stop_recording(&mut self) -> Option<RecordedClip> {
        self.stream = None;

        let samples = match self.samples.lock() {
            Ok(mut samples) => std::mem::take(&mut *samples),
            Err(_) => {
                tracing::error!("Sample buffer lock poisoned; discarding recording");
                return None;
            }
        };

        if samples.is_empty() {
            tracing::warn!("Recording stopped with no samples captured");
            return None;
        }

        let clip = RecordedClip::new(samples, self.sample_rate);
        tracing::info!(
            "Recording stopped: {:.2}s ({} samples at {}Hz)",
            clip.duration().as_secs_f32(),
            clip.samples.len(),
            self.sample_rate
        );
        Some(clip)
    }

    /// Returns whether an input stream is currently open.
    pub fn is_recording(&self) -> bool {
        self.stream.is_some()
    }

    /// Returns up to `count` of the most recent samples.
    pub fn recent_samples(&self, count: usize) -> Vec<i16> {
        match self.samples.lock() {
            Ok(samples) => {
                let start = samples.len().saturating_sub(count);
                samples[start..].to_vec()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Returns the actual sample rate of the recording.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Averages interleaved frames of `num_channels` into mono samples.
pub fn downmix_to_mono(data: &[i16], num_channels: usize) -> Vec<i16> {
    match num_channels {
        0 | 1 => data.to_vec(),
        _ => data
            .chunks_exact(num_channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / num_channels as i32) as i16
            })
            .collect(),
    }
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    let devices: Vec<_> = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
        .collect();

    if let Ok(index) = device_spec.parse::<usize>() {
        let count = devices.len();
        return devices.into_iter().nth(index).ok_or_else(|| {
            anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                count.saturating_sub(1)
            )
        });
    }

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|name| name == device_spec))
        .ok_or_else(|| {
            anyhow!(
                "Audio input device '{device_spec}' not found. Use 'tscribe list-devices' to see available devices."
            )
        })
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}
