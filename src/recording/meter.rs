//! Input level metering for the live recording display.

/// Width of the displayed dynamic range below the reference level.
const METER_RANGE_DB: f32 = 40.0;

/// Floor so a silent but active microphone still shows a sliver.
const METER_FLOOR_PERCENT: f32 = 4.0;

/// Number of samples covering the last 50 ms at `sample_rate`.
pub fn window_len(sample_rate: u32) -> usize {
    (sample_rate / 20).max(1) as usize
}

/// Converts the RMS of the most recent 50 ms of audio to a 0-100 meter value.
///
/// The RMS is expressed in dBFS and mapped linearly across a 40 dB window that
/// ends at `reference_level_db`. Levels above the reference clamp to 100.
pub fn volume_percent(samples: &[i16], sample_rate: u32, reference_level_db: i8) -> u8 {
    if samples.is_empty() {
        return 0;
    }

    let window = window_len(sample_rate).min(samples.len());
    let recent = &samples[samples.len() - window..];

    let sum_of_squares: i64 = recent.iter().map(|&x| (x as i64).pow(2)).sum();
    let mean_square = sum_of_squares / recent.len() as i64;
    let rms = (mean_square as f32).sqrt();

    let db_fs = if rms > 0.0 {
        20.0 * (rms / 32767.0).log10()
    } else {
        -160.0
    };

    let min_db = reference_level_db as f32 - METER_RANGE_DB;
    ((db_fs - min_db) / METER_RANGE_DB * 100.0).clamp(METER_FLOOR_PERCENT, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_reads_zero() {
        assert_eq!(volume_percent(&[], 16000, -20), 0);
    }

    #[test]
    fn test_silence_sits_on_floor() {
        assert_eq!(volume_percent(&[0; 1600], 16000, -20), 4);
    }

    #[test]
    fn test_full_scale_clamps_to_hundred() {
        assert_eq!(volume_percent(&[i16::MAX; 800], 16000, -20), 100);
    }

    #[test]
    fn test_only_recent_window_counts() {
        let mut samples = vec![i16::MAX; 16000];
        samples.extend(std::iter::repeat(0).take(800));
        assert_eq!(volume_percent(&samples, 16000, -20), 4);
    }

    #[test]
    fn test_window_len() {
        assert_eq!(window_len(16000), 800);
        assert_eq!(window_len(10), 1);
    }
}
