use crate::{Stroke, SubmissionLimits};

#[derive(Debug, Clone, PartialEq)]
pub struct Bounded {
    pub strokes: Vec<Stroke>,
    pub original_bytes: usize,
    pub final_bytes: usize,
    /// Stride applied when the payload was over the ceiling.
    pub stride: Option<usize>,
}

/// JSON size of the stroke list as it goes on the wire.
pub fn serialized_size(strokes: &[Stroke]) -> usize {
    serde_json::to_vec(strokes)
        .map(|bytes| bytes.len())
        .unwrap_or_default()
}

pub fn sampling_stride(serialized_bytes: usize, limits: &SubmissionLimits) -> usize {
    let divisor = limits.sampling_divisor_bytes.max(1);
    serialized_bytes.div_ceil(divisor).max(2)
}

/// Keeps indices `0, stride, 2 * stride, ...` of every stroke.
pub fn downsample(strokes: &[Stroke], stride: usize) -> Vec<Stroke> {
    let stride = stride.max(1);
    strokes
        .iter()
        .map(|stroke| stroke.iter().step_by(stride).copied().collect())
        .collect()
}

pub fn bound_strokes(strokes: Vec<Stroke>, limits: &SubmissionLimits) -> Bounded {
    let original_bytes = serialized_size(&strokes);
    if original_bytes <= limits.max_payload_bytes {
        return Bounded {
            strokes,
            original_bytes,
            final_bytes: original_bytes,
            stride: None,
        };
    }
    let stride = sampling_stride(original_bytes, limits);
    let reduced = downsample(&strokes, stride);
    let final_bytes = serialized_size(&reduced);
    log::debug!("Data too large ({original_bytes} bytes), keeping every {stride}th point");
    log::debug!("Reduced to {final_bytes} bytes");
    Bounded {
        strokes: reduced,
        original_bytes,
        final_bytes,
        stride: Some(stride),
    }
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate_transcription(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn stroke(len: usize, t0: i64) -> Stroke {
        (0..len)
            .map(|i| Point {
                x: 1000 + i as i64,
                y: 2000,
                t: t0 + i as i64,
            })
            .collect()
    }

    #[test]
    fn stride_is_at_least_two() {
        let limits = SubmissionLimits::default();
        assert_eq!(sampling_stride(300_001, &limits), 2);
        assert_eq!(sampling_stride(350_001, &limits), 2);
        assert_eq!(sampling_stride(600_000, &limits), 2);
        assert_eq!(sampling_stride(600_001, &limits), 3);
        assert_eq!(sampling_stride(1_000_000, &limits), 4);
    }

    #[test]
    fn downsample_keeps_every_stride_th_index() {
        let strokes = vec![stroke(7, 0), stroke(2, 100), stroke(1, 200)];
        let reduced = downsample(&strokes, 3);
        assert_eq!(reduced[0], vec![strokes[0][0], strokes[0][3], strokes[0][6]]);
        assert_eq!(reduced[1], vec![strokes[1][0]]);
        assert_eq!(reduced[2], vec![strokes[2][0]]);
    }

    #[test]
    fn downsample_with_stride_two_keeps_even_indices() {
        let strokes = vec![stroke(9, 0)];
        let reduced = downsample(&strokes, 2);
        let kept: Vec<i64> = reduced[0].iter().map(|point| point.t).collect();
        assert_eq!(kept, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn downsample_never_grows_or_reorders() {
        let strokes = vec![stroke(50, 0), stroke(13, 1000)];
        for stride in 1..8 {
            let reduced = downsample(&strokes, stride);
            for (before, after) in strokes.iter().zip(&reduced) {
                assert!(after.len() <= before.len());
                assert!(after.windows(2).all(|pair| pair[0].t < pair[1].t));
            }
        }
    }

    #[test]
    fn small_payload_passes_untouched() {
        let strokes = vec![stroke(10, 0)];
        let bounded = bound_strokes(strokes.clone(), &SubmissionLimits::default());
        assert_eq!(bounded.strokes, strokes);
        assert_eq!(bounded.stride, None);
        assert_eq!(bounded.original_bytes, serialized_size(&strokes));
    }

    #[test]
    fn oversized_payload_is_thinned_uniformly() {
        let strokes = vec![stroke(12_000, 1_700_000_000_000), stroke(9_001, 1_700_000_100_000)];
        let limits = SubmissionLimits::default();
        let size = serialized_size(&strokes);
        assert!(size > limits.max_payload_bytes);

        let bounded = bound_strokes(strokes.clone(), &limits);
        let stride = sampling_stride(size, &limits);
        assert_eq!(bounded.stride, Some(stride));
        assert_eq!(bounded.original_bytes, size);
        assert_eq!(bounded.strokes, downsample(&strokes, stride));
        assert_eq!(bounded.final_bytes, serialized_size(&bounded.strokes));
        assert_eq!(bounded.strokes[1].len(), 9_001usize.div_ceil(stride));
    }

    #[test]
    fn payload_at_the_ceiling_is_kept_and_one_byte_over_is_thinned() {
        let strokes = vec![stroke(40, 0)];
        let size = serialized_size(&strokes);
        let at_ceiling = SubmissionLimits {
            max_payload_bytes: size,
            ..SubmissionLimits::default()
        };
        let bounded = bound_strokes(strokes.clone(), &at_ceiling);
        assert_eq!(bounded.stride, None);
        assert_eq!(bounded.strokes, strokes);

        let below_size = SubmissionLimits {
            max_payload_bytes: size - 1,
            ..SubmissionLimits::default()
        };
        let bounded = bound_strokes(strokes.clone(), &below_size);
        assert_eq!(bounded.stride, Some(2));
        assert_eq!(bounded.strokes[0].len(), 20);
    }

    #[test]
    fn ceiling_comes_from_limits() {
        let limits = SubmissionLimits {
            max_payload_bytes: 10,
            sampling_divisor_bytes: 10,
            max_transcription_chars: 1000,
        };
        let strokes = vec![stroke(6, 0)];
        let bounded = bound_strokes(strokes.clone(), &limits);
        let expected_stride = serialized_size(&strokes).div_ceil(10);
        assert_eq!(bounded.stride, Some(expected_stride));
        assert_eq!(bounded.strokes[0], vec![strokes[0][0]]);
    }

    #[test]
    fn transcription_is_cut_by_characters() {
        assert_eq!(truncate_transcription("hello", 3), "hel");
        assert_eq!(truncate_transcription("hello", 10), "hello");
        assert_eq!(truncate_transcription("héllo wörld", 8), "héllo wö");
        let long = "a".repeat(1500);
        assert_eq!(truncate_transcription(&long, 1000).len(), 1000);
    }
}
