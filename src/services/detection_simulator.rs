// Detection Simulator
// Produces a synthetic "AI-detection" score for display. No detector is
// consulted and the text is never analysed; the score is random.

use crate::models::DetectionScore;
use rand::seq::SliceRandom;
use rand::Rng;

pub const SIMULATED_DETECTORS: [&str; 5] =
    ["GPTZero", "ZeroGPT", "Originality.ai", "Turnitin", "Copyleaks"];

const SCORE_MIN: f64 = 5.0;
const SCORE_MAX: f64 = 30.0;

pub fn simulate_detection(text: &str) -> DetectionScore {
    simulate_detection_with(&mut rand::thread_rng(), text)
}

pub fn simulate_detection_with<R: Rng + ?Sized>(rng: &mut R, _text: &str) -> DetectionScore {
    let detector = SIMULATED_DETECTORS
        .choose(rng)
        .copied()
        .unwrap_or(SIMULATED_DETECTORS[0]);

    DetectionScore {
        score: rng.gen_range(SCORE_MIN..SCORE_MAX),
        detector,
        simulated: true,
    }
}
