use market_core::FusionCoefficients;

/// Fuse a raw model prediction with a sentiment score.
///
/// `x*raw + y*sentiment + z*(raw*sentiment)`. NaN and infinities propagate.
#[inline]
pub fn fuse(raw_prediction: f64, sentiment: f64, coeffs: &FusionCoefficients) -> f64 {
    coeffs.x * raw_prediction + coeffs.y * sentiment + coeffs.z * (raw_prediction * sentiment)
}
