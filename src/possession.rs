/// How two raw possession shares are reconciled into a pair summing to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationMode {
    /// Plain ratio of the two shares.
    RawShare,
    /// Ratio scaled into the 50-100 band, so a stronger share reads as
    /// dominance rather than a raw fraction, then corrected back to sum one.
    #[default]
    HalfBlend,
}

/// Reconciles two raw shares into a valid probability pair. Both inputs are
/// expected non-negative; with no evidence on either side the split is even.
pub fn normalize_shares(home: f64, away: f64, mode: NormalizationMode) -> (f64, f64) {
    let total = home + away;
    if total <= 0.0 {
        return (0.5, 0.5);
    }
    match mode {
        NormalizationMode::RawShare => (home / total, away / total),
        NormalizationMode::HalfBlend => {
            let mut h = (home / total) * 0.5 + 0.5;
            let mut a = (away / total) * 0.5 + 0.5;
            let sum = h + a;
            if sum != 1.0 {
                let correction = (1.0 - sum) / 2.0;
                h += correction;
                a += correction;
            }
            (h, a)
        }
    }
}
