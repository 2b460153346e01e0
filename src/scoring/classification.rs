use crate::inventory::{ScoreBand, ScoreBands};

/// Returns the band with the smallest bound at or above `score`. Scores past every
/// bound land in the last band.
pub fn classify(score: u32, bands: &ScoreBands) -> &'static ScoreBand {
    bands
        .as_slice()
        .iter()
        .find(|band| score <= band.upper_bound)
        .unwrap_or_else(|| bands.last())
}

/// Every band a complete answer set scoring within `min_score..=max_score` can land in,
/// lowest first.
pub fn reachable_bands(
    min_score: u32,
    max_score: u32,
    bands: &ScoreBands,
) -> impl Iterator<Item = &'static ScoreBand> {
    let lowest = classify(min_score, bands).upper_bound;
    let highest = classify(max_score, bands).upper_bound;
    bands
        .as_slice()
        .iter()
        .filter(move |band| band.upper_bound >= lowest && band.upper_bound <= highest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, Severity};

    fn bands() -> ScoreBands {
        *Inventory::hamilton().bands()
    }

    #[test]
    fn test_band_boundaries() {
        let bands = bands();
        assert_eq!(classify(0, &bands).severity, Severity::Normal);
        assert_eq!(classify(14, &bands).label, "Normal");
        assert_eq!(classify(15, &bands).label, "Leve");
        assert_eq!(classify(18, &bands).label, "Leve");
        assert_eq!(classify(19, &bands).label, "Moderada");
        assert_eq!(classify(25, &bands).label, "Moderada");
        assert_eq!(classify(26, &bands).label, "Severa");
        assert_eq!(classify(33, &bands).label, "Severa");
        assert_eq!(classify(34, &bands).label, "Extremadamente Severa");
    }

    #[test]
    fn test_ceiling_fallback() {
        let bands = bands();
        assert_eq!(classify(1000, &bands).severity, Severity::ExtremelySevere);
        assert_eq!(classify(u32::MAX, &bands).severity, Severity::ExtremelySevere);
    }

    #[test]
    fn test_every_score_has_one_band() {
        let bands = bands();
        for score in 20..=80 {
            let band = classify(score, &bands);
            let matching = bands
                .as_slice()
                .iter()
                .filter(|b| score <= b.upper_bound)
                .min_by_key(|b| b.upper_bound)
                .unwrap();
            assert_eq!(band, matching);
        }
    }

    #[test]
    fn test_reachable_bands() {
        let inventory = Inventory::hamilton();
        let reachable: Vec<&str> =
            reachable_bands(inventory.min_score(), inventory.max_score(), inventory.bands())
                .map(|b| b.label)
                .collect();
        assert_eq!(
            reachable,
            vec!["Moderada", "Severa", "Extremadamente Severa"]
        );
    }
}
