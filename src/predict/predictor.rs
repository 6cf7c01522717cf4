//! Rank likelihoods from enumerated outcomes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::enumerator::Outcomes;
use crate::core::{RaceConfig, TokenId, TokenList};

/// Percentage (0-100) of outcomes placing each race token at one rank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankDistribution {
    /// Entries in config race-token order.
    entries: SmallVec<[(TokenId, f64); 8]>,
}

impl RankDistribution {
    /// Percentage for a token (0 for tokens not in the race).
    #[must_use]
    pub fn get(&self, token: TokenId) -> f64 {
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map_or(0.0, |&(_, percent)| percent)
    }

    /// Iterate over `(token, percentage)` in config order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Entries from most to least likely.
    #[must_use]
    pub fn sorted(&self) -> Vec<(TokenId, f64)> {
        let mut sorted = self.entries.to_vec();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted
    }

    /// Sum of all percentages (100 when every outcome fills this rank).
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, percent)| percent).sum()
    }
}

/// One distribution per finishing rank, leader first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    ranks: Vec<RankDistribution>,
}

impl Prediction {
    /// All rank distributions, leader first.
    #[must_use]
    pub fn ranks(&self) -> &[RankDistribution] {
        &self.ranks
    }

    /// Distribution for a 0-based rank.
    #[must_use]
    pub fn rank(&self, rank: usize) -> Option<&RankDistribution> {
        self.ranks.get(rank)
    }

    /// Distribution for first place.
    #[must_use]
    pub fn first(&self) -> Option<&RankDistribution> {
        self.rank(0)
    }

    /// Distribution for second place.
    #[must_use]
    pub fn second(&self) -> Option<&RankDistribution> {
        self.rank(1)
    }

    /// Expected coins of a round-leader bet on each token.
    ///
    /// A ticket pays `ticket` if the token leads, 1 if it comes second and
    /// costs 1 otherwise.
    #[must_use]
    pub fn bet_values(&self, ticket: u8) -> SmallVec<[(TokenId, f64); 8]> {
        let Some(first) = self.first() else {
            return SmallVec::new();
        };

        first
            .iter()
            .map(|(token, percent)| {
                let p_first = percent / 100.0;
                let p_second = self.second().map_or(0.0, |d| d.get(token)) / 100.0;
                let p_other = 1.0 - p_first - p_second;
                (token, f64::from(ticket) * p_first + p_second - p_other)
            })
            .collect()
    }
}

/// Predictions before and after a candidate hazard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardImpact {
    pub before: Prediction,
    pub after: Prediction,
}

impl HazardImpact {
    /// Change in percentage points for a token at a 0-based rank.
    #[must_use]
    pub fn delta(&self, rank: usize, token: TokenId) -> f64 {
        let percent = |p: &Prediction| p.rank(rank).map_or(0.0, |d| d.get(token));
        percent(&self.after) - percent(&self.before)
    }
}

/// Turns an outcome multiset into per-rank percentages.
#[derive(Clone, Debug)]
pub struct RankPredictor {
    race_tokens: TokenList,
}

impl RankPredictor {
    /// Create a predictor for the config's race tokens.
    #[must_use]
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            race_tokens: config.race_tokens.clone(),
        }
    }

    /// Compute one distribution per rank.
    ///
    /// Every outcome counts with its weight. An empty outcome set gives all
    /// zeros.
    #[must_use]
    pub fn predict(&self, outcomes: &Outcomes) -> Prediction {
        let n = self.race_tokens.len();
        let mut counts = vec![0u64; n * n];

        for entry in outcomes.iter() {
            for (rank, token) in entry.ranking.iter().take(n).enumerate() {
                if let Some(column) = self.race_tokens.iter().position(|t| t == token) {
                    counts[rank * n + column] += entry.weight;
                }
            }
        }

        let total = outcomes.total_weight();
        let ranks = (0..n)
            .map(|rank| RankDistribution {
                entries: self
                    .race_tokens
                    .iter()
                    .enumerate()
                    .map(|(column, &token)| {
                        let percent = if total == 0 {
                            0.0
                        } else {
                            counts[rank * n + column] as f64 / total as f64 * 100.0
                        };
                        (token, percent)
                    })
                    .collect(),
            })
            .collect();

        Prediction { ranks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(name: char) -> TokenId {
        TokenId(name)
    }

    fn predictor() -> RankPredictor {
        let config = RaceConfig::default().with_race_tokens([t('a'), t('b'), t('c')]);
        RankPredictor::new(&config)
    }

    fn outcomes() -> Outcomes {
        let mut outcomes = Outcomes::new();
        outcomes.push(TokenList::from_slice(&[t('a'), t('b'), t('c')]), 2);
        outcomes.push(TokenList::from_slice(&[t('b'), t('a'), t('c')]), 1);
        outcomes.push(TokenList::from_slice(&[t('c'), t('b'), t('a')]), 1);
        outcomes
    }

    #[test]
    fn test_weighted_percentages() {
        let prediction = predictor().predict(&outcomes());

        let first = prediction.first().unwrap();
        assert_eq!(first.get(t('a')), 50.0);
        assert_eq!(first.get(t('b')), 25.0);
        assert_eq!(first.get(t('c')), 25.0);

        let second = prediction.second().unwrap();
        assert_eq!(second.get(t('b')), 75.0);
        assert_eq!(second.get(t('a')), 25.0);
        assert_eq!(second.get(t('c')), 0.0);

        assert_eq!(prediction.ranks().len(), 3);
        for rank in prediction.ranks() {
            assert!((rank.total() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sorted() {
        let prediction = predictor().predict(&outcomes());
        let sorted = prediction.second().unwrap().sorted();

        assert_eq!(sorted[0], (t('b'), 75.0));
        assert_eq!(sorted[1], (t('a'), 25.0));
        assert_eq!(sorted[2], (t('c'), 0.0));
    }

    #[test]
    fn test_empty_outcomes() {
        let prediction = predictor().predict(&Outcomes::new());

        assert_eq!(prediction.ranks().len(), 3);
        assert_eq!(prediction.first().unwrap().total(), 0.0);
    }

    #[test]
    fn test_get_unknown_token() {
        let prediction = predictor().predict(&outcomes());
        assert_eq!(prediction.first().unwrap().get(t('z')), 0.0);
    }

    #[test]
    fn test_bet_values() {
        let prediction = predictor().predict(&outcomes());
        let values = prediction.bet_values(5);

        // a: 5 * 0.5 + 0.25 - 0.25
        assert_eq!(values[0], (t('a'), 2.5));
        // b: 5 * 0.25 + 0.75 - 0.0
        assert_eq!(values[1], (t('b'), 2.0));
        // c: 5 * 0.25 + 0.0 - 0.75
        assert_eq!(values[2], (t('c'), 0.5));
    }

    #[test]
    fn test_hazard_impact_delta() {
        let before = predictor().predict(&outcomes());
        let mut shifted = Outcomes::new();
        shifted.push(TokenList::from_slice(&[t('c'), t('a'), t('b')]), 1);
        let after = predictor().predict(&shifted);

        let impact = HazardImpact { before, after };
        assert_eq!(impact.delta(0, t('c')), 75.0);
        assert_eq!(impact.delta(0, t('a')), -50.0);
    }

    #[test]
    fn test_serialization() {
        let prediction = predictor().predict(&outcomes());
        let json = serde_json::to_string(&prediction).unwrap();
        let deserialized: Prediction = serde_json::from_str(&json).unwrap();
        assert_eq!(prediction, deserialized);
    }
}
