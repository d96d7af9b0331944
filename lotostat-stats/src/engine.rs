use std::cmp::Ordering;
use std::collections::HashMap;

use lotostat_db::models::Draw;

use crate::config::{StatsConfig, MAIN_PICKS};
use crate::digest::{
    NumberCount, OverdueEntry, PairCount, ParityBalance, StatsDigest, StrongDigest,
};
use crate::error::StatsError;

/// Calcule le digest statistique complet sur un historique de tirages.
/// draws[0] = le tirage le plus récent. Un seul passage sur l'historique,
/// aucune entrée/sortie, résultat entièrement déterministe.
pub fn compute(draws: &[Draw], config: &StatsConfig) -> Result<StatsDigest, StatsError> {
    config.validate()?;
    if draws.is_empty() {
        return Err(StatsError::InvalidInput("aucun tirage fourni".to_string()));
    }

    let n = draws.len();
    let window = config.recent_window.min(n);
    let size = config.max_number as usize;
    let strong_size = config.strong_max as usize;
    let low_max = config.max_number / 2;

    let mut freq_all = vec![0u32; size];
    let mut freq_recent = vec![0u32; size];
    let mut last_seen: Vec<Option<u32>> = vec![None; size];
    let mut strong_freq = vec![0u32; strong_size];
    let mut strong_last_seen: Vec<Option<u32>> = vec![None; strong_size];
    let mut pair_counts: HashMap<(u8, u8), u32> = HashMap::new();
    let mut parity = ParityBalance { even: 0, odd: 0, low: 0, high: 0 };

    for (t, draw) in draws.iter().enumerate() {
        check_record(draw, config)?;

        for (i, &a) in draw.main.iter().enumerate() {
            let idx = (a - 1) as usize;
            freq_all[idx] += 1;
            if t < window {
                freq_recent[idx] += 1;
            }
            if last_seen[idx].is_none() {
                last_seen[idx] = Some(t as u32);
            }
            if a % 2 == 0 {
                parity.even += 1;
            } else {
                parity.odd += 1;
            }
            if a <= low_max {
                parity.low += 1;
            } else {
                parity.high += 1;
            }
            if config.include_pairs {
                for &b in &draw.main[i + 1..] {
                    let key = if a < b { (a, b) } else { (b, a) };
                    *pair_counts.entry(key).or_insert(0) += 1;
                }
            }
        }

        let sidx = (draw.strong - 1) as usize;
        strong_freq[sidx] += 1;
        if strong_last_seen[sidx].is_none() {
            strong_last_seen[sidx] = Some(t as u32);
        }
    }

    // Modèle de référence : chaque tirage choisit 6 numéros indépendamment et
    // uniformément dans 1..=max_number. Approximation assumée, le vrai
    // processus est sans remise.
    let p = MAIN_PICKS as f64 / config.max_number as f64;
    let expected = n as f64 * p;
    let sd = (n as f64 * p * (1.0 - p)).sqrt();

    let z_scores: Vec<f64> = freq_all
        .iter()
        .map(|&c| if sd > 0.0 { (c as f64 - expected) / sd } else { 0.0 })
        .collect();

    let chi_square = freq_all
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let p_strong = 1.0 / config.strong_max as f64;
    let expected_strong = n as f64 * p_strong;
    let chi_strong = strong_freq
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected_strong;
            diff * diff / expected_strong
        })
        .sum();

    let mut top_pairs: Vec<PairCount> = pair_counts
        .into_iter()
        .map(|((a, b), count)| PairCount { a, b, count })
        .collect();
    top_pairs.sort_by(|x, y| {
        y.count
            .cmp(&x.count)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });
    top_pairs.truncate(config.top_pairs);

    Ok(StatsDigest {
        total_draws: n,
        window_size: window,
        hot_all: rank_by_count(&freq_all, true),
        cold_all: rank_by_count(&freq_all, false),
        hot_recent: rank_by_count(&freq_recent, true),
        cold_recent: rank_by_count(&freq_recent, false),
        overdue: rank_overdue(&last_seen),
        frequency_all: freq_all,
        frequency_recent: freq_recent,
        expected_per_number: expected,
        std_dev_per_number: sd,
        z_scores,
        chi_square,
        degrees_of_freedom: config.max_number as u32 - 1,
        top_pairs,
        parity,
        strong: StrongDigest {
            expected_per_number: expected_strong,
            chi_square: chi_strong,
            degrees_of_freedom: config.strong_max as u32 - 1,
            hot: rank_by_count(&strong_freq, true),
            cold: rank_by_count(&strong_freq, false),
            overdue: rank_overdue(&strong_last_seen),
            frequency: strong_freq,
        },
    })
}

/// La validation appartient à l'ingestion ; un tirage malformé qui arrive
/// quand même ici fait échouer le calcul entier, sans digest partiel.
fn check_record(draw: &Draw, config: &StatsConfig) -> Result<(), StatsError> {
    for &n in &draw.main {
        if n < 1 || n > config.max_number {
            return Err(StatsError::InvalidInput(format!(
                "tirage {} : numéro {} hors limites (1-{})",
                draw.draw_id, n, config.max_number
            )));
        }
    }
    for i in 0..draw.main.len() {
        for j in (i + 1)..draw.main.len() {
            if draw.main[i] == draw.main[j] {
                return Err(StatsError::InvalidInput(format!(
                    "tirage {} : numéro en double {}",
                    draw.draw_id, draw.main[i]
                )));
            }
        }
    }
    if draw.strong < 1 || draw.strong > config.strong_max {
        return Err(StatsError::InvalidInput(format!(
            "tirage {} : numéro fort {} hors limites (1-{})",
            draw.draw_id, draw.strong, config.strong_max
        )));
    }
    Ok(())
}

fn rank_by_count(freq: &[u32], descending: bool) -> Vec<NumberCount> {
    let mut list: Vec<NumberCount> = freq
        .iter()
        .enumerate()
        .map(|(i, &count)| NumberCount { number: (i + 1) as u8, count })
        .collect();
    if descending {
        list.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    } else {
        list.sort_by(|a, b| a.count.cmp(&b.count).then(a.number.cmp(&b.number)));
    }
    list
}

fn rank_overdue(last_seen: &[Option<u32>]) -> Vec<OverdueEntry> {
    let mut list: Vec<OverdueEntry> = last_seen
        .iter()
        .enumerate()
        .map(|(i, &distance)| OverdueEntry { number: (i + 1) as u8, distance })
        .collect();
    list.sort_by(|a, b| match (a.distance, b.distance) {
        (None, None) => a.number.cmp(&b.number),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x).then(a.number.cmp(&b.number)),
    });
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_draw(draw_id: u32, main: [u8; 6], strong: u8) -> Draw {
        Draw {
            draw_id,
            date: format!("2024-01-{:02}", (draw_id % 28) + 1),
            main,
            strong,
        }
    }

    /// Tirages cycliques déterministes, du plus récent au plus ancien.
    fn make_test_draws(n: usize) -> Vec<Draw> {
        (0..n)
            .map(|i| {
                let base = (i % 6) as u8 * 6;
                make_draw(
                    (n - i) as u32,
                    [
                        base + 1,
                        base + 2,
                        base + 3,
                        base + 4,
                        base + 5,
                        base + 6,
                    ],
                    (i % 7) as u8 + 1,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_draws_rejected() {
        let result = compute(&[], &StatsConfig::default());
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_config_rejected() {
        let draws = make_test_draws(10);
        let config = StatsConfig { recent_window: 0, ..Default::default() };
        assert!(matches!(
            compute(&draws, &config),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn test_out_of_range_main_rejected() {
        let draws = vec![make_draw(1, [1, 2, 3, 4, 5, 38], 1)];
        let result = compute(&draws, &StatsConfig::default());
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_main_rejected() {
        let draws = vec![make_draw(1, [1, 2, 3, 4, 5, 5], 1)];
        let result = compute(&draws, &StatsConfig::default());
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_out_of_range_strong_rejected() {
        let draws = vec![make_draw(1, [1, 2, 3, 4, 5, 6], 8)];
        let result = compute(&draws, &StatsConfig::default());
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_count_conservation() {
        let draws = make_test_draws(40);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        let total: u32 = digest.frequency_all.iter().sum();
        assert_eq!(total as usize, 40 * MAIN_PICKS);
        let total_strong: u32 = digest.strong.frequency.iter().sum();
        assert_eq!(total_strong, 40);
    }

    #[test]
    fn test_window_subset() {
        let draws = make_test_draws(40);
        let config = StatsConfig { recent_window: 12, ..Default::default() };
        let digest = compute(&draws, &config).unwrap();
        assert_eq!(digest.window_size, 12);
        for i in 0..digest.frequency_all.len() {
            assert!(digest.frequency_recent[i] <= digest.frequency_all[i]);
        }
        let total_recent: u32 = digest.frequency_recent.iter().sum();
        assert_eq!(total_recent as usize, 12 * MAIN_PICKS);
    }

    #[test]
    fn test_window_clamped_to_history() {
        let draws = make_test_draws(8);
        let config = StatsConfig { recent_window: 200, ..Default::default() };
        let digest = compute(&draws, &config).unwrap();
        assert_eq!(digest.window_size, 8);
        assert_eq!(digest.frequency_recent, digest.frequency_all);
    }

    #[test]
    fn test_hot_cold_ordering() {
        let draws = make_test_draws(50);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();

        for pair in digest.hot_all.windows(2) {
            assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].number < pair[1].number),
                "classement hot violé : {:?} avant {:?}",
                pair[0],
                pair[1]
            );
        }
        for pair in digest.cold_all.windows(2) {
            assert!(
                pair[0].count < pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].number < pair[1].number),
                "classement cold violé : {:?} avant {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_recent_rankings_ordered() {
        let draws = make_test_draws(50);
        let config = StatsConfig { recent_window: 15, ..Default::default() };
        let digest = compute(&draws, &config).unwrap();

        for pair in digest.hot_recent.windows(2) {
            assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].number < pair[1].number)
            );
        }
        for pair in digest.cold_recent.windows(2) {
            assert!(
                pair[0].count < pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].number < pair[1].number)
            );
        }
    }

    #[test]
    fn test_chi_square_non_negative() {
        let draws = make_test_draws(30);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        assert!(digest.chi_square >= 0.0);
        assert!(digest.strong.chi_square >= 0.0);
        assert_eq!(digest.degrees_of_freedom, 36);
        assert_eq!(digest.strong.degrees_of_freedom, 6);
    }

    #[test]
    fn test_chi_square_zero_when_counts_match_expected() {
        // 2 tirages sur un pool de 12 : expected = 2 * 6 / 12 = 1.0,
        // chaque numéro apparaît exactement une fois.
        let draws = vec![
            make_draw(2, [1, 2, 3, 4, 5, 6], 1),
            make_draw(1, [7, 8, 9, 10, 11, 12], 2),
        ];
        let config = StatsConfig { max_number: 12, ..Default::default() };
        let digest = compute(&draws, &config).unwrap();
        assert_eq!(digest.chi_square, 0.0);
        for &z in &digest.z_scores {
            assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn test_z_scores_sum_to_zero() {
        // Les écarts à l'espérance se compensent exactement.
        let draws = make_test_draws(25);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        let sum: f64 = digest.z_scores.iter().sum();
        assert!(sum.abs() < 1e-9, "somme des z-scores = {}", sum);
    }

    #[test]
    fn test_overdue_newest_draw_is_zero() {
        let draws = make_test_draws(30);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        for &n in &draws[0].main {
            let entry = digest
                .overdue
                .iter()
                .find(|e| e.number == n)
                .unwrap();
            assert_eq!(entry.distance, Some(0));
        }
    }

    #[test]
    fn test_overdue_never_seen_ranked_first() {
        // Le numéro 37 n'apparaît jamais dans les tirages cycliques (max base+6 = 36).
        let draws = make_test_draws(30);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        assert_eq!(digest.frequency_all[36], 0);
        assert_eq!(digest.overdue[0].number, 37);
        assert_eq!(digest.overdue[0].distance, None);

        // Toutes les entrées sans distance précèdent celles qui en ont une.
        let first_seen = digest.overdue.iter().position(|e| e.distance.is_some());
        if let Some(pos) = first_seen {
            assert!(digest.overdue[pos..].iter().all(|e| e.distance.is_some()));
        }
    }

    #[test]
    fn test_overdue_descending_distance() {
        let draws = make_test_draws(30);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        let distances: Vec<u32> = digest
            .overdue
            .iter()
            .filter_map(|e| e.distance)
            .collect();
        for pair in distances.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_pair_counted_once_per_draw() {
        // La paire (1, 2) apparaît dans deux tirages, dans des ordres différents.
        let draws = vec![
            make_draw(2, [5, 1, 9, 2, 20, 7], 1),
            make_draw(1, [2, 14, 5, 30, 1, 11], 2),
        ];
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        let pair = digest
            .top_pairs
            .iter()
            .find(|p| p.a == 1 && p.b == 2)
            .unwrap();
        assert_eq!(pair.count, 2);
        // Chaque tirage produit C(6,2) = 15 paires.
        let total: u32 = digest.top_pairs.iter().map(|p| p.count).sum();
        assert!(total <= 2 * 15);
    }

    #[test]
    fn test_pairs_stored_ordered() {
        let draws = make_test_draws(20);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        for p in &digest.top_pairs {
            assert!(p.a < p.b);
        }
    }

    #[test]
    fn test_pairs_gated_by_config() {
        let draws = make_test_draws(20);
        let config = StatsConfig { include_pairs: false, ..Default::default() };
        let digest = compute(&draws, &config).unwrap();
        assert!(digest.top_pairs.is_empty());
    }

    #[test]
    fn test_top_pairs_truncated() {
        let draws = make_test_draws(20);
        let config = StatsConfig { top_pairs: 5, ..Default::default() };
        let digest = compute(&draws, &config).unwrap();
        assert_eq!(digest.top_pairs.len(), 5);
        for pair in digest.top_pairs.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_parity_totals() {
        let draws = make_test_draws(30);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        assert_eq!((digest.parity.even + digest.parity.odd) as usize, 30 * MAIN_PICKS);
        assert_eq!((digest.parity.low + digest.parity.high) as usize, 30 * MAIN_PICKS);
    }

    #[test]
    fn test_strong_overdue() {
        let draws = vec![
            make_draw(3, [1, 2, 3, 4, 5, 6], 4),
            make_draw(2, [7, 8, 9, 10, 11, 12], 4),
            make_draw(1, [13, 14, 15, 16, 17, 18], 2),
        ];
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        let four = digest.strong.overdue.iter().find(|e| e.number == 4).unwrap();
        assert_eq!(four.distance, Some(0));
        let two = digest.strong.overdue.iter().find(|e| e.number == 2).unwrap();
        assert_eq!(two.distance, Some(2));
        let seven = digest.strong.overdue.iter().find(|e| e.number == 7).unwrap();
        assert_eq!(seven.distance, None);
    }

    #[test]
    fn test_reference_scenario() {
        // Trois tirages (du plus récent au plus ancien), pool de 15, fenêtre de 2.
        let draws = vec![
            make_draw(3, [1, 2, 3, 4, 5, 6], 1),
            make_draw(2, [1, 2, 7, 8, 9, 10], 2),
            make_draw(1, [1, 11, 12, 13, 14, 15], 3),
        ];
        let config = StatsConfig {
            max_number: 15,
            recent_window: 2,
            ..Default::default()
        };
        let digest = compute(&draws, &config).unwrap();

        assert_eq!(digest.total_draws, 3);
        assert_eq!(digest.window_size, 2);
        assert_eq!(digest.frequency_all[0], 3); // numéro 1
        assert_eq!(digest.frequency_all[1], 2); // numéro 2
        assert_eq!(digest.frequency_all[10], 1); // numéro 11
        assert_eq!(digest.frequency_recent[0], 2);

        let one = digest.overdue.iter().find(|e| e.number == 1).unwrap();
        assert_eq!(one.distance, Some(0));
        let eleven = digest.overdue.iter().find(|e| e.number == 11).unwrap();
        assert_eq!(eleven.distance, Some(2));

        let pair = digest
            .top_pairs
            .iter()
            .find(|p| p.a == 1 && p.b == 2)
            .unwrap();
        assert_eq!(pair.count, 2);

        // Le numéro 1 domine le classement hot.
        assert_eq!(digest.hot_all[0].number, 1);
        assert_eq!(digest.hot_all[0].count, 3);

        let expected = 3.0 * 6.0 / 15.0;
        assert!((digest.expected_per_number - expected).abs() < 1e-12);
        assert_eq!(digest.degrees_of_freedom, 14);
    }

    #[test]
    fn test_deterministic() {
        let draws = make_test_draws(30);
        let a = compute(&draws, &StatsConfig::default()).unwrap();
        let b = compute(&draws, &StatsConfig::default()).unwrap();
        assert_eq!(a.chi_square, b.chi_square);
        assert_eq!(a.frequency_all, b.frequency_all);
        assert_eq!(
            a.top_pairs.iter().map(|p| (p.a, p.b, p.count)).collect::<Vec<_>>(),
            b.top_pairs.iter().map(|p| (p.a, p.b, p.count)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_digest_serializes() {
        let draws = make_test_draws(10);
        let digest = compute(&draws, &StatsConfig::default()).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.contains("chi_square"));
        assert!(json.contains("overdue"));
    }
}
