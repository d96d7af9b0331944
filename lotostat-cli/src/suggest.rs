use anyhow::Result;
use rand::Rng;
use rand::SeedableRng;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use lotostat_stats::digest::{NumberCount, StatsDigest};

#[derive(Debug, Clone)]
pub struct Grid {
    pub main: [u8; 6],
    pub strong: u8,
}

/// Plan de composition d'une grille : 2 chauds, 2 intermédiaires,
/// 1 froid, 1 choisi surtout pour son retard.
const PLAN: [Slot; 6] = [Slot::Hot, Slot::Hot, Slot::Mid, Slot::Mid, Slot::Cold, Slot::Due];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Hot,
    Mid,
    Cold,
    Due,
}

/// Compose des grilles pondérées à partir du digest. Couche purement
/// récréative au-dessus des statistiques : le moteur lui-même reste
/// déterministe, seule cette étape consomme de l'aléa (reproductible
/// via seed).
pub fn generate_grids(
    digest: &StatsDigest,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<Grid>> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let size = digest.frequency_all.len();
    let mut distances: Vec<Option<u32>> = vec![None; size];
    for entry in &digest.overdue {
        distances[(entry.number - 1) as usize] = entry.distance;
    }

    let bucket = size.min(12);
    let hot = &digest.hot_all[..bucket];
    let cold = &digest.hot_all[size - bucket..];
    let mid = if size > 2 * bucket {
        &digest.hot_all[bucket..size - bucket]
    } else {
        &digest.hot_all[..]
    };

    let mut grids = Vec::with_capacity(count);
    for _ in 0..count {
        let main = pick_main(digest, hot, mid, cold, &distances, &mut rng)?;
        let strong = pick_strong(digest, &mut rng)?;
        grids.push(Grid { main, strong });
    }

    Ok(grids)
}

fn pick_main(
    digest: &StatsDigest,
    hot: &[NumberCount],
    mid: &[NumberCount],
    cold: &[NumberCount],
    distances: &[Option<u32>],
    rng: &mut StdRng,
) -> Result<[u8; 6]> {
    let mut chosen: Vec<u8> = Vec::with_capacity(6);

    for &slot in &PLAN {
        let pool: &[NumberCount] = match slot {
            Slot::Hot => hot,
            Slot::Mid => mid,
            Slot::Cold => cold,
            Slot::Due => &digest.hot_all,
        };

        let mut candidates: Vec<(u8, f64)> = pool
            .iter()
            .filter(|e| !chosen.contains(&e.number))
            .map(|e| (e.number, slot_weight(slot, e.count, distances[(e.number - 1) as usize])))
            .collect();

        // Pool épuisé (petits pools de test) : repli sur le classement complet.
        if candidates.is_empty() {
            candidates = digest
                .hot_all
                .iter()
                .filter(|e| !chosen.contains(&e.number))
                .map(|e| (e.number, 1.0))
                .collect();
        }

        let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights)?;
        let idx = dist.sample(rng);
        chosen.push(candidates[idx].0);
    }

    chosen.sort();

    // Grille trop concentrée sur une même dizaine : on remplace le numéro
    // central par un intermédiaire inutilisé.
    let max_same_decade = (0u8..=3)
        .map(|d| chosen.iter().filter(|&&n| (n - 1) / 10 == d).count())
        .max()
        .unwrap_or(0);
    if max_same_decade >= 4 {
        let replacements: Vec<u8> = mid
            .iter()
            .map(|e| e.number)
            .filter(|n| !chosen.contains(n))
            .collect();
        if !replacements.is_empty() {
            chosen[2] = replacements[rng.random_range(0..replacements.len())];
            chosen.sort();
        }
    }

    let mut main = [0u8; 6];
    main.copy_from_slice(&chosen);
    Ok(main)
}

fn pick_strong(digest: &StatsDigest, rng: &mut StdRng) -> Result<u8> {
    let ranking = &digest.strong.hot;
    let size = ranking.len();
    let bucket = size.min(3);

    let roll: f64 = rng.random();
    let pool: &[NumberCount] = if roll < 0.4 {
        &ranking[..bucket]
    } else if roll < 0.7 && size > 2 * bucket {
        &ranking[bucket..size - bucket]
    } else {
        &ranking[size - bucket..]
    };

    let candidates: Vec<(u8, f64)> = pool
        .iter()
        .map(|e| {
            let distance = digest
                .strong
                .overdue
                .iter()
                .find(|o| o.number == e.number)
                .and_then(|o| o.distance);
            (e.number, (1.0 + e.count as f64 / 200.0) * strong_due_score(distance))
        })
        .collect();

    let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
    let dist = WeightedIndex::new(&weights)?;
    Ok(candidates[dist.sample(rng)].0)
}

fn slot_weight(slot: Slot, count: u32, distance: Option<u32>) -> f64 {
    let base = match slot {
        Slot::Hot => 1.6,
        Slot::Mid => 1.2,
        Slot::Cold | Slot::Due => 1.0,
    };
    let freq_boost = match slot {
        Slot::Hot => 1.0 + count as f64 / 50.0,
        Slot::Mid => 1.0 + count as f64 / 80.0,
        Slot::Cold | Slot::Due => 1.0,
    };
    base * freq_boost * main_due_score(distance)
}

fn main_due_score(distance: Option<u32>) -> f64 {
    match distance {
        None => 3.0,
        Some(d) if d >= 200 => 2.5,
        Some(d) if d >= 100 => 2.0,
        Some(d) if d >= 50 => 1.5,
        Some(_) => 1.0,
    }
}

fn strong_due_score(distance: Option<u32>) -> f64 {
    match distance {
        None => 3.0,
        Some(d) if d >= 120 => 2.0,
        Some(d) if d >= 60 => 1.5,
        Some(_) => 1.0,
    }
}
