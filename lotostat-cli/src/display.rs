use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use crate::suggest::Grid;
use lotostat_db::models::Draw;
use lotostat_stats::digest::{NumberCount, OverdueEntry, StatsDigest};

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros", "Fort"]);

    for draw in draws {
        let mut sorted_main = draw.main;
        sorted_main.sort();

        let main_str = sorted_main
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        table.add_row(vec![
            &draw.draw_id.to_string(),
            &draw.date,
            &main_str,
            &draw.strong.to_string(),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_digest(digest: &StatsDigest) {
    println!(
        "\n📊 Statistiques sur {} tirages (fenêtre récente : {})\n",
        digest.total_draws, digest.window_size
    );
    println!(
        "Attendu par numéro : {:.2} (σ = {:.2}) — Chi-deux : {:.2} (ddl = {})",
        digest.expected_per_number,
        digest.std_dev_per_number,
        digest.chi_square,
        digest.degrees_of_freedom
    );
    println!(
        "Pair/Impair : {}/{} — Bas/Haut : {}/{}",
        digest.parity.even, digest.parity.odd, digest.parity.low, digest.parity.high
    );

    println!("\n── Numéros principaux (1-{}) ──", digest.frequency_all.len());
    display_number_table(digest);

    println!("\n── Retards ──");
    display_overdue_table(&digest.overdue, 10);

    if !digest.top_pairs.is_empty() {
        println!("\n── Paires fréquentes ──");
        display_pairs_table(digest);
    }

    println!("\n── Numéro fort (1-{}) ──", digest.strong.frequency.len());
    println!(
        "Attendu par numéro : {:.2} — Chi-deux : {:.2} (ddl = {})",
        digest.strong.expected_per_number,
        digest.strong.chi_square,
        digest.strong.degrees_of_freedom
    );
    display_ranking_table(&digest.strong.hot, &digest.strong.overdue);
}

fn display_number_table(digest: &StatsDigest) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Total", "Fenêtre", "Z-score", "Retard"]);

    let size = digest.frequency_all.len();
    let mut distances: Vec<Option<u32>> = vec![None; size];
    for entry in &digest.overdue {
        distances[(entry.number - 1) as usize] = entry.distance;
    }

    // Les dix premiers en vert, les dix derniers en rouge.
    for (rank, entry) in digest.hot_all.iter().enumerate() {
        let idx = (entry.number - 1) as usize;
        let color = if rank < 10 {
            Color::Green
        } else if rank >= size.saturating_sub(10) {
            Color::Red
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", entry.number)).fg(color),
            Cell::new(entry.count.to_string()),
            Cell::new(digest.frequency_recent[idx].to_string()),
            Cell::new(format!("{:+.2}", digest.z_scores[idx])),
            Cell::new(fmt_distance(distances[idx])),
        ]);
    }
    println!("{table}");
}

fn display_overdue_table(overdue: &[OverdueEntry], top: usize) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Retard"]);

    for entry in overdue.iter().take(top) {
        table.add_row(vec![
            &format!("{:2}", entry.number),
            &fmt_distance(entry.distance),
        ]);
    }
    println!("{table}");
}

fn display_pairs_table(digest: &StatsDigest) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Paire", "Occurrences"]);

    for pair in &digest.top_pairs {
        table.add_row(vec![
            &format!("{:2} - {:2}", pair.a, pair.b),
            &pair.count.to_string(),
        ]);
    }
    println!("{table}");
}

fn display_ranking_table(ranking: &[NumberCount], overdue: &[OverdueEntry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Occurrences", "Retard"]);

    for entry in ranking {
        let distance = overdue
            .iter()
            .find(|e| e.number == entry.number)
            .and_then(|e| e.distance);
        table.add_row(vec![
            &format!("{:2}", entry.number),
            &entry.count.to_string(),
            &fmt_distance(distance),
        ]);
    }
    println!("{table}");
}

pub fn display_grids(grids: &[Grid]) {
    println!("\n🎲 Grilles suggérées\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros", "Fort"]);

    for (i, grid) in grids.iter().enumerate() {
        let main_str = grid.main
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        table.add_row(vec![
            &format!("{}", i + 1),
            &main_str,
            &grid.strong.to_string(),
        ]);
    }
    println!("{table}");
    println!("\nLe loto est aléatoire — ces grilles n'ont aucune valeur prédictive.");
}

pub fn fmt_distance(distance: Option<u32>) -> String {
    match distance {
        Some(d) => d.to_string(),
        None => "jamais vu".to_string(),
    }
}
