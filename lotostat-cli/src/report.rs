use std::fmt::Write;

use lotostat_db::models::Draw;
use lotostat_stats::digest::{NumberCount, OverdueEntry, StatsDigest};

use crate::display::fmt_distance;

/// Rend le digest sous forme de message texte, prêt à être remis à un
/// notifieur ou à un résumeur externe. L'envoi lui-même n'est pas du
/// ressort de cet outil.
pub fn format_digest_message(digest: &StatsDigest, latest: Option<&Draw>) -> String {
    let mut msg = String::new();

    let _ = writeln!(msg, "📊 Stats Loto (numéros principaux)");
    let _ = writeln!(msg, "• Tirages analysés : {}", digest.total_draws);
    let _ = writeln!(msg, "• Fenêtre récente : {}", digest.window_size);
    let _ = writeln!(
        msg,
        "• Attendu par numéro : {:.2} (σ = {:.2})",
        digest.expected_per_number, digest.std_dev_per_number
    );
    let _ = writeln!(
        msg,
        "• Chi-deux : {:.2} (ddl = {})",
        digest.chi_square, digest.degrees_of_freedom
    );

    if let Some(draw) = latest {
        let mut sorted = draw.main;
        sorted.sort();
        let _ = writeln!(
            msg,
            "• Dernier tirage (#{}, {}) : {} | fort : {}",
            draw.draw_id,
            draw.date,
            sorted.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", "),
            draw.strong
        );
    }

    let _ = writeln!(msg);
    let _ = writeln!(
        msg,
        "🔥 Chauds (historique) : {}",
        fmt_counts_with_z(digest, &digest.hot_all, 10)
    );
    let _ = writeln!(
        msg,
        "🧊 Froids (historique) : {}",
        fmt_counts_with_z(digest, &digest.cold_all, 10)
    );
    let _ = writeln!(
        msg,
        "⚡ Chauds ({} derniers) : {}",
        digest.window_size,
        fmt_counts(&digest.hot_recent, 10)
    );
    let _ = writeln!(
        msg,
        "❄️ Froids ({} derniers) : {}",
        digest.window_size,
        fmt_counts(&digest.cold_recent, 10)
    );
    let _ = writeln!(msg, "⏳ Retards : {}", fmt_overdue(&digest.overdue, 10));

    if !digest.top_pairs.is_empty() {
        let pairs = digest
            .top_pairs
            .iter()
            .map(|p| format!("{}-{} ({})", p.a, p.b, p.count))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(msg, "👥 Paires fréquentes : {}", pairs);
    }

    let _ = writeln!(msg);
    let _ = writeln!(
        msg,
        "💪 Fort — chauds : {} | froids : {}",
        fmt_counts(&digest.strong.hot, 3),
        fmt_counts(&digest.strong.cold, 3)
    );
    let _ = writeln!(
        msg,
        "⚖️ Pair/Impair : {}/{} — Bas/Haut : {}/{}",
        digest.parity.even, digest.parity.odd, digest.parity.low, digest.parity.high
    );

    let _ = writeln!(msg);
    let _ = write!(
        msg,
        "Le loto est aléatoire — analyse statistique à titre indicatif."
    );

    msg
}

fn fmt_counts(ranking: &[NumberCount], top: usize) -> String {
    ranking
        .iter()
        .take(top)
        .map(|e| format!("{} ({})", e.number, e.count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_counts_with_z(digest: &StatsDigest, ranking: &[NumberCount], top: usize) -> String {
    ranking
        .iter()
        .take(top)
        .map(|e| {
            let z = digest.z_scores[(e.number - 1) as usize];
            format!("{} ({}, z={:+.2})", e.number, e.count, z)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_overdue(overdue: &[OverdueEntry], top: usize) -> String {
    overdue
        .iter()
        .take(top)
        .map(|e| format!("{} (retard : {})", e.number, fmt_distance(e.distance)))
        .collect::<Vec<_>>()
        .join(", ")
}
