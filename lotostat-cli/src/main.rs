mod display;
mod import;
mod report;
mod suggest;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use lotostat_db::db::{count_draws, db_path, fetch_last_draws, insert_draw, migrate, open_db};
use lotostat_db::models::{Draw, validate_draw};
use lotostat_stats::{compute, StatsConfig};

use crate::display::{
    display_digest, display_draws, display_grids, display_import_summary,
};
use crate::report::format_digest_message;
use crate::suggest::generate_grids;

#[derive(Parser)]
#[command(name = "lotostat", about = "Analyseur statistique du Loto (6/37 + numéro fort)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV (drawId,date,n1..n6,fort)
        #[arg(short, long, default_value = "data/lotto.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (fréquences, retards, paires, chi-deux)
    Stats {
        /// Nombre de tirages analysés
        #[arg(short, long, default_value = "1000")]
        last: u32,

        /// Taille de la fenêtre récente
        #[arg(short, long, default_value = "200")]
        window: usize,

        /// Nombre de paires affichées
        #[arg(short, long, default_value = "15")]
        pairs: usize,

        /// Désactiver le comptage des paires
        #[arg(long)]
        no_pairs: bool,
    },

    /// Produire le message de synthèse (texte ou JSON)
    Report {
        /// Nombre de tirages analysés
        #[arg(short, long, default_value = "1000")]
        last: u32,

        /// Taille de la fenêtre récente
        #[arg(short, long, default_value = "200")]
        window: usize,

        /// Émettre le digest complet en JSON plutôt qu'en texte
        #[arg(long)]
        json: bool,
    },

    /// Suggérer des grilles pondérées (chauds/froids/retards)
    Suggest {
        /// Nombre de grilles
        #[arg(short, long, default_value = "8")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Nombre de tirages analysés
        #[arg(short, long, default_value = "1000")]
        last: u32,

        /// Taille de la fenêtre récente
        #[arg(short, long, default_value = "200")]
        window: usize,
    },

    /// Ajouter un tirage manuellement
    Add,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { last, window, pairs, no_pairs } => {
            cmd_stats(&conn, last, window, pairs, no_pairs)
        }
        Command::Report { last, window, json } => cmd_report(&conn, last, window, json),
        Command::Suggest { count, seed, last, window } => {
            cmd_suggest(&conn, count, seed, last, window)
        }
        Command::Add => cmd_add(&conn),
    }
}

fn load_draws(conn: &lotostat_db::rusqlite::Connection, last: u32) -> Result<Vec<Draw>> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : lotostat import");
    }
    fetch_last_draws(conn, last)
}

fn cmd_import(conn: &lotostat_db::rusqlite::Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &lotostat_db::rusqlite::Connection, last: u32) -> Result<()> {
    let draws = load_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(
    conn: &lotostat_db::rusqlite::Connection,
    last: u32,
    window: usize,
    pairs: usize,
    no_pairs: bool,
) -> Result<()> {
    let draws = load_draws(conn, last)?;
    let config = StatsConfig {
        recent_window: window,
        top_pairs: pairs,
        include_pairs: !no_pairs,
        ..Default::default()
    };
    let digest = compute(&draws, &config)?;
    display_digest(&digest);
    Ok(())
}

fn cmd_report(
    conn: &lotostat_db::rusqlite::Connection,
    last: u32,
    window: usize,
    json: bool,
) -> Result<()> {
    let draws = load_draws(conn, last)?;
    let config = StatsConfig {
        recent_window: window,
        ..Default::default()
    };
    let digest = compute(&draws, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
    } else {
        println!("{}", format_digest_message(&digest, draws.first()));
    }
    Ok(())
}

fn cmd_suggest(
    conn: &lotostat_db::rusqlite::Connection,
    count: usize,
    seed: Option<u64>,
    last: u32,
    window: usize,
) -> Result<()> {
    let draws = load_draws(conn, last)?;
    let config = StatsConfig {
        recent_window: window,
        ..Default::default()
    };
    let digest = compute(&draws, &config)?;
    let grids = generate_grids(&digest, count, seed)?;
    display_grids(&grids);
    Ok(())
}

fn cmd_add(conn: &lotostat_db::rusqlite::Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_id: u32 = prompt("Identifiant du tirage (ex: 3742) : ")?
        .parse()
        .context("Identifiant invalide")?;
    let raw_date = prompt("Date (JJ/MM/AAAA) : ")?;

    let date_parts: Vec<&str> = raw_date.split('/').collect();
    if date_parts.len() != 3 {
        bail!("Format de date invalide");
    }
    let date = format!("{}-{}-{}", date_parts[2], date_parts[1], date_parts[0]);

    let main = prompt_main()?;
    let strong = prompt_strong()?;

    validate_draw(&main, strong)?;

    let draw = Draw { draw_id, date, main, strong };

    println!("\nTirage à insérer :");
    display_draws(&[draw.clone()]);

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_main() -> Result<[u8; 6]> {
    loop {
        let input = prompt("6 numéros (séparés par des espaces, 1-37) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 6 => {
                let arr = [v[0], v[1], v[2], v[3], v[4], v[5]];
                if validate_draw(&arr, 1).is_ok() {
                    return Ok(arr);
                }
                println!("Numéros invalides (1-37, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 6 numéros. Réessayez."),
        }
    }
}

fn prompt_strong() -> Result<u8> {
    loop {
        let input = prompt("Numéro fort (1-7) : ")?;
        match input.parse::<u8>() {
            Ok(s) if (1..=7).contains(&s) => return Ok(s),
            _ => println!("Numéro fort invalide (1-7). Réessayez."),
        }
    }
}
