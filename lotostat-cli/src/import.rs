use anyhow::{Context, Result, bail};
use lotostat_db::rusqlite::Connection;
use std::path::Path;

use lotostat_db::db::insert_draw;
use lotostat_db::models::{validate_draw, Draw};

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    if record.len() < 9 {
        bail!("Ligne trop courte ({} champs, 9 attendus)", record.len());
    }

    let raw_id = get(0)?;
    let draw_id: u32 = raw_id
        .parse()
        .with_context(|| format!("Identifiant de tirage invalide : '{}'", raw_id))?;
    let date = get(1)?;

    // Colonnes 2..8 = numéros principaux, 8 = numéro fort.
    // Les colonnes excédentaires en fin de ligne sont ignorées.
    let main: [u8; 6] = [
        get_u8(2)?,
        get_u8(3)?,
        get_u8(4)?,
        get_u8(5)?,
        get_u8(6)?,
        get_u8(7)?,
    ];
    let strong = get_u8(8)?;

    validate_draw(&main, strong)?;

    Ok(Draw { draw_id, date, main, strong })
}

fn looks_like_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .map(|s| s.trim().parse::<u32>().is_err())
        .unwrap_or(true)
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for (line, record_result) in reader.records().enumerate() {
        match record_result {
            Ok(record) => {
                // Fichier avec ou sans en-tête : on saute la première ligne
                // si sa première cellule n'est pas numérique.
                if line == 0 && looks_like_header(&record) {
                    continue;
                }
                result.total_records += 1;
                match parse_record(&record) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                eprintln!("Erreur insertion tirage {}: {}", draw.draw_id, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("Erreur parsing ligne {}: {}", line + 1, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                result.total_records += 1;
                eprintln!("Erreur lecture ligne {}: {}", line + 1, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
