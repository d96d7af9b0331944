use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NumberCount {
    pub number: u8,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverdueEntry {
    pub number: u8,
    /// Tirages écoulés depuis la dernière apparition (0 = présent au dernier tirage).
    /// None = jamais apparu sur l'historique fourni.
    pub distance: Option<u32>,
}

/// Paire non ordonnée de numéros principaux, stockée avec a < b.
#[derive(Debug, Clone, Serialize)]
pub struct PairCount {
    pub a: u8,
    pub b: u8,
    pub count: u32,
}

/// Répartition pair/impair et bas/haut sur l'ensemble des numéros tirés.
/// "Bas" = numéro <= max_number / 2.
#[derive(Debug, Clone, Serialize)]
pub struct ParityBalance {
    pub even: u32,
    pub odd: u32,
    pub low: u32,
    pub high: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrongDigest {
    /// Occurrences par numéro fort, indexées par numéro - 1.
    pub frequency: Vec<u32>,
    pub expected_per_number: f64,
    pub chi_square: f64,
    pub degrees_of_freedom: u32,
    pub hot: Vec<NumberCount>,
    pub cold: Vec<NumberCount>,
    pub overdue: Vec<OverdueEntry>,
}

/// Résultat complet du moteur de statistiques. Construit en un seul passage,
/// jamais modifié ensuite. Les vecteurs par numéro sont indexés par numéro - 1.
#[derive(Debug, Clone, Serialize)]
pub struct StatsDigest {
    pub total_draws: usize,
    /// Taille effective de la fenêtre récente (après bornage).
    pub window_size: usize,

    pub frequency_all: Vec<u32>,
    pub frequency_recent: Vec<u32>,

    /// Espérance du compte d'occurrences sous un modèle de tirage uniforme
    /// indépendant (approximation binomiale, pas de tirage sans remise).
    pub expected_per_number: f64,
    pub std_dev_per_number: f64,
    pub z_scores: Vec<f64>,

    /// Score d'écart, pas une p-value.
    pub chi_square: f64,
    pub degrees_of_freedom: u32,

    /// Classements complets : hot = compte décroissant, cold = croissant,
    /// égalités départagées par numéro croissant.
    pub hot_all: Vec<NumberCount>,
    pub cold_all: Vec<NumberCount>,
    pub hot_recent: Vec<NumberCount>,
    pub cold_recent: Vec<NumberCount>,

    /// Jamais vus d'abord, puis distance décroissante.
    pub overdue: Vec<OverdueEntry>,

    /// Vide si include_pairs = false.
    pub top_pairs: Vec<PairCount>,

    pub parity: ParityBalance,
    pub strong: StrongDigest,
}
