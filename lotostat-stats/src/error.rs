use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// Historique vide ou tirage violant les invariants (doublon, hors limites).
    #[error("entrée invalide : {0}")]
    InvalidInput(String),

    /// Paramètres hors des bornes acceptables.
    #[error("configuration invalide : {0}")]
    Configuration(String),
}
