use crate::error::StatsError;

/// Nombre de numéros principaux par tirage.
pub const MAIN_PICKS: usize = 6;

#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Borne haute du pool principal (numéros 1..=max_number).
    pub max_number: u8,
    /// Borne haute du pool fort (1..=strong_max).
    pub strong_max: u8,
    /// Taille de la fenêtre "récente", bornée à [1, nombre de tirages] au calcul.
    pub recent_window: usize,
    /// Nombre de paires conservées dans le classement.
    pub top_pairs: usize,
    pub include_pairs: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_number: 37,
            strong_max: 7,
            recent_window: 200,
            top_pairs: 15,
            include_pairs: true,
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), StatsError> {
        if (self.max_number as usize) < MAIN_PICKS {
            return Err(StatsError::Configuration(format!(
                "max_number = {} : il faut au moins {} numéros dans le pool principal",
                self.max_number, MAIN_PICKS
            )));
        }
        if self.strong_max == 0 {
            return Err(StatsError::Configuration(
                "strong_max doit être au moins 1".to_string(),
            ));
        }
        if self.recent_window == 0 {
            return Err(StatsError::Configuration(
                "recent_window doit être au moins 1".to_string(),
            ));
        }
        Ok(())
    }
}
