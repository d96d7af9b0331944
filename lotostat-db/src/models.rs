use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_id: u32,
    pub date: String,
    pub main: [u8; 6],
    pub strong: u8,
}

pub fn validate_draw(main: &[u8; 6], strong: u8) -> Result<()> {
    for &n in main {
        if n < 1 || n > 37 {
            bail!("Numéro {} hors limites (1-37)", n);
        }
    }
    if strong < 1 || strong > 7 {
        bail!("Numéro fort {} hors limites (1-7)", strong);
    }
    for i in 0..main.len() {
        for j in (i + 1)..main.len() {
            if main[i] == main[j] {
                bail!("Numéro en double : {}", main[i]);
            }
        }
    }
    Ok(())
}
