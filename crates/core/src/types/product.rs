//! Product templates from the product worksheet.

use serde::{Deserialize, Serialize};

/// One row of the `produtos` worksheet.
///
/// Products are created by administrators and never updated or deleted.
/// Expiry records reference them by `nome` alone; nothing enforces that the
/// name still exists when a record is read back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Display name; the free-text key expiry records point at.
    pub nome: String,
    /// Photo URL shown next to the product.
    pub imagem_url: String,
    /// Shelf life in days, when known.
    pub tempo_vida_dias: Option<u32>,
    /// Free-text description.
    pub descricao: Option<String>,
}
