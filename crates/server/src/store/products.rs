//! Product adapter for the `produtos` worksheet.

use std::sync::Arc;

use validade_core::Product;

use super::{PRODUCT_CACHE_KEY, Store, StoreError, Table};

/// Worksheet holding product templates.
pub const PRODUCTS_WORKSHEET: &str = "produtos";

const COL_NOME: &str = "nome";
const COL_IMAGEM_URL: &str = "imagem_url";
const COL_TEMPO_VIDA: &str = "tempo_vida_dias";
const COL_DESCRICAO: &str = "descricao";

const REQUIRED_COLUMNS: &[&str] = &[COL_NOME, COL_IMAGEM_URL, COL_TEMPO_VIDA, COL_DESCRICAO];

/// Adapter for product listings and creation.
pub struct ProductCatalog<'a> {
    store: &'a Store,
}

impl<'a> ProductCatalog<'a> {
    pub(crate) const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List all products, newest last.
    ///
    /// Results are cached briefly; every product-creating path invalidates
    /// the cache, so only out-of-band spreadsheet edits are seen late.
    ///
    /// # Errors
    ///
    /// Store failures as usual; a non-numeric shelf-life cell is
    /// `StoreError::Data`.
    pub async fn list(&self) -> Result<Arc<Vec<Product>>, StoreError> {
        if let Some(cached) = self.store.product_cache().get(PRODUCT_CACHE_KEY).await {
            return Ok(cached);
        }

        let table = self.store.read_table(PRODUCTS_WORKSHEET).await?;
        table.require_columns(REQUIRED_COLUMNS)?;

        let mut products = Vec::new();
        for row in table.rows() {
            let nome = table.cell(row, COL_NOME)?.trim();
            // Blank lines happen in hand-edited spreadsheets.
            if nome.is_empty() {
                continue;
            }
            products.push(parse_product(&table, row, nome)?);
        }

        let products = Arc::new(products);
        self.store
            .product_cache()
            .insert(PRODUCT_CACHE_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// Append a product row.
    ///
    /// # Errors
    ///
    /// Store failures as usual.
    pub async fn add(&self, product: &Product) -> Result<(), StoreError> {
        let _guard = self.store.lock_writes().await;

        let mut table = self.store.read_table(PRODUCTS_WORKSHEET).await?;
        table.require_columns(REQUIRED_COLUMNS)?;

        table.push_row(&[
            (COL_NOME, product.nome.trim().to_string()),
            (COL_IMAGEM_URL, product.imagem_url.clone()),
            (
                COL_TEMPO_VIDA,
                product
                    .tempo_vida_dias
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ),
            (COL_DESCRICAO, product.descricao.clone().unwrap_or_default()),
        ])?;

        self.store.write_table(&table).await?;
        self.store.product_cache().invalidate(PRODUCT_CACHE_KEY).await;
        Ok(())
    }
}

fn parse_product(table: &Table, row: &[String], nome: &str) -> Result<Product, StoreError> {
    let tempo_cell = table.cell(row, COL_TEMPO_VIDA)?.trim();
    let tempo_vida_dias = if tempo_cell.is_empty() {
        None
    } else {
        Some(tempo_cell.parse::<u32>().map_err(|_| StoreError::Data {
            worksheet: PRODUCTS_WORKSHEET,
            detail: format!("invalid shelf life {tempo_cell:?} for product {nome:?}"),
        })?)
    };

    let descricao_cell = table.cell(row, COL_DESCRICAO)?.trim();
    let descricao = if descricao_cell.is_empty() {
        None
    } else {
        Some(descricao_cell.to_string())
    };

    Ok(Product {
        nome: nome.to_string(),
        imagem_url: table.cell(row, COL_IMAGEM_URL)?.trim().to_string(),
        tempo_vida_dias,
        descricao,
    })
}
