//! Static storefront data: catalog, sale policy, credentials and addresses.
//!
//! The bundled YAML files under `data/` are compiled into the library. Each
//! can be replaced at runtime through [`FixturePaths`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::catalog::{Catalog, CatalogError, Product, SalePolicy};
use crate::config::FixturePaths;
use crate::models::Address;
use crate::services::auth::CredentialTable;

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.yaml");
const BUNDLED_CREDENTIALS: &str = include_str!("../data/credentials.yaml");
const BUNDLED_ADDRESSES: &str = include_str!("../data/addresses.yaml");

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A fixture file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixture is not valid YAML for its schema.
    #[error("invalid {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    /// The catalog breaks a catalog invariant.
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sale: SalePolicy,
    products: Vec<Product>,
}

/// Everything the storefront treats as read-only input.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub catalog: Catalog,
    pub sale: SalePolicy,
    pub credentials: CredentialTable,
    pub addresses: Vec<Address>,
}

impl Fixtures {
    /// The fixtures compiled into the library.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if a bundled file is malformed.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::load(&FixturePaths::default())
    }

    /// Bundled fixtures, with any file named in `paths` read from disk
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if a file cannot be read or does not parse, or
    /// if the catalog has duplicate ids or negative prices.
    pub fn load(paths: &FixturePaths) -> Result<Self, FixtureError> {
        let catalog_file: CatalogFile =
            parse("catalog", paths.catalog.as_deref(), BUNDLED_CATALOG)?;
        let credentials: CredentialTable =
            parse("credentials", paths.credentials.as_deref(), BUNDLED_CREDENTIALS)?;
        let addresses: Vec<Address> =
            parse("addresses", paths.addresses.as_deref(), BUNDLED_ADDRESSES)?;

        let catalog = Catalog::new(catalog_file.products)?;
        info!(
            products = catalog.len(),
            on_sale = catalog_file.sale.product_ids.len(),
            accounts = credentials.accounts().len(),
            addresses = addresses.len(),
            "Fixtures loaded"
        );

        Ok(Self {
            catalog,
            sale: catalog_file.sale,
            credentials,
            addresses,
        })
    }
}

fn parse<T: DeserializeOwned>(
    what: &'static str,
    path: Option<&Path>,
    bundled: &str,
) -> Result<T, FixtureError> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?,
        None => bundled.to_owned(),
    };
    serde_yaml::from_str(&text).map_err(|source| FixtureError::Parse { what, source })
}
