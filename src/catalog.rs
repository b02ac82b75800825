use std::fs;
use std::path::Path;
use std::str::FromStr;

use bitcoin::Txid;

use crate::error::{Context, LibraryError, Result};
use crate::types::FileType;

/// A file embedded in the chain, along with the parameters needed to extract it
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CatalogItem {
    pub title: String,
    pub authors: Vec<String>,
    pub txid: Txid,
    #[serde(default, alias = "gzipped")]
    pub compressed: bool,
    #[serde(default)]
    pub hex_left_trim: usize,
    pub file_type: FileType,
}

impl CatalogItem {
    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.title.trim().is_empty(),
            LibraryError::InvalidCatalog(format!("item in tx {} has no title", self.txid))
        );
        ensure!(
            self.authors.iter().any(|a| !a.trim().is_empty()),
            LibraryError::InvalidCatalog(format!("\"{}\" has no authors", self.title))
        );
        Ok(())
    }
}

lazy_static! {
    static ref BOOKS: Vec<CatalogItem> = vec![CatalogItem {
        title: "Alice's Adventures in Wonderland".into(),
        authors: vec!["Lewis Carroll".into()],
        txid: Txid::from_str("3154d03bcc1f8fbfd89f2c3672567791187c95ba97d55ca05eca2ab4f40c3430")
            .unwrap(),
        compressed: false,
        hex_left_trim: 9,
        file_type: FileType::Txt,
    }];
}

/// The ordered list of known items. Loaded once at startup and never modified.
#[derive(Clone, Debug)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Result<Self> {
        for item in &items {
            item.validate()?;
        }
        Ok(Catalog { items })
    }

    /// The catalog shipped with the library
    pub fn builtin() -> Self {
        Catalog {
            items: BOOKS.clone(),
        }
    }

    /// Load a catalog from a json array of items
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed reading catalog {:?}", path))?;
        Self::from_json(&contents).with_context(|| format!("failed loading catalog {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)
            .map_err(|e| LibraryError::InvalidCatalog(e.to_string()))?;
        Self::new(items)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn find_txid(&self, txid: &Txid) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.txid == *txid)
    }

    /// Look up an item by its index in the catalog or by its full txid
    pub fn select(&self, key: &str) -> Result<&CatalogItem> {
        let item = if let Ok(index) = key.parse::<usize>() {
            self.get(index)
        } else if let Ok(txid) = Txid::from_str(key) {
            self.find_txid(&txid)
        } else {
            None
        };
        Ok(item.ok_or_else(|| LibraryError::UnknownItem(key.to_string()))?)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
