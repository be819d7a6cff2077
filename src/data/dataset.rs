//! Read-only access to the local TibiaWiki SQLite dataset (`tibiawiki.db`).
//!
//! Tables used: `outfit(article_id, title, name)`,
//! `npc(article_id, title, name, city, x, y, z)`,
//! `item(article_id, title, name, actual_name, client_id)` and the offer tables
//! `npc_offer_sell` / `npc_offer_buy` `(npc_id, item_id, value)`.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use thiserror::Error;
use tracing::warn;

use super::canonical::CatalogueOutfit;

pub const DEFAULT_DATASET_PATH: &str = "tibiawiki.db";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    Missing(String),
    #[error("dataset query failed: {0}")]
    Sql(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcRecord {
    pub article_id: i64,
    pub title: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub z: Option<i64>,
}

impl NpcRecord {
    /// Name shown in game; the article title when the infobox has no name.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub article_id: i64,
    pub title: String,
    pub name: Option<String>,
    pub actual_name: Option<String>,
    pub client_id: Option<i64>,
}

/// One trade offer of an NPC. `item_title` comes from the item article when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcOffer {
    pub item_id: i64,
    pub item_title: String,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferKind {
    /// The NPC sells, the player buys.
    Sell,
    /// The NPC buys, the player sells.
    Buy,
}

impl OfferKind {
    fn table(self) -> &'static str {
        match self {
            Self::Sell => "npc_offer_sell",
            Self::Buy => "npc_offer_buy",
        }
    }
}

pub struct Dataset {
    conn: Connection,
}

impl Dataset {
    /// Open an existing dataset read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::Missing(path.display().to_string()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Like [Dataset::open], but a missing file is `Ok(None)`.
    pub fn open_optional(path: impl AsRef<Path>) -> Result<Option<Self>, DatasetError> {
        match Self::open(path) {
            Ok(dataset) => Ok(Some(dataset)),
            Err(DatasetError::Missing(path)) => {
                warn!(path = %path, "local dataset not found; treating it as empty");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Outfit catalogue in article order. Rows whose id does not fit a `u32` are skipped.
    pub fn outfits(&self) -> Result<Vec<CatalogueOutfit>, DatasetError> {
        let mut stmt = self
            .conn
            .prepare("SELECT article_id, title, name FROM outfit ORDER BY article_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut outfits = Vec::new();
        for row in rows {
            let (article_id, title, name) = row?;
            let Ok(catalogue_id) = u32::try_from(article_id) else {
                warn!(article_id, title = %title, "outfit id out of range; skipping");
                continue;
            };
            outfits.push(CatalogueOutfit {
                catalogue_id,
                name: name.unwrap_or_else(|| title.clone()),
                title,
            });
        }
        Ok(outfits)
    }

    pub fn npc_ids(&self) -> Result<Vec<i64>, DatasetError> {
        let mut stmt = self
            .conn
            .prepare("SELECT article_id FROM npc ORDER BY article_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    pub fn npc(&self, article_id: i64) -> Result<Option<NpcRecord>, DatasetError> {
        let npc = self
            .conn
            .query_row(
                "SELECT article_id, title, name, city, x, y, z FROM npc WHERE article_id = ?1",
                params![article_id],
                |row| {
                    Ok(NpcRecord {
                        article_id: row.get(0)?,
                        title: row.get(1)?,
                        name: row.get(2)?,
                        city: row.get(3)?,
                        x: row.get(4)?,
                        y: row.get(5)?,
                        z: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(npc)
    }

    pub fn item(&self, article_id: i64) -> Result<Option<ItemRecord>, DatasetError> {
        let item = self
            .conn
            .query_row(
                "SELECT article_id, title, name, actual_name, client_id FROM item WHERE article_id = ?1",
                params![article_id],
                |row| {
                    Ok(ItemRecord {
                        article_id: row.get(0)?,
                        title: row.get(1)?,
                        name: row.get(2)?,
                        actual_name: row.get(3)?,
                        client_id: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(item)
    }

    /// Offers of one NPC in the order they are stored.
    pub fn offers(&self, npc_id: i64, kind: OfferKind) -> Result<Vec<NpcOffer>, DatasetError> {
        let sql = format!(
            "SELECT o.item_id, COALESCE(i.title, ''), o.value FROM {} o \
             LEFT JOIN item i ON i.article_id = o.item_id \
             WHERE o.npc_id = ?1 ORDER BY o.rowid",
            kind.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let offers = stmt
            .query_map(params![npc_id], |row| {
                Ok(NpcOffer {
                    item_id: row.get(0)?,
                    item_title: row.get(1)?,
                    value: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(offers)
    }
}
