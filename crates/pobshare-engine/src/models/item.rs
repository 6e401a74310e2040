use serde::{Deserialize, Serialize};

/// Item rarity, case-normalized from the `Rarity:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Rarity {
    #[default]
    Normal,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    /// Normalizes the token after `Rarity:`. Unknown tokens fall back to
    /// `Normal` rather than failing the item.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_uppercase().as_str() {
            "MAGIC" => Rarity::Magic,
            "RARE" => Rarity::Rare,
            "UNIQUE" => Rarity::Unique,
            _ => Rarity::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Normal => "NORMAL",
            Rarity::Magic => "MAGIC",
            Rarity::Rare => "RARE",
            Rarity::Unique => "UNIQUE",
        }
    }
}

/// One equipped item, parsed from its embedded text block.
///
/// Crafted and fractured explicit mods carry a leading `(crafted)` /
/// `(fractured)` marker in the mod string itself, which is what the
/// display layers downstream expect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    /// Equipment slot this item occupies (e.g. "Helmet", "Ring 1").
    pub slot: String,
    pub rarity: Rarity,
    /// Display name; for unique items the unique name, otherwise the
    /// generated name.
    pub name: String,
    /// Base type line, empty when the block only carries a name.
    pub base_type: String,
    pub item_level: Option<u32>,
    /// Quality percentage without the `+`/`%` decoration.
    pub quality: Option<u32>,
    /// Socket-group string as written, e.g. "B-B-R G".
    pub sockets: Option<String>,
    pub implicit_mods: Vec<String>,
    pub explicit_mods: Vec<String>,
}
