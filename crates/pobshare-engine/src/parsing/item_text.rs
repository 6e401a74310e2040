use regex::Regex;

use crate::models::{Item, Rarity};

/// What a recognized metadata line means to the parser.
///
/// The table below is ordered: classification walks it top to bottom and
/// the first matching prefix wins, so new entries are reviewable in one
/// place instead of being string checks spread through control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaKind {
    Rarity,
    ItemLevel,
    Quality,
    Sockets,
    /// `LevelReq:` is recognized so it never leaks into the mod list, but
    /// the value is not part of the consumed model.
    RequiredLevel,
    ImplicitCount,
    /// Known boolean/identity lines (corruption, mirroring, influence
    /// marks) that are recognized and dropped.
    Skip,
}

const META_PREFIXES: &[(&str, MetaKind)] = &[
    ("Rarity:", MetaKind::Rarity),
    ("Unique ID:", MetaKind::Skip),
    ("Item Level:", MetaKind::ItemLevel),
    ("Quality:", MetaKind::Quality),
    ("Sockets:", MetaKind::Sockets),
    ("LevelReq:", MetaKind::RequiredLevel),
    ("Implicits:", MetaKind::ImplicitCount),
    ("Armour:", MetaKind::Skip),
    ("Evasion:", MetaKind::Skip),
    ("Energy Shield:", MetaKind::Skip),
    ("Corrupted", MetaKind::Skip),
    ("Mirrored", MetaKind::Skip),
    ("Shaper Item", MetaKind::Skip),
    ("Elder Item", MetaKind::Skip),
    ("Crusader Item", MetaKind::Skip),
    ("Hunter Item", MetaKind::Skip),
    ("Redeemer Item", MetaKind::Skip),
    ("Warlord Item", MetaKind::Skip),
    ("Synthesised Item", MetaKind::Skip),
];

/// Which side of the implicit/explicit split the parser is on.
///
/// `Implicits: N` arms the counter; every non-metadata line consumes one
/// until it runs out, after which everything is an explicit mod. Keeping
/// the transition explicit makes it testable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModPhase {
    ConsumingImplicits { remaining: u32 },
    ConsumingExplicits,
}

impl ModPhase {
    fn armed(count: u32) -> Self {
        if count == 0 {
            ModPhase::ConsumingExplicits
        } else {
            ModPhase::ConsumingImplicits { remaining: count }
        }
    }

    fn consume(self) -> Self {
        match self {
            ModPhase::ConsumingImplicits { remaining } => Self::armed(remaining - 1),
            ModPhase::ConsumingExplicits => ModPhase::ConsumingExplicits,
        }
    }
}

/// Parses one item's embedded text block.
///
/// The format is positional: line 0 carries the rarity, line 1 the name,
/// line 2 the base type. Everything after that is either a metadata line
/// from the prefix table or a mod line.
#[derive(Debug)]
pub struct ItemTextParser {
    first_int: Regex,
    tag: Regex,
}

impl Default for ItemTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemTextParser {
    pub fn new() -> Self {
        Self {
            first_int: Regex::new(r"\d+").expect("Invalid integer regex"),
            tag: Regex::new(r"\{[^}]*\}").expect("Invalid tag regex"),
        }
    }

    /// Parses an item block, or `None` for the placeholder shape (fewer
    /// than two non-empty lines). Placeholders are routine in real
    /// documents and are not an error.
    pub fn parse(&self, text: &str) -> Option<Item> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() < 2 {
            return None;
        }

        let mut item = Item {
            rarity: lines[0]
                .strip_prefix("Rarity:")
                .map(Rarity::from_token)
                .unwrap_or_default(),
            name: lines[1].to_string(),
            base_type: lines.get(2).copied().unwrap_or_default().to_string(),
            ..Item::default()
        };

        let mut phase = ModPhase::ConsumingExplicits;
        for line in lines.iter().skip(3) {
            match classify(line) {
                Some(MetaKind::ItemLevel) => item.item_level = self.extract_int(line),
                Some(MetaKind::Quality) => item.quality = self.extract_int(line),
                Some(MetaKind::Sockets) => {
                    item.sockets = line
                        .strip_prefix("Sockets:")
                        .map(|s| s.trim().to_string());
                }
                Some(MetaKind::ImplicitCount) => {
                    phase = ModPhase::armed(self.extract_int(line).unwrap_or(0));
                }
                Some(MetaKind::Rarity | MetaKind::RequiredLevel | MetaKind::Skip) => {}
                None => {
                    match phase {
                        ModPhase::ConsumingImplicits { .. } => {
                            item.implicit_mods.push(self.strip_tags(line));
                        }
                        ModPhase::ConsumingExplicits => {
                            item.explicit_mods.push(self.explicit_mod(line));
                        }
                    }
                    phase = phase.consume();
                }
            }
        }

        Some(item)
    }

    /// First integer anywhere in the line; the source varies between
    /// shapes like "Quality: +20%" and "Quality: 20".
    fn extract_int(&self, line: &str) -> Option<u32> {
        self.first_int.find(line)?.as_str().parse().ok()
    }

    /// Drops `{tag}` annotations that carry no display meaning.
    fn strip_tags(&self, line: &str) -> String {
        self.tag.replace_all(line, "").trim().to_string()
    }

    /// Explicit mods keep the crafted/fractured distinction as a leading
    /// text marker; every other tag is dropped like on implicits.
    fn explicit_mod(&self, line: &str) -> String {
        let marker = if line.contains("{crafted}") {
            Some("(crafted)")
        } else if line.contains("{fractured}") {
            Some("(fractured)")
        } else {
            None
        };
        let text = self.strip_tags(line);
        match marker {
            Some(marker) => format!("{marker} {text}"),
            None => text,
        }
    }
}

fn classify(line: &str) -> Option<MetaKind> {
    META_PREFIXES
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|(_, kind)| *kind)
}
