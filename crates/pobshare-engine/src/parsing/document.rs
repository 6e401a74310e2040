use std::collections::BTreeMap;

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::debug;

use crate::models::{Build, Item};

use super::item_text::ItemTextParser;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The top-level markup could not be parsed at all. Unlike individual
    /// item or slot entries, this is fatal: there is nothing to recover.
    #[error("invalid build data: {0}")]
    Malformed(#[from] roxmltree::Error),
}

/// Slot names that exist in documents but are not equipment slots we
/// model (extra jewel sockets attached to belts and grafted gear).
const RESERVED_SLOT_MARKERS: &[&str] = &["Abyssal", "Graft"];

/// Parses a decoded build document into a [`Build`].
///
/// Malformed individual entries (a placeholder item block, a slot record
/// with no usable reference) are logged and skipped; only unparseable
/// top-level markup fails the whole operation.
#[derive(Debug, Default)]
pub struct BuildDocumentParser {
    item_parser: ItemTextParser,
}

impl BuildDocumentParser {
    pub fn new() -> Self {
        Self {
            item_parser: ItemTextParser::new(),
        }
    }

    pub fn parse(&self, document: &str) -> Result<Build, DocumentError> {
        let doc = Document::parse(document)?;
        let root = doc.root_element();

        let mut build = Build::default();
        if let Some(header) = child_element(root, "Build") {
            read_header(header, &mut build);
            read_stats(header, &mut build);
        }
        build.skills = read_skills(root);
        build.config = read_config(root);
        if let Some(items) = child_element(root, "Items") {
            build.items = self.read_items(items);
        }

        Ok(build)
    }

    /// Resolves slot records against the item table. Items are parsed
    /// once each, regardless of how many slots reference them.
    fn read_items(&self, items_node: Node) -> BTreeMap<String, Item> {
        let table = self.parse_item_table(items_node);

        let mut items = BTreeMap::new();
        for (slot_name, item_id) in slot_assignments(items_node) {
            let Some(parsed) = table.get(item_id.as_str()) else {
                debug!(slot = %slot_name, id = %item_id, "slot references an unusable item, skipping");
                continue;
            };
            let mut item = parsed.clone();
            item.slot = slot_name.clone();
            items.insert(slot_name, item);
        }
        items
    }

    /// Item id → parsed item. Blocks that parse to `None` (placeholders)
    /// are left out of the table so the slots referencing them get
    /// skipped later.
    fn parse_item_table<'a, 'input>(
        &self,
        items_node: Node<'a, 'input>,
    ) -> BTreeMap<&'a str, Item> {
        let mut table = BTreeMap::new();
        for node in items_node.children().filter(|n| n.has_tag_name("Item")) {
            let Some(id) = node.attribute("id") else {
                continue;
            };
            match self.item_parser.parse(node.text().unwrap_or_default()) {
                Some(item) => {
                    table.insert(id, item);
                }
                None => debug!(id, "item block is empty or malformed, skipping"),
            }
        }
        table
    }
}

fn read_header(header: Node, build: &mut Build) {
    build.level = header
        .attribute("level")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
        .max(1);
    build.class_name = attr_string(header, "className");
    build.ascendancy = attr_string(header, "ascendClassName");
    build.bandit = header.attribute("bandit").unwrap_or("None").to_string();
    build.main_skill = attr_string(header, "mainSkillLabel");
}

fn read_stats(header: Node, build: &mut Build) {
    for node in header.children().filter(|n| n.has_tag_name("PlayerStat")) {
        let (Some(stat), Some(value)) = (node.attribute("stat"), node.attribute("value")) else {
            continue;
        };
        match value.parse::<f64>() {
            Ok(value) => {
                build.stats.insert(stat.to_string(), value);
            }
            Err(_) => debug!(stat, value, "non-numeric player stat, skipping"),
        }
    }
}

/// Every labeled skill in document order; unlabeled entries are dropped.
fn read_skills(root: Node) -> Vec<String> {
    root.descendants()
        .filter(|n| n.has_tag_name("Skill"))
        .filter_map(|n| n.attribute("label"))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Config inputs, preferring the boolean attribute, then number, then
/// string. Entries with no value at all are skipped.
fn read_config(root: Node) -> BTreeMap<String, String> {
    let Some(config) = child_element(root, "Config") else {
        return BTreeMap::new();
    };
    let mut out = BTreeMap::new();
    for node in config.children().filter(|n| n.has_tag_name("Input")) {
        let Some(name) = node.attribute("name") else {
            continue;
        };
        let value = node
            .attribute("boolean")
            .or_else(|| node.attribute("number"))
            .or_else(|| node.attribute("string"));
        match value {
            Some(value) => {
                out.insert(name.to_string(), value.to_string());
            }
            None => debug!(name, "config input carries no value, skipping"),
        }
    }
    out
}

/// Collects slot → item-id assignments, honoring the precedence rule
/// across the two historical document shapes:
///
/// 1. flat `Slot` records directly under `Items` are always collected;
/// 2. records inside the `ItemSet` whose id matches `activeItemSet` are
///    added;
/// 3. with no flat records and no matching set, the first `ItemSet`
///    present is used, because older or hand-edited documents often
///    carry a dangling active-set reference and an empty build would be
///    worse than a best-effort one.
fn slot_assignments(items_node: Node) -> Vec<(String, String)> {
    let mut assignments: Vec<(String, String)> = slot_records(items_node).collect();

    let item_sets: Vec<Node> = items_node
        .children()
        .filter(|n| n.has_tag_name("ItemSet"))
        .collect();
    let active_id = items_node.attribute("activeItemSet");
    let active_set = item_sets
        .iter()
        .find(|set| set.attribute("id") == active_id && active_id.is_some());

    match active_set {
        Some(set) => assignments.extend(slot_records(*set)),
        None if assignments.is_empty() => {
            if let Some(first) = item_sets.first() {
                debug!(
                    active = ?active_id,
                    "no flat slots and no item set matches the active id, falling back to the first set"
                );
                assignments.extend(slot_records(*first));
            }
        }
        None => {}
    }

    assignments
}

/// Usable `Slot` records under one node: named, pointing at a real item,
/// and not one of the reserved jewel-socket pseudo-slots.
fn slot_records<'a, 'input>(
    parent: Node<'a, 'input>,
) -> impl Iterator<Item = (String, String)> + 'a {
    parent
        .children()
        .filter(|n| n.has_tag_name("Slot"))
        .filter_map(|n| {
            let name = n.attribute("name")?;
            let item_id = n.attribute("itemId").filter(|id| *id != "0")?;
            if RESERVED_SLOT_MARKERS.iter().any(|m| name.contains(m)) {
                return None;
            }
            Some((name.to_string(), item_id.to_string()))
        })
}

fn child_element<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent.children().find(|n| n.has_tag_name(name))
}

fn attr_string(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn parse(document: &str) -> Build {
        BuildDocumentParser::new().parse(document).unwrap()
    }

    const RING_BLOCK: &str = "\nRarity: RARE\nDoom Band\nIron Ring\nImplicits: 1\n+8% to all Elemental Resistances\n+45 to maximum Life\n";
    const HELMET_BLOCK: &str = "\nRarity: UNIQUE\nThe Baron\nClose Helmet\n";

    #[test]
    fn reads_header_fields_with_defaults() {
        let build = parse(
            r#"<PathOfBuilding>
                 <Build level="92" className="Witch" ascendClassName="Necromancer"
                        bandit="Alira" mainSkillLabel="Raise Spectre"/>
               </PathOfBuilding>"#,
        );
        assert_eq!(build.level, 92);
        assert_eq!(build.class_name, "Witch");
        assert_eq!(build.ascendancy, "Necromancer");
        assert_eq!(build.bandit, "Alira");
        assert_eq!(build.main_skill, "Raise Spectre");
    }

    #[test]
    fn absent_header_attributes_fall_back_to_defaults() {
        let build = parse("<PathOfBuilding><Build/></PathOfBuilding>");
        assert_eq!(build.level, 1);
        assert_eq!(build.bandit, "None");
        assert_eq!(build.class_name, "");
    }

    #[test]
    fn malformed_markup_is_fatal() {
        let result = BuildDocumentParser::new().parse("<PathOfBuilding><Build>");
        assert!(matches!(result, Err(DocumentError::Malformed(_))));
    }

    #[test]
    fn stats_keep_numeric_values_and_skip_the_rest() {
        let build = parse(
            r#"<PathOfBuilding>
                 <Build>
                   <PlayerStat stat="Life" value="5231"/>
                   <PlayerStat stat="EffectiveHP" value="24100.5"/>
                   <PlayerStat stat="Broken" value="not-a-number"/>
                   <PlayerStat stat="NoValue"/>
                 </Build>
               </PathOfBuilding>"#,
        );
        assert_eq!(build.stats.len(), 2);
        assert_eq!(build.stats["Life"], 5231.0);
        assert_eq!(build.stats["EffectiveHP"], 24100.5);
    }

    #[test]
    fn skills_keep_document_order_and_drop_unlabeled_entries() {
        let build = parse(
            r#"<PathOfBuilding>
                 <Skills>
                   <SkillSet id="1">
                     <Skill label="Raise Spectre"/>
                     <Skill label=""/>
                     <Skill/>
                     <Skill label="Desecrate"/>
                   </SkillSet>
                 </Skills>
               </PathOfBuilding>"#,
        );
        assert_eq!(build.skills, vec!["Raise Spectre", "Desecrate"]);
    }

    #[test]
    fn config_prefers_boolean_then_number_then_string() {
        let build = parse(
            r#"<PathOfBuilding>
                 <Config>
                   <Input name="enemyIsBoss" boolean="true" string="shadowed"/>
                   <Input name="resPenalty" number="-60"/>
                   <Input name="customMods" string="+1 to curses"/>
                   <Input name="empty"/>
                 </Config>
               </PathOfBuilding>"#,
        );
        assert_eq!(build.config.len(), 3);
        assert_eq!(build.config["enemyIsBoss"], "true");
        assert_eq!(build.config["resPenalty"], "-60");
        assert_eq!(build.config["customMods"], "+1 to curses");
    }

    #[test]
    fn flat_slot_records_resolve_items() {
        let build = parse(&format!(
            r#"<PathOfBuilding>
                 <Items>
                   <Item id="1">{RING_BLOCK}</Item>
                   <Slot name="Ring 1" itemId="1"/>
                   <Slot name="Ring 2" itemId="0"/>
                   <Slot name="Amulet"/>
                 </Items>
               </PathOfBuilding>"#
        ));
        assert_eq!(build.items.len(), 1);
        let ring = &build.items["Ring 1"];
        assert_eq!(ring.slot, "Ring 1");
        assert_eq!(ring.name, "Doom Band");
        assert_eq!(ring.implicit_mods, vec!["+8% to all Elemental Resistances"]);
    }

    #[test]
    fn active_item_set_records_are_added_to_flat_records() {
        let build = parse(&format!(
            r#"<PathOfBuilding>
                 <Items activeItemSet="2">
                   <Item id="1">{RING_BLOCK}</Item>
                   <Item id="2">{HELMET_BLOCK}</Item>
                   <Slot name="Ring 1" itemId="1"/>
                   <ItemSet id="1">
                     <Slot name="Helmet" itemId="1"/>
                   </ItemSet>
                   <ItemSet id="2">
                     <Slot name="Helmet" itemId="2"/>
                   </ItemSet>
                 </Items>
               </PathOfBuilding>"#
        ));
        assert_eq!(build.items.len(), 2);
        assert_eq!(build.items["Helmet"].name, "The Baron");
        assert_eq!(build.items["Ring 1"].name, "Doom Band");
    }

    #[test]
    fn dangling_active_id_falls_back_to_the_first_item_set() {
        let build = parse(&format!(
            r#"<PathOfBuilding>
                 <Items activeItemSet="99">
                   <Item id="1">{RING_BLOCK}</Item>
                   <ItemSet id="1">
                     <Slot name="Ring 1" itemId="1"/>
                   </ItemSet>
                   <ItemSet id="2">
                     <Slot name="Ring 2" itemId="1"/>
                   </ItemSet>
                 </Items>
               </PathOfBuilding>"#
        ));
        // Not an empty build: the first set is used.
        assert_eq!(build.items.len(), 1);
        assert!(build.items.contains_key("Ring 1"));
    }

    #[test]
    fn flat_records_suppress_the_dangling_id_fallback() {
        let build = parse(&format!(
            r#"<PathOfBuilding>
                 <Items activeItemSet="99">
                   <Item id="1">{RING_BLOCK}</Item>
                   <Slot name="Ring 1" itemId="1"/>
                   <ItemSet id="1">
                     <Slot name="Ring 2" itemId="1"/>
                   </ItemSet>
                 </Items>
               </PathOfBuilding>"#
        ));
        assert_eq!(build.items.len(), 1);
        assert!(build.items.contains_key("Ring 1"));
    }

    #[rstest]
    #[case("Belt Abyssal Socket 1")]
    #[case("Weapon 1 Graft 2")]
    fn reserved_slots_are_excluded(#[case] slot: &str) {
        let build = parse(&format!(
            r#"<PathOfBuilding>
                 <Items>
                   <Item id="1">{RING_BLOCK}</Item>
                   <Slot name="{slot}" itemId="1"/>
                 </Items>
               </PathOfBuilding>"#
        ));
        assert!(build.items.is_empty());
    }

    #[test]
    fn placeholder_item_blocks_drop_their_slot_without_failing() {
        let build = parse(&format!(
            r#"<PathOfBuilding>
                 <Items>
                   <Item id="1">only one line</Item>
                   <Item id="2">{RING_BLOCK}</Item>
                   <Slot name="Helmet" itemId="1"/>
                   <Slot name="Ring 1" itemId="2"/>
                 </Items>
               </PathOfBuilding>"#
        ));
        assert_eq!(build.items.len(), 1);
        assert!(build.items.contains_key("Ring 1"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let document = format!(
            r#"<PathOfBuilding>
                 <Build level="90" className="Witch">
                   <PlayerStat stat="Life" value="5000"/>
                   <PlayerStat stat="Mana" value="1200"/>
                 </Build>
                 <Skills><Skill label="Raise Spectre"/></Skills>
                 <Items activeItemSet="1">
                   <Item id="1">{RING_BLOCK}</Item>
                   <Item id="2">{HELMET_BLOCK}</Item>
                   <ItemSet id="1">
                     <Slot name="Ring 1" itemId="1"/>
                     <Slot name="Helmet" itemId="2"/>
                   </ItemSet>
                 </Items>
                 <Config><Input name="enemyIsBoss" boolean="true"/></Config>
               </PathOfBuilding>"#
        );
        assert_eq!(parse(&document), parse(&document));
    }
}
