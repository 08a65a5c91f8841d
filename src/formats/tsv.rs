use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, warn};
use parser_blueprint::NONE_TEXT;

use crate::analyzer::classify;
use crate::types::{ABILITY_SLOTS, Weapon, WeaponAbility};

pub const TSV_EXTENSION: &str = "tsv";
const SOURCE_SEPARATOR: &str = ", ";

/// One sub-column of an `Attack N` group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityCell {
    Name,
    Type,
    Cost,
    Fx,
    OnHit,
}

impl AbilityCell {
    const ALL: [AbilityCell; 5] = [
        AbilityCell::Name,
        AbilityCell::Type,
        AbilityCell::Cost,
        AbilityCell::Fx,
        AbilityCell::OnHit,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Blueprint,
    Guid,
    Name,
    Description,
    Grouping,
    Category,
    Family,
    Classification,
    Heavy,
    TwoHanded,
    MinDamage,
    MaxDamage,
    ArmorPen,
    DodgeReduction,
    ExtraHitChance,
    RateOfFire,
    Recoil,
    MaxRange,
    Ammo,
    Attack(usize, AbilityCell),
    Sources,
    /// Spans every remaining column of the row
    ExtraFacts,
    Ignored,
}

const SCALAR_COLUMNS: [(Column, &str); 19] = [
    (Column::Blueprint, "Blueprint"),
    (Column::Guid, "Guid"),
    (Column::Name, "Name"),
    (Column::Description, "Description"),
    (Column::Grouping, "Grouping"),
    (Column::Category, "Category"),
    (Column::Family, "Family"),
    (Column::Classification, "Classification"),
    (Column::Heavy, "Heavy"),
    (Column::TwoHanded, "Two Handed"),
    (Column::MinDamage, "Min Damage"),
    (Column::MaxDamage, "Max Damage"),
    (Column::ArmorPen, "Armor Pen"),
    (Column::DodgeReduction, "Dodge Reduction"),
    (Column::ExtraHitChance, "Extra Hit Chance"),
    (Column::RateOfFire, "Rate of Fire"),
    (Column::Recoil, "Recoil"),
    (Column::MaxRange, "Max Range"),
    (Column::Ammo, "Ammo"),
];

impl Column {
    /// Columns in output order
    pub fn all() -> Vec<Column> {
        let mut columns: Vec<Column> = SCALAR_COLUMNS.iter().map(|(column, _)| *column).collect();
        for slot in 0..ABILITY_SLOTS {
            columns.extend(AbilityCell::ALL.iter().map(|cell| Column::Attack(slot, *cell)));
        }
        columns.push(Column::Sources);
        columns.push(Column::ExtraFacts);
        columns
    }

    pub fn header(&self) -> String {
        match self {
            Column::Attack(slot, AbilityCell::Name) => format!("Attack {}", slot + 1),
            Column::Attack(_, AbilityCell::Type) => "Type".to_string(),
            Column::Attack(_, AbilityCell::Cost) => "Cost".to_string(),
            Column::Attack(_, AbilityCell::Fx) => "GFX".to_string(),
            Column::Attack(_, AbilityCell::OnHit) => "On Hit".to_string(),
            Column::Sources => "Sources".to_string(),
            Column::ExtraFacts => "Extra Facts".to_string(),
            Column::Ignored => String::new(),
            scalar => SCALAR_COLUMNS
                .iter()
                .find(|(column, _)| column == scalar)
                .map(|(_, header)| header.to_string())
                .unwrap_or_default(),
        }
    }

    fn cell(&self, weapon: &Weapon) -> String {
        match self {
            Column::Blueprint => escape(&weapon.blueprint_name),
            Column::Guid => escape(&weapon.guid),
            Column::Name => escape(&weapon.name),
            Column::Description => escape(&weapon.description),
            Column::Grouping => classify(weapon).to_string(),
            Column::Category => optional_cell(&weapon.category),
            Column::Family => optional_cell(&weapon.family),
            Column::Classification => optional_cell(&weapon.classification),
            Column::Heavy => optional_cell(&weapon.heavy),
            Column::TwoHanded => optional_cell(&weapon.two_handed),
            Column::MinDamage => optional_cell(&weapon.min_damage),
            Column::MaxDamage => optional_cell(&weapon.max_damage),
            Column::ArmorPen => optional_cell(&weapon.penetration),
            Column::DodgeReduction => optional_cell(&weapon.dodge_reduction),
            Column::ExtraHitChance => optional_cell(&weapon.additional_hit_chance),
            Column::RateOfFire => optional_cell(&weapon.rate_of_fire),
            Column::Recoil => optional_cell(&weapon.recoil),
            Column::MaxRange => optional_cell(&weapon.max_range),
            Column::Ammo => optional_cell(&weapon.ammo),
            Column::Attack(slot, cell) => match &weapon.abilities[*slot] {
                Some(ability) => ability_cell(ability, *cell),
                None => String::new(),
            },
            Column::Sources => escape(&weapon.sources.join(SOURCE_SEPARATOR)),
            Column::ExtraFacts => weapon
                .extra_fact_names
                .iter()
                .map(|name| escape(name))
                .collect::<Vec<_>>()
                .join("\t"),
            Column::Ignored => String::new(),
        }
    }

    fn is_text(&self) -> bool {
        matches!(
            self,
            Column::Name
                | Column::Description
                | Column::Sources
                | Column::ExtraFacts
                | Column::Attack(_, AbilityCell::Name | AbilityCell::Fx | AbilityCell::OnHit)
        )
    }

    /// Apply one non-empty cell to `weapon`
    fn apply(&self, weapon: &mut Weapon, raw: &str) -> Result<()> {
        match self {
            Column::Blueprint => weapon.blueprint_name = text_value(raw),
            Column::Guid => weapon.guid = text_value(raw),
            Column::Name => weapon.name = text_value(raw),
            Column::Description => weapon.description = text_value(raw),
            Column::Grouping | Column::Ignored => {}
            Column::Category => weapon.category = Some(raw.parse()?),
            Column::Family => weapon.family = Some(raw.parse()?),
            Column::Classification => weapon.classification = Some(raw.parse()?),
            Column::Heavy => weapon.heavy = Some(parse_bool(raw)?),
            Column::TwoHanded => weapon.two_handed = Some(parse_bool(raw)?),
            Column::MinDamage => weapon.min_damage = Some(parse_int(raw)?),
            Column::MaxDamage => weapon.max_damage = Some(parse_int(raw)?),
            Column::ArmorPen => weapon.penetration = Some(parse_int(raw)?),
            Column::DodgeReduction => weapon.dodge_reduction = Some(parse_int(raw)?),
            Column::ExtraHitChance => weapon.additional_hit_chance = Some(parse_int(raw)?),
            Column::RateOfFire => weapon.rate_of_fire = Some(parse_int(raw)?),
            Column::Recoil => weapon.recoil = Some(parse_int(raw)?),
            Column::MaxRange => weapon.max_range = Some(parse_int(raw)?),
            Column::Ammo => weapon.ammo = Some(parse_int(raw)?),
            Column::Attack(slot, cell) => {
                let ability = weapon.abilities[*slot].get_or_insert_with(WeaponAbility::default);
                apply_ability_cell(ability, *cell, raw)?;
            }
            Column::Sources => {
                weapon.sources = text_value(raw)
                    .split(SOURCE_SEPARATOR)
                    .filter(|source| !source.is_empty())
                    .map(String::from)
                    .collect();
            }
            Column::ExtraFacts => {
                if raw != NONE_TEXT {
                    weapon.extra_fact_names.push(unescape(raw));
                }
            }
        }
        Ok(())
    }
}

fn optional_cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Explicitly emptied text is written as `None` so it survives the round-trip
fn optional_text_cell(value: &Option<String>) -> String {
    match value.as_deref() {
        Some("") => NONE_TEXT.to_string(),
        Some(text) => escape(text),
        None => String::new(),
    }
}

fn ability_cell(ability: &WeaponAbility, cell: AbilityCell) -> String {
    match cell {
        AbilityCell::Name => optional_text_cell(&ability.ability_bp_name),
        AbilityCell::Type => optional_cell(&ability.ability_type),
        AbilityCell::Cost => optional_cell(&ability.ap),
        AbilityCell::Fx => optional_text_cell(&ability.fx_bp_name),
        AbilityCell::OnHit => optional_text_cell(&ability.on_hit_action_name),
    }
}

fn apply_ability_cell(ability: &mut WeaponAbility, cell: AbilityCell, raw: &str) -> Result<()> {
    match cell {
        AbilityCell::Name => ability.ability_bp_name = Some(text_value(raw)),
        AbilityCell::Type => ability.ability_type = Some(raw.parse()?),
        AbilityCell::Cost => ability.ap = Some(parse_int(raw)?),
        AbilityCell::Fx => ability.fx_bp_name = Some(text_value(raw)),
        AbilityCell::OnHit => ability.on_hit_action_name = Some(text_value(raw)),
    }
    Ok(())
}

fn text_value(raw: &str) -> String {
    if raw == NONE_TEXT { String::new() } else { unescape(raw) }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "none" => Ok(false),
        other => Err(anyhow!("Invalid boolean: {}", other)),
    }
}

fn parse_int(raw: &str) -> Result<i32> {
    if raw == NONE_TEXT {
        return Ok(0);
    }
    i32::from_str(raw).map_err(|e| anyhow!("Invalid number {}: {}", raw, e))
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => unescaped.push('\t'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Render weapons as a header row followed by one row per weapon
pub fn tsv_string(weapons: &[Weapon]) -> String {
    let columns = Column::all();
    let mut out = columns.iter().map(Column::header).collect::<Vec<_>>().join("\t");
    out.push('\n');
    for weapon in weapons {
        let row: Vec<String> = columns.iter().map(|column| column.cell(weapon)).collect();
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

pub fn write_tsv(path: &Path, weapons: &[Weapon]) -> Result<()> {
    fs::write(path, tsv_string(weapons)).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} weapons to {}", weapons.len(), path.display());
    Ok(())
}

/// Map header cells to columns. `Attack N` claims the four cells after it and
/// `Extra Facts` claims everything to the end of the row.
fn columns_from_header(header: &str) -> Result<Vec<Column>> {
    let cells: Vec<&str> = header.split('\t').map(str::trim).collect();
    let mut columns = Vec::with_capacity(cells.len());
    let mut index = 0;

    while index < cells.len() {
        let cell = cells[index];
        if let Some(slot) = cell.strip_prefix("Attack ").and_then(|n| n.parse::<usize>().ok()) {
            if slot == 0 || slot > ABILITY_SLOTS {
                bail!("Unknown ability column {}", cell);
            }
            columns.extend(AbilityCell::ALL.iter().map(|sub| Column::Attack(slot - 1, *sub)));
            index += AbilityCell::ALL.len();
            continue;
        }
        let column = match cell {
            "Sources" => Column::Sources,
            "Extra Facts" => Column::ExtraFacts,
            other => SCALAR_COLUMNS
                .iter()
                .find(|(_, header)| *header == other)
                .map(|(column, _)| *column)
                .unwrap_or(Column::Ignored),
        };
        columns.push(column);
        index += 1;
    }

    if !columns.contains(&Column::Blueprint) {
        bail!("Header has no Blueprint column");
    }
    Ok(columns)
}

fn parse_row(line: &str, columns: &[Column]) -> Result<Weapon> {
    let mut weapon = Weapon::default();
    for (index, raw) in line.split('\t').enumerate() {
        let column = columns
            .get(index)
            .copied()
            .or_else(|| columns.last().copied().filter(|last| *last == Column::ExtraFacts))
            .unwrap_or(Column::Ignored);
        // Free text keeps its padding; everything else is a trimmed token
        let raw = if column.is_text() { raw } else { raw.trim() };
        if raw.is_empty() {
            continue;
        }
        column
            .apply(&mut weapon, raw)
            .with_context(|| format!("{} column", column.header()))?;
    }
    Ok(weapon)
}

/// Parse TSV text. Rows that fail to parse are logged and skipped.
pub fn parse_tsv(text: &str) -> Result<Vec<Weapon>> {
    let mut lines = text.lines();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let columns = columns_from_header(header)?;

    let mut weapons = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line, &columns) {
            Ok(weapon) => weapons.push(weapon),
            Err(e) => warn!("Skipping row {}: {:#}", line_no + 2, e),
        }
    }
    Ok(weapons)
}

pub fn read_tsv(path: &Path) -> Result<Vec<Weapon>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_tsv(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
