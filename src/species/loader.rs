//! Load species definitions from TOML files
//!
//! Two passes over the species directory: the first assigns dense ids by
//! file name so cross-species references (food, symbiosis) can resolve, the
//! second builds the full records.

use std::fs;
use std::path::Path;

use crate::core::error::{BiodomeError, Result};
use crate::core::types::{BehaviorId, SpeciesId};
use crate::enclosure::AtmosphereComponent;
use crate::needs::{NeedCondition, NeedKind, NeedThresholds};
use crate::species::data::{
    BehaviorRule, NeedDefinition, SpeciesClass, SpeciesData, SpeciesTable,
};
use crate::terrain::TileKind;

/// Load every `*.toml` species file in a directory
pub fn load_species_table(species_dir: &Path) -> Result<SpeciesTable> {
    let mut files: Vec<_> = fs::read_dir(species_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "toml").unwrap_or(false))
        .collect();
    // Dense ids follow file-name order, so loads are reproducible
    files.sort();

    let mut table = SpeciesTable::new();

    // Pass 1: reserve names and ids
    let mut parsed: Vec<(String, toml::Value)> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    for path in &files {
        let file = path.display().to_string();
        let content = fs::read_to_string(path)?;
        let value: toml::Value = content.parse()?;
        let name = value
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid(&file, "missing `name`"))?
            .to_string();
        names.push(name.clone());
        parsed.push((file, value));
    }

    // Pass 2: build records, resolving references against the name list
    for (index, (file, value)) in parsed.iter().enumerate() {
        let id = SpeciesId(index as u32);
        let data = parse_species(file, value, id, &names)?;
        table.insert(data);
    }

    tracing::info!(count = table.len(), "species table loaded");
    Ok(table)
}

fn invalid(file: &str, reason: impl Into<String>) -> BiodomeError {
    BiodomeError::InvalidSpeciesConfig { file: file.to_string(), reason: reason.into() }
}

fn resolve_species(name: &str, names: &[String], file: &str) -> Result<SpeciesId> {
    names
        .iter()
        .position(|n| n == name)
        .map(|i| SpeciesId(i as u32))
        .ok_or_else(|| invalid(file, format!("unknown species reference `{name}`")))
}

/// Parse a need kind name like `gas_x`, `density`, `food:saltgrass`,
/// `terrain:liquid`, or `symbiosis:loam_vole`
fn parse_need_kind(text: &str, names: &[String], file: &str) -> Result<NeedKind> {
    if let Some(component) = AtmosphereComponent::from_name(text) {
        return Ok(NeedKind::Atmosphere(component));
    }
    if text == "density" {
        return Ok(NeedKind::Density);
    }
    if let Some(rest) = text.strip_prefix("food:") {
        return Ok(NeedKind::Food(resolve_species(rest, names, file)?));
    }
    if let Some(rest) = text.strip_prefix("terrain:") {
        let tile = TileKind::from_name(rest)
            .ok_or_else(|| invalid(file, format!("unknown tile kind `{rest}`")))?;
        return Ok(NeedKind::Terrain(tile));
    }
    if let Some(rest) = text.strip_prefix("symbiosis:") {
        return Ok(NeedKind::Symbiosis(resolve_species(rest, names, file)?));
    }
    Err(invalid(file, format!("unknown need kind `{text}`")))
}

fn parse_condition(text: &str, file: &str) -> Result<NeedCondition> {
    NeedCondition::from_name(text)
        .ok_or_else(|| invalid(file, format!("unknown condition `{text}`")))
}

fn parse_species(
    file: &str,
    value: &toml::Value,
    id: SpeciesId,
    names: &[String],
) -> Result<SpeciesData> {
    let name = value.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string();

    let class = match value.get("class").and_then(|v| v.as_str()) {
        Some("animal") | None => SpeciesClass::Animal,
        Some("food") => SpeciesClass::Food,
        Some(other) => return Err(invalid(file, format!("unknown class `{other}`"))),
    };

    let dominance = value.get("dominance").and_then(|v| v.as_float()).unwrap_or(1.0) as f32;
    let initial_population =
        value.get("initial_population").and_then(|v| v.as_integer()).unwrap_or(1) as u32;
    let growth_cycles =
        value.get("growth_cycles").and_then(|v| v.as_integer()).unwrap_or(4).max(1) as u32;
    let base_output = value.get("base_output").and_then(|v| v.as_float()).unwrap_or(0.0) as f32;
    let root_radius = value.get("root_radius").and_then(|v| v.as_integer()).unwrap_or(2) as i32;

    let behavior_names: Vec<String> = value
        .get("behaviors")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let behavior_id = |name: &str| -> Result<BehaviorId> {
        behavior_names
            .iter()
            .position(|b| b == name)
            .map(|i| BehaviorId(i as u32))
            .ok_or_else(|| BiodomeError::UnknownBehavior(format!("{name} (in {file})")))
    };

    let mut default_behaviors = Vec::new();
    if let Some(arr) = value.get("default_behaviors").and_then(|v| v.as_array()) {
        for entry in arr {
            let text = entry
                .as_str()
                .ok_or_else(|| invalid(file, "default_behaviors entries must be strings"))?;
            default_behaviors.push(behavior_id(text)?);
        }
    }

    let mut needs = Vec::new();
    if let Some(arr) = value.get("need").and_then(|v| v.as_array()) {
        for entry in arr {
            let table = entry
                .as_table()
                .ok_or_else(|| invalid(file, "[[need]] entries must be tables"))?;
            let kind_text = table
                .get("kind")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid(file, "need missing `kind`"))?;
            let kind = parse_need_kind(kind_text, names, file)?;
            let severity = table.get("severity").and_then(|v| v.as_float()).unwrap_or(1.0) as f32;

            let mut bands = Vec::new();
            if let Some(band_arr) = table.get("bands").and_then(|v| v.as_array()) {
                for band in band_arr {
                    let pair = band
                        .as_array()
                        .filter(|p| p.len() == 2)
                        .ok_or_else(|| invalid(file, "bands entries must be [bound, condition]"))?;
                    let bound = pair[0]
                        .as_float()
                        .or_else(|| pair[0].as_integer().map(|i| i as f64))
                        .ok_or_else(|| invalid(file, "band bound must be a number"))?
                        as f32;
                    let condition = pair[1]
                        .as_str()
                        .ok_or_else(|| invalid(file, "band condition must be a string"))
                        .and_then(|t| parse_condition(t, file))?;
                    bands.push((bound, condition));
                }
            }
            let above = table
                .get("above")
                .and_then(|v| v.as_str())
                .map(|t| parse_condition(t, file))
                .transpose()?
                .unwrap_or(NeedCondition::Good);

            needs.push(NeedDefinition {
                kind,
                thresholds: NeedThresholds::new(bands, above),
                severity,
            });
        }
    }

    let mut behavior_rules = Vec::new();
    if let Some(arr) = value.get("rule").and_then(|v| v.as_array()) {
        for entry in arr {
            let table = entry
                .as_table()
                .ok_or_else(|| invalid(file, "[[rule]] entries must be tables"))?;
            let need_text = table
                .get("need")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid(file, "rule missing `need`"))?;
            let condition_text = table
                .get("condition")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid(file, "rule missing `condition`"))?;
            let behavior_text = table
                .get("behavior")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid(file, "rule missing `behavior`"))?;
            let priority = table.get("priority").and_then(|v| v.as_integer()).unwrap_or(0) as u8;

            behavior_rules.push(BehaviorRule {
                need: parse_need_kind(need_text, names, file)?,
                condition: parse_condition(condition_text, file)?,
                behavior: behavior_id(behavior_text)?,
                priority,
            });
        }
    }

    Ok(SpeciesData {
        id,
        name,
        class,
        dominance,
        initial_population,
        growth_cycles,
        base_output,
        root_radius,
        needs,
        behavior_names,
        behavior_rules,
        default_behaviors,
    })
}
