//! Integration tests for the card preparation pipeline.
//!
//! These tests ensure that:
//! 1. A dataset on disk goes through loading, cleaning and modeling prep
//! 2. Cleaned tables have complete ranks, stats and cost notation
//! 3. Modeling tables have no sparse columns and no excluded rows
//! 4. Configuration from TOML changes pipeline behaviour

use std::fs;
use std::path::Path;

use cardprep::config::PrepConfig;
use cardprep::error::PrepError;
use cardprep::imaging::resolve_image_uri;
use cardprep::preprocessing::{prepare_cards, PrepPipeline};
use cardprep::source::{DataSource, LocalDataSource, SourceFactory, SourceSettings};
use polars::prelude::*;
use proptest::prelude::*;
use serde_json::{json, Value};

// ==================== Helper Functions ====================

fn card(
    id: &str,
    name: &str,
    rank: Option<i64>,
    mana_cost: &str,
    cmc: f64,
    type_line: &str,
    set_name: &str,
) -> Value {
    json!({
        "object": "card",
        "oracle_id": id,
        "name": name,
        "edhrec_rank": rank,
        "mana_cost": mana_cost,
        "cmc": cmc,
        "type_line": type_line,
        "oracle_text": format!("Rules text of {}.", name),
        "colors": ["U"],
        "color_identity": ["U"],
        "keywords": ["Flying"],
        "set_name": set_name,
        "lang": "en",
        "layout": "normal",
        "related_uris": {"gatherer": format!("https://gatherer.example/{}", id)},
        "image_uris": {
            "small": format!("https://cards.example/small/{}.jpg", id),
            "normal": format!("https://cards.example/normal/{}.jpg", id)
        }
    })
}

fn sample_cards() -> Vec<Value> {
    let mut cards = vec![
        card("a1", "Opt", Some(140), "{U}", 1.0, "Instant", "Ixalan"),
        card("b2", "Serra Angel", Some(22664), "{3}{W}{W}", 5.0, "Creature — Angel", "Alpha"),
        card("c3", "Storm Crow", None, "{1}{U}", 2.0, "Creature — Bird", "Alpha"),
        card("d4", "Gleemax", None, "{1000000}", 1000000.0, "Legendary Artifact", "Unhinged"),
        card("e5", "Goblin", Some(9000), "", 0.0, "Token Creature — Goblin", "Tokens"),
        card("f6", "Plains", Some(10), "{}", 0.0, "Basic Land — Plains", "Zendikar Art Series"),
        card("g7", "Little Girl", Some(20000), "{W}", 0.5, "Creature — Human Child", "Unhinged"),
        card("h8", "Wastes", Some(3000), "", 0.0, "Basic Land", "Oath of the Gatewatch"),
    ];
    cards[1]["power"] = json!("4");
    cards[1]["toughness"] = json!("4");
    cards[1]["flavor_text"] = json!("Born with wings of light.");
    cards[2]["power"] = json!("1");
    cards[2]["toughness"] = json!("2");
    cards[7]["oracle_text"] = Value::Null;
    cards
}

fn write_dataset(dir: &Path, dataset: &str, cards: &[Value]) {
    let path = dir.join(format!("{}.json", dataset));
    fs::write(path, serde_json::to_string(cards).unwrap()).unwrap();
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

fn ints(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
    df.column(column)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

// ==================== End-to-End Tests ====================

#[test]
fn test_local_dataset_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let source = LocalDataSource::new(dir.path());
    let result = prepare_cards(&source, "oracle_cards").unwrap();

    assert_eq!(result.cleaned.height(), 8);
    assert_eq!(result.cleaned.key(), Some("oracle_id"));

    // Wastes (no text), Gleemax, the token and the art card are gone
    assert_eq!(
        strings(result.modeling.frame(), "name"),
        vec!["Opt", "Serra Angel", "Storm Crow", "Little Girl"]
    );
}

#[test]
fn test_missing_ranks_follow_max() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let ranks = ints(result.cleaned.frame(), "edhrec_rank");

    assert_eq!(ranks[2], Some(22665));
    assert_eq!(ranks[3], Some(22666));
    assert!(ranks.iter().all(Option::is_some));
}

#[test]
fn test_cleaned_stats_and_costs() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let df = result.cleaned.frame();

    assert_eq!(df.column("power").unwrap().null_count(), 0);
    assert_eq!(df.column("toughness").unwrap().null_count(), 0);
    assert_eq!(strings(df, "power")[0], "0");

    let costs = strings(df, "mana_cost");
    assert_eq!(costs[1], "3/W/W");
    assert_eq!(costs[3], "1000000");
    assert_eq!(costs[5], "0");
    assert!(costs.iter().all(|c| !c.contains(['{', '}'])));
}

#[test]
fn test_half_cost_card_is_corrected() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let cmc = ints(result.cleaned.frame(), "cmc");
    assert_eq!(cmc[6], Some(1));
}

#[test]
fn test_list_columns_are_flattened() {
    let dir = tempfile::tempdir().unwrap();
    let mut cards = sample_cards();
    cards[0]["colors"] = json!([]);
    cards[0]["keywords"] = json!([]);
    write_dataset(dir.path(), "oracle_cards", &cards);

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let df = result.cleaned.frame();
    assert_eq!(strings(df, "colors")[0], "C");
    assert_eq!(strings(df, "keywords")[0], "None");
    assert_eq!(strings(df, "colors")[1], "U");
    assert_eq!(strings(df, "keywords")[1], "Flying");
}

#[test]
fn test_modeling_post_conditions() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let modeling = &result.modeling;

    for name in modeling.column_names() {
        let ratio = modeling.missing_ratio(&name).unwrap();
        assert!(ratio <= 0.35, "{} is {} missing", name, ratio);
    }
    // flavor_text is 1 of 4 present after row filters
    assert!(!modeling.has_column("flavor_text"));
    assert!(!modeling.has_column("related_uris"));
    assert!(!modeling.has_column("lang"));
    assert!(!modeling.has_column("image_uris"));

    assert_eq!(result.validation.stats.sparse_columns, 0);
    assert_eq!(result.validation.stats.excluded_rows, 0);
    assert_eq!(result.validation.stats.missing_ranks, 0);
    assert_eq!(result.validation.stats.bracketed_costs, 0);
}

#[test]
fn test_related_links_side_table() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let links = result.related_links.unwrap();

    // Only the row without text is gone when links are extracted
    assert_eq!(links.height(), 7);
    let names: Vec<String> = links
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["oracle_id", "related_uris"]);
}

#[test]
fn test_image_uri_from_cleaned_table() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "oracle_cards", &sample_cards());

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    let uri = resolve_image_uri(&result.cleaned, "Storm Crow", "normal").unwrap();
    assert_eq!(uri, "https://cards.example/normal/c3.jpg");

    let missing = resolve_image_uri(&result.cleaned, "Lightning Bolt", "normal");
    assert!(matches!(missing, Err(PrepError::CardNotFound(_))));
}

#[test]
fn test_all_ranks_missing() {
    let dir = tempfile::tempdir().unwrap();
    let cards = vec![
        card("a1", "Opt", None, "{U}", 1.0, "Instant", "Ixalan"),
        card("b2", "Shock", None, "{R}", 1.0, "Instant", "Alpha"),
    ];
    write_dataset(dir.path(), "oracle_cards", &cards);

    let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
    assert_eq!(
        ints(result.cleaned.frame(), "edhrec_rank"),
        vec![Some(1), Some(2)]
    );
}

// ==================== Configuration Tests ====================

#[test]
fn test_pipeline_from_toml_config() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "default_cards", &sample_cards());

    let toml = format!(
        r#"
[source]
kind = "local"
root = "{}"
dataset = "default_cards"

[modeling]
max_missing_ratio = 0.9

[[modeling.exclusions]]
column = "name"
pattern = "Opt"
match = "exact"
"#,
        dir.path().display()
    );
    let config = PrepConfig::from_toml_str(&toml).unwrap();
    let source = SourceFactory::create(&config.source).unwrap();
    let dataset = config.source.dataset.clone();

    let result = PrepPipeline::with_config(config)
        .process(source.as_ref(), &dataset)
        .unwrap();

    let names = strings(result.modeling.frame(), "name");
    // Only the configured exclusion runs
    assert!(!names.contains(&"Opt".to_string()));
    assert!(names.contains(&"Gleemax".to_string()));
    assert!(result.modeling.has_column("flavor_text"));
}

#[test]
fn test_unknown_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let source = SourceFactory::create(&SourceSettings {
        root: dir.path().to_path_buf(),
        ..SourceSettings::default()
    })
    .unwrap();

    let result = source.fetch("oracle_cards");
    assert!(matches!(result, Err(PrepError::DatasetNotFound(_))));
}

// ==================== Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_cleaned_ranks_are_unique(ranks in prop::collection::vec(prop::option::of(1i64..500), 1..20)) {
        let mut seen = std::collections::HashSet::new();
        let cards: Vec<Value> = ranks
            .iter()
            .enumerate()
            .map(|(i, rank)| {
                // distinct known ranks, as in the real dataset
                let rank = rank.filter(|r| seen.insert(*r));
                card(&format!("id{}", i), &format!("Card {}", i), rank, "{1}", 1.0, "Instant", "Alpha")
            })
            .collect();

        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "oracle_cards", &cards);

        let result = prepare_cards(&LocalDataSource::new(dir.path()), "oracle_cards").unwrap();
        let filled: Vec<i64> = ints(result.cleaned.frame(), "edhrec_rank")
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let unique: std::collections::HashSet<i64> = filled.iter().copied().collect();
        prop_assert_eq!(unique.len(), filled.len());
        prop_assert_eq!(result.validation.stats.duplicate_ranks, 0);
    }
}
