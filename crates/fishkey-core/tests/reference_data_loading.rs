mod support;

use std::path::Path;

use fishkey_core::commands::parse::{self, ParseOptions};
use fishkey_core::commands::species::{self, SpeciesOptions};
use fishkey_core::config::ReferenceSource;
use fishkey_core::{AliasIndex, AttributeFamily};
use support::write_file;
use tempfile::tempdir;

const SPECIES: &str = r#"{
  "salmon": {
    "name": "Salmon",
    "class": "finfish",
    "subcategories": {
      "atlantic": {"name": "Atlantic Salmon", "aliases": ["ATL", "ATLANTIC"]}
    }
  },
  "kingfish": {
    "name": "Kingfish",
    "class": "finfish",
    "aliases": [{"alias": "KINGKLIP", "context": "whitelist"}]
  }
}"#;

const CODES: &str = r#"{
  "families": {
    "form": {"FIL": {"name": "Fillet", "aliases": ["FILLET", "FIL"]}},
    "storage": {"FRSH": {"name": "Fresh", "aliases": ["FRESH"]}}
  },
  "countries": {
    "NOR": {"name": "Norway", "aliases": ["NORWAY"]},
    "CHN": {"name": "China", "aliases": ["CHINA"]}
  },
  "twice_frozen_processing": ["CHN"]
}"#;

fn write_reference(dir: &Path, species: &str, codes: &str) {
    write_file(&dir.join("species.json"), species);
    write_file(&dir.join("codes.json"), codes);
}

#[test]
fn custom_directory_replaces_bundled_tables() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp) = temp {
        write_reference(temp.path(), SPECIES, CODES);
        let index = AliasIndex::load(&ReferenceSource::Directory(temp.path().to_path_buf()));
        assert!(index.is_ok());
        if let Ok(index) = index {
            let record = fishkey_core::parse(&index, "KINGKLIP FILLET NORWAY");
            assert_eq!(record.category(), Some("kingfish"));
            assert_eq!(record.form.as_deref(), Some("FIL"));
            assert_eq!(record.origin.as_deref(), Some("NOR"));
            assert!(index.family(AttributeFamily::Skin).is_empty());
            assert_eq!(index.categories().count(), 2);
        }
    }
}

#[test]
fn parse_command_reports_the_directory_it_used() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp) = temp {
        write_reference(temp.path(), SPECIES, CODES);
        let result = parse::run_with_options(ParseOptions {
            description: "SALMON ATL FIL".to_string(),
            data_dir: Some(temp.path()),
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.command, "parse");
            assert_eq!(
                envelope.data["reference_source"],
                temp.path().display().to_string()
            );
            assert_eq!(envelope.data["record"]["species"]["name"], "Atlantic Salmon");
        }
    }
}

#[test]
fn ambiguous_country_alias_is_rejected_at_load() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp) = temp {
        let codes = CODES.replace(
            r#""CHN": {"name": "China", "aliases": ["CHINA"]}"#,
            r#""CHN": {"name": "China", "aliases": ["CHINA", "NORWAY"]}"#,
        );
        write_reference(temp.path(), SPECIES, &codes);
        let result = species::run_with_options(SpeciesOptions {
            category: None,
            data_dir: Some(temp.path()),
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "reference_ambiguous_alias");
            assert!(error.is_internal());
        }
    }
}

#[test]
fn malformed_and_missing_tables_fail_with_reference_errors() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp) = temp {
        write_reference(temp.path(), "{ not json", CODES);
        let malformed = AliasIndex::load(&ReferenceSource::Directory(temp.path().to_path_buf()));
        assert!(malformed.is_err());
        if let Err(error) = malformed {
            assert_eq!(error.code, "reference_data_invalid");
        }

        let empty = temp.path().join("empty");
        assert!(std::fs::create_dir_all(&empty).is_ok());
        let missing = AliasIndex::load(&ReferenceSource::Directory(empty));
        assert!(missing.is_err());
        if let Err(error) = missing {
            assert_eq!(error.code, "reference_data_unreadable");
        }
    }
}

#[test]
fn missing_data_dir_override_is_an_error() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp) = temp {
        let absent = temp.path().join("absent");
        let result = parse::run_with_options(ParseOptions {
            description: "SALMON".to_string(),
            data_dir: Some(&absent),
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "reference_data_unreadable");
        }
    }
}
