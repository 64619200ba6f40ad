#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fishkey_core::{AliasIndex, AttributeRecord, builtin, parse};

pub fn bundled_index() -> Option<Arc<AliasIndex>> {
    let index = builtin();
    assert!(index.is_ok());
    index.ok()
}

pub fn parsed(raw: &str) -> AttributeRecord {
    match bundled_index() {
        Some(index) => parse(&index, raw),
        None => AttributeRecord::default(),
    }
}

pub fn species_name(raw: &str) -> Option<String> {
    parsed(raw).species_name().map(str::to_string)
}

pub fn write_file(path: &Path, body: &str) {
    let result = fs::write(path, body);
    assert!(result.is_ok());
}
