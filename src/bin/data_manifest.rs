//! Per-document manifest for content authors: digest, collection sizes and
//! duplicate ids, one JSON object per data document.

use robosite::loader::{extract, parse_document, sha256_hex};
use robosite::model::EntityId;
use robosite::{Config, DomainSchema};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::PathBuf;

fn duplicate_ids(records: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for r in records {
        if let Some(id) = r.get("id").and_then(EntityId::from_value) {
            let id = id.to_string();
            if !seen.insert(id.clone()) && !dups.contains(&id) {
                dups.push(id);
            }
        }
    }
    dups
}

fn main() {
    let cfg = Config::from_env();
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.data_dir.clone());

    let mut by_document: BTreeMap<&'static str, Vec<DomainSchema>> = BTreeMap::new();
    for schema in DomainSchema::all(cfg.caps) {
        by_document.entry(schema.document).or_default().push(schema);
    }

    let mut failures = 0;
    let mut manifest = Vec::new();
    for (document, schemas) in by_document {
        let path = data_dir.join(document);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(err) => {
                eprintln!("cannot read {}: {}", path.display(), err);
                failures += 1;
                manifest.push(json!({ "document": document, "error": err.to_string() }));
                continue;
            }
        };
        let doc = match parse_document(document, &text) {
            Ok(d) => d,
            Err(err) => {
                eprintln!("{}", err);
                failures += 1;
                manifest.push(json!({
                    "document": document,
                    "sha256": sha256_hex(text.as_bytes()),
                    "error": err.to_string(),
                }));
                continue;
            }
        };

        let mut collections = Map::new();
        for schema in schemas {
            let entry = match extract(&doc, schema.shape) {
                Ok(records) => json!({
                    "records": records.len(),
                    "duplicate_ids": duplicate_ids(&records),
                }),
                Err(err) => {
                    failures += 1;
                    json!({ "error": err.to_string() })
                }
            };
            collections.insert(schema.name.to_string(), entry);
        }
        manifest.push(json!({
            "document": document,
            "bytes": text.len(),
            "sha256": doc.sha256,
            "collections": collections,
        }));
    }

    match serde_json::to_string_pretty(&manifest) {
        Ok(s) => println!("{}", s),
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(4);
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}
