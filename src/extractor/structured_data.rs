//! JSON-LD extraction and `@type` classification.
//!
//! Malformed blocks are common in the wild (minifiers, CMS templating), so a
//! block that fails to parse is retried once with newlines flattened and then
//! skipped; it never aborts the audit.

use serde_json::Value;

use super::document::DocumentModel;

pub const JSON_LD_SELECTOR: &str = "script[type='application/ld+json']";

#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    /// Number of `<script type="application/ld+json">` blocks, parsable or not.
    pub block_count: usize,
    /// Every JSON-LD object found, arrays and `@graph` flattened.
    pub objects: Vec<Value>,
    /// Distinct `@type` values in first-seen order.
    pub types: Vec<String>,
}

impl StructuredData {
    pub fn extract(doc: &impl DocumentModel) -> Self {
        let blocks = doc.select(JSON_LD_SELECTOR);
        let mut objects = Vec::new();

        for (idx, block) in blocks.iter().enumerate() {
            match parse_block(&block.text) {
                Some(value) => flatten_into(value, &mut objects),
                None => log::debug!("Skipping malformed JSON-LD block #{}", idx),
            }
        }

        let types = collect_types(&objects);
        Self {
            block_count: blocks.len(),
            objects,
            types,
        }
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    pub fn has_any_type(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_type(n))
    }
}

fn parse_block(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim())
        .or_else(|_| serde_json::from_str(&raw.replace(['\r', '\n'], " ")))
        .ok()
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_into(graph, out);
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

fn collect_types(objects: &[Value]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    let mut push = |t: &str| {
        let t = t.trim();
        if !t.is_empty() && !types.iter().any(|seen| seen == t) {
            types.push(t.to_string());
        }
    };

    for obj in objects {
        match obj.get("@type") {
            Some(Value::String(s)) => push(s.as_str()),
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).for_each(&mut push),
            _ => {}
        }
    }
    types
}
