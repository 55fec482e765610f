//! Resource loading from the content store.
//!
//! The store is a directory holding one file per collection. Each collection
//! is read as `<name>.json` when present, otherwise from its legacy
//! TypeScript module. Failures never abort a run: a collection that cannot
//! be read contributes nothing, and an empty store falls back to the
//! built-in sample set.

mod json;
mod legacy;
mod sample;

use std::path::Path;

use log::{debug, info, warn};

use crate::app::validate_and_normalize_url;
use crate::error_handling::LoaderError;
use crate::models::Resource;

pub use sample::sample_resources;

/// A named collection and the files it may be stored in.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub name: &'static str,
    pub json_file: &'static str,
    pub legacy_file: &'static str,
}

/// The five collections of the content store, in load order.
pub const COLLECTIONS: [Collection; 5] = [
    Collection {
        name: "models",
        json_file: "models.json",
        legacy_file: "models.ts",
    },
    Collection {
        name: "datasets",
        json_file: "datasets.json",
        legacy_file: "datasets.ts",
    },
    Collection {
        name: "tutorials",
        json_file: "tutorials.json",
        legacy_file: "tutorials.ts",
    },
    Collection {
        name: "frameworks",
        json_file: "frameworks.json",
        legacy_file: "frameworks.ts",
    },
    Collection {
        name: "special_resources",
        json_file: "special_resources.json",
        legacy_file: "specialResources.ts",
    },
];

/// Loads every resource from the content store at `store_dir`.
///
/// Links are normalized (`https://` added when the scheme is missing). An
/// entry whose link cannot be normalized is kept verbatim so the checker
/// reports it as broken instead of it silently disappearing.
///
/// Returns the built-in sample set if the store yields zero resources.
pub async fn load_resources(store_dir: &Path) -> Vec<Resource> {
    let mut resources = Vec::new();

    for collection in COLLECTIONS {
        match load_collection(store_dir, collection).await {
            Ok(Some(found)) => {
                debug!("Loaded {} resources from {}", found.len(), collection.name);
                resources.extend(found);
            }
            Ok(None) => debug!(
                "Collection {} not present in {}",
                collection.name,
                store_dir.display()
            ),
            Err(e) => warn!("Skipping collection {}: {e}", collection.name),
        }
    }

    if resources.is_empty() {
        warn!(
            "No resources found in {}, using built-in sample data",
            store_dir.display()
        );
        return sample_resources();
    }

    for resource in &mut resources {
        if let Some(normalized) = validate_and_normalize_url(&resource.link) {
            resource.link = normalized;
        }
    }

    info!("Loaded {} resources from {}", resources.len(), store_dir.display());
    resources
}

/// Loads one collection. `Ok(None)` means neither file exists.
async fn load_collection(
    store_dir: &Path,
    collection: Collection,
) -> Result<Option<Vec<Resource>>, LoaderError> {
    let json_path = store_dir.join(collection.json_file);
    if json_path.is_file() {
        let text = read_text(&json_path).await?;
        let parsed = json::parse_collection(&text).map_err(|source| LoaderError::Json {
            path: json_path.clone(),
            source,
        })?;
        if parsed.skipped > 0 {
            warn!(
                "Skipped {} malformed entries in {}",
                parsed.skipped,
                json_path.display()
            );
        }
        let resources = parsed
            .records
            .into_iter()
            .map(|r| Resource {
                id: r.id.into_string(),
                title: r.title,
                link: r.link,
                category: r.category.filter(|c| !c.trim().is_empty()),
            })
            .collect();
        return Ok(Some(resources));
    }

    let legacy_path = store_dir.join(collection.legacy_file);
    if legacy_path.is_file() {
        let text = read_text(&legacy_path).await?;
        let resources = legacy::extract_resources(&text);
        if resources.is_empty() {
            warn!(
                "Recovered no resources from legacy source {}",
                legacy_path.display()
            );
        }
        return Ok(Some(resources));
    }

    Ok(None)
}

async fn read_text(path: &Path) -> Result<String, LoaderError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoaderError::Read {
            path: path.to_path_buf(),
            source,
        })
}
