use std::collections::HashMap;
use std::sync::RwLock;

use barstock_catalog::{BottleTemplate, Category, InventoryItem, KegSize};
use barstock_core::{CategoryId, ItemId, LocationId};
use barstock_reports::CatalogSource;

/// In-memory catalog keyed by id.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    items: RwLock<HashMap<ItemId, InventoryItem>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    templates: RwLock<HashMap<ItemId, BottleTemplate>>,
    keg_sizes: RwLock<HashMap<String, KegSize>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_item(&self, item: InventoryItem) {
        if let Ok(mut map) = self.items.write() {
            map.insert(item.id, item);
        }
    }

    pub fn upsert_category(&self, category: Category) {
        if let Ok(mut map) = self.categories.write() {
            map.insert(category.id, category);
        }
    }

    /// One template per item; a second upsert replaces the first.
    pub fn upsert_template(&self, template: BottleTemplate) {
        if let Ok(mut map) = self.templates.write() {
            map.insert(template.item_id, template);
        }
    }

    pub fn upsert_keg_size(&self, keg: KegSize) {
        if let Ok(mut map) = self.keg_sizes.write() {
            map.insert(keg.name.clone(), keg);
        }
    }
}

impl CatalogSource for MemoryCatalog {
    fn item(&self, item_id: ItemId) -> Option<InventoryItem> {
        let map = self.items.read().ok()?;
        map.get(&item_id).cloned()
    }

    fn items(&self, location_id: LocationId) -> Vec<InventoryItem> {
        let map = match self.items.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut items: Vec<InventoryItem> = map
            .values()
            .filter(|item| item.location_id == location_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        items
    }

    fn category(&self, category_id: CategoryId) -> Option<Category> {
        let map = self.categories.read().ok()?;
        map.get(&category_id).cloned()
    }

    fn bottle_template(&self, item_id: ItemId) -> Option<BottleTemplate> {
        let map = self.templates.read().ok()?;
        map.get(&item_id).cloned()
    }

    fn keg_size(&self, name: &str) -> Option<KegSize> {
        let map = self.keg_sizes.read().ok()?;
        map.get(name).cloned()
    }
}
