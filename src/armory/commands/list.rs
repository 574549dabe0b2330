use crate::catalog::Catalog;
use crate::commands::{CategoryStatus, CmdResult};
use crate::error::Result;
use crate::inventory::Inventory;
use crate::probe::SystemProbe;

pub fn run<P: SystemProbe>(catalog: &Catalog, inventory: &mut Inventory<P>) -> Result<CmdResult> {
    let mut categories = Vec::new();
    for (cat_id, category) in &catalog.categories {
        if category.tools.is_empty() {
            continue;
        }
        let tools = catalog
            .tools()
            .filter(|t| t.category_id == cat_id)
            .map(|t| inventory.status(t))
            .collect();
        categories.push(CategoryStatus {
            id: cat_id.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            tools,
        });
    }
    Ok(CmdResult::default().with_categories(categories))
}
