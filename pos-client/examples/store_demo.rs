// pos-client/examples/store_demo.rs
// Loads the store's catalog and prints each category's menu grid
//
// POS_STORE_ID=1 POS_API_URL=http://localhost:8080 POS_ACCESS_TOKEN=... \
//     cargo run -p pos-client --example store_demo
//
// Tokens may also come from a browser cookie: POS_COOKIE='accessToken=...; refreshToken=...'

use pos_client::logger::init_logger;
use pos_client::models::GridCell;
use pos_client::{CellContents, ClientConfig, MenuGrid, PosStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("info", false)?;

    let config = ClientConfig::from_env()?;
    let store = PosStore::connect(&config)?;

    let categories = match store.load_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::error!("Backend unreachable: {}", e);
            return Err(e.into());
        }
    };

    for category in &categories {
        let items = store.load_menus(category.id, false).await?;
        let grid = MenuGrid::build(&items);
        println!("== {} ({} cells)", category.name, grid.len());

        for (cell, contents) in grid.iter() {
            match contents {
                CellContents::Full(item) => {
                    println!("  {} FULL  {} {}", cell, item.menu_name, item.discounted_price());
                }
                CellContents::Half(a, b) => {
                    let second = b.map(|b| b.menu_name.as_str()).unwrap_or("-");
                    println!("  {} HALF  {} | {}", cell, a.menu_name, second);
                }
            }
        }

        let free = (0..4)
            .flat_map(|y| (0..6).map(move |x| GridCell::new(x, y)))
            .filter(|c| grid.get(*c).is_none())
            .count();
        println!("  free cells in the first 6x4: {}", free);
    }

    let layout = store.load_places().await?;
    println!("== {} places", layout.places().count());

    Ok(())
}
