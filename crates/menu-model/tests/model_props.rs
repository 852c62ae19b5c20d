use menu_model::{desserts_first, Category, ItemId, MenuData, MenuItem, MenuPayload, ThemeConfig};
use proptest::prelude::*;

fn category_list() -> impl Strategy<Value = (Vec<Category>, usize)> {
    (0usize..8).prop_flat_map(|others| {
        (Just(others), 0..=others).prop_map(|(others, pos)| {
            let mut cats: Vec<Category> = (0..others)
                .map(|i| Category::new(format!("c{i}").as_str(), format!("C{i}")))
                .collect();
            cats.insert(pos, Category::new("desserts", "Desserts"));
            (cats, pos)
        })
    })
}

proptest! {
    #[test]
    fn desserts_always_first_others_keep_order((cats, _pos) in category_list()) {
        let others_before: Vec<String> = cats
            .iter()
            .filter(|c| !c.id.is_desserts())
            .map(|c| c.id.to_string())
            .collect();

        let mut sorted = cats.clone();
        desserts_first(&mut sorted);

        prop_assert!(sorted[0].id.is_desserts());
        let others_after: Vec<String> = sorted[1..].iter().map(|c| c.id.to_string()).collect();
        prop_assert_eq!(others_before, others_after);
    }

    #[test]
    fn export_import_roundtrip(prices in prop::collection::vec(0u32..100_000, 0..12)) {
        let mut menu = MenuData::default();
        menu.categories.push(Category::new("desserts", "Desserts"));
        menu.categories.push(Category::new("mains", "Mains"));
        for (i, cents) in prices.iter().enumerate() {
            let category = if i % 2 == 0 { "mains" } else { "desserts" };
            menu.menu_items.push(MenuItem::new(
                ItemId(i as u64 + 1),
                category,
                format!("Dish {i}"),
                f64::from(*cents) / 100.0,
            ));
        }
        let payload = MenuPayload::compose(menu, ThemeConfig::default());

        let text = payload.to_pretty_json().unwrap();
        let back = MenuPayload::from_json(&text).unwrap();
        prop_assert_eq!(back, payload);
    }
}
