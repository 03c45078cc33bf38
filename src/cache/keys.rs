//! 缓存键与写操作对应的失效集合

use uuid::Uuid;

pub const ANALYTICS_OVERVIEW: &str = "analytics:overview";
pub const SUBSCRIPTION_PLANS: &str = "subscription-plans";

pub fn categories(restaurant_id: Uuid) -> String {
    format!("categories:{}", restaurant_id)
}

pub fn menu_items(restaurant_id: Uuid) -> String {
    format!("menu-items:{}", restaurant_id)
}

pub fn payment_methods(restaurant_id: Uuid) -> String {
    format!("payment-methods:{}", restaurant_id)
}

pub fn dashboard(restaurant_id: Uuid) -> String {
    format!("dashboard:{}", restaurant_id)
}

pub fn public_menu(restaurant_id: Uuid) -> String {
    format!("public-menu:{}", restaurant_id)
}

/// 分类变更会影响菜品列表（菜品里带分类信息）
pub fn on_category_write(restaurant_id: Uuid) -> Vec<String> {
    vec![
        categories(restaurant_id),
        dashboard(restaurant_id),
        public_menu(restaurant_id),
        menu_items(restaurant_id),
    ]
}

pub fn on_menu_item_write(restaurant_id: Uuid) -> Vec<String> {
    vec![
        menu_items(restaurant_id),
        dashboard(restaurant_id),
        public_menu(restaurant_id),
    ]
}

pub fn on_payment_method_write(restaurant_id: Uuid) -> Vec<String> {
    vec![
        payment_methods(restaurant_id),
        dashboard(restaurant_id),
        public_menu(restaurant_id),
    ]
}

pub fn on_order_write(restaurant_id: Uuid) -> Vec<String> {
    vec![dashboard(restaurant_id), ANALYTICS_OVERVIEW.to_string()]
}

pub fn on_settings_write(restaurant_id: Uuid) -> Vec<String> {
    vec![dashboard(restaurant_id), public_menu(restaurant_id)]
}

pub fn on_admin_restaurant_write(restaurant_id: Uuid) -> Vec<String> {
    vec![
        dashboard(restaurant_id),
        public_menu(restaurant_id),
        ANALYTICS_OVERVIEW.to_string(),
    ]
}

pub fn on_plan_write() -> Vec<String> {
    vec![SUBSCRIPTION_PLANS.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        let rid = Uuid::nil();
        assert_eq!(
            categories(rid),
            "categories:00000000-0000-0000-0000-000000000000"
        );
        assert!(public_menu(rid).starts_with("public-menu:"));
    }

    #[test]
    fn test_category_write_also_drops_menu_items() {
        let rid = Uuid::new_v4();
        let keys = on_category_write(rid);
        assert!(keys.contains(&menu_items(rid)));
        assert!(keys.contains(&dashboard(rid)));
        assert!(!keys.contains(&payment_methods(rid)));
    }

    #[test]
    fn test_order_write_drops_platform_overview() {
        let keys = on_order_write(Uuid::new_v4());
        assert!(keys.contains(&ANALYTICS_OVERVIEW.to_string()));
        assert_eq!(keys.len(), 2);
    }
}
