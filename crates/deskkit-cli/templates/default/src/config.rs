//! App configuration

use deskkit_core::config::{NavItem, PartialBrand, PartialConfig};

pub fn app_config() -> PartialConfig {
    PartialConfig {
        brand: Some(PartialBrand {
            name: Some("{{displayName}}".to_string()),
            ..Default::default()
        }),
        nav: Some(vec![
            NavItem::new("nav.home", "/", "home"),
            NavItem::new("nav.settings", "/settings", "settings"),
        ]),
        ..Default::default()
    }
}
