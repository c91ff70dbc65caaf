//! Config merge engine
//!
//! Each group merges one level deep: a key present in the override replaces
//! the base value, nested objects inside a group (`theme.colors`,
//! `slots.title_bar`) replace as a whole, and `nav` replaces as a whole.

use super::*;

/// One-level merge of an override onto a base value
pub trait Merge: Sized {
    type Partial;

    fn merge(self, partial: Self::Partial) -> Self;
}

/// Merge `partial` onto `base`. Pure and total.
pub fn merge(base: Config, partial: PartialConfig) -> Config {
    base.merge(partial)
}

fn apply<T: Merge>(base: T, partial: Option<T::Partial>) -> T {
    match partial {
        Some(p) => base.merge(p),
        None => base,
    }
}

/// Combine two optional partial groups key by key
fn stack<T: Merge<Partial = T>>(below: Option<T>, above: Option<T>) -> Option<T> {
    match (below, above) {
        (Some(b), Some(a)) => Some(b.merge(a)),
        (b, a) => a.or(b),
    }
}

impl Merge for Config {
    type Partial = PartialConfig;

    fn merge(self, p: PartialConfig) -> Self {
        Self {
            brand: apply(self.brand, p.brand),
            nav: p.nav.unwrap_or(self.nav),
            features: apply(self.features, p.features),
            theme: apply(self.theme, p.theme),
            layout: apply(self.layout, p.layout),
            slots: apply(self.slots, p.slots),
            components: apply(self.components, p.components),
            i18n: apply(self.i18n, p.i18n),
            database: apply(self.database, p.database),
            sentry: apply(self.sentry, p.sentry),
        }
    }
}

impl Merge for BrandConfig {
    type Partial = PartialBrand;

    fn merge(self, p: PartialBrand) -> Self {
        Self {
            name: p.name.unwrap_or(self.name),
            logo: p.logo.or(self.logo),
            version: p.version.or(self.version),
        }
    }
}

impl Merge for FeaturesConfig {
    type Partial = PartialFeatures;

    fn merge(self, p: PartialFeatures) -> Self {
        Self {
            updater: p.updater.unwrap_or(self.updater),
            database: p.database.unwrap_or(self.database),
            sentry: p.sentry.unwrap_or(self.sentry),
            devtools: p.devtools.unwrap_or(self.devtools),
        }
    }
}

impl Merge for ThemeConfig {
    type Partial = ThemeConfig;

    fn merge(self, p: ThemeConfig) -> Self {
        Self {
            colors: p.colors.or(self.colors),
            radius: p.radius.or(self.radius),
            font: p.font.or(self.font),
            css_variables: p.css_variables.or(self.css_variables),
        }
    }
}

impl Merge for LayoutConfig {
    type Partial = PartialLayout;

    fn merge(self, p: PartialLayout) -> Self {
        Self {
            sidebar: apply(self.sidebar, p.sidebar),
            title_bar: apply(self.title_bar, p.title_bar),
            content: apply(self.content, p.content),
        }
    }
}

impl Merge for SidebarLayout {
    type Partial = PartialSidebar;

    fn merge(self, p: PartialSidebar) -> Self {
        Self {
            width: p.width.unwrap_or(self.width),
            position: p.position.unwrap_or(self.position),
            collapsible: p.collapsible.unwrap_or(self.collapsible),
            default_collapsed: p.default_collapsed.unwrap_or(self.default_collapsed),
        }
    }
}

impl Merge for TitleBarLayout {
    type Partial = PartialTitleBar;

    fn merge(self, p: PartialTitleBar) -> Self {
        Self {
            height: p.height.unwrap_or(self.height),
            show_window_controls: p.show_window_controls.unwrap_or(self.show_window_controls),
            draggable: p.draggable.unwrap_or(self.draggable),
        }
    }
}

impl Merge for ContentLayout {
    type Partial = PartialContent;

    fn merge(self, p: PartialContent) -> Self {
        Self {
            padding: p.padding.unwrap_or(self.padding),
            max_width: p.max_width.unwrap_or(self.max_width),
        }
    }
}

impl Merge for SlotsConfig {
    type Partial = PartialSlots;

    fn merge(self, p: PartialSlots) -> Self {
        Self {
            title_bar: p.title_bar.unwrap_or(self.title_bar),
            sidebar: p.sidebar.unwrap_or(self.sidebar),
            shell: p.shell.unwrap_or(self.shell),
        }
    }
}

impl Merge for ComponentOverrides {
    type Partial = ComponentOverrides;

    fn merge(self, p: ComponentOverrides) -> Self {
        Self {
            shell: p.shell.or(self.shell),
            title_bar: p.title_bar.or(self.title_bar),
            nav_item: p.nav_item.or(self.nav_item),
        }
    }
}

impl Merge for I18nConfig {
    type Partial = I18nConfig;

    fn merge(self, p: I18nConfig) -> Self {
        Self {
            default_language: p.default_language.or(self.default_language),
            supported_languages: p.supported_languages.or(self.supported_languages),
            resources: p.resources.or(self.resources),
        }
    }
}

impl Merge for DatabaseConfig {
    type Partial = PartialDatabase;

    fn merge(self, p: PartialDatabase) -> Self {
        Self {
            name: p.name.unwrap_or(self.name),
            migrations: p.migrations.unwrap_or(self.migrations),
        }
    }
}

impl Merge for SentryConfig {
    type Partial = SentryConfig;

    fn merge(self, p: SentryConfig) -> Self {
        Self {
            dsn: p.dsn.or(self.dsn),
            traces_sample_rate: p.traces_sample_rate.or(self.traces_sample_rate),
            environment: p.environment.or(self.environment),
        }
    }
}

// Partial-on-partial stacking, used by `PartialConfig::overlay`

impl Merge for PartialConfig {
    type Partial = PartialConfig;

    fn merge(self, p: PartialConfig) -> Self {
        Self {
            brand: stack(self.brand, p.brand),
            nav: p.nav.or(self.nav),
            features: stack(self.features, p.features),
            theme: stack(self.theme, p.theme),
            layout: stack(self.layout, p.layout),
            slots: stack(self.slots, p.slots),
            components: stack(self.components, p.components),
            i18n: stack(self.i18n, p.i18n),
            database: stack(self.database, p.database),
            sentry: stack(self.sentry, p.sentry),
        }
    }
}

impl Merge for PartialBrand {
    type Partial = PartialBrand;

    fn merge(self, p: PartialBrand) -> Self {
        Self {
            name: p.name.or(self.name),
            logo: p.logo.or(self.logo),
            version: p.version.or(self.version),
        }
    }
}

impl Merge for PartialFeatures {
    type Partial = PartialFeatures;

    fn merge(self, p: PartialFeatures) -> Self {
        Self {
            updater: p.updater.or(self.updater),
            database: p.database.or(self.database),
            sentry: p.sentry.or(self.sentry),
            devtools: p.devtools.or(self.devtools),
        }
    }
}

impl Merge for PartialLayout {
    type Partial = PartialLayout;

    fn merge(self, p: PartialLayout) -> Self {
        Self {
            sidebar: stack(self.sidebar, p.sidebar),
            title_bar: stack(self.title_bar, p.title_bar),
            content: stack(self.content, p.content),
        }
    }
}

impl Merge for PartialSidebar {
    type Partial = PartialSidebar;

    fn merge(self, p: PartialSidebar) -> Self {
        Self {
            width: p.width.or(self.width),
            position: p.position.or(self.position),
            collapsible: p.collapsible.or(self.collapsible),
            default_collapsed: p.default_collapsed.or(self.default_collapsed),
        }
    }
}

impl Merge for PartialTitleBar {
    type Partial = PartialTitleBar;

    fn merge(self, p: PartialTitleBar) -> Self {
        Self {
            height: p.height.or(self.height),
            show_window_controls: p.show_window_controls.or(self.show_window_controls),
            draggable: p.draggable.or(self.draggable),
        }
    }
}

impl Merge for PartialContent {
    type Partial = PartialContent;

    fn merge(self, p: PartialContent) -> Self {
        Self {
            padding: p.padding.or(self.padding),
            max_width: p.max_width.or(self.max_width),
        }
    }
}

impl Merge for PartialSlots {
    type Partial = PartialSlots;

    fn merge(self, p: PartialSlots) -> Self {
        Self {
            title_bar: p.title_bar.or(self.title_bar),
            sidebar: p.sidebar.or(self.sidebar),
            shell: p.shell.or(self.shell),
        }
    }
}

impl Merge for PartialDatabase {
    type Partial = PartialDatabase;

    fn merge(self, p: PartialDatabase) -> Self {
        Self {
            name: p.name.or(self.name),
            migrations: p.migrations.or(self.migrations),
        }
    }
}
