//! Data models for Manara
//!
//! Defines the two documents the site is rendered from: `SiteContent`
//! (editable text, lists of services, quotes and so on) and `SiteSettings`
//! (theme, layout and feature toggles).
//!
//! Both serialize in camelCase, which is the format of the persisted JSON
//! files and of the HTTP bodies.
//!
//! Partial updates are expressed with `PartialSiteContent` and
//! `PartialSiteSettings`: one optional field per top-level branch. A branch
//! that is present replaces the stored branch wholesale; nested fields are
//! never merged individually.

use std::collections::BTreeSet;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the list-editing helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: ItemId },

    #[error("Feature index {index} out of range (service has {len} features)")]
    FeatureIndex { index: usize, len: usize },

    #[error("A service must keep at least one feature")]
    LastFeature,
}

/// Identifier of an item inside one of the document's lists
///
/// Minted from the wall clock in milliseconds, but always above every id
/// already present in the list, so two items added in the same millisecond
/// still get distinct ids. When a list already holds `u64::MAX` there is no
/// room above it, and the highest free id is taken instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Mint an id that is unique among `existing`
    pub fn mint(existing: impl IntoIterator<Item = ItemId>) -> Self {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        Self::mint_at(now, existing)
    }

    /// Mint an id using an explicit clock reading
    pub fn mint_at(now_ms: u64, existing: impl IntoIterator<Item = ItemId>) -> Self {
        let taken: BTreeSet<u64> = existing.into_iter().map(|id| id.0).collect();
        let Some(&max) = taken.last() else {
            return ItemId(now_ms);
        };
        match max.checked_add(1) {
            Some(floor) => ItemId(now_ms.max(floor)),
            // A list is far shorter than the id space, so a gap always exists
            None => ItemId(
                (0..u64::MAX)
                    .rev()
                    .find(|id| !taken.contains(id))
                    .unwrap_or_default(),
            ),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==================== Site content ====================

/// Everything the pages display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub site: SiteInfo,
    pub hero: Hero,
    pub about: About,
    pub services: Vec<Service>,
    pub wisdom_quotes: Vec<WisdomQuote>,
    pub contact: Contact,
    pub navigation: Vec<NavItem>,
}

/// Branding and page metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

/// Landing banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Call-to-action button label
    pub cta_text: String,
    /// Path or URL of the banner image
    pub background_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub achievements: Vec<Achievement>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub icon: String,
}

/// A headline number on the about page ("25+ years of teaching")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub value: String,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    /// Bullet points; the editor keeps at least one
    pub features: Vec<String>,
    pub icon: String,
    /// Gradient class pair used for the card, e.g. `from-blue-600 to-indigo-600`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WisdomQuote {
    pub id: ItemId,
    pub arabic: String,
    pub translation: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub whatsapp: String,
    pub social_media: SocialMedia,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub youtube: String,
    pub facebook: String,
    pub telegram: String,
}

/// One entry of the site menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub name: String,
    pub path: String,
    pub icon: String,
}

/// Partial update of `SiteContent`
///
/// Each present branch replaces the stored branch entirely. A JSON `null`
/// is treated the same as an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSiteContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Hero>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<About>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wisdom_quotes: Option<Vec<WisdomQuote>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Vec<NavItem>>,
}

impl PartialSiteContent {
    /// True when no branch is present
    pub fn is_empty(&self) -> bool {
        self.branches().is_empty()
    }

    /// Names of the branches present, in document order
    pub fn branches(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.site.is_some() {
            names.push("site");
        }
        if self.hero.is_some() {
            names.push("hero");
        }
        if self.about.is_some() {
            names.push("about");
        }
        if self.services.is_some() {
            names.push("services");
        }
        if self.wisdom_quotes.is_some() {
            names.push("wisdomQuotes");
        }
        if self.contact.is_some() {
            names.push("contact");
        }
        if self.navigation.is_some() {
            names.push("navigation");
        }
        names
    }
}

impl From<SiteContent> for PartialSiteContent {
    fn from(content: SiteContent) -> Self {
        Self {
            site: Some(content.site),
            hero: Some(content.hero),
            about: Some(content.about),
            services: Some(content.services),
            wisdom_quotes: Some(content.wisdom_quotes),
            contact: Some(content.contact),
            navigation: Some(content.navigation),
        }
    }
}

impl SiteContent {
    /// Return a copy of this document with the branches of `partial` swapped in
    pub fn merged(&self, partial: PartialSiteContent) -> Self {
        let mut next = self.clone();
        if let Some(site) = partial.site {
            next.site = site;
        }
        if let Some(hero) = partial.hero {
            next.hero = hero;
        }
        if let Some(about) = partial.about {
            next.about = about;
        }
        if let Some(services) = partial.services {
            next.services = services;
        }
        if let Some(quotes) = partial.wisdom_quotes {
            next.wisdom_quotes = quotes;
        }
        if let Some(contact) = partial.contact {
            next.contact = contact;
        }
        if let Some(navigation) = partial.navigation {
            next.navigation = navigation;
        }
        next
    }

    // ==================== List editing ====================

    /// Append a service, assigning it a fresh id
    pub fn add_service(&mut self, mut service: Service) -> ItemId {
        service.id = ItemId::mint(self.services.iter().map(|s| s.id));
        let id = service.id;
        self.services.push(service);
        id
    }

    /// Remove a service by id
    pub fn remove_service(&mut self, id: ItemId) -> Result<Service, EditError> {
        let pos = self
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or(EditError::NotFound {
                kind: "service",
                id,
            })?;
        Ok(self.services.remove(pos))
    }

    /// Append a wisdom quote, assigning it a fresh id
    pub fn add_wisdom_quote(&mut self, mut quote: WisdomQuote) -> ItemId {
        quote.id = ItemId::mint(self.wisdom_quotes.iter().map(|q| q.id));
        let id = quote.id;
        self.wisdom_quotes.push(quote);
        id
    }

    /// Remove a wisdom quote by id
    pub fn remove_wisdom_quote(&mut self, id: ItemId) -> Result<WisdomQuote, EditError> {
        let pos = self
            .wisdom_quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or(EditError::NotFound { kind: "quote", id })?;
        Ok(self.wisdom_quotes.remove(pos))
    }

    /// Append an achievement to the about branch, assigning it a fresh id
    pub fn add_achievement(&mut self, mut achievement: Achievement) -> ItemId {
        achievement.id = ItemId::mint(self.about.achievements.iter().map(|a| a.id));
        let id = achievement.id;
        self.about.achievements.push(achievement);
        id
    }

    /// Remove an achievement by id
    pub fn remove_achievement(&mut self, id: ItemId) -> Result<Achievement, EditError> {
        let pos = self
            .about
            .achievements
            .iter()
            .position(|a| a.id == id)
            .ok_or(EditError::NotFound {
                kind: "achievement",
                id,
            })?;
        Ok(self.about.achievements.remove(pos))
    }
}

impl Service {
    /// Placeholder text used when the editor adds a new feature
    pub const NEW_FEATURE: &'static str = "ميزة جديدة";

    /// A new service card as the editor creates it
    ///
    /// The id is a placeholder; `SiteContent::add_service` assigns the real one.
    pub fn placeholder() -> Self {
        Self {
            id: ItemId(0),
            title: "خدمة جديدة".to_string(),
            description: "وصف الخدمة الجديدة".to_string(),
            features: vec!["ميزة 1".to_string(), "ميزة 2".to_string()],
            icon: "📚".to_string(),
            color: "from-blue-600 to-purple-600".to_string(),
        }
    }

    /// Append a feature
    pub fn add_feature(&mut self, feature: impl Into<String>) {
        self.features.push(feature.into());
    }

    /// Replace the feature at `index`
    pub fn update_feature(
        &mut self,
        index: usize,
        feature: impl Into<String>,
    ) -> Result<(), EditError> {
        let len = self.features.len();
        let slot = self
            .features
            .get_mut(index)
            .ok_or(EditError::FeatureIndex { index, len })?;
        *slot = feature.into();
        Ok(())
    }

    /// Remove the feature at `index`, refusing to remove the last one
    pub fn remove_feature(&mut self, index: usize) -> Result<String, EditError> {
        let len = self.features.len();
        if index >= len {
            return Err(EditError::FeatureIndex { index, len });
        }
        if len == 1 {
            return Err(EditError::LastFeature);
        }
        Ok(self.features.remove(index))
    }
}

// ==================== Site settings ====================

/// Theme, layout and feature switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub theme: Theme,
    pub layout: Layout,
    pub design: Design,
    pub seo: Seo,
    pub features: Features,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
    pub gradients: ThemeGradients,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub muted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFonts {
    pub arabic: String,
    pub decorative: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeGradients {
    pub primary: String,
    pub hero: String,
    pub card: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// `rtl` or `ltr`
    pub direction: String,
    pub header_style: String,
    pub footer_style: String,
    pub show_scroll_indicator: bool,
    pub show_floating_elements: bool,
    pub enable_animations: bool,
    pub animation_speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub background_type: String,
    pub enable_particles: bool,
    pub enable_floating_elements: bool,
    pub border_radius: String,
    pub spacing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub og_image: String,
}

/// Toggles controlling the editing affordances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub admin_mode: bool,
    pub live_edit: bool,
    pub dark_mode: bool,
    pub analytics: bool,
}

/// Partial update of `SiteSettings`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSiteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<Design>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
}

impl PartialSiteSettings {
    pub fn is_empty(&self) -> bool {
        self.branches().is_empty()
    }

    pub fn branches(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.theme.is_some() {
            names.push("theme");
        }
        if self.layout.is_some() {
            names.push("layout");
        }
        if self.design.is_some() {
            names.push("design");
        }
        if self.seo.is_some() {
            names.push("seo");
        }
        if self.features.is_some() {
            names.push("features");
        }
        names
    }
}

impl From<SiteSettings> for PartialSiteSettings {
    fn from(settings: SiteSettings) -> Self {
        Self {
            theme: Some(settings.theme),
            layout: Some(settings.layout),
            design: Some(settings.design),
            seo: Some(settings.seo),
            features: Some(settings.features),
        }
    }
}

impl SiteSettings {
    /// Return a copy of these settings with the branches of `partial` swapped in
    pub fn merged(&self, partial: PartialSiteSettings) -> Self {
        let mut next = self.clone();
        if let Some(theme) = partial.theme {
            next.theme = theme;
        }
        if let Some(layout) = partial.layout {
            next.layout = layout;
        }
        if let Some(design) = partial.design {
            next.design = design;
        }
        if let Some(seo) = partial.seo {
            next.seo = seo;
        }
        if let Some(features) = partial.features {
            next.features = features;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_is_above_existing_ids() {
        let existing = [ItemId(5), ItemId(1_000), ItemId(7)];
        assert_eq!(ItemId::mint_at(10, existing), ItemId(1_001));
        assert_eq!(ItemId::mint_at(5_000, existing), ItemId(5_000));
        assert_eq!(ItemId::mint_at(42, []), ItemId(42));
    }

    #[test]
    fn test_mint_with_max_id_present() {
        let existing = [ItemId(3), ItemId(u64::MAX)];
        assert_eq!(ItemId::mint_at(10, existing), ItemId(u64::MAX - 1));

        let crowded = [ItemId(u64::MAX), ItemId(u64::MAX - 1), ItemId(u64::MAX - 2)];
        assert_eq!(ItemId::mint_at(10, crowded), ItemId(u64::MAX - 3));

        let mut content = SiteContent::default();
        content.services[0].id = ItemId(u64::MAX);
        let a = content.add_service(Service::placeholder());
        let b = content.add_service(Service::placeholder());
        let mut ids: Vec<_> = content.services.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), content.services.len());
        assert_ne!(a, ItemId(u64::MAX));
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_service_ids_never_collide() {
        let mut content = SiteContent::default();
        let a = content.add_service(Service::placeholder());
        let b = content.add_service(Service::placeholder());
        let c = content.add_wisdom_quote(content.wisdom_quotes[0].clone());
        let d = content.add_wisdom_quote(content.wisdom_quotes[0].clone());
        let e = content.add_achievement(content.about.achievements[0].clone());
        let f = content.add_achievement(content.about.achievements[0].clone());

        assert_ne!(a, b);
        assert_ne!(c, d);
        assert_ne!(e, f);

        let mut ids: Vec<_> = content.services.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), content.services.len());
    }

    #[test]
    fn test_remove_service() {
        let mut content = SiteContent::default();
        let id = content.add_service(Service::placeholder());
        let before = content.services.len();

        let removed = content.remove_service(id).unwrap();
        assert_eq!(removed.title, "خدمة جديدة");
        assert_eq!(content.services.len(), before - 1);

        assert_eq!(
            content.remove_service(id),
            Err(EditError::NotFound {
                kind: "service",
                id
            })
        );
    }

    #[test]
    fn test_remove_last_feature_is_refused() {
        let mut service = Service::placeholder();
        assert_eq!(service.remove_feature(0).unwrap(), "ميزة 1");
        assert_eq!(service.remove_feature(0), Err(EditError::LastFeature));
        assert_eq!(service.features, vec!["ميزة 2".to_string()]);

        assert_eq!(
            service.remove_feature(3),
            Err(EditError::FeatureIndex { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_update_and_add_feature() {
        let mut service = Service::placeholder();
        service.add_feature(Service::NEW_FEATURE);
        service.update_feature(0, "تحفيظ متدرج").unwrap();

        assert_eq!(service.features.len(), 3);
        assert_eq!(service.features[0], "تحفيظ متدرج");
        assert_eq!(service.features[2], Service::NEW_FEATURE);
        assert!(service.update_feature(9, "x").is_err());
    }

    #[test]
    fn test_merged_replaces_branch_wholesale() {
        let content = SiteContent::default();
        let new_about = About {
            title: "عنوان".to_string(),
            subtitle: String::new(),
            description: String::new(),
            achievements: Vec::new(),
            stats: Vec::new(),
        };

        let merged = content.merged(PartialSiteContent {
            about: Some(new_about.clone()),
            ..Default::default()
        });

        assert_eq!(merged.about, new_about);
        assert_eq!(merged.hero, content.hero);
        assert_eq!(merged.services, content.services);
    }

    #[test]
    fn test_partial_deserializes_camel_case_and_null() {
        let json = r#"{"wisdomQuotes": [], "hero": null}"#;
        let partial: PartialSiteContent = serde_json::from_str(json).unwrap();

        assert_eq!(partial.wisdom_quotes, Some(Vec::new()));
        assert!(partial.hero.is_none());
        assert_eq!(partial.branches(), vec!["wisdomQuotes"]);
    }

    #[test]
    fn test_partial_rejects_incomplete_branch() {
        // Branches are replaced wholesale, so every field must be supplied
        let json = r#"{"hero": {"title": "only a title"}}"#;
        assert!(serde_json::from_str::<PartialSiteContent>(json).is_err());
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let settings = SiteSettings::default();
        let value = serde_json::to_value(&settings).unwrap();

        assert!(value["layout"]["showScrollIndicator"].is_boolean());
        assert!(value["features"]["adminMode"].is_boolean());
        assert!(value["seo"]["ogImage"].is_string());
    }

    #[test]
    fn test_settings_merged() {
        let settings = SiteSettings::default();
        let mut features = settings.features.clone();
        features.admin_mode = true;
        features.live_edit = true;

        let partial = PartialSiteSettings {
            features: Some(features.clone()),
            ..Default::default()
        };
        assert_eq!(partial.branches(), vec!["features"]);

        let merged = settings.merged(partial);
        assert_eq!(merged.features, features);
        assert_eq!(merged.theme, settings.theme);
    }
}
