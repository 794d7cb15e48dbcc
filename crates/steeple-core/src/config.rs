// ABOUTME: The site configuration singleton: every page's display text, theme, SEO, and automation settings.
// ABOUTME: Stored copies may be partial; consumers merge them over the defaults one field at a time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    Flat,
    #[default]
    Glass,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationProvider {
    #[default]
    Internal,
    Mailchimp,
    Aweber,
    Getresponse,
}

/// The complete, renderable site configuration. Every field is an independent
/// scalar; none is derived from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    // Identity
    pub church_name: String,
    pub legal_church_name: String,
    pub logo_text: String,
    pub logo_image_url: String,
    pub logo_alt: String,
    pub splash_background_image_url: String,
    pub splash_alt: String,
    pub favicon_url: String,
    pub app_icon_url: String,
    pub service_times: String,
    pub location_address: String,
    pub location_phone: String,
    pub location_email: String,
    pub worship_link: String,
    pub mission_statement: String,
    pub vision_statement: String,
    pub denominational_alignment: String,
    pub established_date: String,
    pub tax_ein: String,
    pub global_custom_html: String,

    // Social
    pub facebook_url: String,
    pub instagram_url: String,
    pub youtube_url: String,
    pub twitter_url: String,
    pub tiktok_url: String,

    // Theme
    pub primary_color: String,
    pub accent_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub surface_color: String,
    pub text_primary_color: String,
    pub text_secondary_color: String,
    #[serde(rename = "remnantRadius")]
    pub corner_radius: String,
    pub header_style: HeaderStyle,
    pub base_font_size: String,
    pub heading_font: String,
    pub body_font: String,

    // Home
    pub welcome_title: String,
    pub welcome_subtitle: String,
    pub welcome_video_url: String,
    pub welcome_video_embed_code: String,
    pub home_card1_title: String,
    pub home_card1_body: String,
    pub home_card2_title: String,
    pub home_card2_body: String,
    pub home_card3_title: String,
    pub home_card3_body: String,
    pub home_custom_html: String,

    // Staff
    pub staff_page_title: String,
    pub staff_page_subtitle: String,
    pub staff_custom_html: String,

    // Announcements
    pub announcements_title: String,
    pub announcements_subtitle: String,
    pub announcements_custom_html: String,

    // Store
    pub store_title: String,
    pub store_subtitle: String,
    pub store_custom_html: String,

    // Devotionals
    pub devotional_page_title: String,
    pub devotional_page_subtitle: String,
    pub devotional_banner_text: String,
    pub devotional_custom_html: String,

    // Podcast
    pub podcast_title: String,
    pub podcast_subtitle: String,
    pub podcast_banner_image: String,
    pub podcast_banner_alt: String,
    pub podcast_schedule: String,
    pub podcast_youtube_link: String,
    pub podcast_facebook_link: String,
    pub pastor_facebook_link: String,
    pub pastor_bio_title: String,
    pub pastor_bio_body: String,
    pub podcast_custom_html: String,

    // Academy
    pub academy_title: String,
    pub academy_subtitle: String,
    pub academy_banner_image: String,
    pub academy_banner_alt: String,
    pub academy_benefit1: String,
    pub academy_benefit2: String,
    pub academy_benefit3: String,
    pub academy_benefit4: String,
    pub academy_price_text: String,
    pub academy_monthly_price: String,
    pub academy_join_button_text: String,
    pub academy_scholarship_text: String,
    pub instructor_bio: String,
    pub academy_custom_html: String,

    // Giving
    pub giving_title: String,
    pub giving_subtitle: String,
    pub giving_url: String,
    pub giving_body_title: String,
    pub giving_body_text: String,
    pub giving_benefit1: String,
    pub giving_benefit2: String,
    pub giving_benefit3: String,
    pub giving_benefit4: String,
    pub giving_button_text: String,
    pub giving_secure_title: String,
    pub giving_secure_text: String,
    pub giving_theology_title: String,
    pub giving_theology_text: String,
    pub giving_custom_html: String,

    // Prayer
    pub prayer_title: String,
    pub prayer_subtitle: String,
    pub prayer_placeholder: String,
    pub prayer_feed_title: String,
    pub prayer_custom_html: String,

    // Community
    pub community_title: String,
    pub community_subtitle: String,
    pub chat_rules: String,
    pub chat_join_button_text: String,
    pub community_custom_html: String,

    // Bible study
    pub study_library_title: String,
    pub study_library_subtitle: String,
    pub study_register_button_text: String,
    pub study_custom_html: String,

    // Worship team
    pub worship_team_title: String,
    pub worship_team_subtitle: String,
    pub worship_custom_html: String,

    // Growth & automation
    pub automation_provider: AutomationProvider,
    pub automation_api_key: String,
    pub automation_list_id: String,
    pub lead_capture_active: bool,
    pub lead_capture_title: String,
    pub lead_capture_subtitle: String,

    // SEO
    pub seo_description: String,
    pub seo_keywords: String,
    pub schema_json_ld: String,
    pub google_analytics_id: String,
    pub og_image: String,

    /// Stored keys this version of the model does not know. Kept so a config
    /// written by a newer schema survives a load and save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const LOGO_URL: &str = "/static/logo.png";

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            church_name: "Grace Community Church".into(),
            legal_church_name: "Grace Community Church, Inc.".into(),
            logo_text: "GCC".into(),
            logo_image_url: LOGO_URL.into(),
            logo_alt: "Grace Community Church logo".into(),
            splash_background_image_url: "/static/splash.jpg".into(),
            splash_alt: "Sanctuary at sunrise".into(),
            favicon_url: LOGO_URL.into(),
            app_icon_url: LOGO_URL.into(),
            service_times: "Sundays @ 10:00 AM".into(),
            location_address: "100 Main Street, Springfield".into(),
            location_phone: "(555) 555-0100".into(),
            location_email: "office@example.org".into(),
            worship_link: String::new(),
            mission_statement: "To know Christ and make Him known in our city and beyond.".into(),
            vision_statement: "A church where every member is equipped for ministry.".into(),
            denominational_alignment: "Non-denominational".into(),
            established_date: "Est. 2024".into(),
            tax_ein: String::new(),
            global_custom_html: String::new(),

            facebook_url: String::new(),
            instagram_url: String::new(),
            youtube_url: String::new(),
            twitter_url: String::new(),
            tiktok_url: String::new(),

            primary_color: "#1e3a8a".into(),
            accent_color: "#3b82f6".into(),
            secondary_color: "#0f172a".into(),
            background_color: "#f8fafc".into(),
            surface_color: "#ffffff".into(),
            text_primary_color: "#1e293b".into(),
            text_secondary_color: "#64748b".into(),
            corner_radius: "2.5rem".into(),
            header_style: HeaderStyle::Glass,
            base_font_size: "16px".into(),
            heading_font: "Bebas Neue".into(),
            body_font: "Inter".into(),

            welcome_title: "WELCOME HOME".into(),
            welcome_subtitle: "A family of believers gathering to worship, learn, and serve.".into(),
            welcome_video_url: String::new(),
            welcome_video_embed_code: String::new(),
            home_card1_title: "SUNDAY GATHERING".into(),
            home_card1_body: "Worship and teaching every Sunday morning.".into(),
            home_card2_title: "OUR CAMPUS".into(),
            home_card2_body: "Serving Springfield and the surrounding region.".into(),
            home_card3_title: "WORSHIP".into(),
            home_card3_body: "Songs and recordings from our worship team.".into(),
            home_custom_html: String::new(),

            staff_page_title: "Leadership".into(),
            staff_page_subtitle: "Meet the people who serve our church.".into(),
            staff_custom_html: String::new(),

            announcements_title: "Bulletins".into(),
            announcements_subtitle: "Updates from the elders.".into(),
            announcements_custom_html: String::new(),

            store_title: "Resource Store".into(),
            store_subtitle: "Books and study guides for download.".into(),
            store_custom_html: String::new(),

            devotional_page_title: "Daily Devotional".into(),
            devotional_page_subtitle: "A word for each day.".into(),
            devotional_banner_text: "Devotional Broadcast".into(),
            devotional_custom_html: String::new(),

            podcast_title: "Church Podcast".into(),
            podcast_subtitle: "Conversations on scripture and everyday faith.".into(),
            podcast_banner_image: "/static/podcast.jpg".into(),
            podcast_banner_alt: "Podcast studio".into(),
            podcast_schedule: "Wednesdays @ 7:00 PM".into(),
            podcast_youtube_link: String::new(),
            podcast_facebook_link: String::new(),
            pastor_facebook_link: String::new(),
            pastor_bio_title: "Our Pastor".into(),
            pastor_bio_body: "Our senior pastor has served this congregation since its founding.".into(),
            podcast_custom_html: String::new(),

            academy_title: "Bible Academy".into(),
            academy_subtitle: "Online courses for discipleship.".into(),
            academy_banner_image: "/static/academy.jpg".into(),
            academy_banner_alt: "Classroom with open bibles".into(),
            academy_benefit1: "Private Prayer List".into(),
            academy_benefit2: "Free E-Book".into(),
            academy_benefit3: "Early Access Content".into(),
            academy_benefit4: "Full Library Access".into(),
            academy_price_text: "Enrollment Fee".into(),
            academy_monthly_price: "27.00".into(),
            academy_join_button_text: "Join Academy".into(),
            academy_scholarship_text: "Scholarships are available on request.".into(),
            instructor_bio: "Courses are taught by our pastoral staff.".into(),
            academy_custom_html: String::new(),

            giving_title: "Online Giving".into(),
            giving_subtitle: "Each one should give what he has decided in his heart to give.".into(),
            giving_url: String::new(),
            giving_body_title: "Tithe & Offering".into(),
            giving_body_text: "Your generosity supports ministry here and abroad.".into(),
            giving_benefit1: "Global Missions".into(),
            giving_benefit2: "Community Outreach".into(),
            giving_benefit3: "Academy Scholarships".into(),
            giving_benefit4: "Building Fund".into(),
            giving_button_text: "Give Online".into(),
            giving_secure_title: "Secure Processing".into(),
            giving_secure_text: "All donations are encrypted.".into(),
            giving_theology_title: "Why We Give".into(),
            giving_theology_text: "Giving is an act of worship.".into(),
            giving_custom_html: String::new(),

            prayer_title: "Send a Prayer Request".into(),
            prayer_subtitle: "Our intercessors pray over every request.".into(),
            prayer_placeholder: "Write your request...".into(),
            prayer_feed_title: "Prayer Wall".into(),
            prayer_custom_html: String::new(),

            community_title: "Community".into(),
            community_subtitle: "Moderated chat for members.".into(),
            chat_rules: "Welcome! Please keep conversation kind and respectful.".into(),
            chat_join_button_text: "Join Chat".into(),
            community_custom_html: String::new(),

            study_library_title: "Study Library".into(),
            study_library_subtitle: "Archived teachings by topic.".into(),
            study_register_button_text: "Register Study".into(),
            study_custom_html: String::new(),

            worship_team_title: "Worship Team".into(),
            worship_team_subtitle: "Songs, keys, and chord charts.".into(),
            worship_custom_html: String::new(),

            automation_provider: AutomationProvider::Internal,
            automation_api_key: String::new(),
            automation_list_id: String::new(),
            lead_capture_active: false,
            lead_capture_title: "Stay Connected".into(),
            lead_capture_subtitle: "Receive devotionals directly in your inbox.".into(),

            seo_description: "Grace Community Church in Springfield: worship, teaching, and community.".into(),
            seo_keywords: "church, Springfield, worship, bible study".into(),
            schema_json_ld: String::new(),
            google_analytics_id: String::new(),
            og_image: LOGO_URL.into(),

            extra: Map::new(),
        }
    }
}

impl SiteConfig {
    /// Stored names of every modeled field, excluding `extra`. Derived from
    /// the serialized defaults, so it cannot drift from the struct.
    pub fn field_names() -> Vec<String> {
        StoredConfig::from(&SiteConfig::default())
            .0
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// Merge a stored, possibly partial configuration over the defaults.
    ///
    /// Fields absent from `stored` take their default. A stored field whose
    /// value does not fit the model (wrong JSON type, unknown enum value) is
    /// dropped with a warning and its default is used; the other stored fields
    /// still apply.
    pub fn merged(stored: &StoredConfig) -> SiteConfig {
        match serde_json::from_value::<SiteConfig>(Value::Object(stored.0.clone())) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("stored config does not fit the model ({}), merging field by field", e);
                let mut accepted = Map::new();
                for (key, value) in &stored.0 {
                    let mut trial = accepted.clone();
                    trial.insert(key.clone(), value.clone());
                    if serde_json::from_value::<SiteConfig>(Value::Object(trial.clone())).is_ok() {
                        accepted = trial;
                    } else {
                        tracing::warn!(field = %key, "ignoring stored config field with incompatible value");
                    }
                }
                serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
            }
        }
    }
}

/// Whatever configuration record is stored, exactly as stored: possibly
/// partial, never merged. Consumers call `SiteConfig::merged` themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredConfig(pub Map<String, Value>);

impl StoredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Shorthand for `SiteConfig::merged(self)`.
    pub fn merge_with_defaults(&self) -> SiteConfig {
        SiteConfig::merged(self)
    }
}

impl From<&SiteConfig> for StoredConfig {
    fn from(config: &SiteConfig) -> Self {
        match serde_json::to_value(config) {
            Ok(Value::Object(map)) => StoredConfig(map),
            _ => StoredConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_object() -> Map<String, Value> {
        match serde_json::to_value(SiteConfig::default()).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {:?}", other),
        }
    }

    /// A value of the same JSON type as `value` that differs from it.
    fn different_value(field: &str, value: &Value) -> Value {
        match (field, value) {
            ("headerStyle", _) => Value::from("flat"),
            ("automationProvider", _) => Value::from("mailchimp"),
            (_, Value::Bool(b)) => Value::Bool(!b),
            (_, Value::String(s)) => Value::String(format!("{}-override", s)),
            (_, other) => panic!("unexpected config field type for {}: {:?}", field, other),
        }
    }

    #[test]
    fn defaults_cover_every_field() {
        let obj = default_object();
        assert_eq!(obj.len(), SiteConfig::field_names().len());
        assert!(obj.values().all(|v| v.is_string() || v.is_boolean()));

        // A config naming every field leaves nothing to the catch-all map.
        let full = SiteConfig::merged(&StoredConfig(obj));
        assert!(full.extra.is_empty());
        assert_eq!(full, SiteConfig::default());
    }

    #[test]
    fn every_field_name_decodes_as_a_typed_field() {
        let defaults = default_object();
        for name in SiteConfig::field_names() {
            let mut stored = StoredConfig::new();
            stored.insert(name.clone(), defaults[&name].clone());
            let merged = SiteConfig::merged(&stored);
            assert!(merged.extra.is_empty(), "{} landed in extra", name);
        }
    }

    #[test]
    fn empty_store_merges_to_defaults() {
        assert_eq!(SiteConfig::merged(&StoredConfig::new()), SiteConfig::default());
    }

    #[test]
    fn single_stored_field_overrides_only_itself() {
        let defaults = default_object();
        for (field, default_value) in &defaults {
            let replacement = different_value(field, default_value);
            let mut stored = StoredConfig::new();
            stored.insert(field.clone(), replacement.clone());

            let merged = serde_json::to_value(SiteConfig::merged(&stored)).unwrap();
            let merged = merged.as_object().unwrap();

            assert_eq!(merged.len(), defaults.len(), "field {}", field);
            for (other, other_default) in &defaults {
                if other == field {
                    assert_eq!(&merged[other], &replacement, "field {} not overridden", field);
                } else {
                    assert_eq!(&merged[other], other_default, "field {} leaked into {}", field, other);
                }
            }
        }
    }

    #[test]
    fn partial_config_keeps_church_name_and_defaults_the_rest() {
        let mut stored = StoredConfig::new();
        stored.insert("churchName", "Test Church");

        let merged = SiteConfig::merged(&stored);

        assert_eq!(merged.church_name, "Test Church");
        let expected = SiteConfig {
            church_name: "Test Church".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(merged, expected);
    }

    #[test]
    fn incompatible_field_falls_back_to_default_without_losing_others() {
        let mut stored = StoredConfig::new();
        stored.insert("churchName", "Test Church");
        stored.insert("primaryColor", 42);
        stored.insert("headerStyle", "neon");

        let merged = SiteConfig::merged(&stored);

        assert_eq!(merged.church_name, "Test Church");
        assert_eq!(merged.primary_color, SiteConfig::default().primary_color);
        assert_eq!(merged.header_style, HeaderStyle::Glass);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let mut stored = StoredConfig::new();
        stored.insert("futureBannerText", "Coming soon");

        let merged = SiteConfig::merged(&stored);
        assert_eq!(merged.extra["futureBannerText"], "Coming soon");

        let back = StoredConfig::from(&merged);
        assert_eq!(back.get("futureBannerText"), Some(&Value::from("Coming soon")));
        assert_eq!(back.len(), SiteConfig::field_names().len() + 1);
    }

    #[test]
    fn corner_radius_keeps_stored_name() {
        let obj = default_object();
        assert!(obj.contains_key("remnantRadius"));
        assert!(obj.contains_key("homeCard1Title"));
        assert!(obj.contains_key("schemaJsonLd"));
    }
}
