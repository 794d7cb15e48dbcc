// ABOUTME: Growth features: landing pages with embedded analytics counters, affiliate links, campaigns, leads.
// ABOUTME: LandingPage is the one entity whose public read path also writes (view counting).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingPageKind {
    #[default]
    LeadMagnet,
    SalesPage,
    Upsell,
    Downsell,
    ThankYou,
    Webinar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    #[default]
    Blank,
    ModernVsl,
    ClassicSqueeze,
    DarkWebinar,
}

/// One step of a funnel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LandingPage {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: LandingPageKind,

    pub show_capture_form: bool,
    pub capture_title: String,
    pub capture_button_text: String,
    /// Next funnel step after a conversion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    pub views: u64,
    pub conversions: u64,

    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_scripts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PageTemplate>,
    /// Stored fields without a typed counterpart, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LandingPage {
    /// A fresh, inactive funnel step laid out for `template`.
    pub fn from_template(id: String, slug: String, template: PageTemplate) -> Self {
        let content = match template {
            PageTemplate::ModernVsl => {
                "<div class=\"text-center\"><h2>Watch the Video Below</h2></div>".to_string()
            }
            _ => String::new(),
        };
        let kind = match template {
            PageTemplate::ModernVsl => LandingPageKind::SalesPage,
            _ => LandingPageKind::LeadMagnet,
        };
        Self {
            id,
            slug,
            title: "New Funnel Step".to_string(),
            content,
            kind,
            show_capture_form: matches!(
                template,
                PageTemplate::ClassicSqueeze | PageTemplate::DarkWebinar
            ),
            capture_title: "Get Access Now".to_string(),
            capture_button_text: "Submit".to_string(),
            template: Some(template),
            ..Self::default()
        }
    }

    /// Conversions per view, as a percentage. Zero views reports 0.
    pub fn conversion_rate(&self) -> f64 {
        if self.views == 0 {
            return 0.0;
        }
        self.conversions as f64 / self.views as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliatePlacement {
    BulletinSidebar,
    AcademyHeader,
    CommunityFooter,
    #[default]
    GlobalSidebar,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffiliateLink {
    pub id: String,
    pub label: String,
    pub url: String,
    pub placement: AffiliatePlacement,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetList {
    #[default]
    All,
    Members,
    Leads,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailCampaign {
    pub id: String,
    pub subject: String,
    pub content: String,
    pub status: CampaignStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_date: Option<String>,
    pub target_list: TargetList,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An email captured by a landing page form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub email: String,
    /// Slug of the landing page that captured the lead.
    pub source: String,
    pub timestamp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
