// ABOUTME: Content item types for every persisted collection, grouped by the site feature that owns them.
// ABOUTME: All items serialize with camelCase field names to stay compatible with stored browser data.

pub mod academy;
pub mod assets;
pub mod community;
pub mod content;
pub mod funnel;
pub mod ministry;
pub mod users;

pub use academy::{Course, CourseCategory, CourseLevel, CourseStatus, Lesson, LessonResource, ResourceKind};
pub use assets::{Asset, AssetFolder, AssetKind, CascadeReport, cascade_delete_folder};
pub use community::{ChatMessage, PrayerRequest};
pub use content::{Announcement, Book, Devotional, Priority, StudyCategory, Video, WorshipSong};
pub use funnel::{
    AffiliateLink, AffiliatePlacement, CampaignStatus, EmailCampaign, LandingPage, LandingPageKind,
    Lead, PageTemplate, TargetList,
};
pub use ministry::{MinistrySchedule, ScheduleAssignments, Servant, ServantRole, StaffMember};
pub use users::{MinistryTeam, Role, User, UserProgress};
