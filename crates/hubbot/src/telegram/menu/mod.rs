//! Menu panels and keyboards
//!
//! Text dispatch is an exact-match lookup over the six reply-keyboard
//! labels; everything else falls back to "use the menu". The labels and the
//! welcome blurbs live on `MenuAction` so the keyboard, the welcome panel
//! and the dispatcher can never drift apart.

pub mod callback_router;
pub mod categories;
pub mod dashboard;
pub mod helpers;
pub mod info;
pub mod main_menu;
pub mod pro;

use strum::{EnumIter, IntoEnumIterator};

/// The six main-menu entries, in keyboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MenuAction {
    BrowseFreelancers,
    PostJob,
    Categories,
    UpgradeToPro,
    MyDashboard,
    HelpCenter,
}

impl MenuAction {
    /// The reply-keyboard label, matched verbatim against inbound text.
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::BrowseFreelancers => "🔍 Browse Freelancers",
            MenuAction::PostJob => "📌 Post a Job",
            MenuAction::Categories => "🗂 Categories",
            MenuAction::UpgradeToPro => "⭐ Upgrade to Pro",
            MenuAction::MyDashboard => "📊 My Dashboard",
            MenuAction::HelpCenter => "🛟 Help Center",
        }
    }

    /// One-line description shown next to the label on the welcome panel.
    /// Pre-escaped for MarkdownV2.
    pub fn blurb(&self) -> &'static str {
        match self {
            MenuAction::BrowseFreelancers => "find vetted experts for your project",
            MenuAction::PostJob => "start a new project listing",
            MenuAction::Categories => "explore all skills and services",
            MenuAction::UpgradeToPro => "unlock premium features",
            MenuAction::MyDashboard => "manage your jobs & earnings",
            MenuAction::HelpCenter => "get support",
        }
    }

    /// Resolve inbound text by exact label equality.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::iter().find(|action| action.label() == text)
    }
}

/// Validate the label set at startup: non-empty and unique labels.
pub fn validate_labels() -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for action in MenuAction::iter() {
        let label = action.label();
        if label.trim().is_empty() {
            return Err(format!("menu action {:?} has an empty label", action));
        }
        if !seen.insert(label) {
            return Err(format!("duplicate menu label '{}'", label));
        }
    }
    Ok(())
}
