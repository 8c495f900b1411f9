//! Static category table
//!
//! The marketplace offers a fixed set of categories. They are configuration
//! data, not computed: the dispatcher renders the inline grid from this
//! table and resolves `category_<slug>` callbacks against it.

/// A single marketplace category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Stable identifier carried in callback data (`category_<slug>`)
    pub slug: &'static str,
    /// Display label with icon, shown on the inline button
    pub label: &'static str,
}

static CATEGORIES: [Category; 8] = [
    Category {
        slug: "graphic_design",
        label: "🎨 Graphic Design",
    },
    Category {
        slug: "writing",
        label: "✍️ Writing & Copywriting",
    },
    Category {
        slug: "translation",
        label: "🌍 Translation",
    },
    Category {
        slug: "programming",
        label: "💻 Programming & Tech",
    },
    Category {
        slug: "video_editing",
        label: "🎬 Video & Audio Editing",
    },
    Category {
        slug: "ai_services",
        label: "🤖 AI Services",
    },
    Category {
        slug: "marketing",
        label: "📈 Marketing & Business",
    },
    Category {
        slug: "cyber_security",
        label: "🛡️ Cyber Security",
    },
];

/// All configured categories, in display order.
pub fn all() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a category by its slug.
pub fn find(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

/// Render a slug as a human-readable name: separators become spaces and
/// each word is title-cased (`graphic_design` → `Graphic Design`,
/// `ai_services` → `Ai Services`).
pub fn humanize_slug(slug: &str) -> String {
    slug.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate the table at startup: non-empty slugs and labels, unique slugs,
/// slugs restricted to the characters that survive a callback round trip.
pub fn validate() -> crate::error::AppResult<()> {
    let mut seen = std::collections::HashSet::new();
    for category in &CATEGORIES {
        if category.slug.is_empty() {
            return Err("category with empty slug".into());
        }
        if category.label.trim().is_empty() {
            return Err(format!("category '{}' has an empty label", category.slug).into());
        }
        if !category
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(format!("category slug '{}' has invalid characters", category.slug).into());
        }
        if !seen.insert(category.slug) {
            return Err(format!("duplicate category slug '{}'", category.slug).into());
        }
    }
    Ok(())
}
