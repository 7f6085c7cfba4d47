//! Static content model.
//!
//! The page's text and links. Two ordered lists (`APPS`, `PROJECTS`) feed the
//! list sections; editing them is the only way to change what the page shows.

/// A named, described external link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

/// A contact link (handle, email or social icon).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactLink {
    pub label: &'static str,
    /// Glyph shown in the social row; `None` for inline text links.
    pub icon: Option<char>,
    pub href: &'static str,
}

pub const APPS: &[LinkedEntry] = &[LinkedEntry {
    name: "Gymguru",
    description: "Workout planner app with personalized plans, progress tracking, and complete workout history.",
    href: "https://gymguru.io/",
}];

pub const PROJECTS: &[LinkedEntry] = &[LinkedEntry {
    name: "Social Network App",
    description: "A full-stack social network application with real-time messaging, friend management, and post feeds.",
    href: "https://github.com/ranre1121/socialnetwork",
}];

pub const HEADING: &str = "Hi, I'm Yernar";
pub const SUBTITLE: &str = "Software Engineer • Prompt Engineer";
pub const APPS_LABEL: &str = "APPS";
pub const PROJECTS_LABEL: &str = "PROJECTS";
pub const CONTACT_LABEL: &str = "CONTACT ME";
pub const MORE_COMING_SOON: &str = "More coming soon";

/// Glyph drawn after every entry name.
pub const EXTERNAL_LINK_GLYPH: char = '↗';

/// Frames of the spinning gear next to "More coming soon".
pub const SPINNER_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

pub const CONTACT_INLINE: &[ContactLink] = &[
    ContactLink {
        label: "@yernar1121",
        icon: None,
        href: "https://t.me/yernar1121",
    },
    ContactLink {
        label: "yernar34@gmail.com",
        icon: None,
        href: "mailto:yernar34@gmail.com",
    },
];

pub const SOCIAL_LINKS: &[ContactLink] = &[
    ContactLink {
        label: "GitHub",
        icon: Some('⌥'),
        href: "https://github.com/ranre1121/",
    },
    ContactLink {
        label: "Twitter",
        icon: Some('✕'),
        href: "https://x.com/yernar1121",
    },
    ContactLink {
        label: "Email",
        icon: Some('✉'),
        href: "mailto:yernar34@gmail.com",
    },
];

/// Content injected into the page at mount.
///
/// Defaults to the process-wide lists; tests swap in other slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentModel {
    pub heading: &'static str,
    pub subtitle: &'static str,
    pub apps: &'static [LinkedEntry],
    pub projects: &'static [LinkedEntry],
    pub contact: &'static [ContactLink],
    pub social: &'static [ContactLink],
}

impl ContentModel {
    /// The same page with different list contents.
    pub fn with_lists(apps: &'static [LinkedEntry], projects: &'static [LinkedEntry]) -> Self {
        Self {
            apps,
            projects,
            ..Self::default()
        }
    }

    /// Number of stage-4 reveal items: every entry plus one indicator per list.
    pub fn reveal_item_count(&self) -> usize {
        self.apps.len() + self.projects.len() + 2
    }
}

impl Default for ContentModel {
    fn default() -> Self {
        Self {
            heading: HEADING,
            subtitle: SUBTITLE,
            apps: APPS,
            projects: PROJECTS,
            contact: CONTACT_INLINE,
            social: SOCIAL_LINKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists() {
        let content = ContentModel::default();
        assert_eq!(content.apps.len(), 1);
        assert_eq!(content.apps[0].name, "Gymguru");
        assert_eq!(content.projects[0].name, "Social Network App");
        assert_eq!(content.reveal_item_count(), 4);
    }

    #[test]
    fn test_empty_lists_still_count_indicators() {
        let content = ContentModel::with_lists(&[], &[]);
        assert_eq!(content.reveal_item_count(), 2);
    }

    #[test]
    fn test_links_are_absolute() {
        let content = ContentModel::default();
        let all = content
            .apps
            .iter()
            .chain(content.projects)
            .map(|e| e.href)
            .chain(content.contact.iter().chain(content.social).map(|c| c.href));
        for href in all {
            assert!(
                href.starts_with("https://") || href.starts_with("mailto:"),
                "unexpected href {href}"
            );
        }
    }
}
