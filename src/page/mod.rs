//! The portfolio page tree.
//!
//! The page owns its elements: every painted node carries a [`TargetId`]
//! whose [`VisualState`](crate::animation::VisualState) lives in the shared
//! [`TargetStore`]. Nodes that animate as one unit share a target (an entry's
//! name and description, the whole contact block).
//!
//! ```text
//! heading
//! subtitle
//! ┌ apps ─────────────┐ ┌ projects ─────────┐
//! │ label / rule      │ │ label / rule      │
//! │ entry*            │ │ entry*            │
//! │ indicator         │ │ indicator         │
//! └───────────────────┘ └───────────────────┘
//! contact label, inline links, social row
//! ```

pub mod layout;
pub mod paint;
pub mod text;

pub use layout::{compute_page_layout, PageLayout};
pub use paint::{paint_page, FrameContext, HitRegion, PaintResult};

use crate::animation::{TargetId, TargetStore};
use crate::content::{
    ContentModel, LinkedEntry, APPS_LABEL, CONTACT_LABEL, EXTERNAL_LINK_GLYPH, MORE_COMING_SOON, PROJECTS_LABEL,
    SPINNER_FRAMES,
};
use crate::orchestrator::{HeadingHandle, RevealTargets};
use crate::types::{Attr, Rgba};

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading,
    Subtitle,
    SectionLabel,
    /// The border under a section label.
    SectionRule,
    EntryName,
    EntryDescription,
    Indicator,
    ContactLabel,
    ContactLink,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// How a role is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub color: Rgba,
    /// Color while the pointer is over the node.
    pub hover: Option<Rgba>,
    pub attrs: Attr,
    pub align: Align,
}

const fn white(alpha: u8) -> Rgba {
    Rgba::WHITE.with_alpha(alpha)
}

impl Role {
    pub fn style(self) -> NodeStyle {
        let (color, hover, attrs, align) = match self {
            Role::Heading => (Rgba::WHITE, None, Attr::BOLD, Align::Center),
            Role::Subtitle => (white(128), None, Attr::NONE, Align::Center),
            Role::SectionLabel => (white(102), None, Attr::BOLD, Align::Left),
            Role::SectionRule => (white(38), None, Attr::NONE, Align::Left),
            Role::EntryName => (white(204), Some(Rgba::WHITE), Attr::BOLD, Align::Left),
            Role::EntryDescription => (white(102), None, Attr::NONE, Align::Left),
            Role::Indicator => (white(102), None, Attr::NONE, Align::Left),
            Role::ContactLabel => (white(128), None, Attr::BOLD, Align::Center),
            Role::ContactLink => (white(204), Some(Rgba::WHITE), Attr::NONE, Align::Center),
            Role::Social => (white(102), Some(white(204)), Attr::NONE, Align::Center),
        };
        NodeStyle {
            color,
            hover,
            attrs,
            align,
        }
    }
}

/// One painted element.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub role: Role,
    pub text: String,
    pub target: TargetId,
    pub href: Option<&'static str>,
}

/// A list item: a linked entry or the trailing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionItem {
    Entry { name: usize, description: usize },
    Indicator(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: usize,
    pub rule: usize,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBlock {
    pub label: usize,
    pub inline: Vec<usize>,
    pub social: Vec<usize>,
}

// =============================================================================
// Page Tree
// =============================================================================

/// The mounted page. Node indices double as hit-grid region indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTree {
    nodes: Vec<PageNode>,
    pub heading: usize,
    pub subtitle: usize,
    pub apps: Section,
    pub projects: Section,
    pub contact: ContactBlock,
}

struct Builder<'a> {
    nodes: Vec<PageNode>,
    store: &'a mut TargetStore,
}

impl Builder<'_> {
    fn push(&mut self, role: Role, text: impl Into<String>, target: TargetId, href: Option<&'static str>) -> usize {
        self.nodes.push(PageNode {
            role,
            text: text.into(),
            target,
            href,
        });
        self.nodes.len() - 1
    }

    fn section(&mut self, label: &str, entries: &[LinkedEntry]) -> Section {
        let label_target = self.store.alloc();
        let label = self.push(Role::SectionLabel, label, label_target, None);
        let rule = self.push(Role::SectionRule, "", label_target, None);

        let mut items: Vec<SectionItem> = entries
            .iter()
            .map(|entry| {
                let target = self.store.alloc();
                let name_text = format!("{} {}", entry.name, EXTERNAL_LINK_GLYPH);
                let name = self.push(Role::EntryName, name_text, target, Some(entry.href));
                let description = self.push(Role::EntryDescription, entry.description, target, Some(entry.href));
                SectionItem::Entry { name, description }
            })
            .collect();

        let target = self.store.alloc();
        let indicator_text = format!("{} {}", SPINNER_FRAMES[0], MORE_COMING_SOON);
        items.push(SectionItem::Indicator(self.push(Role::Indicator, indicator_text, target, None)));

        Section { label, rule, items }
    }
}

impl PageTree {
    /// Build the page from the content model, allocating targets in `store`.
    pub fn build(content: &ContentModel, store: &mut TargetStore) -> Self {
        let mut b = Builder {
            nodes: Vec::new(),
            store,
        };

        let target = b.store.alloc();
        let heading = b.push(Role::Heading, content.heading, target, None);
        let target = b.store.alloc();
        let subtitle = b.push(Role::Subtitle, content.subtitle, target, None);

        let apps = b.section(APPS_LABEL, content.apps);
        let projects = b.section(PROJECTS_LABEL, content.projects);

        let contact_target = b.store.alloc();
        let label = b.push(Role::ContactLabel, CONTACT_LABEL, contact_target, None);
        let last = content.contact.len().saturating_sub(1);
        let inline = content
            .contact
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let text = if i < last {
                    format!("{} •", link.label)
                } else {
                    link.label.to_string()
                };
                b.push(Role::ContactLink, text, contact_target, Some(link.href))
            })
            .collect();
        let social = content
            .social
            .iter()
            .map(|link| {
                let text = match link.icon {
                    Some(icon) => format!("{} {}", icon, link.label),
                    None => link.label.to_string(),
                };
                b.push(Role::Social, text, contact_target, Some(link.href))
            })
            .collect();

        Self {
            nodes: b.nodes,
            heading,
            subtitle,
            apps,
            projects,
            contact: ContactBlock { label, inline, social },
        }
    }

    pub fn nodes(&self) -> &[PageNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&PageNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node that opens a URL, with its index.
    pub fn links(&self) -> impl Iterator<Item = (usize, &'static str)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.href.map(|href| (i, href)))
    }

    /// Handles for the entrance sequence.
    pub fn reveal_targets(&self) -> RevealTargets {
        let target = |index: usize| self.nodes[index].target;
        let list = |section: &Section| {
            section
                .items
                .iter()
                .map(|item| match *item {
                    SectionItem::Entry { name, .. } => target(name),
                    SectionItem::Indicator(node) => target(node),
                })
                .collect()
        };

        RevealTargets {
            heading: Some(HeadingHandle {
                target: target(self.heading),
                text: self.nodes[self.heading].text.clone(),
            }),
            subtitle: Some(target(self.subtitle)),
            apps_label: Some(target(self.apps.label)),
            projects_label: Some(target(self.projects.label)),
            apps_list: Some(list(&self.apps)),
            projects_list: Some(list(&self.projects)),
            contact: Some(target(self.contact.label)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{APPS, PROJECTS};

    fn build(content: &ContentModel) -> (PageTree, TargetStore) {
        let mut store = TargetStore::new();
        let page = PageTree::build(content, &mut store);
        (page, store)
    }

    #[test]
    fn test_default_page_nodes() {
        let (page, _) = build(&ContentModel::default());
        assert_eq!(page.node(page.heading).map(|n| n.text.as_str()), Some("Hi, I'm Yernar"));
        assert_eq!(page.apps.items.len(), APPS.len() + 1);
        assert_eq!(page.projects.items.len(), PROJECTS.len() + 1);

        let SectionItem::Entry { name, description } = page.apps.items[0] else {
            panic!("first apps item should be an entry");
        };
        assert_eq!(page.nodes()[name].text, "Gymguru ↗");
        assert_eq!(page.nodes()[name].target, page.nodes()[description].target);
        assert!(matches!(page.apps.items.last(), Some(SectionItem::Indicator(_))));
    }

    #[test]
    fn test_links_cover_entries_and_contact() {
        let (page, _) = build(&ContentModel::default());
        let hrefs: Vec<&str> = page.links().map(|(_, href)| href).collect();
        assert!(hrefs.contains(&"https://gymguru.io/"));
        assert!(hrefs.contains(&"https://t.me/yernar1121"));
        assert!(hrefs.contains(&"https://x.com/yernar1121"));
    }

    #[test]
    fn test_reveal_targets_list_order() {
        let (page, _) = build(&ContentModel::default());
        let targets = page.reveal_targets();
        let apps = targets.apps_list.unwrap();
        assert_eq!(apps.len(), 2);
        let SectionItem::Indicator(indicator) = page.apps.items[1] else {
            panic!("indicator expected");
        };
        assert_eq!(apps[1], page.nodes()[indicator].target);
        assert_eq!(targets.heading.map(|h| h.text), Some("Hi, I'm Yernar".to_string()));
    }

    #[test]
    fn test_empty_lists_keep_indicators() {
        let (page, _) = build(&ContentModel::with_lists(&[], &[]));
        assert_eq!(page.apps.items.len(), 1);
        assert_eq!(page.projects.items.len(), 1);
        let targets = page.reveal_targets();
        assert_eq!(targets.apps_list.map(|l| l.len()), Some(1));
        assert_eq!(targets.projects_list.map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_contact_shares_one_target() {
        let (page, _) = build(&ContentModel::default());
        let label_target = page.nodes()[page.contact.label].target;
        assert!(page
            .contact
            .inline
            .iter()
            .chain(&page.contact.social)
            .all(|&i| page.nodes()[i].target == label_target));
        assert_eq!(page.nodes()[page.contact.inline[0]].text, "@yernar1121 •");
    }
}
