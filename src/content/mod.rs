//! Content Model - Sections, items and element keys
//!
//! Static, immutable display records. A page is an ordered list of
//! [`SectionSpec`]s; every drawable piece of a section is addressed by an
//! [`ElementKey`], which is what the layout measures and the observer watches.

mod portfolio;

pub use portfolio::portfolio;

use std::fmt;
use std::time::Duration;

use crate::state::reveal::MotionVariant;
use crate::state::stagger::Stagger;

// =============================================================================
// SECTION IDS
// =============================================================================

/// Anchor identifier of a page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Home,
    About,
    Education,
    Skills,
    Projects,
    Experience,
    Certificates,
    Organization,
    Interests,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 10] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Experience,
        SectionId::Certificates,
        SectionId::Organization,
        SectionId::Interests,
        SectionId::Contact,
    ];

    /// Sections linked from the header, in header order.
    pub const NAVIGATION: [SectionId; 9] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Experience,
        SectionId::Certificates,
        SectionId::Interests,
        SectionId::Contact,
    ];

    /// Bare anchor name (`"home"`).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Experience => "experience",
            Self::Certificates => "certificates",
            Self::Organization => "organization",
            Self::Interests => "interests",
            Self::Contact => "contact",
        }
    }

    /// Header label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Education => "Education",
            Self::Skills => "Skills",
            Self::Projects => "Projects",
            Self::Experience => "Experience",
            Self::Certificates => "Certificates",
            Self::Organization => "Organization",
            Self::Interests => "Interests",
            Self::Contact => "Contact",
        }
    }

    /// Anchor link (`"#home"`).
    pub fn anchor(&self) -> String {
        format!("#{}", self.name())
    }

    /// Parse `"#about"` or `"about"`. Unknown anchors return None.
    pub fn from_anchor(anchor: &str) -> Option<Self> {
        let name = anchor.trim().trim_start_matches('#');
        Self::ALL.into_iter().find(|id| id.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name())
    }
}

// =============================================================================
// ELEMENT KEYS
// =============================================================================

/// A drawable part of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    /// The whole section box.
    Section,
    Title,
    Body,
    Chip(usize),
    Item(usize),
    Footer,
}

/// Stable reference to one element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey {
    pub section: SectionId,
    pub part: Part,
}

impl ElementKey {
    pub const fn new(section: SectionId, part: Part) -> Self {
        Self { section, part }
    }

    pub const fn section(section: SectionId) -> Self {
        Self::new(section, Part::Section)
    }

    pub const fn title(section: SectionId) -> Self {
        Self::new(section, Part::Title)
    }

    pub const fn item(section: SectionId, index: usize) -> Self {
        Self::new(section, Part::Item(index))
    }
}

// =============================================================================
// CONTENT ITEMS
// =============================================================================

/// A display record: an education entry, a project card, a skill...
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentItem {
    pub title: String,
    pub description: String,
    pub period: Option<String>,
    pub location: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub link: Option<String>,
    /// Skill level in percent, drawn as a bar.
    pub proficiency: Option<u8>,
}

impl ContentItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn proficiency(mut self, percent: u8) -> Self {
        self.proficiency = Some(percent.min(100));
        self
    }

    /// `"period | location"` when both are present, or whichever exists.
    pub fn meta_line(&self) -> Option<String> {
        match (&self.period, &self.location) {
            (Some(p), Some(l)) => Some(format!("{p} | {l}")),
            (Some(p), None) => Some(p.clone()),
            (None, Some(l)) => Some(l.clone()),
            (None, None) => None,
        }
    }
}

// =============================================================================
// SECTION SPEC
// =============================================================================

/// Static description of one section.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub id: SectionId,
    pub title: String,
    pub body: Option<String>,
    pub footer: Option<String>,
    /// Short tags shown under the body (About's skill chips).
    pub chips: Vec<String>,
    pub chip_stagger: Stagger,
    pub items: Vec<ContentItem>,
    /// Entrance motion of each item; its delay is taken from `stagger`.
    pub item_motion: MotionVariant,
    pub stagger: Stagger,
    /// Play the entrance at mount instead of waiting for intersection.
    pub reveal_on_mount: bool,
}

impl SectionSpec {
    pub fn new(id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: None,
            footer: None,
            chips: Vec::new(),
            chip_stagger: Stagger::CHIPS,
            items: Vec::new(),
            item_motion: MotionVariant::card(),
            stagger: Stagger::CARDS,
            reveal_on_mount: false,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn chips<I, S>(mut self, chips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chips = chips.into_iter().map(Into::into).collect();
        self
    }

    pub fn chip_stagger(mut self, stagger: Stagger) -> Self {
        self.chip_stagger = stagger;
        self
    }

    pub fn items(mut self, items: Vec<ContentItem>) -> Self {
        self.items = items;
        self
    }

    pub fn item_motion(mut self, motion: MotionVariant) -> Self {
        self.item_motion = motion;
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn reveal_on_mount(mut self) -> Self {
        self.reveal_on_mount = true;
        self
    }

    /// Entrance delay of item `index`.
    pub fn item_delay(&self, index: usize) -> Duration {
        self.stagger.delay(index)
    }
}

/// A whole page: header name plus sections in document order.
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub owner: String,
    pub sections: Vec<SectionSpec>,
}

impl PageSpec {
    pub fn new(owner: impl Into<String>, sections: Vec<SectionSpec>) -> Self {
        Self {
            owner: owner.into(),
            sections,
        }
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_round_trip_for_navigation() {
        for id in SectionId::NAVIGATION {
            assert_eq!(SectionId::from_anchor(&id.anchor()), Some(id));
        }
    }

    #[test]
    fn test_from_anchor_variants() {
        assert_eq!(SectionId::from_anchor("skills"), Some(SectionId::Skills));
        assert_eq!(SectionId::from_anchor(" #Contact "), Some(SectionId::Contact));
        assert_eq!(SectionId::from_anchor("#blog"), None);
        assert_eq!(SectionId::from_anchor(""), None);
    }

    #[test]
    fn test_organization_not_in_header() {
        assert!(!SectionId::NAVIGATION.contains(&SectionId::Organization));
        assert!(SectionId::ALL.contains(&SectionId::Organization));
    }

    #[test]
    fn test_meta_line() {
        let item = ContentItem::new("BS", "").period("2022").location("Lahore");
        assert_eq!(item.meta_line().as_deref(), Some("2022 | Lahore"));
        assert_eq!(ContentItem::new("x", "").meta_line(), None);
    }

    #[test]
    fn test_proficiency_clamped() {
        assert_eq!(ContentItem::new("x", "").proficiency(140).proficiency, Some(100));
    }

    #[test]
    fn test_item_delay_uses_stagger() {
        let spec = SectionSpec::new(SectionId::Skills, "Skills").stagger(Stagger::SKILLS);
        assert_eq!(spec.item_delay(3), Duration::from_millis(300));
    }
}
