//! Display surface with named regions.
//!
//! A [`Surface`] is the explicit handle a caller passes to the dispatcher. It
//! owns one [`Region`] per [`RegionName`]; rendering replaces (or, for the
//! top-videos lookup, appends to) a region's markup. Writers need
//! `&mut Region`, so at most one writer touches a region at a time.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::events::EventKind;

/// Logical region names, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionName {
    /// Session-level notices (stream failures).
    Status,
    Titles,
    SelectedTitle,
    Description,
    Tags,
    Hashtags,
    Score,
    Analytics,
    TopVideos,
}

impl RegionName {
    pub const ALL: [RegionName; 9] = [
        Self::Status,
        Self::Titles,
        Self::SelectedTitle,
        Self::Description,
        Self::Tags,
        Self::Hashtags,
        Self::Score,
        Self::Analytics,
        Self::TopVideos,
    ];

    /// CSS class of the region's container element.
    pub fn class(self) -> &'static str {
        match self {
            Self::Status => "status-container",
            Self::Titles => "titles-container",
            Self::SelectedTitle => "selected-title-container",
            Self::Description => "description-container",
            Self::Tags => "tags-container",
            Self::Hashtags => "hashtags-container",
            Self::Score => "score-container",
            Self::Analytics => "analytics-container",
            Self::TopVideos => "top-videos-region",
        }
    }

    /// The region an event kind renders into.
    pub fn for_event(kind: EventKind) -> Self {
        match kind {
            EventKind::Titles => Self::Titles,
            EventKind::SelectedTitle => Self::SelectedTitle,
            EventKind::Description => Self::Description,
            EventKind::Tags => Self::Tags,
            EventKind::Hashtags => Self::Hashtags,
            EventKind::Score => Self::Score,
            EventKind::Analytics => Self::Analytics,
            EventKind::TopVideos => Self::TopVideos,
        }
    }
}

/// A named sub-area of a surface holding rendered markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    markup: String,
}

impl Region {
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    /// Replace the region's content wholesale.
    pub fn replace(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    /// Append a fragment after the existing content.
    pub fn append(&mut self, markup: &str) {
        self.markup.push_str(markup);
    }
}

/// The container an SEO result is rendered into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    regions: BTreeMap<RegionName, Region>,
}

impl Surface {
    /// A surface with every region present and empty.
    pub fn new() -> Self {
        let regions = RegionName::ALL
            .iter()
            .map(|&name| (name, Region::default()))
            .collect();
        Self { regions }
    }

    pub fn region(&self, name: RegionName) -> &Region {
        // every name is inserted by `new`; a default-constructed surface
        // fills lazily through `region_mut`
        static EMPTY: Region = Region {
            markup: String::new(),
        };
        self.regions.get(&name).unwrap_or(&EMPTY)
    }

    pub fn region_mut(&mut self, name: RegionName) -> &mut Region {
        self.regions.entry(name).or_default()
    }

    /// Shorthand for `region(name).markup()`.
    pub fn markup(&self, name: RegionName) -> &str {
        self.region(name).markup()
    }

    /// True when no region holds any markup.
    pub fn is_blank(&self) -> bool {
        self.regions.values().all(Region::is_empty)
    }

    /// Render the whole surface as one `seo-results` container.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<div class=\"seo-results\">\n");
        for name in RegionName::ALL {
            let _ = write!(
                out,
                "<div class=\"{}\">\n{}</div>\n",
                name.class(),
                self.markup(name)
            );
        }
        out.push_str("</div>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_blank() {
        let surface = Surface::new();
        assert!(surface.is_blank());
        assert_eq!(surface.markup(RegionName::Score), "");
    }

    #[test]
    fn replace_discards_previous_markup() {
        let mut surface = Surface::new();
        surface.region_mut(RegionName::Tags).replace("old");
        surface.region_mut(RegionName::Tags).replace("new");
        assert_eq!(surface.markup(RegionName::Tags), "new");
    }

    #[test]
    fn default_surface_fills_lazily() {
        let mut surface = Surface::default();
        assert_eq!(surface.markup(RegionName::Titles), "");
        surface.region_mut(RegionName::Titles).append("x");
        assert_eq!(surface.markup(RegionName::Titles), "x");
    }

    #[test]
    fn to_html_keeps_region_order() {
        let mut surface = Surface::new();
        surface.region_mut(RegionName::Score).replace("S");
        surface.region_mut(RegionName::Titles).replace("T");
        let html = surface.to_html();
        let t = html.find("titles-container").unwrap();
        let s = html.find("score-container").unwrap();
        assert!(t < s);
    }
}
