use serde::{Deserialize, Serialize};

/// Selector patterns for "significant content" inside the active slide.
///
/// Order matters: candidates are reported in pattern order, then document order
/// within each pattern.
pub const SIGNIFICANT_CONTENT: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    ".text",
    ".title",
    "img",
    "video",
    "svg",
    "canvas",
    "button",
    "input",
    "select",
    "textarea",
    "label",
    ".content-wrapper > :not(cog-navigation-list)",
];

/// DOM landmarks the runner relies on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSelectors {
    /// Box the content must stay inside
    pub reference_container: String,

    /// Container whose descendants are checked
    pub elements_container: String,

    /// Slide navigation list; its items give the slide count
    pub navigation_items: String,

    /// Marker of the slide currently on screen
    pub active_slide: String,

    /// Angular component exposing `next()`
    pub advance_component: String,

    /// Patterns evaluated inside `elements_container`
    pub significant_content: Vec<String>,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            reference_container: "swiper-slide.swiper-slide-active > div:nth-child(1)".to_string(),
            elements_container: "swiper-slide.swiper-slide-active > div:nth-child(2)".to_string(),
            navigation_items: "ul.ng-star-inserted li".to_string(),
            active_slide: "swiper-slide.swiper-slide-active".to_string(),
            advance_component: "cog-advance-questions-container".to_string(),
            significant_content: SIGNIFICANT_CONTENT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_scope_to_active_slide() {
        let selectors = PageSelectors::default();
        assert!(selectors.reference_container.starts_with(&selectors.active_slide));
        assert!(selectors.elements_container.starts_with(&selectors.active_slide));
    }

    #[test]
    fn test_content_wrapper_excludes_navigation() {
        let selectors = PageSelectors::default();
        let wrapper = selectors
            .significant_content
            .iter()
            .find(|s| s.starts_with(".content-wrapper"))
            .unwrap();
        assert!(wrapper.contains(":not(cog-navigation-list)"));
        assert!(!selectors.significant_content.iter().any(|s| s == "*"));
    }
}
