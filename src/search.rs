//! Global search replacement in the navbar.
//!
//! Hides the theme's own search field, injects one search field variant for
//! large screens and one for small screens, and wires a toggle icon that
//! shows or hides both at once. Whether a shown variant actually renders at
//! the current viewport width is decided by the theme's breakpoint
//! stylesheet, not here.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement};

use crate::dom;

/// Structural query for the theme's search form wrapper.
const CORE_WRAPPER_QUERY: &str = ".hidden-md-down .search-input-wrapper.nav-link";
/// Structural query for the theme's search form, cloned into each variant.
const CORE_FORM_QUERY: &str = ".hidden-md-down .search-input-form";
/// The navbar search icon the large-screen variant is inserted after.
const SEARCH_ICON_QUERY: &str = ".localnavbarplus.nav-link.search";
/// The page header the small-screen variant is appended to.
const HEADER_QUERY: &str = "#page-wrapper > header";
/// Id of the toggle link. Its href is only a fallback for clients where
/// this module never ran.
const TOGGLE_ID: &str = "localnavbarplus-search";

const LARGE_VARIANT_CLASSES: &str = "search-on-large-screens hidden-lg-down";
const SMALL_VARIANT_CLASSES: &str =
    "container-fluid navbar-nav search-on-small-screens hidden-lg-up";
const INNER_WRAPPER_CLASSES: &str = "search-input-wrapper nav-link expanded";

/// Logical visibility of the injected search fields.
///
/// Both variants are always driven from one value of this enum, so a
/// toggle can never leave them disagreeing with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Collapsed,
    Expanded,
}

impl SearchState {
    /// Classify the state the page is actually in.
    ///
    /// Any visible variant counts as `Expanded`. A pair that was forced
    /// apart by outside interference therefore reads as `Expanded` and
    /// collapses back to a consistent state on the next toggle.
    #[must_use]
    pub fn observed(large_visible: bool, small_visible: bool) -> Self {
        if large_visible || small_visible {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    /// Whether the variants are shown in this state.
    #[must_use]
    pub const fn shows_variants(self) -> bool {
        matches!(self, Self::Expanded)
    }
}

/// Handles to the two injected search field variants.
///
/// The injectors hand their elements over once at init; the toggle works
/// on these handles instead of re-querying the document. A variant whose
/// insertion point was missing stays `None` and is skipped.
pub struct NavbarSearch {
    large: Option<HtmlElement>,
    small: Option<HtmlElement>,
}

impl NavbarSearch {
    #[must_use]
    pub fn new(large: Option<HtmlElement>, small: Option<HtmlElement>) -> Self {
        Self { large, small }
    }

    fn observed_state(&self) -> SearchState {
        let visible = |el: &Option<HtmlElement>| {
            el.as_ref().is_some_and(|el| !dom::is_hidden(el))
        };
        SearchState::observed(visible(&self.large), visible(&self.small))
    }

    fn apply(&self, state: SearchState) {
        let hidden = !state.shows_variants();
        for el in [&self.large, &self.small].into_iter().flatten() {
            dom::set_hidden(el, hidden);
        }
    }

    /// Flip both variants to the opposite of the currently observed state.
    pub fn toggle(&self) {
        self.apply(self.observed_state().toggled());
    }
}

/// Hides the theme's core search field.
///
/// The wrapper is found by a structural query, then re-resolved through its
/// id attribute before hiding. If any step comes up empty the core field is
/// simply left in place.
fn hide_core_search_field(doc: &Document) {
    let wrapper = doc
        .query_selector(CORE_WRAPPER_QUERY)
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("id"))
        .and_then(|id| doc.get_element_by_id(&id))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let Some(wrapper) = wrapper else {
        log::debug!("core search wrapper not found, leaving the default field in place");
        return;
    };
    dom::set_hidden(&wrapper, true);
}

/// Builds one variant wrapper: outer div with the viewport-scoping classes,
/// inner expanded wrapper, and a clone of the core search form inside it.
/// A missing core form leaves the clone out but still yields the wrapper.
fn build_variant(doc: &Document, classes: &str) -> Option<HtmlElement> {
    let outer = doc.create_element("div").ok()?;
    outer.set_class_name(classes);
    let inner = doc.create_element("div").ok()?;
    inner.set_class_name(INNER_WRAPPER_CLASSES);

    if let Ok(Some(form)) = doc.query_selector(CORE_FORM_QUERY) {
        if let Ok(clone) = form.clone_node_with_deep(true) {
            if let Some(clone_el) = clone.dyn_ref::<Element>() {
                if let Err(err) = clone_el.class_list().add_1("expanded") {
                    log::warn!(
                        "failed to mark cloned search form as expanded: {}",
                        dom::js_error_message(&err)
                    );
                }
            }
            let _ = inner.append_child(&clone);
        }
    } else {
        log::debug!("core search form not found, injecting an empty search wrapper");
    }

    let _ = outer.append_child(&inner);
    outer.dyn_into::<HtmlElement>().ok()
}

/// Adds the search field variant for large screens.
///
/// Sits in the navbar right after the search icon, so it opens where the
/// user clicked instead of at the core field's position.
fn inject_large_variant(doc: &Document) -> Option<HtmlElement> {
    let Ok(Some(icon)) = doc.query_selector(SEARCH_ICON_QUERY) else {
        log::debug!("navbar search icon not found, skipping the large screen variant");
        return None;
    };
    let wrapper = build_variant(doc, LARGE_VARIANT_CLASSES)?;
    if let Err(err) = icon.insert_adjacent_element("afterend", &wrapper) {
        log::warn!(
            "failed to insert the large screen variant: {}",
            dom::js_error_message(&err)
        );
        return None;
    }
    dom::set_hidden(&wrapper, true);
    Some(wrapper)
}

/// Adds the search field variant for small screens as the last child of
/// the page header, below the collapsed navbar.
fn inject_small_variant(doc: &Document) -> Option<HtmlElement> {
    let Ok(Some(header)) = doc.query_selector(HEADER_QUERY) else {
        log::debug!("page header not found, skipping the small screen variant");
        return None;
    };
    let wrapper = build_variant(doc, SMALL_VARIANT_CLASSES)?;
    if let Err(err) = header.append_child(&wrapper) {
        log::warn!(
            "failed to insert the small screen variant: {}",
            dom::js_error_message(&err)
        );
        return None;
    }
    dom::set_hidden(&wrapper, true);
    Some(wrapper)
}

/// Binds the toggle icon's click handler.
///
/// The handler suppresses the link's default navigation (the href points at
/// the full search page as a fallback) and flips both variants. Without the
/// toggle element the injected fields just stay hidden.
fn bind_toggle(doc: &Document, search: NavbarSearch) {
    let Some(trigger) = doc.get_element_by_id(TOGGLE_ID) else {
        log::debug!("search toggle not found, injected fields stay hidden");
        return;
    };
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        search.toggle();
    });
    if let Err(err) =
        trigger.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
    {
        log::warn!(
            "failed to attach the search toggle handler: {}",
            dom::js_error_message(&err)
        );
    }
    // The handler stays registered for the lifetime of the page.
    handler.forget();
}

/// Runs the whole navbar search modification once.
pub fn init() {
    let Some(doc) = dom::document() else {
        return;
    };
    hide_core_search_field(&doc);
    let large = inject_large_variant(&doc);
    let small = inject_small_variant(&doc);
    bind_toggle(&doc, NavbarSearch::new(large, small));
}

#[cfg(test)]
mod tests {
    use super::SearchState;

    #[test]
    fn any_visible_variant_reads_as_expanded() {
        assert_eq!(SearchState::observed(false, false), SearchState::Collapsed);
        assert_eq!(SearchState::observed(true, false), SearchState::Expanded);
        assert_eq!(SearchState::observed(false, true), SearchState::Expanded);
        assert_eq!(SearchState::observed(true, true), SearchState::Expanded);
    }

    #[test]
    fn toggling_flips_between_the_two_states() {
        assert_eq!(SearchState::Collapsed.toggled(), SearchState::Expanded);
        assert_eq!(SearchState::Expanded.toggled(), SearchState::Collapsed);
        assert!(SearchState::Expanded.shows_variants());
        assert!(!SearchState::Collapsed.shows_variants());
    }

    #[test]
    fn click_parity_returns_to_collapsed() {
        let mut large = false;
        let mut small = false;
        for click in 1..=6 {
            let next = SearchState::observed(large, small).toggled();
            large = next.shows_variants();
            small = next.shows_variants();
            if click % 2 == 0 {
                assert_eq!(next, SearchState::Collapsed, "after {click} clicks");
            } else {
                assert_eq!(next, SearchState::Expanded, "after {click} clicks");
            }
        }
    }

    #[test]
    fn desynchronized_variants_collapse_on_next_toggle() {
        // One variant forced visible from outside: the next toggle must
        // settle on both hidden, not both shown.
        let next = SearchState::observed(true, false).toggled();
        assert_eq!(next, SearchState::Collapsed);
        assert!(!next.shows_variants());
    }
}
