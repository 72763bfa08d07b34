//! CSS selectors for driving the storefront UI.
//!
//! Every selector used by the page objects lives here. Update this file
//! when the storefront changes its markup.
//!
//! **Update process**: when a flow step fails to find its element,
//! capture the rendered HTML, adjust the selector, and extend the
//! fixture pages under `tests/fixtures/`.

/// Selectors shared across pages (header, modals, interstitials).
pub mod nav {
    /// Storefront logo link.
    pub const LOGO: &str = "a#nav-logo-sprites, a.nav-logo-link";

    /// Desktop/tablet search input.
    pub const SEARCH_BOX: &str = "#twotabsearchtextbox";

    /// Narrow-viewport search input variants.
    pub const MOBILE_SEARCH_BOX: &str =
        "input[type='search'], input[aria-label='Search Amazon'], #nav-bb-search";

    /// Search submit button.
    pub const SEARCH_SUBMIT: &str = "input.nav-input[type='submit']";

    /// Autosuggest entries under the search box.
    pub const SUGGESTION: &str = ".s-suggestion";

    /// Dismiss button on the delivery-location modal.
    pub const LOCATION_DISMISS: &str = "input.a-button-input[data-action-type='DISMISS']";

    /// Close button on the delivery-location toaster.
    pub const TOASTER_CLOSE: &str = "#glow-toaster .a-button-close";

    /// Continue button on the "continue shopping" interstitial.
    pub const CONTINUE_SHOPPING: &str = "button.a-button-text[type='submit']";
}

/// Selectors for the search results page.
pub mod results {
    /// One result tile in the grid.
    pub const TILE: &str = "[data-component-type='s-search-result']";

    /// Results summary label ("1-16 of over 40,000 results ...").
    pub const INFO_BAR: &str = "span[data-component-type='s-result-info-bar']";

    /// One pagination page-number element.
    pub const PAGINATION_ITEM: &str = "span.s-pagination-item";

    /// Next-page link.
    pub const NEXT_PAGE: &str = "a.s-pagination-next";
}

/// Selectors scoped inside one result tile.
pub mod tile {
    /// Rendered price text, offscreen variant preferred.
    pub const PRICE: &str = "span.a-price > span.a-offscreen, span.a-price span.a-price-whole";

    /// Title text across the storefront's layout variants.
    pub const TITLE: &str = "h2 a span.a-size-medium, h2 a span.a-size-base-plus, \
                             h2 span.a-size-medium, h2 span.a-size-base-plus, \
                             h2 span[role='heading'], [data-cy='title-recipe']";

    /// Product image.
    pub const IMAGE: &str = "img.s-image";
}
