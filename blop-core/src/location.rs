//! Display addresses and map links.

use url::form_urlencoded;

use crate::event::Event;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const DEFAULT_ZOOM: u8 = 15;
const MAX_ZOOM: u8 = 21;
const DEFAULT_MAP_TYPE: &str = "roadmap";

/// Lowercase letters only, so "Seattle, WA" and "seattle wa" compare equal.
fn letters(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_lowercase()
}

/// The event's address, with "City, State" appended unless the address
/// already spells out both.
pub fn display_address(event: &Event) -> String {
    let address = letters(&event.address);
    if address.contains(&letters(&event.city)) && address.contains(&letters(&event.state)) {
        return event.address.clone();
    }

    let city_state = format!("{}, {}", event.city, event.state);
    if event.address.is_empty() {
        city_state
    } else {
        format!("{}, {}", event.address, city_state)
    }
}

/// Google Maps search link for an address.
pub fn maps_url(address: &str) -> String {
    maps_url_with(address, DEFAULT_ZOOM, DEFAULT_MAP_TYPE)
}

/// [`maps_url`] with an explicit zoom (clamped to 0..=21) and base map.
pub fn maps_url_with(address: &str, zoom: u8, map_type: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("api", "1")
        .append_pair("query", address)
        .append_pair("zoom", &zoom.min(MAX_ZOOM).to_string())
        .append_pair("basemap", map_type)
        .finish();

    format!("{}?{}", MAPS_SEARCH_URL, query)
}
