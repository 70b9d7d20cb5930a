/// Builds the free-text query sent upstream, e.g.
/// `"restaurant in Centro, Campinas, SP"`.
///
/// Without a neighborhood the query covers the whole city:
/// `"restaurant in Campinas, SP"`.
#[must_use]
pub fn text_query(query: &str, neighborhood: Option<&str>, city: &str, state: &str) -> String {
    let query = query.trim();
    let city = city.trim();
    let state = state.trim();

    match neighborhood.map(str::trim).filter(|n| !n.is_empty()) {
        Some(area) => format!("{query} in {area}, {city}, {state}"),
        None => format!("{query} in {city}, {state}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_city_query() {
        assert_eq!(
            text_query("restaurant", None, "Campinas", "SP"),
            "restaurant in Campinas, SP"
        );
    }

    #[test]
    fn neighborhood_query() {
        assert_eq!(
            text_query("dental clinic", Some("Centro"), "Campinas", "SP"),
            "dental clinic in Centro, Campinas, SP"
        );
    }

    #[test]
    fn blank_neighborhood_is_whole_city() {
        assert_eq!(
            text_query(" gym ", Some("  "), " Campinas ", "SP"),
            "gym in Campinas, SP"
        );
    }
}
