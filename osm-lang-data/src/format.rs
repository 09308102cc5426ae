//! Address rendering from OSM `addr:*` components.
//!
//! Components are grouped into lines which are joined with [`LINE_BREAK`],
//! marking where a written address would usually break with a comma or a
//! newline. In tagged mode every token carries its component label, e.g.
//! `Gorkého/road ev.2459/house_number | 40004/postcode Trmice/city`.

use osm_lang_core::{AddressFormatter, Tags};

/// Separator placed between address lines.
pub const LINE_BREAK: &str = " | ";

/// Countries writing the house number before the street name.
pub const NUMBER_FIRST_COUNTRIES: &[&str] = &[
    "au", "ca", "fr", "gb", "ie", "in", "my", "nz", "ph", "sg", "us", "za",
];

#[derive(Debug, Clone, Copy)]
struct Component {
    label: &'static str,
    keys: &'static [&'static str],
}

impl Component {
    fn value<'t>(&self, tags: &'t Tags) -> Option<&'t str> {
        self.keys.iter().find_map(|key| {
            tags.get(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
    }

    fn render(&self, tags: &Tags, tag_components: bool) -> Option<String> {
        let value = self.value(tags)?;
        let tokens: Vec<String> = if tag_components {
            value
                .split_whitespace()
                .map(|token| format!("{token}/{}", self.label))
                .collect()
        } else {
            value.split_whitespace().map(str::to_owned).collect()
        };
        Some(tokens.join(" "))
    }
}

const HOUSE: Component = Component {
    label: "house",
    keys: &["addr:housename"],
};
const HOUSE_NUMBER: Component = Component {
    label: "house_number",
    keys: &["addr:housenumber"],
};
const BLOCK: Component = Component {
    label: "block",
    keys: &["addr:block", "addr:block_number"],
};
const ROAD: Component = Component {
    label: "road",
    keys: &["addr:street", "addr:place"],
};
const NEIGHBOURHOOD: Component = Component {
    label: "suburb",
    keys: &["addr:neighbourhood", "addr:neighborhood"],
};
const SUBURB: Component = Component {
    label: "suburb",
    keys: &["addr:suburb"],
};
const WARD: Component = Component {
    label: "city_district",
    keys: &["addr:ward"],
};
const SUBDISTRICT: Component = Component {
    label: "city_district",
    keys: &["addr:subdistrict"],
};
const DISTRICT: Component = Component {
    label: "city_district",
    keys: &["addr:district"],
};
const CITY: Component = Component {
    label: "city",
    keys: &[
        "addr:city",
        "addr:locality",
        "addr:municipality",
        "addr:hamlet",
    ],
};
const PROVINCE: Component = Component {
    label: "state",
    keys: &["addr:province"],
};
const STATE: Component = Component {
    label: "state",
    keys: &["addr:state"],
};
const POSTCODE: Component = Component {
    label: "postcode",
    keys: &["addr:postcode", "addr:postal_code"],
};
const COUNTRY: Component = Component {
    label: "country",
    keys: &["addr:country"],
};

type Layout = &'static [&'static [Component]];

const NUMBER_LAST: Layout = &[
    &[HOUSE],
    &[ROAD, HOUSE_NUMBER, BLOCK],
    &[NEIGHBOURHOOD, SUBURB, WARD, SUBDISTRICT, DISTRICT],
    &[POSTCODE, CITY],
    &[PROVINCE, STATE],
    &[COUNTRY],
];

const NUMBER_FIRST: Layout = &[
    &[HOUSE],
    &[HOUSE_NUMBER, BLOCK, ROAD],
    &[NEIGHBOURHOOD, SUBURB, WARD, SUBDISTRICT, DISTRICT],
    &[CITY, PROVINCE, STATE, POSTCODE],
    &[COUNTRY],
];

/// [`AddressFormatter`] driven by a fixed component table.
///
/// # Examples
/// ```
/// use osm_lang_core::{AddressFormatter, Tags};
/// use osm_lang_data::ComponentFormatter;
///
/// let tags = Tags::from([
///     ("addr:street", "Gorkého"),
///     ("addr:housenumber", "ev.2459"),
///     ("addr:postcode", "40004"),
///     ("addr:city", "Trmice"),
/// ]);
/// let formatter = ComponentFormatter::new();
///
/// assert_eq!(
///     formatter.format("cz", &tags, false).as_deref(),
///     Some("Gorkého ev.2459 | 40004 Trmice")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentFormatter;

impl ComponentFormatter {
    /// Create the formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Report whether `country` writes house numbers before streets.
    #[must_use]
    pub fn number_first(country: &str) -> bool {
        NUMBER_FIRST_COUNTRIES
            .iter()
            .any(|code| code.eq_ignore_ascii_case(country))
    }
}

impl AddressFormatter for ComponentFormatter {
    fn format(&self, country: &str, tags: &Tags, tag_components: bool) -> Option<String> {
        let layout = if Self::number_first(country) {
            NUMBER_FIRST
        } else {
            NUMBER_LAST
        };
        let lines: Vec<String> = layout
            .iter()
            .filter_map(|line| {
                let parts: Vec<String> = line
                    .iter()
                    .filter_map(|component| component.render(tags, tag_components))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" "))
            })
            .collect();
        (!lines.is_empty()).then(|| lines.join(LINE_BREAK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn czech() -> Tags {
        Tags::from([
            ("addr:street", "Gorkého"),
            ("addr:housenumber", "ev.2459"),
            ("addr:postcode", "40004"),
            ("addr:city", "Trmice"),
            ("addr:country", "CZ"),
        ])
    }

    #[rstest]
    fn tagged_output_labels_every_token(czech: Tags) {
        assert_eq!(
            ComponentFormatter::new().format("cz", &czech, true).as_deref(),
            Some("Gorkého/road ev.2459/house_number | 40004/postcode Trmice/city | CZ/country")
        );
    }

    #[rstest]
    fn number_first_countries_lead_with_the_house_number() {
        let tags = Tags::from([
            ("addr:housenumber", "221B"),
            ("addr:street", "Baker Street"),
            ("addr:city", "London"),
            ("addr:postcode", "NW1 6XE"),
        ]);
        assert_eq!(
            ComponentFormatter::new().format("GB", &tags, true).as_deref(),
            Some("221B/house_number Baker/road Street/road | London/city NW1/postcode 6XE/postcode")
        );
    }

    #[rstest]
    #[case(&[("addr:locality", "Trsic")], "Trsic")]
    #[case(&[("addr:city", "Loznica"), ("addr:hamlet", "Trsic")], "Loznica")]
    #[case(&[("addr:place", "Vukov put"), ("addr:housenumber", "BB")], "Vukov put BB")]
    #[case(&[("addr:neighborhood", "Centar")], "Centar")]
    #[case(&[("addr:postal_code", "15303")], "15303")]
    fn alternate_keys_fill_components(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        let tags: Tags = pairs.iter().copied().collect();
        assert_eq!(
            ComponentFormatter::new().format("rs", &tags, false).as_deref(),
            Some(expected)
        );
    }

    #[rstest]
    fn house_names_form_their_own_line() {
        let tags = Tags::from([
            ("addr:housename", "Crkva Svetog Arhangela Mihaila"),
            ("addr:place", "Vukov put"),
            ("addr:housenumber", "BB"),
            ("addr:postcode", "15303"),
            ("addr:city", "Trsic"),
        ]);
        assert_eq!(
            ComponentFormatter::new().format("rs", &tags, false).as_deref(),
            Some("Crkva Svetog Arhangela Mihaila | Vukov put BB | 15303 Trsic")
        );
    }

    #[rstest]
    fn blank_and_unrelated_tags_yield_nothing() {
        let tags = Tags::from([("addr:street", "  "), ("name", "Somewhere"), ("house", "yes")]);
        assert_eq!(ComponentFormatter::new().format("de", &tags, false), None);
    }

    #[rstest]
    fn whitespace_inside_values_is_collapsed() {
        let tags = Tags::from([("addr:street", " Rue   de la  Paix ")]);
        assert_eq!(
            ComponentFormatter::new().format("be", &tags, false).as_deref(),
            Some("Rue de la Paix")
        );
    }
}
