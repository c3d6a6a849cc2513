//! Standalone HTML pages wrapping the charts and the detail table.

use crate::models::{Sighting, SpeciesDetail};

use super::text::escape_html;

const STYLE: &str = r#"
body { font-family: "DejaVu Sans", Arial, sans-serif; margin: 24px; color: #222; }
h1 { font-size: 22px; margin: 0 0 8px 0; }
p.summary { color: #555; margin: 0 0 16px 0; }
table { border-collapse: collapse; max-width: 900px; }
th { background: royalblue; color: white; text-align: left; padding: 8px 12px; }
td { border: 1px solid darkslategray; padding: 6px 12px; vertical-align: top; }
td.field { background: paleturquoise; font-weight: bold; width: 180px; }
img.species { max-width: 480px; max-height: 360px; display: block; margin: 0 0 16px 0; }
div.placeholder { width: 480px; padding: 40px 0; text-align: center; background: #eee; margin: 0 0 16px 0; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Page with a heading, a one-line summary, and an inline SVG chart.
pub fn chart_page(title: &str, summary: &str, svg: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"summary\">{}</p>\n{}",
        escape_html(title),
        escape_html(summary),
        svg
    );
    page(title, &body)
}

/// Species table: image, taxonomy, sighting facts and the resolved address.
pub fn detail_page(title: &str, detail: &SpeciesDetail, sighting: &Sighting) -> String {
    let image = match detail.image_url.as_deref() {
        Some(url) => format!(
            "<img class=\"species\" src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(&detail.common_name)
        ),
        None => "<div class=\"placeholder\">image unavailable</div>".to_string(),
    };

    let taxon_order = detail
        .taxonomy
        .taxon_order
        .map_or_else(|| "not listed".to_string(), |o| format!("{o}"));
    let rows: [(&str, String); 15] = [
        ("Common name", detail.common_name.clone()),
        ("Scientific name", detail.scientific_name.clone()),
        ("Species code", detail.species_code.clone()),
        ("Category", detail.taxonomy.category.clone()),
        ("Order", detail.taxonomy.order.clone()),
        (
            "Family",
            format!(
                "{} ({})",
                detail.taxonomy.family_common, detail.taxonomy.family_scientific
            ),
        ),
        ("Genus", detail.taxonomy.genus.clone()),
        ("Taxonomic order", taxon_order),
        ("Status", detail.taxonomy.status.clone()),
        ("Observed", sighting.observed.clone()),
        ("Location", sighting.location.clone()),
        ("Count", sighting.count_label()),
        (
            "Coordinates",
            format!("{}, {}", sighting.latitude, sighting.longitude),
        ),
        ("Address sighted", detail.address_or_placeholder().to_string()),
        ("Species page", detail.species_page.clone()),
    ];

    let mut table = String::from(
        "<table>\n<tr><th>Information Types</th><th>Information</th></tr>\n",
    );
    for (field, value) in rows.iter() {
        let cell = if *field == "Species page" {
            format!(
                "<a href=\"{0}\">{0}</a>",
                escape_html(value)
            )
        } else {
            escape_html(value)
        };
        table.push_str(&format!(
            "<tr><td class=\"field\">{}</td><td>{}</td></tr>\n",
            field, cell
        ));
    }
    table.push_str("</table>");

    let body = format!("<h1>{}</h1>\n{}\n{}", escape_html(title), image, table);
    page(title, &body)
}
