//! Parsers for the catalog and program listing responses.

use tracing::warn;

use degreemap_markup::{attr, first_child, parse_document, selector, text_content};
use degreemap_shared::{CatalogRef, DegreeMapError, Result};

/// Prefix of every catalog `id` attribute.
const CATALOG_ID_PREFIX: &str = "acalog-catalog-";

/// Parse a `getCatalogs` response, newest year first.
///
/// `title_prefix` is stripped from each catalog title to get the year label.
pub fn parse_catalogs(xml: &str, title_prefix: &str) -> Result<Vec<CatalogRef>> {
    let doc = parse_document(xml);

    if doc.select(&selector("catalogs")?).next().is_none() {
        return Err(DegreeMapError::parse("catalog list has no <catalogs> element"));
    }

    let title_sel = selector("title")?;
    let mut catalogs = Vec::new();

    for catalog in doc.select(&selector("catalogs > catalog")?) {
        let raw_id = attr(catalog, "id")
            .ok_or_else(|| DegreeMapError::parse("catalog entry without an id attribute"))?;
        let id = raw_id
            .strip_prefix(CATALOG_ID_PREFIX)
            .unwrap_or(raw_id)
            .to_string();

        let title = catalog
            .select(&title_sel)
            .next()
            .map(text_content)
            .ok_or_else(|| DegreeMapError::parse(format!("catalog {id} has no title")))?;

        let year = match title.trim().strip_prefix(title_prefix.trim_end()) {
            Some(rest) => rest.trim().to_string(),
            None => {
                warn!(catalog = %id, title = %title.trim(), "catalog title without expected prefix");
                title.trim().to_string()
            }
        };

        catalogs.push(CatalogRef { year, id });
    }

    catalogs.sort_by(|a, b| b.year.cmp(&a.year));
    Ok(catalogs)
}

/// Parse a program `listing` response into the ids of programs of `degree_type`.
pub fn parse_program_ids(xml: &str, degree_type: &str) -> Result<Vec<String>> {
    let doc = parse_document(xml);

    let ids = doc
        .select(&selector("result")?)
        .filter(|result| {
            first_child(*result, "type").is_some_and(|t| text_content(t).trim() == degree_type)
        })
        .filter_map(|result| first_child(result, "id"))
        .map(|id| text_content(id).trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_sorted_newest_first() {
        let xml = std::fs::read_to_string("../../../fixtures/xml/catalogs.xml")
            .expect("read catalogs fixture");

        let catalogs = parse_catalogs(&xml, "Rensselaer Catalog ").unwrap();
        let pairs: Vec<(&str, &str)> = catalogs
            .iter()
            .map(|c| (c.year.as_str(), c.id.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![("2023-2024", "26"), ("2022-2023", "24"), ("2021-2022", "22")]
        );
    }

    #[test]
    fn catalog_title_without_prefix_is_kept_whole() {
        let xml = r#"<catalogs><catalog id="acalog-catalog-9"><title>Archive 2010</title></catalog></catalogs>"#;
        let catalogs = parse_catalogs(xml, "Rensselaer Catalog ").unwrap();
        assert_eq!(catalogs[0].year, "Archive 2010");
        assert_eq!(catalogs[0].id, "9");
    }

    #[test]
    fn catalog_list_without_root_is_parse_error() {
        let err = parse_catalogs("<error>bad key</error>", "Rensselaer Catalog ").unwrap_err();
        assert!(matches!(err, DegreeMapError::Parse { .. }));
    }

    #[test]
    fn program_ids_filter_by_degree_type() {
        let xml = std::fs::read_to_string("../../../fixtures/xml/program-listing.xml")
            .expect("read listing fixture");

        assert_eq!(
            parse_program_ids(&xml, "Baccalaureate").unwrap(),
            vec!["5101", "5103"]
        );
        assert_eq!(parse_program_ids(&xml, "Minor").unwrap(), vec!["5102"]);
        assert!(parse_program_ids(&xml, "Doctoral").unwrap().is_empty());
    }
}
