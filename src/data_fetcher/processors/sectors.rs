use indexmap::IndexMap;

use crate::constants::records::INTERSECTORAL_SECTOR_CODE;
use crate::data_fetcher::models::{Sector, SubcategoryResult};

/// Distinct sectors named by the rows of `results`.
///
/// A sector keeps the position where its code was first seen; a later row
/// with a name replaces the earlier name. `Intersectoral` and rows without a
/// `sector_code` are skipped, as are absent results.
pub fn collect_sectors(results: &[Option<&SubcategoryResult>]) -> Vec<Sector> {
    let mut sectors: IndexMap<String, String> = IndexMap::new();

    for row in results.iter().flatten().flat_map(|result| &result.data) {
        let Some(code) = row.text("sector_code") else {
            continue;
        };
        if code == INTERSECTORAL_SECTOR_CODE {
            continue;
        }
        let name = sectors.entry(code).or_default();
        if let Some(sector_name) = row.text("sector_name") {
            *name = sector_name;
        }
    }

    sectors
        .into_iter()
        .map(|(code, name)| Sector { code, name })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::{QueryParams, Record};
    use crate::testing_utils::RecordBuilder;

    fn sector_row(code: &str, name: &str) -> Record {
        RecordBuilder::new()
            .field("sector_code", code)
            .field("sector_name", name)
            .build()
    }

    fn result(rows: Vec<Record>) -> SubcategoryResult {
        SubcategoryResult::from_records(QueryParams::new(), rows)
    }

    #[test]
    fn test_sectors_merge_across_results() {
        let presence = result(vec![
            sector_row("FSC", "Food Security"),
            sector_row("Intersectoral", "Intersectoral"),
            sector_row("HEA", "Health"),
        ]);
        let needs = result(vec![
            sector_row("PRO", "Protection"),
            sector_row("FSC", "Food Security and Agriculture"),
            RecordBuilder::new().field("population_status", "INN").build(),
        ]);

        let sectors = collect_sectors(&[Some(&presence), None, Some(&needs)]);

        assert_eq!(
            sectors,
            vec![
                Sector {
                    code: "FSC".to_string(),
                    name: "Food Security and Agriculture".to_string()
                },
                Sector {
                    code: "HEA".to_string(),
                    name: "Health".to_string()
                },
                Sector {
                    code: "PRO".to_string(),
                    name: "Protection".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_no_results_no_sectors() {
        assert!(collect_sectors(&[None, None]).is_empty());
        assert!(collect_sectors(&[Some(&result(Vec::new()))]).is_empty());
    }
}
