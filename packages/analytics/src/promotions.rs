//! Marketing programs listed by projects.

use realty_dash_analytics_models::{ProjectFilter, PromotionRow, PromotionShare};
use realty_dash_market_models::Project;

/// Type given to programs that do not name one.
pub const OTHER_PROMOTION_KIND: &str = "Прочее";

/// Flattens the promotions of the selected projects.
///
/// `kind` keeps only programs whose declared type equals it; programs
/// without a type never match a specific kind. Snapshot order is kept.
#[must_use]
pub fn promotion_rows(
    projects: &[Project],
    filter: &ProjectFilter,
    kind: Option<&str>,
) -> Vec<PromotionRow> {
    projects
        .iter()
        .filter(|p| filter.matches(&p.jk_name))
        .flat_map(|project| {
            project
                .promotions
                .iter()
                .flatten()
                .filter(move |promo| kind.is_none_or(|k| promo.kind.as_deref() == Some(k)))
                .map(move |promo| PromotionRow {
                    project: project.jk_name.clone(),
                    kind: promo
                        .kind
                        .clone()
                        .filter(|k| !k.is_empty())
                        .unwrap_or_else(|| OTHER_PROMOTION_KIND.to_string()),
                    description: promo.description.clone().unwrap_or_default(),
                })
        })
        .collect()
}

/// Count and share of each promotion type, in order of first appearance.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn promotion_distribution(rows: &[PromotionRow]) -> Vec<PromotionShare> {
    let mut shares: Vec<PromotionShare> = Vec::new();

    for row in rows {
        if let Some(share) = shares.iter_mut().find(|s| s.kind == row.kind) {
            share.count += 1;
        } else {
            shares.push(PromotionShare {
                kind: row.kind.clone(),
                count: 1,
                percent: 0.0,
            });
        }
    }

    let total = rows.len() as f64;
    for share in &mut shares {
        share.percent = share.count as f64 / total * 100.0;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_dash_market_models::Promotion;

    fn promo(kind: Option<&str>, description: &str) -> Promotion {
        Promotion {
            kind: kind.map(str::to_string),
            description: Some(description.to_string()),
        }
    }

    fn fixture() -> Vec<Project> {
        vec![
            Project {
                jk_name: "A".to_string(),
                promotions: Some(vec![
                    promo(Some("Ипотека"), "6%"),
                    promo(None, "Паркинг в подарок"),
                    promo(Some("Ипотека"), "Семейная"),
                ]),
                ..Project::default()
            },
            Project {
                jk_name: "B".to_string(),
                promotions: Some(vec![promo(Some("Скидки"), "5%")]),
                ..Project::default()
            },
            Project {
                jk_name: "C".to_string(),
                ..Project::default()
            },
        ]
    }

    #[test]
    fn missing_type_becomes_other() {
        let rows = promotion_rows(&fixture(), &ProjectFilter::all(), None);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].kind, OTHER_PROMOTION_KIND);
        assert_eq!(rows[3].project, "B");
    }

    #[test]
    fn filters_by_project_and_kind() {
        let rows = promotion_rows(&fixture(), &ProjectFilter::only(["A"]), Some("Ипотека"));
        let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, ["6%", "Семейная"]);

        assert!(promotion_rows(&fixture(), &ProjectFilter::all(), Some(OTHER_PROMOTION_KIND)).is_empty());
    }

    #[test]
    fn distribution_keeps_first_seen_order() {
        let rows = promotion_rows(&fixture(), &ProjectFilter::all(), None);
        let shares = promotion_distribution(&rows);

        let kinds: Vec<(&str, usize)> = shares.iter().map(|s| (s.kind.as_str(), s.count)).collect();
        assert_eq!(kinds, [("Ипотека", 2), (OTHER_PROMOTION_KIND, 1), ("Скидки", 1)]);
        assert!((shares[0].percent - 50.0).abs() < 1e-9);
        assert!((shares.iter().map(|s| s.percent).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_distribution() {
        assert!(promotion_distribution(&[]).is_empty());
    }
}
