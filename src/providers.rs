use serde::Serialize;

use crate::models::{Provider, WatchAvailability};

/// Categories the card may promote. Purchase listings stay in
/// [`WatchAvailability::buy`] but are never surfaced, so they have no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderCategory {
    Subscription,
    AdSupported,
    Rental,
}

impl ProviderCategory {
    pub fn label(self) -> &'static str {
        match self {
            ProviderCategory::Subscription => "Stream on",
            ProviderCategory::AdSupported => "Watch Free with Ads",
            ProviderCategory::Rental => "Rent on",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderOffer {
    pub category: ProviderCategory,
    pub provider_names: Vec<String>,
}

/// What the card should say under "How to Watch".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WatchSummary {
    Offers {
        offers: Vec<ProviderOffer>,
        link: Option<String>,
    },
    LinkOnly {
        link: String,
    },
    NotAvailable,
}

/// Picks the viewing options worth promoting.
///
/// Subscription wins and hides rentals. Free-with-ads rides along with
/// whatever else is shown. Rentals only appear without a subscription option.
/// Purchases are never promoted.
pub fn select(avail: &WatchAvailability) -> Option<Vec<ProviderOffer>> {
    let mut offers = Vec::new();

    if !avail.flatrate.is_empty() {
        offers.push(offer(ProviderCategory::Subscription, &avail.flatrate));
    }
    if !avail.ads.is_empty() {
        offers.push(offer(ProviderCategory::AdSupported, &avail.ads));
    }
    if avail.flatrate.is_empty() && !avail.rent.is_empty() {
        offers.push(offer(ProviderCategory::Rental, &avail.rent));
    }

    if offers.is_empty() {
        None
    } else {
        Some(offers)
    }
}

pub fn summarize(avail: Option<&WatchAvailability>) -> WatchSummary {
    let Some(avail) = avail else {
        return WatchSummary::NotAvailable;
    };
    let link = avail
        .link
        .as_ref()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    match (select(avail), link) {
        (Some(offers), link) => WatchSummary::Offers { offers, link },
        (None, Some(link)) => WatchSummary::LinkOnly { link },
        (None, None) => WatchSummary::NotAvailable,
    }
}

fn offer(category: ProviderCategory, providers: &[Provider]) -> ProviderOffer {
    ProviderOffer {
        category,
        provider_names: providers.iter().map(|p| p.provider_name.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<Provider> {
        list.iter().map(|n| Provider::new(*n)).collect()
    }

    fn categories(offers: &[ProviderOffer]) -> Vec<ProviderCategory> {
        offers.iter().map(|o| o.category).collect()
    }

    #[test]
    fn subscription_suppresses_rental() {
        let avail = WatchAvailability {
            flatrate: names(&["Netflix", "HBO Max"]),
            rent: names(&["Apple TV", "Amazon Video"]),
            buy: names(&["YouTube"]),
            ..Default::default()
        };
        let offers = select(&avail).expect("offers");
        assert_eq!(categories(&offers), vec![ProviderCategory::Subscription]);
        assert_eq!(offers[0].provider_names, vec!["Netflix", "HBO Max"]);
    }

    #[test]
    fn ads_are_shown_alongside_subscription() {
        let avail = WatchAvailability {
            flatrate: names(&["Netflix"]),
            ads: names(&["Tubi"]),
            rent: names(&["Apple TV"]),
            ..Default::default()
        };
        let offers = select(&avail).expect("offers");
        assert_eq!(
            categories(&offers),
            vec![ProviderCategory::Subscription, ProviderCategory::AdSupported]
        );
    }

    #[test]
    fn rental_shown_when_no_subscription() {
        let avail = WatchAvailability {
            rent: names(&["Apple TV"]),
            ads: names(&["Pluto TV"]),
            ..Default::default()
        };
        let offers = select(&avail).expect("offers");
        assert_eq!(
            categories(&offers),
            vec![ProviderCategory::AdSupported, ProviderCategory::Rental]
        );
    }

    #[test]
    fn purchase_only_yields_nothing() {
        let avail = WatchAvailability {
            buy: names(&["Google Play Movies"]),
            ..Default::default()
        };
        assert_eq!(select(&avail), None);
    }

    #[test]
    fn same_provider_may_appear_in_several_categories() {
        let avail = WatchAvailability {
            flatrate: names(&["Amazon"]),
            ads: names(&["Amazon"]),
            ..Default::default()
        };
        let offers = select(&avail).expect("offers");
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| o.provider_names == vec!["Amazon"]));
    }

    #[test]
    fn summary_falls_back_to_link_then_not_available() {
        let link_only = WatchAvailability {
            link: Some("https://www.themoviedb.org/movie/1/watch".to_string()),
            buy: names(&["YouTube"]),
            ..Default::default()
        };
        assert_eq!(
            summarize(Some(&link_only)),
            WatchSummary::LinkOnly {
                link: "https://www.themoviedb.org/movie/1/watch".to_string()
            }
        );
        assert_eq!(
            summarize(Some(&WatchAvailability::default())),
            WatchSummary::NotAvailable
        );
        assert_eq!(summarize(None), WatchSummary::NotAvailable);
    }

    #[test]
    fn summary_keeps_link_next_to_offers() {
        let avail = WatchAvailability {
            link: Some("https://example.test/watch".to_string()),
            rent: names(&["Apple TV"]),
            ..Default::default()
        };
        match summarize(Some(&avail)) {
            WatchSummary::Offers { offers, link } => {
                assert_eq!(categories(&offers), vec![ProviderCategory::Rental]);
                assert_eq!(link.as_deref(), Some("https://example.test/watch"));
            }
            other => panic!("unexpected summary {other:?}"),
        }
    }

    #[test]
    fn labels_match_card_headings() {
        assert_eq!(ProviderCategory::Subscription.label(), "Stream on");
        assert_eq!(ProviderCategory::AdSupported.label(), "Watch Free with Ads");
        assert_eq!(ProviderCategory::Rental.label(), "Rent on");
    }
}
