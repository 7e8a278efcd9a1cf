use crate::geocoder::Geocoder;
use crate::parser::parse_rankings;
use crate::scraper::PageFetcher;
use crate::types::{Candidate, Coordinates, Recruit};
use crate::utils::RecruitFilter;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Recruits(Vec<Recruit>),
    /// Nothing usable: the page could not be fetched or no entry survived
    /// filtering and geocoding.
    Empty,
}

impl PipelineOutcome {
    pub fn into_recruits(self) -> Option<Vec<Recruit>> {
        match self {
            PipelineOutcome::Recruits(recruits) => Some(recruits),
            PipelineOutcome::Empty => None,
        }
    }
}

impl From<Vec<Recruit>> for PipelineOutcome {
    fn from(recruits: Vec<Recruit>) -> Self {
        if recruits.is_empty() {
            PipelineOutcome::Empty
        } else {
            PipelineOutcome::Recruits(recruits)
        }
    }
}

/// Fixed placeholder points served when live data is unavailable.
pub fn sample_recruits() -> Vec<Recruit> {
    [
        ("Sample Recruit 1", "Los Angeles, CA", 34.0522, -118.2437),
        ("Sample Recruit 2", "Miami, FL", 25.7617, -80.1918),
        ("Sample Recruit 3", "Dallas, TX", 32.7767, -96.7970),
    ]
    .into_iter()
    .map(|(name, location, lat, lng)| {
        Recruit::new(
            Candidate {
                name: name.to_string(),
                location: location.to_string(),
                stars: 5,
            },
            Coordinates::new(lat, lng),
        )
    })
    .collect()
}

/// Fetch, extract, filter and geocode, in that order, on every run.
///
/// Locations are resolved one at a time so the geocoder's delay bounds the
/// request rate. Only the geocode cache carries state between runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fetcher: PageFetcher,
    geocoder: Geocoder,
    filter: RecruitFilter,
}

impl Pipeline {
    pub fn new(fetcher: PageFetcher, geocoder: Geocoder) -> Self {
        Self {
            fetcher,
            geocoder,
            filter: RecruitFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: RecruitFilter) -> Self {
        self.filter = filter;
        self
    }

    pub async fn run(&self) -> PipelineOutcome {
        match self.fetcher.fetch_rankings_page().await {
            Ok(html) => self.run_on_markup(&html).await,
            Err(e) => {
                log::warn!("Failed to fetch rankings: {}", e);
                PipelineOutcome::Empty
            }
        }
    }

    pub async fn run_on_markup(&self, html: &str) -> PipelineOutcome {
        self.geocode_candidates(parse_rankings(html)).await
    }

    pub async fn geocode_candidates(&self, candidates: Vec<Candidate>) -> PipelineOutcome {
        let candidates = self.filter.apply(candidates);
        log::info!("{} candidates qualify for geocoding", candidates.len());

        let mut recruits = Vec::new();
        for candidate in candidates {
            if self.filter.is_full(recruits.len()) {
                break;
            }

            match self.geocoder.resolve(&candidate.location).await {
                Some(coords) => {
                    log::info!(
                        "Added: {} - {} ({}*)",
                        candidate.name,
                        candidate.location,
                        candidate.stars
                    );
                    recruits.push(Recruit::new(candidate, coords));
                }
                None => log::debug!("Dropping {}: location not resolved", candidate),
            }
        }

        log::info!("Pipeline produced {} recruits", recruits.len());
        recruits.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{GeocodeCache, MemoryCache};
    use mockito::Matcher;
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;

    fn fixture() -> String {
        fs::read_to_string("fixtures/composite_rankings_2026.html")
            .expect("Failed to read fixture")
    }

    fn pipeline(
        rankings: &mockito::ServerGuard,
        nominatim: &mockito::ServerGuard,
        cache: Arc<MemoryCache>,
    ) -> Pipeline {
        let fetcher = PageFetcher::with_url(format!("{}/rankings", rankings.url())).unwrap();
        let geocoder = Geocoder::new(cache)
            .unwrap()
            .with_base_url(nominatim.url())
            .with_delay(Duration::ZERO);
        Pipeline::new(fetcher, geocoder)
    }

    fn candidate(name: &str, location: &str, stars: u32) -> Candidate {
        Candidate {
            name: name.to_string(),
            location: location.to_string(),
            stars,
        }
    }

    #[test]
    fn test_sample_recruits() {
        let samples = sample_recruits();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].name, "Sample Recruit 1");
        assert_eq!(samples[0].coordinates(), Coordinates::new(34.0522, -118.2437));
        assert_eq!(samples[1].name, "Sample Recruit 2");
        assert_eq!(samples[1].coordinates(), Coordinates::new(25.7617, -80.1918));
        assert_eq!(samples[2].name, "Sample Recruit 3");
        assert_eq!(samples[2].coordinates(), Coordinates::new(32.7767, -96.7970));
        assert!(samples.iter().all(|r| r.stars == 5));
    }

    #[tokio::test]
    async fn test_run_fetch_failure_is_empty() {
        let mut rankings = mockito::Server::new_async().await;
        let nominatim = mockito::Server::new_async().await;
        let _mock = rankings
            .mock("GET", "/rankings")
            .with_status(500)
            .create_async()
            .await;

        let pipeline = pipeline(&rankings, &nominatim, Arc::new(MemoryCache::new()));

        assert_eq!(pipeline.run().await, PipelineOutcome::Empty);
    }

    #[tokio::test]
    async fn test_run_geocodes_each_qualifying_candidate_once() {
        let mut rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let _page = rankings
            .mock("GET", "/rankings")
            .with_status(200)
            .with_body(fixture())
            .create_async()
            .await;
        let search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lat": "30.0", "lon": "-90.0"}]"#)
            .expect(4)
            .create_async()
            .await;

        let cache = Arc::new(MemoryCache::new());
        let pipeline = pipeline(&rankings, &nominatim, cache.clone());

        let recruits = pipeline
            .run()
            .await
            .into_recruits()
            .expect("Should produce recruits");

        let names: Vec<&str> = recruits.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Keisean Henderson", "Jared Curtis", "Dallas Wilson", "Unknown"]
        );
        assert!(recruits.iter().all(|r| r.stars >= 4));
        assert!(
            recruits
                .iter()
                .all(|r| cache.get(&r.location) == Some(r.coordinates()))
        );
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_on_markup_is_idempotent_with_warm_cache() {
        let rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let cache = Arc::new(MemoryCache::seeded(
            [
                ("Spring, TX", 30.0799, -95.4172),
                ("Nashville, TN", 36.1627, -86.7816),
                ("Tampa, FL", 27.9506, -82.4572),
                ("Mobile, AL", 30.6954, -88.0399),
            ]
            .map(|(loc, lat, lng)| (loc.to_string(), Coordinates::new(lat, lng))),
        ));
        let pipeline = pipeline(&rankings, &nominatim, cache);
        let html = fixture();

        let first = pipeline.run_on_markup(&html).await;
        let second = pipeline.run_on_markup(&html).await;

        assert_eq!(first, second);
        let recruits = first.into_recruits().unwrap();
        assert_eq!(recruits.len(), 4);
        assert_eq!(recruits[1].coordinates(), Coordinates::new(36.1627, -86.7816));
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_failure_drops_candidate() {
        let rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let _search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let cache = Arc::new(MemoryCache::new());
        let pipeline = pipeline(&rankings, &nominatim, cache.clone());

        let outcome = pipeline
            .geocode_candidates(vec![candidate("John Doe", "Houston, TX", 5)])
            .await;

        assert_eq!(outcome, PipelineOutcome::Empty);
        assert!(cache.get("Houston, TX").is_none());
    }

    #[tokio::test]
    async fn test_shared_hometown_geocoded_once() {
        let rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "Miami, FL".into()))
            .with_status(200)
            .with_body(r#"[{"lat": "25.7617", "lon": "-80.1918"}]"#)
            .expect(1)
            .create_async()
            .await;

        let pipeline = pipeline(&rankings, &nominatim, Arc::new(MemoryCache::new()));

        let recruits = pipeline
            .geocode_candidates(vec![
                candidate("A", "Miami, FL", 5),
                candidate("B", "Miami, FL", 4),
                candidate("C", "Miami, FL", 2),
            ])
            .await
            .into_recruits()
            .unwrap();

        assert_eq!(recruits.len(), 2);
        assert_eq!(recruits[0].coordinates(), recruits[1].coordinates());
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_limit_stops_geocoding() {
        let rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lat": "1.0", "lon": "2.0"}]"#)
            .expect(2)
            .create_async()
            .await;

        let pipeline = pipeline(&rankings, &nominatim, Arc::new(MemoryCache::new()))
            .with_filter(RecruitFilter {
                min_stars: 4,
                limit: Some(2),
            });

        let recruits = pipeline
            .geocode_candidates(vec![
                candidate("A", "Austin, TX", 5),
                candidate("B", "Boise, ID", 5),
                candidate("C", "Chicago, IL", 5),
            ])
            .await
            .into_recruits()
            .unwrap();

        assert_eq!(recruits.len(), 2);
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_permissive_filter_still_rejects_low_ratings() {
        let rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lat": "1.0", "lon": "2.0"}]"#)
            .expect(0)
            .create_async()
            .await;

        let pipeline = pipeline(&rankings, &nominatim, Arc::new(MemoryCache::new()))
            .with_filter(RecruitFilter {
                min_stars: 0,
                limit: None,
            });

        let outcome = pipeline
            .geocode_candidates(vec![
                candidate("Low", "Austin, TX", 1),
                candidate("Mid", "Boise, ID", 3),
            ])
            .await;

        assert_eq!(outcome, PipelineOutcome::Empty);
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_min_stars_five_excludes_four_star() {
        let rankings = mockito::Server::new_async().await;
        let mut nominatim = mockito::Server::new_async().await;
        let _search = nominatim
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lat": "1.0", "lon": "2.0"}]"#)
            .create_async()
            .await;

        let pipeline = pipeline(&rankings, &nominatim, Arc::new(MemoryCache::new()))
            .with_filter(RecruitFilter {
                min_stars: 5,
                limit: None,
            });

        let recruits = pipeline
            .geocode_candidates(vec![
                candidate("A", "Austin, TX", 4),
                candidate("B", "Boise, ID", 5),
            ])
            .await
            .into_recruits()
            .unwrap();

        assert_eq!(recruits.len(), 1);
        assert_eq!(recruits[0].name, "B");
    }
}
