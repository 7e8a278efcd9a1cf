pub mod cache;
pub mod geocoder;
mod parser;
pub mod pipeline;
pub mod scraper;
pub mod types;
pub mod utils;

use std::time::Duration;

pub use cache::{GeocodeCache, MemoryCache};
pub use geocoder::{GeocodeError, Geocoder};
pub use parser::{MAX_CANDIDATES, parse_location, parse_rankings};
pub use pipeline::{Pipeline, PipelineOutcome, sample_recruits};
pub use scraper::{PageFetcher, ScraperError};

pub(crate) const RANKINGS_URL: &str =
    "https://247sports.com/season/2026-football/CompositeRecruitRankings/?InstitutionGroup=HighSchool";

pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub(crate) const RANKINGS_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

pub(crate) const GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";

pub(crate) const GEOCODER_USER_AGENT: &str = "RankBias/1.0";

pub(crate) const GEOCODER_DELAY: Duration = Duration::from_secs(1);
