use crate::types::{Candidate, Recruit};

/// Lowest rating that makes it onto the map.
pub const MIN_STARS: u32 = 4;
pub const MAX_STARS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecruitFilter {
    pub min_stars: u32,
    pub limit: Option<usize>,
}

impl Default for RecruitFilter {
    fn default() -> Self {
        Self {
            min_stars: MIN_STARS,
            limit: None,
        }
    }
}

impl RecruitFilter {
    /// A candidate needs the minimum rating and a hometown to geocode.
    /// An `"Unknown"` name is not disqualifying.
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        candidate.stars >= self.effective_min_stars() && !candidate.location.is_empty()
    }

    /// `min_stars`, never below [`MIN_STARS`] even for unvalidated filters.
    pub fn effective_min_stars(&self) -> u32 {
        self.min_stars.max(MIN_STARS)
    }

    pub fn apply(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.retain(|c| {
            let keep = self.accepts(c);
            if !keep {
                log::debug!(
                    "Skipping {}: below {} stars or missing location",
                    c,
                    self.effective_min_stars()
                );
            }
            keep
        });
        candidates
    }

    pub fn is_full(&self, count: usize) -> bool {
        self.limit.is_some_and(|l| count >= l)
    }

    pub fn validate(self) -> Result<Self, String> {
        if !(MIN_STARS..=MAX_STARS).contains(&self.min_stars) {
            return Err(format!(
                "Minimum stars must be between {MIN_STARS} and {MAX_STARS}, got {}",
                self.min_stars
            ));
        }
        if self.limit.is_some_and(|l| l == 0) {
            return Err("Limit must be greater than 0".to_string());
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub struct RecruitStats {
    pub five_star: usize,
    pub four_star: usize,
    pub total: usize,
}

impl RecruitStats {
    pub fn from_recruits(recruits: &[Recruit]) -> RecruitStats {
        RecruitStats {
            five_star: recruits.iter().filter(|r| r.stars >= 5).count(),
            four_star: recruits.iter().filter(|r| r.stars == 4).count(),
            total: recruits.len(),
        }
    }
}

impl std::fmt::Display for RecruitStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Five-star recruits: {}", self.five_star)?;
        writeln!(f, "  Four-star recruits: {}", self.four_star)?;
        writeln!(f, "  Total:              {}", self.total)
    }
}
