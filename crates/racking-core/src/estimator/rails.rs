use super::combinations::CombinationsWithReplacement;
use crate::types::*;
use tracing::trace;

/// Chooses rail stock for a required length using a greedy bulk fill
/// followed by an exhaustive search over the remainder.
///
/// The result covers one side; both physical rails of a row are cut
/// identically, so counts, splices and waste are reported doubled.
pub struct RailOptimizer<'a> {
    catalog: &'a RailStockCatalog,
    limits: SearchLimits,
}

impl<'a> RailOptimizer<'a> {
    pub fn new(catalog: &'a RailStockCatalog, limits: SearchLimits) -> Result<Self> {
        if catalog.is_empty() {
            return Err(EstimateError::EmptyCatalog);
        }
        Ok(Self { catalog, limits })
    }

    /// Selects stock pieces whose summed length reaches `required`.
    pub fn select(&self, required: f64) -> Result<RailSelection> {
        if !required.is_finite() || required <= 0.0 {
            return Err(EstimateError::invalid_geometry(
                "rail_length_required",
                required,
            ));
        }

        let (mut pieces, remainder) = self.bulk_fill(required);
        let (tail, min_waste) = self.best_remainder(remainder)?;
        pieces.extend(tail);

        if min_waste < 0.0 {
            return Err(EstimateError::PreconditionViolated {
                row: 0,
                reason: format!("rail selection produced negative waste {min_waste}"),
            });
        }

        let stock_counts = self
            .catalog
            .lengths()
            .iter()
            .map(|&length| StockCount {
                length,
                count: pieces.iter().filter(|&&p| p == length).count() as u32 * 2,
            })
            .collect();
        let splice_count = if pieces.len() < 2 {
            0
        } else {
            (pieces.len() as u32 - 1) * 2
        };

        Ok(RailSelection {
            pieces,
            stock_counts,
            splice_count,
            waste: min_waste * 2.0,
        })
    }

    /// Stock length repeated during the bulk fill: the longest length that
    /// still leaves more than half the shortest length behind.
    fn main_length(&self, required: f64, min_len: f64) -> f64 {
        self.catalog
            .lengths()
            .iter()
            .rev()
            .copied()
            .find(|&s| required > s + min_len / 2.0)
            .unwrap_or(min_len)
    }

    /// Consumes the bulk of a long requirement with one repeated length,
    /// stopping while the remainder can still be closed out cleanly.
    /// Returns the pieces taken and what is left to cover.
    fn bulk_fill(&self, required: f64) -> (Vec<f64>, f64) {
        let (Some(min_len), Some(max_len)) =
            (self.catalog.min_length(), self.catalog.max_length())
        else {
            return (Vec::new(), required);
        };
        if required <= max_len {
            return (Vec::new(), required);
        }

        let main = self.main_length(required, min_len);
        let mut pieces = Vec::new();
        let mut remainder = required;
        while remainder >= main + min_len {
            pieces.push(main);
            remainder -= main;
        }

        trace!(main, taken = pieces.len(), remainder, "bulk fill");
        (pieces, remainder)
    }

    /// Finds the least-waste multiset of stock lengths covering `remainder`.
    ///
    /// Sizes run from one up to the catalog size; the first combination to
    /// reach a new minimum wins, so ties go to fewer pieces and then to the
    /// lexicographically smallest ascending combination. A single-length
    /// catalog may need more pieces than it has lengths, in which case the
    /// search widens until a covering size is found.
    fn best_remainder(&self, remainder: f64) -> Result<(Vec<f64>, f64)> {
        let lengths = self.catalog.lengths();
        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut visited: u64 = 0;
        let mut size = 1;

        loop {
            for combo in CombinationsWithReplacement::new(lengths.len(), size) {
                visited += 1;
                if visited > self.limits.max_combinations {
                    return Err(EstimateError::SearchLimitExceeded {
                        row: 0,
                        limit: self.limits.max_combinations,
                    });
                }

                let total: f64 = combo.iter().map(|&i| lengths[i]).sum();
                if total < remainder {
                    continue;
                }
                let waste = total - remainder;
                if best.as_ref().map_or(true, |(_, min)| waste < *min) {
                    best = Some((combo, waste));
                }
            }

            if size >= lengths.len() {
                if let Some((combo, waste)) = best.take() {
                    trace!(remainder, visited, size, "remainder search");
                    return Ok((combo.into_iter().map(|i| lengths[i]).collect(), waste));
                }
            }
            size += 1;
        }
    }
}

/// Runs the optimizer once with default search limits.
pub fn select_rails(required: f64, catalog: &RailStockCatalog) -> Result<RailSelection> {
    RailOptimizer::new(catalog, SearchLimits::default())?.select(required)
}
