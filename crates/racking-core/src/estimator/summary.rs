use super::*;

/// End clamps per row: two rails, one at each end
const END_CLAMPS_PER_ROW: u32 = 4;

impl Estimator {
    /// Folds per-row results into array totals, in row order.
    pub(super) fn summarize(&self, rows: Vec<RowResult>) -> EquipmentSummary {
        let mut rail_counts: Vec<StockCount> = self
            .catalog
            .lengths()
            .iter()
            .map(|&length| StockCount { length, count: 0 })
            .collect();

        let mut total_panels = 0;
        let mut total_mid_clamps = 0;
        let mut total_end_clamps = 0;
        let mut total_splices = 0;
        let mut total_waste = 0.0;
        let mut mounts = 0.0;

        for row in &rows {
            total_panels += row.panel_count;
            total_end_clamps += END_CLAMPS_PER_ROW;
            total_mid_clamps += 2 * (row.panel_count - 1);
            total_splices += row.rails.splice_count;
            total_waste += row.rails.waste;
            mounts += row.mounts;

            for used in &row.rails.stock_counts {
                if let Some(total) = rail_counts.iter_mut().find(|t| t.length == used.length) {
                    total.count += used.count;
                }
            }
        }

        EquipmentSummary {
            total_panels,
            total_mounts: mounts.floor() as u64,
            total_mid_clamps,
            total_end_clamps,
            total_splices,
            total_waste,
            rail_counts,
            rows,
        }
    }
}
