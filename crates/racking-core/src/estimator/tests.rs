use super::*;

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn panel() -> PanelSpec {
    PanelSpec {
        width: 44.65,
        height: 82.44,
        weight: 60.0,
    }
}

fn rails() -> RailStockCatalog {
    RailStockCatalog::new([185.0, 140.0]).unwrap()
}

fn request(rows: Vec<RowSpec>) -> EstimateRequest {
    EstimateRequest {
        rows,
        panel: Some(panel()),
        panel_model: None,
        config: RackingConfig::default(),
        catalog: Some(rails()),
        include_deadload: false,
        limits: SearchLimits::default(),
    }
}

#[test]
fn test_portrait_row_geometry() {
    let row = RowSpec::new(4, Orientation::Portrait);
    let geometry = row_geometry(&row, &panel(), &RackingConfig::default());

    assert_close(geometry.row_width, 180.475);
    assert_close(geometry.rail_length, 188.475);
}

#[test]
fn test_landscape_row_uses_panel_height() {
    let row = RowSpec::new(1, Orientation::Landscape);
    let geometry = row_geometry(&row, &panel(), &RackingConfig::default());

    assert_close(geometry.row_width, 82.44);
    assert_close(geometry.rail_length, 90.44);
}

#[test]
fn test_row_width_grows_with_panel_count() {
    let config = RackingConfig::default();
    for orientation in [Orientation::Portrait, Orientation::Landscape] {
        let mut previous = 0.0;
        for count in 1..=100 {
            let width = row_geometry(&RowSpec::new(count, orientation), &panel(), &config).row_width;
            assert!(width > previous);
            previous = width;
        }
    }
}

#[test]
fn test_four_portrait_panels_take_two_short_rails() {
    let selection = select_rails(188.475, &rails()).unwrap();

    assert_eq!(selection.pieces, vec![140.0, 140.0]);
    assert_eq!(selection.count_for(140.0), 4);
    assert_eq!(selection.count_for(185.0), 0);
    assert_eq!(selection.splice_count, 2);
    assert_close(selection.waste, 183.05);
}

#[test]
fn test_short_row_takes_single_smallest_covering_rail() {
    let selection = select_rails(90.44, &rails()).unwrap();

    assert_eq!(selection.pieces, vec![140.0]);
    assert_eq!(selection.count_for(140.0), 2);
    assert_eq!(selection.splice_count, 0);
    assert_close(selection.waste, 99.12);
}

#[test]
fn test_long_row_bulk_fills_with_longest_rail() {
    // 10 portrait panels: 452.125 wide, 460.125 of rail per side
    let selection = select_rails(460.125, &rails()).unwrap();

    assert_eq!(selection.pieces, vec![185.0, 140.0, 140.0]);
    assert_eq!(selection.count_for(185.0), 2);
    assert_eq!(selection.count_for(140.0), 4);
    assert_eq!(selection.splice_count, 4);
    assert_close(selection.waste, 9.75);
}

#[test]
fn test_hundred_panel_row_stays_tight() {
    let selection = select_rails(4534.875, &rails()).unwrap();

    assert_eq!(selection.count_for(185.0), 46);
    assert_eq!(selection.count_for(140.0), 4);
    assert_eq!(selection.splice_count, 48);
    assert!((selection.waste - 0.25).abs() < 1e-6);
}

#[test]
fn test_single_length_catalog_degenerates_to_ceiling() {
    let catalog = RailStockCatalog::new([140.0]).unwrap();

    let selection = select_rails(300.0, &catalog).unwrap();
    assert_eq!(selection.pieces, vec![140.0; 3]);
    assert_eq!(selection.splice_count, 4);
    assert_close(selection.waste, 240.0);

    let selection = select_rails(100.0, &catalog).unwrap();
    assert_eq!(selection.pieces, vec![140.0]);
    assert_close(selection.waste, 80.0);
}

#[test]
fn test_equal_waste_prefers_fewer_pieces_then_ascending_order() {
    // 200 is covered exactly by 200 alone and by 100 + 100
    let catalog = RailStockCatalog::new([200.0, 100.0]).unwrap();
    let selection = select_rails(200.0, &catalog).unwrap();

    assert_eq!(selection.pieces, vec![200.0]);
    assert_eq!(selection.waste, 0.0);
}

#[test]
fn test_catalog_order_does_not_change_selection() {
    let a = select_rails(500.0, &RailStockCatalog::new([96.0, 144.0, 168.0, 204.0]).unwrap())
        .unwrap();
    let b = select_rails(500.0, &RailStockCatalog::new([204.0, 168.0, 96.0, 144.0]).unwrap())
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(a.pieces, vec![204.0, 96.0, 204.0]);
    assert_close(a.waste, 8.0);
}

#[test]
fn test_selection_invariants_hold_across_lengths() {
    let catalogs = [
        rails(),
        RailStockCatalog::new([140.0]).unwrap(),
        RailStockCatalog::new([96.0, 144.0, 168.0, 204.0]).unwrap(),
    ];

    for catalog in &catalogs {
        let max_piece = catalog.max_length().unwrap();
        let mut length = 10.0;
        while length < 5000.0 {
            let selection = select_rails(length, catalog).unwrap();

            assert!(selection.waste >= 0.0);
            assert!(selection.side_length() >= length);
            assert_close(selection.waste, (selection.side_length() - length) * 2.0);
            // Waste per side never exceeds one extra piece
            assert!(selection.waste / 2.0 < max_piece);
            assert!(selection.stock_counts.iter().all(|s| s.count % 2 == 0));
            assert_eq!(selection.splice_count % 2, 0);
            let pieces: u32 = selection.stock_counts.iter().map(|s| s.count).sum();
            assert_eq!(pieces as usize, selection.pieces.len() * 2);

            length += 37.3;
        }
    }
}

#[test]
fn test_non_positive_length_is_rejected() {
    assert!(matches!(
        select_rails(0.0, &rails()),
        Err(EstimateError::InvalidGeometry { .. })
    ));
}

#[test]
fn test_search_limit_is_enforced() {
    let catalog = rails();
    let optimizer = RailOptimizer::new(
        &catalog,
        SearchLimits {
            max_combinations: 2,
        },
    )
    .unwrap();

    assert!(matches!(
        optimizer.select(188.475),
        Err(EstimateError::SearchLimitExceeded { limit: 2, .. })
    ));
}

#[test]
fn test_empty_catalog_fails_before_rows() {
    let mut req = request(vec![RowSpec::new(0, Orientation::Portrait)]);
    req.catalog = Some(RailStockCatalog::from(Vec::<f64>::new()));

    assert_eq!(Estimator::new(req).err(), Some(EstimateError::EmptyCatalog));

    let mut req = request(vec![RowSpec::new(4, Orientation::Portrait)]);
    req.catalog = None;
    assert_eq!(Estimator::new(req).err(), Some(EstimateError::EmptyCatalog));
}

#[test]
fn test_invalid_row_counts_name_the_row() {
    let rows = vec![
        RowSpec::new(4, Orientation::Portrait),
        RowSpec::new(0, Orientation::Portrait),
    ];
    assert_eq!(
        Estimator::new(request(rows)).err(),
        Some(EstimateError::InvalidRowCount { row: 1, count: 0 })
    );

    let rows = vec![RowSpec::new(101, Orientation::Landscape)];
    assert_eq!(
        estimate(&rows, &panel(), &RackingConfig::default(), &rails()).err(),
        Some(EstimateError::InvalidRowCount { row: 0, count: 101 })
    );
}

#[test]
fn test_missing_panel_is_rejected() {
    let mut req = request(vec![RowSpec::new(4, Orientation::Portrait)]);
    req.panel = None;

    assert!(matches!(
        Estimator::new(req),
        Err(EstimateError::InvalidInput { ref field, .. }) if field == "panel"
    ));
}

#[test]
fn test_continuous_mounts() {
    let config = RackingConfig::default();

    assert_eq!(row_mounts(180.475, &config).unwrap(), 10.0);
    assert_eq!(row_mounts(82.44, &config).unwrap(), 6.0);
    assert_eq!(row_mounts(248.57, &config).unwrap(), 12.0);
}

#[test]
fn test_staggered_mounts_differ_from_continuous() {
    let continuous = RackingConfig::default();
    let staggered = RackingConfig {
        pattern: RackingPattern::Staggered,
        ..Default::default()
    };

    // 3 landscape panels: span past the last full interval exceeds half a spacing
    assert_eq!(row_mounts(248.57, &continuous).unwrap(), 12.0);
    assert_eq!(row_mounts(248.57, &staggered).unwrap(), 13.0);

    assert_eq!(row_mounts(180.475, &staggered).unwrap(), 10.0);
}

#[test]
fn test_mount_spacing_quantizes_to_anchor_interval() {
    let config = |min_anchor_spacing| RackingConfig {
        min_anchor_spacing,
        ..Default::default()
    };

    assert_eq!(config(12.0).mount_spacing(), 48.0);
    assert_eq!(config(19.1875).mount_spacing(), 38.375);
    assert_eq!(config(32.0).mount_spacing(), 32.0);
    assert_eq!(config(48.0).mount_spacing(), 48.0);
}

#[test]
fn test_negative_mount_count_fails_instead_of_clamping() {
    let config = RackingConfig {
        bracket_inset: 40.0,
        max_rail_span: 12.0,
        min_anchor_spacing: 12.0,
        ..Default::default()
    };
    // A single portrait panel is narrower than both insets together
    assert!(matches!(
        row_mounts(44.65, &config),
        Err(EstimateError::PreconditionViolated { .. })
    ));

    let rows = [
        RowSpec::new(4, Orientation::Portrait),
        RowSpec::new(1, Orientation::Portrait),
    ];
    assert!(matches!(
        estimate(&rows, &panel(), &config, &rails()),
        Err(EstimateError::PreconditionViolated { row: 1, .. })
    ));
}

#[test]
fn test_deadload() {
    let config = RackingConfig::default();
    let row = RowSpec::new(4, Orientation::Portrait);
    assert_eq!(row_deadload(&row, &panel(), &config).unwrap(), 2.61);

    let config = RackingConfig {
        landscape_rail_inset: 1.0,
        ..Default::default()
    };
    let row = RowSpec::new(1, Orientation::Landscape);
    assert_eq!(row_deadload(&row, &panel(), &config).unwrap(), 3.24);
}

#[test]
fn test_truss_structure_inflates_footprint() {
    let config = RackingConfig {
        truss_structure: true,
        ..Default::default()
    };
    let row = RowSpec::new(4, Orientation::Portrait);

    assert_eq!(row_deadload(&row, &panel(), &config).unwrap(), 0.9);
}

#[test]
fn test_deadload_rejects_collapsed_footprint() {
    let config = RackingConfig {
        portrait_rail_inset: 45.0,
        ..Default::default()
    };
    let row = RowSpec::new(1, Orientation::Portrait);

    assert!(matches!(
        row_deadload(&row, &panel(), &config),
        Err(EstimateError::InvalidGeometry { ref field, .. }) if field == "footprint_height"
    ));
}

#[test]
fn test_collapsed_footprint_names_the_row() {
    let config = RackingConfig {
        portrait_rail_inset: 45.0,
        ..Default::default()
    };
    let rows = [
        RowSpec::new(4, Orientation::Landscape),
        RowSpec::new(1, Orientation::Portrait),
    ];

    let err = deadload(&rows, &panel(), &config).unwrap_err();
    assert!(matches!(
        err,
        EstimateError::InvalidRowGeometry { row: 1, ref field, .. } if field == "footprint_height"
    ));
    assert!(err.to_string().starts_with("Row 1:"));

    let mut req = request(rows.to_vec());
    req.config = config;
    req.include_deadload = true;
    assert!(matches!(
        Estimator::new(req).unwrap().estimate(),
        Err(EstimateError::InvalidRowGeometry { row: 1, .. })
    ));
}

#[test]
fn test_array_totals() {
    let rows = vec![
        RowSpec::new(4, Orientation::Portrait),
        RowSpec::new(1, Orientation::Landscape),
        RowSpec::new(3, Orientation::Landscape),
    ];
    let summary = Estimator::new(request(rows)).unwrap().estimate().unwrap();

    assert_eq!(summary.total_panels, 8);
    assert_eq!(summary.total_end_clamps, 12);
    assert_eq!(summary.total_mid_clamps, 10);
    assert_eq!(summary.total_splices, 4);
    assert_eq!(summary.total_mounts, 28);
    assert_eq!(summary.rails_for(140.0), 10);
    assert_eq!(summary.rails_for(185.0), 0);
    assert!((summary.total_waste - 329.03).abs() < 1e-6);

    let widths: Vec<f64> = summary.rows.iter().map(|r| r.row_width).collect();
    assert_close(widths[0], 180.475);
    assert_close(widths[1], 82.44);
    assert_close(widths[2], 248.57);
    assert_eq!(summary.rail_lengths().count(), 3);
    assert!(summary.rows.iter().all(|r| r.psf.is_none()));
}

#[test]
fn test_deadload_is_reported_per_row_when_requested() {
    let mut req = request(vec![
        RowSpec::new(4, Orientation::Portrait),
        RowSpec::new(2, Orientation::Portrait),
    ]);
    req.include_deadload = true;
    let estimator = Estimator::new(req).unwrap();

    let summary = estimator.estimate().unwrap();
    let psf: Vec<f64> = summary.rows.iter().filter_map(|r| r.psf).collect();
    assert_eq!(psf, estimator.deadload().unwrap());
    assert_eq!(psf[0], 2.61);
}

#[test]
fn test_standalone_deadload_needs_no_catalog() {
    let rows = [RowSpec::new(4, Orientation::Portrait)];
    assert_eq!(
        deadload(&rows, &panel(), &RackingConfig::default()).unwrap(),
        vec![2.61]
    );
}

#[test]
fn test_row_order_does_not_change_totals() {
    let rows = vec![
        RowSpec::new(4, Orientation::Portrait),
        RowSpec::new(10, Orientation::Portrait),
        RowSpec::new(3, Orientation::Landscape),
        RowSpec::new(20, Orientation::Landscape),
    ];
    let mut reversed = rows.clone();
    reversed.reverse();

    let config = RackingConfig::default();
    let forward = estimate(&rows, &panel(), &config, &rails()).unwrap();
    let backward = estimate(&reversed, &panel(), &config, &rails()).unwrap();

    assert_eq!(forward.total_panels, backward.total_panels);
    assert_eq!(forward.total_mounts, backward.total_mounts);
    assert_eq!(forward.total_splices, backward.total_splices);
    assert_eq!(forward.rail_counts, backward.rail_counts);
    assert!((forward.total_waste - backward.total_waste).abs() < 1e-6);

    for (a, b) in forward.rows.iter().zip(backward.rows.iter().rev()) {
        assert_eq!(a.rails, b.rails);
        assert_eq!(a.row_width, b.row_width);
    }
    assert!(forward.rows.iter().enumerate().all(|(i, r)| r.index == i));
}

#[test]
fn test_estimate_is_idempotent() {
    let rows: Vec<RowSpec> = (1..=40)
        .map(|n| {
            let orientation = if n % 2 == 0 {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            };
            RowSpec::new(n, orientation)
        })
        .collect();
    let estimator = Estimator::new(request(rows)).unwrap();

    let first = serde_json::to_string(&estimator.estimate().unwrap()).unwrap();
    let second = serde_json::to_string(&estimator.estimate().unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_request_deserializes_with_defaults() {
    let json = r#"{
        "rows": [{ "panel_count": 4, "orientation": "Portrait" }, { "panel_count": 1, "orientation": "Landscape" }],
        "panel": { "width": 44.65, "height": 82.44, "weight": 60.0 },
        "config": { "pattern": "Staggered", "min_anchor_spacing": 16 },
        "catalog": [185, 140, 140]
    }"#;
    let req: EstimateRequest = serde_json::from_str(json).unwrap();

    assert_eq!(req.config.pattern, RackingPattern::Staggered);
    assert_eq!(req.config.bracket_inset, 10.0);
    assert_eq!(req.catalog.as_ref().unwrap().lengths(), &[140.0, 185.0]);
    assert!(!req.include_deadload);

    let summary = Estimator::new(req).unwrap().estimate().unwrap();
    assert_eq!(summary.rows.len(), 2);
}
