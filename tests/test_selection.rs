use std::sync::atomic::{AtomicUsize, Ordering};

use barcode_designer::{
    select_barcode_sets, BarcodePattern, CandidatePool, CandidatePoolBuilder, DesignError,
    DistanceMetric, GcWindow, GeneticSearch, Initialization, SearchConfig, SilentProgress,
};

fn brute_force_min_distance(barcodes: &[String], metric: DistanceMetric) -> usize {
    let mut min = usize::MAX;
    for i in 0..barcodes.len() {
        for j in (i + 1)..barcodes.len() {
            min = min.min(metric.distance(&barcodes[i], &barcodes[j]).unwrap());
        }
    }
    min
}

#[test]
fn test_end_to_end_selection_from_generated_pool() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let pattern = BarcodePattern::parse("____").unwrap();
    let gc = GcWindow::new(0.25, 0.75).unwrap();
    let pool = CandidatePoolBuilder::new(pattern.clone(), gc, 20)
        .seed(4)
        .build()
        .unwrap();
    assert_eq!(pool.len(), 20);

    let config = SearchConfig::builder(4)
        .population_size(10)
        .num_generations(5)
        .num_runs(1)
        .metric(DistanceMetric::Hamming)
        .seed(4)
        .build();

    let results = select_barcode_sets(pool, config, &SilentProgress).unwrap();
    assert_eq!(results.len(), 1);

    let set = results.get(0).unwrap();
    assert_eq!(set.barcodes().len(), 4);
    assert_eq!(set.metric(), DistanceMetric::Hamming);

    let mut distinct = set.barcodes().to_vec();
    distinct.dedup();
    assert_eq!(distinct.len(), 4, "barcodes in a set must be distinct");
    for barcode in set.barcodes() {
        assert_eq!(barcode.len(), 4);
        assert!(pattern.matches(barcode));
    }

    let recomputed = brute_force_min_distance(set.barcodes(), DistanceMetric::Hamming);
    assert_eq!(set.min_distance(), recomputed);
}

#[test]
fn test_multiple_runs_sorted_by_quality() {
    let pattern = BarcodePattern::unconstrained(8).unwrap();
    let gc = GcWindow::new(0.25, 0.75).unwrap();
    let pool = CandidatePoolBuilder::new(pattern, gc, 60)
        .seed(8)
        .build()
        .unwrap();

    let config = SearchConfig::builder(6)
        .population_size(12)
        .num_generations(15)
        .num_runs(3)
        .num_streams(2)
        .metric(DistanceMetric::Levenshtein)
        .initialization(Initialization::Random)
        .build();

    let results = select_barcode_sets(pool, config, &SilentProgress).unwrap();
    assert_eq!(results.len(), 3);

    let distances: Vec<usize> = results.iter().map(|s| s.min_distance()).collect();
    for window in distances.windows(2) {
        assert!(
            window[0] >= window[1],
            "results must be sorted by non-increasing distance: {distances:?}"
        );
    }
    for set in results.iter() {
        let recomputed = brute_force_min_distance(set.barcodes(), DistanceMetric::Levenshtein);
        assert_eq!(set.min_distance(), recomputed);
    }
}

#[test]
fn test_selection_from_literal_pool() {
    let pool =
        CandidatePool::from_barcodes(["AAAA", "AAAT", "AATT", "ATTT", "TTTT", "GGGG", "GCGC"])
            .unwrap();
    let config = SearchConfig::builder(3)
        .population_size(8)
        .num_generations(20)
        .metric(DistanceMetric::Hamming)
        .build();

    let results = select_barcode_sets(pool, config, &SilentProgress).unwrap();
    let set = results.get(0).unwrap();
    // AAAA / TTTT / GGGG are mutually at distance 4; the search should not
    // settle below that on this tiny instance.
    assert_eq!(set.min_distance(), 4);
}

#[test]
fn test_balance_colors_breaks_distance_ties() {
    // All pairs of these barcodes are Hamming distance 2 apart, so the
    // balance term decides: one barcode per channel pair is optimal.
    let pool = CandidatePool::from_barcodes(["AA", "CC", "GG", "TT"]).unwrap();
    let config = SearchConfig::builder(2)
        .population_size(6)
        .num_offspring(12)
        .num_generations(10)
        .metric(DistanceMetric::Hamming)
        .balance_colors(true)
        .build();

    let results = select_barcode_sets(pool, config, &SilentProgress).unwrap();
    let set = results.get(0).unwrap();
    assert_eq!(set.min_distance(), 2);

    let has_ac_channel = set.barcodes().iter().any(|b| b == "AA" || b == "CC");
    let has_gt_channel = set.barcodes().iter().any(|b| b == "GG" || b == "TT");
    assert!(
        has_ac_channel && has_gt_channel,
        "balanced pair expected, got {:?}",
        set.barcodes()
    );
    for pct in set.color_balance() {
        assert!((pct - 50.0).abs() < 1e-9);
    }
}

#[test]
fn test_early_stopping_rejected_in_selection_mode() {
    let pool = CandidatePool::from_barcodes(["AAAA", "TTTT", "GGGG"]).unwrap();
    let config = SearchConfig::builder(2).early_stopping_min_dist(3).build();
    let result = GeneticSearch::selection(pool, config);
    assert!(matches!(result, Err(DesignError::Configuration(_))));
}

#[test]
fn test_pool_smaller_than_set_size_rejected() {
    let pool = CandidatePool::from_barcodes(["AAAA", "TTTT"]).unwrap();
    let config = SearchConfig::builder(4).build();
    assert!(matches!(
        GeneticSearch::selection(pool, config),
        Err(DesignError::Configuration(_))
    ));
}

#[test]
fn test_cancellation_keeps_collected_results() {
    let pattern = BarcodePattern::unconstrained(6).unwrap();
    let gc = GcWindow::new(0.2, 0.8).unwrap();
    let pool = CandidatePoolBuilder::new(pattern, gc, 30)
        .seed(15)
        .build()
        .unwrap();

    let num_generations = 5;
    let config = SearchConfig::builder(4)
        .population_size(6)
        .num_generations(num_generations)
        .num_runs(3)
        .build();

    // Run 1 reports once at initialization and once per generation; cancel
    // as soon as run 2 starts reporting.
    let calls = AtomicUsize::new(0);
    let cancel_in_second_run = move |_pct: f64, _msg: &str| {
        calls.fetch_add(1, Ordering::SeqCst) < num_generations + 1
    };

    let results = select_barcode_sets(pool, config, &cancel_in_second_run).unwrap();
    assert_eq!(
        results.len(),
        2,
        "cancelled run still contributes its best-so-far set"
    );
}

#[test]
fn test_progress_reaches_one_hundred_percent() {
    let pool = CandidatePool::from_barcodes([
        "AAAAAA", "TTTTTT", "GGGGGG", "CCCCCC", "AATTGG", "GGCCAA",
    ])
    .unwrap();
    let config = SearchConfig::builder(3)
        .population_size(4)
        .num_generations(4)
        .build();

    let max_pct = std::sync::Mutex::new(0.0f64);
    let listener = |pct: f64, _msg: &str| {
        let mut max = max_pct.lock().unwrap();
        if pct > *max {
            *max = pct;
        }
        true
    };

    let search = GeneticSearch::selection(pool, config).unwrap();
    search.run(&listener).unwrap();
    assert!((*max_pct.lock().unwrap() - 100.0).abs() < 1e-9);
}
