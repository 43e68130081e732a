//! End-to-end checks of the documented properties, through the public API.

use neurosig::{
    Analyzer, Classifier, Config, FeatureExtractor, LabeledPattern, Matrix, Metric, NeuroError,
    Normalizer, Similarity, Simulator, Validation,
};

/// A spread of matrices of different shapes and value ranges.
fn corpus() -> Vec<Matrix> {
    let sim = Simulator::with_seed(2024);
    let mut out: Vec<Matrix> = ["schizophrenia", "bipolar", "control", "insomnia"]
        .iter()
        .enumerate()
        .map(|(i, c)| sim.sample(c, 6 + i, 2 + i, i as u64))
        .collect();
    out.push(Matrix::from_rows(vec![
        vec![-4.0, 12.5, 3.0],
        vec![7.0, -0.5, 100.0],
    ]));
    out
}

fn pattern(rows: Vec<Vec<f64>>, label: &str) -> LabeledPattern {
    LabeledPattern::new(Matrix::from_rows(rows), label).unwrap()
}

#[test]
fn normalize_lands_in_unit_interval_and_is_a_fixed_point() {
    for m in corpus() {
        let once = Normalizer::normalize(&m);
        assert!(once.values().all(|v| (0.0..=1.0).contains(&v)));

        let twice = Normalizer::normalize(&once);
        for (a, b) in once.values().zip(twice.values()) {
            assert!((a - b).abs() < 1e-12, "{} vs {}", a, b);
        }
    }
}

#[test]
fn standardize_centers_and_scales_columns() {
    for m in corpus() {
        let original_stds = FeatureExtractor::column_std_devs(&m);
        let z = Normalizer::standardize(&m).unwrap();
        let means = FeatureExtractor::column_means(&z);
        let stds = FeatureExtractor::column_std_devs(&z);

        for (j, &s) in original_stds.iter().enumerate() {
            if s == 0.0 {
                continue;
            }
            assert!(means[j].abs() < 1e-9, "column {} mean {}", j, means[j]);
            assert!((stds[j] - 1.0).abs() < 1e-9, "column {} std {}", j, stds[j]);
        }
    }
}

#[test]
fn euclidean_distance_is_zero_on_identity_and_symmetric() {
    let corpus = corpus();
    for a in &corpus {
        assert_eq!(Similarity::euclidean_distance(a, a), 0.0);
        for b in &corpus {
            let ab = Similarity::euclidean_distance(a, b);
            let ba = Similarity::euclidean_distance(b, a);
            assert!((ab - ba).abs() < 1e-12);
        }
    }
}

#[test]
fn cosine_self_similarity_is_one() {
    for m in corpus() {
        let sim = Similarity::cosine_column_means(&m, &m);
        assert!((sim - 1.0).abs() < 1e-10, "got {}", sim);
    }
}

#[test]
fn classifier_recovers_training_examples() {
    for metric in [Metric::Euclidean, Metric::RowNormalized, Metric::CosineColumnMeans] {
        let mut c = Classifier::with_metric(metric);
        c.train(vec![
            pattern(vec![vec![0.1, 0.2, 0.3]], "schizophrenia"),
            pattern(vec![vec![0.9, 0.8, 0.7]], "bipolar"),
        ])
        .unwrap();

        let a = c.classify(&Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]])).unwrap();
        let b = c.classify(&Matrix::from_rows(vec![vec![0.9, 0.8, 0.7]])).unwrap();
        assert_eq!(a.label, "schizophrenia", "{:?}", metric);
        assert_eq!(b.label, "bipolar", "{:?}", metric);
    }
}

#[test]
fn feature_extraction_reference_values() {
    let m = Matrix::from_rows(vec![
        vec![0.1, 0.3, 0.2, 0.8],
        vec![0.4, 0.6, 0.9, 0.2],
        vec![0.7, 0.1, 0.5, 0.3],
    ]);
    let f = FeatureExtractor::extract(&m);
    let expected_mean = m.values().sum::<f64>() / 12.0;

    assert_eq!(f.count, 12);
    assert!((f.min - 0.1).abs() < 1e-12);
    assert!((f.max - 0.9).abs() < 1e-12);
    assert!((f.mean - expected_mean).abs() < 1e-12);
}

#[test]
fn matrix_at_its_column_means_is_not_anomalous() {
    let mut analyzer = Analyzer::default();
    let m = Matrix::from_rows(vec![vec![0.2, 0.4, 0.6]; 5]);

    for label in ["schizophrenia", "bipolar", "control", "other"] {
        let result = analyzer.detect_anomalies(&m, Some(label));
        assert_eq!(result.anomaly_score, 0.0);
        assert!(!result.is_anomalous);
    }

    analyzer.update_threshold("control", 1e-9).unwrap();
    assert!(!analyzer.detect_anomalies(&m, Some("control")).is_anomalous);
}

#[test]
fn untrained_and_empty_training_errors() {
    let c = Classifier::default();
    assert!(matches!(
        c.classify(&Matrix::from_rows(vec![vec![0.1]])),
        Err(NeuroError::NotTrained)
    ));

    let mut strict = Classifier::new(Config::default().with_validation(Validation::Strict));
    assert!(matches!(strict.train(vec![]), Err(NeuroError::EmptyInput(_))));

    let mut lenient = Classifier::new(Config::default().with_validation(Validation::Lenient));
    assert!(lenient.train(vec![]).is_ok());
    assert!(matches!(
        lenient.classify(&Matrix::from_rows(vec![vec![0.1]])),
        Err(NeuroError::NotTrained)
    ));
}

#[test]
fn results_serialize_with_documented_fields() {
    let mut analyzer = Analyzer::default();
    analyzer
        .train(vec![pattern(vec![vec![0.5, 0.5]], "control")])
        .unwrap();
    let m = Matrix::from_rows(vec![vec![0.5, 0.5]]);

    let classification = serde_json::to_value(analyzer.classify(&m).unwrap()).unwrap();
    for key in ["label", "confidence", "matches"] {
        assert!(classification.get(key).is_some(), "missing {}", key);
    }

    let anomaly = serde_json::to_value(analyzer.detect_anomalies(&m, None)).unwrap();
    for key in ["anomaly_score", "is_anomalous", "confidence"] {
        assert!(anomaly.get(key).is_some(), "missing {}", key);
    }

    let features = serde_json::to_value(analyzer.extract(&m)).unwrap();
    for key in ["mean", "variance", "std_dev", "min", "max", "count"] {
        assert!(features.get(key).is_some(), "missing {}", key);
    }
}
