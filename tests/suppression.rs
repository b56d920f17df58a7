use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use yolopost::{nms_boxes, suppress, BoxRect, Candidate, SuppressParams};

#[derive(Debug, Deserialize)]
struct Scenario {
    boxes: Vec<[i32; 4]>,
    scores: Vec<f32>,
    class_ids: Vec<usize>,
    score_threshold: f32,
    iou_threshold: f32,
    expected: Vec<usize>,
}

const SCENARIOS: &str = r#"[
    {
        "boxes": [[0, 0, 100, 100], [10, 10, 110, 110]],
        "scores": [0.9, 0.8],
        "class_ids": [0, 0],
        "score_threshold": 0.25,
        "iou_threshold": 0.45,
        "expected": [0]
    },
    {
        "boxes": [[0, 0, 100, 100], [10, 10, 110, 110], [500, 500, 600, 600]],
        "scores": [0.9, 0.8, 0.3],
        "class_ids": [0, 0, 1],
        "score_threshold": 0.25,
        "iou_threshold": 0.45,
        "expected": [0, 2]
    },
    {
        "boxes": [[500, 500, 600, 600], [10, 10, 110, 110], [0, 0, 100, 100]],
        "scores": [0.3, 0.8, 0.9],
        "class_ids": [1, 0, 0],
        "score_threshold": 0.25,
        "iou_threshold": 0.45,
        "expected": [2, 0]
    },
    {
        "boxes": [[0, 0, 100, 100], [10, 10, 110, 110]],
        "scores": [0.9, 0.8],
        "class_ids": [0, 0],
        "score_threshold": 0.25,
        "iou_threshold": 0.7,
        "expected": [0, 1]
    },
    {
        "boxes": [[0, 0, 100, 100], [500, 500, 600, 600]],
        "scores": [0.2, 0.1],
        "class_ids": [0, 1],
        "score_threshold": 0.25,
        "iou_threshold": 0.45,
        "expected": []
    }
]"#;

fn to_rects(boxes: &[[i32; 4]]) -> Vec<BoxRect> {
    boxes
        .iter()
        .map(|b| BoxRect::new(b[0], b[1], b[2], b[3]))
        .collect()
}

fn random_candidates(rng: &mut StdRng, n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|_| {
            let x = rng.random_range(0..200);
            let y = rng.random_range(0..200);
            let w = rng.random_range(5..80);
            let h = rng.random_range(5..80);
            Candidate {
                rect: BoxRect::new(x, y, x + w, y + h),
                score: rng.random::<f32>(),
                class_id: rng.random_range(0..3),
            }
        })
        .collect()
}

fn params(score: f32, iou: f32) -> SuppressParams {
    SuppressParams {
        score_threshold: score,
        iou_threshold: iou,
        ..SuppressParams::default()
    }
}

#[test]
fn scenarios_match_expected_selection() {
    let scenarios: Vec<Scenario> = serde_json::from_str(SCENARIOS).unwrap();
    for scenario in scenarios {
        let boxes = to_rects(&scenario.boxes);
        let kept = nms_boxes(
            &boxes,
            &scenario.scores,
            &scenario.class_ids,
            params(scenario.score_threshold, scenario.iou_threshold),
        )
        .unwrap();
        assert_eq!(kept, scenario.expected, "{scenario:?}");
    }
}

#[test]
fn overlapping_pair_has_expected_iou() {
    let a = BoxRect::new(0, 0, 100, 100);
    let b = BoxRect::new(10, 10, 110, 110);
    assert!((a.iou(&b) - 0.68).abs() < 0.01);
}

#[test]
fn suppression_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let candidates = random_candidates(&mut rng, 60);
        let p = SuppressParams::default();
        let kept = suppress(&candidates, p).unwrap();
        let survivors: Vec<Candidate> = kept.iter().map(|&i| candidates[i]).collect();
        let again = suppress(&survivors, p).unwrap();
        assert_eq!(again, (0..survivors.len()).collect::<Vec<_>>());
    }
}

#[test]
fn kept_boxes_are_pairwise_below_iou_threshold() {
    let mut rng = StdRng::seed_from_u64(3);
    let candidates = random_candidates(&mut rng, 120);
    let p = SuppressParams::default();
    let kept = suppress(&candidates, p).unwrap();
    for (n, &i) in kept.iter().enumerate() {
        assert!(candidates[i].score >= p.score_threshold);
        for &j in &kept[n + 1..] {
            assert!(candidates[i].rect.iou(&candidates[j].rect) <= p.iou_threshold);
            assert!(candidates[i].score >= candidates[j].score);
        }
    }
}

#[test]
fn raising_score_threshold_never_grows_kept_set() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..30 {
        let candidates = random_candidates(&mut rng, 80);
        let mut previous = suppress(&candidates, params(0.0, 0.45)).unwrap();
        for step in 1..=10 {
            let threshold = step as f32 / 10.0;
            let kept = suppress(&candidates, params(threshold, 0.45)).unwrap();
            assert!(kept.len() <= previous.len());
            let filtered: Vec<usize> = previous
                .iter()
                .copied()
                .filter(|&i| candidates[i].score >= threshold)
                .collect();
            assert_eq!(kept, filtered);
            previous = kept;
        }
    }
}

#[test]
fn raising_iou_threshold_keeps_more_overlapping_boxes() {
    let boxes = [
        BoxRect::new(0, 0, 100, 100),
        BoxRect::new(10, 10, 110, 110),
        BoxRect::new(30, 30, 130, 130),
        BoxRect::new(300, 300, 400, 400),
    ];
    let scores = [0.9, 0.8, 0.7, 0.6];
    let mut previous = 0;
    for iou in [0.0, 0.2, 0.45, 0.6, 0.7, 1.0] {
        let kept = nms_boxes(&boxes, &scores, &[], params(0.25, iou)).unwrap();
        assert!(kept.len() >= previous, "iou={iou}");
        previous = kept.len();
    }
    assert_eq!(previous, 4);
}

#[test]
fn zero_area_box_never_leads_an_equal_score_tie() {
    let degenerate = BoxRect::new(50, 50, 50, 90);
    let valid = BoxRect::new(0, 0, 100, 100);
    let kept = nms_boxes(&[degenerate, valid], &[0.7, 0.7], &[], params(0.25, 0.45)).unwrap();
    assert_eq!(kept, vec![1, 0]);

    let inverted = BoxRect::new(100, 100, 0, 0);
    let other = BoxRect::new(0, 0, 100, 100);
    let kept = nms_boxes(&[inverted, other], &[0.9, 0.5], &[], params(0.25, 0.0)).unwrap();
    assert_eq!(kept, vec![0, 1]);
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(suppress(&[], SuppressParams::default()).unwrap().is_empty());
}
