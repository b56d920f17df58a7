use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yolopost::{decode, suppress, BoxRect, DetectionTensor, SuppressParams, YoloPostError};

fn random_tensor(rng: &mut StdRng, rows: usize, classes: usize) -> Vec<f32> {
    let width = 5 + classes;
    let mut data = Vec::with_capacity(rows * width);
    for _ in 0..rows {
        data.push(rng.random_range(0.0..640.0f32));
        data.push(rng.random_range(0.0..640.0f32));
        data.push(rng.random_range(1.0..200.0f32));
        data.push(rng.random_range(1.0..200.0f32));
        for _ in 0..=classes {
            data.push(rng.random::<f32>());
        }
    }
    data
}

#[test]
fn decode_returns_one_candidate_per_row_in_order() {
    let mut rng = StdRng::seed_from_u64(11);
    for rows in [0usize, 1, 7, 250] {
        let data = random_tensor(&mut rng, rows, 4);
        let tensor = DetectionTensor::new(&data, rows, 9).unwrap();
        let out = decode(tensor, 4).unwrap();
        assert_eq!(out.len(), rows);
        for (j, cand) in out.iter().enumerate() {
            let row = tensor.row(j).unwrap();
            assert_eq!(cand.rect.xmin, (row[0] - row[2] / 2.0) as i32);
            assert_eq!(cand.rect.ymax, (row[1] + row[3] / 2.0) as i32);
            assert!(cand.class_id < 4);
            assert!((0.0..=1.0).contains(&cand.score));
        }
    }
}

#[test]
fn tied_class_confidences_pick_lowest_index() {
    let data = [320.0, 320.0, 64.0, 64.0, 1.0, 0.3, 0.9, 0.9, 0.1];
    let tensor = DetectionTensor::new(&data, 1, 9).unwrap();
    let out = decode(tensor, 4).unwrap();
    assert_eq!(out[0].class_id, 1);
    assert!((out[0].score - 0.9).abs() < 1e-6);
}

#[test]
fn score_is_objectness_times_best_confidence() {
    let data = [10.0, 10.0, 4.0, 4.0, 0.5, 0.2, 0.6];
    let tensor = DetectionTensor::new(&data, 1, 7).unwrap();
    let out = decode(tensor, 2).unwrap();
    assert!((out[0].score - 0.3).abs() < 1e-6);
    assert_eq!(out[0].rect, BoxRect::new(8, 8, 12, 12));
}

#[test]
fn ymin_uses_half_width() {
    // Tall box: w=20, h=100 gives ymin = 100 - 10 and ymax = 100 + 50.
    let data = [50.0, 100.0, 20.0, 100.0, 1.0, 1.0];
    let tensor = DetectionTensor::new(&data, 1, 6).unwrap();
    let out = decode(tensor, 1).unwrap();
    assert_eq!(out[0].rect, BoxRect::new(40, 90, 60, 150));
}

#[test]
fn inconsistent_shapes_are_rejected() {
    let data = [0.0f32; 18];
    assert!(matches!(
        DetectionTensor::new(&data, 2, 10),
        Err(YoloPostError::ShapeMismatch { .. })
    ));
    let tensor = DetectionTensor::new(&data, 2, 9).unwrap();
    assert_eq!(
        decode(tensor, 80).unwrap_err(),
        YoloPostError::ShapeMismatch {
            what: "row width",
            expected: 85,
            got: 9
        }
    );
}

#[test]
fn extreme_box_fields_decode_and_suppress_cleanly() {
    let inf = f32::INFINITY;
    let nan = f32::NAN;
    let data = [
        0.0, 0.0, 1e20, 1e20, 1.0, 1.0, //
        0.0, 0.0, 1e20, 1e20, 0.9, 1.0, //
        0.0, 0.0, inf, inf, 0.95, 1.0, //
        nan, nan, nan, nan, 0.8, 1.0, //
        50.0, 50.0, 20.0, 20.0, 0.7, 1.0,
    ];
    let tensor = DetectionTensor::new(&data, 5, 6).unwrap();
    let candidates = decode(tensor, 1).unwrap();

    let full = BoxRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
    assert_eq!(candidates[0].rect, full);
    assert_eq!(candidates[2].rect, full);
    assert_eq!(candidates[3].rect, BoxRect::new(0, 0, 0, 0));

    let kept = suppress(&candidates, SuppressParams::default()).unwrap();
    assert_eq!(kept, vec![0, 3, 4]);
}
