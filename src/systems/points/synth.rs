// handles point synthesis logic
// detector snapshots in, smoothed generator points out

use bevy::prelude::*;
use rand::Rng;

use crate::config::{FINGER_TIPS, KNUCKLES, PALM_CENTER};
use crate::systems::landmarks::{FaceSnapshot, HandSnapshot};

/// Point lists carried from one frame to the next.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    pub current: Vec<Vec2>,   // smoothed, handed to the tessellation
    pub target: Vec<Vec2>,    // rebuilt every frame
    pub reserved: Vec<Vec2>,  // extra points appended to every target
    pub face_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub lerp_speed: f32,
    pub face_skip: usize,
}

pub fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a + alpha * (b - a)
}

/// Every `skip`-th face landmark, starting at the first.
///
/// # Panics
///
/// Panics if `skip` is zero.
pub fn sample_face_points(face: &FaceSnapshot, skip: usize) -> Vec<Vec2> {
    assert!(skip > 0, "face point skip must be at least 1");
    face.keypoints.iter().step_by(skip).map(|kp| kp.xy()).collect()
}

/// Fingertip then knuckle for thumb through pinky, then the palm center: always 11 points.
///
/// # Panics
///
/// Panics on a snapshot that does not carry the full hand layout.
pub fn sample_hand_points(hand: &HandSnapshot) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(FINGER_TIPS.len() * 2 + 1);
    for (&tip, &knuckle) in FINGER_TIPS.iter().zip(KNUCKLES.iter()) {
        points.push(hand.keypoint(tip).xy());
        points.push(hand.keypoint(knuckle).xy());
    }
    points.push(hand.keypoint(PALM_CENTER).xy());
    points
}

// face first, then hands in detector order, then the reserved points
pub fn synthesize_target(
    face: &FaceSnapshot,
    hands: &[HandSnapshot],
    reserved: &[Vec2],
    face_skip: usize,
) -> Vec<Vec2> {
    let mut target = sample_face_points(face, face_skip);
    target.extend(hands.iter().flat_map(sample_hand_points));
    target.extend_from_slice(reserved);
    target
}

/// Moves `current` a fraction `alpha` of the way toward `target`.
/// A different point count replaces `current` with a copy of `target` instead.
pub fn advance(current: &mut Vec<Vec2>, target: &[Vec2], alpha: f32) {
    if current.len() != target.len() {
        *current = target.to_vec();
        return;
    }

    for (cur, tgt) in current.iter_mut().zip(target) {
        cur.x = lerp(cur.x, tgt.x, alpha);
        cur.y = lerp(cur.y, tgt.y, alpha);
    }
}

/// One frame of the point pipeline.
/// Without a face every list is cleared and nothing is left to tessellate.
pub fn update(
    mut state: PointSet,
    face: Option<&FaceSnapshot>,
    hands: &[HandSnapshot],
    params: &SynthParams,
) -> PointSet {
    let Some(face) = face else {
        return PointSet::default();
    };

    state.target = synthesize_target(face, hands, &state.reserved, params.face_skip);
    advance(&mut state.current, &state.target, params.lerp_speed);
    state.face_present = true;
    state
}

/// Uniformly scattered points inside `clip`.
pub fn scatter_reserved(count: usize, clip: Rect, rng: &mut impl Rng) -> Vec<Vec2> {
    if clip.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            Vec2::new(
                rng.random_range(clip.min.x..clip.max.x),
                rng.random_range(clip.min.y..clip.max.y),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::systems::landmarks::Landmark;

    const PARAMS: SynthParams = SynthParams { lerp_speed: 0.7, face_skip: 3 };

    fn face(n: usize) -> FaceSnapshot {
        FaceSnapshot {
            keypoints: (0..n).map(|i| Landmark::new(i as f32, i as f32 * 10.0)).collect(),
        }
    }

    // keypoint i sits at (offset + i, i)
    fn hand(offset: f32) -> HandSnapshot {
        HandSnapshot {
            keypoints: (0..21).map(|i| Landmark::new(offset + i as f32, i as f32)).collect(),
        }
    }

    #[test]
    fn face_sampling_keeps_every_nth_in_order() {
        for (n, skip) in [(9, 3), (10, 3), (1, 3), (0, 3), (468, 3), (7, 1), (5, 8)] {
            let points = sample_face_points(&face(n), skip);
            assert_eq!(points.len(), n.div_ceil(skip));
            for (k, p) in points.iter().enumerate() {
                assert_eq!(p.x, (k * skip) as f32);
            }
        }
    }

    #[test]
    fn face_sampling_drops_depth() {
        let f = FaceSnapshot { keypoints: vec![Landmark { x: 1.0, y: 2.0, z: Some(5.0) }] };
        assert_eq!(sample_face_points(&f, 3), vec![Vec2::new(1.0, 2.0)]);
    }

    #[test]
    #[should_panic]
    fn zero_skip_panics() {
        sample_face_points(&face(3), 0);
    }

    #[test]
    fn hand_sampling_order() {
        let points = sample_hand_points(&hand(0.0));
        let indices: Vec<usize> = points.iter().map(|p| p.y as usize).collect();
        assert_eq!(indices, vec![4, 2, 8, 6, 12, 10, 16, 14, 20, 18, 0]);
    }

    #[test]
    fn hand_sampling_ignores_pose() {
        // same layout rotated and scaled still yields 11 points in the same index order
        let rotated = HandSnapshot {
            keypoints: (0..21)
                .map(|i| {
                    let p = Vec2::from_angle(1.3).rotate(Vec2::new(i as f32 * 4.0, 2.0));
                    Landmark::new(p.x, p.y)
                })
                .collect(),
        };
        let points = sample_hand_points(&rotated);
        assert_eq!(points.len(), 11);
        assert_eq!(points[10], rotated.keypoints[0].xy());
        assert_eq!(points[0], rotated.keypoints[4].xy());
    }

    #[test]
    #[should_panic(expected = "hand snapshot has 12 keypoints")]
    fn short_hand_is_a_contract_violation() {
        let mut h = hand(0.0);
        h.keypoints.truncate(12);
        sample_hand_points(&h);
    }

    #[test]
    fn target_concatenates_face_hands_reserved() {
        let reserved = vec![Vec2::new(-1.0, -1.0), Vec2::new(-2.0, -2.0)];
        let target = synthesize_target(&face(9), &[hand(100.0), hand(200.0)], &reserved, 3);
        assert_eq!(target.len(), 3 + 22 + 2);
        assert_eq!(target[0], Vec2::new(0.0, 0.0));
        assert_eq!(target[2], Vec2::new(6.0, 60.0));
        assert_eq!(target[3], Vec2::new(104.0, 4.0));
        assert_eq!(target[14], Vec2::new(204.0, 4.0));
        assert_eq!(&target[25..], &reserved[..]);
    }

    #[test]
    fn no_hands_contributes_nothing() {
        assert_eq!(synthesize_target(&face(9), &[], &[], 3).len(), 3);
    }

    #[test]
    fn advance_lerps_matching_lengths() {
        let mut current = vec![Vec2::new(10.0, 10.0)];
        advance(&mut current, &[Vec2::new(20.0, 20.0)], 0.7);
        assert!((current[0].x - 17.0).abs() < 1e-5);
        assert!((current[0].y - 17.0).abs() < 1e-5);
    }

    #[test]
    fn advance_resets_on_length_change() {
        let mut current = vec![Vec2::new(10.0, 10.0)];
        let target = vec![Vec2::new(20.0, 20.0), Vec2::new(30.0, 40.0)];
        advance(&mut current, &target, 0.7);
        assert_eq!(current, target);
    }

    #[test]
    fn advance_converges_without_overshoot() {
        let target = vec![Vec2::new(100.0, -50.0)];
        let mut current = vec![Vec2::new(0.0, 0.0)];
        let mut prev = current[0];
        for _ in 0..40 {
            advance(&mut current, &target, 0.7);
            let p = current[0];
            assert!(p.x >= prev.x && p.x <= 100.0);
            assert!(p.y <= prev.y && p.y >= -50.0);
            prev = p;
        }
        assert!(current[0].distance(target[0]) < 1e-3);
    }

    #[test]
    fn update_without_face_clears_everything() {
        let state = PointSet {
            current: vec![Vec2::ONE; 4],
            target: vec![Vec2::ONE; 4],
            reserved: vec![Vec2::ONE; 2],
            face_present: true,
        };
        let next = update(state, None, &[hand(0.0)], &PARAMS);
        assert_eq!(next, PointSet::default());
    }

    #[test]
    fn first_tracked_frame_copies_target() {
        let f = face(9);
        let hands = [hand(100.0), hand(200.0)];
        let next = update(PointSet::default(), Some(&f), &hands, &PARAMS);
        assert_eq!(next.target.len(), 25);
        assert_eq!(next.current, next.target);
        assert!(next.face_present);
    }

    #[test]
    fn steady_count_smooths() {
        let f = face(3);
        let first = update(PointSet::default(), Some(&f), &[], &PARAMS);

        let moved = FaceSnapshot {
            keypoints: f.keypoints.iter().map(|kp| Landmark::new(kp.x + 10.0, kp.y)).collect(),
        };
        let second = update(first, Some(&moved), &[], &PARAMS);
        assert!((second.current[0].x - 7.0).abs() < 1e-5);
        assert_eq!(second.target[0].x, 10.0);
    }

    #[test]
    fn reserved_points_ride_along() {
        let state = PointSet { reserved: vec![Vec2::new(5.0, 5.0)], ..default() };
        let next = update(state, Some(&face(3)), &[], &PARAMS);
        assert_eq!(next.target.last(), Some(&Vec2::new(5.0, 5.0)));
        assert_eq!(next.reserved, vec![Vec2::new(5.0, 5.0)]);
    }

    #[test]
    fn scattered_points_stay_inside_clip() {
        let mut rng = StdRng::seed_from_u64(3);
        let clip = Rect::new(0.0, 0.0, 640.0, 480.0);
        let points = scatter_reserved(15, clip, &mut rng);
        assert_eq!(points.len(), 15);
        assert!(points.iter().all(|p| clip.contains(*p)));
        assert!(scatter_reserved(5, Rect::new(0.0, 0.0, 0.0, 10.0), &mut rng).is_empty());
    }
}
