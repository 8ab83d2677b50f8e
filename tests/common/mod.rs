// Synthetic landmark frames for session-level tests
#![allow(dead_code)]

use pt_grading::models::{Landmark, PoseFrame, PoseLandmark, LANDMARK_COUNT};
use pt_grading::services::FrameOutcome;
use pt_grading::ExerciseSession;

pub const FRAME_INTERVAL_MS: u64 = 100;

fn blank(timestamp_ms: u64) -> PoseFrame {
    PoseFrame::new(timestamp_ms, vec![Landmark::default(); LANDMARK_COUNT])
}

fn set_pair(frame: &mut PoseFrame, left: PoseLandmark, right: PoseLandmark, point: Landmark) {
    frame.set(left, point);
    frame.set(right, point);
}

/// Side-view push-up with hands and feet on the floor at y = 0.8
pub fn plank(timestamp_ms: u64, elbow_deg: f32, hip_offset: f32) -> PoseFrame {
    let theta = elbow_deg.to_radians();
    let elbow = Landmark::new(0.30, 0.65);
    let wrist = Landmark::new(0.30, 0.80);
    let shoulder = Landmark::new(0.30 - 0.15 * theta.sin(), 0.65 + 0.15 * theta.cos());
    let ankle = Landmark::new(0.90, 0.80);
    let hip = Landmark::new(
        (shoulder.x + ankle.x) / 2.0,
        (shoulder.y + ankle.y) / 2.0 + hip_offset,
    );
    let knee = Landmark::new((hip.x + ankle.x) / 2.0, (hip.y + ankle.y) / 2.0);

    let mut frame = blank(timestamp_ms);
    set_pair(&mut frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder, shoulder);
    set_pair(&mut frame, PoseLandmark::LeftElbow, PoseLandmark::RightElbow, elbow);
    set_pair(&mut frame, PoseLandmark::LeftWrist, PoseLandmark::RightWrist, wrist);
    set_pair(&mut frame, PoseLandmark::LeftHip, PoseLandmark::RightHip, hip);
    set_pair(&mut frame, PoseLandmark::LeftKnee, PoseLandmark::RightKnee, knee);
    set_pair(&mut frame, PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle, ankle);
    frame
}

/// Side-view sit-up with the trunk raised `elevation_deg` off the floor, knees at 90°
pub fn situp(timestamp_ms: u64, elevation_deg: f32) -> PoseFrame {
    let phi = elevation_deg.to_radians();
    let along = |length: f32| Landmark::new(0.50 - length * phi.cos(), 0.80 - length * phi.sin());
    let ear = along(0.26);

    let mut frame = blank(timestamp_ms);
    frame.set(PoseLandmark::Nose, along(0.28));
    set_pair(&mut frame, PoseLandmark::LeftEar, PoseLandmark::RightEar, ear);
    set_pair(&mut frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder, along(0.20));
    set_pair(&mut frame, PoseLandmark::LeftWrist, PoseLandmark::RightWrist, ear);
    set_pair(&mut frame, PoseLandmark::LeftHip, PoseLandmark::RightHip, Landmark::new(0.50, 0.80));
    set_pair(&mut frame, PoseLandmark::LeftKnee, PoseLandmark::RightKnee, Landmark::new(0.62, 0.68));
    set_pair(&mut frame, PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle, Landmark::new(0.74, 0.80));
    frame
}

/// Front-view pull-up hanging from a bar at y = 0.2 with the body raised by `lift`
pub fn hang(timestamp_ms: u64, lift: f32, hip_shift: f32) -> PoseFrame {
    let shoulder_y = 0.38 - lift;
    let span = 0.18 - lift;
    let elbow_out = (0.09f32 * 0.09 - (span / 2.0) * (span / 2.0)).max(0.0).sqrt();
    let elbow_y = (0.20 + shoulder_y) / 2.0;
    let hip_y = 0.70 - lift;

    let mut frame = blank(timestamp_ms);
    frame.set(PoseLandmark::Nose, Landmark::new(0.50, 0.30 - lift));
    frame.set(PoseLandmark::LeftWrist, Landmark::new(0.40, 0.20));
    frame.set(PoseLandmark::RightWrist, Landmark::new(0.60, 0.20));
    frame.set(PoseLandmark::LeftShoulder, Landmark::new(0.40, shoulder_y));
    frame.set(PoseLandmark::RightShoulder, Landmark::new(0.60, shoulder_y));
    frame.set(PoseLandmark::LeftElbow, Landmark::new(0.40 - elbow_out, elbow_y));
    frame.set(PoseLandmark::RightElbow, Landmark::new(0.60 + elbow_out, elbow_y));
    for (hip, knee, ankle, x) in [
        (PoseLandmark::LeftHip, PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle, 0.45),
        (PoseLandmark::RightHip, PoseLandmark::RightKnee, PoseLandmark::RightAnkle, 0.55),
    ] {
        frame.set(hip, Landmark::new(x + hip_shift, hip_y));
        frame.set(knee, Landmark::new(x + hip_shift, hip_y + 0.15));
        frame.set(ankle, Landmark::new(x + hip_shift, hip_y + 0.28));
    }
    frame
}

/// Feed frames built from `values` at a fixed interval starting at `start_ms`
pub fn replay<F>(
    session: &mut ExerciseSession,
    start_ms: u64,
    values: &[f32],
    build: F,
) -> Vec<FrameOutcome>
where
    F: Fn(u64, f32) -> PoseFrame,
{
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let frame = build(start_ms + i as u64 * FRAME_INTERVAL_MS, *value);
            session.process_frame(&frame)
        })
        .collect()
}
