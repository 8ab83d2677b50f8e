use crate::models::analysis::AnalysisSignal;
use crate::models::calibration::CalibrationBaseline;
use crate::models::landmark::PoseFrame;

/// Per-exercise geometric analysis of single frames
pub trait FormAnalyzer {
    type Analysis: AnalysisSignal;

    /// Analyze one frame, capturing the baseline from it when none exists yet
    fn analyze(&mut self, frame: &PoseFrame) -> Self::Analysis;

    /// Capture a baseline explicitly; returns false when the frame is unusable
    fn calibrate(&mut self, frame: &PoseFrame) -> bool;

    fn baseline(&self) -> Option<CalibrationBaseline>;

    /// Drop baseline and frame history
    fn reset(&mut self);
}
