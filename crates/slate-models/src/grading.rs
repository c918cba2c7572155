//! The letter-grade scale.
//!
//! Letter grades are a pure function of the percentage score. The scale is
//! applied when summary rollups are computed during report-card generation;
//! nothing stores a percentage, so the boundaries live in one place.

/// Maps a percentage (0–100) to its letter grade.
pub fn letter_for_percent(percent: f64) -> &'static str {
    match percent {
        p if p >= 80.0 => "A",
        p if p >= 75.0 => "A-",
        p if p >= 70.0 => "B+",
        p if p >= 65.0 => "B",
        p if p >= 60.0 => "B-",
        p if p >= 55.0 => "C+",
        p if p >= 50.0 => "C",
        p if p >= 45.0 => "C-",
        p if p >= 40.0 => "D+",
        p if p >= 35.0 => "D",
        p if p >= 30.0 => "D-",
        _ => "E",
    }
}

/// Maps a raw score against its maximum to a letter grade.
///
/// A non-positive maximum yields "E" rather than dividing by zero.
pub fn letter_for(score: f64, max_marks: f64) -> &'static str {
    if max_marks <= 0.0 {
        return "E";
    }
    letter_for_percent(score / max_marks * 100.0)
}
