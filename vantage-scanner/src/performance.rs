//! Qualitative ratings for navigation timing metrics.

use crate::session::PerfTiming;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedRating {
    Fast,
    Medium,
    Slow,
}

impl SpeedRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedRating::Fast => "fast",
            SpeedRating::Medium => "medium",
            SpeedRating::Slow => "slow",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub load_time: f64,
    pub dom_content_loaded: f64,
    pub ttfb: f64,
    pub load_time_rating: SpeedRating,
    pub dom_content_loaded_rating: SpeedRating,
    pub ttfb_rating: SpeedRating,
}

pub fn rate_ttfb(seconds: f64) -> SpeedRating {
    if seconds < 0.3 {
        SpeedRating::Fast
    } else if seconds < 0.6 {
        SpeedRating::Medium
    } else {
        SpeedRating::Slow
    }
}

pub fn rate_dom_content_loaded(seconds: f64) -> SpeedRating {
    if seconds < 1.5 {
        SpeedRating::Fast
    } else if seconds < 3.0 {
        SpeedRating::Medium
    } else {
        SpeedRating::Slow
    }
}

pub fn rate_load_time(seconds: f64) -> SpeedRating {
    if seconds < 2.0 {
        SpeedRating::Fast
    } else if seconds < 4.0 {
        SpeedRating::Medium
    } else {
        SpeedRating::Slow
    }
}

/// Attach ratings to a raw timing sample.
pub fn report(timing: PerfTiming) -> PerformanceReport {
    PerformanceReport {
        load_time: timing.load_time,
        dom_content_loaded: timing.dom_content_loaded,
        ttfb: timing.ttfb,
        load_time_rating: rate_load_time(timing.load_time),
        dom_content_loaded_rating: rate_dom_content_loaded(timing.dom_content_loaded),
        ttfb_rating: rate_ttfb(timing.ttfb),
    }
}
