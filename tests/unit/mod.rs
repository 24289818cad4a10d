//! Unit test modules.

mod segmenter_test;
mod series_summary_test;
