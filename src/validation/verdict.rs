use serde::{Deserialize, Serialize};

use crate::models::{ComparisonSet, ComparisonTopic};

/// Overall pass/fail over both comparison sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_compliant: bool,
    pub topics_checked: usize,
    pub failing_device_topics: Vec<ComparisonTopic>,
    pub failing_image_topics: Vec<ComparisonTopic>,
}

impl Verdict {
    /// Compliant when at least one topic was checked and every topic matched.
    pub fn from_comparisons(report_vs_device: &ComparisonSet, report_vs_images: &ComparisonSet) -> Self {
        let failing_device_topics = Self::failing(report_vs_device);
        let failing_image_topics = Self::failing(report_vs_images);
        let topics_checked = report_vs_device.len() + report_vs_images.len();

        Verdict {
            is_compliant: topics_checked > 0
                && failing_device_topics.is_empty()
                && failing_image_topics.is_empty(),
            topics_checked,
            failing_device_topics,
            failing_image_topics,
        }
    }

    pub fn failing_topics(&self) -> impl Iterator<Item = &ComparisonTopic> {
        self.failing_device_topics
            .iter()
            .chain(self.failing_image_topics.iter())
    }

    fn failing(set: &ComparisonSet) -> Vec<ComparisonTopic> {
        set.iter()
            .filter(|(_, result)| !result.is_match)
            .map(|(topic, _)| *topic)
            .collect()
    }
}
