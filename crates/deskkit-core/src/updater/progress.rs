use serde::{Deserialize, Serialize};

/// Raw events emitted while an update downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "PascalCase")]
pub enum DownloadEvent {
    Started { content_length: Option<u64> },
    Progress { chunk_length: u64 },
    Finished,
}

/// Download progress reported to the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProgress {
    pub downloaded: u64,
    pub total: u64,
    pub percent: u8,
}

impl UpdateProgress {
    /// `percent` is 0 while the total is unknown
    pub fn new(downloaded: u64, total: u64) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((downloaded as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Self {
            downloaded,
            total,
            percent,
        }
    }
}

/// Folds [`DownloadEvent`]s into [`UpdateProgress`]
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    downloaded: u64,
    total: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&mut self, event: DownloadEvent) -> UpdateProgress {
        match event {
            DownloadEvent::Started { content_length } => {
                self.downloaded = 0;
                self.total = content_length.unwrap_or(0);
            }
            DownloadEvent::Progress { chunk_length } => {
                self.downloaded = self.downloaded.saturating_add(chunk_length);
            }
            DownloadEvent::Finished => {
                self.downloaded = self.total.max(self.downloaded);
            }
        }
        UpdateProgress::new(self.downloaded, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(UpdateProgress::new(1, 3).percent, 33);
        assert_eq!(UpdateProgress::new(2, 3).percent, 67);
        assert_eq!(UpdateProgress::new(5, 0).percent, 0);
        assert_eq!(UpdateProgress::new(12, 10).percent, 100);
    }

    #[test]
    fn test_tracker_unknown_total() {
        let mut tracker = ProgressTracker::new();
        let ticks = [
            DownloadEvent::Started { content_length: None },
            DownloadEvent::Progress { chunk_length: 512 },
            DownloadEvent::Progress { chunk_length: 512 },
            DownloadEvent::Finished,
        ];
        for event in ticks {
            assert_eq!(tracker.on_event(event).percent, 0);
        }
    }

    #[test]
    fn test_event_wire_shape() {
        let event: DownloadEvent =
            serde_json::from_str(r#"{"event":"Progress","data":{"chunk_length":64}}"#).unwrap();
        assert_eq!(event, DownloadEvent::Progress { chunk_length: 64 });
    }
}
