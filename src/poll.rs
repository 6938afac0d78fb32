//! 处理状态轮询策略
//!
//! 能谱记录在后台处理，状态页每 5 秒重新获取一次，直到状态为完成或失败。

use crate::fetch::FetchState;
use dosportal_shared::{ProcessingStatus, SpectralRecord};
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// 当前状态下是否继续轮询
pub fn should_poll(status: ProcessingStatus) -> bool {
    matches!(
        status,
        ProcessingStatus::Pending | ProcessingStatus::Processing
    )
}

/// 一次加载结束后是否安排下一次轮询
///
/// `last` 是之前成功获取到的状态。加载失败时按它判断，只要记录仍在处理中就继续重试；
/// 需要登录时交给路由守卫，不再轮询。
pub fn next_poll(last: Option<ProcessingStatus>, state: &FetchState<SpectralRecord>) -> bool {
    match state {
        FetchState::Loading | FetchState::LoginRequired => false,
        FetchState::Ready(record) => should_poll(record.processing_status),
        FetchState::Failed(_) => last.is_some_and(should_poll),
    }
}

/// 状态页上的说明文字
pub fn status_message(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Pending => "Your file is queued for processing.",
        ProcessingStatus::Processing => "Your file is being processed. This page refreshes automatically.",
        ProcessingStatus::Completed => "Processing finished successfully.",
        ProcessingStatus::Failed => "Processing failed. Check the file format and try again.",
        ProcessingStatus::Other => "Unknown processing status.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polls_only_while_in_progress() {
        assert!(should_poll(ProcessingStatus::Pending));
        assert!(should_poll(ProcessingStatus::Processing));
        assert!(!should_poll(ProcessingStatus::Completed));
        assert!(!should_poll(ProcessingStatus::Failed));
        assert!(!should_poll(ProcessingStatus::Other));
        assert_eq!(POLL_INTERVAL.as_millis(), 5000);
    }

    fn record(status: ProcessingStatus) -> FetchState<SpectralRecord> {
        FetchState::Ready(SpectralRecord {
            id: uuid::Uuid::nil(),
            name: "flight.log".to_string(),
            processing_status: status,
            created: None,
            author: None,
            owner: None,
            raw_file_id: None,
            artifacts_count: 0,
            description: None,
        })
    }

    #[test]
    fn test_next_poll_after_success() {
        assert!(next_poll(None, &record(ProcessingStatus::Pending)));
        assert!(next_poll(Some(ProcessingStatus::Pending), &record(ProcessingStatus::Processing)));
        assert!(!next_poll(Some(ProcessingStatus::Processing), &record(ProcessingStatus::Completed)));
        assert!(!next_poll(Some(ProcessingStatus::Processing), &record(ProcessingStatus::Failed)));
    }

    #[test]
    fn test_failed_fetch_keeps_polling_in_progress_record() {
        let failed = FetchState::Failed("Request failed: connection reset".to_string());
        assert!(next_poll(Some(ProcessingStatus::Pending), &failed));
        assert!(next_poll(Some(ProcessingStatus::Processing), &failed));
        assert!(!next_poll(Some(ProcessingStatus::Completed), &failed));
        // 首次加载就失败时没有可依据的状态
        assert!(!next_poll(None, &failed));
    }

    #[test]
    fn test_no_poll_while_loading_or_logged_out() {
        assert!(!next_poll(Some(ProcessingStatus::Pending), &FetchState::Loading));
        assert!(!next_poll(Some(ProcessingStatus::Pending), &FetchState::LoginRequired));
    }
}
