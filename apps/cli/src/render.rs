//! Terminal output for upload events and notices.

use intake_protocol::format_size;
use intake_uploader::{Notice, NoticeLevel, Progress, UploadEvent, UploadItem};
use tokio::sync::mpsc;

/// Prints events until the orchestrator drops its observer.
pub async fn progress(mut events_rx: mpsc::UnboundedReceiver<UploadEvent>) {
    while let Some(event) = events_rx.recv().await {
        match event {
            UploadEvent::ListPrepared(items) => {
                let queued = items
                    .iter()
                    .filter(|i| i.progress == Progress::Queued)
                    .count();
                println!("queued {queued} file(s), {} in list", items.len());
            }
            UploadEvent::FileUpdated { item, .. } => {
                if item.progress.is_terminal() {
                    println!("{}", item_line(&item));
                }
            }
            UploadEvent::ListUpdated(items) => {
                println!("list now holds {} file(s)", items.len());
            }
        }
    }
}

/// One status line for an item.
pub fn item_line(item: &UploadItem) -> String {
    let status = match item.progress {
        Progress::Queued => "queued".to_string(),
        Progress::InFlight(p) => format!("{p:>3}%"),
        Progress::Complete => "done".to_string(),
        Progress::Failed => "failed".to_string(),
    };
    let id = item.remote().map(|r| r.id.as_str()).unwrap_or("-");
    format!(
        "{:<8} {:<40} {:>10}  {}",
        status,
        item.file.name(),
        format_size(item.file.size()),
        id
    )
}

pub fn notice_line(notice: &Notice) -> String {
    let label = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Info => "info",
    };
    format!("[{label}] {}", notice.message)
}
