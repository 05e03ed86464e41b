mod report_detail;
mod report_list;

pub use report_detail::ReportDetailView;
pub use report_list::ReportListView;
