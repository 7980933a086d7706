// Components module - reusable UI building blocks
//
// Panels own their scroll and selection state and receive the data they
// draw; the bars read from App directly.

pub mod breadcrumb_bar;
pub mod field_list;
pub mod logs_panel;
pub mod scrollbar;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use breadcrumb_bar::BreadcrumbBar;
pub use field_list::FieldList;
pub use logs_panel::LogsPanel;
pub use toast::Toast;
