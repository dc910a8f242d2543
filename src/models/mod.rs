pub mod alert;
pub mod event;
pub mod status;
pub mod timetable;

pub use alert::{Alert, AlertType, Region, RegionType};
pub use event::{AlertEventKind, LifecycleEvent};
pub use status::StatusModel;
pub use timetable::{Interval, Timetable};
