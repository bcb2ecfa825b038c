pub mod compare;
pub mod dispatch;
pub mod predict;
pub mod report;
pub mod shared;
pub mod update;
